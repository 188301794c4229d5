//! Infer typed declarations from a sample JSON (or JSON-LD) document.
//!
//! ```
//! use json_typegen::{generate, GenerateSettings};
//!
//! let unit = generate(
//!     "library",
//!     "Library",
//!     r#"{"name": "City", "director": {"@type": "Person", "givenName": "Jane"}}"#,
//!     &GenerateSettings::default(),
//! ).unwrap();
//!
//! assert_eq!(unit.declarations.keys().collect::<Vec<_>>(), ["Library", "Person"]);
//! assert!(unit.source.contains("pub director: Person,"));
//! ```
pub mod codegen;
pub mod error;
pub mod inference;
pub mod ir;
pub mod jq_exec;
pub mod lower;
pub mod naming;
pub mod path_de;
pub mod registry;
pub mod settings;

use serde_json::Value;

pub use codegen::{Codegen, GeneratedUnit, Target};
pub use error::{Error, Result};
pub use settings::{CollisionPolicy, DiscriminatorOrder, GenerateSettings, TargetLanguage};

/// Infer declarations for `class_name` from the JSON text `json` and render
/// them, together with a parse entry point, inside `namespace`.
pub fn generate(
    namespace: &str,
    class_name: &str,
    json: &str,
    settings: &GenerateSettings,
) -> Result<GeneratedUnit> {
    let value: Value = serde_json::from_str(json)?;
    generate_from_value(namespace, class_name, &value, settings)
}

pub fn generate_from_value(
    namespace: &str,
    class_name: &str,
    value: &Value,
    settings: &GenerateSettings,
) -> Result<GeneratedUnit> {
    settings.validate()?;
    let inferred = inference::infer_root(value, settings)?;
    let target = settings.target();
    let lowered = lower::lower(class_name, &inferred, target.reserved_type_names())?;
    let mut cg = Codegen::new(target);
    cg.emit(&lowered, namespace);
    Ok(cg.into_unit())
}

// ------------------------------- Tests ------------------------------------ //
