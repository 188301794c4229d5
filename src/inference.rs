//! Single-sample schema inference.
//!
//! Walks one JSON document and infers a typed schema:
//! - scalars (string / integer / number / boolean) map to scalar fields;
//! - arrays are typed by their first string or number element;
//! - nested objects are inferred recursively, and an object carrying a
//!   discriminator (`@type` by default) is hoisted into a [`TypeRegistry`]
//!   entry referenced from its parent field;
//! - nulls and arrays without scalar elements are dropped.
//!
//! Every object walk returns its fields together with the named types it
//! discovered; the root merges those into the registry explicitly.
pub mod arr;
pub mod obj;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::ir::{ObjectNode, ValueKind};
use crate::registry::TypeRegistry;
use crate::settings::GenerateSettings;

pub use arr::resolve_array;
pub use obj::{infer_object, infer_root_object, ObjectOutcome, Shape};

/// Read-only state shared by one inference call tree.
#[derive(Debug, Clone, Copy)]
pub struct Context<'s> {
    pub settings: &'s GenerateSettings,
}

/// Root declaration plus every hoisted type, for one sample.
#[derive(Debug, Clone, Serialize)]
pub struct Inferred {
    pub root: ObjectNode,
    pub registry: TypeRegistry,
}

// ------------------------------- Front API -------------------------------- //

pub fn infer_root(value: &Value, settings: &GenerateSettings) -> Result<Inferred> {
    let ValueKind::Object(map) = ValueKind::from(value) else {
        return Err(Error::RootNotObject { found: ValueKind::from(value).name() });
    };
    let cx = Context { settings };
    let (fields, discovered) = obj::infer_root_object(map, &cx)?;

    let mut registry = TypeRegistry::new(settings.on_collision);
    for named in discovered {
        registry.register(named)?;
    }
    debug!(fields = fields.len(), hoisted = registry.len(), "inferred sample");
    Ok(Inferred {
        root: ObjectNode { fields, discriminator: None },
        registry,
    })
}

pub fn infer_from_str(json: &str, settings: &GenerateSettings) -> Result<Inferred> {
    let value: Value = serde_json::from_str(json)?;
    infer_root(&value, settings)
}

// ------------------------------- Tests ------------------------------------ //
