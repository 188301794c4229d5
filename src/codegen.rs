//! Renders lowered declarations as source text.
//!
//! A [`Target`] owns all target-language syntax and fills named slots (entry
//! point, one declaration per type, the enclosing unit); [`Codegen`] only
//! decides what goes into which slot and in what order.
pub mod csharp;
pub mod rust;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::lower::{Decl, Lowered};

pub use csharp::CSharpTarget;
pub use rust::RustTarget;

/// Header line every generated unit starts with.
pub const GENERATED_BY: &str = "Generated by json-typegen from a JSON sample. Do not edit.";

pub trait Target: Sync {
    fn name(&self) -> &'static str;

    /// Type names generated declarations must not take.
    fn reserved_type_names(&self) -> &'static [&'static str];

    /// The parse function for `root`, returning an absent value on mismatch.
    fn entry_point(&self, root: &str) -> String;

    fn declaration(&self, decl: &Decl) -> String;

    fn unit(&self, slots: &UnitSlots<'_>) -> String;
}

/// Everything a target needs to assemble the final text.
#[derive(Debug, Clone)]
pub struct UnitSlots<'a> {
    pub namespace: &'a str,
    pub root: &'a str,
    pub entry_point: &'a str,
    /// Root first, then the remaining declarations in emission order.
    pub declarations: Vec<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedUnit {
    pub namespace: String,
    pub root: String,
    pub entry_point: String,
    /// Type name → declaration text, in emission order.
    pub declarations: IndexMap<String, String>,
    /// The complete rendered unit.
    pub source: String,
}

pub struct Codegen<'t> {
    target: &'t dyn Target,
    namespace: String,
    root: String,
    entry_point: String,
    declarations: IndexMap<String, String>,
}

impl<'t> Codegen<'t> {
    pub fn new(target: &'t dyn Target) -> Self {
        Self {
            target,
            namespace: String::new(),
            root: String::new(),
            entry_point: String::new(),
            declarations: IndexMap::new(),
        }
    }

    pub fn emit(&mut self, lowered: &Lowered, namespace: &str) {
        self.namespace = namespace.to_string();
        self.root = lowered.root.clone();
        self.entry_point = self.target.entry_point(&lowered.root);
        for decl in &lowered.decls {
            self.declarations.insert(decl.name.clone(), self.target.declaration(decl));
        }
        debug!(lang = self.target.name(), root = %self.root, decls = self.declarations.len(), "emitted");
    }

    pub fn into_unit(self) -> GeneratedUnit {
        let source = self.target.unit(&UnitSlots {
            namespace: &self.namespace,
            root: &self.root,
            entry_point: &self.entry_point,
            declarations: self.declarations.values().map(String::as_str).collect(),
        });
        GeneratedUnit {
            namespace: self.namespace,
            root: self.root,
            entry_point: self.entry_point,
            declarations: self.declarations,
            source,
        }
    }

    pub fn into_string(self) -> String {
        self.into_unit().source
    }
}

/// Prefix every non-empty line of `text` with `prefix`.
pub(crate) fn indent(text: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    for line in text.lines() {
        if !line.is_empty() {
            out.push_str(prefix);
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::infer_root;
    use crate::lower::lower;
    use crate::settings::GenerateSettings;
    use serde_json::json;

    fn unit(target: &dyn Target, v: serde_json::Value) -> GeneratedUnit {
        let inferred = infer_root(&v, &GenerateSettings::default()).unwrap();
        let lowered = lower("Library", &inferred, target.reserved_type_names()).unwrap();
        let mut cg = Codegen::new(target);
        cg.emit(&lowered, "catalog");
        cg.into_unit()
    }

    #[test]
    fn declarations_keyed_by_type_name_in_order() {
        for target in [&RustTarget as &dyn Target, &CSharpTarget] {
            let u = unit(target, json!({
                "writer": {"@type": "Author", "name": "Jane"},
                "address": {"city": "x"},
            }));
            let keys: Vec<_> = u.declarations.keys().map(String::as_str).collect();
            assert_eq!(keys, ["Library", "LibraryAddress", "Author"], "{}", target.name());
            for text in std::iter::once(&u.entry_point).chain(u.declarations.values()) {
                assert!(u.source.contains(text.lines().next().unwrap()));
            }
        }
    }

    #[test]
    fn output_is_deterministic() {
        let v = json!({"b": {"@type": "B", "x": [1, "a"]}, "a": {"@type": "A", "y": true}, "c": "z"});
        for target in [&RustTarget as &dyn Target, &CSharpTarget] {
            assert_eq!(unit(target, v.clone()), unit(target, v.clone()));
        }
    }

    #[test]
    fn indent_skips_blank_lines() {
        assert_eq!(indent("a\n\n  b\n", "    "), "    a\n\n      b\n");
    }
}
