//! Rust target: serde structs inside a `pub mod` named after the namespace.
use std::fmt::Write;

use super::{indent, Target, UnitSlots, GENERATED_BY};
use crate::lower::{Decl, FieldTy};
use crate::naming::{self, NameScope};

const INDENT: &str = "    ";

const DERIVES: &str = "#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]";

// Names the generated code itself refers to.
const RESERVED_TYPES: &[&str] = &[
    "Self", "String", "Vec", "Option", "Some", "None", "Result", "Ok", "Err", "Box",
    "Debug", "Clone", "Default", "PartialEq", "Serialize", "Deserialize",
];

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if",
    "impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override",
    "priv", "pub", "ref", "return", "static", "struct", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

// Keywords that cannot be written as raw identifiers.
const NON_RAW_KEYWORDS: &[&str] = &["crate", "self", "super", "Self", "_"];

#[derive(Debug, Clone, Copy, Default)]
pub struct RustTarget;

impl Target for RustTarget {
    fn name(&self) -> &'static str { "rust" }

    fn reserved_type_names(&self) -> &'static [&'static str] { RESERVED_TYPES }

    fn entry_point(&self, root: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "/// Parses `json` into a [`{root}`], or `None` if it does not match.");
        let _ = writeln!(out, "pub fn parse(json: &str) -> Option<{root}> {{");
        let _ = writeln!(out, "{INDENT}serde_json::from_str(json).ok()");
        let _ = writeln!(out, "}}");
        out
    }

    fn declaration(&self, decl: &Decl) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{DERIVES}");
        if decl.fields.is_empty() {
            let _ = writeln!(out, "pub struct {} {{}}", decl.name);
            return out;
        }
        let _ = writeln!(out, "pub struct {} {{", decl.name);
        let mut scope = NameScope::new();
        for field in &decl.fields {
            let name = scope.claim(&field_name(&field.ident));
            // a recursive field must default to nothing, or `Default` never returns
            let (ty, skip) = match field.recursive {
                true => (format!("Option<Box<{}>>", rust_type(&field.ty)), ", skip_serializing_if = \"Option::is_none\""),
                false => (rust_type(&field.ty).to_string(), ""),
            };
            let _ = writeln!(out, "{INDENT}#[serde(rename = {:?}, default{skip})]", field.key);
            let _ = writeln!(out, "{INDENT}pub {}: {ty},", escape_keyword(&name));
        }
        let _ = writeln!(out, "}}");
        out
    }

    fn unit(&self, slots: &UnitSlots<'_>) -> String {
        let mut body = String::new();
        let _ = writeln!(body, "use serde::{{Deserialize, Serialize}};");
        for block in std::iter::once(slots.entry_point).chain(slots.declarations.iter().copied()) {
            body.push('\n');
            body.push_str(block);
        }

        let mut out = String::new();
        let _ = writeln!(out, "// {GENERATED_BY}");
        out.push('\n');
        match module_name(slots.namespace) {
            None => out.push_str(&body),
            Some(module) => {
                let _ = writeln!(out, "pub mod {module} {{");
                out.push_str(&indent(&body, INDENT));
                let _ = writeln!(out, "}}");
            }
        }
        out
    }
}

fn rust_type(ty: &FieldTy) -> &str {
    match ty {
        FieldTy::String => "String",
        FieldTy::Integer => "i64",
        FieldTy::Number => "f64",
        FieldTy::Boolean => "bool",
        FieldTy::StringList => "Vec<String>",
        FieldTy::IntegerList => "Vec<i64>",
        FieldTy::NumberList => "Vec<f64>",
        FieldTy::Named(name) => name,
    }
}

fn field_name(ident: &str) -> String {
    let snake = naming::to_snake_case(ident);
    if snake.is_empty() || snake == "_" { "field".to_string() } else { snake }
}

fn escape_keyword(name: &str) -> String {
    if NON_RAW_KEYWORDS.contains(&name) {
        format!("{name}_")
    } else if KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}

fn module_name(namespace: &str) -> Option<String> {
    if namespace.trim().is_empty() {
        return None;
    }
    Some(escape_keyword(&naming::to_snake_case(&naming::resolve(namespace))))
}

// ------------------------------- Tests ------------------------------------ //
