//! C# target: `System.Text.Json` partial classes.
use std::fmt::Write;

use super::{indent, Target, UnitSlots, GENERATED_BY};
use crate::lower::{Decl, DeclOrigin, FieldTy};
use crate::naming::{self, NameScope};

const INDENT: &str = "    ";

const ENTRY_POINT: &str = "Parse";

const RESERVED_TYPES: &[&str] = &[
    "Object", "String", "List", "System", "JsonSerializer", "JsonException",
    "JsonPropertyName", "JsonPropertyNameAttribute",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct CSharpTarget;

impl Target for CSharpTarget {
    fn name(&self) -> &'static str { "csharp" }

    fn reserved_type_names(&self) -> &'static [&'static str] { RESERVED_TYPES }

    fn entry_point(&self, root: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "public partial class {root}");
        let _ = writeln!(out, "{{");
        let _ = writeln!(out, "    public static {root}? {ENTRY_POINT}(string json)");
        let _ = writeln!(out, "    {{");
        let _ = writeln!(out, "        try");
        let _ = writeln!(out, "        {{");
        let _ = writeln!(out, "            return JsonSerializer.Deserialize<{root}>(json);");
        let _ = writeln!(out, "        }}");
        let _ = writeln!(out, "        catch (JsonException)");
        let _ = writeln!(out, "        {{");
        let _ = writeln!(out, "            return null;");
        let _ = writeln!(out, "        }}");
        let _ = writeln!(out, "    }}");
        let _ = writeln!(out, "}}");
        out
    }

    fn declaration(&self, decl: &Decl) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "public partial class {}", decl.name);
        let _ = writeln!(out, "{{");
        // members may not share the enclosing type's name, and the root
        // class also holds the static `Parse` from `entry_point`
        let mut scope = NameScope::new();
        scope.reserve([decl.name.as_str()]);
        if decl.origin == DeclOrigin::Root {
            scope.reserve([ENTRY_POINT]);
        }
        for (i, field) in decl.fields.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let name = scope.claim(&field.ident);
            let (ty, init) = match field.recursive {
                // eager `new()` would recurse forever
                true => (format!("{}?", csharp_type(&field.ty).0), ""),
                false => csharp_type(&field.ty),
            };
            let _ = writeln!(out, "{INDENT}[JsonPropertyName({})]", string_literal(&field.key));
            let _ = writeln!(out, "{INDENT}public {ty} {name} {{ get; set; }}{init}");
        }
        let _ = writeln!(out, "}}");
        out
    }

    fn unit(&self, slots: &UnitSlots<'_>) -> String {
        let mut body = String::new();
        for (i, block) in std::iter::once(slots.entry_point)
            .chain(slots.declarations.iter().copied())
            .enumerate()
        {
            if i > 0 {
                body.push('\n');
            }
            body.push_str(block);
        }

        let mut out = String::new();
        let _ = writeln!(out, "// <auto-generated>");
        let _ = writeln!(out, "// {GENERATED_BY}");
        let _ = writeln!(out, "// </auto-generated>");
        let _ = writeln!(out, "#nullable enable");
        out.push('\n');
        let _ = writeln!(out, "using System.Collections.Generic;");
        let _ = writeln!(out, "using System.Text.Json;");
        let _ = writeln!(out, "using System.Text.Json.Serialization;");
        out.push('\n');
        match namespace_name(slots.namespace) {
            None => out.push_str(&body),
            Some(ns) => {
                let _ = writeln!(out, "namespace {ns}");
                let _ = writeln!(out, "{{");
                out.push_str(&indent(&body, INDENT));
                let _ = writeln!(out, "}}");
            }
        }
        out
    }
}

// (type, initializer)
fn csharp_type(ty: &FieldTy) -> (String, &'static str) {
    match ty {
        FieldTy::String => ("string".into(), " = \"\";"),
        FieldTy::Integer => ("long".into(), ""),
        FieldTy::Number => ("double".into(), ""),
        FieldTy::Boolean => ("bool".into(), ""),
        FieldTy::StringList => ("List<string>".into(), " = new();"),
        FieldTy::IntegerList => ("List<long>".into(), " = new();"),
        FieldTy::NumberList => ("List<double>".into(), " = new();"),
        FieldTy::Named(name) => (name.clone(), " = new();"),
    }
}

fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// `my.app` → `My.App`; each dotted segment becomes an identifier.
fn namespace_name(namespace: &str) -> Option<String> {
    let segments: Vec<String> = namespace
        .split('.')
        .filter(|s| !s.trim().is_empty())
        .map(naming::resolve)
        .collect();
    if segments.is_empty() { None } else { Some(segments.join(".")) }
}

// ------------------------------- Tests ------------------------------------ //
