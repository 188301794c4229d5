//! Lowers an [`Inferred`] schema into the flat, ordered declaration list the
//! code emitter renders. Type names are final here: unique across the unit
//! and clear of names the target reserves.
use std::collections::{BTreeMap, BTreeSet};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::inference::Inferred;
use crate::ir::{ArrayKind, Field, ScalarKind, TypeNode};
use crate::naming::{self, NameScope};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lowered {
    pub root: String,
    /// Root first, then registry entries in registry order. Inline
    /// declarations follow the declaration that owns them.
    pub decls: Vec<Decl>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decl {
    pub name: String,
    pub origin: DeclOrigin,
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DeclOrigin {
    Root,
    Inline { owner: String, key: String },
    Hoisted { discriminator: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDecl {
    pub key: String,
    pub ident: String,
    pub ty: FieldTy,
    /// The named type leads back to the declaring type; the field needs
    /// indirection in targets with value semantics.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub recursive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "kebab-case")]
pub enum FieldTy {
    String,
    Integer,
    Number,
    Boolean,
    StringList,
    IntegerList,
    NumberList,
    Named(String),
}

impl Lowered {
    pub fn root_decl(&self) -> &Decl {
        &self.decls[0]
    }
}

/// Lower `inferred` for a root type called `class_name`, avoiding the
/// `reserved` type names of the output target.
pub fn lower(class_name: &str, inferred: &Inferred, reserved: &[&str]) -> Result<Lowered> {
    if !naming::is_identifier(class_name) || reserved.contains(&class_name) {
        return Err(Error::InvalidClassName(class_name.to_string()));
    }

    let mut scope = NameScope::new();
    scope.reserve(reserved.iter().copied());
    scope.reserve([class_name]);

    // hoisted names are claimed before any inline name
    let mut renames = BTreeMap::<String, String>::new();
    for named in inferred.registry.all() {
        if named.name == class_name {
            return Err(Error::TypeNameCollision {
                name: named.name.clone(),
                discriminator: named.discriminator.clone(),
            });
        }
        renames.insert(named.name.clone(), scope.claim(&named.name));
    }

    let mut lw = Lowerer { scope, renames, decls: Vec::new() };
    lw.declare(class_name.to_string(), DeclOrigin::Root, &inferred.root.fields);
    for named in inferred.registry.all() {
        let name = lw.renamed(&named.name);
        let origin = DeclOrigin::Hoisted { discriminator: named.discriminator.clone() };
        lw.declare(name, origin, &named.fields);
    }
    let mut decls = lw.decls;
    mark_recursive(&mut decls);
    Ok(Lowered { root: class_name.to_string(), decls })
}

// Flag every field whose named type can reach its own declaration again.
fn mark_recursive(decls: &mut [Decl]) {
    let edges: BTreeMap<String, Vec<String>> = decls
        .iter()
        .map(|d| {
            let targets = d.fields.iter().filter_map(|f| match &f.ty {
                FieldTy::Named(t) => Some(t.clone()),
                _ => None,
            });
            (d.name.clone(), targets.collect())
        })
        .collect();

    fn reaches(edges: &BTreeMap<String, Vec<String>>, from: &str, goal: &str, seen: &mut BTreeSet<String>) -> bool {
        if from == goal {
            return true;
        }
        if !seen.insert(from.to_string()) {
            return false;
        }
        edges.get(from).is_some_and(|next| next.iter().any(|n| reaches(edges, n, goal, seen)))
    }

    for decl in decls.iter_mut() {
        for field in &mut decl.fields {
            if let FieldTy::Named(target) = &field.ty {
                field.recursive = reaches(&edges, target, &decl.name, &mut BTreeSet::new());
            }
        }
    }
}

struct Lowerer {
    scope: NameScope,
    renames: BTreeMap<String, String>,
    decls: Vec<Decl>,
}

impl Lowerer {
    fn renamed(&self, name: &str) -> String {
        self.renames.get(name).cloned().unwrap_or_else(|| name.to_string())
    }

    // Push `name` and then, depth-first, the inline declarations it owns.
    fn declare(&mut self, name: String, origin: DeclOrigin, fields: &[Field]) {
        let at = self.decls.len();
        self.decls.push(Decl { name: name.clone(), origin, fields: Vec::new() });

        let mut lowered = Vec::with_capacity(fields.len());
        for field in fields {
            let ty = match &field.ty {
                TypeNode::Scalar(ScalarKind::String) => FieldTy::String,
                TypeNode::Scalar(ScalarKind::Integer) => FieldTy::Integer,
                TypeNode::Scalar(ScalarKind::Number) => FieldTy::Number,
                TypeNode::Scalar(ScalarKind::Boolean) => FieldTy::Boolean,
                TypeNode::Array(ArrayKind::String) => FieldTy::StringList,
                TypeNode::Array(ArrayKind::Integer) => FieldTy::IntegerList,
                TypeNode::Array(ArrayKind::Number) => FieldTy::NumberList,
                TypeNode::Array(ArrayKind::Unsupported) => continue,
                TypeNode::Reference(target) => FieldTy::Named(self.renamed(target)),
                TypeNode::Object(node) => {
                    let inline = self.scope.claim(&format!("{name}{}", field.ident));
                    let origin = DeclOrigin::Inline { owner: name.clone(), key: field.key.clone() };
                    self.declare(inline.clone(), origin, &node.fields);
                    FieldTy::Named(inline)
                }
            };
            lowered.push(FieldDecl {
                key: field.key.clone(),
                ident: field.ident.clone(),
                ty,
                recursive: false,
            });
        }
        self.decls[at].fields = lowered;
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::infer_root;
    use crate::settings::GenerateSettings;
    use serde_json::json;

    fn lowered(class: &str, v: serde_json::Value, reserved: &[&str]) -> Result<Lowered> {
        let inferred = infer_root(&v, &GenerateSettings::default())?;
        lower(class, &inferred, reserved)
    }

    fn names(l: &Lowered) -> Vec<&str> {
        l.decls.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn root_then_inline_then_registry() {
        let l = lowered("Library", json!({
            "address": {"city": "Springfield", "geo": {"lat": 1.5}},
            "director": {"@type": "Person", "home": {"city": "Shelbyville"}},
            "name": "City Library",
        }), &[]).unwrap();
        assert_eq!(names(&l), ["Library", "LibraryAddress", "LibraryAddressGeo", "Person", "PersonHome"]);
        assert_eq!(l.root_decl().fields[0].ty, FieldTy::Named("LibraryAddress".into()));
        assert_eq!(l.root_decl().fields[1].ty, FieldTy::Named("Person".into()));
        assert_eq!(l.decls[1].origin, DeclOrigin::Inline { owner: "Library".into(), key: "address".into() });
    }

    #[test]
    fn reserved_names_are_renamed_everywhere() {
        let l = lowered("Root", json!({"label": {"@type": "String", "text": "x"}}), &["String"]).unwrap();
        assert_eq!(names(&l), ["Root", "String2"]);
        assert_eq!(l.root_decl().fields[0].ty, FieldTy::Named("String2".into()));
    }

    #[test]
    fn inline_names_avoid_hoisted_names() {
        let l = lowered("Root", json!({
            "meta": {"a": 1},
            "x": {"@type": "RootMeta", "b": 2},
        }), &[]).unwrap();
        assert_eq!(names(&l), ["Root", "RootMeta2", "RootMeta"]);
    }

    #[test]
    fn class_name_checks() {
        assert!(matches!(lowered("not valid", json!({}), &[]), Err(Error::InvalidClassName(_))));
        assert!(matches!(lowered("Vec", json!({}), &["Vec"]), Err(Error::InvalidClassName(_))));
        let err = lowered("Author", json!({"w": {"@type": "Author"}}), &[]).unwrap_err();
        assert!(matches!(err, Error::TypeNameCollision { .. }));
    }

    #[test]
    fn cycles_through_hoisted_types_are_marked() {
        let inferred = infer_root(&json!({
            "me": {"@type": "Person", "name": "a", "friend": {"@type": "Person", "name": "b"}},
            "tag": {"@type": "Tag", "label": "x"},
        }), &GenerateSettings {
            on_collision: crate::settings::CollisionPolicy::Merge,
            ..Default::default()
        }).unwrap();
        let l = lower("Root", &inferred, &[]).unwrap();
        assert_eq!(names(&l), ["Root", "Person", "Tag"]);
        let flags = |name: &str| -> Vec<bool> {
            l.decls.iter().find(|d| d.name == name).unwrap().fields.iter().map(|f| f.recursive).collect()
        };
        assert_eq!(flags("Root"), [false, false]);
        assert_eq!(flags("Person"), [false, true]);
    }

    #[test]
    fn wildcard_discriminator_gets_a_usable_name() {
        let l = lowered("Root", json!({"x": {"@type": "_", "a": 1}}), &[]).unwrap();
        assert_eq!(names(&l), ["Root", "Field"]);
        assert_eq!(l.root_decl().fields[0].ty, FieldTy::Named("Field".into()));
    }

    #[test]
    fn empty_inline_objects_are_declared() {
        let l = lowered("Root", json!({"extra": {}}), &[]).unwrap();
        assert_eq!(names(&l), ["Root", "RootExtra"]);
        assert!(l.decls[1].fields.is_empty());
    }
}
