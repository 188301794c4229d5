//! Named types hoisted out of the sample by their discriminator.
//!
//! Entries keep first-discovery order (depth-first, document order) so
//! emission is stable. Each type name is declared once; a second, different
//! declaration under the same name is resolved by the [`CollisionPolicy`].
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::ir::Field;
use crate::naming::NameScope;
use crate::settings::CollisionPolicy;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedType {
    pub name: String,
    /// Raw discriminator value the name was resolved from.
    pub discriminator: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TypeRegistry {
    #[serde(skip)]
    policy: CollisionPolicy,
    types: IndexMap<String, NamedType>,
}

impl TypeRegistry {
    pub fn new(policy: CollisionPolicy) -> Self {
        Self { policy, types: IndexMap::new() }
    }

    pub fn register(&mut self, named: NamedType) -> Result<()> {
        let existing = match self.types.entry(named.name.clone()) {
            Entry::Vacant(slot) => {
                debug!(name = %named.name, discriminator = %named.discriminator, "registered hoisted type");
                slot.insert(named);
                return Ok(());
            }
            Entry::Occupied(slot) => slot.into_mut(),
        };
        if *existing == named {
            return Ok(());
        }
        match self.policy {
            CollisionPolicy::Reject => Err(Error::TypeCollision {
                name: named.name,
                first: existing.discriminator.clone(),
                second: named.discriminator,
            }),
            CollisionPolicy::FirstWins => {
                debug!(name = %named.name, "kept first declaration");
                Ok(())
            }
            CollisionPolicy::LastWins => {
                debug!(name = %named.name, "replaced declaration");
                existing.fields = named.fields;
                Ok(())
            }
            CollisionPolicy::Merge => {
                merge_fields(&mut existing.fields, named.fields);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&NamedType> {
        self.types.get(name)
    }

    /// Entries in discovery order.
    pub fn all(&self) -> impl Iterator<Item = &NamedType> {
        self.types.values()
    }

    pub fn len(&self) -> usize { self.types.len() }

    pub fn is_empty(&self) -> bool { self.types.is_empty() }
}

// Append incoming fields whose key is new; a known key keeps its first type.
fn merge_fields(into: &mut Vec<Field>, incoming: Vec<Field>) {
    let mut scope = NameScope::new();
    scope.reserve(into.iter().map(|f| f.ident.clone()));
    for field in incoming {
        match into.iter().find(|f| f.key == field.key) {
            Some(known) => {
                if known.ty != field.ty {
                    debug!(key = %field.key, "merge kept the first type of a conflicting field");
                }
            }
            None => {
                let ident = scope.claim(&field.ident);
                into.push(Field { ident, ..field });
            }
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ScalarKind, TypeNode};

    fn field(key: &str, ident: &str, kind: ScalarKind) -> Field {
        Field { key: key.into(), ident: ident.into(), ty: TypeNode::Scalar(kind) }
    }

    fn person(discriminator: &str, fields: Vec<Field>) -> NamedType {
        NamedType { name: "Person".into(), discriminator: discriminator.into(), fields }
    }

    #[test]
    fn keeps_discovery_order_and_dedupes() {
        let mut reg = TypeRegistry::new(CollisionPolicy::Reject);
        let p = person("Person", vec![field("name", "Name", ScalarKind::String)]);
        reg.register(p.clone()).unwrap();
        reg.register(NamedType { name: "Book".into(), discriminator: "Book".into(), fields: vec![] }).unwrap();
        reg.register(p).unwrap();
        let names: Vec<_> = reg.all().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Person", "Book"]);
    }

    #[test]
    fn reject_reports_both_discriminators() {
        let mut reg = TypeRegistry::new(CollisionPolicy::Reject);
        reg.register(person("schema:Person", vec![])).unwrap();
        let err = reg.register(person("schema_Person", vec![])).unwrap_err();
        match err {
            Error::TypeCollision { name, first, second } => {
                assert_eq!(name, "Person");
                assert_eq!(first, "schema:Person");
                assert_eq!(second, "schema_Person");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn first_and_last_wins() {
        let a = person("Person", vec![field("name", "Name", ScalarKind::String)]);
        let b = person("Person", vec![field("age", "Age", ScalarKind::Number)]);

        let mut first = TypeRegistry::new(CollisionPolicy::FirstWins);
        first.register(a.clone()).unwrap();
        first.register(b.clone()).unwrap();
        assert_eq!(first.get("Person").unwrap().fields, a.fields);

        let mut last = TypeRegistry::new(CollisionPolicy::LastWins);
        last.register(a).unwrap();
        last.register(b.clone()).unwrap();
        assert_eq!(last.get("Person").unwrap().fields, b.fields);
        assert_eq!(last.len(), 1);
    }

    #[test]
    fn merge_appends_new_keys_and_keeps_first_type() {
        let mut reg = TypeRegistry::new(CollisionPolicy::Merge);
        reg.register(person("Person", vec![
            field("name", "Name", ScalarKind::String),
            field("age", "Age", ScalarKind::Number),
        ])).unwrap();
        reg.register(person("Person", vec![
            field("age", "Age", ScalarKind::String),
            field("@name", "Name", ScalarKind::String),
            field("alive", "Alive", ScalarKind::Boolean),
        ])).unwrap();
        let fields = &reg.get("Person").unwrap().fields;
        let summary: Vec<_> = fields.iter().map(|f| (f.key.as_str(), f.ident.as_str())).collect();
        assert_eq!(summary, [("name", "Name"), ("age", "Age"), ("@name", "Name2"), ("alive", "Alive")]);
        assert_eq!(fields[1].ty, TypeNode::Scalar(ScalarKind::Number));
    }
}
