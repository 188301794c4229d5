use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::{arr, Context};
use crate::error::{Error, Result};
use crate::ir::{ArrayKind, Field, ObjectNode, ScalarKind, TypeNode, ValueKind};
use crate::naming::{self, NameScope};
use crate::registry::NamedType;
use crate::settings::DiscriminatorOrder;

/// How an inferred object attaches to its parent.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Plain nested object, declared inline under the parent field.
    Inline(Vec<Field>),
    /// Object hoisted into the registry under `name`. `spilled` holds fields
    /// that preceded the discriminator in document-order mode; they belong
    /// to the parent's field list.
    Hoisted { name: String, spilled: Vec<Field> },
}

/// Result of walking one object: its shape plus every named type discovered
/// in it (itself included), in discovery order.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectOutcome {
    pub shape: Shape,
    pub discovered: Vec<NamedType>,
}

/// Fields being collected for one declaration, with its identifier scope.
#[derive(Debug, Default)]
struct Accumulator {
    fields: Vec<Field>,
    scope: NameScope,
}

impl Accumulator {
    fn push(&mut self, key: &str, ident: &str, ty: TypeNode) {
        let ident = self.scope.claim(ident);
        self.fields.push(Field { key: key.to_string(), ident, ty });
    }

    fn adopt(&mut self, field: Field) {
        let ident = self.scope.claim(&field.ident);
        self.fields.push(Field { ident, ..field });
    }
}

/// The type being hoisted out of the current object.
struct Hoist {
    name: String,
    discriminator: String,
    /// Position in `discovered` where this type was first seen.
    slot: usize,
    acc: Accumulator,
}

/// Infer one object. `parent` is the resolved identifier of the property
/// holding it; it is empty for the sample root, which never hoists.
pub fn infer_object(
    parent: &str,
    map: &Map<String, Value>,
    cx: &Context<'_>,
    depth: usize,
) -> Result<ObjectOutcome> {
    let Walk { open, hoist, mut discovered } = walk(parent, map, cx, depth)?;
    let shape = match hoist {
        None => Shape::Inline(open.fields),
        Some(h) => {
            debug!(parent, name = %h.name, spilled = open.fields.len(), "hoisted object");
            discovered.insert(h.slot, NamedType {
                name: h.name.clone(),
                discriminator: h.discriminator,
                fields: h.acc.fields,
            });
            Shape::Hoisted { name: h.name, spilled: open.fields }
        }
    };
    Ok(ObjectOutcome { shape, discovered })
}

/// Infer the sample root: its own fields plus every named type below it.
pub fn infer_root_object(map: &Map<String, Value>, cx: &Context<'_>) -> Result<(Vec<Field>, Vec<NamedType>)> {
    let Walk { open, discovered, .. } = walk("", map, cx, 0)?;
    Ok((open.fields, discovered))
}

struct Walk {
    open: Accumulator,
    hoist: Option<Hoist>,
    discovered: Vec<NamedType>,
}

fn walk(parent: &str, map: &Map<String, Value>, cx: &Context<'_>, depth: usize) -> Result<Walk> {
    if depth > cx.settings.max_depth {
        return Err(Error::DepthLimit { limit: cx.settings.max_depth });
    }
    let is_root = parent.is_empty();
    let disc_key = cx.settings.discriminator.as_str();

    let mut open = Accumulator::default();
    let mut discovered = Vec::<NamedType>::new();
    let mut hoist: Option<Hoist> = None;

    if !is_root && cx.settings.discriminator_order == DiscriminatorOrder::Buffered {
        hoist = map.get(disc_key).and_then(discriminator_value).map(|value| start_hoist(value, 0));
    }

    for (key, value) in map {
        if !is_root && key == disc_key {
            if let Some(disc) = discriminator_value(value) {
                if hoist.is_none() {
                    hoist = Some(start_hoist(disc, discovered.len()));
                }
                continue;
            }
        }
        let acc = match hoist.as_mut() {
            Some(h) => &mut h.acc,
            None => &mut open,
        };
        infer_property(key, value, cx, depth, acc, &mut discovered)?;
    }
    Ok(Walk { open, hoist, discovered })
}

fn discriminator_value(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

fn start_hoist(discriminator: &str, slot: usize) -> Hoist {
    Hoist {
        name: naming::resolve(discriminator),
        discriminator: discriminator.to_string(),
        slot,
        acc: Accumulator::default(),
    }
}

fn infer_property(
    key: &str,
    value: &Value,
    cx: &Context<'_>,
    depth: usize,
    acc: &mut Accumulator,
    discovered: &mut Vec<NamedType>,
) -> Result<()> {
    let ident = naming::resolve(key);
    let kind = ValueKind::from(value);
    trace!(key, ident = %ident, kind = kind.name(), "property");
    match kind {
        ValueKind::String(_) => acc.push(key, &ident, TypeNode::Scalar(ScalarKind::String)),
        ValueKind::Number(n) if n.is_i64() => acc.push(key, &ident, TypeNode::Scalar(ScalarKind::Integer)),
        ValueKind::Number(_) => acc.push(key, &ident, TypeNode::Scalar(ScalarKind::Number)),
        ValueKind::Boolean => acc.push(key, &ident, TypeNode::Scalar(ScalarKind::Boolean)),
        ValueKind::Array(items) => match arr::resolve_array(items) {
            ArrayKind::Unsupported => debug!(key, len = items.len(), "dropped array without a scalar element"),
            element => acc.push(key, &ident, TypeNode::Array(element)),
        },
        ValueKind::Object(map) => {
            let outcome = infer_object(&ident, map, cx, depth + 1)?;
            discovered.extend(outcome.discovered);
            match outcome.shape {
                Shape::Inline(fields) => {
                    acc.push(key, &ident, TypeNode::Object(ObjectNode { fields, discriminator: None }));
                }
                Shape::Hoisted { name, spilled } => {
                    for field in spilled {
                        acc.adopt(field);
                    }
                    acc.push(key, &ident, TypeNode::Reference(name));
                }
            }
        }
        ValueKind::Absent => debug!(key, "dropped null property"),
    }
    Ok(())
}

// ------------------------------- Tests ------------------------------------ //
