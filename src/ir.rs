// Inferred schema IR. Built once per sample, immutable afterwards.
use serde::Serialize;
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    String,                  // default ""
    Integer,                 // fits i64; default 0
    Number,                  // default 0.0
    Boolean,                 // default false
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayKind {
    String,
    Integer,                 // every number element fits i64
    Number,
    Unsupported,             // empty / no scalar element; never declared
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "of", rename_all = "lowercase")]
pub enum TypeNode {
    Scalar(ScalarKind),
    Array(ArrayKind),
    Object(ObjectNode),      // inline, anonymous in the sample
    Reference(String),       // name of a hoisted registry entry
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ObjectNode {
    pub fields: Vec<Field>,  // document order
    /// Discriminator value; only set on hoisted (non-root) objects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub key: String,         // original JSON key, used for exact (de)serialization
    pub ident: String,       // resolved, unique within its object
    pub ty: TypeNode,
}

/// Closed view over a JSON value's kind.
#[derive(Debug, Clone, Copy)]
pub enum ValueKind<'a> {
    String(&'a str),
    Number(&'a Number),
    Boolean,
    Array(&'a [Value]),
    Object(&'a Map<String, Value>),
    Absent,
}

impl<'a> From<&'a Value> for ValueKind<'a> {
    fn from(v: &'a Value) -> Self {
        match v {
            Value::Null      => ValueKind::Absent,
            Value::Bool(_)   => ValueKind::Boolean,
            Value::Number(n) => ValueKind::Number(n),
            Value::String(s) => ValueKind::String(s),
            Value::Array(xs) => ValueKind::Array(xs),
            Value::Object(m) => ValueKind::Object(m),
        }
    }
}

impl ValueKind<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::String(_) => "string",
            ValueKind::Number(_) => "number",
            ValueKind::Boolean   => "boolean",
            ValueKind::Array(_)  => "array",
            ValueKind::Object(_) => "object",
            ValueKind::Absent    => "null",
        }
    }
}
