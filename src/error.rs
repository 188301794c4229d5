//! Error taxonomy for inference, lowering and emission.
//!
//! Unsupported value shapes (null fields, empty or non-scalar arrays) are not
//! errors; they are dropped from the inferred schema.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed JSON sample: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("sample root must be a JSON object, found {found}")]
    RootNotObject { found: &'static str },

    #[error(
        "type `{name}` is declared twice with different shapes \
         (discriminators {first:?} and {second:?})"
    )]
    TypeCollision {
        name: String,
        first: String,
        second: String,
    },

    #[error("hoisted type `{name}` (discriminator {discriminator:?}) collides with the root class name")]
    TypeNameCollision { name: String, discriminator: String },

    #[error("invalid class name {0:?}")]
    InvalidClassName(String),

    #[error("sample nesting exceeds the depth limit of {limit}")]
    DepthLimit { limit: usize },

    #[error("invalid settings: {0}")]
    Config(String),
}
