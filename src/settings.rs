//! Settings that control inference and code generation.
use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::codegen::{CSharpTarget, RustTarget, Target};
use crate::error::{Error, Result};

// ------------------------------- Policy ---------------------------------- //

pub const DEFAULT_DISCRIMINATOR: &str = "@type";
pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TargetLanguage {
    #[default]
    Rust,
    #[value(name = "csharp")]
    #[serde(rename = "csharp")]
    CSharp,
}

/// Where a discriminator may appear relative to the fields it claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DiscriminatorOrder {
    /// Scan the whole object for the discriminator before classifying fields.
    #[default]
    Buffered,
    /// Only fields after the discriminator belong to the hoisted type; earlier
    /// ones spill into the enclosing object.
    DocumentOrder,
}

/// What to do when two hoisted objects resolve to the same type name but
/// disagree on shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    #[default]
    Reject,
    FirstWins,
    LastWins,
    Merge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct GenerateSettings {
    pub target: TargetLanguage,
    /// Property whose string value names the type of its enclosing object.
    pub discriminator: String,
    pub discriminator_order: DiscriminatorOrder,
    pub on_collision: CollisionPolicy,
    pub max_depth: usize,
}

impl Default for GenerateSettings {
    fn default() -> Self {
        Self {
            target: TargetLanguage::default(),
            discriminator: DEFAULT_DISCRIMINATOR.to_string(),
            discriminator_order: DiscriminatorOrder::default(),
            on_collision: CollisionPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl GenerateSettings {
    /// Load settings from a JSON file; missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|error| Error::Config(format!("{}: {error}", path.display())))?;
        let settings: Self = crate::path_de::from_str_with_path(&source)
            .map_err(|error| Error::Config(format!("{}: {error}", path.display())))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.discriminator.is_empty() {
            return Err(Error::Config("discriminator must not be empty".into()));
        }
        if self.max_depth == 0 {
            return Err(Error::Config("max-depth must be at least 1".into()));
        }
        Ok(())
    }

    pub fn target(&self) -> &'static dyn Target {
        match self.target {
            TargetLanguage::Rust => &RustTarget,
            TargetLanguage::CSharp => &CSharpTarget,
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
