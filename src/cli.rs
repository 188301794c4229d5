//! Minimal CLI: sample JSON → (generated types | lowered schema)
use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde_json::Value;
use tracing::info;

use json_typegen::lower::{lower, Lowered};
use json_typegen::naming::{self, NameScope};
use json_typegen::{
    generate_from_value, inference, CollisionPolicy, DiscriminatorOrder, GenerateSettings,
    GeneratedUnit, TargetLanguage,
};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer types from sample JSON / JSON-LD documents and emit typed declarations with a parse entry point
#[derive(Parser, Debug)]
#[command(name = "json-typegen", version)]
pub struct CommandLineInterface {
    /// log inference decisions to stderr (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// infer and emit type declarations
    Generate(GenerateOut),
    /// infer and print the lowered declaration list as JSON (debug view)
    Schema(SchemaOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer selecting the sample inside each document (e.g. /data/items/0)
    #[arg(long)]
    json_pointer: Option<String>,

    /// jq filter applied to each document; every output is one sample
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs: literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct GeneratorSettings {
    /// JSON settings file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    target: Option<TargetLanguage>,

    /// discriminator property that hoists an object into a named type
    #[arg(long)]
    discriminator: Option<String>,

    #[arg(long, value_enum)]
    discriminator_order: Option<DiscriminatorOrder>,

    #[arg(long, value_enum)]
    on_collision: Option<CollisionPolicy>,

    #[arg(long)]
    max_depth: Option<usize>,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    generator: GeneratorSettings,

    /// root type name (defaults to the input file stem)
    #[arg(long)]
    class: Option<String>,

    /// namespace / module name (defaults to the input file stem)
    #[arg(long)]
    namespace: Option<String>,

    /// output file for one sample, output directory for several (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    generator: GeneratorSettings,

    /// root type name (defaults to the input file stem)
    #[arg(long)]
    class: Option<String>,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// One sample document and the names derived from where it came from.
#[derive(Debug, Clone)]
struct Sample {
    source: PathBuf,
    stem: String,
    class: String,
    value: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_samples(&self, class: Option<&str>) -> Result<Vec<Sample>> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let mut class_names = NameScope::new();
        let mut samples = Vec::new();
        for source_path in source_paths {
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read {}", source_path.display()))?;
            let document = serde_json::from_str::<Value>(&source)
                .with_context(|| format!("failed to parse JSON source file {}", source_path.display()))?;
            let selected = self.select(document)
                .with_context(|| format!("failed to select samples from {}", source_path.display()))?;

            let stem = file_stem(&source_path);
            let base = class.map(str::to_string).unwrap_or_else(|| naming::resolve(&stem));
            for value in selected {
                samples.push(Sample {
                    source: source_path.clone(),
                    stem: stem.clone(),
                    class: class_names.claim(&base),
                    value,
                });
            }
        }
        Ok(samples)
    }

    fn select(&self, document: Value) -> Result<Vec<Value>> {
        let document = match self.json_pointer.as_deref() {
            None => document,
            Some(pointer) => match document.pointer(pointer) {
                Some(node) => node.clone(),
                None => bail!("JSON pointer {pointer:?} matched nothing"),
            },
        };
        match self.jq_expr.as_deref() {
            None => Ok(vec![document]),
            Some(jq_expr) => json_typegen::jq_exec::select_samples(jq_expr, &document),
        }
    }
}

impl GeneratorSettings {
    fn resolve(&self) -> Result<GenerateSettings> {
        let mut settings = match &self.config {
            Some(path) => GenerateSettings::load(path)?,
            None => GenerateSettings::default(),
        };
        if let Some(target) = self.target { settings.target = target; }
        if let Some(key) = &self.discriminator { settings.discriminator = key.clone(); }
        if let Some(order) = self.discriminator_order { settings.discriminator_order = order; }
        if let Some(policy) = self.on_collision { settings.on_collision = policy; }
        if let Some(depth) = self.max_depth { settings.max_depth = depth; }
        settings.validate()?;
        Ok(settings)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn init_tracing(&self) {
        let default = match self.verbose {
            0 => "json_typegen=warn",
            1 => "json_typegen=debug",
            _ => "json_typegen=trace",
        };
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Generate(target) => target.run(),
            Command::Schema(target) => target.run(),
        }
    }
}

impl GenerateOut {
    fn run(&self) -> Result<()> {
        let settings = self.generator.resolve()?;
        let samples = self.input_settings.load_samples(self.class.as_deref())?;

        let units = samples
            .par_iter()
            .map(|sample| {
                let namespace = self.namespace.as_deref().unwrap_or(&sample.stem);
                generate_from_value(namespace, &sample.class, &sample.value, &settings)
                    .with_context(|| format!("failed to generate types for {}", sample.source.display()))
            })
            .collect::<Result<Vec<GeneratedUnit>>>()?;
        for unit in &units {
            info!(root = %unit.root, types = unit.declarations.len(), "generated");
        }

        match (&self.out, units.as_slice()) {
            (None, units) => {
                let all: Vec<&str> = units.iter().map(|u| u.source.as_str()).collect();
                print!("{}", all.join("\n"));
            }
            (Some(out), [unit]) => write_file(out, &unit.source)?,
            (Some(dir), units) => {
                let extension = match settings.target {
                    TargetLanguage::Rust => "rs",
                    TargetLanguage::CSharp => "cs",
                };
                for unit in units {
                    let file_name = match settings.target {
                        TargetLanguage::Rust => naming::to_snake_case(&unit.root),
                        TargetLanguage::CSharp => unit.root.clone(),
                    };
                    write_file(&dir.join(format!("{file_name}.{extension}")), &unit.source)?;
                }
            }
        }
        Ok(())
    }
}

impl SchemaOut {
    fn run(&self) -> Result<()> {
        let settings = self.generator.resolve()?;
        let samples = self.input_settings.load_samples(self.class.as_deref())?;
        let reserved = settings.target().reserved_type_names();

        let lowered = samples
            .iter()
            .map(|sample| {
                let inferred = inference::infer_root(&sample.value, &settings)?;
                lower(&sample.class, &inferred, reserved)
            })
            .collect::<json_typegen::Result<Vec<Lowered>>>()?;

        let schema_src = match lowered.as_slice() {
            [single] => serde_json::to_string_pretty(single)?,
            many => serde_json::to_string_pretty(many)?,
        };
        match &self.out {
            Some(out) => write_file(out, &schema_src)?,
            None => println!("{schema_src}"),
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "root".to_string())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched = glob::glob(pattern)
                .with_context(|| format!("invalid glob pattern: {pattern}"))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            if matched.is_empty() {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
            matched.sort();
            out.append(&mut matched);
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
