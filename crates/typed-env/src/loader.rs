use crate::env::Environment;
use crate::error::TypedEnvError;
use crate::partition::{Partition, partition};
use crate::render::{RenderMode, render};
use crate::types::{Descriptor, FieldSpec, Schema};
use crate::validate::{ValidatedRecord, validate};
use crate::writer::write_outputs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory, relative to the project root, that receives the generated modules.
pub const OUTPUT_DIR: &str = "env";
pub const CLIENT_FILE: &str = "env.client.ts";
pub const SERVER_FILE: &str = "env.server.ts";

/// Where and how the modules are generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub out_dir: PathBuf,
    pub client_file: String,
    pub server_file: String,
    /// `None` reads the strip-literals flag from the environment.
    pub mode: Option<RenderMode>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(OUTPUT_DIR),
            client_file: CLIENT_FILE.to_string(),
            server_file: SERVER_FILE.to_string(),
            mode: None,
        }
    }
}

impl GenerateOptions {
    /// Outputs under `<root>/env`.
    pub fn in_dir(root: impl AsRef<Path>) -> Self {
        Self {
            out_dir: root.as_ref().join(OUTPUT_DIR),
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn client_path(&self) -> PathBuf {
        self.out_dir.join(&self.client_file)
    }

    pub fn server_path(&self) -> PathBuf {
        self.out_dir.join(&self.server_file)
    }
}

/// Rendered output of one run, before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub mode: RenderMode,
    pub partition: Partition,
    pub client: String,
    pub server: String,
}

/// Validate, partition and render without touching the filesystem.
pub fn generate(
    schema: &Schema,
    env: &Environment,
    mode: Option<RenderMode>,
) -> Result<Generated, TypedEnvError> {
    let record = check(schema, env)?;
    let mode = mode.unwrap_or_else(|| RenderMode::from_env(env));
    tracing::debug!(?mode, "selected render mode");

    let partition = partition(&record, schema);
    Ok(Generated {
        mode,
        client: render(&partition.client, mode),
        server: render(&partition.server, mode),
        partition,
    })
}

/// Validate only, logging the outcome.
pub fn check(schema: &Schema, env: &Environment) -> Result<ValidatedRecord, TypedEnvError> {
    tracing::info!(keys = schema.len(), "validating environment against schema");
    match validate(schema, env) {
        Ok(record) => {
            tracing::info!("environment validated");
            Ok(record)
        }
        Err(errs) => {
            tracing::error!(problems = errs.len(), "environment does not match schema");
            Err(TypedEnvError::Validation(errs))
        }
    }
}

/// Validate `env` against `schema` and write the client and server modules.
///
/// Both modules are rendered before either file is written. `config` is
/// handed back untouched so the call can wrap a host configuration value.
pub fn with_typed_env_in<C>(
    config: C,
    schema: &Schema,
    env: &Environment,
    options: &GenerateOptions,
) -> Result<C, TypedEnvError> {
    let generated = generate(schema, env, options.mode)?;

    tracing::info!(out_dir = %options.out_dir.display(), "generating environment files");
    write_outputs(
        &options.out_dir,
        &[
            (options.client_file.as_str(), generated.client.as_str()),
            (options.server_file.as_str(), generated.server.as_str()),
        ],
    )?;
    tracing::info!(
        client = generated.partition.client.len(),
        server = generated.partition.server.len(),
        "environment files generated"
    );
    Ok(config)
}

/// [`with_typed_env_in`] against the live process environment, writing to
/// `./env` under the current working directory.
pub fn with_typed_env<C>(config: C, schema: &Schema) -> Result<C, TypedEnvError> {
    let cwd = std::env::current_dir().map_err(|e| TypedEnvError::io(".", e))?;
    with_typed_env_in(
        config,
        schema,
        &Environment::from_process(),
        &GenerateOptions::in_dir(cwd),
    )
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaFile {
    #[serde(default)]
    vars: Vec<SchemaEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum SchemaEntry {
    String {
        name: String,
        #[serde(default)]
        doc: Option<String>,
    },
    Number {
        name: String,
        #[serde(default)]
        doc: Option<String>,
    },
    #[serde(alias = "enumeration")]
    Enum {
        name: String,
        values: Vec<String>,
        #[serde(default)]
        doc: Option<String>,
    },
}

impl From<SchemaEntry> for FieldSpec {
    fn from(entry: SchemaEntry) -> Self {
        let (name, descriptor, doc) = match entry {
            SchemaEntry::String { name, doc } => (name, Descriptor::string(), doc),
            SchemaEntry::Number { name, doc } => (name, Descriptor::number(), doc),
            SchemaEntry::Enum { name, values, doc } => {
                (name, Descriptor::Enumeration(values), doc)
            }
        };
        FieldSpec::new(name, descriptor).with_doc(doc.as_deref())
    }
}

/// Load a schema from a `.toml`, `.yaml`/`.yml` or `.json` file.
pub fn load_schema(path: impl AsRef<Path>) -> Result<Schema, TypedEnvError> {
    let path = path.as_ref();
    let data = fs::read_to_string(path).map_err(|e| TypedEnvError::io(path, e))?;
    let file = parse_schema_file(path, &data)?;
    Schema::from_fields(file.vars.into_iter().map(FieldSpec::from).collect())
}

fn parse_schema_file(path: &Path, data: &str) -> Result<SchemaFile, TypedEnvError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let parse_err = |format: &'static str, message: String| TypedEnvError::ParseSchema {
        path: path.to_path_buf(),
        format,
        message,
    };
    match ext {
        "toml" => {
            #[cfg(feature = "toml")]
            {
                toml::from_str(data).map_err(|e| parse_err("TOML", e.to_string()))
            }
            #[cfg(not(feature = "toml"))]
            {
                Err(parse_err("TOML", "toml support disabled".into()))
            }
        }
        "yaml" | "yml" => {
            #[cfg(feature = "yaml")]
            {
                serde_yaml::from_str(data).map_err(|e| parse_err("YAML", e.to_string()))
            }
            #[cfg(not(feature = "yaml"))]
            {
                Err(parse_err("YAML", "yaml support disabled".into()))
            }
        }
        "json" => serde_json::from_str(data).map_err(|e| parse_err("JSON", e.to_string())),
        _ => Err(TypedEnvError::UnknownSchemaFormat(path.to_path_buf())),
    }
}
