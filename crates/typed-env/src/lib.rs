//! typed-env – validate environment variables against a schema and generate
//! literal-typed TypeScript modules from them.

pub mod env;
pub mod error;
pub mod loader;
pub mod partition;
pub mod render;
pub mod types;
pub mod util;
pub mod validate;
pub mod writer;

pub use env::Environment;
pub use error::{Issue, IssueKind, TypedEnvError, ValidationErrors};
pub use loader::{
    GenerateOptions, Generated, check, generate, load_schema, with_typed_env, with_typed_env_in,
};
pub use partition::{Export, Partition, is_public, partition};
pub use render::{RenderMode, render};
pub use typed_env_derive::EnvSchema;
pub use types::{Descriptor, EnvSchema, FieldSpec, ScalarKind, Schema, SchemaBuilder};
pub use validate::{Scalar, ValidatedRecord, validate};
