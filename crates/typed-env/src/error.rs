use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A structured validation problem for one environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub key: String,
    pub kind: IssueKind,
    pub message: String,
}

/// Why a variable failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    Missing,
    NotUnicode,
    NotANumber,
    NotInEnumeration,
}

impl Issue {
    pub fn missing(key: &str) -> Self {
        Self {
            key: key.to_string(),
            kind: IssueKind::Missing,
            message: "required in schema but missing in environment".into(),
        }
    }

    pub fn not_unicode(key: &str) -> Self {
        Self {
            key: key.to_string(),
            kind: IssueKind::NotUnicode,
            message: "value is not valid unicode".into(),
        }
    }

    pub fn not_a_number(key: &str, raw: &str) -> Self {
        Self {
            key: key.to_string(),
            kind: IssueKind::NotANumber,
            message: format!("expected a number, received `{raw}`"),
        }
    }

    pub fn not_in_enumeration(key: &str, raw: &str, members: &[String]) -> Self {
        let expected = members
            .iter()
            .map(|m| format!("'{m}'"))
            .collect::<Vec<_>>()
            .join(" | ");
        Self {
            key: key.to_string(),
            kind: IssueKind::NotInEnumeration,
            message: format!("expected one of {expected}, received '{raw}'"),
        }
    }
}

/// Aggregated validation errors across every schema key.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    issues: Vec<Issue>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_vec(self) -> Vec<Issue> {
        self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter()
    }

    /// Keys named by at least one issue, in report order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.issues.iter().map(|issue| issue.key.as_str())
    }

    /// Find the first issue reported for `key`.
    pub fn get(&self, key: &str) -> Option<&Issue> {
        self.issues.iter().find(|issue| issue.key == key)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return write!(f, "no validation errors");
        }
        writeln!(f, "environment validation failed:")?;
        for issue in &self.issues {
            writeln!(f, "  - {}: {}", issue.key, issue.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// The top-level error type for validation and code generation.
#[derive(Debug, Error)]
pub enum TypedEnvError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("unable to parse {format} schema {}: {message}", .path.display())]
    ParseSchema {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    #[error("unknown schema extension for {}; use .toml, .yaml, .yml, or .json", .0.display())]
    UnknownSchemaFormat(PathBuf),

    #[error("unable to read env file {}: {message}", .path.display())]
    EnvFile { path: PathBuf, message: String },
}

impl TypedEnvError {
    /// Wrap an I/O failure with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the environment does not satisfy the schema.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// True when the filesystem refused a read or write.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

impl From<ValidationErrors> for TypedEnvError {
    fn from(e: ValidationErrors) -> Self {
        Self::Validation(e)
    }
}
