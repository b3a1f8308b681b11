use crate::env::Environment;
use crate::error::{Issue, ValidationErrors};
use crate::types::{Descriptor, ScalarKind, Schema};
use std::fmt;

/// A value that satisfied its descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    /// A numeric value; `raw` is the text exactly as the environment holds it.
    Number { raw: String, value: f64 },
}

impl Scalar {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number { value, .. } => Some(*value),
            Scalar::String(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => f.write_str(s),
            Scalar::Number { raw, .. } => f.write_str(raw),
        }
    }
}

/// Every schema key mapped to its accepted value, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    entries: Vec<(String, Scalar)>,
}

impl ValidatedRecord {
    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Check every schema key against the environment snapshot.
///
/// Variables not declared in the schema are ignored. All problems are
/// collected before returning; there is no partial record.
pub fn validate(schema: &Schema, env: &Environment) -> Result<ValidatedRecord, ValidationErrors> {
    let mut errs = ValidationErrors::new();
    let mut entries = Vec::with_capacity(schema.len());

    for spec in schema.fields() {
        let Some(raw) = env.get(&spec.name) else {
            if env.is_non_unicode(&spec.name) {
                errs.push(Issue::not_unicode(&spec.name));
            } else {
                errs.push(Issue::missing(&spec.name));
            }
            continue;
        };
        match check_value(&spec.name, &spec.descriptor, raw) {
            Ok(value) => entries.push((spec.name.clone(), value)),
            Err(issue) => errs.push(issue),
        }
    }

    if errs.is_empty() {
        Ok(ValidatedRecord { entries })
    } else {
        Err(errs)
    }
}

fn check_value(key: &str, descriptor: &Descriptor, raw: &str) -> Result<Scalar, Issue> {
    match descriptor {
        Descriptor::Scalar(ScalarKind::String) => Ok(Scalar::String(raw.to_string())),
        Descriptor::Scalar(ScalarKind::Number) => parse_number(raw)
            .map(|value| Scalar::Number {
                raw: raw.to_string(),
                value,
            })
            .ok_or_else(|| Issue::not_a_number(key, raw)),
        Descriptor::Enumeration(members) => {
            if members.iter().any(|m| m == raw) {
                Ok(Scalar::String(raw.to_string()))
            } else {
                Err(Issue::not_in_enumeration(key, raw, members))
            }
        }
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
