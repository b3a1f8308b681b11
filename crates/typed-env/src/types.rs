use crate::error::TypedEnvError;
use std::collections::HashSet;

/// Kind of free-form scalar a variable may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Number,
}

/// Constraint declared for one environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    /// Any present value (string), or any value that parses as a finite number.
    Scalar(ScalarKind),
    /// One of a fixed, ordered, non-empty set of literal strings.
    Enumeration(Vec<String>),
}

impl Descriptor {
    pub fn string() -> Self {
        Descriptor::Scalar(ScalarKind::String)
    }

    pub fn number() -> Self {
        Descriptor::Scalar(ScalarKind::Number)
    }

    pub fn enumeration<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Descriptor::Enumeration(members.into_iter().map(Into::into).collect())
    }

    /// Enumeration members, if this is an enumeration.
    pub fn members(&self) -> Option<&[String]> {
        match self {
            Descriptor::Enumeration(members) => Some(members),
            Descriptor::Scalar(_) => None,
        }
    }
}

/// Specification of one schema entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Environment variable name, used verbatim in the generated exports.
    pub name: String,
    /// Constraint the value must satisfy.
    pub descriptor: Descriptor,
    /// Combined doc comments (derived schemas only).
    pub doc: Option<String>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, descriptor: Descriptor) -> Self {
        Self {
            name: name.into(),
            descriptor,
            doc: None,
        }
    }

    pub fn with_doc(mut self, doc: Option<&str>) -> Self {
        self.doc = doc.map(str::to_string);
        self
    }
}

/// An ordered set of environment variable declarations.
///
/// Declaration order is preserved and drives the order of the generated
/// exports. A `Schema` can only be obtained through [`Schema::from_fields`]
/// or [`SchemaBuilder::build`], which reject empty keys, duplicate keys and
/// empty enumerations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn from_fields(fields: Vec<FieldSpec>) -> Result<Self, TypedEnvError> {
        let mut seen = HashSet::new();
        for field in &fields {
            if field.name.is_empty() {
                return Err(TypedEnvError::InvalidSchema(
                    "variable names must not be empty".into(),
                ));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(TypedEnvError::InvalidSchema(format!(
                    "`{}` is declared more than once",
                    field.name
                )));
            }
            if let Descriptor::Enumeration(members) = &field.descriptor {
                if members.is_empty() {
                    return Err(TypedEnvError::InvalidSchema(format!(
                        "`{}` declares an empty enumeration",
                        field.name
                    )));
                }
            }
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Accumulates declarations; checks run once in [`SchemaBuilder::build`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    pub fn string(self, name: impl Into<String>) -> Self {
        self.field(FieldSpec::new(name, Descriptor::string()))
    }

    pub fn number(self, name: impl Into<String>) -> Self {
        self.field(FieldSpec::new(name, Descriptor::number()))
    }

    pub fn enumeration<I, S>(self, name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field(FieldSpec::new(name, Descriptor::enumeration(members)))
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn build(self) -> Result<Schema, TypedEnvError> {
        Schema::from_fields(self.fields)
    }
}

/// Trait that derived schema structs implement via `#[derive(EnvSchema)]`.
pub trait EnvSchema {
    /// Declarations for every field, in struct order.
    fn field_specs() -> Vec<FieldSpec>;

    /// Aggregated documentation for the struct (from `///` comments).
    fn doc() -> Option<&'static str> {
        None
    }

    /// Build the checked schema.
    fn schema() -> Result<Schema, TypedEnvError> {
        Schema::from_fields(Self::field_specs())
    }
}
