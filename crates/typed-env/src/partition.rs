use crate::types::{Descriptor, Schema};
use crate::validate::ValidatedRecord;

/// Keys with this prefix are exposed to client code.
pub const PUBLIC_PREFIX: &str = "NEXT_PUBLIC_";

/// Always exposed to client code, regardless of prefix.
pub const ALWAYS_PUBLIC_KEY: &str = "NODE_ENV";

/// A single generated export: the variable name and every literal value
/// its type admits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub key: String,
    pub values: Vec<String>,
}

/// Validated keys split by visibility. `client` is a subset of `server`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub client: Vec<Export>,
    pub server: Vec<Export>,
}

/// Whether `key` may be exposed outside the server boundary.
pub fn is_public(key: &str) -> bool {
    key.starts_with(PUBLIC_PREFIX) || key == ALWAYS_PUBLIC_KEY
}

/// Split a validated record into client and server exports.
///
/// Enumerations contribute all declared members rather than the observed
/// value, so the generated type covers every value the variable may take.
/// Both lists follow schema declaration order.
pub fn partition(record: &ValidatedRecord, schema: &Schema) -> Partition {
    let mut out = Partition::default();

    for spec in schema.fields() {
        let Some(value) = record.get(&spec.name) else {
            continue;
        };
        let values = match &spec.descriptor {
            Descriptor::Enumeration(members) => members.clone(),
            Descriptor::Scalar(_) => vec![value.to_string()],
        };
        let export = Export {
            key: spec.name.clone(),
            values,
        };
        if is_public(&export.key) {
            out.client.push(export.clone());
        }
        out.server.push(export);
    }

    out
}
