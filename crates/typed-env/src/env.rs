use crate::error::TypedEnvError;
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::path::Path;

/// Immutable key/value snapshot of an environment.
///
/// Validation reads from a snapshot rather than the live process
/// environment, so a run sees one consistent view and tests can inject
/// exactly the variables they need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
    non_unicode: BTreeSet<String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process environment.
    pub fn from_process() -> Self {
        Self::from_vars_os(std::env::vars_os())
    }

    /// Build a snapshot from raw OS strings.
    ///
    /// A variable whose value is not valid unicode is kept out of the
    /// snapshot but remembered, so validation reports it as unreadable
    /// rather than missing. Variables with non-unicode names are dropped.
    pub fn from_vars_os<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let mut env = Self::default();
        for (key, value) in vars {
            let key = match key.into_string() {
                Ok(key) => key,
                Err(key) => {
                    tracing::warn!(
                        key = %key.to_string_lossy(),
                        "skipping variable with non-unicode name"
                    );
                    continue;
                }
            };
            match value.into_string() {
                Ok(value) => {
                    env.vars.insert(key, value);
                }
                Err(_) => {
                    tracing::warn!(key = %key, "variable value is not valid unicode");
                    env.non_unicode.insert(key);
                }
            }
        }
        env
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Whether `key` was set to a value that is not valid unicode.
    pub fn is_non_unicode(&self, key: &str) -> bool {
        self.non_unicode.contains(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Returns a copy with `key` set, replacing any previous value.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.non_unicode.remove(&key);
        self.vars.insert(key, value.into());
        self
    }

    /// Merge a dotenv file into the snapshot.
    ///
    /// Variables already present win over the file. A missing file is not
    /// an error; a file that exists but does not parse is.
    pub fn with_dotenv(mut self, path: impl AsRef<Path>) -> Result<Self, TypedEnvError> {
        let path = path.as_ref();
        let iter = match dotenvy::from_path_iter(path) {
            Ok(iter) => iter,
            Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(self);
            }
            Err(dotenvy::Error::Io(e)) => return Err(TypedEnvError::io(path, e)),
            Err(e) => {
                return Err(TypedEnvError::EnvFile {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
        };

        let mut loaded = 0usize;
        for item in iter {
            let (key, value) = item.map_err(|e| TypedEnvError::EnvFile {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            if !self.vars.contains_key(&key) && !self.non_unicode.contains(&key) {
                self.vars.insert(key, value);
                loaded += 1;
            }
        }
        tracing::debug!(path = %path.display(), loaded, "merged env file");
        Ok(self)
    }

    /// Merge the conventional dotenv files found in `dir`, highest priority
    /// first: `.env.<mode>.local`, `.env.local` (skipped in `test` mode),
    /// `.env.<mode>`, `.env`. `mode` is `NODE_ENV`, or `development` when unset.
    pub fn with_dotenv_dir(self, dir: impl AsRef<Path>) -> Result<Self, TypedEnvError> {
        let dir = dir.as_ref();
        let mode = self.get("NODE_ENV").unwrap_or("development").to_string();
        let mut names = vec![format!(".env.{mode}.local")];
        if mode != "test" {
            names.push(".env.local".to_string());
        }
        names.push(format!(".env.{mode}"));
        names.push(".env".to_string());

        names
            .iter()
            .try_fold(self, |env, name| env.with_dotenv(dir.join(name)))
    }
}

impl<K, V> FromIterator<(K, V)> for Environment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            non_unicode: BTreeSet::new(),
        }
    }
}
