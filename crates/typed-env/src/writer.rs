use crate::error::TypedEnvError;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

const TEMP_ATTEMPTS: usize = 16;
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Create `dir` and any missing parents.
pub fn ensure_dir(dir: &Path) -> Result<(), TypedEnvError> {
    if dir.is_dir() {
        return Ok(());
    }
    tracing::debug!(dir = %dir.display(), "creating output directory");
    fs::create_dir_all(dir).map_err(|e| TypedEnvError::io(dir, e))
}

/// Overwrite `path` with `text`, creating the parent directory first.
pub fn write_file(path: &Path, text: &str) -> Result<(), TypedEnvError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }
    fs::write(path, text).map_err(|e| TypedEnvError::io(path, e))
}

/// Write several files into `dir` as one step.
///
/// Every file is first written to a temporary sibling; only when all of
/// them are staged are they renamed into place. A staging failure removes
/// the temporaries and leaves existing targets untouched.
pub fn write_outputs(dir: &Path, files: &[(&str, &str)]) -> Result<Vec<PathBuf>, TypedEnvError> {
    ensure_dir(dir)?;

    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(files.len());
    for (name, text) in files {
        let target = dir.join(name);
        match stage(&target, text) {
            Ok(temp) => staged.push((temp, target)),
            Err(err) => {
                discard(&staged);
                return Err(err);
            }
        }
    }

    // Renaming a file over a directory fails; refuse before any target moves.
    if let Some((_, target)) = staged.iter().find(|(_, target)| target.is_dir()) {
        let err = TypedEnvError::io(
            target,
            std::io::Error::other("target is a directory"),
        );
        discard(&staged);
        return Err(err);
    }

    let mut written = Vec::with_capacity(staged.len());
    for (index, (temp, target)) in staged.iter().enumerate() {
        if let Err(err) = persist(temp, target) {
            discard(&staged[index..]);
            return Err(err);
        }
        tracing::debug!(path = %target.display(), "wrote environment file");
        written.push(target.clone());
    }
    Ok(written)
}

fn stage(target: &Path, text: &str) -> Result<PathBuf, TypedEnvError> {
    let (temp, mut file) = create_temp(target)?;
    let result = file
        .write_all(text.as_bytes())
        .and_then(|_| file.sync_all());
    if let Err(e) = result {
        let _ = fs::remove_file(&temp);
        return Err(TypedEnvError::io(target, e));
    }
    Ok(temp)
}

fn create_temp(target: &Path) -> Result<(PathBuf, fs::File), TypedEnvError> {
    let parent = target.parent().unwrap_or_else(|| Path::new("."));
    let file_name = target
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            TypedEnvError::io(
                target,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "output path does not include a file name",
                ),
            )
        })?;
    for _ in 0..TEMP_ATTEMPTS {
        let attempt = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let temp = parent.join(format!(".{file_name}.tmp.{}.{attempt}", std::process::id()));
        match OpenOptions::new().write(true).create_new(true).open(&temp) {
            Ok(file) => return Ok((temp, file)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(TypedEnvError::io(target, e)),
        }
    }
    Err(TypedEnvError::io(
        target,
        std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "failed to allocate temporary output path",
        ),
    ))
}

fn persist(temp: &Path, target: &Path) -> Result<(), TypedEnvError> {
    // rename replaces an existing file atomically on every supported platform.
    fs::rename(temp, target).map_err(|e| TypedEnvError::io(target, e))
}

fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (temp, _) in staged {
        let _ = fs::remove_file(temp);
    }
}
