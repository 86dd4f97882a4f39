//! Path canonicalization and containment tests.
//!
//! All paths stored by the resource cache are canonical: absolute,
//! `/`-separated, without trailing slashes or `.`/`..` components.
//! Canonicalization is purely lexical; symlinks are not resolved, so a path
//! remains usable even when parts of it do not exist yet.

use std::env;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Canonicalize a path: resolve it against the current directory, collapse
/// redundant separators and `.`/`..` components, and normalize separators
/// to `/`.
pub fn canonicalize(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("/"))
            .join(path)
    };

    let mut parts: Vec<String> = Vec::new();
    for component in absolute.components() {
        match component {
            Component::RootDir | Component::Prefix(_) | Component::CurDir => {}
            Component::ParentDir => {
                parts.pop();
            }
            Component::Normal(name) => parts.push(name.to_string_lossy().into_owned()),
        }
    }

    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}

/// Test whether `prefix` contains `path`: true iff they are equal or `path`
/// begins with `prefix` followed by a `/`. Both arguments must be canonical
/// (so `/tmp/foo` is not reported as a prefix of `/tmp/foolish`).
pub fn is_path_prefix(prefix: &str, path: &str) -> bool {
    if path == prefix {
        return true;
    }
    if prefix.ends_with('/') {
        // only the filesystem root is canonical with a trailing slash
        return path.starts_with(prefix);
    }
    path.len() > prefix.len() && path.starts_with(prefix) && path.as_bytes()[prefix.len()] == b'/'
}

/// Scoped working-directory change.
///
/// Enters `dir` and restores the previous working directory when dropped,
/// on every exit path including propagated errors.
pub struct ScopedDir {
    previous: PathBuf,
}

impl ScopedDir {
    pub fn enter(dir: impl AsRef<Path>) -> io::Result<Self> {
        let previous = env::current_dir()?;
        env::set_current_dir(dir.as_ref())?;
        Ok(Self { previous })
    }
}

impl Drop for ScopedDir {
    fn drop(&mut self) {
        // nothing sensible to do on failure; the directory may be gone
        let _ = env::set_current_dir(&self.previous);
    }
}
