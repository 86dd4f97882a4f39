//! Filesystem and cache fixtures.

use std::fs;

use ned_resources::NedResourceCache;
use tempfile::TempDir;

/// Create a source tree in a fresh temporary directory from
/// (relative path, contents) pairs.
pub fn source_tree(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    for (path, contents) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&full, contents).expect("write fixture file");
    }
    dir
}

/// The directory's path as the string form the cache APIs take.
pub fn folder(dir: &TempDir) -> String {
    dir.path().to_string_lossy().into_owned()
}

/// Load in-memory sources into a fresh cache, in order.
pub fn cache_with_texts(files: &[(&str, &str)]) -> NedResourceCache {
    let mut cache = NedResourceCache::new();
    for (name, text) in files {
        cache
            .load_text(name, text, None, false)
            .unwrap_or_else(|error| panic!("loading '{name}' failed: {error}"));
    }
    cache
}

/// Load in-memory sources and finalize.
pub fn finalized_cache(files: &[(&str, &str)]) -> NedResourceCache {
    let mut cache = cache_with_texts(files);
    cache.finalize().expect("finalize should succeed");
    cache
}
