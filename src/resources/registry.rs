//! The file index: parsed file ASTs keyed by canonical filename, plus the
//! package.ned marker index built during finalization.

use indexmap::IndexMap;

use crate::parser::ast::{AstNode, NedFile};
use crate::parser::SyntaxNode;

use super::error::{ResourceError, Result};

/// A package.ned marker: the file it came from and its syntax root.
#[derive(Debug, Clone)]
pub(crate) struct MarkerEntry {
    pub filename: String,
    pub root: SyntaxNode,
}

/// Holds the syntax roots of all loaded files. Iteration order is load
/// order, which keeps type collection (and therefore registration)
/// deterministic.
#[derive(Debug, Default)]
pub(crate) struct FileRegistry {
    files: IndexMap<String, SyntaxNode>,
    markers: IndexMap<String, MarkerEntry>,
}

/// Whether a canonical filename names a package.ned marker file.
pub(crate) fn is_package_file(filename: &str) -> bool {
    filename == "package.ned" || filename.ends_with("/package.ned")
}

impl FileRegistry {
    pub fn contains(&self, filename: &str) -> bool {
        self.files.contains_key(filename)
    }

    /// Store a file's syntax root. The filename must not be present yet;
    /// callers check and treat re-loads as no-ops.
    pub fn add(&mut self, filename: String, root: SyntaxNode) {
        debug_assert!(!self.files.contains_key(&filename));
        self.files.insert(filename, root);
    }

    pub fn get(&self, filename: &str) -> Option<&SyntaxNode> {
        self.files.get(filename)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SyntaxNode)> {
        self.files.iter().map(|(name, root)| (name.as_str(), root))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Build the package → package.ned index. More than one marker per
    /// package is an error.
    pub fn collect_markers(&mut self) -> Result<()> {
        for (filename, root) in &self.files {
            if !is_package_file(filename) {
                continue;
            }
            let package = NedFile::cast(root.clone())
                .map(|file| file.declared_package())
                .unwrap_or_default();
            if let Some(existing) = self.markers.get(&package) {
                return Err(ResourceError::DuplicatePackageFile {
                    package,
                    first: existing.filename.clone(),
                    second: filename.clone(),
                });
            }
            self.markers.insert(
                package,
                MarkerEntry {
                    filename: filename.clone(),
                    root: root.clone(),
                },
            );
        }
        Ok(())
    }

    /// The package.ned marker for `package`, if one was loaded.
    pub fn marker_for(&self, package: &str) -> Option<&SyntaxNode> {
        self.markers.get(package).map(|entry| &entry.root)
    }

    /// The markers for `package`, its parent package, and so on down to
    /// the root package. Used to inherit file-level properties such as
    /// `@namespace`.
    pub fn marker_chain(&self, package: &str) -> Vec<SyntaxNode> {
        let mut result = Vec::new();
        let mut current = package;
        loop {
            if let Some(entry) = self.markers.get(current) {
                result.push(entry.root.clone());
            }
            if current.is_empty() {
                break;
            }
            current = match current.rfind('.') {
                Some(index) => &current[..index],
                None => "",
            };
        }
        result
    }
}
