//! The NED resource cache: loaded source files and the types they
//! declare, indexed by fully qualified name.
//!
//! The expected call sequence is:
//!
//! 1. [`NedResourceCache::register_builtins`] (optional)
//! 2. [`NedResourceCache::load_source_folder`] / `load_file` / `load_text`,
//!    any number of times
//! 3. [`NedResourceCache::finalize`], exactly once - collects the declared
//!    types and registers them to a fixed point, resolving forward
//!    references
//! 4. lookups and resolver queries; further loads register incrementally
//!
//! The cache is an instance with no global state; an application may hold
//! several independent caches. All operations are single-threaded: once
//! `finalize` has returned and no further loads occur, read-only queries
//! may be shared freely.

mod collect;
mod error;
mod loader;
mod registrar;
mod registry;
mod resolve;
mod typeinfo;

use std::cell::{Ref, RefCell};

use indexmap::IndexMap;

use crate::base::paths;
use crate::parser::SyntaxNode;

use collect::PendingType;
use registry::FileRegistry;
use resolve::RegisteredTypes;

pub use error::{ResourceError, Result};
pub use resolve::{parent_context_of, resolve_type, LookupContext, NedTypeNames};
pub use typeinfo::{NedTypeInfo, NedTypeKind};

/// Resource cache and type resolver for NED sources.
pub struct NedResourceCache {
    pub(crate) files: FileRegistry,
    pub(crate) types: IndexMap<String, NedTypeInfo>,
    pub(crate) pending: Vec<PendingType>,
    /// Canonical source folder → its root package.
    pub(crate) folder_packages: IndexMap<String, String>,
    pub(crate) finalized: bool,
    /// Lazily rebuilt listing of registered names; emptied on every
    /// registration.
    pub(crate) type_names: RefCell<Vec<String>>,
}

impl NedResourceCache {
    pub fn new() -> Self {
        Self {
            files: FileRegistry::default(),
            types: IndexMap::new(),
            pending: Vec::new(),
            folder_packages: IndexMap::new(),
            finalized: false,
            type_names: RefCell::new(Vec::new()),
        }
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Look up a registered type by fully qualified name.
    pub fn lookup(&self, qname: &str) -> Option<&NedTypeInfo> {
        self.types.get(qname)
    }

    /// Like [`lookup`](Self::lookup), but missing declarations are an
    /// error.
    pub fn get(&self, qname: &str) -> Result<&NedTypeInfo> {
        self.lookup(qname).ok_or_else(|| ResourceError::MissingDeclaration {
            qname: qname.to_string(),
        })
    }

    /// All registered qualified names, in registration order. The listing
    /// is cached and rebuilt after registrations.
    pub fn type_names(&self) -> Ref<'_, Vec<String>> {
        {
            let mut cache = self.type_names.borrow_mut();
            if cache.is_empty() && !self.types.is_empty() {
                *cache = self.types.keys().cloned().collect();
            }
        }
        self.type_names.borrow()
    }

    /// Number of registered types.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Resolve a type reference within a lookup context against the
    /// registered types.
    pub fn resolve_type(&self, context: &LookupContext, name: &str) -> Option<String> {
        resolve::resolve_type(context, name, &RegisteredTypes(&self.types))
    }

    // =========================================================================
    // Files and folders
    // =========================================================================

    /// The syntax root of a loaded file, by its canonical filename (or
    /// virtual name, for text loads).
    pub fn file(&self, name: &str) -> Option<&SyntaxNode> {
        self.files.get(name)
    }

    /// Number of loaded files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// The package.ned marker of `package`, if one was loaded. Available
    /// after [`finalize`](Self::finalize).
    pub fn package_ned_file(&self, package: &str) -> Option<&SyntaxNode> {
        self.files.marker_for(package)
    }

    /// The package.ned markers of `package` and all its parent packages,
    /// innermost first. File-level properties such as `@namespace` are
    /// inherited along this chain.
    pub fn package_ned_chain(&self, package: &str) -> Vec<SyntaxNode> {
        self.files.marker_chain(package)
    }

    /// The registered source folder containing `folder`, or `None`.
    /// Unambiguous because source folders are never nested.
    pub fn source_folder_for(&self, folder: &str) -> Option<&str> {
        let canonical = paths::canonicalize(folder);
        self.folder_packages
            .keys()
            .find(|source| paths::is_path_prefix(source, &canonical))
            .map(String::as_str)
    }

    /// The package a folder corresponds to: the source folder's root
    /// package joined with the relative sub-path.
    pub fn package_for_folder(&self, folder: &str) -> Option<String> {
        let canonical = paths::canonicalize(folder);
        let source = self
            .folder_packages
            .keys()
            .find(|source| paths::is_path_prefix(source, &canonical))?;
        let root_package = &self.folder_packages[source];
        let suffix = canonical[source.len()..].trim_start_matches('/');
        Some(join_package(root_package, &suffix.replace('/', ".")))
    }
}

impl Default for NedResourceCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Join two package names with a dot, skipping empty parts.
pub(crate) fn join_package(left: &str, right: &str) -> String {
    match (left.is_empty(), right.is_empty()) {
        (true, _) => right.to_string(),
        (_, true) => left.to_string(),
        _ => format!("{left}.{right}"),
    }
}
