//! Error types for the resource cache.

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResourceError>;

/// Errors raised while loading, registering or looking up NED types.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// IO error while reading a source file or walking a folder.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Parse or validation failure; carries the first error of the file,
    /// already formatted with its `file:line` location.
    #[error("{0}")]
    Parse(String),

    /// A file's declared package does not match the package inferred from
    /// its location under the source folder.
    #[error("Declared package '{declared}' does not match expected package '{expected}' in file {file}")]
    PackageMismatch {
        declared: String,
        expected: String,
        file: String,
    },

    /// Two package.ned files declare the same package.
    #[error("More than one package.ned file for package '{package}'{}: '{first}' and '{second}'", default_package_note(.package))]
    DuplicatePackageFile {
        package: String,
        first: String,
        second: String,
    },

    /// A package.ned file arrived after finalization.
    #[error("Cannot load {file}: 'package.ned' files can no longer be loaded at this point")]
    LatePackageFile { file: String },

    /// A qualified name was registered twice.
    #[error("Redeclaration of {tag} {qname}")]
    Redeclaration { tag: &'static str, qname: String },

    /// Types left on the pending list after the registration fixed point.
    #[error("{}", unresolved_message(.names))]
    UnresolvedDependencies { names: Vec<String> },

    /// Wrapper identifying the source folder a load failure happened in.
    #[error("Could not load NED sources from '{folder}': {source}")]
    SourceFolder {
        folder: String,
        #[source]
        source: Box<ResourceError>,
    },

    /// `get` on a qualified name that is not registered.
    #[error("NED declaration '{qname}' not found")]
    MissingDeclaration { qname: String },

    /// API misuse: double finalize, XML text input, nested source folders.
    #[error("{0}")]
    Misuse(String),
}

impl ResourceError {
    pub fn misuse(message: impl Into<String>) -> Self {
        Self::Misuse(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

fn default_package_note(package: &str) -> &'static str {
    if package.is_empty() {
        " (the default package)"
    } else {
        ""
    }
}

fn unresolved_message(names: &[String]) -> String {
    if names.len() == 1 {
        format!(
            "NED type '{}' could not be fully resolved due to a missing base type or interface",
            names[0]
        )
    } else {
        format!(
            "The following NED types could not be fully resolved due to a missing base type or interface: {}",
            names.join(", ")
        )
    }
}
