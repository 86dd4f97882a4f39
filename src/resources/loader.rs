//! Loading NED sources: folder walks, single files, in-memory text, and
//! the built-in declarations.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::base::paths::{self, ScopedDir};
use crate::parser::ast::{AstNode, NedFile};
use crate::parser::{self, first_error, validate, xml, SyntaxKind, SyntaxNode};

use super::collect::collect_types_from;
use super::error::{ResourceError, Result};
use super::registry::is_package_file;
use super::{join_package, NedResourceCache};

/// NED source defining the built-in types. Loaded by
/// [`NedResourceCache::register_builtins`] under a synthetic package.ned
/// path, so the `@namespace` property applies to the whole `ned` package.
const BUILTIN_DECLARATIONS_PATH: &str = "/[built-in-declarations]/package.ned";

const BUILTIN_DECLARATIONS: &str = r#"
package ned;

@namespace("omnetpp");

channel IdealChannel
{
    @class(cIdealChannel);
}

channel DelayChannel
{
    @class(cDelayChannel);
    @signal[messageSent](type=omnetpp::cMessage);
    @signal[messageDiscarded](type=omnetpp::cMessage);
    bool disabled = default(false);
    double delay = default(0s) @unit(s);
}

channel DatarateChannel
{
    @class(cDatarateChannel);
    @signal[messageSent](type=omnetpp::cMessage);
    @signal[messageDiscarded](type=omnetpp::cMessage);
    bool disabled = default(false);
    double delay = default(0s) @unit(s);
    double datarate = default(0bps) @unit(bps);
    double ber = default(0);
    double per = default(0);
}

moduleinterface IBidirectionalChannel
{
    gates:
        inout a;
        inout b;
}

moduleinterface IUnidirectionalChannel
{
    gates:
        input i;
        output o;
}
"#;

impl NedResourceCache {
    /// Parse the built-in type declarations (the `ned` package) into the
    /// cache, as if they came from a synthetic package.ned file.
    pub fn register_builtins(&mut self) -> Result<()> {
        self.do_load_file_or_text(
            BUILTIN_DECLARATIONS_PATH,
            Some(BUILTIN_DECLARATIONS),
            None,
            false,
        )
    }

    /// Load every `.ned` file under `folder`, checking that each file's
    /// declared package matches its location. `excluded_packages` is a
    /// `;`-separated list of packages whose subtrees are skipped; the root
    /// package cannot be excluded. Returns the number of files loaded.
    pub fn load_source_folder(
        &mut self,
        folder: &str,
        excluded_packages: Option<&str>,
    ) -> Result<usize> {
        let excluded: Vec<String> = excluded_packages
            .unwrap_or_default()
            .split(';')
            .map(str::trim)
            .filter(|package| !package.is_empty())
            .map(String::from)
            .collect();

        self.try_load_source_folder(folder, &excluded)
            .map_err(|source| ResourceError::SourceFolder {
                folder: folder.to_string(),
                source: Box::new(source),
            })
    }

    fn try_load_source_folder(&mut self, folder: &str, excluded: &[String]) -> Result<usize> {
        let canonical = paths::canonicalize(folder);

        // nested source folders are not allowed; reloading the same folder is
        for existing in self.folder_packages.keys() {
            if existing != &canonical
                && (paths::is_path_prefix(existing, &canonical)
                    || paths::is_path_prefix(&canonical, existing))
            {
                return Err(ResourceError::misuse(format!(
                    "source folder '{canonical}' is nested with already loaded folder '{existing}'"
                )));
            }
        }

        let root_package = self.determine_root_package(&canonical)?;
        debug!(folder = %canonical, package = %root_package, "loading NED source folder");
        self.folder_packages
            .insert(canonical.clone(), root_package.clone());
        self.do_load_source_folder(&canonical, &root_package, excluded)
    }

    fn do_load_source_folder(
        &mut self,
        folder: &str,
        expected_package: &str,
        excluded: &[String],
    ) -> Result<usize> {
        // the root package "" cannot be excluded
        if !expected_package.is_empty() && excluded.iter().any(|p| p == expected_package) {
            return Ok(0);
        }

        let mut entries: Vec<fs::DirEntry> =
            fs::read_dir(folder)?.collect::<std::io::Result<Vec<_>>>()?;
        entries.sort_by_key(|entry| entry.file_name());

        let mut count = 0;
        for entry in entries {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue; // ignore dotfiles
            }
            let path = format!("{folder}/{name}");
            if entry.file_type()?.is_dir() {
                let child_package = join_package(expected_package, &name);
                count += self.do_load_source_folder(&path, &child_package, excluded)?;
            } else if name.ends_with(".ned") {
                self.do_load_file_or_text(&path, None, Some(expected_package), false)?;
                count += 1;
            }
        }
        Ok(count)
    }

    /// The root package of a source folder: the package declared by its
    /// package.ned, or empty if there is none.
    fn determine_root_package(&self, canonical_folder: &str) -> Result<String> {
        let marker = format!("{canonical_folder}/package.ned");
        if !Path::new(&marker).exists() {
            return Ok(String::new());
        }
        let root = self.parse_and_validate(&marker, None, false)?;
        Ok(NedFile::cast(root)
            .map(|file| file.declared_package())
            .unwrap_or_default())
    }

    /// Load a single file. When `expected_package` is given, the file's
    /// declared package must match it exactly.
    pub fn load_file(
        &mut self,
        path: &str,
        expected_package: Option<&str>,
        is_xml: bool,
    ) -> Result<()> {
        self.do_load_file_or_text(path, None, expected_package, is_xml)
    }

    /// Load NED source from memory under a virtual file name. XML input is
    /// only supported from files.
    pub fn load_text(
        &mut self,
        name: &str,
        text: &str,
        expected_package: Option<&str>,
        is_xml: bool,
    ) -> Result<()> {
        self.do_load_file_or_text(name, Some(text), expected_package, is_xml)
    }

    pub(crate) fn do_load_file_or_text(
        &mut self,
        name: &str,
        text: Option<&str>,
        expected_package: Option<&str>,
        is_xml: bool,
    ) -> Result<()> {
        // in-memory sources keep their virtual name as the key
        let canonical = if text.is_some() {
            name.to_string()
        } else {
            paths::canonicalize(name)
        };
        if self.files.contains(&canonical) {
            return Ok(()); // already loaded
        }

        // package.ned carries properties that affect the whole package, so
        // new packages cannot be introduced once finalize has run
        if self.finalized && is_package_file(&canonical) {
            return Err(ResourceError::LatePackageFile { file: canonical });
        }

        let root = self.parse_and_validate(&canonical, text, is_xml)?;

        let declared = NedFile::cast(root.clone())
            .map(|file| file.declared_package())
            .unwrap_or_default();
        if let Some(expected) = expected_package {
            if declared != expected {
                return Err(ResourceError::PackageMismatch {
                    declared,
                    expected: expected.to_string(),
                    file: name.to_string(),
                });
            }
        }

        debug!(file = %canonical, package = %declared, "loaded NED file");
        self.files.add(canonical, root.clone());

        // after finalize, resolution can no longer be deferred
        if self.finalized {
            let prefix = if declared.is_empty() {
                String::new()
            } else {
                format!("{declared}.")
            };
            collect_types_from(&root, &prefix, false, &mut self.pending);
            self.register_pending_types()?;
        }
        Ok(())
    }

    /// Parse and validate one file or text. Returns the syntax root, or
    /// the first error-severity diagnostic formatted with its location.
    fn parse_and_validate(
        &self,
        fname: &str,
        text: Option<&str>,
        is_xml: bool,
    ) -> Result<SyntaxNode> {
        let source = match (text, is_xml) {
            (Some(_), true) => {
                return Err(ResourceError::misuse(
                    "Parsing XML from a string is not supported",
                ));
            }
            (Some(text), false) => text.to_string(),
            (None, _) => fs::read_to_string(fname)
                .map_err(|error| ResourceError::parse(format!("Cannot read file '{fname}': {error}")))?,
        };

        let parse = if is_xml {
            xml::parse_text(&source)
        } else {
            parser::parse(&source)
        };
        let mut diagnostics = parse.diagnostics.clone();
        if let Some(message) = first_error(&diagnostics, fname) {
            return Err(ResourceError::Parse(message));
        }

        let root = parse.syntax();
        if root.kind() != SyntaxKind::NED_FILE {
            return Err(ResourceError::parse(format!(
                "<ned-file> expected as root element, in file {fname}"
            )));
        }

        validate::validate(&root, &source, &mut diagnostics);
        if let Some(message) = first_error(&diagnostics, fname) {
            return Err(ResourceError::Parse(message));
        }
        Ok(root)
    }

    /// Resolve a platform-separated path list against `folder`: entries
    /// are canonicalized relative to it, deduplicated, and kept only when
    /// they exist. Relative entries resolve through a scoped
    /// working-directory change that is undone on every exit path.
    pub fn resolve_source_directories(
        &self,
        folder: &str,
        path_list: &str,
    ) -> Result<Vec<String>> {
        let separator = if cfg!(windows) { ';' } else { ':' };
        let _guard = ScopedDir::enter(folder)?;

        let mut result = Vec::new();
        for item in path_list.split(separator) {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            let canonical = paths::canonicalize(item);
            if Path::new(&canonical).exists() && !result.contains(&canonical) {
                result.push(canonical);
            }
        }
        Ok(result)
    }
}
