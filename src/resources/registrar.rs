//! Two-phase type registration.
//!
//! Types are collected onto a pending list first, then promoted into the
//! type index by iterating to a fixed point: every pass registers the
//! entries whose base types and interfaces are already registered, which
//! makes forward references across files work without a precomputed
//! topological order.

use tracing::debug;

use crate::parser::ast::{AstNode, NedFile};
use crate::parser::{ast, SyntaxKind, SyntaxNode};

use super::collect::{collect_types_from, PendingType};
use super::error::{ResourceError, Result};
use super::resolve::{self, RegisteredTypes};
use super::typeinfo::{NedTypeInfo, NedTypeKind};
use super::NedResourceCache;

impl NedResourceCache {
    /// Finish loading: index the package.ned markers, collect the types of
    /// every loaded file, and run registration to its fixed point. May only
    /// be called once; files loaded afterwards are collected and registered
    /// immediately.
    pub fn finalize(&mut self) -> Result<()> {
        if self.finalized {
            return Err(ResourceError::misuse("finalize() may only be called once"));
        }
        self.finalized = true;

        self.files.collect_markers()?;

        // collect types from loaded files, in load order
        for (_, root) in self.files.iter() {
            let declared = NedFile::cast(root.clone())
                .map(|file| file.declared_package())
                .unwrap_or_default();
            let prefix = if declared.is_empty() {
                String::new()
            } else {
                format!("{declared}.")
            };
            collect_types_from(root, &prefix, false, &mut self.pending);
        }

        self.register_pending_types()
    }

    /// Register every pending type whose dependencies resolve; repeat until
    /// a full pass promotes nothing. Fails if entries remain.
    pub(crate) fn register_pending_types(&mut self) -> Result<()> {
        let mut again = true;
        while again {
            again = false;
            let mut index = 0;
            while index < self.pending.len() {
                let entry = self.pending[index].clone();
                if self.are_dependencies_resolved(&entry.qname, &entry.node) {
                    if self.types.contains_key(&entry.qname) {
                        return Err(ResourceError::Redeclaration {
                            tag: entry.node.kind().tag_name(),
                            qname: entry.qname,
                        });
                    }
                    self.register_type(entry);
                    self.pending.remove(index);
                    again = true;
                } else {
                    index += 1;
                }
            }
        }

        if !self.pending.is_empty() {
            let names = self
                .pending
                .iter()
                .map(|entry| entry.qname.clone())
                .collect();
            return Err(ResourceError::UnresolvedDependencies { names });
        }
        Ok(())
    }

    /// Whether every `extends` and `interface-name` reference of `node`
    /// resolves against the already-registered types.
    fn are_dependencies_resolved(&self, qname: &str, node: &SyntaxNode) -> bool {
        let context = resolve::parent_context_of(qname, node);
        let oracle = RegisteredTypes(&self.types);
        for child in node.children() {
            if !matches!(
                child.kind(),
                SyntaxKind::EXTENDS | SyntaxKind::INTERFACE_NAME
            ) {
                continue;
            }
            let name = ast::qualified_name_text(&child).unwrap_or_default();
            if name.is_empty() {
                return false;
            }
            if resolve::resolve_type(&context, &name, &oracle).is_none() {
                return false;
            }
        }
        true
    }

    /// Promote one pending entry into the type index, resolving its base
    /// and interface names (their targets are registered by now). Every
    /// registration invalidates the cached name listing.
    fn register_type(&mut self, entry: PendingType) {
        let Some(kind) = NedTypeKind::from_syntax(entry.node.kind()) else {
            return;
        };

        let context = resolve::parent_context_of(&entry.qname, &entry.node);
        let mut extends_qnames = Vec::new();
        let mut interface_qnames = Vec::new();
        {
            let oracle = RegisteredTypes(&self.types);
            for child in entry.node.children() {
                let target = match child.kind() {
                    SyntaxKind::EXTENDS => &mut extends_qnames,
                    SyntaxKind::INTERFACE_NAME => &mut interface_qnames,
                    _ => continue,
                };
                if let Some(name) = ast::qualified_name_text(&child) {
                    if let Some(resolved) = resolve::resolve_type(&context, &name, &oracle) {
                        target.push(resolved);
                    }
                }
            }
        }

        debug!(qname = %entry.qname, kind = kind.tag_name(), "registered NED type");
        self.types.insert(
            entry.qname.clone(),
            NedTypeInfo::new(
                entry.qname,
                entry.is_inner,
                kind,
                entry.node,
                extends_qnames,
                interface_qnames,
            ),
        );
        self.type_names.borrow_mut().clear(); // invalidate
    }
}
