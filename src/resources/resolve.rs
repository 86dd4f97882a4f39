//! Name resolution for NED type references.
//!
//! A reference is resolved within a lookup context: the syntax element the
//! reference appears in, and the qualified name of the enclosing type (if
//! any). The set of names visible to the resolver is abstracted behind
//! [`NedTypeNames`], so the registrar can resolve against the
//! already-registered subset while types are still pending.

use indexmap::IndexMap;

use crate::base::pattern::{self, ImportPattern};
use crate::parser::ast::{AstNode, NedFile};
use crate::parser::{SyntaxKind, SyntaxNode};

use super::typeinfo::NedTypeInfo;

/// Where a reference appears: the enclosing syntax element (a compound
/// module body, a file, ...) and the qualified name of the enclosing type,
/// or empty if none.
#[derive(Debug, Clone)]
pub struct LookupContext {
    pub element: SyntaxNode,
    pub qname: String,
}

impl LookupContext {
    pub fn new(element: SyntaxNode, qname: impl Into<String>) -> Self {
        Self {
            element,
            qname: qname.into(),
        }
    }
}

/// The set of qualified names visible to the resolver: membership plus
/// indexed enumeration in registration order.
pub trait NedTypeNames {
    fn contains(&self, qname: &str) -> bool;
    fn len(&self) -> usize;
    fn get(&self, index: usize) -> Option<&str>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// View over the cache's registered-type index.
pub(crate) struct RegisteredTypes<'a>(pub &'a IndexMap<String, NedTypeInfo>);

impl NedTypeNames for RegisteredTypes<'_> {
    fn contains(&self, qname: &str) -> bool {
        self.0.contains_key(qname)
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn get(&self, index: usize) -> Option<&str> {
        self.0.get_index(index).map(|(qname, _)| qname.as_str())
    }
}

impl NedTypeNames for Vec<String> {
    fn contains(&self, qname: &str) -> bool {
        self.iter().any(|name| name == qname)
    }

    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn get(&self, index: usize) -> Option<&str> {
        self.as_slice().get(index).map(String::as_str)
    }
}

/// The lookup context for references in the `extends`/`like` clauses of a
/// type declaration: the parent element (skipping a `types:` container)
/// and the qualified name minus its last segment.
pub fn parent_context_of(qname: &str, node: &SyntaxNode) -> LookupContext {
    let mut element = node.parent().unwrap_or_else(|| node.clone());
    if element.kind() == SyntaxKind::TYPES {
        if let Some(parent) = element.parent() {
            element = parent;
        }
    }
    let parent_qname = match qname.rfind('.') {
        Some(index) => &qname[..index],
        None => "",
    };
    LookupContext::new(element, parent_qname)
}

/// Resolve a NED type reference to a fully qualified name, or `None`.
///
/// A dotted reference must be fully qualified; partially qualified names
/// are not supported. A simple name can be: (a) an inner type of the
/// enclosing compound module, (b) an exactly imported type, (c) a type
/// from the same package, (d) a wildcard-imported type — tried in that
/// order, so exact imports always win over wildcard matches.
pub fn resolve_type(
    context: &LookupContext,
    type_name: &str,
    qnames: &dyn NedTypeNames,
) -> Option<String> {
    if type_name.contains('.') {
        // fully qualified name?
        return qnames.contains(type_name).then(|| type_name.to_string());
    }

    // inner type?
    if context.element.kind() == SyntaxKind::COMPOUND_MODULE {
        let mut enclosing = context.qname.clone();
        let context_is_inner_type = context
            .element
            .parent()
            .is_some_and(|parent| parent.ancestors().any(|a| a.kind() == SyntaxKind::COMPOUND_MODULE));
        if context_is_inner_type {
            // look up the name in the enclosing toplevel type instead
            if let Some(index) = enclosing.rfind('.') {
                enclosing.truncate(index);
            }
        }
        let candidate = format!("{enclosing}.{type_name}");
        if qnames.contains(&candidate) {
            return Some(candidate);
        }
        // inherited inner types are not searched
    }

    let file = context
        .element
        .ancestors()
        .find(|a| a.kind() == SyntaxKind::NED_FILE)
        .and_then(NedFile::cast)?;
    let imports = file.import_specs();
    let dot_name = format!(".{type_name}");

    // exactly imported type?
    for import in &imports {
        if pattern::contains_wildcards(import) {
            continue;
        }
        if qnames.contains(import) && (import == type_name || import.ends_with(&dot_name)) {
            return Some(import.clone());
        }
    }

    // from the same package?
    let package = file.declared_package();
    let candidate = if package.is_empty() {
        type_name.to_string()
    } else {
        format!("{package}.{type_name}")
    };
    if qnames.contains(&candidate) {
        return Some(candidate);
    }

    // try harder, using wildcards
    for import in &imports {
        if !pattern::contains_wildcards(import) {
            continue;
        }
        let import_pattern = ImportPattern::new(import);
        for index in 0..qnames.len() {
            let Some(qname) = qnames.get(index) else {
                continue;
            };
            if (qname == type_name || qname.ends_with(&dot_name)) && import_pattern.matches(qname) {
                return Some(qname.to_string());
            }
        }
    }

    None
}
