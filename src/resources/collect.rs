//! Enumerating the types a file declares.

use crate::parser::{ast, SyntaxKind, SyntaxNode};

/// A type that has been collected but not yet registered.
#[derive(Debug, Clone)]
pub(crate) struct PendingType {
    pub qname: String,
    pub is_inner: bool,
    pub node: SyntaxNode,
}

/// Append the types declared under `node` to `pending`, in declaration
/// order. Inner types are exactly those nested under a compound module's
/// `types:` block; recursion only descends into those.
pub(crate) fn collect_types_from(
    node: &SyntaxNode,
    package_prefix: &str,
    are_inner_types: bool,
    pending: &mut Vec<PendingType>,
) {
    for child in node.children() {
        if !child.kind().is_type_decl() {
            continue;
        }
        // unnamed declarations were already reported by the validator
        let Some(name) = ast::name_of(&child) else {
            continue;
        };
        let qname = format!("{package_prefix}{name}");
        pending.push(PendingType {
            qname: qname.clone(),
            is_inner: are_inner_types,
            node: child.clone(),
        });

        if let Some(types) = child
            .children()
            .find(|c| c.kind() == SyntaxKind::TYPES)
        {
            collect_types_from(&types, &format!("{qname}."), true, pending);
        }
    }
}
