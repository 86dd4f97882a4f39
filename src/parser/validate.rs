//! Structural validation of parsed NED files.
//!
//! Runs after parsing and checks the constraints the grammar alone does
//! not enforce. Diagnostics are appended to the caller's list; the loader
//! surfaces the first error through [`super::errors::first_error`].

use super::ast;
use super::errors::{line_at, ParseDiagnostic};
use super::syntax_kind::SyntaxKind;
use super::SyntaxNode;

/// Validate `root`, which must be the syntax root of a parsed file.
/// `source` is used to compute diagnostic line numbers.
pub fn validate(root: &SyntaxNode, source: &str, diagnostics: &mut Vec<ParseDiagnostic>) {
    if root.kind() != SyntaxKind::NED_FILE {
        diagnostics.push(ParseDiagnostic::error("<ned-file> expected as root element", None));
        return;
    }

    check_package_decls(root, source, diagnostics);

    for node in root.descendants() {
        match node.kind() {
            kind if kind.is_type_decl() => check_type_decl(&node, source, diagnostics),
            SyntaxKind::TYPES => check_types_block(&node, source, diagnostics),
            SyntaxKind::IMPORT => {
                if ast::qualified_name_text(&node).unwrap_or_default().is_empty() {
                    diagnostics.push(error_at(&node, source, "import is missing a specification"));
                }
            }
            _ => {}
        }
    }
}

fn check_package_decls(root: &SyntaxNode, source: &str, diagnostics: &mut Vec<ParseDiagnostic>) {
    let mut seen_other_declaration = false;
    let mut seen_package = false;
    for child in root.children() {
        match child.kind() {
            SyntaxKind::PACKAGE_DECL => {
                if seen_package {
                    diagnostics.push(error_at(&child, source, "more than one package declaration"));
                } else if seen_other_declaration {
                    diagnostics.push(error_at(
                        &child,
                        source,
                        "the package declaration must precede all other declarations",
                    ));
                }
                seen_package = true;
            }
            SyntaxKind::ERROR => {}
            _ => seen_other_declaration = true,
        }
    }
}

fn check_type_decl(node: &SyntaxNode, source: &str, diagnostics: &mut Vec<ParseDiagnostic>) {
    let tag = node.kind().tag_name();
    if ast::name_of(node).is_none() {
        diagnostics.push(error_at(node, source, format!("{tag} is missing a name")));
    }

    // modules and channels have single inheritance; interfaces may extend
    // several bases
    let is_interface = matches!(
        node.kind(),
        SyntaxKind::MODULE_INTERFACE | SyntaxKind::CHANNEL_INTERFACE
    );
    if !is_interface {
        let extends_count = node
            .children()
            .filter(|c| c.kind() == SyntaxKind::EXTENDS)
            .count();
        if extends_count > 1 {
            let name = ast::name_of(node).unwrap_or_default();
            diagnostics.push(error_at(
                node,
                source,
                format!("{tag} '{name}' may only extend one type"),
            ));
        }
    }
}

fn check_types_block(node: &SyntaxNode, source: &str, diagnostics: &mut Vec<ParseDiagnostic>) {
    let parent_kind = node.parent().map(|p| p.kind());
    if parent_kind != Some(SyntaxKind::COMPOUND_MODULE) {
        diagnostics.push(error_at(
            node,
            source,
            "a types section is only allowed inside a compound module",
        ));
    }
}

fn error_at(node: &SyntaxNode, source: &str, message: impl Into<String>) -> ParseDiagnostic {
    let offset = u32::from(node.text_range().start()) as usize;
    ParseDiagnostic::error(message, Some(line_at(source, offset)))
}
