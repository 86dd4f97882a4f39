//! Parsing NED sources into syntax trees.
//!
//! Source text is tokenized with logos, then a recursive-descent grammar
//! assembles a rowan green tree. [`SyntaxNode`] handles over that tree
//! carry parent pointers, which is what the resolver needs to walk from a
//! type declaration up to its enclosing module and file. The [`ast`]
//! module layers typed accessors on top.
//!
//! File ASTs can also be read back from their XML serialization; the XML
//! reader produces the same tree shape, so the resource layer never cares
//! which way a file arrived.

pub mod ast;
pub mod errors;
mod grammar;
mod lexer;
mod syntax_kind;
pub mod validate;
pub mod xml;

pub use errors::{first_error, ParseDiagnostic, Severity};
pub use grammar::{parse, Parse};
pub use lexer::{Lexer, Token};
pub use syntax_kind::{NedLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

// rowan primitives that show up in this crate's public signatures
pub use rowan::{GreenNode, TextRange, TextSize};
