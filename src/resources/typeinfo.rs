//! Registered type records.

use crate::parser::ast::AstNode;
use crate::parser::{ast, SyntaxKind, SyntaxNode};

/// The five kinds of NED type declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NedTypeKind {
    SimpleModule,
    CompoundModule,
    Channel,
    ModuleInterface,
    ChannelInterface,
}

impl NedTypeKind {
    pub(crate) fn from_syntax(kind: SyntaxKind) -> Option<Self> {
        Some(match kind {
            SyntaxKind::SIMPLE_MODULE => Self::SimpleModule,
            SyntaxKind::COMPOUND_MODULE => Self::CompoundModule,
            SyntaxKind::CHANNEL => Self::Channel,
            SyntaxKind::MODULE_INTERFACE => Self::ModuleInterface,
            SyntaxKind::CHANNEL_INTERFACE => Self::ChannelInterface,
            _ => return None,
        })
    }

    pub fn is_module(self) -> bool {
        matches!(self, Self::SimpleModule | Self::CompoundModule)
    }

    pub fn is_interface(self) -> bool {
        matches!(self, Self::ModuleInterface | Self::ChannelInterface)
    }

    pub fn tag_name(self) -> &'static str {
        match self {
            Self::SimpleModule => "simple-module",
            Self::CompoundModule => "compound-module",
            Self::Channel => "channel",
            Self::ModuleInterface => "module-interface",
            Self::ChannelInterface => "channel-interface",
        }
    }
}

/// A registered NED type: its qualified name, the syntax node that
/// declares it, and its resolved base types and interfaces.
///
/// Cross-references between types go through qualified names, not through
/// nodes of foreign trees; look the names up in the cache to navigate.
#[derive(Debug, Clone)]
pub struct NedTypeInfo {
    qname: String,
    is_inner: bool,
    kind: NedTypeKind,
    node: SyntaxNode,
    extends_qnames: Vec<String>,
    interface_qnames: Vec<String>,
}

impl NedTypeInfo {
    pub(crate) fn new(
        qname: String,
        is_inner: bool,
        kind: NedTypeKind,
        node: SyntaxNode,
        extends_qnames: Vec<String>,
        interface_qnames: Vec<String>,
    ) -> Self {
        Self {
            qname,
            is_inner,
            kind,
            node,
            extends_qnames,
            interface_qnames,
        }
    }

    /// The fully qualified name.
    pub fn qname(&self) -> &str {
        &self.qname
    }

    /// The simple (unqualified) name.
    pub fn name(&self) -> &str {
        match self.qname.rfind('.') {
            Some(index) => &self.qname[index + 1..],
            None => &self.qname,
        }
    }

    /// The package of the file this type was declared in.
    pub fn package(&self) -> String {
        self.node
            .ancestors()
            .find(|a| a.kind() == SyntaxKind::NED_FILE)
            .and_then(ast::NedFile::cast)
            .map(|file| file.declared_package())
            .unwrap_or_default()
    }

    /// Whether this type was declared inside a compound module's `types:`
    /// block.
    pub fn is_inner(&self) -> bool {
        self.is_inner
    }

    pub fn kind(&self) -> NedTypeKind {
        self.kind
    }

    /// The declaring syntax node.
    pub fn node(&self) -> &SyntaxNode {
        &self.node
    }

    /// Resolved qualified names of the `extends` bases (at most one for
    /// modules and channels).
    pub fn extends_qnames(&self) -> &[String] {
        &self.extends_qnames
    }

    /// The resolved base type, for modules and channels.
    pub fn super_qname(&self) -> Option<&str> {
        (!self.kind.is_interface())
            .then(|| self.extends_qnames.first().map(String::as_str))
            .flatten()
    }

    /// Resolved qualified names of the `like` interfaces.
    pub fn interface_qnames(&self) -> &[String] {
        &self.interface_qnames
    }
}
