//! Typed views over the NED syntax tree.
//!
//! Each wrapper holds a SyntaxNode and exposes the pieces the resource
//! layer reads back out of it: the declared package, import
//! specifications, type names, `extends`/`like` references and nested
//! `types:` blocks. Everything else in the tree stays untyped.

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};

/// A typed view over a syntax node.
pub trait AstNode {
    fn cast(node: SyntaxNode) -> Option<Self>
    where
        Self: Sized;
    fn syntax(&self) -> &SyntaxNode;
}

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then_some(Self(node))
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

// ============================================================================
// Helper utilities
// ============================================================================

/// Concatenate the non-trivia token texts directly under `node`.
/// This is how dotted names (possibly containing wildcards) are read back
/// out of a QUALIFIED_NAME node.
pub fn token_text(node: &SyntaxNode) -> String {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| !t.kind().is_trivia())
        .map(|t| t.text().to_string())
        .collect()
}

/// The text of the first QUALIFIED_NAME child of `node`.
pub fn qualified_name_text(node: &SyntaxNode) -> Option<String> {
    node.children()
        .find(|c| c.kind() == SyntaxKind::QUALIFIED_NAME)
        .map(|c| token_text(&c))
}

/// The identifier token inside the NAME child of `node`.
pub fn name_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.children()
        .find(|c| c.kind() == SyntaxKind::NAME)?
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == SyntaxKind::IDENT)
}

/// The declared name of a type or submodule node.
pub fn name_of(node: &SyntaxNode) -> Option<String> {
    name_token(node).map(|t| t.text().to_string())
}

/// The nearest strict ancestor of `node` with the given kind.
pub fn ancestor_with_kind(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    node.ancestors().skip(1).find(|a| a.kind() == kind)
}

/// The texts of all EXTENDS children of a type node.
pub fn extends_names_of(node: &SyntaxNode) -> Vec<String> {
    node.children()
        .filter(|c| c.kind() == SyntaxKind::EXTENDS)
        .filter_map(|c| qualified_name_text(&c))
        .collect()
}

/// The texts of all INTERFACE_NAME children of a type node.
pub fn interface_names_of(node: &SyntaxNode) -> Vec<String> {
    node.children()
        .filter(|c| c.kind() == SyntaxKind::INTERFACE_NAME)
        .filter_map(|c| qualified_name_text(&c))
        .collect()
}

// ============================================================================
// File-level nodes
// ============================================================================

ast_node!(NedFile, NED_FILE);
ast_node!(PackageDecl, PACKAGE_DECL);
ast_node!(Import, IMPORT);
ast_node!(Property, PROPERTY);

impl NedFile {
    /// The package declaration, if the file has one.
    pub fn package_decl(&self) -> Option<PackageDecl> {
        self.0.children().find_map(PackageDecl::cast)
    }

    /// The declared package name; empty for the default package.
    pub fn declared_package(&self) -> String {
        self.package_decl()
            .map(|decl| decl.name())
            .unwrap_or_default()
    }

    /// All import declarations, in file order.
    pub fn imports(&self) -> impl Iterator<Item = Import> + '_ {
        self.0.children().filter_map(Import::cast)
    }

    /// All import specifications, in file order.
    pub fn import_specs(&self) -> Vec<String> {
        self.imports().map(|import| import.spec()).collect()
    }

    /// All top-level type declarations.
    pub fn type_decls(&self) -> impl Iterator<Item = NedTypeDef> + '_ {
        self.0.children().filter_map(NedTypeDef::cast)
    }
}

impl PackageDecl {
    /// The declared package name.
    pub fn name(&self) -> String {
        qualified_name_text(&self.0).unwrap_or_default()
    }
}

impl Import {
    /// The import specification, possibly containing wildcards.
    pub fn spec(&self) -> String {
        qualified_name_text(&self.0).unwrap_or_default()
    }
}

// ============================================================================
// Type declarations
// ============================================================================

ast_node!(SimpleModule, SIMPLE_MODULE);
ast_node!(CompoundModule, COMPOUND_MODULE);
ast_node!(Channel, CHANNEL);
ast_node!(ModuleInterface, MODULE_INTERFACE);
ast_node!(ChannelInterface, CHANNEL_INTERFACE);
ast_node!(TypesBlock, TYPES);
ast_node!(Submodule, SUBMODULE);

/// Any of the five NED type declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NedTypeDef {
    SimpleModule(SimpleModule),
    CompoundModule(CompoundModule),
    Channel(Channel),
    ModuleInterface(ModuleInterface),
    ChannelInterface(ChannelInterface),
}

impl AstNode for NedTypeDef {
    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::SIMPLE_MODULE => Some(Self::SimpleModule(SimpleModule(node))),
            SyntaxKind::COMPOUND_MODULE => Some(Self::CompoundModule(CompoundModule(node))),
            SyntaxKind::CHANNEL => Some(Self::Channel(Channel(node))),
            SyntaxKind::MODULE_INTERFACE => Some(Self::ModuleInterface(ModuleInterface(node))),
            SyntaxKind::CHANNEL_INTERFACE => Some(Self::ChannelInterface(ChannelInterface(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::SimpleModule(n) => &n.0,
            Self::CompoundModule(n) => &n.0,
            Self::Channel(n) => &n.0,
            Self::ModuleInterface(n) => &n.0,
            Self::ChannelInterface(n) => &n.0,
        }
    }
}

impl NedTypeDef {
    /// The declared name.
    pub fn name(&self) -> Option<String> {
        name_of(self.syntax())
    }

    /// The names of all `extends` bases, in declaration order.
    pub fn extends_names(&self) -> Vec<String> {
        extends_names_of(self.syntax())
    }

    /// The names of all `like` interfaces, in declaration order.
    pub fn interface_names(&self) -> Vec<String> {
        interface_names_of(self.syntax())
    }
}

impl CompoundModule {
    /// The `types:` block holding inner type declarations.
    pub fn types_block(&self) -> Option<TypesBlock> {
        self.0.children().find_map(TypesBlock::cast)
    }

    /// All submodules, in declaration order.
    pub fn submodules(&self) -> impl Iterator<Item = Submodule> + '_ {
        self.0
            .children()
            .filter(|c| c.kind() == SyntaxKind::SUBMODULES)
            .flat_map(|block| block.children().filter_map(Submodule::cast).collect::<Vec<_>>())
    }
}

impl TypesBlock {
    /// The inner type declarations.
    pub fn type_decls(&self) -> impl Iterator<Item = NedTypeDef> + '_ {
        self.0.children().filter_map(NedTypeDef::cast)
    }
}

impl Submodule {
    /// The submodule name.
    pub fn name(&self) -> Option<String> {
        name_of(&self.0)
    }

    /// The referenced type name, for `sub: Type` submodules.
    pub fn type_name(&self) -> Option<String> {
        qualified_name_text(&self.0)
    }

    /// The referenced interface name, for `sub: <expr> like IFace`
    /// submodules.
    pub fn like_interface(&self) -> Option<String> {
        self.0
            .children()
            .find(|c| c.kind() == SyntaxKind::INTERFACE_NAME)
            .and_then(|c| qualified_name_text(&c))
    }
}
