//! The kind tags of the NED syntax tree.
//!
//! One flat enum covers both token kinds (identifiers, keywords,
//! punctuation at the leaves) and node kinds (files, type declarations,
//! body sections). The resolver and registrar branch on these tags only,
//! never on concrete node types.

/// All syntax kinds (tokens and nodes) in NED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,   // identifier
    INTEGER, // 42
    NUMBER,  // 3.14, 1e-9
    STRING,  // "host[0]"

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,     // {
    R_BRACE,     // }
    L_BRACKET,   // [
    R_BRACKET,   // ]
    L_PAREN,     // (
    R_PAREN,     // )
    SEMICOLON,   // ;
    COLON,       // :
    COMMA,       // ,
    DOT,         // .
    DOT_DOT,     // ..
    EQ,          // =
    EQ_EQ,       // ==
    BANG_EQ,     // !=
    LT,          // <
    GT,          // >
    LT_EQ,       // <=
    GT_EQ,       // >=
    PLUS,        // +
    MINUS,       // -
    STAR,        // *
    STAR_STAR,   // **
    SLASH,       // /
    PERCENT,     // %
    CARET,       // ^
    AMP_AMP,     // &&
    PIPE_PIPE,   // ||
    BANG,        // !
    QUESTION,    // ?
    AT,          // @
    DOLLAR,      // $
    PLUS_PLUS,   // ++
    ARROW_RIGHT, // -->
    ARROW_LEFT,  // <--
    ARROW_BIDIR, // <-->

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    PACKAGE_KW,
    IMPORT_KW,
    SIMPLE_KW,
    MODULE_KW,
    NETWORK_KW,
    CHANNEL_KW,
    MODULE_INTERFACE_KW,  // moduleinterface
    CHANNEL_INTERFACE_KW, // channelinterface
    EXTENDS_KW,
    LIKE_KW,
    TYPES_KW,
    PARAMETERS_KW,
    GATES_KW,
    SUBMODULES_KW,
    CONNECTIONS_KW,
    ALLOWUNCONNECTED_KW,

    // =========================================================================
    // NODES
    // =========================================================================
    NED_FILE,
    PACKAGE_DECL,
    IMPORT,
    PROPERTY,
    QUALIFIED_NAME,
    NAME,
    SIMPLE_MODULE,
    COMPOUND_MODULE,
    CHANNEL,
    MODULE_INTERFACE,
    CHANNEL_INTERFACE,
    EXTENDS,
    INTERFACE_NAME,
    TYPES,
    PARAMETERS,
    GATES,
    SUBMODULES,
    SUBMODULE,
    CONNECTIONS,
    LIKE_PARAM, // the `<expr>` placeholder of a `like` submodule

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Whitespace and comments: kept in the tree, skipped by the grammar.
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::LINE_COMMENT)
    }

    /// Check if this node kind declares a NED type.
    pub fn is_type_decl(self) -> bool {
        matches!(
            self,
            Self::SIMPLE_MODULE
                | Self::COMPOUND_MODULE
                | Self::CHANNEL
                | Self::MODULE_INTERFACE
                | Self::CHANNEL_INTERFACE
        )
    }

    /// Check if this token kind starts a type declaration.
    pub fn starts_type_decl(self) -> bool {
        matches!(
            self,
            Self::SIMPLE_KW
                | Self::MODULE_KW
                | Self::NETWORK_KW
                | Self::CHANNEL_KW
                | Self::MODULE_INTERFACE_KW
                | Self::CHANNEL_INTERFACE_KW
        )
    }

    /// Check if this token kind introduces a body section.
    pub fn is_section_keyword(self) -> bool {
        matches!(
            self,
            Self::PARAMETERS_KW
                | Self::GATES_KW
                | Self::TYPES_KW
                | Self::SUBMODULES_KW
                | Self::CONNECTIONS_KW
        )
    }

    /// The tag name of a node, as it appears in diagnostics and in the
    /// XML form.
    pub fn tag_name(self) -> &'static str {
        match self {
            Self::SIMPLE_MODULE => "simple-module",
            Self::COMPOUND_MODULE => "compound-module",
            Self::CHANNEL => "channel",
            Self::MODULE_INTERFACE => "module-interface",
            Self::CHANNEL_INTERFACE => "channel-interface",
            Self::NED_FILE => "ned-file",
            Self::PACKAGE_DECL => "package",
            Self::IMPORT => "import",
            Self::EXTENDS => "extends",
            Self::INTERFACE_NAME => "interface-name",
            Self::TYPES => "types",
            _ => "element",
        }
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: the enum is repr(u16), dense from 0, and bounds-checked
        // against __LAST just above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// The rowan language instance tying [`SyntaxKind`] to the tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NedLanguage {}

impl rowan::Language for NedLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Tree type aliases specialized to [`NedLanguage`]
pub type SyntaxNode = rowan::SyntaxNode<NedLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<NedLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<NedLanguage>;
