//! Tokenization of NED source text, built on logos.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// One lexed token: its kind, the source slice, and where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Iterator adapter over the generated logos tokenizer that tracks byte
/// offsets and maps unlexable input to ERROR tokens.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// The raw token set logos generates; converted to [`SyntaxKind`] on the
/// way out of the lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    // =========================================================================
    // KEYWORDS (must precede the Ident regex)
    // =========================================================================
    #[token("package")]
    PackageKw,
    #[token("import")]
    ImportKw,
    #[token("simple")]
    SimpleKw,
    #[token("module")]
    ModuleKw,
    #[token("network")]
    NetworkKw,
    #[token("channel")]
    ChannelKw,
    #[token("moduleinterface")]
    ModuleInterfaceKw,
    #[token("channelinterface")]
    ChannelInterfaceKw,
    #[token("extends")]
    ExtendsKw,
    #[token("like")]
    LikeKw,
    #[token("types")]
    TypesKw,
    #[token("parameters")]
    ParametersKw,
    #[token("gates")]
    GatesKw,
    #[token("submodules")]
    SubmodulesKw,
    #[token("connections")]
    ConnectionsKw,
    #[token("allowunconnected")]
    AllowUnconnectedKw,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r"[0-9]*\.[0-9]+([eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+")]
    Number,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION (longest match wins over the single
    // characters below)
    // =========================================================================
    #[token("<-->")]
    ArrowBidir,

    #[token("-->")]
    ArrowRight,

    #[token("<--")]
    ArrowLeft,

    #[token("..")]
    DotDot,

    #[token("==")]
    EqEq,

    #[token("!=")]
    BangEq,

    #[token("<=")]
    LtEq,

    #[token(">=")]
    GtEq,

    #[token("&&")]
    AmpAmp,

    #[token("||")]
    PipePipe,

    #[token("**")]
    StarStar,

    #[token("++")]
    PlusPlus,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("!")]
    Bang,
    #[token("?")]
    Question,
    #[token("@")]
    At,
    #[token("$")]
    Dollar,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Whitespace => SyntaxKind::WHITESPACE,
            LogosToken::LineComment => SyntaxKind::LINE_COMMENT,
            LogosToken::PackageKw => SyntaxKind::PACKAGE_KW,
            LogosToken::ImportKw => SyntaxKind::IMPORT_KW,
            LogosToken::SimpleKw => SyntaxKind::SIMPLE_KW,
            LogosToken::ModuleKw => SyntaxKind::MODULE_KW,
            LogosToken::NetworkKw => SyntaxKind::NETWORK_KW,
            LogosToken::ChannelKw => SyntaxKind::CHANNEL_KW,
            LogosToken::ModuleInterfaceKw => SyntaxKind::MODULE_INTERFACE_KW,
            LogosToken::ChannelInterfaceKw => SyntaxKind::CHANNEL_INTERFACE_KW,
            LogosToken::ExtendsKw => SyntaxKind::EXTENDS_KW,
            LogosToken::LikeKw => SyntaxKind::LIKE_KW,
            LogosToken::TypesKw => SyntaxKind::TYPES_KW,
            LogosToken::ParametersKw => SyntaxKind::PARAMETERS_KW,
            LogosToken::GatesKw => SyntaxKind::GATES_KW,
            LogosToken::SubmodulesKw => SyntaxKind::SUBMODULES_KW,
            LogosToken::ConnectionsKw => SyntaxKind::CONNECTIONS_KW,
            LogosToken::AllowUnconnectedKw => SyntaxKind::ALLOWUNCONNECTED_KW,
            LogosToken::Ident => SyntaxKind::IDENT,
            LogosToken::Integer => SyntaxKind::INTEGER,
            LogosToken::Number => SyntaxKind::NUMBER,
            LogosToken::String => SyntaxKind::STRING,
            LogosToken::ArrowBidir => SyntaxKind::ARROW_BIDIR,
            LogosToken::ArrowRight => SyntaxKind::ARROW_RIGHT,
            LogosToken::ArrowLeft => SyntaxKind::ARROW_LEFT,
            LogosToken::DotDot => SyntaxKind::DOT_DOT,
            LogosToken::EqEq => SyntaxKind::EQ_EQ,
            LogosToken::BangEq => SyntaxKind::BANG_EQ,
            LogosToken::LtEq => SyntaxKind::LT_EQ,
            LogosToken::GtEq => SyntaxKind::GT_EQ,
            LogosToken::AmpAmp => SyntaxKind::AMP_AMP,
            LogosToken::PipePipe => SyntaxKind::PIPE_PIPE,
            LogosToken::StarStar => SyntaxKind::STAR_STAR,
            LogosToken::PlusPlus => SyntaxKind::PLUS_PLUS,
            LogosToken::LBrace => SyntaxKind::L_BRACE,
            LogosToken::RBrace => SyntaxKind::R_BRACE,
            LogosToken::LBracket => SyntaxKind::L_BRACKET,
            LogosToken::RBracket => SyntaxKind::R_BRACKET,
            LogosToken::LParen => SyntaxKind::L_PAREN,
            LogosToken::RParen => SyntaxKind::R_PAREN,
            LogosToken::Semicolon => SyntaxKind::SEMICOLON,
            LogosToken::Colon => SyntaxKind::COLON,
            LogosToken::Comma => SyntaxKind::COMMA,
            LogosToken::Dot => SyntaxKind::DOT,
            LogosToken::Eq => SyntaxKind::EQ,
            LogosToken::Lt => SyntaxKind::LT,
            LogosToken::Gt => SyntaxKind::GT,
            LogosToken::Plus => SyntaxKind::PLUS,
            LogosToken::Minus => SyntaxKind::MINUS,
            LogosToken::Star => SyntaxKind::STAR,
            LogosToken::Slash => SyntaxKind::SLASH,
            LogosToken::Percent => SyntaxKind::PERCENT,
            LogosToken::Caret => SyntaxKind::CARET,
            LogosToken::Bang => SyntaxKind::BANG,
            LogosToken::Question => SyntaxKind::QUESTION,
            LogosToken::At => SyntaxKind::AT,
            LogosToken::Dollar => SyntaxKind::DOLLAR,
        }
    }
}
