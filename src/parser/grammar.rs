//! Recursive descent grammar for NED.
//!
//! Consumes the token stream into a rowan green tree without dropping
//! anything: trivia lands inside the nearest enclosing node. Only the
//! declaration structure the resource layer consumes is parsed in depth;
//! the contents of `parameters:`, `gates:` and `connections:` sections
//! are kept as flat token runs.

use super::errors::{line_at, ParseDiagnostic};
use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{GreenNode, GreenNodeBuilder};

/// What a parse produces: the green tree plus everything the parser (or
/// a later validation pass) had to complain about.
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl Parse {
    /// Materialize the root syntax node over the green tree.
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// True when no error-severity diagnostic was recorded.
    pub fn ok(&self) -> bool {
        !self.diagnostics.iter().any(|d| d.severity.is_error())
    }
}

/// Parse NED source text into a syntax tree.
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens, input);
    ned_file(&mut parser);
    parser.finish()
}

/// Cursor over the token list plus the tree builder and diagnostics.
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    diagnostics: Vec<ParseDiagnostic>,
    source: &'a str,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>], source: &'a str) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            diagnostics: Vec::new(),
            source,
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            diagnostics: self.diagnostics,
        }
    }

    // =========================================================================
    // Looking at tokens
    // =========================================================================

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> Option<SyntaxKind> {
        self.current().map(|t| t.kind)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current_kind() == Some(kind)
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        self.current_kind().is_some_and(|k| kinds.contains(&k))
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    // =========================================================================
    // Consuming tokens
    // =========================================================================

    fn bump(&mut self) {
        if let Some(token) = self.current() {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!(
                "expected {}, found {}",
                token_name(kind),
                self.found_name()
            ));
            false
        }
    }

    fn skip_trivia(&mut self) {
        while self.current().is_some_and(|t| t.kind.is_trivia()) {
            self.bump();
        }
    }

    // =========================================================================
    // Diagnostics and recovery
    // =========================================================================

    fn current_line(&self) -> u32 {
        let offset = self
            .current()
            .map(|t| u32::from(t.offset) as usize)
            .unwrap_or(self.source.len());
        line_at(self.source, offset)
    }

    fn found_name(&self) -> String {
        match self.current() {
            None => "end of file".to_string(),
            Some(t) => format!("'{}'", t.text),
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        let line = self.current_line();
        self.diagnostics
            .push(ParseDiagnostic::error(message, Some(line)));
    }

    /// Report an error, then skip forward to a token in `recovery`,
    /// wrapping the skipped tokens in an ERROR node.
    fn error_recover(&mut self, message: impl Into<String>, recovery: &[SyntaxKind]) {
        self.error(message);
        self.builder.start_node(SyntaxKind::ERROR.into());
        // never leave the position unchanged, or the file loop would spin
        if !self.at_eof() {
            self.bump();
        }
        while !self.at_eof() && !self.at_any(recovery) {
            self.bump();
        }
        self.builder.finish_node();
    }

    // =========================================================================
    // Tree building
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    /// Consume a balanced `open`…`close` token run, including both
    /// delimiters, into the current node.
    fn consume_balanced(&mut self, open: SyntaxKind, close: SyntaxKind) {
        debug_assert!(self.at(open));
        let mut depth = 0usize;
        while let Some(kind) = self.current_kind() {
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth -= 1;
                if depth == 0 {
                    self.bump();
                    break;
                }
            }
            self.bump();
        }
    }

    /// Consume tokens until a section keyword or `}` at brace depth zero.
    fn consume_until_section_end(&mut self) {
        let mut depth = 0usize;
        while let Some(kind) = self.current_kind() {
            if depth == 0 && (kind.is_section_keyword() || kind == SyntaxKind::R_BRACE) {
                break;
            }
            match kind {
                SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_BRACE => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.bump();
        }
    }
}

/// Human-readable token name for error messages.
fn token_name(kind: SyntaxKind) -> &'static str {
    match kind {
        SyntaxKind::IDENT => "identifier",
        SyntaxKind::SEMICOLON => "';'",
        SyntaxKind::COLON => "':'",
        SyntaxKind::L_BRACE => "'{'",
        SyntaxKind::R_BRACE => "'}'",
        SyntaxKind::GT => "'>'",
        _ => "token",
    }
}

const TOP_LEVEL_RECOVERY: &[SyntaxKind] = &[
    SyntaxKind::PACKAGE_KW,
    SyntaxKind::IMPORT_KW,
    SyntaxKind::AT,
    SyntaxKind::SIMPLE_KW,
    SyntaxKind::MODULE_KW,
    SyntaxKind::NETWORK_KW,
    SyntaxKind::CHANNEL_KW,
    SyntaxKind::MODULE_INTERFACE_KW,
    SyntaxKind::CHANNEL_INTERFACE_KW,
];

// =============================================================================
// Grammar productions
// =============================================================================

fn ned_file(p: &mut Parser) {
    p.start_node(SyntaxKind::NED_FILE);
    p.skip_trivia();
    while !p.at_eof() {
        match p.current_kind() {
            Some(SyntaxKind::PACKAGE_KW) => package_decl(p),
            Some(SyntaxKind::IMPORT_KW) => import_decl(p),
            Some(SyntaxKind::AT) => property_decl(p),
            Some(kind) if kind.starts_type_decl() => type_decl(p),
            _ => {
                let found = p.found_name();
                p.error_recover(
                    format!("syntax error, unexpected {found}"),
                    TOP_LEVEL_RECOVERY,
                );
            }
        }
        p.skip_trivia();
    }
    p.finish_node();
}

fn package_decl(p: &mut Parser) {
    p.start_node(SyntaxKind::PACKAGE_DECL);
    p.bump(); // 'package'
    p.skip_trivia();
    qualified_name(p, false);
    p.skip_trivia();
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

fn import_decl(p: &mut Parser) {
    p.start_node(SyntaxKind::IMPORT);
    p.bump(); // 'import'
    p.skip_trivia();
    qualified_name(p, true);
    p.skip_trivia();
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

/// A dotted name. With `allow_wildcards`, `*`, `**` and `?` may appear in
/// segments (import specifications).
fn qualified_name(p: &mut Parser, allow_wildcards: bool) {
    const PLAIN: &[SyntaxKind] = &[SyntaxKind::IDENT, SyntaxKind::DOT];
    const WILD: &[SyntaxKind] = &[
        SyntaxKind::IDENT,
        SyntaxKind::DOT,
        SyntaxKind::STAR,
        SyntaxKind::STAR_STAR,
        SyntaxKind::QUESTION,
    ];
    let accepted = if allow_wildcards { WILD } else { PLAIN };

    p.start_node(SyntaxKind::QUALIFIED_NAME);
    if !p.at_any(accepted) {
        p.error(format!("expected name, found {}", p.found_name()));
    }
    while p.at_any(accepted) {
        p.bump();
    }
    p.finish_node();
}

/// A file-level or parameter property: `@name`, `@name(args);`,
/// `@name[index](args);`.
fn property_decl(p: &mut Parser) {
    p.start_node(SyntaxKind::PROPERTY);
    p.bump(); // '@'
    if p.at(SyntaxKind::IDENT) {
        p.bump();
    } else {
        p.error(format!("expected property name, found {}", p.found_name()));
    }
    p.skip_trivia();
    if p.at(SyntaxKind::L_BRACKET) {
        p.consume_balanced(SyntaxKind::L_BRACKET, SyntaxKind::R_BRACKET);
        p.skip_trivia();
    }
    if p.at(SyntaxKind::L_PAREN) {
        p.consume_balanced(SyntaxKind::L_PAREN, SyntaxKind::R_PAREN);
        p.skip_trivia();
    }
    p.eat(SyntaxKind::SEMICOLON);
    p.finish_node();
}

fn type_decl(p: &mut Parser) {
    let (keyword, node) = match p.current_kind() {
        Some(SyntaxKind::SIMPLE_KW) => (SyntaxKind::SIMPLE_KW, SyntaxKind::SIMPLE_MODULE),
        Some(SyntaxKind::MODULE_KW) => (SyntaxKind::MODULE_KW, SyntaxKind::COMPOUND_MODULE),
        Some(SyntaxKind::NETWORK_KW) => (SyntaxKind::NETWORK_KW, SyntaxKind::COMPOUND_MODULE),
        Some(SyntaxKind::CHANNEL_KW) => (SyntaxKind::CHANNEL_KW, SyntaxKind::CHANNEL),
        Some(SyntaxKind::MODULE_INTERFACE_KW) => {
            (SyntaxKind::MODULE_INTERFACE_KW, SyntaxKind::MODULE_INTERFACE)
        }
        _ => (
            SyntaxKind::CHANNEL_INTERFACE_KW,
            SyntaxKind::CHANNEL_INTERFACE,
        ),
    };
    // interfaces may extend several bases, modules and channels only one
    let multiple_extends = matches!(
        node,
        SyntaxKind::MODULE_INTERFACE | SyntaxKind::CHANNEL_INTERFACE
    );

    p.start_node(node);
    debug_assert!(p.at(keyword));
    p.bump();
    p.skip_trivia();

    p.start_node(SyntaxKind::NAME);
    p.expect(SyntaxKind::IDENT);
    p.finish_node();
    p.skip_trivia();

    if p.at(SyntaxKind::EXTENDS_KW) {
        extends_clause(p, multiple_extends);
        p.skip_trivia();
    }
    if p.at(SyntaxKind::LIKE_KW) {
        like_clause(p);
        p.skip_trivia();
    }

    if p.at(SyntaxKind::L_BRACE) {
        type_body(p);
    } else {
        p.expect(SyntaxKind::SEMICOLON);
    }
    p.finish_node();
}

/// `extends A` or, for interfaces, `extends A, B, C`. Each base gets its
/// own EXTENDS node.
fn extends_clause(p: &mut Parser, multiple: bool) {
    p.bump(); // 'extends'
    loop {
        p.skip_trivia();
        p.start_node(SyntaxKind::EXTENDS);
        qualified_name(p, false);
        p.finish_node();
        p.skip_trivia();
        if multiple && p.at(SyntaxKind::COMMA) {
            p.bump();
        } else {
            break;
        }
    }
}

/// `like IFoo, IBar`. Each interface gets its own INTERFACE_NAME node.
fn like_clause(p: &mut Parser) {
    p.bump(); // 'like'
    loop {
        p.skip_trivia();
        p.start_node(SyntaxKind::INTERFACE_NAME);
        qualified_name(p, false);
        p.finish_node();
        p.skip_trivia();
        if p.at(SyntaxKind::COMMA) {
            p.bump();
        } else {
            break;
        }
    }
}

fn type_body(p: &mut Parser) {
    p.bump(); // '{'
    loop {
        p.skip_trivia();
        match p.current_kind() {
            None => {
                p.error("expected '}', found end of file");
                break;
            }
            Some(SyntaxKind::R_BRACE) => {
                p.bump();
                break;
            }
            Some(SyntaxKind::PARAMETERS_KW) => {
                p.start_node(SyntaxKind::PARAMETERS);
                p.bump();
                p.skip_trivia();
                p.eat(SyntaxKind::COLON);
                p.consume_until_section_end();
                p.finish_node();
            }
            Some(SyntaxKind::GATES_KW) => {
                p.start_node(SyntaxKind::GATES);
                p.bump();
                p.skip_trivia();
                p.eat(SyntaxKind::COLON);
                p.consume_until_section_end();
                p.finish_node();
            }
            Some(SyntaxKind::CONNECTIONS_KW) => {
                p.start_node(SyntaxKind::CONNECTIONS);
                p.bump();
                p.skip_trivia();
                p.eat(SyntaxKind::ALLOWUNCONNECTED_KW);
                p.skip_trivia();
                p.eat(SyntaxKind::COLON);
                p.consume_until_section_end();
                p.finish_node();
            }
            Some(SyntaxKind::TYPES_KW) => types_section(p),
            Some(SyntaxKind::SUBMODULES_KW) => submodules_section(p),
            Some(_) => {
                // a body may start with parameters without the section keyword
                p.start_node(SyntaxKind::PARAMETERS);
                p.consume_until_section_end();
                p.finish_node();
            }
        }
    }
}

fn types_section(p: &mut Parser) {
    p.start_node(SyntaxKind::TYPES);
    p.bump(); // 'types'
    p.skip_trivia();
    p.eat(SyntaxKind::COLON);
    loop {
        p.skip_trivia();
        match p.current_kind() {
            Some(kind) if kind.starts_type_decl() => type_decl(p),
            _ => break,
        }
    }
    p.finish_node();
}

fn submodules_section(p: &mut Parser) {
    p.start_node(SyntaxKind::SUBMODULES);
    p.bump(); // 'submodules'
    p.skip_trivia();
    p.eat(SyntaxKind::COLON);
    loop {
        p.skip_trivia();
        if p.at(SyntaxKind::IDENT) {
            submodule(p);
        } else {
            break;
        }
    }
    p.finish_node();
}

/// `name: Type;`, `name[count]: Type { … }`, or
/// `name: <expr> like IFace;`.
fn submodule(p: &mut Parser) {
    p.start_node(SyntaxKind::SUBMODULE);

    p.start_node(SyntaxKind::NAME);
    p.bump(); // IDENT
    p.finish_node();
    p.skip_trivia();

    if p.at(SyntaxKind::L_BRACKET) {
        p.consume_balanced(SyntaxKind::L_BRACKET, SyntaxKind::R_BRACKET);
        p.skip_trivia();
    }
    p.expect(SyntaxKind::COLON);
    p.skip_trivia();

    if p.at(SyntaxKind::LT) {
        p.start_node(SyntaxKind::LIKE_PARAM);
        p.consume_balanced(SyntaxKind::LT, SyntaxKind::GT);
        p.finish_node();
        p.skip_trivia();
        if p.eat(SyntaxKind::LIKE_KW) {
            p.skip_trivia();
            p.start_node(SyntaxKind::INTERFACE_NAME);
            qualified_name(p, false);
            p.finish_node();
            p.skip_trivia();
        }
    } else {
        qualified_name(p, false);
        p.skip_trivia();
    }

    if p.at(SyntaxKind::L_BRACE) {
        // submodule bodies carry parameter and gate settings the resource
        // layer never inspects
        p.start_node(SyntaxKind::PARAMETERS);
        p.consume_balanced(SyntaxKind::L_BRACE, SyntaxKind::R_BRACE);
        p.finish_node();
    } else {
        p.expect(SyntaxKind::SEMICOLON);
    }
    p.finish_node();
}
