//! Core parser infrastructure: token cursor, error reporting, helpers.

use oic_lexer::token::{Token, TokenKind};
use oic_types::ast::{Ident, SourceUnit};
use oic_types::{CompileErrors, ErrorCode, OicError, SourceFile, Span};

/// The declaration parser.
///
/// Consumes a token stream produced by the lexer and builds a
/// [`SourceUnit`]. Collects errors and attempts recovery when possible.
pub struct Parser<'src> {
    /// The token stream.
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    /// Source file for error context.
    source_file: &'src SourceFile,
    /// Collected errors.
    errors: CompileErrors,
    /// Open `extern "C" {` blocks whose `}` is still to come.
    pub(crate) linkage_depth: usize,
}

/// Result of parsing.
pub struct ParseResult {
    /// Every item recognised, even when errors were reported.
    pub unit: SourceUnit,
    pub errors: CompileErrors,
}

impl<'src> Parser<'src> {
    /// Create a new parser from a token stream and source file.
    pub fn new(tokens: Vec<Token>, source_file: &'src SourceFile) -> Self {
        Self {
            tokens,
            pos: 0,
            source_file,
            errors: CompileErrors::empty(),
            linkage_depth: 0,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token without advancing.
    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).or_else(|| self.tokens.last())
    }

    /// Returns the kind of the current token.
    pub(crate) fn peek_kind(&self) -> &TokenKind {
        self.peek().map(|t| &t.kind).unwrap_or(&TokenKind::Eof)
    }

    /// Advance the cursor by one and return the consumed token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self
            .peek()
            .cloned()
            .unwrap_or_else(|| Token::new(TokenKind::Eof, Span::point(1, 1)));
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Returns the previously consumed token's span.
    pub(crate) fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::point(1, 1)
        }
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.peek().map(|t| t.span).unwrap_or(Span::point(1, 1))
    }

    /// Returns `true` if the current token is `Eof`.
    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    /// Check if the current token matches the given kind exactly.
    pub(crate) fn check_exact(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// If the current token matches, advance and return `true`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check_exact(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Look ahead by `n` tokens from current position.
    pub(crate) fn look_ahead(&self, n: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    /// Expect a specific token kind. Returns the token if matched, or emits an error.
    pub(crate) fn expect(&mut self, expected: &TokenKind) -> Option<Token> {
        if self.check_exact(expected) {
            Some(self.advance())
        } else {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected '{}', got '{}'", expected, self.peek_kind()),
            );
            None
        }
    }

    /// Expect an identifier token. Returns the name and span.
    pub(crate) fn expect_identifier(&mut self) -> Option<Ident> {
        match self.peek_kind().clone() {
            TokenKind::Identifier(name) => {
                let span = self.advance().span;
                Some(Ident::new(name, span))
            }
            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected identifier, got '{}'", self.peek_kind()),
                );
                None
            }
        }
    }

    // ── Groups ────────────────────────────────────────────────────────────────

    /// Consume a parenthesised group whose `(` was just consumed, splitting
    /// its contents at top-level commas. Returns `None` (after reporting) if
    /// the group is never closed.
    pub(crate) fn comma_group(&mut self) -> Option<Vec<Vec<Token>>> {
        let open = self.previous_span();
        let mut parts = vec![Vec::new()];
        let mut depth = 0usize;
        loop {
            match self.peek_kind() {
                TokenKind::Eof => {
                    self.error_at(
                        ErrorCode::UNEXPECTED_TOKEN,
                        "unclosed '(' before end of file",
                        open,
                    );
                    return None;
                }
                TokenKind::RParen if depth == 0 => {
                    self.advance();
                    break;
                }
                TokenKind::Comma if depth == 0 => {
                    self.advance();
                    parts.push(Vec::new());
                }
                kind => {
                    match kind {
                        TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                        TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                            depth = depth.saturating_sub(1)
                        }
                        _ => {}
                    }
                    let token = self.advance();
                    if let Some(last) = parts.last_mut() {
                        last.push(token);
                    }
                }
            }
        }
        // `()` is a group with no parts, not one empty part.
        if parts.len() == 1 && parts[0].is_empty() {
            parts.clear();
        }
        Some(parts)
    }

    /// Skip a balanced `{ ... }` group starting at the current `{`.
    pub(crate) fn skip_braces(&mut self) {
        let mut depth = 0usize;
        while !self.at_end() {
            match self.advance().kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Report an error at the current token position.
    pub(crate) fn error_at_current(&mut self, code: ErrorCode, message: impl Into<String>) {
        let span = self.current_span();
        self.error_at(code, message, span);
    }

    /// Report an error at a specific span.
    pub(crate) fn error_at(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let source_line = self
            .source_file
            .line(span.start_line)
            .unwrap_or("")
            .to_string();
        let error = OicError::new(&self.source_file.name, code, message, span, source_line);
        self.errors.push_error(error);
    }

    /// Returns `true` if we've hit the error limit and should stop.
    pub(crate) fn too_many_errors(&self) -> bool {
        self.errors.is_full()
    }

    // ── Synchronization ───────────────────────────────────────────────────────

    /// Skip tokens until we reach a synchronization point.
    /// Used after an error to resume at a known-good position.
    pub(crate) fn synchronize(&mut self) {
        while !self.at_end() {
            match self.peek_kind() {
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::Extern | TokenKind::Struct => return,
                TokenKind::Identifier(name) if name == crate::EXTERN_FN_MACRO => return,
                TokenKind::RBrace if self.linkage_depth > 0 => return,
                TokenKind::LBrace => self.skip_braces(),
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse the token stream into a [`SourceUnit`].
    pub fn parse(mut self) -> ParseResult {
        let unit = self.parse_unit();
        ParseResult {
            unit,
            errors: self.errors,
        }
    }
}
