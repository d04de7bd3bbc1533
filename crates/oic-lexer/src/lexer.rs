//! Declaration lexer: converts C-style declaration text to a token stream.
//!
//! Features:
//! - Line (`//`) and block (`/* */`) comments stripped; unterminated block
//!   comments reported as E102
//! - Preprocessor lines (`#include`, `#define`, ...) skipped, including
//!   backslash continuations and comments that run past the line end
//! - String and character literals with C escapes
//! - Error recovery: collects up to 20 errors instead of stopping at the first

use oic_types::{CompileErrors, ErrorCode, OicError, SourceFile, Span};

use crate::token::{Token, TokenKind};

/// The declaration lexer.
///
/// Converts source text into a vector of [`Token`]s, collecting up to
/// [`oic_types::MAX_ERRORS`] errors along the way.
pub struct Lexer<'src> {
    /// The full source text.
    text: &'src str,
    /// The full source text as bytes.
    source: &'src [u8],
    /// Source file for error reporting.
    source_file: &'src SourceFile,
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
    /// No token has been produced on the current line yet.
    at_line_start: bool,
    /// Collected errors.
    errors: CompileErrors,
}

/// Result of lexing: tokens + any errors collected.
pub struct LexResult {
    /// The token stream (always ends with [`TokenKind::Eof`]).
    pub tokens: Vec<Token>,
    /// Errors encountered during lexing.
    pub errors: CompileErrors,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source file.
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            text: &source_file.source,
            source: source_file.source.as_bytes(),
            source_file,
            pos: 0,
            line: 1,
            col: 1,
            at_line_start: true,
            errors: CompileErrors::empty(),
        }
    }

    /// Lex the entire source file into a token stream.
    pub fn lex(mut self) -> LexResult {
        let mut tokens = Vec::new();

        loop {
            if self.errors.is_full() {
                break;
            }

            let token = self.scan_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);

            if is_eof {
                break;
            }
        }

        // Ensure token stream always ends with Eof
        if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            tokens.push(Token::new(TokenKind::Eof, self.current_span()));
        }

        LexResult {
            tokens,
            errors: self.errors,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
            self.at_line_start = true;
        } else if ch & 0xC0 != 0x80 {
            // UTF-8 continuation bytes do not start a new column.
            self.col += 1;
        }
        Some(ch)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn emit_error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let source_line = self
            .source_file
            .line(span.start_line)
            .unwrap_or("")
            .to_string();
        let err = OicError::new(&self.source_file.name, code, message, span, source_line);
        self.errors.push_error(err);
    }

    fn emit_error_with_suggestion(
        &mut self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        suggestion: impl Into<String>,
    ) {
        let source_line = self
            .source_file
            .line(span.start_line)
            .unwrap_or("")
            .to_string();
        let err = OicError::new(&self.source_file.name, code, message, span, source_line)
            .with_suggestion(suggestion);
        self.errors.push_error(err);
    }

    // ─────────────────────────────────────────────────────────────
    // Whitespace, comments & preprocessor lines
    // ─────────────────────────────────────────────────────────────

    /// Skip everything that never produces a token. Returns once the cursor
    /// sits on the first byte of a token or at end of input.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n' | 0x0B | 0x0C) => {
                    self.advance();
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => self.skip_line_comment(),
                Some(b'/') if self.peek_at(1) == Some(b'*') => self.skip_block_comment(),
                Some(b'#') if self.at_line_start => self.skip_directive(),
                _ => return,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == b'\n' {
                break;
            }
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) {
        let start_line = self.line;
        let start_col = self.col;
        // Comments do not end the "nothing on this line yet" state.
        let line_start = self.at_line_start;
        self.advance();
        self.advance();
        loop {
            match self.peek() {
                None => {
                    let span = self.span_from(start_line, start_col);
                    self.emit_error_with_suggestion(
                        ErrorCode::UNTERMINATED_COMMENT,
                        "Unterminated block comment",
                        span,
                        "Close the comment with */",
                    );
                    return;
                }
                Some(b'*') if self.peek_at(1) == Some(b'/') => {
                    self.advance();
                    self.advance();
                    if self.line == start_line {
                        self.at_line_start = line_start;
                    }
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip a preprocessor directive, honouring `\` line continuations.
    ///
    /// A block comment opened on the directive line is skipped whole, even
    /// when it runs onto later lines; the directive then continues after
    /// its `*/`.
    fn skip_directive(&mut self) {
        while let Some(ch) = self.peek() {
            match ch {
                b'/' if self.peek_at(1) == Some(b'*') => self.skip_block_comment(),
                b'/' if self.peek_at(1) == Some(b'/') => self.skip_line_comment(),
                b'"' | b'\'' => self.skip_directive_literal(ch),
                b'\\' if self.peek_at(1) == Some(b'\n') => {
                    self.advance();
                    self.advance();
                }
                b'\\' if self.peek_at(1) == Some(b'\r') && self.peek_at(2) == Some(b'\n') => {
                    self.advance();
                    self.advance();
                    self.advance();
                }
                b'\n' => break,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip a quoted run inside a directive so `/*` in `"a/*b"` is not
    /// taken for a comment. Stops at the closing quote or end of line.
    fn skip_directive_literal(&mut self, quote: u8) {
        self.advance();
        while let Some(ch) = self.peek() {
            match ch {
                b'\\' if self.peek_at(1).is_some_and(|c| c != b'\n') => {
                    self.advance();
                    self.advance();
                }
                b'\n' => return,
                c if c == quote => {
                    self.advance();
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Token scanning
    // ─────────────────────────────────────────────────────────────

    fn scan_token(&mut self) -> Token {
        self.skip_trivia();

        if self.errors.is_full() || self.at_end() {
            return Token::new(TokenKind::Eof, self.current_span());
        }

        self.at_line_start = false;
        let start_line = self.line;
        let start_col = self.col;
        let start = self.pos;

        let Some(ch) = self.advance() else {
            return Token::new(TokenKind::Eof, self.current_span());
        };

        let kind = match ch {
            b'"' => return self.scan_string(start_line, start_col),
            b'\'' => return self.scan_char(start_line, start_col),
            b'0'..=b'9' => return self.scan_number(start, start_line, start_col),
            b'.' if matches!(self.peek(), Some(b'0'..=b'9')) => {
                return self.scan_number(start, start_line, start_col)
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                return self.scan_identifier(start, start_line, start_col)
            }

            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b'=' => TokenKind::Eq,
            b'*' => TokenKind::Star,
            b'.' => {
                if self.peek() == Some(b'.') && self.peek_at(1) == Some(b'.') {
                    self.advance();
                    self.advance();
                    TokenKind::Ellipsis
                } else {
                    TokenKind::Dot
                }
            }
            b'+' | b'-' | b'/' | b'%' | b'&' | b'|' | b'^' | b'!' | b'~' | b'<' | b'>'
            | b'?' | b':' => TokenKind::Operator(ch as char),

            _ => {
                let bad = self.text[start..].chars().next().unwrap_or('?');
                // Consume the rest of a multi-byte character.
                while matches!(self.peek(), Some(b) if b & 0xC0 == 0x80) {
                    self.advance();
                }
                let span = self.span_from(start_line, start_col);
                self.emit_error(
                    ErrorCode::INVALID_CHARACTER,
                    format!("Unexpected character {bad:?}"),
                    span,
                );
                return self.scan_token();
            }
        };

        Token::new(kind, self.span_from(start_line, start_col))
    }

    fn scan_number(&mut self, start: usize, start_line: u32, start_col: u32) -> Token {
        // Suffixes, hex digits and exponents are kept verbatim.
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == b'_' || ch == b'.' {
                self.advance();
            } else {
                break;
            }
        }
        let text = &self.text[start..self.pos];
        Token::new(
            TokenKind::NumberLit(text.to_string()),
            self.span_from(start_line, start_col),
        )
    }

    fn scan_identifier(&mut self, start: usize, start_line: u32, start_col: u32) -> Token {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                self.advance();
            } else {
                break;
            }
        }

        let text = &self.text[start..self.pos];
        let kind = TokenKind::from_keyword(text)
            .unwrap_or_else(|| TokenKind::Identifier(text.to_string()));

        Token::new(kind, self.span_from(start_line, start_col))
    }

    /// Scan a string literal starting after the opening `"`.
    fn scan_string(&mut self, start_line: u32, start_col: u32) -> Token {
        let mut buf = String::new();
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    let span = self.span_from(start_line, start_col);
                    self.emit_error(
                        ErrorCode::UNTERMINATED_STRING,
                        "Unterminated string literal",
                        span,
                    );
                    return Token::new(TokenKind::StringLiteral(buf), span);
                }
                Some(b'"') => {
                    self.advance();
                    return Token::new(
                        TokenKind::StringLiteral(buf),
                        self.span_from(start_line, start_col),
                    );
                }
                Some(b'\\') => {
                    if let Some(escaped) = self.scan_escape_sequence() {
                        buf.push(escaped);
                    }
                }
                Some(_) => self.push_char(&mut buf),
            }
        }
    }

    /// Scan a character literal starting after the opening `'`.
    fn scan_char(&mut self, start_line: u32, start_col: u32) -> Token {
        let mut buf = String::new();
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    let span = self.span_from(start_line, start_col);
                    self.emit_error(
                        ErrorCode::UNTERMINATED_STRING,
                        "Unterminated character literal",
                        span,
                    );
                    return Token::new(TokenKind::CharLiteral(buf), span);
                }
                Some(b'\'') => {
                    self.advance();
                    return Token::new(
                        TokenKind::CharLiteral(buf),
                        self.span_from(start_line, start_col),
                    );
                }
                Some(b'\\') => {
                    if let Some(escaped) = self.scan_escape_sequence() {
                        buf.push(escaped);
                    }
                }
                Some(_) => self.push_char(&mut buf),
            }
        }
    }

    /// Copy one full UTF-8 character into `buf`.
    fn push_char(&mut self, buf: &mut String) {
        if let Some(c) = self.text[self.pos..].chars().next() {
            buf.push(c);
            for _ in 0..c.len_utf8() {
                self.advance();
            }
        }
    }

    fn scan_escape_sequence(&mut self) -> Option<char> {
        let start_line = self.line;
        let start_col = self.col;
        self.advance(); // consume the '\'

        match self.advance() {
            Some(b'"') => Some('"'),
            Some(b'\'') => Some('\''),
            Some(b'\\') => Some('\\'),
            Some(b'?') => Some('?'),
            Some(b'n') => Some('\n'),
            Some(b't') => Some('\t'),
            Some(b'r') => Some('\r'),
            Some(b'0') => Some('\0'),
            Some(b'a') => Some('\u{7}'),
            Some(b'b') => Some('\u{8}'),
            Some(b'f') => Some('\u{c}'),
            Some(b'v') => Some('\u{b}'),
            Some(ch) if ch.is_ascii() => {
                let span = self.span_from(start_line, start_col);
                self.emit_error(
                    ErrorCode::INVALID_CHARACTER,
                    format!("Invalid escape sequence '\\{}'", ch as char),
                    span,
                );
                Some(ch as char) // error recovery: emit the char as-is
            }
            Some(_) => {
                while matches!(self.peek(), Some(b) if b & 0xC0 == 0x80) {
                    self.advance();
                }
                let span = self.span_from(start_line, start_col);
                self.emit_error(
                    ErrorCode::INVALID_CHARACTER,
                    "Invalid escape sequence",
                    span,
                );
                None
            }
            None => {
                let span = self.span_from(start_line, start_col);
                self.emit_error(
                    ErrorCode::UNTERMINATED_STRING,
                    "Unexpected end of file in escape sequence",
                    span,
                );
                None
            }
        }
    }
}
