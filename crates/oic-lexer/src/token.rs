//! Token types for the declaration lexer.
//!
//! The declaration surface is C-like, so the token set is deliberately
//! small: the binder only cares about `extern` prototypes, the `EXTERN_FN`
//! helper form and the module metadata instance. Everything else is lexed
//! loosely enough to be skipped by the parser.

use oic_types::Span;
use std::fmt;

/// Reserved words the parser keys on.
pub const ALL_KEYWORDS: &[&str] = &["extern", "struct"];

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// Source location.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Every token kind of the declaration surface.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Literals ──────────────────────────────────────────────

    /// Numeric literal, kept as written: `42`, `0xFF`, `1.5f`
    NumberLit(String),
    /// String literal with escapes resolved: `"MyModule"`
    StringLiteral(String),
    /// Character literal with escapes resolved: `'a'`
    CharLiteral(String),

    // ── Identifiers & keywords ───────────────────────────────

    /// Any identifier, including type names and macro names.
    Identifier(String),
    /// `extern`
    Extern,
    /// `struct`
    Struct,

    // ── Punctuation ──────────────────────────────────────────

    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `=`
    Eq,
    /// `*`
    Star,
    /// `.`
    Dot,
    /// `...`
    Ellipsis,
    /// Any other operator character (`+`, `&`, `<`, ...). Only appears in
    /// code the parser skips.
    Operator(char),

    // ── Special ──────────────────────────────────────────────

    /// End of file.
    Eof,
}

impl TokenKind {
    /// Look up a keyword by its source text.
    pub fn from_keyword(text: &str) -> Option<TokenKind> {
        match text {
            "extern" => Some(TokenKind::Extern),
            "struct" => Some(TokenKind::Struct),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::NumberLit(n) => f.write_str(n),
            TokenKind::StringLiteral(s) => write!(f, "\"{s}\""),
            TokenKind::CharLiteral(s) => write!(f, "'{s}'"),
            TokenKind::Identifier(s) => f.write_str(s),
            TokenKind::Extern => f.write_str("extern"),
            TokenKind::Struct => f.write_str("struct"),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::LBrace => f.write_str("{"),
            TokenKind::RBrace => f.write_str("}"),
            TokenKind::LBracket => f.write_str("["),
            TokenKind::RBracket => f.write_str("]"),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Semicolon => f.write_str(";"),
            TokenKind::Eq => f.write_str("="),
            TokenKind::Star => f.write_str("*"),
            TokenKind::Dot => f.write_str("."),
            TokenKind::Ellipsis => f.write_str("..."),
            TokenKind::Operator(c) => write!(f, "{c}"),
            TokenKind::Eof => f.write_str("end of file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        for kw in ALL_KEYWORDS {
            let kind = TokenKind::from_keyword(kw).unwrap();
            assert_eq!(kind.to_string(), *kw);
        }
        assert_eq!(TokenKind::from_keyword("EXTERN_FN"), None);
    }

    #[test]
    fn test_display_round_trips_source_text() {
        assert_eq!(TokenKind::Ellipsis.to_string(), "...");
        assert_eq!(TokenKind::Identifier("int64_t".into()).to_string(), "int64_t");
        assert_eq!(TokenKind::StringLiteral("1.0.0".into()).to_string(), "\"1.0.0\"");
        assert_eq!(TokenKind::Eof.to_string(), "end of file");
    }
}
