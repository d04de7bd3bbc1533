//! Lexer tests for the declaration surface.
//!
//! Covers: keywords, punctuation, literals, comment and preprocessor
//! stripping, spans, error recovery, and the 100-iteration determinism test.

use oic_lexer::{Lexer, TokenKind};
use oic_types::{ErrorCode, SourceFile, Span};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Lex source text and return just the token kinds (excluding final Eof).
fn kinds(source: &str) -> Vec<TokenKind> {
    let sf = SourceFile::new("test.c", source);
    Lexer::new(&sf)
        .lex()
        .tokens
        .into_iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| t.kind)
        .collect()
}

fn ident(s: &str) -> TokenKind {
    TokenKind::Identifier(s.to_string())
}

/// Lex and return the error codes in order.
fn error_codes(source: &str) -> Vec<ErrorCode> {
    let sf = SourceFile::new("test.c", source);
    Lexer::new(&sf)
        .lex()
        .errors
        .errors
        .iter()
        .map(|e| e.code)
        .collect()
}

// ─────────────────────────────────────────────────────────────────────
// Declarations
// ─────────────────────────────────────────────────────────────────────

#[test]
fn extern_prototype() {
    assert_eq!(
        kinds("extern void OCRuntime__PixelBindings__Clear(long color);"),
        vec![
            TokenKind::Extern,
            ident("void"),
            ident("OCRuntime__PixelBindings__Clear"),
            TokenKind::LParen,
            ident("long"),
            ident("color"),
            TokenKind::RParen,
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn extern_fn_helper_form() {
    assert_eq!(
        kinds("EXTERN_FN(OCRuntime__PixelBindings, void, PlayOneShot, const char* soundName, float volume);"),
        vec![
            ident("EXTERN_FN"),
            TokenKind::LParen,
            ident("OCRuntime__PixelBindings"),
            TokenKind::Comma,
            ident("void"),
            TokenKind::Comma,
            ident("PlayOneShot"),
            TokenKind::Comma,
            ident("const"),
            ident("char"),
            TokenKind::Star,
            ident("soundName"),
            TokenKind::Comma,
            ident("float"),
            ident("volume"),
            TokenKind::RParen,
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn metadata_instance() {
    assert_eq!(
        kinds(r#"struct MODULE_METADATA MODULE_METADATA = { "MyModule", "1.0.0", "Your Name" };"#),
        vec![
            TokenKind::Struct,
            ident("MODULE_METADATA"),
            ident("MODULE_METADATA"),
            TokenKind::Eq,
            TokenKind::LBrace,
            TokenKind::StringLiteral("MyModule".into()),
            TokenKind::Comma,
            TokenKind::StringLiteral("1.0.0".into()),
            TokenKind::Comma,
            TokenKind::StringLiteral("Your Name".into()),
            TokenKind::RBrace,
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn designated_initializer_and_ellipsis() {
    assert_eq!(
        kinds(".name = \"M\" ... ."),
        vec![
            TokenKind::Dot,
            ident("name"),
            TokenKind::Eq,
            TokenKind::StringLiteral("M".into()),
            TokenKind::Ellipsis,
            TokenKind::Dot,
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Literals
// ─────────────────────────────────────────────────────────────────────

#[test]
fn numbers_kept_verbatim() {
    assert_eq!(
        kinds("42 0xFF 1.5f .25 10UL"),
        vec![
            TokenKind::NumberLit("42".into()),
            TokenKind::NumberLit("0xFF".into()),
            TokenKind::NumberLit("1.5f".into()),
            TokenKind::NumberLit(".25".into()),
            TokenKind::NumberLit("10UL".into()),
        ]
    );
}

#[test]
fn string_escapes() {
    assert_eq!(
        kinds(r#""a\"b\\c\n""#),
        vec![TokenKind::StringLiteral("a\"b\\c\n".into())]
    );
}

#[test]
fn char_literal() {
    assert_eq!(
        kinds(r"'x' '\n'"),
        vec![
            TokenKind::CharLiteral("x".into()),
            TokenKind::CharLiteral("\n".into()),
        ]
    );
}

#[test]
fn unicode_inside_string() {
    assert_eq!(
        kinds("\"Größe\""),
        vec![TokenKind::StringLiteral("Größe".into())]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Trivia
// ─────────────────────────────────────────────────────────────────────

#[test]
fn comments_stripped() {
    assert_eq!(
        kinds("// line\nextern /* inline */ void\n/* multi\nline */ f();"),
        vec![
            TokenKind::Extern,
            ident("void"),
            ident("f"),
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn preprocessor_lines_skipped() {
    let src = "#ifndef OIC_EXTERN_H\n#define OIC_EXTERN_H\n#include <stdint.h>\nextern void A__B(void);\n#endif\n";
    assert_eq!(kinds(src).first(), Some(&TokenKind::Extern));
    assert_eq!(kinds(src).len(), 7);
}

#[test]
fn preprocessor_continuation_lines_skipped() {
    let src = "#define EXTERN_FN(ns, ret, name, ...) \\\n    extern ret EXTERN_METHOD(ns, name)(__VA_ARGS__)\nx";
    assert_eq!(kinds(src), vec![ident("x")]);
}

#[test]
fn block_comment_opened_on_directive_line_is_skipped_whole() {
    let src = "#include <x.h> /* a\n b */\nextern void A__B(void);";
    assert_eq!(kinds(src).first(), Some(&TokenKind::Extern));
    assert_eq!(kinds(src).len(), 7);
    assert!(error_codes(src).is_empty());
}

#[test]
fn directive_resumes_after_a_multi_line_comment() {
    // Text after `*/` on the closing line still belongs to the directive.
    assert_eq!(kinds("#define A /* one\ntwo */ B C\nx"), vec![ident("x")]);
}

#[test]
fn comment_markers_inside_directive_strings_are_text() {
    assert_eq!(kinds("#include \"a/*b.h\"\nx"), vec![ident("x")]);
    assert_eq!(kinds("#define S \"//\" y\nx"), vec![ident("x")]);
}

#[test]
fn unterminated_comment_on_directive_line() {
    assert_eq!(
        error_codes("#include <x.h> /* never closed\nextern"),
        vec![ErrorCode::UNTERMINATED_COMMENT]
    );
}

#[test]
fn indented_directive_skipped() {
    assert_eq!(kinds("   #pragma once\nx"), vec![ident("x")]);
}

#[test]
fn hash_mid_line_is_an_error() {
    assert_eq!(error_codes("x # y"), vec![ErrorCode::INVALID_CHARACTER]);
}

#[test]
fn operators_in_function_bodies() {
    assert_eq!(
        kinds("a+b<c"),
        vec![
            ident("a"),
            TokenKind::Operator('+'),
            ident("b"),
            TokenKind::Operator('<'),
            ident("c"),
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Spans
// ─────────────────────────────────────────────────────────────────────

#[test]
fn token_spans_are_one_based() {
    let sf = SourceFile::new("test.c", "extern void\n  A__B();");
    let tokens = Lexer::new(&sf).lex().tokens;
    assert_eq!(tokens[0].span, Span::new(1, 1, 1, 6));
    assert_eq!(tokens[1].span, Span::new(1, 8, 1, 11));
    assert_eq!(tokens[2].span, Span::new(2, 3, 2, 6));
}

#[test]
fn stream_always_ends_with_eof() {
    for src in ["", "   ", "// only a comment", "x"] {
        let sf = SourceFile::new("test.c", src);
        let tokens = Lexer::new(&sf).lex().tokens;
        assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
    }
}

// ─────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────

#[test]
fn unterminated_string() {
    assert_eq!(
        error_codes("\"MyModule\nx"),
        vec![ErrorCode::UNTERMINATED_STRING]
    );
}

#[test]
fn unterminated_block_comment() {
    let sf = SourceFile::new("test.c", "x /* never closed");
    let result = Lexer::new(&sf).lex();
    assert_eq!(result.errors.total_errors, 1);
    let err = &result.errors.errors[0];
    assert_eq!(err.code, ErrorCode::UNTERMINATED_COMMENT);
    assert!(err.suggestion.is_some());
}

#[test]
fn invalid_characters_recover() {
    let sf = SourceFile::new("test.c", "a @ b ` c é d");
    let result = Lexer::new(&sf).lex();
    assert_eq!(result.errors.total_errors, 3);
    let idents: Vec<_> = result
        .tokens
        .iter()
        .filter_map(|t| match &t.kind {
            TokenKind::Identifier(s) => Some(s.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(idents, vec!["a", "b", "c", "d"]);
}

#[test]
fn error_message_carries_source_line() {
    let sf = SourceFile::new("pixels.h", "ok\nbad @ here");
    let result = Lexer::new(&sf).lex();
    let err = &result.errors.errors[0];
    assert_eq!(err.file, "pixels.h");
    assert_eq!(err.source_line, "bad @ here");
    assert_eq!(err.span.start_line, 2);
    assert_eq!(err.span.start_col, 5);
}

#[test]
fn error_cap_stops_lexing() {
    let src = "@".repeat(50);
    let sf = SourceFile::new("test.c", &src);
    let result = Lexer::new(&sf).lex();
    assert_eq!(result.errors.errors.len(), 20);
    assert_eq!(result.errors.total_errors, 20);
    assert_eq!(result.tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
}

// ─────────────────────────────────────────────────────────────────────
// Determinism
// ─────────────────────────────────────────────────────────────────────

#[test]
fn determinism_100_iterations() {
    let src = "EXTERN_FN(OCRuntime__PixelBindings, void, SynthPlay, int64_t frequency, double duration);";
    let first = kinds(src);
    for i in 0..100 {
        assert_eq!(kinds(src), first, "Determinism failure at iteration {i}");
    }
}
