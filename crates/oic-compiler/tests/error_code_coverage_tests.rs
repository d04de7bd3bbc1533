//! Error code coverage tests: every defined error code (E100–E401) has at
//! least one test that asserts it is emitted.

use oic_types::{CompileErrors, ErrorCode};

fn check(source: &str) -> CompileErrors {
    oic_compiler::check(source, "test.c")
}

fn assert_error(source: &str, expected_code: ErrorCode) {
    let errors = check(source);
    assert!(
        errors.errors.iter().any(|e| e.code == expected_code),
        "expected error code {}, got: {:?}",
        expected_code,
        errors
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.code, e.message))
            .collect::<Vec<_>>()
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Syntax (E100–E104)
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn e100_unexpected_token() {
    // Missing `;` after the prototype
    assert_error(
        "extern void OCRuntime__PixelBindings__Clear(int64_t color)\nint x;",
        ErrorCode::UNEXPECTED_TOKEN,
    );
}

#[test]
fn e101_unterminated_string() {
    assert_error(
        "struct MODULE_METADATA m = { \"MyModule, \"1.0\" };\n",
        ErrorCode::UNTERMINATED_STRING,
    );
}

#[test]
fn e102_unterminated_comment() {
    assert_error(
        "extern void OCRuntime__PixelBindings__Clear(int64_t color); /* open",
        ErrorCode::UNTERMINATED_COMMENT,
    );
}

#[test]
fn e103_malformed_declaration() {
    assert_error("extern OCRuntime__PixelBindings__Clear(int64_t);", ErrorCode::MALFORMED_DECLARATION);
    assert_error("EXTERN_FN(OCRuntime__PixelBindings, void);", ErrorCode::MALFORMED_DECLARATION);
}

#[test]
fn e104_invalid_character() {
    assert_error("extern void A__B(void); @", ErrorCode::INVALID_CHARACTER);
}

// ══════════════════════════════════════════════════════════════════════════════
// Symbol (E200–E203)
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn e200_invalid_segment() {
    // Trailing separator leaves an empty method
    assert_error(
        "extern void OCRuntime__PixelBindings__(void);",
        ErrorCode::INVALID_SEGMENT,
    );
    // Helper-form method containing the separator
    assert_error(
        "EXTERN_FN(OCRuntime, void, Pixel__Clear, int64_t color);",
        ErrorCode::INVALID_SEGMENT,
    );
}

#[test]
fn e201_empty_namespace() {
    // Declarations always spell a namespace, so only encode reports this.
    let err = oic_symbol::encode::<&str>(&[], "Clear").unwrap_err();
    assert_eq!(err.code(), ErrorCode::EMPTY_NAMESPACE);
}

#[test]
fn e202_ambiguous_separator() {
    assert_error(
        "extern void OCRuntime___PixelBindings__Clear(int64_t color);",
        ErrorCode::AMBIGUOUS_SEPARATOR,
    );
}

#[test]
fn e203_missing_namespace() {
    assert_error("extern void FillRect(void);", ErrorCode::MISSING_NAMESPACE);
}

// ══════════════════════════════════════════════════════════════════════════════
// Module (E300–E302)
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn e300_duplicate_module_descriptor() {
    assert_error(
        r#"
struct MODULE_METADATA a = { "First", "1.0.0", "" };
struct MODULE_METADATA b = { "Second", "2.0.0", "" };
"#,
        ErrorCode::DUPLICATE_MODULE_DESCRIPTOR,
    );
}

#[test]
fn e301_invalid_module_descriptor() {
    assert_error(
        r#"struct MODULE_METADATA m = { "", "1.0.0" };"#,
        ErrorCode::INVALID_MODULE_DESCRIPTOR,
    );
    assert_error(
        r#"struct MODULE_METADATA m = { "OnlyName" };"#,
        ErrorCode::INVALID_MODULE_DESCRIPTOR,
    );
    assert_error(
        r#"struct MODULE_METADATA m = { .name = "M", .license = "MIT" };"#,
        ErrorCode::INVALID_MODULE_DESCRIPTOR,
    );
}

#[test]
fn e302_duplicate_declaration() {
    assert_error(
        r#"
extern void OCRuntime__PixelBindings__Clear(int64_t color);
EXTERN_FN(OCRuntime__PixelBindings, void, Clear, int64_t color);
"#,
        ErrorCode::DUPLICATE_DECLARATION,
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Resolution (E400–E401)
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn e400_unresolved_symbol() {
    assert_error(
        "extern void OCRuntime__PixelBindings__Missing();",
        ErrorCode::UNRESOLVED_SYMBOL,
    );
}

#[test]
fn e401_arity_mismatch() {
    assert_error(
        "extern void OCRuntime__PixelBindings__Clear(void);",
        ErrorCode::ARITY_MISMATCH,
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Categories
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn every_emitted_error_carries_its_category() {
    let errors = check(
        "extern void FillRect(void);\nextern void OCRuntime__PixelBindings__Missing();\n@",
    );
    assert_eq!(errors.total_errors, 3);
    for e in &errors.errors {
        assert_eq!(e.category, e.code.category());
    }
}
