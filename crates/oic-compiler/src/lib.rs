//! OIC binder: orchestrates the full binding pipeline.
//!
//! ```text
//! Declaration source → Lexer → Parser → Binder (decode + host lookup) → BoundUnit
//! ```
//!
//! Entry points:
//! - [`bind`] / [`bind_with`]: bind a source file, returning the unit or errors
//! - [`check`]: run the pipeline and return only the diagnostics
//! - [`bind_to_result`]: a serializable [`BindResult`] for tooling

pub mod binder;
pub mod config;
pub mod host;
pub mod reference;
pub mod ty;

pub use binder::Binder;
pub use config::BindOptions;
pub use host::{HostMember, HostRegistry};
pub use reference::{generate_header, generate_host_table};
pub use ty::{HostSig, HostType};

use oic_lexer::Lexer;
use oic_module::CompiledUnit;
use oic_parser::Parser;
use oic_types::{CompileErrors, SourceFile};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

// ══════════════════════════════════════════════════════════════════════════════
// Results
// ══════════════════════════════════════════════════════════════════════════════

/// A successfully bound compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundUnit {
    pub unit: CompiledUnit,
    /// `<name>-<version>.<ext>`, or `<file stem>.<ext>` without a descriptor.
    pub artifact_name: String,
    /// SHA-256 of the source text, lowercase hex.
    pub source_hash: String,
}

/// Serializable outcome of a bind run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindResult {
    pub success: bool,
    pub unit: Option<BoundUnit>,
    pub errors: CompileErrors,
}

// ══════════════════════════════════════════════════════════════════════════════
// Pipeline
// ══════════════════════════════════════════════════════════════════════════════

/// Bind declaration source against the default host registry.
pub fn bind(source: &str, filename: &str) -> Result<BoundUnit, CompileErrors> {
    bind_with(source, filename, &HostRegistry::new(), &BindOptions::default())
}

/// Bind declaration source against `registry`.
///
/// Any error fails the whole unit.
pub fn bind_with(
    source: &str,
    filename: &str,
    registry: &HostRegistry,
    options: &BindOptions,
) -> Result<BoundUnit, CompileErrors> {
    let source_file = SourceFile::new(filename, source);
    let (unit, errors) = run_pipeline(&source_file, registry, options);
    if errors.has_errors() {
        info!(
            target: "pipeline",
            status = "failed",
            file = filename,
            errors = errors.total_errors
        );
        return Err(errors);
    }

    let artifact_name = unit.artifact_file_name(&options.artifact_extension);
    let source_hash = source_hash(source);
    info!(
        target: "pipeline",
        status = "ok",
        file = filename,
        artifact = %artifact_name,
        functions = unit.functions.len()
    );
    Ok(BoundUnit {
        unit,
        artifact_name,
        source_hash,
    })
}

/// Run the pipeline and return only the diagnostics.
pub fn check(source: &str, filename: &str) -> CompileErrors {
    let source_file = SourceFile::new(filename, source);
    run_pipeline(&source_file, &HostRegistry::new(), &BindOptions::default()).1
}

/// Bind against the default registry and wrap the outcome for serialization.
pub fn bind_to_result(source: &str, filename: &str) -> BindResult {
    bind_to_result_with(source, filename, &HostRegistry::new(), &BindOptions::default())
}

/// [`bind_to_result`] with an explicit registry and options.
pub fn bind_to_result_with(
    source: &str,
    filename: &str,
    registry: &HostRegistry,
    options: &BindOptions,
) -> BindResult {
    match bind_with(source, filename, registry, options) {
        Ok(unit) => BindResult {
            success: true,
            unit: Some(unit),
            errors: CompileErrors::empty(),
        },
        Err(errors) => BindResult {
            success: false,
            unit: None,
            errors,
        },
    }
}

/// Lex, parse and bind. Later stages still run after earlier errors so one
/// pass reports every problem, up to the error cap.
fn run_pipeline(
    source_file: &SourceFile,
    registry: &HostRegistry,
    options: &BindOptions,
) -> (CompiledUnit, CompileErrors) {
    let lex_result = Lexer::new(source_file).lex();
    debug!(target: "pipeline", stage = "lex", tokens = lex_result.tokens.len());

    let mut errors = lex_result.errors;
    let parse_result = Parser::new(lex_result.tokens, source_file).parse();
    debug!(
        target: "pipeline",
        stage = "parse",
        externs = parse_result.unit.externs().count(),
        descriptors = parse_result.unit.metadata().count()
    );
    errors.merge(parse_result.errors);

    let unit = Binder::new(&mut errors, source_file, registry, options).bind(&parse_result.unit);
    debug!(target: "pipeline", stage = "bind", functions = unit.functions.len());
    (unit, errors)
}

fn source_hash(source: &str) -> String {
    let digest = Sha256::digest(source.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_hash_known_value() {
        assert_eq!(
            source_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_empty_source_binds() {
        let bound = bind("", "empty.c").unwrap();
        assert!(bound.unit.functions.is_empty());
        assert_eq!(bound.artifact_name, "empty.oic");
    }
}
