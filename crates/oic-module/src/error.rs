//! Compiled-unit error types.

use oic_symbol::{EncodedSymbol, QualifiedName};
use oic_types::ErrorCode;
use thiserror::Error;

/// Errors that can occur while assembling a compiled unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleError {
    /// A required descriptor field was empty.
    #[error("module descriptor field `{field}` must not be empty")]
    EmptyField { field: &'static str },

    /// A second descriptor was declared in the same unit.
    #[error("module descriptor declared more than once (first: `{first}`, again: `{second}`)")]
    DuplicateModuleDescriptor { first: String, second: String },

    /// The same encoded symbol was declared twice in one unit.
    #[error("foreign function `{symbol}` declared more than once")]
    DuplicateDeclaration { symbol: EncodedSymbol },

    /// A stored symbol that is not the encoding of its target.
    #[error("symbol `{symbol}` does not encode `{target}`")]
    SymbolMismatch {
        symbol: EncodedSymbol,
        target: QualifiedName,
    },
}

impl ModuleError {
    /// Diagnostic code reported by the binder.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyField { .. } => ErrorCode::INVALID_MODULE_DESCRIPTOR,
            Self::DuplicateModuleDescriptor { .. } => ErrorCode::DUPLICATE_MODULE_DESCRIPTOR,
            Self::DuplicateDeclaration { .. } => ErrorCode::DUPLICATE_DECLARATION,
            Self::SymbolMismatch { .. } => ErrorCode::INVALID_SEGMENT,
        }
    }
}

/// Module result type alias.
pub type ModuleResult<T> = Result<T, ModuleError>;
