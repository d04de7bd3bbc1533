//! Shared types for the OIC extern binder.
//!
//! This crate defines the declaration AST, source spans, error types,
//! and other shared data structures used across all binder stages.

mod error;
mod span;
pub mod ast;

pub use error::{CompileErrors, ErrorCategory, ErrorCode, OicError, MAX_ERRORS};
pub use span::{SourceFile, Span};
