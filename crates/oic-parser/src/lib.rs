//! OIC declaration parser: converts a token stream into a [`SourceUnit`].
//!
//! Only the foreign-function surface is modelled. Function bodies, type
//! definitions and other items are skipped without diagnostics.
//!
//! [`SourceUnit`]: oic_types::ast::SourceUnit

mod parse_decl;
mod parser;

pub use parser::{ParseResult, Parser};

/// Name of the helper macro that spells a declaration as
/// `EXTERN_FN(namespace, ret, method, params...)`.
pub const EXTERN_FN_MACRO: &str = "EXTERN_FN";

/// Struct tag whose initialised instance carries the module descriptor.
pub const METADATA_STRUCT: &str = "MODULE_METADATA";
