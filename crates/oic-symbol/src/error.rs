//! Codec error types.

use std::fmt;

use oic_types::ErrorCode;
use thiserror::Error;

/// Why a single segment was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentFault {
    Empty,
    /// The segment contains the reserved `__` separator.
    ContainsSeparator,
    LeadingDigit,
    InvalidChar(char),
    /// A `_` at the segment's edge would merge with an adjacent separator.
    AdjoinsSeparator,
}

impl fmt::Display for SegmentFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "segment is empty"),
            Self::ContainsSeparator => write!(f, "segment contains the reserved separator `__`"),
            Self::LeadingDigit => write!(f, "segment starts with a digit"),
            Self::InvalidChar(c) => write!(f, "segment contains invalid character {c:?}"),
            Self::AdjoinsSeparator => {
                write!(f, "underscore at segment edge would merge with the separator")
            }
        }
    }
}

/// Errors raised while encoding or decoding a namespaced symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("invalid segment `{segment}`: {fault}")]
    InvalidSegment { segment: String, fault: SegmentFault },

    #[error("namespace path is empty")]
    EmptyNamespace,

    /// A run of three or more underscores; `offset` is the run's byte offset.
    #[error("ambiguous separator in `{symbol}`: run of {run} underscores at byte {offset}")]
    AmbiguousSeparator {
        symbol: String,
        offset: usize,
        run: usize,
    },

    #[error("`{symbol}` names no namespace")]
    MissingNamespace { symbol: String },
}

impl SymbolError {
    pub(crate) fn invalid(segment: &str, fault: SegmentFault) -> Self {
        Self::InvalidSegment {
            segment: segment.to_string(),
            fault,
        }
    }

    /// Diagnostic code reported by the binder.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidSegment { .. } => ErrorCode::INVALID_SEGMENT,
            Self::EmptyNamespace => ErrorCode::EMPTY_NAMESPACE,
            Self::AmbiguousSeparator { .. } => ErrorCode::AMBIGUOUS_SEPARATOR,
            Self::MissingNamespace { .. } => ErrorCode::MISSING_NAMESPACE,
        }
    }
}

/// Codec result type alias.
pub type SymbolResult<T> = Result<T, SymbolError>;
