//! Identifier segments and the segment grammar.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SegmentFault, SymbolError, SymbolResult};

/// The reserved separator joining segments in an encoded symbol.
pub const SEPARATOR: &str = "__";

/// A single identifier token of a namespace path or a method name.
///
/// Grammar: ASCII letters, digits and `_`, not starting with a digit, never
/// empty, never containing [`SEPARATOR`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Segment(String);

impl Segment {
    /// Validate `text` against the segment grammar.
    pub fn new(text: impl Into<String>) -> SymbolResult<Self> {
        let text = text.into();
        check_grammar(&text)?;
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn starts_with_underscore(&self) -> bool {
        self.0.starts_with('_')
    }

    pub(crate) fn ends_with_underscore(&self) -> bool {
        self.0.ends_with('_')
    }
}

fn check_grammar(text: &str) -> SymbolResult<()> {
    let Some(first) = text.chars().next() else {
        return Err(SymbolError::invalid(text, SegmentFault::Empty));
    };
    if text.contains(SEPARATOR) {
        return Err(SymbolError::invalid(text, SegmentFault::ContainsSeparator));
    }
    if let Some(bad) = text
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
    {
        return Err(SymbolError::invalid(text, SegmentFault::InvalidChar(bad)));
    }
    if first.is_ascii_digit() {
        return Err(SymbolError::invalid(text, SegmentFault::LeadingDigit));
    }
    Ok(())
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Segment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Segment {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Segment {
    type Error = SymbolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Segment> for String {
    fn from(segment: Segment) -> Self {
        segment.0
    }
}
