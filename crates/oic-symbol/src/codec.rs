//! Encoding and decoding of namespaced symbols.
//!
//! ```text
//! ["OCRuntime", "PixelBindings"] + "FillRect"  <->  OCRuntime__PixelBindings__FillRect
//! ```
//!
//! `decode` is the exact left inverse of `encode`. To keep it that way, an
//! underscore may never sit next to a separator: namespace segments must not
//! end with `_`, and every segment after the first must not start with `_`.
//! Decoding rejects any run of three or more underscores instead of picking
//! a split.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SegmentFault, SymbolError, SymbolResult};
use crate::segment::{Segment, SEPARATOR};

// ══════════════════════════════════════════════════════════════════════════════
// NamespacePath
// ══════════════════════════════════════════════════════════════════════════════

/// Ordered, non-empty sequence of namespace segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Segment>", into = "Vec<Segment>")]
pub struct NamespacePath(Vec<Segment>);

impl NamespacePath {
    /// Build a path from raw segment text.
    pub fn new<I, S>(segments: I) -> SymbolResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments = segments
            .into_iter()
            .map(|s| Segment::new(s.as_ref()))
            .collect::<SymbolResult<Vec<_>>>()?;
        Self::from_segments(segments)
    }

    /// Parse a separator-joined namespace such as `OCRuntime__PixelBindings`.
    pub fn from_joined(text: &str) -> SymbolResult<Self> {
        if text.is_empty() {
            return Err(SymbolError::EmptyNamespace);
        }
        check_underscore_runs(text)?;
        Self::new(text.split(SEPARATOR))
    }

    fn from_segments(segments: Vec<Segment>) -> SymbolResult<Self> {
        if segments.is_empty() {
            return Err(SymbolError::EmptyNamespace);
        }
        for (i, segment) in segments.iter().enumerate() {
            // Every namespace segment is followed by at least the method.
            if segment.ends_with_underscore() || (i > 0 && segment.starts_with_underscore()) {
                return Err(SymbolError::invalid(
                    segment.as_str(),
                    SegmentFault::AdjoinsSeparator,
                ));
            }
        }
        Ok(Self(segments))
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a constructed path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `OCRuntime__PixelBindings`
    pub fn joined(&self) -> String {
        self.join(SEPARATOR)
    }

    /// `OCRuntime.PixelBindings`
    pub fn dotted(&self) -> String {
        self.join(".")
    }

    fn join(&self, sep: &str) -> String {
        self.0
            .iter()
            .map(Segment::as_str)
            .collect::<Vec<_>>()
            .join(sep)
    }
}

impl TryFrom<Vec<Segment>> for NamespacePath {
    type Error = SymbolError;

    fn try_from(value: Vec<Segment>) -> Result<Self, Self::Error> {
        Self::from_segments(value)
    }
}

impl From<NamespacePath> for Vec<Segment> {
    fn from(path: NamespacePath) -> Self {
        path.0
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// QualifiedName
// ══════════════════════════════════════════════════════════════════════════════

/// A decoded symbol: namespace path plus method name.
///
/// Serialized in host notation (`OCRuntime.PixelBindings.FillRect`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QualifiedName {
    namespace: NamespacePath,
    method: Segment,
}

impl QualifiedName {
    pub fn new(namespace: NamespacePath, method: Segment) -> SymbolResult<Self> {
        if method.starts_with_underscore() {
            return Err(SymbolError::invalid(
                method.as_str(),
                SegmentFault::AdjoinsSeparator,
            ));
        }
        Ok(Self { namespace, method })
    }

    /// Parse host notation: dot-separated segments, method last.
    pub fn parse_dotted(text: &str) -> SymbolResult<Self> {
        let mut parts: Vec<&str> = text.split('.').collect();
        let method = match parts.pop() {
            Some(method) if !parts.is_empty() => method,
            _ => {
                return Err(SymbolError::MissingNamespace {
                    symbol: text.to_string(),
                })
            }
        };
        let namespace = NamespacePath::new(parts)?;
        Self::new(namespace, Segment::new(method)?)
    }

    pub fn namespace(&self) -> &NamespacePath {
        &self.namespace
    }

    pub fn method(&self) -> &Segment {
        &self.method
    }

    pub fn encode(&self) -> EncodedSymbol {
        EncodedSymbol(format!(
            "{}{SEPARATOR}{}",
            self.namespace.joined(),
            self.method
        ))
    }

    pub fn dotted(&self) -> String {
        format!("{}.{}", self.namespace.dotted(), self.method)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted())
    }
}

impl TryFrom<String> for QualifiedName {
    type Error = SymbolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_dotted(&value)
    }
}

impl From<QualifiedName> for String {
    fn from(name: QualifiedName) -> Self {
        name.dotted()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// EncodedSymbol
// ══════════════════════════════════════════════════════════════════════════════

/// A flat linkage name that is known to decode cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EncodedSymbol(String);

impl EncodedSymbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn decode(&self) -> SymbolResult<QualifiedName> {
        decode(&self.0)
    }
}

impl fmt::Display for EncodedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EncodedSymbol {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s).map(|name| name.encode())
    }
}

impl TryFrom<String> for EncodedSymbol {
    type Error = SymbolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EncodedSymbol> for String {
    fn from(symbol: EncodedSymbol) -> Self {
        symbol.0
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// encode / decode
// ══════════════════════════════════════════════════════════════════════════════

/// Join `namespace` and `method` into one flat symbol.
pub fn encode<S: AsRef<str>>(namespace: &[S], method: &str) -> SymbolResult<EncodedSymbol> {
    let namespace = NamespacePath::new(namespace)?;
    let method = Segment::new(method)?;
    Ok(QualifiedName::new(namespace, method)?.encode())
}

/// Split a flat symbol back into its namespace path and method.
pub fn decode(symbol: &str) -> SymbolResult<QualifiedName> {
    check_underscore_runs(symbol)?;
    let mut pieces: Vec<&str> = symbol.split(SEPARATOR).collect();
    let method = match pieces.pop() {
        Some(method) if !pieces.is_empty() => method,
        _ => {
            return Err(SymbolError::MissingNamespace {
                symbol: symbol.to_string(),
            })
        }
    };
    let namespace = NamespacePath::new(pieces)?;
    QualifiedName::new(namespace, Segment::new(method)?)
}

/// Reject any run of three or more consecutive underscores.
fn check_underscore_runs(symbol: &str) -> SymbolResult<()> {
    let bytes = symbol.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'_' {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i] == b'_' {
            i += 1;
        }
        let run = i - start;
        if run >= 3 {
            return Err(SymbolError::AmbiguousSeparator {
                symbol: symbol.to_string(),
                offset: start,
                run,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underscore_runs_report_first_offending_run() {
        match check_underscore_runs("A__B____C___D") {
            Err(SymbolError::AmbiguousSeparator { offset, run, .. }) => {
                assert_eq!(offset, 4);
                assert_eq!(run, 4);
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(check_underscore_runs("_A__B_").is_ok());
    }

    #[test]
    fn namespace_path_rejects_trailing_underscore() {
        assert_eq!(
            NamespacePath::new(["Pixel_"]),
            Err(SymbolError::InvalidSegment {
                segment: "Pixel_".into(),
                fault: SegmentFault::AdjoinsSeparator,
            })
        );
    }

    #[test]
    fn namespace_path_allows_leading_underscore_on_first_segment_only() {
        assert!(NamespacePath::new(["_Internal", "Bindings"]).is_ok());
        assert!(NamespacePath::new(["Runtime", "_Bindings"]).is_err());
    }

    #[test]
    fn method_may_end_but_not_start_with_underscore() {
        let ns = NamespacePath::new(["Audio"]).unwrap();
        assert!(QualifiedName::new(ns.clone(), Segment::new("Play_").unwrap()).is_ok());
        assert!(QualifiedName::new(ns, Segment::new("_Play").unwrap()).is_err());
    }

    #[test]
    fn from_joined_matches_decode_rules() {
        let ns = NamespacePath::from_joined("OCRuntime__PixelBindings").unwrap();
        assert_eq!(ns.len(), 2);
        assert_eq!(ns.dotted(), "OCRuntime.PixelBindings");
        assert_eq!(NamespacePath::from_joined(""), Err(SymbolError::EmptyNamespace));
        assert!(matches!(
            NamespacePath::from_joined("A___B"),
            Err(SymbolError::AmbiguousSeparator { .. })
        ));
        assert!(matches!(
            NamespacePath::from_joined("A__"),
            Err(SymbolError::InvalidSegment {
                fault: SegmentFault::Empty,
                ..
            })
        ));
    }

    #[test]
    fn display_uses_host_notation() {
        let name = decode("OCRuntime__PixelBindings__Clear").unwrap();
        assert_eq!(name.to_string(), "OCRuntime.PixelBindings.Clear");
        assert_eq!(name.encode().to_string(), "OCRuntime__PixelBindings__Clear");
    }
}
