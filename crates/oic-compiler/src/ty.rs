//! Host-side types for registered members.
//!
//! [`HostType`] is what the host marshals a value as. It is distinct from the
//! declared C type text in [`oic_types::ast::Param`], which is carried through
//! unchanged and never checked against it.

use std::fmt;

use serde::{Deserialize, Serialize};

// ══════════════════════════════════════════════════════════════════════════════
// HostType
// ══════════════════════════════════════════════════════════════════════════════

/// A value type understood by the host runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostType {
    /// No value.
    Void,
    /// 64-bit signed integer.
    I64,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
    /// NUL-terminated string.
    String,
}

impl HostType {
    /// The C spelling used when generating declarations for this type.
    pub fn c_type(self) -> &'static str {
        match self {
            HostType::Void => "void",
            HostType::I64 => "int64_t",
            HostType::F32 => "float",
            HostType::F64 => "double",
            HostType::String => "const char*",
        }
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostType::Void => write!(f, "void"),
            HostType::I64 => write!(f, "i64"),
            HostType::F32 => write!(f, "f32"),
            HostType::F64 => write!(f, "f64"),
            HostType::String => write!(f, "string"),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// HostSig
// ══════════════════════════════════════════════════════════════════════════════

/// A host member signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSig {
    pub params: Vec<(String, HostType)>,
    pub ret: HostType,
}

impl HostSig {
    pub fn new(params: Vec<(&str, HostType)>, ret: HostType) -> Self {
        Self {
            params: params
                .into_iter()
                .map(|(n, t)| (n.to_string(), t))
                .collect(),
            ret,
        }
    }

    /// Number of parameters the host expects.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for HostSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, (name, ty)) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {ty}")?;
        }
        write!(f, ") -> {}", self.ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sig_display() {
        let sig = HostSig::new(
            vec![("soundName", HostType::String), ("volume", HostType::F32)],
            HostType::Void,
        );
        assert_eq!(sig.to_string(), "(soundName: string, volume: f32) -> void");
        assert_eq!(sig.arity(), 2);
    }

    #[test]
    fn test_empty_sig_display() {
        let sig = HostSig::new(vec![], HostType::Void);
        assert_eq!(sig.to_string(), "() -> void");
    }

    #[test]
    fn test_c_types() {
        assert_eq!(HostType::I64.c_type(), "int64_t");
        assert_eq!(HostType::String.c_type(), "const char*");
    }

    #[test]
    fn test_host_type_json() {
        assert_eq!(serde_json::to_string(&HostType::F64).unwrap(), "\"f64\"");
        let back: HostType = serde_json::from_str("\"string\"").unwrap();
        assert_eq!(back, HostType::String);
    }
}
