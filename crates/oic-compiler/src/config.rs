//! Bind options.

use serde::{Deserialize, Serialize};

/// Default artifact file extension.
pub const DEFAULT_ARTIFACT_EXTENSION: &str = "oic";

/// Options controlling a bind run.
///
/// Every field has a default, so a partial JSON object such as
/// `{"check_arity": false}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindOptions {
    /// Extension of the artifact file name, without the dot.
    pub artifact_extension: String,
    /// Report `E401` when a declaration's parameter count differs from the
    /// host member's.
    pub check_arity: bool,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            artifact_extension: DEFAULT_ARTIFACT_EXTENSION.to_string(),
            check_arity: true,
        }
    }
}

impl BindOptions {
    /// Parse options from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
