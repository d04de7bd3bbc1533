//! The module descriptor: name, version and author of a compiled unit.

use serde::{Deserialize, Serialize};

use crate::error::{ModuleError, ModuleResult};

/// Build identity of one compiled unit.
///
/// `version` is an opaque label. A dotted numeric form such as `1.0.0` is
/// conventional but never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DescriptorFields")]
pub struct ModuleDescriptor {
    name: String,
    version: String,
    author: String,
}

impl ModuleDescriptor {
    /// Create a descriptor. `name` and `version` must be non-empty.
    pub fn declare(
        name: impl Into<String>,
        version: impl Into<String>,
        author: impl Into<String>,
    ) -> ModuleResult<Self> {
        let name = name.into();
        let version = version.into();
        if name.is_empty() {
            return Err(ModuleError::EmptyField { field: "name" });
        }
        if version.is_empty() {
            return Err(ModuleError::EmptyField { field: "version" });
        }
        Ok(Self {
            name,
            version,
            author: author.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// `<name>-<version>.<ext>`
    pub fn artifact_file_name(&self, ext: &str) -> String {
        format!("{}-{}.{}", self.name, self.version, ext)
    }
}

#[derive(Deserialize)]
struct DescriptorFields {
    name: String,
    version: String,
    #[serde(default)]
    author: String,
}

impl TryFrom<DescriptorFields> for ModuleDescriptor {
    type Error = ModuleError;

    fn try_from(fields: DescriptorFields) -> Result<Self, Self::Error> {
        Self::declare(fields.name, fields.version, fields.author)
    }
}
