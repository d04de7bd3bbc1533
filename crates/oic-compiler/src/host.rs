//! Host member registry.
//!
//! Maps a dotted namespace (`OCRuntime.PixelBindings`) to its members and
//! their signatures, so the binder can resolve decoded declarations.

use std::collections::BTreeMap;

use oic_symbol::{QualifiedName, SymbolResult};

use crate::ty::{HostSig, HostType};

/// Namespace carrying the pixel, sound and synth bindings.
pub const PIXEL_BINDINGS: &str = "OCRuntime.PixelBindings";

/// A registered member: its validated name and signature.
#[derive(Debug, Clone, PartialEq)]
pub struct HostMember {
    pub name: QualifiedName,
    pub sig: HostSig,
}

/// Registry mapping `(namespace, method)` → host signature.
///
/// Ordered maps keep listings and suggestions stable.
#[derive(Debug, Clone, Default)]
pub struct HostRegistry {
    namespaces: BTreeMap<String, BTreeMap<String, HostMember>>,
}

impl HostRegistry {
    /// Create a registry with the default host bindings.
    pub fn new() -> Self {
        let mut reg = Self::empty();
        reg.register_pixel_bindings().unwrap_or_default();
        reg
    }

    /// Create a registry with no members.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register a member under a dotted namespace. The name must survive an
    /// encode/decode round trip, so segments that would merge with a `__`
    /// separator are rejected. A later registration of the same name
    /// replaces the earlier one.
    pub fn register(
        &mut self,
        namespace: &str,
        method: &str,
        sig: HostSig,
    ) -> SymbolResult<QualifiedName> {
        let name = QualifiedName::parse_dotted(&format!("{namespace}.{method}"))?;
        self.namespaces
            .entry(name.namespace().dotted())
            .or_default()
            .insert(
                name.method().to_string(),
                HostMember {
                    name: name.clone(),
                    sig,
                },
            );
        Ok(name)
    }

    /// Look up a member by its decoded name.
    pub fn get(&self, name: &QualifiedName) -> Option<&HostSig> {
        self.lookup(&name.namespace().dotted(), name.method().as_str())
    }

    /// Look up a member by dotted namespace and method name.
    pub fn lookup(&self, namespace: &str, method: &str) -> Option<&HostSig> {
        self.namespaces
            .get(namespace)?
            .get(method)
            .map(|member| &member.sig)
    }

    /// Check if a namespace has any registered members.
    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.namespaces.contains_key(namespace)
    }

    /// Member names of a namespace, sorted.
    pub fn methods(&self, namespace: &str) -> Vec<&str> {
        self.namespaces
            .get(namespace)
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Iterate over all namespaces and their members, sorted by name.
    pub fn namespaces(&self) -> &BTreeMap<String, BTreeMap<String, HostMember>> {
        &self.namespaces
    }

    /// Total number of registered members.
    pub fn len(&self) -> usize {
        self.namespaces.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ══════════════════════════════════════════════════════════════════════
    // Default bindings
    // ══════════════════════════════════════════════════════════════════════

    /// OCRuntime.PixelBindings: 7 members
    fn register_pixel_bindings(&mut self) -> SymbolResult<()> {
        use HostType::*;
        let ns = PIXEL_BINDINGS;
        self.register(
            ns,
            "FillRect",
            HostSig::new(
                vec![("x", I64), ("y", I64), ("w", I64), ("h", I64), ("color", I64)],
                Void,
            ),
        )?;
        self.register(
            ns,
            "SetPixel",
            HostSig::new(vec![("x", I64), ("y", I64), ("color", I64)], Void),
        )?;
        self.register(ns, "Clear", HostSig::new(vec![("color", I64)], Void))?;
        self.register(
            ns,
            "RectFill",
            HostSig::new(
                vec![("x", F32), ("y", F32), ("w", F32), ("h", F32), ("color", I64)],
                Void,
            ),
        )?;
        self.register(
            ns,
            "PlayOneShot",
            HostSig::new(vec![("soundName", String), ("volume", F32)], Void),
        )?;
        self.register(ns, "ButtonClick", HostSig::new(vec![], Void))?;
        self.register(
            ns,
            "SynthPlay",
            HostSig::new(vec![("frequency", I64), ("duration", F64)], Void),
        )?;
        Ok(())
    }
}
