//! Generated host API listings.
//!
//! Produces two text artifacts from a [`HostRegistry`]:
//! 1. **C header** declaring every member with `EXTERN_FN`, ready to include
//! 2. **Host table** (JSON) for tooling and documentation
//!
//! Both are generated from the registry and stay in sync with it.

use serde::Serialize;

use crate::host::HostRegistry;
use crate::ty::HostType;

// ══════════════════════════════════════════════════════════════════════════════
// C header
// ══════════════════════════════════════════════════════════════════════════════

const HEADER_PREAMBLE: &str = r#"/* Generated host declarations. */

#ifndef OIC_HOST_H
#define OIC_HOST_H

#include <stdint.h>

#define EXTERN_METHOD(ns, name) ns##__##name
#define EXTERN_FN(ns, ret, name, ...) extern ret EXTERN_METHOD(ns, name)(__VA_ARGS__)
"#;

const HEADER_POSTAMBLE: &str = "\n#endif /* OIC_HOST_H */\n";

/// Generate a C header declaring every registered member.
///
/// Namespaces and members appear in sorted order. Binding the generated
/// header against the same registry succeeds.
pub fn generate_header(registry: &HostRegistry) -> String {
    let mut out = String::from(HEADER_PREAMBLE);
    for (namespace, members) in registry.namespaces() {
        out.push_str(&format!("\n/* {namespace} */\n"));
        for member in members.values() {
            let sig = &member.sig;
            let mut args = vec![
                member.name.namespace().joined(),
                sig.ret.c_type().to_string(),
                member.name.method().to_string(),
            ];
            args.extend(
                sig.params
                    .iter()
                    .map(|(name, ty)| format!("{} {name}", ty.c_type())),
            );
            out.push_str(&format!("EXTERN_FN({});\n", args.join(", ")));
        }
    }
    out.push_str(HEADER_POSTAMBLE);
    out
}

// ══════════════════════════════════════════════════════════════════════════════
// Host table
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Serialize)]
struct HostTable<'a> {
    total_members: usize,
    namespaces: Vec<NamespaceEntry<'a>>,
}

#[derive(Serialize)]
struct NamespaceEntry<'a> {
    name: &'a str,
    members: Vec<MemberEntry<'a>>,
}

#[derive(Serialize)]
struct MemberEntry<'a> {
    name: &'a str,
    symbol: String,
    signature: String,
    params: Vec<ParamEntry<'a>>,
    ret: HostType,
}

#[derive(Serialize)]
struct ParamEntry<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    ty: HostType,
}

/// Generate the host table as pretty-printed JSON.
pub fn generate_host_table(registry: &HostRegistry) -> String {
    let namespaces = registry
        .namespaces()
        .iter()
        .map(|(namespace, members)| NamespaceEntry {
            name: namespace,
            members: members
                .iter()
                .map(|(method, member)| MemberEntry {
                    name: method,
                    symbol: member.name.encode().to_string(),
                    signature: member.sig.to_string(),
                    params: member
                        .sig
                        .params
                        .iter()
                        .map(|(name, ty)| ParamEntry { name, ty: *ty })
                        .collect(),
                    ret: member.sig.ret,
                })
                .collect(),
        })
        .collect();
    let table = HostTable {
        total_members: registry.len(),
        namespaces,
    };
    // Plain data with string keys; serialization cannot fail.
    serde_json::to_string_pretty(&table).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::HostSig;

    #[test]
    fn test_header_lists_every_member() {
        let header = generate_header(&HostRegistry::new());
        assert_eq!(header.matches("\nEXTERN_FN(").count(), 7);
        assert!(header.contains(
            "EXTERN_FN(OCRuntime__PixelBindings, void, PlayOneShot, const char* soundName, float volume);"
        ));
        assert!(header.contains("EXTERN_FN(OCRuntime__PixelBindings, void, ButtonClick);"));
        assert!(header.ends_with("#endif /* OIC_HOST_H */\n"));
    }

    #[test]
    fn test_header_for_empty_registry() {
        let header = generate_header(&HostRegistry::empty());
        assert!(!header.contains("EXTERN_FN(O"));
    }

    #[test]
    fn test_host_table_json() {
        let json = generate_host_table(&HostRegistry::new());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_members"], 7);
        let ns = &value["namespaces"][0];
        assert_eq!(ns["name"], "OCRuntime.PixelBindings");
        let first = &ns["members"][0];
        assert_eq!(first["name"], "ButtonClick");
        assert_eq!(first["symbol"], "OCRuntime__PixelBindings__ButtonClick");
        assert_eq!(first["signature"], "() -> void");
        assert_eq!(ns["members"][1]["params"][0]["type"], "i64");
    }

    #[test]
    fn test_symbols_come_from_the_codec() {
        let mut reg = HostRegistry::empty();
        reg.register("_Audio.Mixer", "Stop_", HostSig::new(vec![], HostType::Void))
            .unwrap();

        let header = generate_header(&reg);
        assert!(header.contains("EXTERN_FN(_Audio__Mixer, void, Stop_);"));

        let value: serde_json::Value =
            serde_json::from_str(&generate_host_table(&reg)).unwrap();
        let symbol = value["namespaces"][0]["members"][0]["symbol"].as_str().unwrap();
        assert_eq!(symbol, "_Audio__Mixer__Stop_");
        assert_eq!(
            oic_symbol::decode(symbol).unwrap().dotted(),
            "_Audio.Mixer.Stop_"
        );
    }

    #[test]
    fn test_host_table_deterministic() {
        let reg = HostRegistry::new();
        let first = generate_host_table(&reg);
        for _ in 0..10 {
            assert_eq!(generate_host_table(&reg), first);
        }
    }
}
