//! OIC binder as a WASM module for browser environments.
//!
//! This crate exposes the symbol codec and the binding pipeline via
//! `wasm-bindgen`. Every function returns a JSON string.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { encode, decode, bind } from 'oic-wasm';
//!
//! await init();
//!
//! JSON.parse(encode("OCRuntime.PixelBindings.FillRect"));
//! // { ok: true, symbol: "OCRuntime__PixelBindings__FillRect", ... }
//!
//! JSON.parse(bind(source, "pixels.h"));
//! // { success: true, unit: { artifact_name: "MyModule-1.0.0.oic", ... }, errors: { ... } }
//! ```

use oic_symbol::{QualifiedName, SymbolError};
use oic_types::ErrorCode;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Outcome of a codec call.
#[derive(Serialize)]
#[serde(untagged)]
enum CodecResult {
    Ok {
        ok: bool,
        symbol: String,
        dotted: String,
        namespace: Vec<String>,
        method: String,
    },
    Err {
        ok: bool,
        error: CodecError,
    },
}

#[derive(Serialize)]
struct CodecError {
    code: ErrorCode,
    message: String,
}

impl CodecResult {
    fn from_name(name: &QualifiedName) -> Self {
        CodecResult::Ok {
            ok: true,
            symbol: name.encode().to_string(),
            dotted: name.dotted(),
            namespace: name
                .namespace()
                .segments()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            method: name.method().to_string(),
        }
    }

    fn from_error(e: &SymbolError) -> Self {
        CodecResult::Err {
            ok: false,
            error: CodecError {
                code: e.code(),
                message: e.to_string(),
            },
        }
    }
}

fn codec_json(result: Result<QualifiedName, SymbolError>) -> String {
    let result = match &result {
        Ok(name) => CodecResult::from_name(name),
        Err(e) => CodecResult::from_error(e),
    };
    serde_json::to_string(&result).unwrap_or_else(|e| {
        format!(
            r#"{{"ok":false,"error":{{"code":null,"message":"Serialization error: {}"}}}}"#,
            e
        )
    })
}

/// Encode a host-notation name into its flat symbol.
///
/// Returns a JSON string:
/// ```json
/// {
///   "ok": true,
///   "symbol": "OCRuntime__PixelBindings__FillRect",
///   "dotted": "OCRuntime.PixelBindings.FillRect",
///   "namespace": ["OCRuntime", "PixelBindings"],
///   "method": "FillRect"
/// }
/// ```
///
/// On failure, `ok` is `false` and `error` carries `code` and `message`.
#[wasm_bindgen]
pub fn encode(dotted: &str) -> String {
    codec_json(QualifiedName::parse_dotted(dotted))
}

/// Decode a flat symbol into its namespace path and method.
///
/// Returns the same JSON shape as [`encode`].
#[wasm_bindgen]
pub fn decode(symbol: &str) -> String {
    codec_json(oic_symbol::decode(symbol))
}

/// Bind declaration source against the default host registry.
///
/// Returns a JSON string containing a `BindResult`:
/// ```json
/// {
///   "success": true,
///   "unit": { "unit": { ... }, "artifact_name": "MyModule-1.0.0.oic", "source_hash": "..." },
///   "errors": { "errors": [], "total_errors": 0 }
/// }
/// ```
///
/// On failure, `success` is `false`, `unit` is `null`, and `errors` contains
/// structured error information.
#[wasm_bindgen]
pub fn bind(source: &str, filename: &str) -> String {
    let result = oic_compiler::bind_to_result(source, filename);
    serde_json::to_string(&result).unwrap_or_else(|e| {
        format!(
            r#"{{"success":false,"unit":null,"errors":{{"errors":[{{"message":"Serialization error: {}"}}],"total_errors":1}}}}"#,
            e
        )
    })
}

/// Run the pipeline and return only the diagnostics.
///
/// Faster to consume than [`bind`] when only errors are needed
/// (e.g., editor integration).
#[wasm_bindgen]
pub fn check(source: &str, filename: &str) -> String {
    let errors = oic_compiler::check(source, filename);
    serde_json::to_string(&errors).unwrap_or_else(|e| {
        format!(
            r#"{{"errors":[{{"message":"Serialization error: {}"}}],"total_errors":1}}"#,
            e
        )
    })
}

/// Return the binder version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Return a C header declaring every default host member.
#[wasm_bindgen]
pub fn get_host_header() -> String {
    oic_compiler::generate_header(&oic_compiler::HostRegistry::new())
}

/// Return a structured JSON table of the default host members.
#[wasm_bindgen]
pub fn get_host_table() -> String {
    oic_compiler::generate_host_table(&oic_compiler::HostRegistry::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(s: &str) -> serde_json::Value {
        serde_json::from_str(s).unwrap()
    }

    #[test]
    fn encode_dotted_name() {
        let v = json(&encode("OCRuntime.PixelBindings.FillRect"));
        assert_eq!(v["ok"], true);
        assert_eq!(v["symbol"], "OCRuntime__PixelBindings__FillRect");
        assert_eq!(v["namespace"][1], "PixelBindings");
        assert_eq!(v["method"], "FillRect");
    }

    #[test]
    fn encode_without_namespace() {
        let v = json(&encode("FillRect"));
        assert_eq!(v["ok"], false);
        assert_eq!(v["error"]["code"], "E203");
    }

    #[test]
    fn decode_flat_symbol() {
        let v = json(&decode("OCRuntime__PixelBindings__FillRect"));
        assert_eq!(v["ok"], true);
        assert_eq!(v["dotted"], "OCRuntime.PixelBindings.FillRect");
    }

    #[test]
    fn decode_ambiguous_symbol() {
        let v = json(&decode("A___B__C"));
        assert_eq!(v["ok"], false);
        assert_eq!(v["error"]["code"], "E202");
        assert!(v["error"]["message"].as_str().unwrap().contains("A___B__C"));
    }

    #[test]
    fn bind_returns_structured_result() {
        let v = json(&bind(
            "extern void OCRuntime__PixelBindings__Clear(int64_t color);",
            "clear.c",
        ));
        assert_eq!(v["success"], true);
        assert_eq!(v["unit"]["artifact_name"], "clear.oic");
    }

    #[test]
    fn bind_failure() {
        let v = json(&bind("extern void OCRuntime__PixelBindings__Missing();", "m.c"));
        assert_eq!(v["success"], false);
        assert!(v["unit"].is_null());
        assert_eq!(v["errors"]["errors"][0]["code"], "E400");
    }

    #[test]
    fn check_returns_errors_only() {
        let v = json(&check("extern void FillRect(void);", "f.c"));
        assert_eq!(v["total_errors"], 1);
    }

    #[test]
    fn version_matches_package() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn host_listings() {
        assert!(get_host_header().contains("EXTERN_FN(OCRuntime__PixelBindings, void, Clear, int64_t color);"));
        assert_eq!(json(&get_host_table())["total_members"], 7);
    }
}
