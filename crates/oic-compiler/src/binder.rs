//! Host binder: resolves parsed declarations against the host registry.
//!
//! Entry point: [`Binder::bind`].
//!
//! Error codes emitted:
//! - E200–E203: symbol does not decode
//! - E300: second module descriptor
//! - E301: invalid module descriptor
//! - E302: same symbol declared twice
//! - E400: no host member for the decoded name
//! - E401: parameter count differs from the host member's

use oic_module::{CompiledUnit, ForeignFunction, ModuleDescriptor, ModuleError, Param, UnitBuilder};
use oic_symbol::{NamespacePath, QualifiedName, Segment, SymbolResult};
use oic_types::ast::*;
use oic_types::{CompileErrors, ErrorCode, OicError, SourceFile, Span};
use tracing::debug;

use crate::config::BindOptions;
use crate::host::HostRegistry;

// ══════════════════════════════════════════════════════════════════════════════
// Binder
// ══════════════════════════════════════════════════════════════════════════════

/// Walks a parsed [`SourceUnit`] and assembles a [`CompiledUnit`].
pub struct Binder<'a> {
    errors: &'a mut CompileErrors,
    source: &'a SourceFile,
    registry: &'a HostRegistry,
    options: &'a BindOptions,
    builder: UnitBuilder,
}

impl<'a> Binder<'a> {
    /// Create a binder for one source file. The unit is named after the
    /// file stem.
    pub fn new(
        errors: &'a mut CompileErrors,
        source: &'a SourceFile,
        registry: &'a HostRegistry,
        options: &'a BindOptions,
    ) -> Self {
        Self {
            errors,
            source,
            registry,
            options,
            builder: UnitBuilder::new(source.stem()),
        }
    }

    /// Bind every item in source order. The returned unit holds whatever
    /// bound cleanly; callers must check the error collection.
    pub fn bind(mut self, unit: &SourceUnit) -> CompiledUnit {
        for item in &unit.items {
            if self.errors.is_full() {
                break;
            }
            match item {
                Item::Extern(decl) => self.bind_extern(decl),
                Item::ModuleMetadata(decl) => self.bind_metadata(decl),
            }
        }
        self.builder.build()
    }

    // ══════════════════════════════════════════════════════════════════════
    // Foreign functions
    // ══════════════════════════════════════════════════════════════════════

    fn bind_extern(&mut self, decl: &ExternDecl) {
        let span = decl.symbol.span();
        let target = match resolve_spelling(&decl.symbol) {
            Ok(target) => target,
            Err(e) => {
                self.error(
                    e.code(),
                    format!("cannot decode '{}': {e}", decl.symbol.flat_text()),
                    span,
                );
                return;
            }
        };

        let registry = self.registry;
        let Some(sig) = registry.get(&target) else {
            let namespace = target.namespace().dotted();
            let message = format!("no host member '{target}'");
            let suggestion = if registry.has_namespace(&namespace) {
                format!(
                    "'{namespace}' provides: {}",
                    registry.methods(&namespace).join(", ")
                )
            } else {
                format!("no host namespace '{namespace}' is registered")
            };
            self.error_with_suggestion(ErrorCode::UNRESOLVED_SYMBOL, message, span, suggestion);
            return;
        };

        if self.options.check_arity && !decl.variadic && decl.params.len() != sig.arity() {
            self.error_with_suggestion(
                ErrorCode::ARITY_MISMATCH,
                format!(
                    "'{target}' takes {} parameter(s) but is declared with {}",
                    sig.arity(),
                    decl.params.len()
                ),
                decl.span,
                format!("host signature is {sig}"),
            );
            return;
        }

        let params = decl
            .params
            .iter()
            .map(|p| Param::new(p.ty.clone(), p.name.clone()))
            .collect();
        let function = ForeignFunction::new(target, decl.ret.clone(), params).variadic(decl.variadic);
        debug!(symbol = %function.symbol, target = %function.target, "bound foreign function");

        if let Err(e) = self.builder.declare_extern(function) {
            self.error(e.code(), e.to_string(), span);
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Module descriptor
    // ══════════════════════════════════════════════════════════════════════

    fn bind_metadata(&mut self, decl: &MetadataDecl) {
        let descriptor = match self.descriptor_from_fields(&decl.fields, decl.span) {
            Some(Ok(descriptor)) => descriptor,
            Some(Err(e)) => {
                self.error(e.code(), e.to_string(), decl.span);
                return;
            }
            None => return,
        };

        debug!(
            name = descriptor.name(),
            version = descriptor.version(),
            "module descriptor"
        );
        if let Err(e) = self.builder.declare_module(descriptor) {
            self.error_with_suggestion(
                e.code(),
                e.to_string(),
                decl.span,
                "a unit carries at most one MODULE_METADATA instance",
            );
        }
    }

    /// Returns `None` when the field layout itself was reported as invalid.
    fn descriptor_from_fields(
        &mut self,
        fields: &MetadataFields,
        span: Span,
    ) -> Option<Result<ModuleDescriptor, ModuleError>> {
        match fields {
            MetadataFields::Positional(values) => match values.as_slice() {
                [name, version] => Some(ModuleDescriptor::declare(name, version, "")),
                [name, version, author] => Some(ModuleDescriptor::declare(name, version, author)),
                _ => {
                    self.error_with_suggestion(
                        ErrorCode::INVALID_MODULE_DESCRIPTOR,
                        format!(
                            "module descriptor takes 2 or 3 fields, found {}",
                            values.len()
                        ),
                        span,
                        "{ \"name\", \"version\", \"author\" }",
                    );
                    None
                }
            },
            MetadataFields::Designated(values) => {
                let mut name = None;
                let mut version = None;
                let mut author = None;
                for (field, value) in values {
                    let slot = match field.name.as_str() {
                        "name" => &mut name,
                        "version" => &mut version,
                        "author" => &mut author,
                        other => {
                            self.error(
                                ErrorCode::INVALID_MODULE_DESCRIPTOR,
                                format!("unknown module descriptor field '{other}'"),
                                field.span,
                            );
                            return None;
                        }
                    };
                    if slot.replace(value.as_str()).is_some() {
                        self.error(
                            ErrorCode::INVALID_MODULE_DESCRIPTOR,
                            format!("module descriptor field '{}' set twice", field.name),
                            field.span,
                        );
                        return None;
                    }
                }
                Some(ModuleDescriptor::declare(
                    name.unwrap_or_default(),
                    version.unwrap_or_default(),
                    author.unwrap_or_default(),
                ))
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Error reporting
    // ══════════════════════════════════════════════════════════════════════

    fn diagnostic(&self, code: ErrorCode, message: String, span: Span) -> OicError {
        let source_line = self
            .source
            .line(span.start_line)
            .unwrap_or("")
            .to_string();
        OicError::new(&self.source.name, code, message, span, source_line)
    }

    fn error(&mut self, code: ErrorCode, message: String, span: Span) {
        let error = self.diagnostic(code, message, span);
        self.errors.push_error(error);
    }

    fn error_with_suggestion(
        &mut self,
        code: ErrorCode,
        message: String,
        span: Span,
        suggestion: impl Into<String>,
    ) {
        let error = self.diagnostic(code, message, span).with_suggestion(suggestion);
        self.errors.push_error(error);
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// Decode a declaration's symbol. The helper form validates its namespace
/// and method separately, so a method containing `__` is rejected rather
/// than silently re-split.
fn resolve_spelling(spelling: &SymbolSpelling) -> SymbolResult<QualifiedName> {
    match spelling {
        SymbolSpelling::Flat(ident) => oic_symbol::decode(&ident.name),
        SymbolSpelling::Split { namespace, method } => {
            let namespace = NamespacePath::from_joined(&namespace.name)?;
            QualifiedName::new(namespace, Segment::new(method.name.as_str())?)
        }
    }
}
