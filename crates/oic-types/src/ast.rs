//! Declaration AST produced by the parser.
//!
//! The AST keeps the declaration surface exactly as written: symbol names are
//! raw text and types are rendered token text. Decoding and resolution happen
//! later, in the binder.

use crate::Span;
use serde::{Deserialize, Serialize};

/// An identifier with its source location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Every recognised top-level item of one compiled unit, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceUnit {
    pub items: Vec<Item>,
    pub span: Span,
}

impl SourceUnit {
    /// Iterate over the foreign function declarations.
    pub fn externs(&self) -> impl Iterator<Item = &ExternDecl> {
        self.items.iter().filter_map(|item| match item {
            Item::Extern(decl) => Some(decl),
            Item::ModuleMetadata(_) => None,
        })
    }

    /// Iterate over the module descriptor instances.
    pub fn metadata(&self) -> impl Iterator<Item = &MetadataDecl> {
        self.items.iter().filter_map(|item| match item {
            Item::ModuleMetadata(decl) => Some(decl),
            Item::Extern(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    Extern(ExternDecl),
    ModuleMetadata(MetadataDecl),
}

/// How the symbol of an [`ExternDecl`] was spelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SymbolSpelling {
    /// `extern void OCRuntime__PixelBindings__FillRect(...);`
    Flat(Ident),
    /// `EXTERN_FN(OCRuntime__PixelBindings, void, FillRect, ...);`
    Split { namespace: Ident, method: Ident },
}

impl SymbolSpelling {
    /// The symbol text as the linker would see it.
    pub fn flat_text(&self) -> String {
        match self {
            Self::Flat(ident) => ident.name.clone(),
            Self::Split { namespace, method } => format!("{}__{}", namespace.name, method.name),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Flat(ident) => ident.span,
            Self::Split { namespace, method } => namespace.span.merge(method.span),
        }
    }
}

/// A foreign function declaration as written in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternDecl {
    pub symbol: SymbolSpelling,
    /// Rendered return type, e.g. `void` or `const char*`.
    pub ret: String,
    pub params: Vec<Param>,
    /// Trailing `...` in the parameter list.
    pub variadic: bool,
    pub span: Span,
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub ty: String,
    pub name: Option<String>,
    pub span: Span,
}

/// A `struct MODULE_METADATA <ident> = { ... };` instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataDecl {
    /// The variable name the descriptor is bound to.
    pub binding: Ident,
    pub fields: MetadataFields,
    pub span: Span,
}

/// Initializer of a descriptor instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", content = "values", rename_all = "snake_case")]
pub enum MetadataFields {
    /// `{ "name", "version", "author" }`
    Positional(Vec<String>),
    /// `{ .name = "...", .version = "...", .author = "..." }`
    Designated(Vec<(Ident, String)>),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp() -> Span {
        Span::point(1, 1)
    }

    #[test]
    fn test_flat_spelling_text() {
        let s = SymbolSpelling::Flat(Ident::new("OCRuntime__PixelBindings__Clear", sp()));
        assert_eq!(s.flat_text(), "OCRuntime__PixelBindings__Clear");
    }

    #[test]
    fn test_split_spelling_joins_with_separator() {
        let s = SymbolSpelling::Split {
            namespace: Ident::new("OCRuntime__PixelBindings", Span::new(1, 11, 1, 34)),
            method: Ident::new("SetPixel", Span::new(1, 43, 1, 50)),
        };
        assert_eq!(s.flat_text(), "OCRuntime__PixelBindings__SetPixel");
        assert_eq!(s.span(), Span::new(1, 11, 1, 50));
    }

    #[test]
    fn test_unit_item_filters() {
        let unit = SourceUnit {
            items: vec![
                Item::Extern(ExternDecl {
                    symbol: SymbolSpelling::Flat(Ident::new("A__B", sp())),
                    ret: "void".into(),
                    params: vec![],
                    variadic: false,
                    span: sp(),
                }),
                Item::ModuleMetadata(MetadataDecl {
                    binding: Ident::new("MODULE_METADATA", sp()),
                    fields: MetadataFields::Positional(vec!["M".into(), "1.0.0".into(), "".into()]),
                    span: sp(),
                }),
            ],
            span: sp(),
        };
        assert_eq!(unit.externs().count(), 1);
        assert_eq!(unit.metadata().count(), 1);
    }
}
