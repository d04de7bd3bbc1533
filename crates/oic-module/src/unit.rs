//! Compiled units and the builder that enforces their invariants.
//!
//! A unit carries any number of foreign function declarations, each encoded
//! symbol at most once, and at most one [`ModuleDescriptor`].

use std::collections::HashSet;

use oic_symbol::{EncodedSymbol, QualifiedName};
use serde::{Deserialize, Serialize};

use crate::descriptor::ModuleDescriptor;
use crate::error::{ModuleError, ModuleResult};

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub ty: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
}

impl Param {
    pub fn new(ty: impl Into<String>, name: Option<String>) -> Self {
        Self {
            ty: ty.into(),
            name,
        }
    }
}

/// An externally callable entry point.
///
/// `symbol` is always `target.encode()`. On deserialization it is derived
/// from `target`; a stored `symbol` that disagrees is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FunctionFields")]
pub struct ForeignFunction {
    pub symbol: EncodedSymbol,
    /// Host member the symbol decodes to.
    pub target: QualifiedName,
    pub ret: String,
    pub params: Vec<Param>,
    #[serde(default)]
    pub variadic: bool,
}

impl ForeignFunction {
    pub fn new(target: QualifiedName, ret: impl Into<String>, params: Vec<Param>) -> Self {
        Self {
            symbol: target.encode(),
            target,
            ret: ret.into(),
            params,
            variadic: false,
        }
    }

    pub fn variadic(mut self, variadic: bool) -> Self {
        self.variadic = variadic;
        self
    }

    /// `void OCRuntime__PixelBindings__Clear(int64_t color)`
    pub fn signature(&self) -> String {
        let mut params: Vec<String> = self
            .params
            .iter()
            .map(|p| match &p.name {
                Some(name) => format!("{} {}", p.ty, name),
                None => p.ty.clone(),
            })
            .collect();
        if self.variadic {
            params.push("...".to_string());
        }
        format!("{} {}({})", self.ret, self.symbol, params.join(", "))
    }
}

#[derive(Deserialize)]
struct FunctionFields {
    #[serde(default)]
    symbol: Option<EncodedSymbol>,
    target: QualifiedName,
    ret: String,
    #[serde(default)]
    params: Vec<Param>,
    #[serde(default)]
    variadic: bool,
}

impl TryFrom<FunctionFields> for ForeignFunction {
    type Error = ModuleError;

    fn try_from(fields: FunctionFields) -> Result<Self, Self::Error> {
        let function = Self::new(fields.target, fields.ret, fields.params).variadic(fields.variadic);
        match fields.symbol {
            Some(symbol) if symbol != function.symbol => Err(ModuleError::SymbolMismatch {
                symbol,
                target: function.target,
            }),
            _ => Ok(function),
        }
    }
}

/// A fully assembled compiled unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledUnit {
    pub name: String,
    pub functions: Vec<ForeignFunction>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub descriptor: Option<ModuleDescriptor>,
}

impl CompiledUnit {
    /// Artifact file name: from the descriptor when present, otherwise from
    /// the unit name.
    pub fn artifact_file_name(&self, ext: &str) -> String {
        match &self.descriptor {
            Some(descriptor) => descriptor.artifact_file_name(ext),
            None => format!("{}.{}", self.name, ext),
        }
    }
}

/// Incrementally assembles a [`CompiledUnit`].
#[derive(Debug)]
pub struct UnitBuilder {
    name: String,
    functions: Vec<ForeignFunction>,
    seen: HashSet<EncodedSymbol>,
    descriptor: Option<ModuleDescriptor>,
}

impl UnitBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: Vec::new(),
            seen: HashSet::new(),
            descriptor: None,
        }
    }

    /// Attach the unit's descriptor. A second call is rejected and the first
    /// descriptor is kept.
    pub fn declare_module(&mut self, descriptor: ModuleDescriptor) -> ModuleResult<()> {
        if let Some(first) = &self.descriptor {
            return Err(ModuleError::DuplicateModuleDescriptor {
                first: first.name().to_string(),
                second: descriptor.name().to_string(),
            });
        }
        self.descriptor = Some(descriptor);
        Ok(())
    }

    pub fn declare_extern(&mut self, function: ForeignFunction) -> ModuleResult<()> {
        if !self.seen.insert(function.symbol.clone()) {
            return Err(ModuleError::DuplicateDeclaration {
                symbol: function.symbol,
            });
        }
        self.functions.push(function);
        Ok(())
    }

    pub fn build(self) -> CompiledUnit {
        CompiledUnit {
            name: self.name,
            functions: self.functions,
            descriptor: self.descriptor,
        }
    }
}
