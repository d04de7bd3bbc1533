//! OIC compiled-unit model.
//!
//! A compiled unit exposes foreign function declarations under encoded
//! symbols and, optionally, exactly one [`ModuleDescriptor`] the host uses to
//! name the unit's build artifact.

pub mod descriptor;
pub mod error;
pub mod unit;

pub use descriptor::ModuleDescriptor;
pub use error::{ModuleError, ModuleResult};
pub use unit::{CompiledUnit, ForeignFunction, Param, UnitBuilder};
