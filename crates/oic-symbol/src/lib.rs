//! OIC symbol codec: maps a namespaced host member onto one flat linkage
//! name and back.
//!
//! ```
//! use oic_symbol::{decode, encode};
//!
//! let symbol = encode(&["OCRuntime", "PixelBindings"], "FillRect").unwrap();
//! assert_eq!(symbol.as_str(), "OCRuntime__PixelBindings__FillRect");
//!
//! let name = decode(symbol.as_str()).unwrap();
//! assert_eq!(name.dotted(), "OCRuntime.PixelBindings.FillRect");
//! ```
//!
//! Both directions are pure. Anything that cannot be split unambiguously is
//! rejected with a [`SymbolError`]; the codec never guesses.

pub mod codec;
pub mod error;
pub mod segment;

pub use codec::{decode, encode, EncodedSymbol, NamespacePath, QualifiedName};
pub use error::{SegmentFault, SymbolError, SymbolResult};
pub use segment::{Segment, SEPARATOR};
