//! dict-coder-value - the interchange tree used by `dict-coder`.
//!
//! A [`Value`] is the in-memory analog of a JSON document that keeps native
//! scalar types: eight integer widths, two float widths, strings and byte
//! blobs live side by side with arrays and string-keyed maps.
//!
//! ```
//! use dict_coder_value::{Leaf, Value, ValueKind};
//!
//! let v = 42u16.into_value();
//! assert_eq!(v.kind(), ValueKind::U16);
//! assert_eq!(u16::from_value(&v), Some(42));
//! assert_eq!(u32::from_value(&v), None);
//! ```

mod json;
mod kind;
mod leaf;
mod value;

pub use kind::ValueKind;
pub use leaf::Leaf;
pub use value::{Map, Value};
