//! Runtime values: the dynamically typed result domain of evaluation.

mod array;
pub mod compare;
pub mod convert;
mod value;

pub use array::{Array, Key};
pub use compare::{compare, identical, loose_equals};
pub use convert::{Number, format_float, to_bool, to_number};
pub use value::{ObjectRef, Value, ValueKind};
