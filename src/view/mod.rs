// Wed Jan 15 2026 - Alex

pub mod array;
pub mod pointer;
pub mod typed;
pub mod value;

pub use array::LazyArray;
pub use pointer::Pointer;
pub use typed::TypedView;
pub use value::{value_at, FieldValue};
