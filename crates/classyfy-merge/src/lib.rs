//! Dynamic value model and override merge policy.
//!
//! Classes, data and parameters from every component are folded into a
//! single result with [`merge`]. The same rule applies to all three tables.

mod merge;
mod value;

pub use merge::{merge, Conflict, MergeError};
pub use value::{kind, Mapping, Number, Value};
