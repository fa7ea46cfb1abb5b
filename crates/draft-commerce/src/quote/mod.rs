//! SKU-mode quote handling.

mod context;
mod normalizer;
mod row;
mod rules;

pub use context::*;
pub use normalizer::*;
pub use row::*;
pub use rules::*;

pub(crate) use row::deserialize_quantity;
