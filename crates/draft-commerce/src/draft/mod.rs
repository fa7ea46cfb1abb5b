//! Draft-order construction and submission.

mod order;
mod submission;

pub use order::*;
pub use submission::*;
