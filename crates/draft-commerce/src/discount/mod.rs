//! Legacy percentage-discount mode.

mod legacy;
mod tags;

pub use legacy::*;
pub use tags::*;
