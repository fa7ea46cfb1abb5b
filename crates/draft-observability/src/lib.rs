//! Observability for the draft bridge.
//!
//! This crate provides:
//! - `RequestId` - Per-request identifier for log correlation
//! - `init_logging` / `RequestLogger` - Structured logging on `tracing`
//! - `AlertSink` / `AlertDispatcher` - Fire-and-forget failure alerts

mod alert;
mod logging;
mod request_id;

pub use alert::*;
pub use logging::*;
pub use request_id::*;
