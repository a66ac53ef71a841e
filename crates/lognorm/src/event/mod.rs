//! Event: the per-record field store the rule tree reads and writes.
//!
//! The runtime only talks to events through the [`EventStore`] trait so that a
//! host can plug in its own document type. [`Event`] is the in-memory
//! implementation used by the binary and the tests.

pub mod value;
pub mod store;
mod serde_utils;

pub use store::{Event, EventStore};
pub use value::Value;

/// Field holding the raw log line.
pub const MESSAGE_FIELD: &str = "message";

/// Where the untouched raw line is preserved before parsing.
pub const ORIGINAL_MESSAGE_FIELD: &str = "event.original";
