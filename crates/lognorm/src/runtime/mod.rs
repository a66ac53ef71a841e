//! Combinator runtime: the flag protocol and the processor tree.
//!
//! - `context.rs`: per-event state (event handle, diagnostics, clock)
//! - `node.rs`: processor nodes and their evaluation
//! - `vocab.rs`: builders rule trees are written with

pub mod context;
pub mod node;
pub mod vocab;

pub use context::{Context, RuntimeOptions, FLAG_FIELD, FIELDS_PREFIX, MESSAGE_ID_FIELD};
pub use node::{MatchNode, Node};
