// Module structure for the lognorm device-log normalizer.
//
// Raw line -> header dissect -> message-id dispatch -> message grammar
// -> field normalization (ECS / RSA taxonomies) -> timestamp finalization.

// Core infrastructure
pub mod error;
pub mod event;
pub mod numeric;
pub mod metrics;
pub mod diag;

// Rule-tree building blocks
pub mod dissect;
pub mod expr;
pub mod datetime;
pub mod runtime;
pub mod normalize;

// Entry points
pub mod conf;
pub mod device;
pub mod devices;
pub mod boot;

pub use conf::ParserConfig;
pub use device::{DeviceProcessor, ProcessOutcome};
pub use diag::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::RuleError;
pub use event::{Event, EventStore, Value};
pub use runtime::vocab;
