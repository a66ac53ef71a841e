//! Conf module: parser configuration model and loading.

pub mod model;
pub mod load;

pub use load::ConfigError;
pub use model::{parse_tz_offset, ParserConfig};
