//! Device rule trees shipped with the crate.
//!
//! Each submodule exposes `rule_tree()`, `mapping_table()` and a
//! `processor(&ParserConfig)` shortcut building a ready [`DeviceProcessor`].
//!
//! [`DeviceProcessor`]: crate::device::DeviceProcessor

pub mod cisco_asa;
