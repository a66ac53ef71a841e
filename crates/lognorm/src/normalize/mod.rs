//! Field normalization: raw captures → typed taxonomy fields.
//!
//! Every key under `nwparser.` is looked up in a static [`MappingTable`],
//! converted, and written to the destination paths of each enabled taxonomy.
//! The capture namespace is removed afterwards, optionally leaving a copy at
//! [`RAW_FIELDS_PATH`].

pub mod convert;
pub mod ip;
pub mod mapping;

pub use convert::Converter;
pub use mapping::{MappingEntry, MappingTable};

use crate::diag::{DiagnosticKind, Diagnostics};
use crate::event::EventStore;
use crate::runtime::context::FIELDS_PREFIX;

/// Where raw captures are copied when `keep_raw` is set.
pub const RAW_FIELDS_PATH: &str = "rsa.raw";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxonomyToggles {
    pub ecs: bool,
    pub rsa: bool,
    pub keep_raw: bool,
}

impl Default for TaxonomyToggles {
    fn default() -> Self {
        Self {
            ecs: true,
            rsa: false,
            keep_raw: false,
        }
    }
}

/// Publish raw captures and clear the capture namespace.
///
/// Returns the number of taxonomy fields written.
pub fn normalize(
    event: &mut dyn EventStore,
    table: &MappingTable,
    toggles: TaxonomyToggles,
    diagnostics: &mut Diagnostics,
) -> usize {
    let mut written = 0;

    for (key, raw) in event.fields_with_prefix(FIELDS_PREFIX) {
        if toggles.keep_raw {
            event.put(&format!("{}.{}", RAW_FIELDS_PATH, key), raw.clone());
        }

        let Some(entry) = table.get(&key) else {
            diagnostics.record(DiagnosticKind::UnmappedField, key, "no mapping entry");
            continue;
        };

        let value = match entry.converter {
            Some(converter) => match converter.convert(&raw) {
                Some(value) => value,
                None => {
                    diagnostics.record(
                        DiagnosticKind::ConversionFailure,
                        key,
                        format!("{} rejected '{}'", converter.name(), raw),
                    );
                    continue;
                }
            },
            None => raw,
        };

        let destinations = toggles
            .ecs
            .then_some(&entry.ecs)
            .into_iter()
            .chain(toggles.rsa.then_some(&entry.rsa))
            .flatten();
        for dest in destinations {
            event.put(dest, value.clone());
            written += 1;
        }
    }

    event.delete_prefix(FIELDS_PREFIX);
    written
}
