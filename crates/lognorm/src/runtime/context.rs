use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::diag::Diagnostics;
use crate::event::{EventStore, Value};
use crate::expr::Network;

/// Reserved path signalling failure: absent means success.
pub const FLAG_FIELD: &str = "log.flags";

/// Namespace every capture is written under.
pub const FIELDS_OBJECT: &str = "nwparser";
pub const FIELDS_PREFIX: &str = "nwparser.";

/// Capture holding the id used by keyed dispatch.
pub const MESSAGE_ID_FIELD: &str = "nwparser.messageid";

/// Flag reasons.
pub const DISSECT_FAILURE: &str = "dissect_parsing_error";
pub const MISSING_SOURCE: &str = "dissect_missing_source";

/// Per-device settings the rule tree reads while running.
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    /// Zone for dates that carry no offset.
    pub tz: FixedOffset,
    /// Networks DIRCHK treats as local.
    pub local_networks: Vec<Network>,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            tz: Utc.fix(),
            local_networks: Vec::new(),
        }
    }
}

/// State for processing a single event.
///
/// Owns everything that would otherwise be shared between concurrently
/// processed events: the diagnostics and the reference clock.
pub struct Context<'a> {
    pub event: &'a mut dyn EventStore,
    pub options: &'a RuntimeOptions,
    pub diagnostics: Diagnostics,
    now: DateTime<Utc>,
}

impl<'a> Context<'a> {
    pub fn new(event: &'a mut dyn EventStore, options: &'a RuntimeOptions) -> Self {
        Self {
            event,
            options,
            diagnostics: Diagnostics::new(),
            now: Utc::now(),
        }
    }

    /// Pin the clock dates are completed from.
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn now_local(&self) -> DateTime<FixedOffset> {
        self.now.with_timezone(&self.options.tz)
    }

    pub fn flag(&self) -> Option<Value> {
        self.event.get(FLAG_FIELD).cloned()
    }

    pub fn failed(&self) -> bool {
        self.event.get(FLAG_FIELD).is_some()
    }

    pub fn clear_flag(&mut self) {
        self.event.delete(FLAG_FIELD);
    }

    pub fn set_flag(&mut self, reason: &str) {
        self.event.put(FLAG_FIELD, Value::from(reason));
    }

    /// Put back a snapshot taken with [`flag`](Self::flag). An absent
    /// snapshot leaves the current flag alone.
    pub fn restore_flag(&mut self, saved: Option<Value>) {
        if let Some(value) = saved {
            self.event.put(FLAG_FIELD, value);
        }
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }
}
