//! Device processor: one compiled rule tree plus its mapping table.
//!
//! [`DeviceProcessor::process`] is the single entry point a host calls per
//! event. It never fails: everything that goes wrong is reported through the
//! returned [`ProcessOutcome`] and the shared [`NormalizerMetrics`].

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::conf::{parse_tz_offset, ParserConfig};
use crate::diag::Diagnostics;
use crate::error::RuleError;
use crate::event::{EventStore, Value, MESSAGE_FIELD, ORIGINAL_MESSAGE_FIELD};
use crate::expr::Network;
use crate::metrics::NormalizerMetrics;
use crate::normalize::{normalize, MappingTable, TaxonomyToggles};
use crate::runtime::{Context, Node, RuntimeOptions, FIELDS_PREFIX, FLAG_FIELD};

/// Field the processing time lands in when `debug` is set.
pub const TOOK_FIELD: &str = "_took";

/// What happened to one event.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutcome {
    pub diagnostics: Diagnostics,
    pub elapsed: Duration,
    /// False when the rule tree left the failure flag set.
    pub matched: bool,
}

pub struct DeviceProcessor {
    name: String,
    root: Node,
    mappings: MappingTable,
    options: RuntimeOptions,
    toggles: TaxonomyToggles,
    debug: bool,
    metrics: NormalizerMetrics,
}

impl DeviceProcessor {
    pub fn new(
        name: impl Into<String>,
        root: Node,
        mappings: MappingTable,
        config: &ParserConfig,
    ) -> Result<Self, RuleError> {
        let tz = parse_tz_offset(&config.tz_offset)
            .ok_or_else(|| RuleError::InvalidTzOffset(config.tz_offset.clone()))?;
        let local_networks = config
            .local_networks
            .iter()
            .map(|cidr| Network::parse(cidr))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: name.into(),
            root,
            mappings,
            options: RuntimeOptions { tz, local_networks },
            toggles: config.toggles(),
            debug: config.debug,
            metrics: NormalizerMetrics::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metrics(&self) -> &NormalizerMetrics {
        &self.metrics
    }

    /// Parse and normalize one event in place.
    pub fn process(&self, event: &mut dyn EventStore) -> ProcessOutcome {
        self.process_at(event, Utc::now())
    }

    /// [`process`](Self::process) with dates completed from `now` instead of
    /// the wall clock.
    pub fn process_at(&self, event: &mut dyn EventStore, now: DateTime<Utc>) -> ProcessOutcome {
        let start = Instant::now();
        let saved_flag = event.delete(FLAG_FIELD);

        if let Some(message) = event.get(MESSAGE_FIELD).and_then(Value::as_str).map(str::to_string) {
            if event.get(ORIGINAL_MESSAGE_FIELD).is_none() {
                event.put(ORIGINAL_MESSAGE_FIELD, Value::from(message.as_str()));
            }
            let stripped = strip_syslog_priority(&message);
            if stripped.len() != message.len() {
                event.put(MESSAGE_FIELD, Value::from(stripped));
            }
        }

        let (matched, mut diagnostics) = {
            let mut ctx = Context::new(event, &self.options).with_clock(now);
            self.root.run(&mut ctx);
            (!ctx.failed(), ctx.into_diagnostics())
        };

        normalize(event, &self.mappings, self.toggles, &mut diagnostics);

        if let Some(flag) = saved_flag {
            event.put(FLAG_FIELD, flag);
        }

        let elapsed = start.elapsed();
        if self.debug {
            let took_ms = elapsed.as_secs_f64() * 1000.0;
            event.put(&format!("{}{}", FIELDS_PREFIX, TOOK_FIELD), Value::Double(took_ms));
        }

        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.metrics.record_event(matched, nanos, &diagnostics);
        debug!(
            device = %self.name,
            matched,
            diagnostics = diagnostics.len(),
            elapsed_us = elapsed.as_micros() as u64,
            "processed event"
        );

        ProcessOutcome {
            diagnostics,
            elapsed,
            matched,
        }
    }
}

/// Remove a leading syslog `<N>` priority of one to three digits.
pub fn strip_syslog_priority(message: &str) -> &str {
    let Some(rest) = message.strip_prefix('<') else {
        return message;
    };
    let Some(end) = rest.find('>') else {
        return message;
    };
    if (1..=3).contains(&end) && rest[..end].bytes().all(|b| b.is_ascii_digit()) {
        &rest[end + 1..]
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::normalize::MappingEntry;
    use crate::runtime::vocab::{chain, match_, setc};

    fn device(config: &ParserConfig) -> DeviceProcessor {
        let root = chain(vec![
            match_("hdr", "message", "%{host} %{action}", None).unwrap(),
            setc("product", "demo"),
        ]);
        let mappings = MappingTable::new()
            .with("host", MappingEntry::new().ecs("host.name"))
            .with("action", MappingEntry::new().ecs("event.action"))
            .with("product", MappingEntry::new().ecs("observer.product"));
        DeviceProcessor::new("demo", root, mappings, config).unwrap()
    }

    #[test]
    fn test_strip_syslog_priority() {
        assert_eq!(strip_syslog_priority("<166>fw1 deny"), "fw1 deny");
        assert_eq!(strip_syslog_priority("<1>x"), "x");
        assert_eq!(strip_syslog_priority("<1666>x"), "<1666>x");
        assert_eq!(strip_syslog_priority("<>x"), "<>x");
        assert_eq!(strip_syslog_priority("<ab>x"), "<ab>x");
        assert_eq!(strip_syslog_priority("fw1 deny"), "fw1 deny");
    }

    #[test]
    fn test_process_records_original_and_strips_priority() {
        let processor = device(&ParserConfig::default());
        let mut event = Event::from_message("<166>fw1 deny");

        let outcome = processor.process(&mut event);

        assert!(outcome.matched);
        assert_eq!(event.get_str("event.original"), Some("<166>fw1 deny"));
        assert_eq!(event.get_str("message"), Some("fw1 deny"));
        assert_eq!(event.get_str("host.name"), Some("fw1"));
        assert_eq!(event.get_str("event.action"), Some("deny"));
        assert!(event.get("nwparser._took").is_none());
    }

    #[test]
    fn test_unmatched_passes_through() {
        let processor = device(&ParserConfig::default());
        let mut event = Event::from_message("garbage");

        let outcome = processor.process(&mut event);

        assert!(!outcome.matched);
        assert_eq!(event.get_str("log.flags"), Some("dissect_parsing_error"));
        assert_eq!(event.get_str("message"), Some("garbage"));
        assert!(event.get("host.name").is_none());
        assert_eq!(processor.metrics().snapshot().events_unmatched, 1);
    }

    #[test]
    fn test_incoming_flag_restored() {
        let processor = device(&ParserConfig::default());
        let mut event = Event::from_message("fw1 deny");
        event.put("log.flags", Value::from("upstream"));

        let outcome = processor.process(&mut event);

        assert!(outcome.matched);
        assert_eq!(event.get_str("log.flags"), Some("upstream"));
    }

    #[test]
    fn test_debug_writes_took() {
        let config = ParserConfig {
            debug: true,
            ..Default::default()
        };
        let processor = device(&config);
        let mut event = Event::from_message("fw1 deny");

        processor.process(&mut event);
        assert!(matches!(event.get("nwparser._took"), Some(Value::Double(_))));
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = ParserConfig {
            tz_offset: "nope".to_string(),
            ..Default::default()
        };
        let err = DeviceProcessor::new("demo", chain(vec![]), MappingTable::new(), &config).err();
        assert_eq!(err, Some(RuleError::InvalidTzOffset("nope".into())));

        let config = ParserConfig {
            local_networks: vec!["10.0.0.0/40".to_string()],
            ..Default::default()
        };
        let err = DeviceProcessor::new("demo", chain(vec![]), MappingTable::new(), &config).err();
        assert_eq!(err, Some(RuleError::InvalidNetwork("10.0.0.0/40".into())));
    }
}
