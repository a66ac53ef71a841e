//! Model: ParserConfig and value parsing helpers.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::normalize::TaxonomyToggles;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Raise logging to debug and write `nwparser._took` on each event.
    pub debug: bool,
    /// Publish into the common-schema taxonomy.
    pub ecs: bool,
    /// Publish into the vendor taxonomy.
    pub rsa: bool,
    /// Copy raw captures to `rsa.raw` before clearing them.
    pub keep_raw: bool,
    /// Offset applied to parsed dates that carry no zone, `±HH:MM`.
    pub tz_offset: String,
    /// CIDR blocks DIRCHK treats as inside.
    pub local_networks: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            debug: false,
            ecs: true,
            rsa: false,
            keep_raw: false,
            tz_offset: "+00:00".to_string(),
            local_networks: Vec::new(),
        }
    }
}

impl ParserConfig {
    pub fn toggles(&self) -> TaxonomyToggles {
        TaxonomyToggles {
            ecs: self.ecs,
            rsa: self.rsa,
            keep_raw: self.keep_raw,
        }
    }
}

/// Parse `±HH:MM` (or `Z`) into a fixed offset.
pub fn parse_tz_offset(s: &str) -> Option<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
