use chrono::{DateTime, NaiveDateTime, Utc};

use super::ip;
use crate::event::Value;
use crate::numeric::{parse_float_prefix, parse_int_prefix};

/// Largest integer a double represents exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: i128 = 9_007_199_254_740_991;

/// Naive layouts `to_date` tries after RFC 3339 and RFC 2822, read as UTC.
const NAIVE_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Typed converter applied to a raw capture before it is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    Long,
    Double,
    Ip,
    Mac,
    Lowercase,
    Date,
}

impl Converter {
    pub fn name(&self) -> &'static str {
        match self {
            Converter::Long => "to_long",
            Converter::Double => "to_double",
            Converter::Ip => "to_ip",
            Converter::Mac => "to_mac",
            Converter::Lowercase => "to_lowercase",
            Converter::Date => "to_date",
        }
    }

    /// `None` means the value was rejected.
    pub fn convert(&self, value: &Value) -> Option<Value> {
        match self {
            Converter::Long => to_long(value),
            Converter::Double => to_double(value),
            Converter::Ip => to_ip(value),
            Converter::Mac => Some(value.clone()),
            Converter::Lowercase => Some(to_lowercase(value)),
            Converter::Date => to_date(value),
        }
    }
}

pub fn to_long(value: &Value) -> Option<Value> {
    let n = match value {
        Value::Long(n) => i128::from(*n),
        other => parse_int_prefix(&other.to_string())?,
    };
    if n.abs() > MAX_SAFE_INTEGER {
        return None;
    }
    i64::try_from(n).ok().map(Value::Long)
}

pub fn to_double(value: &Value) -> Option<Value> {
    match value {
        Value::Double(d) => Some(Value::Double(*d)),
        Value::Long(n) => Some(Value::Double(*n as f64)),
        other => parse_float_prefix(&other.to_string()).map(Value::Double),
    }
}

pub fn to_ip(value: &Value) -> Option<Value> {
    let text = value.as_str()?;
    if text.contains(':') {
        ip::ipv6(text).map(Value::from)
    } else if ip::is_ipv4(text) {
        Some(Value::from(text))
    } else {
        None
    }
}

pub fn to_lowercase(value: &Value) -> Value {
    match value {
        Value::Str(s) => Value::Str(s.to_lowercase()),
        other => other.clone(),
    }
}

pub fn to_date(value: &Value) -> Option<Value> {
    match value {
        Value::Timestamp(ts) => Some(Value::Timestamp(*ts)),
        Value::Str(s) => parse_date(s.trim()).map(Value::Timestamp),
        _ => None,
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}
