//! Date/time interpreter.
//!
//! A tiny directive VM: each [`FormatProgram`] walks a cursor over the joined
//! argument string, filling a timestamp accumulator. Candidate programs are
//! tried in declaration order and the first one that succeeds wins.

pub mod directive;
pub mod duration;
pub mod program;

pub use directive::{Accumulator, DateField, Directive};
pub use duration::DurationFormat;
pub use program::FormatProgram;

use crate::diag::DiagnosticKind;
use crate::event::Value;
use crate::runtime::context::{Context, FIELDS_PREFIX};

/// Join the named capture fields with single spaces, skipping unset ones.
pub fn join_args(ctx: &mut Context<'_>, dest: &str, args: &[String]) -> String {
    let mut joined = String::new();
    for arg in args {
        let path = format!("{}{}", FIELDS_PREFIX, arg);
        match ctx.event.get(&path) {
            Some(value) => {
                if !joined.is_empty() {
                    joined.push(' ');
                }
                joined.push_str(&value.to_string());
            }
            None => ctx.diagnostics.record(
                DiagnosticKind::MissingArgument,
                dest,
                format!("input argument {} is not set", path),
            ),
        }
    }
    joined
}

/// `date_time` / `date_times`: parse joined fields into `nwparser.<dest>`.
#[derive(Debug, Clone)]
pub struct DateTimeNode {
    pub dest: String,
    pub args: Vec<String>,
    pub programs: Vec<FormatProgram>,
}

impl DateTimeNode {
    pub fn run(&self, ctx: &mut Context<'_>) {
        let input = join_args(ctx, &self.dest, &self.args);
        match program::parse_first(&self.programs, &input, ctx.now_local()) {
            Some(ts) => {
                let path = format!("{}{}", FIELDS_PREFIX, self.dest);
                ctx.event.put(&path, Value::Timestamp(ts));
            }
            None => ctx.diagnostics.record(
                DiagnosticKind::DateParseFailure,
                &self.dest,
                format!("no format matched '{}' ({} tried)", input, self.programs.len()),
            ),
        }
    }
}

/// `duration`: sum joined fields into whole seconds at `nwparser.<dest>`.
#[derive(Debug, Clone)]
pub struct DurationNode {
    pub dest: String,
    pub args: Vec<String>,
    pub formats: Vec<DurationFormat>,
}

impl DurationNode {
    pub fn run(&self, ctx: &mut Context<'_>) {
        let input = join_args(ctx, &self.dest, &self.args);
        match duration::first_duration(&self.formats, &input) {
            Some(seconds) => {
                let path = format!("{}{}", FIELDS_PREFIX, self.dest);
                ctx.event.put(&path, Value::Str(seconds.to_string()));
            }
            None => ctx.diagnostics.record(
                DiagnosticKind::DurationFailure,
                &self.dest,
                format!("not enough numbers in '{}'", input),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, EventStore};
    use crate::runtime::context::RuntimeOptions;
    use chrono::{TimeZone, Utc};

    fn event_with(fields: &[(&str, &str)]) -> Event {
        let mut event = Event::new();
        for (k, v) in fields {
            event.put(&format!("nwparser.{}", k), Value::from(*v));
        }
        event
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_join_skips_missing_with_diagnostic() {
        let mut event = event_with(&[("a", "x"), ("c", "z")]);
        let options = RuntimeOptions::default();
        let mut ctx = Context::new(&mut event, &options);

        assert_eq!(join_args(&mut ctx, "t", &strings(&["a", "b", "c"])), "x z");
        assert_eq!(ctx.diagnostics.count(DiagnosticKind::MissingArgument), 1);
    }

    #[test]
    fn test_date_time_node_writes_timestamp() {
        let mut event = event_with(&[
            ("month", "Oct"),
            ("day", "5"),
            ("year", "2021"),
            ("time", "08:30:42"),
        ]);
        let options = RuntimeOptions::default();
        let node = DateTimeNode {
            dest: "event_time".into(),
            args: strings(&["month", "day", "year", "time"]),
            programs: vec![
                FormatProgram::parse("%B %D %W %H:%T:%S").unwrap(),
                FormatProgram::parse("%B %F %W %H:%T:%S").unwrap(),
            ],
        };

        let mut ctx = Context::new(&mut event, &options);
        node.run(&mut ctx);
        assert!(ctx.diagnostics.is_empty());
        drop(ctx);

        assert_eq!(
            event.get("nwparser.event_time"),
            Some(&Value::Timestamp(Utc.with_ymd_and_hms(2021, 10, 5, 8, 30, 42).unwrap()))
        );
    }

    #[test]
    fn test_date_time_node_failure_leaves_dest_unset() {
        let mut event = event_with(&[("d", "garbage")]);
        let options = RuntimeOptions::default();
        let node = DateTimeNode {
            dest: "event_time".into(),
            args: strings(&["d"]),
            programs: vec![FormatProgram::parse("%W").unwrap()],
        };

        let mut ctx = Context::new(&mut event, &options);
        node.run(&mut ctx);
        assert_eq!(ctx.diagnostics.count(DiagnosticKind::DateParseFailure), 1);
        drop(ctx);
        assert!(event.get("nwparser.event_time").is_none());
    }

    #[test]
    fn test_duration_node() {
        let mut event = event_with(&[("a", "1 "), ("b", "3"), ("c", "42"), ("d", " 13")]);
        let options = RuntimeOptions::default();
        let node = DurationNode {
            dest: "duration".into(),
            args: strings(&["a", "b", "c", "d"]),
            formats: vec![DurationFormat::parse("%D%F%U%O").unwrap()],
        };

        let mut ctx = Context::new(&mut event, &options);
        node.run(&mut ctx);
        drop(ctx);
        assert_eq!(event.get_str("nwparser.duration"), Some("99733"));
    }
}
