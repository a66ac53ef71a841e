//! Builders device rule trees are written with.
//!
//! Short field names (`setc("action", ..)`, `date_time("event_time", ..)`)
//! live under the capture namespace; arguments called `dest` or `source` in
//! [`match_`], [`call`], [`set_field`] and [`lookup`] are full event paths.

use std::collections::HashMap;
use std::sync::Arc;

use super::context::FIELDS_PREFIX;
use super::node::{MatchNode, Node};
use crate::datetime::{DateTimeNode, DurationFormat, DurationNode, FormatProgram};
use crate::dissect::Pattern;
use crate::error::RuleError;
use crate::expr::{Expr, Function, LookupTable, UrlComponent};

pub use crate::expr::{calc, constant, dirchk, field, path, rmq, strcat};

fn capture_path(name: &str) -> String {
    format!("{}{}", FIELDS_PREFIX, name)
}

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// `match`: dissect `source` with `pattern`, then run `on_success`.
pub fn match_(id: &str, source: &str, pattern: &str, on_success: Option<Node>) -> Result<Node, RuleError> {
    Ok(Node::Match(MatchNode {
        id: id.to_string(),
        source: source.to_string(),
        pattern: Arc::new(Pattern::parse(pattern)?),
        on_success: on_success.map(Box::new),
    }))
}

pub fn chain(nodes: Vec<Node>) -> Node {
    Node::Chain(nodes)
}

pub fn linear_select(candidates: Vec<Node>) -> Node {
    Node::LinearSelect(candidates)
}

pub fn all_match(processors: Vec<Node>, on_success: Option<Node>, on_failure: Option<Node>) -> Node {
    Node::AllMatch {
        processors,
        on_success: on_success.map(Box::new),
        on_failure: on_failure.map(Box::new),
    }
}

pub fn msgid_select<'a>(mapping: impl IntoIterator<Item = (&'a str, Node)>) -> Node {
    let mapping: HashMap<String, Node> = mapping
        .into_iter()
        .map(|(id, node)| (id.to_string(), node))
        .collect();
    Node::MsgIdSelect(mapping)
}

/// Evaluate `args`, apply `function`, store a non-empty result at `dest`.
pub fn call(dest: &str, function: Function, args: Vec<Expr>) -> Node {
    Node::SetField {
        dest: dest.to_string(),
        value: Expr::Call(function, args),
    }
}

pub fn lookup(dest: &str, key: Expr, table: &Arc<LookupTable>) -> Node {
    Node::Lookup {
        dest: dest.to_string(),
        key,
        table: Arc::clone(table),
    }
}

pub fn set_field(dest: &str, value: Expr) -> Node {
    Node::SetField {
        dest: dest.to_string(),
        value,
    }
}

/// Store a constant capture.
pub fn setc(dst: &str, value: &str) -> Node {
    set_field(&capture_path(dst), constant(value))
}

/// Copy one capture to another when set.
pub fn setf(dst: &str, src: &str) -> Node {
    set_field(&capture_path(dst), field(src))
}

pub fn date_time(dest: &str, args: &[&str], format: &str) -> Result<Node, RuleError> {
    date_times(dest, args, &[format])
}

/// Like [`date_time`] with several candidate formats, tried in order.
pub fn date_times(dest: &str, args: &[&str], formats: &[&str]) -> Result<Node, RuleError> {
    if formats.is_empty() {
        return Err(RuleError::NoFormats(dest.to_string()));
    }
    let programs = formats
        .iter()
        .map(|f| FormatProgram::parse(f))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Node::DateTime(DateTimeNode {
        dest: dest.to_string(),
        args: names(args),
        programs,
    }))
}

pub fn duration(dest: &str, args: &[&str], formats: &[&str]) -> Result<Node, RuleError> {
    if formats.is_empty() {
        return Err(RuleError::NoFormats(dest.to_string()));
    }
    let formats = formats
        .iter()
        .map(|f| DurationFormat::parse(f))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Node::Duration(DurationNode {
        dest: dest.to_string(),
        args: names(args),
        formats,
    }))
}

/// Delete captures.
pub fn remove(fields: &[&str]) -> Node {
    Node::Remove(fields.iter().map(|f| capture_path(f)).collect())
}

/// Store one URL component of capture `src` in capture `dst`.
pub fn url_extract(component: UrlComponent, dst: &str, src: &str) -> Node {
    Node::UrlExtract {
        component,
        source: capture_path(src),
        dest: capture_path(dst),
    }
}

pub fn nop() -> Node {
    Node::Nop
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_rejects_bad_pattern() {
        assert_eq!(
            match_("x", "message", "%{a}%{b}", None).err(),
            Some(RuleError::AdjacentCaptures("a".into(), "b".into()))
        );
    }

    #[test]
    fn test_date_times_validates_formats() {
        assert_eq!(
            date_times("t", &["a"], &[]).err(),
            Some(RuleError::NoFormats("t".into()))
        );
        assert_eq!(
            date_times("t", &["a"], &["%W", "%K"]).err(),
            Some(RuleError::UnknownDirective('K'))
        );
        assert!(date_time("t", &["a"], "%W-%M-%D").is_ok());
    }

    #[test]
    fn test_duration_validates_formats() {
        assert!(duration("d", &["a"], &["%N:%U:%O"]).is_ok());
        assert_eq!(duration("d", &["a"], &[]).err(), Some(RuleError::NoFormats("d".into())));
    }

    #[test]
    fn test_short_names_are_namespaced() {
        match remove(&["a", "b"]) {
            Node::Remove(paths) => assert_eq!(paths, vec!["nwparser.a", "nwparser.b"]),
            other => panic!("unexpected node {:?}", other),
        }
        match setc("a", "1") {
            Node::SetField { dest, .. } => assert_eq!(dest, "nwparser.a"),
            other => panic!("unexpected node {:?}", other),
        }
    }
}
