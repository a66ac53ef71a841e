use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use super::context::{Context, DISSECT_FAILURE, FIELDS_PREFIX, MESSAGE_ID_FIELD, MISSING_SOURCE};
use crate::datetime::{DateTimeNode, DurationNode};
use crate::diag::DiagnosticKind;
use crate::dissect::Pattern;
use crate::event::Value;
use crate::expr::url::{extract as extract_url, UrlComponent};
use crate::expr::{Expr, LookupTable, LookupValue};

/// Dissect a source field and optionally continue on success.
#[derive(Debug, Clone)]
pub struct MatchNode {
    pub id: String,
    /// Full event path of the text to split.
    pub source: String,
    pub pattern: Arc<Pattern>,
    pub on_success: Option<Box<Node>>,
}

impl MatchNode {
    fn run(&self, ctx: &mut Context<'_>) {
        let text = match ctx.event.get(&self.source) {
            Some(value) => value.to_string(),
            None => {
                trace!(id = %self.id, source = %self.source, "dissect source not set");
                ctx.set_flag(MISSING_SOURCE);
                return;
            }
        };

        match self.pattern.captures(&text) {
            Some(captures) => {
                for (name, value) in captures {
                    ctx.event.put(&format!("{}{}", FIELDS_PREFIX, name), Value::Str(value));
                }
                ctx.clear_flag();
                trace!(id = %self.id, "dissect ok");
            }
            None => {
                ctx.set_flag(DISSECT_FAILURE);
                trace!(id = %self.id, "dissect failed");
                return;
            }
        }

        if let Some(next) = &self.on_success {
            next.run(ctx);
        }
    }
}

/// A processor in a rule tree. Built once, run against many events.
#[derive(Debug, Clone)]
pub enum Node {
    /// Run every child in order.
    Chain(Vec<Node>),
    /// Run children in order until one leaves the flag clear.
    LinearSelect(Vec<Node>),
    /// Run children while they succeed, then one of the continuations.
    AllMatch {
        processors: Vec<Node>,
        on_success: Option<Box<Node>>,
        on_failure: Option<Box<Node>>,
    },
    /// Dispatch on `nwparser.messageid`.
    MsgIdSelect(HashMap<String, Node>),
    Match(MatchNode),
    /// Write `value` to `dest` (full path) when it evaluates to something.
    SetField { dest: String, value: Expr },
    Lookup {
        dest: String,
        key: Expr,
        table: Arc<LookupTable>,
    },
    DateTime(DateTimeNode),
    Duration(DurationNode),
    /// Delete the given full paths.
    Remove(Vec<String>),
    UrlExtract {
        component: UrlComponent,
        source: String,
        dest: String,
    },
    Nop,
}

impl Node {
    pub fn run(&self, ctx: &mut Context<'_>) {
        match self {
            Node::Chain(nodes) => {
                for node in nodes {
                    node.run(ctx);
                }
            }
            Node::LinearSelect(candidates) => {
                let saved = ctx.flag();
                for candidate in candidates {
                    ctx.clear_flag();
                    candidate.run(ctx);
                    if !ctx.failed() {
                        break;
                    }
                }
                ctx.restore_flag(saved);
            }
            Node::AllMatch {
                processors,
                on_success,
                on_failure,
            } => {
                for processor in processors {
                    ctx.clear_flag();
                    processor.run(ctx);
                    if ctx.failed() {
                        if let Some(node) = on_failure {
                            node.run(ctx);
                        }
                        return;
                    }
                }
                if let Some(node) = on_success {
                    node.run(ctx);
                }
            }
            Node::MsgIdSelect(mapping) => {
                let Some(id) = ctx.event.get(MESSAGE_ID_FIELD).map(Value::to_string) else {
                    return;
                };
                match mapping.get(&id) {
                    Some(node) => node.run(ctx),
                    None => ctx.diagnostics.record(
                        DiagnosticKind::DispatchMiss,
                        id,
                        "no message grammar for id",
                    ),
                }
            }
            Node::Match(node) => node.run(ctx),
            Node::SetField { dest, value } => {
                if let Some(v) = value.eval(ctx) {
                    ctx.event.put(dest, v);
                }
            }
            Node::Lookup { dest, key, table } => {
                let Some(key) = key.eval(ctx) else {
                    return;
                };
                match table.resolve(&key.to_string()) {
                    Some(LookupValue::Expr(expr)) => {
                        if let Some(v) = expr.eval(ctx) {
                            ctx.event.put(dest, v);
                        }
                    }
                    Some(LookupValue::Node(node)) => node.run(ctx),
                    None => {}
                }
            }
            Node::DateTime(node) => node.run(ctx),
            Node::Duration(node) => node.run(ctx),
            Node::Remove(paths) => {
                for path in paths {
                    ctx.event.delete(path);
                }
            }
            Node::UrlExtract {
                component,
                source,
                dest,
            } => {
                let Some(text) = ctx.event.get(source).map(Value::to_string) else {
                    ctx.diagnostics.record(
                        DiagnosticKind::FunctionError,
                        format!("URL({})", component),
                        format!("source field {} not set", source),
                    );
                    return;
                };
                match extract_url(*component, &text) {
                    Ok(result) => ctx.event.put(dest, Value::Str(result)),
                    Err(e) => ctx.diagnostics.record(
                        DiagnosticKind::FunctionError,
                        format!("URL({})", component),
                        e.to_string(),
                    ),
                }
            }
            Node::Nop => {}
        }
    }
}
