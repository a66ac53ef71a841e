use std::collections::HashMap;

use super::Expr;
use crate::event::Value;
use crate::runtime::node::Node;

/// What a lookup key resolves to.
#[derive(Debug, Clone)]
pub enum LookupValue {
    /// Evaluated and written to the lookup destination.
    Expr(Expr),
    /// Run in place; writes whatever it writes.
    Node(Box<Node>),
}

impl From<Expr> for LookupValue {
    fn from(expr: Expr) -> Self {
        LookupValue::Expr(expr)
    }
}

impl From<Node> for LookupValue {
    fn from(node: Node) -> Self {
        LookupValue::Node(Box::new(node))
    }
}

impl From<&str> for LookupValue {
    fn from(s: &str) -> Self {
        LookupValue::Expr(Expr::Constant(Value::from(s)))
    }
}

/// Static key → value table with an optional default.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    entries: HashMap<String, LookupValue>,
    default: Option<LookupValue>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(mut self, key: impl Into<String>, value: impl Into<LookupValue>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn with_default(mut self, value: impl Into<LookupValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Exact match first, then the default entry.
    pub fn resolve(&self, key: &str) -> Option<&LookupValue> {
        self.entries.get(key).or(self.default.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
