//! Expression trees evaluated against the current event.
//!
//! Expressions never write to the event: they produce a value (or nothing)
//! which nodes such as `call`, `set_field` and `lookup` then store.

pub mod function;
pub mod lookup;
pub mod network;
pub mod url;

pub use function::{CustomFn, Function};
pub use lookup::{LookupTable, LookupValue};
pub use network::Network;
pub use url::UrlComponent;

use crate::event::Value;
use crate::runtime::context::{Context, FIELDS_PREFIX};

#[derive(Debug, Clone)]
pub enum Expr {
    /// A fixed value.
    Constant(Value),
    /// Full event path to read.
    Field(String),
    /// A function applied to evaluated arguments.
    Call(Function, Vec<Expr>),
}

impl Expr {
    pub fn eval(&self, ctx: &mut Context<'_>) -> Option<Value> {
        match self {
            Expr::Constant(value) => Some(value.clone()),
            Expr::Field(path) => ctx.event.get(path).cloned(),
            Expr::Call(function, args) => {
                let values: Vec<Option<Value>> = args.iter().map(|arg| arg.eval(ctx)).collect();
                function.apply(ctx, &values)
            }
        }
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Expr::Constant(Value::from(s))
    }
}

impl From<Value> for Expr {
    fn from(v: Value) -> Self {
        Expr::Constant(v)
    }
}

pub fn constant(value: impl Into<Value>) -> Expr {
    Expr::Constant(value.into())
}

/// Reference a capture by its short name (`saddr` reads `nwparser.saddr`).
pub fn field(name: &str) -> Expr {
    Expr::Field(format!("{}{}", FIELDS_PREFIX, name))
}

/// Reference any event path verbatim.
pub fn path(full_path: &str) -> Expr {
    Expr::Field(full_path.to_string())
}

pub fn strcat(args: Vec<Expr>) -> Expr {
    Expr::Call(Function::Strcat, args)
}

pub fn calc(a: Expr, op: &str, b: Expr) -> Expr {
    Expr::Call(Function::Calc, vec![a, constant(op), b])
}

pub fn rmq(arg: Expr) -> Expr {
    Expr::Call(Function::Rmq, vec![arg])
}

pub fn dirchk(arg: Expr) -> Expr {
    Expr::Call(Function::Dirchk, vec![arg])
}
