use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use crate::diag::DiagnosticKind;
use crate::event::{EventStore, Value};
use crate::numeric::parse_int_prefix;
use crate::runtime::context::Context;

/// Host-provided function: gets read access to the event and the evaluated
/// arguments, returns the value to store (if any).
pub type CustomFn = Arc<dyn Fn(&dyn EventStore, &[Option<Value>]) -> Option<Value> + Send + Sync>;

/// DIRCHK results.
const DIRECTION_INSIDE_LOCAL: &str = "0";
const DIRECTION_OUTSIDE_LOCAL: &str = "1";

const QUOTE_CHARS: [char; 3] = ['"', '\'', '`'];

#[derive(Clone)]
pub enum Function {
    /// Concatenate every present argument.
    Strcat,
    /// `CALC(a, op, b)` integer arithmetic on string operands.
    Calc,
    /// Trim and remove one pair of surrounding quotes.
    Rmq,
    /// Network direction of an address relative to the local networks.
    Dirchk,
    Custom { name: String, func: CustomFn },
}

impl Function {
    pub fn custom<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&dyn EventStore, &[Option<Value>]) -> Option<Value> + Send + Sync + 'static,
    {
        Function::Custom {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Function::Strcat => "STRCAT",
            Function::Calc => "CALC",
            Function::Rmq => "RMQ",
            Function::Dirchk => "DIRCHK",
            Function::Custom { name, .. } => name,
        }
    }

    /// Apply the function. Failures are recorded as diagnostics and yield
    /// `None`.
    pub fn apply(&self, ctx: &mut Context<'_>, args: &[Option<Value>]) -> Option<Value> {
        let result = match self {
            Function::Strcat => Ok(strcat(args)),
            Function::Calc => calc(args).map_err(|e| (DiagnosticKind::CalcError, e)),
            Function::Rmq => single_arg(args)
                .map(|s| Value::Str(remove_quotes(&s).to_string()))
                .map_err(|e| (DiagnosticKind::FunctionError, e)),
            Function::Dirchk => dirchk(ctx, args).map_err(|e| (DiagnosticKind::FunctionError, e)),
            Function::Custom { func, .. } => return func(&*ctx.event, args),
        };

        match result {
            Ok(value) => Some(value),
            Err((kind, detail)) => {
                ctx.diagnostics.record(kind, self.name(), detail);
                None
            }
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Custom { name, .. } => f.debug_struct("Custom").field("name", name).finish(),
            other => f.write_str(other.name()),
        }
    }
}

fn strcat(args: &[Option<Value>]) -> Value {
    let mut out = String::new();
    for value in args.iter().flatten() {
        out.push_str(&value.to_string());
    }
    Value::Str(out)
}

fn calc(args: &[Option<Value>]) -> Result<Value, String> {
    let [a, op, b] = args else {
        return Err(format!("expected 3 arguments, got {}", args.len()));
    };
    let a = operand(a)?;
    let b = operand(b)?;
    let op = op.as_ref().map(Value::to_string).unwrap_or_default();

    let result = match op.as_str() {
        "+" => a.checked_add(b),
        "-" => a.checked_sub(b),
        "*" => a.checked_mul(b),
        other => return Err(format!("unsupported operator '{}'", other)),
    };
    result
        .map(|n| Value::Str(n.to_string()))
        .ok_or_else(|| format!("overflow computing {} {} {}", a, op, b))
}

fn operand(value: &Option<Value>) -> Result<i64, String> {
    let text = match value {
        Some(Value::Long(n)) => return Ok(*n),
        Some(v) => v.to_string(),
        None => return Err("operand not set".to_string()),
    };
    parse_int_prefix(&text)
        .and_then(|n| i64::try_from(n).ok())
        .ok_or_else(|| format!("non-numeric operand '{}'", text))
}

fn single_arg(args: &[Option<Value>]) -> Result<String, String> {
    match args {
        [Some(value)] => Ok(value.to_string()),
        [None] => Err("argument not set".to_string()),
        _ => Err(format!("expected 1 argument, got {}", args.len())),
    }
}

pub(crate) fn remove_quotes(s: &str) -> &str {
    let s = s.trim();
    let mut chars = s.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if first == last && QUOTE_CHARS.contains(&first) => {
            &s[first.len_utf8()..s.len() - last.len_utf8()]
        }
        _ => s,
    }
}

fn dirchk(ctx: &Context<'_>, args: &[Option<Value>]) -> Result<Value, String> {
    let text = single_arg(args)?;
    let addr: IpAddr = text
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not an IP address", text))?;

    let local = ctx.options.local_networks.iter().any(|net| net.contains(addr));
    let direction = if local {
        DIRECTION_INSIDE_LOCAL
    } else {
        DIRECTION_OUTSIDE_LOCAL
    };
    Ok(Value::from(direction))
}
