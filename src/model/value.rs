use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current value of a parameter.
///
/// File parameters hold `Str`, file-list parameters hold `StrList`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(String),
    IntList(Vec<i64>),
    DoubleList(Vec<f64>),
    StrList(Vec<String>),
}

impl Value {
    /// Short type label used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::Str(_) => "string",
            Value::IntList(_) => "int list",
            Value::DoubleList(_) => "double list",
            Value::StrList(_) => "string list",
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(
            self,
            Value::IntList(_) | Value::DoubleList(_) | Value::StrList(_)
        )
    }

    /// Number of entries for list values, `None` for scalars.
    pub fn list_len(&self) -> Option<usize> {
        match self {
            Value::IntList(v) => Some(v.len()),
            Value::DoubleList(v) => Some(v.len()),
            Value::StrList(v) => Some(v.len()),
            _ => None,
        }
    }

    /// Renders the `index`-th list entry as a command-line token.
    pub fn token_at(&self, index: usize) -> Option<String> {
        match self {
            Value::IntList(v) => v.get(index).map(|n| n.to_string()),
            Value::DoubleList(v) => v.get(index).map(|n| format_double(*n)),
            Value::StrList(v) => v.get(index).cloned(),
            _ => None,
        }
    }

    /// Renders the value as command-line tokens, one per list entry.
    pub fn tokens(&self) -> Vec<String> {
        match self {
            Value::Bool(b) => vec![b.to_string()],
            Value::Int(n) => vec![n.to_string()],
            Value::Double(n) => vec![format_double(*n)],
            Value::Str(s) => vec![s.clone()],
            Value::IntList(v) => v.iter().map(|n| n.to_string()).collect(),
            Value::DoubleList(v) => v.iter().map(|n| format_double(*n)).collect(),
            Value::StrList(v) => v.clone(),
        }
    }
}

/// Renders a double with at least one fractional digit, so `10.0` stays `10.0`.
fn format_double(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 {
        format!("{:.1}", n)
    } else {
        n.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Double(n) => write!(f, "{}", format_double(*n)),
            Value::Str(s) => write!(f, "\"{}\"", s),
            Value::IntList(v) => write!(f, "[{}]", v.iter().join(", ")),
            Value::DoubleList(v) => write!(f, "[{}]", v.iter().map(|n| format_double(*n)).join(", ")),
            Value::StrList(v) => write!(f, "[{}]", v.iter().map(|s| format!("\"{}\"", s)).join(", ")),
        }
    }
}
