use super::value::Value;
use crate::error::ValueError;
use std::fmt;

/// Inclusive numeric bounds. A missing side is unbounded (±infinity).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    pub lower: Option<T>,
    pub upper: Option<T>,
}

impl<T> Default for Bounds<T> {
    fn default() -> Self {
        Self {
            lower: None,
            upper: None,
        }
    }
}

impl<T: PartialOrd + Copy + fmt::Display> Bounds<T> {
    pub fn new(lower: Option<T>, upper: Option<T>) -> Self {
        Self { lower, upper }
    }

    pub fn is_unbounded(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    pub fn contains(&self, value: T) -> bool {
        self.lower.is_none_or(|lo| value >= lo) && self.upper.is_none_or(|hi| value <= hi)
    }

    /// Renders the bounds in CTD `lo:hi` restriction form.
    pub fn to_restriction(&self) -> String {
        let side = |b: Option<T>| b.map(|v| v.to_string()).unwrap_or_default();
        format!("{}:{}", side(self.lower), side(self.upper))
    }

    fn check(&self, key: &str, value: T) -> Result<(), ValueError> {
        if self.contains(value) {
            return Ok(());
        }
        let side = |b: Option<T>, inf: &str| b.map(|v| v.to_string()).unwrap_or(inf.to_string());
        Err(ValueError::OutOfBounds {
            key: key.to_string(),
            value: value.to_string(),
            lower: side(self.lower, "-inf"),
            upper: side(self.upper, "inf"),
        })
    }
}

/// The type of a parameter together with its type-specific constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterKind {
    Int(Bounds<i64>),
    Double(Bounds<f64>),
    String,
    Bool,
    /// Ordered, non-empty set of allowed values.
    StringChoice(Vec<String>),
    IntList(Bounds<i64>),
    DoubleList(Bounds<f64>),
    StringList,
    /// Single file bound to the named port.
    File { port: String },
    /// File list bound to the named port.
    FileList { port: String },
}

impl ParameterKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ParameterKind::Int(_) => "int",
            ParameterKind::Double(_) => "double",
            ParameterKind::String => "string",
            ParameterKind::Bool => "bool",
            ParameterKind::StringChoice(_) => "string choice",
            ParameterKind::IntList(_) => "int list",
            ParameterKind::DoubleList(_) => "double list",
            ParameterKind::StringList => "string list",
            ParameterKind::File { .. } => "file",
            ParameterKind::FileList { .. } => "file list",
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(
            self,
            ParameterKind::IntList(_)
                | ParameterKind::DoubleList(_)
                | ParameterKind::StringList
                | ParameterKind::FileList { .. }
        )
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, ParameterKind::Bool)
    }

    /// The port this parameter carries files for, if it is file-valued.
    pub fn port(&self) -> Option<&str> {
        match self {
            ParameterKind::File { port } | ParameterKind::FileList { port } => Some(port),
            _ => None,
        }
    }

    /// Checks `value` against this kind and converts it where a lossless widening exists.
    ///
    /// Ints widen to doubles, and an empty list of any element type is accepted for
    /// every list kind.
    pub fn coerce(&self, key: &str, value: Value) -> Result<Value, ValueError> {
        let mismatch = |found: &Value| ValueError::TypeMismatch {
            key: key.to_string(),
            expected: self.type_name().to_string(),
            found: found.type_name().to_string(),
        };
        let is_empty_list = value.list_len() == Some(0);

        match (self, value) {
            (ParameterKind::Int(bounds), Value::Int(n)) => {
                bounds.check(key, n)?;
                Ok(Value::Int(n))
            }
            (ParameterKind::Double(bounds), Value::Double(n)) => {
                bounds.check(key, n)?;
                Ok(Value::Double(n))
            }
            (ParameterKind::Double(bounds), Value::Int(n)) => {
                bounds.check(key, n as f64)?;
                Ok(Value::Double(n as f64))
            }
            (ParameterKind::Bool, Value::Bool(b)) => Ok(Value::Bool(b)),
            (ParameterKind::String | ParameterKind::File { .. }, Value::Str(s)) => Ok(Value::Str(s)),
            (ParameterKind::StringChoice(allowed), Value::Str(s)) => {
                if allowed.contains(&s) {
                    Ok(Value::Str(s))
                } else {
                    Err(ValueError::NotAllowed {
                        key: key.to_string(),
                        value: s,
                    })
                }
            }
            (ParameterKind::IntList(bounds), Value::IntList(items)) => {
                for n in &items {
                    bounds.check(key, *n)?;
                }
                Ok(Value::IntList(items))
            }
            (ParameterKind::DoubleList(bounds), Value::DoubleList(items)) => {
                for n in &items {
                    bounds.check(key, *n)?;
                }
                Ok(Value::DoubleList(items))
            }
            (ParameterKind::DoubleList(bounds), Value::IntList(items)) => {
                let widened: Vec<f64> = items.into_iter().map(|n| n as f64).collect();
                for n in &widened {
                    bounds.check(key, *n)?;
                }
                Ok(Value::DoubleList(widened))
            }
            (ParameterKind::StringList | ParameterKind::FileList { .. }, Value::StrList(items)) => {
                Ok(Value::StrList(items))
            }
            (ParameterKind::IntList(_), _) if is_empty_list => Ok(Value::IntList(Vec::new())),
            (ParameterKind::DoubleList(_), _) if is_empty_list => Ok(Value::DoubleList(Vec::new())),
            (ParameterKind::StringList | ParameterKind::FileList { .. }, _) if is_empty_list => {
                Ok(Value::StrList(Vec::new()))
            }
            (_, other) => Err(mismatch(&other)),
        }
    }
}

/// A typed, keyed configuration value of a tool.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Dotted path reflecting the CTD nesting, e.g. `tool.section.param`.
    pub key: String,
    pub kind: ParameterKind,
    /// `None` when the parameter is unset.
    pub value: Option<Value>,
    pub description: String,
    /// Enclosing section path (the key without its last segment).
    pub section: String,
    pub advanced: bool,
    pub optional: bool,
}

impl Parameter {
    /// Creates an unset, optional, non-advanced parameter.
    ///
    /// The section is derived from the key.
    pub fn new(key: impl Into<String>, kind: ParameterKind) -> Self {
        let key = key.into();
        let section = key
            .rsplit_once('.')
            .map(|(section, _)| section.to_string())
            .unwrap_or_default();
        Self {
            key,
            kind,
            value: None,
            description: String::new(),
            section,
            advanced: false,
            optional: true,
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn advanced(mut self, advanced: bool) -> Self {
        self.advanced = advanced;
        self
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// The last segment of the key.
    pub fn local_name(&self) -> &str {
        self.key.rsplit('.').next().unwrap_or(&self.key)
    }

    /// Type-checks and stores a new value.
    ///
    /// An empty string unsets the parameter, the same as an empty `value` literal in CTD.
    pub fn set_value(&mut self, value: Value) -> Result<(), ValueError> {
        self.value = match self.kind.coerce(&self.key, value)? {
            Value::Str(s) if s.is_empty() => None,
            other => Some(other),
        };
        Ok(())
    }

    pub fn clear_value(&mut self) {
        self.value = None;
    }
}
