//! Cell value types

use std::cmp::Ordering;
use std::fmt;

/// A value stored in a cell or produced by a formula
///
/// Equality is blank-aware: an empty string and [`Value::Undefined`] are
/// equal, which is how an empty cell and a formula producing `""` look to
/// anything downstream.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Text
    String(String),
    /// Any numeric value (integers are stored as floats)
    Number(f64),
    /// TRUE / FALSE
    Bool(bool),
    /// No value
    #[default]
    Undefined,
}

/// Result of [`Value::compare`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOrdering {
    Ascending,
    Same,
    Descending,
    /// The values are of different kinds (or a NaN is involved)
    Invalid,
}

impl From<Ordering> for ValueOrdering {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => ValueOrdering::Ascending,
            Ordering::Equal => ValueOrdering::Same,
            Ordering::Greater => ValueOrdering::Descending,
        }
    }
}

impl Value {
    /// Order `self` relative to `other`
    ///
    /// Only like kinds are ordered, apart from the blank rule (`""` is the
    /// same as undefined). Booleans order `false` before `true`.
    pub fn compare(&self, other: &Value, case_insensitive: bool) -> ValueOrdering {
        match (self, other) {
            (Value::String(s), Value::Undefined) | (Value::Undefined, Value::String(s))
                if s.is_empty() =>
            {
                ValueOrdering::Same
            }
            (Value::Undefined, Value::Undefined) => ValueOrdering::Same,
            (Value::String(l), Value::String(r)) => {
                if case_insensitive {
                    l.to_lowercase().cmp(&r.to_lowercase()).into()
                } else {
                    l.cmp(r).into()
                }
            }
            (Value::Number(l), Value::Number(r)) => l
                .partial_cmp(r)
                .map_or(ValueOrdering::Invalid, ValueOrdering::from),
            (Value::Bool(l), Value::Bool(r)) => l.cmp(r).into(),
            _ => ValueOrdering::Invalid,
        }
    }

    /// Numeric view used by arithmetic: undefined is 0, booleans are 0/1,
    /// strings do not coerce
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Undefined => Some(0.0),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::String(_) => None,
        }
    }

    /// Borrow the text of a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render as text the way a cell would show it
    pub fn as_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Number(n) => format_number(*n),
            Value::Bool(true) => "TRUE".to_string(),
            Value::Bool(false) => "FALSE".to_string(),
            Value::Undefined => String::new(),
        }
    }

    /// Truthiness: non-zero numbers, non-empty strings and `true`
    pub fn is_true(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Undefined => false,
        }
    }

    /// Blank check: undefined or the empty string
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Undefined => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Short name of the kind, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::Undefined => "undefined",
        }
    }
}

/// Format a number without a trailing `.0` for integral values
pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        self.compare(other, false) == ValueOrdering::Same
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Undefined, Into::into)
    }
}
