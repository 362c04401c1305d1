//! resolve::value
//!
//! Value representations for command inputs.
//!
//! # Types
//!
//! - [`RawValue`] - An input as it arrives from a source (flag text, a
//!   boolean switch, or the elements of a splat argument), before any
//!   transform has run.
//! - [`Value`] - A resolved input. Optional parameters that resolve to
//!   nothing become [`Value::Absent`] rather than an error.
//!
//! # Accessors
//!
//! `Value` accessors return `Option` so callers can decide whether a type
//! mismatch is a bug (command declared the wrong transform) or an expected
//! absent case.

/// An input value as supplied by a source, before transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// A boolean switch (`--recursive`).
    Bool(bool),
    /// A single textual value (`--org acme`).
    Text(String),
    /// The elements of a splat argument, in order.
    Items(Vec<String>),
}

impl RawValue {
    /// Build a `RawValue` from an optional flag value.
    ///
    /// Returns `None` when the flag was not given, so sources can be
    /// assembled with `Option` chaining.
    pub fn from_opt_text(value: Option<String>) -> Option<Self> {
        value.map(RawValue::Text)
    }
}

/// A fully resolved input value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// An optional parameter that resolved to nothing.
    Absent,
    Bool(bool),
    Int(i64),
    Str(String),
    /// A resolved splat: one `Value` per element, in input order.
    List(Vec<Value>),
}

impl Value {
    /// True if this is the absent marker.
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// The boolean payload, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer payload, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The string payload, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The list payload, if this is a `List`.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Consume the value, yielding the string payload if any.
    pub fn into_string(self) -> Option<String> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Consume the value, yielding list elements. `Absent` yields an empty
    /// list so optional splats iterate cleanly.
    pub fn into_list(self) -> Vec<Value> {
        match self {
            Value::List(items) => items,
            Value::Absent => Vec::new(),
            other => vec![other],
        }
    }

    /// A stable token identifying this value, used as a memoization scope
    /// key for per-element resolution.
    pub(crate) fn scope_token(&self) -> String {
        match self {
            Value::Absent => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Str(s) => s.clone(),
            Value::List(items) => items
                .iter()
                .map(Value::scope_token)
                .collect::<Vec<_>>()
                .join("\u{1f}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_variants() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(2048).as_int(), Some(2048));
        assert_eq!(Value::Str("acme".into()).as_str(), Some("acme"));
        assert!(Value::Absent.is_absent());
        assert_eq!(Value::Str("x".into()).as_bool(), None);
    }

    #[test]
    fn into_list_flattens_absent() {
        assert!(Value::Absent.into_list().is_empty());
        let list = Value::List(vec![Value::from("a"), Value::from("b")]);
        assert_eq!(list.into_list().len(), 2);
    }

    #[test]
    fn scope_tokens_distinguish_values() {
        assert_ne!(
            Value::from("space-a").scope_token(),
            Value::from("space-b").scope_token()
        );
    }

    #[test]
    fn raw_from_opt_text() {
        assert_eq!(
            RawValue::from_opt_text(Some("acme".into())),
            Some(RawValue::Text("acme".into()))
        );
        assert_eq!(RawValue::from_opt_text(None), None);
    }
}
