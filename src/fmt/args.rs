//! Variadic log arguments.
//!
//! Callers pass strings, numbers or whole JSON objects in one call; text sinks render them
//! space-separated while structured sinks (sockets, HTTP) forward the values untouched.

use serde_json::Value;

/// Ordered argument list of a single log call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(Vec<Value>);

impl Args {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends one more argument.
    #[must_use]
    pub fn and(mut self, value: impl Into<Value>) -> Self {
        self.0.push(value.into());
        self
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Strings verbatim, everything else as compact JSON, joined by single spaces.
    #[must_use]
    pub fn render(&self) -> String {
        render_values(&self.0)
    }
}

/// Shared by [`Args::render`] and alert extras.
#[must_use]
pub fn render_values(values: &[Value]) -> String {
    values
        .iter()
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl From<&str> for Args {
    fn from(s: &str) -> Self {
        Self(vec![Value::String(s.to_string())])
    }
}

impl From<String> for Args {
    fn from(s: String) -> Self {
        Self(vec![Value::String(s)])
    }
}

impl From<&String> for Args {
    fn from(s: &String) -> Self {
        Self(vec![Value::String(s.clone())])
    }
}

impl From<Value> for Args {
    fn from(value: Value) -> Self {
        Self(vec![value])
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl<const N: usize> From<[Value; N]> for Args {
    fn from(values: [Value; N]) -> Self {
        Self(values.into())
    }
}

impl FromIterator<Value> for Args {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Builds [`Args`] from heterogeneous values: `args!["user", 42, json!({"id": 1})]`.
#[macro_export]
macro_rules! args {
    () => {
        $crate::fmt::Args::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::fmt::Args::new()$(.and($value))+
    };
}
