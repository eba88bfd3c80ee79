//! Log batch data model
//!
//! The minimal pipeline shape the processor operates on: resource logs
//! containing scope logs containing log records, each record carrying an
//! attribute map. Records are mutated in place; one writer at a time per
//! record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A batch of logs handed to the processor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogsData {
    /// Logs grouped by originating resource.
    #[serde(default)]
    pub resource_logs: Vec<ResourceLogs>,
}

/// Logs from one resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceLogs {
    /// Logs grouped by instrumentation scope.
    #[serde(default)]
    pub scope_logs: Vec<ScopeLogs>,
}

/// Logs from one instrumentation scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeLogs {
    /// The records themselves.
    #[serde(default)]
    pub log_records: Vec<LogRecord>,
}

/// A single log record with its attribute map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Record attributes. Keyed map; array values preserve their order.
    #[serde(default)]
    pub attributes: BTreeMap<String, AnyValue>,
    /// Record body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<AnyValue>,
}

impl LogRecord {
    /// Look up an attribute.
    pub fn get(&self, key: &str) -> Option<&AnyValue> {
        self.attributes.get(key)
    }

    /// Write a string attribute, replacing any existing value.
    pub fn put_str(&mut self, key: &str, value: impl Into<String>) {
        self.attributes
            .insert(key.to_string(), AnyValue::Str(value.into()));
    }

    /// Write a string-array attribute, replacing any existing value.
    pub fn put_str_array<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let array = values
            .into_iter()
            .map(|v| AnyValue::Str(v.into()))
            .collect();
        self.attributes
            .insert(key.to_string(), AnyValue::Array(array));
    }
}

/// An attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnyValue {
    /// String value.
    Str(String),
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Double(f64),
    /// Ordered array of values.
    Array(Vec<AnyValue>),
}

impl AnyValue {
    /// Borrow as a string if the value is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Stringified form of any value kind.
    pub fn as_string(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Double(d) => d.to_string(),
            Self::Array(values) => {
                let parts: Vec<String> = values.iter().map(AnyValue::as_string).collect();
                format!("[{}]", parts.join(","))
            }
        }
    }
}
