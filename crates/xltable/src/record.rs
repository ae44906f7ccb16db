//! Nested records and dotted-path lookup

use serde_json::Value;
use std::fmt;
use xltable_core::CellValue;

/// One input item. Objects nest arbitrarily; `null` and absent keys are
/// ordinary, not exceptional.
pub type Record = Value;

/// A dot-delimited field address into a [`Record`] (`"alpha.papa.romeo"`).
///
/// Segments are split once, when the path is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordPath {
    segments: Vec<String>,
}

impl RecordPath {
    /// Split `path` on `.`. Every segment is taken literally, so `"a..b"`
    /// addresses the key `""` between `a` and `b`.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path.split('.').map(str::to_owned).collect(),
        }
    }

    /// A path made of one segment, taken verbatim (dots included).
    pub fn single(key: impl Into<String>) -> Self {
        Self {
            segments: vec![key.into()],
        }
    }

    /// Keys walked in order
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Walk `record` one object lookup per segment.
    ///
    /// Returns `None` as soon as the current node is not an object or lacks
    /// the next key.
    pub fn resolve<'a>(&self, record: &'a Record) -> Option<&'a Record> {
        let mut current = record;
        for segment in &self.segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Resolve to a cell value, yielding [`CellValue::Empty`] on any miss.
    pub fn cell_value(&self, record: &Record) -> CellValue {
        match self.resolve(record) {
            Some(value) => to_cell_value(value),
            None => {
                tracing::trace!(path = %self, "path did not resolve");
                CellValue::Empty
            }
        }
    }
}

impl fmt::Display for RecordPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl From<&str> for RecordPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

/// Convert a resolved leaf into a cell value.
///
/// Arrays and objects have no cell form; they are rendered as compact JSON
/// text.
pub fn to_cell_value(value: &Record) -> CellValue {
    match value {
        Value::Null => CellValue::Empty,
        Value::Bool(b) => CellValue::Boolean(*b),
        Value::Number(n) => n.as_f64().map_or(CellValue::Empty, CellValue::Number),
        Value::String(s) => CellValue::string(s.as_str()),
        Value::Array(_) | Value::Object(_) => CellValue::string(value.to_string()),
    }
}
