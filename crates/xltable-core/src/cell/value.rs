//! Resolved cell contents

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// What one (record, column) pair resolves to
///
/// `Empty` doubles as the sentinel for record paths that could not be
/// followed to a leaf.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Boolean(bool),
    /// Worksheets store every number as a double
    Number(f64),
    String(SharedString),
    Error(CellError),
    /// Formula text with the value to show until the worksheet recalculates
    Formula {
        text: String,
        cached_value: Option<Box<CellValue>>,
    },
}

impl CellValue {
    /// Create a string cell
    pub fn string(s: impl AsRef<str>) -> Self {
        CellValue::String(SharedString::new(s))
    }

    /// Formula without a cached result
    pub fn formula(text: impl Into<String>) -> Self {
        CellValue::Formula {
            text: text.into(),
            cached_value: None,
        }
    }

    /// Formula whose cached result is `value`, unless `value` is empty
    pub fn formula_with_value(text: impl Into<String>, value: CellValue) -> Self {
        let cached_value = match value {
            CellValue::Empty => None,
            other => Some(Box::new(other)),
        };
        CellValue::Formula {
            text: text.into(),
            cached_value,
        }
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Check if the cell holds a formula
    pub fn is_formula(&self) -> bool {
        matches!(self, CellValue::Formula { .. })
    }

    /// Get the formula text if this is a formula cell
    pub fn formula_text(&self) -> Option<&str> {
        match self {
            CellValue::Formula { text, .. } => Some(text),
            _ => None,
        }
    }

    /// The value a reader sees: formulas yield their cached result
    pub fn displayed(&self) -> &CellValue {
        match self {
            CellValue::Formula {
                cached_value: Some(value),
                ..
            } => value,
            CellValue::Formula { .. } => &CellValue::Empty,
            other => other,
        }
    }

    /// The number shown in the cell, if any
    pub fn as_number(&self) -> Option<f64> {
        match self.displayed() {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The text shown in the cell, if any
    pub fn as_str(&self) -> Option<&str> {
        match self.displayed() {
            CellValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Boolean(true) => f.write_str("TRUE"),
            CellValue::Boolean(false) => f.write_str("FALSE"),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::String(s) => f.write_str(s),
            CellValue::Error(e) => f.write_str(e.as_str()),
            CellValue::Formula { text, .. } => f.write_str(text),
        }
    }
}

macro_rules! number_from {
    ($($ty:ty),*) => {
        $(impl From<$ty> for CellValue {
            fn from(n: $ty) -> Self {
                CellValue::Number(n as f64)
            }
        })*
    };
}

number_from!(i32, i64, u32, u64, usize, f32, f64);

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::string(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(SharedString::from(s))
    }
}

impl From<CellError> for CellValue {
    fn from(e: CellError) -> Self {
        CellValue::Error(e)
    }
}

/// `None` becomes [`CellValue::Empty`]
impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Empty, Into::into)
    }
}

/// Cells serialize the way a worksheet table's `data` parameter takes them:
/// empty as `null`, errors as their `#` text, formulas as formula text.
#[cfg(feature = "serde")]
impl serde::Serialize for CellValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Empty => serializer.serialize_unit(),
            CellValue::Boolean(b) => serializer.serialize_bool(*b),
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::String(s) => serializer.serialize_str(s),
            CellValue::Error(e) => serializer.serialize_str(e.as_str()),
            CellValue::Formula { text, .. } => serializer.serialize_str(text),
        }
    }
}

/// Worksheet error literals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellError {
    Null,
    Div0,
    Value,
    Ref,
    Name,
    Num,
    Na,
}

impl CellError {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Null => "#NULL!",
            CellError::Div0 => "#DIV/0!",
            CellError::Value => "#VALUE!",
            CellError::Ref => "#REF!",
            CellError::Name => "#NAME?",
            CellError::Num => "#NUM!",
            CellError::Na => "#N/A",
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference-counted string; repeated values across rows share one
/// allocation when cloned.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SharedString(Arc<str>);

impl SharedString {
    /// Create a new shared string
    pub fn new(s: impl AsRef<str>) -> Self {
        SharedString(Arc::from(s.as_ref()))
    }

    /// Get the string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for SharedString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SharedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for SharedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SharedString {
    fn from(s: String) -> Self {
        SharedString(Arc::from(s))
    }
}

impl From<&str> for SharedString {
    fn from(s: &str) -> Self {
        SharedString::new(s)
    }
}
