//! Column specifications
//!
//! A [`ColumnSpec`] is the ordered declaration of output columns. Each column
//! is resolved through one closed set of accessor kinds, fixed when the
//! column is declared:
//!
//! | Declared as                  | Cell value                                   |
//! |------------------------------|----------------------------------------------|
//! | [`ColumnSpec::path`]         | `record[a][b][c]` for `"a.b.c"`, else empty  |
//! | [`ColumnSpec::implicit`]     | `record[name]`, else empty                   |
//! | [`ColumnSpec::function`]     | whatever the function returns                |
//! | [`ColumnSpec::formula`]      | the formula rendered for the record's row    |
//!
//! Declaration order is worksheet column order.

use crate::error::{AccessorError, Error, Result};
use crate::formula::FormulaTemplate;
use crate::record::{Record, RecordPath};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use xltable_core::{CellValue, MAX_COLS};

type AccessorFn = dyn Fn(&Record) -> std::result::Result<CellValue, AccessorError> + Send + Sync;

/// How a column reads its value out of a record
#[derive(Clone)]
pub enum Accessor {
    /// Dotted path lookup; misses yield [`CellValue::Empty`]
    Path(RecordPath),
    /// Caller-supplied function; errors are surfaced, never swallowed
    Function(Arc<AccessorFn>),
}

impl Accessor {
    /// Wrap a fallible function
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&Record) -> std::result::Result<CellValue, AccessorError> + Send + Sync + 'static,
    {
        Self::Function(Arc::new(f))
    }

    /// An accessor that always yields [`CellValue::Empty`]
    pub fn empty() -> Self {
        Self::function(|_| Ok(CellValue::Empty))
    }

    /// Evaluate against one record
    pub fn read(&self, record: &Record) -> std::result::Result<CellValue, AccessorError> {
        match self {
            Accessor::Path(path) => Ok(path.cell_value(record)),
            Accessor::Function(f) => f(record),
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Path(path) => f.debug_tuple("Path").field(&path.to_string()).finish(),
            Accessor::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// What a column holds
#[derive(Debug, Clone)]
pub enum ColumnKind {
    /// A direct value
    Value(Accessor),
    /// A per-row formula. `data` supplies the cached result shown before the
    /// worksheet recalculates.
    Formula {
        data: Accessor,
        template: FormulaTemplate,
    },
}

/// Aggregate shown in the table's total row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalFunction {
    None,
    Average,
    Count,
    CountNums,
    Max,
    Min,
    Sum,
    #[serde(rename = "std_dev")]
    StdDev,
    Var,
}

impl TotalFunction {
    /// Name the worksheet uses for this aggregate
    pub fn as_str(&self) -> &'static str {
        match self {
            TotalFunction::None => "none",
            TotalFunction::Average => "average",
            TotalFunction::Count => "count",
            TotalFunction::CountNums => "count_nums",
            TotalFunction::Max => "max",
            TotalFunction::Min => "min",
            TotalFunction::Sum => "sum",
            TotalFunction::StdDev => "std_dev",
            TotalFunction::Var => "var",
        }
    }
}

/// One declared column
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub name: String,
    pub kind: ColumnKind,
    pub total_function: Option<TotalFunction>,
    pub total_label: Option<String>,
}

impl ColumnDef {
    /// Column with no total-row options
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            total_function: None,
            total_label: None,
        }
    }

    /// Aggregate for this column when the table has a total row
    pub fn set_total_function(mut self, function: TotalFunction) -> Self {
        self.total_function = Some(function);
        self
    }

    /// Fixed text for this column's total-row cell
    pub fn set_total_label(mut self, label: impl Into<String>) -> Self {
        self.total_label = Some(label.into());
        self
    }

    /// The formula template of a formula column
    pub fn template(&self) -> Option<&FormulaTemplate> {
        match &self.kind {
            ColumnKind::Formula { template, .. } => Some(template),
            ColumnKind::Value(_) => None,
        }
    }
}

/// A formula template that failed to tokenize, kept until validation
#[derive(Debug, Clone)]
struct PendingError {
    column: String,
    message: String,
}

/// Ordered column declarations
///
/// Builder methods never fail; problems are collected and reported by
/// [`ColumnSpec::validate`], which table construction calls before reading
/// any record.
///
/// ```
/// use xltable::{CellValue, ColumnSpec};
///
/// let spec = ColumnSpec::new()
///     .path("romeo", "alpha.papa.romeo")
///     .implicit("bravo")
///     .function("constant", |_| CellValue::from(1))
///     .formula("double", "={bravo}*2");
/// assert_eq!(spec.names().collect::<Vec<_>>(), ["romeo", "bravo", "constant", "double"]);
/// assert!(spec.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ColumnSpec {
    columns: Vec<ColumnDef>,
    pending: Vec<PendingError>,
}

impl ColumnSpec {
    /// An empty spec; add columns with the builder methods
    pub fn new() -> Self {
        Self::default()
    }

    /// Column read from a dotted path
    pub fn path(self, name: impl Into<String>, path: &str) -> Self {
        let kind = ColumnKind::Value(Accessor::Path(RecordPath::parse(path)));
        self.column(ColumnDef::new(name, kind))
    }

    /// Column read from the record key equal to its own name
    pub fn implicit(self, name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = ColumnKind::Value(Accessor::Path(RecordPath::single(name.clone())));
        self.column(ColumnDef::new(name, kind))
    }

    /// Column computed by an infallible function
    pub fn function<F, V>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Record) -> V + Send + Sync + 'static,
        V: Into<CellValue>,
    {
        let accessor = Accessor::function(move |record| Ok(f(record).into()));
        self.column(ColumnDef::new(name, ColumnKind::Value(accessor)))
    }

    /// Column computed by a fallible function. The first error aborts table
    /// construction with [`Error::Accessor`].
    pub fn try_function<F, V, E>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Record) -> std::result::Result<V, E> + Send + Sync + 'static,
        V: Into<CellValue>,
        E: Into<AccessorError>,
    {
        let accessor = Accessor::function(move |record| match f(record) {
            Ok(value) => Ok(value.into()),
            Err(e) => Err(e.into()),
        });
        self.column(ColumnDef::new(name, ColumnKind::Value(accessor)))
    }

    /// Formula-only column
    pub fn formula(self, name: impl Into<String>, template: &str) -> Self {
        self.formula_with(name, Accessor::empty(), template)
    }

    /// Formula column whose cached result comes from `data`
    pub fn formula_with(mut self, name: impl Into<String>, data: Accessor, template: &str) -> Self {
        let name = name.into();
        match FormulaTemplate::parse(template) {
            Ok(template) => self.column(ColumnDef::new(name, ColumnKind::Formula { data, template })),
            Err(e) => {
                self.pending.push(PendingError {
                    column: name,
                    message: e.to_string(),
                });
                self
            }
        }
    }

    /// Append a fully built column
    pub fn column(mut self, def: ColumnDef) -> Self {
        self.columns.push(def);
        self
    }

    /// Number of declared columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when no column has been declared
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Declared columns in worksheet order
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Column names in worksheet order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Check the spec without touching any record.
    ///
    /// Returns the 0-based position of every column by name.
    pub fn validate(&self) -> Result<HashMap<&str, usize>> {
        if let Some(pending) = self.pending.first() {
            return Err(Error::InvalidFormula {
                column: pending.column.clone(),
                message: pending.message.clone(),
            });
        }
        if self.columns.is_empty() {
            return Err(Error::EmptyColumnSpec);
        }
        if self.columns.len() > MAX_COLS as usize {
            let col = self.columns.len() as u64 - 1;
            return Err(xltable_core::Error::ColumnOutOfBounds { col }.into());
        }

        // Worksheet table headers are unique regardless of case.
        let mut headers = HashSet::with_capacity(self.columns.len());
        let mut positions = HashMap::with_capacity(self.columns.len());
        for (index, column) in self.columns.iter().enumerate() {
            if column.name.is_empty() {
                return Err(Error::EmptyColumnName);
            }
            if !headers.insert(column.name.to_lowercase()) {
                return Err(Error::DuplicateColumn(column.name.clone()));
            }
            positions.insert(column.name.as_str(), index);
        }

        for column in &self.columns {
            if let Some(template) = column.template() {
                if let Some(reference) = template.placeholders().find(|p| !positions.contains_key(p)) {
                    return Err(Error::UnknownFormulaColumn {
                        column: column.name.clone(),
                        reference: reference.to_string(),
                    });
                }
            }
        }

        Ok(positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessor_kinds() {
        let record = json!({"alpha": {"quebec": true}, "bravo": 2});
        let spec = ColumnSpec::new()
            .path("quebec", "alpha.quebec")
            .implicit("bravo")
            .function("label", |r: &Record| r["bravo"].as_f64().map(|n| n * 10.0));

        let values: Vec<_> = spec
            .columns()
            .iter()
            .map(|c| match &c.kind {
                ColumnKind::Value(accessor) => accessor.read(&record).unwrap(),
                ColumnKind::Formula { .. } => unreachable!(),
            })
            .collect();
        assert_eq!(
            values,
            vec![CellValue::Boolean(true), CellValue::Number(2.0), CellValue::Number(20.0)]
        );
    }

    #[test]
    fn test_implicit_does_not_split_name() {
        let spec = ColumnSpec::new().implicit("a.b");
        match &spec.columns()[0].kind {
            ColumnKind::Value(Accessor::Path(path)) => assert_eq!(path.segments(), ["a.b"]),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_validate_positions() {
        let spec = ColumnSpec::new()
            .implicit("bravo")
            .implicit("charlie")
            .formula("delta", "=AVERAGE({bravo}, {charlie})");
        let positions = spec.validate().unwrap();
        assert_eq!(positions["bravo"], 0);
        assert_eq!(positions["delta"], 2);
    }

    #[test]
    fn test_validate_errors() {
        assert!(matches!(ColumnSpec::new().validate(), Err(Error::EmptyColumnSpec)));

        let spec = ColumnSpec::new().implicit("bravo").implicit("bravo");
        assert!(matches!(spec.validate(), Err(Error::DuplicateColumn(name)) if name == "bravo"));

        let spec = ColumnSpec::new().implicit("Bravo").path("bravo", "alpha.bravo");
        assert!(matches!(spec.validate(), Err(Error::DuplicateColumn(name)) if name == "bravo"));

        let spec = ColumnSpec::new().implicit("");
        assert!(matches!(spec.validate(), Err(Error::EmptyColumnName)));

        let spec = ColumnSpec::new().implicit("bravo").formula("delta", "={echo}+1");
        assert!(matches!(
            spec.validate(),
            Err(Error::UnknownFormulaColumn { column, reference })
                if column == "delta" && reference == "echo"
        ));

        let spec = ColumnSpec::new().implicit("bravo").formula("delta", "={bravo");
        assert!(matches!(
            spec.validate(),
            Err(Error::InvalidFormula { column, .. }) if column == "delta"
        ));
    }

    #[test]
    fn test_formula_may_reference_later_columns() {
        let spec = ColumnSpec::new()
            .formula("total", "={a}+{b}")
            .implicit("a")
            .implicit("b");
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_try_function_error() {
        let spec = ColumnSpec::new().try_function("n", |r: &Record| {
            r["n"].as_f64().ok_or("n is not a number")
        });
        let ColumnKind::Value(accessor) = &spec.columns()[0].kind else {
            panic!("expected value column");
        };
        assert_eq!(accessor.read(&json!({"n": 1})).unwrap(), CellValue::Number(1.0));
        let err = accessor.read(&json!({"n": "x"})).unwrap_err();
        assert_eq!(err.to_string(), "n is not a number");
    }

    #[test]
    fn test_total_function_names() {
        assert_eq!(TotalFunction::CountNums.as_str(), "count_nums");
        assert_eq!(serde_json::to_string(&TotalFunction::StdDev).unwrap(), "\"std_dev\"");
        let parsed: TotalFunction = serde_json::from_str("\"sum\"").unwrap();
        assert_eq!(parsed, TotalFunction::Sum);
    }
}
