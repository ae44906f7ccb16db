//! Declarative table configuration
//!
//! A JSON document describes the table; column order follows the order of
//! keys in the `columns` object:
//!
//! ```json
//! {
//!   "name": "Table1",
//!   "style": "Table Style Light 15",
//!   "total_row": true,
//!   "anchor": "A1",
//!   "columns": {
//!     "quebec": "alpha.quebec",
//!     "bravo": null,
//!     "delta": { "formula": "=AVERAGE({bravo}, {charlie})" }
//!   }
//! }
//! ```
//!
//! A column maps to `null` (read the key named like the column), a dotted
//! path string, or an object with `path`, `formula`, `total_function` and
//! `total_label`. Without `formula` the object describes a path column whose
//! path defaults to the column name.

use crate::column::{Accessor, ColumnDef, ColumnKind, ColumnSpec, TotalFunction};
use crate::formula::FormulaTemplate;
use crate::record::{Record, RecordPath};
use crate::table::{ExcelTable, TableOptions};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use xltable_core::CellAddress;

/// Result type for configuration loading
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Errors raised while loading configuration or records
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid anchor '{anchor}': {source}")]
    Anchor {
        anchor: String,
        #[source]
        source: xltable_core::Error,
    },

    #[error("Records must be a JSON array, found {0}")]
    NotAnArray(&'static str),

    #[error(transparent)]
    Table(#[from] crate::Error),
}

/// Whole-table configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default)]
    pub total_row: bool,
    /// Header row top-left cell in A1 notation (default `A1`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    pub columns: IndexMap<String, Option<ColumnConfig>>,
}

/// One column entry; `null` entries are `None` in [`TableConfig::columns`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnConfig {
    Path(String),
    Detailed(DetailedColumn),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetailedColumn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_function: Option<TotalFunction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_label: Option<String>,
}

impl TableConfig {
    /// Parse a configuration from JSON text
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a configuration file
    pub fn from_path<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let json = read_file(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Build and validate the runtime column spec
    pub fn column_spec(&self) -> ConfigResult<ColumnSpec> {
        let mut spec = ColumnSpec::new();
        for (name, column) in &self.columns {
            spec = match column {
                None => spec.implicit(name.as_str()),
                Some(ColumnConfig::Path(path)) => spec.path(name.as_str(), path),
                Some(ColumnConfig::Detailed(detail)) => spec.column(detailed_column(name, detail)?),
            };
        }
        spec.validate()?;
        Ok(spec)
    }

    /// Build validated table options; the anchor defaults to A1
    pub fn table_options(&self) -> ConfigResult<TableOptions> {
        let mut options = TableOptions::new().set_total_row(self.total_row);
        if let Some(name) = &self.name {
            options = options.set_name(name.as_str());
        }
        if let Some(style) = &self.style {
            options = options.set_style(style.as_str());
        }
        if let Some(anchor) = &self.anchor {
            let address = CellAddress::parse(anchor).map_err(|source| ConfigError::Anchor {
                anchor: anchor.clone(),
                source,
            })?;
            options = options.set_anchor(address);
        }
        options.validate()?;
        Ok(options)
    }

    /// Resolve `records` with this configuration
    pub fn build(&self, records: &[Record]) -> ConfigResult<ExcelTable> {
        let spec = self.column_spec()?;
        let options = self.table_options()?;
        Ok(ExcelTable::with_options(records, &spec, options)?)
    }
}

fn detailed_column(name: &str, detail: &DetailedColumn) -> ConfigResult<ColumnDef> {
    let path = match &detail.path {
        Some(path) => RecordPath::parse(path),
        None => RecordPath::single(name),
    };

    let kind = match &detail.formula {
        Some(formula) => {
            let template = FormulaTemplate::parse(formula).map_err(|e| crate::Error::InvalidFormula {
                column: name.to_string(),
                message: e.to_string(),
            })?;
            let data = match &detail.path {
                Some(_) => Accessor::Path(path),
                None => Accessor::empty(),
            };
            ColumnKind::Formula { data, template }
        }
        None => ColumnKind::Value(Accessor::Path(path)),
    };

    let mut def = ColumnDef::new(name, kind);
    def.total_function = detail.total_function;
    def.total_label = detail.total_label.clone();
    Ok(def)
}

/// Read a JSON array of records
pub fn records_from_reader<R: Read>(reader: R) -> ConfigResult<Vec<Record>> {
    match serde_json::from_reader::<_, Record>(reader)? {
        Record::Array(records) => Ok(records),
        other => Err(ConfigError::NotAnArray(json_type_name(&other))),
    }
}

/// Read a file holding a JSON array of records
pub fn records_from_path<P: AsRef<Path>>(path: P) -> ConfigResult<Vec<Record>> {
    let json = read_file(path.as_ref())?;
    records_from_reader(json.as_bytes())
}

fn read_file(path: &Path) -> ConfigResult<String> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn json_type_name(value: &Record) -> &'static str {
    match value {
        Record::Null => "null",
        Record::Bool(_) => "a boolean",
        Record::Number(_) => "a number",
        Record::String(_) => "a string",
        Record::Array(_) => "an array",
        Record::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;
    use xltable_core::CellValue;

    const CONFIG: &str = r#"{
        "name": "Table1",
        "total_row": true,
        "anchor": "B2",
        "columns": {
            "romeo": "alpha.papa.romeo",
            "bravo": null,
            "charlie": {"total_function": "sum", "total_label": "Total"},
            "delta": {"formula": "=AVERAGE({bravo}, {charlie})"},
            "echo": {"path": "alpha.cached", "formula": "={bravo}*2"}
        }
    }"#;

    #[test]
    fn test_column_order_and_kinds() {
        let config = TableConfig::from_json_str(CONFIG).unwrap();
        let spec = config.column_spec().unwrap();
        assert_eq!(
            spec.names().collect::<Vec<_>>(),
            ["romeo", "bravo", "charlie", "delta", "echo"]
        );
        assert_eq!(spec.columns()[2].total_function, Some(TotalFunction::Sum));
        assert!(spec.columns()[3].template().is_some());
    }

    #[test]
    fn test_build() {
        let config = TableConfig::from_json_str(CONFIG).unwrap();
        let records = vec![json!({
            "alpha": {"papa": {"romeo": "Alabama"}, "cached": 4},
            "bravo": 2,
            "charlie": 3
        })];
        let table = config.build(&records).unwrap();

        assert_eq!(table.coordinates(), (1, 1, 3, 5));
        assert_eq!(
            table.data()[0],
            vec![
                CellValue::string("Alabama"),
                CellValue::Number(2.0),
                CellValue::Number(3.0),
                CellValue::formula("=AVERAGE(C3, D3)"),
                CellValue::formula_with_value("=C3*2", CellValue::Number(4.0)),
            ]
        );
        assert_eq!(table.columns()[2].total_label.as_deref(), Some("Total"));
    }

    #[test]
    fn test_config_errors() {
        let unknown = r#"{"columns": {"a": {"formula": "={b}"}}}"#;
        let err = TableConfig::from_json_str(unknown).unwrap().column_spec().unwrap_err();
        assert!(matches!(err, ConfigError::Table(Error::UnknownFormulaColumn { .. })));

        let empty = r#"{"columns": {}}"#;
        let err = TableConfig::from_json_str(empty).unwrap().column_spec().unwrap_err();
        assert!(matches!(err, ConfigError::Table(Error::EmptyColumnSpec)));

        let anchor = r#"{"anchor": "1A", "columns": {"a": null}}"#;
        let err = TableConfig::from_json_str(anchor).unwrap().table_options().unwrap_err();
        assert!(matches!(err, ConfigError::Anchor { .. }));

        let typo = r#"{"columns": {"a": {"formulae": "=1"}}}"#;
        assert!(matches!(TableConfig::from_json_str(typo), Err(ConfigError::Json(_))));

        let bad_total = r#"{"columns": {"a": {"total_function": "median"}}}"#;
        assert!(matches!(TableConfig::from_json_str(bad_total), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_records() {
        let records = records_from_reader(r#"[{"a": 1}, {"a": null}]"#.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);

        let err = records_from_reader(r#"{"a": 1}"#.as_bytes()).unwrap_err();
        assert!(matches!(err, ConfigError::NotAnArray("an object")));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();
        let config = TableConfig::from_path(file.path()).unwrap();
        assert_eq!(config.name.as_deref(), Some("Table1"));

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            TableConfig::from_path(&missing),
            Err(ConfigError::Io { .. })
        ));
    }
}
