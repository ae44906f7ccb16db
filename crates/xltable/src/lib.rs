//! # xltable
//!
//! Turn collections of nested records into worksheet table definitions.
//!
//! A [`ColumnSpec`] declares the output columns in order. Each column reads
//! its cell from a record through a dotted path, the key named like the
//! column, a function, or renders a per-row formula whose `{column}`
//! placeholders become cell references. [`ExcelTable`] resolves the spec
//! against the records once and exposes:
//!
//! - [`ExcelTable::columns`] - column descriptors (header, column formula, totals)
//! - [`ExcelTable::data`] - one row of [`CellValue`]s per record
//! - [`ExcelTable::coordinates`] - `(first_row, first_col, last_row, last_col)`
//!
//! These are shaped for a worksheet `add_table` call. Writing the workbook
//! itself is left to the caller.
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use xltable::prelude::*;
//!
//! let records = vec![
//!     json!({"alpha": {"papa": {"romeo": "Alabama"}}, "bravo": 2, "charlie": 3}),
//!     json!({"alpha": null, "bravo": 5, "charlie": 6}),
//! ];
//!
//! let spec = ColumnSpec::new()
//!     .path("romeo", "alpha.papa.romeo")
//!     .implicit("bravo")
//!     .implicit("charlie")
//!     .formula("delta", "=AVERAGE({bravo}, {charlie})");
//!
//! let table = ExcelTable::with_options(
//!     &records,
//!     &spec,
//!     TableOptions::new().set_name("Table1").set_total_row(true),
//! )?;
//!
//! assert_eq!(table.coordinates(), (0, 0, 3, 3));
//! assert_eq!(table.data()[1][0], CellValue::Empty);
//! assert_eq!(table.data()[1][3], CellValue::formula("=AVERAGE(B3, C3)"));
//! # Ok::<(), xltable::Error>(())
//! ```

pub mod column;
pub mod config;
pub mod error;
pub mod formula;
pub mod layout;
pub mod prelude;
pub mod record;
pub mod table;

pub use column::{Accessor, ColumnDef, ColumnKind, ColumnSpec, TotalFunction};
pub use config::{ColumnConfig, ConfigError, ConfigResult, DetailedColumn, TableConfig};
pub use error::{AccessorError, Error, Result};
pub use formula::{FormulaTemplate, TemplateError};
pub use record::{Record, RecordPath};
pub use table::{ColumnDescriptor, DefinitionOptions, ExcelTable, TableDefinition, TableOptions};

// Re-export core types
pub use xltable_core::{CellAddress, CellError, CellRange, CellValue, SharedString, MAX_COLS, MAX_ROWS};
