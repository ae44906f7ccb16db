//! Table construction
//!
//! [`ExcelTable`] resolves a [`ColumnSpec`] against a slice of records once
//! and keeps the three results a worksheet table call needs: the column
//! descriptors, the row-major data matrix and the coordinate rectangle.

use crate::column::{ColumnDef, ColumnKind, ColumnSpec, TotalFunction};
use crate::error::{Error, Result};
use crate::formula::FormulaTemplate;
use crate::layout::{record_row_number, table_range};
use crate::record::Record;
use serde::Serialize;
use std::collections::HashMap;
use xltable_core::{CellAddress, CellRange, CellValue};

/// Longest table name a worksheet accepts
pub const MAX_TABLE_NAME_LEN: usize = 255;

/// Options that travel with the table to the worksheet
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableOptions {
    name: Option<String>,
    style: Option<String>,
    total_row: bool,
    anchor: CellAddress,
}

impl TableOptions {
    /// Options for an unnamed, unstyled table anchored at A1 with no total row
    pub fn new() -> Self {
        Self::default()
    }

    /// Table name, e.g. `Table1`
    pub fn set_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Visual style, e.g. `Table Style Light 15`
    pub fn set_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Reserve a total row below the data
    pub fn set_total_row(mut self, total_row: bool) -> Self {
        self.total_row = total_row;
        self
    }

    /// Top-left cell of the header row
    pub fn set_anchor(mut self, anchor: CellAddress) -> Self {
        self.anchor = anchor;
        self
    }

    /// Table name, if one was set
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Table style, if one was set
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    /// Whether a total row is reserved below the data
    pub fn total_row(&self) -> bool {
        self.total_row
    }

    /// Top-left cell of the header row
    pub fn anchor(&self) -> CellAddress {
        self.anchor
    }

    /// Check the table name against worksheet naming rules
    pub fn validate(&self) -> Result<()> {
        match &self.name {
            Some(name) => validate_table_name(name),
            None => Ok(()),
        }
    }
}

fn validate_table_name(name: &str) -> Result<()> {
    let invalid = |reason| {
        Err(Error::InvalidTableName {
            name: name.to_string(),
            reason,
        })
    };

    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return invalid("name is empty");
    };
    if name.chars().count() > MAX_TABLE_NAME_LEN {
        return invalid("name is longer than 255 characters");
    }
    if !(first.is_alphabetic() || first == '_' || first == '\\') {
        return invalid("name must start with a letter, underscore or backslash");
    }
    if !chars.all(|c| c.is_alphanumeric() || c == '_' || c == '.' || c == '\\') {
        return invalid("name may only contain letters, digits, periods and underscores");
    }
    if matches!(name, "R" | "r" | "C" | "c")
        || CellAddress::parse(name).is_ok()
        || is_r1c1_reference(name)
    {
        return invalid("name must not look like a cell reference");
    }
    Ok(())
}

/// `R1C1`, `r2c3`: a row marker and digits, then a column marker and digits
fn is_r1c1_reference(name: &str) -> bool {
    let Some(rest) = name.strip_prefix(['R', 'r']) else {
        return false;
    };
    let Some(split) = rest.find(['C', 'c']) else {
        return false;
    };
    let (row, col) = (&rest[..split], &rest[split + 1..]);
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(row) && all_digits(col)
}

/// One output column as a worksheet table expects it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescriptor {
    /// Header text
    pub header: String,
    /// Column formula with this-row structured references (`=[@bravo]*2`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    /// Total-row aggregate, only kept when the table has a total row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_function: Option<TotalFunction>,
    /// Total-row label, only kept when the table has a total row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_label: Option<String>,
    #[serde(skip)]
    template: Option<FormulaTemplate>,
}

impl ColumnDescriptor {
    fn from_def(def: &ColumnDef, total_row: bool) -> Self {
        let template = def.template().cloned();
        Self {
            header: def.name.clone(),
            formula: template.as_ref().map(FormulaTemplate::render_structured),
            total_function: def.total_function.filter(|_| total_row),
            total_label: def.total_label.clone().filter(|_| total_row),
            template,
        }
    }

    /// The formula template as declared, before substitution
    pub fn template(&self) -> Option<&FormulaTemplate> {
        self.template.as_ref()
    }
}

/// A resolved table
///
/// ```
/// use serde_json::json;
/// use xltable::{CellValue, ColumnSpec, ExcelTable};
///
/// let records = vec![json!({"bravo": 2, "charlie": 3})];
/// let spec = ColumnSpec::new()
///     .implicit("bravo")
///     .implicit("charlie")
///     .formula("delta", "=AVERAGE({bravo}, {charlie})");
///
/// let table = ExcelTable::new(&records, &spec).unwrap();
/// assert_eq!(table.coordinates(), (0, 0, 1, 2));
/// assert_eq!(table.data()[0][2], CellValue::formula("=AVERAGE(A2, B2)"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExcelTable {
    columns: Vec<ColumnDescriptor>,
    data: Vec<Vec<CellValue>>,
    range: CellRange,
    options: TableOptions,
}

impl ExcelTable {
    /// Resolve with default options: anchored at A1, no name, no total row
    pub fn new(records: &[Record], spec: &ColumnSpec) -> Result<Self> {
        Self::with_options(records, spec, TableOptions::default())
    }

    /// Resolve every column for every record.
    ///
    /// Configuration problems are reported before any record is read. Path
    /// misses become [`CellValue::Empty`]; the first accessor function error
    /// aborts with [`Error::Accessor`].
    pub fn with_options(records: &[Record], spec: &ColumnSpec, options: TableOptions) -> Result<Self> {
        let positions = spec.validate()?;
        options.validate()?;
        let anchor = options.anchor();
        let range = table_range(anchor, spec.len(), records.len(), options.total_row())?;

        let columns: Vec<ColumnDescriptor> = spec
            .columns()
            .iter()
            .map(|def| ColumnDescriptor::from_def(def, options.total_row()))
            .collect();

        // The range check above guarantees every column fits.
        let letters: Vec<String> = (0..spec.len())
            .map(|index| CellAddress::column_to_letters(anchor.col + index as u16))
            .collect();

        let mut data = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            data.push(resolve_row(spec, record, index)?);
        }

        for (index, row) in data.iter_mut().enumerate() {
            let row_number = record_row_number(anchor, index);
            render_formulas(spec, &positions, &letters, row_number, row);
        }

        tracing::debug!(
            columns = columns.len(),
            rows = data.len(),
            range = %range,
            "resolved table"
        );

        Ok(Self {
            columns,
            data,
            range,
            options,
        })
    }

    /// Column descriptors in declaration order
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// One row per record, one cell per column
    pub fn data(&self) -> &[Vec<CellValue>] {
        &self.data
    }

    /// `(first_row, first_col, last_row, last_col)`, 0-based
    pub fn coordinates(&self) -> (u32, u16, u32, u16) {
        self.range.to_tuple()
    }

    /// The table rectangle as a cell range (`A1:F4`)
    pub fn range(&self) -> CellRange {
        self.range
    }

    /// Options the table was built with
    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Number of data rows, one per record
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Number of declared columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Serializable view shaped like a worksheet `add_table` call
    pub fn definition(&self) -> TableDefinition<'_> {
        TableDefinition {
            coordinates: self.coordinates(),
            options: DefinitionOptions {
                name: self.options.name(),
                style: self.options.style(),
                total_row: self.options.total_row(),
                columns: &self.columns,
                data: &self.data,
            },
        }
    }
}

/// Direct values for one record; formula cells hold their data accessor's
/// value until [`render_formulas`] runs.
fn resolve_row(spec: &ColumnSpec, record: &Record, index: usize) -> Result<Vec<CellValue>> {
    spec.columns()
        .iter()
        .map(|def| {
            let accessor = match &def.kind {
                ColumnKind::Value(accessor) => accessor,
                ColumnKind::Formula { data, .. } => data,
            };
            accessor.read(record).map_err(|source| Error::Accessor {
                column: def.name.clone(),
                row: index,
                source,
            })
        })
        .collect()
}

fn render_formulas(
    spec: &ColumnSpec,
    positions: &HashMap<&str, usize>,
    letters: &[String],
    row_number: u64,
    row: &mut [CellValue],
) {
    for (def, cell) in spec.columns().iter().zip(row.iter_mut()) {
        if let Some(template) = def.template() {
            let text = template.render(|name| match positions.get(name) {
                Some(&col) => format!("{}{}", letters[col], row_number),
                None => name.to_string(),
            });
            let cached = std::mem::take(cell);
            *cell = CellValue::formula_with_value(text, cached);
        }
    }
}

/// Borrowed, serializable table definition
#[derive(Debug, Serialize)]
pub struct TableDefinition<'a> {
    pub coordinates: (u32, u16, u32, u16),
    pub options: DefinitionOptions<'a>,
}

#[derive(Debug, Serialize)]
pub struct DefinitionOptions<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<&'a str>,
    pub total_row: bool,
    pub columns: &'a [ColumnDescriptor],
    pub data: &'a [Vec<CellValue>],
}
