//! Table placement on the worksheet

use crate::error::{Error, Result};
use xltable_core::{CellAddress, CellRange};

/// Inclusive rectangle a table occupies: header row, one row per record and
/// the optional total row, across every declared column.
///
/// ```
/// use xltable::layout::table_range;
/// use xltable::CellAddress;
///
/// let range = table_range(CellAddress::new(0, 0), 5, 3, false).unwrap();
/// assert_eq!(range.to_tuple(), (0, 0, 3, 4));
///
/// let range = table_range(CellAddress::new(0, 0), 5, 3, true).unwrap();
/// assert_eq!(range.to_tuple(), (0, 0, 4, 4));
/// ```
pub fn table_range(
    anchor: CellAddress,
    column_count: usize,
    record_count: usize,
    total_row: bool,
) -> Result<CellRange> {
    if column_count == 0 {
        return Err(Error::EmptyColumnSpec);
    }

    let start = CellAddress::new(anchor.row, anchor.col);
    let rows = record_count as u64 + u64::from(total_row);
    let end = start.offset(rows, column_count as u64 - 1)?;
    Ok(CellRange::new(start, end))
}

/// 1-based worksheet row number of the record at `index`.
pub fn record_row_number(anchor: CellAddress, index: usize) -> u64 {
    anchor.row as u64 + index as u64 + 2
}
