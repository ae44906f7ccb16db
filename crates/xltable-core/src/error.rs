//! Addressing errors

use crate::{MAX_COLS, MAX_ROWS};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Text that is not an A1 cell address
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Text that is not an A1 range
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// 0-based row past the last worksheet row
    #[error("Row {} is past the last worksheet row ({})", .row + 1, MAX_ROWS)]
    RowOutOfBounds { row: u64 },

    /// 0-based column past the last worksheet column
    #[error("Column {} is past the last worksheet column ({})", .col + 1, MAX_COLS)]
    ColumnOutOfBounds { col: u64 },
}
