//! # xltable-core
//!
//! Worksheet addressing and cell values shared by the xltable crates.
//!
//! - [`CellAddress`] / [`CellRange`]: 0-based positions with A1 parsing and
//!   formatting, bounds-checked against the worksheet grid
//! - [`CellValue`]: what a table cell resolves to, with [`CellValue::Empty`]
//!   as the missing-value sentinel
//!
//! ```rust
//! use xltable_core::{CellAddress, CellRange, CellValue};
//!
//! let anchor = CellAddress::parse("B3").unwrap();
//! let corner = anchor.offset(3, 4).unwrap();
//! let range = CellRange::new(anchor, corner);
//! assert_eq!(range.to_string(), "B3:F6");
//! assert_eq!(range.to_tuple(), (2, 1, 5, 5));
//!
//! assert!(CellValue::from(None::<f64>).is_empty());
//! ```

pub mod cell;
pub mod error;

pub use cell::{CellAddress, CellError, CellRange, CellValue, SharedString};
pub use error::{Error, Result};

/// Rows per worksheet
pub const MAX_ROWS: u32 = 1_048_576;

/// Columns per worksheet (`A` through `XFD`)
pub const MAX_COLS: u16 = 16_384;
