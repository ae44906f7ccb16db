//! Prelude module - common imports for xltable users
//!
//! ```rust
//! use xltable::prelude::*;
//! ```

pub use crate::{
    // Column declarations
    Accessor,
    // Core types
    CellAddress,
    CellRange,
    CellValue,
    ColumnSpec,
    // Error types
    Error,
    // Tables
    ExcelTable,
    Record,
    Result,
    TableConfig,
    TableOptions,
    TotalFunction,
};
