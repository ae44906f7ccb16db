//! Cell positions and contents

mod address;
mod value;

pub use address::{CellAddress, CellRange};
pub use value::{CellError, CellValue, SharedString};
