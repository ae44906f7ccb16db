//! A1 addresses and table rectangles

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A single worksheet cell, stored 0-based
///
/// Displayed in A1 notation (`C7`); `$` flags mark absolute parts (`$C$7`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellAddress {
    /// 0-based row (displayed + 1)
    pub row: u32,
    /// 0-based column, A = 0 through XFD = 16383
    pub col: u16,
    pub row_absolute: bool,
    pub col_absolute: bool,
}

impl CellAddress {
    /// Create a relative cell address
    pub fn new(row: u32, col: u16) -> Self {
        Self {
            row,
            col,
            ..Self::default()
        }
    }

    /// `$A$1` style address
    pub fn absolute(row: u32, col: u16) -> Self {
        Self {
            row,
            col,
            row_absolute: true,
            col_absolute: true,
        }
    }

    /// Parse A1 notation
    ///
    /// ```
    /// use xltable_core::CellAddress;
    ///
    /// let anchor = CellAddress::parse("$C5").unwrap();
    /// assert_eq!((anchor.row, anchor.col), (4, 2));
    /// assert!(anchor.col_absolute && !anchor.row_absolute);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let text = s.trim();
        let invalid = |what: &str| Error::InvalidAddress(format!("{what} in '{text}'"));

        if text.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let (col_absolute, rest) = strip_dollar(text);
        let split = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        let (letters, rest) = rest.split_at(split);
        if letters.is_empty() {
            return Err(invalid("no column letters"));
        }
        let col = Self::letters_to_column(letters)?;

        let (row_absolute, digits) = strip_dollar(rest);
        if digits.is_empty() {
            return Err(invalid("no row number"));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("invalid row number"));
        }

        // Long digit strings overflow u64 and are out of range anyway.
        let number: u64 = digits
            .parse()
            .map_err(|_| Error::RowOutOfBounds { row: u64::MAX - 1 })?;
        let row = match number {
            0 => return Err(invalid("row 0")),
            n if n > MAX_ROWS as u64 => return Err(Error::RowOutOfBounds { row: n - 1 }),
            n => (n - 1) as u32,
        };

        Ok(Self {
            row,
            col,
            row_absolute,
            col_absolute,
        })
    }

    /// 0 → `A`, 25 → `Z`, 26 → `AA`
    pub fn column_to_letters(col: u16) -> String {
        let mut letters = Vec::with_capacity(3);
        let mut n = u32::from(col) + 1;
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push(b'A' + rem as u8);
            n = (n - 1) / 26;
        }
        letters.iter().rev().map(|&b| char::from(b)).collect()
    }

    /// `A` → 0, `aa` → 26; anything past `XFD` is out of bounds
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let number = letters.chars().try_fold(0u64, |acc, c| {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!("invalid column letter '{c}'")));
            }
            let next = acc * 26 + u64::from(c.to_ascii_uppercase() as u8 - b'A') + 1;
            if next > MAX_COLS as u64 {
                return Err(Error::ColumnOutOfBounds { col: next - 1 });
            }
            Ok(next)
        })?;

        Ok((number - 1) as u16)
    }

    /// The address `rows` down and `cols` right, if it is still on the grid
    pub fn offset(&self, rows: u64, cols: u64) -> Result<Self> {
        let row = u64::from(self.row) + rows;
        let col = u64::from(self.col) + cols;
        if row >= MAX_ROWS as u64 {
            return Err(Error::RowOutOfBounds { row });
        }
        if col >= MAX_COLS as u64 {
            return Err(Error::ColumnOutOfBounds { col });
        }
        Ok(Self {
            row: row as u32,
            col: col as u16,
            ..*self
        })
    }

    /// Format as A1 notation, keeping `$` flags
    pub fn to_a1_string(&self) -> String {
        let dollar = |absolute: bool| if absolute { "$" } else { "" };
        format!(
            "{}{}{}{}",
            dollar(self.col_absolute),
            Self::column_to_letters(self.col),
            dollar(self.row_absolute),
            u64::from(self.row) + 1
        )
    }
}

fn strip_dollar(s: &str) -> (bool, &str) {
    match s.strip_prefix('$') {
        Some(rest) => (true, rest),
        None => (false, s),
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Inclusive rectangle, always stored top-left to bottom-right with relative
/// corners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub start: CellAddress,
    pub end: CellAddress,
}

impl CellRange {
    /// Create a range spanning both corners, in any order
    pub fn new(a: CellAddress, b: CellAddress) -> Self {
        Self {
            start: CellAddress::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellAddress::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Create a range from 0-based corner indices
    pub fn from_indices(first_row: u32, first_col: u16, last_row: u32, last_col: u16) -> Self {
        Self::new(
            CellAddress::new(first_row, first_col),
            CellAddress::new(last_row, last_col),
        )
    }

    /// Parse `B2:D4`, or a single cell as a one-cell range
    pub fn parse(s: &str) -> Result<Self> {
        let text = s.trim();
        let mut corners = text.split(':');
        let first = corners.next().unwrap_or_default();
        let second = corners.next();
        if corners.next().is_some() {
            return Err(Error::InvalidRange(text.to_string()));
        }

        let start = CellAddress::parse(first)?;
        let end = match second {
            Some(corner) => CellAddress::parse(corner)?,
            None => start,
        };
        Ok(Self::new(start, end))
    }

    /// Check if a cell lies inside the range
    pub fn contains(&self, addr: &CellAddress) -> bool {
        (self.start.row..=self.end.row).contains(&addr.row)
            && (self.start.col..=self.end.col).contains(&addr.col)
    }

    /// Number of rows covered
    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Number of columns covered
    pub fn col_count(&self) -> u16 {
        self.end.col - self.start.col + 1
    }

    /// `(first_row, first_col, last_row, last_col)`, the positional form
    /// worksheet table APIs take.
    pub fn to_tuple(&self) -> (u32, u16, u32, u16) {
        (self.start.row, self.start.col, self.end.row, self.end.col)
    }

    /// Format as `B2:D4`, or `C3` for a single cell
    pub fn to_a1_string(&self) -> String {
        if self.start == self.end {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start, self.end)
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters_both_ways() {
        for (col, letters) in [(0, "A"), (25, "Z"), (26, "AA"), (701, "ZZ"), (702, "AAA"), (16383, "XFD")] {
            assert_eq!(CellAddress::column_to_letters(col), letters);
            assert_eq!(CellAddress::letters_to_column(letters).unwrap(), col);
        }
        assert_eq!(CellAddress::letters_to_column("ab").unwrap(), 27);
    }

    #[test]
    fn test_letters_past_last_column() {
        assert!(matches!(
            CellAddress::letters_to_column("XFE"),
            Err(Error::ColumnOutOfBounds { col: 16_384 })
        ));
        assert!(CellAddress::letters_to_column("ZZZZZZZZZZZZZZ").is_err());
        assert!(CellAddress::letters_to_column("A1").is_err());
    }

    #[test]
    fn test_parse_anchor() {
        let addr = CellAddress::parse("B2").unwrap();
        assert_eq!(addr, CellAddress::new(1, 1));

        let addr: CellAddress = " $A$1 ".parse().unwrap();
        assert_eq!(addr, CellAddress::absolute(0, 0));

        let addr = CellAddress::parse("XFD1048576").unwrap();
        assert_eq!((addr.row, addr.col), (1_048_575, 16_383));
    }

    #[test]
    fn test_parse_rejects() {
        for bad in ["", "A", "1", "A0", "A1B", "$$A1", "A1048577", "A99999999999999999999999"] {
            assert!(CellAddress::parse(bad).is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_offset_stays_on_grid() {
        let addr = CellAddress::absolute(1, 2).offset(3, 4).unwrap();
        assert_eq!((addr.row, addr.col), (4, 6));
        assert!(addr.row_absolute);

        assert!(CellAddress::new(0, 0).offset(MAX_ROWS as u64, 0).is_err());
        assert!(CellAddress::new(0, 16_000).offset(0, 384).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(CellAddress::new(99, 2).to_string(), "C100");
        assert_eq!(CellAddress::absolute(0, 27).to_string(), "$AB$1");
    }

    #[test]
    fn test_range_normalizes() {
        let range = CellRange::parse("D4:$B$2").unwrap();
        assert_eq!(range.start, CellAddress::new(1, 1));
        assert_eq!(range.end, CellAddress::new(3, 3));
        assert_eq!((range.row_count(), range.col_count()), (3, 3));
        assert_eq!(range.to_tuple(), (1, 1, 3, 3));
        assert_eq!(range.to_string(), "B2:D4");

        assert!(range.contains(&CellAddress::new(2, 2)));
        assert!(!range.contains(&CellAddress::new(4, 1)));
    }

    #[test]
    fn test_range_single_cell_and_errors() {
        assert_eq!(CellRange::parse("C3").unwrap().to_string(), "C3");
        assert_eq!(CellRange::from_indices(0, 0, 0, 0).to_a1_string(), "A1");
        assert!(CellRange::parse("A1:B2:C3").is_err());
        assert!(CellRange::parse("A1:").is_err());
    }
}
