//! Cell address, offset and range types

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

/// A cell address (e.g., "A1", "$B$2")
///
/// Rows are 1-based as they appear in the sheet; columns are stored as the
/// zero-based bijective base-26 decoding of the column letters (A=0, Z=25,
/// AA=26). The `$` anchors are tracked per axis and only matter to
/// [`Address::offset`]: an anchored axis never moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    /// Row number (1-based)
    pub row: u32,
    /// Column number (0-based, A=0)
    pub col: u32,
    /// Whether the row is anchored ($)
    pub anchor_row: bool,
    /// Whether the column is anchored ($)
    pub anchor_col: bool,
}

impl Address {
    /// Create an unanchored address from a 1-based row and 0-based column
    pub const fn new(row: u32, col: u32) -> Self {
        Self {
            row,
            col,
            anchor_row: false,
            anchor_col: false,
        }
    }

    /// Create an address with the given anchors
    pub fn with_anchors(row: u32, col: u32, anchor_row: bool, anchor_col: bool) -> Self {
        Self {
            row,
            col,
            anchor_row,
            anchor_col,
        }
    }

    /// Parse an address of the form `[$]LETTERS[$]DIGITS`
    ///
    /// Returns `None` unless the whole string is consumed; there is no
    /// partial success.
    ///
    /// # Examples
    /// ```
    /// use statsbook_core::Address;
    ///
    /// let addr = Address::parse("A1").unwrap();
    /// assert_eq!(addr.row, 1);
    /// assert_eq!(addr.col, 0);
    ///
    /// let addr = Address::parse("$B$2").unwrap();
    /// assert!(addr.anchor_row && addr.anchor_col);
    ///
    /// assert!(Address::parse("B2C").is_none());
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        let mut pos = 0;

        let anchor_col = bytes.first() == Some(&b'$');
        if anchor_col {
            pos += 1;
        }

        let col_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_uppercase() {
            pos += 1;
        }
        let col = Self::column_number(&s[col_start..pos])?;

        let anchor_row = bytes.get(pos) == Some(&b'$');
        if anchor_row {
            pos += 1;
        }

        let digits = &s[pos..];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let row: u32 = digits.parse().ok()?;
        if row == 0 || row > MAX_ROWS {
            return None;
        }

        Some(Self {
            row,
            col,
            anchor_row,
            anchor_col,
        })
    }

    /// Convert column letters to a zero-based column number (A = 0, AA = 26)
    ///
    /// Only uppercase ASCII letters are accepted.
    pub fn column_number(letters: &str) -> Option<u32> {
        if letters.is_empty() {
            return None;
        }
        let mut acc: u32 = 0;
        for b in letters.bytes() {
            if !b.is_ascii_uppercase() {
                return None;
            }
            acc = acc.checked_mul(26)?.checked_add(u32::from(b - b'A') + 1)?;
        }
        let col = acc - 1;
        (col < MAX_COLS).then_some(col)
    }

    /// Convert a zero-based column number to letters (0 = A, 26 = AA)
    pub fn column_name(number: u32) -> String {
        if number < 26 {
            char::from(b'A' + number as u8).to_string()
        } else {
            Self::column_name(number / 26 - 1) + &Self::column_name(number % 26)
        }
    }

    /// The column letters of this address
    pub fn column(&self) -> String {
        Self::column_name(self.col)
    }

    /// The same cell with both anchors cleared
    pub fn unanchored(&self) -> Self {
        Self::new(self.row, self.col)
    }

    /// The row/column difference from this address to `other`
    pub fn delta(&self, other: &Address) -> Offset {
        Offset::new(
            i64::from(other.row) - i64::from(self.row),
            i64::from(other.col) - i64::from(self.col),
        )
    }

    /// Shift this address by `by`, leaving anchored axes where they are
    ///
    /// Returns `None` if the result would fall off the grid.
    pub fn offset(&self, by: Offset) -> Option<Self> {
        let row = if self.anchor_row {
            self.row
        } else {
            let row = i64::from(self.row) + by.rows;
            if row < 1 || row > i64::from(MAX_ROWS) {
                return None;
            }
            row as u32
        };
        let col = if self.anchor_col {
            self.col
        } else {
            let col = i64::from(self.col) + by.cols;
            if col < 0 || col >= i64::from(MAX_COLS) {
                return None;
            }
            col as u32
        };
        Some(Self { row, col, ..*self })
    }

    /// Like [`Address::offset`], reporting the failure as an error
    pub fn try_offset(&self, by: Offset) -> Result<Self> {
        self.offset(by).ok_or_else(|| Error::OffsetOutOfBounds {
            address: self.to_string(),
            rows: by.rows,
            cols: by.cols,
        })
    }

    /// The address one row below, regardless of anchors
    pub fn next_row(&self) -> Option<Self> {
        (self.row < MAX_ROWS).then(|| Self {
            row: self.row + 1,
            ..*self
        })
    }

    /// Create a range from this address to another
    pub fn to(&self, other: Address) -> AddressRange {
        AddressRange::new(*self, other)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.anchor_col {
            f.write_str("$")?;
        }
        f.write_str(&self.column())?;
        if self.anchor_row {
            f.write_str("$")?;
        }
        write!(f, "{}", self.row)
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| Error::InvalidAddress(s.to_string()))
    }
}

impl Add<Offset> for Address {
    type Output = Option<Address>;

    fn add(self, rhs: Offset) -> Option<Address> {
        self.offset(rhs)
    }
}

impl Sub for Address {
    type Output = Offset;

    /// `lhs - rhs` is the offset that takes `rhs` to `lhs`
    fn sub(self, rhs: Address) -> Offset {
        rhs.delta(&self)
    }
}

/// A signed row/column displacement between two cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    /// Row delta
    pub rows: i64,
    /// Column delta
    pub cols: i64,
}

impl Offset {
    /// No displacement
    pub const ZERO: Offset = Offset { rows: 0, cols: 0 };

    pub fn new(rows: i64, cols: i64) -> Self {
        Self { rows, cols }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl Add for Offset {
    type Output = Offset;

    fn add(self, rhs: Offset) -> Offset {
        Offset::new(self.rows + rhs.rows, self.cols + rhs.cols)
    }
}

impl Neg for Offset {
    type Output = Offset;

    fn neg(self) -> Offset {
        Offset::new(-self.rows, -self.cols)
    }
}

/// A rectangle of cells given by two corners (e.g., "A1:B10")
///
/// The corners may be given in any orientation; they are normalized so
/// `start` is the top-left and `end` the bottom-right. Anchors are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressRange {
    /// Top-left corner
    pub start: Address,
    /// Bottom-right corner
    pub end: Address,
}

impl AddressRange {
    pub fn new(a: Address, b: Address) -> Self {
        Self {
            start: Address::new(a.row.min(b.row), a.col.min(b.col)),
            end: Address::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Parse a range from `A1:B10` notation (a single address is a 1x1 range)
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidRange(s.to_string());
        match s.split_once(':') {
            Some((a, b)) => {
                let a = Address::parse(a).ok_or_else(invalid)?;
                let b = Address::parse(b).ok_or_else(invalid)?;
                Ok(Self::new(a, b))
            }
            None => {
                let a = Address::parse(s).ok_or_else(invalid)?;
                Ok(Self::new(a, a))
            }
        }
    }

    /// Check if a cell is within this range
    pub fn contains(&self, addr: &Address) -> bool {
        addr.row >= self.start.row
            && addr.row <= self.end.row
            && addr.col >= self.start.col
            && addr.col <= self.end.col
    }

    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    pub fn col_count(&self) -> u32 {
        self.end.col - self.start.col + 1
    }

    /// Number of cells in the range
    pub fn len(&self) -> usize {
        self.row_count() as usize * self.col_count() as usize
    }

    /// A range always holds at least one cell
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over every address, row by row, left to right
    pub fn iter(&self) -> AddressRangeIter {
        AddressRangeIter {
            range: *self,
            row: self.start.row,
            col: self.start.col,
            remaining: self.len(),
        }
    }
}

impl IntoIterator for AddressRange {
    type Item = Address;
    type IntoIter = AddressRangeIter;

    fn into_iter(self) -> AddressRangeIter {
        self.iter()
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

impl FromStr for AddressRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Row-major iterator over the cells of an [`AddressRange`]
#[derive(Debug, Clone)]
pub struct AddressRangeIter {
    range: AddressRange,
    row: u32,
    col: u32,
    remaining: usize,
}

impl Iterator for AddressRangeIter {
    type Item = Address;

    fn next(&mut self) -> Option<Address> {
        if self.remaining == 0 {
            return None;
        }
        let addr = Address::new(self.row, self.col);
        self.remaining -= 1;

        self.col += 1;
        if self.col > self.range.end.col {
            self.col = self.range.start.col;
            self.row += 1;
        }

        Some(addr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for AddressRangeIter {}
