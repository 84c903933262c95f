// A1-style cell references ("B7", "aa12").

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid cell reference '{0}'")]
pub struct CellRefError(pub String);

/// Largest column a worksheet can have (`ZZZ`).
pub const MAX_COLUMNS: usize = 18_278;
/// Largest row number a worksheet can have.
pub const MAX_ROWS: usize = 10_000_000;

/// Zero-based cell coordinates parsed from A1 notation.
///
/// Parsing rejects references beyond `MAX_COLUMNS` / `MAX_ROWS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl FromStr for CellRef {
    type Err = CellRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let err = || CellRefError(text.to_string());

        let split = text
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(err)?;
        let (letters, digits) = text.split_at(split);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(err());
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(err());
        }

        let mut col: usize = 0;
        for c in letters.chars() {
            let value = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
            col = col
                .checked_mul(26)
                .and_then(|v| v.checked_add(value))
                .filter(|&v| v <= MAX_COLUMNS)
                .ok_or_else(err)?;
        }
        let row: usize = digits.parse().map_err(|_| err())?;
        if row == 0 || row > MAX_ROWS {
            return Err(err());
        }

        Ok(Self {
            row: row - 1,
            col: col - 1,
        })
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut letters = Vec::new();
        let mut n = self.col + 1;
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push((b'A' + rem as u8) as char);
            n = (n - 1) / 26;
        }
        let column: String = letters.into_iter().rev().collect();
        write!(f, "{}{}", column, self.row + 1)
    }
}
