use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of seat rows in the fixed cabin grid.
pub const CABIN_ROWS: u8 = 30;

/// Seat columns, window to window. C and D sit on the aisle.
pub const COLUMNS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

/// Rows 1..=BUSINESS_ROWS are business class.
pub const BUSINESS_ROWS: u8 = 5;

/// A seat in the cabin grid, e.g. "12C". Row first, then column, so the
/// derived ordering walks the cabin front to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeatId {
    row: u8,
    column: char,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseSeatError {
    #[error("seat identifier {0:?} is not of the form <row><column>")]
    Malformed(String),
    #[error("seat row {0} is outside the cabin grid")]
    RowOutOfRange(u32),
    #[error("seat column {0:?} is not one of A-F")]
    UnknownColumn(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatPosition {
    Window,
    Middle,
    Aisle,
}

impl SeatId {
    pub fn new(row: u8, column: char) -> Result<Self, ParseSeatError> {
        if row == 0 || row > CABIN_ROWS {
            return Err(ParseSeatError::RowOutOfRange(row as u32));
        }
        let column = column.to_ascii_uppercase();
        if !COLUMNS.contains(&column) {
            return Err(ParseSeatError::UnknownColumn(column));
        }
        Ok(Self { row, column })
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn column(&self) -> char {
        self.column
    }

    pub fn is_business(&self) -> bool {
        self.row <= BUSINESS_ROWS
    }

    pub fn position(&self) -> SeatPosition {
        match self.column {
            'A' | 'F' => SeatPosition::Window,
            'B' | 'E' => SeatPosition::Middle,
            _ => SeatPosition::Aisle,
        }
    }

    /// Every seat in the grid, row by row.
    pub fn all() -> impl Iterator<Item = SeatId> {
        (1..=CABIN_ROWS)
            .flat_map(|row| COLUMNS.iter().map(move |&column| SeatId { row, column }))
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.column)
    }
}

impl FromStr for SeatId {
    type Err = ParseSeatError;

    /// Parses the leading integer as the row and the trailing letter as the
    /// column, mirroring how seat labels are printed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s.find(|c: char| !c.is_ascii_digit());
        let (digits, rest) = match split {
            Some(idx) if idx > 0 => s.split_at(idx),
            _ => return Err(ParseSeatError::Malformed(s.to_string())),
        };
        let mut letters = rest.chars();
        let column = match (letters.next(), letters.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => c,
            _ => return Err(ParseSeatError::Malformed(s.to_string())),
        };
        let row: u32 = digits
            .parse()
            .map_err(|_| ParseSeatError::Malformed(s.to_string()))?;
        if row == 0 || row > CABIN_ROWS as u32 {
            return Err(ParseSeatError::RowOutOfRange(row));
        }
        SeatId::new(row as u8, column)
    }
}

impl Serialize for SeatId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SeatId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}
