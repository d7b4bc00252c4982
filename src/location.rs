use crate::error::ParseError;
use crate::error::ParseError::{BadLocation, EmptyString, OffBoard};
use crate::pieces::Orientation;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use std::ops::Add;
use std::str::FromStr;

/// Number of columns on the board.
pub const N_COLS: u8 = 10;
/// Number of rows on the board.
pub const N_ROWS: u8 = 8;

/// An offset which can be applied to [`Coords`], composed of the row and column offset to be
/// applied.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RowColOffset {
    pub row: i8,
    pub col: i8
}

impl RowColOffset {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Return the Chebyshev distance represented by this offset, ie, the number of king steps
    /// needed to cover it.
    pub fn chebyshev_dist(&self) -> u8 {
        self.row.unsigned_abs().max(self.col.unsigned_abs())
    }
}

/// An unbounded row-column pair representing a hypothetical location, which may or may not be on
/// the board. Used when stepping a beam or a piece off the edge.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Coords {
    pub row: i8,
    pub col: i8
}

impl Coords {
    pub fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    pub fn row_col_offset_from(&self, other: Coords) -> RowColOffset {
        RowColOffset {
            row: self.row - other.row,
            col: self.col - other.col
        }
    }

    /// Whether these coords lie on the 10x8 board.
    pub fn in_bounds(&self) -> bool {
        (0..N_ROWS as i8).contains(&self.row) && (0..N_COLS as i8).contains(&self.col)
    }

    /// Convert to a [`Location`], if these coords are on the board.
    pub fn to_location(self) -> Option<Location> {
        if self.in_bounds() {
            Some(Location::new(self.col as u8, self.row as u8))
        } else {
            None
        }
    }
}

impl From<Location> for Coords {
    fn from(l: Location) -> Self {
        Self {
            row: l.row as i8,
            col: l.col as i8
        }
    }
}

impl Add<RowColOffset> for Coords {
    type Output = Self;

    fn add(self, rhs: RowColOffset) -> Self {
        Self {
            row: self.row + rhs.row,
            col: self.col + rhs.col
        }
    }
}

impl Add<Direction> for Coords {
    type Output = Self;

    fn add(self, rhs: Direction) -> Self {
        self + rhs.offset()
    }
}

/// A single cell position on the board. Row 0 is the top row (rank "8") and column 0 is the
/// leftmost column (file "a").
///
/// Avoid constructing `Location`s which refer to positions off the board (use [`Coords`] for
/// that instead).
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "RawLocation")]
pub struct Location {
    pub col: u8,
    pub row: u8
}

/// Unchecked column and row, as read from data. Only becomes a [`Location`] if it lies on the
/// board.
#[derive(Deserialize)]
struct RawLocation {
    col: u8,
    row: u8
}

impl TryFrom<RawLocation> for Location {
    type Error = ParseError;

    fn try_from(raw: RawLocation) -> Result<Self, Self::Error> {
        let location = Location::new(raw.col, raw.row);
        if location.in_bounds() {
            Ok(location)
        } else {
            Err(OffBoard { col: raw.col, row: raw.row })
        }
    }
}

impl Location {

    /// Create a new [`Location`] with the given column and row.
    pub const fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }

    /// Whether this location is on the board.
    pub fn in_bounds(&self) -> bool {
        self.col < N_COLS && self.row < N_ROWS
    }

    /// Whether `other` lies in the 3x3 neighbourhood centred on this location. A location is
    /// considered adjacent to itself; callers rule out equality separately.
    pub fn is_adjacent(&self, other: Location) -> bool {
        Coords::from(other).row_col_offset_from(Coords::from(*self)).chebyshev_dist() <= 1
    }

    /// The location one step away in the given direction, if that is still on the board.
    pub fn step(&self, direction: Direction) -> Option<Location> {
        (Coords::from(*self) + direction).to_location()
    }

    /// Index of this location in row-major order.
    pub fn index(&self) -> usize {
        (self.row as usize) * (N_COLS as usize) + (self.col as usize)
    }

    /// The file letter, `a` to `j`.
    pub fn file(&self) -> char {
        (b'a' + self.col) as char
    }

    /// The rank number, `8` (top) to `1` (bottom).
    pub fn rank(&self) -> u8 {
        N_ROWS - self.row
    }
}

impl Debug for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Location({}, col={}, row={})", self, self.col, self.row)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl FromStr for Location {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let file = chars.next().ok_or(EmptyString)?;
        if !('a'..='j').contains(&file) {
            return Err(BadLocation(s.to_string()))
        }
        let rank = chars.as_str().parse::<u8>().map_err(|_| BadLocation(s.to_string()))?;
        if !(1..=N_ROWS).contains(&rank) {
            return Err(BadLocation(s.to_string()))
        }
        Ok(Location::new(file as u8 - b'a', N_ROWS - rank))
    }
}

/// The direction a laser beam travels in, relative to the board as displayed (top = towards
/// row 0).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Top,
    Right,
    Bottom,
    Left
}

impl Direction {

    pub const ALL: [Direction; 4] = [Direction::Top, Direction::Right, Direction::Bottom, Direction::Left];

    /// The row/column step taken by a beam travelling in this direction.
    pub const fn offset(&self) -> RowColOffset {
        match self {
            Direction::Top => RowColOffset::new(-1, 0),
            Direction::Right => RowColOffset::new(0, 1),
            Direction::Bottom => RowColOffset::new(1, 0),
            Direction::Left => RowColOffset::new(0, -1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Right => Direction::Left,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
        }
    }

    /// Position of this direction in [`Direction::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The lowercase name used for this direction in data files.
    pub fn name(&self) -> &'static str {
        match self {
            Direction::Top => "top",
            Direction::Right => "right",
            Direction::Bottom => "bottom",
            Direction::Left => "left",
        }
    }

    /// Look up a direction by its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        Direction::ALL.into_iter().find(|d| d.name() == name)
    }
}

impl From<Orientation> for Direction {
    /// The direction a piece with the given orientation "points" in: 0° is top, and each
    /// quarter turn moves clockwise.
    fn from(value: Orientation) -> Self {
        Direction::ALL[value.index()]
    }
}

/// Iterator over all locations on the board, in row-major order.
pub struct LocationIterator {
    current_row: u8,
    current_col: u8
}

impl LocationIterator {
    pub(crate) fn new() -> Self {
        Self {
            current_row: 0,
            current_col: 0
        }
    }
}

impl Iterator for LocationIterator {
    type Item = Location;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row >= N_ROWS {
            return None
        }
        let location = Location::new(self.current_col, self.current_row);
        if self.current_col >= N_COLS - 1 {
            self.current_row += 1;
            self.current_col = 0;
        } else {
            self.current_col += 1;
        }
        Some(location)
    }
}
