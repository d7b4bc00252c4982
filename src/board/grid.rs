use crate::bitfield::{BitField, BitfieldIter, Occupancy};
use crate::board::geometry::BoardGeometry;
use crate::error::ParseError;
use crate::location::{Location, LocationIterator, N_COLS, N_ROWS};
use crate::notation;
use crate::pieces::{Piece, PieceType, PlacedPiece, PlayerType};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Identity of a cell's contents, assigned once when the board is built. It travels with the
/// piece when pieces are moved or swapped, so a presentation layer can follow a piece across
/// turns. It has no meaning for the rules.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct CellId(pub u8);

/// The fixed type of a cell.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CellType {
    #[default]
    Normal,
    /// Only pieces of the given player may enter this cell.
    Reserved(PlayerType),
    /// The fixed home of the given player's laser.
    LaserSlot(PlayerType)
}

impl CellType {
    /// Whether a piece of the given player may occupy a cell of this type. Laser slots are
    /// only ever occupied by their laser, which never moves, so they are closed to everyone.
    /// A slot only empties when its laser is destroyed, and that ends the game.
    pub fn admits(&self, player: PlayerType) -> bool {
        match self {
            CellType::Normal => true,
            CellType::Reserved(owner) => *owner == player,
            CellType::LaserSlot(_) => false
        }
    }
}

/// A single cell of the board.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Cell {
    pub id: CellId,
    pub cell_type: CellType,
    pub location: Location,
    pub piece: Option<Piece>
}

/// The full 10x8 board: every cell with its type and piece, plus a bitfield per player marking
/// the cells their pieces occupy.
///
/// `CellGrid` is `Copy`, so producing a new board from an old one never disturbs the old one.
/// Cell types and locations are fixed when the grid is built; only pieces (and the
/// [`CellId`]s that follow them) change afterwards.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CellGrid {
    cells: [[Cell; N_COLS as usize]; N_ROWS as usize],
    occupancy: [Occupancy; 2]
}

impl CellGrid {

    /// Create a board with no pieces, with cell types taken from the given geometry.
    pub fn empty(geo: &BoardGeometry) -> Self {
        let mut cells = [[Cell::default(); N_COLS as usize]; N_ROWS as usize];
        for location in geo.iter_locations() {
            cells[location.row as usize][location.col as usize] = Cell {
                id: CellId(location.index() as u8),
                cell_type: geo.cell_type(location),
                location,
                piece: None
            };
        }
        Self { cells, occupancy: [Occupancy::default(); 2] }
    }

    /// Get the cell at the given location.
    pub fn cell(&self, location: Location) -> &Cell {
        &self.cells[location.row as usize][location.col as usize]
    }

    fn cell_mut(&mut self, location: Location) -> &mut Cell {
        &mut self.cells[location.row as usize][location.col as usize]
    }

    /// Get the piece that occupies the given location, if any.
    pub fn get_piece(&self, location: Location) -> Option<Piece> {
        self.cell(location).piece
    }

    /// Check if there is any piece occupying a location.
    pub fn occupied(&self, location: Location) -> bool {
        (self.occupancy[0] | self.occupancy[1]).contains(location)
    }

    /// Place a piece at the given location, replacing whatever was there.
    pub fn set_piece(&mut self, location: Location, piece: Piece) {
        self.clear(location);
        self.occupancy[piece.player.index()] |= Occupancy::location_mask(location);
        self.cell_mut(location).piece = Some(piece);
    }

    /// Remove any piece from the given location, returning it.
    pub fn clear(&mut self, location: Location) -> Option<Piece> {
        let mask = !Occupancy::location_mask(location);
        self.occupancy[0] &= mask;
        self.occupancy[1] &= mask;
        self.cell_mut(location).piece.take()
    }

    /// Exchange the contents (piece and [`CellId`]) of two cells. Cell types stay where they
    /// are.
    pub fn swap_contents(&mut self, l1: Location, l2: Location) {
        let c1 = *self.cell(l1);
        let c2 = *self.cell(l2);
        for (source, location) in [(c2, l1), (c1, l2)] {
            match source.piece {
                Some(piece) => self.set_piece(location, piece),
                None => {
                    self.clear(location);
                }
            }
            self.cell_mut(location).id = source.id;
        }
    }

    /// Return an iterator over the locations occupied by the given player's pieces, in
    /// row-major order.
    pub fn iter_occupied(&self, player: PlayerType) -> BitfieldIter<Occupancy> {
        BitfieldIter::new(self.occupancy[player.index()])
    }

    /// Return an iterator over the given player's pieces and where they stand.
    pub fn iter_pieces(&self, player: PlayerType) -> impl Iterator<Item=PlacedPiece> + '_ {
        self.iter_occupied(player)
            .filter_map(|l| self.get_piece(l).map(|piece| PlacedPiece::new(l, piece)))
    }

    /// Count the number of pieces the given player has left on the board.
    pub fn count_pieces(&self, player: PlayerType) -> u32 {
        self.occupancy[player.index()].count_ones()
    }

    /// Find the first piece of the given type belonging to the given player.
    pub fn find_piece(&self, player: PlayerType, piece_type: PieceType) -> Option<Location> {
        self.iter_pieces(player)
            .find(|pp| pp.piece.piece_type == piece_type)
            .map(|pp| pp.location)
    }

    /// Whether the given player's king is still on the board.
    pub fn has_king(&self, player: PlayerType) -> bool {
        self.find_piece(player, PieceType::King).is_some()
    }

    /// Whether the given player's laser is still on the board.
    pub fn has_laser(&self, player: PlayerType) -> bool {
        self.find_piece(player, PieceType::Laser).is_some()
    }

    /// Return an iterator over all cells, in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item=&Cell> + '_ {
        LocationIterator::new().map(|l| self.cell(l))
    }

    /// Return a string representing the board, in a format suitable for printing. Each cell is
    /// two characters: the piece letter and an arrow for its orientation, or `..` when empty.
    pub fn to_display_str(&self) -> String {
        let mut s = String::new();
        for row in 0..N_ROWS {
            s.push_str(&format!("{} ", N_ROWS - row));
            for col in 0..N_COLS {
                match self.get_piece(Location::new(col, row)) {
                    Some(piece) => {
                        s.push(piece.into());
                        s.push(['^', '>', 'v', '<'][piece.orientation.index()]);
                    },
                    None => s.push_str(".."),
                }
                s.push(' ');
            }
            s.push('\n');
        }
        s.push_str("  ");
        for col in 0..N_COLS {
            s.push((b'a' + col) as char);
            s.push_str("  ");
        }
        s.push('\n');
        s
    }
}

impl FromStr for CellGrid {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        notation::parse(s)
    }
}

impl TryFrom<String> for CellGrid {
    type Error = ParseError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        notation::parse(&value)
    }
}

impl From<CellGrid> for String {
    fn from(value: CellGrid) -> Self {
        notation::to_notation(&value)
    }
}

impl Display for CellGrid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_display_str())
    }
}
