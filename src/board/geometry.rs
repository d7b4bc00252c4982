use crate::bitfield::{BitField, Occupancy};
use crate::board::grid::CellType;
use crate::location::{Coords, Location, LocationIterator, RowColOffset, N_COLS, N_ROWS};
use crate::pieces::PlayerType;
use crate::pieces::PlayerType::{PlayerA, PlayerB};

const NEIGHBOR_OFFSETS: [RowColOffset; 8] = [
    RowColOffset::new(-1, -1),
    RowColOffset::new(-1, 0),
    RowColOffset::new(-1, 1),
    RowColOffset::new(0, -1),
    RowColOffset::new(0, 1),
    RowColOffset::new(1, -1),
    RowColOffset::new(1, 0),
    RowColOffset::new(1, 1),
];

/// The positions of the cells with special rules: each player's laser slot and the cells only
/// that player's pieces may enter.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpecialCells {
    /// Laser slot of each player, indexed by [`PlayerType::index`].
    pub laser_slots: [Location; 2],
    /// Cells reserved for each player, indexed by [`PlayerType::index`].
    pub reserved: [Occupancy; 2]
}

impl Default for SpecialCells {
    /// The fixed layout of the 10x8 board. PlayerA's laser sits in the top-left corner and
    /// PlayerA owns the rest of the leftmost column plus the two cells next to PlayerB's column
    /// (`i8` and `i1`). PlayerB mirrors this from the bottom-right corner.
    fn default() -> Self {
        let last_col = N_COLS - 1;
        let last_row = N_ROWS - 1;
        let laser_slots = [Location::new(0, 0), Location::new(last_col, last_row)];

        let mut reserved_a: Vec<Location> = (1..N_ROWS).map(|row| Location::new(0, row)).collect();
        reserved_a.push(Location::new(last_col - 1, 0));
        reserved_a.push(Location::new(last_col - 1, last_row));

        let mut reserved_b: Vec<Location> = (0..last_row).map(|row| Location::new(last_col, row)).collect();
        reserved_b.push(Location::new(1, 0));
        reserved_b.push(Location::new(1, last_row));

        Self {
            laser_slots,
            reserved: [
                Occupancy::from_locations(&reserved_a),
                Occupancy::from_locations(&reserved_b)
            ]
        }
    }
}

/// This struct contains information about the geometry of the board, ie, which cells are
/// special. It does not contain information about piece placement or any other state that
/// would be expected to change over the course of a game.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct BoardGeometry {
    pub special_cells: SpecialCells
}

impl BoardGeometry {

    pub fn new() -> Self {
        Self::default()
    }

    /// The laser slot belonging to the given player.
    pub fn laser_slot(&self, player: PlayerType) -> Location {
        self.special_cells.laser_slots[player.index()]
    }

    /// The type of the cell at the given location.
    pub fn cell_type(&self, location: Location) -> CellType {
        for player in [PlayerA, PlayerB] {
            if self.laser_slot(player) == location {
                return CellType::LaserSlot(player)
            }
            if self.special_cells.reserved[player.index()].contains(location) {
                return CellType::Reserved(player)
            }
        }
        CellType::Normal
    }

    /// Convert unbounded [`Coords`] to a [`Location`] on the board, if possible.
    pub fn coords_to_location(&self, coords: Coords) -> Option<Location> {
        coords.to_location()
    }

    /// Find a location's neighbours, ie, the up to eight cells in the surrounding 3x3 square.
    pub fn neighbors(&self, location: Location) -> Vec<Location> {
        let coords = Coords::from(location);
        NEIGHBOR_OFFSETS.iter()
            .filter_map(|offset| self.coords_to_location(coords + *offset))
            .collect()
    }

    /// Return an iterator over all locations on the board.
    pub fn iter_locations(&self) -> LocationIterator {
        LocationIterator::new()
    }
}
