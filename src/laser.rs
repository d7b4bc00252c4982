//! Laser beam simulation.
//!
//! At the end of every turn the mover's laser fires. The beam travels in a straight line from
//! the laser's cell until it leaves the board or meets a piece. What happens when it meets a
//! piece is looked up in a [`ReflectionTable`], keyed on the direction the beam is travelling,
//! the piece type and the piece's orientation: the piece is killed, the beam is absorbed, or
//! the beam is deflected into a new direction and carries on.
//!
//! The table is game data rather than code. The standard table ships as
//! `assets/reflections.json` and is embedded in the binary.

use crate::bitfield::{BitField, Occupancy};
use crate::board::grid::CellGrid;
use crate::error::TableError;
use crate::location::{Direction, Location};
use crate::pieces::{Orientation, Piece, PieceType};
use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::OnceLock;

const STANDARD_TABLE: &str = include_str!("../assets/reflections.json");
const SUPPORTED_VERSION: u32 = 1;

/// What a piece does to a beam that reaches it.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Reflection {
    /// The piece is destroyed and the beam stops.
    Kill,
    /// The beam is absorbed harmlessly.
    Nothing,
    /// The beam leaves the piece's cell in the given direction.
    Deflect(Direction)
}

impl FromStr for Reflection {
    type Err = TableError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kill" => Ok(Reflection::Kill),
            "nothing" => Ok(Reflection::Nothing),
            other => Direction::from_name(other)
                .map(Reflection::Deflect)
                .ok_or_else(|| TableError::BadEffect(other.to_string()))
        }
    }
}

impl Display for Reflection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Reflection::Kill => write!(f, "kill"),
            Reflection::Nothing => write!(f, "nothing"),
            Reflection::Deflect(d) => write!(f, "{}", d.name())
        }
    }
}

#[derive(Deserialize)]
struct TableEntry {
    direction: Direction,
    piece: PieceType,
    orientation: Orientation,
    effect: String
}

#[derive(Deserialize)]
struct TableFile {
    version: u32,
    entries: Vec<TableEntry>
}

/// Lookup from (beam direction, piece type, piece orientation) to the [`Reflection`] that
/// results. Every combination has exactly one entry.
#[derive(Clone, Debug, PartialEq)]
pub struct ReflectionTable {
    entries: [[[Reflection; 4]; 5]; 4]
}

impl ReflectionTable {

    /// Load a table from its JSON form. The table must be complete, with no combination given
    /// twice.
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let file: TableFile = serde_json::from_str(json)?;
        if file.version != SUPPORTED_VERSION {
            return Err(TableError::UnsupportedVersion(file.version))
        }
        let mut entries: [[[Option<Reflection>; 4]; 5]; 4] = [[[None; 4]; 5]; 4];
        for entry in file.entries {
            let slot = &mut entries[entry.direction.index()][entry.piece.index()][entry.orientation.index()];
            if slot.is_some() {
                return Err(TableError::Duplicate {
                    direction: entry.direction,
                    piece_type: entry.piece,
                    orientation: entry.orientation
                })
            }
            *slot = Some(entry.effect.parse()?);
        }

        let mut table = [[[Reflection::Nothing; 4]; 5]; 4];
        for direction in Direction::ALL {
            for piece_type in PieceType::ALL {
                for orientation in Orientation::ALL {
                    let (d, p, o) = (direction.index(), piece_type.index(), orientation.index());
                    table[d][p][o] = entries[d][p][o]
                        .ok_or(TableError::Missing { direction, piece_type, orientation })?;
                }
            }
        }
        Ok(Self { entries: table })
    }

    /// The standard table shipped with the crate.
    pub fn standard() -> &'static ReflectionTable {
        static TABLE: OnceLock<ReflectionTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            ReflectionTable::from_json(STANDARD_TABLE).expect("Bundled reflection table should be valid.")
        })
    }

    /// Whether turning a piece of the given type can change how it interacts with a beam.
    pub fn orientation_matters(&self, piece_type: PieceType) -> bool {
        let p = piece_type.index();
        self.entries.iter().any(|by_piece| {
            by_piece[p].iter().any(|r| *r != by_piece[p][0])
        })
    }

    /// What happens to a beam travelling in `direction` when it reaches `piece`.
    pub fn lookup(&self, direction: Direction, piece: Piece) -> Reflection {
        self.entries[direction.index()][piece.piece_type.index()][piece.orientation.index()]
    }
}

/// The effect recorded for one segment of a beam.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaserEffect {
    /// The beam passes through (or, on the final segment, stops: absorbed or leaving the board).
    None,
    /// The beam changes direction in this cell.
    Deflect,
    /// The piece in this cell is destroyed; always the final segment.
    Kill
}

/// One cell on a beam's path. `direction` is the direction the beam leaves the cell in (for a
/// deflection, the new direction).
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Serialize, Deserialize)]
pub struct LaserPathSegment {
    pub location: Location,
    pub direction: Direction,
    pub effect: LaserEffect
}

/// The ordered cells a beam visits, starting at the laser that fired it. A non-empty path always
/// ends on a segment whose effect is [`LaserEffect::Kill`] or [`LaserEffect::None`].
#[derive(Clone, Eq, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaserPath {
    segments: Vec<LaserPathSegment>
}

impl LaserPath {

    pub fn segments(&self) -> &[LaserPathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&LaserPathSegment> {
        self.segments.last()
    }

    /// The location of the piece the beam destroyed, if any.
    pub fn killed(&self) -> Option<Location> {
        self.last()
            .filter(|s| s.effect == LaserEffect::Kill)
            .map(|s| s.location)
    }
}

/// Trace the beam fired by the laser standing at `origin`. Returns an empty path if there is no
/// piece at `origin`.
pub fn compute_laser_path(origin: Location, grid: &CellGrid, table: &ReflectionTable) -> LaserPath {
    let Some(laser) = grid.get_piece(origin) else {
        return LaserPath::default()
    };
    let mut direction = Direction::from(laser.orientation);
    let mut segments = vec![LaserPathSegment { location: origin, direction, effect: LaserEffect::None }];
    // Cells already crossed, per direction of travel. A beam can cross a cell at most once in each
    // direction; seeing a repeat means the table has produced a loop.
    let mut visited = [Occupancy::default(); 4];
    visited[direction.index()] |= Occupancy::location_mask(origin);

    let mut current = origin;
    loop {
        let Some(next) = current.step(direction) else {
            // Beam leaves the board
            break
        };
        if visited[direction.index()].contains(next) {
            break
        }
        visited[direction.index()] |= Occupancy::location_mask(next);
        current = next;

        let Some(piece) = grid.get_piece(next) else {
            segments.push(LaserPathSegment { location: next, direction, effect: LaserEffect::None });
            continue
        };
        match table.lookup(direction, piece) {
            Reflection::Kill => {
                segments.push(LaserPathSegment { location: next, direction, effect: LaserEffect::Kill });
                break
            },
            Reflection::Nothing => {
                segments.push(LaserPathSegment { location: next, direction, effect: LaserEffect::None });
                break
            },
            Reflection::Deflect(new_direction) => {
                direction = new_direction;
                segments.push(LaserPathSegment { location: next, direction, effect: LaserEffect::Deflect });
            }
        }
    }
    // A beam that stops right after a deflection still ends on a `None` segment
    if let Some(last) = segments.last_mut().filter(|s| s.effect == LaserEffect::Deflect) {
        last.effect = LaserEffect::None;
    }
    trace!("Beam from {origin} covers {} cells, ends with {:?}", segments.len(), segments.last().map(|s| s.effect));
    LaserPath { segments }
}
