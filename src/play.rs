use crate::board::grid::CellGrid;
use crate::error::ParseError;
use crate::error::ParseError::{BadMovement, EmptyString};
use crate::game::logic::GameLogic;
use crate::location::Location;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The kinds of movement. A movement of type [`MovementType::Invalid`] is how the movement engine
/// says "no": it is returned as a value rather than as an error.
#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovementType {
    Invalid,
    /// A piece steps onto an empty neighbouring cell.
    Normal,
    /// A switch swaps places with a neighbouring defender or deflector.
    Special,
    RotateClockwise,
    RotateAnticlockwise
}

/// A single action: moving, swapping or rotating a piece. For rotations, `source` and `target`
/// are both the location of the rotated piece.
///
/// A `Movement` only describes an action; applying it is up to
/// [`GameLogic::apply`].
#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct Movement {
    pub movement_type: MovementType,
    pub source: Location,
    pub target: Location
}

impl Movement {

    pub fn new(movement_type: MovementType, source: Location, target: Location) -> Self {
        Self { movement_type, source, target }
    }

    pub fn invalid(source: Location, target: Location) -> Self {
        Self::new(MovementType::Invalid, source, target)
    }

    /// A quarter-turn rotation of the piece at `location`.
    pub fn rotation(location: Location, clockwise: bool) -> Self {
        let movement_type = if clockwise {
            MovementType::RotateClockwise
        } else {
            MovementType::RotateAnticlockwise
        };
        Self::new(movement_type, location, location)
    }

    pub fn is_valid(&self) -> bool {
        self.movement_type != MovementType::Invalid
    }

    pub fn is_rotation(&self) -> bool {
        matches!(self.movement_type, MovementType::RotateClockwise | MovementType::RotateAnticlockwise)
    }
}

impl FromStr for Movement {
    type Err = ParseError;

    /// Parse a movement: `a8-b8` (step), `e5*e4` (switch swap), `e5+` (rotate clockwise) or
    /// `e5-` (rotate anticlockwise). Whether the movement is legal is not checked.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(EmptyString)
        }
        let bad = || BadMovement(String::from(s));
        for (suffix, clockwise) in [('+', true), ('-', false)] {
            if let Some(rest) = s.strip_suffix(suffix) {
                if let Ok(location) = Location::from_str(rest) {
                    return Ok(Movement::rotation(location, clockwise))
                }
            }
        }
        for (separator, movement_type) in [('-', MovementType::Normal), ('*', MovementType::Special)] {
            let tokens: Vec<&str> = s.split(separator).collect();
            if tokens.len() == 2 {
                let source = Location::from_str(tokens[0]).map_err(|_| bad())?;
                let target = Location::from_str(tokens[1]).map_err(|_| bad())?;
                return Ok(Movement::new(movement_type, source, target))
            }
        }
        Err(bad())
    }
}

impl Display for Movement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.movement_type {
            MovementType::Invalid => write!(f, "{}?{}", self.source, self.target),
            MovementType::Normal => write!(f, "{}-{}", self.source, self.target),
            MovementType::Special => write!(f, "{}*{}", self.source, self.target),
            MovementType::RotateClockwise => write!(f, "{}+", self.target),
            MovementType::RotateAnticlockwise => write!(f, "{}-", self.target),
        }
    }
}

/// An iterator over the movements that can be made by the piece at the given location, ie, the
/// valid steps and swaps onto its neighbouring cells. Rotations are never produced. Because this
/// struct holds a reference to the [`GameLogic`] and [`CellGrid`], neither may be mutated while
/// the iterator exists.
pub struct MovementIterator<'a, 'b> {
    game_logic: &'a GameLogic,
    grid: &'b CellGrid,
    source: Location,
    candidates: std::vec::IntoIter<Location>
}

impl<'logic, 'grid> MovementIterator<'logic, 'grid> {

    pub fn new(game_logic: &'logic GameLogic, grid: &'grid CellGrid, source: Location) -> Self {
        Self {
            game_logic,
            grid,
            source,
            candidates: game_logic.board_geo.neighbors(source).into_iter()
        }
    }
}

impl<'logic, 'grid> Iterator for MovementIterator<'logic, 'grid> {
    type Item = Movement;

    fn next(&mut self) -> Option<Self::Item> {
        for target in self.candidates.by_ref() {
            let movement = self.game_logic.check_move(
                self.grid.cell(self.source),
                self.grid.cell(target)
            );
            if movement.is_valid() {
                return Some(movement)
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ParseError::{BadMovement, EmptyString};
    use crate::location::Location;
    use crate::play::{Movement, MovementType};
    use std::str::FromStr;

    #[test]
    fn test_parsing_movements() {
        let m = Movement::from_str("a7-b6").unwrap();
        assert_eq!(m, Movement::new(MovementType::Normal, Location::new(0, 1), Location::new(1, 2)));
        assert_eq!(m.to_string(), "a7-b6");

        let m = Movement::from_str("e5*e4").unwrap();
        assert_eq!(m.movement_type, MovementType::Special);
        assert_eq!(m.to_string(), "e5*e4");

        let m = Movement::from_str("h2+").unwrap();
        assert_eq!(m, Movement::rotation(Location::new(7, 6), true));
        assert!(m.is_rotation());
        assert_eq!(m.to_string(), "h2+");

        let m = Movement::from_str("h2-").unwrap();
        assert_eq!(m.movement_type, MovementType::RotateAnticlockwise);
        assert_eq!(m.source, m.target);
        assert_eq!(m.to_string(), "h2-");

        assert_eq!(Movement::from_str(""), Err(EmptyString));
        assert_eq!(Movement::from_str("a7-b6-c5"), Err(BadMovement(String::from("a7-b6-c5"))));
        assert_eq!(Movement::from_str("a7-z6"), Err(BadMovement(String::from("a7-z6"))));
        assert_eq!(Movement::from_str("a7"), Err(BadMovement(String::from("a7"))));
        assert_eq!(Movement::from_str("a9+"), Err(BadMovement(String::from("a9+"))));
    }

    #[test]
    fn test_movement_json() {
        let m = Movement::from_str("e5*e4").unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"movement_type":"special","source":{"col":4,"row":3},"target":{"col":4,"row":4}}"#);
        assert_eq!(serde_json::from_str::<Movement>(&json).unwrap(), m);

        // Movements naming a cell off the board are rejected before they reach the rules
        let off_board = r#"{"movement_type":"normal","source":{"col":40,"row":3},"target":{"col":4,"row":4}}"#;
        assert!(serde_json::from_str::<Movement>(off_board).is_err());
    }
}
