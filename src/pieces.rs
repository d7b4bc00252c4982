use crate::error::ParseError;
use crate::error::ParseError::BadChar;
use crate::location::Location;
use crate::pieces::PieceType::{Defender, Deflector, King, Laser, Switch};
use crate::pieces::PlayerType::{PlayerA, PlayerB};
use serde::{Deserialize, Serialize};

/// The two players. In setup notation, lowercase letters belong to [`PlayerA`] and uppercase
/// letters to [`PlayerB`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayerType {
    PlayerA = 0,
    PlayerB = 1
}

impl PlayerType {

    /// Return the other player.
    pub fn other(&self) -> Self {
        match self {
            PlayerA => PlayerB,
            PlayerB => PlayerA
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// The different types of pieces that can occupy a board.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    King,
    Defender,
    Deflector,
    Switch,
    Laser
}

impl PieceType {

    pub const ALL: [PieceType; 5] = [King, Defender, Deflector, Switch, Laser];

    /// Position of this piece type in [`PieceType::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The lowercase letter used for this piece type in setup notation.
    pub fn letter(&self) -> char {
        match self {
            King => 'k',
            Defender => 'd',
            Deflector => 'b',
            Switch => 's',
            Laser => 'l'
        }
    }
}

/// A piece's orientation, measured clockwise in quarter turns from 0°. What the orientation
/// means depends on the piece type: a laser fires in the direction it points, a deflector's
/// mirror and a defender's shield turn with it.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Orientation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270
}

impl Orientation {

    pub const ALL: [Orientation; 4] = [
        Orientation::Deg0,
        Orientation::Deg90,
        Orientation::Deg180,
        Orientation::Deg270
    ];

    /// Number of quarter turns clockwise from 0°.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn degrees(&self) -> u16 {
        (self.index() as u16) * 90
    }

    /// Convert from degrees. Only the four canonical values are accepted.
    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Orientation::Deg0),
            90 => Some(Orientation::Deg90),
            180 => Some(Orientation::Deg180),
            270 => Some(Orientation::Deg270),
            _ => None
        }
    }

    pub fn rotate_clockwise(&self) -> Self {
        Self::ALL[(self.index() + 1) % 4]
    }

    pub fn rotate_anticlockwise(&self) -> Self {
        Self::ALL[(self.index() + 3) % 4]
    }
}

impl From<Orientation> for u16 {
    fn from(value: Orientation) -> Self {
        value.degrees()
    }
}

impl TryFrom<u16> for Orientation {
    type Error = String;
    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Orientation::from_degrees(value).ok_or_else(|| format!("{value} is not a multiple of 90 below 360"))
    }
}

/// A piece belonging to a particular player, facing a particular way.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub player: PlayerType,
    pub piece_type: PieceType,
    pub orientation: Orientation
}

impl Piece {
    /// Create a new piece of the given type and player, with the given orientation.
    pub fn new(piece_type: PieceType, player: PlayerType, orientation: Orientation) -> Self {
        Self { player, piece_type, orientation }
    }

    /// Return a copy of this piece turned a quarter turn clockwise or anticlockwise.
    pub fn rotated(&self, clockwise: bool) -> Self {
        let orientation = if clockwise {
            self.orientation.rotate_clockwise()
        } else {
            self.orientation.rotate_anticlockwise()
        };
        Self { orientation, ..*self }
    }
}

impl From<Piece> for char {
    /// A single-character representation of a given piece, ignoring orientation.
    fn from(value: Piece) -> Self {
        let c = value.piece_type.letter();
        match value.player {
            PlayerA => c,
            PlayerB => c.to_ascii_uppercase()
        }
    }
}

impl TryFrom<char> for Piece {

    type Error = ParseError;

    /// Parse a piece letter. The resulting piece has orientation 0°; rotation markers are
    /// handled by the notation parser.
    fn try_from(value: char) -> Result<Self, Self::Error> {
        if !value.is_ascii_alphabetic() {
            return Err(BadChar(value))
        }
        let player = if value.is_ascii_uppercase() {
            PlayerB
        } else {
            PlayerA
        };
        let piece_type = match value.to_ascii_lowercase() {
            'k' => King,
            'd' => Defender,
            'b' => Deflector,
            's' => Switch,
            'l' => Laser,
            _ => return Err(BadChar(value))
        };
        Ok(Piece::new(piece_type, player, Orientation::Deg0))
    }
}

/// A struct representing a combination of a location and a piece.
#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub location: Location,
    pub piece: Piece
}

impl PlacedPiece {
    pub fn new(location: Location, piece: Piece) -> Self {
        Self { location, piece }
    }
}
