//! Setup notation: a compact description of a board, one `/`-separated segment per row from the
//! top (rank 8) down.
//!
//! Within a row, a digit `1`-`9` is a run of that many empty cells, `*` is ten empty cells and a
//! letter (`k`ing, `d`efender, de`b`flector, `s`witch, `l`aser) is a piece. Lowercase letters
//! belong to PlayerA and uppercase to PlayerB. Up to three `+` after a letter each turn that piece
//! a quarter turn clockwise from 0°. Every row must describe exactly ten cells.
//!
//! Cell types are not part of the notation; they follow from the fixed board geometry.

use crate::board::geometry::BoardGeometry;
use crate::board::grid::{CellGrid, CellType};
use crate::error::ParseError;
use crate::error::ParseError::{BadChar, BadRowLen, DanglingRotation, MisplacedLaser, MissingLaser, ReservedCell, RowCount, TooManyRotations, Whitespace};
use crate::location::{Location, N_COLS, N_ROWS};
use crate::pieces::PieceType::Laser;
use crate::pieces::PlayerType::{PlayerA, PlayerB};
use crate::pieces::Piece;

const MAX_ROTATIONS: u8 = 3;

/// A piece read from a row, with its column.
type RowEntry = (u8, Piece);

/// Parse a single row segment into the pieces it places, checking the rotation markers and that
/// it spans exactly ten columns.
fn parse_row(row: usize, segment: &str) -> Result<Vec<RowEntry>, ParseError> {
    let mut entries: Vec<RowEntry> = vec![];
    let mut n_cols = 0usize;
    // Number of `+` seen since the last piece letter, or `None` if the last token was not a piece.
    let mut rotations: Option<u8> = None;
    for chr in segment.chars() {
        match chr {
            '1'..='9' => {
                n_cols += chr as usize - '0' as usize;
                rotations = None;
            },
            '*' => {
                n_cols += N_COLS as usize;
                rotations = None;
            },
            '+' => {
                let n = rotations.ok_or(DanglingRotation { row })?;
                if n == MAX_ROTATIONS {
                    return Err(TooManyRotations { row })
                }
                if let Some((_, piece)) = entries.last_mut().filter(|(col, _)| *col as usize == n_cols - 1) {
                    *piece = piece.rotated(true);
                }
                rotations = Some(n + 1);
            },
            _ => {
                let piece = Piece::try_from(chr)?;
                if n_cols < N_COLS as usize {
                    entries.push((n_cols as u8, piece));
                }
                n_cols += 1;
                rotations = Some(0);
            }
        }
    }
    if n_cols != N_COLS as usize {
        return Err(BadRowLen { row, len: n_cols })
    }
    Ok(entries)
}

/// Parse setup notation into a [`CellGrid`]. Only the grammar is checked here; see
/// [`parse_setup`] for a parse that also enforces where pieces may stand.
pub fn parse(notation: &str) -> Result<CellGrid, ParseError> {
    if notation.chars().any(char::is_whitespace) {
        return Err(Whitespace)
    }
    if let Some(bad) = notation.chars().find(|c| !is_notation_char(*c)) {
        return Err(BadChar(bad))
    }
    let rows: Vec<&str> = notation.split('/').collect();
    if rows.len() != N_ROWS as usize {
        return Err(RowCount(rows.len()))
    }

    let mut grid = CellGrid::empty(&BoardGeometry::new());
    for (r, segment) in rows.iter().enumerate() {
        for (col, piece) in parse_row(r, segment)? {
            grid.set_piece(Location::new(col, r as u8), piece);
        }
    }
    Ok(grid)
}

/// Parse setup notation for the start of a game. On top of the grammar, the board must hold
/// exactly one laser per player, standing on that player's laser slot, and no piece may stand on
/// a cell reserved for the other player.
pub fn parse_setup(notation: &str) -> Result<CellGrid, ParseError> {
    let grid = parse(notation)?;
    validate_placement(&grid)?;
    Ok(grid)
}

/// Check that every piece stands on a cell it may occupy and that each laser slot holds its
/// owner's laser.
pub fn validate_placement(grid: &CellGrid) -> Result<(), ParseError> {
    for cell in grid.iter_cells() {
        let Some(piece) = cell.piece else { continue };
        let location = cell.location;
        match cell.cell_type {
            CellType::LaserSlot(owner) => {
                if piece.piece_type != Laser || piece.player != owner {
                    return Err(MisplacedLaser { location })
                }
            },
            cell_type => {
                if piece.piece_type == Laser {
                    return Err(MisplacedLaser { location })
                }
                if !cell_type.admits(piece.player) {
                    return Err(ReservedCell { location })
                }
            }
        }
    }
    let geo = BoardGeometry::new();
    for player in [PlayerA, PlayerB] {
        if grid.get_piece(geo.laser_slot(player)).is_none() {
            return Err(MissingLaser(player))
        }
    }
    Ok(())
}

fn is_notation_char(c: char) -> bool {
    matches!(c, 'k' | 's' | 'd' | 'b' | 'l' | 'K' | 'S' | 'D' | 'B' | 'L' | '1'..='9' | '*' | '+' | '/')
}

/// Generate the setup notation describing the given grid. Parsing the result gives back the same
/// pieces (cell identities are reassigned).
pub fn to_notation(grid: &CellGrid) -> String {
    let mut s = String::new();
    for row in 0..N_ROWS {
        let mut n_empty = 0;
        for col in 0..N_COLS {
            if let Some(piece) = grid.get_piece(Location::new(col, row)) {
                if n_empty > 0 {
                    s.push_str(n_empty.to_string().as_str());
                    n_empty = 0;
                }
                s.push(piece.into());
                for _ in 0..piece.orientation.index() {
                    s.push('+');
                }
            } else {
                n_empty += 1;
            }
        }
        if n_empty == N_COLS {
            s.push('*');
        } else if n_empty > 0 {
            s.push_str(n_empty.to_string().as_str());
        }
        if row < N_ROWS - 1 {
            s.push('/');
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use crate::error::ParseError::{BadChar, BadRowLen, DanglingRotation, MisplacedLaser, MissingLaser, ReservedCell, RowCount, TooManyRotations, Whitespace};
    use crate::location::Location;
    use crate::notation::{parse, parse_row, parse_setup, to_notation};
    use crate::pieces::PieceType::{Defender, Deflector, King, Laser, Switch};
    use crate::pieces::PlayerType::{PlayerA, PlayerB};
    use crate::pieces::{Orientation, Piece, PieceType, PlayerType};
    use crate::preset::boards;
    use std::str::FromStr;

    fn piece(piece_type: PieceType, player: PlayerType, degrees: u16) -> Piece {
        Piece::new(piece_type, player, Orientation::from_degrees(degrees).unwrap())
    }

    #[test]
    fn test_parse_rows() {
        assert_eq!(parse_row(0, "*"), Ok(vec![]));
        assert_eq!(parse_row(0, "55"), Ok(vec![]));
        assert_eq!(parse_row(0, "1234"), Ok(vec![]));

        let entries = parse_row(0, "l++3d++kd++b+++2").unwrap();
        let cols: Vec<u8> = entries.iter().map(|(c, _)| *c).collect();
        assert_eq!(cols, vec![0, 4, 5, 6, 7]);
        let letters: Vec<char> = entries.iter().map(|(_, p)| char::from(*p)).collect();
        assert_eq!(letters, vec!['l', 'd', 'k', 'd', 'b']);
        let degrees: Vec<u16> = entries.iter().map(|(_, p)| p.orientation.degrees()).collect();
        assert_eq!(degrees, vec![180, 180, 0, 180, 270]);

        assert_eq!(parse_row(2, "9"), Err(BadRowLen { row: 2, len: 9 }));
        assert_eq!(parse_row(2, "*1"), Err(BadRowLen { row: 2, len: 11 }));
        assert_eq!(parse_row(2, "kkkkkkkkkkk"), Err(BadRowLen { row: 2, len: 11 }));
        assert_eq!(parse_row(2, "+9k"), Err(DanglingRotation { row: 2 }));
        assert_eq!(parse_row(2, "k1+8"), Err(DanglingRotation { row: 2 }));
        assert_eq!(parse_row(2, "k++++9"), Err(TooManyRotations { row: 2 }));
    }

    #[test]
    fn test_row_sums() {
        // Every row whose tokens sum to ten is accepted; anything else is rejected.
        for n in 1..=9 {
            let row = format!("{}{}", n, "d".repeat(10 - n));
            assert!(parse_row(0, &row).is_ok(), "{row}");
            let short = format!("{}{}", n, "d".repeat(9 - n));
            assert_eq!(parse_row(0, &short), Err(BadRowLen { row: 0, len: 9 }));
            let long = format!("{}{}", n, "b+".repeat(11 - n));
            assert_eq!(parse_row(0, &long), Err(BadRowLen { row: 0, len: 11 }));
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse("*/*/*/*/*/*/*/ *"), Err(Whitespace));
        assert_eq!(parse("*/*/*/*/*/*/*"), Err(RowCount(7)));
        assert_eq!(parse("*/*/*/*/*/*/*/*/*"), Err(RowCount(9)));
        assert_eq!(parse("*/*/*/*/*/*/*/x9"), Err(BadChar('x')));
        assert_eq!(parse("*/*/*/*/*/*/*/09"), Err(BadChar('0')));
        assert_eq!(parse("*/*/*/*/*/8/*/*"), Err(BadRowLen { row: 5, len: 8 }));
    }

    #[test]
    fn test_empty_board() {
        let grid = parse("*/*/*/*/*/*/*/*").unwrap();
        assert!(grid.iter_cells().all(|c| c.piece.is_none()));
        assert_eq!(to_notation(&grid), "*/*/*/*/*/*/*/*");
        assert_eq!(parse_setup("*/*/*/*/*/*/*/*"), Err(MissingLaser(PlayerA)));
    }

    #[test]
    fn test_placement_rules() {
        // Laser away from its slot
        assert_eq!(
            parse_setup("l9/*/*/*/1l8/*/*/9L"),
            Err(MisplacedLaser { location: Location::new(1, 4) })
        );
        // PlayerB's laser on PlayerA's slot
        assert_eq!(parse_setup("L9/*/*/*/*/*/*/9L"), Err(MisplacedLaser { location: Location::new(0, 0) }));
        // PlayerB piece in column a
        assert_eq!(parse_setup("l9/*/D9/*/*/*/*/9L"), Err(ReservedCell { location: Location::new(0, 2) }));
        // PlayerA piece on b1, which belongs to PlayerB
        assert_eq!(parse_setup("l9/*/*/*/*/*/*/1d7L"), Err(ReservedCell { location: Location::new(1, 7) }));
        assert_eq!(parse_setup("l9/*/*/*/*/*/*/*"), Err(MissingLaser(PlayerB)));
        assert!(parse_setup("l9/*/d9/*/*/*/*/9L").is_ok());

        // The grammar alone allows all of these
        assert!(parse("l9/*/D9/*/*/*/*/9L").is_ok());
        assert!(parse("l9/*/*/*/*/*/*/*").is_ok());
    }

    #[test]
    fn test_classic_board() {
        let grid = parse_setup(boards::CLASSIC).unwrap();
        let expected = [
            ("a8", piece(Laser, PlayerA, 180)),
            ("e8", piece(Defender, PlayerA, 180)),
            ("f8", piece(King, PlayerA, 0)),
            ("g8", piece(Defender, PlayerA, 180)),
            ("h8", piece(Deflector, PlayerA, 270)),
            ("c7", piece(Deflector, PlayerA, 0)),
            ("d6", piece(Deflector, PlayerB, 90)),
            ("a5", piece(Deflector, PlayerA, 180)),
            ("c5", piece(Deflector, PlayerB, 0)),
            ("e5", piece(Switch, PlayerA, 0)),
            ("f5", piece(Switch, PlayerA, 90)),
            ("h5", piece(Deflector, PlayerA, 270)),
            ("j5", piece(Deflector, PlayerB, 90)),
            ("a4", piece(Deflector, PlayerA, 270)),
            ("c4", piece(Deflector, PlayerB, 90)),
            ("e4", piece(Switch, PlayerB, 90)),
            ("f4", piece(Switch, PlayerB, 0)),
            ("h4", piece(Deflector, PlayerA, 180)),
            ("j4", piece(Deflector, PlayerB, 0)),
            ("g3", piece(Deflector, PlayerA, 270)),
            ("h2", piece(Deflector, PlayerB, 180)),
            ("c1", piece(Deflector, PlayerB, 90)),
            ("d1", piece(Defender, PlayerB, 0)),
            ("e1", piece(King, PlayerB, 0)),
            ("f1", piece(Defender, PlayerB, 0)),
            ("j1", piece(Laser, PlayerB, 0)),
        ];
        for (s, p) in expected {
            assert_eq!(grid.get_piece(Location::from_str(s).unwrap()), Some(p), "{s}");
        }
        let n_pieces = grid.iter_cells().filter(|c| c.piece.is_some()).count();
        assert_eq!(n_pieces, expected.len());
        assert_eq!(grid.count_pieces(PlayerA), 13);
        assert_eq!(grid.count_pieces(PlayerB), 13);
        assert_eq!(to_notation(&grid), boards::CLASSIC);
    }

    #[test]
    fn test_grid_serde() {
        let grid = parse(boards::CLASSIC).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, format!("\"{}\"", boards::CLASSIC));
        let back: crate::board::grid::CellGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
        assert!(serde_json::from_str::<crate::board::grid::CellGrid>("\"*/*\"").is_err());
    }
}
