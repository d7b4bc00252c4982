use crate::board::geometry::BoardGeometry;
use crate::board::grid::{Cell, CellGrid};
use crate::error::PlayInvalid;
use crate::error::PlayInvalid::{GameOver, IllegalMovement, NoPiece, WrongPlayer};
use crate::game::state::GameState;
use crate::game::GameOutcome::{Draw, Win};
use crate::game::GameStatus::{Ongoing, Over};
use crate::game::{DrawReason, GameOutcome, TurnEffects, WinReason};
use crate::laser;
use crate::laser::{LaserPath, ReflectionTable};
use crate::location::{Direction, Location};
use crate::pieces::PieceType::{Defender, Deflector, Laser, Switch};
use crate::pieces::PlayerType::{PlayerA, PlayerB};
use crate::pieces::{PlacedPiece, PlayerType};
use crate::play::MovementType::{Invalid, Normal, RotateAnticlockwise, RotateClockwise, Special};
use crate::play::{Movement, MovementIterator};

/// The board that results from one complete turn: a movement followed by the mover's laser
/// firing.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedTurn {
    /// The board after the movement and after the killed piece (if any) has been removed.
    pub grid: CellGrid,
    /// The beam fired by the mover's laser.
    pub laser_path: LaserPath,
    /// The piece destroyed by the beam, if any.
    pub killed: Option<PlacedPiece>
}

/// The result of making a play.
pub struct DoPlayResult {
    /// The game state following the play.
    pub new_state: GameState,
    /// What the play did.
    pub effects: TurnEffects
}

impl From<DoPlayResult> for (GameState, TurnEffects) {
    fn from(result: DoPlayResult) -> (GameState, TurnEffects) {
        (result.new_state, result.effects)
    }
}

/// This struct contains the information necessary to implement the game logic: the geometry of
/// the board and the table describing how beams interact with pieces. It provides methods for
/// evaluating movements and resolving turns on a given grid.
///
/// The information stored in this struct is not expected to change over the course of a game. It
/// does not contain the current piece placement; its methods take references to a
/// [`CellGrid`] where necessary.
#[derive(Clone, Copy, Debug)]
pub struct GameLogic {
    pub board_geo: BoardGeometry,
    pub reflections: &'static ReflectionTable
}

impl Default for GameLogic {
    fn default() -> Self {
        Self::new()
    }
}

impl GameLogic {

    /// Create a new [`GameLogic`] using the standard reflection table.
    pub fn new() -> Self {
        Self::with_table(ReflectionTable::standard())
    }

    /// Create a new [`GameLogic`] using the given reflection table.
    pub fn with_table(reflections: &'static ReflectionTable) -> Self {
        Self { board_geo: BoardGeometry::new(), reflections }
    }

    /// Check what kind of movement (if any) takes the piece in `source` to `target`.
    ///
    /// The result is [`MovementType::Invalid`](crate::play::MovementType::Invalid) if the source
    /// cell is empty or holds a laser, the cells are the same or not adjacent, or the target cell
    /// is reserved for the other player. A switch moving onto a defender or deflector (of either
    /// player) is a [`MovementType::Special`](crate::play::MovementType::Special) swap, provided
    /// the piece it displaces may stand on the switch's cell. Otherwise, a movement onto an
    /// empty cell is normal and a movement onto an occupied cell is invalid.
    pub fn check_move(&self, source: &Cell, target: &Cell) -> Movement {
        let invalid = Movement::invalid(source.location, target.location);
        let Some(piece) = source.piece else {
            return invalid
        };
        if piece.piece_type == Laser
            || source.location == target.location
            || !source.location.is_adjacent(target.location)
            || !target.cell_type.admits(piece.player) {
            return invalid
        }
        match target.piece {
            None => Movement::new(Normal, source.location, target.location),
            Some(other) if piece.piece_type == Switch
                && matches!(other.piece_type, Defender | Deflector) => {
                if source.cell_type.admits(other.player) {
                    Movement::new(Special, source.location, target.location)
                } else {
                    invalid
                }
            },
            Some(_) => invalid
        }
    }

    /// Check whether the piece at `location` may be turned a quarter turn. Any piece may be
    /// rotated, except that a laser must end up aiming at a cell on the board.
    pub fn check_rotation(&self, location: Location, clockwise: bool, grid: &CellGrid) -> Movement {
        let Some(piece) = grid.get_piece(location) else {
            return Movement::invalid(location, location)
        };
        if piece.piece_type == Laser {
            let aim: Direction = piece.rotated(clockwise).orientation.into();
            if location.step(aim).is_none() {
                return Movement::invalid(location, location)
            }
        }
        Movement::rotation(location, clockwise)
    }

    /// Iterate over the steps and swaps available to the piece at the given location. Order of
    /// iteration is not guaranteed. Yields nothing if the location is empty.
    pub fn iter_moves<'logic, 'grid>(
        &'logic self,
        location: Location,
        grid: &'grid CellGrid
    ) -> MovementIterator<'logic, 'grid> {
        MovementIterator::new(self, grid, location)
    }

    /// All steps and swaps available to the piece at the given location. Rotations are not
    /// included; see [`GameLogic::check_rotation`].
    pub fn legal_moves_from(&self, location: Location, grid: &CellGrid) -> Vec<Movement> {
        self.iter_moves(location, grid).collect()
    }

    /// All steps and swaps of the given player's pieces, piece by piece. No rotations.
    pub fn legal_moves(&self, player: PlayerType, grid: &CellGrid) -> Vec<Movement> {
        grid.iter_pieces(player)
            .flat_map(|placed| self.iter_moves(placed.location, grid))
            .collect()
    }

    /// Every movement the given player could make on the given grid: all steps and swaps of
    /// their pieces, plus the rotations that could change how a piece meets a beam.
    pub fn all_legal_moves(&self, player: PlayerType, grid: &CellGrid) -> Vec<Movement> {
        let mut movements = self.legal_moves(player, grid);
        for placed in grid.iter_pieces(player) {
            if self.reflections.orientation_matters(placed.piece.piece_type) {
                for clockwise in [true, false] {
                    let rotation = self.check_rotation(placed.location, clockwise, grid);
                    if rotation.is_valid() {
                        movements.push(rotation);
                    }
                }
            }
        }
        movements
    }

    /// Whether the given player could make any movement on the given grid.
    pub fn player_can_play(&self, player: PlayerType, grid: &CellGrid) -> bool {
        !self.all_legal_moves(player, grid).is_empty()
    }

    /// Apply a movement to a grid, returning the resulting grid. Steps and swaps exchange the
    /// contents of the source and target cells; rotations turn the piece at the target. An
    /// invalid movement changes nothing. Legality is not checked.
    pub fn apply(&self, movement: Movement, grid: &CellGrid) -> CellGrid {
        let mut new_grid = *grid;
        match movement.movement_type {
            Normal | Special => new_grid.swap_contents(movement.source, movement.target),
            RotateClockwise | RotateAnticlockwise => {
                if let Some(piece) = grid.get_piece(movement.target) {
                    let clockwise = movement.movement_type == RotateClockwise;
                    new_grid.set_piece(movement.target, piece.rotated(clockwise));
                }
            },
            Invalid => {}
        }
        new_grid
    }

    /// Trace the beam fired by the given player's laser. The path is empty if the player's laser
    /// has been destroyed.
    pub fn compute_laser_path(&self, player: PlayerType, grid: &CellGrid) -> LaserPath {
        laser::compute_laser_path(self.board_geo.laser_slot(player), grid, self.reflections)
    }

    /// Play out a full turn for `player` without checking legality: apply the movement, fire
    /// the player's laser and remove whatever it kills.
    pub fn resolve_turn(&self, movement: Movement, player: PlayerType, grid: &CellGrid) -> ResolvedTurn {
        let mut new_grid = self.apply(movement, grid);
        let laser_path = self.compute_laser_path(player, &new_grid);
        let killed = laser_path.killed().and_then(|location| {
            new_grid.clear(location).map(|piece| PlacedPiece::new(location, piece))
        });
        ResolvedTurn { grid: new_grid, laser_path, killed }
    }

    /// Check whether a movement may be made by the player whose turn it is. Returns the movement
    /// as the movement engine sees it (eg, a step written with `-` onto a defender next to a
    /// switch comes back as a swap), or a [`PlayInvalid`] describing why it may not be made.
    pub fn validate_play(&self, movement: Movement, state: &GameState) -> Result<Movement, PlayInvalid> {
        if state.status != Ongoing {
            return Err(GameOver)
        }
        let piece = state.grid.get_piece(movement.source).ok_or(NoPiece)?;
        if piece.player != state.side_to_play {
            return Err(WrongPlayer)
        }
        let checked = match movement.movement_type {
            RotateClockwise | RotateAnticlockwise => self.check_rotation(
                movement.source,
                movement.movement_type == RotateClockwise,
                &state.grid
            ),
            Normal | Special => self.check_move(
                state.grid.cell(movement.source),
                state.grid.cell(movement.target)
            ),
            Invalid => movement
        };
        if checked.is_valid() {
            Ok(checked)
        } else {
            Err(IllegalMovement)
        }
    }

    /// Determine the outcome of the game, if any, given the board after a turn and the player
    /// who is to move next. A player whose king or laser has been destroyed loses.
    pub fn get_game_outcome(&self, grid: &CellGrid, side_to_play: PlayerType) -> Option<GameOutcome> {
        for player in [PlayerA, PlayerB] {
            if !grid.has_king(player) {
                return Some(Win(WinReason::KingKilled, player.other()))
            }
            if !grid.has_laser(player) {
                return Some(Win(WinReason::LaserKilled, player.other()))
            }
        }
        if !self.player_can_play(side_to_play, grid) {
            return Some(Draw(DrawReason::NoPlays))
        }
        None
    }

    /// Check a play and, if it is valid, resolve the turn and return the new state together with
    /// a description of what happened.
    pub fn do_play(&self, movement: Movement, state: GameState) -> Result<DoPlayResult, PlayInvalid> {
        let movement = self.validate_play(movement, &state)?;
        let player = state.side_to_play;
        let turn = self.resolve_turn(movement, player, &state.grid);

        let mut new_state = state;
        new_state.grid = turn.grid;
        new_state.side_to_play = player.other();
        new_state.turn += 1;
        let game_outcome = self.get_game_outcome(&new_state.grid, new_state.side_to_play);
        if let Some(outcome) = game_outcome {
            new_state.status = Over(outcome);
        }
        Ok(DoPlayResult {
            new_state,
            effects: TurnEffects {
                movement,
                laser_path: turn.laser_path,
                killed: turn.killed,
                game_outcome
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::error::PlayInvalid::{GameOver, IllegalMovement, NoPiece, WrongPlayer};
    use crate::game::logic::GameLogic;
    use crate::game::state::GameState;
    use crate::game::GameOutcome::Win;
    use crate::game::GameStatus::{Ongoing, Over};
    use crate::game::TurnEffects;
    use crate::game::WinReason::{KingKilled, LaserKilled};
    use crate::location::Location;
    use crate::notation::parse;
    use crate::pieces::PieceType::{Defender, Deflector, King, Laser, Switch};
    use crate::pieces::PlayerType::{PlayerA, PlayerB};
    use crate::pieces::{Orientation, Piece, PlacedPiece};
    use crate::play::Movement;
    use crate::play::MovementType::{Invalid, Normal, Special};
    use crate::preset::boards;
    use crate::utils::check_location_vec;
    use std::collections::HashSet;
    use std::str::FromStr;

    fn loc(s: &str) -> Location {
        Location::from_str(s).unwrap()
    }

    fn mv(s: &str) -> Movement {
        Movement::from_str(s).unwrap()
    }

    fn targets(movements: Vec<Movement>) -> Vec<Location> {
        movements.iter().map(|m| m.target).collect()
    }

    #[test]
    fn test_check_move_basics() {
        let logic = GameLogic::new();
        let grid = parse("l9/*/*/3sdk4/4K5/*/*/9L").unwrap();
        let check = |s: &str, t: &str| logic.check_move(grid.cell(loc(s)), grid.cell(loc(t))).movement_type;

        // Switch onto own defender swaps, king onto own defender does not
        assert_eq!(check("d5", "e5"), Special);
        assert_eq!(check("f5", "e5"), Invalid);
        // Switch onto a king is not a swap
        assert_eq!(check("d5", "e4"), Invalid);
        assert_eq!(check("d5", "c6"), Normal);
        assert_eq!(check("d5", "d5"), Invalid);
        // Empty source
        assert_eq!(check("a5", "b5"), Invalid);
        // Lasers never move
        assert_eq!(check("a8", "b8"), Invalid);
        assert_eq!(check("j1", "i2"), Invalid);
        assert!(logic.legal_moves_from(loc("a8"), &grid).is_empty());
    }

    #[test]
    fn test_non_adjacent_moves_invalid() {
        let logic = GameLogic::new();
        let grid = parse(boards::CLASSIC).unwrap();
        for source in logic.board_geo.iter_locations() {
            for target in logic.board_geo.iter_locations() {
                if !source.is_adjacent(target) {
                    let movement = logic.check_move(grid.cell(source), grid.cell(target));
                    assert_eq!(movement.movement_type, Invalid, "{source} -> {target}");
                }
            }
        }
    }

    #[test]
    fn test_reserved_cells() {
        let logic = GameLogic::new();
        // PlayerB defender on b5 cannot enter column a, which belongs to PlayerA
        let grid = parse("l9/*/*/1D8/*/*/*/9L").unwrap();
        check_location_vec(
            targets(logic.legal_moves_from(loc("b5"), &grid)),
            vec![loc("b6"), loc("c6"), loc("c5"), loc("b4"), loc("c4")]
        );
        // PlayerA defender on b5 can
        let grid = parse("l9/*/*/1d8/*/*/*/9L").unwrap();
        assert_eq!(logic.legal_moves_from(loc("b5"), &grid).len(), 8);

        // A swap may not leave the displaced piece on a cell reserved against it
        let grid = parse("l9/sB8/*/*/*/*/*/9L").unwrap();
        assert_eq!(logic.check_move(grid.cell(loc("a7")), grid.cell(loc("b7"))).movement_type, Invalid);
        let grid = parse("l9/1sB7/*/*/*/*/*/9L").unwrap();
        assert_eq!(logic.check_move(grid.cell(loc("b7")), grid.cell(loc("c7"))).movement_type, Special);
    }

    #[test]
    fn test_apply_swap_and_step() {
        let logic = GameLogic::new();
        let grid = parse("l9/*/*/3sd+5/*/*/*/9L").unwrap();
        let switch = grid.get_piece(loc("d5")).unwrap();
        let defender = grid.get_piece(loc("e5")).unwrap();
        let swap = logic.check_move(grid.cell(loc("d5")), grid.cell(loc("e5")));
        assert_eq!(swap, mv("d5*e5"));

        let swapped = logic.apply(swap, &grid);
        assert_eq!(swapped.get_piece(loc("d5")), Some(defender));
        assert_eq!(swapped.get_piece(loc("e5")), Some(switch));
        assert_eq!(swapped.cell(loc("e5")).id, grid.cell(loc("d5")).id);
        // Input grid is untouched
        assert_eq!(grid.get_piece(loc("d5")), Some(switch));

        let stepped = logic.apply(mv("e5-f4"), &swapped);
        assert_eq!(stepped.get_piece(loc("e5")), None);
        assert_eq!(stepped.get_piece(loc("f4")), Some(switch));
        assert_eq!(stepped.count_pieces(PlayerA), 3);

        assert_eq!(logic.apply(Movement::invalid(loc("d5"), loc("e5")), &grid), grid);
    }

    #[test]
    fn test_rotation() {
        let logic = GameLogic::new();
        let grid = parse("l9/*/*/4b5/*/*/*/9L").unwrap();
        assert!(logic.check_rotation(loc("e5"), true, &grid).is_valid());
        assert!(logic.check_rotation(loc("e5"), false, &grid).is_valid());
        assert!(!logic.check_rotation(loc("e6"), true, &grid).is_valid());

        let turned = logic.apply(mv("e5+"), &grid);
        assert_eq!(turned.get_piece(loc("e5")).unwrap().orientation, Orientation::Deg90);
        let turned = logic.apply(mv("e5-"), &turned);
        let turned = logic.apply(mv("e5-"), &turned);
        assert_eq!(turned.get_piece(loc("e5")).unwrap().orientation, Orientation::Deg270);

        // Lasers in the corners may only turn to face into the board
        assert!(logic.check_rotation(loc("a8"), true, &grid).is_valid());
        assert!(!logic.check_rotation(loc("a8"), false, &grid).is_valid());
        assert!(!logic.check_rotation(loc("j1"), true, &grid).is_valid());
        assert!(logic.check_rotation(loc("j1"), false, &grid).is_valid());
    }

    #[test]
    fn test_all_legal_moves() {
        let logic = GameLogic::new();
        // King has eight steps and no rotations; laser has one useful rotation
        let grid = parse("l9/*/*/4k5/*/*/*/9L").unwrap();
        let moves: HashSet<Movement> = logic.all_legal_moves(PlayerA, &grid).into_iter().collect();
        assert_eq!(moves.len(), 9);
        assert!(moves.contains(&mv("a8+")));
        assert!(!moves.contains(&mv("e5+")));
        assert!(moves.contains(&mv("e5-e4")));

        // Without rotations, just the king's steps
        let steps = logic.legal_moves(PlayerA, &grid);
        assert_eq!(steps.len(), 8);
        assert!(steps.iter().all(|m| !m.is_rotation()));
        assert_eq!(steps, logic.legal_moves_from(loc("e5"), &grid));

        let grid = parse(boards::CLASSIC).unwrap();
        for player in [PlayerA, PlayerB] {
            let moves = logic.all_legal_moves(player, &grid);
            assert!(!moves.is_empty());
            for m in moves {
                assert_eq!(grid.get_piece(m.source).unwrap().player, player);
            }
        }
    }

    #[test]
    fn test_resolve_turn() {
        let logic = GameLogic::new();
        // PlayerA's laser aims right along row 8; the deflector on e8 sends the beam down the
        // e-file into PlayerB's king on e4
        let grid = parse("l+3b5/*/*/*/4K5/*/k9/9L").unwrap();
        let turn = logic.resolve_turn(Movement::invalid(loc("a8"), loc("a8")), PlayerA, &grid);
        assert_eq!(turn.laser_path.killed(), Some(loc("e4")));
        assert_eq!(turn.killed, Some(PlacedPiece::new(
            loc("e4"),
            Piece::new(King, PlayerB, Orientation::Deg0)
        )));
        assert!(!turn.grid.has_king(PlayerB));
        assert_eq!(grid.count_pieces(PlayerB), 2);
        assert_eq!(turn.grid.count_pieces(PlayerB), 1);
    }

    #[test]
    fn test_do_play() {
        let logic = GameLogic::new();
        // The deflector on e8 starts out sending PlayerA's beam off the top of the board
        let state = GameState::new("l+3b+5/*/*/*/4K5/*/k9/9L", PlayerA).unwrap();

        assert_eq!(logic.do_play(mv("e4-e5"), state).err(), Some(WrongPlayer));
        assert_eq!(logic.do_play(mv("c5-c4"), state).err(), Some(NoPiece));
        assert_eq!(logic.do_play(mv("e8-g6"), state).err(), Some(IllegalMovement));
        assert_eq!(logic.do_play(mv("a8-"), state).err(), Some(IllegalMovement));

        // Turning the deflector sends the beam down onto the king
        let (new_state, effects): (GameState, TurnEffects) = logic.do_play(mv("e8-"), state)
            .unwrap()
            .into();
        assert_eq!(effects.movement, mv("e8-"));
        assert_eq!(effects.killed.map(|p| p.location), Some(loc("e4")));
        assert_eq!(effects.game_outcome, Some(Win(KingKilled, PlayerA)));
        assert_eq!(new_state.status, Over(Win(KingKilled, PlayerA)));
        assert_eq!(new_state.side_to_play, PlayerB);
        assert_eq!(new_state.turn, 1);
        assert_eq!(logic.do_play(mv("e4-e5"), new_state).err(), Some(GameOver));

        // A quiet move just passes the turn
        let (new_state, effects): (GameState, TurnEffects) = logic.do_play(mv("a2-b3"), state)
            .unwrap()
            .into();
        assert_eq!(effects.killed, None);
        assert_eq!(effects.laser_path.last().map(|s| s.location), Some(loc("e8")));
        assert_eq!(new_state.status, Ongoing);
        assert_eq!(new_state.grid.get_piece(loc("b3")).map(|p| p.piece_type), Some(King));
        assert_eq!(state.grid.get_piece(loc("a2")).map(|p| p.piece_type), Some(King));
    }

    #[test]
    fn test_laser_kill_ends_game() {
        let logic = GameLogic::new();
        // PlayerA's laser fires down the a-file; the deflector on a1 turns the beam along row 1
        // into the unshielded side of PlayerB's laser
        let state = GameState::new("l++9/*/*/4k5/*/*/4K5/b++8L", PlayerA).unwrap();
        let (new_state, effects): (GameState, TurnEffects) = logic.do_play(mv("e5-e6"), state)
            .unwrap()
            .into();
        assert_eq!(effects.killed.map(|p| (p.location, p.piece.piece_type)), Some((loc("j1"), Laser)));
        assert_eq!(effects.game_outcome, Some(Win(LaserKilled, PlayerA)));
        assert_eq!(new_state.status, Over(Win(LaserKilled, PlayerA)));
        assert!(new_state.grid.has_king(PlayerB));
        assert!(!new_state.grid.has_laser(PlayerB));
        assert_eq!(logic.do_play(mv("e4-e5"), new_state).err(), Some(GameOver));
    }

    #[test]
    fn test_step_written_as_swap() {
        let logic = GameLogic::new();
        let state = GameState::new("l9/*/*/3sd5/4k5/*/*/9L", PlayerA).unwrap();
        let checked = logic.validate_play(mv("d5-e5"), &state).unwrap();
        assert_eq!(checked.movement_type, Special);
        let checked = logic.validate_play(mv("d5*d4"), &state).unwrap();
        assert_eq!(checked.movement_type, Normal);
        let grid = logic.apply(checked, &state.grid);
        assert_eq!(grid.get_piece(loc("d4")).map(|p| p.piece_type), Some(Switch));
        assert_eq!(grid.get_piece(loc("e5")).map(|p| p.piece_type), Some(Defender));
        assert_eq!(grid.find_piece(PlayerA, Deflector), None);
    }
}
