#![cfg(feature = "demo")]

use laser_chess::game::GameOutcome::{Draw, Win};
use laser_chess::game::GameStatus::Over;
use laser_chess::game::{Game, TurnEffects};
use laser_chess::pieces::PlayerType::{PlayerA, PlayerB};
use laser_chess::play::Movement;
use laser_chess::preset;
use laser_chess::search::{compute_move, SearchConfig};
use std::io::stdin;
use std::str::FromStr;

fn input(prompt: &str) -> std::io::Result<String> {
    println!("{prompt}");
    let mut s: String = String::new();
    stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

fn get_movement() -> Movement {
    loop {
        if let Ok(m_str) = input("Please enter your move (eg, e5-e6, e5*d6, e8+ or e8-):") {
            match Movement::from_str(&m_str) {
                Ok(movement) => return movement,
                Err(e) => println!("Invalid move ({e}). Try again.")
            }
        } else {
            println!("Error reading input. Try again.");
        }
    }
}

fn describe(effects: &TurnEffects) {
    let path: Vec<String> = effects.laser_path.segments().iter()
        .map(|s| s.location.to_string())
        .collect();
    println!("{} played; laser path: {}", effects.movement, path.join(" "));
    if let Some(killed) = effects.killed {
        println!("Laser destroyed {:?} {:?} on {}.", killed.piece.player, killed.piece.piece_type, killed.location);
    }
}

fn main() {
    env_logger::init();
    println!("laser-chess demo");
    let mut game = Game::new(preset::boards::CLASSIC, PlayerA).expect("Could not create game.");
    let config = SearchConfig::default();
    loop {
        println!("Board:");
        println!("{}", game.state.grid);
        println!("{:?} to play.", game.state.side_to_play);

        let movement = match game.state.side_to_play {
            PlayerA => get_movement(),
            PlayerB => match compute_move(&game.logic, &game.state.grid, PlayerB, &config) {
                Some(movement) => movement,
                None => {
                    println!("Game over. {:?} has no moves; draw.", PlayerB);
                    return
                }
            }
        };
        match game.do_play(movement) {
            Ok(effects) => {
                describe(&effects);
                if let Over(outcome) = game.state.status {
                    match outcome {
                        Draw(reason) => println!("Game over. Draw ({reason:?})."),
                        Win(reason, player) => println!("Game over. Winner is {player:?} ({reason:?})."),
                    }
                    println!("Final board:");
                    println!("{}", game.state.grid);
                    return
                }
            },
            Err(e) => println!("Invalid move ({e}). Try again.")
        }
    }
}
