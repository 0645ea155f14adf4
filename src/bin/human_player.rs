use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::io::{self, BufRead, Write};
use tilesearch::engine::{Direction, Game};
use tilesearch::solver::{get_next_move, Propagation};

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Play the sliding-tile puzzle from the terminal",
    long_about = None
)]
struct Args {
    /// Seed for tile placement (random when omitted)
    #[clap(long)]
    seed: Option<u64>,

    /// Search depth used by the 'hint' command
    #[clap(long, default_value_t = 4)]
    hint_depth: u32,
}

/// Asks a y/n question; only an answer of `y` confirms. End of input declines.
fn confirm(question: &str, input: &mut impl BufRead) -> io::Result<bool> {
    print!("{} (y/n) ", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let mut game = Game::new(&mut rng);
    println!("Welcome! Slide with w/a/s/d (or k/h/j/l).");

    loop {
        println!("---------------------");
        println!("Steps: {}, Score: {}", game.steps(), game.score());
        println!("{}", game.board());

        if game.is_game_over() {
            println!();
            println!("---------------------");
            println!("GAME OVER!");
            println!("Final Score: {}", game.score());
            println!("Total Steps: {}", game.steps());
            println!("---------------------");
            break;
        }

        print!("Enter a move, 'hint', 'u' to undo, 'r' to restart, 'q' to quit: ");
        io::stdout().flush()?;

        let mut stdin = io::stdin().lock();
        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }

        match input.trim() {
            "q" => {
                if confirm("Quit?", &mut stdin)? {
                    println!("Thanks for playing!");
                    break;
                }
            }
            "r" => {
                if confirm("Restart?", &mut stdin)? {
                    game = Game::new(&mut rng);
                    println!("New game started.");
                }
            }
            "u" => {
                if game.undo_last_move() {
                    println!("Move undone.");
                } else {
                    println!("Cannot undo further (no moves made).");
                }
            }
            "hint" => {
                match get_next_move(game.board(), args.hint_depth, Propagation::Max, &mut rng) {
                    Ok(outcome) => println!(
                        "Suggested move: {} ({} nodes expanded)",
                        outcome.direction, outcome.nodes_expanded
                    ),
                    Err(err) => println!("No hint: {}", err),
                }
            }
            other => {
                let mut chars = other.chars();
                match (chars.next().and_then(Direction::from_key), chars.next()) {
                    (Some(dir), None) => {
                        if !game.process_move(dir, &mut rng) {
                            println!("Moving {} does not change the board.", dir);
                        }
                    }
                    _ => println!("Invalid input. Use w/a/s/d, h/j/k/l, 'hint', 'u', 'r' or 'q'."),
                }
            }
        }
    }
    Ok(())
}
