use anyhow::{bail, Context};
use clap::Parser;
use log::{info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tilesearch::engine::{Game, SIZE};
use tilesearch::report::RunReport;
use tilesearch::solver::{Propagation, SearchConfig, Solver};
use tilesearch::utils::board_from_str_array;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play a full game with the tree-search solver", long_about = None)]
struct Args {
    /// How descendant scores are folded into first-ply candidates
    #[clap(value_enum)]
    propagation: Propagation,

    /// Depth limit for the search (0 plays uniformly random moves)
    max_depth: u32,

    /// Pause briefly after every move so the game can be followed
    #[clap(long)]
    slow: bool,

    /// Seed for tile placement and tie-breaking
    #[clap(long)]
    seed: Option<u64>,

    /// Start from a board file (4 lines of exponent characters) instead of a random board
    #[clap(long)]
    board_file: Option<PathBuf>,

    /// Where to write the run statistics
    #[clap(short, long, default_value = "output.txt")]
    output: PathBuf,
}

const SLOW_DELAY: Duration = Duration::from_millis(150);

fn read_board_file(path: &Path) -> anyhow::Result<Game> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read board file {}", path.display()))?;

    let lines: Vec<&str> = content
        .lines()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    if lines.len() != SIZE {
        bail!("Expected {} lines in board file, found {}", SIZE, lines.len());
    }
    for (i, line) in lines.iter().enumerate() {
        if line.chars().count() != SIZE {
            bail!(
                "Line {} has {} characters (expected {})",
                i + 1,
                line.chars().count(),
                SIZE
            );
        }
    }

    let board = board_from_str_array(&lines).context("Invalid board format")?;
    Ok(Game::new_with_board(board))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let mut game = match &args.board_file {
        Some(path) => read_board_file(path)?,
        None => Game::new(&mut rng),
    };

    let mut solver = Solver::with_config(SearchConfig {
        max_depth: args.max_depth,
        propagation: args.propagation,
    });
    info!(
        "solving with depth {} and {} propagation",
        args.max_depth, args.propagation
    );

    println!("Initial board state:\n{}\n", game.board());

    let mut search_time = Duration::ZERO;
    while !game.is_game_over() {
        let start = Instant::now();
        let result = solver.get_next_move(game.board(), &mut rng);
        search_time += start.elapsed();

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("stopping: {}", err);
                break;
            }
        };

        if game.process_move(outcome.direction, &mut rng) {
            println!(
                "Step {}: {} (score {})\n{}\n",
                game.steps(),
                outcome.direction,
                game.score(),
                game.board()
            );
            if args.slow {
                thread::sleep(SLOW_DELAY);
            }
        }
    }

    println!("GAME OVER");
    let stats = solver.stats();
    let report = RunReport {
        max_depth: args.max_depth,
        nodes_generated: stats.nodes_generated,
        nodes_expanded: stats.nodes_expanded,
        search_time,
        max_tile: game.board().max_tile(),
        score: game.score(),
    };
    print!("{}", report);

    report
        .write_to(&args.output)
        .with_context(|| format!("Failed to write report to {}", args.output.display()))?;
    info!("report written to {}", args.output.display());
    Ok(())
}
