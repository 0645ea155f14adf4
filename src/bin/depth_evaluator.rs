use clap::Parser;
use log::{debug, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashMap;
use tilesearch::engine::{exponent_value, Direction, Game};
use tilesearch::heuristics::choose_move_greedy;
use tilesearch::solver::{Propagation, SearchConfig, Solver};

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Compare search depths and propagation modes over seeded games",
    long_about = None
)]
struct Args {
    /// Number of seeded games per strategy
    #[clap(short, long, default_value_t = 10)]
    games: u64,

    /// Deepest search depth to evaluate (every depth from 1 up to this is played)
    #[clap(short = 'd', long, default_value_t = 3)]
    max_depth: u32,

    /// First seed; game `i` uses `start_seed + i`
    #[clap(long, default_value_t = 0)]
    start_seed: u64,

    /// Stop a game after this many moves
    #[clap(long, default_value_t = 5000)]
    move_limit: u32,
}

#[derive(Clone, Copy)]
enum Strategy {
    Greedy,
    Search(SearchConfig),
}

impl Strategy {
    fn name(&self) -> String {
        match self {
            Strategy::Greedy => "greedy".to_string(),
            Strategy::Search(cfg) => format!("{}-d{}", cfg.propagation, cfg.max_depth),
        }
    }
}

#[derive(Default)]
struct GameResult {
    score: u64,
    max_tile: u8,
    moves: u32,
    nodes_expanded: u64,
}

fn play(strategy: Strategy, seed: u64, move_limit: u32) -> GameResult {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut game = Game::new(&mut rng);
    let mut solver = match strategy {
        Strategy::Search(cfg) => Some(Solver::with_config(cfg)),
        Strategy::Greedy => None,
    };

    while !game.is_game_over() && game.steps() < move_limit {
        let choice: Option<Direction> = match solver.as_mut() {
            Some(solver) => match solver.get_next_move(game.board(), &mut rng) {
                Ok(outcome) => Some(outcome.direction),
                Err(err) => {
                    warn!("{} stopped on seed {}: {}", strategy.name(), seed, err);
                    None
                }
            },
            None => choose_move_greedy(game.board()),
        };
        let Some(dir) = choice else {
            break;
        };
        game.process_move(dir, &mut rng);
    }

    GameResult {
        score: game.score(),
        max_tile: game.board().max_tile(),
        moves: game.steps(),
        nodes_expanded: solver.map_or(0, |s| s.stats().nodes_expanded),
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut strategies = vec![Strategy::Greedy];
    for max_depth in 1..=args.max_depth {
        for propagation in [Propagation::Max, Propagation::Average] {
            strategies.push(Strategy::Search(SearchConfig {
                max_depth,
                propagation,
            }));
        }
    }

    let mut all_results: HashMap<String, Vec<GameResult>> = HashMap::new();

    println!("Starting evaluation over {} seeded games...", args.games);

    for game_idx in 0..args.games {
        let seed = args.start_seed + game_idx;
        println!("\nGame {} (Seed: {})", game_idx, seed);

        for strategy in &strategies {
            let result = play(*strategy, seed, args.move_limit);
            println!(
                "  Strategy: {:<10}, Score: {:<7}, Max tile: {:<5}, Moves: {}",
                strategy.name(),
                result.score,
                exponent_value(result.max_tile),
                result.moves
            );
            debug!("{} expanded {} nodes", strategy.name(), result.nodes_expanded);
            all_results.entry(strategy.name()).or_default().push(result);
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!(
        "Strategies evaluated: {}",
        strategies.iter().map(Strategy::name).collect::<Vec<_>>().join(", ")
    );
    println!("\n--- Averages ---");

    let mut averages: Vec<(String, f64, f64, f64)> = Vec::new();
    for (name, results) in &all_results {
        if results.is_empty() {
            continue;
        }
        let n = results.len() as f64;
        let avg_score = results.iter().map(|r| r.score as f64).sum::<f64>() / n;
        let avg_tile = results
            .iter()
            .map(|r| exponent_value(r.max_tile) as f64)
            .sum::<f64>()
            / n;
        let total_moves: u64 = results.iter().map(|r| r.moves as u64).sum();
        let total_nodes: u64 = results.iter().map(|r| r.nodes_expanded).sum();
        let nodes_per_move = if total_moves == 0 {
            0.0
        } else {
            total_nodes as f64 / total_moves as f64
        };
        averages.push((name.clone(), avg_score, avg_tile, nodes_per_move));
    }

    // Sort by average score descending
    averages.sort_by(|a, b| b.1.total_cmp(&a.1));

    for (name, avg_score, avg_tile, nodes_per_move) in averages {
        println!(
            "Strategy {:<10}: Average Score = {:.2}, Average Max Tile = {:.1}, \
             Expanded/Move = {:.1}",
            name, avg_score, avg_tile, nodes_per_move
        );
    }
}
