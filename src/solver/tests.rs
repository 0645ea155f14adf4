use super::*;
use crate::utils::board_from_str_array;
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn solver(max_depth: u32, propagation: Propagation) -> Solver {
    Solver::with_config(SearchConfig {
        max_depth,
        propagation,
    })
}

fn single_tile_board() -> Board {
    board_from_str_array(&["1..."]).unwrap()
}

fn stuck_board() -> Board {
    board_from_str_array(&["1212", "2121", "1212", "2121"]).unwrap()
}

fn mid_game_board() -> Board {
    board_from_str_array(&["1.2.", "12..", "3..1", "...2"]).unwrap()
}

fn generated_bound(max_depth: u32) -> u64 {
    4 * (4u64.pow(max_depth) - 1) / 3
}

// Descendant scores of every candidate, keyed by the candidate's position.
fn descendant_scores(tree: &SearchTree) -> Vec<Vec<u64>> {
    tree.candidates()
        .iter()
        .map(|&candidate| {
            tree.arena()
                .iter()
                .filter(|(id, node)| *id != candidate && node.anchor == Some(candidate))
                .map(|(_, node)| node.score)
                .collect()
        })
        .collect()
}

#[test]
fn test_depth_zero_is_random_and_searches_nothing() {
    let mut rng = SmallRng::seed_from_u64(2024);
    let mut solver = solver(0, Propagation::Max);
    let board = mid_game_board();

    let mut counts = [0u32; 4];
    for _ in 0..4000 {
        let outcome = solver.get_next_move(&board, &mut rng).unwrap();
        assert_eq!(outcome.nodes_generated, 0);
        assert_eq!(outcome.nodes_expanded, 0);
        let idx = Direction::ALL
            .iter()
            .position(|&d| d == outcome.direction)
            .unwrap();
        counts[idx] += 1;
    }
    for count in counts {
        assert!((850..=1150).contains(&count), "skewed counts: {:?}", counts);
    }
    assert_eq!(solver.stats().searches, 0);
}

#[test]
fn test_depth_zero_on_stuck_board_still_returns_a_move() {
    let mut rng = SmallRng::seed_from_u64(9);
    let outcome = get_next_move(&stuck_board(), 0, Propagation::Average, &mut rng);
    assert!(outcome.is_ok());
}

#[test]
fn test_single_tile_scenario() {
    let board = single_tile_board();
    for seed in 0..20 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut solver = solver(1, Propagation::Max);
        let outcome = solver.get_next_move(&board, &mut rng).unwrap();

        assert!(matches!(
            outcome.direction,
            Direction::Right | Direction::Down
        ));
        assert_eq!(outcome.nodes_generated, 4);
        // root plus the two first-ply candidates
        assert_eq!(outcome.nodes_expanded, 3);
        assert!(solver.worklist_is_empty());
    }
}

#[test]
fn test_root_counts_as_expanded() {
    // every direction moves a centre tile, so the root alone tips expanded past generated
    let board = board_from_str_array(&["....", ".1..", "....", "...."]).unwrap();
    for propagation in [Propagation::Max, Propagation::Average] {
        let mut rng = SmallRng::seed_from_u64(11);
        let outcome = get_next_move(&board, 1, propagation, &mut rng).unwrap();
        assert_eq!(outcome.nodes_generated, 4);
        assert_eq!(outcome.nodes_expanded, 5);
    }
}

#[test]
fn test_single_tile_candidate_scores() {
    let mut rng = SmallRng::seed_from_u64(3);
    let tree = solver(1, Propagation::Max).search(&single_tile_board(), &mut rng);

    let directions: Vec<Direction> = tree
        .candidates()
        .iter()
        .filter_map(|&id| tree.arena().get(id).direction)
        .collect();
    assert_eq!(directions, vec![Direction::Right, Direction::Down]);
    for &id in tree.candidates() {
        // no merge, 14 empty cells once the random tile lands
        assert_eq!(tree.arena().get(id).score, 14);
        assert_eq!(tree.arena().get(id).samples, 0);
    }
    assert_eq!(tree.arena().get(tree.root()).children, 2);
}

#[test]
fn test_stuck_board_reports_no_move() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut solver = solver(3, Propagation::Max);
    let result = solver.get_next_move(&stuck_board(), &mut rng);

    assert_eq!(result, Err(SearchError::NoMoveAvailable));
    assert!(solver.worklist_is_empty());
    let stats = solver.stats();
    assert_eq!(stats.nodes_generated, 4);
    assert_eq!(stats.nodes_expanded, 1);
}

#[test]
fn test_best_action_empty_candidates() {
    let arena = Arena::default();
    let mut rng = SmallRng::seed_from_u64(0);
    assert_eq!(
        best_action(&arena, &[], &mut rng),
        Err(SearchError::NoMoveAvailable)
    );
}

#[test]
fn test_best_action_picks_maximum() {
    let board = Board::new_empty();
    let mut arena = Arena::default();
    let root = arena.add_root(board);
    let low = arena.add_child(root, 3, Direction::Left, board);
    let high = arena.add_child(root, 9, Direction::Up, board);
    let mid = arena.add_child(root, 5, Direction::Down, board);

    let mut rng = SmallRng::seed_from_u64(0);
    for _ in 0..20 {
        assert_eq!(
            best_action(&arena, &[low, high, mid], &mut rng),
            Ok(Direction::Up)
        );
    }
}

#[test]
fn test_tie_break_is_fair() {
    // Right and Down both score 14 at depth 1 whatever tile is sampled.
    let board = single_tile_board();
    let mut rng = SmallRng::seed_from_u64(77);
    let mut solver = solver(1, Propagation::Max);

    let trials = 2000;
    let mut right = 0;
    for _ in 0..trials {
        if solver.get_next_move(&board, &mut rng).unwrap().direction == Direction::Right {
            right += 1;
        }
    }
    assert!(
        (900..=1100).contains(&right),
        "right chosen {} of {} times",
        right,
        trials
    );
}

#[test]
fn test_seeded_search_is_reproducible() {
    let board = mid_game_board();
    let run = |seed| {
        let mut rng = SmallRng::seed_from_u64(seed);
        solver(4, Propagation::Average)
            .get_next_move(&board, &mut rng)
            .unwrap()
    };
    assert_eq!(run(5), run(5));
}

#[test]
fn test_children_and_samples_are_separate_counters() {
    let mut rng = SmallRng::seed_from_u64(21);
    let tree = solver(3, Propagation::Average).search(&mid_game_board(), &mut rng);
    let arena = tree.arena();

    for (id, node) in arena.iter() {
        let direct = arena.iter().filter(|(_, n)| n.parent == Some(id)).count() as u32;
        assert_eq!(node.children, direct);
    }
    for (&candidate, scores) in tree.candidates().iter().zip(descendant_scores(&tree)) {
        assert_eq!(arena.get(candidate).samples as usize, scores.len());
    }
}

#[test]
fn test_depth_two_average_is_mean_of_children() {
    let mut rng = SmallRng::seed_from_u64(8);
    let tree = solver(2, Propagation::Average).search(&mid_game_board(), &mut rng);

    for (&candidate, scores) in tree.candidates().iter().zip(descendant_scores(&tree)) {
        let node = tree.arena().get(candidate);
        if scores.is_empty() {
            continue;
        }
        // a running truncated mean never drifts above the exact mean
        let exact_mean = scores.iter().sum::<u64>() / scores.len() as u64;
        assert!(node.score <= exact_mean + 1);
        assert!(node.score >= *scores.iter().min().unwrap());
    }
}

#[test]
fn test_stats_accumulate_across_searches() {
    let board = mid_game_board();
    let mut rng = SmallRng::seed_from_u64(4);
    let mut solver = solver(2, Propagation::Max);

    let first = solver.get_next_move(&board, &mut rng).unwrap();
    let second = solver.get_next_move(&board, &mut rng).unwrap();
    let stats = solver.stats();
    assert_eq!(stats.searches, 2);
    assert_eq!(
        stats.nodes_generated,
        first.nodes_generated + second.nodes_generated
    );
    assert_eq!(
        stats.nodes_expanded,
        first.nodes_expanded + second.nodes_expanded
    );
    assert!(stats.peak_nodes > 0);

    solver.reset_stats();
    assert_eq!(solver.stats(), SearchStats::default());
}

fn board_strategy() -> impl Strategy<Value = Board> {
    prop::collection::vec(prop_oneof![3 => Just(0u8), 2 => 1u8..5], 16).prop_map(|cells| {
        let mut board = Board::new_empty();
        for (i, exponent) in cells.into_iter().enumerate() {
            board.set_tile(i / 4, i % 4, exponent);
        }
        board
    })
}

fn propagation_strategy() -> impl Strategy<Value = Propagation> {
    prop_oneof![Just(Propagation::Max), Just(Propagation::Average)]
}

proptest! {
    /// Property: the worklist is drained and counts respect the geometric bound
    #[test]
    fn prop_counts_are_bounded(
        board in board_strategy(),
        max_depth in 1u32..=3,
        propagation in propagation_strategy(),
        seed in any::<u64>(),
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut solver = solver(max_depth, propagation);
        let tree = solver.search(&board, &mut rng);

        let expandable = tree
            .arena()
            .iter()
            .filter(|(_, node)| node.depth < max_depth)
            .count() as u64;

        prop_assert!(solver.worklist_is_empty());
        prop_assert_eq!(tree.nodes_expanded() as usize, tree.arena().len());
        prop_assert_eq!(tree.nodes_generated(), 4 * expandable);
        // the root is popped but never generated
        prop_assert!(tree.nodes_expanded() <= tree.nodes_generated() + 1);
        prop_assert!(tree.nodes_generated() <= generated_bound(max_depth));
    }

    /// Property: every first-ply candidate comes from a move that changes the board
    #[test]
    fn prop_candidates_change_the_board(
        board in board_strategy(),
        seed in any::<u64>(),
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let tree = solver(2, Propagation::Max).search(&board, &mut rng);

        for &id in tree.candidates() {
            let node = tree.arena().get(id);
            prop_assert_eq!(node.depth, DECISION_DEPTH);
            let dir = node.direction.unwrap();
            let mut probe = board;
            let mut score = 0;
            prop_assert!(probe.apply_move(&mut score, dir));
        }

        match solver(2, Propagation::Max).get_next_move(&board, &mut rng) {
            Ok(outcome) => {
                let mut probe = board;
                let mut score = 0;
                prop_assert!(probe.apply_move(&mut score, outcome.direction));
            }
            Err(err) => {
                prop_assert_eq!(err, SearchError::NoMoveAvailable);
                prop_assert!(board.is_terminal());
            }
        }
    }

    /// Property: child depth is one more than the parent's, and anchors are first-ply
    #[test]
    fn prop_tree_structure(
        board in board_strategy(),
        propagation in propagation_strategy(),
        seed in any::<u64>(),
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let tree = solver(3, propagation).search(&board, &mut rng);
        let arena = tree.arena();

        for (id, node) in arena.iter() {
            match node.parent {
                None => prop_assert_eq!(id, tree.root()),
                Some(parent) => {
                    let parent = arena.get(parent);
                    prop_assert_eq!(node.depth, parent.depth + 1);
                    prop_assert_ne!(node.board, parent.board);
                    let anchor = node.anchor.unwrap();
                    prop_assert!(arena.get(anchor).is_first_ply());
                }
            }
        }
    }

    /// Property: under max propagation a candidate dominates its whole subtree
    #[test]
    fn prop_max_propagation_dominates_subtree(
        board in board_strategy(),
        seed in any::<u64>(),
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let tree = solver(3, Propagation::Max).search(&board, &mut rng);

        for (&candidate, scores) in tree.candidates().iter().zip(descendant_scores(&tree)) {
            let score = tree.arena().get(candidate).score;
            for descendant in scores {
                prop_assert!(score >= descendant);
            }
        }
    }

    /// Property: under average propagation a candidate stays within its subtree's range
    #[test]
    fn prop_average_propagation_within_range(
        board in board_strategy(),
        seed in any::<u64>(),
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let tree = solver(3, Propagation::Average).search(&board, &mut rng);

        for (&candidate, scores) in tree.candidates().iter().zip(descendant_scores(&tree)) {
            if scores.is_empty() {
                continue;
            }
            let score = tree.arena().get(candidate).score;
            let min = *scores.iter().min().unwrap();
            let max = *scores.iter().max().unwrap();
            prop_assert!(min <= score && score <= max, "{} outside [{}, {}]", score, min, max);
        }
    }
}
