#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Legal-action generator with admissibility pruning.
//!
//! While the seeker cannot yet reach the target step count on the ghost's
//! remaining fear alone, the branch must collect more pellets. Branches that
//! provably cannot do so are cut before any move is generated.

use pacman_fear_core::{CellKind, Direction, GameConditions};
use pacman_fear_world::WorldState;

/// Reason a branch was cut without generating moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prune {
    /// More fear is required but no pellets remain.
    NoPellets,
    /// The nearest pellet lies further away than the remaining fear.
    PelletOutOfReach {
        /// Manhattan distance to the nearest pellet.
        distance: u32,
        /// Fear remaining.
        fear: i32,
    },
    /// Collecting every remaining pellet still falls short of the target.
    InsufficientFear {
        /// Best-case steps still obtainable.
        obtainable: i64,
        /// Steps still required to reach the target.
        required: i64,
    },
}

/// Shortfall `T − (steps + fear)` between the target and what current fear covers.
#[must_use]
pub fn fear_margin(state: &WorldState, conditions: &GameConditions) -> i64 {
    i64::from(conditions.target_steps())
        - (i64::from(state.pacman().steps()) + i64::from(state.ghost().fear()))
}

/// Decides whether the branch rooted at `state` can be abandoned.
///
/// Only applies while the fear margin is positive; otherwise the current fear
/// already carries the seeker to the target and nothing is pruned.
#[must_use]
pub fn prune(state: &WorldState, conditions: &GameConditions) -> Option<Prune> {
    if fear_margin(state, conditions) <= 0 {
        return None;
    }

    let pellets = state.pellets();
    if pellets.is_empty() {
        return Some(Prune::NoPellets);
    }

    let Some((_, distance)) = state
        .grid()
        .find_closest(state.pacman().position(), CellKind::Pellet)
    else {
        return Some(Prune::NoPellets);
    };

    let fear = state.ghost().fear();
    if i64::from(distance) > i64::from(fear) {
        return Some(Prune::PelletOutOfReach { distance, fear });
    }

    let pellet_count = i64::try_from(pellets.len()).unwrap_or(i64::MAX);
    let obtainable = pellet_count
        .saturating_mul(i64::from(conditions.pellet_power()))
        .saturating_add(i64::from(distance));
    let required =
        i64::from(conditions.target_steps()) - i64::from(state.pacman().steps());
    if obtainable < required {
        return Some(Prune::InsufficientFear {
            obtainable,
            required,
        });
    }

    None
}

/// Directions whose destination is on the grid and is neither a wall nor the
/// ghost, in canonical order (north, west, east, south).
#[must_use]
pub fn open_directions(state: &WorldState) -> Vec<Direction> {
    let position = state.pacman().position();
    Direction::CANONICAL
        .into_iter()
        .filter(|direction| {
            state
                .grid()
                .get(position + direction.delta())
                .is_some_and(|cell| cell.is_enterable())
        })
        .collect()
}

/// Legal moves from `state`, or none when the branch is pruned.
#[must_use]
pub fn legal_actions(state: &WorldState, conditions: &GameConditions) -> Vec<Direction> {
    if let Some(reason) = prune(state, conditions) {
        tracing::debug!(
            ?reason,
            steps = state.pacman().steps(),
            fear = state.ghost().fear(),
            pellets = state.pellets().len(),
            "branch pruned"
        );
        return Vec::new();
    }
    open_directions(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pacman_fear_world::WorldDescription;

    fn parse(text: &str) -> (GameConditions, WorldState) {
        WorldDescription::parse(text)
            .expect("world parses")
            .into_parts()
    }

    #[test]
    fn fear_margin_subtracts_steps_and_fear() {
        let (conditions, state) = parse("T=10\nM=4\nP=1\n@ .\n. F\n");
        assert_eq!(fear_margin(&state, &conditions), 6);
    }

    #[test]
    fn no_pruning_once_fear_covers_target() {
        let (conditions, state) = parse("T=4\nM=4\nP=1\n@ .\n. F\n");
        assert_eq!(prune(&state, &conditions), None);
        assert_eq!(
            legal_actions(&state, &conditions),
            vec![Direction::East, Direction::South]
        );
    }

    #[test]
    fn distant_pellet_is_out_of_reach() {
        let (conditions, state) = parse("T=9\nM=2\nP=9\n@ . . .\n. . . .\n. . . .\nF . . *\n");
        assert_eq!(
            prune(&state, &conditions),
            Some(Prune::PelletOutOfReach {
                distance: 6,
                fear: 2,
            })
        );
    }

    #[test]
    fn too_few_pellets_cannot_reach_target() {
        let (conditions, state) = parse("T=20\nM=2\nP=3\n@ * .\n. . .\n. . F\n");
        assert_eq!(
            prune(&state, &conditions),
            Some(Prune::InsufficientFear {
                obtainable: 4,
                required: 20,
            })
        );
    }

    #[test]
    fn reachable_pellet_keeps_branch_alive() {
        let (conditions, state) = parse("T=6\nM=2\nP=5\n@ * .\n. . .\n. . F\n");
        assert_eq!(prune(&state, &conditions), None);
        assert_eq!(
            legal_actions(&state, &conditions),
            vec![Direction::East, Direction::South]
        );
    }
}
