#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic transition function that moves the seeker one cell.

use pacman_fear_core::{CellKind, Coordinate, Direction};
use pacman_fear_world::WorldState;

/// Outcome of applying a single action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The destination was off the grid, a wall or the ghost; nothing changed.
    Blocked,
    /// The seeker moved onto a non-pellet cell.
    Moved {
        /// Cell the seeker left.
        from: Coordinate,
        /// Cell the seeker now occupies.
        to: Coordinate,
    },
    /// The seeker moved onto a pellet and reset the ghost's fear.
    Consumed {
        /// Cell the seeker left.
        from: Coordinate,
        /// Cell the seeker now occupies, formerly holding the pellet.
        to: Coordinate,
    },
}

impl Transition {
    /// Reports whether the state was left untouched.
    #[must_use]
    pub const fn is_blocked(self) -> bool {
        matches!(self, Self::Blocked)
    }
}

/// Applies `action` to `state` in place.
///
/// Moving into a wall, the ghost or off the grid is a no-op that leaves every
/// counter untouched. Any other move counts the ghost's fear down, records the
/// destination in the seeker's ledger, takes a step, and relocates the seeker.
/// Landing on a pellet consumes it and resets fear to `pellet_power`.
pub fn apply(state: &mut WorldState, action: Direction, pellet_power: i32) -> Transition {
    let from = state.pacman().position();
    let target = from + action.delta();

    let Some(target_cell) = state.grid().get(target) else {
        tracing::trace!(%from, %target, "move leaves the grid");
        return Transition::Blocked;
    };
    if !target_cell.is_enterable() {
        tracing::trace!(%from, %target, kind = ?target_cell.kind(), "move blocked");
        return Transition::Blocked;
    }

    state.ghost_mut().decrease_fear();
    state.pacman_mut().mark_visited(target);
    state.pacman_mut().increase_steps();

    let consumed = target_cell.kind() == CellKind::Pellet;
    if consumed {
        let _ = state.consume_pellet(target_cell.position());
        state.ghost_mut().set_fear(pellet_power);
    }

    let _ = state.relocate_pacman(target);
    tracing::trace!(
        %from,
        %target,
        consumed,
        steps = state.pacman().steps(),
        fear = state.ghost().fear(),
        "seeker moved"
    );

    if consumed {
        Transition::Consumed { from, to: target }
    } else {
        Transition::Moved { from, to: target }
    }
}

/// Applies the action named by `label`, treating unknown labels as blocked moves.
pub fn apply_label(state: &mut WorldState, label: &str, pellet_power: i32) -> Transition {
    match Direction::from_label(label) {
        Some(direction) => apply(state, direction, pellet_power),
        None => {
            tracing::trace!(label, "unknown action label");
            Transition::Blocked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pacman_fear_world::WorldDescription;

    fn state(text: &str) -> WorldState {
        WorldDescription::parse(text)
            .expect("world parses")
            .into_parts()
            .1
    }

    #[test]
    fn unknown_label_is_blocked() {
        let mut world = state("T=1\nM=1\nP=1\n@ .\n. F\n");
        assert_eq!(apply_label(&mut world, "Q", 1), Transition::Blocked);
        assert_eq!(world.pacman().steps(), 0);
    }

    #[test]
    fn label_resolves_to_direction() {
        let mut world = state("T=1\nM=1\nP=1\n@ .\n. F\n");
        assert_eq!(
            apply_label(&mut world, "E", 1),
            Transition::Moved {
                from: Coordinate::new(0, 0),
                to: Coordinate::new(0, 1),
            }
        );
    }

    #[test]
    fn blank_cells_are_enterable() {
        let mut world = state("T=1\nM=1\nP=1\n@  F\n. . .\n. . .\n");
        let outcome = apply(&mut world, Direction::East, 1);
        assert!(!outcome.is_blocked());
        assert_eq!(world.pacman().position(), Coordinate::new(0, 1));
    }
}
