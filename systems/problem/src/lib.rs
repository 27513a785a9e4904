#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Search-problem formulation of the Pacman fear puzzle.
//!
//! [`PacmanProblem`] binds the parsed [`GameConditions`] and initial
//! [`WorldState`] to the transition and action systems and implements the
//! [`Problem`] contract consumed by search drivers.

use pacman_fear_core::{Direction, GameConditions, Problem};
use pacman_fear_system_actions::legal_actions;
use pacman_fear_system_transition::{apply, apply_label};
use pacman_fear_world::{DescriptionError, StateKey, WorldDescription, WorldState};

/// Built-in 10×10 world used when no description is supplied.
pub const STANDARD_WORLD: &str = "T=26
M=6
P=10
= = = = = = = = = =
= @ . * . . * . . =
= . = = = = = = . =
= . = F . . . . . =
= . = . . . . . . =
= . = . . . . . . =
= . = . . . . . . =
= * . . . . . . . =
= . . . . . . . . =
= = = = = = = = = =
";

/// The puzzle as a state-space search problem.
#[derive(Clone, Debug)]
pub struct PacmanProblem {
    conditions: GameConditions,
    initial: WorldState,
}

impl PacmanProblem {
    /// Creates a problem from already parsed conditions and initial state.
    #[must_use]
    pub fn new(conditions: GameConditions, initial: WorldState) -> Self {
        Self {
            conditions,
            initial,
        }
    }

    /// Parses a world description into a problem.
    pub fn from_description(text: &str) -> Result<Self, DescriptionError> {
        let (conditions, initial) = WorldDescription::parse(text)?.into_parts();
        Ok(Self::new(conditions, initial))
    }

    /// Problem over [`STANDARD_WORLD`].
    pub fn standard() -> Result<Self, DescriptionError> {
        Self::from_description(STANDARD_WORLD)
    }

    /// Rules of this puzzle instance.
    #[must_use]
    pub const fn conditions(&self) -> GameConditions {
        self.conditions
    }

    /// Applies the action named by `label` to a fork of `state`.
    ///
    /// Unknown labels yield an unchanged fork.
    #[must_use]
    pub fn result_label(&self, state: &WorldState, label: &str) -> WorldState {
        let mut next = state.fork();
        let _ = apply_label(&mut next, label, self.conditions.pellet_power());
        next
    }

    /// Replays `actions` from `state`, accumulating cost.
    ///
    /// Stops as soon as the goal holds, so trailing actions may go unused.
    #[must_use]
    pub fn execute(&self, state: &WorldState, actions: &[Direction]) -> Execution {
        let mut current = state.fork();
        let mut cost = 0;
        let mut applied = 0;
        let mut reached_goal = self.goal_test(&current);

        for &action in actions {
            if reached_goal {
                break;
            }
            let next = self.result(&current, action);
            cost = self.path_cost(cost, &current, action, &next);
            current = next;
            applied += 1;
            reached_goal = self.goal_test(&current);
            tracing::debug!(
                action = action.label(),
                cost,
                reached_goal,
                "replayed action"
            );
        }

        Execution {
            state: current,
            cost,
            reached_goal,
            applied,
        }
    }
}

/// Result of replaying an action sequence.
#[derive(Clone, Debug)]
pub struct Execution {
    /// State after the last applied action.
    pub state: WorldState,
    /// Accumulated path cost.
    pub cost: u32,
    /// Whether the goal held when replay stopped.
    pub reached_goal: bool,
    /// Number of actions applied before stopping.
    pub applied: usize,
}

/// Incremental path cost of the transition from `previous` to `next`.
///
/// A no-op transition costs nothing. Otherwise the seeker pays the weight its
/// ledger in `previous` records for the destination: 1 on a first visit and
/// 2, 3, 4, … on each revisit.
#[must_use]
pub fn path_cost(accumulated: u32, previous: &WorldState, next: &WorldState) -> u32 {
    if previous.matches(next) {
        return accumulated;
    }
    let destination = next.pacman().position();
    accumulated.saturating_add(previous.pacman().cost_of(destination))
}

impl Problem for PacmanProblem {
    type State = WorldState;
    type Action = Direction;
    type Key = StateKey;

    fn initial(&self) -> &WorldState {
        &self.initial
    }

    fn actions(&self, state: &WorldState) -> Vec<Direction> {
        legal_actions(state, &self.conditions)
    }

    fn result(&self, state: &WorldState, action: Direction) -> WorldState {
        let mut next = state.fork();
        let _ = apply(&mut next, action, self.conditions.pellet_power());
        next
    }

    fn path_cost(
        &self,
        accumulated: u32,
        state: &WorldState,
        _action: Direction,
        next: &WorldState,
    ) -> u32 {
        path_cost(accumulated, state, next)
    }

    fn goal_test(&self, state: &WorldState) -> bool {
        state.pacman().steps() == self.conditions.target_steps()
    }

    fn state_key(&self, state: &WorldState) -> StateKey {
        state.key()
    }

    fn is_duplicate(&self, known: &WorldState, candidate: &WorldState) -> bool {
        known.matches(candidate)
    }
}
