use std::fmt::Write as _;

use pacman_fear_core::Direction;
use pacman_fear_system_problem::Execution;
use pacman_fear_system_search::{SearchOutcome, Termination};
use pacman_fear_world::WorldState;
use serde::Serialize;

/// Summary printed once the command finishes.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub(crate) enum Report {
    /// Outcome of a depth-first graph search.
    Search {
        /// Why the search stopped.
        termination: &'static str,
        /// Action labels of the solution, when one was found.
        actions: Option<Vec<&'static str>>,
        /// Path cost of the solution, when one was found.
        path_cost: Option<u32>,
        /// Nodes expanded during the search.
        expanded: usize,
        /// Final grid, when requested.
        #[serde(skip_serializing_if = "Option::is_none")]
        grid: Option<String>,
    },
    /// Outcome of replaying an explicit action sequence.
    Replay {
        /// Action labels that were applied.
        actions: Vec<&'static str>,
        /// Accumulated path cost.
        cost: u32,
        /// Whether the goal held when replay stopped.
        reached_goal: bool,
        /// Final grid, when requested.
        #[serde(skip_serializing_if = "Option::is_none")]
        grid: Option<String>,
    },
}

impl Report {
    pub(crate) fn from_search(
        outcome: &SearchOutcome<WorldState, Direction>,
        show_grid: bool,
    ) -> Self {
        let termination = match outcome.termination {
            Termination::Goal => "goal",
            Termination::Exhausted => "exhausted",
            Termination::LimitReached => "limit_reached",
        };
        let solution = outcome.solution.as_ref();
        Self::Search {
            termination,
            actions: solution.map(|solution| labels(&solution.actions)),
            path_cost: solution.map(|solution| solution.path_cost),
            expanded: outcome.expanded,
            grid: solution
                .filter(|_| show_grid)
                .map(|solution| solution.state.grid().to_string()),
        }
    }

    pub(crate) fn from_replay(
        execution: &Execution,
        requested: &[Direction],
        show_grid: bool,
    ) -> Self {
        Self::Replay {
            actions: labels(&requested[..execution.applied]),
            cost: execution.cost,
            reached_goal: execution.reached_goal,
            grid: show_grid.then(|| execution.state.grid().to_string()),
        }
    }

    pub(crate) fn to_text(&self) -> String {
        let mut out = String::new();
        match self {
            Self::Search {
                termination,
                actions,
                path_cost,
                expanded,
                grid,
            } => {
                match (actions, path_cost) {
                    (Some(actions), Some(cost)) => {
                        let _ = writeln!(
                            out,
                            "Solution (graph) with cost {cost}: [{}]",
                            actions.join(", ")
                        );
                    }
                    _ => {
                        let _ = writeln!(out, "No solution ({termination})");
                    }
                }
                let _ = writeln!(out, "Expanded = {expanded}");
                if let Some(grid) = grid {
                    out.push_str(grid);
                }
            }
            Self::Replay {
                actions,
                cost,
                reached_goal,
                grid,
            } => {
                let _ = writeln!(out, "Applied: [{}]", actions.join(", "));
                let _ = writeln!(out, "Total cost: {cost}");
                let _ = writeln!(out, "Goal reached? {reached_goal}");
                if let Some(grid) = grid {
                    out.push_str(grid);
                }
            }
        }
        out
    }
}

fn labels(actions: &[Direction]) -> Vec<&'static str> {
    actions.iter().map(|action| action.label()).collect()
}
