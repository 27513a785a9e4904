#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Depth-first graph search over any [`Problem`].
//!
//! Nodes live in an arena and refer to their parent by index. The frontier is
//! a LIFO stack, goals are tested when a node is popped, and a child is only
//! pushed when neither an explored state nor a state waiting on the frontier
//! is a duplicate of it.

use std::collections::HashMap;

use pacman_fear_core::Problem;

/// Bounds applied to a single search run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of node expansions before giving up.
    pub max_expansions: Option<usize>,
}

impl SearchLimits {
    /// Limits that let the search run until the goal or exhaustion.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_expansions: None,
        }
    }

    /// Limits that stop after `max_expansions` expansions.
    #[must_use]
    pub const fn with_max_expansions(max_expansions: usize) -> Self {
        Self {
            max_expansions: Some(max_expansions),
        }
    }
}

/// Why a search run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// A node satisfying the goal predicate was popped.
    Goal,
    /// The frontier emptied without reaching the goal.
    Exhausted,
    /// The expansion budget ran out.
    LimitReached,
}

/// Path from the initial state to a goal state.
#[derive(Clone, Debug)]
pub struct Solution<S, A> {
    /// Actions in the order they are applied.
    pub actions: Vec<A>,
    /// Accumulated path cost of the goal node.
    pub path_cost: u32,
    /// Goal state reached by the actions.
    pub state: S,
}

impl<S, A> Solution<S, A> {
    /// Number of actions in the solution.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.actions.len()
    }
}

/// Result of a search run.
#[derive(Clone, Debug)]
pub struct SearchOutcome<S, A> {
    /// Why the search stopped.
    pub termination: Termination,
    /// Solution, present only when `termination` is [`Termination::Goal`].
    pub solution: Option<Solution<S, A>>,
    /// Number of nodes whose children were generated.
    pub expanded: usize,
}

#[derive(Debug)]
struct Node<S, A> {
    state: S,
    parent: Option<usize>,
    action: Option<A>,
    path_cost: u32,
}

/// Node ids grouped by state key so duplicate checks stay local.
#[derive(Debug)]
struct StateIndex<K> {
    buckets: HashMap<K, Vec<usize>>,
}

impl<K: std::hash::Hash + Eq> StateIndex<K> {
    fn new() -> Self {
        Self {
            buckets: HashMap::new(),
        }
    }

    fn insert(&mut self, key: K, id: usize) {
        self.buckets.entry(key).or_default().push(id);
    }

    fn remove(&mut self, key: &K, id: usize) {
        if let Some(ids) = self.buckets.get_mut(key) {
            ids.retain(|candidate| *candidate != id);
            if ids.is_empty() {
                let _ = self.buckets.remove(key);
            }
        }
    }

    fn bucket(&self, key: &K) -> &[usize] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Runs depth-first graph search from the problem's initial state.
pub fn depth_first_graph_search<P>(
    problem: &P,
    limits: SearchLimits,
) -> SearchOutcome<P::State, P::Action>
where
    P: Problem,
{
    let mut nodes: Vec<Node<P::State, P::Action>> = vec![Node {
        state: problem.initial().clone(),
        parent: None,
        action: None,
        path_cost: 0,
    }];
    let mut frontier: Vec<usize> = vec![0];
    let mut on_frontier = StateIndex::new();
    let mut explored = StateIndex::new();
    on_frontier.insert(problem.state_key(&nodes[0].state), 0);
    let mut expanded = 0;

    while let Some(id) = frontier.pop() {
        let key = problem.state_key(&nodes[id].state);
        on_frontier.remove(&key, id);

        if problem.goal_test(&nodes[id].state) {
            let solution = solution_from(&nodes, id);
            tracing::info!(
                expanded,
                path_cost = solution.path_cost,
                depth = solution.depth(),
                "search reached goal"
            );
            return SearchOutcome {
                termination: Termination::Goal,
                solution: Some(solution),
                expanded,
            };
        }

        if limits
            .max_expansions
            .is_some_and(|max_expansions| expanded >= max_expansions)
        {
            tracing::info!(expanded, "search expansion limit reached");
            return SearchOutcome {
                termination: Termination::LimitReached,
                solution: None,
                expanded,
            };
        }

        explored.insert(key, id);
        expanded += 1;

        let actions = problem.actions(&nodes[id].state);
        tracing::trace!(node = id, actions = actions.len(), "expanding node");
        for action in actions {
            let parent = &nodes[id];
            let child_state = problem.result(&parent.state, action);
            let child_key = problem.state_key(&child_state);
            let seen = |index: &StateIndex<P::Key>| {
                index
                    .bucket(&child_key)
                    .iter()
                    .any(|&known| problem.is_duplicate(&nodes[known].state, &child_state))
            };
            if seen(&explored) || seen(&on_frontier) {
                continue;
            }

            let path_cost =
                problem.path_cost(parent.path_cost, &parent.state, action, &child_state);
            let child_id = nodes.len();
            nodes.push(Node {
                state: child_state,
                parent: Some(id),
                action: Some(action),
                path_cost,
            });
            on_frontier.insert(child_key, child_id);
            frontier.push(child_id);
        }
    }

    tracing::info!(expanded, "search exhausted the frontier");
    SearchOutcome {
        termination: Termination::Exhausted,
        solution: None,
        expanded,
    }
}

fn solution_from<S: Clone, A: Copy>(nodes: &[Node<S, A>], goal: usize) -> Solution<S, A> {
    let mut actions = Vec::new();
    let mut cursor = Some(goal);
    while let Some(id) = cursor {
        let node = &nodes[id];
        if let Some(action) = node.action {
            actions.push(action);
        }
        cursor = node.parent;
    }
    actions.reverse();

    Solution {
        actions,
        path_cost: nodes[goal].path_cost,
        state: nodes[goal].state.clone(),
    }
}
