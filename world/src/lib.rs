#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Pacman fear puzzle.
//!
//! A [`WorldState`] owns every piece of mutable state a search branch needs:
//! the [`Grid`], the seeker ([`Pacman`]) with its visit ledger, the stationary
//! pursuer ([`Ghost`]) with its fear countdown, and the remaining [`Pellets`].
//! Branches never share storage; [`WorldState::fork`] deep-copies all of it.

mod description;
mod grid;

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use pacman_fear_core::{Cell, CellKind, Coordinate};

pub use description::{DescriptionError, WorldDescription};
pub use grid::Grid;

/// Visit weight seeded for the starting cell and given to a cell on its first revisit.
const FIRST_REVISIT_WEIGHT: u32 = 2;
/// Cost of entering a cell absent from the visit ledger.
const UNVISITED_COST: u32 = 1;

/// The seeker: position, step counter and per-cell visit ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pacman {
    position: Coordinate,
    steps: u32,
    visited: BTreeMap<Coordinate, u32>,
}

impl Pacman {
    /// Creates a seeker at `position` with no steps taken.
    ///
    /// The starting cell is seeded into the ledger with weight 2.
    #[must_use]
    pub fn new(position: Coordinate) -> Self {
        let mut visited = BTreeMap::new();
        let _ = visited.insert(position, FIRST_REVISIT_WEIGHT);
        Self {
            position,
            steps: 0,
            visited,
        }
    }

    /// Cell the seeker currently occupies.
    #[must_use]
    pub const fn position(&self) -> Coordinate {
        self.position
    }

    /// Number of moves taken so far.
    #[must_use]
    pub const fn steps(&self) -> u32 {
        self.steps
    }

    /// Grid cell representing the seeker.
    #[must_use]
    pub const fn cell(&self) -> Cell {
        Cell::new(CellKind::Pacman, self.position)
    }

    /// Cost of entering `position` given the current ledger.
    ///
    /// Unvisited cells cost 1; visited cells cost their stored weight.
    #[must_use]
    pub fn cost_of(&self, position: Coordinate) -> u32 {
        self.visited
            .get(&position)
            .copied()
            .unwrap_or(UNVISITED_COST)
    }

    /// Number recorded in the ledger for `position`, if any.
    #[must_use]
    pub fn visit_weight(&self, position: Coordinate) -> Option<u32> {
        self.visited.get(&position).copied()
    }

    /// Ledger entries in coordinate order.
    pub fn visits(&self) -> impl Iterator<Item = (Coordinate, u32)> + '_ {
        self.visited.iter().map(|(position, weight)| (*position, *weight))
    }

    /// Bumps the ledger weight for `position`; an absent entry becomes 2.
    pub fn mark_visited(&mut self, position: Coordinate) {
        let weight = self
            .visited
            .entry(position)
            .or_insert(FIRST_REVISIT_WEIGHT - 1);
        *weight += 1;
    }

    /// Records one more move.
    pub fn increase_steps(&mut self) {
        self.steps += 1;
    }
}

/// The stationary pursuer and its fear countdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ghost {
    position: Coordinate,
    fear: i32,
}

impl Ghost {
    /// Creates a pursuer at `position` with the provided fear.
    #[must_use]
    pub const fn new(position: Coordinate, fear: i32) -> Self {
        Self { position, fear }
    }

    /// Cell the pursuer occupies. It never moves.
    #[must_use]
    pub const fn position(&self) -> Coordinate {
        self.position
    }

    /// Remaining fear.
    #[must_use]
    pub const fn fear(&self) -> i32 {
        self.fear
    }

    /// Replaces the remaining fear.
    pub fn set_fear(&mut self, fear: i32) {
        self.fear = fear;
    }

    /// Counts fear down by one, holding at `i32::MIN`.
    pub fn decrease_fear(&mut self) {
        self.fear = self.fear.saturating_sub(1);
    }
}

/// Positions of the pellets still on the grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pellets {
    positions: BTreeSet<Coordinate>,
}

impl Pellets {
    /// Collects every pellet cell of `grid`.
    #[must_use]
    pub fn find_all(grid: &Grid) -> Self {
        Self {
            positions: grid
                .cells()
                .filter(|cell| cell.kind() == CellKind::Pellet)
                .map(Cell::position)
                .collect(),
        }
    }

    /// Number of pellets remaining.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Reports whether every pellet has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Reports whether a pellet remains at `position`.
    #[must_use]
    pub fn contains(&self, position: Coordinate) -> bool {
        self.positions.contains(&position)
    }

    /// Reports whether every pellet in `other` is also present here.
    #[must_use]
    pub fn contains_all(&self, other: &Pellets) -> bool {
        other.positions.is_subset(&self.positions)
    }

    /// Iterates over pellet positions in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.positions.iter().copied()
    }

    fn remove(&mut self, position: Coordinate) -> bool {
        self.positions.remove(&position)
    }
}

/// Exact-match projection of a [`WorldState`] used to bucket states.
///
/// States that [`WorldState::matches`] considers equal always share a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateKey {
    position: Coordinate,
    steps: u32,
    fear: i32,
}

/// Snapshot of the puzzle at one search node.
///
/// The seeker's and pursuer's recorded positions always match the cell kinds
/// stored in the grid at those positions.
#[derive(Clone, Debug)]
pub struct WorldState {
    pacman: Pacman,
    ghost: Ghost,
    pellets: Pellets,
    grid: Grid,
}

impl WorldState {
    /// Builds a state from a grid holding exactly one pacman and one ghost.
    pub fn from_grid(grid: Grid, initial_fear: i32) -> Result<Self, DescriptionError> {
        let pacman = single_cell(&grid, CellKind::Pacman)?;
        let ghost = single_cell(&grid, CellKind::Ghost)?;
        Ok(Self {
            pacman: Pacman::new(pacman),
            ghost: Ghost::new(ghost, initial_fear),
            pellets: Pellets::find_all(&grid),
            grid,
        })
    }

    /// Independent deep copy of the state for exploring a new branch.
    #[must_use]
    pub fn fork(&self) -> Self {
        self.clone()
    }

    /// The seeker.
    #[must_use]
    pub fn pacman(&self) -> &Pacman {
        &self.pacman
    }

    /// Mutable access to the seeker's counters and ledger.
    ///
    /// The seeker's position only changes through [`WorldState::relocate_pacman`].
    pub fn pacman_mut(&mut self) -> &mut Pacman {
        &mut self.pacman
    }

    /// The pursuer.
    #[must_use]
    pub fn ghost(&self) -> &Ghost {
        &self.ghost
    }

    /// Mutable access to the pursuer's fear.
    pub fn ghost_mut(&mut self) -> &mut Ghost {
        &mut self.ghost
    }

    /// Pellets still on the grid.
    #[must_use]
    pub fn pellets(&self) -> &Pellets {
        &self.pellets
    }

    /// The grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Removes the pellet at `position` from the pellet set.
    ///
    /// The grid cell is left for the seeker to overwrite when it moves in.
    pub fn consume_pellet(&mut self, position: Coordinate) -> bool {
        self.pellets.remove(position)
    }

    /// Moves the seeker to `target`, leaving empty floor behind.
    ///
    /// Returns `false` without changing anything when `target` is off the grid.
    pub fn relocate_pacman(&mut self, target: Coordinate) -> bool {
        if !self.grid.contains(target) {
            return false;
        }
        let from = self.pacman.position;
        let _ = self.grid.set_empty(from);
        self.pacman.position = target;
        self.grid.put(self.pacman.cell(), target)
    }

    /// Bucketing key over the fields [`WorldState::matches`] compares exactly.
    #[must_use]
    pub fn key(&self) -> StateKey {
        StateKey {
            position: self.pacman.position,
            steps: self.pacman.steps,
            fear: self.ghost.fear,
        }
    }

    /// Duplicate test used for cycle detection.
    ///
    /// Seekers (position, steps and ledger) and pursuers (position and fear)
    /// must be equal, and every pellet remaining in `other` must also remain
    /// in `self`. The pellet check is containment, not set equality, so the
    /// relation is not symmetric.
    #[must_use]
    pub fn matches(&self, other: &WorldState) -> bool {
        self.pacman == other.pacman
            && self.ghost == other.ghost
            && self.pellets.contains_all(&other.pellets)
    }
}

impl fmt::Display for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fear_total = i64::from(self.pacman.steps) + i64::from(self.ghost.fear);
        writeln!(f, "Fear - {fear_total}")?;
        write!(
            f,
            "Pacman - {} - steps = {} - visited = {{",
            self.pacman.position, self.pacman.steps
        )?;
        for (index, (position, weight)) in self.pacman.visits().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{position}: {weight}")?;
        }
        writeln!(f, "}}")?;
        writeln!(
            f,
            "Ghost - {} - current fear {}",
            self.ghost.position, self.ghost.fear
        )?;
        let pellets: Vec<String> = self.pellets.iter().map(|p| p.to_string()).collect();
        writeln!(f, "Pellets - [{}]", pellets.join(", "))?;
        write!(f, "{}", self.grid)
    }
}

fn single_cell(grid: &Grid, kind: CellKind) -> Result<Coordinate, DescriptionError> {
    let mut matches = grid.cells().filter(|cell| cell.kind() == kind);
    let first = matches.next();
    let extra = matches.count();
    match (first, extra) {
        (Some(cell), 0) => Ok(cell.position()),
        (first, extra) => Err(DescriptionError::AgentCount {
            kind,
            found: usize::from(first.is_some()) + extra,
        }),
    }
}
