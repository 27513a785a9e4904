#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Pacman fear puzzle.
//!
//! This crate defines the value types every other crate speaks in: grid
//! [`Coordinate`]s, the closed [`CellKind`] enumeration, the four cardinal
//! [`Direction`]s and the immutable [`GameConditions`] parsed from a world
//! description. It also defines the [`Problem`] contract that a generic search
//! driver consumes; the world and systems crates implement it for the puzzle.

use std::{fmt, hash::Hash, ops::Add};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Location of a single grid cell.
///
/// `x` indexes rows and `y` indexes columns, so north is `(-1, 0)` and east is
/// `(0, 1)`. Components are signed because a move off the edge of the grid
/// produces negative coordinates that the grid then rejects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    x: i32,
    y: i32,
}

impl Coordinate {
    /// Creates a new coordinate from a row (`x`) and column (`y`) index.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Row component of the coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Column component of the coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Computes the Manhattan distance between two coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: Coordinate) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl Add for Coordinate {
    type Output = Coordinate;

    fn add(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Closed set of contents a grid cell may hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Impassable wall, written as `=`.
    Wall,
    /// The seeker, written as `@`.
    Pacman,
    /// The stationary pursuer, written as `F`.
    Ghost,
    /// Consumable power pellet, written as `*`.
    Pellet,
    /// Open floor, written as `.`.
    Empty,
    /// Cell produced by an empty token in the description.
    Blank,
}

impl CellKind {
    /// Every kind in declaration order.
    pub const ALL: [CellKind; 6] = [
        CellKind::Wall,
        CellKind::Pacman,
        CellKind::Ghost,
        CellKind::Pellet,
        CellKind::Empty,
        CellKind::Blank,
    ];

    /// Symbol used for the kind in serialised world descriptions.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Wall => "=",
            Self::Pacman => "@",
            Self::Ghost => "F",
            Self::Pellet => "*",
            Self::Empty => ".",
            Self::Blank => "",
        }
    }

    /// Resolves a description symbol into its kind, if recognised.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.symbol() == symbol)
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Grid cell pairing its contents with the position it occupies.
///
/// Two cells are equal when both the kind and the position match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    kind: CellKind,
    position: Coordinate,
}

impl Cell {
    /// Creates a cell of the provided kind located at `position`.
    #[must_use]
    pub const fn new(kind: CellKind, position: Coordinate) -> Self {
        Self { kind, position }
    }

    /// Creates an empty floor cell located at `position`.
    #[must_use]
    pub const fn empty(position: Coordinate) -> Self {
        Self::new(CellKind::Empty, position)
    }

    /// Contents of the cell.
    #[must_use]
    pub const fn kind(&self) -> CellKind {
        self.kind
    }

    /// Position recorded by the cell.
    #[must_use]
    pub const fn position(&self) -> Coordinate {
        self.position
    }

    /// Reports whether the seeker may step onto the cell.
    ///
    /// Walls and the pursuer block movement; pellets, floor and blank cells do not.
    #[must_use]
    pub const fn is_enterable(&self) -> bool {
        !matches!(self.kind, CellKind::Wall | CellKind::Ghost)
    }
}

/// Cardinal movement directions available to the seeker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
    /// Movement toward increasing column indices.
    East,
}

impl Direction {
    /// Canonical enumeration order used when generating candidate moves.
    pub const CANONICAL: [Direction; 4] = [
        Direction::North,
        Direction::West,
        Direction::East,
        Direction::South,
    ];

    /// Unit delta applied to a coordinate when moving in this direction.
    #[must_use]
    pub const fn delta(self) -> Coordinate {
        match self {
            Self::North => Coordinate::new(-1, 0),
            Self::South => Coordinate::new(1, 0),
            Self::West => Coordinate::new(0, -1),
            Self::East => Coordinate::new(0, 1),
        }
    }

    /// Single-letter label of the direction.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::North => "N",
            Self::South => "S",
            Self::West => "W",
            Self::East => "E",
        }
    }

    /// Resolves a single-letter label, returning `None` when unrecognised.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::CANONICAL
            .into_iter()
            .find(|direction| direction.label() == label)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable rules of a single puzzle instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameConditions {
    target_steps: u32,
    pellet_power: i32,
    initial_fear: i32,
}

impl GameConditions {
    /// Creates conditions from the target step count `T`, the fear granted per
    /// pellet `P` and the initial fear `M`.
    #[must_use]
    pub const fn new(target_steps: u32, pellet_power: i32, initial_fear: i32) -> Self {
        Self {
            target_steps,
            pellet_power,
            initial_fear,
        }
    }

    /// Step count the seeker must reach exactly (`T`).
    #[must_use]
    pub const fn target_steps(&self) -> u32 {
        self.target_steps
    }

    /// Fear the pursuer is reset to whenever a pellet is consumed (`P`).
    #[must_use]
    pub const fn pellet_power(&self) -> i32 {
        self.pellet_power
    }

    /// Fear the pursuer starts with (`M`).
    #[must_use]
    pub const fn initial_fear(&self) -> i32 {
        self.initial_fear
    }

    /// Parses the `T=`, `M=` and `P=` lines of a world description.
    ///
    /// Keys may appear in any order. Each key must appear exactly once.
    pub fn from_lines<'a, I>(lines: I) -> Result<Self, ConditionsError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut target_steps: Option<i64> = None;
        let mut pellet_power: Option<i64> = None;
        let mut initial_fear: Option<i64> = None;

        for line in lines {
            let line = line.trim();
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| ConditionsError::Malformed(line.to_owned()))?;
            let key = key.trim();
            let value = value.trim();
            let slot = match key {
                "T" => &mut target_steps,
                "P" => &mut pellet_power,
                "M" => &mut initial_fear,
                _ => return Err(ConditionsError::UnknownKey(key.to_owned())),
            };
            if slot.is_some() {
                return Err(ConditionsError::DuplicateKey(key.to_owned()));
            }
            let parsed = value
                .parse::<i64>()
                .map_err(|_| ConditionsError::InvalidValue {
                    key: key.to_owned(),
                    value: value.to_owned(),
                })?;
            *slot = Some(parsed);
        }

        let target_steps = target_steps.ok_or(ConditionsError::MissingKey('T'))?;
        let pellet_power = pellet_power.ok_or(ConditionsError::MissingKey('P'))?;
        let initial_fear = initial_fear.ok_or(ConditionsError::MissingKey('M'))?;

        Ok(Self::new(
            narrow::<u32>('T', target_steps)?,
            narrow::<i32>('P', pellet_power)?,
            narrow::<i32>('M', initial_fear)?,
        ))
    }
}

impl fmt::Display for GameConditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "T={}\nM={}\nP={}",
            self.target_steps, self.initial_fear, self.pellet_power
        )
    }
}

fn narrow<T: TryFrom<i64>>(key: char, value: i64) -> Result<T, ConditionsError> {
    T::try_from(value).map_err(|_| ConditionsError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Reasons the condition lines of a world description may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConditionsError {
    /// A line did not have the `key=value` shape.
    #[error("condition line '{0}' is not of the form KEY=VALUE")]
    Malformed(String),
    /// A key other than `T`, `M` or `P` was supplied.
    #[error("unknown condition key '{0}'")]
    UnknownKey(String),
    /// The same key was supplied more than once.
    #[error("condition key '{0}' appears more than once")]
    DuplicateKey(String),
    /// A value was not an integer in the accepted range.
    #[error("condition {key} has invalid value '{value}'")]
    InvalidValue {
        /// Key whose value was rejected.
        key: String,
        /// Raw value as it appeared in the description.
        value: String,
    },
    /// One of the three required keys was absent.
    #[error("condition {0} is missing")]
    MissingKey(char),
}

/// Contract a state-space search driver needs from a problem formulation.
///
/// The driver owns the frontier and explored bookkeeping; the problem owns
/// the semantics. `result` must never mutate its input: implementations fork
/// the state before applying an action so sibling branches stay independent.
pub trait Problem {
    /// Snapshot of the world at a search node.
    type State: Clone;
    /// Symbolic action that moves between states.
    type Action: Copy + fmt::Debug;
    /// Hashable projection used to bucket states before duplicate checks.
    ///
    /// Two states that [`Problem::is_duplicate`] treats as the same must
    /// produce equal keys.
    type Key: Hash + Eq;

    /// State the search starts from.
    fn initial(&self) -> &Self::State;

    /// Actions worth trying from `state`, in the order they should be expanded.
    fn actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// State reached by applying `action` to an independent copy of `state`.
    fn result(&self, state: &Self::State, action: Self::Action) -> Self::State;

    /// Accumulated cost after moving from `state` to `next` via `action`.
    fn path_cost(
        &self,
        accumulated: u32,
        state: &Self::State,
        action: Self::Action,
        next: &Self::State,
    ) -> u32;

    /// Reports whether `state` satisfies the goal predicate.
    fn goal_test(&self, state: &Self::State) -> bool;

    /// Bucketing key for duplicate detection.
    fn state_key(&self, state: &Self::State) -> Self::Key;

    /// Reports whether `candidate` should be treated as already seen given the
    /// previously recorded `known` state.
    fn is_duplicate(&self, known: &Self::State, candidate: &Self::State) -> bool;
}

#[cfg(test)]
mod tests {
    use super::{CellKind, ConditionsError, Coordinate, Direction, GameConditions};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = Coordinate::new(1, 1);
        let destination = Coordinate::new(4, -1);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn coordinates_add_component_wise() {
        let position = Coordinate::new(2, 3);
        assert_eq!(position + Direction::North.delta(), Coordinate::new(1, 3));
        assert_eq!(position + Direction::West.delta(), Coordinate::new(2, 2));
    }

    #[test]
    fn direction_labels_are_exact_inverses() {
        for direction in Direction::CANONICAL {
            assert_eq!(Direction::from_label(direction.label()), Some(direction));
        }
        assert_eq!(Direction::from_label("X"), None);
        assert_eq!(Direction::from_label("n"), None);
    }

    #[test]
    fn canonical_order_is_north_west_east_south() {
        let labels: Vec<_> = Direction::CANONICAL.iter().map(|d| d.label()).collect();
        assert_eq!(labels, ["N", "W", "E", "S"]);
    }

    #[test]
    fn symbols_resolve_to_kinds() {
        assert_eq!(CellKind::from_symbol("="), Some(CellKind::Wall));
        assert_eq!(CellKind::from_symbol("@"), Some(CellKind::Pacman));
        assert_eq!(CellKind::from_symbol("F"), Some(CellKind::Ghost));
        assert_eq!(CellKind::from_symbol("*"), Some(CellKind::Pellet));
        assert_eq!(CellKind::from_symbol("."), Some(CellKind::Empty));
        assert_eq!(CellKind::from_symbol(""), Some(CellKind::Blank));
        assert_eq!(CellKind::from_symbol("#"), None);
    }

    #[test]
    fn conditions_parse_in_any_order() {
        let conditions =
            GameConditions::from_lines(["P=10", "T=26", " M = 6 "]).expect("conditions parse");
        assert_eq!(conditions, GameConditions::new(26, 10, 6));
        assert_eq!(conditions.to_string(), "T=26\nM=6\nP=10");
    }

    #[test]
    fn conditions_reject_missing_unknown_and_duplicate_keys() {
        assert_eq!(
            GameConditions::from_lines(["T=1", "M=1"]),
            Err(ConditionsError::MissingKey('P'))
        );
        assert_eq!(
            GameConditions::from_lines(["T=1", "M=1", "Q=1"]),
            Err(ConditionsError::UnknownKey("Q".to_owned()))
        );
        assert_eq!(
            GameConditions::from_lines(["T=1", "T=2", "P=1"]),
            Err(ConditionsError::DuplicateKey("T".to_owned()))
        );
        assert_eq!(
            GameConditions::from_lines(["T=1", "M", "P=1"]),
            Err(ConditionsError::Malformed("M".to_owned()))
        );
    }

    #[test]
    fn negative_target_is_rejected() {
        assert_eq!(
            GameConditions::from_lines(["T=-1", "M=1", "P=1"]),
            Err(ConditionsError::InvalidValue {
                key: "T".to_owned(),
                value: "-1".to_owned(),
            })
        );
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn conditions_round_trip_through_bincode() {
        assert_round_trip(&GameConditions::new(26, 10, 6));
        assert_round_trip(&Coordinate::new(-1, 7));
    }
}
