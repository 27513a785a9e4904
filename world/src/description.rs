//! Parser for the textual world description format.
//!
//! A description starts with three `KEY=VALUE` lines (`T`, `M` and `P` in any
//! order) followed by the grid: one line per row, one space between symbols.

use std::str::FromStr;

use pacman_fear_core::{CellKind, ConditionsError, GameConditions};
use thiserror::Error;

use crate::{Grid, WorldState};

/// Number of leading lines holding the game conditions.
const CONDITION_LINES: usize = 3;

/// Parsed world description: the puzzle rules and its initial state.
#[derive(Clone, Debug)]
pub struct WorldDescription {
    conditions: GameConditions,
    initial: WorldState,
}

impl WorldDescription {
    /// Parses a complete world description.
    pub fn parse(text: &str) -> Result<Self, DescriptionError> {
        let mut lines = text.lines();
        let condition_lines: Vec<&str> = lines.by_ref().take(CONDITION_LINES).collect();
        if condition_lines.len() < CONDITION_LINES {
            return Err(DescriptionError::MissingConditions {
                found: condition_lines.len(),
            });
        }
        let conditions = GameConditions::from_lines(condition_lines)?;

        let mut rows = Vec::new();
        for line in lines {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                continue;
            }
            let row = rows.len();
            let kinds = line
                .split(' ')
                .enumerate()
                .map(|(column, symbol)| {
                    CellKind::from_symbol(symbol).ok_or_else(|| DescriptionError::UnknownSymbol {
                        row,
                        column,
                        symbol: symbol.to_owned(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(kinds);
        }

        let grid = Grid::from_kinds(rows)?;
        let initial = WorldState::from_grid(grid, conditions.initial_fear())?;
        Ok(Self {
            conditions,
            initial,
        })
    }

    /// Rules shared by every state of the puzzle.
    #[must_use]
    pub const fn conditions(&self) -> GameConditions {
        self.conditions
    }

    /// State described by the grid, with fear set to `M`.
    #[must_use]
    pub fn initial(&self) -> &WorldState {
        &self.initial
    }

    /// Consumes the description, yielding its conditions and initial state.
    #[must_use]
    pub fn into_parts(self) -> (GameConditions, WorldState) {
        (self.conditions, self.initial)
    }
}

impl FromStr for WorldDescription {
    type Err = DescriptionError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

/// Reasons a world description may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DescriptionError {
    /// The description ended before the three condition lines.
    #[error("expected three condition lines, found {found}")]
    MissingConditions {
        /// Number of lines present.
        found: usize,
    },
    /// The condition lines could not be parsed.
    #[error(transparent)]
    Conditions(#[from] ConditionsError),
    /// A grid row contained a symbol outside the known alphabet.
    #[error("unknown symbol '{symbol}' at row {row}, column {column}")]
    UnknownSymbol {
        /// Zero-based grid row of the symbol.
        row: usize,
        /// Zero-based column of the symbol.
        column: usize,
        /// Symbol as written.
        symbol: String,
    },
    /// The description contained no grid rows.
    #[error("world grid is empty")]
    EmptyGrid,
    /// The number of rows differs from the width of the first row.
    #[error("world grid must be square: expected {expected} rows, found {found}")]
    NotSquare {
        /// Width of the first row.
        expected: usize,
        /// Number of rows present.
        found: usize,
    },
    /// A row's width differs from the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// The grid is too large to index with signed 32-bit coordinates.
    #[error("grid index {0} exceeds the coordinate range")]
    GridTooLarge(usize),
    /// The grid did not contain exactly one cell of an agent kind.
    #[error("expected exactly one '{kind}' cell, found {found}")]
    AgentCount {
        /// Agent kind that was miscounted.
        kind: CellKind,
        /// Number of cells of that kind.
        found: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pacman_fear_core::Coordinate;

    const SMALL_WORLD: &str = "T=3\nM=2\nP=4\n= = = =\n= @ * =\n= . F =\n= = = =\n";

    #[test]
    fn parses_conditions_and_grid() {
        let description = WorldDescription::parse(SMALL_WORLD).expect("world parses");
        assert_eq!(description.conditions(), GameConditions::new(3, 4, 2));

        let state = description.initial();
        assert_eq!(state.grid().dim(), 4);
        assert_eq!(state.pacman().position(), Coordinate::new(1, 1));
        assert_eq!(state.ghost().position(), Coordinate::new(2, 2));
        assert_eq!(state.ghost().fear(), 2);
        assert_eq!(state.pellets().len(), 1);
        assert!(state.pellets().contains(Coordinate::new(1, 2)));
    }

    #[test]
    fn skips_blank_lines_and_carriage_returns() {
        let text = "M=1\r\nT=1\r\nP=1\r\n\r\n@ .\r\n. F\r\n\r\n";
        let description: WorldDescription = text.parse().expect("world parses");
        assert_eq!(description.initial().grid().dim(), 2);
    }

    #[test]
    fn rejects_unknown_symbols() {
        let text = "T=1\nM=1\nP=1\n@ #\n. F\n";
        assert_eq!(
            WorldDescription::parse(text).map(|_| ()),
            Err(DescriptionError::UnknownSymbol {
                row: 0,
                column: 1,
                symbol: "#".to_owned(),
            })
        );
    }

    #[test]
    fn rejects_missing_agents() {
        let text = "T=1\nM=1\nP=1\n@ .\n. .\n";
        assert_eq!(
            WorldDescription::parse(text).map(|_| ()),
            Err(DescriptionError::AgentCount {
                kind: CellKind::Ghost,
                found: 0,
            })
        );
    }

    #[test]
    fn rejects_duplicate_pacman() {
        let text = "T=1\nM=1\nP=1\n@ @\n. F\n";
        assert_eq!(
            WorldDescription::parse(text).map(|_| ()),
            Err(DescriptionError::AgentCount {
                kind: CellKind::Pacman,
                found: 2,
            })
        );
    }

    #[test]
    fn rejects_non_square_grids() {
        let text = "T=1\nM=1\nP=1\n@ . .\n. F .\n";
        assert_eq!(
            WorldDescription::parse(text).map(|_| ()),
            Err(DescriptionError::NotSquare {
                expected: 3,
                found: 2,
            })
        );
    }

    #[test]
    fn rejects_truncated_conditions() {
        assert_eq!(
            WorldDescription::parse("T=1\nM=1").map(|_| ()),
            Err(DescriptionError::MissingConditions { found: 2 })
        );
    }

    #[test]
    fn surfaces_condition_errors() {
        let text = "T=x\nM=1\nP=1\n@ F\n. .\n";
        assert!(matches!(
            WorldDescription::parse(text),
            Err(DescriptionError::Conditions(ConditionsError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn trailing_space_yields_blank_cell() {
        let text = "T=1\nM=1\nP=1\n@ F \n. . .\n. . .\n";
        let description = WorldDescription::parse(text).expect("world parses");
        let cell = description
            .initial()
            .grid()
            .get(Coordinate::new(0, 2))
            .expect("in bounds");
        assert_eq!(cell.kind(), CellKind::Blank);
    }
}
