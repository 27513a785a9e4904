//! Square cell grid backing every world state.

use std::fmt;

use pacman_fear_core::{Cell, CellKind, Coordinate};

use crate::DescriptionError;

/// Square `dim × dim` array of cells stored row by row.
///
/// Each slot holds a [`Cell`] whose recorded position normally matches the
/// slot it occupies; [`Grid::put`] does not correct a mismatched position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    dim: usize,
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    /// Builds a grid from rows of cell kinds, assigning each cell its position.
    ///
    /// The grid dimension is the length of the first row; every row must share
    /// it and there must be exactly that many rows.
    pub fn from_kinds(rows: Vec<Vec<CellKind>>) -> Result<Self, DescriptionError> {
        let dim = rows.first().map_or(0, Vec::len);
        if dim == 0 {
            return Err(DescriptionError::EmptyGrid);
        }
        if rows.len() != dim {
            return Err(DescriptionError::NotSquare {
                expected: dim,
                found: rows.len(),
            });
        }

        let mut cells = Vec::with_capacity(dim);
        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() != dim {
                return Err(DescriptionError::RaggedRow {
                    row: row_index,
                    expected: dim,
                    found: row.len(),
                });
            }
            let x = coordinate_component(row_index)?;
            let mut line = Vec::with_capacity(dim);
            for (column_index, kind) in row.into_iter().enumerate() {
                let y = coordinate_component(column_index)?;
                line.push(Cell::new(kind, Coordinate::new(x, y)));
            }
            cells.push(line);
        }

        Ok(Self { dim, rows: cells })
    }

    /// Number of rows, and of columns, in the grid.
    #[must_use]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// Reports whether `position` lies inside the grid.
    #[must_use]
    pub fn contains(&self, position: Coordinate) -> bool {
        self.index(position).is_some()
    }

    /// Cell stored at `position`, or `None` when it lies outside the grid.
    #[must_use]
    pub fn get(&self, position: Coordinate) -> Option<Cell> {
        let (row, column) = self.index(position)?;
        self.rows.get(row)?.get(column).copied()
    }

    /// Overwrites the slot at `position` with `cell`.
    ///
    /// Returns `false` and leaves the grid untouched when `position` is out of
    /// bounds.
    pub fn put(&mut self, cell: Cell, position: Coordinate) -> bool {
        let Some((row, column)) = self.index(position) else {
            return false;
        };
        match self.rows.get_mut(row).and_then(|line| line.get_mut(column)) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Writes an empty floor cell at `position`.
    ///
    /// Same bounds semantics as [`Grid::put`].
    pub fn set_empty(&mut self, position: Coordinate) -> bool {
        self.put(Cell::empty(position), position)
    }

    /// Finds the cell of `kind` nearest to `from` by Manhattan distance.
    ///
    /// Ties go to the first cell met in row-major order. Returns `None` when
    /// the grid holds no cell of that kind.
    #[must_use]
    pub fn find_closest(&self, from: Coordinate, kind: CellKind) -> Option<(Coordinate, u32)> {
        let mut closest: Option<(Coordinate, u32)> = None;
        for cell in self.cells().filter(|cell| cell.kind() == kind) {
            let distance = from.manhattan_distance(cell.position());
            if closest.map_or(true, |(_, best)| distance < best) {
                closest = Some((cell.position(), distance));
            }
        }
        closest
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flatten()
    }

    /// Iterates over the rows of the grid.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    fn index(&self, position: Coordinate) -> Option<(usize, usize)> {
        let row = usize::try_from(position.x()).ok()?;
        let column = usize::try_from(position.y()).ok()?;
        if row < self.dim && column < self.dim {
            Some((row, column))
        } else {
            None
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let symbols: Vec<&str> = row.iter().map(|cell| cell.kind().symbol()).collect();
            writeln!(f, "{}", symbols.join(" "))?;
        }
        Ok(())
    }
}

fn coordinate_component(index: usize) -> Result<i32, DescriptionError> {
    i32::try_from(index).map_err(|_| DescriptionError::GridTooLarge(index))
}
