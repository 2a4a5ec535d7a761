/*
board.rs

Copyright 2025 Hervé Quatremain

This file is part of Tileboard.

Tileboard is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Tileboard is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Tileboard. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Square board of typed cells.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

use super::cell::CellType;
use super::reachability;

/// Errors raised when building a board from rows.
#[derive(Debug, PartialEq)]
pub enum ShapeError {
    /// No rows at all.
    Empty,

    /// A row does not have the same number of cells as the first row.
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The rows are consistent, but the grid is not square.
    NotSquare { rows: usize, columns: usize },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ShapeError::Empty => write!(f, "the board has no rows"),
            ShapeError::RaggedRow {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} cells instead of {expected}"),
            ShapeError::NotSquare { rows, columns } => {
                write!(f, "the board is {rows}x{columns}, not square")
            }
        }
    }
}

impl Error for ShapeError {}

/// Square grid of [`CellType`] cells.
///
/// The cells are stored row by row. Positions are `(row, col)` tuples.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "Vec<Vec<CellType>>", into = "Vec<Vec<CellType>>")]
pub struct Board {
    size: usize,
    cells: Vec<CellType>,
}

impl Board {
    /// Create a board of `size` x `size` [`CellType::Open`] cells.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![CellType::Open; size * size],
        }
    }

    /// Create a board from a list of rows.
    ///
    /// # Errors
    ///
    /// The rows must all have the same length, equal to the number of rows. A grid that does
    /// not follow this rule is rejected, never padded or truncated.
    pub fn from_rows(rows: Vec<Vec<CellType>>) -> Result<Self, ShapeError> {
        let columns: usize = match rows.first() {
            Some(r) if !r.is_empty() => r.len(),
            _ => return Err(ShapeError::Empty),
        };
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns) {
            return Err(ShapeError::RaggedRow {
                row,
                expected: columns,
                found: r.len(),
            });
        }
        if rows.len() != columns {
            return Err(ShapeError::NotSquare {
                rows: rows.len(),
                columns,
            });
        }
        Ok(Self {
            size: columns,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Return the cell at the given position.
    ///
    /// The position must be inside the board.
    pub fn get(&self, row: usize, col: usize) -> CellType {
        self.cells[row * self.size + col]
    }

    /// Set the cell at the given position.
    pub fn set(&mut self, row: usize, col: usize, cell: CellType) {
        self.cells[row * self.size + col] = cell;
    }

    /// Iterate over the rows of the board.
    pub fn rows(&self) -> impl Iterator<Item = &[CellType]> {
        self.cells.chunks(self.size.max(1))
    }

    /// Number of cells of the given type.
    pub fn count(&self, cell: CellType) -> usize {
        self.cells.iter().filter(|c| **c == cell).count()
    }

    /// Passable cells in the leftmost column.
    pub fn left_cells(&self) -> Vec<(usize, usize)> {
        (0..self.size)
            .filter(|&row| self.get(row, 0).is_passable())
            .map(|row| (row, 0))
            .collect()
    }

    /// Passable cells in the topmost row.
    pub fn top_cells(&self) -> Vec<(usize, usize)> {
        (0..self.size)
            .filter(|&col| self.get(0, col).is_passable())
            .map(|col| (0, col))
            .collect()
    }

    /// Whether a path links the left edge to the right edge.
    pub fn has_horizontal_path(&self) -> bool {
        let Some(last) = self.size.checked_sub(1) else {
            return false;
        };
        reachability::is_reachable(self, &self.left_cells(), |_, col| col == last)
    }

    /// Whether a path links the top edge to the bottom edge.
    pub fn has_vertical_path(&self) -> bool {
        let Some(last) = self.size.checked_sub(1) else {
            return false;
        };
        reachability::is_reachable(self, &self.top_cells(), |row, _| row == last)
    }

    /// Whether both the left-to-right and the top-to-bottom paths exist.
    ///
    /// The two paths do not need to cross, and the other cells do not need to be connected.
    pub fn is_connected(&self) -> bool {
        self.has_horizontal_path() && self.has_vertical_path()
    }
}

impl TryFrom<Vec<Vec<CellType>>> for Board {
    type Error = ShapeError;

    fn try_from(rows: Vec<Vec<CellType>>) -> Result<Self, Self::Error> {
        Board::from_rows(rows)
    }
}

impl From<Board> for Vec<Vec<CellType>> {
    fn from(board: Board) -> Self {
        board.rows().map(|r| r.to_vec()).collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.rows() {
            let line: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
