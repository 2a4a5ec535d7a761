/*
board_table.rs

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

//! Save and load boards as text tables.
//!
//! A table has one line per row, and the cells of a row are separated by commas.
//! Each cell is the code of its [`CellType`]: `O` for obstacles, `R` for roads, and `D` for
//! open terrain (dirt).
//!
//! ```text
//! D,O,O,R,D
//! O,D,O,O,O
//! D,R,D,O,D
//! O,O,D,O,O
//! O,O,D,D,O
//! ```
//!
//! Spaces around the codes, empty cells, and blank lines are ignored when loading a table.

use log::debug;
use std::error::Error;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::generator::board::{Board, ShapeError};
use crate::generator::cell::CellType;

/// Errors raised when loading a table.
#[derive(Debug, PartialEq)]
pub enum TableError {
    /// The table has no cells.
    Empty,

    /// A row does not have the same number of cells as the first row.
    InconsistentRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A cell is not one of the `O`, `R`, or `D` codes.
    UnknownCell {
        row: usize,
        column: usize,
        code: String,
    },

    /// The table is rectangular but not square.
    NotSquare { rows: usize, columns: usize },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TableError::Empty => write!(f, "the table is empty"),
            TableError::InconsistentRows {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {row} has {found} cells instead of {expected}; the table must be rectangular"
            ),
            TableError::UnknownCell { row, column, code } => {
                write!(f, "unknown cell code '{code}' at row {row}, column {column}")
            }
            TableError::NotSquare { rows, columns } => {
                write!(f, "the table has {rows} rows and {columns} columns")
            }
        }
    }
}

impl Error for TableError {}

impl From<ShapeError> for TableError {
    fn from(e: ShapeError) -> Self {
        match e {
            ShapeError::Empty => TableError::Empty,
            ShapeError::RaggedRow {
                row,
                expected,
                found,
            } => TableError::InconsistentRows {
                row,
                expected,
                found,
            },
            ShapeError::NotSquare { rows, columns } => TableError::NotSquare { rows, columns },
        }
    }
}

/// Build a board from its text table.
///
/// # Errors
///
/// Unknown codes and tables that are not square are rejected.
pub fn parse_table(text: &str) -> Result<Board, TableError> {
    let mut rows: Vec<Vec<CellType>> = Vec::new();

    for line in text.lines() {
        let codes: Vec<&str> = line
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();
        if codes.is_empty() {
            continue;
        }

        let row: usize = rows.len();
        let cells: Vec<CellType> = codes
            .iter()
            .enumerate()
            .map(|(column, code)| {
                let mut chars = code.chars();
                match (chars.next().and_then(CellType::from_code), chars.next()) {
                    (Some(cell), None) => Ok(cell),
                    _ => Err(TableError::UnknownCell {
                        row,
                        column,
                        code: code.to_string(),
                    }),
                }
            })
            .collect::<Result<_, _>>()?;
        rows.push(cells);
    }

    Ok(Board::from_rows(rows)?)
}

/// Write the text table of the board.
pub fn write_table<W: Write>(board: &Board, writer: &mut W) -> io::Result<()> {
    for row in board.rows() {
        let codes: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        writeln!(writer, "{}", codes.join(","))?;
    }
    Ok(())
}

/// Name of the table file for the board at the given position in a batch.
pub fn board_file_name(index: usize) -> String {
    format!("board{index}.csv")
}

/// Load a board from a table file.
pub fn load_board(path: &Path) -> Result<Board, Box<dyn Error>> {
    let text: String = fs::read_to_string(path)?;
    let board: Board = parse_table(&text)?;
    Ok(board)
}

/// Object to save boards in a directory.
pub struct SaverBoards {
    /// Directory where the tables are saved.
    dir: PathBuf,
}

impl SaverBoards {
    /// Create a [`SaverBoards`] object.
    ///
    /// The directory is created when the first board is saved.
    pub fn new(dir: PathBuf) -> Self {
        debug!("Board directory: {dir:?}");
        Self { dir }
    }

    /// Path to the table file of the board at the given position.
    pub fn board_path(&self, index: usize) -> PathBuf {
        self.dir.join(board_file_name(index))
    }

    /// Save the board and return the path to its table file.
    pub fn save_board(&self, index: usize, board: &Board) -> Result<PathBuf, Box<dyn Error>> {
        fs::create_dir_all(&self.dir)?;
        let path: PathBuf = self.board_path(index);
        let file: File = File::create(&path)?;
        let mut writer: BufWriter<File> = BufWriter::new(file);

        write_table(board, &mut writer)?;
        writer.flush()?;
        debug!("Board saved to {path:?}");
        Ok(path)
    }
}
