/*
cell.rs

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

//! Types of the board cells.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::FromRepr;

/// Number of [`CellType`] variants.
pub const NUM_CELL_TYPES: usize = 3;

/// Type of a board cell.
///
/// - An `Obstacle` cell blocks the way.
/// - A `Road` cell is passable.
/// - An `Open` cell (dirt) is passable. This is the default terrain.
///
/// `Road` and `Open` only differ when the board is drawn.
#[derive(
    Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq, Hash, FromRepr,
)]
#[repr(u8)]
pub enum CellType {
    Obstacle,
    Road,
    #[default]
    Open,
}

impl CellType {
    /// Whether a path can go through the cell.
    pub fn is_passable(self) -> bool {
        self != CellType::Obstacle
    }

    /// Single character code used in board tables.
    pub fn code(self) -> char {
        match self {
            CellType::Obstacle => 'O',
            CellType::Road => 'R',
            CellType::Open => 'D',
        }
    }

    /// Return the cell type for the given code, or None for an unknown code.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'O' => Some(CellType::Obstacle),
            'R' => Some(CellType::Road),
            'D' => Some(CellType::Open),
            _ => None,
        }
    }

    /// All the cell types, in declaration order.
    pub fn all() -> impl Iterator<Item = CellType> {
        (0..NUM_CELL_TYPES as u8).filter_map(CellType::from_repr)
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_obstacles_block() {
        assert!(!CellType::Obstacle.is_passable());
        assert!(CellType::Road.is_passable());
        assert!(CellType::Open.is_passable());
    }

    #[test]
    fn codes() {
        for cell in CellType::all() {
            assert_eq!(CellType::from_code(cell.code()), Some(cell));
        }
        assert_eq!(CellType::from_code('X'), None);
        assert_eq!(CellType::from_code('d'), None);
        assert_eq!(CellType::default(), CellType::Open);
        assert_eq!(CellType::all().count(), NUM_CELL_TYPES);
    }
}
