/*
lib.rs

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

//! Generate square boards of obstacles, roads, and open terrain.
//!
//! Every board has a path from the left edge to the right edge, and another one from the top
//! edge to the bottom edge.
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let board = tileboard::generate_board(5, 15, &mut rng).unwrap();
//! assert!(board.is_connected());
//! ```
//!
//! The other modules save the boards, draw them with a tileset, and lay the drawings out on
//! print sheets.

pub mod config;
pub mod generator;
pub mod saver;
pub mod sheet;
pub mod tiles;

pub use generator::random_board::{GenerateError, generate_board};
