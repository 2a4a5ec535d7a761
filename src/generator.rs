/*
generator.rs

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

//! Generate random boards.
//!
//! A [`board::Board`] is a square grid of [`cell::CellType`] cells: obstacles, roads, and open
//! terrain.
//! Only obstacles block the way.
//!
//! To get a board, create a [`random_board::RandomBoard`] object and use its
//! [`random_board::RandomBoard::generate`] method.
//! The method places the obstacles and the roads at random, and then keeps the board only if
//! a path goes from the left edge to the right edge, and another one from the top edge to the
//! bottom edge.
//! Otherwise, it drops the board and starts again.
//! If it takes too many attempts, or too long, then the method returns an error.
//!
//! The paths are verified by [`reachability::is_reachable`], a breadth-first search across
//! the passable cells.
//!
//! [`batch::generate_batch`] generates several boards, each one with its own seed, possibly
//! over several threads.

pub mod batch;
pub mod board;
pub mod cell;
pub mod random_board;
pub mod reachability;
