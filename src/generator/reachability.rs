/*
reachability.rs

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

//! Breadth-first search across the passable cells of a board.

use std::collections::VecDeque;

use super::board::Board;

/// Up, down, left, and right. No diagonals.
const MOVES: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Whether a cell for which `goal` returns `true` can be reached from one of the `start_cells`.
///
/// The search only moves up, down, left, or right, and never enters an obstacle cell.
/// The start cells must be inside the board and passable. They are not verified.
/// The `goal` function is called once for each visited cell, start cells included.
///
/// Return `false` when `start_cells` is empty.
pub fn is_reachable<F>(board: &Board, start_cells: &[(usize, usize)], goal: F) -> bool
where
    F: Fn(usize, usize) -> bool,
{
    let size: usize = board.size();
    let mut visited: Vec<bool> = vec![false; size * size];
    let mut queue: VecDeque<(usize, usize)> = VecDeque::with_capacity(size * size);

    for &(row, col) in start_cells {
        if !visited[row * size + col] {
            visited[row * size + col] = true;
            queue.push_back((row, col));
        }
    }

    while let Some((row, col)) = queue.pop_front() {
        if goal(row, col) {
            return true;
        }
        for (dr, dc) in MOVES {
            let (Some(r), Some(c)) = (row.checked_add_signed(dr), col.checked_add_signed(dc))
            else {
                continue;
            };
            if r >= size || c >= size || visited[r * size + c] || !board.get(r, c).is_passable()
            {
                continue;
            }
            visited[r * size + c] = true;
            queue.push_back((r, c));
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::cell::CellType;
    use std::cell::Cell;

    fn board_3x3_middle_row_blocked() -> Board {
        let mut board = Board::new(3);
        for col in 0..3 {
            board.set(1, col, CellType::Obstacle);
        }
        board
    }

    #[test]
    fn open_board_reaches_both_edges() {
        let board = Board::new(3);
        let left: Vec<(usize, usize)> = (0..3).map(|r| (r, 0)).collect();
        let top: Vec<(usize, usize)> = (0..3).map(|c| (0, c)).collect();

        assert!(is_reachable(&board, &left, |_, col| col == 2));
        assert!(is_reachable(&board, &top, |row, _| row == 2));
    }

    #[test]
    fn blocked_middle_row() {
        let board = board_3x3_middle_row_blocked();

        assert!(!is_reachable(&board, &board.top_cells(), |row, _| row == 2));
        // Row 0 alone still links the left and right edges
        assert!(is_reachable(&board, &[(0, 0)], |_, col| col == 2));
        assert!(board.has_horizontal_path());
        assert!(!board.has_vertical_path());
    }

    #[test]
    fn empty_start_set() {
        let board = Board::new(3);
        assert!(!is_reachable(&board, &[], |_, _| true));
        assert!(!is_reachable(&board, &[], |_, _| false));
    }

    #[test]
    fn no_diagonal_moves() {
        let mut board = Board::new(2);
        board.set(0, 1, CellType::Obstacle);
        board.set(1, 0, CellType::Obstacle);
        assert!(!is_reachable(&board, &[(0, 0)], |row, col| (row, col) == (1, 1)));
    }

    #[test]
    fn goal_on_start_cell() {
        let mut board = Board::new(1);
        board.set(0, 0, CellType::Road);
        assert!(is_reachable(&board, &[(0, 0)], |_, col| col == 0));
    }

    #[test]
    fn each_cell_visited_once() {
        let board = Board::new(4);
        let calls: Cell<usize> = Cell::new(0);
        let start: Vec<(usize, usize)> = vec![(0, 0), (0, 0), (3, 3)];
        let found: bool = is_reachable(&board, &start, |_, _| {
            calls.set(calls.get() + 1);
            false
        });
        assert!(!found);
        assert_eq!(calls.get(), 16);
    }

    #[test]
    fn repeated_queries_agree() {
        let board = board_3x3_middle_row_blocked();
        let first: bool = board.has_vertical_path();
        for _ in 0..10 {
            assert_eq!(board.has_vertical_path(), first);
            assert!(board.has_horizontal_path());
        }
    }
}
