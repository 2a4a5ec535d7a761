/*
random_board.rs

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

//! Generate a random board.

use log::{debug, trace};
use rand::Rng;
use rand::seq::SliceRandom;
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};

use super::board::Board;
use super::cell::CellType;
use crate::config;

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum GenerateError {
    /// The board size is zero.
    EmptyBoard,

    /// The board size is above [`config::MAX_SIZE`].
    SizeTooLarge { size: usize, max: usize },

    /// More obstacles than cells.
    TooManyObstacles { obstacles: usize, cells: usize },

    /// The obstacles leave too few cells for both paths. The two paths need at least
    /// `2 * size - 1` passable cells.
    NoRoomForCorridors { obstacles: usize, max: usize },

    /// The road probability is not between 0 and 1.
    InvalidRoadProbability(f64),

    /// No valid board found within the maximum number of attempts.
    AttemptsExceeded(usize),

    /// No valid board found before the timeout. The value is the number of attempts.
    DurationExceeded(usize),
}

impl GenerateError {
    /// Whether the error comes from the parameters, and would occur again on retry.
    pub fn is_invalid_parameters(&self) -> bool {
        !matches!(
            self,
            GenerateError::AttemptsExceeded(_) | GenerateError::DurationExceeded(_)
        )
    }
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GenerateError::EmptyBoard => write!(f, "the board size must be at least 1"),
            GenerateError::SizeTooLarge { size, max } => {
                write!(f, "board size {size} is too large (at most {max})")
            }
            GenerateError::TooManyObstacles { obstacles, cells } => {
                write!(f, "{obstacles} obstacles requested but the board has {cells} cells")
            }
            GenerateError::NoRoomForCorridors { obstacles, max } => write!(
                f,
                "{obstacles} obstacles leave no room for both paths (at most {max} allowed)"
            ),
            GenerateError::InvalidRoadProbability(p) => {
                write!(f, "road probability {p} is not between 0 and 1")
            }
            GenerateError::AttemptsExceeded(n) => {
                write!(f, "generation did not converge after {n} attempts")
            }
            GenerateError::DurationExceeded(n) => {
                write!(f, "generation timed out after {n} attempts")
            }
        }
    }
}

impl Error for GenerateError {}

/// [`RandomBoard`] object.
///
/// The parameters are only set through the constructor and the `with_*` methods, which verify
/// them.
#[derive(Debug, Clone)]
pub struct RandomBoard {
    /// Side length of the board.
    size: usize,

    /// Number of obstacle cells.
    obstacles: usize,

    /// Probability for each of the other cells to become a road.
    road_probability: f64,

    /// Maximum number of boards to try before giving up.
    max_attempts: usize,

    /// Maximum duration of a generation, if any.
    max_duration: Option<Duration>,

    /// Number of boards it took to get the last accepted board.
    pub attempts: usize,

    /// Duration in seconds it took to generate the last board.
    pub duration: f32,
}

impl RandomBoard {
    /// Create the object.
    ///
    /// # Errors
    ///
    /// The parameters are verified once, here, so that the generator never loops on a board
    /// that cannot exist.
    pub fn new(size: usize, obstacles: usize) -> Result<Self, GenerateError> {
        if size == 0 {
            return Err(GenerateError::EmptyBoard);
        }
        if size > config::MAX_SIZE {
            return Err(GenerateError::SizeTooLarge {
                size,
                max: config::MAX_SIZE,
            });
        }
        let cells: usize = size * size;
        if obstacles > cells {
            return Err(GenerateError::TooManyObstacles { obstacles, cells });
        }
        let max: usize = (size - 1) * (size - 1);
        if obstacles > max {
            return Err(GenerateError::NoRoomForCorridors { obstacles, max });
        }
        Ok(Self {
            size,
            obstacles,
            road_probability: config::DEFAULT_ROAD_PROBABILITY,
            max_attempts: config::DEFAULT_MAX_ATTEMPTS,
            max_duration: None,
            attempts: 0,
            duration: 0.0,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn obstacles(&self) -> usize {
        self.obstacles
    }

    pub fn road_probability(&self) -> f64 {
        self.road_probability
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Set the road probability.
    pub fn with_road_probability(mut self, probability: f64) -> Result<Self, GenerateError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(GenerateError::InvalidRoadProbability(probability));
        }
        self.road_probability = probability;
        Ok(self)
    }

    /// Set the maximum number of attempts. At least one attempt is always made.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Set the maximum duration of a generation.
    pub fn with_max_duration(mut self, max_duration: Option<Duration>) -> Self {
        self.max_duration = max_duration;
        self
    }

    /// Generate and return a random board with a left-to-right and a top-to-bottom path.
    ///
    /// Each attempt starts from scratch. A rejected board is dropped.
    ///
    /// # Errors
    ///
    /// The method returns an error if no board is accepted within the maximum number of
    /// attempts or before the timeout.
    pub fn generate<R: Rng>(&mut self, rng: &mut R) -> Result<Board, GenerateError> {
        let start: Instant = Instant::now();
        self.attempts = 0;
        self.duration = 0.0;

        let res: Result<Board, GenerateError> = loop {
            if self.attempts >= self.max_attempts {
                break Err(GenerateError::AttemptsExceeded(self.attempts));
            }
            if let Some(max) = self.max_duration
                && start.elapsed() >= max
            {
                break Err(GenerateError::DurationExceeded(self.attempts));
            }
            self.attempts += 1;

            let board: Board = self.random_board(rng);
            if board.is_connected() {
                break Ok(board);
            }
            trace!("Attempt {} rejected:\n{board}", self.attempts);
        };

        self.duration = start.elapsed().as_secs_f32();
        debug!(
            "Attempts = {}  Duration = {}",
            self.attempts, self.duration
        );
        res
    }

    /// Build one candidate board: shuffle the positions, place the obstacles on the first ones,
    /// and turn the other ones into roads at random.
    fn random_board<R: Rng>(&self, rng: &mut R) -> Board {
        let mut board: Board = Board::new(self.size);
        let mut positions: Vec<(usize, usize)> = (0..self.size)
            .flat_map(|row| (0..self.size).map(move |col| (row, col)))
            .collect();
        positions.shuffle(rng);

        let (obstacles, others) = positions.split_at(self.obstacles);
        for &(row, col) in obstacles {
            board.set(row, col, CellType::Obstacle);
        }
        for &(row, col) in others {
            if rng.random_bool(self.road_probability) {
                board.set(row, col, CellType::Road);
            }
        }
        board
    }
}

/// Generate a `size` x `size` board with `obstacles` obstacle cells, using the default road
/// probability and attempt limit.
pub fn generate_board<R: Rng>(
    size: usize,
    obstacles: usize,
    rng: &mut R,
) -> Result<Board, GenerateError> {
    RandomBoard::new(size, obstacles)?.generate(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::reachability::is_reachable;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generated_boards_hold_the_invariants() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let board: Board = generate_board(5, 15, &mut rng).unwrap();
            assert_eq!(board.size(), 5);
            assert_eq!(board.rows().count(), 5);
            assert!(board.rows().all(|r| r.len() == 5));
            assert_eq!(board.count(CellType::Obstacle), 15);

            // Verify the paths independently of Board::is_connected()
            assert!(is_reachable(&board, &board.left_cells(), |_, col| col == 4));
            assert!(is_reachable(&board, &board.top_cells(), |row, _| row == 4));
        }
    }

    #[test]
    fn other_sizes() {
        let mut rng = StdRng::seed_from_u64(42);
        for (size, obstacles) in [(1, 0), (2, 1), (3, 4), (8, 30)] {
            let board: Board = generate_board(size, obstacles, &mut rng).unwrap();
            assert_eq!(board.size(), size);
            assert_eq!(board.count(CellType::Obstacle), obstacles);
            assert!(board.is_connected());
        }
    }

    #[test]
    fn same_seed_same_board() {
        let mut generator = RandomBoard::new(5, 12).unwrap();
        let a: Board = generator.generate(&mut StdRng::seed_from_u64(3)).unwrap();
        let b: Board = generator.generate(&mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn road_probability_extremes() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut generator = RandomBoard::new(4, 3)
            .unwrap()
            .with_road_probability(0.0)
            .unwrap();
        let board: Board = generator.generate(&mut rng).unwrap();
        assert_eq!(board.count(CellType::Road), 0);
        assert_eq!(board.count(CellType::Open), 13);

        let mut generator = generator.with_road_probability(1.0).unwrap();
        let board: Board = generator.generate(&mut rng).unwrap();
        assert_eq!(board.count(CellType::Road), 13);
        assert_eq!(board.count(CellType::Open), 0);
    }

    #[test]
    fn invalid_parameters_fail_fast() {
        assert_eq!(RandomBoard::new(0, 0).unwrap_err(), GenerateError::EmptyBoard);
        assert_eq!(
            RandomBoard::new(3, 10).unwrap_err(),
            GenerateError::TooManyObstacles {
                obstacles: 10,
                cells: 9
            }
        );
        // Every cell an obstacle
        let err: GenerateError = RandomBoard::new(5, 25).unwrap_err();
        assert_eq!(
            err,
            GenerateError::NoRoomForCorridors {
                obstacles: 25,
                max: 16
            }
        );
        assert!(err.is_invalid_parameters());
        assert!(RandomBoard::new(5, 16).is_ok());
        assert!(matches!(
            RandomBoard::new(5, 5).unwrap().with_road_probability(1.5),
            Err(GenerateError::InvalidRoadProbability(_))
        ));
    }

    #[test]
    fn huge_size_fails_fast() {
        let mut rng = StdRng::seed_from_u64(1);
        let size: usize = 1 << 33;
        let err: GenerateError = generate_board(size, 0, &mut rng).unwrap_err();
        assert_eq!(
            err,
            GenerateError::SizeTooLarge {
                size,
                max: config::MAX_SIZE
            }
        );
        assert!(err.is_invalid_parameters());
        assert!(RandomBoard::new(config::MAX_SIZE, 0).is_ok());
        assert!(RandomBoard::new(config::MAX_SIZE + 1, 0).is_err());
    }

    #[test]
    fn road_probability_is_always_verified() {
        let generator = RandomBoard::new(4, 2).unwrap();
        assert!(matches!(
            generator.clone().with_road_probability(f64::NAN),
            Err(GenerateError::InvalidRoadProbability(_))
        ));
        assert!(generator.clone().with_road_probability(-0.1).is_err());

        let generator = generator.with_road_probability(0.7).unwrap();
        assert_eq!(generator.road_probability(), 0.7);
        assert_eq!((generator.size(), generator.obstacles()), (4, 2));
        assert_eq!(generator.max_attempts(), config::DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn attempt_limit() {
        let mut rng = StdRng::seed_from_u64(5);
        // About one board out of 3700 is accepted with 16 obstacles
        let mut generator = RandomBoard::new(5, 16).unwrap().with_max_attempts(1);
        let mut failures: usize = 0;
        for _ in 0..50 {
            match generator.generate(&mut rng) {
                Ok(board) => assert!(board.is_connected()),
                Err(e) => {
                    assert_eq!(e, GenerateError::AttemptsExceeded(1));
                    assert!(!e.is_invalid_parameters());
                    failures += 1;
                }
            }
            assert_eq!(generator.attempts, 1);
        }
        assert!(failures > 0);
    }

    #[test]
    fn zero_duration_times_out() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut generator = RandomBoard::new(5, 15)
            .unwrap()
            .with_max_duration(Some(Duration::ZERO));
        assert_eq!(
            generator.generate(&mut rng),
            Err(GenerateError::DurationExceeded(0))
        );
    }

    #[test]
    fn attempts_are_counted() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut generator = RandomBoard::new(3, 0).unwrap();
        generator.generate(&mut rng).unwrap();
        // Without obstacles the first board is always accepted
        assert_eq!(generator.attempts, 1);
    }
}
