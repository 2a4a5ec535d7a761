/*
batch.rs

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

//! Generate several boards, possibly in parallel.
//!
//! Every board gets its own seed, derived from the batch seed. The boards therefore only depend
//! on the batch seed, and not on the number of worker threads.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::thread;

use super::board::Board;
use super::random_board::{GenerateError, RandomBoard};

/// A board and how it was generated.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GeneratedBoard {
    /// Position of the board in the batch, starting at 0.
    pub index: usize,

    /// Seed of the random generator used for this board.
    pub seed: u64,

    pub board: Board,

    /// Number of boards tried, the accepted one included.
    pub attempts: usize,

    /// Generation time in seconds.
    pub duration: f32,
}

/// Statistics for a batch of boards.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BatchStats {
    /// Total generation time in seconds.
    pub total: f32,

    /// Longest generation time in seconds.
    pub max: f32,

    /// Total number of attempts.
    pub attempts: usize,
}

impl BatchStats {
    /// Compute the statistics for the given boards.
    pub fn new(boards: &[GeneratedBoard]) -> Self {
        boards.iter().fold(Self::default(), |stats, b| Self {
            total: stats.total + b.duration,
            max: stats.max.max(b.duration),
            attempts: stats.attempts + b.attempts,
        })
    }
}

/// Derive the seeds of the individual boards from the batch seed.
pub fn board_seeds(seed: u64, count: usize) -> Vec<u64> {
    let mut rng: StdRng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| rng.random()).collect()
}

/// Generate one board with its own random generator.
fn generate_one(
    generator: &RandomBoard,
    index: usize,
    seed: u64,
) -> Result<GeneratedBoard, GenerateError> {
    let mut generator: RandomBoard = generator.clone();
    let mut rng: StdRng = StdRng::seed_from_u64(seed);
    let board: Board = generator.generate(&mut rng)?;

    debug!(
        "Board {index} generated after {} attempts",
        generator.attempts
    );
    Ok(GeneratedBoard {
        index,
        seed,
        board,
        attempts: generator.attempts,
        duration: generator.duration,
    })
}

/// Generate `count` boards with the parameters of `generator`.
///
/// With `jobs` greater than one, the boards are spread over that many worker threads.
///
/// # Errors
///
/// If a board cannot be generated, the error for the board with the lowest index is returned.
pub fn generate_batch(
    generator: &RandomBoard,
    count: usize,
    seed: u64,
    jobs: usize,
) -> Result<Vec<GeneratedBoard>, GenerateError> {
    let seeds: Vec<u64> = board_seeds(seed, count);
    let jobs: usize = jobs.clamp(1, count.max(1));

    info!("Generating {count} boards with seed {seed} ({jobs} jobs)");

    if jobs == 1 {
        return seeds
            .iter()
            .enumerate()
            .map(|(index, s)| generate_one(generator, index, *s))
            .collect();
    }

    let (sender, receiver) =
        async_channel::bounded::<(usize, Result<GeneratedBoard, GenerateError>)>(jobs);
    let mut slots: Vec<Option<GeneratedBoard>> = (0..count).map(|_| None).collect();
    let mut first_error: Option<(usize, GenerateError)> = None;
    let seeds: &[u64] = &seeds;

    thread::scope(|scope| {
        for worker in 0..jobs {
            let sender = sender.clone();
            scope.spawn(move || {
                // A worker stops at its first failure. Boards with a lower index are always
                // processed, so the reported error does not depend on thread scheduling.
                for index in (worker..count).step_by(jobs) {
                    let res = generate_one(generator, index, seeds[index]);
                    let failed: bool = res.is_err();
                    if sender.send_blocking((index, res)).is_err() || failed {
                        break;
                    }
                }
            });
        }
        drop(sender);

        while let Ok((index, res)) = receiver.recv_blocking() {
            match res {
                Ok(b) => slots[index] = Some(b),
                Err(e) => {
                    debug!("Board {index}: {e}");
                    if first_error.as_ref().is_none_or(|(i, _)| index < *i) {
                        first_error = Some((index, e));
                    }
                }
            }
        }
    });

    if let Some((_, e)) = first_error {
        return Err(e);
    }
    Ok(slots.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::cell::CellType;

    #[test]
    fn batch_boards_are_valid() {
        let generator = RandomBoard::new(5, 15).unwrap();
        let boards: Vec<GeneratedBoard> = generate_batch(&generator, 6, 1234, 1).unwrap();

        assert_eq!(boards.len(), 6);
        for (i, b) in boards.iter().enumerate() {
            assert_eq!(b.index, i);
            assert!(b.attempts >= 1);
            assert_eq!(b.board.count(CellType::Obstacle), 15);
            assert!(b.board.is_connected());
        }
    }

    #[test]
    fn jobs_do_not_change_the_result() {
        let generator = RandomBoard::new(5, 10).unwrap();
        let sequential: Vec<GeneratedBoard> = generate_batch(&generator, 9, 77, 1).unwrap();
        let parallel: Vec<GeneratedBoard> = generate_batch(&generator, 9, 77, 4).unwrap();

        assert_eq!(sequential.len(), parallel.len());
        for (a, b) in sequential.iter().zip(&parallel) {
            assert_eq!(a.index, b.index);
            assert_eq!(a.seed, b.seed);
            assert_eq!(a.board, b.board);
            assert_eq!(a.attempts, b.attempts);
        }
    }

    #[test]
    fn seeds_are_reproducible() {
        assert_eq!(board_seeds(5, 4), board_seeds(5, 4));
        assert_ne!(board_seeds(5, 4), board_seeds(6, 4));
        assert!(board_seeds(5, 0).is_empty());
    }

    #[test]
    fn errors_are_reported() {
        let generator = RandomBoard::new(5, 16).unwrap().with_max_attempts(1);
        // With a single attempt per board, some of the 40 boards fail
        let res = generate_batch(&generator, 40, 3, 3);
        assert_eq!(res, Err(GenerateError::AttemptsExceeded(1)));
    }

    #[test]
    fn empty_batch() {
        let generator = RandomBoard::new(3, 1).unwrap();
        assert!(generate_batch(&generator, 0, 1, 8).unwrap().is_empty());
    }

    #[test]
    fn stats() {
        let board = Board::new(1);
        let boards: Vec<GeneratedBoard> = [(3, 0.5), (1, 1.5)]
            .iter()
            .enumerate()
            .map(|(index, &(attempts, duration))| GeneratedBoard {
                index,
                seed: 0,
                board: board.clone(),
                attempts,
                duration,
            })
            .collect();
        let stats = BatchStats::new(&boards);
        assert_eq!(stats.attempts, 4);
        assert_eq!(stats.total, 2.0);
        assert_eq!(stats.max, 1.5);
        assert_eq!(BatchStats::new(&[]), BatchStats::default());
    }
}
