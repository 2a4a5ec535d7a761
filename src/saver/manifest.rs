/*
manifest.rs

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

//! Save and restore the description of a batch of boards.
//!
//! The manifest records the generation parameters and, for each board, its table file, its
//! seed, and how long it took to generate.
//! With the seeds, any board of the batch can be generated again.
//!
//! The saved object is a serialization of the [`Manifest`] object in JSON format by using
//! [`serde`].

use chrono::Local;
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::PathBuf;

use super::board_table::board_file_name;
use crate::config;
use crate::generator::batch::GeneratedBoard;
use crate::generator::board::Board;
use crate::generator::random_board::{GenerateError, RandomBoard};

/// Board entry in the manifest.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ManifestEntry {
    /// Name of the table file, relative to the manifest directory.
    pub file: String,
    pub seed: u64,
    pub attempts: usize,

    /// Generation time in seconds.
    pub duration: f32,
}

/// Description of a batch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Manifest {
    /// Generation date and time (RFC 3339).
    pub generated_at: String,

    /// Version of the tool that generated the batch.
    pub version: String,

    pub size: usize,
    pub obstacles: usize,
    pub road_probability: f64,
    pub max_attempts: usize,

    /// Batch seed, from which the board seeds derive.
    pub seed: u64,

    pub boards: Vec<ManifestEntry>,
}

impl Manifest {
    /// Create a [`Manifest`] object for the boards generated with the given parameters.
    pub fn new(generator: &RandomBoard, seed: u64, boards: &[GeneratedBoard]) -> Self {
        Self {
            generated_at: Local::now().to_rfc3339(),
            version: config::VERSION.to_string(),
            size: generator.size(),
            obstacles: generator.obstacles(),
            road_probability: generator.road_probability(),
            max_attempts: generator.max_attempts(),
            seed,
            boards: boards
                .iter()
                .map(|b| ManifestEntry {
                    file: board_file_name(b.index),
                    seed: b.seed,
                    attempts: b.attempts,
                    duration: b.duration,
                })
                .collect(),
        }
    }

    /// Rebuild the generator that produced the batch.
    ///
    /// # Errors
    ///
    /// The recorded parameters are verified again, so an edited manifest cannot produce an
    /// invalid generator.
    pub fn generator(&self) -> Result<RandomBoard, GenerateError> {
        Ok(RandomBoard::new(self.size, self.obstacles)?
            .with_road_probability(self.road_probability)?
            .with_max_attempts(self.max_attempts))
    }

    /// Generate the board of the given entry again, from its seed.
    pub fn regenerate(&self, entry: &ManifestEntry) -> Result<Board, GenerateError> {
        let mut rng: StdRng = StdRng::seed_from_u64(entry.seed);
        self.generator()?.generate(&mut rng)
    }
}

/// Object to save and restore a manifest.
pub struct SaverManifest {
    /// Path to the manifest file.
    save_file: PathBuf,
}

impl SaverManifest {
    /// Create a [`SaverManifest`] object.
    ///
    /// The provided [`PathBuf`] is the path to the directory where the manifest must be saved.
    pub fn new(mut dir: PathBuf) -> Self {
        dir.push(config::MANIFEST_FILE);
        debug!("Manifest file: {dir:?}");
        Self { save_file: dir }
    }

    /// Retrieve the [`Manifest`] object from the manifest file.
    ///
    /// Return None if the manifest file does not exist.
    pub fn get_manifest(&self) -> Result<Option<Manifest>, Box<dyn Error>> {
        let file: File = match File::open(&self.save_file) {
            Ok(f) => f,
            Err(error) => match error.kind() {
                ErrorKind::NotFound => return Ok(None),
                _ => return Err(Box::new(error)),
            },
        };
        let reader: BufReader<File> = BufReader::new(file);
        let manifest: Manifest = serde_json::from_reader(reader)?;
        Ok(Some(manifest))
    }

    /// Save the provided [`Manifest`] object.
    pub fn save_manifest(&self, manifest: &Manifest) -> Result<(), Box<dyn Error>> {
        super::save_json(&self.save_file, manifest)
    }
}
