/*
saver.rs

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

//! Save generated boards to disk.
//!
//! - [`board_table`] writes and reads boards as text tables, one file per board.
//! - [`manifest`] describes a whole batch in a JSON file.
//!
//! [`save_json`] writes a JSON document.

pub mod board_table;
pub mod manifest;

use log::debug;
use serde::Serialize;
use std::error::Error;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Save the provided object in JSON format.
///
/// The parent directory is created if need be.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file: File = File::create(path)?;
    let mut writer: BufWriter<File> = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    debug!("Saved {path:?}");
    Ok(())
}
