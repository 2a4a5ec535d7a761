/*
config.rs

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

//! Build-time settings and default values.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const COPYRIGHT_NOTICE: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nCopyright 2025 Hervé Quatremain\n",
    "License GPL-3.0-or-later: GNU GPL version 3 or later <https://gnu.org/licenses/gpl.html>"
);

/// Side length of the generated boards.
pub const DEFAULT_SIZE: usize = 5;

/// Largest accepted board size.
pub const MAX_SIZE: usize = 1000;

/// Number of obstacles on each board.
pub const DEFAULT_OBSTACLES: usize = 15;

/// Probability for a non-obstacle cell to become a road.
pub const DEFAULT_ROAD_PROBABILITY: f64 = 0.2;

/// Number of rejected boards after which the generator gives up.
///
/// With the default size and obstacles, about one board out of 460 is accepted.
pub const DEFAULT_MAX_ATTEMPTS: usize = 100_000;

/// Scale factor applied to the tile plan when computing the output image size.
pub const TILE_SCALE_FACTOR: u32 = 10;

/// Name of the batch manifest in the output directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Highest accepted print resolution, in dots per inch.
pub const MAX_DPI: u32 = 1200;

/// Name of the print document in the output directory.
pub const SHEETS_FILE: &str = "print_sheets.pdf";
