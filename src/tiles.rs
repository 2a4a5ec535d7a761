/*
tiles.rs

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

//! Draw boards with the tiles of a tileset image.
//!
//! The tileset is an image made of a grid of tiles of the same size, separated by some spacing
//! and surrounded by a margin (see [`TileSheet`]).
//! A tile is designated by its column and row in that grid.
//!
//! For each cell type, the [`TileMap`] object lists the candidate tiles.
//! [`plan_tiles`] picks one of them at random for each cell of a board, and returns where to
//! copy it from (in the tileset) and where to paste it (in the board image).
//! [`render_board`] then assembles the board image from that plan.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Rgb, RgbImage, Rgba, RgbaImage};
use log::{Level, debug, log_enabled};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::config;
use crate::generator::board::Board;
use crate::generator::cell::CellType;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum TileError {
    /// The tile map has no candidate tile for this cell type.
    NoTileFor(CellType),

    /// The tile is not inside the tileset image.
    OutsideTileset {
        tile: (u32, u32),
        width: u32,
        height: u32,
    },
}

impl fmt::Display for TileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TileError::NoTileFor(cell) => write!(f, "no tile mapping for cell '{cell}'"),
            TileError::OutsideTileset {
                tile,
                width,
                height,
            } => write!(
                f,
                "tile ({}, {}) is outside the {width}x{height} tileset",
                tile.0, tile.1
            ),
        }
    }
}

impl Error for TileError {}

/// Rectangle in an image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Geometry of the tileset image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSheet {
    pub tile_width: u32,
    pub tile_height: u32,

    /// Padding around the whole tileset.
    pub margin: u32,

    /// Gap between two tiles.
    pub spacing: u32,
}

impl Default for TileSheet {
    fn default() -> Self {
        Self {
            tile_width: 12,
            tile_height: 12,
            margin: 1,
            spacing: 1,
        }
    }
}

impl TileSheet {
    /// Return the area of the tile at column `tile.0` and row `tile.1` of the tileset.
    ///
    /// Coordinates too large for the tileset saturate, and [`render_board`] rejects them.
    pub fn tile_box(&self, tile: (u32, u32)) -> PixelBox {
        PixelBox {
            x: self
                .margin
                .saturating_add(tile.0.saturating_mul(self.tile_width + self.spacing)),
            y: self
                .margin
                .saturating_add(tile.1.saturating_mul(self.tile_height + self.spacing)),
            width: self.tile_width,
            height: self.tile_height,
        }
    }
}

/// Candidate tiles for each cell type.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
    pub obstacle: Vec<(u32, u32)>,
    pub road: Vec<(u32, u32)>,
    pub open: Vec<(u32, u32)>,
}

impl Default for TileMap {
    fn default() -> Self {
        Self {
            obstacle: vec![(0, 34), (1, 34), (2, 34), (3, 34), (17, 34)],
            road: vec![(0, 5)],
            open: vec![(0, 5)],
        }
    }
}

impl TileMap {
    /// Load a tile map from a JSON file.
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let reader: BufReader<File> = BufReader::new(File::open(path)?);
        let map: TileMap = serde_json::from_reader(reader)?;
        map.validate()?;
        Ok(map)
    }

    /// Candidate tiles for the given cell type.
    pub fn candidates(&self, cell: CellType) -> &[(u32, u32)] {
        match cell {
            CellType::Obstacle => &self.obstacle,
            CellType::Road => &self.road,
            CellType::Open => &self.open,
        }
    }

    /// Verify that every cell type has at least one candidate tile.
    pub fn validate(&self) -> Result<(), TileError> {
        match CellType::all().find(|c| self.candidates(*c).is_empty()) {
            Some(cell) => Err(TileError::NoTileFor(cell)),
            None => Ok(()),
        }
    }
}

/// Tile chosen for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilePlacement {
    pub row: usize,
    pub col: usize,
    pub cell: CellType,

    /// Column and row of the tile in the tileset.
    pub tile: (u32, u32),

    /// Area to copy from the tileset.
    pub source: PixelBox,

    /// Area to paste to in the board image, before scaling.
    pub target: PixelBox,
}

/// Tiles for all the cells of a board.
#[derive(Debug, Clone, PartialEq)]
pub struct TilePlan {
    /// Board image width before scaling.
    pub width: u32,

    /// Board image height before scaling.
    pub height: u32,

    /// Scale factor to apply to the assembled image.
    pub scale: u32,

    /// One placement per cell, row by row.
    pub tiles: Vec<TilePlacement>,
}

impl TilePlan {
    /// Size of the final, scaled, image.
    pub fn output_size(&self) -> (u32, u32) {
        (self.width * self.scale, self.height * self.scale)
    }
}

/// Pick a random tile for each cell of the board.
///
/// # Errors
///
/// The method returns an error if a cell type of the board has no candidate tile.
pub fn plan_tiles<R: Rng>(
    board: &Board,
    sheet: &TileSheet,
    map: &TileMap,
    rng: &mut R,
) -> Result<TilePlan, TileError> {
    let size: u32 = board.size() as u32;
    let mut tiles: Vec<TilePlacement> = Vec::with_capacity(board.size() * board.size());

    for (row, cells) in board.rows().enumerate() {
        for (col, &cell) in cells.iter().enumerate() {
            let tile: (u32, u32) = *map
                .candidates(cell)
                .choose(rng)
                .ok_or(TileError::NoTileFor(cell))?;
            tiles.push(TilePlacement {
                row,
                col,
                cell,
                tile,
                source: sheet.tile_box(tile),
                target: PixelBox {
                    x: col as u32 * sheet.tile_width,
                    y: row as u32 * sheet.tile_height,
                    width: sheet.tile_width,
                    height: sheet.tile_height,
                },
            });
        }
    }

    if log_enabled!(Level::Debug) {
        debug!("Tile plan for a {size}x{size} board:");
        for p in &tiles {
            debug!("  ({}, {}) {} -> tile {:?}", p.row, p.col, p.cell, p.tile);
        }
    }

    Ok(TilePlan {
        width: size * sheet.tile_width,
        height: size * sheet.tile_height,
        scale: config::TILE_SCALE_FACTOR,
        tiles,
    })
}

/// Load the tileset image.
pub fn load_tileset(path: &Path) -> Result<RgbaImage, Box<dyn Error>> {
    let tileset: RgbaImage = image::open(path)?.to_rgba8();
    debug!(
        "Tileset {path:?}: {}x{}",
        tileset.width(),
        tileset.height()
    );
    Ok(tileset)
}

/// Return the color of a tile pixel once drawn over a white background.
///
/// Black pixels become white.
fn on_white(pixel: Rgba<u8>) -> Rgb<u8> {
    let [r, g, b, a] = pixel.0;
    if [r, g, b] == [0, 0, 0] {
        return WHITE;
    }
    let alpha: u32 = u32::from(a);
    let mix = |c: u8| ((u32::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8;
    Rgb([mix(r), mix(g), mix(b)])
}

/// Assemble the board image from the tiles of the plan.
///
/// The tiles are copied over a white background. The image is then scaled up by the plan
/// scale factor, without smoothing, and converted to grayscale.
///
/// # Errors
///
/// The function returns an error if a tile of the plan is not inside the tileset.
pub fn render_board(plan: &TilePlan, tileset: &RgbaImage) -> Result<GrayImage, TileError> {
    let mut img: RgbImage = RgbImage::from_pixel(plan.width, plan.height, WHITE);

    for p in &plan.tiles {
        let src: PixelBox = p.source;
        if src.x.saturating_add(src.width) > tileset.width()
            || src.y.saturating_add(src.height) > tileset.height()
        {
            return Err(TileError::OutsideTileset {
                tile: p.tile,
                width: tileset.width(),
                height: tileset.height(),
            });
        }
        for y in 0..src.height {
            for x in 0..src.width {
                let pixel: Rgba<u8> = *tileset.get_pixel(src.x + x, src.y + y);
                img.put_pixel(p.target.x + x, p.target.y + y, on_white(pixel));
            }
        }
    }

    let (width, height) = plan.output_size();
    let scaled: RgbImage = imageops::resize(&img, width, height, FilterType::Nearest);
    Ok(DynamicImage::ImageRgb8(scaled).to_luma8())
}
