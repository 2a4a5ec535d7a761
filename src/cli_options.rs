/*
cli_options.rs

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

//! Process command-line options.
//!
//! # Examples
//!
//! Generate one 5x5 board with 15 obstacles:
//!
//! ```text
//! $ tileboard
//! Board 0 (seed 11816385240565227164):
//! D O O R D
//! O D O O O
//! D R D O D
//! O O D O O
//! O O D D O
//! ```
//!
//! Generate 50 boards on four threads, save them and their images, and print them on A4
//! sheets:
//!
//! ```text
//! $ tileboard -c 50 -j 4 --seed 42 --out boards --tileset urizen_onebit_tileset.png --sheet
//! ```
//!
//! Verify the paths of a saved board:
//!
//! ```text
//! $ tileboard --check boards/board3.csv
//! ```
//!
//! Generate the boards of a saved batch again, and compare them with the saved tables:
//!
//! ```text
//! $ tileboard --replay boards
//! ```

use clap::Parser;
use image::{GrayImage, RgbaImage};
use log::{LevelFilter, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tileboard::config::{self, COPYRIGHT_NOTICE};
use tileboard::generator::batch::{self, BatchStats, GeneratedBoard};
use tileboard::generator::board::Board;
use tileboard::generator::cell::CellType;
use tileboard::generator::random_board::{GenerateError, RandomBoard};
use tileboard::saver::board_table::{self, SaverBoards};
use tileboard::saver::manifest::{Manifest, SaverManifest};
use tileboard::sheet::{LayoutError, PaperSize, SheetLayout, SheetParameters};
use tileboard::tiles::{self, TileMap, TilePlan, TileSheet};

/// Generate random boards with a path from left to right and a path from top to bottom.
#[derive(Parser, Debug)]
#[command(about, long_about = None, version, long_version = COPYRIGHT_NOTICE)]
struct Args {
    /// Side length of the boards
    #[arg(short, long, default_value_t = config::DEFAULT_SIZE)]
    size: usize,

    /// Number of obstacles on each board
    #[arg(short, long, default_value_t = config::DEFAULT_OBSTACLES)]
    obstacles: usize,

    /// Probability for the other cells to become roads
    #[arg(
        short,
        long,
        allow_negative_numbers = true,
        default_value_t = config::DEFAULT_ROAD_PROBABILITY
    )]
    roads: f64,

    /// Number of boards to generate
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Number of rejected boards after which the generation of a board fails
    #[arg(short, long, default_value_t = config::DEFAULT_MAX_ATTEMPTS)]
    max_attempts: usize,

    /// Give up generating a board after this many seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Seed for the random generator (random by default)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of worker threads
    #[arg(short, long, default_value_t = 1)]
    jobs: usize,

    /// Directory where to save the boards, their images, and the manifest
    #[arg(long)]
    out: Option<PathBuf>,

    /// Tileset image used to draw each board as a PNG image
    #[arg(long, requires = "out")]
    tileset: Option<PathBuf>,

    /// JSON file with the candidate tiles for each cell type
    #[arg(long, requires = "tileset")]
    tile_map: Option<PathBuf>,

    /// Print the board images on sheets, in a PDF document
    #[arg(long, default_value_t = false, requires = "tileset")]
    sheet: bool,

    /// Paper format for the print sheets
    #[arg(value_enum, long, default_value_t = PaperSize::A4)]
    paper: PaperSize,

    /// Print resolution, in dots per inch
    #[arg(long, default_value_t = SheetParameters::default().dpi)]
    dpi: u32,

    /// Size of each image on paper, in centimeters
    #[arg(
        long,
        allow_negative_numbers = true,
        default_value_t = SheetParameters::default().image_size_cm
    )]
    image_size: f64,

    /// Gap between two images, in centimeters
    #[arg(
        long,
        allow_negative_numbers = true,
        default_value_t = SheetParameters::default().padding_cm
    )]
    padding: f64,

    /// Margin around the page, in centimeters
    #[arg(
        long,
        allow_negative_numbers = true,
        default_value_t = SheetParameters::default().margin_cm
    )]
    margin: f64,

    /// Thickness of the cut guides, in pixels
    #[arg(long, default_value_t = SheetParameters::default().line_width)]
    line_width: u32,

    /// Load a board table and verify its paths
    #[arg(long, conflicts_with_all = ["out", "sheet"])]
    check: Option<PathBuf>,

    /// Generate the boards of a saved batch again and compare them with the saved tables
    #[arg(long, value_name = "DIR", conflicts_with_all = ["out", "sheet", "check"])]
    replay: Option<PathBuf>,

    /// Print some statistics after generating the boards
    #[arg(long, default_value_t = false)]
    summary: bool,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

impl Args {
    fn sheet_parameters(&self) -> SheetParameters {
        SheetParameters {
            paper: self.paper,
            dpi: self.dpi,
            image_size_cm: self.image_size,
            padding_cm: self.padding,
            margin_cm: self.margin,
            line_width: self.line_width,
        }
    }
}

/// Parse and process command-line options, and return the exit code.
pub fn parse() -> u8 {
    let args: Args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.debug {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    if let Some(path) = &args.check {
        return check(path);
    }

    let res: Result<bool, Box<dyn Error>> = match &args.replay {
        Some(dir) => replay(dir),
        None => run(&args).map(|()| true),
    };
    match res {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code(e.as_ref())
        }
    }
}

/// Return 2 for errors caused by invalid parameters, and 1 for the others.
fn exit_code(e: &(dyn Error + 'static)) -> u8 {
    let invalid: bool = match (
        e.downcast_ref::<GenerateError>(),
        e.downcast_ref::<LayoutError>(),
    ) {
        (Some(g), _) => g.is_invalid_parameters(),
        (_, Some(l)) => l.is_invalid_parameters(),
        _ => false,
    };
    if invalid { 2 } else { 1 }
}

/// Load a board table, print the board, and report its paths.
///
/// Return 0 when both paths exist.
fn check(path: &Path) -> u8 {
    let board: Board = match board_table::load_board(path) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: {}: {e}", path.display());
            return 1;
        }
    };

    print!("{board}");
    let horizontal: bool = board.has_horizontal_path();
    let vertical: bool = board.has_vertical_path();
    println!("left to right: {}", if horizontal { "yes" } else { "no" });
    println!("top to bottom: {}", if vertical { "yes" } else { "no" });
    if horizontal && vertical { 0 } else { 1 }
}

/// Generate the boards listed in the manifest of the directory again, and compare them with
/// the saved tables.
///
/// Return whether all the boards are identical.
fn replay(dir: &Path) -> Result<bool, Box<dyn Error>> {
    let manifest: Manifest = SaverManifest::new(dir.to_path_buf())
        .get_manifest()?
        .ok_or_else(|| format!("no {} file in {}", config::MANIFEST_FILE, dir.display()))?;

    let mut identical: bool = true;
    for entry in &manifest.boards {
        let board: Board = manifest.regenerate(entry)?;
        let saved: Board = board_table::load_board(&dir.join(&entry.file))?;
        let same: bool = board == saved;
        println!(
            "{} (seed {}): {}",
            entry.file,
            entry.seed,
            if same { "identical" } else { "differs" }
        );
        identical &= same;
    }
    info!(
        "{} boards of {} generated again",
        manifest.boards.len(),
        dir.display()
    );
    Ok(identical)
}

/// Generate the boards and process them as requested by the options.
fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let generator: RandomBoard = RandomBoard::new(args.size, args.obstacles)?
        .with_road_probability(args.roads)?
        .with_max_attempts(args.max_attempts)
        .with_max_duration(args.timeout.map(Duration::from_secs));
    // Verify the print settings before spending time on the boards
    let layout: Option<SheetLayout> = if args.sheet {
        Some(SheetLayout::new(&args.sheet_parameters())?)
    } else {
        None
    };
    let seed: u64 = args.seed.unwrap_or_else(|| rand::rng().random());

    let boards: Vec<GeneratedBoard> = batch::generate_batch(&generator, args.count, seed, args.jobs)?;
    for b in &boards {
        println!("Board {} (seed {}):", b.index, b.seed);
        print!("{}", b.board);
        println!();
    }

    let mut images: Vec<GrayImage> = Vec::new();
    if let Some(dir) = &args.out {
        images = save_batch(args, dir, &generator, seed, &boards)?;
    }

    if let (Some(layout), Some(dir)) = (layout, &args.out) {
        println!(
            "{} with {} cm margin can fit {} x {} = {} images per sheet.",
            args.paper,
            args.margin,
            layout.columns,
            layout.rows,
            layout.per_page()
        );
        let pages: Vec<GrayImage> = layout.render_pages(&images)?;
        let path: PathBuf = dir.join(config::SHEETS_FILE);
        layout.save_pdf(&pages, &path)?;
        println!("Saved {} page(s) to {}", pages.len(), path.display());
    }

    if args.summary {
        print_summary(&boards);
    }
    Ok(())
}

/// Save the boards, their images if a tileset is given, and the manifest.
///
/// Return the board images.
fn save_batch(
    args: &Args,
    dir: &Path,
    generator: &RandomBoard,
    seed: u64,
    boards: &[GeneratedBoard],
) -> Result<Vec<GrayImage>, Box<dyn Error>> {
    let saver: SaverBoards = SaverBoards::new(dir.to_path_buf());
    let tileset: Option<RgbaImage> = match &args.tileset {
        Some(path) => Some(tiles::load_tileset(path)?),
        None => None,
    };
    let tile_map: TileMap = match &args.tile_map {
        Some(path) => TileMap::load(path)?,
        None => TileMap::default(),
    };
    let sheet: TileSheet = TileSheet::default();
    let mut images: Vec<GrayImage> = Vec::new();

    for b in boards {
        let path: PathBuf = saver.save_board(b.index, &b.board)?;
        println!("Board saved to {}", path.display());

        if let Some(tileset) = &tileset {
            // The tiles only depend on the board seed
            let mut rng: StdRng = StdRng::seed_from_u64(b.seed);
            let plan: TilePlan = tiles::plan_tiles(&b.board, &sheet, &tile_map, &mut rng)?;
            let img: GrayImage = tiles::render_board(&plan, tileset)?;
            let image_path: PathBuf = path.with_extension("png");
            img.save(&image_path)?;
            println!("Saved image: {}", image_path.display());
            images.push(img);
        }
    }

    SaverManifest::new(dir.to_path_buf()).save_manifest(&Manifest::new(generator, seed, boards))?;
    info!("{} boards saved in {}", boards.len(), dir.display());
    Ok(images)
}

/// Print statistics about the batch.
fn print_summary(boards: &[GeneratedBoard]) {
    let stats: BatchStats = BatchStats::new(boards);
    let count: usize = boards.len().max(1);

    println!(
        "
        total time = {}s
      average time = {}s
          max time = {}s
average attempts = {}",
        stats.total,
        stats.total / count as f32,
        stats.max,
        stats.attempts / count
    );
    for cell in CellType::all() {
        let n: usize = boards.iter().map(|b| b.board.count(cell)).sum();
        println!("   {cell} cells = {n}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::fs;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tileboard-{name}-{}", std::process::id()))
    }

    /// Write a tileset with a gray tile at (1, 0), and the tile map that uses it for obstacles.
    fn write_tileset(dir: &Path) -> (PathBuf, PathBuf) {
        fs::create_dir_all(dir).unwrap();
        let mut tileset = RgbaImage::new(27, 14);
        for y in 1..13 {
            for x in 14..26 {
                tileset.put_pixel(x, y, Rgba([90, 90, 90, 255]));
            }
        }
        let tileset_path: PathBuf = dir.join("tileset.png");
        tileset.save(&tileset_path).unwrap();

        let map_path: PathBuf = dir.join("map.json");
        fs::write(
            &map_path,
            r#"{"obstacle": [[1, 0]], "road": [[0, 0]], "open": [[0, 0]]}"#,
        )
        .unwrap();
        (tileset_path, map_path)
    }

    #[test]
    fn defaults() {
        let args: Args = Args::try_parse_from(["tileboard"]).unwrap();
        assert_eq!(args.size, 5);
        assert_eq!(args.obstacles, 15);
        assert_eq!(args.roads, 0.2);
        assert_eq!(args.count, 1);
        assert_eq!(args.max_attempts, 100_000);
        assert_eq!(args.sheet_parameters(), SheetParameters::default());
        assert!(args.out.is_none());
    }

    #[test]
    fn option_dependencies() {
        assert!(Args::try_parse_from(["tileboard", "--tileset", "t.png"]).is_err());
        assert!(Args::try_parse_from(["tileboard", "--tile-map", "map.json"]).is_err());
        assert!(Args::try_parse_from(["tileboard", "--sheet", "--out", "d"]).is_err());
        assert!(Args::try_parse_from(["tileboard", "--check", "b.csv", "--out", "d"]).is_err());
        assert!(Args::try_parse_from(["tileboard", "--replay", "d", "--check", "b.csv"]).is_err());
        assert!(
            Args::try_parse_from([
                "tileboard", "--out", "d", "--tileset", "t.png", "--sheet", "--paper", "letter",
                "--margin", "1.5", "--padding", "0.2", "--dpi", "150",
            ])
            .is_ok()
        );
    }

    #[test]
    fn sheet_options() {
        let args: Args = Args::try_parse_from([
            "tileboard", "--paper", "letter", "--dpi", "150", "--image-size", "4", "--padding",
            "0.2", "--margin", "1", "--line-width", "3",
        ])
        .unwrap();
        let p: SheetParameters = args.sheet_parameters();
        assert_eq!(p.paper, PaperSize::Letter);
        assert_eq!(p.dpi, 150);
        assert_eq!((p.image_size_cm, p.padding_cm, p.margin_cm), (4.0, 0.2, 1.0));
        assert_eq!(p.line_width, 3);
    }

    #[test]
    fn invalid_parameters() {
        let args: Args = Args::try_parse_from(["tileboard", "-s", "3", "-o", "9"]).unwrap();
        let err: Box<dyn Error> = run(&args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GenerateError>(),
            Some(GenerateError::NoRoomForCorridors { .. })
        ));
        assert_eq!(exit_code(err.as_ref()), 2);

        let args: Args = Args::try_parse_from(["tileboard", "-s", "4294967296", "-o", "0"]).unwrap();
        let err: Box<dyn Error> = run(&args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GenerateError>(),
            Some(GenerateError::SizeTooLarge { .. })
        ));
        assert_eq!(exit_code(err.as_ref()), 2);

        let args: Args = Args::try_parse_from([
            "tileboard", "--out", "d", "--tileset", "t.png", "--sheet", "--margin", "-1",
        ])
        .unwrap();
        let err: Box<dyn Error> = run(&args).unwrap_err();
        assert_eq!(exit_code(err.as_ref()), 2);

        let err: Box<dyn Error> = Box::new(GenerateError::AttemptsExceeded(3));
        assert_eq!(exit_code(err.as_ref()), 1);
    }

    #[test]
    fn run_saves_and_prints_the_batch() {
        let dir: PathBuf = temp_dir("cli");
        let (tileset, map) = write_tileset(&dir.join("assets"));
        let out: PathBuf = dir.join("out");
        let out_arg: String = out.display().to_string();
        let tileset_arg: String = tileset.display().to_string();
        let map_arg: String = map.display().to_string();
        let args: Args = Args::try_parse_from([
            "tileboard", "-c", "3", "-j", "2", "--seed", "8", "--out", out_arg.as_str(),
            "--tileset", tileset_arg.as_str(), "--tile-map", map_arg.as_str(), "--sheet",
            "--dpi", "60", "--summary",
        ])
        .unwrap();
        run(&args).unwrap();

        for i in 0..3 {
            let board: Board = board_table::load_board(&out.join(format!("board{i}.csv"))).unwrap();
            assert!(board.is_connected());
            assert_eq!(board.count(CellType::Obstacle), 15);

            let img: GrayImage = image::open(out.join(format!("board{i}.png")))
                .unwrap()
                .to_luma8();
            assert_eq!(img.dimensions(), (600, 600));
        }
        let manifest: Manifest = SaverManifest::new(out.clone()).get_manifest().unwrap().unwrap();
        assert_eq!(manifest.seed, 8);
        assert_eq!(manifest.boards.len(), 3);

        let pdf: Vec<u8> = fs::read(out.join(config::SHEETS_FILE)).unwrap();
        assert!(pdf.starts_with(b"%PDF"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn replay_compares_with_the_saved_tables() {
        let dir: PathBuf = temp_dir("replay");
        let dir_arg: String = dir.display().to_string();
        let args: Args = Args::try_parse_from([
            "tileboard", "-c", "4", "-j", "3", "-r", "0.5", "--seed", "31", "--out",
            dir_arg.as_str(),
        ])
        .unwrap();
        run(&args).unwrap();
        assert!(replay(&dir).unwrap());

        // Replace a board by another valid one
        let other: Board = tileboard::generate_board(5, 15, &mut StdRng::seed_from_u64(0)).unwrap();
        SaverBoards::new(dir.clone()).save_board(2, &other).unwrap();
        let manifest: Manifest = SaverManifest::new(dir.clone()).get_manifest().unwrap().unwrap();
        let expected: Board = manifest.regenerate(&manifest.boards[2]).unwrap();
        assert_eq!(replay(&dir).unwrap(), other == expected);

        fs::remove_file(dir.join(config::MANIFEST_FILE)).unwrap();
        assert!(replay(&dir).is_err());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn check_reports_the_paths() {
        let dir: PathBuf = temp_dir("check");
        fs::create_dir_all(&dir).unwrap();
        let good: PathBuf = dir.join("good.csv");
        let bad: PathBuf = dir.join("bad.csv");
        let ragged: PathBuf = dir.join("ragged.csv");
        fs::write(&good, "D,O,D\nR,R,R\nD,O,D\n").unwrap();
        fs::write(&bad, "D,O,D\nO,O,O\nD,O,D\n").unwrap();
        fs::write(&ragged, "D,O,D\nR,R\nD,O,D\n").unwrap();

        assert_eq!(check(&good), 0);
        assert_eq!(check(&bad), 1);
        assert_eq!(check(&ragged), 1);
        assert_eq!(check(&dir.join("missing.csv")), 1);

        let _ = fs::remove_dir_all(&dir);
    }
}
