/*
sheet.rs

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

//! Lay out board images on print sheets.
//!
//! The images are square and all get the same size on paper.
//! They are arranged in a grid, row by row, inside the page margins.
//! A cut guide is drawn around each image.
//! The pages are rendered in grayscale and saved in a PDF document.

use clap::ValueEnum;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};
use log::{Level, debug, log_enabled};
use printpdf::{Image, ImageTransform, Mm, PdfDocument, PdfLayerReference};
use std::error::Error;
use std::fmt;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use crate::config;
use crate::tiles::PixelBox;

const CM_PER_INCH: f64 = 2.54;
const MM_PER_INCH: f32 = 25.4;

/// Type of errors.
#[derive(Debug, PartialEq)]
pub enum LayoutError {
    /// Not even one image fits on the page.
    NothingFits,

    /// No image to lay out.
    NoImages,

    /// The resolution is zero or above [`config::MAX_DPI`].
    InvalidDpi(u32),

    /// A length is negative or not a number. The image size must also not be zero.
    InvalidLength { name: &'static str, value: f64 },
}

impl LayoutError {
    /// Whether the error comes from the print settings.
    pub fn is_invalid_parameters(&self) -> bool {
        matches!(
            self,
            LayoutError::InvalidDpi(_) | LayoutError::InvalidLength { .. }
        )
    }
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LayoutError::NothingFits => write!(f, "the images do not fit on the page"),
            LayoutError::NoImages => write!(f, "no images to lay out"),
            LayoutError::InvalidDpi(dpi) => write!(
                f,
                "resolution {dpi} dpi is not between 1 and {}",
                config::MAX_DPI
            ),
            LayoutError::InvalidLength { name, value } => {
                write!(f, "invalid {name}: {value} cm")
            }
        }
    }
}

impl Error for LayoutError {}

/// Paper format.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum)]
pub enum PaperSize {
    #[default]
    A4,
    Letter,
}

impl PaperSize {
    /// Width and height in centimeters, portrait orientation.
    pub fn size_cm(self) -> (f64, f64) {
        match self {
            PaperSize::A4 => (21.0, 29.7),
            PaperSize::Letter => (21.59, 27.94),
        }
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PaperSize::A4 => write!(f, "A4"),
            PaperSize::Letter => write!(f, "Letter"),
        }
    }
}

/// Print settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetParameters {
    pub paper: PaperSize,

    /// Print resolution, in dots per inch.
    pub dpi: u32,

    /// Width (and height) of each image on paper.
    pub image_size_cm: f64,

    /// Gap between two images.
    pub padding_cm: f64,

    /// Margin around the whole page.
    pub margin_cm: f64,

    /// Thickness of the cut guides, in pixels.
    pub line_width: u32,
}

impl Default for SheetParameters {
    fn default() -> Self {
        Self {
            paper: PaperSize::A4,
            dpi: 300,
            image_size_cm: 5.0,
            padding_cm: 0.0,
            margin_cm: 0.5,
            line_width: 2,
        }
    }
}

impl SheetParameters {
    /// Convert a length in centimeters to whole pixels at the print resolution.
    pub fn to_px(&self, cm: f64) -> u32 {
        (cm * f64::from(self.dpi) / CM_PER_INCH) as u32
    }

    /// Verify the resolution and the lengths.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.dpi == 0 || self.dpi > config::MAX_DPI {
            return Err(LayoutError::InvalidDpi(self.dpi));
        }
        let lengths = [
            ("image size", self.image_size_cm, false),
            ("padding", self.padding_cm, true),
            ("margin", self.margin_cm, true),
        ];
        for (name, value, zero_allowed) in lengths {
            if !value.is_finite() || value < 0.0 || (value == 0.0 && !zero_allowed) {
                return Err(LayoutError::InvalidLength { name, value });
            }
        }
        Ok(())
    }
}

/// Position of an image on the sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Position of the image in the input list.
    pub index: usize,

    /// Page number, starting at 0.
    pub page: usize,

    /// Area of the image on the page. The image must be resized to fit.
    pub area: PixelBox,

    /// Cut guide rectangle drawn around the image.
    pub cut_guide: PixelBox,
}

/// Grid of image slots on a page. All sizes are in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub dpi: u32,
    pub page_width: u32,
    pub page_height: u32,
    pub margin: u32,
    pub image_size: u32,

    /// Image size plus padding.
    pub cell_size: u32,

    pub columns: u32,
    pub rows: u32,
    pub line_width: u32,
}

impl SheetLayout {
    /// Compute how many images fit on a page.
    ///
    /// # Errors
    ///
    /// The method returns an error if the parameters are invalid, or if the margins leave no
    /// room for a single image.
    pub fn new(p: &SheetParameters) -> Result<Self, LayoutError> {
        p.validate()?;
        let (width_cm, height_cm) = p.paper.size_cm();
        let page_width: u32 = p.to_px(width_cm);
        let page_height: u32 = p.to_px(height_cm);
        let margin: u32 = p.to_px(p.margin_cm);
        let image_size: u32 = p.to_px(p.image_size_cm);
        let cell_size: u32 = image_size.saturating_add(p.to_px(p.padding_cm));

        if image_size == 0 {
            return Err(LayoutError::NothingFits);
        }
        let usable_width: u32 = page_width.saturating_sub(margin.saturating_mul(2));
        let usable_height: u32 = page_height.saturating_sub(margin.saturating_mul(2));
        let columns: u32 = usable_width / cell_size;
        let rows: u32 = usable_height / cell_size;

        if log_enabled!(Level::Debug) {
            debug!("Sheet layout for {} at {} dpi:", p.paper, p.dpi);
            debug!("      page = {page_width}x{page_height}");
            debug!("    margin = {margin}");
            debug!("     image = {image_size}");
            debug!("      cell = {cell_size}");
            debug!("   columns = {columns}");
            debug!("      rows = {rows}");
        }

        if columns == 0 || rows == 0 {
            return Err(LayoutError::NothingFits);
        }
        Ok(Self {
            dpi: p.dpi,
            page_width,
            page_height,
            margin,
            image_size,
            cell_size,
            columns,
            rows,
            line_width: p.line_width,
        })
    }

    /// Number of images on a full page.
    pub fn per_page(&self) -> usize {
        (self.columns * self.rows) as usize
    }

    /// Number of pages needed for `count` images.
    pub fn pages_for(&self, count: usize) -> usize {
        count.div_ceil(self.per_page())
    }

    /// Place `count` images on as many pages as needed.
    ///
    /// # Errors
    ///
    /// The method returns an error if `count` is zero, so that an empty document is never
    /// produced.
    pub fn place(&self, count: usize) -> Result<Vec<Placement>, LayoutError> {
        if count == 0 {
            return Err(LayoutError::NoImages);
        }
        let per_page: usize = self.per_page();

        Ok((0..count)
            .map(|index| {
                let slot: u32 = (index % per_page) as u32;
                let area = PixelBox {
                    x: self.margin + (slot % self.columns) * self.cell_size,
                    y: self.margin + (slot / self.columns) * self.cell_size,
                    width: self.image_size,
                    height: self.image_size,
                };
                Placement {
                    index,
                    page: index / per_page,
                    area,
                    cut_guide: area,
                }
            })
            .collect())
    }

    /// Draw the images on white pages, each one with its cut guide.
    ///
    /// The images are resized to the image size of the layout.
    pub fn render_pages(&self, images: &[GrayImage]) -> Result<Vec<GrayImage>, LayoutError> {
        let placements: Vec<Placement> = self.place(images.len())?;
        let mut pages: Vec<GrayImage> = (0..self.pages_for(images.len()))
            .map(|_| GrayImage::from_pixel(self.page_width, self.page_height, Luma([255])))
            .collect();

        for p in &placements {
            let img: GrayImage = imageops::resize(
                &images[p.index],
                p.area.width,
                p.area.height,
                FilterType::Lanczos3,
            );
            let page: &mut GrayImage = &mut pages[p.page];
            imageops::replace(page, &img, i64::from(p.area.x), i64::from(p.area.y));
            draw_outline(page, p.cut_guide, self.line_width);
        }
        debug!("{} images rendered on {} pages", images.len(), pages.len());
        Ok(pages)
    }

    /// Convert a length in pixels to millimeters on paper.
    fn px_to_mm(&self, px: u32) -> Mm {
        Mm(px as f32 * MM_PER_INCH / self.dpi as f32)
    }

    /// Save the pages in a PDF document.
    pub fn save_pdf(&self, pages: &[GrayImage], path: &Path) -> Result<(), Box<dyn Error>> {
        let Some((first, others)) = pages.split_first() else {
            return Err(Box::new(LayoutError::NoImages));
        };
        let width: Mm = self.px_to_mm(self.page_width);
        let height: Mm = self.px_to_mm(self.page_height);

        let (doc, page, layer) = PdfDocument::new("Print sheets", width, height, "Page 1");
        self.add_page_image(doc.get_page(page).get_layer(layer), first);
        for (i, img) in others.iter().enumerate() {
            let (page, layer) = doc.add_page(width, height, format!("Page {}", i + 2));
            self.add_page_image(doc.get_page(page).get_layer(layer), img);
        }

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut writer: BufWriter<File> = BufWriter::new(File::create(path)?);
        doc.save(&mut writer)?;
        debug!("Saved {} pages to {path:?}", pages.len());
        Ok(())
    }

    /// Cover the whole PDF page with the page image.
    fn add_page_image(&self, layer: PdfLayerReference, page: &GrayImage) {
        let image: Image = Image::from_dynamic_image(&DynamicImage::ImageLuma8(page.clone()));
        image.add_to_layer(
            layer,
            ImageTransform {
                dpi: Some(self.dpi as f32),
                ..ImageTransform::default()
            },
        );
    }
}

/// Draw a black rectangle, `line_width` pixels thick, inside the given box.
///
/// The right and bottom edges are drawn on the pixels just after the box, so that the guide
/// surrounds the whole image.
fn draw_outline(page: &mut GrayImage, area: PixelBox, line_width: u32) {
    let (page_width, page_height) = page.dimensions();
    let mut put = |x: u32, y: u32| {
        if x < page_width && y < page_height {
            page.put_pixel(x, y, Luma([0]));
        }
    };

    for t in 0..line_width {
        let left: u32 = area.x + t;
        let top: u32 = area.y + t;
        let (Some(right), Some(bottom)) = (
            (area.x + area.width).checked_sub(t),
            (area.y + area.height).checked_sub(t),
        ) else {
            break;
        };
        if left > right || top > bottom {
            break;
        }
        for x in left..=right {
            put(x, top);
            put(x, bottom);
        }
        for y in top..=bottom {
            put(left, y);
            put(right, y);
        }
    }
}
