//! Annotated heatmap rendering
//!
//! Paints a bucket grid as a PNG: one fixed-size square per cell, colored on
//! a reversed-viridis ramp from 0 up to the observed maximum, annotated with
//! the cell value. Grid row 0 (the lowest leniency bucket) paints at the
//! bottom of the image; missing cells stay a neutral gray with no
//! annotation.

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use std::fs;
use std::path::Path;

use crate::axes::GridAxes;
use crate::grid::BucketGrid;

const CELL_SIZE: u32 = 96; // pixels per bucket
const LEFT_MARGIN: u32 = 76; // leniency labels
const BOTTOM_MARGIN: u32 = 36; // exploration labels
const TOP_MARGIN: u32 = 40; // title line
const RIGHT_MARGIN: u32 = 16;

const BACKGROUND_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const MISSING_CELL_COLOR: Rgb<u8> = Rgb([230, 230, 230]);
const GRID_LINE_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const LABEL_COLOR: Rgb<u8> = Rgb([40, 40, 40]);

// Approximate advance width per glyph at a given scale, for centering text
// without measuring it
const GLYPH_ASPECT: f32 = 0.5;

/// Candidate system font paths, first readable one wins
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Viridis anchor colors, low end first
const VIRIDIS: [[u8; 3]; 9] = [
    [68, 1, 84],
    [72, 40, 120],
    [62, 74, 137],
    [49, 104, 142],
    [38, 130, 142],
    [31, 158, 137],
    [53, 183, 121],
    [110, 206, 88],
    [253, 231, 37],
];

/// Load an annotation font: an explicit path when given, otherwise the
/// first candidate system font that parses
pub fn load_font(path_override: Option<&str>) -> Result<FontVec, String> {
    if let Some(path) = path_override {
        return load_font_file(path);
    }
    for candidate in FONT_CANDIDATES {
        if let Ok(font) = load_font_file(candidate) {
            return Ok(font);
        }
    }
    Err("No usable system font found; pass --font <path to a .ttf/.otf file>".to_string())
}

fn load_font_file(path: &str) -> Result<FontVec, String> {
    let bytes = fs::read(path).map_err(|e| format!("Failed to read font {}: {}", path, e))?;
    FontVec::try_from_vec(bytes).map_err(|e| format!("Failed to load font {}: {}", path, e))
}

/// Sample the viridis ramp at `t` in 0..=1 (0 = dark purple, 1 = yellow)
fn viridis_color(t: f32) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0);
    let steps = (VIRIDIS.len() - 1) as f32;
    let position = t * steps;
    let low = position.floor() as usize;
    let high = (low + 1).min(VIRIDIS.len() - 1);
    let frac = position - low as f32;

    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * frac) as u8;
    Rgb([
        lerp(VIRIDIS[low][0], VIRIDIS[high][0]),
        lerp(VIRIDIS[low][1], VIRIDIS[high][1]),
        lerp(VIRIDIS[low][2], VIRIDIS[high][2]),
    ])
}

/// Map a cell value onto the reversed-viridis scale over `0..=max`: low
/// values read yellow, high values dark purple. A non-positive max
/// degenerates to the low end.
pub fn value_to_color(value: f64, max: f64) -> Rgb<u8> {
    let t = if max > 0.0 {
        (value / max).clamp(0.0, 1.0) as f32
    } else {
        0.0
    };
    viridis_color(1.0 - t)
}

/// Black or white annotation text depending on cell brightness
pub fn annotation_color(cell: Rgb<u8>) -> Rgb<u8> {
    let luminance =
        0.299 * cell.0[0] as f32 + 0.587 * cell.0[1] as f32 + 0.114 * cell.0[2] as f32;
    if luminance > 140.0 {
        Rgb([0, 0, 0])
    } else {
        Rgb([255, 255, 255])
    }
}

/// Pixel origin of a cell. Rows flip so that row 0 lands at the bottom.
fn cell_origin(row: usize, col: usize, rows: usize) -> (u32, u32) {
    let x = LEFT_MARGIN + col as u32 * CELL_SIZE;
    let y = TOP_MARGIN + (rows - 1 - row) as u32 * CELL_SIZE;
    (x, y)
}

/// Fill a cell with a solid color
fn fill_cell(img: &mut RgbImage, x_start: u32, y_start: u32, color: Rgb<u8>) {
    for dy in 0..CELL_SIZE {
        for dx in 0..CELL_SIZE {
            img.put_pixel(x_start + dx, y_start + dy, color);
        }
    }
}

fn draw_centered_text(
    img: &mut RgbImage,
    color: Rgb<u8>,
    center_x: i32,
    center_y: i32,
    scale: PxScale,
    font: &FontVec,
    text: &str,
) {
    let text_width = (text.len() as f32 * scale.x * GLYPH_ASPECT) as i32;
    let x = center_x - text_width / 2;
    let y = center_y - (scale.y / 2.0) as i32;
    draw_text_mut(img, color, x, y, scale, font, text);
}

/// Render one grid as an annotated heatmap PNG.
///
/// `max` is the upper bound of the color scale (the lower bound is fixed at
/// 0); callers pass the grid's observed maximum. Writes exactly one file.
pub fn render_heatmap(
    grid: &BucketGrid,
    axes: &GridAxes,
    max: f64,
    font: &FontVec,
    path: &Path,
    title: &str,
) -> Result<(), String> {
    if grid.rows() != axes.rows() || grid.cols() != axes.cols() {
        return Err(format!(
            "Grid shape {}x{} does not match the {}x{} axes",
            grid.rows(),
            grid.cols(),
            axes.rows(),
            axes.cols()
        ));
    }

    let img_width = LEFT_MARGIN + grid.cols() as u32 * CELL_SIZE + RIGHT_MARGIN;
    let img_height = TOP_MARGIN + grid.rows() as u32 * CELL_SIZE + BOTTOM_MARGIN;
    let mut img = RgbImage::new(img_width, img_height);

    for pixel in img.pixels_mut() {
        *pixel = BACKGROUND_COLOR;
    }

    let annotation_scale = PxScale::from(16.0);
    let label_scale = PxScale::from(14.0);
    let title_scale = PxScale::from(18.0);

    // Cells and per-cell annotations
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let (x, y) = cell_origin(row, col, grid.rows());
            match grid.get(row, col) {
                Some(value) => {
                    let color = value_to_color(value, max);
                    fill_cell(&mut img, x, y, color);
                    draw_centered_text(
                        &mut img,
                        annotation_color(color),
                        (x + CELL_SIZE / 2) as i32,
                        (y + CELL_SIZE / 2) as i32,
                        annotation_scale,
                        font,
                        &format!("{:.2}", value),
                    );
                }
                None => {
                    fill_cell(&mut img, x, y, MISSING_CELL_COLOR);
                }
            }
        }
    }

    // Thin separators between cells
    for col in 1..grid.cols() {
        let x = LEFT_MARGIN + col as u32 * CELL_SIZE;
        for y in TOP_MARGIN..TOP_MARGIN + grid.rows() as u32 * CELL_SIZE {
            img.put_pixel(x, y, GRID_LINE_COLOR);
        }
    }
    for row in 1..grid.rows() {
        let y = TOP_MARGIN + row as u32 * CELL_SIZE;
        for x in LEFT_MARGIN..LEFT_MARGIN + grid.cols() as u32 * CELL_SIZE {
            img.put_pixel(x, y, GRID_LINE_COLOR);
        }
    }

    // Leniency labels down the left edge, one per row
    for row in 0..grid.rows() {
        let (_, y) = cell_origin(row, 0, grid.rows());
        let label = axes.leniency.label(row);
        let text_width = (label.len() as f32 * label_scale.x * GLYPH_ASPECT) as i32;
        let x = (LEFT_MARGIN as i32 - text_width - 8).max(2);
        let text_y = (y + CELL_SIZE / 2) as i32 - (label_scale.y / 2.0) as i32;
        draw_text_mut(&mut img, LABEL_COLOR, x, text_y, label_scale, font, label);
    }

    // Exploration labels along the bottom edge, one per column
    let label_row_y = (TOP_MARGIN + grid.rows() as u32 * CELL_SIZE + 8) as i32;
    for col in 0..grid.cols() {
        let (x, _) = cell_origin(0, col, grid.rows());
        draw_centered_text(
            &mut img,
            LABEL_COLOR,
            (x + CELL_SIZE / 2) as i32,
            label_row_y + (label_scale.y / 2.0) as i32,
            label_scale,
            font,
            axes.exploration.label(col),
        );
    }

    // Title across the top
    draw_text_mut(
        &mut img,
        LABEL_COLOR,
        LEFT_MARGIN as i32,
        10,
        title_scale,
        font,
        title,
    );

    img.save(path)
        .map_err(|e| format!("Failed to save image {}: {}", path.display(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_endpoints() {
        // Low end of the reversed ramp is yellow, high end dark purple
        assert_eq!(value_to_color(0.0, 3.0), Rgb([253, 231, 37]));
        assert_eq!(value_to_color(3.0, 3.0), Rgb([68, 1, 84]));
    }

    #[test]
    fn test_values_above_max_clamp() {
        assert_eq!(value_to_color(10.0, 3.0), value_to_color(3.0, 3.0));
    }

    #[test]
    fn test_non_positive_max_degenerates_to_low_end() {
        assert_eq!(value_to_color(0.0, 0.0), Rgb([253, 231, 37]));
        assert_eq!(value_to_color(5.0, 0.0), Rgb([253, 231, 37]));
    }

    #[test]
    fn test_row_zero_paints_at_bottom() {
        let rows = 3;
        let (_, y_bottom) = cell_origin(0, 0, rows);
        let (_, y_top) = cell_origin(2, 0, rows);

        assert_eq!(y_top, TOP_MARGIN);
        assert_eq!(y_bottom, TOP_MARGIN + 2 * CELL_SIZE);
    }

    #[test]
    fn test_annotation_contrast() {
        // Dark purple cells get white text, yellow cells black text
        assert_eq!(annotation_color(Rgb([68, 1, 84])), Rgb([255, 255, 255]));
        assert_eq!(annotation_color(Rgb([253, 231, 37])), Rgb([0, 0, 0]));
    }
}
