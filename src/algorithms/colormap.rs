//! Mapping depths to colors
use crate::model::DepthGrid;
use crate::palette::ColorRamp;
use image::{Rgba, RgbaImage};

/// Scale a depth into `[0, 1]` against the grid's range
///
/// A grid with a single depth maps everything to 0.
pub fn normalize(depth: f64, (lo, hi): (f64, f64)) -> f64 {
    if hi > lo {
        (depth - lo) / (hi - lo)
    } else {
        0.0
    }
}

/// Color every valid cell through the ramp
///
/// Depths are normalized against the minimum and maximum of the valid
/// cells. Missing cells are fully transparent.
pub fn color_map(grid: &DepthGrid, ramp: &ColorRamp) -> RgbaImage {
    let range = grid.range().unwrap_or((0.0, 0.0));
    let mut img = RgbaImage::new(grid.cols() as u32, grid.rows() as u32);

    for (x, y, px) in img.enumerate_pixels_mut() {
        if let Some(depth) = grid.get(y as usize, x as usize) {
            let [r, g, b] = ramp.sample(normalize(depth, range));
            *px = Rgba([to_byte(r), to_byte(g), to_byte(b), u8::MAX]);
        }
    }
    img
}

fn to_byte(channel: f64) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}
