//! Synthetic relief shading
use crate::model::DepthGrid;
use ndarray::Array2;

/// Light direction and vertical exaggeration for a hillshade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadeParams {
    /// Direction the light comes from, in degrees clockwise from north
    pub azimuth: f64,
    /// Height of the light above the horizon, in degrees
    pub elevation: f64,
    /// Multiplier applied to the surface before taking slopes
    pub exaggeration: f64,
    /// Distance between neighbouring cells
    pub cell_size: f64,
}

impl ShadeParams {
    /// Bright, high-contrast shading for when it is the only layer
    ///
    /// Depths increase downward, so the surface is negated to light
    /// it as terrain.
    pub fn grayscale(shade_scale: f64) -> Self {
        ShadeParams {
            azimuth: 45.0,
            elevation: 30.0,
            exaggeration: -shade_scale,
            cell_size: 1.0,
        }
    }

    /// Dark, subtle shading for blending underneath a color layer
    pub fn blend(shade_scale: f64) -> Self {
        ShadeParams {
            azimuth: 45.0,
            elevation: 5.0,
            exaggeration: shade_scale,
            cell_size: 1.0,
        }
    }
}

// Central difference where both neighbours exist, one-sided otherwise
fn derivative(prev: Option<f64>, here: f64, next: Option<f64>, h: f64) -> f64 {
    match (prev, next) {
        (Some(p), Some(n)) => (n - p) / (2.0 * h),
        (Some(p), None) => (here - p) / h,
        (None, Some(n)) => (n - here) / h,
        (None, None) => 0.0,
    }
}

/// Illumination intensity of every cell, 0 to 255
///
/// Missing cells are black.
pub fn hillshade(grid: &DepthGrid, params: &ShadeParams) -> Array2<u8> {
    let (rows, cols) = (grid.rows(), grid.cols());
    let azimuth = params.azimuth.to_radians();
    let zenith = (90.0 - params.elevation).to_radians();
    let h = params.cell_size;

    Array2::from_shape_fn((rows, cols), |(i, j)| {
        let Some(z) = grid.get(i, j) else {
            return 0;
        };
        let left = j.checked_sub(1).and_then(|jj| grid.get(i, jj));
        let up = i.checked_sub(1).and_then(|ii| grid.get(ii, j));
        let dzdx = params.exaggeration * derivative(left, z, grid.get(i, j + 1), h);
        let dzdy = params.exaggeration * derivative(up, z, grid.get(i + 1, j), h);

        let slope = dzdx.hypot(dzdy).atan();
        let aspect = (-dzdx).atan2(dzdy);
        let intensity = zenith.cos() * slope.cos()
            + zenith.sin() * slope.sin() * (azimuth - aspect).cos();
        (255.0 * intensity).clamp(0.0, 255.0) as u8
    })
}
