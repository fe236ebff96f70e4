//! A depth raster with an explicit validity mask

use ndarray::{Array2, ArrayView1, Axis};

/// Depths indexed `[along_track_row, across_track_column]`
///
/// Each cell carries a validity bit alongside its value. Invalid cells
/// hold `0.0` and are excluded from statistics and rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthGrid {
    values: Array2<f64>,
    valid: Array2<bool>,
}

impl DepthGrid {
    /// A grid of the given shape with every cell invalid
    pub fn new(rows: usize, cols: usize) -> DepthGrid {
        DepthGrid {
            values: Array2::zeros((rows, cols)),
            valid: Array2::from_elem((rows, cols), false),
        }
    }

    /// Build a grid from raw values, treating exact zeros as missing
    pub fn from_values(values: Array2<f64>) -> DepthGrid {
        let valid = values.mapv(|v| v != 0.0);
        DepthGrid { values, valid }
    }

    /// Build a grid from rows of optional samples
    ///
    /// Rows shorter than the first are padded with invalid cells.
    pub fn from_rows<R: AsRef<[Option<f64>]>>(rows: &[R]) -> DepthGrid {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut grid = DepthGrid::new(rows.len(), cols);
        for (i, row) in rows.iter().enumerate() {
            grid.set_row(i, row.as_ref());
        }
        grid
    }

    /// Overwrite row `i` with the given samples
    pub fn set_row(&mut self, i: usize, samples: &[Option<f64>]) {
        for (j, sample) in samples.iter().take(self.cols()).enumerate() {
            self.set(i, j, *sample);
        }
    }

    /// Store a single sample. `None` marks the cell as missing.
    pub fn set(&mut self, row: usize, col: usize, sample: Option<f64>) {
        match sample {
            Some(v) => {
                self.values[[row, col]] = v;
                self.valid[[row, col]] = true;
            }
            None => {
                self.values[[row, col]] = 0.0;
                self.valid[[row, col]] = false;
            }
        }
    }

    /// The sample at a cell, or `None` when the cell is missing or out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        match self.valid.get([row, col]) {
            Some(true) => Some(self.values[[row, col]]),
            _ => None,
        }
    }

    /// Number of along-track rows
    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of across-track columns
    pub fn cols(&self) -> usize {
        self.values.ncols()
    }

    /// Raw values, with `0.0` in missing cells
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// The validity mask
    pub fn mask(&self) -> &Array2<bool> {
        &self.valid
    }

    /// Column `j` as optional samples
    pub fn column(&self, j: usize) -> Vec<Option<f64>> {
        let values: ArrayView1<f64> = self.values.index_axis(Axis(1), j);
        let valid = self.valid.index_axis(Axis(1), j);
        values
            .iter()
            .zip(valid.iter())
            .map(|(&v, &ok)| if ok { Some(v) } else { None })
            .collect()
    }

    /// The number of valid cells
    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|&&ok| ok).count()
    }

    /// Minimum and maximum of the valid cells
    pub fn range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .zip(self.valid.iter())
            .filter(|(_, ok)| **ok)
            .fold(None, |acc, (&v, _)| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Mark every exact-zero cell as missing
    ///
    /// A sounding of exactly zero depth is indistinguishable from
    /// "no data" once it has passed through the sentinel, so it is
    /// masked as well.
    pub fn mask_zeros(&mut self) {
        ndarray::Zip::from(&mut self.valid)
            .and(&self.values)
            .for_each(|ok, &v| {
                if v == 0.0 {
                    *ok = false;
                }
            });
    }
}
