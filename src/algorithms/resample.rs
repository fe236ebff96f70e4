//! Resampling pings onto a regular, nearly isometric grid
use crate::error::Result;
use crate::model::{DepthGrid, DepthPing, PingRecord, Resolution};
use crate::source::PingSource;
use std::collections::VecDeque;
use time::OffsetDateTime;

/// `n` evenly spaced values from `start` to `stop` inclusive
///
/// The last value is exactly `stop`, so it never falls outside an
/// interpolation domain through rounding.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Piecewise-linear interpolation of `(xp, fp)` at `x`
///
/// `xp` must be ascending. Points outside `[xp[0], xp[n-1]]` are `None`;
/// there is no extrapolation.
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> Option<f64> {
    let n = xp.len().min(fp.len());
    if n == 0 || !(x >= xp[0] && x <= xp[n - 1]) {
        return None;
    }
    let k = xp[..n].partition_point(|&v| v < x);
    if xp[k] == x {
        return Some(fp[k]);
    }
    let (x0, x1) = (xp[k - 1], xp[k]);
    let t = (x - x0) / (x1 - x0);
    Some(fp[k - 1] + t * (fp[k] - fp[k - 1]))
}

/// Interpolate samples taken at positions `0, 1, ..., n-1`
///
/// A position that needs a missing sample is itself missing.
pub fn interp_uniform(x: f64, samples: &[Option<f64>]) -> Option<f64> {
    let n = samples.len();
    if n == 0 || !(x >= 0.0 && x <= (n - 1) as f64) {
        return None;
    }
    let i = x.floor() as usize;
    let t = x - i as f64;
    if t == 0.0 {
        return samples[i];
    }
    let (a, b) = (samples[i]?, samples[i + 1]?);
    Some(a + t * (b - a))
}

/// Resample one ping onto the across-track axis
///
/// The transducer depth is added to every sounding first so that
/// depths are relative to the datum.
pub fn resample_ping(ping: &DepthPing, axis: &[f64]) -> Vec<Option<f64>> {
    let mut beams = ping.beams.clone();
    beams.sort_by(|a, b| a.across_track.total_cmp(&b.across_track));
    let xp: Vec<f64> = beams.iter().map(|b| b.across_track).collect();
    let fp: Vec<f64> = beams
        .iter()
        .map(|b| b.depth + ping.transducer_depth)
        .collect();

    axis.iter().map(|&x| interp(x, &xp, &fp)).collect()
}

/// Read every multibeam ping and lay it on a regular across-track axis
///
/// The axis has `beam_count * zoom` points spanning the extents found by
/// the first pass. The most recent ping ends up in row 0.
pub fn resample_pings<S: PingSource + ?Sized>(
    source: &mut S,
    resolution: &Resolution,
    zoom: usize,
) -> Result<DepthGrid> {
    let width = resolution.beam_count * zoom;
    let axis = linspace(resolution.left_extent, resolution.right_extent, width);
    let mut progress = Progress::new(source.estimated_record_count());

    let mut rows = VecDeque::with_capacity(resolution.ping_count);
    while let Some(rec) = source.next_record() {
        if let PingRecord::Depth(ping) = rec? {
            if ping.is_multibeam() {
                rows.push_front(resample_ping(&ping, &axis));
            }
        }
        if let Some(percent) = progress.record(source.current_timestamp()) {
            log::info!("Decoding: {:.1}%", percent);
        }
    }
    log::info!("Decoding: 100.0% done, {} pings", rows.len());

    let mut grid = DepthGrid::new(rows.len(), width);
    for (i, row) in rows.iter().enumerate() {
        grid.set_row(i, row);
    }
    Ok(grid)
}

// Heartbeat for a pass: fires when the record clock sits on a multiple
// of 30 seconds, once per such second.
struct Progress {
    total: usize,
    records: usize,
    last_report: Option<i64>,
}

impl Progress {
    fn new(total: usize) -> Self {
        Progress {
            total: total.max(1),
            records: 0,
            last_report: None,
        }
    }

    // Count one record and return the percentage read if it is time to report
    fn record(&mut self, timestamp: Option<OffsetDateTime>) -> Option<f64> {
        self.records += 1;
        let second = timestamp?.unix_timestamp();
        if second % 30 != 0 || self.last_report == Some(second) {
            return None;
        }
        self.last_report = Some(second);
        Some(100.0 * self.records as f64 / self.total as f64)
    }
}

/// Stretch a grid along track by `factor`
///
/// Each column of `n` samples is resampled to `round(n * factor)` points
/// evenly spread over the original samples. Exact zeros are masked
/// afterwards.
pub fn stretch_along_track(grid: &DepthGrid, factor: f64) -> DepthGrid {
    let rows = grid.rows();
    let out_rows = if factor.is_finite() && factor > 0.0 {
        (rows as f64 * factor).round() as usize
    } else {
        0
    };
    let positions = linspace(0.0, rows.saturating_sub(1) as f64, out_rows);

    let mut stretched = DepthGrid::new(out_rows, grid.cols());
    for j in 0..grid.cols() {
        let column = grid.column(j);
        for (i, &y) in positions.iter().enumerate() {
            stretched.set(i, j, interp_uniform(y, &column));
        }
    }
    stretched.mask_zeros();
    stretched
}

/// Both resampling passes: across track, then along track
pub fn resample<S: PingSource + ?Sized>(
    source: &mut S,
    resolution: &Resolution,
    zoom: usize,
) -> Result<DepthGrid> {
    let grid = resample_pings(source, resolution, zoom)?;
    let factor = resolution.iso_stretch_factor(zoom);
    log::debug!(
        "stretching {} rows by {:.3} along track",
        grid.rows(),
        factor
    );
    Ok(stretch_along_track(&grid, factor))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algorithms::resolution::estimate_resolution;
    use crate::model::Beam;
    use crate::source::MemorySource;
    use approx::assert_abs_diff_eq;
    use time::Duration;

    fn ping(transducer_depth: f64, beams: &[(f64, f64)]) -> DepthPing {
        DepthPing::new(
            OffsetDateTime::UNIX_EPOCH,
            transducer_depth,
            beams.iter().map(|&(x, z)| Beam::new(x, z)).collect(),
        )
    }

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(-1.0, 1.0, 5), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_interp_no_extrapolation() {
        let xp = [0.0, 10.0, 20.0];
        let fp = [1.0, 2.0, 4.0];
        assert_eq!(interp(-0.1, &xp, &fp), None);
        assert_eq!(interp(20.1, &xp, &fp), None);
        assert_eq!(interp(0.0, &xp, &fp), Some(1.0));
        assert_eq!(interp(5.0, &xp, &fp), Some(1.5));
        assert_eq!(interp(15.0, &xp, &fp), Some(3.0));
        assert_eq!(interp(20.0, &xp, &fp), Some(4.0));
        assert_eq!(interp(f64::NAN, &xp, &fp), None);
    }

    #[test]
    fn test_interp_uniform_missing_neighbours() {
        let s = [Some(1.0), None, Some(3.0)];
        assert_eq!(interp_uniform(0.0, &s), Some(1.0));
        assert_eq!(interp_uniform(0.5, &s), None);
        assert_eq!(interp_uniform(1.0, &s), None);
        assert_eq!(interp_uniform(2.0, &s), Some(3.0));
        assert_eq!(interp_uniform(2.5, &s), None);
    }

    #[test]
    fn test_resample_uniform_ping_is_near_identity() {
        let p = ping(0.0, &[(-40.0, 10.0), (-20.0, 12.0), (0.0, 15.0), (20.0, 11.0), (40.0, 9.0)]);
        let axis = linspace(-40.0, 40.0, 5);
        let row = resample_ping(&p, &axis);
        for (got, want) in row.iter().zip([10.0, 12.0, 15.0, 11.0, 9.0]) {
            assert_abs_diff_eq!(got.unwrap(), want, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_resample_adds_transducer_depth_and_masks_outside() {
        let p = ping(2.5, &[(-10.0, 20.0), (10.0, 30.0)]);
        let axis = linspace(-20.0, 20.0, 5);
        let row = resample_ping(&p, &axis);
        assert_eq!(row, vec![None, Some(22.5), Some(27.5), Some(32.5), None]);
    }

    #[test]
    fn test_latest_ping_is_row_zero() {
        let mut src = MemorySource::new(vec![
            PingRecord::Depth(ping(0.0, &[(-1.0, 10.0), (1.0, 10.0)])),
            PingRecord::Depth(ping(0.0, &[(-1.0, 20.0), (1.0, 20.0)])),
            PingRecord::Depth(ping(0.0, &[(-1.0, 30.0), (1.0, 30.0)])),
        ]);
        let res = estimate_resolution(&mut src).unwrap();
        src.rewind().unwrap();
        let grid = resample_pings(&mut src, &res, 2).unwrap();
        assert_eq!((grid.rows(), grid.cols()), (3, 4));
        assert_eq!(grid.get(0, 0), Some(30.0));
        assert_eq!(grid.get(2, 3), Some(10.0));
    }

    #[test]
    fn test_stretch_dimensions_and_values() {
        let grid = DepthGrid::from_rows(&[vec![Some(10.0)], vec![Some(20.0)], vec![Some(30.0)]]);
        let s = stretch_along_track(&grid, 5.0 / 3.0);
        assert_eq!((s.rows(), s.cols()), (5, 1));
        let col: Vec<f64> = s.column(0).into_iter().map(Option::unwrap).collect();
        assert_eq!(col, vec![10.0, 15.0, 20.0, 25.0, 30.0]);
    }

    #[test]
    fn test_stretch_masks_zero_depths() {
        let grid = DepthGrid::from_rows(&[vec![Some(0.0), Some(4.0)], vec![Some(0.0), Some(4.0)]]);
        let s = stretch_along_track(&grid, 1.0);
        assert_eq!(s.get(0, 0), None);
        assert_eq!(s.get(1, 0), None);
        assert_eq!(s.get(0, 1), Some(4.0));
    }

    #[test]
    fn test_stretch_degenerate_factor() {
        let grid = DepthGrid::from_rows(&[vec![Some(1.0)]]);
        assert_eq!(stretch_along_track(&grid, 0.0).rows(), 0);
        assert_eq!(stretch_along_track(&grid, f64::NAN).rows(), 0);
    }

    #[test]
    fn test_progress_reports_on_half_minutes() {
        let t0 = OffsetDateTime::UNIX_EPOCH + Duration::seconds(60);
        let mut progress = Progress::new(5);
        assert_eq!(progress.record(None), None);
        assert_eq!(progress.record(Some(t0)), Some(40.0));
        assert_eq!(progress.record(Some(t0 + Duration::milliseconds(500))), None);
        assert_eq!(progress.record(Some(t0 + Duration::seconds(1))), None);
        assert_eq!(progress.record(Some(t0 + Duration::seconds(30))), Some(100.0));
    }

    #[test]
    fn test_progress_with_unknown_total() {
        let mut progress = Progress::new(0);
        assert_eq!(
            progress.record(Some(OffsetDateTime::UNIX_EPOCH)),
            Some(100.0)
        );
    }
}
