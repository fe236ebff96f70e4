//! Render waterfalls for a batch of files
use crate::error::{Error, Result};
use crate::palette::ColorRamp;
use crate::waterfall::{process_file, Mode, WaterfallOptions};
use std::path::PathBuf;

/// Everything the batch needs from the command line
#[derive(Debug, Clone)]
pub struct Settings {
    /// Rendering knobs
    pub options: WaterfallOptions,
    /// Shade in gray instead of coloring by depth
    pub gray: bool,
    /// Palette file, or `None` for the bundled one
    pub palette: Option<PathBuf>,
    /// Abort the batch on the first failure
    pub fail_fast: bool,
}

/// The outcome of a batch
#[derive(Debug, Default)]
pub struct Summary {
    /// Images written
    pub written: Vec<PathBuf>,
    /// Files without usable pings
    pub skipped: usize,
    /// Files that failed
    pub failed: usize,
}

/// Expand glob patterns into paths
///
/// A pattern that matches nothing is kept as a literal path so that
/// opening it reports a useful error.
pub fn expand_inputs(patterns: &[String]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let found: Vec<PathBuf> = match glob::glob(pattern) {
            Ok(entries) => entries
                .filter_map(|entry| match entry {
                    Ok(path) => Some(path),
                    Err(e) => {
                        log::warn!("{}", e);
                        None
                    }
                })
                .collect(),
            Err(e) => {
                log::debug!("{:?} is not a glob pattern: {}", pattern, e);
                Vec::new()
            }
        };
        if found.is_empty() {
            paths.push(PathBuf::from(pattern));
        } else {
            paths.extend(found);
        }
    }
    paths
}

/// Render every input, one file at a time
///
/// The palette is loaded once, before any file is read. Files without
/// usable pings are skipped. Other failures are reported and the batch
/// moves on, unless `fail_fast` is set.
pub fn waterfall(patterns: &[String], settings: &Settings) -> Result<Summary> {
    let ramp = if settings.gray {
        None
    } else {
        Some(match &settings.palette {
            Some(path) => ColorRamp::load(path)?,
            None => ColorRamp::builtin()?,
        })
    };
    let mode = match &ramp {
        Some(ramp) => Mode::Color(ramp),
        None => Mode::Grayscale,
    };
    log::info!("processing with settings: {:?}", settings);

    let paths = expand_inputs(patterns);
    let mut summary = Summary::default();
    for path in &paths {
        match process_file(path, mode, &settings.options) {
            Ok(out) => summary.written.push(out),
            Err(Error::EmptyInput) => {
                log::warn!(
                    "No data to process, skipping empty file {}",
                    path.display()
                );
                summary.skipped += 1;
            }
            Err(e) if settings.fail_fast => return Err(e),
            Err(e) => {
                log::error!("{}: {}", path.display(), e);
                summary.failed += 1;
            }
        }
    }

    if summary.failed > 0 {
        return Err(Error::BatchFailed {
            failed: summary.failed,
            total: paths.len(),
        });
    }
    Ok(summary)
}
