//! Color ramps loaded from `.pal` files
//!
//! A palette file has three header lines followed by one
//! tab-separated `R G B` row per color, each channel in 0..=255.
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const HEADER_LINES: usize = 3;

/// The palette used when none is given on the command line
pub const DEFAULT_PALETTE: &str = include_str!("../palettes/default.pal");

/// An ordered list of colors with channels in `[0, 1]`
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    stops: Vec<[f64; 3]>,
}

impl ColorRamp {
    /// Create a ramp from normalized colors. At least one is required.
    pub fn new(stops: Vec<[f64; 3]>) -> Option<Self> {
        if stops.is_empty() {
            None
        } else {
            Some(ColorRamp { stops })
        }
    }

    /// Load a ramp from a palette file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::PaletteLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        text.parse().map_err(|reason| Error::PaletteLoad {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// The ramp bundled with the crate
    pub fn builtin() -> Result<Self> {
        DEFAULT_PALETTE.parse().map_err(|reason| Error::PaletteLoad {
            path: PathBuf::from("<builtin>"),
            reason,
        })
    }

    /// The colors, in file order
    pub fn stops(&self) -> &[[f64; 3]] {
        &self.stops
    }

    /// Number of colors
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Always false; a ramp holds at least one color
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Fractional index into the stops for a normalized value
    pub fn position(&self, t: f64) -> f64 {
        t.clamp(0.0, 1.0) * (self.stops.len() - 1) as f64
    }

    /// The color at a normalized value, interpolated between stops
    pub fn sample(&self, t: f64) -> [f64; 3] {
        let pos = self.position(t);
        let i = (pos.floor() as usize).min(self.stops.len() - 1);
        let frac = pos - i as f64;
        // NaN lands here too
        if i + 1 == self.stops.len() || !(frac > 0.0) {
            return self.stops[i];
        }
        let (a, b) = (self.stops[i], self.stops[i + 1]);
        [
            a[0] + frac * (b[0] - a[0]),
            a[1] + frac * (b[1] - a[1]),
            a[2] + frac * (b[2] - a[2]),
        ]
    }
}

fn parse_channel(field: &str) -> std::result::Result<f64, String> {
    let value: u8 = field
        .trim()
        .parse()
        .map_err(|_| format!("invalid channel value {:?}", field))?;
    Ok(f64::from(value) / 255.0)
}

impl FromStr for ColorRamp {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut stops = Vec::new();
        for (n, line) in s.lines().enumerate().skip(HEADER_LINES) {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != 3 {
                return Err(format!(
                    "line {}: expected 3 tab-separated values, found {}",
                    n + 1,
                    fields.len()
                ));
            }
            let color = [
                parse_channel(fields[0]).map_err(|e| format!("line {}: {}", n + 1, e))?,
                parse_channel(fields[1]).map_err(|e| format!("line {}: {}", n + 1, e))?,
                parse_channel(fields[2]).map_err(|e| format!("line {}: {}", n + 1, e))?,
            ];
            stops.push(color);
        }
        ColorRamp::new(stops).ok_or_else(|| "palette has no colors".to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_four_colors_in_order() {
        let text = "name\ncomment\nR\tG\tB\n255\t0\t0\n0\t255\t0\n0\t0\t255\n51\t102\t204\n";
        let ramp: ColorRamp = text.parse().unwrap();
        assert_eq!(ramp.len(), 4);
        assert_eq!(ramp.stops()[0], [1.0, 0.0, 0.0]);
        assert_eq!(ramp.stops()[2], [0.0, 0.0, 1.0]);
        assert_eq!(ramp.stops()[3], [0.2, 0.4, 0.8]);
    }

    #[test]
    fn test_headers_only_is_an_error() {
        assert!("a\nb\nc\n".parse::<ColorRamp>().is_err());
    }

    #[test]
    fn test_bad_rows() {
        assert!("a\nb\nc\n1\t2\n".parse::<ColorRamp>().is_err());
        assert!("a\nb\nc\n1\t2\tx\n".parse::<ColorRamp>().is_err());
        assert!("a\nb\nc\n1\t2\t256\n".parse::<ColorRamp>().is_err());
    }

    #[test]
    fn test_sample_interpolates() {
        let ramp = ColorRamp::new(vec![[0.0, 0.0, 0.0], [1.0, 0.5, 0.0], [1.0, 1.0, 1.0]]).unwrap();
        assert_eq!(ramp.sample(0.0), [0.0, 0.0, 0.0]);
        assert_eq!(ramp.sample(0.25), [0.5, 0.25, 0.0]);
        assert_eq!(ramp.sample(0.5), [1.0, 0.5, 0.0]);
        assert_eq!(ramp.sample(1.0), [1.0, 1.0, 1.0]);
        assert_eq!(ramp.sample(7.0), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_single_stop() {
        let ramp = ColorRamp::new(vec![[0.1, 0.2, 0.3]]).unwrap();
        assert_eq!(ramp.sample(0.7), [0.1, 0.2, 0.3]);
        assert_eq!(ramp.sample(1.0), [0.1, 0.2, 0.3]);
        assert_eq!(ramp.sample(f64::NAN), [0.1, 0.2, 0.3]);
        assert!(ColorRamp::new(vec![]).is_none());
    }

    #[test]
    fn test_sample_nan_is_first_color() {
        let ramp = ColorRamp::new(vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]).unwrap();
        assert_eq!(ramp.sample(f64::NAN), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_builtin_palette() {
        let ramp = ColorRamp::builtin().unwrap();
        assert_eq!(ramp.len(), 10);
    }

    #[test]
    fn test_load_four_colors_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("depth.pal");
        std::fs::write(
            &path,
            "depth\ncreated by hand\nR\tG\tB\n255\t0\t0\n0\t255\t0\n0\t0\t255\n51\t102\t204\n",
        )
        .unwrap();

        let ramp = ColorRamp::load(&path).unwrap();
        assert_eq!(
            ramp.stops(),
            &[
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
                [0.2, 0.4, 0.8]
            ]
        );
    }

    #[test]
    fn test_missing_file() {
        let err = ColorRamp::load("does/not/exist.pal").unwrap_err();
        assert!(matches!(err, Error::PaletteLoad { .. }));
    }
}
