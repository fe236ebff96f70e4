//! Turning a ping stream into a finished waterfall image
use crate::algorithms::annotate::{annotate, BitmapFont, LabelRenderer};
use crate::algorithms::colormap::color_map;
use crate::algorithms::composite::composite;
use crate::algorithms::hillshade::{hillshade, ShadeParams};
use crate::algorithms::resample::resample;
use crate::algorithms::resolution::estimate_resolution;
use crate::error::{Error, Result};
use crate::model::Resolution;
use crate::palette::ColorRamp;
use crate::parser::all;
use crate::source::PingSource;
use image::RgbImage;
use std::path::{Path, PathBuf};

/// Knobs for rendering a waterfall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterfallOptions {
    /// Vertical exaggeration of the shading
    pub shade_scale: f64,
    /// Turn the image so it reads left to right
    pub rotate: bool,
    /// Output pixels per beam across track
    pub zoom: usize,
}

impl Default for WaterfallOptions {
    fn default() -> Self {
        WaterfallOptions {
            shade_scale: 1.0,
            rotate: false,
            zoom: 4,
        }
    }
}

/// How depth is shown
#[derive(Debug, Clone, Copy)]
pub enum Mode<'a> {
    /// Shading only
    Grayscale,
    /// Depth colors darkened by shading
    Color(&'a ColorRamp),
}

/// A rendered waterfall and what was learned about its file
#[derive(Debug)]
pub struct Waterfall {
    /// The composed and annotated image
    pub image: RgbImage,
    /// The first-pass estimate
    pub resolution: Resolution,
    /// Along-track rows per ping
    pub stretch: f64,
}

/// Render a waterfall from a ping source
///
/// The source is read twice, rewinding in between. A source without
/// multibeam pings gives [`Error::EmptyInput`].
pub fn render<S: PingSource + ?Sized>(
    source: &mut S,
    mode: Mode<'_>,
    options: &WaterfallOptions,
    renderer: &dyn LabelRenderer,
) -> Result<Waterfall> {
    let resolution = estimate_resolution(source)?;
    log::info!(
        "XRes {:.2} YRes {:.2} beamCount {} leftExtent {:.2}, rightExtent {:.2}",
        resolution.x_resolution,
        resolution.y_resolution,
        resolution.beam_count,
        resolution.left_extent,
        resolution.right_extent
    );
    if resolution.is_empty() {
        return Err(Error::EmptyInput);
    }
    if !(resolution.y_resolution > 0.0) {
        log::warn!("navigation shows no movement; assuming pings are as far apart as beams");
    }

    source.rewind()?;
    let stretch = resolution.iso_stretch_factor(options.zoom);
    let grid = resample(source, &resolution, options.zoom)?;
    if grid.rows() == 0 || grid.cols() == 0 {
        return Err(Error::EmptyInput);
    }

    let mut image = match mode {
        Mode::Grayscale => {
            let shade = hillshade(&grid, &ShadeParams::grayscale(options.shade_scale));
            composite(&shade, None, options.rotate)
        }
        Mode::Color(ramp) => {
            let shade = hillshade(&grid, &ShadeParams::blend(options.shade_scale));
            let color = color_map(&grid, ramp);
            composite(&shade, Some(&color), options.rotate)
        }
    };
    let labels = annotate(
        &mut image,
        &resolution.navigation,
        stretch,
        options.rotate,
        renderer,
    )?;
    log::debug!(
        "{}x{} image with {} labels",
        image.width(),
        image.height(),
        labels
    );

    Ok(Waterfall {
        image,
        resolution,
        stretch,
    })
}

/// Where the image for an input file is written
pub fn output_path<P: AsRef<Path>>(input: P) -> PathBuf {
    input.as_ref().with_extension("png")
}

/// Render an .all file and write the PNG next to it
pub fn process_file<P: AsRef<Path>>(
    path: P,
    mode: Mode<'_>,
    options: &WaterfallOptions,
) -> Result<PathBuf> {
    let path = path.as_ref();
    log::info!("Processing file: {}", path.display());

    let mut file = all::File::open(path)?;
    let waterfall = render(&mut file, mode, options, &BitmapFont::default())?;

    let out = output_path(path);
    waterfall.image.save(&out)?;
    log::info!("Saved to: {}", out.display());
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{Beam, DepthPing, PingRecord, Position};
    use crate::source::MemorySource;
    use time::{Duration, OffsetDateTime};

    fn scenario(pings: usize, with_navigation: bool) -> MemorySource {
        let t0 = OffsetDateTime::UNIX_EPOCH;
        let mut records = Vec::new();
        for i in 0..pings {
            if with_navigation {
                records.push(PingRecord::Position(Position::new(
                    t0 + Duration::seconds(i as i64),
                    0.0001 * i as f64,
                    0.0,
                )));
            }
            let beams = [-40.0, -20.0, 0.0, 20.0, 40.0]
                .iter()
                .map(|&x| Beam::new(x, 100.0))
                .collect();
            records.push(PingRecord::Depth(DepthPing::new(
                t0 + Duration::seconds(i as i64),
                0.0,
                beams,
            )));
        }
        MemorySource::new(records)
    }

    #[test]
    fn test_flat_seafloor_is_one_color() {
        let ramp = ColorRamp::new(vec![[0.2, 0.6, 1.0], [1.0, 0.0, 0.0]]).unwrap();
        let mut src = scenario(10, true);
        let wf = render(
            &mut src,
            Mode::Color(&ramp),
            &WaterfallOptions::default(),
            &BitmapFont::default(),
        )
        .unwrap();

        assert_eq!(wf.image.width(), 20);
        assert_eq!(wf.image.height(), (10.0 * wf.stretch).round() as u32);
        let first = *wf.image.get_pixel(0, 0);
        assert!(wf.image.pixels().all(|p| *p == first));
    }

    #[test]
    fn test_rotation_swaps_dimensions() {
        let mut src = scenario(10, false);
        let options = WaterfallOptions {
            rotate: true,
            ..Default::default()
        };
        let wf = render(&mut src, Mode::Grayscale, &options, &BitmapFont::default()).unwrap();
        assert_eq!(wf.stretch, 4.0);
        assert_eq!(wf.image.dimensions(), (40, 20));
    }

    #[test]
    fn test_empty_source() {
        let mut src = MemorySource::new(vec![]);
        let res = render(
            &mut src,
            Mode::Grayscale,
            &WaterfallOptions::default(),
            &BitmapFont::default(),
        );
        assert!(matches!(res, Err(Error::EmptyInput)));
    }
}
