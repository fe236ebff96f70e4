//! Time labels along the waterfall
use crate::error::{Error, Result};
use crate::model::NavigationFix;
use image::{imageops, GrayImage, Luma, RgbImage};
use time::format_description::FormatItem;
use time::macros::format_description;

/// Fixes are labeled every this many pings
pub const LABEL_INTERVAL: usize = 100;

const LABEL_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second]");
const LABEL_COLOR: [u8; 3] = [0, 0, 255];
const TICK_LENGTH: u32 = 20;

/// Something that can turn text into a coverage mask
pub trait LabelRenderer {
    /// Rasterize `text` and turn it clockwise by `rotation` degrees
    ///
    /// The unrotated strip carries a tick along its top edge that marks
    /// the labeled position.
    fn render_label(&self, text: &str, rotation: i32) -> Result<GrayImage>;
}

/// A small built-in bitmap font covering digits and time separators
#[derive(Debug, Clone, Copy)]
pub struct BitmapFont {
    scale: u32,
}

impl Default for BitmapFont {
    fn default() -> Self {
        BitmapFont { scale: 2 }
    }
}

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;

// Rows top to bottom, bit 4 is the leftmost column
fn glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        ' ' => [0x00; 7],
        _ => return None,
    };
    Some(rows)
}

impl BitmapFont {
    /// A font drawn at `scale` pixels per glyph dot
    pub fn new(scale: u32) -> Self {
        BitmapFont {
            scale: scale.max(1),
        }
    }

    fn render(&self, text: &str) -> Result<GrayImage> {
        let glyphs = text
            .chars()
            .map(|c| glyph(c).ok_or_else(|| Error::Annotation(format!("no glyph for {:?}", c))))
            .collect::<Result<Vec<_>>>()?;

        let advance = (GLYPH_WIDTH + 1) * self.scale;
        let top = 2 * self.scale;
        let width = (advance * glyphs.len() as u32).max(TICK_LENGTH);
        let height = top + GLYPH_HEIGHT * self.scale;

        let mut strip = GrayImage::new(width, height);
        for x in 0..TICK_LENGTH {
            strip.put_pixel(x, 0, Luma([u8::MAX]));
        }
        for (n, rows) in glyphs.iter().enumerate() {
            let left = n as u32 * advance;
            for (r, bits) in rows.iter().enumerate() {
                for c in 0..GLYPH_WIDTH {
                    if (*bits >> (GLYPH_WIDTH - 1 - c)) & 1 == 0 {
                        continue;
                    }
                    for dy in 0..self.scale {
                        for dx in 0..self.scale {
                            let x = left + c * self.scale + dx;
                            let y = top + r as u32 * self.scale + dy;
                            strip.put_pixel(x, y, Luma([u8::MAX]));
                        }
                    }
                }
            }
        }
        Ok(strip)
    }
}

impl LabelRenderer for BitmapFont {
    fn render_label(&self, text: &str, rotation: i32) -> Result<GrayImage> {
        let strip = self.render(text)?;
        match rotation.rem_euclid(360) {
            0 => Ok(strip),
            90 => Ok(imageops::rotate90(&strip)),
            180 => Ok(imageops::rotate180(&strip)),
            270 => Ok(imageops::rotate270(&strip)),
            _ => Err(Error::Annotation(format!(
                "unsupported label rotation of {} degrees",
                rotation
            ))),
        }
    }
}

/// Blend a coverage mask onto the image in the label color
///
/// Parts of the mask outside the image are clipped.
pub fn paste_label(img: &mut RgbImage, mask: &GrayImage, x0: i64, y0: i64) {
    for (x, y, coverage) in mask.enumerate_pixels() {
        let (x, y) = (x0 + i64::from(x), y0 + i64::from(y));
        if x < 0 || y < 0 || x >= i64::from(img.width()) || y >= i64::from(img.height()) {
            continue;
        }
        let a = u16::from(coverage[0]);
        if a == 0 {
            continue;
        }
        let px = img.get_pixel_mut(x as u32, y as u32);
        for (under, over) in px.0.iter_mut().zip(LABEL_COLOR) {
            *under = ((u16::from(*under) * (255 - a) + u16::from(over) * a) / 255) as u8;
        }
    }
}

/// Label the waterfall with the time of every hundredth ping
///
/// `rotated` tells which way the along-track axis runs: left to right
/// for rotated output, bottom to top otherwise. Labels are placed at
/// `ping_index * stretch` pixels along it.
pub fn annotate(
    img: &mut RgbImage,
    navigation: &[NavigationFix],
    stretch: f64,
    rotated: bool,
    renderer: &dyn LabelRenderer,
) -> Result<usize> {
    let mut last_labeled = 0;
    let mut labels = 0;

    for fix in navigation {
        if fix.ping_index % LABEL_INTERVAL != 0 || fix.ping_index == last_labeled {
            continue;
        }
        let text = fix
            .timestamp
            .format(LABEL_FORMAT)
            .map_err(|e| Error::Annotation(e.to_string()))?;
        let offset = (fix.ping_index as f64 * stretch).round() as i64;

        if rotated {
            let mask = renderer.render_label(&text, 90)?;
            paste_label(img, &mask, offset, 0);
        } else {
            let mask = renderer.render_label(&text, 0)?;
            paste_label(img, &mask, 0, i64::from(img.height()) - 1 - offset);
        }
        last_labeled = fix.ping_index;
        labels += 1;
    }
    Ok(labels)
}
