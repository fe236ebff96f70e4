//! Combining shading and color into the final raster
use image::{imageops, Rgb, RgbImage, RgbaImage};
use ndarray::Array2;

/// The shading on its own, as a gray RGB image
pub fn grayscale(shade: &Array2<u8>) -> RgbImage {
    let (rows, cols) = shade.dim();
    RgbImage::from_fn(cols as u32, rows as u32, |x, y| {
        let v = shade[[y as usize, x as usize]];
        Rgb([v, v, v])
    })
}

/// Subtract the shading from every channel of the color layer
///
/// Channels saturate at zero and alpha is dropped. Both inputs must
/// have the same dimensions.
pub fn subtract(color: &RgbaImage, shade: &Array2<u8>) -> RgbImage {
    RgbImage::from_fn(color.width(), color.height(), |x, y| {
        let c = color.get_pixel(x, y);
        let s = shade[[y as usize, x as usize]];
        Rgb([
            c[0].saturating_sub(s),
            c[1].saturating_sub(s),
            c[2].saturating_sub(s),
        ])
    })
}

/// Compose the waterfall from its layers
///
/// Without a color layer the shading is used directly. With `rotate` the
/// result is turned a quarter clockwise so it reads left to right.
pub fn composite(shade: &Array2<u8>, color: Option<&RgbaImage>, rotate: bool) -> RgbImage {
    let img = match color {
        Some(color) => subtract(color, shade),
        None => grayscale(shade),
    };
    if rotate {
        imageops::rotate90(&img)
    } else {
        img
    }
}
