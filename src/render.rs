use crate::color::RgbColor;
use crate::error::{Result, SwatchError};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};

/// One `#rrggbb` line per color.
pub fn render_txt(colors: &[RgbColor]) -> String {
    let mut out = String::with_capacity(colors.len() * 8);
    for color in colors {
        out.push_str(&color.to_string());
        out.push('\n');
    }
    out
}

/// Height of the swatch image for a strip of `width` colors: roughly 16:9,
/// computed as `width * 9 / 16` rounded down, and never less than one row.
pub fn swatch_height(width: u32) -> u32 {
    (width.saturating_mul(9) / 16).max(1)
}

/// Lay the colors out left to right, repeating the same row down the image.
pub fn render_pixels(colors: &[RgbColor]) -> Result<RgbImage> {
    if colors.is_empty() {
        return Err(SwatchError::EmptyColors);
    }
    let width = u32::try_from(colors.len()).map_err(|_| SwatchError::Allocation { what: "swatch image" })?;
    let height = swatch_height(width);

    let row: Vec<u8> = colors.iter().flat_map(|c| c.to_array()).collect();
    let mut buffer = Vec::with_capacity(row.len() * height as usize);
    for _ in 0..height {
        buffer.extend_from_slice(&row);
    }
    RgbImage::from_raw(width, height, buffer).ok_or(SwatchError::Allocation { what: "swatch image" })
}

/// Encode the swatch image as PNG.
pub fn render_png(colors: &[RgbColor]) -> Result<Vec<u8>> {
    let image = render_pixels(colors)?;
    let mut png = Vec::new();
    PngEncoder::new(&mut png).write_image(image.as_raw(), image.width(), image.height(), ExtendedColorType::Rgb8)?;
    Ok(png)
}
