use crate::io::error::ParseError;
use image::RgbaImage;
use log::info;
use nalgebra::Vector4;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// How texels are reconstructed between texel centers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureFilter {
    /// Nearest texel.
    #[default]
    Point,
    /// Weighted average of the four closest texels.
    Bilinear,
}

impl TextureFilter {
    pub fn next(self) -> Self {
        match self {
            TextureFilter::Point => TextureFilter::Bilinear,
            TextureFilter::Bilinear => TextureFilter::Point,
        }
    }
}

impl fmt::Display for TextureFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureFilter::Point => write!(f, "Point"),
            TextureFilter::Bilinear => write!(f, "Bilinear"),
        }
    }
}

/// Represents a 2D texture map. Immutable after loading.
#[derive(Debug, Clone)]
pub struct Texture {
    image: RgbaImage,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let path_ref = path.as_ref();
        if !path_ref.exists() {
            return Err(ParseError::Missing(path_ref.to_path_buf()));
        }
        let img = image::open(path_ref)
            .map_err(|e| ParseError::malformed(path_ref, e))?
            .to_rgba8();
        if img.width() == 0 || img.height() == 0 {
            return Err(ParseError::malformed(path_ref, "image has no pixels"));
        }

        info!("Loaded texture: {:?} ({}x{})", path_ref, img.width(), img.height());

        Ok(Self {
            width: img.width(),
            height: img.height(),
            image: img,
        })
    }

    /// Builds a texture from raw RGBA8 pixels, row-major from the top row.
    ///
    /// Returns `None` if the pixel count does not match the dimensions.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let image = RgbaImage::from_raw(width, height, pixels)?;
        Some(Self {
            image,
            width,
            height,
        })
    }

    /// Samples the texture at `(u, v)`, returning RGBA in [0, 1].
    ///
    /// UVs wrap (repeat) outside [0, 1] and V is flipped, so v = 0 is the bottom row.
    pub fn sample(&self, u: f32, v: f32, filter: TextureFilter) -> Vector4<f32> {
        let u = wrap(u);
        let v = wrap(v);

        match filter {
            TextureFilter::Point => {
                let x = (u * self.width as f32).floor() as i32;
                let y = ((1.0 - v) * self.height as f32).floor() as i32;
                self.get_pixel_wrapped(x, y)
            }
            TextureFilter::Bilinear => {
                // -0.5 because pixel centers are at 0.5
                let x = u * self.width as f32 - 0.5;
                let y = (1.0 - v) * self.height as f32 - 0.5;

                let x0 = x.floor() as i32;
                let y0 = y.floor() as i32;
                let wx = x - x.floor();
                let wy = y - y.floor();

                let c00 = self.get_pixel_wrapped(x0, y0);
                let c10 = self.get_pixel_wrapped(x0 + 1, y0);
                let c01 = self.get_pixel_wrapped(x0, y0 + 1);
                let c11 = self.get_pixel_wrapped(x0 + 1, y0 + 1);

                let top = c00 * (1.0 - wx) + c10 * wx;
                let bottom = c01 * (1.0 - wx) + c11 * wx;
                top * (1.0 - wy) + bottom * wy
            }
        }
    }

    fn get_pixel_wrapped(&self, x: i32, y: i32) -> Vector4<f32> {
        let x = x.rem_euclid(self.width as i32) as u32;
        let y = y.rem_euclid(self.height as i32) as u32;
        let p = self.image.get_pixel(x, y);
        Vector4::new(
            p[0] as f32 / 255.0,
            p[1] as f32 / 255.0,
            p[2] as f32 / 255.0,
            p[3] as f32 / 255.0,
        )
    }
}

/// Repeat addressing: 1.25 -> 0.25, -0.25 -> 0.75.
#[inline]
fn wrap(t: f32) -> f32 {
    let f = t.fract();
    if f < 0.0 { f + 1.0 } else { f }
}
