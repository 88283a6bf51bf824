use crate::core::color::ColorRGB;
use image::RgbImage;
use log::info;
use nalgebra::{Vector2, Vector3};
use std::path::Path;

/// A decoded RGB image sampled with nearest-neighbor lookup.
#[derive(Debug, Clone)]
pub struct Texture {
    pub image: RgbImage,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Decodes an image file. Any format the `image` crate understands is
    /// accepted; alpha is dropped.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref)
            .map_err(|e| format!("Failed to load texture: {}", e))?
            .to_rgb8();

        info!(
            "Loaded texture: {:?} ({}x{})",
            path_ref,
            img.width(),
            img.height()
        );

        Ok(Self::from_image(img))
    }

    /// Wraps an already decoded RGB buffer (`width * height * 3` bytes, row-major).
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!("Invalid texture size {}x{}", width, height));
        }
        let image = RgbImage::from_raw(width, height, data)
            .ok_or_else(|| format!("Pixel buffer too small for {}x{} texture", width, height))?;
        Ok(Self::from_image(image))
    }

    /// Single-texel texture, handy for flat materials.
    pub fn solid(color: [u8; 3]) -> Self {
        Self::from_image(RgbImage::from_pixel(1, 1, image::Rgb(color)))
    }

    fn from_image(image: RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            image,
        }
    }

    /// Nearest-neighbor lookup. UV (0, 0) is the top-left texel.
    ///
    /// No wrapping is performed: UVs outside `[0, 1]` are the caller's
    /// responsibility and land on the nearest edge texel.
    pub fn sample(&self, uv: &Vector2<f32>) -> ColorRGB {
        // `as u32` saturates negatives to 0.
        let x = ((uv.x * self.width as f32) as u32).min(self.width - 1);
        let y = ((uv.y * self.height as f32) as u32).min(self.height - 1);

        let pixel = self.image.get_pixel(x, y);

        Vector3::new(
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Texture {
        // 2x2: red, green / blue, white
        let data = vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
        Texture::from_rgb(2, 2, data).unwrap()
    }

    #[test]
    fn samples_nearest_texel() {
        let tex = checker();
        assert_eq!(tex.sample(&Vector2::new(0.1, 0.1)), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(tex.sample(&Vector2::new(0.9, 0.2)), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(tex.sample(&Vector2::new(0.4, 0.6)), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(tex.sample(&Vector2::new(0.5, 0.5)), Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn uv_of_one_stays_on_the_last_texel() {
        let tex = checker();
        assert_eq!(tex.sample(&Vector2::new(1.0, 1.0)), Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn rejects_short_buffers() {
        assert!(Texture::from_rgb(2, 2, vec![0; 11]).is_err());
        assert!(Texture::from_rgb(0, 2, vec![]).is_err());
    }

    #[test]
    fn solid_texture_is_uniform() {
        let tex = Texture::solid([0, 255, 0]);
        assert_eq!(tex.sample(&Vector2::new(0.7, 0.3)), Vector3::new(0.0, 1.0, 0.0));
    }
}
