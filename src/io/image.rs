use crate::core::color::unpack_rgb;
use image::{ImageBuffer, Rgb};
use log::info;
use std::path::Path;

/// Converts a packed `0xFFRRGGBB` buffer into an RGB image.
pub fn buffer_to_image(
    buffer: &[u32],
    width: usize,
    height: usize,
) -> Result<ImageBuffer<Rgb<u8>, Vec<u8>>, String> {
    if buffer.len() != width * height {
        return Err(format!(
            "Buffer holds {} pixels, expected {}x{}",
            buffer.len(),
            width,
            height
        ));
    }

    let mut img_buf = ImageBuffer::new(width as u32, height as u32);
    for (x, y, pixel) in img_buf.enumerate_pixels_mut() {
        let idx = (y as usize) * width + (x as usize);
        *pixel = Rgb(unpack_rgb(buffer[idx]));
    }
    Ok(img_buf)
}

/// Saves a packed color buffer. The format follows the file extension
/// (`.bmp`, `.png`, ...).
pub fn save_buffer_to_image<P: AsRef<Path>>(
    buffer: &[u32],
    width: usize,
    height: usize,
    path: P,
) -> Result<(), String> {
    let path = path.as_ref();
    let img_buf = buffer_to_image(buffer, width, height)?;
    img_buf
        .save(path)
        .map_err(|e| format!("Failed to save image to '{}': {}", path.display(), e))?;
    info!("Saved color buffer to {}", path.display());
    Ok(())
}
