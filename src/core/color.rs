use nalgebra::Vector3;

/// Linear RGB color in `[0, 1]` per channel (before rescaling).
pub type ColorRGB = Vector3<f32>;

pub fn black() -> ColorRGB {
    Vector3::zeros()
}

pub fn white() -> ColorRGB {
    Vector3::new(1.0, 1.0, 1.0)
}

/// Brings a color back into `[0, 1]` by dividing every channel by the
/// brightest one when it exceeds 1. Unlike a per-channel clamp this keeps the
/// hue: `(1.5, 0.5, 0.0)` becomes `(1.0, 0.333, 0.0)`, not `(1.0, 0.5, 0.0)`.
pub fn max_to_one(color: ColorRGB) -> ColorRGB {
    let max_value = color.x.max(color.y).max(color.z);
    if max_value > 1.0 {
        color / max_value
    } else {
        color
    }
}

/// Packs a color into a `0xFFRRGGBB` pixel.
///
/// Channels are truncated to 8 bits; values outside `[0, 1]` saturate.
pub fn pack_rgb(color: &ColorRGB) -> u32 {
    let r = (color.x * 255.0) as u8 as u32;
    let g = (color.y * 255.0) as u8 as u32;
    let b = (color.z * 255.0) as u8 as u32;
    (255 << 24) | (r << 16) | (g << 8) | b
}

/// Splits a packed pixel into its 8-bit channels.
pub fn unpack_rgb(pixel: u32) -> [u8; 3] {
    [
        ((pixel >> 16) & 0xFF) as u8,
        ((pixel >> 8) & 0xFF) as u8,
        (pixel & 0xFF) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rescales_by_brightest_channel() {
        let c = max_to_one(Vector3::new(1.5, 0.5, 0.0));
        assert_eq!(c.x, 1.0);
        assert!((c.y - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(c.z, 0.0);
    }

    #[test]
    fn leaves_in_range_colors_alone() {
        let c = Vector3::new(0.2, 1.0, 0.7);
        assert_eq!(max_to_one(c), c);
    }

    #[test]
    fn packs_and_unpacks() {
        let pixel = pack_rgb(&Vector3::new(1.0, 0.5, 0.0));
        assert_eq!(pixel, 0xFFFF7F00);
        assert_eq!(unpack_rgb(pixel), [255, 127, 0]);
        assert_eq!(pack_rgb(&white()), 0xFFFFFFFF);
        assert_eq!(pack_rgb(&black()), 0xFF000000);
    }
}
