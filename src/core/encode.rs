// iconforge - core/encode.rs
//
// In-memory encoders. Every output is encoded to a byte buffer first and only
// then persisted, so a failed encode never leaves a truncated file behind.

use crate::core::render;
use crate::core::source::SourceImage;
use crate::util::error::GenerationError;
use ico::{IconDir, IconDirEntry, IconImage, ResourceType};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};

/// Encode an RGBA image as a PNG that keeps its alpha channel.
pub fn png_rgba(img: &RgbaImage, name: &str) -> Result<Vec<u8>, GenerationError> {
    write_png(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgba8, name)
}

/// Encode an opaque RGB image as a PNG without an alpha channel.
pub fn png_rgb(img: &RgbImage, name: &str) -> Result<Vec<u8>, GenerationError> {
    write_png(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgb8, name)
}

fn write_png(
    raw: &[u8],
    width: u32,
    height: u32,
    color: ExtendedColorType,
    name: &str,
) -> Result<Vec<u8>, GenerationError> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(raw, width, height, color)
        .map_err(|e| GenerationError::PngEncode {
            name: name.to_string(),
            source: e,
        })?;
    Ok(buf)
}

/// Build a multi-resolution ICO container, one contain-fitted transparent
/// entry per size.
pub fn ico(source: &SourceImage, sizes: &[u32], name: &str) -> Result<Vec<u8>, GenerationError> {
    let mut icon_dir = IconDir::new(ResourceType::Icon);

    for &size in sizes {
        let rgba = render::contain_fit(source, size, name)?;
        // ico 0.3: from_rgba_data returns IconImage directly (no Result).
        let img = IconImage::from_rgba_data(size, size, rgba.into_raw());
        let entry = IconDirEntry::encode(&img).map_err(|e| GenerationError::IcoEncode {
            name: name.to_string(),
            source: e,
        })?;
        icon_dir.add_entry(entry);
        tracing::debug!(output = name, size, "ICO layer encoded");
    }

    let mut buf = Vec::new();
    icon_dir
        .write(&mut buf)
        .map_err(|e| GenerationError::IcoEncode {
            name: name.to_string(),
            source: e,
        })?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ColorType, ImageFormat};

    #[test]
    fn test_png_rgb_has_no_alpha() {
        let img = RgbImage::from_pixel(3, 2, image::Rgb([34, 34, 34]));
        let bytes = png_rgb(&img, "apple-touch-icon.png").unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!(decoded.color(), ColorType::Rgb8);
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }

    #[test]
    fn test_png_rgba_keeps_alpha() {
        let img = RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 0]));
        let bytes = png_rgba(&img, "icon-192.png").unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!(decoded.color(), ColorType::Rgba8);
        assert_eq!(decoded.to_rgba8().get_pixel(1, 1).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_png_encoding_is_deterministic() {
        let img = RgbaImage::from_fn(16, 16, |x, y| {
            image::Rgba([x as u8 * 16, y as u8 * 16, 0, 200])
        });
        assert_eq!(png_rgba(&img, "a").unwrap(), png_rgba(&img, "a").unwrap());
    }

    #[test]
    fn test_ico_contains_every_size() {
        let source = SourceImage::Raster(RgbaImage::from_pixel(
            10,
            10,
            image::Rgba([255, 255, 255, 255]),
        ));
        let bytes = ico(&source, &[16, 32, 48], "favicon.ico").unwrap();

        let dir = IconDir::read(std::io::Cursor::new(bytes)).unwrap();
        let mut sizes: Vec<u32> = dir.entries().iter().map(|e| e.width()).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![16, 32, 48]);
    }
}
