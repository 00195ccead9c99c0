// iconforge - core/render.rs
//
// Contain-fit resizing and background compositing.
//
// Contain fit scales the source uniformly so it fits entirely inside a square
// box, snaps the scaled extent to whole pixels, centres it, and leaves every
// pixel outside that extent fully transparent. Nothing is stretched or
// cropped.

use crate::core::model::Rgb;
use crate::core::source::SourceImage;
use crate::util::error::GenerationError;
use image::imageops::{self, FilterType};
use image::{RgbImage, RgbaImage};
use resvg::{tiny_skia, usvg};

/// Pixel rectangle occupied by the fitted content inside the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ContentRect {
    /// Compute the centred, aspect-preserving extent of a `src_w x src_h`
    /// source inside a `box_size` square.
    pub fn contain(src_w: f32, src_h: f32, box_size: u32) -> Self {
        let edge = box_size as f32;
        let scale = (edge / src_w).min(edge / src_h);
        let width = ((src_w * scale).round() as u32).clamp(1, box_size);
        let height = ((src_h * scale).round() as u32).clamp(1, box_size);
        Self {
            x: (box_size - width) / 2,
            y: (box_size - height) / 2,
            width,
            height,
        }
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Contain-fit `source` into a transparent `box_size x box_size` RGBA image.
///
/// `name` identifies the output in error messages.
pub fn contain_fit(
    source: &SourceImage,
    box_size: u32,
    name: &str,
) -> Result<RgbaImage, GenerationError> {
    let (src_w, src_h) = source.dimensions();
    let rect = ContentRect::contain(src_w, src_h, box_size);

    tracing::trace!(
        output = name,
        box_size,
        x = rect.x,
        y = rect.y,
        width = rect.width,
        height = rect.height,
        "Contain fit"
    );

    match source {
        SourceImage::Vector(tree) => render_vector(tree, box_size, rect, name),
        SourceImage::Raster(img) => Ok(render_raster(img, box_size, rect)),
    }
}

fn render_vector(
    tree: &usvg::Tree,
    box_size: u32,
    rect: ContentRect,
    name: &str,
) -> Result<RgbaImage, GenerationError> {
    let mut pixmap =
        tiny_skia::Pixmap::new(box_size, box_size).ok_or_else(|| GenerationError::PixmapAlloc {
            name: name.to_string(),
            width: box_size,
            height: box_size,
        })?;

    let size = tree.size();
    let transform = tiny_skia::Transform::from_row(
        rect.width as f32 / size.width(),
        0.0,
        0.0,
        rect.height as f32 / size.height(),
        rect.x as f32,
        rect.y as f32,
    );
    resvg::render(tree, transform, &mut pixmap.as_mut());

    // tiny-skia stores premultiplied RGBA; PNG wants straight alpha.
    let mut out = RgbaImage::new(box_size, box_size);
    for ((x, y, dst), src) in out.enumerate_pixels_mut().zip(pixmap.pixels()) {
        // Content drawn outside the SVG viewport stays out of the letterbox.
        if !rect.contains(x, y) {
            continue;
        }
        let c = src.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(out)
}

fn render_raster(img: &RgbaImage, box_size: u32, rect: ContentRect) -> RgbaImage {
    let resized = if img.dimensions() == (rect.width, rect.height) {
        img.clone()
    } else {
        imageops::resize(img, rect.width, rect.height, FilterType::Lanczos3)
    };
    let mut out = RgbaImage::new(box_size, box_size);
    imageops::replace(&mut out, &resized, i64::from(rect.x), i64::from(rect.y));
    out
}

/// Source-over composite `logo` onto an opaque `size x size` canvas filled
/// with `background`, with the logo's top-left corner at `(offset, offset)`.
///
/// The result has no alpha channel. Fully transparent logo pixels leave the
/// background untouched and fully opaque ones replace it exactly.
pub fn composite_on_background(
    logo: &RgbaImage,
    size: u32,
    offset: u32,
    background: Rgb,
) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(size, size, image::Rgb(background.to_array()));

    for (x, y, px) in logo.enumerate_pixels() {
        let (cx, cy) = (x + offset, y + offset);
        if cx >= size || cy >= size {
            continue;
        }
        let [r, g, b, a] = px.0;
        if a == 0 {
            continue;
        }
        let dst = canvas.get_pixel_mut(cx, cy);
        let [br, bg, bb] = dst.0;
        dst.0 = [
            blend_channel(r, br, a),
            blend_channel(g, bg, a),
            blend_channel(b, bb, a),
        ];
    }
    canvas
}

/// `fg * a + bg * (1 - a)` in 8-bit fixed point, rounded to nearest.
fn blend_channel(fg: u8, bg: u8, alpha: u8) -> u8 {
    let a = u32::from(alpha);
    ((u32::from(fg) * a + u32::from(bg) * (255 - a) + 127) / 255) as u8
}
