// iconforge - core/source.rs
//
// Locating and decoding the source image.
//
// SVG (and gzip-compressed SVGZ) sources are parsed once into a usvg tree and
// rasterised directly at every output size. Any other extension is decoded
// as a raster with the image crate and normalised to RGBA8, so an alpha
// channel is always present.

use crate::util::error::SourceError;
use image::RgbaImage;
use resvg::usvg;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// The decoded source. Read-only for the rest of the run and shared by
/// reference between all generation steps.
pub enum SourceImage {
    Vector(usvg::Tree),
    Raster(RgbaImage),
}

impl SourceImage {
    /// Intrinsic width and height in source units (CSS px for SVG).
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            Self::Vector(tree) => (tree.size().width(), tree.size().height()),
            Self::Raster(img) => (img.width() as f32, img.height() as f32),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Vector(_) => "svg",
            Self::Raster(_) => "raster",
        }
    }
}

impl std::fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (w, h) = self.dimensions();
        f.debug_struct("SourceImage")
            .field("kind", &self.kind())
            .field("width", &w)
            .field("height", &h)
            .finish()
    }
}

/// Fail fast if `path` is not an existing regular file.
///
/// Runs before any decoding and before the output directory is touched.
pub fn check_exists(path: &Path) -> Result<(), SourceError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(SourceError::NotAFile {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(SourceError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(SourceError::Read {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// True for paths the SVG parser should handle.
pub fn is_vector(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("svg") || e.eq_ignore_ascii_case("svgz"))
        .unwrap_or(false)
}

/// Check, read, and decode the source image.
pub fn load(path: &Path) -> Result<SourceImage, SourceError> {
    check_exists(path)?;

    let data = std::fs::read(path).map_err(|e| SourceError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), bytes = data.len(), "Source read");

    let image = if is_vector(path) {
        parse_svg(path, &data)?
    } else {
        decode_raster(path, &data)?
    };

    let (width, height) = image.dimensions();
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(SourceError::EmptyCanvas {
            path: path.to_path_buf(),
            width,
            height,
        });
    }

    tracing::info!(
        path = %path.display(),
        kind = image.kind(),
        width,
        height,
        "Source image loaded"
    );
    Ok(image)
}

fn parse_svg(path: &Path, data: &[u8]) -> Result<SourceImage, SourceError> {
    let mut opt = usvg::Options {
        // Relative <image href> links resolve against the SVG's own folder.
        resources_dir: std::fs::canonicalize(path)
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf)),
        ..Default::default()
    };
    // usvg 0.44: fontdb lives inside Options as an Arc<Database>.
    Arc::make_mut(&mut opt.fontdb).load_system_fonts();

    let tree = usvg::Tree::from_data(data, &opt).map_err(|e| SourceError::SvgParse {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(SourceImage::Vector(tree))
}

fn decode_raster(path: &Path, data: &[u8]) -> Result<SourceImage, SourceError> {
    let decoded = image::load_from_memory(data).map_err(|e| SourceError::RasterDecode {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(SourceImage::Raster(decoded.into_rgba8()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SQUARE_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100"><rect width="100" height="100" fill="red"/></svg>"#;

    #[test]
    fn test_missing_source_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(&dir.path().join("favicon.svg"));
        assert!(
            matches!(result, Err(SourceError::NotFound { .. })),
            "expected NotFound, got {result:?}"
        );
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = check_exists(dir.path());
        assert!(matches!(result, Err(SourceError::NotAFile { .. })));
    }

    #[test]
    fn test_loads_svg_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.svg");
        fs::write(&path, SQUARE_SVG).unwrap();

        let source = load(&path).unwrap();
        assert_eq!(source.kind(), "svg");
        assert_eq!(source.dimensions(), (100.0, 100.0));
    }

    #[test]
    fn test_malformed_svg_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.svg");
        fs::write(&path, "<svg this is not xml").unwrap();

        let result = load(&path);
        assert!(
            matches!(result, Err(SourceError::SvgParse { .. })),
            "expected SvgParse, got {result:?}"
        );
    }

    #[test]
    fn test_png_source_gains_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        image::RgbImage::from_pixel(8, 4, image::Rgb([0, 0, 255]))
            .save(&path)
            .unwrap();

        match load(&path).unwrap() {
            SourceImage::Raster(img) => {
                assert_eq!(img.dimensions(), (8, 4));
                assert_eq!(img.get_pixel(0, 0).0, [0, 0, 255, 255]);
            }
            other => panic!("expected raster source, got {other:?}"),
        }
    }

    #[test]
    fn test_vector_extension_detection() {
        assert!(is_vector(Path::new("static/favicon.svg")));
        assert!(is_vector(Path::new("LOGO.SVGZ")));
        assert!(!is_vector(Path::new("logo.png")));
        assert!(!is_vector(Path::new("svg")));
    }
}
