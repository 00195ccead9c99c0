// iconforge - core/model.rs
//
// Core data model types. Pure data definitions with no I/O.
// These types are the shared vocabulary across all layers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// =============================================================================
// Colour
// =============================================================================

/// An opaque 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb` (case-insensitive).
    pub fn from_hex(text: &str) -> Option<Self> {
        let hex = text.trim().strip_prefix('#').unwrap_or(text.trim());
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// =============================================================================
// Icon specs
// =============================================================================

/// One square PNG output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSpec {
    /// Output filename, relative to the output directory.
    pub name: &'static str,

    /// Edge length in pixels.
    pub size: u32,

    /// Composite the logo onto an opaque background square.
    pub with_background: bool,

    /// Who consumes this file; shown in the run summary.
    pub purpose: &'static str,
}

impl IconSpec {
    pub const fn new(
        name: &'static str,
        size: u32,
        with_background: bool,
        purpose: &'static str,
    ) -> Self {
        Self {
            name,
            size,
            with_background,
            purpose,
        }
    }
}

/// Where the logo sits on a background canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoGeometry {
    /// Edge of the box the logo is contain-fitted into.
    pub logo_size: u32,

    /// Offset of that box from the top-left corner, on both axes.
    pub padding: u32,
}

impl LogoGeometry {
    /// `logo_size = floor(size * scale)`, `padding = floor((size - logo_size) / 2)`.
    ///
    /// `logo_size` is clamped to `1..=size` so a tiny canvas still gets a logo.
    pub fn for_canvas(size: u32, scale: f64) -> Self {
        // Absorb binary rounding so 100 * 0.29 floors to 29, not 28.
        let raw = (f64::from(size) * scale + 1e-9).floor();
        let logo_size = (raw as u32).clamp(1, size.max(1));
        let padding = (size.saturating_sub(logo_size)) / 2;
        Self { logo_size, padding }
    }
}

/// The `favicon.ico` fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackSpec {
    pub name: &'static str,
    pub size: u32,
    pub purpose: &'static str,
}

impl FallbackSpec {
    pub const fn new(name: &'static str, size: u32, purpose: &'static str) -> Self {
        Self {
            name,
            size,
            purpose,
        }
    }
}

/// How `favicon.ico` is encoded.
///
/// `Png` writes a single 32 px PNG under the `.ico` name. Browsers accept
/// it, but it is not an ICO container. `Ico` packs several resolutions into
/// a real ICO file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaviconFormat {
    #[default]
    Png,
    Ico,
}

impl FaviconFormat {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Ico => "ico",
        }
    }
}

impl fmt::Display for FaviconFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FaviconFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "ico" => Ok(Self::Ico),
            other => Err(format!(
                "unknown favicon format \"{other}\" (expected \"png\" or \"ico\")"
            )),
        }
    }
}

// =============================================================================
// Generator configuration
// =============================================================================

/// Everything a generation run needs, fixed before the run starts.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Source image (SVG, or a PNG raster).
    pub source: PathBuf,

    /// Directory all outputs are written to.
    pub output_dir: PathBuf,

    /// Background for `with_background` icons.
    pub background: Rgb,

    /// Fraction of a background icon's canvas occupied by the logo.
    pub logo_scale: f64,

    /// PNG icons, in report order.
    pub icons: Vec<IconSpec>,

    pub fallback: FallbackSpec,

    pub favicon_format: FaviconFormat,

    /// Render the PNG icons on the rayon pool instead of one after another.
    pub parallel: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        use crate::util::constants;
        Self {
            source: PathBuf::from(constants::DEFAULT_SOURCE_FILE),
            output_dir: PathBuf::from(constants::DEFAULT_OUTPUT_DIR),
            background: constants::BACKGROUND_COLOR,
            logo_scale: constants::DEFAULT_LOGO_SCALE,
            icons: constants::ICONS.to_vec(),
            fallback: constants::FALLBACK,
            favicon_format: FaviconFormat::default(),
            parallel: false,
        }
    }
}

impl GeneratorConfig {
    /// Absolute or working-directory-relative path of an output file.
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }

    /// Filename of the source image.
    pub fn source_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

// =============================================================================
// Run report
// =============================================================================

/// One file written by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedIcon {
    pub name: String,
    pub path: PathBuf,
    pub size: u32,
    pub with_background: bool,
    pub purpose: &'static str,
    /// Encoded length on disk.
    pub bytes: usize,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Filename of the source image.
    pub source_name: String,

    /// PNG icons in configuration order, followed by the fallback.
    pub outputs: Vec<GeneratedIcon>,
}

impl GenerationReport {
    pub fn names(&self) -> Vec<&str> {
        self.outputs.iter().map(|o| o.name.as_str()).collect()
    }

    /// `name (purpose)` for every file the run is about: the source, then
    /// the fallback, then the PNG icons.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "{} ({})",
            self.source_name,
            crate::util::constants::SOURCE_PURPOSE
        )];
        if let Some((fallback, icons)) = self.outputs.split_last() {
            lines.push(format!("{} ({})", fallback.name, fallback.purpose));
            lines.extend(icons.iter().map(|o| format!("{} ({})", o.name, o.purpose)));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logo_geometry_matches_reference_sizes() {
        assert_eq!(
            LogoGeometry::for_canvas(180, 0.8),
            LogoGeometry {
                logo_size: 144,
                padding: 18
            }
        );
        assert_eq!(
            LogoGeometry::for_canvas(192, 0.8),
            LogoGeometry {
                logo_size: 153,
                padding: 19
            }
        );
        assert_eq!(
            LogoGeometry::for_canvas(512, 0.8),
            LogoGeometry {
                logo_size: 409,
                padding: 51
            }
        );
    }

    #[test]
    fn test_logo_geometry_exact_decimal_scales() {
        assert_eq!(LogoGeometry::for_canvas(10, 0.7).logo_size, 7);
        assert_eq!(LogoGeometry::for_canvas(100, 0.29).logo_size, 29);
        assert_eq!(LogoGeometry::for_canvas(100, 0.57).logo_size, 57);
    }

    #[test]
    fn test_logo_geometry_never_empty() {
        let g = LogoGeometry::for_canvas(1, 0.1);
        assert_eq!(g.logo_size, 1);
        assert_eq!(g.padding, 0);
    }

    #[test]
    fn test_rgb_hex_round_trip() {
        let c = Rgb::from_hex("#222222").unwrap();
        assert_eq!(c, Rgb::new(34, 34, 34));
        assert_eq!(c.to_string(), "#222222");
        assert_eq!(Rgb::from_hex("FF8000"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(Rgb::from_hex("#fff"), None);
        assert_eq!(Rgb::from_hex("#gg0000"), None);
    }

    #[test]
    fn test_favicon_format_parse() {
        assert_eq!("png".parse::<FaviconFormat>(), Ok(FaviconFormat::Png));
        assert_eq!(" ICO ".parse::<FaviconFormat>(), Ok(FaviconFormat::Ico));
        assert!("bmp".parse::<FaviconFormat>().is_err());
    }

    #[test]
    fn test_default_config_paths() {
        let config = GeneratorConfig::default();
        assert_eq!(config.source_name(), "favicon.svg");
        assert_eq!(
            config.output_path("icon-192.png"),
            PathBuf::from("static").join("icon-192.png")
        );
        assert_eq!(config.icons.len(), 3);
    }
}
