// iconforge - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors carry the path or output name they relate to so a failure
// message is actionable without a debugger.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for a generation run.
#[derive(Debug)]
pub enum IconForgeError {
    /// The source image is missing or could not be loaded.
    Source(SourceError),

    /// Rendering, encoding, or writing one of the outputs failed.
    Generation(GenerationError),
}

impl fmt::Display for IconForgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(e) => write!(f, "Source error: {e}"),
            Self::Generation(e) => write!(f, "Generation error: {e}"),
        }
    }
}

impl std::error::Error for IconForgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Source(e) => Some(e),
            Self::Generation(e) => Some(e),
        }
    }
}

impl IconForgeError {
    /// True when the run failed because the source file does not exist.
    pub fn is_missing_source(&self) -> bool {
        matches!(self, Self::Source(SourceError::NotFound { .. }))
    }
}

// ---------------------------------------------------------------------------
// Source errors
// ---------------------------------------------------------------------------

/// Errors related to locating and decoding the source image.
#[derive(Debug)]
pub enum SourceError {
    /// The configured source path does not exist.
    NotFound { path: PathBuf },

    /// The source path exists but is not a regular file.
    NotAFile { path: PathBuf },

    /// I/O error reading the source bytes.
    Read { path: PathBuf, source: io::Error },

    /// The SVG document could not be parsed.
    SvgParse {
        path: PathBuf,
        source: resvg::usvg::Error,
    },

    /// A raster source could not be decoded.
    RasterDecode {
        path: PathBuf,
        source: image::ImageError,
    },

    /// The source has a zero (or non-finite) width or height.
    EmptyCanvas {
        path: PathBuf,
        width: f32,
        height: f32,
    },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(
                f,
                "Source image '{}' not found. \
                 Ensure the file exists before running, or pass --source.",
                path.display()
            ),
            Self::NotAFile { path } => {
                write!(f, "Source path '{}' is not a file", path.display())
            }
            Self::Read { path, source } => {
                write!(f, "Failed to read '{}': {source}", path.display())
            }
            Self::SvgParse { path, source } => {
                write!(f, "Failed to parse SVG '{}': {source}", path.display())
            }
            Self::RasterDecode { path, source } => {
                write!(f, "Failed to decode image '{}': {source}", path.display())
            }
            Self::EmptyCanvas {
                path,
                width,
                height,
            } => write!(
                f,
                "Source image '{}' has an empty canvas ({width}x{height})",
                path.display()
            ),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::SvgParse { source, .. } => Some(source),
            Self::RasterDecode { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<SourceError> for IconForgeError {
    fn from(e: SourceError) -> Self {
        Self::Source(e)
    }
}

// ---------------------------------------------------------------------------
// Generation errors
// ---------------------------------------------------------------------------

/// Errors raised while producing a single output file.
#[derive(Debug)]
pub enum GenerationError {
    /// The requested size is zero or above the allowed maximum.
    InvalidSize { name: String, size: u32, max: u32 },

    /// The rasteriser could not allocate a pixmap of the requested size.
    PixmapAlloc { name: String, width: u32, height: u32 },

    /// PNG encoding failed.
    PngEncode {
        name: String,
        source: image::ImageError,
    },

    /// ICO container encoding failed.
    IcoEncode { name: String, source: io::Error },

    /// The output directory could not be created.
    CreateDir { path: PathBuf, source: io::Error },

    /// Writing the encoded bytes to disk failed.
    Write { path: PathBuf, source: io::Error },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSize { name, size, max } => write!(
                f,
                "'{name}': size {size} is invalid (must be 1-{max} pixels)"
            ),
            Self::PixmapAlloc {
                name,
                width,
                height,
            } => write!(f, "'{name}': failed to allocate {width}x{height} pixmap"),
            Self::PngEncode { name, source } => {
                write!(f, "'{name}': PNG encoding failed: {source}")
            }
            Self::IcoEncode { name, source } => {
                write!(f, "'{name}': ICO encoding failed: {source}")
            }
            Self::CreateDir { path, source } => write!(
                f,
                "Failed to create output directory '{}': {source}",
                path.display()
            ),
            Self::Write { path, source } => {
                write!(f, "Failed to write '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PngEncode { source, .. } => Some(source),
            Self::IcoEncode { source, .. } => Some(source),
            Self::CreateDir { source, .. } => Some(source),
            Self::Write { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<GenerationError> for IconForgeError {
    fn from(e: GenerationError) -> Self {
        Self::Generation(e)
    }
}

/// Render an error and its full `source()` chain on one line, outermost
/// first, separated by `: `.
pub fn chain_message(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        let text = cause.to_string();
        // Wrappers already embed their direct cause in Display; skip repeats.
        if !msg.contains(&text) {
            msg.push_str(": ");
            msg.push_str(&text);
        }
        current = cause.source();
    }
    msg
}

/// Convenience type alias for iconforge results.
pub type Result<T> = std::result::Result<T, IconForgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_source_is_actionable() {
        let err: IconForgeError = SourceError::NotFound {
            path: PathBuf::from("static/favicon.svg"),
        }
        .into();
        assert!(err.is_missing_source());
        let msg = err.to_string();
        assert!(msg.contains("static/favicon.svg"), "{msg}");
        assert!(msg.contains("--source"), "{msg}");
    }

    #[test]
    fn test_generation_error_is_not_missing_source() {
        let err: IconForgeError = GenerationError::InvalidSize {
            name: "icon-0.png".to_string(),
            size: 0,
            max: 4096,
        }
        .into();
        assert!(!err.is_missing_source());
        assert!(err.to_string().contains("icon-0.png"));
    }

    #[test]
    fn test_chain_message_includes_io_cause_once() {
        let err: IconForgeError = GenerationError::Write {
            path: PathBuf::from("out/icon-192.png"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only volume"),
        }
        .into();
        let msg = chain_message(&err);
        assert_eq!(msg.matches("read-only volume").count(), 1, "{msg}");
        assert!(msg.starts_with("Generation error:"), "{msg}");
    }
}
