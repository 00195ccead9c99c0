// iconforge - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.
// The built-in icon set and fallback spec are assembled from these into an
// immutable `GeneratorConfig` at startup.

use crate::core::model::{FallbackSpec, IconSpec, Rgb};

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "iconforge";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Paths
// =============================================================================

/// Default source image, relative to the working directory.
pub const DEFAULT_SOURCE_FILE: &str = "static/favicon.svg";

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "static";

/// Configuration file looked up in the working directory when `--config`
/// is not given.
pub const CONFIG_FILE_NAME: &str = "iconforge.toml";

// =============================================================================
// Icon set
// =============================================================================

/// Background behind the apple touch icon. iOS does not honour transparency.
pub const BACKGROUND_COLOR: Rgb = Rgb::new(34, 34, 34); // #222222

/// Fraction of the canvas the logo occupies when composited on a background.
pub const DEFAULT_LOGO_SCALE: f64 = 0.8;

/// Lower bound for a configured logo scale.
pub const MIN_LOGO_SCALE: f64 = 0.1;

/// Upper bound for a configured logo scale (logo fills the canvas).
pub const MAX_LOGO_SCALE: f64 = 1.0;

/// The essential PNG icons, in generation and report order.
pub const ICONS: &[IconSpec] = &[
    IconSpec::new("apple-touch-icon.png", 180, true, "iOS home screen"),
    IconSpec::new("icon-192.png", 192, false, "Android/PWA"),
    IconSpec::new("icon-512.png", 512, false, "PWA splash"),
];

/// Legacy-browser favicon.
pub const FALLBACK: FallbackSpec = FallbackSpec::new("favicon.ico", 32, "legacy browsers");

/// Resolutions packed into `favicon.ico` when a real ICO container is requested.
pub const ICO_SIZES: &[u32] = &[16, 32, 48];

/// Largest square edge any output may request. Guards against a typo in a
/// size turning into a multi-gigabyte pixmap allocation.
pub const MAX_ICON_SIZE: u32 = 4_096;

/// Purpose shown next to the source file in the run summary.
pub const SOURCE_PURPOSE: &str = "source, used by modern browsers";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Exit codes
// =============================================================================

/// Every icon was written.
pub const EXIT_SUCCESS: i32 = 0;

/// Source missing or a generation step failed.
pub const EXIT_FAILURE: i32 = 1;
