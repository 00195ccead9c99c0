// iconforge - platform/config.rs
//
// Optional iconforge.toml loading with startup validation.
//
// Every value is checked against named constants at load time. Invalid values
// never abort the run: they produce an actionable warning and the built-in
// default is used instead.

use crate::core::model::{FaviconFormat, GeneratorConfig, Rgb};
use crate::util::constants;
use std::path::{Path, PathBuf};

/// Raw deserialisable shape of iconforge.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[generator]` section.
    pub generator: GeneratorSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[generator]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct GeneratorSection {
    /// Source image path.
    pub source: Option<String>,
    /// Output directory.
    pub output_dir: Option<String>,
    /// Background colour as `#rrggbb`.
    pub background: Option<String>,
    /// Logo fraction of a background icon's canvas.
    pub logo_scale: Option<f64>,
    /// "png" or "ico".
    pub favicon_format: Option<String>,
    /// Render icons in parallel.
    pub parallel: Option<bool>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated configuration derived from iconforge.toml.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub background: Rgb,
    pub logo_scale: f64,
    pub favicon_format: FaviconFormat,
    pub parallel: bool,

    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(constants::DEFAULT_SOURCE_FILE),
            output_dir: PathBuf::from(constants::DEFAULT_OUTPUT_DIR),
            background: constants::BACKGROUND_COLOR,
            logo_scale: constants::DEFAULT_LOGO_SCALE,
            favicon_format: FaviconFormat::default(),
            parallel: false,
            log_level: None,
        }
    }
}

impl AppConfig {
    /// Assemble the immutable generator configuration. The icon list and
    /// fallback spec are always the built-in ones.
    pub fn to_generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            source: self.source.clone(),
            output_dir: self.output_dir.clone(),
            background: self.background,
            logo_scale: self.logo_scale,
            favicon_format: self.favicon_format,
            parallel: self.parallel,
            ..GeneratorConfig::default()
        }
    }
}

/// Which config file to read, if any.
///
/// An explicit `--config` path always wins. Otherwise `iconforge.toml` in
/// `cwd` is used when present.
pub fn resolve_config_path(explicit: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let candidate = cwd.join(constants::CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// Load and validate a config file.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file cannot be read or parsed, returns defaults with a warning.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            let msg = format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            return (AppConfig::default(), vec![msg]);
        }
    };

    let (config, warnings) = parse_config(&content, config_path);
    tracing::debug!(path = %config_path.display(), "Loaded config file");
    (config, warnings)
}

/// Validate config file text. `origin` is only used in messages.
pub fn parse_config(content: &str, origin: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    let raw: RawConfig = match toml::from_str(content) {
        Ok(r) => r,
        Err(e) => {
            warnings.push(format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                origin.display()
            ));
            return (AppConfig::default(), warnings);
        }
    };

    let mut config = AppConfig::default();
    let section = raw.generator;

    // -- Generator: source / output_dir --
    if let Some(source) = section.source {
        if source.trim().is_empty() {
            warnings.push(format!(
                "[generator] source is empty. Using default ({}).",
                constants::DEFAULT_SOURCE_FILE
            ));
        } else {
            config.source = PathBuf::from(source);
        }
    }
    if let Some(dir) = section.output_dir {
        if dir.trim().is_empty() {
            warnings.push(format!(
                "[generator] output_dir is empty. Using default ({}).",
                constants::DEFAULT_OUTPUT_DIR
            ));
        } else {
            config.output_dir = PathBuf::from(dir);
        }
    }

    // -- Generator: background --
    if let Some(ref hex) = section.background {
        match Rgb::from_hex(hex) {
            Some(color) => config.background = color,
            None => warnings.push(format!(
                "[generator] background = \"{hex}\" is not a #rrggbb colour. Using default ({}).",
                constants::BACKGROUND_COLOR
            )),
        }
    }

    // -- Generator: logo_scale --
    if let Some(scale) = section.logo_scale {
        if (constants::MIN_LOGO_SCALE..=constants::MAX_LOGO_SCALE).contains(&scale) {
            config.logo_scale = scale;
        } else {
            warnings.push(format!(
                "[generator] logo_scale = {scale} is out of range ({}-{}). Using default ({}).",
                constants::MIN_LOGO_SCALE,
                constants::MAX_LOGO_SCALE,
                constants::DEFAULT_LOGO_SCALE,
            ));
        }
    }

    // -- Generator: favicon_format --
    if let Some(ref format) = section.favicon_format {
        match format.parse::<FaviconFormat>() {
            Ok(f) => config.favicon_format = f,
            Err(e) => warnings.push(format!(
                "[generator] {e}. Using default ({}).",
                FaviconFormat::default()
            )),
        }
    }

    if let Some(parallel) = section.parallel {
        config.parallel = parallel;
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: {}. Using default ({}).",
                constants::VALID_LOG_LEVELS.join(", "),
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    (config, warnings)
}
