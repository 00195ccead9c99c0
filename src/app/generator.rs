// iconforge - app/generator.rs
//
// Generation run orchestration.
//
// A run moves strictly forward through its phases:
//   NotStarted -> ValidatingSource -> GeneratingIcons -> GeneratingFallback -> Done
// and drops to Failed from any of them on the first error. There is no retry
// and no per-file isolation: one failed output fails the whole run, even if
// earlier files were already written.
//
// The decoded source is shared read-only between steps. Each step encodes to
// memory and persists with an atomic rename, so icons can be rendered on the
// rayon pool without changing what ends up on disk.

use crate::core::encode;
use crate::core::model::{
    FaviconFormat, GeneratedIcon, GenerationReport, GeneratorConfig, IconSpec, LogoGeometry,
};
use crate::core::render;
use crate::core::source::{self, SourceImage};
use crate::platform::fs;
use crate::util::constants;
use crate::util::error::{GenerationError, Result};
use rayon::prelude::*;
use std::path::Path;

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    ValidatingSource,
    GeneratingIcons,
    GeneratingFallback,
    Done,
    Failed,
}

/// Drives one generation run over an immutable configuration.
#[derive(Debug)]
pub struct IconGenerator {
    config: GeneratorConfig,
    phase: Phase,
}

impl IconGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            phase: Phase::NotStarted,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn enter(&mut self, next: Phase) {
        tracing::debug!(from = ?self.phase, to = ?next, "Generator phase");
        self.phase = next;
    }

    /// Execute the run.
    ///
    /// `on_generated` is called once per written file, as soon as it is on
    /// disk. With `parallel` enabled it may be called from rayon worker
    /// threads in any order; the returned report is always in configuration
    /// order with the fallback last.
    pub fn run<F>(&mut self, on_generated: F) -> Result<GenerationReport>
    where
        F: Fn(&GeneratedIcon) + Sync,
    {
        let result = self.run_phases(&on_generated);
        match &result {
            Ok(report) => {
                self.enter(Phase::Done);
                tracing::info!(files = report.outputs.len(), "Generation complete");
            }
            Err(e) => {
                self.enter(Phase::Failed);
                tracing::error!(error = %e, "Generation failed");
            }
        }
        result
    }

    fn run_phases<F>(&mut self, on_generated: &F) -> Result<GenerationReport>
    where
        F: Fn(&GeneratedIcon) + Sync,
    {
        self.enter(Phase::ValidatingSource);
        // Existence is checked before decoding and before the output
        // directory is created, so a missing source writes nothing.
        let image = source::load(&self.config.source)?;

        fs::ensure_dir(&self.config.output_dir).map_err(|e| GenerationError::CreateDir {
            path: self.config.output_dir.clone(),
            source: e,
        })?;

        self.enter(Phase::GeneratingIcons);
        let mut outputs = self.generate_icons(&image, on_generated)?;

        self.enter(Phase::GeneratingFallback);
        let fallback = generate_fallback(&self.config, &image)?;
        on_generated(&fallback);
        outputs.push(fallback);

        Ok(GenerationReport {
            source_name: self.config.source_name(),
            outputs,
        })
    }

    fn generate_icons<F>(
        &self,
        image: &SourceImage,
        on_generated: &F,
    ) -> std::result::Result<Vec<GeneratedIcon>, GenerationError>
    where
        F: Fn(&GeneratedIcon) + Sync,
    {
        let config = &self.config;
        let step = |spec: &IconSpec| -> std::result::Result<GeneratedIcon, GenerationError> {
            let icon = generate_icon(config, image, spec)?;
            on_generated(&icon);
            Ok(icon)
        };

        if config.parallel {
            config.icons.par_iter().map(step).collect()
        } else {
            config.icons.iter().map(step).collect()
        }
    }
}

/// Render, encode, and persist one PNG icon.
pub fn generate_icon(
    config: &GeneratorConfig,
    image: &SourceImage,
    spec: &IconSpec,
) -> std::result::Result<GeneratedIcon, GenerationError> {
    check_size(spec.name, spec.size)?;

    let bytes = if spec.with_background {
        let geometry = LogoGeometry::for_canvas(spec.size, config.logo_scale);
        let logo = render::contain_fit(image, geometry.logo_size, spec.name)?;
        let canvas = render::composite_on_background(
            &logo,
            spec.size,
            geometry.padding,
            config.background,
        );
        encode::png_rgb(&canvas, spec.name)?
    } else {
        let icon = render::contain_fit(image, spec.size, spec.name)?;
        encode::png_rgba(&icon, spec.name)?
    };

    let path = config.output_path(spec.name);
    persist(&path, &bytes)?;

    tracing::info!(
        output = spec.name,
        size = spec.size,
        background = spec.with_background,
        bytes = bytes.len(),
        "Icon written"
    );

    Ok(GeneratedIcon {
        name: spec.name.to_string(),
        path,
        size: spec.size,
        with_background: spec.with_background,
        purpose: spec.purpose,
        bytes: bytes.len(),
    })
}

/// Render, encode, and persist `favicon.ico`.
pub fn generate_fallback(
    config: &GeneratorConfig,
    image: &SourceImage,
) -> std::result::Result<GeneratedIcon, GenerationError> {
    let spec = &config.fallback;
    check_size(spec.name, spec.size)?;

    let bytes = match config.favicon_format {
        FaviconFormat::Png => {
            let icon = render::contain_fit(image, spec.size, spec.name)?;
            encode::png_rgba(&icon, spec.name)?
        }
        FaviconFormat::Ico => encode::ico(image, constants::ICO_SIZES, spec.name)?,
    };

    let path = config.output_path(spec.name);
    persist(&path, &bytes)?;

    tracing::info!(
        output = spec.name,
        size = spec.size,
        format = %config.favicon_format,
        bytes = bytes.len(),
        "Favicon written"
    );

    Ok(GeneratedIcon {
        name: spec.name.to_string(),
        path,
        size: spec.size,
        with_background: false,
        purpose: spec.purpose,
        bytes: bytes.len(),
    })
}

fn check_size(name: &str, size: u32) -> std::result::Result<(), GenerationError> {
    if size == 0 || size > constants::MAX_ICON_SIZE {
        return Err(GenerationError::InvalidSize {
            name: name.to_string(),
            size,
            max: constants::MAX_ICON_SIZE,
        });
    }
    Ok(())
}

fn persist(path: &Path, bytes: &[u8]) -> std::result::Result<(), GenerationError> {
    fs::write_atomic(path, bytes).map_err(|e| GenerationError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const RED_SQUARE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100"><rect width="100" height="100" fill="red"/></svg>"#;

    fn config_in(dir: &Path) -> GeneratorConfig {
        GeneratorConfig {
            source: dir.join("favicon.svg"),
            output_dir: dir.join("out"),
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_phases_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::write(&config.source, RED_SQUARE).unwrap();

        let mut generator = IconGenerator::new(config);
        assert_eq!(generator.phase(), Phase::NotStarted);

        let seen = Mutex::new(Vec::new());
        let report = generator
            .run(|icon| seen.lock().unwrap().push(icon.name.clone()))
            .unwrap();

        assert_eq!(generator.phase(), Phase::Done);
        assert_eq!(report.source_name, "favicon.svg");
        assert_eq!(
            report.names(),
            vec![
                "apple-touch-icon.png",
                "icon-192.png",
                "icon-512.png",
                "favicon.ico"
            ]
        );
        assert_eq!(seen.into_inner().unwrap().len(), 4);
        assert_eq!(
            report.summary_lines(),
            vec![
                "favicon.svg (source, used by modern browsers)",
                "favicon.ico (legacy browsers)",
                "apple-touch-icon.png (iOS home screen)",
                "icon-192.png (Android/PWA)",
                "icon-512.png (PWA splash)",
            ]
        );
    }

    #[test]
    fn test_missing_source_fails_before_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let out_dir = config.output_dir.clone();

        let mut generator = IconGenerator::new(config);
        let err = generator.run(|_| {}).unwrap_err();

        assert!(err.is_missing_source(), "got {err}");
        assert_eq!(generator.phase(), Phase::Failed);
        assert!(!out_dir.exists());
    }

    #[test]
    fn test_invalid_size_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        std::fs::write(&config.source, RED_SQUARE).unwrap();
        config.icons = vec![
            IconSpec::new("ok.png", 16, false, "test"),
            IconSpec::new("zero.png", 0, false, "test"),
        ];

        let mut generator = IconGenerator::new(config.clone());
        let err = generator.run(|_| {}).unwrap_err();

        assert!(err.to_string().contains("zero.png"), "got {err}");
        // The first icon stays on disk; the fallback never runs.
        assert!(config.output_dir.join("ok.png").exists());
        assert!(!config.output_dir.join("favicon.ico").exists());
    }

    #[test]
    fn test_parallel_report_keeps_config_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        std::fs::write(&config.source, RED_SQUARE).unwrap();
        config.parallel = true;

        let report = IconGenerator::new(config).run(|_| {}).unwrap();
        assert_eq!(
            report.names(),
            vec![
                "apple-touch-icon.png",
                "icon-192.png",
                "icon-512.png",
                "favicon.ico"
            ]
        );
    }
}
