// iconforge - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. Config file loading (iconforge.toml, optional)
// 3. Logging initialisation (debug mode support)
// 4. Running the generator and reporting progress on stdout
// 5. Mapping the outcome to a process exit code

use clap::Parser;
use iconforge::app::generator::IconGenerator;
use iconforge::core::model::{FaviconFormat, GeneratedIcon, GeneratorConfig};
use iconforge::platform::config::{self, AppConfig};
use iconforge::util::{constants, error, logging};
use std::path::PathBuf;

/// iconforge - generate a minimal favicon set from one SVG.
///
/// Writes favicon.ico, apple-touch-icon.png, icon-192.png and icon-512.png.
/// With no arguments, reads static/favicon.svg and writes into static/.
#[derive(Parser, Debug)]
#[command(name = "iconforge", version, about)]
struct Cli {
    /// Source image (SVG preferred; PNG also accepted).
    #[arg(short = 's', long = "source")]
    source: Option<PathBuf>,

    /// Directory the icons are written to (created if missing).
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Config file (defaults to ./iconforge.toml when present).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// favicon.ico encoding: "png" (single 32 px PNG) or "ico" (16/32/48 container).
    #[arg(long = "favicon-format")]
    favicon_format: Option<FaviconFormat>,

    /// Render the PNG icons in parallel.
    #[arg(short = 'j', long = "parallel")]
    parallel: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

impl Cli {
    /// Layer CLI flags over the file configuration.
    fn apply(&self, file: &AppConfig) -> GeneratorConfig {
        let mut generator = file.to_generator_config();
        if let Some(ref source) = self.source {
            generator.source = source.clone();
        }
        if let Some(ref dir) = self.output_dir {
            generator.output_dir = dir.clone();
        }
        if let Some(format) = self.favicon_format {
            generator.favicon_format = format;
        }
        if self.parallel {
            generator.parallel = true;
        }
        generator
    }
}

fn print_generated(icon: &GeneratedIcon) {
    println!("✓ Generated {} ({}×{})", icon.name, icon.size, icon.size);
}

fn main() {
    let cli = Cli::parse();

    // Config is read before logging exists; its warnings are replayed below.
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let (file_config, config_warnings) =
        match config::resolve_config_path(cli.config.as_deref(), &cwd) {
            Some(path) => config::load_config(&path),
            None => (AppConfig::default(), Vec::new()),
        };

    logging::init(cli.debug, file_config.log_level.as_deref());

    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }

    let generator_config = cli.apply(&file_config);
    tracing::info!(
        version = constants::APP_VERSION,
        source = %generator_config.source.display(),
        output_dir = %generator_config.output_dir.display(),
        favicon_format = %generator_config.favicon_format,
        parallel = generator_config.parallel,
        "iconforge starting"
    );

    println!("Generating minimal favicon set...\n");

    let mut generator = IconGenerator::new(generator_config);
    match generator.run(print_generated) {
        Ok(report) => {
            println!("\n✓ All favicons generated successfully!");
            println!("\nFiles generated:");
            for line in report.summary_lines() {
                println!("  - {line}");
            }
            std::process::exit(constants::EXIT_SUCCESS);
        }
        Err(e) if e.is_missing_source() => {
            eprintln!("ERROR: {}", error::chain_message(&e));
            std::process::exit(constants::EXIT_FAILURE);
        }
        Err(e) => {
            eprintln!("Error generating favicons: {}", error::chain_message(&e));
            std::process::exit(constants::EXIT_FAILURE);
        }
    }
}
