// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use std::time::Instant;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use slidesmith::app_config::{self, Config};
use slidesmith::app_controller::{Controller, GenerateOptions};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a presentation about a topic
    Generate(GenerateArgs),

    /// Replace the image of one slide in a saved presentation
    RegenerateImage {
        /// Saved presentation JSON file
        #[arg(value_name = "PRESENTATION")]
        presentation: PathBuf,

        /// Slide id or 1-based slide number
        #[arg(short, long)]
        slide: String,

        /// Template whose style is applied to the new image
        #[arg(short, long)]
        template: Option<String>,
    },

    /// List the available style templates
    Templates,

    /// Export a saved presentation with its assets
    Export {
        /// Saved presentation JSON file
        #[arg(value_name = "PRESENTATION")]
        presentation: PathBuf,

        /// Output directory
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Render diagram bullets to SVG with the mermaid CLI (mmdc)
        #[arg(long)]
        render_diagrams: bool,
    },

    /// Generate shell completions for slidesmith
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Presentation topic
    #[arg(value_name = "TOPIC")]
    topic: String,

    /// Number of slides (3 to 15)
    #[arg(short = 'n', long)]
    slides: Option<usize>,

    /// Skip slide image generation
    #[arg(long)]
    no_images: bool,

    /// Produce an animated intro video
    #[arg(long)]
    video: bool,

    /// Style template id
    #[arg(short, long)]
    template: Option<String>,

    /// Output JSON file (defaults to the topic name in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Slidesmith - AI presentation generator
///
/// Turns a topic into a slide deck with speaker notes, slide images and an
/// optional intro video using Google's generative AI models.
#[derive(Parser, Debug)]
#[command(name = "slidesmith")]
#[command(version)]
#[command(about = "AI-powered presentation generator")]
#[command(long_about = "Slidesmith turns a topic into a complete slide deck using generative AI.

EXAMPLES:
    slidesmith generate \"The Future of AI\"              # Generate with config defaults
    slidesmith generate \"Ocean Currents\" -n 5 --video   # 5 slides and an intro video
    slidesmith generate \"Cells\" -t template-academic    # Use a style template
    slidesmith regenerate-image cells.json --slide 2     # New image for slide 2
    slidesmith export cells.json out/ --render-diagrams  # Write JSON, Markdown and assets
    slidesmith completions bash > slidesmith.bash        # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. The API key may also be given through the
    API_KEY or GEMINI_API_KEY environment variables.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set below
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "slidesmith", &mut std::io::stdout());
            Ok(())
        }
        Commands::Templates => {
            let config = load_config(&cli.config_path, cli.log_level.as_ref())?;
            let controller = Controller::with_config(config)?;
            print!("{}", controller.list_templates());
            Ok(())
        }
        Commands::Export { presentation, dir, render_diagrams } => {
            let config = load_config(&cli.config_path, cli.log_level.as_ref())?;
            let controller = Controller::with_config(config)?;
            let summary = controller.export(&presentation, &dir, render_diagrams).await?;
            info!(
                "Export complete: {:?} ({} images, {} diagrams)",
                summary.markdown_path,
                summary.images.len(),
                summary.diagrams.len()
            );
            Ok(())
        }
        Commands::Generate(args) => {
            let config = load_validated_config(&cli.config_path, cli.log_level.as_ref())?;
            run_generate(Controller::with_config(config)?, args).await
        }
        Commands::RegenerateImage { presentation, slide, template } => {
            let config = load_validated_config(&cli.config_path, cli.log_level.as_ref())?;
            let controller = Controller::with_config(config)?;
            run_regenerate(&controller, &presentation, &slide, template.as_deref()).await
        }
    }
}

async fn run_generate(controller: Controller, args: GenerateArgs) -> Result<()> {
    let options = GenerateOptions {
        slides_count: args.slides,
        include_images: args.no_images.then_some(false),
        include_video: args.video.then_some(true),
        template: args.template,
    };
    let request = controller.build_request(&args.topic, &options)?;

    let start_time = Instant::now();
    let output = controller.generate_to_file(&request, args.output).await?;

    info!(
        "Presentation \"{}\" generated in {}: {:?}",
        request.topic,
        Controller::format_duration(start_time.elapsed()),
        output
    );
    Ok(())
}

async fn run_regenerate(controller: &Controller, path: &Path, slide: &str, template: Option<&str>) -> Result<()> {
    let slide_id = controller.replace_image(path, slide, template).await?;
    info!("Success: new image for {}", slide_id);
    Ok(())
}

/// Load the configuration and make sure it can reach the provider
fn load_validated_config(config_path: &str, log_level: Option<&CliLogLevel>) -> Result<Config> {
    let config = load_config(config_path, log_level)?;
    config.validate()
        .context("Configuration validation failed")?;
    Ok(config)
}

/// Load or create the configuration file, then apply environment and CLI overrides
fn load_config(config_path: &str, log_level: Option<&CliLogLevel>) -> Result<Config> {
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    config.apply_env_overrides();

    match log_level {
        Some(level) => config.log_level = level.clone().into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    Ok(config)
}
