// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::PathBuf;
use std::io::Write;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use chapter_extractor::app_config::{self, Config, ExtractionProfile};
use chapter_extractor::app_controller::Controller;
use chapter_extractor::file_utils::FileManager;

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

/// Options shared by every command that reads the chapter plan
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Chapter plan configuration file
    #[arg(short = 'c', long = "config", default_value = "tools/chapter_plan.json")]
    config_path: PathBuf,

    /// Location of the master scenario file (overrides the configuration)
    #[arg(long)]
    script_path: Option<PathBuf>,

    /// Target locale code, e.g. 'en' or 'ja' (overrides the configuration)
    #[arg(long)]
    locale: Option<String>,

    /// Replace the list of script commands kept as music cues
    #[arg(long, num_args = 1.., value_name = "CMD")]
    music_commands: Option<Vec<String>>,

    /// Keep an additional script command as a music cue (repeatable)
    #[arg(long = "add-music-command", value_name = "CMD")]
    add_music_commands: Vec<String>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Chapter id (or start label) to export
    #[arg(long)]
    chapter: String,

    /// Directory where JSON exports are written
    #[arg(short, long)]
    output_dir: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract one chapter into a JSON document (default command)
    Extract(ExtractArgs),

    /// List the chapters defined in the configuration
    List {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Generate shell completions for chapter-extractor
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// chapter-extractor - slice a scenario script into per-chapter JSON
#[derive(Parser, Debug)]
#[command(name = "chapter-extractor")]
#[command(version)]
#[command(about = "Extract structured chapter transcripts from a scenario script")]
#[command(long_about = "chapter-extractor reads the master scenario script, slices out the lines
between a chapter's start and end labels, and writes {id}.json containing the
narration, dialogue and music cues of the target locale.

EXAMPLES:
    chapter-extractor --chapter episode1-opening -o build/epub
    chapter-extractor extract --chapter umi1_opning -o build/epub --locale en
    chapter-extractor --chapter episode1-opening -o out --add-music-command se1
    chapter-extractor list -c tools/chapter_plan.json
    chapter-extractor completions bash > chapter-extractor.bash

CONFIGURATION:
    The chapter plan (tools/chapter_plan.json by default) lists the chapters
    and the speaker roster, and may set script_path, locale, music_commands,
    extra_music_commands, extra_tags and log_level.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Chapter id (or start label) to export
    #[arg(long)]
    chapter: Option<String>,

    /// Directory where JSON exports are written
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,
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

    // @returns: Tag and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("ERROR", "1;31"),
            Level::Warn => ("WARN ", "1;33"),
            Level::Info => ("INFO ", "1;32"),
            Level::Debug => ("DEBUG", "1;36"),
            Level::Trace => ("TRACE", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // The max level is adjusted after the config is read
        metadata.level() <= self.level.max(log::max_level())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (tag, color) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, tag, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // The level is updated after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "chapter-extractor", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::List { common }) => run_list(common),
        Some(Commands::Extract(args)) => run_extract(args),
        None => {
            // Default behavior - top-level args act as the extract command
            let chapter = cli.chapter.ok_or_else(|| {
                anyhow!("--chapter is required when no subcommand is specified")
            })?;
            let output_dir = cli.output_dir.ok_or_else(|| {
                anyhow!("--output-dir is required when no subcommand is specified")
            })?;

            run_extract(ExtractArgs {
                chapter,
                output_dir,
                common: cli.common,
            })
        }
    }
}

/// Load the chapter plan and apply command line overrides
fn load_config(common: &CommonArgs) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &common.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load(&common.config_path)
        .with_context(|| format!("Failed to load chapter plan: {}", common.config_path.display()))?;

    if let Some(locale) = &common.locale {
        config.set_locale(locale).context("Invalid --locale override")?;
    }

    if let Some(log_level) = &common.log_level {
        config.log_level = log_level.clone().into();
    } else {
        // Just update the max level without reinitializing the logger
        log::set_max_level(config.log_level.to_level_filter());
    }

    Ok(config)
}

/// Build the extraction profile from the config plus CLI cue overrides
fn build_profile(config: &Config, common: &CommonArgs) -> Result<ExtractionProfile> {
    let profile = config
        .profile()?
        .with_overrides(common.music_commands.as_deref(), &common.add_music_commands);

    Ok(profile)
}

fn run_extract(args: ExtractArgs) -> Result<()> {
    let config = load_config(&args.common)?;
    let profile = build_profile(&config, &args.common)?;
    let script_path = args
        .common
        .script_path
        .clone()
        .unwrap_or_else(|| config.script_path.clone());

    let controller = Controller::with_profile(config, profile);
    let report = controller
        .run(&script_path, &args.chapter, &args.output_dir)
        .with_context(|| format!("Failed to extract chapter '{}'", args.chapter))?;

    if !report.warnings.is_empty() {
        info!("{} warning(s) reported, see above", report.warnings.len());
    }
    println!("Wrote {}", FileManager::display_path(&report.output_path).display());

    Ok(())
}

fn run_list(common: CommonArgs) -> Result<()> {
    let config = load_config(&common)?;

    for chapter in &config.chapters {
        println!(
            "{}\t*{} .. *{}\t{} {}",
            chapter.id, chapter.start_label, chapter.end_label, chapter.episode, chapter.title
        );
    }

    Ok(())
}
