// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::{Result, anyhow, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::{Config, TranslationProvider};
use crate::session::{Glossary, SessionStore};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod chapter;
mod errors;
mod file_utils;
mod language_utils;
mod providers;
mod report;
mod session;
mod translation;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Ollama,
    OpenAI,
    LMStudio,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::LMStudio => TranslationProvider::LMStudio,
        }
    }
}

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

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate novel chapters using AI providers (default command)
    #[command(alias = "translate")]
    Translate(TranslateArgs),

    /// Inspect or extend a novel's stored glossary
    Glossary(GlossaryArgs),

    /// Generate shell completions for yantai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input directory holding novels (one subdirectory per novel, or
    /// loose chapter .txt files)
    #[arg(value_name = "INPUT_DIR")]
    input_dir: PathBuf,

    /// Output directory for translated chapters (defaults to the input directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Source language code (e.g., 'ja', 'zh', 'pt')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Run the whole-chapter semantic review pass after each translation
    #[arg(long)]
    semantic_review: bool,
}

#[derive(Parser, Debug)]
struct GlossaryArgs {
    /// Novel session name (the novel's directory name under the input root)
    #[arg(value_name = "NOVEL")]
    novel: String,

    /// Add a pinned term mapping; can be given multiple times
    #[arg(long = "add", value_name = "SOURCE=TARGET")]
    add: Vec<String>,

    /// Also list pending term suggestions awaiting review
    #[arg(long)]
    suggestions: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,
}

/// yantai - Yet Another Novel Translator with AI
///
/// A chapter-by-chapter novel translation tool that guards against silent
/// summarization and repairs dialogue quoting, using various AI providers
/// (Ollama, OpenAI, LM Studio).
#[derive(Parser, Debug)]
#[command(name = "yantai")]
#[command(author = "yantai Team")]
#[command(version = "0.3.0")]
#[command(about = "AI-powered chapter-by-chapter novel translation tool")]
#[command(long_about = "yantai translates web-novel chapters stored as plain text files, one chapter
at a time, keeping a per-novel glossary and a running story context between
chapters. Output volume is checked against the source so silent summarization
is caught and retried, and dialogue quoting is normalized to 「...」 pairs.

EXAMPLES:
    yantai ./novels                            # Translate using default config
    yantai -f ./novels                         # Force overwrite existing files
    yantai -p openai -m gpt-4o ./novels        # Use specific provider and model
    yantai -s ja -t en ./novels                # Translate from Japanese to English
    yantai -o ./out -l debug ./novels          # Separate output dir, debug logging
    yantai glossary frost                      # Show the stored glossary for 'frost'
    yantai glossary frost --add \"アカリ=Akari\"  # Pin a term translation
    yantai completions bash > yantai.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

SUPPORTED PROVIDERS:
    ollama    - Local Ollama server (default: llama3.1:8b)
    openai    - OpenAI API (requires API key)
    lmstudio  - LM Studio local server (OpenAI-compatible on http://localhost:1234/v1)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input directory holding novels (one subdirectory per novel, or
    /// loose chapter .txt files)
    #[arg(value_name = "INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Output directory for translated chapters (defaults to the input directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Source language code (e.g., 'ja', 'zh', 'pt')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Run the whole-chapter semantic review pass after each translation
    #[arg(long)]
    semantic_review: bool,
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
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");

            let mut stderr = std::io::stderr();
            let emoji = Self::get_emoji_for_level(record.level());
            let _ = match record.level() {
                Level::Error => writeln!(
                    stderr,
                    "\x1B[1;31m{} {} {}\x1B[0m",
                    now, emoji, record.args()
                ),
                Level::Warn => writeln!(
                    stderr,
                    "\x1B[1;33m{} {} {}\x1B[0m",
                    now, emoji, record.args()
                ),
                Level::Info => writeln!(
                    stderr,
                    "\x1B[1;32m{} {} {}\x1B[0m",
                    now, emoji, record.args()
                ),
                Level::Debug => writeln!(
                    stderr,
                    "\x1B[1;36m{} {} {}\x1B[0m",
                    now, emoji, record.args()
                ),
                Level::Trace => writeln!(
                    stderr,
                    "\x1B[1;35m{} {} {}\x1B[0m",
                    now, emoji, record.args()
                ),
            };
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "yantai", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Glossary(args)) => run_glossary(args),
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_dir = cli.input_dir.ok_or_else(|| {
                anyhow!("INPUT_DIR is required when no subcommand is specified")
            })?;

            let translate_args = TranslateArgs {
                input_dir,
                output_dir: cli.output_dir,
                force_overwrite: cli.force_overwrite,
                provider: cli.provider,
                model: cli.model,
                source_language: cli.source_language,
                target_language: cli.target_language,
                config_path: cli.config_path,
                log_level: cli.log_level,
                semantic_review: cli.semantic_review,
            };
            run_translate(translate_args).await
        }
    }
}

/// Load the configuration file, creating a default one on first run
fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        Ok(config)
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();

        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        Ok(config)
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let mut config = load_or_create_config(&options.config_path)?;

    // Override config with CLI options if provided
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(model) = &options.model {
        // Find the provider config and update the model
        let provider_str = config.translation.provider.to_lowercase_string();
        if let Some(provider_config) = config.translation.available_providers.iter_mut()
            .find(|p| p.provider_type == provider_str) {
            provider_config.model = model.clone();
        }
    }

    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }

    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }

    if options.semantic_review {
        config.translation.semantic_review = true;
    }

    // Update log level in config if specified via command line
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        // Just update the max level without reinitializing the logger
        log::set_max_level(level_filter(&config.log_level));
    }

    if !options.input_dir.is_dir() {
        return Err(anyhow!(
            "Input path is not a directory: {:?} (expected a directory of novels or chapter files)",
            options.input_dir
        ));
    }

    let output_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| options.input_dir.clone());

    // Create controller and run the batch
    let controller = Controller::with_config(config)?;
    controller
        .run(options.input_dir, output_dir, options.force_overwrite)
        .await?;

    Ok(())
}

/// Show or extend the stored glossary of one novel
fn run_glossary(options: GlossaryArgs) -> Result<()> {
    let config = load_or_create_config(&options.config_path)?;
    let store = SessionStore::open(&config.session)?;

    if !options.add.is_empty() {
        let mut new_terms = Glossary::new();
        for pair in &options.add {
            let (source, target) = pair
                .split_once('=')
                .ok_or_else(|| anyhow!("Invalid term '{}', expected SOURCE=TARGET", pair))?;
            new_terms.insert(source.trim(), target.trim());
        }

        let merged = store.append_terms(&options.novel, &new_terms)?;
        info!(
            "Glossary for '{}' now holds {} term(s)",
            options.novel,
            merged.len()
        );
        return Ok(());
    }

    let glossary = store.load_glossary(&options.novel)?;
    if glossary.is_empty() {
        println!("No glossary terms recorded for '{}'", options.novel);
    } else {
        for (source, entry) in glossary.iter() {
            match entry.annotation() {
                Some(note) => println!("{} -> {} ({})", source, entry.target, note),
                None => println!("{} -> {}", source, entry.target),
            }
        }
    }

    if options.suggestions {
        let suggestions = store.load_suggestions(&options.novel)?;
        if suggestions.is_empty() {
            println!("No pending suggestions for '{}'", options.novel);
        } else {
            println!();
            println!("Suggestions:");
            for suggestion in &suggestions {
                println!("  {}", suggestion);
            }
        }
    }

    Ok(())
}
