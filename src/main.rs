// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use log::{info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use ollama_i18n::app_config::{self, Config, VariableMode};
use ollama_i18n::app_controller::Controller;

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

/// CLI Wrapper for VariableMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliVariableMode {
    Curly,
    Dollar,
}

impl From<CliVariableMode> for VariableMode {
    fn from(cli_mode: CliVariableMode) -> Self {
        match cli_mode {
            CliVariableMode::Curly => VariableMode::Curly,
            CliVariableMode::Dollar => VariableMode::Dollar,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for ollama-i18n
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// ollama-i18n - Translate JSON locale files with a local LLM
///
/// Translates every string of a JSON locale file with an Ollama model while
/// keeping keys, nesting and template variables intact.
#[derive(Parser, Debug)]
#[command(name = "ollama-i18n")]
#[command(version)]
#[command(about = "Translate JSON locale files with local Ollama models")]
#[command(long_about = "ollama-i18n translates JSON locale files with a local Ollama model.
Keys, nesting and template variables are preserved; existing translations are kept.

EXAMPLES:
    ollama-i18n --dir locales --source en                 # en.json into every other <locale>.json
    ollama-i18n --dir locales --source en --target fr     # en.json into fr.json only
    ollama-i18n --dir locales/en --input-locale en --output-locale de
                                                          # every namespace file into locales/de/
    ollama-i18n --variable-mode dollar --no-cache         # $name variables, retranslate everything
    ollama-i18n completions bash > ollama-i18n.bash       # Generate bash completions

CONFIGURATION:
    Settings can be read from a JSON file with --config. Command line flags
    override values from the file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory holding the locale files
    #[arg(short, long)]
    dir: Option<String>,

    /// Source locale code (e.g., 'en')
    #[arg(short, long)]
    source: Option<String>,

    /// Translate only into this locale
    #[arg(short, long)]
    target: Option<String>,

    /// Ollama model name
    #[arg(short, long)]
    model: Option<String>,

    /// Retranslate everything instead of only missing keys
    #[arg(long)]
    no_cache: bool,

    /// Placeholder syntax used in the strings
    #[arg(long, value_enum)]
    variable_mode: Option<CliVariableMode>,

    /// Locale of the namespace files in --dir
    #[arg(long, requires = "output_locale")]
    input_locale: Option<String>,

    /// Locale directory to write next to --dir
    #[arg(long, requires = "input_locale")]
    output_locale: Option<String>,

    /// Ollama server URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Maximum number of model requests in flight
    #[arg(long)]
    max_concurrent: Option<usize>,

    /// Do not pull the model when it is missing
    #[arg(long)]
    skip_pull: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

impl CommandLineOptions {
    /// Apply command line values on top of `config`
    fn apply_to(self, mut config: Config) -> Config {
        if let Some(dir) = self.dir {
            config.directory = dir;
        }
        if let Some(source) = self.source {
            config.source_locale = source;
        }
        if self.target.is_some() {
            config.target_locale = self.target;
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if self.no_cache {
            config.cache = false;
        }
        if let Some(mode) = self.variable_mode {
            config.variable_mode = mode.into();
        }
        if self.input_locale.is_some() {
            config.input_locale = self.input_locale;
        }
        if self.output_locale.is_some() {
            config.output_locale = self.output_locale;
        }
        if let Some(endpoint) = self.endpoint {
            config.endpoint = endpoint;
        }
        if self.max_concurrent.is_some() {
            config.max_concurrent_requests = self.max_concurrent;
        }
        if self.skip_pull {
            config.pull_model = false;
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level.into();
        }
        config
    }
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
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
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

    // @returns: ANSI color code for log level
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
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
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
    // Initialize the logger once with info level by default
    // The level is updated after loading the config
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let mut cli = CommandLineOptions::parse();

    // Handle subcommands
    if let Some(Commands::Completions { shell }) = cli.command.take() {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "ollama-i18n", &mut std::io::stdout());
        return Ok(());
    }

    // Load configuration, then override it with CLI options
    let base_config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let config = cli.apply_to(base_config);

    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;
    let report = controller.run().await?;

    info!("Done: {}", report);
    Ok(())
}
