use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and turning settings into translation options.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the locale files (or the namespace files of the input locale)
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Source locale code, also the stem of the source file in the flat layout
    #[serde(default = "default_source_locale")]
    pub source_locale: String,

    /// Translate only into this locale (flat layout)
    #[serde(default)]
    pub target_locale: Option<String>,

    /// Locale of the namespace files in `directory` (namespaced layout)
    #[serde(default)]
    pub input_locale: Option<String>,

    /// Locale directory written next to `directory` (namespaced layout)
    #[serde(default)]
    pub output_locale: Option<String>,

    /// Ollama model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Ollama service endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Reuse existing target files and only translate missing top-level keys
    #[serde(default = "default_true")]
    pub cache: bool,

    /// Placeholder syntax used by the locale strings
    #[serde(default)]
    pub variable_mode: VariableMode,

    /// Maximum number of model calls in flight (unbounded if absent)
    #[serde(default)]
    pub max_concurrent_requests: Option<usize>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Pull the model from the Ollama registry when it is not available locally
    #[serde(default = "default_true")]
    pub pull_model: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Placeholder syntax of the template variables inside locale strings
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VariableMode {
    /// Variables look like `{name}`
    #[default]
    Curly,
    /// Variables look like `$name`
    Dollar,
}

impl VariableMode {
    // @returns: Lowercase mode identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Curly => "curly",
            Self::Dollar => "dollar",
        }
    }
}

// Implement Display trait for VariableMode
impl std::fmt::Display for VariableMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Implement FromStr trait for VariableMode
impl std::str::FromStr for VariableMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "curly" => Ok(Self::Curly),
            "dollar" => Ok(Self::Dollar),
            _ => Err(anyhow!("Invalid variable mode: {} (expected 'curly' or 'dollar')", s)),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// The matching `log` crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

/// The settings the translation engine needs for one run
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOptions {
    /// Model name
    pub model: String,
    /// Source language code
    pub source_lang: String,
    /// Placeholder syntax
    pub variable_mode: VariableMode,
    /// Whether existing target files are used as a cache
    pub cache: bool,
    /// Optional cap on in-flight model calls
    pub max_concurrent_requests: Option<usize>,
}

fn default_directory() -> String {
    "locales".to_string()
}

fn default_source_locale() -> String {
    "en".to_string()
}

fn default_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load a configuration file; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.directory.trim().is_empty() {
            return Err(anyhow!("Locale directory must not be empty"));
        }

        if self.source_locale.trim().is_empty() {
            return Err(anyhow!("Source locale must not be empty"));
        }

        if self.input_locale.is_some() != self.output_locale.is_some() {
            return Err(anyhow!(
                "Input locale and output locale must be given together for namespaced translation"
            ));
        }

        if let (Some(input), Some(output)) = (&self.input_locale, &self.output_locale) {
            if input == output {
                return Err(anyhow!("Output locale must differ from the input locale: {}", output));
            }
        }

        if self.model.trim().is_empty() {
            return Err(anyhow!("Model name must not be empty"));
        }

        if self.max_concurrent_requests == Some(0) {
            return Err(anyhow!("Maximum concurrent requests must be at least 1"));
        }

        url::Url::parse(&self.endpoint)
            .with_context(|| format!("Invalid Ollama endpoint: {}", self.endpoint))?;

        Ok(())
    }

    /// Whether the namespaced layout is selected
    pub fn is_namespaced(&self) -> bool {
        self.input_locale.is_some() && self.output_locale.is_some()
    }

    /// The options handed to the translation engine
    ///
    /// In the namespaced layout the input locale is the source language.
    pub fn translation_options(&self) -> TranslationOptions {
        let source_lang = match &self.input_locale {
            Some(input) if self.is_namespaced() => input.clone(),
            _ => self.source_locale.clone(),
        };

        TranslationOptions {
            model: self.model.clone(),
            source_lang,
            variable_mode: self.variable_mode,
            cache: self.cache,
            max_concurrent_requests: self.max_concurrent_requests,
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            directory: default_directory(),
            source_locale: default_source_locale(),
            target_locale: None,
            input_locale: None,
            output_locale: None,
            model: default_model(),
            endpoint: default_endpoint(),
            cache: true,
            variable_mode: VariableMode::default(),
            max_concurrent_requests: None,
            timeout_secs: default_timeout_secs(),
            pull_model: true,
            log_level: LogLevel::default(),
        }
    }
}
