use anyhow::{Result, Context, anyhow};
use log::{error, info, warn};
use std::path::Path;
use std::sync::Arc;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::providers::Provider;
use crate::providers::ollama::Ollama;
use crate::translation::{LlmTranslator, Orchestrator, RunReport, TextTranslator, TranslationJob};

// @module: Application controller for locale translation

/// Main application controller for locale translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()
            .context("Configuration validation failed")?;

        Ok(Self { config })
    }

    /// Run the whole workflow against the configured Ollama server
    ///
    /// Fails if any locale failed; the other locales are still written.
    pub async fn run(&self) -> Result<RunReport> {
        let start_time = std::time::Instant::now();

        let provider = Ollama::new_with_config(&self.config.endpoint, self.config.timeout_secs);
        self.prepare_model(&provider).await;

        let progress_bar = Self::create_progress_bar();
        let translator = LlmTranslator::new(provider, &self.config.model)
            .with_progress(progress_bar.clone())
            .with_concurrency_limit(self.config.max_concurrent_requests);

        info!("🚀 ollama-i18n: {} ({} variables)", self.config.model, self.config.variable_mode);
        let report = self.translate_with(translator, Some(&progress_bar)).await?;

        info!("Translation finished in {}: {}", Self::format_duration(start_time.elapsed()), report);
        Self::check_report(report)
    }

    /// Build the jobs and run them with `translator`
    ///
    /// Every source document is loaded and validated before the first job
    /// starts. Per-locale failures are reported, not returned as errors.
    pub async fn translate_with<T: TextTranslator>(&self, translator: T, progress_bar: Option<&ProgressBar>) -> Result<RunReport> {
        let jobs = self.build_jobs().await?;
        let orchestrator = Orchestrator::new(translator, &self.config.translation_options());

        let plans = orchestrator.plan(&jobs).await;
        if let Some(progress_bar) = progress_bar {
            let total_strings: usize = plans
                .iter()
                .filter(|plan| !plan.is_up_to_date())
                .map(|plan| plan.to_translate.count_strings())
                .sum();
            progress_bar.set_length(total_strings as u64);
            progress_bar.set_message("Translating");
        }

        let report = orchestrator.execute(&jobs, plans).await;

        if let Some(progress_bar) = progress_bar {
            progress_bar.finish_and_clear();
        }

        for job in report.failed() {
            error!("Locale {} failed", job.name());
        }

        Ok(report)
    }

    /// Turn a report with failed locales into an error
    pub fn check_report(report: RunReport) -> Result<RunReport> {
        if report.is_success() {
            return Ok(report);
        }

        let failed: Vec<String> = report.failed().iter().map(|job| job.name()).collect();
        Err(AppError::LocalesFailed {
            count: failed.len(),
            locales: failed.join(", "),
        }
        .into())
    }

    /// Load every source document and build one job per target file
    pub async fn build_jobs(&self) -> Result<Vec<TranslationJob>> {
        let directory = Path::new(&self.config.directory);

        match (&self.config.input_locale, &self.config.output_locale) {
            (Some(input_locale), Some(output_locale)) => {
                self.build_namespaced_jobs(directory, input_locale, output_locale).await
            }
            _ => self.build_flat_jobs(directory).await,
        }
    }

    /// `<dir>/<source>.json` into `<dir>/<target>.json` for every target
    async fn build_flat_jobs(&self, directory: &Path) -> Result<Vec<TranslationJob>> {
        let source_locale = &self.config.source_locale;
        let source_path = FileManager::locale_file_path(directory, source_locale);
        if !FileManager::file_exists(&source_path) {
            return Err(anyhow!("Source locale file not found: {}", source_path.display()));
        }

        let source = FileManager::read_locale_file(&source_path)
            .await
            .with_context(|| format!("Invalid source locale file: {}", source_path.display()))?;
        let source = Arc::new(source);

        let targets: Vec<String> = match &self.config.target_locale {
            Some(target) if target == source_locale => {
                return Err(anyhow!("Target locale must differ from the source locale: {}", target));
            }
            Some(target) => vec![target.clone()],
            None => FileManager::find_locale_files(directory, &[source_locale.as_str()])?
                .iter()
                .map(FileManager::file_stem)
                .collect(),
        };

        if targets.is_empty() {
            return Err(anyhow!(
                "No target locale files found in {} (create <locale>.json files or pass --target)",
                directory.display()
            ));
        }

        info!("Translating {} into {}", source_locale, targets.join(", "));

        Ok(targets
            .into_iter()
            .map(|target| {
                let output_path = FileManager::locale_file_path(directory, &target);
                TranslationJob::new(target, source_locale.clone(), Arc::clone(&source), output_path)
            })
            .collect())
    }

    /// Every namespace file of `<dir>` into `<dir>/../<output>/<file>`
    async fn build_namespaced_jobs(&self, directory: &Path, input_locale: &str, output_locale: &str) -> Result<Vec<TranslationJob>> {
        let files = FileManager::find_locale_files(directory, &[])?;
        if files.is_empty() {
            return Err(anyhow!("No namespace files found in {}", directory.display()));
        }

        let mut jobs = Vec::with_capacity(files.len());
        for file in &files {
            let source = FileManager::read_locale_file(file)
                .await
                .with_context(|| format!("Invalid namespace file: {}", file.display()))?;
            jobs.push(TranslationJob::new(
                output_locale,
                FileManager::file_stem(file),
                Arc::new(source),
                FileManager::namespace_output_path(directory, file, output_locale),
            ));
        }

        info!("Translating {} namespace file(s) from {} into {}", jobs.len(), input_locale, output_locale);
        Ok(jobs)
    }

    /// Make sure the model is available; problems are logged, not fatal
    async fn prepare_model(&self, provider: &Ollama) {
        if let Err(e) = provider.test_connection().await {
            warn!("Ollama server at {} is not reachable: {}", provider.base_url(), e);
        }

        if !self.config.pull_model {
            return;
        }

        match provider.ensure_model(&self.config.model).await {
            Ok(true) => info!("Model {} pulled", self.config.model),
            Ok(false) => {}
            Err(e) => error!("Could not make model {} available: {}", self.config.model, e),
        }
    }

    fn create_progress_bar() -> ProgressBar {
        let progress_bar = ProgressBar::new(0);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} strings ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar
    }

    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
