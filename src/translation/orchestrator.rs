/*!
 * Per-locale translation orchestrator.
 *
 * Every job goes through the same steps: plan against the cached target,
 * walk the pending part of the source, merge and write. Jobs run
 * concurrently and a failing job never stops its siblings.
 */

use futures::future::join_all;
use log::{error, info};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use super::cache::{IncrementalCache, WorkPlan};
use super::invoker::TextTranslator;
use super::walker::TreeWalker;
use crate::app_config::{TranslationOptions, VariableMode};
use crate::errors::TranslationError;
use crate::file_utils::FileManager;
use crate::locale::LocaleDocument;

/// One target file to produce
#[derive(Debug, Clone)]
pub struct TranslationJob {
    /// Locale the document is translated into
    pub target_locale: String,
    /// Name used in log lines (source locale or namespace file)
    pub label: String,
    /// The validated source document
    pub source: Arc<LocaleDocument>,
    /// Where the translated document is written
    pub output_path: PathBuf,
}

impl TranslationJob {
    /// Create a job
    pub fn new(
        target_locale: impl Into<String>,
        label: impl Into<String>,
        source: Arc<LocaleDocument>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            target_locale: target_locale.into(),
            label: label.into(),
            source,
            output_path: output_path.into(),
        }
    }
}

/// What happened to one job
#[derive(Debug)]
pub enum LocaleOutcome {
    /// The target file was written
    Written {
        /// Output path
        path: PathBuf,
        /// Number of top-level entries that were translated
        translated_keys: usize,
    },
    /// The target file already held every key
    UpToDate,
    /// The job failed; nothing was written
    Failed(TranslationError),
}

/// Outcome of one job together with its identity
#[derive(Debug)]
pub struct JobReport {
    /// Target locale
    pub target_locale: String,
    /// Job label
    pub label: String,
    /// Outcome
    pub outcome: LocaleOutcome,
}

impl JobReport {
    /// `label -> locale`, the name used in summaries
    pub fn name(&self) -> String {
        if self.label == self.target_locale {
            self.target_locale.clone()
        } else {
            format!("{} -> {}", self.label, self.target_locale)
        }
    }
}

/// Outcomes of every job of a run, in job order
#[derive(Debug, Default)]
pub struct RunReport {
    /// One entry per job
    pub jobs: Vec<JobReport>,
}

impl RunReport {
    /// Whether no job failed
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    /// The failed jobs
    pub fn failed(&self) -> Vec<&JobReport> {
        self.jobs
            .iter()
            .filter(|job| matches!(job.outcome, LocaleOutcome::Failed(_)))
            .collect()
    }

    /// Number of written target files
    pub fn written_count(&self) -> usize {
        self.jobs
            .iter()
            .filter(|job| matches!(job.outcome, LocaleOutcome::Written { .. }))
            .count()
    }

    /// Number of jobs that had nothing to do
    pub fn up_to_date_count(&self) -> usize {
        self.jobs
            .iter()
            .filter(|job| matches!(job.outcome, LocaleOutcome::UpToDate))
            .count()
    }

    /// Number of failed jobs
    pub fn failed_count(&self) -> usize {
        self.failed().len()
    }

    /// The report entry of `target_locale` (first match)
    pub fn outcome_for(&self, target_locale: &str) -> Option<&LocaleOutcome> {
        self.jobs
            .iter()
            .find(|job| job.target_locale == target_locale)
            .map(|job| &job.outcome)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} written, {} up to date, {} failed",
            self.written_count(),
            self.up_to_date_count(),
            self.failed_count()
        )
    }
}

/// Runs translation jobs against one translator
pub struct Orchestrator<T> {
    translator: T,
    source_language: String,
    variable_mode: VariableMode,
    cache: IncrementalCache,
}

impl<T: TextTranslator> Orchestrator<T> {
    /// Create an orchestrator using `translator` and the run options
    pub fn new(translator: T, options: &TranslationOptions) -> Self {
        Self {
            translator,
            source_language: options.source_lang.clone(),
            variable_mode: options.variable_mode,
            cache: IncrementalCache::new(options.cache),
        }
    }

    /// The translator behind this orchestrator
    pub fn translator(&self) -> &T {
        &self.translator
    }

    /// Plan every job against its cached target file
    pub async fn plan(&self, jobs: &[TranslationJob]) -> Vec<WorkPlan> {
        join_all(jobs.iter().map(|job| self.cache.plan(&job.source, &job.output_path))).await
    }

    /// Plan and run every job
    pub async fn run(&self, jobs: &[TranslationJob]) -> RunReport {
        let plans = self.plan(jobs).await;
        self.execute(jobs, plans).await
    }

    /// Run every job with a plan computed by [`Orchestrator::plan`]
    pub async fn execute(&self, jobs: &[TranslationJob], plans: Vec<WorkPlan>) -> RunReport {
        let runs = jobs.iter().zip(plans).map(|(job, plan)| async move {
            let outcome = match self.run_job(job, plan).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Failed to translate {} to {}: {}", job.label, job.target_locale, e);
                    LocaleOutcome::Failed(e)
                }
            };
            JobReport {
                target_locale: job.target_locale.clone(),
                label: job.label.clone(),
                outcome,
            }
        });

        RunReport {
            jobs: join_all(runs).await,
        }
    }

    async fn run_job(&self, job: &TranslationJob, plan: WorkPlan) -> Result<LocaleOutcome, TranslationError> {
        if plan.is_up_to_date() {
            info!("{} is already up to date for {}", job.label, job.target_locale);
            return Ok(LocaleOutcome::UpToDate);
        }

        let walker = TreeWalker::new(&self.translator, &self.source_language);
        let translated = walker
            .translate_object(&plan.to_translate, &job.target_locale, self.variable_mode)
            .await?;

        let merged = plan.merge(translated);
        FileManager::write_locale_file(&job.output_path, &merged).await?;

        info!("Translated {} to {}", job.label, job.target_locale);
        Ok(LocaleOutcome::Written {
            path: job.output_path.clone(),
            translated_keys: plan.pending_keys(),
        })
    }
}
