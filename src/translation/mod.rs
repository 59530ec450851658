/*!
 * Locale translation engine.
 *
 * This module contains the core functionality for translating locale
 * documents with a chat model. It is split into several submodules:
 *
 * - `prompts`: Placeholder-protecting prompt templates and the response schema
 * - `invoker`: Single-string translation against a provider
 * - `walker`: Structure-preserving traversal of locale documents
 * - `cache`: Incremental planning and merging against existing target files
 * - `orchestrator`: Concurrent per-locale jobs and their outcomes
 */

// Re-export main types for easier usage
pub use self::cache::{IncrementalCache, WorkPlan};
pub use self::invoker::{LlmTranslator, TextTranslator};
pub use self::orchestrator::{JobReport, LocaleOutcome, Orchestrator, RunReport, TranslationJob};
pub use self::prompts::{PromptTemplate, TranslationPayload};
pub use self::walker::TreeWalker;

// Submodules
pub mod cache;
pub mod invoker;
pub mod orchestrator;
pub mod prompts;
pub mod walker;
