/*!
 * Incremental translation cache.
 *
 * The previously written target file is the cache: only top-level keys of the
 * source that are missing from it are sent for translation, and the fresh
 * results are appended to what is already there.
 */

use log::{debug, warn};
use std::path::Path;

use crate::errors::TranslationError;
use crate::file_utils::FileManager;
use crate::locale::{LocaleDocument, LocaleMap, LocaleValue};

/// What still has to be translated for one target file
#[derive(Debug, Clone, PartialEq)]
pub struct WorkPlan {
    /// The part of the source document that needs translation
    pub to_translate: LocaleDocument,
    /// Existing translations the results are merged into
    pub base: LocaleDocument,
    /// Whether an existing target file was used
    pub cache_hit: bool,
    /// Number of top-level keys reused from the target file
    pub reused_keys: usize,
}

impl WorkPlan {
    /// A plan translating the whole source and overwriting the target
    pub fn full(source: &LocaleDocument) -> Self {
        Self {
            to_translate: source.clone(),
            base: LocaleDocument::empty_map(),
            cache_hit: false,
            reused_keys: 0,
        }
    }

    /// Whether the target file already holds everything
    pub fn is_up_to_date(&self) -> bool {
        self.cache_hit && self.to_translate.is_empty()
    }

    /// Number of top-level entries that will be translated
    pub fn pending_keys(&self) -> usize {
        match &self.to_translate {
            LocaleValue::Map(map) => map.len(),
            LocaleValue::List(items) => items.len(),
            LocaleValue::Text(_) => 1,
        }
    }

    /// Merge freshly translated entries into the base
    ///
    /// Base keys keep their value and position; new keys are appended in
    /// the order they were translated. A non-map result replaces the base.
    pub fn merge(&self, translated: LocaleDocument) -> LocaleDocument {
        match (&self.base, translated) {
            (LocaleValue::Map(base), LocaleValue::Map(fresh)) => {
                let mut merged = base.clone();
                for (key, value) in fresh {
                    merged.entry(key).or_insert(value);
                }
                LocaleValue::Map(merged)
            }
            (_, translated) => translated,
        }
    }
}

/// Plans incremental work against previously written target files
#[derive(Debug, Clone)]
pub struct IncrementalCache {
    /// Whether existing target files are consulted at all
    enabled: bool,
}

impl IncrementalCache {
    /// Create a cache; a disabled cache always plans a full translation
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Load the target file and compute the plan for `source`
    pub async fn plan<P: AsRef<Path>>(&self, source: &LocaleDocument, target_path: P) -> WorkPlan {
        if !self.enabled {
            return WorkPlan::full(source);
        }

        let cached = load_cache(target_path).await;
        plan_work(source, cached.as_ref())
    }
}

/// Read a previously written target file
///
/// A missing file is `None`. A file that cannot be read, is not JSON or is
/// not a valid locale document is reported as a warning and also yields
/// `None`, so the target is translated from scratch.
pub async fn load_cache<P: AsRef<Path>>(path: P) -> Option<LocaleDocument> {
    let path = path.as_ref();
    match FileManager::read_locale_file_if_exists(path).await {
        Ok(cached) => cached,
        Err(e) => {
            let error = TranslationError::CacheReadFailure {
                path: path.display().to_string(),
                cause: e.to_string(),
            };
            warn!("{}; translating everything", error);
            None
        }
    }
}

/// Compute what to translate given the cached target document
///
/// Only top-level map keys are compared. A batch document (list root) on
/// either side cannot be diffed and is translated in full.
pub fn plan_work(source: &LocaleDocument, cached: Option<&LocaleDocument>) -> WorkPlan {
    let Some(cached) = cached else {
        return WorkPlan::full(source);
    };

    match (source, cached) {
        (LocaleValue::Map(source_map), LocaleValue::Map(cached_map)) => {
            let missing: LocaleMap = source_map
                .iter()
                .filter(|(key, _)| !cached_map.contains_key(*key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            let reused_keys = source_map.len() - missing.len();

            debug!("Cache: {} key(s) reused, {} key(s) to translate", reused_keys, missing.len());

            WorkPlan {
                to_translate: LocaleValue::Map(missing),
                base: cached.clone(),
                cache_hit: true,
                reused_keys,
            }
        }
        _ => {
            debug!("Cache: batch document cannot be diffed, translating everything");
            WorkPlan::full(source)
        }
    }
}
