/*!
 * Structure-preserving tree walker.
 *
 * Rebuilds a locale document with every translatable string leaf replaced by
 * its translation. Keys, key order, list lengths and nesting never change.
 */

use futures::future::{BoxFuture, FutureExt, try_join_all};
use log::debug;

use super::invoker::TextTranslator;
use crate::app_config::VariableMode;
use crate::errors::TranslationError;
use crate::locale::{LocaleMap, LocaleValue, child_path, index_path};

/// Walks locale documents and sends their string leaves to a translator
pub struct TreeWalker<'a, T: ?Sized> {
    translator: &'a T,
    source_language: &'a str,
}

impl<'a, T> TreeWalker<'a, T>
where
    T: TextTranslator + ?Sized,
{
    /// Create a walker translating from `source_language`
    pub fn new(translator: &'a T, source_language: &'a str) -> Self {
        Self {
            translator,
            source_language,
        }
    }

    /// Translate a whole document into `target_language`
    ///
    /// - a string is translated
    /// - a list of strings is translated element by element, concurrently
    /// - any other list has its object elements walked; other elements are kept as is
    /// - an object has each value walked in key order
    pub async fn translate_object(
        &self,
        document: &LocaleValue,
        target_language: &str,
        mode: VariableMode,
    ) -> Result<LocaleValue, TranslationError> {
        self.translate_value(document, String::new(), target_language, mode).await
    }

    fn translate_value<'b>(
        &'b self,
        value: &'b LocaleValue,
        path: String,
        target_language: &'b str,
        mode: VariableMode,
    ) -> BoxFuture<'b, Result<LocaleValue, TranslationError>> {
        async move {
            match value {
                LocaleValue::Text(text) => {
                    let translated = self.translate_leaf(text, &path, target_language, mode).await?;
                    Ok(LocaleValue::Text(translated))
                }
                LocaleValue::List(items) if LocaleValue::is_string_list(items) => {
                    let calls = items.iter().enumerate().filter_map(|(index, item)| match item {
                        LocaleValue::Text(text) => {
                            let item_path = index_path(&path, index);
                            Some(async move {
                                self.translate_leaf(text, &item_path, target_language, mode)
                                    .await
                                    .map(LocaleValue::Text)
                            })
                        }
                        _ => None,
                    });
                    // Results come back in input order regardless of completion order
                    Ok(LocaleValue::List(try_join_all(calls).await?))
                }
                LocaleValue::List(items) => {
                    let mut translated = Vec::with_capacity(items.len());
                    for (index, item) in items.iter().enumerate() {
                        match item {
                            LocaleValue::Map(_) => {
                                let item_path = index_path(&path, index);
                                translated.push(self.translate_value(item, item_path, target_language, mode).await?);
                            }
                            other => translated.push(other.clone()),
                        }
                    }
                    Ok(LocaleValue::List(translated))
                }
                LocaleValue::Map(map) => {
                    let mut translated = LocaleMap::with_capacity(map.len());
                    for (key, item) in map {
                        let item_path = child_path(&path, key);
                        let value = self.translate_value(item, item_path, target_language, mode).await?;
                        translated.insert(key.clone(), value);
                    }
                    Ok(LocaleValue::Map(translated))
                }
            }
        }
        .boxed()
    }

    async fn translate_leaf(
        &self,
        text: &str,
        path: &str,
        target_language: &str,
        mode: VariableMode,
    ) -> Result<String, TranslationError> {
        let key = if path.is_empty() { "<root>" } else { path };
        debug!("Translating: {} ({})", key, target_language);
        self.translator
            .translate_text(text, self.source_language, target_language, mode)
            .await
            .map_err(|e| e.at_key(key))
    }
}
