/*!
 * Locale document model.
 *
 * A locale file is a tree of string leaves, arrays and objects. `LocaleValue`
 * makes that shape explicit so the rest of the crate never has to deal with
 * numbers, booleans or nulls: they are rejected by validation on the way in.
 */

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::validation::validate_content;
use crate::errors::TranslationError;

/// Insertion-ordered map of locale keys
pub type LocaleMap = IndexMap<String, LocaleValue>;

/// A node of a locale document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LocaleValue {
    /// A translatable string leaf
    Text(String),
    /// An ordered sequence of values
    List(Vec<LocaleValue>),
    /// A keyed map of values
    Map(LocaleMap),
}

/// The root value of one locale file
pub type LocaleDocument = LocaleValue;

impl LocaleValue {
    /// An empty map, the value of an empty locale file
    pub fn empty_map() -> Self {
        Self::Map(LocaleMap::new())
    }

    /// Validate a JSON value and convert it into a locale value
    pub fn from_json(value: Value) -> Result<Self, TranslationError> {
        validate_content(&value, "")?;
        Ok(Self::from_validated(value))
    }

    fn from_validated(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from_validated).collect()),
            Value::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(key, item)| (key, Self::from_validated(item)))
                    .collect(),
            ),
            // Unreachable after validation; other scalars never enter the tree
            other => Self::Text(other.to_string()),
        }
    }

    /// Render as pretty-printed JSON with a trailing newline
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// The map behind this value, if it is one
    pub fn as_map(&self) -> Option<&LocaleMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Whether this is a list made only of string leaves
    pub fn is_string_list(items: &[LocaleValue]) -> bool {
        items.iter().all(|item| matches!(item, Self::Text(_)))
    }

    /// Whether the value holds nothing to translate at the top level
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(_) => false,
            Self::List(items) => items.is_empty(),
            Self::Map(map) => map.is_empty(),
        }
    }

    /// Number of string leaves the tree walker will send to the model
    pub fn count_strings(&self) -> usize {
        match self {
            Self::Text(_) => 1,
            Self::List(items) if Self::is_string_list(items) => items.len(),
            Self::List(items) => items
                .iter()
                .filter(|item| matches!(item, Self::Map(_)))
                .map(Self::count_strings)
                .sum(),
            Self::Map(map) => map.values().map(Self::count_strings).sum(),
        }
    }
}

/// Key path of a map child: `key` at the root, `parent.key` below it
pub fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// Key path of a list element: `parent[index]`
pub fn index_path(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}
