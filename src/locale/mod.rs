/*!
 * Locale document model and content validation.
 *
 * - `document`: the tagged `LocaleValue` tree a locale file is loaded into
 * - `validation`: rejects JSON values that cannot appear in a locale file
 */

pub mod document;
pub mod validation;

// Re-export main types for easier usage
pub use self::document::{LocaleDocument, LocaleMap, LocaleValue, child_path, index_path};
pub use self::validation::validate_content;
