/*!
 * Content validation for locale documents.
 *
 * A locale document may only contain strings, arrays and objects at any depth.
 * Validation runs on the raw JSON before it is converted into a `LocaleValue`
 * so the offending key path and JSON type can be reported.
 */

use serde_json::Value;

use super::document::{child_path, index_path};
use crate::errors::TranslationError;

/// Validate a JSON value as locale content, starting at `path` ("" for the root)
pub fn validate_content(value: &Value, path: &str) -> Result<(), TranslationError> {
    match value {
        Value::String(_) => Ok(()),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                validate_content(item, &index_path(path, index))?;
            }
            Ok(())
        }
        Value::Object(map) => {
            for (key, item) in map {
                validate_content(item, &child_path(path, key))?;
            }
            Ok(())
        }
        other => Err(TranslationError::InvalidValueType {
            path: path.to_string(),
            found: json_type_name(other).to_string(),
        }),
    }
}

/// Name of a JSON value's type as reported in validation errors
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
