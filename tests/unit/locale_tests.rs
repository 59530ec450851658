/*!
 * Tests for locale content validation and the document model
 */

use serde_json::json;
use ollama_i18n::errors::TranslationError;
use ollama_i18n::locale::{LocaleDocument, LocaleValue, validate_content};

#[test]
fn test_validateContent_withNumber_shouldFailAtKey() {
    match validate_content(&json!({"a": 5}), "") {
        Err(TranslationError::InvalidValueType { path, found }) => {
            assert_eq!(path, "a");
            assert_eq!(found, "number");
        }
        other => panic!("expected InvalidValueType, got {:?}", other),
    }
}

#[test]
fn test_validateContent_withStringsAndLists_shouldPass() {
    assert!(validate_content(&json!({"a": "x", "b": ["y", "z"]}), "").is_ok());
    assert!(validate_content(&json!([{"a": "x"}, {"b": {"c": ["d"]}}]), "").is_ok());
}

#[test]
fn test_validateContent_withNull_shouldFail() {
    let result = validate_content(&json!({"menu": {"items": ["a", null]}}), "");
    assert!(matches!(result, Err(TranslationError::InvalidValueType { ref path, ref found })
        if path == "menu.items[1]" && found == "null"));
}

#[test]
fn test_fromJson_withBatchDocument_shouldBuildList() {
    let document = LocaleDocument::from_json(json!([{"a": "x"}, {"b": "y"}])).unwrap();
    match &document {
        LocaleValue::List(items) => assert_eq!(items.len(), 2),
        other => panic!("expected a list, got {:?}", other),
    }
    assert_eq!(document.count_strings(), 2);
}
