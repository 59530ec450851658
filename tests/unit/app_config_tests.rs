/*!
 * Tests for application configuration
 */

use anyhow::Result;
use ollama_i18n::app_config::{Config, LogLevel, VariableMode};
use crate::common;

#[test]
fn test_fromFile_withPartialConfig_shouldApplyDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", r#"{
        "directory": "i18n",
        "source_locale": "de",
        "model": "qwen2.5:7b",
        "max_concurrent_requests": 4,
        "log_level": "debug"
    }"#)?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.directory, "i18n");
    assert_eq!(config.source_locale, "de");
    assert_eq!(config.model, "qwen2.5:7b");
    assert_eq!(config.max_concurrent_requests, Some(4));
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.endpoint, "http://localhost:11434");
    assert_eq!(config.variable_mode, VariableMode::Curly);
    assert!(config.cache);
    config.validate()?;

    Ok(())
}

#[test]
fn test_fromFile_withMissingFile_shouldFail() {
    assert!(Config::from_file("does_not_exist_conf.json").is_err());
}

#[test]
fn test_fromFile_withUnknownVariableMode_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", r#"{"variable_mode": "percent"}"#)?;
    assert!(Config::from_file(&path).is_err());
    Ok(())
}

#[test]
fn test_validate_withEmptyModel_shouldFail() {
    let config = Config {
        model: "  ".to_string(),
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withBothNamespaceLocales_shouldSucceed() {
    let config = Config {
        input_locale: Some("en".to_string()),
        output_locale: Some("fr".to_string()),
        ..Config::default()
    };
    assert!(config.validate().is_ok());
    assert!(config.is_namespaced());
}

#[test]
fn test_validate_withSameNamespaceLocales_shouldFail() {
    let config = Config {
        input_locale: Some("de".to_string()),
        output_locale: Some("de".to_string()),
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_translationOptions_shouldCarryRunSettings() {
    let config = Config {
        source_locale: "en".to_string(),
        model: "llama3.1:8b".to_string(),
        variable_mode: VariableMode::Dollar,
        max_concurrent_requests: Some(2),
        ..Config::default()
    };
    let options = config.translation_options();
    assert_eq!(options.model, "llama3.1:8b");
    assert_eq!(options.source_lang, "en");
    assert_eq!(options.variable_mode, VariableMode::Dollar);
    assert!(options.cache);
    assert_eq!(options.max_concurrent_requests, Some(2));
}
