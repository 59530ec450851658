/*!
 * Integration tests for the locale translation workflow
 *
 * The controller builds real jobs from files on disk; the model is replaced
 * by `FakeTranslator`.
 */

use anyhow::Result;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use ollama_i18n::app_config::Config;
use ollama_i18n::app_controller::Controller;
use ollama_i18n::errors::{AppError, TranslationError};
use ollama_i18n::translation::LocaleOutcome;
use crate::common;
use crate::common::mock_providers::FakeTranslator;

fn flat_config(dir: &Path) -> Config {
    Config {
        directory: dir.display().to_string(),
        source_locale: "en".to_string(),
        pull_model: false,
        ..Config::default()
    }
}

/// Test that every other locale file in the directory is a target
#[tokio::test]
async fn test_run_withFlatLayout_shouldTranslateEveryTargetFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_locale_file(dir, "en.json", &json!({
        "title": "Hello {name}",
        "menu": {"open": "Open", "items": ["One", "Two"]}
    }))?;
    common::create_test_file(dir, "fr.json", "")?;
    common::create_test_file(dir, "de.json", "{}")?;

    let controller = Controller::with_config(flat_config(dir))?;
    let report = controller.translate_with(FakeTranslator::new(), None).await?;

    assert!(report.is_success());
    assert_eq!(report.written_count(), 2);
    assert_eq!(common::read_json(&dir.join("fr.json"))?, json!({
        "title": "fr:Hello {name}",
        "menu": {"open": "fr:Open", "items": ["fr:One", "fr:Two"]}
    }));
    assert_eq!(common::read_json(&dir.join("de.json"))?["menu"]["items"], json!(["de:One", "de:Two"]));
    // The source file is never a target
    assert_eq!(common::read_json(&dir.join("en.json"))?["title"], "Hello {name}");

    Ok(())
}

/// Test that a second cached run makes no model calls and leaves files untouched
#[tokio::test]
async fn test_run_withCacheTwice_shouldBeIdempotent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_locale_file(dir, "en.json", &json!({"a": "x", "b": ["y", "z"]}))?;

    let config = Config {
        target_locale: Some("fr".to_string()),
        ..flat_config(dir)
    };
    let controller = Controller::with_config(config)?;

    let first = controller.translate_with(FakeTranslator::new(), None).await?;
    assert_eq!(first.written_count(), 1);
    let written = std::fs::read_to_string(dir.join("fr.json"))?;

    let translator = Arc::new(FakeTranslator::new());
    let second = controller.translate_with(Arc::clone(&translator), None).await?;

    assert!(second.is_success());
    assert_eq!(second.up_to_date_count(), 1);
    assert!(matches!(second.outcome_for("fr"), Some(LocaleOutcome::UpToDate)));
    assert_eq!(translator.call_count(), 0);
    assert_eq!(std::fs::read_to_string(dir.join("fr.json"))?, written);

    Ok(())
}

/// Test that only keys missing from the target are translated and merged in
#[tokio::test]
async fn test_run_withPartialTarget_shouldOnlyTranslateMissingKeys() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_locale_file(dir, "en.json", &json!({"a": "x", "b": "y"}))?;
    common::create_locale_file(dir, "fr.json", &json!({"a": "X"}))?;

    let controller = Controller::with_config(flat_config(dir))?;
    let translator = Arc::new(FakeTranslator::new());
    let report = controller.translate_with(Arc::clone(&translator), None).await?;

    assert!(matches!(report.outcome_for("fr"), Some(LocaleOutcome::Written { translated_keys: 1, .. })));
    assert_eq!(translator.texts_for("fr"), vec!["y"]);
    assert_eq!(common::read_json(&dir.join("fr.json"))?, json!({"a": "X", "b": "fr:y"}));

    Ok(())
}

/// Test that disabling the cache retranslates and overwrites the target
#[tokio::test]
async fn test_run_withCacheDisabled_shouldOverwriteTarget() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_locale_file(dir, "en.json", &json!({"a": "x"}))?;
    common::create_locale_file(dir, "fr.json", &json!({"a": "manual", "old": "gone"}))?;

    let config = Config {
        cache: false,
        ..flat_config(dir)
    };
    let controller = Controller::with_config(config)?;
    let translator = Arc::new(FakeTranslator::new());
    controller.translate_with(Arc::clone(&translator), None).await?;

    assert_eq!(translator.call_count(), 1);
    assert_eq!(common::read_json(&dir.join("fr.json"))?, json!({"a": "fr:x"}));

    Ok(())
}

/// Test that a failing locale does not stop the others
#[tokio::test]
async fn test_run_withOneFailingLocale_shouldIsolateFailure() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_locale_file(dir, "en.json", &json!({"greeting": "Hello", "tags": ["a", "b"]}))?;
    common::create_test_file(dir, "fr.json", "")?;
    common::create_test_file(dir, "de.json", "")?;

    let controller = Controller::with_config(flat_config(dir))?;
    let report = controller.translate_with(FakeTranslator::failing_for(&["fr"]), None).await?;

    assert!(!report.is_success());
    match report.outcome_for("fr") {
        Some(LocaleOutcome::Failed(error)) => assert!(error.is_translation_failure()),
        other => panic!("expected fr to fail, got {:?}", other),
    }
    assert!(matches!(report.outcome_for("de"), Some(LocaleOutcome::Written { .. })));
    assert_eq!(common::read_json(&dir.join("de.json"))?, json!({"greeting": "de:Hello", "tags": ["de:a", "de:b"]}));
    // Nothing partial is written for the failed locale
    assert_eq!(std::fs::read_to_string(dir.join("fr.json"))?, "");

    let error = Controller::check_report(report).unwrap_err();
    match error.downcast_ref::<AppError>() {
        Some(AppError::LocalesFailed { count, locales }) => {
            assert_eq!(*count, 1);
            assert_eq!(locales, "en -> fr");
        }
        other => panic!("expected LocalesFailed, got {:?}", other),
    }

    Ok(())
}

/// Test that invalid source content aborts before any translation
#[tokio::test]
async fn test_run_withInvalidSource_shouldAbortBeforeTranslating() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_locale_file(dir, "en.json", &json!({"ok": "x", "count": 5}))?;
    common::create_test_file(dir, "fr.json", "")?;

    let controller = Controller::with_config(flat_config(dir))?;
    let translator = Arc::new(FakeTranslator::new());
    let error = controller.translate_with(Arc::clone(&translator), None).await.unwrap_err();

    match error.downcast_ref::<TranslationError>() {
        Some(TranslationError::InvalidValueType { path, found }) => {
            assert_eq!(path, "count");
            assert_eq!(found, "number");
        }
        other => panic!("expected InvalidValueType, got {:?}", other),
    }
    assert_eq!(translator.call_count(), 0);

    Ok(())
}

/// Test that a missing source file or missing targets are reported
#[tokio::test]
async fn test_run_withoutSourceOrTargets_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    let controller = Controller::with_config(flat_config(dir))?;
    assert!(controller.build_jobs().await.is_err());

    common::create_locale_file(dir, "en.json", &json!({"a": "x"}))?;
    assert!(controller.build_jobs().await.is_err());

    common::create_test_file(dir, "es.json", "")?;
    let jobs = controller.build_jobs().await?;
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].target_locale, "es");

    Ok(())
}

/// Test that namespace files are written into the sibling locale directory
#[tokio::test]
async fn test_run_withNamespacedLayout_shouldWriteSiblingDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let input_dir = root.join("en");
    common::create_locale_file(&input_dir, "common.json", &json!({"save": "Save"}))?;
    common::create_locale_file(&input_dir, "auth.json", &json!({"login": "Log in $user"}))?;
    common::create_locale_file(root, "de/common.json", &json!({"save": "Speichern"}))?;

    let config = Config {
        directory: input_dir.display().to_string(),
        input_locale: Some("en".to_string()),
        output_locale: Some("de".to_string()),
        pull_model: false,
        ..Config::default()
    };
    let controller = Controller::with_config(config)?;
    let translator = Arc::new(FakeTranslator::new());
    let report = controller.translate_with(Arc::clone(&translator), None).await?;

    assert!(report.is_success());
    assert_eq!(report.written_count(), 1);
    assert_eq!(report.up_to_date_count(), 1);
    let labels: Vec<&str> = report.jobs.iter().map(|job| job.label.as_str()).collect();
    assert_eq!(labels, vec!["auth", "common"]);
    assert_eq!(common::read_json(&root.join("de/auth.json"))?, json!({"login": "de:Log in $user"}));
    assert_eq!(common::read_json(&root.join("de/common.json"))?, json!({"save": "Speichern"}));
    assert_eq!(translator.call_count(), 1);

    Ok(())
}

/// Test that a namespaced run into its own locale is refused before any file is touched
#[tokio::test]
async fn test_run_withNamespacedLayoutIntoSameLocale_shouldRefuse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("en");
    let source = json!({"save": "Save"});
    common::create_locale_file(&input_dir, "common.json", &source)?;

    let config = Config {
        directory: input_dir.display().to_string(),
        input_locale: Some("en".to_string()),
        output_locale: Some("en".to_string()),
        pull_model: false,
        ..Config::default()
    };
    assert!(Controller::with_config(config).is_err());
    assert_eq!(common::read_json(&input_dir.join("common.json"))?, source);

    Ok(())
}

/// Test that a batch document (list root) is fully translated
#[tokio::test]
async fn test_run_withBatchDocument_shouldTranslateEveryObject() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_locale_file(dir, "en.json", &json!([{"a": "x"}, {"b": "y"}]))?;
    common::create_locale_file(dir, "fr.json", &json!([{"a": "old"}]))?;

    let controller = Controller::with_config(flat_config(dir))?;
    controller.translate_with(FakeTranslator::new(), None).await?;

    assert_eq!(common::read_json(&dir.join("fr.json"))?, json!([{"a": "fr:x"}, {"b": "fr:y"}]));

    Ok(())
}

/// Test the controller initialization with an invalid config
#[test]
fn test_controller_withInvalidConfig_shouldFail() {
    let config = Config {
        output_locale: Some("fr".to_string()),
        ..Config::default()
    };
    assert!(Controller::with_config(config).is_err());
    assert!(Controller::new_for_test().is_ok());
}
