/*!
 * Tests for file utility functions
 */

use std::path::Path;
use anyhow::Result;
use serde_json::json;
use ollama_i18n::errors::TranslationError;
use ollama_i18n::file_utils::FileManager;
use ollama_i18n::locale::LocaleDocument;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_fileExists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "en.json", "{}")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path().join("fr.json")));
    assert!(FileManager::dir_exists(temp_dir.path()));

    Ok(())
}

#[test]
fn test_localeFilePath_shouldAppendJsonExtension() {
    let path = FileManager::locale_file_path("locales", "pt-BR");
    assert_eq!(path, Path::new("locales/pt-BR.json"));
}

#[test]
fn test_namespaceOutputPath_shouldUseSiblingLocaleDirectory() {
    let output = FileManager::namespace_output_path("/app/locales/en", "/app/locales/en/common.json", "de");
    assert_eq!(output, Path::new("/app/locales/de/common.json"));

    let relative = FileManager::namespace_output_path("locales/en", "locales/en/auth.json", "fr");
    assert_eq!(relative, Path::new("locales/fr/auth.json"));

    let single = FileManager::namespace_output_path("en", "en/auth.json", "fr");
    assert_eq!(single, Path::new("fr/auth.json"));
}

#[test]
fn test_namespaceOutputPath_withCurrentDirectory_shouldStayOutsideInputDirectory() {
    let output = FileManager::namespace_output_path(".", "./common.json", "fr");
    assert_eq!(output, Path::new("./../fr/common.json"));
    assert_ne!(output.parent(), Some(Path::new(".")));

    let parent = FileManager::namespace_output_path("..", "../common.json", "fr");
    assert_eq!(parent, Path::new("../../fr/common.json"));
}

#[test]
fn test_namespaceOutputDir_withTrailingSlash_shouldMatchPlainDirectory() {
    assert_eq!(
        FileManager::namespace_output_dir("locales/en/", "de"),
        FileManager::namespace_output_dir("locales/en", "de")
    );
    assert_eq!(FileManager::namespace_output_dir("locales/en", "de"), Path::new("locales/de"));
}

#[test]
fn test_findLocaleFiles_shouldBeSortedNonRecursiveAndExclude() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "fr.json", "{}")?;
    common::create_test_file(dir, "en.json", "{}")?;
    common::create_test_file(dir, "de.JSON", "{}")?;
    common::create_test_file(dir, "notes.txt", "ignored")?;
    common::create_test_file(dir, "nested/es.json", "{}")?;

    let files = FileManager::find_locale_files(dir, &["en"])?;
    let stems: Vec<String> = files.iter().map(FileManager::file_stem).collect();
    assert_eq!(stems, vec!["de", "fr"]);

    Ok(())
}

#[test]
fn test_findLocaleFiles_withMissingDirectory_shouldFail() {
    assert!(FileManager::find_locale_files("./non_existent_directory_12345", &[]).is_err());
}

#[tokio::test]
async fn test_readLocaleFile_withBlankFile_shouldReturnEmptyMap() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "en.json", "  \n")?;

    let document = FileManager::read_locale_file(&file).await?;
    assert_eq!(document, LocaleDocument::empty_map());

    Ok(())
}

#[tokio::test]
async fn test_readLocaleFile_withInvalidValue_shouldReportKeyPath() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_locale_file(temp_dir.path(), "en.json", &json!({"a": {"b": [true]}}))?;

    match FileManager::read_locale_file(&file).await {
        Err(TranslationError::InvalidValueType { path, found }) => {
            assert_eq!(path, "a.b[0]");
            assert_eq!(found, "boolean");
        }
        other => panic!("expected InvalidValueType, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_readLocaleFile_withSyntaxError_shouldReturnIoError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "en.json", "{\"a\": ")?;

    let result = FileManager::read_locale_file(&file).await;
    assert!(matches!(result, Err(TranslationError::Io { .. })));

    Ok(())
}

#[tokio::test]
async fn test_readLocaleFileIfExists_withMissingFile_shouldReturnNone() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let result = FileManager::read_locale_file_if_exists(temp_dir.path().join("fr.json")).await?;
    assert!(result.is_none());

    Ok(())
}

#[tokio::test]
async fn test_writeLocaleFile_shouldCreateDirectoriesAndKeepKeyOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("de").join("common.json");
    let document = LocaleDocument::from_json(json!({"zeta": "Z", "alpha": ["A", "B"]}))?;

    FileManager::write_locale_file(&target, &document).await?;

    let written = std::fs::read_to_string(&target)?;
    assert!(written.ends_with('\n'));
    assert!(written.find("zeta").unwrap() < written.find("alpha").unwrap());
    assert_eq!(FileManager::read_locale_file(&target).await?, document);

    Ok(())
}
