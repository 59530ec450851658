use anyhow::{Result, Context, anyhow};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::TranslationError;
use crate::locale::LocaleDocument;

// @module: Locale file and directory utilities

/// Extension of locale files
pub const LOCALE_EXTENSION: &str = "json";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @returns: `<dir>/<locale>.json`
    pub fn locale_file_path<P: AsRef<Path>>(dir: P, locale: &str) -> PathBuf {
        dir.as_ref().join(format!("{}.{}", locale, LOCALE_EXTENSION))
    }

    // @returns: `<dir>/../<output_locale>`, the sibling of a namespace directory
    pub fn namespace_output_dir<P: AsRef<Path>>(input_dir: P, output_locale: &str) -> PathBuf {
        let input_dir = input_dir.as_ref();
        let root = match (input_dir.file_name(), input_dir.parent()) {
            (Some(_), Some(parent)) => parent.to_path_buf(),
            // `.`, `..` and `/` have no name to strip
            _ => input_dir.join(".."),
        };
        root.join(output_locale)
    }

    // @returns: `<dir>/../<output_locale>/<file name>` for a namespace file of `input_dir`
    pub fn namespace_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(input_dir: P1, input_file: P2, output_locale: &str) -> PathBuf {
        let file_name = input_file.as_ref().file_name().unwrap_or_default();
        Self::namespace_output_dir(input_dir, output_locale).join(file_name)
    }

    // @returns: File stem as a string, used as locale id or namespace label
    pub fn file_stem<P: AsRef<Path>>(path: P) -> String {
        path.as_ref()
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Find the locale files directly inside `dir`, sorted by name
    ///
    /// Files whose stem is listed in `exclude` are skipped.
    pub fn find_locale_files<P: AsRef<Path>>(dir: P, exclude: &[&str]) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        if !Self::dir_exists(dir) {
            return Err(anyhow!("Locale directory does not exist: {:?}", dir));
        }

        let mut result = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            let is_locale = path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(LOCALE_EXTENSION));
            if is_locale && !exclude.contains(&Self::file_stem(path).as_str()) {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read and validate a locale file
    ///
    /// An empty or whitespace-only file is an empty map.
    pub async fn read_locale_file<P: AsRef<Path>>(path: P) -> Result<LocaleDocument, TranslationError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| io_error(path, e))?;
        Self::parse_locale_content(path, &content)
    }

    /// Read a locale file, or `None` if it does not exist
    pub async fn read_locale_file_if_exists<P: AsRef<Path>>(path: P) -> Result<Option<LocaleDocument>, TranslationError> {
        let path = path.as_ref();
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Self::parse_locale_content(path, &content).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(path, e)),
        }
    }

    fn parse_locale_content(path: &Path, content: &str) -> Result<LocaleDocument, TranslationError> {
        if content.trim().is_empty() {
            return Ok(LocaleDocument::empty_map());
        }

        let value: serde_json::Value = serde_json::from_str(content).map_err(|e| TranslationError::Io {
            path: path.display().to_string(),
            cause: format!("invalid JSON: {}", e),
        })?;
        LocaleDocument::from_json(value)
    }

    /// Write a locale document as pretty JSON, creating parent directories
    pub async fn write_locale_file<P: AsRef<Path>>(path: P, document: &LocaleDocument) -> Result<(), TranslationError> {
        let path = path.as_ref();
        let json = document.to_pretty_json().map_err(|e| TranslationError::Io {
            path: path.display().to_string(),
            cause: e.to_string(),
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(parent, e))?;
        }

        tokio::fs::write(path, json)
            .await
            .map_err(|e| io_error(path, e))
    }
}

fn io_error(path: &Path, error: std::io::Error) -> TranslationError {
    TranslationError::Io {
        path: path.display().to_string(),
        cause: error.to_string(),
    }
}
