use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for locale codes
///
/// Locale identifiers such as `fr`, `deu` or `pt-BR` are turned into English
/// language names so prompts can say "French (fr)" instead of a bare code.
/// ISO 639-2/B codes that differ from their ISO 639-2/T form
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Language part of a locale code: `pt-BR` and `pt_BR` both give `pt`
pub fn base_code(locale: &str) -> String {
    locale
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = base_code(code);

    match normalized_code.len() {
        2 => {
            if let Some(lang) = Language::from_639_1(&normalized_code) {
                return Ok(lang.to_639_3().to_string());
            }
        }
        3 => {
            if Language::from_639_3(&normalized_code).is_some() {
                return Ok(normalized_code);
            }
            if let Some((_, part2t)) = PART2B_TO_PART2T.iter().find(|(b, _)| *b == normalized_code) {
                return Ok(part2t.to_string());
            }
        }
        _ => {}
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// Human readable form of a locale code for prompts
///
/// Known codes render as `French (fr)`; anything else is returned unchanged.
pub fn display_name(locale: &str) -> String {
    match get_language_name(locale) {
        Ok(name) => format!("{} ({})", name, locale),
        Err(_) => locale.to_string(),
    }
}
