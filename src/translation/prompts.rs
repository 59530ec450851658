/*!
 * Prompt templates and the structured response contract.
 *
 * The prompt tells the model which substrings are template variables for the
 * selected `VariableMode`, and the response schema forces a single
 * `translation` field so answers can be parsed without guesswork.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::app_config::VariableMode;

/// Separates the rules from the text to translate; the text always comes last
pub const TEXT_HEADER: &str = "\n\nText to translate:\n";

static CURLY_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^{}\s]+\}").expect("valid curly placeholder regex"));

static DOLLAR_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*").expect("valid dollar placeholder regex"));

/// Translation prompt template for one variable mode.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: &'static str,
}

impl PromptTemplate {
    /// Prompt for texts whose variables look like `{name}`.
    pub const CURLY: &'static str = r#"You are a professional software localization translator. Translate the following text from {source_language} to {target_language}.

## Variables
- Any substring enclosed in curly braces, such as {name} or {count}, is a variable name.
- Copy every variable exactly as written: same spelling, same case, braces intact.
- Never translate, rename, split or remove a variable.
- You may move a variable only to the grammatically correct position in the {target_language} sentence.

## Output
- Respond with a JSON object that has exactly one field, "translation".
- "translation" holds only the translated text, with no escape characters and no surrounding quotes."#;

    /// Prompt for texts whose variables look like `$name`.
    pub const DOLLAR: &'static str = r#"You are a professional software localization translator. Translate the following text from {source_language} to {target_language}.

## Variables
- Any word starting with a dollar sign, such as $name or $count, is a variable name. It has no closing delimiter.
- Copy every variable exactly as written: keep the $ sign and the same spelling and case.
- Never translate, rename, split or remove a variable.
- You may move a variable only to the grammatically correct position in the {target_language} sentence.

## Output
- Respond with a JSON object that has exactly one field, "translation".
- "translation" holds only the translated text, with no escape characters and no surrounding quotes."#;

    /// Template for the given variable mode
    pub fn for_mode(mode: VariableMode) -> Self {
        let template = match mode {
            VariableMode::Curly => Self::CURLY,
            VariableMode::Dollar => Self::DOLLAR,
        };
        Self { template }
    }

    /// Render the prompt for `text`
    ///
    /// Language names are substituted before the text is appended, so braces
    /// inside the text are never treated as template slots.
    pub fn render(&self, source_language: &str, target_language: &str, text: &str) -> String {
        let mut prompt = self.template
            .replace("{source_language}", source_language)
            .replace("{target_language}", target_language);
        prompt.push_str(TEXT_HEADER);
        prompt.push_str(text);
        prompt
    }
}

/// The only answer shape accepted from the model
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslationPayload {
    /// The translated text
    pub translation: String,
}

impl TranslationPayload {
    /// JSON schema sent with every request to constrain the model output
    pub fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "translation": {
                    "type": "string",
                    "description": "The translated text without escape characters or surrounding quotes"
                }
            },
            "required": ["translation"],
            "additionalProperties": false
        })
    }

    /// Strictly parse a raw model answer
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw.trim())
    }
}

/// Placeholder tokens of `text` for the given mode, in order of appearance
pub fn placeholders(text: &str, mode: VariableMode) -> Vec<&str> {
    let regex = match mode {
        VariableMode::Curly => &*CURLY_PLACEHOLDER,
        VariableMode::Dollar => &*DOLLAR_PLACEHOLDER,
    };
    regex.find_iter(text).map(|m| m.as_str()).collect()
}

/// Placeholder tokens of `source` that do not appear verbatim in `translated`
pub fn missing_placeholders<'a>(source: &'a str, translated: &str, mode: VariableMode) -> Vec<&'a str> {
    placeholders(source, mode)
        .into_iter()
        .filter(|token| !translated.contains(token))
        .collect()
}
