/*!
 * Language utilities for ISO language code handling
 *
 * This module provides functions for validating ISO 639-1 (2-letter) and
 * ISO 639-3 (3-letter) language codes and resolving the display names used
 * in prompt text. Codes may carry a region subtag (e.g. "pt-BR"); a few
 * well-known combinations get a dedicated display name.
 */

use anyhow::{Result, anyhow};
use isolang::Language;

/// Validate that a language code is a valid ISO 639-1 or ISO 639-3 code,
/// optionally with a region subtag
pub fn validate_language_code(code: &str) -> Result<()> {
    let normalized = code.trim().to_lowercase();
    let primary = normalized.split('-').next().unwrap_or(&normalized);

    let valid = match primary.len() {
        2 => Language::from_639_1(primary).is_some(),
        3 => Language::from_639_3(primary).is_some(),
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(anyhow!("Invalid language code: {}", code))
    }
}

/// Get the English display name for a language code, for use in prompt text
///
/// Region-qualified codes with an established English name are special-cased;
/// any other region subtag is appended in parentheses.
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = code.trim().to_lowercase();

    // Region-qualified names the model should see spelled out
    match normalized.as_str() {
        "pt-br" => return Ok("Brazilian Portuguese".to_string()),
        "pt-pt" => return Ok("European Portuguese".to_string()),
        "zh-tw" => return Ok("Traditional Chinese".to_string()),
        "zh-cn" => return Ok("Simplified Chinese".to_string()),
        "en-us" => return Ok("American English".to_string()),
        "en-gb" => return Ok("British English".to_string()),
        _ => {}
    }

    let mut parts = normalized.splitn(2, '-');
    let primary = parts.next().unwrap_or(&normalized);
    let region = parts.next();

    let language = match primary.len() {
        2 => Language::from_639_1(primary),
        3 => Language::from_639_3(primary),
        _ => None,
    }
    .ok_or_else(|| anyhow!("Invalid language code: {}", code))?;

    match region {
        Some(region) => Ok(format!("{} ({})", language.to_name(), region.to_uppercase())),
        None => Ok(language.to_name().to_string()),
    }
}
