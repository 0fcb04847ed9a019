use anyhow::{Result, anyhow};
use isolang::Language;

/// Locale code utilities
///
/// Scenario scripts tag each localized text line with a marker built from a
/// language code (`langen`, `langjp`). This module validates user supplied
/// ISO 639 codes and maps them to the marker the engine expects.
/// Prefix shared by all locale markers
pub const LOCALE_MARKER_PREFIX: &str = "lang";

/// ISO 639-2/B codes that differ from their 639-2/T counterpart
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("per", "fas"),
    ("rum", "ron"),
    ("slo", "slk"),
];

/// Codes where the engine does not follow ISO 639-1
const ENGINE_LOCALE_OVERRIDES: &[(&str, &str)] = &[
    ("ja", "jp"),
    ("zh", "cn"),
];

/// Look up a language from a 2- or 3-letter code
fn lookup(code: &str) -> Option<Language> {
    let normalized_code = code.trim().to_lowercase();

    match normalized_code.len() {
        2 => Language::from_639_1(&normalized_code),
        3 => {
            let part2t = PART2B_TO_PART2T
                .iter()
                .find(|(b, _)| *b == normalized_code)
                .map(|(_, t)| *t)
                .unwrap_or(normalized_code.as_str());
            Language::from_639_3(part2t)
        }
        _ => None,
    }
}

/// Normalize a language code to ISO 639-1 (2-letter) format if possible
/// Falls back to ISO 639-2/T if no ISO 639-1 code exists
pub fn normalize_to_part1_or_part2t(code: &str) -> Result<String> {
    let lang = lookup(code)
        .ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code))?;

    Ok(lang
        .to_639_1()
        .map(|c| c.to_string())
        .unwrap_or_else(|| lang.to_639_3().to_string()))
}

/// Build the locale marker that prefixes localized text lines.
///
/// Accepts an ISO code (`en`, `eng`, `ja`) or a marker that is already in
/// engine form (`langen`), which is returned unchanged.
pub fn locale_marker(locale: &str) -> Result<String> {
    let trimmed = locale.trim();

    if let Some(suffix) = trimmed.strip_prefix(LOCALE_MARKER_PREFIX) {
        if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_alphabetic()) {
            return Ok(trimmed.to_lowercase());
        }
    }

    let code = normalize_to_part1_or_part2t(trimmed)?;
    let engine_code = ENGINE_LOCALE_OVERRIDES
        .iter()
        .find(|(iso, _)| *iso == code)
        .map(|(_, engine)| engine.to_string())
        .unwrap_or(code);

    Ok(format!("{}{}", LOCALE_MARKER_PREFIX, engine_code))
}
