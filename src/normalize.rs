use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::{NormalizeConfig, NormalizeOptions};
use crate::types::{CodeInput, NormalizeResult, ProbableType};

/// Hint recorded when the normalized text contains characters outside A-Z/0-9
pub const INVALID_CHAR_HINT: &str = "INVALID:CHAR";

const MERR_KEYWORD_HINT: &str = "KEYWORD:MERR";
const MERRY_EVENT_HINT: &str = "EVENT:MERRY";

/// Redemption status placeholder; actual redemption is out of scope
const STATUS_PLACEHOLDER: &str = "unknown";

static VALID_CHARSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]*$").expect("charset pattern compiles"));

/// Normalizer bound to one merged configuration, reusable across calls.
pub struct CodeNormalizer {
    config: NormalizeConfig,
}

impl CodeNormalizer {
    /// Create a normalizer with caller overrides overlaid onto the
    /// built-in defaults.
    pub fn new(options: Option<&NormalizeOptions>) -> Self {
        Self {
            config: NormalizeConfig::merged(options),
        }
    }

    /// Create a normalizer from an already merged configuration.
    pub fn with_config(config: NormalizeConfig) -> Self {
        Self { config }
    }

    /// Normalize, validate and classify a single code.
    ///
    /// Total over its input: malformed shapes degrade to safe defaults,
    /// never to a panic or error.
    pub fn normalize(&self, input: impl Into<CodeInput>) -> NormalizeResult {
        let (raw, meta) = match input.into() {
            CodeInput::Raw(code) => (code, None),
            CodeInput::Structured { code, meta } => (code, meta),
        };

        let normalized = canonicalize(&raw);
        let length = normalized.chars().count();

        let mut hints = Vec::new();

        let charset_ok = VALID_CHARSET.is_match(&normalized);
        if !charset_ok {
            // one hint regardless of how many characters are invalid
            hints.push(INVALID_CHAR_HINT.to_string());
        }

        let length_ok =
            length > 0 && self.config.min_length <= length && length <= self.config.max_length;

        // Prefixes take priority over keywords for the label, but every
        // matching pattern in both tables contributes a hint.
        let mut label: Option<ProbableType> = None;
        for (pattern, mapped) in &self.config.prefixes {
            if normalized.contains(pattern.as_str()) {
                hints.push(format!("PREFIX:{}", pattern));
                if label.is_none() {
                    label = Some(ProbableType::from(mapped.as_str()));
                }
            }
        }
        for (pattern, mapped) in &self.config.keywords {
            if normalized.contains(pattern.as_str()) {
                hints.push(format!("KEYWORD:{}", pattern));
                if label.is_none() {
                    label = Some(ProbableType::from(mapped.as_str()));
                }
            }
        }

        // The MERR keyword surfaces as an event tag; the label it mapped to
        // is already assigned and stays untouched.
        for hint in hints.iter_mut() {
            if hint == MERR_KEYWORD_HINT {
                *hint = MERRY_EVENT_HINT.to_string();
            }
        }

        let probable_type = label.unwrap_or(ProbableType::Unknown);
        let is_valid_format = charset_ok && length_ok;

        debug!(
            raw = %raw,
            normalized = %normalized,
            valid = is_valid_format,
            probable_type = probable_type.as_str(),
            "normalized code"
        );

        NormalizeResult {
            normalized,
            raw,
            is_valid_format,
            probable_type,
            hints,
            status: STATUS_PLACEHOLDER.to_string(),
            length,
            created_at: Utc::now(),
            meta,
        }
    }

    /// Normalize a dynamic batch with this normalizer's configuration.
    ///
    /// Anything other than a JSON array yields an empty sequence. Elements
    /// are processed independently and in order; a malformed element yields
    /// an invalid result, never halts the batch.
    pub fn normalize_all(&self, inputs: &Value) -> Vec<NormalizeResult> {
        let Some(items) = inputs.as_array() else {
            return Vec::new();
        };

        let results: Vec<NormalizeResult> = items
            .iter()
            .map(|item| self.normalize(CodeInput::from_value(item)))
            .collect();

        info!(count = results.len(), "normalized code batch");
        results
    }
}

/// Strip surrounding whitespace, drop every interior whitespace character
/// and hyphen, and uppercase the rest.
fn canonicalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_uppercase()
}

/// Normalize one code, assembling configuration fresh for this call.
pub fn normalize_code(
    input: impl Into<CodeInput>,
    options: Option<&NormalizeOptions>,
) -> NormalizeResult {
    CodeNormalizer::new(options).normalize(input)
}

/// Normalize an ordered batch of codes under one shared configuration.
pub fn normalize_codes(inputs: &Value, options: Option<&NormalizeOptions>) -> Vec<NormalizeResult> {
    CodeNormalizer::new(options).normalize_all(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonicalize_strips_separators_and_uppercases() {
        assert_eq!(canonicalize(" 30ikes "), "30IKES");
        assert_eq!(canonicalize("25-IK ES"), "25IKES");
        assert_eq!(canonicalize("a\tb\nc"), "ABC");
        assert_eq!(canonicalize(""), "");
    }

    #[test]
    fn canonicalize_is_idempotent() {
        for raw in [" 30IKES ", "Merristmas", "25-IKES", "bad code!!"] {
            let once = canonicalize(raw);
            assert_eq!(canonicalize(&once), once);
        }
    }

    #[test]
    fn invalid_char_hint_appears_exactly_once() {
        let result = normalize_code("!!a!!", None);
        let count = result
            .hints
            .iter()
            .filter(|h| *h == INVALID_CHAR_HINT)
            .count();
        assert_eq!(count, 1);
        assert!(!result.is_valid_format);
    }

    #[test]
    fn empty_code_is_invalid_even_with_zero_min_length() {
        let options = NormalizeOptions {
            min_length: Some(0),
            ..Default::default()
        };
        let result = normalize_code("", Some(&options));

        assert_eq!(result.normalized, "");
        assert_eq!(result.length, 0);
        assert!(!result.is_valid_format);
    }

    #[test]
    fn length_bounds_are_inclusive() {
        assert!(normalize_code("ABCD", None).is_valid_format);
        assert!(normalize_code("A".repeat(16), None).is_valid_format);
        assert!(!normalize_code("ABC", None).is_valid_format);
        assert!(!normalize_code("A".repeat(17), None).is_valid_format);
    }

    #[test]
    fn prefix_label_wins_but_keyword_hints_still_collect() {
        // matches the IKES prefix and the COIN keyword
        let result = normalize_code("IKESCOIN", None);

        assert_eq!(result.probable_type, ProbableType::ClassReroll);
        assert_eq!(result.hints, vec!["PREFIX:IKES", "KEYWORD:COIN"]);
    }

    #[test]
    fn first_keyword_in_table_order_sets_the_label() {
        // both STAT and COIN match; STAT is earlier in the table
        let result = normalize_code("STATCOIN", None);

        assert_eq!(result.probable_type, ProbableType::StatReset);
        assert_eq!(result.hints, vec!["KEYWORD:STAT", "KEYWORD:COIN"]);
    }

    #[test]
    fn merr_hint_is_rewritten_to_event_tag() {
        let result = normalize_code("MERRY2025", None);

        assert_eq!(result.probable_type, ProbableType::EventReward);
        assert_eq!(result.hints, vec!["EVENT:MERRY"]);
    }

    #[test]
    fn prefix_matches_anywhere_in_the_string() {
        // "prefix" is a priority class, not positional anchoring
        let result = normalize_code("XX30IKES", None);
        assert_eq!(result.probable_type, ProbableType::ClassReroll);
        assert_eq!(result.hints, vec!["PREFIX:IKES"]);
    }

    #[test]
    fn custom_pattern_can_introduce_a_new_label() {
        let options = NormalizeOptions {
            keywords: Some(vec![("LOOT".to_string(), "mystery_box".to_string())]),
            ..Default::default()
        };
        let result = normalize_code("LOOT2025", Some(&options));

        assert_eq!(
            result.probable_type,
            ProbableType::Custom("mystery_box".to_string())
        );
        assert_eq!(result.hints, vec!["KEYWORD:LOOT"]);
    }

    #[test]
    fn no_match_leaves_unknown_with_no_pattern_hints() {
        let result = normalize_code("ZZZZZZ", None);

        assert_eq!(result.probable_type, ProbableType::Unknown);
        assert!(result.hints.is_empty());
        assert_eq!(result.status, "unknown");
    }

    #[test]
    fn length_always_counts_normalized_characters() {
        for raw in ["", " a-b c ", "GEM-GEM-GEM", "bad code!!"] {
            let result = normalize_code(raw, None);
            assert_eq!(result.length, result.normalized.chars().count());
        }
    }

    #[test]
    fn batch_rejects_non_arrays_with_an_empty_sequence() {
        assert!(normalize_codes(&json!("not-an-array"), None).is_empty());
        assert!(normalize_codes(&json!({"code": "ABCD"}), None).is_empty());
        assert!(normalize_codes(&json!(null), None).is_empty());
    }

    #[test]
    fn batch_preserves_order_and_never_short_circuits() {
        let inputs = json!(["30IKES", null, {"code": "STAT-RESET"}, "bad code!!"]);
        let results = normalize_codes(&inputs, None);

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].normalized, "30IKES");
        assert!(!results[1].is_valid_format);
        assert_eq!(results[2].normalized, "STATRESET");
        assert!(!results[3].is_valid_format);
    }
}
