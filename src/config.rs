use serde::{Deserialize, Serialize};

use crate::error::{NormalizerError, Result};

/// Built-in length bounds for a normalized code, inclusive
pub const DEFAULT_MIN_LENGTH: usize = 4;
pub const DEFAULT_MAX_LENGTH: usize = 16;

/// Built-in prefix patterns, the highest match priority
pub const DEFAULT_PREFIXES: &[(&str, &str)] = &[("IKES", "class_reroll")];

/// Built-in keyword patterns, checked in this exact order
pub const DEFAULT_KEYWORDS: &[(&str, &str)] = &[
    ("MERR", "event_reward"),
    ("STAT", "stat_reset"),
    ("COIN", "currency"),
    ("GEM", "currency"),
    ("CASH", "currency"),
];

/// Per-call configuration overrides.
///
/// Every field is optional and each missing field falls back to its
/// built-in default independently. Pattern tables are ordered pattern ->
/// label pairs; a Vec of pairs keeps the caller-defined priority order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NormalizeOptions {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    /// Overlaid onto the default prefix table
    pub prefixes: Option<Vec<(String, String)>>,
    /// Overlaid onto the default keyword table
    pub keywords: Option<Vec<(String, String)>>,
}

impl NormalizeOptions {
    /// Parse options from JSON text, e.g. a CLI argument.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| NormalizerError::Config(format!("invalid options JSON: {}", e)))
    }
}

/// Fully merged configuration for a single call.
///
/// Assembled fresh per call by overlaying caller overrides onto the
/// built-in defaults; never partial after the merge.
#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    pub min_length: usize,
    pub max_length: usize,
    pub prefixes: Vec<(String, String)>,
    pub keywords: Vec<(String, String)>,
}

impl NormalizeConfig {
    /// Overlay caller overrides onto the built-in defaults.
    pub fn merged(options: Option<&NormalizeOptions>) -> Self {
        let empty = NormalizeOptions::default();
        let opts = options.unwrap_or(&empty);
        Self {
            min_length: opts.min_length.unwrap_or(DEFAULT_MIN_LENGTH),
            max_length: opts.max_length.unwrap_or(DEFAULT_MAX_LENGTH),
            prefixes: merge_patterns(DEFAULT_PREFIXES, opts.prefixes.as_deref()),
            keywords: merge_patterns(DEFAULT_KEYWORDS, opts.keywords.as_deref()),
        }
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self::merged(None)
    }
}

/// Overlay override pairs onto a default table. A pattern already present
/// keeps its default position but takes the override's label; new patterns
/// append in override order.
fn merge_patterns(
    defaults: &[(&str, &str)],
    overrides: Option<&[(String, String)]>,
) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = defaults
        .iter()
        .map(|(pattern, label)| (pattern.to_string(), label.to_string()))
        .collect();

    if let Some(overrides) = overrides {
        for (pattern, label) in overrides {
            if let Some(entry) = merged.iter_mut().find(|(existing, _)| existing == pattern) {
                entry.1 = label.clone();
            } else {
                merged.push((pattern.clone(), label.clone()));
            }
        }
    }

    merged
}
