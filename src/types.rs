use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input accepted by the normalizer: either a bare code string or a
/// structured record carrying an opaque caller-supplied metadata payload.
#[derive(Debug, Clone, PartialEq)]
pub enum CodeInput {
    /// A raw text value
    Raw(String),
    /// A structured record with a `code` field and optional `meta` payload
    Structured {
        code: String,
        /// Passed through to the result unexamined, only when supplied
        meta: Option<Value>,
    },
}

impl CodeInput {
    /// Resolve a dynamic JSON value into a typed input.
    ///
    /// Objects take the structured path; everything else is coerced to raw
    /// text. Malformed shapes degrade to empty text rather than failing.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => {
                let code = map.get("code").map(coerce_to_text).unwrap_or_default();
                let meta = map.get("meta").cloned();
                CodeInput::Structured { code, meta }
            }
            other => CodeInput::Raw(coerce_to_text(other)),
        }
    }

    /// The raw code text, regardless of input shape
    pub fn code(&self) -> &str {
        match self {
            CodeInput::Raw(code) => code,
            CodeInput::Structured { code, .. } => code,
        }
    }
}

impl From<&str> for CodeInput {
    fn from(code: &str) -> Self {
        CodeInput::Raw(code.to_string())
    }
}

impl From<String> for CodeInput {
    fn from(code: String) -> Self {
        CodeInput::Raw(code)
    }
}

impl From<&Value> for CodeInput {
    fn from(value: &Value) -> Self {
        CodeInput::from_value(value)
    }
}

/// Coerce a loose JSON value to code text. Null, false, zero and missing
/// values all become empty text.
fn coerce_to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => {
            if number.as_f64() == Some(0.0) {
                String::new()
            } else {
                number.to_string()
            }
        }
        Value::Bool(true) => "true".to_string(),
        _ => String::new(),
    }
}

/// Heuristic classification label assigned to a code.
///
/// The built-in pattern tables only produce the named variants; caller
/// configurations may map patterns to other labels, which surface as
/// `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProbableType {
    ClassReroll,
    StatReset,
    Currency,
    EventReward,
    Unknown,
    /// Label introduced by a caller-supplied pattern table
    Custom(String),
}

impl ProbableType {
    pub fn as_str(&self) -> &str {
        match self {
            ProbableType::ClassReroll => "class_reroll",
            ProbableType::StatReset => "stat_reset",
            ProbableType::Currency => "currency",
            ProbableType::EventReward => "event_reward",
            ProbableType::Unknown => "unknown",
            ProbableType::Custom(label) => label,
        }
    }
}

impl From<&str> for ProbableType {
    fn from(label: &str) -> Self {
        match label {
            "class_reroll" => ProbableType::ClassReroll,
            "stat_reset" => ProbableType::StatReset,
            "currency" => ProbableType::Currency,
            "event_reward" => ProbableType::EventReward,
            "unknown" => ProbableType::Unknown,
            other => ProbableType::Custom(other.to_string()),
        }
    }
}

impl From<String> for ProbableType {
    fn from(label: String) -> Self {
        ProbableType::from(label.as_str())
    }
}

impl From<ProbableType> for String {
    fn from(probable_type: ProbableType) -> Self {
        probable_type.as_str().to_string()
    }
}

/// The outcome of normalizing a single code.
///
/// Field names serialize in camelCase to match the wire shape consumers of
/// the original service expect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeResult {
    /// The cleaned canonical text
    pub normalized: String,
    /// The original code text as given
    pub raw: String,
    /// True iff charset and length checks passed and the code is non-empty
    pub is_valid_format: bool,
    /// Classification derived from the highest-priority pattern match
    pub probable_type: ProbableType,
    /// Diagnostic tags recorded during processing, in match order
    pub hints: Vec<String>,
    /// Redemption status placeholder; never computed here
    pub status: String,
    /// Character count of `normalized`
    pub length: usize,
    /// When this code was processed
    pub created_at: DateTime<Utc>,
    /// Caller metadata, present only when the input supplied it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}
