//! Decoding of update-intent responses.
//!
//! The generator is asked for bare JSON but frequently wraps it in a code
//! fence. [`decode_intent`] strips the fence and returns a tagged result;
//! callers decide what a malformed response means. Only a reply that is not a
//! JSON object is malformed: inside an object, each list element is checked on
//! its own and unusable ones are dropped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A structured edit set for one day's tasks.
///
/// All fields are optional in the wire format and default to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateIntent {
    /// Indices to mark done.
    pub completed_indices: Vec<usize>,
    /// Indices to mark abandoned.
    pub abandoned_indices: Vec<usize>,
    /// Titles to append as pending tasks.
    pub new_tasks: Vec<String>,
    /// Title replacements.
    pub text_edits: Vec<TextEdit>,
}

impl UpdateIntent {
    /// True if applying this intent changes nothing.
    pub fn is_empty(&self) -> bool {
        self.completed_indices.is_empty()
            && self.abandoned_indices.is_empty()
            && self.new_tasks.is_empty()
            && self.text_edits.is_empty()
    }
}

/// Replace the title of the task at `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub index: usize,
    pub new_title: String,
}

/// Outcome of decoding a generator response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentDecode {
    /// The response was a JSON object.
    Parsed(UpdateIntent),
    /// The response was not JSON, or not an object.
    Malformed { reason: String },
}

impl IntentDecode {
    /// The parsed intent, or an empty one for a malformed response.
    pub fn into_intent_or_empty(self) -> UpdateIntent {
        match self {
            IntentDecode::Parsed(intent) => intent,
            IntentDecode::Malformed { reason } => {
                tracing::warn!("{} (fail-open: applying no edits)", reason);
                UpdateIntent::default()
            }
        }
    }
}

/// Decode a raw generator response into an update intent.
pub fn decode_intent(raw: &str) -> IntentDecode {
    let body = strip_code_fence(raw);
    let value = match serde_json::from_str::<Value>(body) {
        Ok(value) => value,
        Err(err) => {
            return IntentDecode::Malformed {
                reason: format!("malformed update intent: {}", err),
            }
        }
    };

    let Value::Object(fields) = value else {
        return IntentDecode::Malformed {
            reason: "malformed update intent: expected a JSON object".to_string(),
        };
    };

    IntentDecode::Parsed(UpdateIntent {
        completed_indices: elements(&fields, "completed_indices", as_index),
        abandoned_indices: elements(&fields, "abandoned_indices", as_index),
        new_tasks: elements(&fields, "new_tasks", |v| v.as_str().map(str::to_string)),
        text_edits: elements(&fields, "text_edits", as_text_edit),
    })
}

/// Remove a surrounding ```` ``` ```` or ```` ```json ```` fence, if present.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the rest of the opening line (the language tag).
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => "",
    };

    rest.trim_end()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

/// Convert each element of the list at `key`, dropping the ones `convert`
/// rejects. A missing, `null` or non-list field is empty.
fn elements<T>(
    fields: &Map<String, Value>,
    key: &str,
    convert: impl Fn(&Value) -> Option<T>,
) -> Vec<T> {
    let Some(value) = fields.get(key).filter(|v| !v.is_null()) else {
        return Vec::new();
    };
    let Some(items) = value.as_array() else {
        tracing::debug!(field = key, "update intent field is not a list, ignoring");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let converted = convert(item);
            if converted.is_none() {
                tracing::debug!(field = key, element = %item, "dropping unusable update intent element");
            }
            converted
        })
        .collect()
}

/// A task index: a non-negative integer, or a float with no fractional part.
fn as_index(value: &Value) -> Option<usize> {
    if let Some(n) = value.as_u64() {
        return usize::try_from(n).ok();
    }
    let f = value.as_f64()?;
    if f >= 0.0 && f.fract() == 0.0 && f <= usize::MAX as f64 {
        Some(f as usize)
    } else {
        None
    }
}

/// A text edit carrying both a usable index and a string title.
fn as_text_edit(value: &Value) -> Option<TextEdit> {
    let index = as_index(value.get("index")?)?;
    let new_title = value.get("new_title")?.as_str()?.to_string();
    Some(TextEdit { index, new_title })
}
