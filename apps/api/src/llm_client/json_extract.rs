//! Best-effort recovery of a JSON object from free-form model output.
//!
//! Two stages, tried in order:
//! 1. strip a surrounding code fence (and its language tag), parse the rest;
//! 2. parse the raw text from the first `{` to the last `}`.
//!
//! No repair is attempted beyond that.

use serde_json::Value;

use super::LlmError;

/// Extracts the JSON object embedded in `text`.
/// Fails with `LlmError::ResponseFormat` (carrying the raw text) when neither stage yields an object.
pub fn extract_json_object(text: &str) -> Result<Value, LlmError> {
    let unfenced = strip_code_fence(text);

    let first_failure = match serde_json::from_str::<Value>(unfenced) {
        Ok(value) if value.is_object() => return Ok(value),
        Ok(_) => "response is valid JSON but not an object".to_string(),
        Err(e) => e.to_string(),
    };

    if let Some(candidate) = outermost_braces(text) {
        if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(candidate) {
            return Ok(value);
        }
    }

    Err(LlmError::ResponseFormat {
        reason: first_failure,
        raw: text.to_string(),
    })
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
/// Text without a leading fence is returned trimmed.
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };

    // The remainder of the opening fence line is the language tag, if any.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };

    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// The span from the first `{` to the last `}`, if the text has both in that order.
fn outermost_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
