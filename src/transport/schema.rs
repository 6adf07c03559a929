//! Response contract for the chat endpoint.
//!
//! Answer fields, highest priority first:
//! 1. `answer`
//! 2. `reply`
//! 3. `choices[0].message.content`
//! 4. `choices[0].text`
//! 5. `candidates[0].content.parts[0].text`
//!
//! The first field holding a non-blank string wins.

use crate::error::TransportError;
use serde_json::Value;

/// Characters of a non-JSON body kept for diagnostics.
pub const EXCERPT_CHARS: usize = 120;

/// Where an answer can live in a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum AnswerField {
    #[strum(serialize = "answer")]
    Answer,
    #[strum(serialize = "reply")]
    Reply,
    #[strum(serialize = "choices[0].message.content")]
    ChoiceMessage,
    #[strum(serialize = "choices[0].text")]
    ChoiceText,
    #[strum(serialize = "candidates[0].content.parts[0].text")]
    CandidatePart,
}

impl AnswerField {
    pub const PRIORITY: [Self; 5] = [
        Self::Answer,
        Self::Reply,
        Self::ChoiceMessage,
        Self::ChoiceText,
        Self::CandidatePart,
    ];

    fn lookup(self, body: &Value) -> Option<&str> {
        let value = match self {
            Self::Answer => body.get("answer"),
            Self::Reply => body.get("reply"),
            Self::ChoiceMessage => body.pointer("/choices/0/message/content"),
            Self::ChoiceText => body.pointer("/choices/0/text"),
            Self::CandidatePart => body.pointer("/candidates/0/content/parts/0/text"),
        };
        value.and_then(Value::as_str)
    }
}

/// First non-blank answer field and where it came from.
pub fn find_answer(body: &Value) -> Option<(AnswerField, &str)> {
    AnswerField::PRIORITY.iter().find_map(|field| {
        field
            .lookup(body)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(|text| (*field, text))
    })
}

/// Trimmed answer text, empty when no field carries one.
pub fn extract_answer(body: &Value) -> String {
    find_answer(body)
        .map(|(_, text)| text.to_string())
        .unwrap_or_default()
}

/// Explicit `ok: false` or `success: false` in the body.
pub fn signals_failure(body: &Value) -> bool {
    ["ok", "success"]
        .iter()
        .any(|key| body.get(*key).and_then(Value::as_bool) == Some(false))
}

/// Server-supplied error text: `error` (string), `error.message`, `message`.
pub fn error_message(body: &Value) -> Option<String> {
    let candidates = [
        body.get("error").and_then(Value::as_str),
        body.pointer("/error/message").and_then(Value::as_str),
        body.get("message").and_then(Value::as_str),
    ];
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(str::to_string)
}

/// Whether a `Content-Type` header value declares JSON.
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    let Some(raw) = content_type else {
        return false;
    };
    let Ok(parsed) = raw.parse::<mime::Mime>() else {
        return false;
    };
    parsed.type_() == mime::APPLICATION
        && (parsed.subtype() == mime::JSON || parsed.suffix() == Some(mime::JSON))
}

/// First [`EXCERPT_CHARS`] characters of `body`.
pub fn excerpt(body: &str) -> String {
    body.chars().take(EXCERPT_CHARS).collect()
}

/// Turn a raw endpoint response into an answer or a typed failure.
///
/// Order matters: content type is checked before parsing, the failure
/// indicator before answer extraction.
pub fn interpret_response(
    status: u16,
    content_type: Option<&str>,
    body: &str,
) -> Result<String, TransportError> {
    if !is_json_content_type(content_type) {
        return Err(TransportError::MalformedResponse {
            status,
            excerpt: excerpt(body),
        });
    }

    let Ok(parsed) = serde_json::from_str::<Value>(body) else {
        return Err(TransportError::MalformedResponse {
            status,
            excerpt: excerpt(body),
        });
    };

    let http_ok = (200..300).contains(&status);
    if !http_ok || signals_failure(&parsed) {
        return Err(TransportError::RequestFailed {
            status,
            message: error_message(&parsed).unwrap_or_else(|| format!("Request failed ({status})")),
        });
    }

    Ok(extract_answer(&parsed))
}
