//! Request payload and reply classification for the summarisation endpoint.

use serde::Serialize;
use serde_json::Value;

/// Body posted to the inference endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct InferenceRequest<'a> {
    /// Text to summarise, already truncated
    pub inputs: &'a str,
}

/// What a decoded response body means for the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The API reported an error; the message is shown verbatim
    ApiError(String),
    /// A summary was produced
    Summary(String),
    /// Neither an error nor a summary
    Unexpected,
    /// A bare `null` body, which cannot even be inspected for fields
    Unreadable,
}

impl Reply {
    /// Classify a decoded body.
    ///
    /// An `error` field wins over everything else. Otherwise the body must be
    /// an array whose first element carries a non-empty `summary_text`.
    pub fn classify(body: &Value) -> Self {
        if body.is_null() {
            return Reply::Unreadable;
        }

        if let Some(error) = body.get("error").filter(|e| is_truthy(e)) {
            let message = match error {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Reply::ApiError(message);
        }

        let summary = body
            .as_array()
            .and_then(|items| items.first())
            .and_then(|first| first.get("summary_text"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty());

        match summary {
            Some(text) => Reply::Summary(text.to_string()),
            None => Reply::Unexpected,
        }
    }
}

/// Loose truthiness: null, false, zero and empty strings do not count as set.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
