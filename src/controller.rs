//! Form state and the submit / copy-again operations behind it.
//!
//! The controller owns everything the form shows: the question being typed,
//! the last answer, the last error and whether a request is in flight. It
//! does not own the network layer or the clipboard; both are passed in.

use crate::agent::{AgentError, Summarizer};
use crate::clipboard::Clipboard;
use crate::summary::Reply;
use serde_json::Value;

/// Inputs longer than this many characters are cut before sending.
pub const MAX_CHARS: usize = 3000;

/// Shown when the body is neither an error nor a summary.
pub const UNEXPECTED_RESPONSE: &str = "Unexpected API response.";

/// Shown when the request or decoding fails.
pub const FETCH_FAILED: &str = "Error fetching summary. Please try again.";

/// Confirmation raised after a summary was copied.
pub const COPIED_NOTICE: &str = "Answer copied to clipboard!";

/// Cut `text` to at most `max` characters, ignoring word boundaries.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub struct SummaryRequestController<C> {
    question: String,
    answer: String,
    error: String,
    loading: bool,
    notice: Option<String>,
    clipboard: C,
}

impl<C: Clipboard> SummaryRequestController<C> {
    pub fn new(clipboard: C) -> Self {
        Self {
            question: String::new(),
            answer: String::new(),
            error: String::new(),
            loading: false,
            notice: None,
            clipboard,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// Mutable access for editors that work on the buffer in place.
    pub fn question_mut(&mut self) -> &mut String {
        &mut self.question
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Whether the question exceeds [`MAX_CHARS`] and will be cut.
    pub fn will_truncate(&self) -> bool {
        self.question.chars().nth(MAX_CHARS).is_some()
    }

    /// Whether a submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.question.is_empty()
    }

    /// Start an attempt.
    ///
    /// Returns the truncated payload to send, or `None` when nothing should be
    /// dispatched. On `Some`, the caller must hand the outcome to
    /// [`complete_submit`](Self::complete_submit).
    pub fn begin_submit(&mut self) -> Option<String> {
        if !self.can_submit() {
            tracing::debug!(loading = self.loading, "submit ignored");
            return None;
        }

        self.loading = true;
        self.error.clear();
        Some(truncate_chars(&self.question, MAX_CHARS).to_string())
    }

    /// Finish the attempt started by [`begin_submit`](Self::begin_submit).
    pub fn complete_submit(&mut self, result: Result<Value, AgentError>) {
        match result {
            Ok(body) => match Reply::classify(&body) {
                Reply::ApiError(message) => {
                    tracing::warn!(%message, "API reported an error");
                    self.error = message;
                }
                Reply::Summary(text) => {
                    tracing::info!(chars = text.chars().count(), "summary received");
                    self.answer = text;
                    if self.copy_answer() {
                        self.notice = Some(COPIED_NOTICE.to_string());
                    }
                }
                Reply::Unexpected => {
                    tracing::warn!(%body, "unexpected response shape");
                    self.error = UNEXPECTED_RESPONSE.to_string();
                }
                Reply::Unreadable => {
                    tracing::error!("response body was null");
                    self.error = FETCH_FAILED.to_string();
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "summarisation request failed");
                self.error = FETCH_FAILED.to_string();
            }
        }
        self.loading = false;
    }

    /// Run one full attempt against `summarizer`.
    ///
    /// Returns `false` if the attempt was skipped because a request is already
    /// in flight or the question is empty.
    pub async fn submit<S: Summarizer>(&mut self, summarizer: &S) -> bool {
        let Some(payload) = self.begin_submit() else {
            return false;
        };
        let result = summarizer.summarize(&payload).await;
        self.complete_submit(result);
        true
    }

    /// Copy the current answer to the clipboard again.
    pub fn copy_again(&mut self) {
        let _ = self.copy_answer();
    }

    /// Take the pending confirmation, if any.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    fn copy_answer(&mut self) -> bool {
        match self.clipboard.write_text(&self.answer) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "clipboard write failed");
                false
            }
        }
    }
}
