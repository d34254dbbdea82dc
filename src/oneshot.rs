//! Pieces of the `summarise` command that do not need a terminal.

use crate::clipboard::Clipboard;
use crate::controller::{truncate_chars, SummaryRequestController, MAX_CHARS};
use crate::summary::InferenceRequest;
use std::fmt;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("no input: pass TEXT, --file, or pipe text on stdin")]
    NoInput,
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Take input from the argument, a file, or `stdin`, in that order.
///
/// `stdin` is only read when it is not a terminal.
pub fn read_input<R: Read>(
    text: Option<String>,
    file: Option<&Path>,
    mut stdin: R,
    stdin_is_tty: bool,
) -> Result<String, InputError> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return Ok(std::fs::read_to_string(path)?);
    }
    if stdin_is_tty {
        return Err(InputError::NoInput);
    }
    let mut buf = String::new();
    stdin.read_to_string(&mut buf)?;
    Ok(buf)
}

/// What `--dry-run` reports instead of sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRun {
    /// The exact JSON body that would be posted
    pub body: String,
    pub sent_chars: usize,
    pub total_chars: usize,
}

impl DryRun {
    pub fn new(question: &str) -> Self {
        let inputs = truncate_chars(question, MAX_CHARS);
        let body = serde_json::to_string(&InferenceRequest { inputs })
            .unwrap_or_else(|_| String::from("{}"));
        Self {
            body,
            sent_chars: inputs.chars().count(),
            total_chars: question.chars().count(),
        }
    }
}

impl fmt::Display for DryRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.body)?;
        write!(
            f,
            "\n--- {} of {} characters would be sent ---",
            self.sent_chars, self.total_chars
        )
    }
}

/// How the command may confirm a copy before it exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    /// The clipboard keeps the text after exit
    Copied(String),
    /// The text is only pasteable while this process keeps running
    HoldUntilPasted(String),
    /// Nothing was copied
    NotCopied,
}

/// Consume the form's notice and decide what the command may print.
pub fn confirmation<C: Clipboard>(form: &mut SummaryRequestController<C>) -> Confirmation {
    match form.take_notice() {
        None => Confirmation::NotCopied,
        Some(notice) if form.clipboard().outlives_process() => Confirmation::Copied(notice),
        Some(notice) => Confirmation::HoldUntilPasted(notice),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::{ClipboardError, NoClipboard};
    use serde_json::json;
    use std::io::{Cursor, Write};

    fn stdin(text: &str) -> Cursor<Vec<u8>> {
        Cursor::new(text.as_bytes().to_vec())
    }

    #[test]
    fn argument_wins_over_file_and_stdin() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "from file").unwrap();

        let input = read_input(
            Some("from arg".to_string()),
            Some(file.path()),
            stdin("from stdin"),
            false,
        )
        .unwrap();
        assert_eq!(input, "from arg");
    }

    #[test]
    fn file_wins_over_stdin() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "from file").unwrap();

        let input = read_input(None, Some(file.path()), stdin("from stdin"), false).unwrap();
        assert_eq!(input, "from file");
    }

    #[test]
    fn piped_stdin_is_read() {
        let input = read_input(None, None, stdin("piped\ntext"), false).unwrap();
        assert_eq!(input, "piped\ntext");
    }

    #[test]
    fn empty_pipe_gives_empty_question() {
        let input = read_input(None, None, stdin(""), false).unwrap();
        assert!(input.is_empty());
    }

    #[test]
    fn terminal_stdin_without_arguments_is_an_error() {
        assert!(matches!(
            read_input(None, None, stdin("ignored"), true),
            Err(InputError::NoInput)
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        assert!(matches!(
            read_input(None, Some(missing.as_path()), stdin(""), true),
            Err(InputError::Io(_))
        ));
    }

    #[test]
    fn dry_run_shows_truncated_body() {
        let question = "é".repeat(MAX_CHARS + 5);
        let dry = DryRun::new(&question);

        assert_eq!(dry.sent_chars, MAX_CHARS);
        assert_eq!(dry.total_chars, MAX_CHARS + 5);
        let body: serde_json::Value = serde_json::from_str(&dry.body).unwrap();
        assert_eq!(body, json!({ "inputs": "é".repeat(MAX_CHARS) }));
        assert!(dry
            .to_string()
            .ends_with("--- 3000 of 3005 characters would be sent ---"));
    }

    #[test]
    fn dry_run_of_short_text_sends_everything() {
        let dry = DryRun::new("short \"quoted\"");
        assert_eq!(dry.body, r#"{"inputs":"short \"quoted\""}"#);
        assert_eq!(dry.sent_chars, dry.total_chars);
    }

    struct Selection {
        survives_exit: bool,
    }

    impl Clipboard for Selection {
        fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
            Ok(())
        }

        fn outlives_process(&self) -> bool {
            self.survives_exit
        }
    }

    fn summarised<C: Clipboard>(clipboard: C) -> SummaryRequestController<C> {
        let mut form = SummaryRequestController::new(clipboard);
        form.set_question("text");
        form.begin_submit();
        form.complete_submit(Ok(json!([{ "summary_text": "done" }])));
        form
    }

    #[test]
    fn persistent_clipboard_confirms_copy() {
        let mut form = summarised(Selection {
            survives_exit: true,
        });
        assert!(matches!(confirmation(&mut form), Confirmation::Copied(_)));
    }

    #[test]
    fn process_bound_selection_must_be_held() {
        let mut form = summarised(Selection {
            survives_exit: false,
        });
        assert!(matches!(
            confirmation(&mut form),
            Confirmation::HoldUntilPasted(_)
        ));
    }

    #[test]
    fn failed_copy_claims_nothing() {
        let mut form = summarised(NoClipboard);
        assert_eq!(confirmation(&mut form), Confirmation::NotCopied);
    }
}
