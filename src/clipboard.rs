//! Write-only access to the system clipboard.

use clipboard::{ClipboardContext, ClipboardProvider};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("failed to write clipboard: {0}")]
    WriteFailed(String),
}

/// X11 has no clipboard daemon: the owning process serves the selection and
/// it is gone once that process exits.
const SELECTION_SERVED_IN_PROCESS: bool = cfg!(all(
    unix,
    not(any(target_os = "macos", target_os = "ios", target_os = "android"))
));

/// A place summaries can be copied to.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;

    /// Whether written text stays available after this process exits.
    fn outlives_process(&self) -> bool {
        true
    }
}

/// The host system clipboard.
///
/// The context is kept open for the lifetime of the value, see
/// [`outlives_process`](Clipboard::outlives_process).
pub struct SystemClipboard {
    ctx: ClipboardContext,
}

impl SystemClipboard {
    pub fn open() -> Result<Self, ClipboardError> {
        let ctx: ClipboardContext =
            ClipboardProvider::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        Ok(Self { ctx })
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.ctx
            .set_contents(text.to_owned())
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))
    }

    fn outlives_process(&self) -> bool {
        !SELECTION_SERVED_IN_PROCESS
    }
}

/// Used when no system clipboard can be opened (e.g. a headless session).
#[derive(Debug, Default)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable(
            "no clipboard in this session".to_string(),
        ))
    }
}

impl<C: Clipboard + ?Sized> Clipboard for Box<C> {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        (**self).write_text(text)
    }

    fn outlives_process(&self) -> bool {
        (**self).outlives_process()
    }
}

/// Open the system clipboard, falling back to [`NoClipboard`].
pub fn system_or_none() -> Box<dyn Clipboard> {
    match SystemClipboard::open() {
        Ok(clipboard) => Box::new(clipboard),
        Err(e) => {
            tracing::warn!(error = %e, "clipboard unavailable, copies will be skipped");
            Box::new(NoClipboard)
        }
    }
}
