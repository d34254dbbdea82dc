//! TUI module using ratatui.
//!
//! A single form: question editor, submit and copy controls, error and
//! summary panes. Requests run on a background task so the form keeps
//! drawing "Processing..." while one is in flight.

pub mod components;

use crate::agent::{AgentError, InferenceClient, Summarizer};
use crate::clipboard::{self, Clipboard};
use crate::controller::SummaryRequestController;
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc;

/// How long to wait for input before redrawing
const TICK: Duration = Duration::from_millis(100);

/// Form state plus the bits of UI state the controller does not own.
pub struct App<C> {
    pub form: SummaryRequestController<C>,
    /// Confirmation popup currently on screen
    pub popup: Option<String>,
    /// First summary row shown; clamped when drawn
    pub answer_scroll: u16,
    pub should_quit: bool,
}

/// What a key press asks the event loop to do.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    None,
    /// Dispatch this payload
    Submit(String),
}

impl<C: Clipboard> App<C> {
    pub fn new(clipboard: C) -> Self {
        Self {
            form: SummaryRequestController::new(clipboard),
            popup: None,
            answer_scroll: 0,
            should_quit: false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        // The confirmation blocks the form until acknowledged.
        if self.popup.is_some() {
            self.popup = None;
            return Action::None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('s') if ctrl => {
                if let Some(payload) = self.form.begin_submit() {
                    return Action::Submit(payload);
                }
            }
            KeyCode::Char('y') if ctrl => {
                if !self.form.answer().is_empty() {
                    self.form.copy_again();
                }
            }
            KeyCode::Char('u') if ctrl => self.form.question_mut().clear(),
            KeyCode::Char(c) if !ctrl => self.form.question_mut().push(c),
            KeyCode::Enter => self.form.question_mut().push('\n'),
            KeyCode::Tab => self.form.question_mut().push('\t'),
            KeyCode::Backspace => {
                self.form.question_mut().pop();
            }
            KeyCode::PageDown => {
                let rows = components::wrapped_height(self.form.answer(), 1);
                self.answer_scroll = self.answer_scroll.saturating_add(5).min(rows);
            }
            KeyCode::PageUp => self.answer_scroll = self.answer_scroll.saturating_sub(5),
            _ => {}
        }
        Action::None
    }

    pub fn handle_paste(&mut self, text: &str) {
        if self.popup.is_none() {
            self.form.question_mut().push_str(text);
        }
    }

    /// Apply a finished request and surface its confirmation, if any.
    pub fn on_response(&mut self, result: Result<Value, AgentError>) {
        self.form.complete_submit(result);
        self.answer_scroll = 0;
        if let Some(notice) = self.form.take_notice() {
            self.popup = Some(notice);
        }
    }
}

/// Launch the form and run until the user quits.
pub async fn run(client: InferenceClient) -> anyhow::Result<()> {
    let mut app = App::new(clipboard::system_or_none());
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut terminal = ratatui::init();

    let result = (|| -> anyhow::Result<()> {
        execute!(std::io::stdout(), EnableBracketedPaste)?;
        loop {
            while let Ok(response) = rx.try_recv() {
                app.on_response(response);
            }

            terminal.draw(|frame| components::render(frame, &app))?;

            if app.should_quit {
                return Ok(());
            }

            if !event::poll(TICK)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Action::Submit(payload) = app.handle_key(key) {
                        let client = client.clone();
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            let result = client.summarize(&payload).await;
                            // Receiver is gone only if the form already closed.
                            let _ = tx.send(result);
                        });
                    }
                }
                Event::Paste(text) => app.handle_paste(&text),
                _ => {}
            }
        }
    })();

    let _ = execute!(std::io::stdout(), DisableBracketedPaste);
    ratatui::restore();
    result
}
