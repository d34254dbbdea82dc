//! # qasum
//!
//! A terminal form that summarises pasted text with a hosted inference model
//! and copies the result to the clipboard.
//!
//! ## Features
//!
//! - **One request per submit**: input is truncated to [`MAX_CHARS`] characters and posted once
//! - **Shape-aware replies**: API errors, summaries and unexpected bodies are told apart
//! - **Clipboard first**: every fresh summary lands on the system clipboard

pub mod agent;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod oneshot;
pub mod summary;
pub mod ui;

pub use agent::{InferenceClient, Summarizer};
pub use config::Config;
pub use controller::{truncate_chars, SummaryRequestController, MAX_CHARS};
pub use summary::Reply;
