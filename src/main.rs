//! qasum CLI - Q&A summarisation to the clipboard
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use qasum::controller::MAX_CHARS;
use qasum::oneshot::{self, Confirmation, DryRun};
use qasum::{clipboard, ui, Config, InferenceClient, SummaryRequestController};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qasum")]
#[command(author, version, about = "Summarise text and copy it to the clipboard", long_about = None)]
struct Cli {
    /// Path to a qasum.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise text once and copy the result
    Summarise {
        /// Text to summarise; read from stdin when omitted
        text: Option<String>,
        /// Read the text from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Print the payload that would be sent instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Print a shell completion script
    Completions {
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.command.is_none());

    match cli.command {
        Some(Commands::Summarise {
            text,
            file,
            dry_run,
        }) => {
            let stdin_is_tty = atty::is(atty::Stream::Stdin);
            let question =
                oneshot::read_input(text, file.as_deref(), std::io::stdin(), stdin_is_tty)?;
            if question.is_empty() {
                println!("Nothing to summarise.");
                return Ok(());
            }

            if dry_run {
                println!("{}", DryRun::new(&question));
                return Ok(());
            }

            let config = load_config(cli.config.as_deref())?;
            let client = InferenceClient::new(&config)?;

            let mut form = SummaryRequestController::new(clipboard::system_or_none());
            form.set_question(question);
            if form.will_truncate() {
                println!("Input is longer than {MAX_CHARS} characters and will be truncated.");
            }

            println!("Summarising...\n");
            form.submit(&client).await;

            if !form.error().is_empty() {
                eprintln!("{}", form.error().red());
                anyhow::bail!("summarisation failed");
            }

            println!("{}", "Summary:".bold());
            println!("{}\n", form.answer());
            match oneshot::confirmation(&mut form) {
                Confirmation::Copied(notice) => println!("{}", notice.green()),
                Confirmation::HoldUntilPasted(notice) if stdin_is_tty => {
                    // The selection dies with this process, so keep serving it.
                    println!("{}", notice.green());
                    println!("Press Enter once you have pasted it.");
                    let mut line = String::new();
                    std::io::stdin().read_line(&mut line)?;
                }
                Confirmation::HoldUntilPasted(_) => {
                    println!(
                        "{}",
                        "Not left on the clipboard: it only lasts while qasum runs here."
                            .yellow()
                    );
                }
                Confirmation::NotCopied => {
                    println!("{}", "Clipboard unavailable; nothing was copied.".yellow());
                }
            }
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        }
        None => {
            // Default: Launch the TUI
            let config = load_config(cli.config.as_deref())?;
            let client = InferenceClient::new(&config)?;
            ui::run(client).await?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Log to stderr for CLI commands; the TUI owns the terminal, so it logs to a file
fn init_tracing(tui: bool) {
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    if !tui {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
        return;
    }

    let log_file = dirs::cache_dir()
        .map(|dir| dir.join("qasum"))
        .and_then(|dir| std::fs::create_dir_all(&dir).ok().map(|_| dir.join("qasum.log")))
        .and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });

    if let Some(file) = log_file {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init();
    }
}
