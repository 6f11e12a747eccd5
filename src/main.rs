//! Tally CLI - line-oriented calculator front end
//!
//! Each input line is a whitespace-separated list of keys or button labels:
//!
//! ```text
//! 7 + 3 Enter
//! M+ MR
//! 50% =
//! history
//! replay 0
//! ```
//!
//! Key names follow the browser convention (`Enter`, `Escape`, `Backspace`).
//! Tokens that are neither a key nor a button are split into characters, so
//! `12*3` works as a single token. The display is printed after each line of
//! keys and again whenever an error reset fires between lines.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tally::config::CalculatorConfig;
use tally::core::{Event, HistoryLog};
use tally::effects::{Command, Session, SessionEnv};
use tally::keys;
use tally::storage::{DirStore, HistoryStore, MemoryStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Tally - keystroke-driven calculator
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory to persist the history in (kept in memory if omitted)
    #[arg(long, value_name = "DIR")]
    history_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => CalculatorConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => CalculatorConfig::default(),
    };
    info!(?config, "Starting calculator");

    match args.history_dir {
        Some(dir) => {
            let env = SessionEnv::keyed(DirStore::new(dir), config.storage_key.clone());
            serve(config, env).await
        }
        None => {
            let env = SessionEnv::keyed(MemoryStore::new(), config.storage_key.clone());
            serve(config, env).await
        }
    }
}

async fn serve<H: HistoryStore + 'static>(
    config: CalculatorConfig,
    env: SessionEnv<H>,
) -> Result<()> {
    let session = Session::start(&config, env).await;
    let mut display = session.subscribe();
    println!("{}", *display.borrow_and_update());

    let (tx, rx) = mpsc::channel(64);
    let runner = tokio::spawn(session.run(rx));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                if handle_line(&tx, &line).await? {
                    println!("{}", *display.borrow_and_update());
                }
            }
            Ok(()) = display.changed() => {
                println!("{}", *display.borrow_and_update());
            }
        }
    }

    drop(tx);
    let session = runner.await.context("calculator session panicked")?;
    debug!(entries = session.calculator().history().len(), "Session finished");
    Ok(())
}

/// Handle one input line. Returns `true` if the display should be printed.
async fn handle_line(tx: &mpsc::Sender<Command>, line: &str) -> Result<bool> {
    let mut words = line.split_whitespace();
    match words.next() {
        Some("history") => {
            for (i, entry) in history(tx).await?.iter().enumerate() {
                println!("{i:>3}: {} = {}", entry.expression, entry.result);
            }
            Ok(false)
        }
        Some("replay") => {
            let entry = match words.next().and_then(|w| w.parse::<usize>().ok()) {
                Some(index) => history(tx).await?.get(index).cloned(),
                None => None,
            };
            let Some(entry) = entry else {
                eprintln!("usage: replay <index from `history`>");
                return Ok(false);
            };
            send(tx, Event::HistoryReplay(entry)).await?;
            history(tx).await?;
            Ok(true)
        }
        _ => {
            for event in line.split_whitespace().flat_map(parse_token) {
                send(tx, event).await?;
            }
            // Wait until the session has applied the line.
            history(tx).await?;
            Ok(true)
        }
    }
}

async fn send(tx: &mpsc::Sender<Command>, event: Event) -> Result<()> {
    tx.send(event.into())
        .await
        .map_err(|_| anyhow::anyhow!("calculator session stopped"))
}

/// Ask the session for its history, after every command already sent.
async fn history(tx: &mpsc::Sender<Command>) -> Result<HistoryLog> {
    let (reply, response) = oneshot::channel();
    tx.send(Command::History(reply))
        .await
        .map_err(|_| anyhow::anyhow!("calculator session stopped"))?;
    response.await.context("calculator session stopped")
}

fn parse_token(token: &str) -> Vec<Event> {
    if let Some(event) = keys::binding_for_button(token) {
        return vec![event];
    }
    if let Some(binding) = keys::binding_for(token) {
        return vec![binding.event];
    }
    let mut buf = [0; 4];
    let events: Vec<Event> = token
        .chars()
        .filter_map(|ch| keys::binding_for_button(ch.encode_utf8(&mut buf)))
        .collect();
    if events.is_empty() {
        eprintln!("ignored: {token}");
    }
    events
}
