use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use overtype::{App, Buffer, CrosstermTerminal, FileSettings, Screen, Terminal, Workspace};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Files to edit
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Settings file (default: ~/.config/overtype/settings.toml)
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write a debug log to this file
    #[arg(short = 'l', long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Open in read-only mode
    #[arg(short = 'r', long)]
    read_only: bool,
}

/// Log to `path` when given. The terminal is in raw mode, so never to stderr.
fn init_logging(path: Option<&PathBuf>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("overtype=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log.as_ref())?;

    let mut workspace = Workspace::new();
    if args.files.is_empty() {
        let id = workspace.alloc_id();
        workspace.add(Buffer::new(id, "[scratch]"));
    }
    for path in &args.files {
        let id = workspace.alloc_id();
        let mut buffer = Buffer::open(id, path)?;
        buffer.set_read_only(args.read_only);
        workspace.add(buffer);
    }
    // Start on the first buffer.
    workspace.unfocus();
    workspace.focus_next();

    let settings = match args.config {
        Some(path) => FileSettings::new(path),
        None => FileSettings::new(
            FileSettings::default_path().context("Cannot locate home directory for settings")?,
        ),
    };
    tracing::info!(settings = %settings.path().display(), files = args.files.len(), "starting");

    let mut terminal = CrosstermTerminal::new();
    let screen = Screen::new(terminal.size());
    let mut app = App::new(workspace, screen, Box::new(settings));

    let result = app.run(&mut terminal);
    if result.is_err() {
        // Leave raw mode before the error is printed.
        terminal.cleanup().ok();
    }
    result
}
