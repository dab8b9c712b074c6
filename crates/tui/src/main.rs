//! `crema`: edit an espresso profile in the terminal.
//!
//! Logs go to a file (default `/tmp/crema.log`) so they never draw over
//! the UI.

mod app;
mod renderer;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crema_core::ProfileEditor;
use crema_core::model::parse_profile;
use crema_core::views::ChartConfig;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;

/// Terminal editor for espresso brewing profiles.
#[derive(Parser, Debug)]
#[command(name = "crema", version, about)]
struct Cli {
    /// Profile JSON to open. Starts from the built-in profile when omitted.
    profile: Option<PathBuf>,

    /// Where `w` writes the profile (defaults to the opened file, or
    /// `profile.json`).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log file path.
    #[arg(long, default_value = "/tmp/crema.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("crema_core={level},crema_tui={level}")));

    let dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let file_name = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("crema.log"));
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(true))
        .init();

    guard
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_tracing(&cli);

    let editor = match &cli.profile {
        Some(path) => {
            let data = std::fs::read(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let profile =
                parse_profile(&data).with_context(|| format!("parsing {}", path.display()))?;
            info!(path = %path.display(), frames = profile.frames.len(), "opened profile");
            ProfileEditor::with_profile(profile, ChartConfig::default())?
        }
        None => ProfileEditor::new(),
    };

    let save_path = cli
        .output
        .or(cli.profile)
        .unwrap_or_else(|| PathBuf::from("profile.json"));

    let mut app = App::new(editor, save_path);
    renderer::run(&mut app)
}
