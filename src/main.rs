use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use portfolio_os_lib::audio;
use portfolio_os_lib::tui::{self, App};
use portfolio_os_lib::{ShellConfig, ShellController};

/// Portfolio desktop in the terminal
#[derive(Debug, Parser)]
#[command(name = "portfolio-os", version, about)]
struct Args {
    /// Shell configuration (JSON)
    #[arg(long, env = "PORTFOLIO_OS_CONFIG")]
    config: Option<PathBuf>,

    /// Go straight to the login screen
    #[arg(long)]
    skip_boot: bool,

    /// Write logs here; without it logs are discarded
    #[arg(long, env = "PORTFOLIO_OS_LOG_FILE")]
    log_file: Option<PathBuf>,
}

fn init_logging(path: Option<&PathBuf>) -> Result<()> {
    let filter =
        EnvFilter::try_from_env("PORTFOLIO_OS_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    // The terminal is in raw mode, so nothing may go to stdout/stderr
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let config = match &args.config {
        Some(path) => ShellConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ShellConfig::default(),
    };

    // Keep the output stream alive until the terminal closes
    let (player, _output) = audio::default_player();
    let shell = ShellController::new(&config, player).context("invalid window catalog")?;
    let mut app = App::new(shell, args.skip_boot);

    info!("starting terminal desktop");
    let mut terminal = ratatui::init();
    let result = tui::run(&mut terminal, &mut app);
    ratatui::restore();

    result.context("terminal session failed")
}
