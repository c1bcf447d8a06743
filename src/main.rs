mod calc_engine;
mod config;
mod error;
mod state;

#[cfg(feature = "line")]
mod line_mode;
#[cfg(feature = "tui")]
mod render_help;
#[cfg(feature = "tui")]
mod tui_mode;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use config::Config;
use state::CalculatorState;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Tui,
    Line,
}

/// Scientific calculator with a keypad terminal UI.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Front-end to run
    #[arg(long, value_enum, default_value_t = default_mode())]
    mode: Mode,

    /// Config file (defaults to <config dir>/scicalc/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Evaluate one expression, print the result and exit
    #[arg(long, value_name = "EXPR")]
    eval: Option<String>,
}

fn default_mode() -> Mode {
    if cfg!(feature = "tui") {
        Mode::Tui
    } else {
        Mode::Line
    }
}

fn init_tracing(config: &Config, interactive_tui: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match &config.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        // the TUI owns the terminal; without a file there is nowhere to log
        None if interactive_tui => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn run_eval(expr: &str, config: &Config) -> Result<()> {
    let (_, outcome) = CalculatorState::with_history_limit(config.history_limit).submit_text(expr);
    match outcome {
        Some(Ok(result)) => {
            println!("{}", result);
            Ok(())
        }
        Some(Err(err)) => bail!("{}", err),
        None => bail!("empty expression"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let interactive_tui = cli.eval.is_none() && cli.mode == Mode::Tui;
    init_tracing(&config, interactive_tui)?;

    if let Some(expr) = &cli.eval {
        return run_eval(expr, &config);
    }

    info!(mode = ?cli.mode, "starting");
    match cli.mode {
        #[cfg(feature = "tui")]
        Mode::Tui => tui_mode::run_tui(&config),
        #[cfg(feature = "line")]
        Mode::Line => line_mode::run_line(&config),
        #[allow(unreachable_patterns)]
        other => bail!("{:?} mode is not compiled in", other),
    }
}
