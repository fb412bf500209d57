use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pomodoro_core::Mode;
use tracing_subscriber::EnvFilter;

mod commands;
mod common;

use common::Context;

#[derive(Parser)]
#[command(name = "pomodoro", version, about = "Pomodoro timer CLI")]
struct Cli {
    /// Directory holding config.toml and the state record
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current state as JSON
    Status,
    /// Start (or resume) the current interval
    Start,
    /// Pause the current interval
    Pause,
    /// Finish the current interval now
    Skip,
    /// Advance the running timer
    Tick {
        /// Seconds to advance
        #[arg(long, default_value_t = 1)]
        seconds: u64,
    },
    /// Restart in the given mode (pomodoro, short, long)
    Mode {
        #[arg(value_parser = parse_mode)]
        mode: Mode,
    },
    /// Drive the timer in the foreground, one tick per second
    Run {
        /// Exit once the current interval finishes
        #[arg(long)]
        once: bool,
    },
    /// Timer settings
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Reset tasks, settings and counters to defaults
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    s.parse::<Mode>().map_err(|e| e.to_string())
}

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let ctx = match Context::open(cli.data_dir) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    init_logging(&ctx.config.log.filter);

    let result = match cli.command {
        Commands::Status => commands::timer::status(&ctx),
        Commands::Start => commands::timer::run(&ctx, commands::timer::TimerAction::Start),
        Commands::Pause => commands::timer::run(&ctx, commands::timer::TimerAction::Pause),
        Commands::Skip => commands::timer::run(&ctx, commands::timer::TimerAction::Skip),
        Commands::Tick { seconds } => {
            commands::timer::run(&ctx, commands::timer::TimerAction::Tick { seconds })
        }
        Commands::Mode { mode } => {
            commands::timer::run(&ctx, commands::timer::TimerAction::Mode { mode })
        }
        Commands::Run { once } => commands::timer::foreground(&ctx, once),
        Commands::Settings { action } => commands::settings::run(&ctx, action),
        Commands::Task { action } => commands::task::run(&ctx, action),
        Commands::Reset { yes } => commands::timer::reset(&ctx, yes),
        Commands::Config { action } => commands::config::run(&ctx, action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
