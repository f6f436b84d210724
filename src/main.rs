//! replaykit - render, stream and index terminal session recordings.

mod commands;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use replaykit::Config;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "REPLAYKIT_LOG";

#[derive(Parser)]
#[command(name = "replaykit")]
#[command(about = "Render, stream and index terminal session recordings")]
#[command(version)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Strip metadata and neutralize clears in one pass
    Render {
        /// Session file written by script(1)
        session: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Same output as render, produced chunk by chunk
    ///
    /// Output is written as soon as later input can no longer change it.
    /// After a screen clear outside a full-screen program, everything up to
    /// the next alternate-screen switch (or the end of the session) is held
    /// back, because such a switch would discard it.
    Stream {
        /// Session file written by script(1)
        session: PathBuf,

        /// Bytes read per chunk
        #[arg(long, default_value_t = 4096, value_parser = clap::value_parser!(u64).range(1..))]
        chunk_size: u64,
    },

    /// List the commands typed during the session with their line numbers
    Toc {
        /// Session file; .timing and .input companions are looked up next to it
        session: PathBuf,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Render { session, output } => {
            commands::render::handle(&session, output.as_deref(), &config)
        }
        Commands::Stream {
            session,
            chunk_size,
        } => commands::stream::handle(&session, chunk_size as usize, &config),
        Commands::Toc { session, json } => commands::toc::handle(&session, json, &config),
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config::handle_show(&config),
        },
    }
}

/// Logs go to stderr so stdout carries only content.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}
