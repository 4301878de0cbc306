//! taro-next - build Taro mini-program projects as Next.js applications.

mod cli;
mod config;
mod core;
mod embed;
mod logger;
mod route;
mod scaffold;
mod transform;
mod utils;
mod watch;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ProjectConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = ProjectConfig::load(cli)?;

    match &cli.command {
        Commands::Build { .. } => cli::build::build_project(&config),
        Commands::Start { port } => cli::start::start_project(&config, *port),
    }
}
