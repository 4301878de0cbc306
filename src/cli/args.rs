//! Command-line interface definitions.

use crate::core::BuildMode;
use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Build and serve Taro projects with Next.js
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: taro-next.toml)
    #[arg(short = 'C', long, global = true, default_value = "taro-next.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate the Next.js app and run `next dev` or `next build`
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Serve a production build with `next start`
    #[command(visible_alias = "s")]
    Start {
        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Build command arguments
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Keep running and mirror source changes into the output
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub watch: Option<bool>,

    /// Build mode (defaults to development when watching)
    #[arg(short, long, value_enum)]
    pub mode: Option<BuildMode>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl Cli {
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. })
    }
}
