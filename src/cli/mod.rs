//! Command-line interface module.

mod args;
pub mod build;
pub mod start;

pub use args::{BuildArgs, Cli, Commands};
