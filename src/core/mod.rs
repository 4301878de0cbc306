//! Core types shared across the codebase.

mod driver;
mod state;

pub use driver::{BuildMode, is_test_env};
pub use state::{is_shutdown, set_watching, setup_shutdown_handler};
