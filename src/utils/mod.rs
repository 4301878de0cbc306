//! Utility modules shared by the build and watch pipelines.

pub mod browser;
pub mod exec;
pub mod json;
pub mod path;
