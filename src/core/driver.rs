//! Build mode for `next dev` / `next build` selection.

use serde::{Deserialize, Serialize};

/// Which Next.js command drives the output project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// `next dev -p <port>`
    Development,
    /// `next build`
    Production,
}

impl BuildMode {
    /// Mode used when neither the config nor the CLI names one.
    pub const fn default_for(watch: bool) -> Self {
        if watch {
            Self::Development
        } else {
            Self::Production
        }
    }

    #[inline]
    pub const fn is_dev(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// `NODE_ENV=test` suppresses every subprocess spawn.
pub fn is_test_env() -> bool {
    std::env::var("NODE_ENV").is_ok_and(|v| v == "test")
}
