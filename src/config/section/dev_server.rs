//! `[devServer]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [devServer]
//! port = 3000    # `next dev -p 3000`, also used for the browser URL
//! ```

use serde::{Deserialize, Serialize};

/// Port used by `next dev` and `next start` when none is configured.
pub const DEFAULT_PORT: u16 = 10086;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DevServerConfig {
    pub port: Option<u16>,
}

impl DevServerConfig {
    #[inline]
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_dev_server_port() {
        let config = test_parse_config("[devServer]\nport = 3000");
        assert_eq!(config.dev_server.port(), 3000);
    }

    #[test]
    fn test_dev_server_default_port() {
        let config = test_parse_config("");
        assert_eq!(config.dev_server.port, None);
        assert_eq!(config.dev_server.port(), DEFAULT_PORT);
    }
}
