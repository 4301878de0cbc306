//! `[sass]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [sass]
//! data = '@import "@/styles/variables.scss";'
//! ```

use serde::{Deserialize, Serialize};

/// Sass options forwarded to `next.config.js`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SassConfig {
    /// Prepended to every Sass file (`sassOptions.additionalData`).
    pub data: Option<String>,
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_sass_data() {
        let config = test_parse_config("[sass]\ndata = '$primary: #6190e8;'");
        assert_eq!(config.sass.data.as_deref(), Some("$primary: #6190e8;"));
    }
}
