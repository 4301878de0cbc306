//! `[router]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [router]
//! mode = "browser"          # the only mode Next.js can serve
//!
//! [router.customRoutes]
//! "pages/index/index" = "/home"
//! "/pages/user/index" = "/user"
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouterConfig {
    /// Taro router mode. Must be `browser`.
    pub mode: String,

    /// Page route to public route overrides, in declaration order.
    pub custom_routes: Map<String, Value>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            mode: "browser".into(),
            custom_routes: Map::new(),
        }
    }
}

impl RouterConfig {
    pub const MODE: FieldPath = FieldPath::new("router.mode");
    pub const CUSTOM_ROUTES: FieldPath = FieldPath::new("router.customRoutes");

    #[inline]
    pub fn is_browser(&self) -> bool {
        self.mode == "browser"
    }

    /// Custom routes with string targets, in declaration order.
    pub fn custom_route_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.custom_routes
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|v| (k.as_str(), v)))
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (page, target) in &self.custom_routes {
            if !target.is_string() {
                diag.error_with_hint(
                    Self::CUSTOM_ROUTES,
                    format!("route for `{page}` must be a string, got `{target}`"),
                    format!("\"{page}\" = \"/{}\"", page.trim_start_matches('/')),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_router_defaults() {
        let config = test_parse_config("");
        assert!(config.router.is_browser());
        assert!(config.router.custom_routes.is_empty());
    }

    #[test]
    fn test_custom_routes_keep_order() {
        let config = test_parse_config(
            "[router.customRoutes]\n\"pages/b/index\" = \"/b\"\n\"pages/a/index\" = \"/a\"",
        );
        let entries: Vec<_> = config.router.custom_route_entries().collect();
        assert_eq!(entries, [("pages/b/index", "/b"), ("pages/a/index", "/a")]);
    }

    #[test]
    fn test_custom_routes_non_string_rejected() {
        let config = test_parse_config("[router.customRoutes]\n\"pages/a/index\" = 1");
        let mut diag = ConfigDiagnostics::new();
        config.router.validate(&mut diag);
        assert_eq!(diag.errors().len(), 1);
        assert_eq!(diag.errors()[0].field, RouterConfig::CUSTOM_ROUTES);
    }

    #[test]
    fn test_hash_mode_parsed() {
        let config = test_parse_config("[router]\nmode = \"hash\"");
        assert!(!config.router.is_browser());
    }
}
