//! Taro page list to Next.js `pages/` routes.
//!
//! # Flow
//!
//! ```text
//! AppConfig ──► collect_pages ──► [PageDescriptor]
//!                                       │
//! RouterConfig ──► CustomRouteMap ──────┤
//!                                       ▼
//!                           create_nextjs_pages ──► pages/<route>/index.js
//!                                       │           pages/<route>/[id].tsx
//!                                       ▼           customRoutes.json
//!                               SynthesisReport
//!                                       │
//!                                       ▼
//!                    resolve_dynamic_pages_to_rewrites ──► next.config.js
//! ```

mod rewrites;
mod synth;

pub use rewrites::{Rewrite, RewriteCondition, resolve_dynamic_pages_to_rewrites};
pub use synth::{
    SynthContext, SynthesisReport, SynthesizedPage, create_nextjs_pages, find_dynamic_route_file,
    is_dynamic_segment,
};

use crate::config::{AppConfig, RouterConfig};
use crate::log;
use crate::transform::TransformError;
use crate::utils::path::{ensure_leading_slash, join_route, resolve_script_path, strip_leading_slash};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Route synthesis errors.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("page `{route}` not found, expected a script at `{}`", path.display())]
    PageNotFound { route: String, path: PathBuf },

    #[error("IO error at `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to serialize `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("page directory `{}` is outside the source root", .0.display())]
    OutsideSource(PathBuf),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// One Taro page declared in the app config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDescriptor {
    /// Leading-slash route, e.g. `/pages/index/index`.
    pub route: String,
    pub from_subpackage: bool,
    /// Resolved page module (may not exist).
    pub source_file: PathBuf,
}

/// Collect main pages then subpackage pages, in declaration order.
///
/// A subpackage whose `pages` is missing or not a list of strings is skipped
/// with a warning.
pub fn collect_pages(app: &AppConfig, source_dir: &Path) -> Vec<PageDescriptor> {
    let describe = |route: String, from_subpackage: bool| PageDescriptor {
        source_file: resolve_script_path(&source_dir.join(strip_leading_slash(&route))),
        route,
        from_subpackage,
    };

    let mut pages: Vec<_> = app
        .pages
        .iter()
        .map(|page| describe(ensure_leading_slash(page), false))
        .collect();

    for package in &app.sub_packages {
        let Some(list) = package.page_list() else {
            log!(
                "warning";
                "subpackage `{}` has no valid `pages` list, skipping",
                package.root
            );
            continue;
        };
        pages.extend(
            list.into_iter()
                .map(|page| describe(join_route(&package.root, page), true)),
        );
    }

    pages
}

/// Page route to public route overrides, keys normalized with a leading slash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomRouteMap {
    entries: Vec<(String, String)>,
}

impl CustomRouteMap {
    pub fn from_config(router: &RouterConfig) -> Self {
        let mut map = Self::default();
        for (page, target) in router.custom_route_entries() {
            map.insert(ensure_leading_slash(page), target.to_string());
        }
        map
    }

    /// Insert or overwrite, keeping the first position of a key.
    pub fn insert(&mut self, route: String, target: String) {
        match self.entries.iter_mut().find(|(r, _)| *r == route) {
            Some(entry) => entry.1 = target,
            None => self.entries.push((route, target)),
        }
    }

    pub fn get(&self, route: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(r, _)| r == route)
            .map(|(_, t)| t.as_str())
    }

    /// Public route of a page: its override, or the page route itself.
    pub fn target_route(&self, route: &str) -> String {
        self.get(route)
            .map_or_else(|| route.to_string(), ensure_leading_slash)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(r, t)| (r.as_str(), t.as_str()))
    }
}

impl Serialize for CustomRouteMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (route, target) in &self.entries {
            map.serialize_entry(route, target)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SubPackage;
    use serde_json::json;

    fn app(pages: &[&str], subs: serde_json::Value) -> AppConfig {
        AppConfig {
            pages: pages.iter().map(|p| p.to_string()).collect(),
            sub_packages: serde_json::from_value::<Vec<SubPackage>>(subs).unwrap(),
        }
    }

    #[test]
    fn test_collect_pages_order() {
        let app = app(
            &["pages/index/index", "/pages/about/index"],
            json!([{"root": "pkg", "pages": ["detail/index"]}]),
        );
        let pages = collect_pages(&app, Path::new("/p/src"));
        let routes: Vec<_> = pages.iter().map(|p| p.route.as_str()).collect();
        assert_eq!(
            routes,
            ["/pages/index/index", "/pages/about/index", "/pkg/detail/index"]
        );
        assert!(!pages[0].from_subpackage);
        assert!(pages[2].from_subpackage);
        assert_eq!(pages[0].source_file, PathBuf::from("/p/src/pages/index/index"));
    }

    #[test]
    fn test_collect_pages_skips_malformed_subpackage() {
        let app = app(
            &[],
            json!([
                {"root": "broken", "pages": "detail/index"},
                {"root": "missing"},
                {"root": "ok", "pages": ["a/index"]}
            ]),
        );
        let pages = collect_pages(&app, Path::new("/p/src"));
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].route, "/ok/a/index");
    }

    #[test]
    fn test_custom_route_map() {
        let mut router = RouterConfig::default();
        router
            .custom_routes
            .insert("pages/b/index".into(), json!("/b"));
        router
            .custom_routes
            .insert("/pages/a/index".into(), json!("a"));

        let map = CustomRouteMap::from_config(&router);
        assert_eq!(map.get("/pages/b/index"), Some("/b"));
        assert_eq!(map.target_route("/pages/a/index"), "/a");
        assert_eq!(map.target_route("/pages/c/index"), "/pages/c/index");
        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"/pages/b/index":"/b","/pages/a/index":"a"}"#
        );
    }

    #[test]
    fn test_route_json_error_names_file() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = RouteError::Json(PathBuf::from("dist/customRoutes.json"), source);
        assert_eq!(err.to_string(), "failed to serialize `dist/customRoutes.json`");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_custom_route_map_duplicate_key_keeps_position() {
        let mut map = CustomRouteMap::default();
        map.insert("/a".into(), "/x".into());
        map.insert("/b".into(), "/y".into());
        map.insert("/a".into(), "/z".into());
        let entries: Vec<_> = map.iter().collect();
        assert_eq!(entries, [("/a", "/z"), ("/b", "/y")]);
    }
}
