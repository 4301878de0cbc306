//! Taro app config (`src/app.config.{json,ts,js}`).
//!
//! JSON files are read directly; script files are evaluated statically, so
//! only literal config objects are supported.

use super::ConfigError;
use crate::transform::static_value::evaluate_module_default;
use serde::Deserialize;
use serde_json::Value;
use std::{fs, path::Path};

/// The part of the app config that drives routing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub pages: Vec<String>,

    #[serde(default, alias = "subpackages")]
    pub sub_packages: Vec<SubPackage>,
}

/// A subpackage entry. `pages` stays untyped so one malformed entry can be
/// reported and skipped without rejecting the whole file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubPackage {
    #[serde(default)]
    pub root: String,

    #[serde(default)]
    pub pages: Option<Value>,
}

impl SubPackage {
    /// Page paths when `pages` is a list of strings.
    pub fn page_list(&self) -> Option<Vec<&str>> {
        self.pages
            .as_ref()?
            .as_array()?
            .iter()
            .map(Value::as_str)
            .collect()
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let value = if path.extension().is_some_and(|e| e == "json") {
            serde_json::from_str(&source)
                .map_err(|err| ConfigError::AppConfig(path.to_path_buf(), err))?
        } else {
            evaluate_module_default(path, &source)?
        };

        Self::from_value(path, value)
    }

    fn from_value(path: &Path, value: Value) -> Result<Self, ConfigError> {
        serde_json::from_value(value).map_err(|err| ConfigError::AppConfig(path.to_path_buf(), err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.config.json");
        fs::write(
            &path,
            r#"{"pages": ["pages/index/index"], "subpackages": [{"root": "pkg", "pages": ["a/index"]}], "window": {}}"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.pages, ["pages/index/index"]);
        assert_eq!(config.sub_packages[0].root, "pkg");
        assert_eq!(config.sub_packages[0].page_list(), Some(vec!["a/index"]));
    }

    #[test]
    fn test_load_ts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.config.ts");
        fs::write(
            &path,
            "export default defineAppConfig({\n  pages: ['pages/index/index'],\n  subPackages: [{ root: 'pkg' }],\n})\n",
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.pages, ["pages/index/index"]);
        assert_eq!(config.sub_packages[0].page_list(), None);
    }

    #[test]
    fn test_page_list_rejects_mixed() {
        let pkg = SubPackage {
            root: "pkg".into(),
            pages: Some(serde_json::json!(["a/index", 1])),
        };
        assert_eq!(pkg.page_list(), None);
    }

    #[test]
    fn test_load_missing() {
        let err = AppConfig::load(Path::new("/nonexistent/app.config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }
}
