//! Absolute project layout derived from `ProjectConfig`.
//!
//! ```text
//! <app>/                       root of the Taro project
//! ├── <sourceRoot>/            source
//! │   ├── app.config.ts        app_config_file
//! │   └── app.tsx              app_file
//! └── <outputRoot>/            output (the Next.js project)
//!     ├── pages/_app.tsx       next_app_file
//!     └── <sourceRoot>/        output_source
//!         └── app.tsx          output_app_file
//! ```

use super::ProjectConfig;
use crate::utils::path::resolve_script_path;
use std::path::{Path, PathBuf};

/// Base name of the Taro entry module.
pub const ENTRY: &str = "app";

#[derive(Debug, Clone)]
pub struct ProjectPaths {
    pub app: PathBuf,
    pub source: PathBuf,
    pub output: PathBuf,
    pub output_source: PathBuf,
    pub app_config_file: PathBuf,
    pub app_file: PathBuf,
    pub output_app_file: PathBuf,
    pub next_app_file: PathBuf,
}

impl ProjectPaths {
    pub fn new(config: &ProjectConfig) -> Self {
        let app = config.get_root().to_path_buf();
        let source = app.join(&config.source_root);
        let output = app.join(&config.output_root);
        let output_source = output.join(&config.source_root);

        let app_file = resolve_script_path(&source.join(ENTRY));
        let output_app_file = match app_file.extension() {
            Some(ext) => output_source.join(ENTRY).with_extension(ext),
            None => output_source.join(ENTRY),
        };

        Self {
            app_config_file: app_config_file(&source),
            next_app_file: output.join("pages").join("_app.tsx"),
            app,
            source,
            output,
            output_source,
            app_file,
            output_app_file,
        }
    }
}

fn app_config_file(source: &Path) -> PathBuf {
    let json = source.join(format!("{ENTRY}.config.json"));
    if json.is_file() {
        return json;
    }
    resolve_script_path(&source.join(format!("{ENTRY}.config")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config_at;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_project_paths() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("app.h5.tsx"), "").unwrap();
        fs::write(src.join("app.tsx"), "").unwrap();
        fs::write(src.join("app.config.ts"), "").unwrap();

        let config = test_config_at(dir.path(), "");
        let paths = config.paths();

        assert_eq!(paths.app_file, src.join("app.h5.tsx"));
        assert_eq!(paths.output_app_file, dir.path().join("dist/src/app.tsx"));
        assert_eq!(paths.app_config_file, src.join("app.config.ts"));
        assert_eq!(paths.next_app_file, dir.path().join("dist/pages/_app.tsx"));
    }

    #[test]
    fn test_app_config_json_preferred() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app.config.json"), "{}").unwrap();
        fs::write(dir.path().join("app.config.js"), "").unwrap();
        assert_eq!(
            app_config_file(dir.path()),
            dir.path().join("app.config.json")
        );
    }
}
