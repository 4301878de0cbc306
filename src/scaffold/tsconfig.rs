//! `tsconfig.json` of the generated project.
//!
//! The project's own tsconfig (JSON with comments) is merged with the
//! bundled Next.js defaults, then with `compilerOptions.paths` derived from
//! the configured aliases:
//!
//! ```text
//! project tsconfig ← template ← { compilerOptions: { paths } }
//! ```

use crate::embed::next::TSCONFIG_JSON;
use crate::transform::static_value::parse_jsonc;
use crate::utils::json::deep_merge;
use crate::utils::path::relative_path;
use anyhow::{Context, Result};
use serde_json::{Map, Value, json};
use std::fs;
use std::path::{Path, PathBuf};

/// Alias entries as tsconfig `paths`, relative to the tsconfig's `baseUrl`.
///
/// `baseUrl` defaults to `.`, the directory of the tsconfig itself.
///
/// ```text
/// @/components → <app>/src/components   ⇒   "@/components/*": ["src/components/*"]
/// ```
pub fn resolve_alias_to_tsconfig_paths(
    alias: &[(String, PathBuf)],
    tsconfig_path: &Path,
    tsconfig: &Value,
) -> Map<String, Value> {
    let base_url = tsconfig
        .pointer("/compilerOptions/baseUrl")
        .and_then(Value::as_str)
        .unwrap_or(".");
    let base_dir = tsconfig_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(base_url);

    alias
        .iter()
        .map(|(name, target)| {
            let rel = relative_path(&base_dir, target);
            let rel = match rel.to_string_lossy().replace('\\', "/") {
                s if s.is_empty() => ".".to_string(),
                s => s,
            };
            (format!("{name}/*"), json!([format!("{rel}/*")]))
        })
        .collect()
}

/// Render `tsconfig.json` for the output root.
///
/// Without a project tsconfig, the template is used as-is.
pub fn render_tsconfig(app: &Path, alias: &[(String, PathBuf)]) -> Result<String> {
    let project_path = app.join("tsconfig.json");
    if !project_path.is_file() {
        return Ok(TSCONFIG_JSON.to_string());
    }

    let source = fs::read_to_string(&project_path)
        .with_context(|| format!("failed to read {}", project_path.display()))?;
    let mut merged = parse_jsonc(&project_path, &source)?;
    let template: Value =
        serde_json::from_str(TSCONFIG_JSON).context("bundled tsconfig.json is invalid")?;

    let paths = resolve_alias_to_tsconfig_paths(alias, &project_path, &merged);
    deep_merge(&mut merged, template);
    deep_merge(&mut merged, json!({ "compilerOptions": { "paths": paths } }));

    serde_json::to_string_pretty(&merged).context("failed to serialize tsconfig.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_alias_paths_relative_to_base_url() {
        let alias = vec![
            ("@/components".to_string(), PathBuf::from("/app/src/components")),
            ("@".to_string(), PathBuf::from("/app/src")),
        ];

        let paths = resolve_alias_to_tsconfig_paths(
            &alias,
            Path::new("/app/tsconfig.json"),
            &json!({}),
        );
        assert_eq!(
            Value::Object(paths),
            json!({"@/components/*": ["src/components/*"], "@/*": ["src/*"]})
        );

        let paths = resolve_alias_to_tsconfig_paths(
            &alias,
            Path::new("/app/tsconfig.json"),
            &json!({"compilerOptions": {"baseUrl": "./src"}}),
        );
        assert_eq!(
            Value::Object(paths),
            json!({"@/components/*": ["components/*"], "@/*": ["./*"]})
        );
    }

    #[test]
    fn test_template_without_project_tsconfig() {
        let dir = TempDir::new().unwrap();
        assert_eq!(render_tsconfig(dir.path(), &[]).unwrap(), TSCONFIG_JSON);
    }

    #[test]
    fn test_merge_project_tsconfig() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("tsconfig.json"),
            r#"{
  // Taro defaults
  "compilerOptions": {
    "strict": true,
    "jsx": "react-jsx",
    "paths": { "~/*": ["lib/*"] },
  },
  "include": ["src", "types"],
}"#,
        )
        .unwrap();

        let alias = vec![("@/utils".to_string(), dir.path().join("src/utils"))];
        let out = render_tsconfig(dir.path(), &alias).unwrap();
        let merged: Value = serde_json::from_str(&out).unwrap();

        assert_eq!(merged["compilerOptions"]["strict"], json!(false));
        assert_eq!(merged["compilerOptions"]["jsx"], json!("preserve"));
        assert_eq!(merged["compilerOptions"]["paths"]["~/*"], json!(["lib/*"]));
        assert_eq!(
            merged["compilerOptions"]["paths"]["@/utils/*"],
            json!(["src/utils/*"])
        );
        assert_eq!(
            merged["include"],
            json!(["next-env.d.ts", "**/*.ts", "**/*.tsx"])
        );
        assert!(out.starts_with("{\n  \"compilerOptions\""));
    }
}
