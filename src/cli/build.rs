//! `build` command orchestration.
//!
//! Phases:
//! - **Routes** - Read the app config, emit one wrapper per Taro page
//! - **Scaffold** - Mirror sources, render Next.js config files
//! - **Layout** - Move global styles from the app entry into `_app.tsx`
//! - **Next** - `next dev` or `next build` in the output root
//! - **Watch** - Open the browser and mirror changes until Ctrl+C

use crate::{
    config::{AppConfig, ProjectConfig, ProjectPaths},
    core::{BuildMode, is_test_env, set_watching},
    log,
    route::{CustomRouteMap, SynthContext, SynthesisReport, collect_pages, create_nextjs_pages},
    scaffold::{relocate_global_styles, scaffold},
    utils::{
        browser::open_url,
        exec::{Cmd, find_node_bin},
    },
    watch::watch,
};
use anyhow::{Context, Result};
use std::fs;

/// Generate the Next.js project, then hand over to `next`.
pub fn build_project(config: &ProjectConfig) -> Result<()> {
    let paths = config.paths();
    let report = generate(config, &paths)?;

    if is_test_env() {
        crate::debug!("build"; "NODE_ENV=test, not starting next");
        return Ok(());
    }

    let mode = config.build_mode();
    let port = config.dev_server.port();
    let next = next_command(&paths, mode, port)?;

    if !config.is_watch {
        return next.status();
    }

    let child = next.spawn()?;
    if let Some(route) = report.index_route() {
        let url = format!("http://127.0.0.1:{port}{route}");
        if let Err(e) = open_url(&url) {
            log!("warning"; "failed to open {}: {:#}", url, e);
        }
    }

    set_watching();
    watch(config, Some(child))
}

/// Route synthesis, scaffold and layout relocation, without starting `next`.
pub fn generate(config: &ProjectConfig, paths: &ProjectPaths) -> Result<SynthesisReport> {
    let app = AppConfig::load(&paths.app_config_file).with_context(|| {
        format!(
            "failed to load app config {}",
            config.root_relative(&paths.app_config_file).display()
        )
    })?;

    let pages = collect_pages(&app, &paths.source);
    if pages.is_empty() {
        log!("warning"; "app config declares no pages");
    }

    fs::create_dir_all(&paths.output)
        .with_context(|| format!("failed to create directory {}", paths.output.display()))?;

    let custom_routes = CustomRouteMap::from_config(&config.router);
    let report = create_nextjs_pages(&SynthContext {
        pages: &pages,
        custom_routes: &custom_routes,
        source: &paths.source,
        output: &paths.output,
        output_source: &paths.output_source,
    })?;
    log!(
        "route";
        "{} pages, {} dynamic",
        report.pages.len(),
        report.dynamic_segments.len()
    );

    scaffold(config, paths, &report)?;

    if report.owns(&paths.next_app_file) {
        log!("warning"; "pages/_app.tsx is a synthesized page, global styles left in place");
    } else {
        let imports = relocate_global_styles(paths)?;
        crate::debug!("layout"; "{} global style import(s) relocated", imports.len());
    }

    Ok(report)
}

fn next_command(paths: &ProjectPaths, mode: BuildMode, port: u16) -> Result<Cmd> {
    let next = find_node_bin("next", &paths.app)?;
    let cmd = match mode {
        BuildMode::Development => Cmd::new(next).args(["dev", "-p", &port.to_string()]),
        BuildMode::Production => Cmd::new(next).arg("build"),
    };
    Ok(cmd.cwd(&paths.output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config_at;
    use serde_json::Value;
    use tempfile::TempDir;

    fn write(root: &std::path::Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_generate_project() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(
            root,
            "src/app.config.ts",
            "export default defineAppConfig({\n  pages: ['pages/index/index'],\n  subPackages: [{root: 'pkg', pages: ['detail/index']}],\n})\n",
        );
        write(
            root,
            "src/app.tsx",
            "import './app.css'\nexport default (p) => p.children\n",
        );
        write(root, "src/app.css", "body { margin: 0 }");
        write(root, "src/pages/index/index.tsx", "export default () => null\n");
        write(root, "src/pkg/detail/index.tsx", "export default () => null\n");
        write(root, "src/pkg/detail/[id].tsx", "export default () => null\n");

        let config = test_config_at(
            root,
            r#"
[router.customRoutes]
"pages/index/index" = "/"
"#,
        );
        let paths = config.paths();
        let report = generate(&config, &paths).unwrap();

        assert_eq!(report.index_route(), Some("/"));
        assert_eq!(report.dynamic_segments, ["/pkg/detail/index/[id]"]);
        assert!(paths.output.join("pages/index.js").is_file());
        assert!(paths.output.join("pages/pkg/detail/index/[id].tsx").is_file());

        let routes: Value =
            serde_json::from_str(&fs::read_to_string(paths.output.join("customRoutes.json")).unwrap())
                .unwrap();
        assert_eq!(routes["/pages/index/index"], "/");

        let layout = fs::read_to_string(&paths.next_app_file).unwrap();
        assert!(layout.starts_with("import '../src/app.css'\n"));
        assert_eq!(
            fs::read_to_string(paths.output_source.join("app.tsx")).unwrap(),
            "export default (p) => p.children\n"
        );
    }

    #[test]
    fn test_generate_missing_page_fails() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/app.config.json", r#"{"pages": ["pages/gone/index"]}"#);
        let config = test_config_at(dir.path(), "");
        let err = generate(&config, &config.paths()).unwrap_err();
        assert!(format!("{err:#}").contains("pages/gone/index"));
    }

    #[test]
    fn test_missing_app_config() {
        let dir = TempDir::new().unwrap();
        let config = test_config_at(dir.path(), "");
        let err = generate(&config, &config.paths()).unwrap_err();
        assert!(format!("{err}").contains("failed to load app config"));
    }
}
