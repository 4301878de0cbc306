//! Next.js project scaffolding.
//!
//! # Output Layout
//!
//! ```text
//! <outputRoot>/
//! ├── *.d.ts                 copied from the app root
//! ├── <sourceRoot>/          mirrored sources (see `mirror`)
//! ├── pages/
//! │   ├── _app.tsx           root layout (see `layout`)
//! │   ├── _document.tsx
//! │   └── ...                wrapper pages (see `route`)
//! ├── customRoutes.json
//! ├── next.config.js
//! ├── postcss.config.js
//! └── tsconfig.json
//! ```

mod layout;
pub mod mirror;
mod postcss;
mod tsconfig;

pub use layout::relocate_global_styles;
pub use mirror::{MirrorContext, mirror_file, output_path_for, remove_output};
pub use postcss::{autoprefixer_option, postcss_plugins};
pub use tsconfig::render_tsconfig;

use crate::config::{ProjectConfig, ProjectPaths};
use crate::core::is_shutdown;
use crate::embed::next::{
    APP_TSX, AppVars, DOCUMENT_TSX, NEXT_CONFIG_JS, NextConfigVars, POSTCSS_CONFIG_JS,
    PostcssVars,
};
use crate::log;
use crate::route::{SynthesisReport, resolve_dynamic_pages_to_rewrites};
use crate::utils::path::{relative_path, to_module_request};
use anyhow::{Context, Result, anyhow};
use jwalk::WalkDir;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Write everything besides the wrapper pages into the output root.
pub fn scaffold(
    config: &ProjectConfig,
    paths: &ProjectPaths,
    report: &SynthesisReport,
) -> Result<()> {
    fs::create_dir_all(&paths.output)
        .with_context(|| format!("failed to create directory {}", paths.output.display()))?;

    copy_declarations(&paths.app, &paths.output)?;
    let mirrored = mirror_sources(paths)?;
    write_template_pages(paths, report)?;
    write_next_config(config, paths, report)?;
    write_postcss_config(config, paths)?;
    write_tsconfig(config, paths)?;

    log!(
        "scaffold";
        "{} source files mirrored into {}",
        mirrored,
        config.root_relative(&paths.output_source).display()
    );
    Ok(())
}

/// Copy `<app>/*.d.ts` into the output root.
fn copy_declarations(app: &Path, output: &Path) -> Result<()> {
    let entries =
        fs::read_dir(app).with_context(|| format!("failed to read directory {}", app.display()))?;

    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        let is_declaration = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(".d.ts"));
        if !is_declaration || !path.is_file() {
            continue;
        }
        let dest = output.join(entry.file_name());
        fs::copy(&path, &dest)
            .with_context(|| format!("failed to copy {} to {}", path.display(), dest.display()))?;
    }
    Ok(())
}

/// Mirror every file under the source root, in parallel.
fn mirror_sources(paths: &ProjectPaths) -> Result<usize> {
    if !paths.source.is_dir() {
        return Err(anyhow!(
            "source directory {} does not exist",
            paths.source.display()
        ));
    }

    let files: Vec<PathBuf> = WalkDir::new(&paths.source)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .collect();

    let ctx = MirrorContext::new(paths);
    let has_error = AtomicBool::new(false);
    let written = AtomicUsize::new(0);

    files.par_iter().try_for_each(|path| {
        if is_shutdown() || has_error.load(Ordering::Relaxed) {
            return Err(anyhow!("Aborted"));
        }
        match mirror_file(&ctx, path) {
            Ok(Some(_)) => {
                written.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                if !has_error.swap(true, Ordering::Relaxed) {
                    log!("error"; "{}: {:#}", path.display(), e);
                }
                Err(anyhow!("Mirroring sources failed"))
            }
        }
    })?;

    Ok(written.into_inner())
}

/// `pages/_app.tsx` and `pages/_document.tsx`, unless a wrapper page took the path.
fn write_template_pages(paths: &ProjectPaths, report: &SynthesisReport) -> Result<()> {
    let pages_dir = paths.output.join("pages");
    fs::create_dir_all(&pages_dir)
        .with_context(|| format!("failed to create directory {}", pages_dir.display()))?;

    let app_request = to_module_request(&relative_path(
        &pages_dir,
        &paths.output_source.join(crate::config::ENTRY),
    ));
    let templates = [
        (
            paths.next_app_file.clone(),
            APP_TSX.render(&AppVars {
                app_request: &app_request,
            }),
        ),
        (pages_dir.join("_document.tsx"), DOCUMENT_TSX.to_string()),
    ];

    for (path, contents) in templates {
        if report.owns(&path) {
            log!("warning"; "{} is a synthesized page, template skipped", path.display());
            continue;
        }
        fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

fn write_next_config(
    config: &ProjectConfig,
    paths: &ProjectPaths,
    report: &SynthesisReport,
) -> Result<()> {
    let rewrites = resolve_dynamic_pages_to_rewrites(&report.dynamic_segments);
    let contents = NEXT_CONFIG_JS.render(&NextConfigVars {
        env: &config.env,
        define_constants: &config.define_constants,
        additional_data: config.sass.data.as_deref(),
        rewrites: &rewrites,
    });

    let path = paths.output.join("next.config.js");
    fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))
}

fn write_postcss_config(config: &ProjectConfig, paths: &ProjectPaths) -> Result<()> {
    let plugins = postcss_plugins(&config.postcss, config.design_width, &paths.app, &paths.output);
    let contents = POSTCSS_CONFIG_JS.render(&PostcssVars { plugins: &plugins });

    let path = paths.output.join("postcss.config.js");
    fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))
}

fn write_tsconfig(config: &ProjectConfig, paths: &ProjectPaths) -> Result<()> {
    let contents = render_tsconfig(&paths.app, &config.alias_targets())?;

    let path = paths.output.join("tsconfig.json");
    fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, test_config_at};
    use crate::route::{
        CustomRouteMap, SynthContext, SynthesizedPage, collect_pages, create_nextjs_pages,
    };
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "global.d.ts", "declare const APP: string");
        write(root, "README.md", "");
        write(
            root,
            "src/app.tsx",
            "import '@tarojs/taro'\nimport './app.scss'\nexport default (p) => p.children\n",
        );
        write(root, "src/app.scss", "");
        write(
            root,
            "src/pages/index/index.tsx",
            "import {View} from \"@tarojs/components\"\n",
        );
        write(
            root,
            "src/pages/index/index.h5.tsx",
            "import {View} from '@tarojs/components'\nexport default () => <View />\n",
        );
        write(root, "src/pages/detail/index.tsx", "export default () => null\n");
        write(root, "src/pages/detail/[id].tsx", "export default () => null\n");
        dir
    }

    #[test]
    fn test_scaffold_project() {
        let dir = project();
        let config = test_config_at(
            dir.path(),
            r#"
designWidth = 375

[env]
API = '"https://example.com"'

[sass]
data = "$primary: red;"
"#,
        );
        let paths = config.paths();

        let app = AppConfig {
            pages: vec!["pages/index/index".into(), "pages/detail/index".into()],
            sub_packages: vec![],
        };
        let pages = collect_pages(&app, &paths.source);
        fs::create_dir_all(&paths.output).unwrap();
        let report = create_nextjs_pages(&SynthContext {
            pages: &pages,
            custom_routes: &CustomRouteMap::default(),
            source: &paths.source,
            output: &paths.output,
            output_source: &paths.output_source,
        })
        .unwrap();

        scaffold(&config, &paths, &report).unwrap();
        let out = &paths.output;

        assert!(out.join("global.d.ts").is_file());
        assert!(!out.join("README.md").exists());
        assert_eq!(
            fs::read_to_string(out.join("src/pages/index/index.tsx")).unwrap(),
            "import {View} from '@taror/components'\nexport default () => <View />\n"
        );
        assert!(!out.join("src/pages/index/index.h5.tsx").exists());
        assert_eq!(
            fs::read_to_string(out.join("src/app.tsx")).unwrap(),
            "import 'tarojs-plugin-platform-nextjs/taro'\nexport default (p) => p.children\n"
        );

        assert!(out.join("pages/_document.tsx").is_file());
        let layout = fs::read_to_string(out.join("pages/_app.tsx")).unwrap();
        assert!(layout.contains("from '../src/app'"));

        let next_config = fs::read_to_string(out.join("next.config.js")).unwrap();
        assert!(next_config.contains("\"destination\": \"/pages/detail/index/:id\""));
        assert!(next_config.contains("additionalData: \"$primary: red;\""));

        let postcss = fs::read_to_string(out.join("postcss.config.js")).unwrap();
        assert!(postcss.contains("\"designWidth\": 375"));

        assert!(out.join("tsconfig.json").is_file());
    }

    #[test]
    fn test_template_pages_skip_synthesized() {
        let dir = TempDir::new().unwrap();
        let config = test_config_at(dir.path(), "");
        let paths = config.paths();
        fs::create_dir_all(&paths.output).unwrap();

        let report = SynthesisReport {
            pages: vec![SynthesizedPage {
                route: "/_document".into(),
                target_route: "/_document".into(),
                output_file: paths.output.join("pages/_document.tsx"),
                module_request: String::new(),
                exports: vec![],
                dynamic_segment: None,
            }],
            dynamic_segments: vec![],
        };
        write_template_pages(&paths, &report).unwrap();

        assert!(paths.next_app_file.is_file());
        assert!(!paths.output.join("pages/_document.tsx").exists());
    }

    #[test]
    fn test_missing_source_dir() {
        let dir = TempDir::new().unwrap();
        let config = test_config_at(dir.path(), "");
        assert!(mirror_sources(&config.paths()).is_err());
    }
}
