//! Wrapper page synthesis.

use super::{CustomRouteMap, PageDescriptor, RouteError};
use crate::embed::page::{WRAPPER_JS, WrapperVars};
use crate::log;
use crate::transform::exports::lifecycle_exports;
use crate::utils::path::{relative_path, split_script_name, strip_leading_slash, to_module_request};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// `[id]`, `[...slug]` or `[[...slug]]`.
static DYNAMIC_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(\[\.\.\.[^\[\]/]+\]|\.\.\.[^\[\]/]+|[^\[\]/.][^\[\]/]*)\]$")
        .expect("static regex is valid")
});

/// Whether a file stem is a Next.js dynamic segment.
pub fn is_dynamic_segment(stem: &str) -> bool {
    DYNAMIC_SEGMENT.is_match(stem)
}

/// A dynamic page module found next to a Taro page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicRouteFile {
    pub path: PathBuf,
    /// Stem without extension or platform suffix, e.g. `[id]`.
    pub base: String,
    /// Script extension without the dot.
    pub ext: String,
}

/// Inputs of [`create_nextjs_pages`].
pub struct SynthContext<'a> {
    pub pages: &'a [PageDescriptor],
    pub custom_routes: &'a CustomRouteMap,
    /// Taro sources (`<sourceRoot>`), the root page files resolve under.
    pub source: &'a Path,
    /// Next.js project root (`<outputRoot>`).
    pub output: &'a Path,
    /// Mirrored sources (`<outputRoot>/<sourceRoot>`).
    pub output_source: &'a Path,
}

/// One emitted wrapper page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedPage {
    pub route: String,
    pub target_route: String,
    pub output_file: PathBuf,
    pub module_request: String,
    pub exports: Vec<String>,
    /// `<target route>/[param]` for dynamic pages.
    pub dynamic_segment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthesisReport {
    pub pages: Vec<SynthesizedPage>,
    pub dynamic_segments: Vec<String>,
}

impl SynthesisReport {
    /// Public route of the first declared page, opened in the browser.
    pub fn index_route(&self) -> Option<&str> {
        self.pages.first().map(|p| p.target_route.as_str())
    }

    pub fn owns(&self, file: &Path) -> bool {
        self.pages.iter().any(|p| p.output_file == file)
    }
}

/// Find the dynamic page module in `dir`.
///
/// Only script files count. The first match in file-name order wins; other
/// dynamic modules are reported and ignored.
pub fn find_dynamic_route_file(dir: &Path) -> Result<Option<DynamicRouteFile>, RouteError> {
    let entries = fs::read_dir(dir).map_err(|err| RouteError::Io(dir.to_path_buf(), err))?;

    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
        .filter_map(|e| e.file_name().into_string().ok())
        .collect();
    names.sort();

    let mut found: Option<DynamicRouteFile> = None;
    for name in &names {
        let Some((stem, _, ext)) = split_script_name(name) else {
            continue;
        };
        if !is_dynamic_segment(stem) {
            continue;
        }
        match &found {
            None => {
                found = Some(DynamicRouteFile {
                    path: dir.join(name),
                    base: stem.to_string(),
                    ext: ext.to_string(),
                });
            }
            Some(first) if first.base != stem => {
                log!(
                    "warning";
                    "multiple dynamic pages in {}, using `{}` and ignoring `{}`",
                    dir.display(),
                    first.base,
                    name
                );
            }
            Some(_) => {}
        }
    }

    Ok(found)
}

/// Emit one Next.js wrapper page per Taro page, plus `customRoutes.json`.
pub fn create_nextjs_pages(ctx: &SynthContext) -> Result<SynthesisReport, RouteError> {
    let pages_dir = ctx.output.join("pages");
    let mut report = SynthesisReport::default();

    for page in ctx.pages {
        let synthesized = synthesize_page(ctx, &pages_dir, page)?;
        if let Some(segment) = &synthesized.dynamic_segment {
            report.dynamic_segments.push(segment.clone());
        }
        report.pages.push(synthesized);
    }

    let custom_routes_file = ctx.output.join("customRoutes.json");
    let json = serde_json::to_string_pretty(ctx.custom_routes)
        .map_err(|err| RouteError::Json(custom_routes_file.clone(), err))?;
    fs::write(&custom_routes_file, json).map_err(|err| RouteError::Io(custom_routes_file, err))?;

    Ok(report)
}

fn synthesize_page(
    ctx: &SynthContext,
    pages_dir: &Path,
    page: &PageDescriptor,
) -> Result<SynthesizedPage, RouteError> {
    let page_dir = match page.source_file.parent() {
        Some(dir) if page.source_file.is_file() => dir,
        _ => {
            return Err(RouteError::PageNotFound {
                route: page.route.clone(),
                path: page.source_file.clone(),
            });
        }
    };

    let target_route = ctx.custom_routes.target_route(&page.route);
    let dynamic = find_dynamic_route_file(page_dir)?;

    let next_page_dir = pages_dir.join(strip_leading_slash(&target_route));
    let mut request = ctx.output_source.join(strip_leading_slash(&page.route));

    let (output_file, exports_from, dynamic_segment) = match &dynamic {
        Some(file) => {
            // The route may name a directory resolved through its index module
            let mirrored_dir = page_dir
                .strip_prefix(ctx.source)
                .map_err(|_| RouteError::OutsideSource(page_dir.to_path_buf()))?;
            request = ctx.output_source.join(mirrored_dir).join(&file.base);
            let segment = format!("{}/{}", target_route.trim_end_matches('/'), file.base);
            (
                next_page_dir.join(format!("{}.{}", file.base, file.ext)),
                file.path.as_path(),
                Some(segment),
            )
        }
        None => (
            next_page_dir.join("index.js"),
            page.source_file.as_path(),
            None,
        ),
    };

    let source = fs::read_to_string(exports_from)
        .map_err(|err| RouteError::Io(exports_from.to_path_buf(), err))?;
    let exports = lifecycle_exports(exports_from, &source)?;

    let module_request = to_module_request(&relative_path(&next_page_dir, &request));
    let contents = WRAPPER_JS.render(&WrapperVars {
        module_path: &module_request,
        exports: &exports,
    });

    fs::create_dir_all(&next_page_dir).map_err(|err| RouteError::Io(next_page_dir.clone(), err))?;
    fs::write(&output_file, contents).map_err(|err| RouteError::Io(output_file.clone(), err))?;

    crate::debug!("route"; "{} -> {}", page.route, output_file.display());

    Ok(SynthesizedPage {
        route: page.route.clone(),
        target_route,
        output_file,
        module_request,
        exports,
        dynamic_segment,
    })
}
