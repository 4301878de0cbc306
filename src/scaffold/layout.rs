//! Root layout (`pages/_app.tsx`) with the app's global stylesheets.
//!
//! Next.js only accepts global CSS imported from `pages/_app`. The Taro entry
//! imports it instead, so its global style imports are moved over: scanned
//! from the source entry, re-based from the mirrored entry's location, and
//! prepended to the freshly rendered layout.

use crate::config::{ENTRY, ProjectPaths};
use crate::embed::next::{APP_TSX, AppVars};
use crate::transform::global_styles::{ImportList, inject_styles, scan_global_styles};
use crate::utils::path::{relative_path, to_module_request};
use anyhow::{Context, Result};
use std::fs;

/// Render `pages/_app.tsx` and move the entry's global styles into it.
pub fn relocate_global_styles(paths: &ProjectPaths) -> Result<ImportList> {
    let entry = &paths.app_file;
    let source = fs::read_to_string(entry)
        .with_context(|| format!("failed to read app entry {}", entry.display()))?;

    let target = &paths.next_app_file;
    let imports = scan_global_styles(&paths.output_app_file, &source, target)?;

    let pages_dir = target.parent().unwrap_or(&paths.output);
    let app_request = to_module_request(&relative_path(
        pages_dir,
        &paths.output_source.join(ENTRY),
    ));
    let layout = APP_TSX.render(&AppVars {
        app_request: &app_request,
    });
    let layout = inject_styles(target, &layout, &imports)?;

    fs::create_dir_all(pages_dir)
        .with_context(|| format!("failed to create directory {}", pages_dir.display()))?;
    fs::write(target, layout).with_context(|| format!("failed to write {}", target.display()))?;

    crate::debug!("layout"; "{} global style import(s) moved to _app.tsx", imports.len());
    Ok(imports)
}
