//! Source tree mirroring with `.h5` platform overrides.
//!
//! ```text
//! src/pages/index/index.tsx      → dist/src/pages/index/index.tsx
//! src/pages/index/index.h5.tsx   → dist/src/pages/index/index.tsx   (wins)
//! src/assets/logo.h5.png         → dist/src/assets/logo.h5.png      (not a script)
//! ```
//!
//! Scripts pass through the `@tarojs/*` specifier rewrite. The app entry also
//! loses its global stylesheet imports, which live in `pages/_app.tsx`.

use crate::config::ProjectPaths;
use crate::transform::global_styles::strip_global_styles;
use crate::transform::specifiers::rewrite_specifiers;
use crate::utils::path::{PLATFORM_SUFFIX, SCRIPT_EXT, is_script, split_script_name};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Where mirrored files come from and go to.
#[derive(Debug, Clone, Copy)]
pub struct MirrorContext<'a> {
    pub source: &'a Path,
    pub output_source: &'a Path,
    /// Resolved app entry, stripped of global styles when mirrored.
    pub entry: &'a Path,
}

impl<'a> MirrorContext<'a> {
    pub fn new(paths: &'a ProjectPaths) -> Self {
        Self {
            source: &paths.source,
            output_source: &paths.output_source,
            entry: &paths.app_file,
        }
    }

    pub fn output_path(&self, file: &Path) -> Option<PathBuf> {
        output_path_for(self.source, self.output_source, file)
    }
}

/// Whether a plain script has a `.h5` sibling with any script extension.
///
/// `index.tsx` is shadowed by `index.h5.js` as well as `index.h5.tsx`.
pub fn has_specified_file(file: &Path) -> bool {
    let (Some(dir), Some(name)) = (file.parent(), file.file_name().and_then(|n| n.to_str())) else {
        return false;
    };
    let Some((stem, false, _)) = split_script_name(name) else {
        return false;
    };
    SCRIPT_EXT
        .iter()
        .any(|ext| dir.join(format!("{stem}.{PLATFORM_SUFFIX}.{ext}")).is_file())
}

/// Output location of a source file, or `None` when a `.h5` sibling shadows it.
///
/// Files outside `source_root` have no output either.
pub fn output_path_for(source_root: &Path, output_source: &Path, file: &Path) -> Option<PathBuf> {
    let rel = file.strip_prefix(source_root).ok()?;
    let name = rel.file_name()?.to_str()?;

    match split_script_name(name) {
        Some((stem, true, ext)) => Some(output_source.join(rel.with_file_name(format!("{stem}.{ext}")))),
        Some((_, false, _)) if has_specified_file(file) => None,
        _ => Some(output_source.join(rel)),
    }
}

/// Mirror one source file. Returns the written output path.
pub fn mirror_file(ctx: &MirrorContext, file: &Path) -> Result<Option<PathBuf>> {
    let Some(output) = ctx.output_path(file) else {
        return Ok(None);
    };

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    if is_script(file) {
        let source = fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        let source = if file == ctx.entry {
            strip_global_styles(file, &source)?
        } else {
            source
        };
        let contents = rewrite_specifiers(file, &source)?.unwrap_or(source);
        fs::write(&output, contents)
            .with_context(|| format!("failed to write {}", output.display()))?;
        remove_shadowed_outputs(file, &output)?;
    } else {
        fs::copy(file, &output).with_context(|| {
            format!("failed to copy {} to {}", file.display(), output.display())
        })?;
    }

    Ok(Some(output))
}

/// Remove the output of a deleted source file.
///
/// Deleting `name.h5.ext` brings the plain `name.*` script back. A deleted
/// directory takes its whole output subtree with it.
pub fn remove_output(ctx: &MirrorContext, file: &Path) -> Result<Option<PathBuf>> {
    let Some(output) = ctx.output_path(file) else {
        return Ok(None);
    };

    if output.is_dir() {
        fs::remove_dir_all(&output)
            .with_context(|| format!("failed to remove {}", output.display()))?;
    } else if output.exists() {
        fs::remove_file(&output)
            .with_context(|| format!("failed to remove {}", output.display()))?;
    }

    if let Some(sibling) = plain_sibling(file) {
        mirror_file(ctx, &sibling)?;
    }

    Ok(Some(output))
}

/// The existing `name.<ext>` script of a `name.h5.<ext>` file.
fn plain_sibling(file: &Path) -> Option<PathBuf> {
    let dir = file.parent()?;
    let Some((stem, true, _)) = split_script_name(file.file_name()?.to_str()?) else {
        return None;
    };
    if has_specified_file(&dir.join(format!("{stem}.{}", SCRIPT_EXT[0]))) {
        return None;
    }
    SCRIPT_EXT
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|p| p.is_file())
}

/// An override with another extension than its plain sibling leaves the
/// sibling's earlier output behind. Drop it.
fn remove_shadowed_outputs(file: &Path, output: &Path) -> Result<()> {
    let (Some(dir), Some(name)) = (file.parent(), file.file_name().and_then(|n| n.to_str())) else {
        return Ok(());
    };
    let Some((stem, true, _)) = split_script_name(name) else {
        return Ok(());
    };
    let Some(out_dir) = output.parent() else {
        return Ok(());
    };

    for ext in SCRIPT_EXT {
        let stale = out_dir.join(format!("{stem}.{ext}"));
        let owned_by_plain = dir.join(format!("{stem}.{ext}")).is_file()
            && !dir.join(format!("{stem}.{PLATFORM_SUFFIX}.{ext}")).is_file();
        if stale != output && stale.is_file() && owned_by_plain {
            fs::remove_file(&stale)
                .with_context(|| format!("failed to remove {}", stale.display()))?;
        }
    }
    Ok(())
}
