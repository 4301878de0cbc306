//! Script file resolution with `.h5` platform overrides.
//!
//! Taro lets a project ship `name.h5.tsx` next to `name.tsx`; the web build
//! picks the suffixed file and the output tree only ever sees `name.tsx`.

use std::path::{Path, PathBuf};

/// Extensions treated as script modules.
pub const SCRIPT_EXT: &[&str] = &["js", "jsx", "ts", "tsx"];

/// Secondary extension marking a web-platform override.
pub const PLATFORM_SUFFIX: &str = "h5";

/// Whether a path has one of the script extensions.
pub fn is_script(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SCRIPT_EXT.contains(&ext))
}

/// Split a script file name into `(stem, has_platform_suffix, ext)`.
///
/// # Examples
/// ```ignore
/// split_script_name("index.h5.tsx") -> Some(("index", true, "tsx"))
/// split_script_name("index.tsx")    -> Some(("index", false, "tsx"))
/// split_script_name("index.css")    -> None
/// ```
pub fn split_script_name(file_name: &str) -> Option<(&str, bool, &str)> {
    let (base, ext) = file_name.rsplit_once('.')?;
    if !SCRIPT_EXT.contains(&ext) || base.is_empty() {
        return None;
    }
    match base.rsplit_once('.') {
        Some((stem, PLATFORM_SUFFIX)) if !stem.is_empty() => Some((stem, true, ext)),
        _ => Some((base, false, ext)),
    }
}

/// Resolve an extension-less module path to an existing script file.
///
/// For each extension in [`SCRIPT_EXT`] order, tries `<p>.h5.<ext>`,
/// `<p>.<ext>`, `<p>/index.h5.<ext>`, `<p>/index.<ext>`. Falls back to `p`
/// itself when nothing exists.
pub fn resolve_script_path(p: &Path) -> PathBuf {
    let base = p.as_os_str().to_string_lossy();
    for ext in SCRIPT_EXT {
        let candidates = [
            PathBuf::from(format!("{base}.{PLATFORM_SUFFIX}.{ext}")),
            PathBuf::from(format!("{base}.{ext}")),
            p.join(format!("index.{PLATFORM_SUFFIX}.{ext}")),
            p.join(format!("index.{ext}")),
        ];
        if let Some(found) = candidates.into_iter().find(|c| c.is_file()) {
            return found;
        }
    }
    p.to_path_buf()
}
