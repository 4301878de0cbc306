//! Path normalization utilities.
//!
//! Provides consistent path handling across the codebase:
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `resolve_lexically` - `path.resolve` semantics without touching the disk
//! - `relative_path` - `path.relative` semantics between two absolute paths
//! - `to_module_request` - relative path to an import specifier

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Lexical resolution if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            resolve_lexically(path)
        } else {
            std::env::current_dir()
                .map_or_else(|_| path.to_path_buf(), |cwd| resolve_lexically(&cwd.join(path)))
        }
    })
}

/// Collapse `.` and `..` components without consulting the file system.
///
/// `..` at the root stays at the root, like Node's `path.resolve`.
pub fn resolve_lexically(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match result.components().next_back() {
                Some(Component::Normal(_)) => {
                    result.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => result.push(".."),
            },
            other => result.push(other.as_os_str()),
        }
    }
    result
}

/// Path of `to` relative to the directory `from`.
///
/// Both paths are resolved lexically first. Returns an empty path when they
/// are equal.
///
/// # Examples
/// ```ignore
/// relative_path("/out/pages", "/out/src/a.css") -> "../src/a.css"
/// relative_path("/out", "/out/src")             -> "src"
/// ```
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from = resolve_lexically(from);
    let to = resolve_lexically(to);

    let from_parts: Vec<_> = from.components().collect();
    let to_parts: Vec<_> = to.components().collect();

    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for _ in common..from_parts.len() {
        result.push("..");
    }
    for part in &to_parts[common..] {
        result.push(part.as_os_str());
    }
    result
}

/// Turn a relative file path into an ES module request.
///
/// Separators become `/` and a `./` prefix is added when the path does not
/// already start with a dot segment, so the request is never mistaken for a
/// package name.
pub fn to_module_request(path: &Path) -> String {
    let request = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    if request.starts_with("./") || request.starts_with("../") || request == ".." {
        request
    } else if request.is_empty() {
        ".".to_string()
    } else {
        format!("./{request}")
    }
}

/// Check whether an import request is relative to the importing file.
///
/// Backslash forms are only honored on Windows.
pub fn is_relative_request(request: &str) -> bool {
    request.starts_with("./")
        || request.starts_with("../")
        || (cfg!(windows) && (request.starts_with(".\\") || request.starts_with("..\\")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_relative() {
        let path = Path::new("relative/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_resolve_lexically() {
        assert_eq!(
            resolve_lexically(Path::new("/out/src/./a/../b.css")),
            PathBuf::from("/out/src/b.css")
        );
        assert_eq!(resolve_lexically(Path::new("/../a")), PathBuf::from("/a"));
    }

    #[test]
    fn test_relative_path_sibling_dirs() {
        assert_eq!(
            relative_path(Path::new("/out/pages"), Path::new("/out/src/a/b.css")),
            PathBuf::from("../src/a/b.css")
        );
    }

    #[test]
    fn test_relative_path_child_and_same() {
        assert_eq!(
            relative_path(Path::new("/out"), Path::new("/out/src")),
            PathBuf::from("src")
        );
        assert_eq!(relative_path(Path::new("/out"), Path::new("/out")), PathBuf::new());
    }

    #[test]
    fn test_relative_path_deep_up() {
        assert_eq!(
            relative_path(Path::new("/out/pages/pages/home"), Path::new("/out/src/pages/home")),
            PathBuf::from("../../../src/pages/home")
        );
    }

    #[test]
    fn test_relative_path_round_trip() {
        let from = Path::new("/out/pages");
        let target = Path::new("/out/src/styles/global.scss");
        let rel = relative_path(from, target);
        assert_eq!(resolve_lexically(&from.join(rel)), target);
    }

    #[test]
    fn test_to_module_request() {
        assert_eq!(to_module_request(Path::new("../src/app")), "../src/app");
        assert_eq!(to_module_request(Path::new("global.css")), "./global.css");
        assert_eq!(to_module_request(Path::new("")), ".");
    }

    #[test]
    fn test_is_relative_request() {
        assert!(is_relative_request("./app.css"));
        assert!(is_relative_request("../styles/app.scss"));
        assert!(!is_relative_request("normalize.css"));
        assert!(!is_relative_request("@taror/components/dist/index.css"));
        assert!(!is_relative_request("/abs/app.css"));
    }
}
