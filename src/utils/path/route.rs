//! Route string utilities.
//!
//! Taro routes are written with or without a leading slash
//! (`pages/index/index`, `/pages/index/index`); everything downstream works
//! on the leading-slash form.

/// Ensure a route starts with exactly one `/`
///
/// # Examples
/// ```ignore
/// assert_eq!(ensure_leading_slash("pages/index/index"), "/pages/index/index");
/// assert_eq!(ensure_leading_slash("/pages/index/index"), "/pages/index/index");
/// ```
#[inline]
pub fn ensure_leading_slash(route: &str) -> String {
    format!("/{}", strip_leading_slash(route))
}

/// Strip leading slashes from a route
#[inline]
pub fn strip_leading_slash(route: &str) -> &str {
    route.trim_start_matches('/')
}

/// Join a subpackage root and one of its pages into a route
///
/// Redundant slashes between the two parts are collapsed.
pub fn join_route(root: &str, page: &str) -> String {
    let root = root.trim_matches('/');
    let page = strip_leading_slash(page);
    if root.is_empty() {
        ensure_leading_slash(page)
    } else {
        format!("/{root}/{page}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_leading_slash() {
        assert_eq!(ensure_leading_slash("pages/home"), "/pages/home");
        assert_eq!(ensure_leading_slash("/pages/home"), "/pages/home");
        assert_eq!(ensure_leading_slash("//a"), "/a");
        assert_eq!(ensure_leading_slash(""), "/");
    }

    #[test]
    fn test_strip_leading_slash() {
        assert_eq!(strip_leading_slash("/a/b"), "a/b");
        assert_eq!(strip_leading_slash("a/b"), "a/b");
    }

    #[test]
    fn test_join_route() {
        assert_eq!(join_route("packageA", "pages/cat"), "/packageA/pages/cat");
        assert_eq!(join_route("/packageA/", "/pages/cat"), "/packageA/pages/cat");
        assert_eq!(join_route("", "pages/cat"), "/pages/cat");
    }
}
