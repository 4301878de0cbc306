//! Next.js rewrites for dynamic page segments.
//!
//! A Taro page with a `[id].tsx` module lives at `/pages/detail/[id]` in
//! Next.js, while Taro links to `/pages/detail?id=1`. Each dynamic segment
//! becomes a rewrite from the query form to the path form:
//!
//! ```text
//! /pages/detail/[id]       → { source: /pages/detail, has: query id,   destination: /pages/detail/:id }
//! /pages/docs/[...slug]    → { source: /pages/docs,   has: query slug, destination: /pages/docs/:slug* }
//! ```

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteCondition {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rewrite {
    pub source: String,
    pub has: Vec<RewriteCondition>,
    pub destination: String,
}

/// Build one rewrite per `<route>/[param]` segment. Malformed segments are skipped.
pub fn resolve_dynamic_pages_to_rewrites(segments: &[String]) -> Vec<Rewrite> {
    segments.iter().filter_map(|s| rewrite_for(s)).collect()
}

fn rewrite_for(segment: &str) -> Option<Rewrite> {
    let (route, last) = segment.rsplit_once('/')?;
    let inner = last.strip_prefix('[')?.strip_suffix(']')?;

    let (param, catch_all) = match inner
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(inner)
        .strip_prefix("...")
    {
        Some(param) => (param, true),
        None => (inner, false),
    };
    if param.is_empty() || param.contains(['[', ']']) {
        return None;
    }

    let source = if route.is_empty() { "/" } else { route };
    let destination = format!(
        "{}/:{param}{}",
        route,
        if catch_all { "*" } else { "" }
    );

    Some(Rewrite {
        source: source.to_string(),
        has: vec![RewriteCondition {
            kind: "query",
            key: param.to_string(),
        }],
        destination,
    })
}
