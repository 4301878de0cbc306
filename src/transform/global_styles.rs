//! Global stylesheet relocation.
//!
//! Next.js only accepts global CSS imports from `pages/_app`. The Taro entry
//! module imports its global stylesheets itself, so those imports are moved:
//!
//! ```text
//! src/app.tsx                      pages/_app.tsx
//! ┌──────────────────────────┐     ┌──────────────────────────────┐
//! │ import './app.scss'      │ ──► │ import '../src/app.scss'     │
//! │ import 'taro-ui/ui.css'  │ ──► │ import 'taro-ui/ui.css'      │
//! │ import s from './a.module│     │ ...template body...          │
//! │   .scss'   (kept)        │     └──────────────────────────────┘
//! └──────────────────────────┘
//! ```
//!
//! The two phases communicate only through the returned [`ImportList`].

use super::{Edit, TransformError, apply_edits, parse_program};
use crate::utils::path::{is_relative_request, relative_path, to_module_request};
use oxc::allocator::Allocator;
use oxc::ast::ast::{ImportDeclaration, Program, Statement};
use oxc::span::GetSpan;
use std::path::Path;

const STYLE_EXT: [&str; 3] = [".css", ".scss", ".sass"];

/// One global stylesheet import lifted out of the entry module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalStyleImport {
    /// Specifier as it appears in the injected statement.
    pub specifier: String,
    /// Specifier as written in the entry module.
    pub original: String,
    /// Whether the specifier was re-expressed for the target location.
    pub rewritten: bool,
    /// Full import statement text, ready to inject.
    pub statement: String,
}

pub type ImportList = Vec<GlobalStyleImport>;

/// Whether `request` names a global stylesheet (CSS modules excluded).
pub fn is_global_style(request: &str) -> bool {
    STYLE_EXT.iter().any(|ext| {
        request
            .strip_suffix(ext)
            .is_some_and(|base| !base.ends_with(".module"))
    })
}

/// Collect global stylesheet imports of `entry_path`, re-expressed for a
/// module living at `target_path`.
pub fn scan_global_styles(
    entry_path: &Path,
    entry_source: &str,
    target_path: &Path,
) -> Result<ImportList, TransformError> {
    let allocator = Allocator::default();
    let program = parse_program(&allocator, entry_path, entry_source)?;

    let entry_dir = entry_path.parent().unwrap_or(Path::new(""));
    let target_dir = target_path.parent().unwrap_or(Path::new(""));

    let imports = global_style_imports(&program)
        .map(|decl| {
            let original = decl.source.value.to_string();
            let (specifier, rewritten) = if is_relative_request(&original) {
                let absolute = entry_dir.join(&original);
                let request = to_module_request(&relative_path(target_dir, &absolute));
                (request, true)
            } else {
                (original.clone(), false)
            };

            GlobalStyleImport {
                statement: rebuild_statement(entry_source, decl, &specifier),
                specifier,
                original,
                rewritten,
            }
        })
        .collect();

    Ok(imports)
}

/// Insert `imports` at the start of the target module's body.
///
/// Directives and a hashbang stay first. An empty list returns the source
/// unchanged.
pub fn inject_styles(
    target_path: &Path,
    target_source: &str,
    imports: &ImportList,
) -> Result<String, TransformError> {
    if imports.is_empty() {
        return Ok(target_source.to_string());
    }

    let allocator = Allocator::default();
    let program = parse_program(&allocator, target_path, target_source)?;

    let offset = program
        .directives
        .iter()
        .map(|d| d.span.end)
        .chain(program.hashbang.as_ref().map(|h| h.span.end))
        .max()
        .unwrap_or(0);

    let block = imports
        .iter()
        .map(|i| i.statement.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let text = if offset == 0 {
        format!("{block}\n")
    } else {
        format!("\n{block}")
    };

    Ok(apply_edits(target_source, vec![Edit::insert(offset, text)]))
}

/// Remove global stylesheet imports from a module, including their line break.
pub fn strip_global_styles(path: &Path, source: &str) -> Result<String, TransformError> {
    let allocator = Allocator::default();
    let program = parse_program(&allocator, path, source)?;

    let edits: Vec<_> = global_style_imports(&program)
        .map(|decl| {
            let span = decl.span();
            let end = match source.as_bytes().get(span.end as usize) {
                Some(b'\n') => span.end + 1,
                Some(b'\r') if source.as_bytes().get(span.end as usize + 1) == Some(&b'\n') => {
                    span.end + 2
                }
                _ => span.end,
            };
            Edit::remove(span.start, end)
        })
        .collect();

    if edits.is_empty() {
        return Ok(source.to_string());
    }
    Ok(apply_edits(source, edits))
}

fn global_style_imports<'p, 'a>(
    program: &'p Program<'a>,
) -> impl Iterator<Item = &'p ImportDeclaration<'a>> {
    program.body.iter().filter_map(|stmt| match stmt {
        Statement::ImportDeclaration(decl) if is_global_style(decl.source.value.as_str()) => {
            Some(&**decl)
        }
        _ => None,
    })
}

/// Statement text with the string literal swapped, quote style kept.
fn rebuild_statement(source: &str, decl: &ImportDeclaration, specifier: &str) -> String {
    let (start, end) = (decl.span.start as usize, decl.span.end as usize);
    let (lit_start, lit_end) = (
        decl.source.span.start as usize,
        decl.source.span.end as usize,
    );
    let quote = source[lit_start..].chars().next().unwrap_or('\'');

    format!(
        "{}{quote}{specifier}{quote}{}",
        &source[start..lit_start],
        &source[lit_end..end]
    )
}
