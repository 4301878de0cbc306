//! Source-level passes over JS/TS modules.
//!
//! Every pass parses with oxc, reads the tree, and returns new text built from
//! source spans. The parsed tree is never mutated or re-printed, so
//! formatting and comments outside the touched ranges survive untouched.
//!
//! | Module          | Purpose                                             |
//! |-----------------|-----------------------------------------------------|
//! | `global_styles` | Scan/inject/strip global stylesheet imports         |
//! | `specifiers`    | Rewrite `@tarojs/*` import specifiers               |
//! | `exports`       | Find Next.js data-fetching exports of a page        |
//! | `static_value`  | Evaluate config modules and JSONC into JSON values  |

mod edit;
pub mod exports;
pub mod global_styles;
pub mod specifiers;
pub mod static_value;

pub use edit::{Edit, apply_edits};

use oxc::allocator::Allocator;
use oxc::ast::ast::Program;
use oxc::parser::Parser;
use oxc::span::SourceType;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by the source passes.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to parse `{path}`:\n{message}")]
    Parse { path: PathBuf, message: String },

    #[error("cannot evaluate {what} in `{path}` statically")]
    Unsupported { path: PathBuf, what: &'static str },

    #[error("`{0}` has no default export")]
    MissingDefaultExport(PathBuf),
}

/// Source type from the file extension, ES module fallback for the rest.
///
/// Taro pages carry JSX in plain `.js` files, so JavaScript always parses
/// with JSX enabled.
pub(crate) fn source_type_for(path: &Path) -> SourceType {
    let source_type = SourceType::from_path(path).unwrap_or_else(|_| SourceType::mjs());
    if source_type.is_javascript() {
        source_type.with_jsx(true)
    } else {
        source_type
    }
}

/// Parse a module, rejecting sources with any syntax error.
pub(crate) fn parse_program<'a>(
    allocator: &'a Allocator,
    path: &Path,
    source: &'a str,
) -> Result<Program<'a>, TransformError> {
    let ret = Parser::new(allocator, source, source_type_for(path)).parse();

    if ret.panicked || !ret.errors.is_empty() {
        let message = ret
            .errors
            .iter()
            .map(|e| format!("{e}"))
            .collect::<Vec<_>>()
            .join("\n");
        return Err(TransformError::Parse {
            path: path.to_path_buf(),
            message,
        });
    }

    Ok(ret.program)
}
