//! Taro package specifier rewrite for mirrored sources.

use super::{Edit, TransformError, apply_edits, parse_program};
use oxc::allocator::Allocator;
use oxc::ast::ast::{Statement, StringLiteral};
use std::path::Path;

/// `(from, to)` package renames applied to import/export sources.
pub const SPECIFIER_RENAMES: [(&str, &str); 2] = [
    ("@tarojs/components", "@taror/components"),
    ("@tarojs/taro", "tarojs-plugin-platform-nextjs/taro"),
];

fn renamed(specifier: &str) -> Option<&'static str> {
    SPECIFIER_RENAMES
        .iter()
        .find(|(from, _)| *from == specifier)
        .map(|(_, to)| *to)
}

/// Rewrite Taro package specifiers.
///
/// Returns `None` when nothing changed so callers can copy the file as-is.
pub fn rewrite_specifiers(path: &Path, source: &str) -> Result<Option<String>, TransformError> {
    if !source.contains("@tarojs/") {
        return Ok(None);
    }

    let allocator = Allocator::default();
    let program = parse_program(&allocator, path, source)?;

    let edits: Vec<_> = program
        .body
        .iter()
        .filter_map(|stmt| match stmt {
            Statement::ImportDeclaration(decl) => Some(&decl.source),
            Statement::ExportNamedDeclaration(decl) => decl.source.as_ref(),
            Statement::ExportAllDeclaration(decl) => Some(&decl.source),
            _ => None,
        })
        .filter_map(|lit| literal_edit(source, lit))
        .collect();

    if edits.is_empty() {
        return Ok(None);
    }
    Ok(Some(apply_edits(source, edits)))
}

fn literal_edit(source: &str, lit: &StringLiteral) -> Option<Edit> {
    let to = renamed(lit.value.as_str())?;
    let quote = source[lit.span.start as usize..].chars().next().unwrap_or('\'');
    Some(Edit::replace(
        lit.span.start,
        lit.span.end,
        format!("{quote}{to}{quote}"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_imports_and_reexports() {
        let source = "\
import { View } from '@tarojs/components'
import Taro, { useRouter } from \"@tarojs/taro\";
import { cx } from '@tarojs/helper'
export { Text } from '@tarojs/components'
export * from '@tarojs/taro'
";
        let out = rewrite_specifiers(Path::new("index.tsx"), source).unwrap().unwrap();
        assert_eq!(
            out,
            "\
import { View } from '@taror/components'
import Taro, { useRouter } from \"tarojs-plugin-platform-nextjs/taro\";
import { cx } from '@tarojs/helper'
export { Text } from '@taror/components'
export * from 'tarojs-plugin-platform-nextjs/taro'
"
        );
    }

    #[test]
    fn test_rewrite_untouched() {
        let source = "import React from 'react'\nconst s = '@tarojs/taro'\n";
        assert_eq!(rewrite_specifiers(Path::new("a.js"), source).unwrap(), None);
        assert_eq!(
            rewrite_specifiers(Path::new("a.js"), "export const a = 1").unwrap(),
            None
        );
    }

    #[test]
    fn test_rewrite_parse_error() {
        let source = "import { from '@tarojs/taro'";
        assert!(rewrite_specifiers(Path::new("a.ts"), source).is_err());
    }
}
