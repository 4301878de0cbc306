//! Next.js data-fetching export detection.

use super::{TransformError, parse_program};
use oxc::allocator::Allocator;
use oxc::ast::ast::{Declaration, ExportNamedDeclaration, Statement};
use std::path::Path;

/// Named exports forwarded from a Taro page to its Next.js wrapper.
pub const LIFECYCLE_EXPORTS: [&str; 3] = ["getStaticProps", "getStaticPaths", "getServerSideProps"];

/// Allowlisted top-level named exports of a page module, in source order.
pub fn lifecycle_exports(path: &Path, source: &str) -> Result<Vec<String>, TransformError> {
    let allocator = Allocator::default();
    let program = parse_program(&allocator, path, source)?;

    let mut found = Vec::new();
    for stmt in &program.body {
        if let Statement::ExportNamedDeclaration(decl) = stmt {
            for name in exported_names(decl) {
                if LIFECYCLE_EXPORTS.contains(&name) && !found.iter().any(|f| f == name) {
                    found.push(name.to_string());
                }
            }
        }
    }
    Ok(found)
}

fn exported_names<'a>(decl: &ExportNamedDeclaration<'a>) -> Vec<&'a str> {
    let mut names = Vec::new();

    match &decl.declaration {
        Some(Declaration::FunctionDeclaration(f)) => {
            names.extend(f.id.as_ref().map(|id| id.name.as_str()));
        }
        Some(Declaration::VariableDeclaration(v)) => {
            names.extend(
                v.declarations
                    .iter()
                    .filter_map(|d| d.id.get_binding_identifier())
                    .map(|id| id.name.as_str()),
            );
        }
        Some(Declaration::ClassDeclaration(c)) => {
            names.extend(c.id.as_ref().map(|id| id.name.as_str()));
        }
        _ => {}
    }

    names.extend(decl.specifiers.iter().map(|s| s.exported.name().as_str()));
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_exports() {
        let source = "\
export default function Page() { return null }
export async function getStaticProps() { return { props: {} } }
export const getStaticPaths = async () => ({ paths: [], fallback: true })
export function helper() {}
";
        let found = lifecycle_exports(Path::new("page.tsx"), source).unwrap();
        assert_eq!(found, ["getStaticProps", "getStaticPaths"]);
    }

    #[test]
    fn test_lifecycle_exports_specifiers() {
        let source = "\
const load = async () => ({ props: {} })
export { load as getServerSideProps, load as default }
";
        let found = lifecycle_exports(Path::new("page.js"), source).unwrap();
        assert_eq!(found, ["getServerSideProps"]);
    }

    #[test]
    fn test_lifecycle_exports_none() {
        let source = "export default () => null\nconst getStaticProps = 1\n";
        assert!(lifecycle_exports(Path::new("page.js"), source).unwrap().is_empty());
    }
}
