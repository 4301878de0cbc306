//! Static evaluation of config modules into JSON.
//!
//! Handles the shapes Taro config files are written in:
//!
//! - `export default defineAppConfig({ ... })`
//! - `export default { ... }`, `export default config` with `const config = { ... }`
//! - `module.exports = { ... }`
//!
//! Values may be literals, arrays, objects (with spreads of other constants),
//! templates without substitutions, and negated numbers. Anything else is
//! rejected rather than guessed.
//!
//! [`parse_jsonc`] reuses the evaluator for JSON-with-comments files such as
//! `tsconfig.json`.

use super::{TransformError, parse_program};
use oxc::allocator::Allocator;
use oxc::ast::ast::{
    ArrayExpressionElement, AssignmentTarget, Declaration, Expression, ObjectPropertyKind, Program,
    Statement, UnaryOperator, VariableDeclarationKind,
};
use oxc::parser::Parser;
use oxc::span::SourceType;
use rustc_hash::FxHashMap;
use serde_json::{Map, Number, Value};
use std::path::{Path, PathBuf};

/// Nesting limit for constant lookups (`const a = b`, `const b = {...}`).
const MAX_LOOKUP_DEPTH: usize = 16;

/// Call wrappers that return their single argument.
const IDENTITY_CALLS: [&str; 2] = ["defineAppConfig", "definePageConfig"];

/// Evaluate the default export of a module.
pub fn evaluate_module_default(path: &Path, source: &str) -> Result<Value, TransformError> {
    let allocator = Allocator::default();
    let program = parse_program(&allocator, path, source)?;

    let eval = Evaluator::new(path, collect_consts(&program));
    let expr = default_export(&program)
        .ok_or_else(|| TransformError::MissingDefaultExport(path.to_path_buf()))?;
    eval.eval(expr, 0)
}

/// Parse JSON with comments and trailing commas.
pub fn parse_jsonc(path: &Path, source: &str) -> Result<Value, TransformError> {
    let allocator = Allocator::default();
    let expr = Parser::new(&allocator, source, SourceType::mjs())
        .parse_expression()
        .map_err(|errors| TransformError::Parse {
            path: path.to_path_buf(),
            message: errors
                .iter()
                .map(|e| format!("{e}"))
                .collect::<Vec<_>>()
                .join("\n"),
        })?;

    Evaluator::new(path, FxHashMap::default()).eval(&expr, 0)
}

fn collect_consts<'p, 'a>(program: &'p Program<'a>) -> FxHashMap<&'a str, &'p Expression<'a>> {
    let mut consts = FxHashMap::default();

    let declarations = program.body.iter().filter_map(|stmt| match stmt {
        Statement::VariableDeclaration(v) => Some(&**v),
        Statement::ExportNamedDeclaration(e) => match &e.declaration {
            Some(Declaration::VariableDeclaration(v)) => Some(&**v),
            _ => None,
        },
        _ => None,
    });

    for decl in declarations {
        if decl.kind != VariableDeclarationKind::Const {
            continue;
        }
        for d in &decl.declarations {
            if let (Some(id), Some(init)) = (d.id.get_binding_identifier(), &d.init) {
                consts.insert(id.name.as_str(), init);
            }
        }
    }
    consts
}

fn default_export<'p, 'a>(program: &'p Program<'a>) -> Option<&'p Expression<'a>> {
    program.body.iter().find_map(|stmt| match stmt {
        Statement::ExportDefaultDeclaration(decl) => decl.declaration.as_expression(),
        Statement::ExpressionStatement(stmt) => match stmt.expression.get_inner_expression() {
            Expression::AssignmentExpression(assign) if is_module_exports(&assign.left) => {
                Some(&assign.right)
            }
            _ => None,
        },
        _ => None,
    })
}

fn is_module_exports(target: &AssignmentTarget) -> bool {
    match target {
        AssignmentTarget::StaticMemberExpression(m) => {
            m.property.name == "exports"
                && matches!(&m.object, Expression::Identifier(id) if id.name == "module")
        }
        _ => false,
    }
}

struct Evaluator<'p, 'a> {
    path: &'p Path,
    consts: FxHashMap<&'a str, &'p Expression<'a>>,
}

impl<'p, 'a> Evaluator<'p, 'a> {
    fn new(path: &'p Path, consts: FxHashMap<&'a str, &'p Expression<'a>>) -> Self {
        Self { path, consts }
    }

    fn unsupported(&self, what: &'static str) -> TransformError {
        TransformError::Unsupported {
            path: PathBuf::from(self.path),
            what,
        }
    }

    fn eval(&self, expr: &Expression<'a>, depth: usize) -> Result<Value, TransformError> {
        match expr.get_inner_expression() {
            Expression::StringLiteral(s) => Ok(Value::String(s.value.to_string())),
            Expression::NumericLiteral(n) => Ok(number(n.value)),
            Expression::BooleanLiteral(b) => Ok(Value::Bool(b.value)),
            Expression::NullLiteral(_) => Ok(Value::Null),
            Expression::TemplateLiteral(t) if t.expressions.is_empty() => t
                .quasis
                .first()
                .and_then(|q| q.value.cooked)
                .map(|c| Value::String(c.to_string()))
                .ok_or_else(|| self.unsupported("template literal")),
            Expression::UnaryExpression(u) if u.operator == UnaryOperator::UnaryNegation => {
                match self.eval(&u.argument, depth)? {
                    Value::Number(n) => Ok(n.as_f64().map(|v| number(-v)).unwrap_or(Value::Null)),
                    _ => Err(self.unsupported("negation of a non-number")),
                }
            }
            Expression::Identifier(id) if id.name == "undefined" => Ok(Value::Null),
            Expression::Identifier(id) => {
                if depth >= MAX_LOOKUP_DEPTH {
                    return Err(self.unsupported("deeply nested constant"));
                }
                let init = self
                    .consts
                    .get(id.name.as_str())
                    .ok_or_else(|| self.unsupported("reference to a non-constant binding"))?;
                self.eval(init, depth + 1)
            }
            Expression::CallExpression(call) => {
                let wrapper = matches!(
                    &call.callee,
                    Expression::Identifier(id) if IDENTITY_CALLS.contains(&id.name.as_str())
                );
                match (wrapper, call.arguments.first().and_then(|a| a.as_expression())) {
                    (true, Some(arg)) if call.arguments.len() == 1 => self.eval(arg, depth),
                    _ => Err(self.unsupported("function call")),
                }
            }
            Expression::ArrayExpression(arr) => {
                let mut items = Vec::with_capacity(arr.elements.len());
                for el in &arr.elements {
                    match el {
                        ArrayExpressionElement::Elision(_) => items.push(Value::Null),
                        ArrayExpressionElement::SpreadElement(spread) => {
                            match self.eval(&spread.argument, depth)? {
                                Value::Array(inner) => items.extend(inner),
                                _ => return Err(self.unsupported("spread of a non-array")),
                            }
                        }
                        el => {
                            let expr = el
                                .as_expression()
                                .ok_or_else(|| self.unsupported("array element"))?;
                            items.push(self.eval(expr, depth)?);
                        }
                    }
                }
                Ok(Value::Array(items))
            }
            Expression::ObjectExpression(obj) => {
                let mut map = Map::new();
                for prop in &obj.properties {
                    match prop {
                        ObjectPropertyKind::ObjectProperty(p) => {
                            if p.computed {
                                return Err(self.unsupported("computed property key"));
                            }
                            let key = p
                                .key
                                .static_name()
                                .ok_or_else(|| self.unsupported("property key"))?;
                            map.insert(key.to_string(), self.eval(&p.value, depth)?);
                        }
                        ObjectPropertyKind::SpreadProperty(spread) => {
                            match self.eval(&spread.argument, depth)? {
                                Value::Object(inner) => map.extend(inner),
                                _ => return Err(self.unsupported("spread of a non-object")),
                            }
                        }
                    }
                }
                Ok(Value::Object(map))
            }
            _ => Err(self.unsupported("expression")),
        }
    }
}

/// Integral values become JSON integers so `750` does not render as `750.0`.
fn number(v: f64) -> Value {
    if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Value::from(v as i64)
    } else {
        Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_define_app_config() {
        let source = "\
export default defineAppConfig({
  pages: ['pages/index/index', `pages/about/index`],
  subPackages: [{ root: 'sub', pages: ['detail/index'] }],
  window: { navigationBarTitleText: 'Demo', offset: -2, ratio: 0.5 },
})
";
        let value = evaluate_module_default(Path::new("app.config.ts"), source).unwrap();
        assert_eq!(
            value,
            json!({
                "pages": ["pages/index/index", "pages/about/index"],
                "subPackages": [{"root": "sub", "pages": ["detail/index"]}],
                "window": {"navigationBarTitleText": "Demo", "offset": -2, "ratio": 0.5}
            })
        );
    }

    #[test]
    fn test_identifier_and_spread() {
        let source = "\
const pages = ['pages/index/index']
const base = { debug: false }
const config = { ...base, pages, 'entryPagePath': pages[0] === undefined ? 1 : 2 }
export default config as any
";
        let err = evaluate_module_default(Path::new("app.config.ts"), source).unwrap_err();
        assert!(matches!(err, TransformError::Unsupported { .. }));

        let source = "\
const pages = ['pages/index/index']
const base = { debug: false }
const config = { ...base, pages }
export default config as any
";
        let value = evaluate_module_default(Path::new("app.config.ts"), source).unwrap();
        assert_eq!(value, json!({"debug": false, "pages": ["pages/index/index"]}));
    }

    #[test]
    fn test_module_exports() {
        let source = "module.exports = { pages: ['a/index'] }";
        let value = evaluate_module_default(Path::new("app.config.js"), source).unwrap();
        assert_eq!(value, json!({"pages": ["a/index"]}));
    }

    #[test]
    fn test_missing_default() {
        let err = evaluate_module_default(Path::new("a.js"), "export const a = 1").unwrap_err();
        assert!(matches!(err, TransformError::MissingDefaultExport(_)));
    }

    #[test]
    fn test_let_binding_rejected() {
        let source = "let c = {}\nexport default c";
        assert!(evaluate_module_default(Path::new("a.js"), source).is_err());
    }

    #[test]
    fn test_self_reference_guarded() {
        let source = "const a = b\nconst b = a\nexport default a";
        assert!(evaluate_module_default(Path::new("a.js"), source).is_err());
    }

    #[test]
    fn test_parse_jsonc() {
        let source = r#"{
  // editor settings
  "compilerOptions": {
    "baseUrl": ".", /* root */
    "strict": true,
  },
  "include": ["src"],
}"#;
        let value = parse_jsonc(Path::new("tsconfig.json"), source).unwrap();
        assert_eq!(
            value,
            json!({"compilerOptions": {"baseUrl": ".", "strict": true}, "include": ["src"]})
        );
    }

    #[test]
    fn test_parse_jsonc_error() {
        assert!(parse_jsonc(Path::new("tsconfig.json"), "{ \"a\": }").is_err());
    }
}
