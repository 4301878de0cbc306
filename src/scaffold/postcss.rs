//! PostCSS plugin table of the generated project.
//!
//! Rendered in Next.js object form, where each key is a plugin request and
//! each value its options:
//!
//! ```js
//! module.exports = {
//!     plugins: {
//!         "postcss-pxtransform": { "platform": "h5", "designWidth": 750 },
//!         "autoprefixer": { "flexbox": "no-2009" },
//!         "../plugins/rem": {}
//!     }
//! }
//! ```

use crate::utils::json::deep_merge;
use crate::utils::path::{is_relative_request, relative_path, to_module_request};
use serde_json::{Map, Value, json};
use std::path::Path;

/// `postcss` keys configuring Taro's built-in plugins rather than extras.
const BUILTIN_OPTIONS: &[&str] = &["autoprefixer", "pxtransform", "cssModules"];

const PXTRANSFORM: &str = "postcss-pxtransform";
const AUTOPREFIXER: &str = "autoprefixer";

fn default_autoprefixer() -> Value {
    json!({
        "enable": true,
        "config": { "flexbox": "no-2009" }
    })
}

/// Options of the autoprefixer plugin, or `None` when disabled.
pub fn autoprefixer_option(postcss: &Map<String, Value>) -> Option<Value> {
    let mut option = default_autoprefixer();
    if let Some(user) = postcss.get(AUTOPREFIXER) {
        deep_merge(&mut option, user.clone());
    }

    let enabled = option.get("enable").is_some_and(is_truthy);
    enabled.then(|| option.get("config").cloned().unwrap_or_else(|| json!({})))
}

/// Build the plugin table, in load order.
///
/// Relative plugin requests (`./x`, `../x`) are written from `app` and
/// re-expressed from `output`, where `postcss.config.js` lives.
pub fn postcss_plugins(
    postcss: &Map<String, Value>,
    design_width: u32,
    app: &Path,
    output: &Path,
) -> Map<String, Value> {
    let mut plugins = Map::new();
    plugins.insert(
        PXTRANSFORM.to_string(),
        json!({ "platform": "h5", "designWidth": design_width }),
    );
    if let Some(option) = autoprefixer_option(postcss) {
        plugins.insert(AUTOPREFIXER.to_string(), option);
    }

    for (name, option) in postcss {
        if BUILTIN_OPTIONS.contains(&name.as_str()) {
            continue;
        }
        if !option.get("enable").is_some_and(is_truthy) {
            continue;
        }

        let request = if is_relative_request(name) {
            to_module_request(&relative_path(output, &app.join(name)))
        } else {
            name.clone()
        };
        let config = option.get("config").cloned().unwrap_or_else(|| json!({}));
        plugins.insert(request, config);
    }

    plugins
}

/// JavaScript truthiness of a JSON value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_default_plugins() {
        let plugins = postcss_plugins(&Map::new(), 750, Path::new("/app"), Path::new("/app/dist"));
        assert_eq!(
            Value::Object(plugins),
            json!({
                "postcss-pxtransform": {"platform": "h5", "designWidth": 750},
                "autoprefixer": {"flexbox": "no-2009"}
            })
        );
    }

    #[test]
    fn test_autoprefixer_merge_and_disable() {
        let merged = autoprefixer_option(&options(json!({
            "autoprefixer": {"config": {"grid": "autoplace"}}
        })));
        assert_eq!(merged, Some(json!({"flexbox": "no-2009", "grid": "autoplace"})));

        let disabled = autoprefixer_option(&options(json!({
            "autoprefixer": {"enable": false}
        })));
        assert_eq!(disabled, None);
    }

    #[test]
    fn test_extra_plugins() {
        let postcss = options(json!({
            "pxtransform": {"enable": true, "config": {}},
            "cssModules": {"enable": true},
            "postcss-nested": {"enable": true},
            "./plugins/rem.js": {"enable": true, "config": {"base": 16}},
            "postcss-disabled": {"enable": false},
            "postcss-implicit": {"config": {}}
        }));
        let plugins = postcss_plugins(&postcss, 375, Path::new("/app"), Path::new("/app/dist"));
        let keys: Vec<_> = plugins.keys().map(String::as_str).collect();

        assert_eq!(
            keys,
            ["postcss-pxtransform", "autoprefixer", "postcss-nested", "../plugins/rem.js"]
        );
        assert_eq!(plugins["postcss-pxtransform"]["designWidth"], json!(375));
        assert_eq!(plugins["../plugins/rem.js"], json!({"base": 16}));
        assert_eq!(plugins["postcss-nested"], json!({}));
    }
}
