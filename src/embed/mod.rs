//! Embedded templates for the generated Next.js project.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `page` - Wrapper module emitted for every Taro page
//! - `next` - Next.js project files (`pages/_app.tsx`, `next.config.js`, ...)
//!
//! # Usage
//!
//! ```ignore
//! use embed::page::{WRAPPER_JS, WrapperVars};
//!
//! let js = WRAPPER_JS.render(&WrapperVars {
//!     module_path: "../../src/pages/index/index",
//!     exports: &[],
//! });
//! ```

mod template;

pub use template::{Template, TemplateVars};

/// JSON text of a value, as a JS expression.
fn js_value<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".into())
}

pub mod page {
    use super::{Template, TemplateVars};

    /// Variables for the page wrapper.
    pub struct WrapperVars<'a> {
        /// Request of the Taro page module, relative to the wrapper.
        pub module_path: &'a str,
        /// Data-fetching exports re-exported from the Taro page.
        pub exports: &'a [String],
    }

    impl TemplateVars for WrapperVars<'_> {
        fn apply(&self, content: &str) -> String {
            let mut out = content.trim_end().replace("__MODULE_PATH__", self.module_path);
            if !self.exports.is_empty() {
                out.push_str(&format!(
                    "\nexport {{{}}} from '{}'",
                    self.exports.join(", "),
                    self.module_path
                ));
            }
            out
        }
    }

    /// Next.js page rendering a Taro page inside `TaroPageWrapper`.
    pub const WRAPPER_JS: Template<WrapperVars<'static>> =
        Template::new(include_str!("page/wrapper.js"));
}

pub mod next {
    use super::{Template, TemplateVars, js_value};
    use crate::route::Rewrite;
    use serde_json::{Map, Value};

    /// Variables for `pages/_app.tsx`.
    pub struct AppVars<'a> {
        /// Request of the mirrored Taro entry, relative to `pages/`.
        pub app_request: &'a str,
    }

    impl TemplateVars for AppVars<'_> {
        fn apply(&self, content: &str) -> String {
            content.replace("__TARO_APP_REQUEST__", self.app_request)
        }
    }

    /// Root layout hosting the Taro app component.
    pub const APP_TSX: Template<AppVars<'static>> = Template::new(include_str!("next/_app.tsx"));

    /// Custom document.
    pub const DOCUMENT_TSX: &str = include_str!("next/_document.tsx");

    /// Variables for `next.config.js`.
    pub struct NextConfigVars<'a> {
        pub env: &'a Map<String, Value>,
        pub define_constants: &'a Map<String, Value>,
        /// `sass.data`, prepended to every Sass file.
        pub additional_data: Option<&'a str>,
        pub rewrites: &'a [Rewrite],
    }

    impl TemplateVars for NextConfigVars<'_> {
        fn apply(&self, content: &str) -> String {
            let additional_data = self
                .additional_data
                .map_or_else(|| "undefined".to_string(), js_value);
            content
                .replace("__ENV__", &js_value(self.env))
                .replace("__DEFINE_CONSTANTS__", &js_value(self.define_constants))
                .replace("__ADDITIONAL_DATA__", &additional_data)
                .replace("__REWRITES__", &js_value(self.rewrites))
        }
    }

    pub const NEXT_CONFIG_JS: Template<NextConfigVars<'static>> =
        Template::new(include_str!("next/next.config.js"));

    /// Variables for `postcss.config.js`.
    pub struct PostcssVars<'a> {
        /// Plugin request to plugin options, in load order.
        pub plugins: &'a Map<String, Value>,
    }

    impl TemplateVars for PostcssVars<'_> {
        fn apply(&self, content: &str) -> String {
            content.replace("__PLUGINS__", &js_value(self.plugins))
        }
    }

    pub const POSTCSS_CONFIG_JS: Template<PostcssVars<'static>> =
        Template::new(include_str!("next/postcss.config.js"));

    /// Base `tsconfig.json` of the generated project.
    pub const TSCONFIG_JSON: &str = include_str!("next/tsconfig.json");
}

#[cfg(test)]
mod tests {
    use super::next::*;
    use super::page::*;
    use crate::route::resolve_dynamic_pages_to_rewrites;
    use serde_json::{Map, Value, json};

    #[test]
    fn test_wrapper_without_exports() {
        let js = WRAPPER_JS.render(&WrapperVars {
            module_path: "../../../src/pages/index/index",
            exports: &[],
        });
        assert_eq!(
            js,
            "import {TaroPageWrapper} from 'tarojs-plugin-platform-nextjs/taro'\n\
             import TaroPage from '../../../src/pages/index/index'\n\
             \n\
             export default function NextPage(props) {\n    \
             return <TaroPageWrapper TaroPage={TaroPage} {...props} />\n\
             }"
        );
    }

    #[test]
    fn test_wrapper_with_exports() {
        let exports = vec!["getStaticProps".to_string(), "getStaticPaths".to_string()];
        let js = WRAPPER_JS.render(&WrapperVars {
            module_path: "./[id]",
            exports: &exports,
        });
        assert!(js.ends_with("}\nexport {getStaticProps, getStaticPaths} from './[id]'"));
    }

    #[test]
    fn test_next_config_render() {
        let env = json!({"API": "\"https://api\""});
        let rewrites = resolve_dynamic_pages_to_rewrites(&["/a/[id]".to_string()]);
        let js = NEXT_CONFIG_JS.render(&NextConfigVars {
            env: env.as_object().unwrap(),
            define_constants: &Map::new(),
            additional_data: None,
            rewrites: &rewrites,
        });
        assert!(js.contains("\"API\": \"\\\"https://api\\\"\""));
        assert!(js.contains("const defineConstants = {}"));
        assert!(js.contains("additionalData: undefined"));
        assert!(js.contains("\"destination\": \"/a/:id\""));
        assert!(!js.contains("__"));
    }

    #[test]
    fn test_app_and_postcss_render() {
        let app = APP_TSX.render(&AppVars {
            app_request: "../src/app",
        });
        assert!(app.contains("import TaroApp from '../src/app'"));

        let mut plugins = Map::new();
        plugins.insert("autoprefixer".into(), json!({"flexbox": "no-2009"}));
        let css = POSTCSS_CONFIG_JS.render(&PostcssVars { plugins: &plugins });
        assert!(css.contains("\"autoprefixer\""));
        assert!(serde_json::from_str::<Value>(TSCONFIG_JSON).is_ok());
    }
}
