//! Project configuration management for `taro-next.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Table definitions ([router], [devServer], [sass])
//! ├── types/         # ConfigError, diagnostics, field paths
//! ├── app.rs         # Taro app config (src/app.config.*)
//! ├── paths.rs       # Derived project paths
//! └── mod.rs         # ProjectConfig (this file)
//! ```
//!
//! Keys follow the Taro build config names:
//!
//! ```toml
//! sourceRoot = "src"
//! outputRoot = "dist"
//! designWidth = 750
//! isWatch = false
//! mode = "production"
//!
//! [env]
//! API_BASE = '"https://api.example.com"'
//!
//! [defineConstants]
//! __DEV__ = "false"
//!
//! [alias]
//! "@/components" = "src/components"
//!
//! [postcss.autoprefixer]
//! enable = true
//! config = { flexbox = "no-2009" }
//!
//! [router]
//! mode = "browser"
//!
//! [devServer]
//! port = 10086
//!
//! [sass]
//! data = '@import "@/styles/vars.scss";'
//! ```

pub mod app;
mod paths;
pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use app::{AppConfig, SubPackage};
pub use paths::{ENTRY, ProjectPaths};
pub use section::{DEFAULT_PORT, DevServerConfig, RouterConfig, SassConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{BuildArgs, Cli, Commands},
    core::BuildMode,
    log,
    utils::path::normalize_path,
};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing taro-next.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Source directory, relative to the root.
    pub source_root: PathBuf,

    /// Output directory of the generated Next.js app, relative to the root.
    pub output_root: PathBuf,

    pub router: RouterConfig,

    /// `process.env.*` definitions, values are JS expressions.
    pub env: Map<String, Value>,

    /// Global constant definitions, values are JS expressions.
    pub define_constants: Map<String, Value>,

    /// `None` picks development when watching, production otherwise.
    pub mode: Option<BuildMode>,

    /// Module alias to directory, relative to the root.
    pub alias: Map<String, Value>,

    pub sass: SassConfig,

    /// Design draft width for `postcss-pxtransform`.
    pub design_width: u32,

    /// PostCSS plugin options keyed by plugin name or request.
    pub postcss: Map<String, Value>,

    pub is_watch: bool,

    pub dev_server: DevServerConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            source_root: PathBuf::from("src"),
            output_root: PathBuf::from("dist"),
            router: RouterConfig::default(),
            env: Map::new(),
            define_constants: Map::new(),
            mode: None,
            alias: Map::new(),
            sass: SassConfig::default(),
            design_width: 750,
            postcss: Map::new(),
            is_watch: false,
            dev_server: DevServerConfig::default(),
        }
    }
}

impl ProjectConfig {
    pub const ALIAS: FieldPath = FieldPath::new("alias");
    pub const SOURCE_ROOT: FieldPath = FieldPath::new("sourceRoot");
    pub const OUTPUT_ROOT: FieldPath = FieldPath::new("outputRoot");

    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file. The project root is
    /// the config file's parent directory, or cwd when there is none.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config, &cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = normalize_path(&path);
                config
            }
            None => {
                log!(
                    "config";
                    "{} not found, using defaults",
                    cli.config.display()
                );
                Self {
                    config_path: cwd.join(&cli.config),
                    ..Self::default()
                }
            }
        };

        let root = config
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(cwd);

        config.finalize(cli, &root);
        config.validate(cli.is_build())?;

        Ok(config)
    }

    /// Finalize configuration after loading.
    fn finalize(&mut self, cli: &Cli, root: &Path) {
        self.root = normalize_path(root);
        self.apply_command_options(cli);
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Get path relative to the project root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    /// Derived absolute paths of the project layout.
    pub fn paths(&self) -> ProjectPaths {
        ProjectPaths::new(self)
    }

    /// Effective build mode.
    pub fn build_mode(&self) -> BuildMode {
        self.mode.unwrap_or(BuildMode::default_for(self.is_watch))
    }

    /// Alias entries with absolute targets, in declaration order.
    pub fn alias_targets(&self) -> Vec<(String, PathBuf)> {
        self.alias
            .iter()
            .filter_map(|(name, target)| {
                let target = target.as_str()?;
                Some((name.clone(), normalize_path(&self.root.join(target))))
            })
            .collect()
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Build { build_args } => self.apply_build_args(build_args),
            Commands::Start { .. } => {}
        }
    }

    /// Apply build arguments from CLI.
    fn apply_build_args(&mut self, args: &BuildArgs) {
        crate::logger::set_verbose(args.verbose);

        Self::update_option(&mut self.is_watch, args.watch.as_ref());
        if args.mode.is_some() {
            self.mode = args.mode;
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration for the current command.
    ///
    /// The router mode check fails fast and only applies to `build`; other
    /// errors are collected and returned at once.
    pub fn validate(&self, is_build: bool) -> Result<()> {
        if is_build && !self.router.is_browser() {
            bail!(ConfigError::Validation(
                "Next.js only support `browser` router mode.".into()
            ));
        }

        let mut diag = ConfigDiagnostics::new();

        self.router.validate(&mut diag);
        self.validate_alias(&mut diag);
        self.validate_roots(&mut diag);

        diag.print_warnings();

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    fn validate_alias(&self, diag: &mut ConfigDiagnostics) {
        for (name, target) in &self.alias {
            if !target.is_string() {
                diag.error(
                    Self::ALIAS,
                    format!("alias `{name}` must map to a directory path, got `{target}`"),
                );
            }
        }
    }

    fn validate_roots(&self, diag: &mut ConfigDiagnostics) {
        if self.source_root.is_absolute() {
            diag.error_with_hint(
                Self::SOURCE_ROOT,
                "must be relative to the project root",
                "sourceRoot = \"src\"",
            );
        }
        if self.output_root.is_absolute() {
            diag.error_with_hint(
                Self::OUTPUT_ROOT,
                "must be relative to the project root",
                "outputRoot = \"dist\"",
            );
        }
        if self.output_root == self.source_root {
            diag.error(Self::OUTPUT_ROOT, "must differ from `sourceRoot`");
        }
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> ProjectConfig {
    let (parsed, ignored) = ProjectConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Parsed config rooted at `root`.
#[cfg(test)]
pub fn test_config_at(root: &Path, content: &str) -> ProjectConfig {
    let mut config = test_parse_config(content);
    config.root = root.to_path_buf();
    config.config_path = root.join("taro-next.toml");
    config
}

// ============================================================================
// tests
// ============================================================================
