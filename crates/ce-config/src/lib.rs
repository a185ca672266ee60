//! Configuration management for ce-embed.
//!
//! Parses `ce-embed.toml` with serde and discovers it in the working directory
//! or its parents. CLI settings are applied during load via [`CliSettings`].
//!
//! ```toml
//! debug = false
//!
//! [embed]
//! marker = "// ce-embed"
//! compiler = "clang2110"
//! flags = "-std=c++23 -stdlib=libc++ -O3"
//! height = 650
//! title = "Compiler Explorer - mp-units (Headers)"
//!
//! [docs]
//! source_dir = "docs"
//! output_dir = "site"
//! exclude = ["drafts/**"]
//! ```
//!
//! ## Environment Variables
//!
//! Every `[embed]` string supports `${VAR}` and `${VAR:-default}` expansion.
//! `CE_EMBED_DEBUG=1` turns on `debug` regardless of the file.

mod expand;

use std::path::{Path, PathBuf};

use ce_embed::{
    DEFAULT_COMPILER, DEFAULT_FLAGS, DEFAULT_HEIGHT, DEFAULT_MARKER, DEFAULT_TITLE, Directive,
    EmbedSettings,
};
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "ce-embed.toml";

/// Environment variable that enables debug reporting.
pub const DEBUG_ENV_VAR: &str = "CE_EMBED_DEBUG";

/// CLI settings that override configuration file values.
///
/// Only `Some` values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub source_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub compiler: Option<String>,
    pub flags: Option<String>,
    pub debug: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Report the transformed block count even when nothing was embedded.
    pub debug: bool,
    /// Embed defaults.
    pub embed: EmbedConfig,
    /// Documentation paths as written in TOML.
    docs: DocsConfigRaw,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Embed defaults applied to every directive.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EmbedConfig {
    /// Prefix of the directive line.
    pub marker: String,
    pub compiler: String,
    pub flags: String,
    /// Frame height in pixels.
    pub height: u32,
    /// Accessible frame title.
    pub title: String,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_owned(),
            compiler: DEFAULT_COMPILER.to_owned(),
            flags: DEFAULT_FLAGS.to_owned(),
            height: DEFAULT_HEIGHT,
            title: DEFAULT_TITLE.to_owned(),
        }
    }
}

impl EmbedConfig {
    /// Settings for [`ce_embed::BlockRewriter`] and [`ce_embed::EmbedProcessor`].
    #[must_use]
    pub fn settings(&self) -> EmbedSettings {
        EmbedSettings {
            marker: self.marker.clone(),
            defaults: Directive {
                height: self.height,
                compiler: self.compiler.clone(),
                flags: self.flags.clone(),
            },
            title: self.title.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
    exclude: Option<Vec<String>>,
}

/// Resolved documentation paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Directory scanned for markdown sources.
    pub source_dir: PathBuf,
    /// Directory rendered pages are written to.
    pub output_dir: PathBuf,
    /// Glob patterns, relative to `source_dir`, of files to skip.
    pub exclude: Vec<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g. `embed.compiler`).
        field: String,
        /// Error message (e.g. `${CE_COMPILER} not set`).
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Whether an environment flag value means "on".
fn is_enabled(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("1" | "true"))
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `ce-embed.toml` in the current directory and its parents, falling
    /// back to defaults relative to the current directory.
    ///
    /// CLI settings are applied after loading and path resolution, and the
    /// result is validated again.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the merged configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if is_enabled(std::env::var(DEBUG_ENV_VAR).ok().as_deref()) {
            config.debug = true;
        }

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.docs_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(compiler) = &settings.compiler {
            self.embed.compiler.clone_from(compiler);
        }
        if let Some(flags) = &settings.flags {
            self.embed.flags.clone_from(flags);
        }
        if let Some(debug) = settings.debug {
            self.debug = debug;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Default config with paths relative to `base`.
    fn default_with_base(base: &Path) -> Self {
        Self {
            debug: false,
            embed: EmbedConfig::default(),
            docs: DocsConfigRaw::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                output_dir: base.join("site"),
                exclude: Vec::new(),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for an empty marker or compiler, a
    /// marker with leading whitespace, or a zero height.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.embed.marker, "embed.marker")?;
        // Lines are left-trimmed before the marker check.
        if self.embed.marker.starts_with(char::is_whitespace) {
            return Err(ConfigError::Validation(
                "embed.marker cannot start with whitespace".to_owned(),
            ));
        }
        require_non_empty(&self.embed.compiler, "embed.compiler")?;
        if self.embed.height == 0 {
            return Err(ConfigError::Validation(
                "embed.height must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let embed = &mut self.embed;
        embed.marker = expand::expand_env(&embed.marker, "embed.marker")?;
        embed.compiler = expand::expand_env(&embed.compiler, "embed.compiler")?;
        embed.flags = expand::expand_env(&embed.flags, "embed.flags")?;
        embed.title = expand::expand_env(&embed.title, "embed.title")?;
        Ok(())
    }

    /// Resolve docs paths against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
            output_dir: resolve(self.docs.output_dir.as_deref(), "site"),
            exclude: self.docs.exclude.clone().unwrap_or_default(),
        };
    }
}
