//! CLI command implementations.

pub(crate) mod link;
pub(crate) mod render;
pub(crate) mod rewrite;

use std::fs;
use std::path::{Path, PathBuf};

use ce_config::{CliSettings, Config};
use clap::Args;

pub(crate) use link::LinkArgs;
pub(crate) use render::RenderArgs;
pub(crate) use rewrite::RewriteArgs;

/// Configuration arguments shared by all commands.
#[derive(Args)]
pub(crate) struct EmbedArgs {
    /// Path to configuration file (default: auto-discover ce-embed.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Default compiler id (overrides config).
    #[arg(long)]
    compiler: Option<String>,

    /// Default compiler flags (overrides config).
    #[arg(long, allow_hyphen_values = true)]
    flags: Option<String>,

    /// Report the transformed block count even when it is zero.
    ///
    /// `CE_EMBED_DEBUG=1` or `CE_EMBED_DEBUG=true` has the same effect.
    #[arg(long)]
    debug: bool,
}

impl EmbedArgs {
    /// Load configuration with these arguments plus directory overrides.
    pub(crate) fn load(
        &self,
        source_dir: Option<PathBuf>,
        output_dir: Option<PathBuf>,
    ) -> Result<Config, ce_config::ConfigError> {
        let cli_settings = CliSettings {
            source_dir,
            output_dir,
            compiler: self.compiler.clone(),
            flags: self.flags.clone(),
            debug: self.debug.then_some(true),
        };
        Config::load(self.config.as_deref(), Some(&cli_settings))
    }
}

/// Write `content` to `path`, creating parent directories.
pub(crate) fn write_page(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}
