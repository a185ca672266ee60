//! CLI error types.

use ce_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Page(#[from] ce_embed::PageError),

    #[error("invalid exclude pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("{failed} of {total} pages failed")]
    PagesFailed { failed: usize, total: usize },

    #[error("{0}")]
    Validation(String),
}
