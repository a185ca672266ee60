//! `ce render` command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use ce_embed::{EmbedProcessor, EmbedSettings};
use ce_renderer::{MarkdownRenderer, RenderResult};
use clap::Args;

use super::{EmbedArgs, write_page};
use crate::error::CliError;
use crate::output::Output;
use crate::scanner::Scanner;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory for rendered pages (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    #[command(flatten)]
    embed: EmbedArgs,
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.embed.load(self.source_dir, self.output_dir)?;
        let docs = &config.docs_resolved;

        output.info(&format!("Source: {}", docs.source_dir.display()));
        output.info(&format!("Output: {}", docs.output_dir.display()));

        let scanner = Scanner::new(docs.source_dir.clone(), "md").with_exclude(&docs.exclude)?;
        let pages = scanner.scan();
        if pages.is_empty() {
            output.warning("No markdown pages found");
            return Ok(());
        }

        let settings = config.embed.settings();
        let mut failed = 0;
        let mut embedded = 0;

        for page in &pages {
            let source = scanner.root().join(page);
            let target = docs.output_dir.join(page).with_extension("html");

            match render_page(&source, &target, &settings) {
                Ok(result) => {
                    for warning in &result.warnings {
                        tracing::warn!(page = %page.display(), "{warning}");
                    }
                    if result.replaced_blocks > 0 || config.debug {
                        tracing::info!(
                            page = %page.display(),
                            "transformed blocks: {}",
                            result.replaced_blocks
                        );
                    }
                    embedded += result.replaced_blocks;
                }
                Err(e) => {
                    tracing::error!(page = %page.display(), error = %e, "Failed to render page");
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            return Err(CliError::PagesFailed {
                failed,
                total: pages.len(),
            });
        }

        output.success(&format!(
            "Rendered {} pages ({embedded} embeds) to {}",
            pages.len(),
            docs.output_dir.display()
        ));
        Ok(())
    }
}

/// Render one markdown file to an HTML fragment.
fn render_page(
    source: &Path,
    target: &Path,
    settings: &EmbedSettings,
) -> Result<RenderResult, CliError> {
    let markdown = fs::read_to_string(source)?;
    let result = MarkdownRenderer::new()
        .with_processor(EmbedProcessor::new(settings.clone()))
        .render_markdown(&markdown);

    write_page(target, &result.html)?;
    Ok(result)
}
