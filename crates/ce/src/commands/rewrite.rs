//! `ce rewrite` command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use ce_embed::{BlockRewriter, HtmlPage};
use clap::Args;

use super::{EmbedArgs, write_page};
use crate::error::CliError;
use crate::output::Output;
use crate::scanner::Scanner;

/// Arguments for the rewrite command.
#[derive(Args)]
pub(crate) struct RewriteArgs {
    /// HTML files or directories of HTML files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Write rewritten pages here instead of in place.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    #[command(flatten)]
    embed: EmbedArgs,
}

/// A page to rewrite and where the result goes.
#[derive(Debug, PartialEq, Eq)]
struct PageJob {
    source: PathBuf,
    target: PathBuf,
}

impl RewriteArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.embed.load(None, None)?;

        let jobs = collect_jobs(
            &self.inputs,
            self.output_dir.as_deref(),
            &config.docs_resolved.exclude,
        )?;
        if jobs.is_empty() {
            output.warning("No HTML pages found");
            return Ok(());
        }

        let rewriter = BlockRewriter::new(config.embed.settings()).with_debug(config.debug);
        let mut failed = 0;
        let mut embedded = 0;

        for job in &jobs {
            let _span = tracing::info_span!("page", path = %job.source.display()).entered();
            match rewrite_page(&rewriter, job) {
                Ok(count) => embedded += count,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to rewrite page");
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            return Err(CliError::PagesFailed {
                failed,
                total: jobs.len(),
            });
        }

        output.success(&format!("Rewrote {} pages ({embedded} embeds)", jobs.len()));
        Ok(())
    }
}

/// Expand inputs into page jobs.
///
/// Directories are scanned for `.html` files (honoring `exclude`); their
/// pages keep their relative path under `output_dir`. Files land directly in
/// `output_dir`. Without an output directory pages are rewritten in place.
fn collect_jobs(
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
    exclude: &[String],
) -> Result<Vec<PageJob>, CliError> {
    let mut jobs = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let scanner = Scanner::new(input.clone(), "html").with_exclude(exclude)?;
            for page in scanner.scan() {
                let source = input.join(&page);
                let target = output_dir.map_or_else(|| source.clone(), |dir| dir.join(&page));
                jobs.push(PageJob { source, target });
            }
        } else if input.is_file() {
            let target = match (output_dir, input.file_name()) {
                (Some(dir), Some(name)) => dir.join(name),
                _ => input.clone(),
            };
            jobs.push(PageJob {
                source: input.clone(),
                target,
            });
        } else {
            return Err(CliError::Validation(format!(
                "{} does not exist",
                input.display()
            )));
        }
    }

    Ok(jobs)
}

fn rewrite_page(rewriter: &BlockRewriter, job: &PageJob) -> Result<usize, CliError> {
    let html = fs::read_to_string(&job.source)?;
    let mut page = HtmlPage::parse(html)?;
    let count = rewriter.transform(&mut page);

    // Untouched in-place pages are not rewritten.
    if count > 0 || job.source != job.target {
        write_page(&job.target, &page.into_html()?)?;
    }
    Ok(count)
}
