//! `ce link` command implementation.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use ce_embed::{EmbedSettings, Frame, build_url, extract_embed};
use clap::Args;

use super::EmbedArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the link command.
#[derive(Args)]
pub(crate) struct LinkArgs {
    /// Source file (default: read stdin).
    file: Option<PathBuf>,

    /// Print the `<iframe>` element instead of the bare URL.
    #[arg(long)]
    frame: bool,

    #[command(flatten)]
    embed: EmbedArgs,
}

impl LinkArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.embed.load(None, None)?;

        let source = match &self.file {
            Some(path) => fs::read_to_string(path)?,
            None => {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                buffer
            }
        };

        let frame = link_frame(&source, &config.embed.settings());
        if self.frame {
            output.result(&frame.to_html())?;
        } else {
            output.result(&frame.src)?;
        }
        Ok(())
    }
}

/// Frame for a whole source file.
///
/// A leading directive line is honored and dropped from the code; otherwise
/// the configured defaults apply and the file is embedded as-is.
fn link_frame(source: &str, settings: &EmbedSettings) -> Frame {
    if let Some(embed) = extract_embed(source, settings) {
        for warning in &embed.warnings {
            tracing::warn!("{warning}");
        }
        return embed.frame(&settings.title);
    }

    let defaults = &settings.defaults;
    let url = build_url(source, &defaults.compiler, &defaults.flags);
    Frame::new(url, settings.title.as_str(), defaults.height)
}
