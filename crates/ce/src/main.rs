//! ce CLI - Compiler Explorer embeds for documentation.
//!
//! Provides commands for:
//! - `render`: Render markdown pages to HTML, embedding marked code blocks
//! - `rewrite`: Embed marked code blocks in already-rendered HTML pages
//! - `link`: Print the embed URL for a source file

mod commands;
mod error;
mod output;
mod scanner;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{LinkArgs, RenderArgs, RewriteArgs};
use output::Output;

/// ce - Compiler Explorer embeds for documentation.
#[derive(Parser)]
#[command(name = "ce", version, about)]
struct Cli {
    /// Enable info-level logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render markdown pages, embedding marked code blocks.
    Render(RenderArgs),
    /// Embed marked code blocks in rendered HTML pages.
    Rewrite(RewriteArgs),
    /// Print the embed URL for a source file or stdin.
    Link(LinkArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise RUST_LOG decides
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Rewrite(args) => args.execute(),
        Commands::Link(args) => args.execute(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.error(&format!("Error: {err}"));
            ExitCode::FAILURE
        }
    }
}
