//! Compiler Explorer embeds for documentation code blocks.
//!
//! A code block whose first non-empty line starts with a directive marker is
//! turned into an `<iframe>` that opens the block in Compiler Explorer:
//!
//! ```text
//! // ce-embed height=400 compiler=gcc1510 flags="-std=c++20 -O2"
//! #include <mp-units/systems/si.h>
//! ...
//! ```
//!
//! The pure parts are [`Directive`] parsing, payload encoding
//! ([`encode_payload`]) and URL construction ([`build_url`]). Rewriting is
//! done by [`BlockRewriter`] over any [`HostDocument`]; two hosts ship with
//! the crate:
//!
//! - [`EmbedProcessor`] replaces blocks while Markdown is rendered by
//!   `ce_renderer::MarkdownRenderer`
//! - [`HtmlPage`] rewrites pages that were already rendered to HTML
//!
//! # Example
//!
//! ```
//! use ce_embed::{EmbedSettings, extract_embed};
//!
//! let block = "// ce-embed compiler=gcc1510\nint main() { return 0; }\n";
//! let embed = extract_embed(block, &EmbedSettings::default()).unwrap();
//!
//! assert_eq!(embed.directive.compiler, "gcc1510");
//! assert!(embed.url.contains("source:'int+main()+%7B+return+0%3B+%7D'"));
//! ```

mod directive;
mod encode;
mod frame;
mod html_page;
mod link;
mod processor;
mod rewriter;

pub use directive::{
    DEFAULT_COMPILER, DEFAULT_FLAGS, DEFAULT_HEIGHT, Directive, DirectiveWarning, ParsedDirective,
};
pub use encode::{encode_flags, encode_payload, normalize_source};
pub use frame::{DEFAULT_TITLE, Frame};
pub use html_page::{CodeElement, HtmlPage, PageError};
pub use link::{EMBED_ENDPOINT, build_url};
pub use processor::EmbedProcessor;
pub use rewriter::{BlockRewriter, DEFAULT_MARKER, Embed, EmbedSettings, HostDocument, extract_embed};
