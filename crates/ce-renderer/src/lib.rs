//! Markdown rendering with pluggable code block processors.
//!
//! [`MarkdownRenderer`] hands `pulldown-cmark` events to its HTML writer.
//! Fenced and indented code blocks are first offered to the registered
//! [`CodeBlockProcessor`]s, which is how embeds replace marked blocks before
//! they ever reach the page.
//!
//! # Example
//!
//! ```
//! use ce_renderer::MarkdownRenderer;
//!
//! let result = MarkdownRenderer::new().render_markdown("# Units\n\nSome *text*.");
//!
//! assert!(result.html.contains("<em>text</em>"));
//! assert_eq!(result.replaced_blocks, 0);
//! ```

mod code_block;
mod html;
mod renderer;

pub use code_block::{CodeBlockProcessor, ProcessResult};
pub use html::escape_html;
pub use renderer::{MarkdownRenderer, RenderResult};
