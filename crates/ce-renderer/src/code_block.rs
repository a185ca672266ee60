//! Hooks for replacing code blocks during rendering.
//!
//! Processors are registered on the renderer and offered every code block in
//! document order. The first processor that returns something other than
//! [`ProcessResult::PassThrough`] owns the block; unclaimed blocks are written
//! as ordinary `<pre><code>` markup.
//!
//! # Example
//!
//! ```
//! use ce_renderer::{CodeBlockProcessor, ProcessResult};
//!
//! struct Shout;
//!
//! impl CodeBlockProcessor for Shout {
//!     fn process(&mut self, language: &str, source: &str, _index: usize) -> ProcessResult {
//!         if language == "shout" {
//!             ProcessResult::Inline(format!("<p>{}</p>", source.to_uppercase()))
//!         } else {
//!             ProcessResult::PassThrough
//!         }
//!     }
//! }
//! ```

/// Outcome of offering a code block to a processor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessResult {
    /// Replace the whole block (including its `<pre>` container) with this HTML.
    Inline(String),
    /// Leave the block to the next processor or the HTML writer.
    PassThrough,
}

/// A processor for special code blocks.
pub trait CodeBlockProcessor {
    /// Inspect a code block and decide whether to replace it.
    ///
    /// # Arguments
    ///
    /// * `language` - First word of the fence info string, empty when absent
    /// * `source` - Raw block content, including its trailing newline
    /// * `index` - Zero-based position of the block in the document
    fn process(&mut self, language: &str, source: &str, index: usize) -> ProcessResult;

    /// Drain warnings collected since the last call.
    fn take_warnings(&mut self) -> Vec<String> {
        Vec::new()
    }
}

/// Language part of a fence info string.
pub(crate) fn fence_language(info: &str) -> &str {
    info.split_whitespace().next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_language() {
        assert_eq!(fence_language("cpp"), "cpp");
        assert_eq!(fence_language("cpp title=\"units.cpp\""), "cpp");
        assert_eq!(fence_language("   "), "");
    }

    #[test]
    fn test_default_warnings_empty() {
        struct Noop;

        impl CodeBlockProcessor for Noop {
            fn process(&mut self, _language: &str, _source: &str, _index: usize) -> ProcessResult {
                ProcessResult::PassThrough
            }
        }

        assert!(Noop.take_warnings().is_empty());
    }
}
