//! Code block processor that embeds marked blocks while rendering Markdown.
//!
//! [`EmbedProcessor`] plugs into [`MarkdownRenderer`](ce_renderer::MarkdownRenderer):
//! every code block, fenced or indented, with or without a language, is
//! checked for the directive marker. Marked blocks are replaced by the frame
//! HTML, `<pre>` container included.

use ce_renderer::{CodeBlockProcessor, ProcessResult};

use crate::rewriter::{EmbedSettings, extract_embed};

/// Replaces marked code blocks with embed frames during rendering.
///
/// # Example
///
/// ```
/// use ce_embed::{EmbedProcessor, EmbedSettings};
/// use ce_renderer::MarkdownRenderer;
///
/// let markdown = "```cpp\n// ce-embed height=300\nint main() {}\n```\n";
/// let result = MarkdownRenderer::new()
///     .with_processor(EmbedProcessor::new(EmbedSettings::default()))
///     .render_markdown(markdown);
///
/// assert!(result.html.starts_with("<iframe src=\"https://godbolt.org/e?"));
/// assert_eq!(result.replaced_blocks, 1);
/// ```
#[derive(Default)]
pub struct EmbedProcessor {
    settings: EmbedSettings,
    warnings: Vec<String>,
}

impl EmbedProcessor {
    #[must_use]
    pub fn new(settings: EmbedSettings) -> Self {
        Self {
            settings,
            warnings: Vec::new(),
        }
    }
}

impl CodeBlockProcessor for EmbedProcessor {
    fn process(&mut self, _language: &str, source: &str, index: usize) -> ProcessResult {
        let Some(embed) = extract_embed(source, &self.settings) else {
            return ProcessResult::PassThrough;
        };

        self.warnings.extend(
            embed
                .warnings
                .iter()
                .map(|warning| format!("code block {index}: {warning}")),
        );
        tracing::debug!(
            block = index,
            height = embed.directive.height,
            compiler = %embed.directive.compiler,
            "Embedded code block"
        );

        ProcessResult::Inline(embed.frame(&self.settings.title).to_html())
    }

    fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use ce_renderer::MarkdownRenderer;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::directive::DEFAULT_FLAGS;
    use crate::frame::{DEFAULT_TITLE, Frame};
    use crate::link::build_url;

    #[test]
    fn test_process_marked_block() {
        let mut processor = EmbedProcessor::default();
        let source = "// ce-embed height=480\n#include <mp-units/systems/si.h>\n";

        let result = processor.process("cpp", source, 0);

        let url = build_url("#include <mp-units/systems/si.h>\n", "clang2110", DEFAULT_FLAGS);
        assert_eq!(
            result,
            ProcessResult::Inline(Frame::new(url, DEFAULT_TITLE, 480).to_html())
        );
        assert!(processor.take_warnings().is_empty());
    }

    #[test]
    fn test_process_unmarked_block() {
        let mut processor = EmbedProcessor::default();
        let result = processor.process("cpp", "int main() {}\n", 0);
        assert_eq!(result, ProcessResult::PassThrough);
    }

    #[test]
    fn test_process_ignores_language() {
        let mut processor = EmbedProcessor::default();
        let result = processor.process("", "// ce-embed\nx\n", 3);
        assert!(matches!(result, ProcessResult::Inline(_)));
    }

    #[test]
    fn test_process_collects_warnings() {
        let mut processor = EmbedProcessor::default();
        processor.process("cpp", "// ce-embed height=big\nx\n", 2);
        assert_eq!(
            processor.take_warnings(),
            ["code block 2: invalid height 'big', keeping 650".to_owned()]
        );
        assert!(processor.take_warnings().is_empty());
    }

    #[test]
    fn test_render_page() {
        let markdown = "\
# Speed

```cpp
// ce-embed compiler=gcc1510
auto v = 1 * m / s;
```

```cpp
auto plain = 42;
```

    // ce-embed height=200
    int indented;
";
        let result = MarkdownRenderer::new()
            .with_processor(EmbedProcessor::default())
            .render_markdown(markdown);

        assert_eq!(result.replaced_blocks, 2);
        assert_eq!(result.html.matches("<iframe ").count(), 2);
        assert!(result.html.contains("compiler:gcc1510,"));
        assert!(result.html.contains("height: 200px;"));
        assert!(result.html.contains(r#"<code class="language-cpp">auto plain = 42;"#));
        assert!(!result.html.contains("ce-embed"));
    }

    #[test]
    fn test_reused_renderer_does_not_repeat_warnings() {
        let mut renderer = MarkdownRenderer::new().with_processor(EmbedProcessor::default());

        let first = renderer.render_markdown("```cpp\n// ce-embed height=0\nx\n```\n");
        let second = renderer.render_markdown("```cpp\n// ce-embed\ny\n```\n");

        assert_eq!(first.warnings.len(), 1);
        assert!(second.warnings.is_empty());
        assert_eq!(second.replaced_blocks, 1);
    }

    #[test]
    fn test_render_reports_warnings() {
        let result = MarkdownRenderer::new()
            .with_processor(EmbedProcessor::default())
            .render_markdown("```cpp\n// ce-embed height=0\nx\n```\n");
        assert_eq!(result.warnings.len(), 1);
        assert!(result.html.contains("height: 650px;"));
    }
}
