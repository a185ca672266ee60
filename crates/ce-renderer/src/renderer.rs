//! Markdown renderer.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};

use crate::code_block::{CodeBlockProcessor, ProcessResult, fence_language};

/// Result of rendering a markdown document.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML fragment.
    pub html: String,
    /// Warnings reported by code block processors during this render.
    pub warnings: Vec<String>,
    /// Number of code blocks replaced by a processor.
    pub replaced_blocks: usize,
}

/// Markdown to HTML renderer.
///
/// Code blocks are offered to processors in registration order before the
/// HTML writer sees them; see [`with_processor`](Self::with_processor). A
/// renderer can be reused: every call to
/// [`render_markdown`](Self::render_markdown) reports only its own warnings
/// and replacements.
#[derive(Default)]
pub struct MarkdownRenderer {
    processors: Vec<Box<dyn CodeBlockProcessor>>,
}

impl MarkdownRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a code block processor.
    ///
    /// The first processor returning a non-`PassThrough` result for a block
    /// wins; later processors never see that block.
    #[must_use]
    pub fn with_processor<P: CodeBlockProcessor + 'static>(mut self, processor: P) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    /// Parse and render markdown text with tables, strikethrough and task lists.
    pub fn render_markdown(&mut self, markdown: &str) -> RenderResult {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;

        let mut events = Vec::new();
        let mut block: Option<(CodeBlockKind<'_>, String)> = None;
        let mut index = 0;
        let mut replaced_blocks = 0;

        for event in Parser::new_ext(markdown, options) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => block = Some((kind, String::new())),
                Event::Text(text) => match &mut block {
                    Some((_, content)) => content.push_str(&text),
                    None => events.push(Event::Text(text)),
                },
                Event::End(TagEnd::CodeBlock) => {
                    let Some((kind, content)) = block.take() else {
                        continue;
                    };
                    let language = match &kind {
                        CodeBlockKind::Fenced(info) => fence_language(info),
                        CodeBlockKind::Indented => "",
                    };

                    match self.offer(language, &content, index) {
                        Some(replacement) => {
                            replaced_blocks += 1;
                            events.push(Event::Html(CowStr::from(replacement)));
                        }
                        None => {
                            events.push(Event::Start(Tag::CodeBlock(kind)));
                            events.push(Event::Text(CowStr::from(content)));
                            events.push(Event::End(TagEnd::CodeBlock));
                        }
                    }
                    index += 1;
                }
                other => events.push(other),
            }
        }

        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, events.into_iter());

        RenderResult {
            html: output,
            warnings: self
                .processors
                .iter_mut()
                .flat_map(|p| p.take_warnings())
                .collect(),
            replaced_blocks,
        }
    }

    /// Offer a finished block to processors; `None` when nobody claims it.
    fn offer(&mut self, language: &str, content: &str, index: usize) -> Option<String> {
        self.processors.iter_mut().find_map(|processor| {
            match processor.process(language, content, index) {
                ProcessResult::Inline(html) => Some(html),
                ProcessResult::PassThrough => None,
            }
        })
    }
}
