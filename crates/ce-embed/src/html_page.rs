//! Host document over already-rendered HTML.
//!
//! Candidate elements are matched with the `pre code` selector by a streaming
//! HTML rewriter, so markup inside comments, `<script>` bodies and attribute
//! values is never mistaken for a code block. A frame replaces the closest
//! `div.highlight`, `pre` or `figure` ancestor of the matched element.
//!
//! Parsing runs once in [`HtmlPage::parse`], which tags every block container
//! with a slot attribute. [`HtmlPage::into_html`] runs a second pass that swaps
//! the chosen slots for frames and strips the tags from the rest.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use lol_html::html_content::ContentType;
use lol_html::{RewriteStrSettings, doc_text, element, rewrite_str};

use crate::frame::Frame;
use crate::rewriter::HostDocument;

/// Selectors a frame may replace, nearest ancestor first.
const CONTAINER_SELECTORS: [&str; 3] = ["div.highlight", "pre", "figure"];

/// Attribute tagging block containers between the two passes.
const SLOT_ATTR: &str = "data-ce-embed-slot";

/// Error from the HTML rewriter.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("HTML rewriting failed: {0}")]
    Rewrite(#[from] lol_html::errors::RewritingError),
}

/// A `pre code` element found in the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodeElement {
    /// Position among the page's code elements.
    index: usize,
    /// Slot of the closest block container.
    container: Option<usize>,
}

/// State shared by the first-pass handlers.
#[derive(Default)]
struct Scan {
    next_slot: usize,
    open: Vec<usize>,
    elements: Vec<CodeElement>,
    texts: Vec<String>,
    capturing: Option<usize>,
}

/// An HTML page whose code blocks can be swapped for embed frames.
///
/// Replacements are recorded by [`HostDocument::replace_with_frame`] and
/// applied by [`into_html`](Self::into_html).
///
/// # Example
///
/// ```
/// use ce_embed::{BlockRewriter, EmbedSettings, HtmlPage};
///
/// let mut page = HtmlPage::parse(
///     "<p>Try it:</p><pre><code>// ce-embed height=300\nint main() {}\n</code></pre>",
/// )
/// .unwrap();
/// let count = BlockRewriter::new(EmbedSettings::default()).transform(&mut page);
///
/// assert_eq!(count, 1);
/// assert!(page.into_html().unwrap().starts_with("<p>Try it:</p><iframe "));
/// ```
#[derive(Clone, Debug)]
pub struct HtmlPage {
    source: String,
    tagged: String,
    elements: Vec<CodeElement>,
    texts: Vec<String>,
    replacements: HashMap<usize, String>,
}

impl HtmlPage {
    /// Parse `html` and collect its `pre code` elements.
    pub fn parse(html: impl Into<String>) -> Result<Self, PageError> {
        let source = html.into();
        let scan = Rc::new(RefCell::new(Scan::default()));

        let mut element_handlers = Vec::new();
        for selector in CONTAINER_SELECTORS {
            let scan = Rc::clone(&scan);
            element_handlers.push(element!(selector, move |el| {
                let slot = {
                    let mut state = scan.borrow_mut();
                    let slot = state.next_slot;
                    state.next_slot += 1;
                    slot
                };
                el.set_attribute(SLOT_ATTR, &slot.to_string())?;

                if let Some(handlers) = el.end_tag_handlers() {
                    scan.borrow_mut().open.push(slot);
                    let scan = Rc::clone(&scan);
                    handlers.push(Box::new(move |_end: &mut lol_html::html_content::EndTag<'_>| {
                        let mut state = scan.borrow_mut();
                        if let Some(pos) = state.open.iter().rposition(|&open| open == slot) {
                            state.open.truncate(pos);
                        }
                        Ok(())
                    }) as lol_html::EndTagHandler<'static>);
                }
                Ok(())
            }));
        }

        let code_scan = Rc::clone(&scan);
        element_handlers.push(element!("pre code", move |el| {
            let mut state = code_scan.borrow_mut();
            // Nested matches belong to the outer element's text.
            if state.capturing.is_some() {
                return Ok(());
            }
            let index = state.elements.len();
            let container = state.open.last().copied();
            state.elements.push(CodeElement { index, container });
            state.texts.push(String::new());
            drop(state);

            if let Some(handlers) = el.end_tag_handlers() {
                code_scan.borrow_mut().capturing = Some(index);
                let scan = Rc::clone(&code_scan);
                handlers.push(Box::new(move |_end: &mut lol_html::html_content::EndTag<'_>| {
                    scan.borrow_mut().capturing = None;
                    Ok(())
                }) as lol_html::EndTagHandler<'static>);
            }
            Ok(())
        }));

        let text_scan = Rc::clone(&scan);
        let document_handlers = vec![doc_text!(move |chunk| {
            let mut state = text_scan.borrow_mut();
            if let Some(index) = state.capturing
                && let Some(text) = state.texts.get_mut(index)
            {
                text.push_str(chunk.as_str());
            }
            Ok(())
        })];

        let tagged = rewrite_str(
            &source,
            RewriteStrSettings {
                element_content_handlers: element_handlers,
                document_content_handlers: document_handlers,
                ..RewriteStrSettings::new()
            },
        )?;

        let scan = scan.take();
        Ok(Self {
            source,
            tagged,
            elements: scan.elements,
            texts: scan.texts,
            replacements: HashMap::new(),
        })
    }

    /// Number of recorded replacements.
    #[must_use]
    pub fn replacement_count(&self) -> usize {
        self.replacements.len()
    }

    /// Apply recorded replacements and return the page source.
    ///
    /// A page without replacements comes back byte for byte.
    pub fn into_html(self) -> Result<String, PageError> {
        if self.replacements.is_empty() {
            return Ok(self.source);
        }

        let replacements = &self.replacements;
        let selector = format!("[{SLOT_ATTR}]");
        let html = rewrite_str(
            &self.tagged,
            RewriteStrSettings {
                element_content_handlers: vec![element!(selector, |el| {
                    let slot = el.get_attribute(SLOT_ATTR);
                    el.remove_attribute(SLOT_ATTR);
                    let frame = slot
                        .and_then(|slot| slot.parse::<usize>().ok())
                        .and_then(|slot| replacements.get(&slot));
                    if let Some(frame) = frame {
                        el.replace(frame, ContentType::Html);
                    }
                    Ok(())
                })],
                ..RewriteStrSettings::new()
            },
        )?;
        Ok(html)
    }
}

impl HostDocument for HtmlPage {
    type Element = CodeElement;

    fn code_elements(&self) -> Vec<CodeElement> {
        self.elements.clone()
    }

    fn text_content(&self, element: &CodeElement) -> String {
        self.texts
            .get(element.index)
            .map(|text| html_escape::decode_html_entities(text).into_owned())
            .unwrap_or_default()
    }

    fn replace_with_frame(&mut self, element: &CodeElement, frame: &Frame) -> bool {
        let Some(slot) = element.container else {
            return false;
        };
        if self.replacements.contains_key(&slot) {
            return false;
        }
        self.replacements.insert(slot, frame.to_html());
        true
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::frame::DEFAULT_TITLE;
    use crate::rewriter::BlockRewriter;

    fn texts(page: &HtmlPage) -> Vec<String> {
        page.code_elements()
            .iter()
            .map(|e| page.text_content(e))
            .collect()
    }

    fn rewrite(html: &str) -> (usize, String) {
        let mut page = HtmlPage::parse(html).unwrap();
        let count = BlockRewriter::default().transform(&mut page);
        (count, page.into_html().unwrap())
    }

    #[test]
    fn test_code_elements() {
        let page = HtmlPage::parse(
            r#"<pre class="x"><code>one</code></pre><p><code>inline</code></p><pre>no code</pre><PRE><CODE class="language-cpp">two</CODE></PRE>"#,
        )
        .unwrap();
        assert_eq!(texts(&page), ["one", "two"]);
    }

    #[test]
    fn test_text_content_strips_tags_and_decodes() {
        let page = HtmlPage::parse(
            r#"<pre><code><span class="c1">// ce-embed flags=&quot;-O2 -Wall&quot;</span>
<span class="cp">#include</span> &lt;mp-units/systems/si.h&gt;
auto x = a &amp;&amp; b;&#39;</code></pre>"#,
        )
        .unwrap();
        assert_eq!(
            texts(&page),
            ["// ce-embed flags=\"-O2 -Wall\"\n#include <mp-units/systems/si.h>\nauto x = a && b;'"]
        );
    }

    #[test]
    fn test_comments_and_scripts_ignored() {
        let html = "<!-- <pre><code>// ce-embed\nx</code></pre> -->\
<script>let s = '<pre><code>// ce-embed\ny</code></pre>';</script>";
        let (count, output) = rewrite(html);
        assert_eq!(count, 0);
        assert_eq!(output, html);
    }

    #[test]
    fn test_attribute_values_ignored() {
        let html = r#"<p title="<pre><code>// ce-embed</code></pre>">x</p>"#;
        let page = HtmlPage::parse(html).unwrap();
        assert!(page.code_elements().is_empty());
    }

    #[test]
    fn test_highlight_wrapper_keeps_div() {
        let html = r#"<div class="highlight"><pre><span></span><code>// ce-embed height=320
int main() {}
</code></pre></div>"#;
        let (count, output) = rewrite(html);

        assert_eq!(count, 1);
        assert!(output.starts_with(r#"<div class="highlight"><iframe src=""#));
        assert!(output.ends_with("</iframe></div>"));
        assert!(output.contains("height: 320px;"));
        assert!(output.contains(DEFAULT_TITLE));
        assert!(!output.contains(SLOT_ATTR));
    }

    #[test]
    fn test_figure_inside_pre_is_closest() {
        let html = "<pre><figure><code>// ce-embed\nx</code></figure></pre>";
        let (count, output) = rewrite(html);
        assert_eq!(count, 1);
        assert!(output.starts_with("<pre><iframe "));
        assert!(output.ends_with("</iframe></pre>"));
    }

    #[test]
    fn test_unmarked_blocks_untouched() {
        let html = "<h1>Units</h1><pre class=x><code>int x;</code></pre>";
        let (count, output) = rewrite(html);
        assert_eq!(count, 0);
        assert_eq!(output, html);
    }

    #[test]
    fn test_multiple_blocks_in_order() {
        let html = "<pre><code>// ce-embed height=100\na</code></pre>\
<p>between</p>\
<pre><code>plain</code></pre>\
<pre><code>\n// ce-embed height=200\nb</code></pre>";
        let mut page = HtmlPage::parse(html).unwrap();

        assert_eq!(BlockRewriter::default().transform(&mut page), 2);
        assert_eq!(page.replacement_count(), 2);

        let output = page.into_html().unwrap();
        let first = output.find("height: 100px").unwrap();
        let between = output.find("<p>between</p>").unwrap();
        let second = output.find("height: 200px").unwrap();
        assert!(first < between && between < second);
        assert!(output.contains("<pre><code>plain</code></pre>"));
    }

    #[test]
    fn test_frame_matches_direct_build() {
        let (_, output) = rewrite("<pre><code>// ce-embed\nint a = 1 &lt; 2;\n</code></pre>");

        let url = crate::build_url("int a = 1 < 2;\n", "clang2110", crate::directive::DEFAULT_FLAGS);
        let expected = Frame::new(url, DEFAULT_TITLE, 650).to_html();
        assert_eq!(output, expected);
    }

    #[test]
    fn test_replace_same_container_once() {
        let mut page = HtmlPage::parse("<pre><code>x</code></pre>").unwrap();
        let element = page.code_elements().remove(0);
        let frame = Frame::new("u", "t", 1);

        assert!(page.replace_with_frame(&element, &frame));
        assert!(!page.replace_with_frame(&element, &frame));
    }
}
