//! Rewriting marked code blocks into embed frames.
//!
//! The rewriter never touches a concrete document model. A host supplies the
//! candidate code elements, their text and a way to replace an element's
//! block container, through [`HostDocument`]. [`extract_embed`] holds the
//! per-block logic and is usable on its own.

use crate::directive::{Directive, DirectiveWarning};
use crate::frame::{DEFAULT_TITLE, Frame};
use crate::link::build_url;

/// Default directive marker.
pub const DEFAULT_MARKER: &str = "// ce-embed";

/// Settings shared by every block of a rewrite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbedSettings {
    /// Prefix the first non-empty line must start with.
    pub marker: String,
    /// Values used for keys the directive leaves out.
    pub defaults: Directive,
    /// Accessible title of generated frames.
    pub title: String,
}

impl Default for EmbedSettings {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_owned(),
            defaults: Directive::default(),
            title: DEFAULT_TITLE.to_owned(),
        }
    }
}

/// A marked code block, ready to be embedded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Embed {
    pub directive: Directive,
    /// Block content after the directive line.
    pub code: String,
    pub url: String,
    pub warnings: Vec<DirectiveWarning>,
}

impl Embed {
    #[must_use]
    pub fn frame(&self, title: &str) -> Frame {
        Frame::new(self.url.clone(), title, self.directive.height)
    }
}

/// Extract an embed from the text content of a code block.
///
/// Returns `None` when the first non-blank line (after an optional byte order
/// mark and leading whitespace) does not start with the marker. Lines before
/// the directive are dropped; everything after it becomes the embedded code.
///
/// # Example
///
/// ```
/// use ce_embed::{EmbedSettings, extract_embed};
///
/// let text = "\n// ce-embed height=300\nint main() {}\n";
/// let embed = extract_embed(text, &EmbedSettings::default()).unwrap();
/// assert_eq!(embed.directive.height, 300);
/// assert_eq!(embed.code, "int main() {}\n");
///
/// assert!(extract_embed("int main() {}", &EmbedSettings::default()).is_none());
/// ```
#[must_use]
pub fn extract_embed(text: &str, settings: &EmbedSettings) -> Option<Embed> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let lines: Vec<&str> = text.split('\n').collect();

    let index = lines.iter().position(|line| !line.trim().is_empty())?;
    let attributes = lines[index].trim_start().strip_prefix(settings.marker.as_str())?;

    let parsed = Directive::parse_over(settings.defaults.clone(), attributes);
    let code = lines[index + 1..].join("\n");
    let url = build_url(&code, &parsed.directive.compiler, &parsed.directive.flags);

    Some(Embed {
        directive: parsed.directive,
        code,
        url,
        warnings: parsed.warnings,
    })
}

/// A document that holds code blocks which can be swapped for frames.
pub trait HostDocument {
    /// Handle to a candidate code element.
    type Element;

    /// Candidate code elements in document order.
    fn code_elements(&self) -> Vec<Self::Element>;

    /// Plain text content of an element.
    fn text_content(&self, element: &Self::Element) -> String;

    /// Replace the element's nearest block container with `frame`.
    ///
    /// Returns `false` when no container could be replaced.
    fn replace_with_frame(&mut self, element: &Self::Element, frame: &Frame) -> bool;
}

/// Rewrites every marked code block of a [`HostDocument`].
#[derive(Clone, Debug, Default)]
pub struct BlockRewriter {
    settings: EmbedSettings,
    debug: bool,
}

impl BlockRewriter {
    #[must_use]
    pub fn new(settings: EmbedSettings) -> Self {
        Self {
            settings,
            debug: false,
        }
    }

    /// Report the transformed block count even when it is zero.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &EmbedSettings {
        &self.settings
    }

    /// Replace every marked block and return how many were replaced.
    pub fn transform<D: HostDocument>(&self, document: &mut D) -> usize {
        let mut transformed = 0;

        for (index, element) in document.code_elements().iter().enumerate() {
            let text = document.text_content(element);
            let Some(embed) = extract_embed(&text, &self.settings) else {
                continue;
            };

            for warning in &embed.warnings {
                tracing::warn!(block = index, "{warning}");
            }

            let frame = embed.frame(&self.settings.title);
            if document.replace_with_frame(element, &frame) {
                tracing::debug!(
                    block = index,
                    height = embed.directive.height,
                    compiler = %embed.directive.compiler,
                    "Embedded code block"
                );
                transformed += 1;
            } else {
                tracing::debug!(block = index, "No container to replace");
            }
        }

        if transformed > 0 || self.debug {
            tracing::info!("transformed blocks: {transformed}");
        } else {
            tracing::debug!("transformed blocks: 0");
        }

        transformed
    }
}
