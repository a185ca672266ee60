//! Embedded frame element.

use std::fmt::Write;

use ce_renderer::escape_html;

/// Default accessible title of an embed frame.
pub const DEFAULT_TITLE: &str = "Compiler Explorer - mp-units (Headers)";

/// An `<iframe>` pointing at an embed URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub src: String,
    pub title: String,
    /// Height in pixels.
    pub height: u32,
}

impl Frame {
    #[must_use]
    pub fn new(src: impl Into<String>, title: impl Into<String>, height: u32) -> Self {
        Self {
            src: src.into(),
            title: title.into(),
            height,
        }
    }

    /// Inline style: full width, fixed height, light border with rounded corners.
    #[must_use]
    pub fn style(&self) -> String {
        format!(
            "width: 100%; height: {}px; border: 1px solid #ccc; border-radius: 6px;",
            self.height
        )
    }

    /// Render the frame as HTML. The frame loads lazily.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::with_capacity(self.src.len() + 160);
        write!(
            html,
            r#"<iframe src="{}" loading="lazy" title="{}" style="{}"></iframe>"#,
            escape_html(&self.src),
            escape_html(&self.title),
            self.style()
        )
        .unwrap();
        html
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_to_html() {
        let frame = Frame::new("https://godbolt.org/e?x=1#g:!()", DEFAULT_TITLE, 400);
        assert_eq!(
            frame.to_html(),
            r#"<iframe src="https://godbolt.org/e?x=1#g:!()" loading="lazy" title="Compiler Explorer - mp-units (Headers)" style="width: 100%; height: 400px; border: 1px solid #ccc; border-radius: 6px;"></iframe>"#
        );
    }

    #[test]
    fn test_src_quotes_escaped() {
        let frame = Frame::new("https://godbolt.org/e#source:'a!'b'&x", "t", 10);
        let html = frame.to_html();
        assert!(html.contains(r#"src="https://godbolt.org/e#source:&#x27;a!&#x27;b&#x27;&amp;x""#));
    }

    #[test]
    fn test_title_escaped() {
        let frame = Frame::new("u", r#"<"units">"#, 10);
        assert!(frame.to_html().contains(r#"title="&lt;&quot;units&quot;&gt;""#));
    }

    #[test]
    fn test_style_height() {
        assert_eq!(
            Frame::new("u", "t", 650).style(),
            "width: 100%; height: 650px; border: 1px solid #ccc; border-radius: 6px;"
        );
    }
}
