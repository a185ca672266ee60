//! Directive line parsing.
//!
//! A directive is the first non-empty line of a marked code block:
//!
//! ```text
//! // ce-embed height=400 compiler=gcc1510 flags="-std=c++20 -O2"
//! ```
//!
//! Values are bare tokens or single/double-quoted strings that may contain
//! whitespace. Unknown keys are ignored, later keys override earlier ones and
//! malformed heights fall back to the previous value, so parsing never fails.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Default frame height in pixels.
pub const DEFAULT_HEIGHT: u32 = 650;

/// Default Compiler Explorer compiler id.
pub const DEFAULT_COMPILER: &str = "clang2110";

/// Default compiler flags.
pub const DEFAULT_FLAGS: &str = "-std=c++23 -stdlib=libc++ -O3";

/// `key=value`, `key="value"` or `key='value'`.
static ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z0-9_]+)=("[^"]*"|'[^']*'|\S+)"#).unwrap()
});

/// Embed attributes carried by a directive line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directive {
    /// Frame height in pixels.
    pub height: u32,
    /// Compiler id, passed to the service verbatim.
    pub compiler: String,
    /// Compiler flags, passed to the service verbatim.
    pub flags: String,
}

impl Default for Directive {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT,
            compiler: DEFAULT_COMPILER.to_owned(),
            flags: DEFAULT_FLAGS.to_owned(),
        }
    }
}

/// A recoverable problem found while parsing a directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DirectiveWarning {
    /// `height` was not a positive integer; the previous value was kept.
    InvalidHeight {
        /// The rejected value, unquoted.
        value: String,
        /// The height that stayed in effect.
        kept: u32,
    },
}

impl fmt::Display for DirectiveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHeight { value, kept } => {
                write!(f, "invalid height '{value}', keeping {kept}")
            }
        }
    }
}

/// Directive plus the warnings produced while parsing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedDirective {
    pub directive: Directive,
    pub warnings: Vec<DirectiveWarning>,
}

impl Directive {
    /// Parse a directive over the built-in defaults.
    ///
    /// # Example
    ///
    /// ```
    /// use ce_embed::Directive;
    ///
    /// let directive = Directive::parse(r#"ce-embed height=400 flags="-O2 -Wall""#);
    /// assert_eq!(directive.height, 400);
    /// assert_eq!(directive.compiler, "clang2110");
    /// assert_eq!(directive.flags, "-O2 -Wall");
    /// ```
    #[must_use]
    pub fn parse(line: &str) -> Self {
        Self::parse_over(Self::default(), line).directive
    }

    /// Parse a directive on top of `base`, reporting rejected values.
    ///
    /// Keys missing from `line` keep the value they have in `base`.
    #[must_use]
    pub fn parse_over(base: Self, line: &str) -> ParsedDirective {
        let mut directive = base;
        let mut warnings = Vec::new();

        for captures in ATTRIBUTE_RE.captures_iter(line) {
            let key = &captures[1];
            let value = unquote(&captures[2]);

            match key {
                "height" => match parse_height(value) {
                    Some(height) => directive.height = height,
                    None => warnings.push(DirectiveWarning::InvalidHeight {
                        value: value.to_owned(),
                        kept: directive.height,
                    }),
                },
                "compiler" => value.clone_into(&mut directive.compiler),
                "flags" => value.clone_into(&mut directive.flags),
                _ => tracing::trace!(key, "Ignoring unknown directive key"),
            }
        }

        ParsedDirective {
            directive,
            warnings,
        }
    }
}

/// Strip one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(b'"'), Some(b'"')) | (Some(b'\''), Some(b'\'')) if value.len() >= 2 => {
            &value[1..value.len() - 1]
        }
        _ => value,
    }
}

/// Read a positive base-10 integer prefix.
///
/// Leading whitespace and a `+` sign are accepted and trailing garbage is
/// ignored (`"400px"` is 400). Zero, negative, overflowing or digit-less
/// input yields `None`.
fn parse_height(value: &str) -> Option<u32> {
    let value = value.trim_start();
    if value.starts_with('-') {
        return None;
    }
    let value = value.strip_prefix('+').unwrap_or(value);
    let digits_end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());

    value[..digits_end]
        .parse::<u32>()
        .ok()
        .filter(|height| *height > 0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_all_keys() {
        let directive = Directive::parse(r#"ce-embed height=400 compiler=gcc123 flags="-O2 -Wall""#);
        assert_eq!(
            directive,
            Directive {
                height: 400,
                compiler: "gcc123".to_owned(),
                flags: "-O2 -Wall".to_owned(),
            }
        );
    }

    #[test]
    fn test_parse_no_attributes_gives_defaults() {
        assert_eq!(Directive::parse("ce-embed"), Directive::default());
        assert_eq!(Directive::parse(""), Directive::default());
    }

    #[test]
    fn test_defaults() {
        let directive = Directive::default();
        assert_eq!(directive.height, 650);
        assert_eq!(directive.compiler, "clang2110");
        assert_eq!(directive.flags, "-std=c++23 -stdlib=libc++ -O3");
    }

    #[test]
    fn test_invalid_height_keeps_default() {
        assert_eq!(Directive::parse("ce-embed height=notanumber").height, 650);
        assert_eq!(Directive::parse("ce-embed height=0").height, 650);
        assert_eq!(Directive::parse("ce-embed height=-20").height, 650);
        assert_eq!(Directive::parse("ce-embed height=99999999999").height, 650);
    }

    #[test]
    fn test_height_integer_prefix() {
        assert_eq!(Directive::parse("height=400px").height, 400);
        assert_eq!(Directive::parse("height=+300").height, 300);
        assert_eq!(Directive::parse("height='  250'").height, 250);
    }

    #[test]
    fn test_single_quoted_value() {
        let directive = Directive::parse("ce-embed flags='-std=c++20 -O1'");
        assert_eq!(directive.flags, "-std=c++20 -O1");
    }

    #[test]
    fn test_empty_quoted_value() {
        let directive = Directive::parse(r#"ce-embed flags="""#);
        assert_eq!(directive.flags, "");
    }

    #[test]
    fn test_unterminated_quote_is_bare_token() {
        let directive = Directive::parse(r#"ce-embed flags="-O2 -Wall"#);
        assert_eq!(directive.flags, "\"-O2");
    }

    #[test]
    fn test_later_keys_override() {
        let directive = Directive::parse("compiler=gcc1 height=300 compiler=gcc2 height=x");
        assert_eq!(directive.compiler, "gcc2");
        assert_eq!(directive.height, 300);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let directive = Directive::parse("ce-embed theme=dark lang=c++ compiler=g141");
        assert_eq!(directive.compiler, "g141");
        assert_eq!(directive.flags, DEFAULT_FLAGS);
    }

    #[test]
    fn test_compiler_passed_verbatim() {
        let directive = Directive::parse("compiler=not/a?valid&id");
        assert_eq!(directive.compiler, "not/a?valid&id");
    }

    #[test]
    fn test_parse_over_custom_base() {
        let base = Directive {
            height: 500,
            compiler: "gcc1510".to_owned(),
            flags: "-std=c++20".to_owned(),
        };
        let parsed = Directive::parse_over(base, "height=oops flags=-O3");

        assert_eq!(parsed.directive.height, 500);
        assert_eq!(parsed.directive.compiler, "gcc1510");
        assert_eq!(parsed.directive.flags, "-O3");
        assert_eq!(
            parsed.warnings,
            vec![DirectiveWarning::InvalidHeight {
                value: "oops".to_owned(),
                kept: 500,
            }]
        );
    }

    #[test]
    fn test_warning_display() {
        let warning = DirectiveWarning::InvalidHeight {
            value: "tall".to_owned(),
            kept: 650,
        };
        assert_eq!(warning.to_string(), "invalid height 'tall', keeping 650");
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote(r#""a b""#), "a b");
        assert_eq!(unquote("'a'"), "a");
        assert_eq!(unquote(r#""a'"#), r#""a'"#);
        assert_eq!(unquote("\""), "\"");
        assert_eq!(unquote("plain"), "plain");
    }
}
