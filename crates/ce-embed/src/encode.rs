//! Share-link payload encoding.
//!
//! Compiler Explorer's inline share links use a rison-like grammar where `!`
//! is the escape character. Source text is normalized, `!` is doubled, and the
//! result is percent-encoded with a handful of characters left literal so the
//! links match what the service itself produces.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left unescaped in a URI component:
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Characters copied into the payload unchanged.
fn is_payload_literal(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~' | '/' | ':' | ',' | '(' | ')')
}

/// Normalize source text before transcoding.
///
/// Collapses `\r\n` to `\n`, drops a single trailing newline and doubles every
/// `!`, in that order.
///
/// ```
/// use ce_embed::normalize_source;
///
/// assert_eq!(normalize_source("a!\r\n\r\n"), "a!!\n");
/// ```
#[must_use]
pub fn normalize_source(source: &str) -> String {
    let mut text = source.replace("\r\n", "\n");
    if text.ends_with('\n') {
        text.pop();
    }
    text.replace('!', "!!")
}

/// Encode source text as a share-link payload.
///
/// ```
/// use ce_embed::encode_payload;
///
/// assert_eq!(encode_payload("int x = 1;\n"), "int+x+%3D+1%3B");
/// assert_eq!(encode_payload("it's"), "it!'s");
/// ```
#[must_use]
pub fn encode_payload(source: &str) -> String {
    let normalized = normalize_source(source);
    let mut out = String::with_capacity(normalized.len() * 2);

    for c in normalized.chars() {
        match c {
            ' ' => out.push('+'),
            '\n' => out.push_str("%0A"),
            '\'' => out.push_str("!'"),
            c if is_payload_literal(c) => out.push(c),
            c => {
                let mut buf = [0; 4];
                out.extend(utf8_percent_encode(c.encode_utf8(&mut buf), URI_COMPONENT));
            }
        }
    }

    out.replace("%2F", "/")
}

/// Encode compiler flags for the `options` field.
///
/// ```
/// use ce_embed::encode_flags;
///
/// assert_eq!(encode_flags("-std=c++23 -O3"), "-std%3Dc%2B%2B23+-O3");
/// ```
#[must_use]
pub fn encode_flags(flags: &str) -> String {
    utf8_percent_encode(flags, URI_COMPONENT)
        .to_string()
        .replace("%20", "+")
}
