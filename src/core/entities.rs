//! Entity decoding and escaping
//!
//! Default implementations of the text-transform hooks:
//! - `decode`: the five XML named references, `&nbsp;`, and numeric
//!   character references `&#123;` / `&#x7B;`
//! - `encode`: escapes `& < > " '`
//!
//! Both return `Cow::Borrowed` when nothing changes (memchr fast path).
//! Unknown or malformed references are kept as written.

use memchr::{memchr, memchr2, memchr3};
use std::borrow::Cow;
use std::sync::Arc;

/// Where a transformed string ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTarget {
    Text,
    Attribute,
}

/// Text-transform hook applied to text and attribute values
pub type TextTransform = Arc<dyn for<'s> Fn(&'s str, TextTarget) -> Cow<'s, str> + Send + Sync>;

/// Identity transform
pub fn identity(input: &str, _target: TextTarget) -> Cow<'_, str> {
    Cow::Borrowed(input)
}

/// Longest reference body we try to resolve (`#x10FFFF`)
const MAX_REFERENCE_LEN: usize = 8;

/// Decode character references
#[inline]
pub fn decode(input: &str) -> Cow<'_, str> {
    // Fast path: no `&` at all
    if memchr(b'&', input.as_bytes()).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(decode_references(input))
}

fn decode_references(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut result = String::with_capacity(input.len());
    let mut pos = 0;

    while let Some(offset) = memchr(b'&', &bytes[pos..]) {
        let amp = pos + offset;
        result.push_str(&input[pos..amp]);

        let window_end = (amp + 2 + MAX_REFERENCE_LEN).min(bytes.len());
        let decoded = memchr(b';', &bytes[amp + 1..window_end]).and_then(|semi| {
            let body = &input[amp + 1..amp + 1 + semi];
            decode_reference(body).map(|c| (c, amp + semi + 2))
        });

        match decoded {
            Some((c, next)) => {
                result.push(c);
                pos = next;
            }
            None => {
                result.push('&');
                pos = amp + 1;
            }
        }
    }
    result.push_str(&input[pos..]);
    result
}

/// Resolve one reference body (without `&` and `;`)
fn decode_reference(body: &str) -> Option<char> {
    if let Some(numeric) = body.strip_prefix('#') {
        let codepoint = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(codepoint).filter(|&c| c != '\0');
    }

    match body {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        _ => None,
    }
}

/// Escape markup-significant characters
pub fn encode(input: &str) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    if memchr3(b'<', b'>', b'&', bytes).is_none() && memchr2(b'"', b'\'', bytes).is_none() {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

fn decode_transform(input: &str, _target: TextTarget) -> Cow<'_, str> {
    decode(input)
}

fn encode_transform(input: &str, _target: TextTarget) -> Cow<'_, str> {
    encode(input)
}

/// `decode` as a `TextTransform`
pub fn decoder() -> TextTransform {
    Arc::new(decode_transform)
}

/// `encode` as a `TextTransform`
pub fn encoder() -> TextTransform {
    Arc::new(encode_transform)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_entities() {
        let result = decode("Hello, World!");
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_basic_entities() {
        assert_eq!(
            decode("&lt;hello&gt; &amp; &quot;world&quot; &apos;"),
            "<hello> & \"world\" '"
        );
        assert_eq!(decode("a&nbsp;b"), "a\u{00A0}b");
    }

    #[test]
    fn test_numeric_references() {
        assert_eq!(decode("&#65;&#66;&#67;"), "ABC");
        assert_eq!(decode("&#x41;&#X42;&#x43;"), "ABC");
        assert_eq!(decode("&#x1F600;"), "😀");
    }

    #[test]
    fn test_malformed_references_kept() {
        assert_eq!(decode("&unknown;"), "&unknown;");
        assert_eq!(decode("a & b"), "a & b");
        assert_eq!(decode("&#xD800;&#0;"), "&#xD800;&#0;");
        assert_eq!(decode("&amp"), "&amp");
        assert_eq!(decode("&&lt;"), "&<");
        assert_eq!(decode("é&amp;ü"), "é&ü");
    }

    #[test]
    fn test_encode() {
        let result = encode("plain");
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(
            encode("<hello> & \"world\" 'x'"),
            "&lt;hello&gt; &amp; &quot;world&quot; &apos;x&apos;"
        );
    }

    #[test]
    fn test_hooks() {
        let decode_hook = decoder();
        assert_eq!(decode_hook("&lt;", TextTarget::Text), "<");
        let encode_hook = encoder();
        assert_eq!(encode_hook("<", TextTarget::Attribute), "&lt;");
        assert_eq!(identity("&lt;", TextTarget::Text), "&lt;");
    }
}
