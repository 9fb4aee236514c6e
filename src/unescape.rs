//! Decoding of HTML character references.

use std::{borrow::Cow, collections::HashMap};

use html5gum::{Token, Tokenizer};
use lazy_static::lazy_static;

use crate::{escape::ENTITY_TABLE, warn};

// Longest candidate between '&' and ';' that is looked up. The
// longest named entity in HTML5 is 31 characters plus the '&'.
const MAX_REFERENCE_LEN: usize = 32;

fn is_reference_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'#'
}

/// Byte index of the ';' terminating a character reference starting
/// with the '&' at `amp`.
fn reference_end(s: &str, amp: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = amp + 1;
    while i < bytes.len() && i - amp <= MAX_REFERENCE_LEN {
        let b = bytes[i];
        if b == b';' {
            return if i > amp + 1 { Some(i) } else { None };
        }
        if !is_reference_char(b) {
            return None;
        }
        i += 1;
    }
    None
}

/// Something that knows how to resolve HTML character references.
pub trait Decoder {
    /// Resolve a single reference like `&lt;` or `&#x2F;` (including
    /// the `&` and `;`). None if the reference is unknown, in which
    /// case it stays in the text literally.
    fn decode_reference<'s>(&self, reference: &'s str) -> Option<Cow<'s, str>>;

    /// Replace all character references in `s` that this decoder
    /// knows. Everything else, including markup, is kept as is.
    fn decode_entities(&self, s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        let mut done = 0;
        let mut pos = 0;
        while let Some(p) = s[pos..].find('&') {
            let amp = pos + p;
            if let Some(semi) = reference_end(s, amp) {
                if let Some(decoded) = self.decode_reference(&s[amp..=semi]) {
                    out.push_str(&s[done..amp]);
                    out.push_str(&decoded);
                    done = semi + 1;
                }
                pos = semi + 1;
            } else {
                pos = amp + 1;
            }
        }
        out.push_str(&s[done..]);
        out
    }
}

impl<D: Decoder + ?Sized> Decoder for &D {
    fn decode_reference<'s>(&self, reference: &'s str) -> Option<Cow<'s, str>> {
        (**self).decode_reference(reference)
    }
}

impl<D: Decoder + ?Sized> Decoder for Box<D> {
    fn decode_reference<'s>(&self, reference: &'s str) -> Option<Cow<'s, str>> {
        (**self).decode_reference(reference)
    }
}


/// Resolves references with the full HTML5 entity set, by running
/// them through the html5gum tokenizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Html5Decoder;

impl Decoder for Html5Decoder {
    fn decode_reference<'s>(&self, reference: &'s str) -> Option<Cow<'s, str>> {
        let mut bytes = Vec::new();
        for token in Tokenizer::new(reference).infallible() {
            match token {
                Token::String(s) => bytes.extend_from_slice(&s.0),
                // Parse errors for unknown references; the text
                // still comes through as String tokens.
                _ => (),
            }
        }
        match String::from_utf8(bytes) {
            Ok(decoded) =>
                if decoded == reference {
                    None
                } else {
                    Some(Cow::Owned(decoded))
                },
            Err(e) => {
                warn!("html5gum gave non-UTF-8 output for {reference:?}: {e}");
                None
            }
        }
    }
}


lazy_static! {
    static ref TABLE_NAMED: HashMap<&'static str, char> = {
        let mut m = HashMap::new();
        m.insert("amp", '&');
        m.insert("lt", '<');
        m.insert("gt", '>');
        m.insert("quot", '"');
        m.insert("apos", '\'');
        m
    };
}

/// Resolves only references to the characters that `escape`
/// replaces, in named, decimal or hex form. Use where the full HTML5
/// entity set is not wanted.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableDecoder;

fn parse_numeric(digits: &str) -> Option<char> {
    let code = if let Some(hex) = digits.strip_prefix('x')
        .or_else(|| digits.strip_prefix('X'))
    {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse::<u32>().ok()?
    };
    char::from_u32(code)
}

impl Decoder for TableDecoder {
    fn decode_reference<'s>(&self, reference: &'s str) -> Option<Cow<'s, str>> {
        let name = reference.strip_prefix('&')?.strip_suffix(';')?;
        let c = if let Some(digits) = name.strip_prefix('#') {
            parse_numeric(digits)?
        } else {
            *TABLE_NAMED.get(name)?
        };
        if ENTITY_TABLE.iter().any(|(tc, _)| *tc == c) {
            Some(Cow::Owned(c.to_string()))
        } else {
            None
        }
    }
}


/// Wrap a function from a reference (like `&amp;`) to its
/// replacement as a `Decoder`.
pub struct FnDecoder<F>(pub F);

impl<F: Fn(&str) -> Option<String>> Decoder for FnDecoder<F> {
    fn decode_reference<'s>(&self, reference: &'s str) -> Option<Cow<'s, str>> {
        (self.0)(reference).map(Cow::Owned)
    }
}


/// Decode HTML character references in `s` using the full HTML5
/// entity set. Text without references is returned unchanged.
pub fn unescape(s: &str) -> String {
    Html5Decoder.decode_entities(s)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::escape;

    #[test]
    fn t_reference_end() {
        assert_eq!(reference_end("&amp;", 0), Some(4));
        assert_eq!(reference_end("a &lt;b", 2), Some(5));
        assert_eq!(reference_end("&;", 0), None);
        assert_eq!(reference_end("& b;", 0), None);
        assert_eq!(reference_end("&amp", 0), None);
        assert_eq!(reference_end(&format!("&{};", "a".repeat(40)), 0), None);
    }

    #[test]
    fn t_unescape() {
        assert_eq!(unescape("&lt;b&gt;"), "<b>");
        assert_eq!(unescape("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(unescape("&eacute;t&eacute; &hellip;"), "été …");
        assert_eq!(unescape("&#60;&#x3C;&#X3c;"), "<<<");
        assert_eq!(unescape("&nosuchentity; stays"), "&nosuchentity; stays");
        assert_eq!(unescape("a & b; c"), "a & b; c");
    }

    #[test]
    fn t_plain_text_unchanged() {
        for s in ["", "plain", "<p class=\"x\">${name}</p>", "line\r\nbreak", "a&"] {
            assert_eq!(unescape(s), s);
            assert_eq!(TableDecoder.decode_entities(s), s);
        }
    }

    #[test]
    fn t_round_trip() {
        let all: String = ENTITY_TABLE.iter().map(|(c, _)| *c).collect();
        for s in [all.as_str(), "&&", "</>", "a='`b`'", "\"=\""] {
            assert_eq!(unescape(&escape(s)), s);
            assert_eq!(TableDecoder.decode_entities(&escape(s)), s);
        }
    }

    #[test]
    fn t_table_decoder_is_narrow() {
        let d = TableDecoder;
        assert_eq!(d.decode_entities("&lt;&apos;&#47;&#x2f;&#X2F;"), "<'///");
        assert_eq!(d.decode_entities("&eacute;&#65;"), "&eacute;&#65;");
        assert_eq!(d.decode_entities("&#xZZ;"), "&#xZZ;");
    }

    #[test]
    fn t_fn_decoder() {
        let d = FnDecoder(|r: &str| if r == "&smile;" {
            Some(":)".to_string())
        } else {
            None
        });
        assert_eq!(d.decode_entities("&smile; &lt;"), ":) &lt;");
        let boxed: Box<dyn Decoder> = Box::new(d);
        assert_eq!(boxed.decode_entities("&smile;"), ":)");
    }
}
