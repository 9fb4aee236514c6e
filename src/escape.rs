//! HTML escaping of interpolated values.

use crate::value::Value;

/// The characters that are replaced on output, and their entities.
pub const ENTITY_TABLE: [(char, &str); 8] = [
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&#39;"),
    ('/', "&#x2F;"),
    ('`', "&#x60;"),
    ('=', "&#x3D;"),
];

fn entity(c: char) -> Option<&'static str> {
    ENTITY_TABLE.iter().find(|(tc, _)| *tc == c).map(|(_, ent)| *ent)
}

/// Append `s` to `out`, replacing the characters in `ENTITY_TABLE`
/// by their entities.
pub fn escape_into(out: &mut String, s: &str) {
    let mut done = 0;
    for (i, c) in s.char_indices() {
        if let Some(ent) = entity(c) {
            out.push_str(&s[done..i]);
            out.push_str(ent);
            done = i + c.len_utf8();
        }
    }
    out.push_str(&s[done..]);
}

/// Convert `value` to its string form and escape it. Not idempotent:
/// escaping escaped text escapes the `&` of the entities again.
pub fn escape<V: Into<Value>>(value: V) -> String {
    let value = value.into();
    let text = value.to_text();
    let mut out = String::with_capacity(text.len());
    escape_into(&mut out, &text);
    out
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_every_table_char() {
        for (c, ent) in ENTITY_TABLE {
            assert_eq!(escape(format!("a{c}b")), format!("a{ent}b"));
        }
        assert_eq!(entity('a'), None);
        assert_eq!(entity('\\'), None);
    }

    #[test]
    fn t_escape() {
        assert_eq!(escape("<b>"), "&lt;b&gt;");
        assert_eq!(escape(""), "");
        assert_eq!(escape("plain text, äöü 123"), "plain text, äöü 123");
        assert_eq!(escape("a=`b`/'c'\"d\""),
                   "a&#x3D;&#x60;b&#x60;&#x2F;&#39;c&#39;&quot;d&quot;");
        assert_eq!(escape("&amp;"), "&amp;amp;");
        assert_eq!(escape(42), "42");
        assert_eq!(escape(false), "false");
    }

    #[test]
    fn t_no_angle_brackets() {
        for s in ["<<>>", "<script>alert(1)</script>", "a > b < c", "><"] {
            let e = escape(s);
            assert!(!e.contains('<'), "{e:?}");
            assert!(!e.contains('>'), "{e:?}");
        }
    }

    #[test]
    fn t_escape_into_appends() {
        let mut s = String::from("x:");
        escape_into(&mut s, "1<2");
        escape_into(&mut s, "");
        assert_eq!(s, "x:1&lt;2");
    }
}
