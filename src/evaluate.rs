//! Tag-style evaluation: literal fragments interleaved with values.

use crate::{error::{FillError, FillErrorKind},
            escape::escape_into,
            value::Value};

/// Append the output form of `value`: nothing for nullish values,
/// raw strings verbatim, everything else converted and escaped.
pub fn push_value(out: &mut String, value: &Value) {
    match value {
        Value::Null | Value::Undefined => (),
        Value::Raw(r) => out.push_str(r.as_str()),
        v => escape_into(out, &v.to_text()),
    }
}

/// Concatenate `fragments[0], values[0], fragments[1], ...,
/// fragments[n]`, with values passed through `push_value`. The
/// fragments are trusted template text and never escaped.
///
/// There must be exactly one more fragment than values, otherwise
/// `FillErrorKind::Arity` is returned (nothing is truncated).
pub fn evaluate<S: AsRef<str>>(fragments: &[S], values: &[Value]) -> Result<String, FillError> {
    if fragments.len() != values.len() + 1 {
        return Err(FillErrorKind::Arity {
            fragments: fragments.len(),
            values: values.len()
        }.into());
    }
    let len: usize = fragments.iter().map(|f| f.as_ref().len()).sum();
    let mut out = String::with_capacity(len);
    for (i, fragment) in fragments.iter().enumerate() {
        out.push_str(fragment.as_ref());
        if let Some(value) = values.get(i) {
            push_value(&mut out, value);
        }
    }
    Ok(out)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::raw;

    fn t(fragments: &[&str], values: Vec<Value>) -> String {
        evaluate(fragments, &values).unwrap()
    }

    #[test]
    fn t_evaluate() {
        assert_eq!(t(&["Hello ", "!"], vec!["<script>".into()]), "Hello &lt;script&gt;!");
        assert_eq!(t(&["", ""], vec![raw("<b>").into()]), "<b>");
        assert_eq!(t(&["", ""], vec!["<b>".into()]), "&lt;b&gt;");
        assert_eq!(t(&["only text"], vec![]), "only text");
        assert_eq!(t(&["<p>", "</p>"], vec![Value::Float(1.5)]), "<p>1.5</p>");
    }

    #[test]
    fn t_nullish_and_falsy() {
        assert_eq!(t(&["[", "]"], vec![Value::Null]), "[]");
        assert_eq!(t(&["[", "]"], vec![Value::Undefined]), "[]");
        assert_eq!(t(&["[", "|", "|", "]"],
                     vec![Value::Int(0), "".into(), false.into()]),
                   "[0||false]");
    }

    #[test]
    fn t_arity() {
        for (fragments, nvalues) in [(&["a", "b"][..], 2), (&["a", "b"][..], 0),
                                     (&[][..], 0)] {
            let values = vec![Value::Int(1); nvalues];
            let e = evaluate(fragments, &values).unwrap_err();
            match e.kind() {
                FillErrorKind::Arity { fragments: f, values: v } => {
                    assert_eq!(*f, fragments.len());
                    assert_eq!(*v, nvalues);
                }
                k => panic!("unexpected error {k:?}"),
            }
        }
    }
}
