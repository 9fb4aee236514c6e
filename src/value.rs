//! Values that can be interpolated, and raw (trusted) strings.

use std::borrow::Cow;

use kstring::KString;

/// A string that is inserted into the output verbatim. Only create
/// these from content that is known to be safe HTML.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawString {
    content: KString,
}

impl RawString {
    pub fn as_str(&self) -> &str {
        self.content.as_str()
    }

    pub fn is_raw(&self) -> bool {
        true
    }

    pub fn into_kstring(self) -> KString {
        self.content
    }
}

impl std::fmt::Display for RawString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mark `content` as trusted, i.e. exempt it from escaping.
pub fn raw<S: Into<KString>>(content: S) -> RawString {
    RawString { content: content.into() }
}


/// A property value. `Null` and `Undefined` are "nullish" and render
/// as the empty string; everything else is converted to text and
/// escaped, except `Raw`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Undefined,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(KString),
    Raw(RawString),
    List(Vec<Value>),
}

fn float_text(x: f64) -> Cow<'static, str> {
    if x.is_nan() {
        Cow::Borrowed("NaN")
    } else if x.is_infinite() {
        Cow::Borrowed(if x > 0. { "Infinity" } else { "-Infinity" })
    } else if x == 0. {
        // Also for -0.
        Cow::Borrowed("0")
    } else if x.abs() >= 1e21 || x.abs() < 1e-6 {
        // Exponential notation with an explicit sign on positive
        // exponents: 1e+21, 1.5e-7.
        let s = format!("{x:e}");
        match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') =>
                Cow::Owned(format!("{mantissa}e+{exp}")),
            _ => Cow::Owned(s),
        }
    } else {
        // Display gives the shortest representation that reads
        // back to the same number, and no ".0" for integral values.
        Cow::Owned(format!("{x}"))
    }
}

impl Value {
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Value::Raw(_))
    }

    /// The string form of the value, before any escaping.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed("null"),
            Value::Undefined => Cow::Borrowed("undefined"),
            Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Value::Int(i) => Cow::Owned(i.to_string()),
            Value::Float(x) => float_text(*x),
            Value::Str(s) => Cow::Borrowed(s.as_str()),
            Value::Raw(r) => Cow::Borrowed(r.as_str()),
            Value::List(vals) => {
                let mut s = String::new();
                for (i, v) in vals.iter().enumerate() {
                    if i > 0 {
                        s.push(',');
                    }
                    if !v.is_nullish() {
                        s.push_str(&v.to_text());
                    }
                }
                Cow::Owned(s)
            }
        }
    }
}


impl From<RawString> for Value {
    fn from(r: RawString) -> Self {
        Value::Raw(r)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(KString::from_ref(s))
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(KString::from_ref(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(KString::from_string(s))
    }
}

impl From<KString> for Value {
    fn from(s: KString) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(x.into())
    }
}

macro_rules! def_from_int {
    ($($t:ty)*) => {
        $(
            impl From<$t> for Value {
                fn from(i: $t) -> Self {
                    Value::Int(i.into())
                }
            }
        )*
    }
}
def_from_int!(i8 i16 i32 i64 u8 u16 u32);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value as J;
        match v {
            J::Null => Value::Null,
            J::Bool(b) => Value::Bool(b),
            J::Number(n) =>
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    // u64 beyond i64 range, or a float
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                },
            J::String(s) => Value::Str(KString::from_string(s)),
            J::Array(vals) => Value::List(vals.into_iter().map(Value::from).collect()),
            obj @ J::Object(_) => Value::Str(KString::from_string(obj.to_string())),
        }
    }
}
