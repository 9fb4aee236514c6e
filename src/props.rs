//! The properties bag: named values for the placeholders of a
//! template.

use anyhow::{anyhow, Result};
use kstring::KString;

use crate::{error::{FillError, FillErrorKind}, value::Value};

/// Whether `s` can be used as a placeholder name.
pub fn is_identifier(s: &str) -> bool {
    let mut cs = s.chars();
    match cs.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' =>
            cs.all(|c| c.is_alphanumeric() || c == '_' || c == '$'),
        _ => false,
    }
}

/// Insertion-ordered mapping from names to values. Setting an
/// existing name replaces the value but keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    entries: Vec<(KString, Value)>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<Value>
    where K: Into<KString>, V: Into<Value>
    {
        let key = key.into();
        let value = value.into();
        if let Some((_, v)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(std::mem::replace(v, value))
        } else {
            self.entries.push((key, value));
            None
        }
    }

    /// Builder variant of `insert`.
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where K: Into<KString>, V: Into<Value>
    {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k.as_str() == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.iter_mut().find(|(k, _)| k.as_str() == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Fails with `InvalidKey` for the first key that is not an
    /// identifier.
    pub fn check_keys(&self) -> Result<(), FillError> {
        for (k, _) in &self.entries {
            if !is_identifier(k) {
                return Err(FillErrorKind::InvalidKey { key: k.clone() }.into());
            }
        }
        Ok(())
    }

    /// Build from a JSON object, keeping the key order of `json`.
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        match json {
            serde_json::Value::Object(map) => {
                let mut props = Props::new();
                for (k, v) in map {
                    props.insert(KString::from_string(k), v);
                }
                Ok(props)
            }
            other => Err(anyhow!("expecting a JSON object for the properties, got: {}",
                                 other)),
        }
    }
}

impl<K: Into<KString>, V: Into<Value>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Props::new();
        for (k, v) in iter {
            props.insert(k, v);
        }
        props
    }
}

impl<K: Into<KString>, V: Into<Value>> Extend<(K, V)> for Props {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

/// Build a `Props` bag: `props!{ name: "World", count: 3 }`. Values
/// are converted via `Into<Value>`.
#[macro_export]
macro_rules! props {
    { $($key:ident : $val:expr),* $(,)? } => {{
        #[allow(unused_mut)]
        let mut props = $crate::Props::new();
        $(
            props.insert(stringify!($key), $val);
        )*
        props
    }}
}
