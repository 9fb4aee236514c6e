//! Parsing of template text into literal fragments and placeholder
//! expressions, and rendering against a properties bag.
//!
//! Syntax: `${name}` inserts the value of property `name`, escaped
//! unless it is a raw string. Placeholders may call the helpers
//! `raw`, `escape` and `unescape`, nested: `${raw(unescape(x))}`.
//! `\${` produces a literal `${`, and `\\${` a literal backslash
//! followed by a placeholder. Backslashes elsewhere are plain text.

use kstring::KString;

use crate::{error::{FillError, FillErrorKind},
            escape::escape,
            evaluate::evaluate,
            nowarn as warn,
            props::Props,
            unescape::{Decoder, Html5Decoder},
            value::{raw, Value}};

const MAX_NESTING: usize = 32;

/// The functions that can be called from placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Helper {
    Raw,
    Escape,
    Unescape,
}

impl Helper {
    pub fn from_name(name: &str) -> Option<Helper> {
        match name {
            "raw" => Some(Helper::Raw),
            "escape" => Some(Helper::Escape),
            "unescape" => Some(Helper::Unescape),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Helper::Raw => "raw",
            Helper::Escape => "escape",
            Helper::Unescape => "unescape",
        }
    }

    /// Nullish values pass through all helpers unchanged.
    pub fn apply(self, value: Value, decoder: &impl Decoder) -> Value {
        if value.is_nullish() {
            return value;
        }
        match self {
            Helper::Raw => match value {
                Value::Raw(_) => value,
                v => Value::Raw(raw(KString::from_string(v.to_text().into_owned()))),
            },
            Helper::Escape => Value::Str(KString::from_string(escape(value))),
            Helper::Unescape =>
                Value::Str(KString::from_string(decoder.decode_entities(&value.to_text()))),
        }
    }
}

/// The contents of a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Name { name: KString, pos: usize },
    Call { callee: KString, pos: usize, arg: Box<Expr> },
}

impl Expr {
    fn push_names<'t>(&'t self, out: &mut Vec<&'t str>) {
        match self {
            Expr::Name { name, .. } => out.push(name.as_str()),
            Expr::Call { arg, .. } => arg.push_names(out),
        }
    }

    fn resolve(&self, props: &Props, decoder: &impl Decoder) -> Result<Value, FillError> {
        match self {
            Expr::Name { name, .. } => {
                if let Some(v) = props.get(name) {
                    Ok(v.clone())
                } else if Helper::from_name(name).is_some() {
                    Err(FillErrorKind::HelperAsValue { name: name.clone() }.into())
                } else {
                    Err(FillErrorKind::Unbound { name: name.clone() }.into())
                }
            }
            Expr::Call { callee, arg, .. } => {
                if let Some(helper) = Helper::from_name(callee) {
                    let v = arg.resolve(props, decoder)?;
                    Ok(helper.apply(v, decoder))
                } else if props.contains_key(callee) {
                    Err(FillErrorKind::NotAFunction { name: callee.clone() }.into())
                } else {
                    Err(FillErrorKind::Unbound { name: callee.clone() }.into())
                }
            }
        }
    }
}


fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Parser for the inside of one placeholder, starting after the `${`.
struct ExprParser<'s> {
    s: &'s str,
    pos: usize,
    // Position of the `$` of the placeholder, for error reporting.
    start: usize,
}

impl<'s> ExprParser<'s> {
    fn rest(&self) -> &'s str {
        &self.s[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn found(&self) -> String {
        match self.peek() {
            Some(c) => c.to_string(),
            None => "end of template".into(),
        }
    }

    fn unterminated(&self) -> FillError {
        FillErrorKind::Unterminated { pos: self.start }.into()
    }

    fn identifier(&mut self) -> Result<(KString, usize), FillError> {
        let pos = self.pos;
        let rest = self.rest();
        let len = match rest.chars().next() {
            None => return Err(self.unterminated()),
            Some(c) if is_ident_start(c) =>
                rest.find(|c| !is_ident_continue(c)).unwrap_or(rest.len()),
            Some(_) => {
                let found = rest.split(|c: char| c.is_whitespace()
                                       || c == '}' || c == '(' || c == ')')
                    .next()
                    .filter(|s| !s.is_empty())
                    .unwrap_or(&rest[..rest.chars().next().map_or(0, char::len_utf8)]);
                return Err(FillErrorKind::InvalidIdentifier {
                    pos,
                    found: found.into()
                }.into());
            }
        };
        self.pos += len;
        Ok((KString::from_ref(&rest[..len]), pos))
    }

    fn expr(&mut self, depth: usize) -> Result<Expr, FillError> {
        if depth > MAX_NESTING {
            return Err(FillErrorKind::NestingTooDeep { pos: self.pos }.into());
        }
        self.skip_whitespace();
        let (name, pos) = self.identifier()?;
        self.skip_whitespace();
        if self.peek() == Some('(') {
            self.pos += 1;
            let arg = self.expr(depth + 1)?;
            self.skip_whitespace();
            match self.peek() {
                Some(')') => self.pos += 1,
                None => return Err(self.unterminated()),
                Some(_) => return Err(FillErrorKind::Expected {
                    pos: self.pos,
                    expected: "')'",
                    found: self.found()
                }.into()),
            }
            warn!("call {name:?} at {pos}");
            Ok(Expr::Call { callee: name, pos, arg: Box::new(arg) })
        } else {
            Ok(Expr::Name { name, pos })
        }
    }

    /// Parse the whole placeholder including the closing `}`.
    fn placeholder(&mut self) -> Result<Expr, FillError> {
        self.skip_whitespace();
        if self.peek() == Some('}') {
            return Err(FillErrorKind::EmptyPlaceholder { pos: self.start }.into());
        }
        let expr = self.expr(0)?;
        self.skip_whitespace();
        match self.peek() {
            Some('}') => {
                self.pos += 1;
                Ok(expr)
            }
            None => Err(self.unterminated()),
            Some(_) => Err(FillErrorKind::Expected {
                pos: self.pos,
                expected: "'}'",
                found: self.found()
            }.into()),
        }
    }
}


/// A parsed template, ready to be rendered any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    // Always one more than `exprs`.
    fragments: Vec<KString>,
    exprs: Vec<Expr>,
}

impl Template {
    pub fn parse(s: &str) -> Result<Template, FillError> {
        let mut fragments = Vec::new();
        let mut exprs = Vec::new();
        let mut current = String::new();
        let mut done = 0;
        let mut i = 0;
        let bytes = s.as_bytes();
        // Only ever stopping at ASCII bytes, thus slicing is safe.
        while i < bytes.len() {
            if bytes[i] == b'\\' && s[i + 1..].starts_with("\\${") {
                current.push_str(&s[done..i]);
                current.push('\\');
                i += 2;
                done = i;
            } else if bytes[i] == b'\\' && s[i + 1..].starts_with("${") {
                current.push_str(&s[done..i]);
                current.push_str("${");
                i += 3;
                done = i;
            } else if bytes[i] == b'$' && s[i + 1..].starts_with('{') {
                current.push_str(&s[done..i]);
                fragments.push(KString::from_string(std::mem::take(&mut current)));
                let mut parser = ExprParser { s, pos: i + 2, start: i };
                let expr = parser.placeholder()?;
                warn!("placeholder {expr:?} at {i}..{}", parser.pos);
                exprs.push(expr);
                i = parser.pos;
                done = i;
            } else {
                i += 1;
            }
        }
        current.push_str(&s[done..]);
        fragments.push(KString::from_string(current));
        Ok(Template { fragments, exprs })
    }

    /// The literal text pieces between the placeholders.
    pub fn fragments(&self) -> &[KString] {
        &self.fragments
    }

    pub fn exprs(&self) -> &[Expr] {
        &self.exprs
    }

    /// The property names referenced, in source order, with
    /// repetitions.
    pub fn names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for expr in &self.exprs {
            expr.push_names(&mut names);
        }
        names
    }

    pub fn render(&self, props: &Props) -> Result<String, FillError> {
        self.render_with(props, &Html5Decoder)
    }

    /// Like `render`, with `decoder` used by the `unescape` helper.
    pub fn render_with(&self, props: &Props, decoder: &impl Decoder)
                       -> Result<String, FillError> {
        let values = self.exprs.iter()
            .map(|expr| expr.resolve(props, decoder))
            .collect::<Result<Vec<_>, _>>()?;
        evaluate(&self.fragments, &values)
    }
}
