//! The entry point: fill a template (text or serialized markup) with
//! properties.

use std::borrow::Cow;

use kstring::KString;

use crate::{error::FillError,
            props::Props,
            template::Template,
            unescape::{Decoder, Html5Decoder}};

/// Something holding a template as serialized HTML, e.g. the inner
/// markup of a `<template>` element. Such markup may carry the
/// placeholder syntax entity-encoded (`${a &gt; b}`), so it is
/// decoded before parsing.
pub trait MarkupContainer {
    fn inner_markup(&self) -> Cow<'_, str>;
}

/// Serialized inner markup of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup(pub KString);

impl Markup {
    pub fn new<S: Into<KString>>(markup: S) -> Self {
        Markup(markup.into())
    }
}

impl MarkupContainer for Markup {
    fn inner_markup(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.0.as_str())
    }
}

pub enum TemplateSource<'t> {
    Text(Cow<'t, str>),
    Container(&'t dyn MarkupContainer),
}

impl<'t> From<&'t str> for TemplateSource<'t> {
    fn from(s: &'t str) -> Self {
        TemplateSource::Text(Cow::Borrowed(s))
    }
}

impl<'t> From<&'t String> for TemplateSource<'t> {
    fn from(s: &'t String) -> Self {
        TemplateSource::Text(Cow::Borrowed(s))
    }
}

impl<'t> From<String> for TemplateSource<'t> {
    fn from(s: String) -> Self {
        TemplateSource::Text(Cow::Owned(s))
    }
}

impl<'t> From<&'t Markup> for TemplateSource<'t> {
    fn from(m: &'t Markup) -> Self {
        TemplateSource::Container(m)
    }
}

impl<'t> From<&'t dyn MarkupContainer> for TemplateSource<'t> {
    fn from(c: &'t dyn MarkupContainer) -> Self {
        TemplateSource::Container(c)
    }
}


/// Fills templates, using `decoder` for markup containers and the
/// `unescape` helper.
#[derive(Debug, Clone, Default)]
pub struct Filler<D: Decoder = Html5Decoder> {
    decoder: D,
}

impl<D: Decoder> Filler<D> {
    pub fn new(decoder: D) -> Self {
        Filler { decoder }
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// The template text of `source`: text as is, container markup
    /// with its character references decoded.
    pub fn template_text<'t>(&self, source: &TemplateSource<'t>) -> Cow<'t, str> {
        match source {
            TemplateSource::Text(s) => s.clone(),
            TemplateSource::Container(c) =>
                Cow::Owned(self.decoder().decode_entities(&c.inner_markup())),
        }
    }

    pub fn compile<'t>(&self, template: impl Into<TemplateSource<'t>>)
                       -> Result<Template, FillError> {
        let source = template.into();
        Template::parse(&self.template_text(&source))
    }

    /// Fill `template` with `props`. Fails with a compile class error
    /// if a key of `props` is not an identifier or the template is
    /// malformed, with a reference class error if a placeholder
    /// names something that is neither a prop nor a helper.
    pub fn fill<'t>(&self, template: impl Into<TemplateSource<'t>>, props: &Props)
                    -> Result<String, FillError> {
        props.check_keys()?;
        self.compile(template)?.render_with(props, self.decoder())
    }
}

/// `Filler::fill` with the default (HTML5) decoder.
pub fn fill<'t>(template: impl Into<TemplateSource<'t>>, props: &Props)
                -> Result<String, FillError> {
    Filler::<Html5Decoder>::default().fill(template, props)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{props, error::FillErrorKind, unescape::TableDecoder, value::{raw, Value}};

    #[test]
    fn t_fill() {
        assert_eq!(fill("Hello ${name}!", &props!{ name: "<script>" }).unwrap(),
                   "Hello &lt;script&gt;!");
        assert_eq!(fill("Hello ${raw(markup)}", &props!{ markup: "<b>hi</b>" }).unwrap(),
                   "Hello <b>hi</b>");
        assert_eq!(fill("${m}", &props!{ m: raw("<b>") }).unwrap(), "<b>");
        assert_eq!(fill("${m}", &props!{ m: "<b>" }).unwrap(), "&lt;b&gt;");
        assert_eq!(fill(String::from("${n}"), &props!{ n: 3 }).unwrap(), "3");
    }

    #[test]
    fn t_nullish() {
        assert_eq!(fill("[${x}]", &props!{ x: Value::Null }).unwrap(), "[]");
        assert_eq!(fill("[${x}]", &props!{ x: Value::Undefined }).unwrap(), "[]");
        assert_eq!(fill("[${x}]", &props!{ x: Option::<&str>::None }).unwrap(), "[]");
        assert_eq!(fill("[${x}]", &props!{ x: 0 }).unwrap(), "[0]");
        assert_eq!(fill("[${x}]", &props!{ x: false }).unwrap(), "[false]");
    }

    #[test]
    fn t_markup_container() {
        let m = Markup::new("<p title=\"${title}\">${a &gt; b}</p>");
        // Placeholders are names only, thus the decoded `a > b` fails
        // to parse, while the markup around it survives decoding.
        assert!(fill(&m, &props!{ title: "t" }).unwrap_err().is_compile_error());

        let m = Markup::new("<p title=\"${title}\">${raw(body)} &amp; more</p>");
        assert_eq!(fill(&m, &props!{ title: "\"x\"", body: "<i>b</i>" }).unwrap(),
                   "<p title=\"&quot;x&quot;\"><i>b</i> & more</p>");
        let c: &dyn MarkupContainer = &m;
        assert_eq!(Filler::new(TableDecoder)
                   .fill(c, &props!{ title: "", body: "" }).unwrap(),
                   "<p title=\"\"> & more</p>");
    }

    #[test]
    fn t_markup_text_is_not_decoded() {
        assert_eq!(fill("&lt;${a}&gt;", &props!{ a: "&" }).unwrap(), "&lt;&amp;&gt;");
    }

    #[test]
    fn t_invalid_key() {
        let mut p = props!{ ok: 1 };
        p.insert("not-ok", 2);
        match fill("${ok}", &p).unwrap_err().into_kind() {
            FillErrorKind::InvalidKey { key } => assert_eq!(key.as_str(), "not-ok"),
            k => panic!("unexpected {k:?}"),
        }
    }

    #[test]
    fn t_errors_propagate() {
        let e = fill("${missing}", &props!{}).unwrap_err();
        assert!(e.is_reference_error());
        assert_eq!(e.to_string(), "missing is not defined");
        assert!(fill("${oops", &props!{}).unwrap_err().is_compile_error());
    }

    #[test]
    fn t_compile_once() {
        let filler = Filler::<Html5Decoder>::default();
        let tmpl = filler.compile("<b>${x}</b>").unwrap();
        assert_eq!(tmpl.render(&props!{ x: 1 }).unwrap(), "<b>1</b>");
        assert_eq!(tmpl.render(&props!{ x: "&" }).unwrap(), "<b>&amp;</b>");
    }

    #[test]
    fn t_decoder() {
        let filler = Filler::new(TableDecoder);
        assert_eq!(filler.decoder().decode_entities("&lt;&eacute;"), "<&eacute;");
        assert_eq!(filler.fill("${unescape(x)}", &props!{ x: "&eacute;" }).unwrap(),
                   "&amp;eacute;");
    }
}
