//! Fill HTML string templates with values, escaping them unless they
//! are explicitly marked raw.
//!
//! ```
//! use htmlfill::{fill, props};
//!
//! let out = fill("<p>${greeting}, ${raw(name)}</p>",
//!                &props!{ greeting: "Hi <you>", name: "<b>Bob</b>" }).unwrap();
//! assert_eq!(out, "<p>Hi &lt;you&gt;, <b>Bob</b></p>");
//! ```

pub mod warn;
pub mod boxed_error;
pub mod io_util;
pub mod error;
pub mod value;
pub mod escape;
pub mod unescape;
pub mod evaluate;
pub mod props;
pub mod template;
pub mod fill;

pub use error::{FillError, FillErrorKind};
pub use value::{raw, RawString, Value};
pub use escape::{escape, escape_into, ENTITY_TABLE};
pub use unescape::{unescape, Decoder, Html5Decoder, TableDecoder, FnDecoder};
pub use evaluate::evaluate;
pub use props::Props;
pub use template::{Template, Helper, Expr};
pub use fill::{fill, Filler, Markup, MarkupContainer, TemplateSource};
