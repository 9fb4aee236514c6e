//! Errors from filling templates.

use kstring::KString;

use crate::def_boxed_thiserror;

def_boxed_thiserror!(FillError, pub enum FillErrorKind {
    // Compile class: the template text or a prop key is malformed.
    #[error("unterminated placeholder starting at byte {pos}")]
    Unterminated { pos: usize },
    #[error("empty placeholder at byte {pos}")]
    EmptyPlaceholder { pos: usize },
    #[error("invalid identifier at byte {pos}: {found:?}")]
    InvalidIdentifier { pos: usize, found: String },
    #[error("placeholder expression nested too deeply at byte {pos}")]
    NestingTooDeep { pos: usize },
    #[error("expected {expected} at byte {pos}, found {found:?}")]
    Expected { pos: usize, expected: &'static str, found: String },
    #[error("property key {key:?} is not a valid identifier")]
    InvalidKey { key: KString },

    // Reference class: a name does not resolve.
    #[error("{name} is not defined")]
    Unbound { name: KString },
    #[error("helper {name} can only be called, not used as a value")]
    HelperAsValue { name: KString },
    #[error("{name} is not a function")]
    NotAFunction { name: KString },

    #[error("evaluate needs exactly one more fragment than values, got \
             {fragments} fragments for {values} values")]
    Arity { fragments: usize, values: usize },
});

impl FillErrorKind {
    /// True for errors about the shape of the template text or of
    /// the property keys.
    pub fn is_compile_error(&self) -> bool {
        use FillErrorKind::*;
        match self {
            Unterminated { .. }
            | EmptyPlaceholder { .. }
            | InvalidIdentifier { .. }
            | NestingTooDeep { .. }
            | Expected { .. }
            | InvalidKey { .. } => true,
            Unbound { .. } | HelperAsValue { .. } | NotAFunction { .. }
            | Arity { .. } => false,
        }
    }

    /// True for placeholder names that do not resolve to a value or
    /// function.
    pub fn is_reference_error(&self) -> bool {
        matches!(self,
                 FillErrorKind::Unbound { .. }
                 | FillErrorKind::HelperAsValue { .. }
                 | FillErrorKind::NotAFunction { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_classify() {
        let e: FillError = FillErrorKind::Unbound { name: "x".into() }.into();
        assert!(e.is_reference_error());
        assert!(!e.is_compile_error());
        assert_eq!(e.to_string(), "x is not defined");
        let e: FillError = FillErrorKind::Unterminated { pos: 3 }.into();
        assert!(e.is_compile_error());
        let e: FillError = FillErrorKind::Arity { fragments: 1, values: 1 }.into();
        assert!(!e.is_compile_error());
        assert!(!e.is_reference_error());
    }
}
