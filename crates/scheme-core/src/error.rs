//! Error model and the object-method dispatch seam.
//!
//! `SchemeError`'s four variants are grounded directly on
//! `heist_types_toolkit.hpp`'s `enum class SCM_EXCEPT { EXIT, EVAL, READ,
//! JUMP }` (spec.md §7 restates the same four-kind split). The manual
//! `Display`/`Error` impl style is grounded on
//! `examples/navicore-cem3/crates/compiler/src/codegen/error.rs`'s
//! `CodeGenError` — the teacher's workspace depends on neither `thiserror`
//! nor `anyhow` anywhere, so this crate doesn't either.

use std::fmt;

use crate::value::{ObjectData, Value};

/// Failure modes the reader (an external collaborator, spec.md §4.7) can
/// report back through a `SchemeError::Read`.
#[derive(Clone, Debug, PartialEq)]
pub enum ReadError {
    IncompleteString,
    IncompleteExpression,
    IncompleteBlockComment,
    StraySpecifier(char),
    DanglingPrefix(String),
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::IncompleteString => write!(f, "incomplete string literal"),
            ReadError::IncompleteExpression => write!(f, "incomplete expression"),
            ReadError::IncompleteBlockComment => write!(f, "incomplete block comment"),
            ReadError::StraySpecifier(c) => write!(f, "stray reader specifier: {:?}", c),
            ReadError::DanglingPrefix(s) => write!(f, "dangling reader prefix: {:?}", s),
        }
    }
}

/// The four kinds of control-disrupting event spec.md §7 distinguishes.
///
/// `Jump` carries exactly one datum through the `Interpreter`'s jump slot
/// (spec.md §9 redesigns Heist's `G::JUMP_GLOBAL_PRIMITIVE_ARGUMENT` global
/// into an explicit field on `Interpreter` rather than a true global).
#[derive(Clone, Debug)]
pub enum SchemeError {
    Eval(String),
    Read(ReadError),
    Exit(i32),
    Jump(Value),
}

impl fmt::Display for SchemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemeError::Eval(msg) => write!(f, "{}", msg),
            SchemeError::Read(e) => write!(f, "{}", e),
            SchemeError::Exit(code) => write!(f, "exit({})", code),
            SchemeError::Jump(_) => write!(f, "non-local jump in flight"),
        }
    }
}

impl std::error::Error for SchemeError {}

impl From<ReadError> for SchemeError {
    fn from(e: ReadError) -> Self {
        SchemeError::Read(e)
    }
}

impl SchemeError {
    pub fn eval(msg: impl Into<String>) -> Self {
        SchemeError::Eval(msg.into())
    }
}

/// The seam structural operations use to invoke a user object's own
/// methods (`this=`, `this->string`, ...) without this crate depending on
/// an evaluator. Grounded on `heist_types_toolkit.hpp`'s `prm_DYNAMIC_OBJeq`
/// and `cio_obj_str`, which both search `method_names` for a
/// convention-named method and invoke it through `execute_application`;
/// here that invocation is an injected trait object instead of a direct
/// call into the evaluator, avoiding a circular crate dependency
/// (spec.md §9).
pub trait MethodDispatch {
    /// Invoke `method` on `object` with `args`. Returns `Ok(None)` if the
    /// object has no such method (callers fall back to default behavior,
    /// matching Heist's `cio_obj_str` falling back to `#<object[0x...]>`
    /// when no `this->string` method exists).
    fn invoke(
        &self,
        object: &ObjectData,
        method: &str,
        args: &[Value],
    ) -> Result<Option<Value>, SchemeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_converts_into_scheme_error() {
        let err: SchemeError = ReadError::IncompleteString.into();
        assert!(matches!(err, SchemeError::Read(ReadError::IncompleteString)));
    }

    #[test]
    fn display_messages_are_non_empty() {
        assert!(!SchemeError::Exit(1).to_string().is_empty());
        assert!(!SchemeError::eval("boom").to_string().is_empty());
    }
}
