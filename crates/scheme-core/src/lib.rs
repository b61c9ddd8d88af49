//! Value representation and interpreter context for a Scheme dialect.
//!
//! This crate is the "V" layer: the `Value` datum, its shared-handle
//! payload types, lexical environments, the four-kind error model, and
//! the process-wide `Interpreter` context. Structural operations over
//! `Value` (equality, copying, serialization, sequence combinators,
//! streams) live one layer up, in `scheme-runtime`.

pub mod env;
pub mod error;
pub mod interp;
pub mod number;
pub mod symbol;
pub mod value;

pub use env::EnvHandle;
pub use error::{MethodDispatch, ReadError, SchemeError};
pub use interp::Interpreter;
pub use number::Number;
pub use symbol::Symbol;
pub use value::{
    CompoundProc, DelayData, HashKey, HashMapHandle, ObjectData, PairData, PairHandle,
    PortId, PrimitiveProc, StrHandle, SyntaxRuleData, Value, VectorHandle,
};
