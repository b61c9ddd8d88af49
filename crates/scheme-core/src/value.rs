//! The `Value` datum and its shared-handle payload types.
//!
//! Grounded on `examples/navicore-cem3/crates/runtime/src/value.rs`'s
//! enum shape and ownership doc comments, generalized from the teacher's
//! flat FFI-friendly layout (`#[repr(C)]`, `Arc`-shared variants sized to
//! fit an LLVM-callable struct) to a tree-walker's needs: `Rc<RefCell<_>>`
//! handles for anything spec.md §3.1 calls "shared, mutable", and plain
//! owned data for anything atomic-by-value. The cons-pair shape itself has
//! no analogue in the teacher (Seq represents sequences as flat variant
//! arrays); that part follows `other_examples/...toolness-ascheme` and
//! `...jarcane-oxischeme`'s idiomatic `Rc`-based pair representations.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::env::EnvHandle;
use crate::error::SchemeError;
use crate::interp::Interpreter;
use crate::number::Number;
use crate::symbol::{empty_list_symbol, Symbol};

/// A mutable cons cell. Identity (not content) is what `eq?` compares.
#[derive(Debug)]
pub struct PairData {
    pub car: Value,
    pub cdr: Value,
}

pub type PairHandle = Rc<RefCell<PairData>>;
pub type StrHandle = Rc<RefCell<String>>;
pub type VectorHandle = Rc<RefCell<Vec<Value>>>;

/// A restricted key type for `Value::HashMap`. Only atomic-by-value data
/// and content-hashable strings/symbols are legal keys; this mirrors the
/// teacher's own `MapKey` enum (`value.rs`), which likewise narrows
/// `Value` down to a hashable subset (`Int`/`String`/`Bool`) rather than
/// attempting a general `Hash` impl over the whole datum space.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HashKey {
    Bool(bool),
    Char(char),
    ExactInt(i64),
    Symbol(Symbol),
    Str(String),
}

impl HashKey {
    pub fn from_value(v: &Value) -> Option<HashKey> {
        match v {
            Value::Bool(b) => Some(HashKey::Bool(*b)),
            Value::Char(c) => Some(HashKey::Char(*c)),
            Value::Number(Number::Exact(i)) => Some(HashKey::ExactInt(*i)),
            Value::Symbol(s) => Some(HashKey::Symbol(s.clone())),
            Value::Str(s) => Some(HashKey::Str(s.borrow().clone())),
            _ => None,
        }
    }
}

pub type HashMapHandle = Rc<RefCell<HashMap<HashKey, Value>>>;

/// The native function pointer behind a `Value::Primitive`.
pub type NativeFn = Rc<dyn Fn(&[Value], &Interpreter) -> Result<Value, SchemeError>>;

#[derive(Clone)]
pub struct PrimitiveProc {
    pub name: Symbol,
    pub func: NativeFn,
}

impl fmt::Debug for PrimitiveProc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrimitiveProc({})", self.name)
    }
}

/// A user-defined closure: parameter list, optional rest parameter, body
/// expression, and the defining environment.
#[derive(Debug)]
pub struct CompoundProc {
    pub params: Vec<Symbol>,
    pub variadic: Option<Symbol>,
    pub body: Rc<Vec<Value>>,
    pub env: EnvHandle,
    pub name: RefCell<Option<Symbol>>,
}

/// A `delay`ed computation: forced at most once, then memoized in place.
/// spec.md §4.6 / §8 (`force` memoization invariant).
#[derive(Debug)]
pub struct DelayData {
    pub expr: Value,
    pub env: EnvHandle,
    pub forced: bool,
    pub result: Option<Value>,
}

/// Pattern/template pair for one `syntax-rules` clause, plus the macro's
/// literal keyword set.
#[derive(Debug)]
pub struct SyntaxRuleData {
    pub label: Symbol,
    pub keywords: Vec<Symbol>,
    pub patterns: Vec<Value>,
    pub templates: Vec<Value>,
}

/// Opaque index into the `Interpreter`'s port registry. The registry
/// itself, and all actual I/O, live outside this crate's scope
/// (spec.md §1 Non-goals).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PortId(pub usize);

/// An object instance: a prototype link plus its own member/method
/// tables. Grounded on `heist_types_toolkit.hpp`'s object model
/// (`proto`, `member_names`/`member_values`, `method_names`/`method_values`),
/// which `equal.rs`/`serialize.rs`/`copy.rs` all dispatch against through
/// [`crate::error::MethodDispatch`].
#[derive(Debug)]
pub struct ObjectData {
    pub proto: Option<Rc<RefCell<ObjectData>>>,
    pub member_names: Vec<Symbol>,
    pub member_values: Vec<Value>,
    pub method_names: Vec<Symbol>,
    pub method_values: Vec<Value>,
}

/// The universal Scheme datum.
///
/// Variants are grouped the way spec.md §3.1 groups them:
/// atomic-by-value, atomic-by-reference (shared, mutable), procedural,
/// and unit-like.
#[derive(Clone, Debug)]
pub enum Value {
    // --- unit-like ---
    Undefined,
    Void,
    UnspecifiedExecutable,

    // --- atomic-by-value ---
    Bool(bool),
    Char(char),
    Number(Number),
    Symbol(Symbol),

    // --- atomic-by-reference (shared, mutable handles) ---
    Str(StrHandle),
    Vector(VectorHandle),
    HashMap(HashMapHandle),
    Pair(PairHandle),

    // --- procedural ---
    Primitive(PrimitiveProc),
    Compound(Rc<CompoundProc>),
    Delay(Rc<RefCell<DelayData>>),

    // --- interpreter-adjacent handles ---
    Environment(EnvHandle),
    SyntaxRule(Rc<SyntaxRuleData>),
    InPort(PortId),
    OutPort(PortId),
    Expr(Rc<Vec<Value>>),
    Object(Rc<RefCell<ObjectData>>),
}

impl Value {
    pub fn empty_list() -> Value {
        Value::Symbol(empty_list_symbol())
    }

    pub fn is_empty_list(&self) -> bool {
        matches!(self, Value::Symbol(s) if *s == empty_list_symbol())
    }

    pub fn cons(car: Value, cdr: Value) -> Value {
        Value::Pair(Rc::new(RefCell::new(PairData { car, cdr })))
    }

    pub fn is_pair(&self) -> bool {
        matches!(self, Value::Pair(_))
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false))
    }

    /// Identity comparison: the `eq?` relation spec.md describes as
    /// "pointer/handle identity for anything reference-shaped, ordinary
    /// value equality for anything atomic". This is distinct from the
    /// deep structural `equal?` that lives in `scheme-runtime::equal`.
    pub fn is_identical(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (Undefined, Undefined) | (Void, Void) | (UnspecifiedExecutable, UnspecifiedExecutable) => true,
            (Bool(a), Bool(b)) => a == b,
            (Char(a), Char(b)) => a == b,
            (Number(a), Number(b)) => a.numerically_equal(b),
            (Symbol(a), Symbol(b)) => a == b,
            (Str(a), Str(b)) => Rc::ptr_eq(a, b),
            (Vector(a), Vector(b)) => Rc::ptr_eq(a, b),
            (HashMap(a), HashMap(b)) => Rc::ptr_eq(a, b),
            (Pair(a), Pair(b)) => Rc::ptr_eq(a, b),
            (Primitive(a), Primitive(b)) => Rc::ptr_eq(&a.func, &b.func),
            (Compound(a), Compound(b)) => Rc::ptr_eq(a, b),
            (Delay(a), Delay(b)) => Rc::ptr_eq(a, b),
            (Environment(a), Environment(b)) => Rc::ptr_eq(a, b),
            (SyntaxRule(a), SyntaxRule(b)) => Rc::ptr_eq(a, b),
            (InPort(a), InPort(b)) | (OutPort(a), OutPort(b)) => a == b,
            (Expr(a), Expr(b)) => Rc::ptr_eq(a, b),
            (Object(a), Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Void => "void",
            Value::UnspecifiedExecutable => "unspecified",
            Value::Bool(_) => "boolean",
            Value::Char(_) => "character",
            Value::Number(_) => "number",
            Value::Symbol(_) => "symbol",
            Value::Str(_) => "string",
            Value::Vector(_) => "vector",
            Value::HashMap(_) => "hash-map",
            Value::Pair(_) => "pair",
            Value::Primitive(_) => "primitive",
            Value::Compound(_) => "procedure",
            Value::Delay(_) => "promise",
            Value::Environment(_) => "environment",
            Value::SyntaxRule(_) => "syntax-rules",
            Value::InPort(_) => "input-port",
            Value::OutPort(_) => "output-port",
            Value::Expr(_) => "expression",
            Value::Object(_) => "object",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_is_a_symbol_not_a_pair() {
        let v = Value::empty_list();
        assert!(v.is_empty_list());
        assert!(!v.is_pair());
    }

    #[test]
    fn identity_for_pairs_is_pointer_based() {
        let a = Value::cons(Value::Number(Number::Exact(1)), Value::empty_list());
        let b = Value::cons(Value::Number(Number::Exact(1)), Value::empty_list());
        assert!(a.is_identical(&a.clone()));
        assert!(!a.is_identical(&b));
    }

    #[test]
    fn false_is_the_only_falsy_value() {
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::empty_list().is_truthy());
        assert!(Value::Number(Number::Exact(0)).is_truthy());
    }

    #[test]
    fn hash_key_rejects_reference_types() {
        let pair = Value::cons(Value::Bool(true), Value::empty_list());
        assert!(HashKey::from_value(&pair).is_none());
        assert!(HashKey::from_value(&Value::Bool(true)).is_some());
    }
}
