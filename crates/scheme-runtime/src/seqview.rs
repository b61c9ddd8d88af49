//! `SeqView`: the capability trait that lets [`crate::combinators`] treat
//! lists, vectors, and strings uniformly. Grounded on spec.md §9's
//! redesign note calling for exactly this seam (`len`, `get`, `set`,
//! `new_of_shape`, `push`) so the combinator family isn't tripled into
//! list/vector/string copies the way the teacher's `list_ops.rs` only
//! ever handles one shape (its own FFI list type).

use scheme_core::error::SchemeError;
use scheme_core::value::{StrHandle, Value, VectorHandle};

use crate::cycle::CycleSafeIter;
use crate::list_ops;

/// A read/build view over one of the three sequence shapes. Combinators
/// read an input via `len`/`get`, then build a same-shape result by
/// calling `new_of_shape`, repeated `push`es, and finally `finish`.
pub trait SeqView {
    fn len(&self) -> usize;
    fn get(&self, index: usize) -> Value;
    fn set(&mut self, index: usize, value: Value);
    fn new_of_shape(capacity: usize) -> Self
    where
        Self: Sized;
    fn push(&mut self, value: Value);
    /// Materialize the built-up elements back into a `Value` of this
    /// view's shape.
    fn finish(self) -> Value;
}

pub struct ListSeq(Vec<Value>);

impl ListSeq {
    pub fn from_value(v: &Value) -> Result<Self, SchemeError> {
        if !list_ops::is_list(v) {
            return Err(SchemeError::eval("expected a proper list"));
        }
        Ok(ListSeq(CycleSafeIter::new(v).collect()))
    }
}

impl SeqView for ListSeq {
    fn len(&self) -> usize {
        self.0.len()
    }
    fn get(&self, index: usize) -> Value {
        self.0[index].clone()
    }
    fn set(&mut self, index: usize, value: Value) {
        self.0[index] = value;
    }
    fn new_of_shape(capacity: usize) -> Self {
        ListSeq(Vec::with_capacity(capacity))
    }
    fn push(&mut self, value: Value) {
        self.0.push(value);
    }
    fn finish(self) -> Value {
        let mut out = Value::empty_list();
        for item in self.0.into_iter().rev() {
            out = Value::cons(item, out);
        }
        out
    }
}

pub struct VectorSeq(Vec<Value>);

impl VectorSeq {
    pub fn from_handle(handle: &VectorHandle) -> Self {
        VectorSeq(handle.borrow().clone())
    }
}

impl SeqView for VectorSeq {
    fn len(&self) -> usize {
        self.0.len()
    }
    fn get(&self, index: usize) -> Value {
        self.0[index].clone()
    }
    fn set(&mut self, index: usize, value: Value) {
        self.0[index] = value;
    }
    fn new_of_shape(capacity: usize) -> Self {
        VectorSeq(Vec::with_capacity(capacity))
    }
    fn push(&mut self, value: Value) {
        self.0.push(value);
    }
    fn finish(self) -> Value {
        Value::Vector(std::rc::Rc::new(std::cell::RefCell::new(self.0)))
    }
}

/// Strings are sequences of characters; elements are `Value::Char`.
/// Pushing a non-character value is a caller bug (combinators never do
/// this — a string-shaped input always yields string-shaped output), so
/// it panics rather than threading an error through every `push` call.
pub struct StringSeq(Vec<char>);

impl StringSeq {
    pub fn from_handle(handle: &StrHandle) -> Self {
        StringSeq(handle.borrow().chars().collect())
    }
}

impl SeqView for StringSeq {
    fn len(&self) -> usize {
        self.0.len()
    }
    fn get(&self, index: usize) -> Value {
        Value::Char(self.0[index])
    }
    fn set(&mut self, index: usize, value: Value) {
        if let Value::Char(c) = value {
            self.0[index] = c;
        } else {
            panic!("StringSeq::set called with a non-character value");
        }
    }
    fn new_of_shape(capacity: usize) -> Self {
        StringSeq(Vec::with_capacity(capacity))
    }
    fn push(&mut self, value: Value) {
        match value {
            Value::Char(c) => self.0.push(c),
            other => panic!("StringSeq::push called with {:?}", other),
        }
    }
    fn finish(self) -> Value {
        let s: String = self.0.into_iter().collect();
        Value::Str(std::rc::Rc::new(std::cell::RefCell::new(s)))
    }
}

/// Shape-erased wrapper used by [`crate::combinators`] so one combinator
/// body can run over whichever of the three shapes its caller handed it.
/// `SeqView::new_of_shape` is an associated function with no `self`, so
/// it can't tell a trait object what shape to build — `AnySeq` instead
/// exposes an inherent `new_like` that remembers its own variant. The
/// trait itself stays implemented only by the three concrete view types,
/// which is the capability spec.md §9 actually asks for; this enum is
/// just the dispatch glue.
pub enum AnySeq {
    List(ListSeq),
    Vector(VectorSeq),
    Str(StringSeq),
}

impl AnySeq {
    pub fn from_value(v: &Value) -> Result<Self, SchemeError> {
        if v.is_pair() || v.is_empty_list() {
            return Ok(AnySeq::List(ListSeq::from_value(v)?));
        }
        match v {
            Value::Vector(h) => Ok(AnySeq::Vector(VectorSeq::from_handle(h))),
            Value::Str(h) => Ok(AnySeq::Str(StringSeq::from_handle(h))),
            other => Err(SchemeError::eval(format!(
                "expected a list, vector, or string, got {}",
                other.type_name()
            ))),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AnySeq::List(s) => s.len(),
            AnySeq::Vector(s) => s.len(),
            AnySeq::Str(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Value {
        match self {
            AnySeq::List(s) => s.get(index),
            AnySeq::Vector(s) => s.get(index),
            AnySeq::Str(s) => s.get(index),
        }
    }

    pub fn set(&mut self, index: usize, value: Value) {
        match self {
            AnySeq::List(s) => s.set(index, value),
            AnySeq::Vector(s) => s.set(index, value),
            AnySeq::Str(s) => s.set(index, value),
        }
    }

    pub fn new_like(&self, capacity: usize) -> AnySeq {
        match self {
            AnySeq::List(_) => AnySeq::List(ListSeq::new_of_shape(capacity)),
            AnySeq::Vector(_) => AnySeq::Vector(VectorSeq::new_of_shape(capacity)),
            AnySeq::Str(_) => AnySeq::Str(StringSeq::new_of_shape(capacity)),
        }
    }

    pub fn push(&mut self, value: Value) {
        match self {
            AnySeq::List(s) => s.push(value),
            AnySeq::Vector(s) => s.push(value),
            AnySeq::Str(s) => s.push(value),
        }
    }

    pub fn finish(self) -> Value {
        match self {
            AnySeq::List(s) => s.finish(),
            AnySeq::Vector(s) => s.finish(),
            AnySeq::Str(s) => s.finish(),
        }
    }
}
