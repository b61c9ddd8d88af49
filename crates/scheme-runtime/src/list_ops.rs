//! Cons list algebra: accessors, the car/cdr composition family, and the
//! classic list primitives (`member`, `assoc`, `append`, `reverse`,
//! `list-tail`, `list-ref`).
//!
//! Grounded on `examples/navicore-cem3/crates/runtime/src/list_ops.rs`
//! for per-operation doc-comment and error-path conventions, and on
//! `other_examples/...jarcane-oxischeme`'s car/cdr composition family for
//! naming (`cadr`, `caddr`, ...) — generalized here to plain safe
//! functions returning `Result<Value, SchemeError>` instead of that
//! teacher's FFI stack-effect functions.

use scheme_core::error::SchemeError;
use scheme_core::value::Value;

use crate::cycle::{classify, CycleSafeIter, ListShape};

fn not_a_pair(op: &str, v: &Value) -> SchemeError {
    SchemeError::eval(format!("{}: expected a pair, got {}", op, v.type_name()))
}

pub fn cons(car: Value, cdr: Value) -> Value {
    Value::cons(car, cdr)
}

pub fn car(v: &Value) -> Result<Value, SchemeError> {
    match v {
        Value::Pair(p) => Ok(p.borrow().car.clone()),
        other => Err(not_a_pair("car", other)),
    }
}

pub fn cdr(v: &Value) -> Result<Value, SchemeError> {
    match v {
        Value::Pair(p) => Ok(p.borrow().cdr.clone()),
        other => Err(not_a_pair("cdr", other)),
    }
}

pub fn set_car(v: &Value, new_car: Value) -> Result<(), SchemeError> {
    match v {
        Value::Pair(p) => {
            p.borrow_mut().car = new_car;
            Ok(())
        }
        other => Err(not_a_pair("set-car!", other)),
    }
}

pub fn set_cdr(v: &Value, new_cdr: Value) -> Result<(), SchemeError> {
    match v {
        Value::Pair(p) => {
            p.borrow_mut().cdr = new_cdr;
            Ok(())
        }
        other => Err(not_a_pair("set-cdr!", other)),
    }
}

/// Apply a sequence of `a`/`d` selectors right-to-left, e.g. `"ad"` means
/// `(car (cdr v))`, i.e. `cadr`.
fn compose(path: &str, v: &Value) -> Result<Value, SchemeError> {
    let mut current = v.clone();
    for step in path.chars().rev() {
        current = match step {
            'a' => car(&current)?,
            'd' => cdr(&current)?,
            _ => unreachable!("compose() called with a non a/d path"),
        };
    }
    Ok(current)
}

macro_rules! cxr {
    ($name:ident, $path:literal) => {
        pub fn $name(v: &Value) -> Result<Value, SchemeError> {
            compose($path, v)
        }
    };
}

cxr!(caar, "aa");
cxr!(cadr, "ad");
cxr!(cdar, "da");
cxr!(cddr, "dd");
cxr!(caaar, "aaa");
cxr!(caadr, "aad");
cxr!(cadar, "ada");
cxr!(caddr, "add");
cxr!(cdaar, "daa");
cxr!(cdadr, "dad");
cxr!(cddar, "dda");
cxr!(cdddr, "ddd");
cxr!(caaaar, "aaaa");
cxr!(caaadr, "aaad");
cxr!(caadar, "aada");
cxr!(caaddr, "aadd");
cxr!(cadaar, "adaa");
cxr!(cadadr, "adad");
cxr!(caddar, "adda");
cxr!(cadddr, "addd");
cxr!(cdaaar, "daaa");
cxr!(cdaadr, "daad");
cxr!(cdadar, "dada");
cxr!(cdaddr, "dadd");
cxr!(cddaar, "ddaa");
cxr!(cddadr, "ddad");
cxr!(cdddar, "ddda");
cxr!(cddddr, "dddd");

pub fn is_pair(v: &Value) -> bool {
    v.is_pair()
}

pub fn is_null(v: &Value) -> bool {
    v.is_empty_list()
}

pub fn is_list(v: &Value) -> bool {
    matches!(classify(v), ListShape::Proper)
}

/// Errors on improper or circular input, matching Scheme's `length`.
pub fn length(v: &Value) -> Result<usize, SchemeError> {
    match classify(v) {
        ListShape::Proper => Ok(CycleSafeIter::new(v).count()),
        ListShape::Improper => Err(SchemeError::eval("length: not a proper list")),
        ListShape::Cyclic(_) => Err(SchemeError::eval("length: circular list")),
    }
}

pub fn reverse(v: &Value) -> Result<Value, SchemeError> {
    if !is_list(v) {
        return Err(SchemeError::eval("reverse: not a proper list"));
    }
    let mut out = Value::empty_list();
    for item in CycleSafeIter::new(v) {
        out = Value::cons(item, out);
    }
    Ok(out)
}

/// Appends all but the last argument (copying their spines), then tacks
/// the last argument on unmodified as the final tail.
pub fn append(lists: &[Value]) -> Result<Value, SchemeError> {
    let Some((last, init)) = lists.split_last() else {
        return Ok(Value::empty_list());
    };
    let mut items = Vec::new();
    for list in init {
        if !is_list(list) {
            return Err(SchemeError::eval("append: not a proper list"));
        }
        items.extend(CycleSafeIter::new(list));
    }
    let mut out = last.clone();
    for item in items.into_iter().rev() {
        out = Value::cons(item, out);
    }
    Ok(out)
}

pub fn list_tail(v: &Value, k: usize) -> Result<Value, SchemeError> {
    let mut current = v.clone();
    for _ in 0..k {
        current = cdr(&current)?;
    }
    Ok(current)
}

pub fn list_ref(v: &Value, k: usize) -> Result<Value, SchemeError> {
    car(&list_tail(v, k)?)
}

fn find_by(v: &Value, pred: impl Fn(&Value) -> bool) -> Option<Value> {
    let mut current = v.clone();
    loop {
        let next = match &current {
            Value::Pair(p) => {
                let car = p.borrow().car.clone();
                if pred(&car) {
                    return Some(current.clone());
                }
                p.borrow().cdr.clone()
            }
            _ => return None,
        };
        current = next;
    }
}

pub fn memq(needle: &Value, haystack: &Value) -> Option<Value> {
    find_by(haystack, |v| v.is_identical(needle))
}

pub fn memv(needle: &Value, haystack: &Value) -> Option<Value> {
    memq(needle, haystack)
}

pub fn member(needle: &Value, haystack: &Value, dispatch: Option<&dyn scheme_core::error::MethodDispatch>) -> Option<Value> {
    find_by(haystack, |v| crate::equal::equal(v, needle, dispatch))
}

fn assoc_by(key: &Value, alist: &Value, pred: impl Fn(&Value, &Value) -> bool) -> Option<Value> {
    for entry in CycleSafeIter::new(alist) {
        if let Value::Pair(p) = &entry {
            if pred(&p.borrow().car, key) {
                return Some(entry);
            }
        }
    }
    None
}

pub fn assq(key: &Value, alist: &Value) -> Option<Value> {
    assoc_by(key, alist, |a, b| a.is_identical(b))
}

pub fn assv(key: &Value, alist: &Value) -> Option<Value> {
    assq(key, alist)
}

pub fn assoc(key: &Value, alist: &Value, dispatch: Option<&dyn scheme_core::error::MethodDispatch>) -> Option<Value> {
    assoc_by(key, alist, |a, b| crate::equal::equal(a, b, dispatch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scheme_core::number::Number;

    fn list_of(items: &[i64]) -> Value {
        let mut tail = Value::empty_list();
        for &i in items.iter().rev() {
            tail = Value::cons(Value::Number(Number::Exact(i)), tail);
        }
        tail
    }

    #[test]
    fn car_and_cdr_on_a_pair() {
        let p = Value::cons(Value::Bool(true), Value::Bool(false));
        assert!(matches!(car(&p), Ok(Value::Bool(true))));
        assert!(matches!(cdr(&p), Ok(Value::Bool(false))));
    }

    #[test]
    fn car_on_non_pair_errors() {
        assert!(car(&Value::Bool(true)).is_err());
    }

    #[test]
    fn cadr_composes_car_and_cdr() {
        let list = list_of(&[1, 2, 3]);
        let v = cadr(&list).unwrap();
        match v {
            Value::Number(Number::Exact(2)) => {}
            other => panic!("expected 2, got {:?}", other),
        }
    }

    #[test]
    fn length_rejects_improper_and_circular_lists() {
        let improper = Value::cons(Value::Bool(true), Value::Bool(false));
        assert!(length(&improper).is_err());

        let pair = match Value::cons(Value::Bool(true), Value::empty_list()) {
            Value::Pair(p) => p,
            _ => unreachable!(),
        };
        pair.borrow_mut().cdr = Value::Pair(pair.clone());
        assert!(length(&Value::Pair(pair)).is_err());
    }

    #[test]
    fn reverse_produces_opposite_order() {
        let reversed = reverse(&list_of(&[1, 2, 3])).unwrap();
        assert_eq!(length(&reversed).unwrap(), 3);
        assert!(matches!(car(&reversed), Ok(Value::Number(Number::Exact(3)))));
    }

    #[test]
    fn append_shares_the_final_list_as_tail() {
        let a = list_of(&[1, 2]);
        let b = list_of(&[3, 4]);
        let appended = append(&[a, b.clone()]).unwrap();
        assert_eq!(length(&appended).unwrap(), 4);
        let tail = list_tail(&appended, 2).unwrap();
        assert!(tail.is_identical(&b));
    }

    #[test]
    fn append_with_no_lists_is_the_empty_list() {
        assert!(append(&[]).unwrap().is_empty_list());
    }

    #[test]
    fn list_ref_indexes_from_zero() {
        let list = list_of(&[10, 20, 30]);
        assert!(matches!(list_ref(&list, 1), Ok(Value::Number(Number::Exact(20)))));
    }

    #[test]
    fn memq_finds_by_identity() {
        let list = list_of(&[1, 2, 3]);
        let two = list_ref(&list, 1).unwrap();
        assert!(memq(&two, &list).is_some());
        assert!(memq(&Value::Number(Number::Exact(99)), &list).is_none());
    }

    #[test]
    fn assoc_finds_by_structural_equality() {
        let entry1 = Value::cons(Value::Number(Number::Exact(1)), Value::Bool(true));
        let entry2 = Value::cons(Value::Number(Number::Exact(2)), Value::Bool(false));
        let alist = Value::cons(entry1, Value::cons(entry2, Value::empty_list()));
        let found = assoc(&Value::Number(Number::Exact(2)), &alist, None).unwrap();
        assert!(matches!(cdr(&found), Ok(Value::Bool(false))));
    }
}
