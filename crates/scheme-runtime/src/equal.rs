//! Deep structural equality (`equal?`).
//!
//! Grounded on `heist_types_toolkit.hpp`'s `prm_compare_*` family:
//! `prm_compare_atomic_values` (exactness-aware numeric compare),
//! `prm_compare_PAIRs`/`prm_compare_VECTs`/`prm_compare_HMAPs` (structural
//! recursion), and `prm_compare_OBJs`/`prm_DYNAMIC_OBJeq` (proto identity
//! plus an optional user-defined `this=` override, tried first). spec.md
//! §4.3.
//!
//! Cycles are handled per the recorded Open Question decision: each pair
//! of addresses currently being compared is tracked, and a pair revisited
//! mid-comparison is treated as equal rather than recursing forever —
//! each side is bounded at its own cycle entry, not merged into the
//! other's.

use std::collections::HashSet;
use std::rc::Rc;

use scheme_core::error::MethodDispatch;
use scheme_core::value::{ObjectData, Value};

type Seen = HashSet<(usize, usize)>;

pub fn equal(a: &Value, b: &Value, dispatch: Option<&dyn MethodDispatch>) -> bool {
    let mut seen = Seen::new();
    equal_rec(a, b, dispatch, &mut seen)
}

fn equal_rec(a: &Value, b: &Value, dispatch: Option<&dyn MethodDispatch>, seen: &mut Seen) -> bool {
    use Value::*;
    match (a, b) {
        (Undefined, Undefined) | (Void, Void) | (UnspecifiedExecutable, UnspecifiedExecutable) => true,
        (Bool(x), Bool(y)) => x == y,
        (Char(x), Char(y)) => x == y,
        (Number(x), Number(y)) => x.numerically_equal(y),
        (Symbol(x), Symbol(y)) => x == y,
        (Str(x), Str(y)) => *x.borrow() == *y.borrow(),

        (Vector(x), Vector(y)) => {
            if Rc::ptr_eq(x, y) {
                return true;
            }
            let xb = x.borrow();
            let yb = y.borrow();
            xb.len() == yb.len()
                && xb.iter().zip(yb.iter()).all(|(ea, eb)| equal_rec(ea, eb, dispatch, seen))
        }

        (HashMap(x), HashMap(y)) => {
            if Rc::ptr_eq(x, y) {
                return true;
            }
            let xb = x.borrow();
            let yb = y.borrow();
            xb.len() == yb.len()
                && xb.iter().all(|(k, v)| {
                    yb.get(k).map_or(false, |v2| equal_rec(v, v2, dispatch, seen))
                })
        }

        (Pair(x), Pair(y)) => {
            if Rc::ptr_eq(x, y) {
                return true;
            }
            let key = (Rc::as_ptr(x) as usize, Rc::as_ptr(y) as usize);
            if !seen.insert(key) {
                // Already mid-comparison for this exact pair of addresses;
                // we've gone around a cycle on (at least) one side.
                return true;
            }
            let (car_a, cdr_a) = {
                let xb = x.borrow();
                (xb.car.clone(), xb.cdr.clone())
            };
            let (car_b, cdr_b) = {
                let yb = y.borrow();
                (yb.car.clone(), yb.cdr.clone())
            };
            equal_rec(&car_a, &car_b, dispatch, seen) && equal_rec(&cdr_a, &cdr_b, dispatch, seen)
        }

        (Object(x), Object(y)) => object_equal(x, y, dispatch, seen),

        (InPort(x), InPort(y)) | (OutPort(x), OutPort(y)) => x == y,
        (Primitive(p1), Primitive(p2)) => Rc::ptr_eq(&p1.func, &p2.func),
        (Compound(c1), Compound(c2)) => Rc::ptr_eq(c1, c2),
        (Delay(d1), Delay(d2)) => Rc::ptr_eq(d1, d2),
        (Environment(e1), Environment(e2)) => Rc::ptr_eq(e1, e2),
        (SyntaxRule(s1), SyntaxRule(s2)) => Rc::ptr_eq(s1, s2),
        (Expr(e1), Expr(e2)) => {
            Rc::ptr_eq(e1, e2)
                || (e1.len() == e2.len()
                    && e1.iter().zip(e2.iter()).all(|(a, b)| equal_rec(a, b, dispatch, seen)))
        }

        _ => false,
    }
}

fn object_equal(
    a: &Rc<std::cell::RefCell<ObjectData>>,
    b: &Rc<std::cell::RefCell<ObjectData>>,
    dispatch: Option<&dyn MethodDispatch>,
    seen: &mut Seen,
) -> bool {
    if Rc::ptr_eq(a, b) {
        return true;
    }

    // `heist_types_toolkit.hpp`'s `prm_DYNAMIC_OBJeq`: look for a
    // user-defined `this=` override before falling back to structural
    // comparison.
    if let Some(d) = dispatch {
        let invoked = {
            let ab = a.borrow();
            d.invoke(&ab, "this=", &[Value::Object(b.clone())])
        };
        if let Ok(Some(result)) = invoked {
            return result.is_truthy();
        }
    }

    let ab = a.borrow();
    let bb = b.borrow();
    let proto_eq = match (&ab.proto, &bb.proto) {
        (Some(p1), Some(p2)) => Rc::ptr_eq(p1, p2),
        (None, None) => true,
        _ => false,
    };
    proto_eq
        && ab.member_names == bb.member_names
        && ab.method_names == bb.method_names
        && ab.member_values.len() == bb.member_values.len()
        && ab
            .member_values
            .iter()
            .zip(bb.member_values.iter())
            .all(|(x, y)| equal_rec(x, y, dispatch, seen))
}
