//! Deep copy.
//!
//! Grounded on `heist_types_toolkit.hpp`'s `deep_copy_pair` /
//! `deep_copy_circular_list` / `deep_copy_obj` (spec.md §4.4). Heist finds
//! the cycle's start explicitly and stitches the copy back together in
//! three phases (prefix, cycle link, remainder); this uses the idiomatic
//! Rust equivalent — an address-keyed memo table — which gets the same
//! result (a structurally identical copy with its own sharing and cycles
//! preserved) without needing `cycle::classify` up front, and as a bonus
//! also preserves *shared* (not just cyclic) substructure, which Heist's
//! three-phase approach doesn't attempt.

use std::cell::RefCell;
use std::collections::HashMap as StdMap;
use std::rc::Rc;

use scheme_core::value::{HashMapHandle, ObjectData, PairData, Value, VectorHandle};

pub fn deep_copy(v: &Value) -> Value {
    let mut memo: StdMap<usize, Value> = StdMap::new();
    deep_copy_rec(v, &mut memo)
}

fn deep_copy_rec(v: &Value, memo: &mut StdMap<usize, Value>) -> Value {
    match v {
        Value::Pair(p) => {
            let addr = Rc::as_ptr(p) as usize;
            if let Some(existing) = memo.get(&addr) {
                return existing.clone();
            }
            let new_pair = Rc::new(RefCell::new(PairData {
                car: Value::Undefined,
                cdr: Value::Undefined,
            }));
            memo.insert(addr, Value::Pair(new_pair.clone()));
            let (car, cdr) = {
                let b = p.borrow();
                (b.car.clone(), b.cdr.clone())
            };
            let new_car = deep_copy_rec(&car, memo);
            let new_cdr = deep_copy_rec(&cdr, memo);
            new_pair.borrow_mut().car = new_car;
            new_pair.borrow_mut().cdr = new_cdr;
            Value::Pair(new_pair)
        }

        Value::Vector(vec) => {
            let addr = Rc::as_ptr(vec) as usize;
            if let Some(existing) = memo.get(&addr) {
                return existing.clone();
            }
            let new_vec: VectorHandle = Rc::new(RefCell::new(Vec::new()));
            memo.insert(addr, Value::Vector(new_vec.clone()));
            let items: Vec<Value> = vec.borrow().clone();
            let copied: Vec<Value> = items.iter().map(|it| deep_copy_rec(it, memo)).collect();
            *new_vec.borrow_mut() = copied;
            Value::Vector(new_vec)
        }

        Value::Str(s) => Value::Str(Rc::new(RefCell::new(s.borrow().clone()))),

        Value::HashMap(m) => {
            let addr = Rc::as_ptr(m) as usize;
            if let Some(existing) = memo.get(&addr) {
                return existing.clone();
            }
            let new_map: HashMapHandle = Rc::new(RefCell::new(StdMap::new()));
            memo.insert(addr, Value::HashMap(new_map.clone()));
            let entries: Vec<_> = m.borrow().iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            let mut out = StdMap::new();
            for (k, val) in entries {
                out.insert(k, deep_copy_rec(&val, memo));
            }
            *new_map.borrow_mut() = out;
            Value::HashMap(new_map)
        }

        // `deep_copy_obj`: `proto` is shared, `member_values` are deep
        // copied, `method_values` (procedures) are left as-is — copying
        // code has no meaning here.
        Value::Object(o) => {
            let addr = Rc::as_ptr(o) as usize;
            if let Some(existing) = memo.get(&addr) {
                return existing.clone();
            }
            let placeholder = Rc::new(RefCell::new(ObjectData {
                proto: None,
                member_names: Vec::new(),
                member_values: Vec::new(),
                method_names: Vec::new(),
                method_values: Vec::new(),
            }));
            memo.insert(addr, Value::Object(placeholder.clone()));
            let (proto, member_names, member_values, method_names, method_values) = {
                let b = o.borrow();
                (
                    b.proto.clone(),
                    b.member_names.clone(),
                    b.member_values.clone(),
                    b.method_names.clone(),
                    b.method_values.clone(),
                )
            };
            let new_members: Vec<Value> = member_values.iter().map(|mv| deep_copy_rec(mv, memo)).collect();
            *placeholder.borrow_mut() = ObjectData {
                proto,
                member_names,
                member_values: new_members,
                method_names,
                method_values,
            };
            Value::Object(placeholder)
        }

        // Atomic-by-value data, and every procedural/environment/port
        // handle: cheap to clone, and sharing (not duplicating) is the
        // correct semantics for code and mutable bindings.
        other => other.clone(),
    }
}
