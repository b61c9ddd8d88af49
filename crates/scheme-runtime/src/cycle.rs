//! Floyd's tortoise-and-hare cycle detection, shared by every list walker
//! in this crate (serialization, `equal?`, deep copy, length/list?
//! classification). Grounded on `heist_types_toolkit.hpp`'s
//! `cio_list_str_recur` and `deep_copy_circular_list`, both of which walk
//! a fast/slow pointer pair to find where a list's tail loops back on
//! itself (spec.md §4.1).

use std::rc::Rc;

use scheme_core::value::{PairHandle, Value};

/// The shape of a (possibly improper, possibly circular) cons chain.
#[derive(Debug, Clone)]
pub enum ListShape {
    /// Terminates in the empty list.
    Proper,
    /// Terminates in something other than the empty list.
    Improper,
    /// Loops back on itself; carries the pair where the loop begins.
    Cyclic(PairHandle),
}

fn pair_handle(v: &Value) -> Option<PairHandle> {
    match v {
        Value::Pair(p) => Some(p.clone()),
        _ => None,
    }
}

fn terminal_shape(tail: &Value) -> ListShape {
    if tail.is_empty_list() {
        ListShape::Proper
    } else {
        ListShape::Improper
    }
}

/// Classify `head`'s cons chain. Runs in O(n) time and O(1) space via
/// Floyd's algorithm, never looping forever even on a self-referential
/// list.
pub fn classify(head: &Value) -> ListShape {
    let Some(_) = pair_handle(head) else {
        return terminal_shape(head);
    };

    // Phase 1: advance slow by one, fast by two, until they meet (cyclic)
    // or fast runs off the end (acyclic).
    let mut slow = head.clone();
    let mut fast = head.clone();
    let meeting_pair = loop {
        let fast_pair = match pair_handle(&fast) {
            Some(p) => p,
            None => return terminal_shape(&fast),
        };
        let after_one = fast_pair.borrow().cdr.clone();
        let fast_pair2 = match pair_handle(&after_one) {
            Some(p) => p,
            None => return terminal_shape(&after_one),
        };
        fast = fast_pair2.borrow().cdr.clone();

        let slow_pair = pair_handle(&slow).expect("slow trails fast by construction");
        slow = slow_pair.borrow().cdr.clone();

        if let (Value::Pair(fp), Value::Pair(sp)) = (&fast, &slow) {
            if Rc::ptr_eq(fp, sp) {
                break fp.clone();
            }
        }
    };

    // Phase 2: walk one pointer from `head` and one from the meeting
    // point, one step at a time; they converge exactly at the cycle's
    // entry pair.
    let mut from_head = head.clone();
    let mut from_meeting = Value::Pair(meeting_pair);
    loop {
        let head_pair = pair_handle(&from_head).expect("head side stays within the cycle's tail");
        let meeting_pair = pair_handle(&from_meeting).expect("meeting side stays within the cycle");
        if Rc::ptr_eq(&head_pair, &meeting_pair) {
            return ListShape::Cyclic(head_pair);
        }
        from_head = head_pair.borrow().cdr.clone();
        from_meeting = meeting_pair.borrow().cdr.clone();
    }
}

pub fn is_proper_list(head: &Value) -> bool {
    matches!(classify(head), ListShape::Proper)
}

pub fn is_circular(head: &Value) -> bool {
    matches!(classify(head), ListShape::Cyclic(_))
}

/// Yields each element (the `car`) of a cons chain, stopping cleanly at
/// the tail for proper/improper lists and at the second visit to the
/// cycle's entry pair for circular ones — never iterating forever.
pub struct CycleSafeIter {
    current: Option<Value>,
    cycle_entry_addr: Option<usize>,
    entry_seen: bool,
}

impl CycleSafeIter {
    pub fn new(head: &Value) -> Self {
        let cycle_entry_addr = match classify(head) {
            ListShape::Cyclic(entry) => Some(Rc::as_ptr(&entry) as usize),
            _ => None,
        };
        CycleSafeIter {
            current: Some(head.clone()),
            cycle_entry_addr,
            entry_seen: false,
        }
    }

    /// The final non-pair value the chain ends on (the empty list for a
    /// proper list, a bare datum for an improper one). `None` while the
    /// chain hasn't been fully consumed, or for a circular chain.
    pub fn tail(&self) -> Option<Value> {
        match &self.current {
            Some(v) if !v.is_pair() => Some(v.clone()),
            _ => None,
        }
    }
}

impl Iterator for CycleSafeIter {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        let cur = self.current.take()?;
        let pair = match pair_handle(&cur) {
            Some(p) => p,
            None => {
                self.current = Some(cur);
                return None;
            }
        };

        if let Some(entry_addr) = self.cycle_entry_addr {
            let addr = Rc::as_ptr(&pair) as usize;
            if addr == entry_addr {
                if self.entry_seen {
                    self.current = None;
                    return None;
                }
                self.entry_seen = true;
            }
        }

        let car = pair.borrow().car.clone();
        let next = pair.borrow().cdr.clone();
        self.current = Some(next);
        Some(car)
    }
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
    fn classifies_proper_lists() {
        assert!(matches!(classify(&list_of(&[1, 2, 3])), ListShape::Proper));
        assert!(matches!(classify(&Value::empty_list()), ListShape::Proper));
    }

    #[test]
    fn classifies_improper_lists() {
        let improper = Value::cons(Value::Number(Number::Exact(1)), Value::Bool(false));
        assert!(matches!(classify(&improper), ListShape::Improper));
    }

    #[test]
    fn classifies_atoms_as_improper() {
        assert!(matches!(classify(&Value::Bool(true)), ListShape::Improper));
    }

    #[test]
    fn detects_self_referential_cycle() {
        let pair = match Value::cons(Value::Number(Number::Exact(1)), Value::empty_list()) {
            Value::Pair(p) => p,
            _ => unreachable!(),
        };
        pair.borrow_mut().cdr = Value::Pair(pair.clone());
        let shape = classify(&Value::Pair(pair.clone()));
        match shape {
            ListShape::Cyclic(entry) => assert!(Rc::ptr_eq(&entry, &pair)),
            other => panic!("expected Cyclic, got {:?}", other),
        }
    }

    #[test]
    fn cycle_safe_iter_terminates_on_circular_list() {
        let pair = match Value::cons(Value::Number(Number::Exact(1)), Value::empty_list()) {
            Value::Pair(p) => p,
            _ => unreachable!(),
        };
        pair.borrow_mut().cdr = Value::Pair(pair.clone());
        let items: Vec<_> = CycleSafeIter::new(&Value::Pair(pair)).collect();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn cycle_safe_iter_yields_all_elements_and_exposes_tail() {
        let iter = CycleSafeIter::new(&list_of(&[1, 2, 3]));
        let items: Vec<_> = iter.collect();
        assert_eq!(items.len(), 3);
    }
}
