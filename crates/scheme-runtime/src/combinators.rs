//! Polymorphic sequence combinators: one implementation per operation,
//! dispatched across list/vector/string shapes via [`crate::seqview`].
//! Grounded on `list_ops.rs`'s per-combinator naming and edge-case
//! handling (empty input, `take`/`drop` past the end), generalized from
//! the teacher's single (list-only) shape to all three spec.md §4.5 asks
//! for.

use std::cmp::Ordering;

use scheme_core::error::SchemeError;
use scheme_core::number::Number;
use scheme_core::value::Value;

use crate::seqview::AnySeq;

/// Builds a view for every sequence in `seqs` and checks they all carry
/// the same length, per spec.md §4.5's shape-mismatch requirement for the
/// variadic combinators. Returns the shared length alongside the views.
fn parallel_views(seqs: &[Value], who: &str) -> Result<(Vec<AnySeq>, usize), SchemeError> {
    if seqs.is_empty() {
        return Err(SchemeError::eval(format!("{}: requires at least one sequence", who)));
    }
    let views: Vec<AnySeq> = seqs.iter().map(AnySeq::from_value).collect::<Result<_, _>>()?;
    let len = views[0].len();
    if views.iter().any(|v| v.len() != len) {
        return Err(SchemeError::eval(format!("{}: sequences must have the same length", who)));
    }
    Ok((views, len))
}

fn row_at(views: &[AnySeq], index: usize) -> Vec<Value> {
    views.iter().map(|v| v.get(index)).collect()
}

/// Variadic over `seqs`: `f` is called once per index with the element at
/// that index from every sequence, in order (spec.md §4.5, §8 scenario
/// `(map + '(1 2 3) '(10 20 30))` ⇒ `(11 22 33)`). The output takes the
/// first sequence's shape.
pub fn map(seqs: &[Value], f: impl Fn(&[Value]) -> Result<Value, SchemeError>) -> Result<Value, SchemeError> {
    let (views, len) = parallel_views(seqs, "map")?;
    let mut out = views[0].new_like(len);
    for i in 0..len {
        out.push(f(&row_at(&views, i))?);
    }
    Ok(out.finish())
}

pub fn for_each(seqs: &[Value], mut f: impl FnMut(&[Value]) -> Result<(), SchemeError>) -> Result<(), SchemeError> {
    let (views, len) = parallel_views(seqs, "for-each")?;
    for i in 0..len {
        f(&row_at(&views, i))?;
    }
    Ok(())
}

pub fn filter(seq: &Value, pred: impl Fn(&Value) -> Result<bool, SchemeError>) -> Result<Value, SchemeError> {
    let input = AnySeq::from_value(seq)?;
    let mut out = input.new_like(0);
    for i in 0..input.len() {
        let item = input.get(i);
        if pred(&item)? {
            out.push(item);
        }
    }
    Ok(out.finish())
}

pub fn remove(seq: &Value, pred: impl Fn(&Value) -> Result<bool, SchemeError>) -> Result<Value, SchemeError> {
    filter(seq, |v| pred(v).map(|b| !b))
}

pub fn fold(seqs: &[Value], init: Value, f: impl Fn(Value, &[Value]) -> Result<Value, SchemeError>) -> Result<Value, SchemeError> {
    let (views, len) = parallel_views(seqs, "fold")?;
    let mut acc = init;
    for i in 0..len {
        acc = f(acc, &row_at(&views, i))?;
    }
    Ok(acc)
}

pub fn fold_right(seqs: &[Value], init: Value, f: impl Fn(&[Value], Value) -> Result<Value, SchemeError>) -> Result<Value, SchemeError> {
    let (views, len) = parallel_views(seqs, "fold-right")?;
    let mut acc = init;
    for i in (0..len).rev() {
        acc = f(&row_at(&views, i), acc)?;
    }
    Ok(acc)
}

pub fn count(seq: &Value, pred: impl Fn(&Value) -> Result<bool, SchemeError>) -> Result<usize, SchemeError> {
    let input = AnySeq::from_value(seq)?;
    let mut n = 0;
    for i in 0..input.len() {
        if pred(&input.get(i))? {
            n += 1;
        }
    }
    Ok(n)
}

/// Short-circuits on the first match, as spec.md §8's scenario table
/// requires.
pub fn any(seqs: &[Value], mut pred: impl FnMut(&[Value]) -> Result<bool, SchemeError>) -> Result<bool, SchemeError> {
    let (views, len) = parallel_views(seqs, "any")?;
    for i in 0..len {
        if pred(&row_at(&views, i))? {
            return Ok(true);
        }
    }
    Ok(false)
}

pub fn every(seqs: &[Value], mut pred: impl FnMut(&[Value]) -> Result<bool, SchemeError>) -> Result<bool, SchemeError> {
    let (views, len) = parallel_views(seqs, "every")?;
    for i in 0..len {
        if !pred(&row_at(&views, i))? {
            return Ok(false);
        }
    }
    Ok(true)
}

pub fn take(seq: &Value, n: usize) -> Result<Value, SchemeError> {
    let input = AnySeq::from_value(seq)?;
    if n > input.len() {
        return Err(SchemeError::eval("take: count exceeds sequence length"));
    }
    let mut out = input.new_like(n);
    for i in 0..n {
        out.push(input.get(i));
    }
    Ok(out.finish())
}

pub fn drop(seq: &Value, n: usize) -> Result<Value, SchemeError> {
    let input = AnySeq::from_value(seq)?;
    if n > input.len() {
        return Err(SchemeError::eval("drop: count exceeds sequence length"));
    }
    let mut out = input.new_like(input.len() - n);
    for i in n..input.len() {
        out.push(input.get(i));
    }
    Ok(out.finish())
}

pub fn take_while(seq: &Value, pred: impl Fn(&Value) -> Result<bool, SchemeError>) -> Result<Value, SchemeError> {
    let input = AnySeq::from_value(seq)?;
    let mut out = input.new_like(0);
    for i in 0..input.len() {
        let item = input.get(i);
        if !pred(&item)? {
            break;
        }
        out.push(item);
    }
    Ok(out.finish())
}

pub fn drop_while(seq: &Value, pred: impl Fn(&Value) -> Result<bool, SchemeError>) -> Result<Value, SchemeError> {
    let input = AnySeq::from_value(seq)?;
    let mut start = 0;
    while start < input.len() && pred(&input.get(start))? {
        start += 1;
    }
    let mut out = input.new_like(input.len() - start);
    for i in start..input.len() {
        out.push(input.get(i));
    }
    Ok(out.finish())
}

/// `take-right`: the last `n` elements, as a sequence of the input's
/// shape (spec.md §4.5's `-right` family, mirroring `take`/`drop`).
pub fn take_right(seq: &Value, n: usize) -> Result<Value, SchemeError> {
    let input = AnySeq::from_value(seq)?;
    if n > input.len() {
        return Err(SchemeError::eval("take-right: count exceeds sequence length"));
    }
    drop(seq, input.len() - n)
}

/// `drop-right`: every element except the last `n`.
pub fn drop_right(seq: &Value, n: usize) -> Result<Value, SchemeError> {
    let input = AnySeq::from_value(seq)?;
    if n > input.len() {
        return Err(SchemeError::eval("drop-right: count exceeds sequence length"));
    }
    take(seq, input.len() - n)
}

/// `take-while-right`: the longest suffix all of whose elements satisfy
/// `pred`.
pub fn take_while_right(seq: &Value, pred: impl Fn(&Value) -> Result<bool, SchemeError>) -> Result<Value, SchemeError> {
    let input = AnySeq::from_value(seq)?;
    let mut start = input.len();
    while start > 0 && pred(&input.get(start - 1))? {
        start -= 1;
    }
    drop(seq, start)
}

/// `drop-while-right`: drops the longest suffix all of whose elements
/// satisfy `pred`, keeping the rest.
pub fn drop_while_right(seq: &Value, pred: impl Fn(&Value) -> Result<bool, SchemeError>) -> Result<Value, SchemeError> {
    let input = AnySeq::from_value(seq)?;
    let mut end = input.len();
    while end > 0 && pred(&input.get(end - 1))? {
        end -= 1;
    }
    take(seq, end)
}

fn add_numbers(a: Number, b: Number) -> Number {
    match (a, b) {
        (Number::Exact(x), Number::Exact(y)) => Number::Exact(x + y),
        _ => Number::Inexact(a.to_f64() + b.to_f64()),
    }
}

/// SRFI-1 style `iota`: `count` numbers starting at `start`, each `step`
/// apart, built as a list.
pub fn iota(count: usize, start: Number, step: Number) -> Value {
    let mut items = Vec::with_capacity(count);
    let mut current = start;
    for _ in 0..count {
        items.push(Value::Number(current));
        current = add_numbers(current, step);
    }
    let mut out = Value::empty_list();
    for item in items.into_iter().rev() {
        out = Value::cons(item, out);
    }
    out
}

/// SRFI-1 style `unfold`: grows a list from `seed` by repeated
/// `successor` application until `stop` holds, mapping each intermediate
/// seed through `mapper`.
pub fn unfold(
    seed: Value,
    stop: impl Fn(&Value) -> Result<bool, SchemeError>,
    mapper: impl Fn(&Value) -> Result<Value, SchemeError>,
    successor: impl Fn(&Value) -> Result<Value, SchemeError>,
) -> Result<Value, SchemeError> {
    let mut items = Vec::new();
    let mut current = seed;
    while !stop(&current)? {
        items.push(mapper(&current)?);
        current = successor(&current)?;
    }
    let mut out = Value::empty_list();
    for item in items.into_iter().rev() {
        out = Value::cons(item, out);
    }
    Ok(out)
}

/// Stable sort (per the recorded Open Question decision: `[T]::sort_by`,
/// not a guarantee inherited from any source). `less` may fail (e.g. a
/// user comparator that type-errors); the first such failure aborts the
/// sort and is returned.
pub fn sort(seq: &Value, less: impl Fn(&Value, &Value) -> Result<bool, SchemeError>) -> Result<Value, SchemeError> {
    let input = AnySeq::from_value(seq)?;
    let mut items: Vec<Value> = (0..input.len()).map(|i| input.get(i)).collect();
    let mut first_err: Option<SchemeError> = None;
    items.sort_by(|a, b| {
        if first_err.is_some() {
            return Ordering::Equal;
        }
        match less(a, b) {
            Ok(true) => Ordering::Less,
            Ok(false) => match less(b, a) {
                Ok(true) => Ordering::Greater,
                Ok(false) => Ordering::Equal,
                Err(e) => {
                    first_err = Some(e);
                    Ordering::Equal
                }
            },
            Err(e) => {
                first_err = Some(e);
                Ordering::Equal
            }
        }
    });
    if let Some(e) = first_err {
        return Err(e);
    }
    let mut out = input.new_like(items.len());
    for item in items {
        out.push(item);
    }
    Ok(out.finish())
}

/// Merge two already-sorted sequences; the output takes `a`'s shape.
pub fn merge(a: &Value, b: &Value, less: impl Fn(&Value, &Value) -> Result<bool, SchemeError>) -> Result<Value, SchemeError> {
    let va = AnySeq::from_value(a)?;
    let vb = AnySeq::from_value(b)?;
    let mut out = va.new_like(va.len() + vb.len());
    let (mut i, mut j) = (0, 0);
    while i < va.len() && j < vb.len() {
        if less(&vb.get(j), &va.get(i))? {
            out.push(vb.get(j));
            j += 1;
        } else {
            out.push(va.get(i));
            i += 1;
        }
    }
    while i < va.len() {
        out.push(va.get(i));
        i += 1;
    }
    while j < vb.len() {
        out.push(vb.get(j));
        j += 1;
    }
    Ok(out.finish())
}

pub fn delete_neighbor_dups(
    seq: &Value,
    eq: impl Fn(&Value, &Value) -> Result<bool, SchemeError>,
) -> Result<Value, SchemeError> {
    let input = AnySeq::from_value(seq)?;
    let mut out = input.new_like(0);
    let mut prev: Option<Value> = None;
    for i in 0..input.len() {
        let item = input.get(i);
        let dup = match &prev {
            Some(p) => eq(p, &item)?,
            None => false,
        };
        if !dup {
            out.push(item.clone());
        }
        prev = Some(item);
    }
    Ok(out.finish())
}

/// In-place variant: rewrites the existing vector/string handle. A cons
/// list has no single handle whose identity a caller can keep after
/// deletions shorten it, so this returns an error for lists; callers
/// should `set!` the binding to the result of the non-mutating form
/// instead.
pub fn delete_neighbor_dups_mut(
    seq: &Value,
    eq: impl Fn(&Value, &Value) -> Result<bool, SchemeError>,
) -> Result<(), SchemeError> {
    let deduped = delete_neighbor_dups(seq, eq)?;
    match (seq, &deduped) {
        (Value::Vector(handle), Value::Vector(new_vec)) => {
            *handle.borrow_mut() = new_vec.borrow().clone();
            Ok(())
        }
        (Value::Str(handle), Value::Str(new_str)) => {
            *handle.borrow_mut() = new_str.borrow().clone();
            Ok(())
        }
        (Value::Pair(_), _) => Err(SchemeError::eval(
            "delete-neighbor-dups!: lists can't be shortened in place; rebind with the non-mutating form",
        )),
        _ => Err(SchemeError::eval("delete-neighbor-dups!: unsupported sequence shape")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list_ops;

    fn list_of(items: &[i64]) -> Value {
        let mut tail = Value::empty_list();
        for &i in items.iter().rev() {
            tail = Value::cons(Value::Number(Number::Exact(i)), tail);
        }
        tail
    }

    fn as_exact(v: &Value) -> i64 {
        match v {
            Value::Number(Number::Exact(i)) => *i,
            other => panic!("expected an exact number, got {:?}", other),
        }
    }

    #[test]
    fn map_preserves_length_and_shape() {
        let result = map(&[list_of(&[1, 2, 3])], |row| Ok(Value::Number(Number::Exact(as_exact(&row[0]) * 2)))).unwrap();
        assert_eq!(list_ops::length(&result).unwrap(), 3);
        assert_eq!(as_exact(&list_ops::car(&result).unwrap()), 2);
    }

    #[test]
    fn map_works_over_vectors() {
        let vec = Value::Vector(std::rc::Rc::new(std::cell::RefCell::new(vec![
            Value::Number(Number::Exact(1)),
            Value::Number(Number::Exact(2)),
        ])));
        let result = map(&[vec], |row| Ok(Value::Number(Number::Exact(as_exact(&row[0]) + 1)))).unwrap();
        match result {
            Value::Vector(h) => assert_eq!(as_exact(&h.borrow()[0]), 2),
            other => panic!("expected a vector, got {:?}", other),
        }
    }

    #[test]
    fn map_over_two_sequences_visits_in_parallel() {
        let a = list_of(&[1, 2, 3]);
        let b = list_of(&[10, 20, 30]);
        let result = map(&[a, b], |row| Ok(Value::Number(Number::Exact(as_exact(&row[0]) + as_exact(&row[1]))))).unwrap();
        let values: Vec<i64> = crate::cycle::CycleSafeIter::new(&result).map(|v| as_exact(&v)).collect();
        assert_eq!(values, vec![11, 22, 33]);
    }

    #[test]
    fn map_over_mismatched_lengths_errors() {
        let a = list_of(&[1, 2, 3]);
        let b = list_of(&[10, 20]);
        assert!(map(&[a, b], |row| Ok(row[0].clone())).is_err());
    }

    #[test]
    fn fold_is_left_to_right() {
        let result = fold(&[list_of(&[1, 2, 3])], Value::Number(Number::Exact(0)), |acc, row| {
            Ok(Value::Number(Number::Exact(as_exact(&acc) * 10 + as_exact(&row[0]))))
        })
        .unwrap();
        assert_eq!(as_exact(&result), 123);
    }

    #[test]
    fn fold_right_is_right_to_left() {
        let result = fold_right(&[list_of(&[1, 2, 3])], Value::Number(Number::Exact(0)), |row, acc| {
            Ok(Value::Number(Number::Exact(as_exact(&acc) * 10 + as_exact(&row[0]))))
        })
        .unwrap();
        assert_eq!(as_exact(&result), 321);
    }

    #[test]
    fn any_short_circuits() {
        let mut calls = 0;
        let found = any(&[list_of(&[1, 2, 3])], |row| {
            calls += 1;
            Ok(as_exact(&row[0]) == 2)
        })
        .unwrap();
        assert!(found);
        assert_eq!(calls, 2);
    }

    #[test]
    fn every_short_circuits_on_first_failure() {
        let mut calls = 0;
        let all = every(&[list_of(&[1, 2, 3])], |row| {
            calls += 1;
            Ok(as_exact(&row[0]) < 2)
        })
        .unwrap();
        assert!(!all);
        assert_eq!(calls, 2);
    }

    #[test]
    fn take_and_drop_round_trip_via_append() {
        let list = list_of(&[1, 2, 3, 4, 5]);
        let taken = take(&list, 2).unwrap();
        let dropped = drop(&list, 2).unwrap();
        let reassembled = list_ops::append(&[taken, dropped]).unwrap();
        assert_eq!(list_ops::length(&reassembled).unwrap(), 5);
    }

    #[test]
    fn take_past_the_end_errors() {
        assert!(take(&list_of(&[1, 2]), 5).is_err());
    }

    #[test]
    fn take_right_and_drop_right_split_from_the_end() {
        let list = list_of(&[1, 2, 3, 4, 5]);
        let tail = take_right(&list, 2).unwrap();
        let init = drop_right(&list, 2).unwrap();
        let tail_values: Vec<i64> = crate::cycle::CycleSafeIter::new(&tail).map(|v| as_exact(&v)).collect();
        let init_values: Vec<i64> = crate::cycle::CycleSafeIter::new(&init).map(|v| as_exact(&v)).collect();
        assert_eq!(tail_values, vec![4, 5]);
        assert_eq!(init_values, vec![1, 2, 3]);
    }

    #[test]
    fn take_while_right_and_drop_while_right_split_on_the_trailing_run() {
        let list = list_of(&[1, 2, 9, 9, 9]);
        let suffix = take_while_right(&list, |v| Ok(as_exact(v) == 9)).unwrap();
        let prefix = drop_while_right(&list, |v| Ok(as_exact(v) == 9)).unwrap();
        let suffix_values: Vec<i64> = crate::cycle::CycleSafeIter::new(&suffix).map(|v| as_exact(&v)).collect();
        let prefix_values: Vec<i64> = crate::cycle::CycleSafeIter::new(&prefix).map(|v| as_exact(&v)).collect();
        assert_eq!(suffix_values, vec![9, 9, 9]);
        assert_eq!(prefix_values, vec![1, 2]);
    }

    #[test]
    fn iota_generates_the_expected_sequence() {
        let seq = iota(4, Number::Exact(0), Number::Exact(2));
        let values: Vec<i64> = crate::cycle::CycleSafeIter::new(&seq).map(|v| as_exact(&v)).collect();
        assert_eq!(values, vec![0, 2, 4, 6]);
    }

    #[test]
    fn sort_is_stable_and_ascending() {
        let list = list_of(&[3, 1, 2]);
        let sorted = sort(&list, |a, b| Ok(as_exact(a) < as_exact(b))).unwrap();
        let values: Vec<i64> = crate::cycle::CycleSafeIter::new(&sorted).map(|v| as_exact(&v)).collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn merge_interleaves_two_sorted_lists() {
        let a = list_of(&[1, 3, 5]);
        let b = list_of(&[2, 4, 6]);
        let merged = merge(&a, &b, |x, y| Ok(as_exact(x) < as_exact(y))).unwrap();
        let values: Vec<i64> = crate::cycle::CycleSafeIter::new(&merged).map(|v| as_exact(&v)).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn delete_neighbor_dups_collapses_runs() {
        let list = list_of(&[1, 1, 2, 2, 2, 3]);
        let deduped = delete_neighbor_dups(&list, |a, b| Ok(as_exact(a) == as_exact(b))).unwrap();
        let values: Vec<i64> = crate::cycle::CycleSafeIter::new(&deduped).map(|v| as_exact(&v)).collect();
        assert_eq!(values, vec![1, 2, 3]);
    }
}
