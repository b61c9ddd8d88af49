use proptest::prelude::*;

use scheme_core::number::Number;
use scheme_core::value::Value;
use scheme_runtime::{combinators, cycle, equal};

fn list_of(items: &[i64]) -> Value {
    let mut tail = Value::empty_list();
    for &i in items.iter().rev() {
        tail = Value::cons(Value::Number(Number::Exact(i)), tail);
    }
    tail
}

fn as_exacts(v: &Value) -> Vec<i64> {
    cycle::CycleSafeIter::new(v)
        .map(|item| match item {
            Value::Number(Number::Exact(i)) => i,
            other => panic!("expected an exact number, got {:?}", other),
        })
        .collect()
}

proptest! {
    /// spec.md §8: `equal?(x, deep-copy(x))` holds for any structure.
    #[test]
    fn deep_copy_is_structurally_equal(items in proptest::collection::vec(any::<i64>(), 0..32)) {
        let original = list_of(&items);
        let copied = scheme_runtime::deep_copy(&original);
        prop_assert!(equal::equal(&original, &copied, None));
    }

    /// spec.md §8: `map` preserves the input's length.
    #[test]
    fn map_preserves_length(items in proptest::collection::vec(any::<i64>(), 0..32)) {
        let list = list_of(&items);
        let mapped = combinators::map(&[list], |row| Ok(row[0].clone())).unwrap();
        prop_assert_eq!(as_exacts(&mapped).len(), items.len());
    }

    /// spec.md §8: `fold` visits elements left to right.
    #[test]
    fn fold_visits_left_to_right(items in proptest::collection::vec(-100i64..100, 0..16)) {
        let list = list_of(&items);
        let order: std::cell::RefCell<Vec<i64>> = std::cell::RefCell::new(Vec::new());
        combinators::fold(&[list], Value::Bool(true), |acc, row| {
            if let Value::Number(Number::Exact(i)) = &row[0] {
                order.borrow_mut().push(*i);
            }
            Ok(acc)
        })
        .unwrap();
        prop_assert_eq!(order.into_inner(), items);
    }

    /// spec.md §8: taking `n` and dropping `n`, then appending, round-trips
    /// to the original list.
    #[test]
    fn take_then_drop_round_trips(items in proptest::collection::vec(any::<i64>(), 1..32)) {
        let list = list_of(&items);
        let n = items.len() / 2;
        let taken = combinators::take(&list, n).unwrap();
        let dropped = combinators::drop(&list, n).unwrap();
        let rejoined = scheme_runtime::list_ops::append(&[taken, dropped]).unwrap();
        prop_assert_eq!(as_exacts(&rejoined), items);
    }

    /// spec.md §8: `iota` produces an arithmetic sequence of the requested
    /// length.
    #[test]
    fn iota_matches_its_parameters(count in 0usize..32, start in -50i64..50, step in -5i64..5) {
        let seq = combinators::iota(count, Number::Exact(start), Number::Exact(step));
        let values = as_exacts(&seq);
        prop_assert_eq!(values.len(), count);
        for (i, v) in values.iter().enumerate() {
            prop_assert_eq!(*v, start + step * i as i64);
        }
    }
}
