//! Lazy streams: pairs whose car *and* cdr are both
//! [`scheme_core::value::Delay`]s, each forced at most once and memoized
//! in place (spec.md §4.6, §8's force memoization invariant). Grounded on
//! `heist_primitives_toolkit.hpp`'s `data_is_stream_pair`
//! (`data_is_a_delay(car) && data_is_a_delay(cdr)`) and
//! `primitive_STREAM_to_SCONS_constructor`, which delays both halves when
//! building a stream pair.
//!
//! Forcing a delay requires evaluating its captured expression in its
//! captured environment, and this crate has no evaluator (spec.md's
//! evaluator is an external collaborator, §6) — every operation here
//! that needs to force a tail takes the evaluator in as a closure
//! parameter instead of reaching for a global, the same seam
//! [`crate::equal`]/[`crate::serialize`] use for object-method dispatch.

use std::cell::RefCell;
use std::rc::Rc;

use scheme_core::env::EnvHandle;
use scheme_core::error::SchemeError;
use scheme_core::value::{DelayData, Value};

use crate::list_ops;

type Evaluator = dyn Fn(&Value, &EnvHandle) -> Result<Value, SchemeError>;

/// Wraps an already-available `Value` as a pre-forced promise, the delay
/// `scons` uses for the car half of a stream pair (the head is evaluated
/// eagerly by the caller; only the tail is lazy).
fn pre_forced(value: Value) -> Value {
    Value::Delay(Rc::new(RefCell::new(DelayData {
        expr: Value::Undefined,
        env: scheme_core::env::new_global(),
        forced: true,
        result: Some(value),
    })))
}

/// `(cons-stream head tail-expr)`: builds a stream pair whose car is a
/// pre-forced promise over the already-evaluated `head`, and whose cdr is
/// an unforced promise over `tail_expr` in `tail_env` — both halves are
/// delays, per `data_is_stream_pair`'s definition of a stream pair.
pub fn scons(head: Value, tail_expr: Value, tail_env: EnvHandle) -> Value {
    let tail_delay = Rc::new(RefCell::new(DelayData {
        expr: tail_expr,
        env: tail_env,
        forced: false,
        result: None,
    }));
    Value::cons(pre_forced(head), Value::Delay(tail_delay))
}

/// Force a promise, memoizing the result on first call. Forcing a
/// non-promise returns it unchanged, the common Scheme convention for
/// `force`.
pub fn force(v: &Value, eval: &Evaluator) -> Result<Value, SchemeError> {
    let delay = match v {
        Value::Delay(d) => d,
        other => return Ok(other.clone()),
    };

    {
        let borrowed = delay.borrow();
        if borrowed.forced {
            return Ok(borrowed.result.clone().expect("a forced delay always carries a result"));
        }
    }

    let (expr, env) = {
        let borrowed = delay.borrow();
        (borrowed.expr.clone(), borrowed.env.clone())
    };
    let result = eval(&expr, &env)?;

    let mut borrowed = delay.borrow_mut();
    if !borrowed.forced {
        borrowed.forced = true;
        borrowed.result = Some(result);
    }
    Ok(borrowed.result.clone().unwrap())
}

/// `data_is_stream_pair`: a pair is a stream pair exactly when both its
/// car and cdr are delays, regardless of whether either has been forced
/// yet. Used by the serializer to print `#<stream>` without forcing.
pub fn is_stream_pair(v: &Value) -> bool {
    match v {
        Value::Pair(p) => {
            let b = p.borrow();
            matches!(b.car, Value::Delay(_)) && matches!(b.cdr, Value::Delay(_))
        }
        _ => false,
    }
}

pub fn scar(stream: &Value, eval: &Evaluator) -> Result<Value, SchemeError> {
    force(&list_ops::car(stream)?, eval)
}

pub fn scdr(stream: &Value, eval: &Evaluator) -> Result<Value, SchemeError> {
    force(&list_ops::cdr(stream)?, eval)
}

pub fn stream_ref(stream: &Value, index: usize, eval: &Evaluator) -> Result<Value, SchemeError> {
    scar(&stream_drop(stream, index, eval)?, eval)
}

/// Advances `index` forces and returns the remaining stream, without
/// materializing anything into a list — the only way to safely skip
/// ahead in a stream that may be infinite.
pub fn stream_drop(stream: &Value, index: usize, eval: &Evaluator) -> Result<Value, SchemeError> {
    let mut current = stream.clone();
    for _ in 0..index {
        current = scdr(&current, eval)?;
    }
    Ok(current)
}

/// Forces exactly `count` tails, never more — safe on an infinite
/// stream.
pub fn stream_take(stream: &Value, count: usize, eval: &Evaluator) -> Result<Value, SchemeError> {
    let mut items = Vec::with_capacity(count);
    let mut current = stream.clone();
    for _ in 0..count {
        items.push(scar(&current, eval)?);
        current = scdr(&current, eval)?;
    }
    Ok(build_list(items))
}

pub fn stream_take_while(
    stream: &Value,
    pred: impl Fn(&Value) -> Result<bool, SchemeError>,
    eval: &Evaluator,
) -> Result<Value, SchemeError> {
    let mut items = Vec::new();
    let mut current = stream.clone();
    loop {
        if current.is_empty_list() {
            break;
        }
        let head = scar(&current, eval)?;
        if !pred(&head)? {
            break;
        }
        items.push(head);
        current = scdr(&current, eval)?;
    }
    Ok(build_list(items))
}

pub fn stream_drop_while(
    stream: &Value,
    pred: impl Fn(&Value) -> Result<bool, SchemeError>,
    eval: &Evaluator,
) -> Result<Value, SchemeError> {
    let mut current = stream.clone();
    loop {
        if current.is_empty_list() {
            return Ok(current);
        }
        if !pred(&scar(&current, eval)?)? {
            return Ok(current);
        }
        current = scdr(&current, eval)?;
    }
}

/// Assumes the stream is finite; an infinite stream makes this (and
/// `stream_fold`) loop forever, same as calling `length` on a circular
/// list — expected, not guarded against.
pub fn stream_length(stream: &Value, eval: &Evaluator) -> Result<usize, SchemeError> {
    let mut n = 0;
    let mut current = stream.clone();
    while !current.is_empty_list() {
        n += 1;
        current = scdr(&current, eval)?;
    }
    Ok(n)
}

pub fn stream_for_each(
    stream: &Value,
    eval: &Evaluator,
    mut f: impl FnMut(&Value) -> Result<(), SchemeError>,
) -> Result<(), SchemeError> {
    let mut current = stream.clone();
    while !current.is_empty_list() {
        f(&scar(&current, eval)?)?;
        current = scdr(&current, eval)?;
    }
    Ok(())
}

pub fn stream_fold(
    stream: &Value,
    init: Value,
    eval: &Evaluator,
    f: impl Fn(Value, Value) -> Result<Value, SchemeError>,
) -> Result<Value, SchemeError> {
    let mut acc = init;
    let mut current = stream.clone();
    while !current.is_empty_list() {
        acc = f(acc, scar(&current, eval)?)?;
        current = scdr(&current, eval)?;
    }
    Ok(acc)
}

pub fn stream_fold_right(
    stream: &Value,
    init: Value,
    eval: &Evaluator,
    f: impl Fn(Value, Value) -> Result<Value, SchemeError>,
) -> Result<Value, SchemeError> {
    let list = stream_to_list(stream, eval)?;
    crate::combinators::fold_right(&[list], init, |row, acc| f(row[0].clone(), acc))
}

/// Materializes a finite stream into a proper list.
pub fn stream_to_list(stream: &Value, eval: &Evaluator) -> Result<Value, SchemeError> {
    let mut items = Vec::new();
    let mut current = stream.clone();
    while !current.is_empty_list() {
        items.push(scar(&current, eval)?);
        current = scdr(&current, eval)?;
    }
    Ok(build_list(items))
}

/// Not part of Heist's primitive set; supplemented here because a
/// stream layer without `map`/`filter` over it is of limited use.
/// Building a genuinely lazy `stream-map`/`stream-filter` means
/// synthesizing a new delayed expression for the evaluator to run later,
/// which needs an AST builder this crate doesn't have — these force up
/// to `limit` elements eagerly and return a new (already-forced, finite)
/// stream, rather than staying lazy over a possibly-infinite input.
pub fn stream_map(
    stream: &Value,
    limit: usize,
    eval: &Evaluator,
    f: impl Fn(Value) -> Result<Value, SchemeError>,
) -> Result<Value, SchemeError> {
    let taken = stream_take(stream, limit, eval)?;
    let mapped = crate::combinators::map(&[taken], |row| f(row[0].clone()))?;
    Ok(list_to_stream(&mapped))
}

pub fn stream_filter(
    stream: &Value,
    limit: usize,
    eval: &Evaluator,
    pred: impl Fn(&Value) -> Result<bool, SchemeError>,
) -> Result<Value, SchemeError> {
    let taken = stream_take(stream, limit, eval)?;
    let filtered = crate::combinators::filter(&taken, pred)?;
    Ok(list_to_stream(&filtered))
}

fn build_list(items: Vec<Value>) -> Value {
    let mut out = Value::empty_list();
    for item in items.into_iter().rev() {
        out = Value::cons(item, out);
    }
    out
}

fn list_to_stream(list: &Value) -> Value {
    match list {
        Value::Pair(p) => {
            let (car, cdr) = {
                let b = p.borrow();
                (b.car.clone(), b.cdr.clone())
            };
            let rest = list_to_stream(&cdr);
            Value::cons(pre_forced(car), pre_forced(rest))
        }
        other => other.clone(),
    }
}
