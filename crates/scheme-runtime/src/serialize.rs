//! `display`, `write`, and `pretty-print`.
//!
//! The three share one recursive walker parameterized by an
//! [`AtomFormat`] strategy, the way `son.rs`'s `format_value` is
//! parameterized by a `SonConfig` (`pretty`/`indent`) rather than having
//! three separate stringifiers. The list/vector/hash-map/object cases are
//! grounded on `heist_types_toolkit.hpp`'s `cio_list_str_recur`,
//! `cio_vect_str`, `cio_hmap_str`, and `cio_obj_str` (spec.md §4.2);
//! cyclic structure detection reuses [`crate::cycle`].

use std::rc::Rc;

use scheme_core::error::MethodDispatch;
use scheme_core::interp::Interpreter;
use scheme_core::number::Number;
use scheme_core::symbol::encode_escapes;
use scheme_core::value::Value;

use crate::cycle::{classify, CycleSafeIter, ListShape};

/// Whether atoms are rendered human-readably (`display`) or in
/// read-back-safe form (`write`). son.rs's `compact()`/`pretty()`
/// constructors are the model for these small config toggles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AtomFormat {
    Display,
    Write,
}

pub fn display(v: &Value, interp: &Interpreter) -> String {
    format_value(v, AtomFormat::Display, interp.method_dispatch().as_deref())
}

pub fn write(v: &Value, interp: &Interpreter) -> String {
    format_value(v, AtomFormat::Write, interp.method_dispatch().as_deref())
}

fn format_value(v: &Value, fmt: AtomFormat, dispatch: Option<&dyn MethodDispatch>) -> String {
    match v {
        Value::Undefined => "#<undefined>".to_string(),
        Value::Void => "#<void>".to_string(),
        Value::UnspecifiedExecutable => "#<unspecified>".to_string(),
        Value::Bool(true) => "#t".to_string(),
        Value::Bool(false) => "#f".to_string(),
        Value::Number(n) => format_number(n),
        Value::Char(c) => format_char(*c, fmt),
        Value::Symbol(s) => match fmt {
            AtomFormat::Display => s.as_str().to_string(),
            AtomFormat::Write => encode_escapes(s.as_str()),
        },
        Value::Str(s) => match fmt {
            AtomFormat::Display => s.borrow().clone(),
            AtomFormat::Write => format_string(&s.borrow()),
        },
        Value::Pair(_) if crate::streams::is_stream_pair(v) => "#<stream>".to_string(),
        Value::Pair(_) => format_pair_chain(v, fmt, dispatch),
        Value::Vector(vec) => {
            let items: Vec<String> = vec
                .borrow()
                .iter()
                .map(|e| format_value(e, fmt, dispatch))
                .collect();
            format!("#({})", items.join(" "))
        }
        Value::HashMap(m) => format_hashmap(m, fmt, dispatch),
        Value::Primitive(p) => format!("#<procedure {}>", p.name),
        Value::Compound(c) => match &*c.name.borrow() {
            Some(name) => format!("#<procedure {}>", name),
            None => "#<procedure>".to_string(),
        },
        Value::Delay(_) => "#<promise>".to_string(),
        Value::Environment(_) => "#<environment>".to_string(),
        Value::SyntaxRule(s) => format!("#<syntax-rules {}>", s.label),
        Value::InPort(_) => "#<input-port>".to_string(),
        Value::OutPort(_) => "#<output-port>".to_string(),
        Value::Expr(items) => {
            let rendered: Vec<String> = items.iter().map(|e| format_value(e, fmt, dispatch)).collect();
            format!("({})", rendered.join(" "))
        }
        Value::Object(o) => format_object(o, fmt, dispatch),
    }
}

fn format_number(n: &Number) -> String {
    n.to_string()
}

fn format_char(c: char, fmt: AtomFormat) -> String {
    if fmt == AtomFormat::Display {
        return c.to_string();
    }
    match c {
        ' ' => "#\\space".to_string(),
        '\n' => "#\\newline".to_string(),
        '\t' => "#\\tab".to_string(),
        '\r' => "#\\return".to_string(),
        '\0' => "#\\null".to_string(),
        c => format!("#\\{}", c),
    }
}

/// Escapes mirror son.rs's `format_string`: the common named escapes plus
/// `\u{:04x}` for anything else unprintable.
fn format_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{{{:04x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Grounded on `cio_list_str_recur`: walks the chain cycle-safely and
/// prints `<...cycle>` instead of looping when a circular tail is hit.
fn format_pair_chain(head: &Value, fmt: AtomFormat, dispatch: Option<&dyn MethodDispatch>) -> String {
    let shape = classify(head);
    let mut iter = CycleSafeIter::new(head);
    let mut parts = Vec::new();
    for item in &mut iter {
        parts.push(format_value(&item, fmt, dispatch));
    }
    let body = parts.join(" ");
    match shape {
        ListShape::Proper => format!("({})", body),
        ListShape::Improper => {
            let tail = iter.tail().unwrap_or(Value::Undefined);
            format!("({} . {})", body, format_value(&tail, fmt, dispatch))
        }
        ListShape::Cyclic(_) => format!("({} <...cycle>)", body),
    }
}

/// Grounded on `cio_hmap_str`'s `$(k1 v1 k2 v2 ...)` layout; entries are
/// sorted by their rendered key text so output is deterministic, the way
/// son.rs sorts map entries before printing.
fn format_hashmap(
    m: &scheme_core::value::HashMapHandle,
    fmt: AtomFormat,
    dispatch: Option<&dyn MethodDispatch>,
) -> String {
    let map = m.borrow();
    let mut entries: Vec<(String, String)> = map
        .iter()
        .map(|(k, v)| {
            let key_value = key_to_value(k);
            (format_value(&key_value, fmt, dispatch), format_value(v, fmt, dispatch))
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    let flat: Vec<String> = entries.into_iter().flat_map(|(k, v)| [k, v]).collect();
    format!("${}", format!("({})", flat.join(" ")))
}

fn key_to_value(k: &scheme_core::value::HashKey) -> Value {
    use scheme_core::value::HashKey;
    match k {
        HashKey::Bool(b) => Value::Bool(*b),
        HashKey::Char(c) => Value::Char(*c),
        HashKey::ExactInt(i) => Value::Number(Number::Exact(*i)),
        HashKey::Symbol(s) => Value::Symbol(s.clone()),
        HashKey::Str(s) => Value::Str(Rc::new(std::cell::RefCell::new(s.clone()))),
    }
}

/// Grounded on `cio_obj_str`: try the user-defined stringifier method
/// first, fall back to an opaque `#<object[ADDR]>` tag (Heist falls back
/// the same way on any exception from the method call).
fn format_object(
    o: &Rc<std::cell::RefCell<scheme_core::value::ObjectData>>,
    fmt: AtomFormat,
    dispatch: Option<&dyn MethodDispatch>,
) -> String {
    if let Some(d) = dispatch {
        let invoked = {
            let ob = o.borrow();
            d.invoke(&ob, "this->string", &[])
        };
        if let Ok(Some(result)) = invoked {
            return format_value(&result, fmt, dispatch);
        }
    }
    format!("#<object[{:#x}]>", Rc::as_ptr(o) as usize)
}

/// Greedy column-budget pretty printer, simplified from
/// `pretty_print_pprint_data`'s first-element-packing heuristic: if the
/// single-line `write` form fits within the interpreter's configured
/// width, use it; otherwise break each list element onto its own
/// 2-space-indented line, recursing so nested lists get the same
/// treatment.
pub fn pretty_print(v: &Value, interp: &Interpreter) -> String {
    let width = interp.pprint_width();
    let dispatch = interp.method_dispatch();
    pretty_at(v, width, 0, dispatch.as_deref())
}

fn pretty_at(v: &Value, width: usize, indent: usize, dispatch: Option<&dyn MethodDispatch>) -> String {
    let flat = format_value(v, AtomFormat::Write, dispatch);
    if flat.len() + indent <= width || !matches!(v, Value::Pair(_)) || crate::streams::is_stream_pair(v) {
        return flat;
    }

    let shape = classify(v);
    if matches!(shape, ListShape::Cyclic(_)) {
        return flat;
    }

    let mut iter = CycleSafeIter::new(v);
    let mut lines = Vec::new();
    let pad = " ".repeat(indent + 2);
    for item in &mut iter {
        lines.push(format!("{}{}", pad, pretty_at(&item, width, indent + 2, dispatch)));
    }
    let outer_pad = " ".repeat(indent);
    match shape {
        ListShape::Proper => format!("(\n{}\n{})", lines.join("\n"), outer_pad),
        ListShape::Improper => {
            let tail = iter.tail().unwrap_or(Value::Undefined);
            lines.push(format!("{}. {}", pad, pretty_at(&tail, width, indent + 2, dispatch)));
            format!("(\n{}\n{})", lines.join("\n"), outer_pad)
        }
        ListShape::Cyclic(_) => unreachable!("handled above"),
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
    fn display_does_not_quote_strings() {
        let interp = Interpreter::new();
        let s = Value::Str(Rc::new(std::cell::RefCell::new("hi".to_string())));
        assert_eq!(display(&s, &interp), "hi");
    }

    #[test]
    fn write_quotes_and_escapes_strings() {
        let interp = Interpreter::new();
        let s = Value::Str(Rc::new(std::cell::RefCell::new("a\"b".to_string())));
        assert_eq!(write(&s, &interp), "\"a\\\"b\"");
    }

    #[test]
    fn write_renders_a_proper_list() {
        let interp = Interpreter::new();
        assert_eq!(write(&list_of(&[1, 2, 3]), &interp), "(1 2 3)");
    }

    #[test]
    fn write_renders_an_improper_list_with_dot() {
        let interp = Interpreter::new();
        let improper = Value::cons(Value::Number(Number::Exact(1)), Value::Bool(false));
        assert_eq!(write(&improper, &interp), "(1 . #f)");
    }

    #[test]
    fn write_marks_cyclic_lists_instead_of_looping() {
        let interp = Interpreter::new();
        let pair = match Value::cons(Value::Number(Number::Exact(1)), Value::empty_list()) {
            Value::Pair(p) => p,
            _ => unreachable!(),
        };
        pair.borrow_mut().cdr = Value::Pair(pair.clone());
        let rendered = write(&Value::Pair(pair), &interp);
        assert!(rendered.contains("<...cycle>"));
    }

    #[test]
    fn pretty_print_fits_small_lists_on_one_line() {
        let interp = Interpreter::new();
        assert_eq!(pretty_print(&list_of(&[1, 2, 3]), &interp), "(1 2 3)");
    }

    #[test]
    fn write_renders_a_stream_pair_opaquely_without_forcing() {
        let interp = Interpreter::new();
        let tail_env = scheme_core::env::new_global();
        let stream = crate::streams::scons(Value::Number(Number::Exact(1)), Value::Bool(false), tail_env);
        assert_eq!(write(&stream, &interp), "#<stream>");
    }

    #[test]
    fn pretty_print_breaks_wide_lists_onto_multiple_lines() {
        let interp = Interpreter::new().with_pprint_width(10);
        let wide = list_of(&[111_111, 222_222, 333_333]);
        let rendered = pretty_print(&wide, &interp);
        assert!(rendered.contains('\n'));
    }
}
