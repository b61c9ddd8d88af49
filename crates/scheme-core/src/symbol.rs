//! Interned symbols.
//!
//! The teacher's own `Value::Symbol` is explicitly uninterned ("each symbol
//! allocates... interning may be added in the future for O(1) equality
//! comparison" — `value.rs`). This core adds that interning because spec.md
//! requires the empty list to be one specific, identity-comparable symbol
//! value (`emptylist`), which only works cleanly if symbols with the same
//! name are guaranteed to be the same allocation.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

thread_local! {
    static INTERNER: RefCell<HashMap<Rc<str>, Symbol>> = RefCell::new(HashMap::new());
}

/// An interned symbol name.
///
/// Two `Symbol`s with the same text are always the same allocation, so
/// equality and hashing are both O(1) pointer operations.
#[derive(Clone)]
pub struct Symbol(Rc<str>);

impl Symbol {
    /// Intern `name`, returning the shared handle for it.
    pub fn intern(name: &str) -> Symbol {
        INTERNER.with(|table| {
            let mut table = table.borrow_mut();
            if let Some(sym) = table.get(name) {
                return sym.clone();
            }
            let rc: Rc<str> = Rc::from(name);
            let sym = Symbol(rc.clone());
            table.insert(rc, sym.clone());
            sym
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for Symbol {}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as *const () as usize).hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The dedicated symbol that represents the empty list, `()`.
///
/// spec.md §3.1: "The symbol `()` ... is represented as the dedicated
/// symbol `emptylist`; it is *not* a pair."
pub fn empty_list_symbol() -> Symbol {
    Symbol::intern("emptylist")
}

/// The sentinel symbol used internally to represent "no argument given"
/// (spec.md §6, the AST conventions section).
pub fn sentinel_arg_symbol() -> Symbol {
    Symbol::intern("sentinel-arg")
}

/// Characters that would confuse the reader if left bare in a symbol's
/// textual representation (spec.md §6).
fn needs_escape(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t' | '\n' | '\r' | '(' | ')' | '[' | ']' | '{' | '}' | '`' | '\'' | '"' | ',' | ';' | '\\'
    )
}

/// Encode a symbol's name for textual output, escaping reader-hostile
/// characters as `\xHEX:` (spec.md §6).
pub fn encode_escapes(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if needs_escape(c) {
            out.push_str(&format!("\\x{:x}:", c as u32));
        } else {
            out.push(c);
        }
    }
    out
}

/// Decode a symbol's textual representation, reversing [`encode_escapes`].
///
/// Used by the (external) reader; kept here since it's the inverse of the
/// encoding this crate defines.
pub fn decode_escapes(text: &str) -> Result<String, String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek() == Some(&'x') {
            chars.next();
            let mut hex = String::new();
            for c in chars.by_ref() {
                if c == ':' {
                    break;
                }
                hex.push(c);
            }
            let code = u32::from_str_radix(&hex, 16)
                .map_err(|_| format!("invalid symbol hex escape: \\x{}:", hex))?;
            let ch = char::from_u32(code)
                .ok_or_else(|| format!("invalid unicode scalar in symbol escape: {:x}", code))?;
            out.push(ch);
        } else {
            out.push(c);
        }
    }
    Ok(out)
}
