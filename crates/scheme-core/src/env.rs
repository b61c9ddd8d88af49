//! Lexical environments: a chain of mutable frames.
//!
//! The teacher's closures capture a flat `Arc<[Value]>` of already-resolved
//! upvalues (`crates/runtime/src/closures.rs`) because Seq compiles
//! variable references to array indices ahead of time. spec.md §3.1
//! instead calls environments "a shared handle denoting a lexical frame
//! chain", which a tree-walking evaluator needs for late-bound symbol
//! lookup; this module builds that chain directly rather than compiling
//! it away, matching the teacher's own `Closure { env }` capture concept
//! generalized to named, chained frames.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::SchemeError;
use crate::symbol::Symbol;
use crate::value::Value;

#[derive(Debug)]
pub struct Frame {
    vars: HashMap<Symbol, Value>,
    parent: Option<EnvHandle>,
}

pub type EnvHandle = Rc<RefCell<Frame>>;

/// Construct a fresh global (parentless) environment.
pub fn new_global() -> EnvHandle {
    Rc::new(RefCell::new(Frame {
        vars: HashMap::new(),
        parent: None,
    }))
}

/// Construct a child frame extending `parent`.
pub fn extend(parent: &EnvHandle) -> EnvHandle {
    Rc::new(RefCell::new(Frame {
        vars: HashMap::new(),
        parent: Some(parent.clone()),
    }))
}

/// Bind `name` in the innermost frame of `env`, shadowing any outer
/// binding of the same name (Scheme `define` semantics).
pub fn define(env: &EnvHandle, name: Symbol, value: Value) {
    env.borrow_mut().vars.insert(name, value);
}

/// Look up `name` by walking outward from `env` to the global frame.
pub fn lookup(env: &EnvHandle, name: &Symbol) -> Result<Value, SchemeError> {
    let mut current = env.clone();
    loop {
        let next_parent = {
            let frame = current.borrow();
            if let Some(v) = frame.vars.get(name) {
                return Ok(v.clone());
            }
            frame.parent.clone()
        };
        match next_parent {
            Some(parent) => current = parent,
            None => return Err(SchemeError::Eval(format!("unbound variable: {}", name))),
        }
    }
}

/// Mutate the nearest existing binding of `name` (Scheme `set!`
/// semantics). Errors if no frame in the chain already binds it.
pub fn set(env: &EnvHandle, name: &Symbol, value: Value) -> Result<(), SchemeError> {
    let mut current = env.clone();
    loop {
        let next_parent = {
            let mut frame = current.borrow_mut();
            if let Some(slot) = frame.vars.get_mut(name) {
                *slot = value;
                return Ok(());
            }
            frame.parent.clone()
        };
        match next_parent {
            Some(parent) => current = parent,
            None => return Err(SchemeError::Eval(format!("unbound variable: {}", name))),
        }
    }
}

pub fn is_bound(env: &EnvHandle, name: &Symbol) -> bool {
    lookup(env, name).is_ok()
}
