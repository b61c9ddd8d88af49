//! The `Interpreter` context: the process-wide state spec.md §9 asks to be
//! redesigned as an explicit, passed-around struct instead of Heist's
//! `namespace G { ... }` globals. Carries the port registry, the
//! in-flight jump datum, and display/pretty-print configuration (column
//! width, ANSI color), the last of which follows `son.rs`'s `SonConfig`
//! (a small config struct threaded through the serializer, not a global).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::{MethodDispatch, SchemeError};
use crate::value::{PortId, Value};

/// Heist's `G::PPRINT_MAX_COLUMN_WIDTH`; spec.md §4.2 keeps this as the
/// pretty-printer's default line budget.
pub const DEFAULT_PPRINT_WIDTH: usize = 80;

struct PortEntry {
    open: Cell<bool>,
}

/// Append-only registry of port handles. Ports are identified by index
/// and never removed, only marked closed (spec.md §5) — actual stream
/// I/O is owned by the embedding host, outside this crate's scope.
#[derive(Default)]
struct PortRegistry {
    entries: RefCell<Vec<PortEntry>>,
}

impl PortRegistry {
    fn open(&self) -> usize {
        let mut entries = self.entries.borrow_mut();
        entries.push(PortEntry { open: Cell::new(true) });
        entries.len() - 1
    }

    fn close(&self, id: usize) {
        if let Some(entry) = self.entries.borrow().get(id) {
            entry.open.set(false);
        }
    }

    fn is_open(&self, id: usize) -> bool {
        self.entries
            .borrow()
            .get(id)
            .map(|e| e.open.get())
            .unwrap_or(false)
    }
}

/// Shared interpreter-wide context threaded through every structural
/// operation that needs one: method dispatch for objects, port state,
/// pretty-printer configuration, and the one-shot jump datum.
pub struct Interpreter {
    ports: PortRegistry,
    jump_slot: RefCell<Option<Value>>,
    pprint_width: Cell<usize>,
    ansi_enabled: Cell<bool>,
    dispatch: RefCell<Option<Rc<dyn MethodDispatch>>>,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            ports: PortRegistry::default(),
            jump_slot: RefCell::new(None),
            pprint_width: Cell::new(DEFAULT_PPRINT_WIDTH),
            ansi_enabled: Cell::new(false),
            dispatch: RefCell::new(None),
        }
    }

    pub fn with_pprint_width(self, width: usize) -> Self {
        self.pprint_width.set(width);
        self
    }

    pub fn with_ansi(self, enabled: bool) -> Self {
        self.ansi_enabled.set(enabled);
        self
    }

    pub fn set_method_dispatch(&self, dispatch: Rc<dyn MethodDispatch>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
    }

    pub fn method_dispatch(&self) -> Option<Rc<dyn MethodDispatch>> {
        self.dispatch.borrow().clone()
    }

    pub fn pprint_width(&self) -> usize {
        self.pprint_width.get()
    }

    pub fn ansi_enabled(&self) -> bool {
        self.ansi_enabled.get()
    }

    // --- ports ---

    pub fn open_in_port(&self) -> Value {
        Value::InPort(PortId(self.ports.open()))
    }

    pub fn open_out_port(&self) -> Value {
        Value::OutPort(PortId(self.ports.open()))
    }

    pub fn close_port(&self, id: PortId) {
        tracing::debug!(port = id.0, "closing port");
        self.ports.close(id.0);
    }

    pub fn port_is_open(&self, id: PortId) -> bool {
        self.ports.is_open(id.0)
    }

    // --- jump (non-local control transfer, spec.md §7/§9) ---

    /// Stash `value` and produce the error that unwinds to the nearest
    /// jump handler. Mirrors Heist's `G::JUMP_GLOBAL_PRIMITIVE_ARGUMENT`
    /// assignment immediately before throwing `SCM_EXCEPT::JUMP`.
    pub fn begin_jump(&self, value: Value) -> SchemeError {
        *self.jump_slot.borrow_mut() = Some(value.clone());
        SchemeError::Jump(value)
    }

    /// Retrieve and clear the in-flight jump datum. Called by the handler
    /// that catches `SchemeError::Jump`.
    pub fn take_jump(&self) -> Option<Value> {
        self.jump_slot.borrow_mut().take()
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ports_start_open_and_stay_indexed_after_close() {
        let interp = Interpreter::new();
        let port = interp.open_out_port();
        let id = match port {
            Value::OutPort(id) => id,
            _ => unreachable!(),
        };
        assert!(interp.port_is_open(id));
        interp.close_port(id);
        assert!(!interp.port_is_open(id));
    }

    #[test]
    fn pprint_width_defaults_to_eighty() {
        let interp = Interpreter::new();
        assert_eq!(interp.pprint_width(), DEFAULT_PPRINT_WIDTH);
    }

    #[test]
    fn jump_slot_round_trips_through_begin_and_take() {
        let interp = Interpreter::new();
        let err = interp.begin_jump(Value::Bool(true));
        assert!(matches!(err, SchemeError::Jump(_)));
        let taken = interp.take_jump();
        assert!(matches!(taken, Some(Value::Bool(true))));
        assert!(interp.take_jump().is_none());
    }
}
