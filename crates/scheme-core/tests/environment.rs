use scheme_core::{env, Interpreter, SchemeError, Symbol, Value};

fn sym(name: &str) -> Symbol {
    Symbol::intern(name)
}

#[test]
fn closures_over_nested_environments_resolve_outward() {
    let global = env::new_global();
    env::define(&global, sym("limit"), Value::Number(scheme_core::Number::Exact(10)));

    let frame_a = env::extend(&global);
    env::define(&frame_a, sym("x"), Value::Number(scheme_core::Number::Exact(1)));

    let frame_b = env::extend(&frame_a);
    env::define(&frame_b, sym("y"), Value::Number(scheme_core::Number::Exact(2)));

    assert!(matches!(
        env::lookup(&frame_b, &sym("limit")),
        Ok(Value::Number(scheme_core::Number::Exact(10)))
    ));
    assert!(matches!(
        env::lookup(&frame_b, &sym("x")),
        Ok(Value::Number(scheme_core::Number::Exact(1)))
    ));
}

#[test]
fn unbound_variable_error_names_the_symbol() {
    let global = env::new_global();
    let err = env::lookup(&global, &sym("ghost")).unwrap_err();
    match err {
        SchemeError::Eval(msg) => assert!(msg.contains("ghost")),
        other => panic!("expected an Eval error, got {:?}", other),
    }
}

#[test]
fn interpreter_jump_round_trips_a_datum_through_the_slot() {
    let interp = Interpreter::new();
    let payload = Value::Bool(true);
    let err = interp.begin_jump(payload.clone());
    assert!(matches!(err, SchemeError::Jump(_)));
    match interp.take_jump() {
        Some(Value::Bool(true)) => {}
        other => panic!("expected the jumped-with datum back, got {:?}", other),
    }
}

#[test]
fn ports_are_append_only_and_close_in_place() {
    let interp = Interpreter::new();
    let first = interp.open_in_port();
    let second = interp.open_out_port();
    let first_id = match first {
        Value::InPort(id) => id,
        _ => unreachable!(),
    };
    let second_id = match second {
        Value::OutPort(id) => id,
        _ => unreachable!(),
    };
    assert!(interp.port_is_open(first_id));
    interp.close_port(first_id);
    assert!(!interp.port_is_open(first_id));
    assert!(interp.port_is_open(second_id));
}
