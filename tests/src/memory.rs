use kestrel_core::platform::OSPlatform;
use kestrel_core::runtime::{Platform, RuntimeError, Value};
use kestrel_core::syntax::ast::Stmt;
use kestrel_core::syntax::build::*;
use rstest::rstest;

use crate::{init_logger, runtime_with_prelude};

/// `const make = () => { const self = () => self; return self }`
fn make_self_referencing() -> Stmt {
    local(
        "make",
        thunk_block([local("self", thunk(var("self"))), ret(var("self"))]),
    )
}

#[rstest]
#[case(OSPlatform)]
fn cyclic_capture_is_reclaimed(#[case] platform: impl Platform + 'static) {
    init_logger();

    let mut runtime = runtime_with_prelude(platform);
    runtime.eval(&program([make_self_referencing()])).unwrap();

    let baseline = runtime.store().len();

    runtime
        .eval(&program([expr(call(var("make"), []))]))
        .unwrap();

    assert_eq!(runtime.store().len(), baseline + 1);
    assert_eq!(runtime.collect_garbage(&[]), 1);
    assert_eq!(runtime.store().len(), baseline);
}

#[rstest]
#[case(OSPlatform)]
fn roots_keep_their_frames_alive(#[case] platform: impl Platform + 'static) {
    init_logger();

    let mut runtime = runtime_with_prelude(platform);
    runtime.eval(&program([make_self_referencing()])).unwrap();

    let kept = runtime
        .eval(&program([expr(call(var("make"), []))]))
        .unwrap();

    assert_eq!(runtime.collect_garbage(&[&kept]), 0);

    let again = runtime.call_value(&kept, vec![]).unwrap();
    assert_eq!(again, kept);
}

#[rstest]
#[case(OSPlatform)]
fn global_bindings_are_roots(#[case] platform: impl Platform + 'static) {
    init_logger();

    let mut runtime = runtime_with_prelude(platform);

    runtime
        .eval(&program([
            make_self_referencing(),
            local("kept", call(var("make"), [])),
        ]))
        .unwrap();

    assert_eq!(runtime.collect_garbage(&[]), 0);
    assert!(runtime
        .eval(&program([expr(call(var("kept"), []))]))
        .is_ok());
}

#[rstest]
#[case(OSPlatform)]
fn reclaimed_closures_fail_loudly(#[case] platform: impl Platform + 'static) {
    init_logger();

    let mut runtime = runtime_with_prelude(platform);
    runtime.eval(&program([make_self_referencing()])).unwrap();

    let dropped = runtime
        .eval(&program([expr(call(var("make"), []))]))
        .unwrap();
    let env = dropped.as_function().and_then(|f| f.get_env()).unwrap();

    runtime.collect_garbage(&[]);

    assert!(!runtime.store().is_live(env));

    let err = runtime.call_value(&dropped, vec![]).unwrap_err();
    assert!(matches!(*err, RuntimeError::DanglingEnvironment { .. }));
}

#[rstest]
#[case(OSPlatform)]
fn decorator_state_is_reclaimed_with_the_decorator(#[case] platform: impl Platform + 'static) {
    init_logger();

    let mut runtime = runtime_with_prelude(platform);

    runtime
        .eval(&program([
            local("square", arrow(["n"], mul(var("n"), var("n")))),
            expr(call(call(var("once"), [var("square")]), [num(2.0)])),
        ]))
        .unwrap();

    // Only the `once` context. The call frame of `square` went on return.
    assert_eq!(runtime.collect_garbage(&[]), 1);
}

#[rstest]
#[case(OSPlatform)]
fn repeated_calls_do_not_grow_the_store(#[case] platform: impl Platform + 'static) {
    init_logger();

    let mut runtime = runtime_with_prelude(platform);
    let before = runtime.store().len();

    runtime
        .eval(&program([expr(call(
            var("repeat"),
            [num(100_000.0), arrow(["n"], var("n"))],
        ))]))
        .unwrap();

    assert_eq!(runtime.store().len(), before);
    assert_eq!(runtime.collect_garbage(&[]), 0);
}

#[rstest]
#[case(OSPlatform)]
fn closures_made_in_a_loop_live_as_long_as_their_list(#[case] platform: impl Platform + 'static) {
    init_logger();

    let mut runtime = runtime_with_prelude(platform);

    // mapWith((n) => () => n)([1, 2, 3])
    let thunks = runtime
        .eval(&program([expr(call(
            call(var("mapWith"), [arrow(["n"], thunk(var("n")))]),
            [list([num(1.0), num(2.0), num(3.0)])],
        ))]))
        .unwrap();

    let Value::List(thunks) = thunks else {
        panic!("expected a list");
    };

    let values: Vec<Value> = thunks
        .iter()
        .map(|thunk| runtime.call_value(thunk, vec![]).unwrap())
        .collect();

    assert_eq!(
        values,
        vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)]
    );
}

#[test]
fn orphaned_contexts_are_reclaimed() {
    init_logger();

    let mut runtime = runtime_with_prelude(OSPlatform);
    let orphan = runtime.alloc_context([("x", Value::Null)]);

    assert!(runtime.store().is_live(orphan));
    assert_eq!(runtime.collect_garbage(&[]), 1);
    assert!(!runtime.store().is_live(orphan));
    assert!(runtime.store().lookup(orphan, "x").is_err());
}
