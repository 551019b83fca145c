use kestrel_core::platform::OSPlatform;
use kestrel_core::runtime::{
    ArityMode, Platform, Runtime, RuntimeConfig, RuntimeError, Value,
};
use kestrel_core::syntax::ast::{BinaryOp, Expr};
use kestrel_core::syntax::build::*;
use rstest::rstest;

use crate::{interpret, interpret_program};

#[rstest]
#[case(OSPlatform)]
fn declarations_are_callable_before_they_appear(#[case] platform: impl Platform + 'static) {
    let ast = program([expr(call(
        thunk_block([
            ret(call(var("fizzbuzz"), [])),
            declare("fizzbuzz", Vec::<&str>::new(), [ret(string("FizzBuzz"))]),
        ]),
        [],
    ))]);

    assert_eq!(interpret_program(platform, ast), Value::from("FizzBuzz"));
}

#[rstest]
#[case(OSPlatform)]
fn const_bound_functions_are_not_hoisted(#[case] platform: impl Platform + 'static) {
    let ast = program([expr(call(
        thunk_block([
            ret(call(var("fizzbuzz"), [])),
            local(
                "fizzbuzz",
                function(None, Vec::<&str>::new(), [ret(string("FizzBuzz"))]),
            ),
        ]),
        [],
    ))]);

    let err = interpret(platform, &ast).unwrap_err();

    assert!(matches!(*err, RuntimeError::UnboundName { ref name, .. } if name == "fizzbuzz"));
}

#[rstest]
#[case(OSPlatform)]
fn top_level_declarations_are_hoisted(#[case] platform: impl Platform + 'static) {
    let ast = program([
        local("answer", call(var("double"), [num(21.0)])),
        declare("double", ["n"], [ret(mul(var("n"), num(2.0)))]),
        expr(var("answer")),
    ]);

    assert_eq!(interpret_program(platform, ast), Value::Number(42.0));
}

#[rstest]
#[case(OSPlatform)]
fn block_declarations_stay_in_their_block(#[case] platform: impl Platform + 'static) {
    let ast = program([
        scope([declare("helper", Vec::<&str>::new(), [ret(num(1.0))])]),
        expr(call(var("helper"), [])),
    ]);

    let err = interpret(platform, &ast).unwrap_err();

    assert!(matches!(*err, RuntimeError::UnboundName { ref name, .. } if name == "helper"));
}

#[rstest]
#[case(OSPlatform)]
fn classic_functions_get_their_own_arguments(#[case] platform: impl Platform + 'static) {
    // (function () { return (function () { return arguments[0] })('inner') })('outer')
    let inner = function(None, Vec::<&str>::new(), [ret(index(var("arguments"), num(0.0)))]);
    let outer = function(
        None,
        Vec::<&str>::new(),
        [ret(call(inner, [string("inner")]))],
    );

    let ast = program([expr(call(outer, [string("outer")]))]);

    assert_eq!(interpret_program(platform, ast), Value::from("inner"));
}

#[rstest]
#[case(OSPlatform)]
fn arrow_functions_see_the_enclosing_arguments(#[case] platform: impl Platform + 'static) {
    // (function () { return (() => arguments[0])('inner') })('outer')
    let inner = thunk(index(var("arguments"), num(0.0)));
    let outer = function(
        None,
        Vec::<&str>::new(),
        [ret(call(inner, [string("inner")]))],
    );

    let ast = program([expr(call(outer, [string("outer")]))]);

    assert_eq!(interpret_program(platform, ast), Value::from("outer"));
}

#[rstest]
#[case(OSPlatform)]
fn arguments_is_unbound_outside_classic_functions(#[case] platform: impl Platform + 'static) {
    let ast = program([expr(call(thunk(var("arguments")), []))]);

    assert!(interpret(platform, &ast).is_err());
}

#[rstest]
#[case(OSPlatform)]
fn arguments_holds_extra_values(#[case] platform: impl Platform + 'static) {
    let count = function(None, ["a"], [ret(var("arguments"))]);

    let ast = program([expr(call(count, [num(1.0), num(2.0), num(3.0)]))]);

    assert_eq!(interpret_program(platform, ast).to_string(), "[1, 2, 3]");
}

#[rstest]
#[case(OSPlatform)]
fn named_function_expressions_keep_their_own_name(#[case] platform: impl Platform + 'static) {
    // const double = function repeat (str) { return str + str }
    let ast = program([
        local(
            "double",
            function(Some("repeat"), ["str"], [ret(add(var("str"), var("str")))]),
        ),
        expr(var("double")),
    ]);

    assert_eq!(
        interpret_program(platform, ast).to_string(),
        "[Function: repeat]"
    );
}

#[rstest]
#[case(OSPlatform)]
fn own_name_is_only_visible_inside(#[case] platform: impl Platform + 'static) {
    let ast = program([
        local(
            "double",
            function(Some("repeat"), ["str"], [ret(add(var("str"), var("str")))]),
        ),
        expr(call(var("repeat"), [string("x")])),
    ]);

    assert!(interpret(platform, &ast).is_err());
}

#[rstest]
#[case(5.0, 120.0)]
#[case(1.0, 1.0)]
fn named_function_expressions_recurse_by_own_name(#[case] n: f64, #[case] expected: f64) {
    let factorial = function(
        Some("fact"),
        ["n"],
        [
            if_else(
                binary(var("n"), BinaryOp::LessOrEqual, num(1.0)),
                ret(num(1.0)),
                None,
            ),
            ret(mul(var("n"), call(var("fact"), [sub(var("n"), num(1.0))]))),
        ],
    );

    let ast = program([local("factorial", factorial), expr(call(var("factorial"), [num(n)]))]);

    assert_eq!(interpret_program(OSPlatform, ast), Value::Number(expected));
}

#[rstest]
#[case(OSPlatform)]
fn lenient_arity_binds_undefined(#[case] platform: impl Platform + 'static) {
    let ast = program([expr(call(
        arrow(["a", "b"], strict_eq(var("b"), undefined())),
        [num(1.0)],
    ))]);

    assert_eq!(interpret_program(platform, ast), Value::Boolean(true));
}

#[test]
fn strict_arity_rejects_wrong_argument_counts() {
    let config = RuntimeConfig::new().arity(ArityMode::Strict);
    let mut runtime = Runtime::with_config_and_builtins(
        OSPlatform,
        config,
        kestrel_core::prelude::get_runtime_prelude(),
    );

    let ast = program([expr(call(
        arrow(["a", "b"], var("a")),
        [num(1.0), num(2.0), num(3.0)],
    ))]);

    let err = runtime.eval(&ast).unwrap_err();

    assert!(matches!(
        *err,
        RuntimeError::WrongNumberOfArguments {
            expected: 2,
            found: 3,
            ..
        }
    ));

    // Rest collectors accept any count.
    let variadic = program([expr(call(arrow_variadic("xs", var("xs")), nums()))]);
    assert!(runtime.eval(&variadic).is_ok());
}

fn nums() -> Vec<Expr> {
    vec![num(1.0), num(2.0)]
}

#[rstest]
#[case(OSPlatform)]
fn function_bodies_may_shadow_their_own_name(#[case] platform: impl Platform + 'static) {
    // function counter () { const counter = 0; return counter }
    let ast = program([
        declare(
            "counter",
            Vec::<&str>::new(),
            [local("counter", num(0.0)), ret(var("counter"))],
        ),
        expr(call(var("counter"), [])),
    ]);

    assert_eq!(interpret_program(platform, ast), Value::Number(0.0));
}

#[rstest]
#[case(true, Some(1.0))]
#[case(false, None)]
fn declarations_as_if_branches_bind_when_taken(
    #[case] taken: bool,
    #[case] expected: Option<f64>,
) {
    // if (taken) function pick () { return 1 }
    let ast = program([
        if_else(
            boolean(taken),
            declare("pick", Vec::<&str>::new(), [ret(num(1.0))]),
            None,
        ),
        expr(call(var("pick"), [])),
    ]);

    let result = interpret(OSPlatform, &ast);

    match expected {
        Some(value) => assert_eq!(result, Ok(Value::Number(value))),
        None => assert!(matches!(
            result.map_err(|err| *err),
            Err(RuntimeError::UnboundName { name, .. }) if name == "pick"
        )),
    }
}

#[rstest]
#[case(OSPlatform)]
fn declaration_branches_do_not_redeclare(#[case] platform: impl Platform + 'static) {
    let ast = program([
        local("pick", num(0.0)),
        if_else(
            boolean(true),
            declare("pick", Vec::<&str>::new(), [ret(num(1.0))]),
            None,
        ),
    ]);

    let err = interpret(platform, &ast).unwrap_err();

    assert!(matches!(*err, RuntimeError::AlreadyDeclared { ref name, .. } if name == "pick"));
}
