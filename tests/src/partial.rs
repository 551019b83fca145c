use kestrel_core::platform::OSPlatform;
use kestrel_core::runtime::{Platform, RuntimeError, Value};
use kestrel_core::syntax::ast::{Ast, Expr, Stmt};
use kestrel_core::syntax::build::*;
use rstest::rstest;

use crate::{interpret, interpret_program};

fn with_add(stmts: impl IntoIterator<Item = Stmt>) -> Ast {
    let add_three = arrow(["x", "y", "z"], add(add(var("x"), var("y")), var("z")));
    let add_two = arrow_block(["x", "y"], [ret(add(var("x"), var("y")))]);

    program(
        [local("add3", add_three), local("add", add_two)]
            .into_iter()
            .chain(stmts),
    )
}

fn greet() -> Stmt {
    // (me, you) => "Hello, " + you + ", my name is " + me
    local(
        "greet",
        arrow(
            ["me", "you"],
            add(
                add(add(string("Hello, "), var("you")), string(", my name is ")),
                var("me"),
            ),
        ),
    )
}

fn nums(values: &[f64]) -> Vec<Expr> {
    values.iter().copied().map(num).collect()
}

#[rstest]
#[case(vec![vec![1.0], vec![2.0], vec![3.0]])]
#[case(vec![vec![1.0, 2.0], vec![3.0]])]
#[case(vec![vec![1.0], vec![2.0, 3.0]])]
#[case(vec![vec![1.0, 2.0, 3.0]])]
#[case(vec![vec![], vec![1.0], vec![], vec![2.0, 3.0]])]
fn curry_matches_the_direct_call(#[case] groups: Vec<Vec<f64>>) {
    let curried = groups
        .iter()
        .fold(call(var("curry"), [var("add3")]), |callee, group| {
            call(callee, nums(group))
        });

    let ast = with_add([expr(strict_eq(
        curried,
        call(var("add3"), nums(&[1.0, 2.0, 3.0])),
    ))]);

    assert_eq!(interpret_program(OSPlatform, ast), Value::Boolean(true));
}

#[rstest]
#[case(OSPlatform)]
fn curry_with_too_few_arguments_is_a_function(#[case] platform: impl Platform + 'static) {
    let ast = with_add([expr(call(
        call(var("curry"), [var("add3")]),
        nums(&[1.0, 2.0]),
    ))]);

    assert!(interpret_program(platform, ast).as_function().is_some());
}

#[rstest]
#[case(OSPlatform)]
fn curried_partials_are_independent(#[case] platform: impl Platform + 'static) {
    let ast = with_add([
        local("addTo1", call(call(var("curry"), [var("add3")]), nums(&[1.0]))),
        local("first", call(var("addTo1"), nums(&[10.0, 100.0]))),
        local("second", call(var("addTo1"), nums(&[20.0, 200.0]))),
        expr(list([var("first"), var("second")])),
    ]);

    assert_eq!(interpret_program(platform, ast).to_string(), "[111, 221]");
}

#[rstest]
#[case(OSPlatform)]
fn curry_rejects_non_functions(#[case] platform: impl Platform + 'static) {
    let ast = program([expr(call(var("curry"), [num(1.0)]))]);

    let err = interpret(platform, &ast).unwrap_err();

    assert!(matches!(*err, RuntimeError::UnexpectedType { .. }));
}

#[rstest]
#[case(OSPlatform)]
fn call_first_fixes_the_leftmost_argument(#[case] platform: impl Platform + 'static) {
    let ast = program([
        greet(),
        local(
            "heliosSaysHello",
            call(var("callFirst"), [var("greet"), string("Helios")]),
        ),
        expr(call(var("heliosSaysHello"), [string("Eartha")])),
    ]);

    assert_eq!(
        interpret_program(platform, ast),
        Value::from("Hello, Eartha, my name is Helios")
    );
}

#[rstest]
#[case(OSPlatform)]
fn call_last_fixes_the_rightmost_argument(#[case] platform: impl Platform + 'static) {
    let ast = program([
        greet(),
        local(
            "sayHelloToCeline",
            call(var("callLast"), [var("greet"), string("Celine")]),
        ),
        expr(call(var("sayHelloToCeline"), [string("Eartha")])),
    ]);

    assert_eq!(
        interpret_program(platform, ast),
        Value::from("Hello, Celine, my name is Eartha")
    );
}

#[rstest]
#[case("partialLeft", &[7.0], 13.0)]
#[case("partialRight", &[7.0], 13.0)]
#[case("partialLeft", &[7.0, 8.0], 13.0)]
// The fixed 6 is pushed past `y` and dropped.
#[case("partialRight", &[7.0, 8.0], 15.0)]
fn partial_application_of_add(
    #[case] partial: &str,
    #[case] rest: &[f64],
    #[case] expected: f64,
) {
    let ast = with_add([expr(call(
        call(var(partial), [var("add"), num(6.0)]),
        nums(rest),
    ))]);

    assert_eq!(interpret_program(OSPlatform, ast), Value::Number(expected));
}

#[rstest]
#[case(OSPlatform)]
fn partial_left_with_several_fixed_arguments(#[case] platform: impl Platform + 'static) {
    let ast = with_add([expr(call(
        call(var("partialLeft"), [var("add3"), num(1.0), num(2.0)]),
        nums(&[3.0]),
    ))]);

    assert_eq!(interpret_program(platform, ast), Value::Number(6.0));
}

#[rstest]
#[case(OSPlatform)]
fn partial_right_fills_from_the_end(#[case] platform: impl Platform + 'static) {
    let ast = program([
        local(
            "describe",
            arrow(
                ["a", "b", "c"],
                add(add(var("a"), var("b")), var("c")),
            ),
        ),
        expr(call(
            call(var("partialRight"), [var("describe"), string("b"), string("c")]),
            [string("a")],
        )),
    ]);

    assert_eq!(interpret_program(platform, ast), Value::from("abc"));
}
