use kestrel_runtime::{params, Function, Runtime, Value};

use crate::captured;

/// I: `(x) => x`.
pub fn identity(value: Value) -> Value {
    value
}

/// K: `(x) => (y) => x`, already applied to `x`.
pub fn kestrel(runtime: &mut Runtime, value: Value) -> Function {
    let context = runtime.alloc_context([("x", value)]);

    Function::new_builtin_with_context(params!["y"], context, |_, runtime, context| {
        captured(runtime, context, "x")
    })
}

/// B: `(x) => f(g(x))`.
pub fn compose(runtime: &mut Runtime, f: Value, g: Value) -> Function {
    let context = runtime.alloc_context([("f", f), ("g", g)]);

    Function::new_builtin_with_context(params!["x"], context, |args, runtime, context| {
        let f = captured(runtime, context, "f")?;
        let g = captured(runtime, context, "g")?;

        let inner = runtime.call_value(&g, vec![args!(args, 0)])?;

        runtime.call_value(&f, vec![inner])
    })
}

/// Left to right composition: `pipeline(f, g)(x)` is `g(f(x))`. With no
/// functions it behaves as [`identity`].
pub fn pipeline(runtime: &mut Runtime, fns: Vec<Value>) -> Function {
    let context = runtime.alloc_context([("fns", Value::new_list(fns))]);

    Function::new_builtin_with_context(params!["x"], context, |args, runtime, context| {
        let fns = ensure!(captured(runtime, context, "fns")?, List(fns) => fns);

        fns.iter()
            .try_fold(args!(args, 0), |value, f| runtime.call_value(f, vec![value]))
    })
}

/// `(x) => !predicate(x)`.
pub fn negate(runtime: &mut Runtime, predicate: Value) -> Function {
    let context = runtime.alloc_context([("predicate", predicate)]);

    Function::new_builtin_with_context(params!["x"], context, |args, runtime, context| {
        let predicate = captured(runtime, context, "predicate")?;
        let value = runtime.call_value(&predicate, vec![args!(args, 0)])?;

        Ok(Value::Boolean(!value.to_bool()))
    })
}

/// Calls `func` with the first argument only.
pub fn unary(runtime: &mut Runtime, func: Value) -> Function {
    let context = runtime.alloc_context([("fn", func)]);

    Function::new_builtin_with_context(params!["x"], context, |args, runtime, context| {
        let func = captured(runtime, context, "fn")?;

        runtime.call_value(&func, vec![args!(args, 0)])
    })
}

/// `(fn) => { fn(value); return value }`. Anything other than a function
/// passed to the result is ignored.
pub fn tap(runtime: &mut Runtime, value: Value) -> Function {
    let context = runtime.alloc_context([("value", value)]);

    Function::new_builtin_with_context(params!["fn"], context, |args, runtime, context| {
        let value = captured(runtime, context, "value")?;

        if let Value::Function(func) = args!(args, 0) {
            runtime.call_function(&func, vec![value.clone()])?;
        }

        Ok(value)
    })
}

pub(crate) fn builtins() -> Vec<(String, Value)> {
    vec![
        def_fn!("identity", ["x"], |args, _, _| Ok(identity(args!(args, 0)))),
        def_fn!("kestrel", ["x"], |args, runtime, _| {
            Ok(kestrel(runtime, args!(args, 0)).into())
        }),
        def_fn!("compose", ["f", "g"], |args, runtime, _| {
            Ok(compose(runtime, args!(args, 0), args!(args, 1)).into())
        }),
        def_fn!("pipeline", [; "fns"], |args, runtime, _| {
            Ok(pipeline(runtime, args).into())
        }),
        def_fn!("negate", ["predicate"], |args, runtime, _| {
            Ok(negate(runtime, args!(args, 0)).into())
        }),
        def_fn!("unary", ["fn"], |args, runtime, _| {
            Ok(unary(runtime, args!(args, 0)).into())
        }),
        def_fn!("tap", ["value"], |args, runtime, _| {
            Ok(tap(runtime, args!(args, 0)).into())
        }),
    ]
}
