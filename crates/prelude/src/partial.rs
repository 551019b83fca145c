use kestrel_runtime::{params, Function, Runtime, Value};

use crate::captured;

/// Turns `func` into a chain of calls that collect arguments until there are
/// at least as many as its declared arity, then calls it with all of them.
///
/// Arguments may arrive one at a time or grouped: `curry(f)(1)(2, 3)` and
/// `curry(f)(1, 2)(3)` both end up calling `f(1, 2, 3)`.
pub fn curry(runtime: &mut Runtime, func: Function) -> Function {
    curried(runtime, func, vec![])
}

fn curried(runtime: &mut Runtime, func: Function, applied: Vec<Value>) -> Function {
    let context = runtime.alloc_context([
        ("fn", Value::Function(func)),
        ("applied", Value::new_list(applied)),
    ]);

    Function::new_builtin_with_context(params![; "args"], context, |args, runtime, context| {
        let func = ensure!(captured(runtime, context, "fn")?, Function(func) => func);
        let applied = ensure!(captured(runtime, context, "applied")?, List(applied) => applied);

        let mut collected = applied.to_vec();
        collected.extend(args);

        log::trace!(
            "curried call holds {} of {} argument(s)",
            collected.len(),
            func.arity()
        );

        if collected.len() >= func.arity() {
            return runtime.call_function(&func, collected);
        }

        Ok(Value::Function(curried(runtime, func, collected)))
    })
}

/// `(...rest) => func(...fixed, ...rest)`.
pub fn partial_left(runtime: &mut Runtime, func: Value, fixed: Vec<Value>) -> Function {
    let context = runtime.alloc_context([("fn", func), ("fixed", Value::new_list(fixed))]);

    Function::new_builtin_with_context(params![; "rest"], context, |args, runtime, context| {
        let func = captured(runtime, context, "fn")?;
        let fixed = ensure!(captured(runtime, context, "fixed")?, List(fixed) => fixed);

        let mut all = fixed.to_vec();
        all.extend(args);

        runtime.call_value(&func, all)
    })
}

/// `(...rest) => func(...rest, ...fixed)`.
///
/// The fixed arguments land right after whatever the caller passes, so extra
/// arguments push them past the parameters `func` declares and they are lost:
/// with `add = (x, y) => x + y`, `partial_right(add, [6])` called with `7, 8`
/// computes `7 + 8`.
pub fn partial_right(runtime: &mut Runtime, func: Value, fixed: Vec<Value>) -> Function {
    let context = runtime.alloc_context([("fn", func), ("fixed", Value::new_list(fixed))]);

    Function::new_builtin_with_context(params![; "rest"], context, |args, runtime, context| {
        let func = captured(runtime, context, "fn")?;
        let fixed = ensure!(captured(runtime, context, "fixed")?, List(fixed) => fixed);

        let mut all = args;
        all.extend(fixed.iter().cloned());

        runtime.call_value(&func, all)
    })
}

pub fn call_first(runtime: &mut Runtime, func: Value, larg: Value) -> Function {
    partial_left(runtime, func, vec![larg])
}

pub fn call_last(runtime: &mut Runtime, func: Value, rarg: Value) -> Function {
    partial_right(runtime, func, vec![rarg])
}

pub(crate) fn builtins() -> Vec<(String, Value)> {
    vec![
        def_fn!("curry", ["fn"], |args, runtime, _| {
            let func = ensure!(args!(args, 0), Function(func) => func);

            Ok(curry(runtime, func).into())
        }),
        def_fn!("partialLeft", ["fn"; "args"], |args, runtime, _| {
            let mut args = args.into_iter();
            let func = args.next().unwrap_or(Value::Undefined);

            Ok(partial_left(runtime, func, args.collect()).into())
        }),
        def_fn!("partialRight", ["fn"; "args"], |args, runtime, _| {
            let mut args = args.into_iter();
            let func = args.next().unwrap_or(Value::Undefined);

            Ok(partial_right(runtime, func, args.collect()).into())
        }),
        def_fn!("callFirst", ["fn", "larg"], |args, runtime, _| {
            Ok(call_first(runtime, args!(args, 0), args!(args, 1)).into())
        }),
        def_fn!("callLast", ["fn", "rarg"], |args, runtime, _| {
            Ok(call_last(runtime, args!(args, 0), args!(args, 1)).into())
        }),
    ]
}
