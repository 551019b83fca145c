use kestrel_runtime::{params, Function, Result, Runtime, Value};

use crate::{captured, recapture};

/// Calls `func` on the first invocation only. Every later call returns that
/// first result, whatever its arguments.
///
/// The decorator counts as fired as soon as the first call starts, so a
/// reentrant call made by `func` itself gets `undefined`.
pub fn once(runtime: &mut Runtime, func: Value) -> Function {
    let context = runtime.alloc_context([
        ("fn", func),
        ("fired", Value::Boolean(false)),
        ("result", Value::Undefined),
    ]);

    Function::new_builtin_with_context(params![; "args"], context, |args, runtime, context| {
        if captured(runtime, context, "fired")?.to_bool() {
            log::trace!("once: replaying first result");
            return captured(runtime, context, "result");
        }

        recapture(runtime, context, "fired", Value::Boolean(true))?;

        let func = captured(runtime, context, "fn")?;
        let result = runtime.call_value(&func, args)?;

        recapture(runtime, context, "result", result.clone())?;

        Ok(result)
    })
}

/// Short-circuits on a `null` or `undefined` first argument, returning it
/// instead of calling `func`. A call without arguments returns `undefined`.
pub fn maybe(runtime: &mut Runtime, func: Value) -> Function {
    let context = runtime.alloc_context([("fn", func)]);

    Function::new_builtin_with_context(params![; "args"], context, |args, runtime, context| {
        let first = args!(args, 0);

        if first.is_nullish() {
            return Ok(first);
        }

        let func = captured(runtime, context, "fn")?;

        runtime.call_value(&func, args)
    })
}

/// `(list) => list.map((element) => func(element))`.
pub fn map_with(runtime: &mut Runtime, func: Value) -> Function {
    let context = runtime.alloc_context([("fn", func)]);

    Function::new_builtin_with_context(params!["list"], context, |args, runtime, context| {
        let list = ensure!(args!(args, 0), List(list) => list);
        let func = captured(runtime, context, "fn")?;

        let mapped = list
            .iter()
            .map(|element| runtime.call_value(&func, vec![element.clone()]))
            .collect::<Result<Vec<_>>>()?;

        Ok(Value::new_list(mapped))
    })
}

/// Calls `func` with `1`, `2`, up to `times`, in that order.
pub fn repeat(runtime: &mut Runtime, times: f64, func: &Value) -> Result<Value> {
    let mut n = 1.0;

    while n <= times {
        runtime.call_value(func, vec![Value::Number(n)])?;
        n += 1.0;
    }

    Ok(Value::Undefined)
}

pub(crate) fn builtins() -> Vec<(String, Value)> {
    vec![
        def_fn!("once", ["fn"], |args, runtime, _| {
            Ok(once(runtime, args!(args, 0)).into())
        }),
        def_fn!("maybe", ["fn"], |args, runtime, _| {
            Ok(maybe(runtime, args!(args, 0)).into())
        }),
        def_fn!("mapWith", ["fn"], |args, runtime, _| {
            Ok(map_with(runtime, args!(args, 0)).into())
        }),
        def_fn!("repeat", ["num", "fn"], |args, runtime, _| {
            let times = ensure!(args!(args, 0), Number(times) => times);

            repeat(runtime, times, &args!(args, 1))
        }),
    ]
}
