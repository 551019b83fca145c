use kestrel_runtime::{Runtime, Value};

/// Writes `values` as one line through the runtime's platform, separated by
/// spaces. Strings print without quotes.
pub fn print(runtime: &Runtime, values: &[Value]) {
    let line = values
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(" ");

    runtime.get_platform().println(&line);
}

pub(crate) fn builtins() -> Vec<(String, Value)> {
    vec![def_fn!("print", [; "values"], |args, runtime, _| {
        print(runtime, &args);

        Ok(Value::Undefined)
    })]
}
