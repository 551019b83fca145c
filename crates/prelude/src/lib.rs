use indexmap::IndexMap;
use kestrel_runtime::{EnvId, Result, Runtime, Value};

macro_rules! def_fn {
    ($name:literal, [$($param:expr),* $(; $rest:expr)?], $body:expr) => {
        (
            $name.to_string(),
            ::kestrel_runtime::Value::Function(
                ::kestrel_runtime::Function::new_builtin(
                    ::kestrel_runtime::params![$($param),* $(; $rest)?],
                    $body,
                )
                .named($name),
            ),
        )
    };
}

/// Argument at `index`, `undefined` when the caller passed fewer.
macro_rules! args {
    ($args:expr, $index:expr) => {
        $args
            .get($index)
            .cloned()
            .unwrap_or(::kestrel_runtime::Value::Undefined)
    };
}

macro_rules! ensure {
    ($val:expr, $variant:ident($binding:pat) => $body:expr) => {{
        use ::kestrel_runtime::{RuntimeError, Value, ValueType};

        match $val {
            Value::$variant($binding) => $body,
            value => {
                return Err(Box::new(RuntimeError::UnexpectedType {
                    expected: ValueType::$variant,
                    found: value.kind(),
                    message: None,
                    stacktrace: vec![],
                }))
            }
        }
    }};
}

mod combinators;
mod decorators;
mod io;
mod partial;

pub use combinators::*;
pub use decorators::*;
pub use io::*;
pub use partial::*;

/// Every builtin, keyed by the name programs call it by.
pub fn get_runtime_prelude() -> IndexMap<String, Value> {
    let mut prelude = IndexMap::new();

    prelude.extend(combinators::builtins());
    prelude.extend(decorators::builtins());
    prelude.extend(partial::builtins());
    prelude.extend(io::builtins());

    prelude
}

fn context_env(runtime: &Runtime, context: Option<EnvId>) -> EnvId {
    context.unwrap_or_else(|| runtime.base_env())
}

/// Reads a binding from the frame a builtin was created with.
pub(crate) fn captured(runtime: &Runtime, context: Option<EnvId>, name: &str) -> Result<Value> {
    Ok(runtime
        .store()
        .lookup(context_env(runtime, context), name)?)
}

pub(crate) fn recapture(
    runtime: &mut Runtime,
    context: Option<EnvId>,
    name: &str,
    value: Value,
) -> Result<()> {
    let env = context_env(runtime, context);

    Ok(runtime.store_mut().define(env, name, value)?)
}
