use kestrel_syntax::ast::{FunctionBody, Params};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::environment::EnvId;
use crate::runtime::Runtime;

use super::runtime_error::Result;
use super::value::Value;

static FUNCTION_ID_COUNTER: AtomicUsize = AtomicUsize::new(1);

/// A function value.
///
/// Functions are compared by identity: every construction gets a fresh id,
/// so two functions with the same parameters, body and scope are still
/// different values. Clones share the id.
#[derive(Debug, Clone)]
pub struct Function {
    pub id: usize,
    pub object: FunctionObject,
    pub metadata: Option<FunctionRuntimeMetadata>,
}

impl Function {
    pub fn arrow(params: Params, body: Rc<FunctionBody>, captured_env: EnvId) -> Self {
        Function::from_object(FunctionObject::Arrow {
            params,
            body,
            env: captured_env,
        })
    }

    pub fn classic(
        name: Option<String>,
        params: Params,
        body: Rc<FunctionBody>,
        captured_env: EnvId,
    ) -> Self {
        let metadata = name.clone().map(FunctionRuntimeMetadata::new);

        let mut func = Function::from_object(FunctionObject::Classic {
            name,
            params,
            body,
            env: captured_env,
        });
        func.metadata = metadata;

        func
    }

    pub fn new_builtin(params: Params, func_ptr: BuiltinFunctionPointer) -> Self {
        Function::from_object(FunctionObject::Builtin {
            params,
            env: None,
            func_ptr,
        })
    }

    /// A builtin that reads its captured state from `context` on every call.
    pub fn new_builtin_with_context(
        params: Params,
        context: EnvId,
        func_ptr: BuiltinFunctionPointer,
    ) -> Self {
        Function::from_object(FunctionObject::Builtin {
            params,
            env: Some(context),
            func_ptr,
        })
    }

    fn from_object(object: FunctionObject) -> Self {
        let unique_id = FUNCTION_ID_COUNTER.fetch_add(1, Ordering::SeqCst);

        Function {
            id: unique_id,
            object,
            metadata: None,
        }
    }

    pub fn get_params(&self) -> &Params {
        match &self.object {
            FunctionObject::Arrow { params, .. } => params,
            FunctionObject::Classic { params, .. } => params,
            FunctionObject::Builtin { params, .. } => params,
        }
    }

    /// Declared positional parameters, not counting a trailing collector.
    pub fn arity(&self) -> usize {
        self.get_params().arity()
    }

    pub fn get_env(&self) -> Option<EnvId> {
        match &self.object {
            FunctionObject::Arrow { env, .. } => Some(*env),
            FunctionObject::Classic { env, .. } => Some(*env),
            FunctionObject::Builtin { env, .. } => *env,
        }
    }

    pub fn get_name(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.get_name())
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.object, FunctionObject::Builtin { .. })
    }

    pub fn set_metadata(&mut self, metadata: FunctionRuntimeMetadata) {
        self.metadata = Some(metadata);
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.set_metadata(FunctionRuntimeMetadata::new(name.into()));
        self
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

pub type BuiltinFunctionPointer =
    fn(args: Vec<Value>, runtime: &mut Runtime, context: Option<EnvId>) -> Result<Value>;

#[derive(Debug, Clone)]
pub enum FunctionObject {
    /// Resolves `arguments` and every other free name lexically.
    Arrow {
        params: Params,
        body: Rc<FunctionBody>,
        env: EnvId,
    },
    /// Receives its own `arguments` list; a named one can call itself by
    /// that name from inside its body.
    Classic {
        name: Option<String>,
        params: Params,
        body: Rc<FunctionBody>,
        env: EnvId,
    },
    Builtin {
        params: Params,
        env: Option<EnvId>,
        func_ptr: BuiltinFunctionPointer,
    },
}

#[derive(Debug, Clone)]
pub struct FunctionRuntimeMetadata {
    name: Option<String>,
}

impl FunctionRuntimeMetadata {
    pub fn new(name: String) -> Self {
        FunctionRuntimeMetadata { name: Some(name) }
    }

    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[macro_export]
macro_rules! params {
    ($($name:expr),* $(; $rest:expr)?) => {
        {
            let names: ::std::vec::Vec<::std::string::String> = ::std::vec![$($name.to_string()),*];
            #[allow(unused_mut)]
            let mut params = $crate::Params::new(names);
            $(params = params.with_rest($rest);)?
            params
        }
    };
}
