use std::fmt;
use thiserror::Error;

use crate::environment::EnvId;
use crate::store::StoreError;
use crate::value::ValueType;

pub type Result<T> = std::result::Result<T, Box<RuntimeError>>;

#[derive(Debug, Clone, PartialEq)]
pub enum FunctionName {
    Anonymous,
    TopLevel,
    Named(String),
}

impl From<Option<&str>> for FunctionName {
    fn from(name: Option<&str>) -> Self {
        match name {
            Some(name) => FunctionName::Named(name.to_string()),
            None => FunctionName::Anonymous,
        }
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionName::Anonymous => write!(f, "<anonymous>"),
            FunctionName::TopLevel => write!(f, "<top level>"),
            FunctionName::Named(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackFrame {
    pub function_name: FunctionName,
}

impl StackFrame {
    pub fn new(function_name: FunctionName) -> Self {
        Self { function_name }
    }
}

#[derive(Error, Debug, PartialEq, Clone)]
pub enum RuntimeError {
    #[error("'{name}' is not defined")]
    UnboundName {
        name: String,
        stacktrace: Vec<StackFrame>,
    },

    #[error("'{name}' has already been declared in this scope")]
    AlreadyDeclared {
        name: String,
        stacktrace: Vec<StackFrame>,
    },

    #[error("invalid operation for types '{first}' and '{second}'")]
    TypeMismatch {
        first: ValueType,
        second: ValueType,
        message: Option<String>,
        stacktrace: Vec<StackFrame>,
    },

    #[error("expected a value of type '{expected}', found '{found}'")]
    UnexpectedType {
        expected: ValueType,
        found: ValueType,
        message: Option<String>,
        stacktrace: Vec<StackFrame>,
    },

    #[error("a value of type '{found}' is not a function")]
    NotCallable {
        found: ValueType,
        stacktrace: Vec<StackFrame>,
    },

    #[error("wrong number of arguments: expected {expected}, found {found}")]
    WrongNumberOfArguments {
        expected: usize,
        found: usize,
        stacktrace: Vec<StackFrame>,
    },

    #[error("index must be a non-negative integer, found '{index}'")]
    InvalidIndex {
        index: f64,
        stacktrace: Vec<StackFrame>,
    },

    #[error("maximum call depth of {depth} exceeded")]
    StackOverflow {
        depth: usize,
        stacktrace: Vec<StackFrame>,
    },

    #[error("environment {env} has been reclaimed")]
    DanglingEnvironment {
        env: EnvId,
        stacktrace: Vec<StackFrame>,
    },
}

impl RuntimeError {
    pub fn get_stacktrace(&self) -> &[StackFrame] {
        use RuntimeError::*;

        match self {
            UnboundName { stacktrace, .. }
            | AlreadyDeclared { stacktrace, .. }
            | TypeMismatch { stacktrace, .. }
            | UnexpectedType { stacktrace, .. }
            | NotCallable { stacktrace, .. }
            | WrongNumberOfArguments { stacktrace, .. }
            | InvalidIndex { stacktrace, .. }
            | StackOverflow { stacktrace, .. }
            | DanglingEnvironment { stacktrace, .. } => stacktrace,
        }
    }

    pub fn get_mut_stacktrace(&mut self) -> &mut Vec<StackFrame> {
        use RuntimeError::*;

        match self {
            UnboundName { stacktrace, .. }
            | AlreadyDeclared { stacktrace, .. }
            | TypeMismatch { stacktrace, .. }
            | UnexpectedType { stacktrace, .. }
            | NotCallable { stacktrace, .. }
            | WrongNumberOfArguments { stacktrace, .. }
            | InvalidIndex { stacktrace, .. }
            | StackOverflow { stacktrace, .. }
            | DanglingEnvironment { stacktrace, .. } => stacktrace,
        }
    }

    pub fn get_message(&self) -> Option<&str> {
        match self {
            RuntimeError::TypeMismatch { message, .. }
            | RuntimeError::UnexpectedType { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<StoreError> for Box<RuntimeError> {
    fn from(err: StoreError) -> Self {
        Box::new(match err {
            StoreError::UnboundName(name) => RuntimeError::UnboundName {
                name,
                stacktrace: vec![],
            },
            StoreError::Dangling(env) => RuntimeError::DanglingEnvironment {
                env,
                stacktrace: vec![],
            },
        })
    }
}
