use kestrel_syntax::ast::Literal;
use std::fmt::{self, Display};
use std::rc::Rc;

use crate::environment::EnvId;
use crate::function::Function;

#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    Boolean(bool),
    String(String),
    List(Rc<Vec<Value>>),
    Function(Function),
    Null,
    /// The absence of a value: what a block body evaluates to without `return`.
    Undefined,
}

impl Value {
    pub fn kind(&self) -> ValueType {
        use Value::*;

        match self {
            Number(_) => ValueType::Number,
            Boolean(_) => ValueType::Boolean,
            String(_) => ValueType::String,
            List(_) => ValueType::List,
            Function(_) => ValueType::Function,
            Null => ValueType::Null,
            Undefined => ValueType::Undefined,
        }
    }

    pub fn new_list(values: Vec<Value>) -> Self {
        Value::List(Rc::new(values))
    }

    pub fn to_bool(&self) -> bool {
        match self {
            Value::Number(value) => *value != 0.0 && !value.is_nan(),
            Value::Boolean(value) => *value,
            Value::String(value) => !value.is_empty(),
            Value::List(_) => true,
            Value::Function(_) => true,
            Value::Null => false,
            Value::Undefined => false,
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    /// `==`: strict equality, except that `null` and `undefined` are equal.
    pub fn loosely_equals(&self, other: &Value) -> bool {
        (self.is_nullish() && other.is_nullish()) || self == other
    }

    /// Pushes every environment this value keeps alive.
    pub(crate) fn trace(&self, pending: &mut Vec<EnvId>) {
        match self {
            Value::Function(function) => pending.extend(function.get_env()),
            Value::List(values) => values.iter().for_each(|value| value.trace(pending)),
            _ => {}
        }
    }
}

/// Strict equality: primitives by value, lists and functions by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;

        match (self, other) {
            (Number(lhs), Number(rhs)) => lhs == rhs,
            (Boolean(lhs), Boolean(rhs)) => lhs == rhs,
            (String(lhs), String(rhs)) => lhs == rhs,
            (List(lhs), List(rhs)) => Rc::ptr_eq(lhs, rhs),
            (Function(lhs), Function(rhs)) => lhs == rhs,
            (Null, Null) => true,
            (Undefined, Undefined) => true,
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Value::*;

        match self {
            Number(value) => write!(f, "{}", format_number(*value)),
            Boolean(value) => match *value {
                true => write!(f, "{}", Literal::TRUE_LITERAL),
                false => write!(f, "{}", Literal::FALSE_LITERAL),
            },
            String(value) => write!(f, "{}", value),
            List(values) => write!(
                f,
                "[{}]",
                values
                    .iter()
                    .map(escape_value)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Function(function) => match function.get_name() {
                Some(name) => write!(f, "[Function: {}]", name),
                None => write!(f, "[Function]"),
            },
            Null => write!(f, "{}", Literal::NULL_LITERAL),
            Undefined => write!(f, "{}", Literal::UNDEFINED_LITERAL),
        }
    }
}

fn format_number(value: f64) -> String {
    match value {
        v if v.is_nan() => "NaN".to_string(),
        v if v.is_infinite() && v.is_sign_positive() => "Infinity".to_string(),
        v if v.is_infinite() => "-Infinity".to_string(),
        v if v == 0.0 => "0".to_string(),
        v => v.to_string(),
    }
}

/// Like `Display`, but strings come out quoted.
pub fn escape_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s.replace('\'', "\\'")),
        _ => value.to_string(),
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Number(value) => Value::Number(value),
            Literal::String(value) => Value::String(value),
            Literal::Boolean(value) => Value::Boolean(value),
            Literal::Null => Value::Null,
            Literal::Undefined => Value::Undefined,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Function> for Value {
    fn from(value: Function) -> Self {
        Value::Function(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::new_list(values)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Number,
    Boolean,
    String,
    List,
    Function,
    Null,
    Undefined,
}

impl Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ValueType::*;

        let name = match self {
            Number => "number",
            Boolean => "boolean",
            String => "string",
            List => "list",
            Function => "function",
            Null => "null",
            Undefined => "undefined",
        };

        write!(f, "{}", name)
    }
}
