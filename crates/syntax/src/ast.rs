use std::fmt;
use std::rc::Rc;

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Ast(pub Vec<Stmt>);

impl Ast {
    pub fn new() -> Self {
        Ast(vec![])
    }

    pub fn push(&mut self, statement: Stmt) {
        self.0.push(statement);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stmt> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for Ast {
    type Item = Stmt;
    type IntoIter = std::vec::IntoIter<Stmt>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Ast {
    type Item = &'a Stmt;
    type IntoIter = std::slice::Iter<'a, Stmt>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<Stmt>> for Ast {
    fn from(value: Vec<Stmt>) -> Self {
        Ast(value)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Stmt {
    Expr(Expr),
    Decl(Decl),
    Cond(Cond),
    Block(Block),
    Return(Return),
}

pub type Return = Option<Expr>;

pub type Block = Ast;

#[derive(Debug, PartialEq, Clone)]
pub enum Decl {
    Local(LocalDecl),
    Function(FunctionDecl),
}

#[derive(Debug, PartialEq, Clone)]
pub struct LocalDecl {
    pub name: String,
    pub value: Box<Expr>,
}

/// A `function name(...) { ... }` statement. Bound before its enclosing
/// scope runs.
#[derive(Debug, PartialEq, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Params,
    pub body: Rc<FunctionBody>,
}

impl Decl {
    pub fn make_local_declaration(name: String, value: Expr) -> Self {
        Decl::Local(LocalDecl {
            name,
            value: Box::new(value),
        })
    }

    pub fn make_function_declaration(name: String, params: Params, body: Ast) -> Self {
        Decl::Function(FunctionDecl {
            name,
            params,
            body: Rc::new(FunctionBody::Block(body)),
        })
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Cond {
    pub cond: Box<Expr>,
    pub then: Box<Stmt>,
    pub or_else: Option<Box<Stmt>>,
}

impl Cond {
    pub fn make_if_statement(cond: Expr, then: Stmt, or_else: Option<Stmt>) -> Self {
        Cond {
            cond: Box::new(cond),
            then: Box::new(then),
            or_else: or_else.map(Box::new),
        }
    }
}

/// Ordered parameter names with an optional trailing collector.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Params {
    pub names: Vec<String>,
    pub rest: Option<String>,
}

impl Params {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Params {
            names: names.into_iter().map(Into::into).collect(),
            rest: None,
        }
    }

    pub fn variadic(rest: impl Into<String>) -> Self {
        Params {
            names: vec![],
            rest: Some(rest.into()),
        }
    }

    pub fn with_rest(mut self, rest: impl Into<String>) -> Self {
        self.rest = Some(rest.into());
        self
    }

    /// Number of declared positional parameters; the collector is not counted.
    pub fn arity(&self) -> usize {
        self.names.len()
    }

    pub fn is_variadic(&self) -> bool {
        self.rest.is_some()
    }

    pub fn binds(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name) || self.rest.as_deref() == Some(name)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum FunctionBody {
    Expr(Box<Expr>),
    Block(Ast),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FunctionKind {
    /// Lexically scoped; has no `arguments` of its own.
    Arrow,
    /// Gets an `arguments` list and may carry its own name.
    Classic,
}

#[derive(Debug, PartialEq, Clone)]
pub struct FunctionExpr {
    pub kind: FunctionKind,
    pub name: Option<String>,
    pub params: Params,
    pub body: Rc<FunctionBody>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Binary {
        lhs: Box<Expr>,
        op: BinaryOp,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        rhs: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Grouping {
        expr: Box<Expr>,
    },
    Sequence {
        exprs: Vec<Expr>,
    },
    List {
        elements: Vec<Expr>,
    },
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    Literal {
        value: Literal,
    },
    Variable {
        name: String,
    },
    Function(FunctionExpr),
}

impl Expr {
    pub fn make_binary(lhs: Expr, op: BinaryOp, rhs: Expr) -> Self {
        Expr::Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }

    pub fn make_unary(op: UnaryOp, rhs: Expr) -> Self {
        Expr::Unary {
            op,
            rhs: Box::new(rhs),
        }
    }

    pub fn make_literal(value: Literal) -> Self {
        Expr::Literal { value }
    }

    pub fn make_grouping(expr: Expr) -> Self {
        Expr::Grouping {
            expr: Box::new(expr),
        }
    }

    pub fn make_sequence(exprs: Vec<Expr>) -> Self {
        Expr::Sequence { exprs }
    }

    pub fn make_list(elements: Vec<Expr>) -> Self {
        Expr::List { elements }
    }

    pub fn make_index(target: Expr, index: Expr) -> Self {
        Expr::Index {
            target: Box::new(target),
            index: Box::new(index),
        }
    }

    pub fn make_variable(value: String) -> Self {
        Expr::Variable { name: value }
    }

    pub fn make_call(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn make_arrow(params: Params, body: FunctionBody) -> Self {
        Expr::Function(FunctionExpr {
            kind: FunctionKind::Arrow,
            name: None,
            params,
            body: Rc::new(body),
        })
    }

    pub fn make_classic(name: Option<String>, params: Params, body: Ast) -> Self {
        Expr::Function(FunctionExpr {
            kind: FunctionKind::Classic,
            name,
            params,
            body: Rc::new(FunctionBody::Block(body)),
        })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    StrictEquality,
    StrictInequality,
    Equality,
    Inequality,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    LogicalAnd,
    LogicalOr,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinaryOp::*;

        let symbol = match self {
            Add => "+",
            Subtract => "-",
            Multiply => "*",
            Divide => "/",
            Modulo => "%",
            StrictEquality => "===",
            StrictInequality => "!==",
            Equality => "==",
            Inequality => "!=",
            Greater => ">",
            GreaterOrEqual => ">=",
            Less => "<",
            LessOrEqual => "<=",
            LogicalAnd => "&&",
            LogicalOr => "||",
        };

        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOp {
    Negative,
    LogicalNot,
    Void,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
    Undefined,
}

impl Literal {
    pub const TRUE_LITERAL: &'static str = "true";
    pub const FALSE_LITERAL: &'static str = "false";
    pub const NULL_LITERAL: &'static str = "null";
    pub const UNDEFINED_LITERAL: &'static str = "undefined";
}
