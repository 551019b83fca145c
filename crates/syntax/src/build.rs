//! Terse constructors for assembling trees by hand.
//!
//! ```
//! use kestrel_syntax::build::*;
//!
//! // (x) => (y) => x
//! let kestrel = arrow(["x"], arrow(["y"], var("x")));
//! let applied = call(call(kestrel, [num(1.0)]), [num(2.0)]);
//! # let _ = applied;
//! ```

use crate::ast::{
    Ast, BinaryOp, Cond, Decl, Expr, FunctionBody, Literal, Params, Stmt, UnaryOp,
};

pub fn num(value: f64) -> Expr {
    Expr::make_literal(Literal::Number(value))
}

pub fn string(value: impl Into<String>) -> Expr {
    Expr::make_literal(Literal::String(value.into()))
}

pub fn boolean(value: bool) -> Expr {
    Expr::make_literal(Literal::Boolean(value))
}

pub fn null() -> Expr {
    Expr::make_literal(Literal::Null)
}

pub fn undefined() -> Expr {
    Expr::make_literal(Literal::Undefined)
}

pub fn var(name: impl Into<String>) -> Expr {
    Expr::make_variable(name.into())
}

pub fn list(elements: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::make_list(elements.into_iter().collect())
}

pub fn index(target: Expr, index: Expr) -> Expr {
    Expr::make_index(target, index)
}

pub fn call(callee: Expr, args: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::make_call(callee, args.into_iter().collect())
}

pub fn seq(exprs: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::make_sequence(exprs.into_iter().collect())
}

pub fn group(expr: Expr) -> Expr {
    Expr::make_grouping(expr)
}

pub fn binary(lhs: Expr, op: BinaryOp, rhs: Expr) -> Expr {
    Expr::make_binary(lhs, op, rhs)
}

pub fn add(lhs: Expr, rhs: Expr) -> Expr {
    binary(lhs, BinaryOp::Add, rhs)
}

pub fn sub(lhs: Expr, rhs: Expr) -> Expr {
    binary(lhs, BinaryOp::Subtract, rhs)
}

pub fn mul(lhs: Expr, rhs: Expr) -> Expr {
    binary(lhs, BinaryOp::Multiply, rhs)
}

pub fn strict_eq(lhs: Expr, rhs: Expr) -> Expr {
    binary(lhs, BinaryOp::StrictEquality, rhs)
}

pub fn not(rhs: Expr) -> Expr {
    Expr::make_unary(UnaryOp::LogicalNot, rhs)
}

pub fn neg(rhs: Expr) -> Expr {
    Expr::make_unary(UnaryOp::Negative, rhs)
}

pub fn void(rhs: Expr) -> Expr {
    Expr::make_unary(UnaryOp::Void, rhs)
}

pub fn params<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Params {
    Params::new(names)
}

/// Arrow function with an expression body.
pub fn arrow<S: Into<String>>(names: impl IntoIterator<Item = S>, body: Expr) -> Expr {
    Expr::make_arrow(Params::new(names), FunctionBody::Expr(Box::new(body)))
}

/// Zero-parameter arrow function, `() => body`.
pub fn thunk(body: Expr) -> Expr {
    Expr::make_arrow(Params::default(), FunctionBody::Expr(Box::new(body)))
}

/// Zero-parameter arrow function with a block body.
pub fn thunk_block(body: impl IntoIterator<Item = Stmt>) -> Expr {
    Expr::make_arrow(Params::default(), FunctionBody::Block(block(body)))
}

/// Arrow function with a block body.
pub fn arrow_block<S: Into<String>>(
    names: impl IntoIterator<Item = S>,
    body: impl IntoIterator<Item = Stmt>,
) -> Expr {
    Expr::make_arrow(Params::new(names), FunctionBody::Block(block(body)))
}

/// Arrow function taking only a trailing collector, `(...rest) => body`.
pub fn arrow_variadic(rest: impl Into<String>, body: Expr) -> Expr {
    Expr::make_arrow(Params::variadic(rest), FunctionBody::Expr(Box::new(body)))
}

/// `function [name](params) { body }`
pub fn function<S: Into<String>>(
    name: Option<&str>,
    names: impl IntoIterator<Item = S>,
    body: impl IntoIterator<Item = Stmt>,
) -> Expr {
    Expr::make_classic(name.map(str::to_string), Params::new(names), block(body))
}

pub fn block(stmts: impl IntoIterator<Item = Stmt>) -> Ast {
    Ast(stmts.into_iter().collect())
}

pub fn expr(expr: Expr) -> Stmt {
    Stmt::Expr(expr)
}

pub fn ret(value: Expr) -> Stmt {
    Stmt::Return(Some(value))
}

pub fn ret_empty() -> Stmt {
    Stmt::Return(None)
}

pub fn local(name: impl Into<String>, value: Expr) -> Stmt {
    Stmt::Decl(Decl::make_local_declaration(name.into(), value))
}

pub fn declare<S: Into<String>>(
    name: impl Into<String>,
    names: impl IntoIterator<Item = S>,
    body: impl IntoIterator<Item = Stmt>,
) -> Stmt {
    Stmt::Decl(Decl::make_function_declaration(
        name.into(),
        Params::new(names),
        block(body),
    ))
}

pub fn if_else(cond: Expr, then: Stmt, or_else: Option<Stmt>) -> Stmt {
    Stmt::Cond(Cond::make_if_statement(cond, then, or_else))
}

pub fn scope(stmts: impl IntoIterator<Item = Stmt>) -> Stmt {
    Stmt::Block(block(stmts))
}

pub fn program(stmts: impl IntoIterator<Item = Stmt>) -> Ast {
    block(stmts)
}
