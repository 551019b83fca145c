use indexmap::IndexSet;

use crate::ast::{Ast, Decl, Expr, FunctionBody, FunctionExpr, FunctionKind, Params, Stmt};

/// Names a function literal refers to without binding them itself, in order
/// of first reference.
///
/// A function with free variables closes over its defining scope; one with
/// none is pure in the sense used by the sandbox.
pub fn free_variables(function: &FunctionExpr) -> IndexSet<String> {
    let mut tracker = BindingTracker::default();
    let mut free = IndexSet::new();

    tracker.visit_function(function, &mut free);

    free
}

pub fn is_pure(function: &FunctionExpr) -> bool {
    free_variables(function).is_empty()
}

#[derive(Debug, Default)]
struct BindingTracker {
    scopes: Vec<IndexSet<String>>,
}

impl BindingTracker {
    fn is_bound(&self, name: &str) -> bool {
        self.scopes.iter().any(|scope| scope.contains(name))
    }

    fn bind(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string());
        }
    }

    fn visit_function(&mut self, function: &FunctionExpr, free: &mut IndexSet<String>) {
        let mut scope = params_scope(&function.params);

        if function.kind == FunctionKind::Classic {
            scope.insert("arguments".to_string());

            if let Some(name) = &function.name {
                scope.insert(name.clone());
            }
        }

        self.scopes.push(scope);

        self.visit_body(&function.body, free);
        self.scopes.pop();
    }

    fn visit_body(&mut self, body: &FunctionBody, free: &mut IndexSet<String>) {
        match body {
            FunctionBody::Expr(expr) => self.visit_expr(expr, free),
            FunctionBody::Block(block) => self.visit_block_contents(block, free),
        }
    }

    fn visit_block(&mut self, block: &Ast, free: &mut IndexSet<String>) {
        self.scopes.push(IndexSet::new());
        self.visit_block_contents(block, free);
        self.scopes.pop();
    }

    fn visit_block_contents(&mut self, block: &Ast, free: &mut IndexSet<String>) {
        // Everything declared in a block is visible across the whole block.
        for stmt in block {
            if let Stmt::Decl(decl) = stmt {
                match decl {
                    Decl::Local(local) => self.bind(&local.name),
                    Decl::Function(function) => self.bind(&function.name),
                }
            }
        }

        for stmt in block {
            self.visit_stmt(stmt, free);
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt, free: &mut IndexSet<String>) {
        match stmt {
            Stmt::Expr(expr) => self.visit_expr(expr, free),
            Stmt::Decl(Decl::Local(local)) => self.visit_expr(&local.value, free),
            Stmt::Decl(Decl::Function(function)) => {
                let mut scope = params_scope(&function.params);
                scope.insert("arguments".to_string());

                self.scopes.push(scope);
                self.visit_body(&function.body, free);
                self.scopes.pop();
            }
            Stmt::Cond(cond) => {
                self.visit_expr(&cond.cond, free);
                self.visit_stmt(&cond.then, free);

                if let Some(or_else) = &cond.or_else {
                    self.visit_stmt(or_else, free);
                }
            }
            Stmt::Block(block) => self.visit_block(block, free),
            Stmt::Return(Some(expr)) => self.visit_expr(expr, free),
            Stmt::Return(None) => {}
        }
    }

    fn visit_expr(&mut self, expr: &Expr, free: &mut IndexSet<String>) {
        match expr {
            Expr::Binary { lhs, rhs, .. } => {
                self.visit_expr(lhs, free);
                self.visit_expr(rhs, free);
            }
            Expr::Unary { rhs, .. } => self.visit_expr(rhs, free),
            Expr::Call { callee, args } => {
                self.visit_expr(callee, free);
                args.iter().for_each(|arg| self.visit_expr(arg, free));
            }
            Expr::Grouping { expr } => self.visit_expr(expr, free),
            Expr::Sequence { exprs } | Expr::List { elements: exprs } => {
                exprs.iter().for_each(|expr| self.visit_expr(expr, free))
            }
            Expr::Index { target, index } => {
                self.visit_expr(target, free);
                self.visit_expr(index, free);
            }
            Expr::Literal { .. } => {}
            Expr::Variable { name } => {
                if !self.is_bound(name) {
                    free.insert(name.clone());
                }
            }
            Expr::Function(function) => self.visit_function(function, free),
        }
    }
}

fn params_scope(params: &Params) -> IndexSet<String> {
    params
        .names
        .iter()
        .chain(params.rest.iter())
        .cloned()
        .collect()
}
