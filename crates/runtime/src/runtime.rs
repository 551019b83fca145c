use kestrel_syntax::ast::{self, FunctionBody, FunctionKind, Params};
use kestrel_syntax::hoisted_declarations;

use crate::{
    config::{ArityMode, RuntimeConfig},
    environment::{EnvId, Environment},
    frame::Frame,
    function::{Function, FunctionObject},
    platform::Platform,
    runtime_error::{FunctionName, Result, RuntimeError, StackFrame},
    stack::{Stack, StackError},
    store::Store,
    value::{escape_value, Value, ValueType},
};

const ARGUMENTS: &str = "arguments";

/// Native stack left when a call grows onto a fresh segment.
const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_SEGMENT: usize = 2 * 1024 * 1024;

/// Tree-walking evaluator.
///
/// Owns every environment frame through its [`Store`]. The base frame holds
/// the builtins and is the parent of the global frame, where programs run.
#[derive(Debug)]
pub struct Runtime {
    store: Store,
    stack: Stack,
    base: EnvId,
    platform: Box<dyn Platform>,
    config: RuntimeConfig,
}

impl Runtime {
    pub fn new(platform: impl Platform + 'static) -> Self {
        Runtime::build(platform, RuntimeConfig::default(), Environment::new())
    }

    pub fn with_config(platform: impl Platform + 'static, config: RuntimeConfig) -> Self {
        Runtime::build(platform, config, Environment::new())
    }

    pub fn with_builtins<S: Into<String>>(
        platform: impl Platform + 'static,
        builtins: impl IntoIterator<Item = (S, Value)>,
    ) -> Self {
        Runtime::build(
            platform,
            RuntimeConfig::default(),
            builtins.into_iter().collect(),
        )
    }

    pub fn with_config_and_builtins<S: Into<String>>(
        platform: impl Platform + 'static,
        config: RuntimeConfig,
        builtins: impl IntoIterator<Item = (S, Value)>,
    ) -> Self {
        Runtime::build(platform, config, builtins.into_iter().collect())
    }

    fn build(platform: impl Platform + 'static, config: RuntimeConfig, base: Environment) -> Self {
        let mut store = Store::new();
        let base = store.alloc(base);
        let global = store.alloc(Environment::with_parent(base));

        Runtime {
            store,
            stack: Stack::new(global, config.max_call_depth),
            base,
            platform: Box::new(platform),
            config,
        }
    }

    /// Runs a program in the global frame.
    ///
    /// Yields the value of a top-level `return` if one ran, otherwise the
    /// value of the last statement.
    pub fn eval(&mut self, ast: &ast::Ast) -> Result<Value> {
        let global = self.global_env();
        let last_value = self.interpret_ast(ast, global)?;

        Ok(self.stack.consume_return_value().unwrap_or(last_value))
    }

    pub fn eval_expr(&mut self, expr: &ast::Expr) -> Result<Value> {
        let global = self.global_env();

        self.visit_expr(expr, global)
    }

    /// Binds `name` in the global frame, replacing any previous global binding.
    pub fn define(&mut self, name: impl Into<String>, value: Value) -> Result<()> {
        let global = self.global_env();

        Ok(self.store.define(global, name, value)?)
    }

    pub fn lookup(&self, name: &str) -> Result<Value> {
        Ok(self.store.lookup(self.global_env(), name)?)
    }

    pub fn global_env(&self) -> EnvId {
        self.stack.global().get_env()
    }

    pub fn base_env(&self) -> EnvId {
        self.base
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn get_platform(&self) -> &dyn Platform {
        self.platform.as_ref()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Number of invocations currently running.
    pub fn call_depth(&self) -> usize {
        self.stack.depth()
    }

    /// Allocates a parentless frame holding `bindings`, for builtins that
    /// carry state between calls.
    pub fn alloc_context<S: Into<String>>(
        &mut self,
        bindings: impl IntoIterator<Item = (S, Value)>,
    ) -> EnvId {
        self.store.alloc(bindings.into_iter().collect())
    }

    pub fn call_value(&mut self, callee: &Value, args: Vec<Value>) -> Result<Value> {
        match callee {
            Value::Function(func) => self.call_function(func, args),
            other => Err(Box::new(RuntimeError::NotCallable {
                found: other.kind(),
                stacktrace: vec![],
            })),
        }
    }

    pub fn call_function(&mut self, func: &Function, args: Vec<Value>) -> Result<Value> {
        let name = FunctionName::from(func.get_name());

        log::debug!(
            "calling {} (#{}) with {} argument(s) at depth {}",
            name,
            func.id,
            args.len(),
            self.stack.depth()
        );

        self.store.open_scope();

        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || {
            self.invoke(func, args)
        });

        let kept = match &result {
            Ok(value) => value.clone(),
            Err(_) => Value::Undefined,
        };
        let released = self.store.close_scope(&kept);

        if released > 0 {
            log::trace!("released {} frame(s) after {}", released, name);
        }

        result.map_err(|mut err| {
            err.get_mut_stacktrace().push(StackFrame::new(name));
            err
        })
    }

    /// Frees every frame no longer reachable from the base and global frames
    /// or from `roots`. Does nothing while a call is running.
    pub fn collect_garbage(&mut self, roots: &[&Value]) -> usize {
        if !self.stack.is_empty() {
            log::warn!(
                "collection skipped with {} call(s) in progress",
                self.stack.depth()
            );
            return 0;
        }

        let envs: Vec<EnvId> = std::iter::once(self.base)
            .chain(self.stack.envs())
            .collect();

        let freed = self.store.collect(envs, roots.iter().copied());

        log::debug!("freed {} frame(s), {} still live", freed, self.store.len());

        freed
    }
}

impl Runtime {
    fn invoke(&mut self, func: &Function, args: Vec<Value>) -> Result<Value> {
        match &func.object {
            FunctionObject::Builtin { env, func_ptr, .. } => {
                let context = *env;

                self.push_frame(Frame::new(context.unwrap_or(self.base)))?;
                let result = func_ptr(args, self, context);
                self.stack.pop();

                result
            }
            FunctionObject::Arrow { params, body, env } => {
                self.check_arity(params, args.len())?;

                let call_env = self.store.child(*env)?;
                self.bind_params(params, call_env, args)?;

                self.run_body(body, call_env)
            }
            FunctionObject::Classic {
                name,
                params,
                body,
                env,
            } => {
                self.check_arity(params, args.len())?;

                // The own name sits between the captured frame and the call
                // frame, so the body may shadow it.
                let scope = match name {
                    Some(name) => {
                        let own = self.store.child(*env)?;
                        self.store
                            .define(own, name.clone(), Value::Function(func.clone()))?;
                        own
                    }
                    None => *env,
                };

                let call_env = self.store.child(scope)?;

                self.store
                    .define(call_env, ARGUMENTS, Value::new_list(args.clone()))?;
                self.bind_params(params, call_env, args)?;

                self.run_body(body, call_env)
            }
        }
    }

    fn check_arity(&self, params: &Params, found: usize) -> Result<()> {
        if self.config.arity == ArityMode::Strict
            && !params.is_variadic()
            && params.arity() != found
        {
            return Err(Box::new(RuntimeError::WrongNumberOfArguments {
                expected: params.arity(),
                found,
                stacktrace: vec![],
            }));
        }

        Ok(())
    }

    fn bind_params(&mut self, params: &Params, env: EnvId, args: Vec<Value>) -> Result<()> {
        let mut args = args.into_iter();

        for name in &params.names {
            let value = args.next().unwrap_or(Value::Undefined);
            self.store.define(env, name.clone(), value)?;
        }

        if let Some(rest) = &params.rest {
            self.store
                .define(env, rest.clone(), Value::new_list(args.collect()))?;
        }

        Ok(())
    }

    fn run_body(&mut self, body: &FunctionBody, env: EnvId) -> Result<Value> {
        self.push_frame(Frame::new(env))?;

        let result = match body {
            FunctionBody::Expr(expr) => self.visit_expr(expr, env),
            FunctionBody::Block(block) => match self.interpret_ast(block, env) {
                Ok(_) => Ok(self
                    .stack
                    .consume_return_value()
                    .unwrap_or(Value::Undefined)),
                Err(err) => Err(err),
            },
        };

        self.stack.pop();

        result
    }

    fn push_frame(&mut self, frame: Frame) -> Result<()> {
        self.stack.push(frame).map_err(|err| match err {
            StackError::Overflow(depth) => Box::new(RuntimeError::StackOverflow {
                depth,
                stacktrace: vec![],
            }),
        })
    }
}

impl Runtime {
    fn interpret_ast(&mut self, ast: &ast::Ast, env: EnvId) -> Result<Value> {
        self.hoist_declarations(ast, env)?;

        let mut last_value = Value::Undefined;

        for stmt in ast {
            last_value = self.interpret_stmt(stmt, env)?;

            if self.stack.has_return_value() {
                break;
            }
        }

        Ok(last_value)
    }

    fn hoist_declarations(&mut self, ast: &ast::Ast, env: EnvId) -> Result<()> {
        for decl in hoisted_declarations(ast) {
            let func = declared_function(decl, env);

            self.store
                .define(env, decl.name.clone(), Value::Function(func))?;
        }

        Ok(())
    }

    fn interpret_stmt(&mut self, stmt: &ast::Stmt, env: EnvId) -> Result<Value> {
        match stmt {
            ast::Stmt::Expr(expr) => self.visit_expr(expr, env),
            ast::Stmt::Decl(decl) => self.visit_decl(decl, env),
            ast::Stmt::Cond(cond) => self.visit_cond(cond, env),
            ast::Stmt::Block(block) => self.visit_block(block, env),
            ast::Stmt::Return(value) => self.visit_return(value, env),
        }
    }

    fn visit_decl(&mut self, decl: &ast::Decl, env: EnvId) -> Result<Value> {
        match decl {
            ast::Decl::Local(local) => self.visit_local(local, env)?,
            // Bound when the enclosing scope was entered.
            ast::Decl::Function(_) => {}
        };

        Ok(Value::Undefined)
    }

    fn visit_local(&mut self, local: &ast::LocalDecl, env: EnvId) -> Result<()> {
        let ast::LocalDecl { name, value } = local;

        if self.store.has_local(env, name)? {
            return Err(Box::new(RuntimeError::AlreadyDeclared {
                name: name.clone(),
                stacktrace: vec![],
            }));
        }

        let value = match self.visit_expr(value, env)? {
            Value::Function(func) if func.get_name().is_none() => {
                Value::Function(func.named(name.clone()))
            }
            value => value,
        };

        self.store.define(env, name.clone(), value)?;

        Ok(())
    }

    fn visit_cond(&mut self, cond: &ast::Cond, env: EnvId) -> Result<Value> {
        let ast::Cond {
            cond,
            then,
            or_else,
        } = cond;

        if self.visit_expr(cond, env)?.to_bool() {
            self.visit_branch(then, env)?;
        } else if let Some(or_else) = or_else {
            self.visit_branch(or_else, env)?;
        }

        Ok(Value::Undefined)
    }

    /// A function declaration standing alone as a branch is not hoisted. It is
    /// bound in the enclosing frame when its branch runs.
    fn visit_branch(&mut self, branch: &ast::Stmt, env: EnvId) -> Result<Value> {
        let ast::Stmt::Decl(ast::Decl::Function(decl)) = branch else {
            return self.interpret_stmt(branch, env);
        };

        if self.store.has_local(env, &decl.name)? {
            return Err(Box::new(RuntimeError::AlreadyDeclared {
                name: decl.name.clone(),
                stacktrace: vec![],
            }));
        }

        let func = declared_function(decl, env);
        self.store
            .define(env, decl.name.clone(), Value::Function(func))?;

        Ok(Value::Undefined)
    }

    fn visit_block(&mut self, block: &ast::Block, env: EnvId) -> Result<Value> {
        let scope = self.store.child(env)?;

        self.interpret_ast(block, scope)?;

        Ok(Value::Undefined)
    }

    fn visit_return(&mut self, value: &ast::Return, env: EnvId) -> Result<Value> {
        let value = match value {
            Some(expr) => self.visit_expr(expr, env)?,
            None => Value::Undefined,
        };

        self.stack.set_return_value(value);

        Ok(Value::Undefined)
    }
}

impl Runtime {
    fn visit_expr(&mut self, expr: &ast::Expr, env: EnvId) -> Result<Value> {
        match expr {
            ast::Expr::Binary { lhs, op, rhs } => self.visit_binary(lhs, *op, rhs, env),
            ast::Expr::Unary { op, rhs } => self.visit_unary(*op, rhs, env),
            ast::Expr::Call { callee, args } => self.visit_call(callee, args, env),
            ast::Expr::Grouping { expr } => self.visit_expr(expr, env),
            ast::Expr::Sequence { exprs } => self.visit_sequence(exprs, env),
            ast::Expr::List { elements } => self.visit_list(elements, env),
            ast::Expr::Index { target, index } => self.visit_index(target, index, env),
            ast::Expr::Literal { value } => Ok(Value::from(value.clone())),
            ast::Expr::Variable { name } => Ok(self.store.lookup(env, name)?),
            ast::Expr::Function(function) => Ok(self.visit_function_expr(function, env)),
        }
    }

    fn visit_binary(
        &mut self,
        lhs: &ast::Expr,
        op: ast::BinaryOp,
        rhs: &ast::Expr,
        env: EnvId,
    ) -> Result<Value> {
        use ast::BinaryOp::*;

        let lhs = self.visit_expr(lhs, env)?;

        match op {
            LogicalAnd if !lhs.to_bool() => return Ok(lhs),
            LogicalOr if lhs.to_bool() => return Ok(lhs),
            _ => {}
        }

        let rhs = self.visit_expr(rhs, env)?;

        apply_binary(op, lhs, rhs)
    }

    fn visit_unary(&mut self, op: ast::UnaryOp, rhs: &ast::Expr, env: EnvId) -> Result<Value> {
        use ast::UnaryOp::*;

        let rhs = self.visit_expr(rhs, env)?;

        match op {
            Negative => match rhs {
                Value::Number(value) => Ok(Value::Number(-value)),
                other => Err(Box::new(RuntimeError::UnexpectedType {
                    expected: ValueType::Number,
                    found: other.kind(),
                    message: Some(format!("cannot negate {}", escape_value(&other))),
                    stacktrace: vec![],
                })),
            },
            LogicalNot => Ok(Value::Boolean(!rhs.to_bool())),
            Void => Ok(Value::Undefined),
        }
    }

    fn visit_call(&mut self, callee: &ast::Expr, args: &[ast::Expr], env: EnvId) -> Result<Value> {
        let callee = self.visit_expr(callee, env)?;

        let args = args
            .iter()
            .map(|arg| self.visit_expr(arg, env))
            .collect::<Result<Vec<_>>>()?;

        self.call_value(&callee, args)
    }

    fn visit_sequence(&mut self, exprs: &[ast::Expr], env: EnvId) -> Result<Value> {
        let mut last_value = Value::Undefined;

        for expr in exprs {
            last_value = self.visit_expr(expr, env)?;
        }

        Ok(last_value)
    }

    fn visit_list(&mut self, elements: &[ast::Expr], env: EnvId) -> Result<Value> {
        let values = elements
            .iter()
            .map(|element| self.visit_expr(element, env))
            .collect::<Result<Vec<_>>>()?;

        Ok(Value::new_list(values))
    }

    fn visit_index(&mut self, target: &ast::Expr, index: &ast::Expr, env: EnvId) -> Result<Value> {
        let target = self.visit_expr(target, env)?;
        let index = self.visit_expr(index, env)?;

        let position = match index {
            Value::Number(n) if n.is_finite() && n >= 0.0 && n.fract() == 0.0 => n as usize,
            Value::Number(n) => {
                return Err(Box::new(RuntimeError::InvalidIndex {
                    index: n,
                    stacktrace: vec![],
                }))
            }
            other => {
                return Err(Box::new(RuntimeError::UnexpectedType {
                    expected: ValueType::Number,
                    found: other.kind(),
                    message: Some("index must be a number".to_string()),
                    stacktrace: vec![],
                }))
            }
        };

        match target {
            Value::List(values) => Ok(values.get(position).cloned().unwrap_or(Value::Undefined)),
            Value::String(value) => Ok(value
                .chars()
                .nth(position)
                .map(|c| Value::String(c.to_string()))
                .unwrap_or(Value::Undefined)),
            other => Err(Box::new(RuntimeError::UnexpectedType {
                expected: ValueType::List,
                found: other.kind(),
                message: Some("only lists and strings can be indexed".to_string()),
                stacktrace: vec![],
            })),
        }
    }

    fn visit_function_expr(&mut self, function: &ast::FunctionExpr, env: EnvId) -> Value {
        let ast::FunctionExpr {
            kind,
            name,
            params,
            body,
        } = function;

        let func = match kind {
            FunctionKind::Arrow => Function::arrow(params.clone(), body.clone(), env),
            FunctionKind::Classic => {
                Function::classic(name.clone(), params.clone(), body.clone(), env)
            }
        };

        Value::Function(func)
    }
}

fn declared_function(decl: &ast::FunctionDecl, env: EnvId) -> Function {
    Function::classic(
        Some(decl.name.clone()),
        decl.params.clone(),
        decl.body.clone(),
        env,
    )
}

fn apply_binary(op: ast::BinaryOp, lhs: Value, rhs: Value) -> Result<Value> {
    use ast::BinaryOp::*;

    let value = match op {
        Add => match (lhs, rhs) {
            (Value::Number(lhs), Value::Number(rhs)) => Value::Number(lhs + rhs),
            (Value::String(lhs), rhs) => Value::String(format!("{}{}", lhs, rhs)),
            (lhs, Value::String(rhs)) => Value::String(format!("{}{}", lhs, rhs)),
            (lhs, rhs) => return Err(type_mismatch(op, &lhs, &rhs)),
        },
        Subtract | Multiply | Divide | Modulo => match (&lhs, &rhs) {
            (Value::Number(l), Value::Number(r)) => Value::Number(match op {
                Subtract => l - r,
                Multiply => l * r,
                Divide => l / r,
                _ => l % r,
            }),
            _ => return Err(type_mismatch(op, &lhs, &rhs)),
        },
        StrictEquality => Value::Boolean(lhs == rhs),
        StrictInequality => Value::Boolean(lhs != rhs),
        Equality => Value::Boolean(lhs.loosely_equals(&rhs)),
        Inequality => Value::Boolean(!lhs.loosely_equals(&rhs)),
        Greater | GreaterOrEqual | Less | LessOrEqual => {
            Value::Boolean(compare(op, &lhs, &rhs)?)
        }
        LogicalAnd => match lhs.to_bool() {
            true => rhs,
            false => lhs,
        },
        LogicalOr => match lhs.to_bool() {
            true => lhs,
            false => rhs,
        },
    };

    Ok(value)
}

fn compare(op: ast::BinaryOp, lhs: &Value, rhs: &Value) -> Result<bool> {
    use ast::BinaryOp::*;

    let ordering = match (lhs, rhs) {
        (Value::Number(l), Value::Number(r)) => l.partial_cmp(r),
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        _ => return Err(type_mismatch(op, lhs, rhs)),
    };

    // NaN compares false against everything.
    let Some(ordering) = ordering else {
        return Ok(false);
    };

    Ok(match op {
        Greater => ordering.is_gt(),
        GreaterOrEqual => ordering.is_ge(),
        Less => ordering.is_lt(),
        _ => ordering.is_le(),
    })
}

fn type_mismatch(op: ast::BinaryOp, lhs: &Value, rhs: &Value) -> Box<RuntimeError> {
    Box::new(RuntimeError::TypeMismatch {
        first: lhs.kind(),
        second: rhs.kind(),
        message: Some(format!(
            "cannot apply '{}' to {} and {}",
            op,
            escape_value(lhs),
            escape_value(rhs)
        )),
        stacktrace: vec![],
    })
}
