mod config;
mod environment;
mod frame;
mod function;
mod platform;
mod runtime;
mod runtime_error;
mod stack;
mod store;
mod value;

pub use config::*;
pub use environment::*;
pub use frame::*;
pub use function::*;
pub use platform::*;
pub use runtime::*;
pub use runtime_error::*;
pub use stack::*;
pub use store::*;
pub use value::*;

pub use kestrel_syntax::ast::Params;
