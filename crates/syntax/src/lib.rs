pub mod ast;
pub mod build;
mod closures;
mod hoist;

pub use closures::*;
pub use hoist::*;
