use crate::ast::{Ast, Decl, FunctionDecl, Stmt};

/// Function declarations that belong to the scope `ast` opens.
///
/// Only direct statements are considered: declarations nested in inner blocks
/// are hoisted when that block's own scope is entered.
pub fn hoisted_declarations(ast: &Ast) -> Vec<&FunctionDecl> {
    ast.iter()
        .filter_map(|stmt| match stmt {
            Stmt::Decl(Decl::Function(decl)) => Some(decl),
            _ => None,
        })
        .collect()
}
