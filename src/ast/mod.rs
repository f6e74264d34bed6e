/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Program, top level items, declarations and node ids
/// - expressions: Expression nodes and operators
/// - statements: Statement nodes
/// - types: The nominal types of the language
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
