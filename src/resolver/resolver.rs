use std::collections::HashMap;

use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{FunctionDecl, Item, NodeId, Program, VarDecl},
        expressions::Expr,
        statements::{Block, ForInit, Stmt},
    },
    errors::errors::{Report, ScopeError, ScopeErrors},
};

use super::scope::{FrameId, FrameKind, ParameterInfo, ScopeTree, Symbol, SymbolId, SymbolKind};

/// Output of a successful resolver pass.
///
/// The type checker reads bindings from here instead of rebuilding scopes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resolution {
    pub scopes: ScopeTree,
    /// Identifier and callee sites to the symbol they name.
    pub references: HashMap<NodeId, SymbolId>,
    /// Function, parameter and variable declarations to the symbol they bind.
    pub declarations: HashMap<NodeId, SymbolId>,
    /// Each `break` to the frame it appears in.
    pub break_frames: HashMap<NodeId, FrameId>,
}

impl Resolution {
    /// Symbol named at the identifier or callee site `id`.
    pub fn reference(&self, id: NodeId) -> Option<&Symbol> {
        self.references.get(&id).map(|symbol| self.scopes.symbol(*symbol))
    }

    /// Symbol bound by the declaration `id`.
    pub fn declaration(&self, id: NodeId) -> Option<&Symbol> {
        self.declarations
            .get(&id)
            .map(|symbol| self.scopes.symbol(*symbol))
    }

    /// Global binding of `name`, if any.
    pub fn global(&self, name: &str) -> Option<&Symbol> {
        self.scopes
            .frame(self.scopes.global())
            .get(name)
            .map(|symbol| self.scopes.symbol(symbol))
    }
}

struct Resolver {
    resolution: Resolution,
    errors: Vec<ScopeError>,
}

impl Resolver {
    fn scopes(&mut self) -> &mut ScopeTree {
        &mut self.resolution.scopes
    }

    /// Declares `symbol` in the current frame for the node `id`, recording a
    /// redefinition when the name is taken.
    fn declare(&mut self, id: NodeId, symbol: Symbol) {
        let name = symbol.name.clone();
        let position = symbol.position;
        let kind = symbol.kind;

        match self.scopes().declare(symbol) {
            Ok(symbol_id) => {
                trace!(%name, ?kind, "declared symbol");
                self.resolution.declarations.insert(id, symbol_id);
            }
            Err(_) => {
                let error = if kind == SymbolKind::Function {
                    ScopeError::FunctionPrototypeRedefinition { name, position }
                } else {
                    ScopeError::VariableRedefinition { name, position }
                };
                debug!(%error, "scope error");
                self.errors.push(error);
            }
        }
    }

    fn record(&mut self, error: ScopeError) {
        debug!(%error, "scope error");
        self.errors.push(error);
    }
}

fn function_symbol(function: &FunctionDecl) -> Symbol {
    let parameters = function
        .parameters
        .iter()
        .map(|parameter| ParameterInfo {
            name: parameter.name.clone(),
            ty: parameter.ty,
        })
        .collect();

    Symbol::function(
        &function.name,
        function.return_type,
        parameters,
        function.span.start,
    )
}

fn resolve_function(resolver: &mut Resolver, function: &FunctionDecl) {
    resolver.scopes().push(FrameKind::Function);

    for parameter in &function.parameters {
        resolver.declare(
            parameter.id,
            Symbol::parameter(&parameter.name, parameter.ty, parameter.span.start),
        );
    }

    for stmt in &function.body {
        resolve_stmt(resolver, stmt);
    }

    resolver.scopes().pop();
}

/// The initializer is resolved before the name is bound, so it cannot refer
/// to the variable it initializes.
fn resolve_var_decl(resolver: &mut Resolver, decl: &VarDecl) {
    if let Some(initializer) = &decl.initializer {
        resolve_expr(resolver, initializer);
    }

    resolver.declare(
        decl.id,
        Symbol::variable(&decl.name, decl.ty, decl.span.start),
    );
}

fn resolve_block(resolver: &mut Resolver, block: &Block) {
    resolver.scopes().push(FrameKind::Block);
    for stmt in block.iter() {
        resolve_stmt(resolver, stmt);
    }
    resolver.scopes().pop();
}

fn resolve_stmt(resolver: &mut Resolver, stmt: &Stmt) {
    match stmt {
        Stmt::VarDecl(decl) => resolve_var_decl(resolver, decl),
        Stmt::Expression(stmt) => resolve_expr(resolver, &stmt.expression),
        Stmt::Return(stmt) => {
            if let Some(value) = &stmt.value {
                resolve_expr(resolver, value);
            }
        }
        Stmt::If(stmt) => {
            resolve_expr(resolver, &stmt.condition);
            resolve_block(resolver, &stmt.then_branch);
            if let Some(else_branch) = &stmt.else_branch {
                resolve_block(resolver, else_branch);
            }
        }
        Stmt::For(stmt) => {
            resolver.scopes().push(FrameKind::Loop);

            match &stmt.init {
                Some(ForInit::VarDecl(decl)) => resolve_var_decl(resolver, decl),
                Some(ForInit::Expression(expr)) => resolve_expr(resolver, expr),
                None => {}
            }
            if let Some(condition) = &stmt.condition {
                resolve_expr(resolver, condition);
            }
            if let Some(update) = &stmt.update {
                resolve_expr(resolver, update);
            }
            resolve_block(resolver, &stmt.body);

            resolver.scopes().pop();
        }
        Stmt::Break(stmt) => {
            let frame = resolver.resolution.scopes.current();
            resolver.resolution.break_frames.insert(stmt.id, frame);
        }
        Stmt::Block(block) => resolve_block(resolver, block),
    }
}

fn resolve_expr(resolver: &mut Resolver, expr: &Expr) {
    match expr {
        Expr::Literal(_) => {}
        Expr::Identifier(identifier) => match resolver.resolution.scopes.lookup(&identifier.name) {
            Some(symbol) => {
                resolver.resolution.references.insert(identifier.id, symbol);
            }
            None => resolver.record(ScopeError::UndeclaredVariableAccessed {
                name: identifier.name.clone(),
                position: identifier.span.start,
            }),
        },
        Expr::Binary(binary) => {
            resolve_expr(resolver, &binary.left);
            resolve_expr(resolver, &binary.right);
        }
        Expr::Unary(unary) => resolve_expr(resolver, &unary.operand),
        Expr::Call(call) => {
            match call.callee.as_ref() {
                Expr::Identifier(callee) => {
                    let scopes = &resolver.resolution.scopes;
                    let function = scopes
                        .lookup(&callee.name)
                        .filter(|symbol| scopes.symbol(*symbol).is_function());

                    match function {
                        Some(symbol) => {
                            resolver.resolution.references.insert(callee.id, symbol);
                        }
                        None => resolver.record(ScopeError::UndefinedFunctionCalled {
                            name: callee.name.clone(),
                            position: callee.span.start,
                        }),
                    }
                }
                other => resolve_expr(resolver, other),
            }

            for argument in &call.arguments {
                resolve_expr(resolver, argument);
            }
        }
    }
}

/// Binds every name in `program`.
///
/// Functions are registered in the global frame first, so they can be called
/// before their declaration. Then every item is walked in source order. All
/// binding errors are collected, ordered by position, and any error fails the
/// whole pass.
pub fn resolve(program: &Program) -> Result<Resolution, ScopeErrors> {
    let mut resolver = Resolver {
        resolution: Resolution::default(),
        errors: vec![],
    };

    for function in program.functions() {
        resolver.declare(function.id, function_symbol(function));
    }

    for item in &program.items {
        match item {
            Item::Function(function) => resolve_function(&mut resolver, function),
            Item::Variable(decl) => resolve_var_decl(&mut resolver, decl),
            Item::Statement(stmt) => resolve_stmt(&mut resolver, stmt),
        }
    }

    if resolver.errors.is_empty() {
        return Ok(resolver.resolution);
    }

    // Prototype redefinitions are found in the first pass.
    resolver.errors.sort_by_key(|error| {
        let position = error.get_position();
        (position.line, position.column)
    });
    Err(ScopeErrors(resolver.errors))
}
