use std::collections::HashMap;

use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{FunctionDecl, Item, NodeId, Program, VarDecl},
        expressions::{BinaryExpr, BinaryOperator, CallExpr, Expr},
        statements::{Block, ForInit, Stmt},
        types::Type,
    },
    errors::errors::TypeError,
    resolver::{scope::FrameKind, Resolution},
    Position,
};

/// Type of every expression in a checked program, keyed by node id.
pub type TypeTable = HashMap<NodeId, Type>;

pub struct TypeChecker<'a> {
    pub resolution: &'a Resolution,
    pub types: TypeTable,
    /// Function whose body is being checked; `None` at top level.
    pub current_function: Option<&'a FunctionDecl>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(resolution: &'a Resolution) -> Self {
        TypeChecker {
            resolution,
            types: HashMap::new(),
            current_function: None,
        }
    }

    /// Type a `return` must produce here. Top level code returns nothing.
    pub fn expected_return_type(&self) -> Type {
        self.current_function
            .map(|function| function.return_type)
            .unwrap_or(Type::Void)
    }
}

/// Fails when an operand or argument produces no value.
fn expect_value(ty: Type, position: Position) -> Result<Type, TypeError> {
    if ty == Type::Void {
        Err(TypeError::EmptyExpression { position })
    } else {
        Ok(ty)
    }
}

fn type_check_binary(type_checker: &mut TypeChecker, binary: &BinaryExpr) -> Result<Type, TypeError> {
    let left = type_check_expr(type_checker, &binary.left)?;
    let left = expect_value(left, binary.left.position())?;
    let right = type_check_expr(type_checker, &binary.right)?;
    let right = expect_value(right, binary.right.position())?;
    let position = binary.span.start;

    match binary.operator {
        BinaryOperator::Assign => {
            if left != right {
                return Err(TypeError::ExpressionTypeMismatch {
                    expected: left,
                    found: right,
                    position: binary.right.position(),
                });
            }
            Ok(left)
        }
        operator if operator.is_logical() => {
            if left != Type::Bool || right != Type::Bool {
                return Err(TypeError::BooleanOperatorOnNonBoolean {
                    operator,
                    left,
                    right,
                    position,
                });
            }
            Ok(Type::Bool)
        }
        BinaryOperator::Power => {
            if !left.is_numeric() || !right.is_numeric() {
                return Err(TypeError::NonNumericExponentOperand {
                    left,
                    right,
                    position,
                });
            }
            Ok(left)
        }
        operator if operator.is_arithmetic() => {
            if !left.is_numeric() || !right.is_numeric() {
                return Err(TypeError::ArithmeticOnNonNumeric {
                    operator,
                    left,
                    right,
                    position,
                });
            }
            Ok(left)
        }
        // Comparison, equality, modulo, bitwise and shift operators have no
        // rule of their own yet and keep the left operand's type.
        _ => Ok(left),
    }
}

fn type_check_call(type_checker: &mut TypeChecker, call: &CallExpr) -> Result<Type, TypeError> {
    let not_callable = TypeError::NotCallable {
        position: call.callee.position(),
    };
    let Expr::Identifier(callee) = call.callee.as_ref() else {
        return Err(not_callable);
    };
    let resolution = type_checker.resolution;
    let function = match resolution.reference(callee.id) {
        Some(symbol) if symbol.is_function() => symbol,
        _ => return Err(not_callable),
    };
    type_checker.types.insert(callee.id, function.declared_type);

    if call.arguments.len() != function.parameters.len() {
        return Err(TypeError::ParamCountMismatch {
            function: function.name.clone(),
            expected: function.parameters.len(),
            found: call.arguments.len(),
            position: call.span.start,
        });
    }

    for (argument, parameter) in call.arguments.iter().zip(&function.parameters) {
        let ty = type_check_expr(type_checker, argument)?;
        let ty = expect_value(ty, argument.position())?;
        if ty != parameter.ty {
            return Err(TypeError::ParamTypeMismatch {
                function: function.name.clone(),
                parameter: parameter.name.clone(),
                expected: parameter.ty,
                found: ty,
                position: argument.position(),
            });
        }
    }

    Ok(function.declared_type)
}

/// Derives the type of `expr` and records it in the type table.
pub fn type_check_expr(type_checker: &mut TypeChecker, expr: &Expr) -> Result<Type, TypeError> {
    let ty = match expr {
        Expr::Literal(literal) => literal.ty,
        Expr::Identifier(identifier) => match type_checker.resolution.reference(identifier.id) {
            Some(symbol) => symbol.declared_type,
            None => {
                return Err(TypeError::UnresolvedIdentifier {
                    name: identifier.name.clone(),
                    position: identifier.span.start,
                })
            }
        },
        Expr::Unary(unary) => {
            let operand = type_check_expr(type_checker, &unary.operand)?;
            expect_value(operand, unary.operand.position())?
        }
        Expr::Binary(binary) => type_check_binary(type_checker, binary)?,
        Expr::Call(call) => type_check_call(type_checker, call)?,
    };

    trace!(id = %expr.id(), %ty, "typed expression");
    type_checker.types.insert(expr.id(), ty);
    Ok(ty)
}

fn type_check_var_decl(type_checker: &mut TypeChecker, decl: &VarDecl) -> Result<(), TypeError> {
    if decl.ty == Type::Void {
        return Err(TypeError::ErroneousVarDecl {
            name: decl.name.clone(),
            position: decl.span.start,
        });
    }

    if let Some(initializer) = &decl.initializer {
        let ty = type_check_expr(type_checker, initializer)?;
        if ty != decl.ty {
            return Err(TypeError::ExpressionTypeMismatch {
                expected: decl.ty,
                found: ty,
                position: initializer.position(),
            });
        }
    }

    Ok(())
}

fn type_check_block(type_checker: &mut TypeChecker, block: &Block) -> Result<(), TypeError> {
    for stmt in block.iter() {
        type_check_stmt(type_checker, stmt)?;
    }
    Ok(())
}

pub fn type_check_stmt(type_checker: &mut TypeChecker, stmt: &Stmt) -> Result<(), TypeError> {
    match stmt {
        Stmt::VarDecl(decl) => type_check_var_decl(type_checker, decl),
        Stmt::Expression(stmt) => type_check_expr(type_checker, &stmt.expression).map(|_| ()),
        Stmt::Return(stmt) => {
            let expected = type_checker.expected_return_type();
            let found = match &stmt.value {
                Some(value) => type_check_expr(type_checker, value)?,
                None => Type::Void,
            };

            if found != expected {
                return Err(TypeError::ErroneousReturnType {
                    expected,
                    found,
                    position: stmt.span.start,
                });
            }
            Ok(())
        }
        Stmt::If(stmt) => {
            let condition = type_check_expr(type_checker, &stmt.condition)?;
            if condition != Type::Bool {
                return Err(TypeError::ExpectedBooleanExpression {
                    found: condition,
                    position: stmt.condition.position(),
                });
            }

            type_check_block(type_checker, &stmt.then_branch)?;
            if let Some(else_branch) = &stmt.else_branch {
                type_check_block(type_checker, else_branch)?;
            }
            Ok(())
        }
        Stmt::For(stmt) => {
            match &stmt.init {
                Some(ForInit::VarDecl(decl)) => type_check_var_decl(type_checker, decl)?,
                Some(ForInit::Expression(expr)) => {
                    type_check_expr(type_checker, expr)?;
                }
                None => {}
            }

            if let Some(condition) = &stmt.condition {
                let ty = type_check_expr(type_checker, condition)?;
                if ty != Type::Bool {
                    return Err(TypeError::NonBooleanLoopCondition {
                        found: ty,
                        position: condition.position(),
                    });
                }
            }

            if let Some(update) = &stmt.update {
                type_check_expr(type_checker, update)?;
            }

            type_check_block(type_checker, &stmt.body)
        }
        Stmt::Break(stmt) => {
            let scopes = &type_checker.resolution.scopes;
            let in_loop = type_checker
                .resolution
                .break_frames
                .get(&stmt.id)
                .and_then(|frame| scopes.enclosing(*frame, FrameKind::Loop))
                .is_some();

            if in_loop {
                Ok(())
            } else {
                Err(TypeError::ErroneousBreak {
                    position: stmt.span.start,
                })
            }
        }
        Stmt::Block(block) => type_check_block(type_checker, block),
    }
}

/// Checks parameters and body of `function`.
///
/// A non-void function needs a `return` directly in its body; returns nested
/// in branches or blocks do not count.
fn type_check_function<'a>(
    type_checker: &mut TypeChecker<'a>,
    function: &'a FunctionDecl,
) -> Result<(), TypeError> {
    for parameter in &function.parameters {
        if parameter.ty == Type::Void {
            return Err(TypeError::ErroneousVarDecl {
                name: parameter.name.clone(),
                position: parameter.span.start,
            });
        }
    }

    type_checker.current_function = Some(function);
    for stmt in &function.body {
        type_check_stmt(type_checker, stmt)?;
    }
    type_checker.current_function = None;

    let has_return = function
        .body
        .iter()
        .any(|stmt| matches!(stmt, Stmt::Return(_)));
    if function.return_type != Type::Void && !has_return {
        return Err(TypeError::MissingReturnStatement {
            function: function.name.clone(),
            expected: function.return_type,
            position: function.span.start,
        });
    }

    debug!(function = %function.name, "type checked function");
    Ok(())
}

/// Types every expression of `program` using the bindings in `resolution`.
///
/// Stops at the first type error.
pub fn type_check(program: &Program, resolution: &Resolution) -> Result<TypeTable, TypeError> {
    let mut type_checker = TypeChecker::new(resolution);

    for item in &program.items {
        match item {
            Item::Function(function) => type_check_function(&mut type_checker, function)?,
            Item::Variable(decl) => type_check_var_decl(&mut type_checker, decl)?,
            Item::Statement(stmt) => type_check_stmt(&mut type_checker, stmt)?,
        }
    }

    Ok(type_checker.types)
}
