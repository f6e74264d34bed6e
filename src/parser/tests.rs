//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Variable and function declarations
//! - Operator precedence and associativity
//! - Control flow statements
//! - Optional statement terminators
//! - Syntax errors

use std::collections::HashSet;

use super::parser::parse;
use crate::ast::ast::{Item, NodeId, Program};
use crate::ast::expressions::{Expr, LiteralValue};
use crate::ast::statements::{ForInit, Stmt};
use crate::ast::types::Type;
use crate::errors::errors::ParseError;
use crate::lexer::{tokenize, tokens::TokenKind, LexerKind};
use crate::{Position, Span};

fn parse_source(source: &str) -> Result<Program, ParseError> {
    let tokens = tokenize(source, LexerKind::Scanner).unwrap();
    parse(tokens)
}

/// Renders an expression as an s-expression so tests can check grouping.
fn sexpr(expr: &Expr) -> String {
    match expr {
        Expr::Binary(binary) => format!(
            "({} {} {})",
            binary.operator,
            sexpr(&binary.left),
            sexpr(&binary.right)
        ),
        Expr::Unary(unary) => format!("({} {})", unary.operator, sexpr(&unary.operand)),
        Expr::Literal(literal) => match &literal.value {
            LiteralValue::Int(value) => value.to_string(),
            LiteralValue::Float(value) => value.to_string(),
            LiteralValue::Bool(value) => value.to_string(),
            LiteralValue::String(value) => format!("{:?}", value),
        },
        Expr::Identifier(identifier) => identifier.name.clone(),
        Expr::Call(call) => {
            let mut out = format!("(call {}", sexpr(&call.callee));
            for argument in &call.arguments {
                out.push(' ');
                out.push_str(&sexpr(argument));
            }
            out.push(')');
            out
        }
    }
}

fn parse_expression(source: &str) -> String {
    let program = parse_source(source).unwrap();
    match &program.items[0] {
        Item::Statement(Stmt::Expression(stmt)) => sexpr(&stmt.expression),
        other => panic!("Expected expression statement, got {:?}", other),
    }
}

fn function_body(program: &Program) -> &[Stmt] {
    match &program.items[0] {
        Item::Function(function) => &function.body,
        other => panic!("Expected function, got {:?}", other),
    }
}

#[test]
fn test_parse_variable_declaration() {
    let program = parse_source("int x = 42;").unwrap();

    match &program.items[0] {
        Item::Variable(decl) => {
            assert_eq!(decl.name, "x");
            assert_eq!(decl.ty, Type::Int);
            assert!(decl.initializer.is_some());
        }
        other => panic!("Expected variable, got {:?}", other),
    }
}

#[test]
fn test_parse_declaration_without_initializer() {
    let program = parse_source("string name.").unwrap();

    match &program.items[0] {
        Item::Variable(decl) => {
            assert_eq!(decl.ty, Type::String);
            assert!(decl.initializer.is_none());
        }
        other => panic!("Expected variable, got {:?}", other),
    }
}

#[test]
fn test_parse_function_declaration() {
    let program = parse_source("function int add(int a, int b) { return a + b }").unwrap();

    match &program.items[0] {
        Item::Function(function) => {
            assert_eq!(function.name, "add");
            assert_eq!(function.return_type, Type::Int);
            let params: Vec<(&str, Type)> = function
                .parameters
                .iter()
                .map(|p| (p.name.as_str(), p.ty))
                .collect();
            assert_eq!(params, vec![("a", Type::Int), ("b", Type::Int)]);
            assert_eq!(function.body.len(), 1);
        }
        other => panic!("Expected function, got {:?}", other),
    }
}

#[test]
fn test_parse_function_without_keyword() {
    let with_keyword = parse_source("fn void greet() { }").unwrap();
    let without_keyword = parse_source("void greet() { }").unwrap();

    assert!(matches!(&with_keyword.items[0], Item::Function(f) if f.name == "greet"));
    assert!(matches!(&without_keyword.items[0], Item::Function(f) if f.name == "greet"));
}

#[test]
fn test_parse_items_keep_source_order() {
    let program = parse_source("int x = 5. x = x + 1. int f() { return x }").unwrap();

    assert_eq!(program.items.len(), 3);
    assert!(matches!(program.items[0], Item::Variable(_)));
    assert!(matches!(program.items[1], Item::Statement(Stmt::Expression(_))));
    assert!(matches!(program.items[2], Item::Function(_)));
}

#[test]
fn test_return_terminators_parse_identically() {
    let period = parse_source("int f() { return x. }").unwrap();
    let semicolon = parse_source("int f() { return x; }").unwrap();
    let brace = parse_source("int f() { return x }").unwrap();

    assert_eq!(function_body(&period), function_body(&semicolon));
    assert_eq!(function_body(&period), function_body(&brace));
    assert!(matches!(&function_body(&brace)[0], Stmt::Return(ret) if ret.value.is_some()));
}

#[test]
fn test_declaration_terminators_parse_identically() {
    let period = parse_source("int x = 1.").unwrap();
    let semicolon = parse_source("int x = 1;").unwrap();
    let none = parse_source("int x = 1").unwrap();

    assert_eq!(period.items, semicolon.items);
    assert_eq!(period.items, none.items);
}

#[test]
fn test_bare_return() {
    let program = parse_source("void f() { return }").unwrap();
    assert!(matches!(&function_body(&program)[0], Stmt::Return(ret) if ret.value.is_none()));

    let program = parse_source("void f() { return; }").unwrap();
    assert!(matches!(&function_body(&program)[0], Stmt::Return(ret) if ret.value.is_none()));
}

#[test]
fn test_arithmetic_precedence() {
    assert_eq!(parse_expression("1 + 2 * 3"), "(+ 1 (* 2 3))");
    assert_eq!(parse_expression("(1 + 2) * 3"), "(* (+ 1 2) 3)");
    assert_eq!(parse_expression("1 - 2 - 3"), "(- (- 1 2) 3)");
    assert_eq!(parse_expression("8 / 4 % 3"), "(% (/ 8 4) 3)");
}

#[test]
fn test_logical_and_comparison_precedence() {
    assert_eq!(parse_expression("a || b && c"), "(|| a (&& b c))");
    assert_eq!(parse_expression("a == b < c"), "(== a (< b c))");
    assert_eq!(parse_expression("a < b + 1"), "(< a (+ b 1))");
    assert_eq!(parse_expression("a && b == c"), "(&& a (== b c))");
}

#[test]
fn test_bitwise_and_shift_precedence() {
    assert_eq!(parse_expression("1 | 2 ^ 3 & 4"), "(| 1 (^ 2 (& 3 4)))");
    assert_eq!(parse_expression("1 << 2 + 3"), "(<< 1 (+ 2 3))");
    assert_eq!(parse_expression("a < 1 << 2"), "(< a (<< 1 2))");
}

#[test]
fn test_right_associative_operators() {
    assert_eq!(parse_expression("a = b = c"), "(= a (= b c))");
    assert_eq!(parse_expression("a = b || c"), "(= a (|| b c))");
    assert_eq!(parse_expression("2 ** 3 ** 2"), "(** 2 (** 3 2))");
    assert_eq!(parse_expression("2 ** 3 * 4"), "(* (** 2 3) 4)");
}

#[test]
fn test_prefix_operators() {
    assert_eq!(parse_expression("-a * b"), "(* (- a) b)");
    assert_eq!(parse_expression("a - -b"), "(- a (- b))");
    assert_eq!(parse_expression("!a && b"), "(&& (! a) b)");
    assert_eq!(parse_expression("!!a"), "(! (! a))");
}

#[test]
fn test_call_expressions() {
    assert_eq!(parse_expression("f()"), "(call f)");
    assert_eq!(parse_expression("f(1, x + 2)"), "(call f 1 (+ x 2))");
    assert_eq!(parse_expression("f(1)(2)"), "(call (call f 1) 2)");
    assert_eq!(parse_expression("-f(x)"), "(- (call f x))");
}

#[test]
fn test_literals_store_their_type() {
    let program = parse_source("2.5").unwrap();

    match &program.items[0] {
        Item::Statement(Stmt::Expression(stmt)) => match &stmt.expression {
            Expr::Literal(literal) => {
                assert_eq!(literal.ty, Type::Float);
                assert_eq!(literal.value, LiteralValue::Float(2.5));
            }
            other => panic!("Expected literal, got {:?}", other),
        },
        other => panic!("Expected expression statement, got {:?}", other),
    }

    assert_eq!(parse_expression("\"hi\\n\""), "\"hi\\n\"");
    assert_eq!(parse_expression("true && false"), "(&& true false)");
}

#[test]
fn test_parse_if_else_statement() {
    let program = parse_source("if (ready) { x = 1. } else { x = 2. }").unwrap();

    match &program.items[0] {
        Item::Statement(Stmt::If(stmt)) => {
            assert_eq!(sexpr(&stmt.condition), "ready");
            assert_eq!(stmt.then_branch.statements.len(), 1);
            assert_eq!(stmt.else_branch.as_ref().map(|b| b.statements.len()), Some(1));
        }
        other => panic!("Expected if statement, got {:?}", other),
    }
}

#[test]
fn test_parse_for_loop() {
    let program =
        parse_source("for (int i = 0; i < 10; i = i + 1) { if (done) { break } }").unwrap();

    match &program.items[0] {
        Item::Statement(Stmt::For(stmt)) => {
            assert!(matches!(&stmt.init, Some(ForInit::VarDecl(decl)) if decl.name == "i"));
            assert_eq!(stmt.condition.as_ref().map(sexpr), Some("(< i 10)".to_string()));
            assert_eq!(stmt.update.as_ref().map(sexpr), Some("(= i (+ i 1))".to_string()));
            assert_eq!(stmt.body.statements.len(), 1);
        }
        other => panic!("Expected for statement, got {:?}", other),
    }
}

#[test]
fn test_parse_for_loop_with_empty_clauses() {
    let program = parse_source("for (;;) { break. }").unwrap();

    match &program.items[0] {
        Item::Statement(Stmt::For(stmt)) => {
            assert!(stmt.init.is_none());
            assert!(stmt.condition.is_none());
            assert!(stmt.update.is_none());
            assert!(matches!(stmt.body.statements[0], Stmt::Break(_)));
        }
        other => panic!("Expected for statement, got {:?}", other),
    }

    let program = parse_source("for (i = 0; go;) { }").unwrap();
    match &program.items[0] {
        Item::Statement(Stmt::For(stmt)) => {
            assert!(matches!(stmt.init, Some(ForInit::Expression(_))));
            assert!(stmt.condition.is_some());
            assert!(stmt.update.is_none());
        }
        other => panic!("Expected for statement, got {:?}", other),
    }
}

#[test]
fn test_statement_spans_exclude_terminators() {
    let program = parse_source("void f() {\n    return total.\n    break\n    { x; }\n}").unwrap();
    let body = function_body(&program);

    assert_eq!(body[0].span(), Span::new(Position::new(2, 5), Position::new(2, 17)));
    assert_eq!(body[1].span(), Span::new(Position::new(3, 5), Position::new(3, 10)));
    assert_eq!(body[2].span(), Span::new(Position::new(4, 5), Position::new(4, 11)));
}

#[test]
fn test_parse_nested_blocks() {
    let program = parse_source("{ int a = 1. { int b = 2 } }").unwrap();

    match &program.items[0] {
        Item::Statement(Stmt::Block(block)) => {
            assert_eq!(block.statements.len(), 2);
            assert!(matches!(block.statements[1], Stmt::Block(_)));
        }
        other => panic!("Expected block, got {:?}", other),
    }
}

#[test]
fn test_alternate_keywords_parse() {
    let program = parse_source("ginti f() { agar (ok) { wapsi 1 } warna { duhrao (;;) { toro } } wapsi 0 }").unwrap();

    let body = function_body(&program);
    assert!(matches!(&body[0], Stmt::If(stmt) if stmt.else_branch.is_some()));
    assert!(matches!(&body[1], Stmt::Return(_)));
}

fn collect_expr_ids(expr: &Expr, ids: &mut Vec<NodeId>) {
    ids.push(expr.id());
    match expr {
        Expr::Binary(binary) => {
            collect_expr_ids(&binary.left, ids);
            collect_expr_ids(&binary.right, ids);
        }
        Expr::Unary(unary) => collect_expr_ids(&unary.operand, ids),
        Expr::Call(call) => {
            collect_expr_ids(&call.callee, ids);
            for argument in &call.arguments {
                collect_expr_ids(argument, ids);
            }
        }
        Expr::Literal(_) | Expr::Identifier(_) => {}
    }
}

#[test]
fn test_node_ids_are_unique() {
    let program = parse_source("int f(int a) { return a * 2 } int x = f(1) + f(2). x = -x.").unwrap();

    let mut ids = vec![];
    for item in &program.items {
        match item {
            Item::Function(function) => {
                ids.push(function.id);
                ids.extend(function.parameters.iter().map(|p| p.id));
                for stmt in &function.body {
                    if let Stmt::Return(ret) = stmt {
                        collect_expr_ids(ret.value.as_ref().unwrap(), &mut ids);
                    }
                }
            }
            Item::Variable(decl) => {
                ids.push(decl.id);
                collect_expr_ids(decl.initializer.as_ref().unwrap(), &mut ids);
            }
            Item::Statement(Stmt::Expression(stmt)) => collect_expr_ids(&stmt.expression, &mut ids),
            Item::Statement(_) => {}
        }
    }

    let unique: HashSet<NodeId> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());
}

#[test]
fn test_unexpected_end_of_input() {
    assert!(matches!(
        parse_source("int"),
        Err(ParseError::UnexpectedEndOfInput { .. })
    ));
    assert!(matches!(
        parse_source("f(1, 2"),
        Err(ParseError::UnexpectedEndOfInput { .. })
    ));
    assert!(matches!(
        parse_source("{ int x = 1"),
        Err(ParseError::UnexpectedEndOfInput { .. })
    ));
}

#[test]
fn test_expected_specific_token() {
    let result = parse_source("if ready { }");

    match result {
        Err(ParseError::ExpectedSpecificToken {
            expected, found, ..
        }) => {
            assert_eq!(expected, TokenKind::OpenParen);
            assert_eq!(found, TokenKind::Identifier);
        }
        other => panic!("Expected ExpectedSpecificToken, got {:?}", other),
    }
}

#[test]
fn test_expected_type_token() {
    assert!(matches!(
        parse_source("function foo() { }"),
        Err(ParseError::ExpectedTypeToken {
            found: TokenKind::Identifier,
            ..
        })
    ));
    assert!(matches!(
        parse_source("int add(int a, b) { }"),
        Err(ParseError::ExpectedTypeToken { .. })
    ));
}

#[test]
fn test_expected_identifier() {
    assert!(matches!(
        parse_source("int 5"),
        Err(ParseError::ExpectedIdentifier {
            found: TokenKind::IntLit,
            ..
        })
    ));
}

#[test]
fn test_assignment_target_must_be_identifier() {
    assert!(matches!(
        parse_source("1 = 2"),
        Err(ParseError::UnexpectedTokenInExpression {
            found: TokenKind::Assignment,
            ..
        })
    ));
    assert!(matches!(
        parse_source("f() = 2"),
        Err(ParseError::UnexpectedTokenInExpression { .. })
    ));
}

#[test]
fn test_expected_expression() {
    assert!(matches!(
        parse_source("int x = ;"),
        Err(ParseError::ExpectedExpression {
            found: TokenKind::Semicolon,
            ..
        })
    ));
}

#[test]
fn test_invalid_numeric_literal() {
    assert!(matches!(
        parse_source("int x = 99999999999999999999"),
        Err(ParseError::InvalidNumericLiteral { .. })
    ));
}

#[test]
fn test_error_position_points_at_token() {
    let result = parse_source("int x = 1.\nint = 2.");

    match result {
        Err(ParseError::ExpectedIdentifier { position, .. }) => {
            assert_eq!((position.line, position.column), (2, 5));
        }
        other => panic!("Expected ExpectedIdentifier, got {:?}", other),
    }
}

#[test]
fn test_parse_empty_program() {
    let program = parse(vec![]).unwrap();
    assert!(program.items.is_empty());
}
