//! Unit tests for the type checker.

use super::{type_check, TypeTable};
use crate::ast::{ast::Item, statements::Stmt, types::Type};
use crate::errors::errors::TypeError;
use crate::lexer::{tokenize, LexerKind};
use crate::parser::parse;
use crate::resolver::{resolve, Resolution};
use crate::ast::ast::Program;

fn check(source: &str) -> (Program, Result<TypeTable, TypeError>) {
    let tokens = tokenize(source, LexerKind::Scanner).unwrap();
    let program = parse(tokens).unwrap();
    let resolution = resolve(&program).unwrap();
    let result = type_check(&program, &resolution);
    (program, result)
}

fn check_error(source: &str) -> TypeError {
    match check(source).1 {
        Ok(_) => panic!("Expected a type error for {:?}", source),
        Err(error) => error,
    }
}

fn check_ok(source: &str) {
    if let Err(error) = check(source).1 {
        panic!("Unexpected type error for {:?}: {}", source, error);
    }
}

/// Type of the last top level expression statement.
fn last_expression_type(source: &str) -> Type {
    let (program, result) = check(source);
    let types = result.unwrap();
    let expression = program
        .items
        .iter()
        .rev()
        .find_map(|item| match item {
            Item::Statement(Stmt::Expression(stmt)) => Some(&stmt.expression),
            _ => None,
        })
        .unwrap();
    types[&expression.id()]
}

const ADD: &str = "function int add(int a, int b) { return a + b }\n";

#[test]
fn test_call_has_return_type() {
    assert_eq!(last_expression_type(&format!("{ADD}add(5, 10).")), Type::Int);
}

#[test]
fn test_call_with_missing_argument() {
    let error = check_error(&format!("{ADD}add(5)."));

    assert_eq!(
        error,
        TypeError::ParamCountMismatch {
            function: "add".to_string(),
            expected: 2,
            found: 1,
            position: crate::Position::new(2, 1),
        }
    );
}

#[test]
fn test_call_with_wrong_argument_type_names_parameter() {
    let error = check_error(&format!("{ADD}add(5, true)."));

    match error {
        TypeError::ParamTypeMismatch {
            function,
            parameter,
            expected,
            found,
            ..
        } => {
            assert_eq!(function, "add");
            assert_eq!(parameter, "b");
            assert_eq!(expected, Type::Int);
            assert_eq!(found, Type::Bool);
        }
        other => panic!("Expected ParamTypeMismatch, got {:?}", other),
    }
}

#[test]
fn test_literal_types() {
    assert_eq!(last_expression_type("1"), Type::Int);
    assert_eq!(last_expression_type("1.5"), Type::Float);
    assert_eq!(last_expression_type("true"), Type::Bool);
    assert_eq!(last_expression_type("\"s\""), Type::String);
}

#[test]
fn test_identifier_has_declared_type() {
    assert_eq!(last_expression_type("float f = 2.0. f"), Type::Float);
    assert_eq!(last_expression_type("string s. s"), Type::String);
}

#[test]
fn test_unary_keeps_operand_type() {
    assert_eq!(last_expression_type("-3"), Type::Int);
    assert_eq!(last_expression_type("!true"), Type::Bool);
    assert_eq!(last_expression_type("-2.5"), Type::Float);
}

#[test]
fn test_arithmetic_takes_left_type() {
    assert_eq!(last_expression_type("1 + 2 * 3"), Type::Int);
    assert_eq!(last_expression_type("1.5 * 2"), Type::Float);
    assert_eq!(last_expression_type("2 ** 0.5"), Type::Int);
}

#[test]
fn test_arithmetic_on_non_numeric() {
    assert!(matches!(
        check_error("1 + true"),
        TypeError::ArithmeticOnNonNumeric {
            left: Type::Int,
            right: Type::Bool,
            ..
        }
    ));
    assert!(matches!(
        check_error("\"a\" - \"b\""),
        TypeError::ArithmeticOnNonNumeric { .. }
    ));
}

#[test]
fn test_non_numeric_exponent() {
    assert!(matches!(
        check_error("2 ** \"x\""),
        TypeError::NonNumericExponentOperand { .. }
    ));
}

#[test]
fn test_logical_operators_need_booleans() {
    assert_eq!(last_expression_type("true && !false || true"), Type::Bool);
    assert!(matches!(
        check_error("true && 1"),
        TypeError::BooleanOperatorOnNonBoolean {
            left: Type::Bool,
            right: Type::Int,
            ..
        }
    ));
}

#[test]
fn test_comparisons_pass_left_type_through() {
    assert_eq!(last_expression_type("1 < 2"), Type::Int);
    assert_eq!(last_expression_type("1.0 == 2.0"), Type::Float);
    assert_eq!(last_expression_type("4 % 3"), Type::Int);
    assert_eq!(last_expression_type("1 << 2"), Type::Int);
}

#[test]
fn test_initializer_must_match_declared_type() {
    let error = check_error("int x = true");

    assert!(matches!(
        error,
        TypeError::ExpressionTypeMismatch {
            expected: Type::Int,
            found: Type::Bool,
            ..
        }
    ));
}

#[test]
fn test_no_implicit_numeric_widening() {
    assert!(matches!(
        check_error("float f = 1"),
        TypeError::ExpressionTypeMismatch {
            expected: Type::Float,
            found: Type::Int,
            ..
        }
    ));
}

#[test]
fn test_assignment_must_match_target_type() {
    check_ok("int x. x = 4.");
    assert!(matches!(
        check_error("int x. x = \"four\"."),
        TypeError::ExpressionTypeMismatch {
            expected: Type::Int,
            found: Type::String,
            ..
        }
    ));
}

#[test]
fn test_void_variable_is_rejected() {
    assert!(matches!(
        check_error("void nothing."),
        TypeError::ErroneousVarDecl { .. }
    ));
    assert!(matches!(
        check_error("void f(void v) { }"),
        TypeError::ErroneousVarDecl { name, .. } if name == "v"
    ));
}

#[test]
fn test_if_condition_must_be_bool() {
    check_ok("bool ready = true. if (ready) { } else { }");
    assert!(matches!(
        check_error("if (1) { }"),
        TypeError::ExpectedBooleanExpression {
            found: Type::Int,
            ..
        }
    ));
}

#[test]
fn test_for_condition_must_be_bool() {
    check_ok("for (int i = 0; true; i = i + 1) { break }");
    assert!(matches!(
        check_error("for (int i = 0; i < 10; i = i + 1) { }"),
        TypeError::NonBooleanLoopCondition {
            found: Type::Int,
            ..
        }
    ));
}

#[test]
fn test_return_type_must_match() {
    check_ok("float half(float x) { return x / 2.0 }");
    assert!(matches!(
        check_error("int f() { return \"one\" }"),
        TypeError::ErroneousReturnType {
            expected: Type::Int,
            found: Type::String,
            ..
        }
    ));
}

#[test]
fn test_bare_return_only_in_void_function() {
    check_ok("void f() { return }");
    assert!(matches!(
        check_error("int f() { return }"),
        TypeError::ErroneousReturnType {
            expected: Type::Int,
            found: Type::Void,
            ..
        }
    ));
}

#[test]
fn test_top_level_return_is_void() {
    check_ok("return.");
    assert!(matches!(
        check_error("return 1."),
        TypeError::ErroneousReturnType {
            expected: Type::Void,
            ..
        }
    ));
}

#[test]
fn test_missing_return_statement() {
    let error = check_error("int f() { int x = 1. }");
    assert!(matches!(
        error,
        TypeError::MissingReturnStatement { ref function, expected: Type::Int, .. } if function == "f"
    ));
}

#[test]
fn test_returns_in_branches_do_not_count() {
    let source = r#"
        int sign(bool negative) {
            if (negative) { return -1 } else { return 1 }
        }
    "#;

    assert!(matches!(
        check_error(source),
        TypeError::MissingReturnStatement { .. }
    ));
}

#[test]
fn test_void_function_needs_no_return() {
    check_ok("void log(string message) { message. }");
}

#[test]
fn test_break_outside_loop() {
    assert!(matches!(check_error("break."), TypeError::ErroneousBreak { .. }));
    assert!(matches!(
        check_error("void f() { if (true) { break } }"),
        TypeError::ErroneousBreak { .. }
    ));
}

#[test]
fn test_break_inside_nested_block_of_loop() {
    check_ok("for (;;) { if (true) { { break. } } }");
}

#[test]
fn test_void_call_has_no_value() {
    let source = "void f() { } int x = 1 + f().";
    assert!(matches!(check_error(source), TypeError::EmptyExpression { .. }));

    let source = "void f() { } int g(int a) { return a } g(f()).";
    assert!(matches!(check_error(source), TypeError::EmptyExpression { .. }));

    check_ok("void f() { } f().");
}

#[test]
fn test_calling_a_non_function_expression() {
    let source = "int f() { return 1 } (f())().";
    assert!(matches!(check_error(source), TypeError::NotCallable { .. }));
}

#[test]
fn test_every_expression_is_typed() {
    let (program, result) = check(&format!("{ADD}int total = add(1, 2) * 3."));
    let types = result.unwrap();

    let Item::Variable(decl) = &program.items[1] else {
        panic!("Expected variable");
    };
    let initializer = decl.initializer.as_ref().unwrap();
    assert_eq!(types[&initializer.id()], Type::Int);
    // a, b, a + b, add, 1, 2, add(1, 2), 3 and the product
    assert_eq!(types.len(), 9);
}

#[test]
fn test_first_error_stops_checking() {
    let error = check_error("int x = true. float y = 1.");
    assert!(matches!(
        error,
        TypeError::ExpressionTypeMismatch {
            expected: Type::Int,
            ..
        }
    ));
}

#[test]
fn test_identifier_without_binding() {
    let tokens = tokenize("int x = 1. x.", LexerKind::Scanner).unwrap();
    let program = parse(tokens).unwrap();

    let error = type_check(&program, &Resolution::default()).unwrap_err();
    assert!(matches!(
        error,
        TypeError::UnresolvedIdentifier { ref name, .. } if name == "x"
    ));
}
