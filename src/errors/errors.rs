use std::fmt::Display;

use thiserror::Error;

use crate::{
    ast::{expressions::BinaryOperator, types::Type},
    lexer::tokens::TokenKind,
    Position,
};

/// Common surface of every diagnostic the front end produces, used by the
/// driver to render a message with a caret under the offending column.
pub trait Report {
    fn get_error_name(&self) -> &'static str;
    fn get_position(&self) -> Position;
    fn get_tip(&self) -> ErrorTip;
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("unrecognised character {character:?} at {position}")]
    UnrecognisedCharacter { character: char, position: Position },
    #[error("unterminated string literal starting at {position}")]
    UnterminatedString { position: Position },
    #[error("unterminated block comment starting at {position}")]
    UnterminatedComment { position: Position },
}

impl Report for LexError {
    fn get_error_name(&self) -> &'static str {
        match self {
            LexError::UnrecognisedCharacter { .. } => "UnrecognisedCharacter",
            LexError::UnterminatedString { .. } => "UnterminatedString",
            LexError::UnterminatedComment { .. } => "UnterminatedComment",
        }
    }

    fn get_position(&self) -> Position {
        match self {
            LexError::UnrecognisedCharacter { position, .. }
            | LexError::UnterminatedString { position }
            | LexError::UnterminatedComment { position } => *position,
        }
    }

    fn get_tip(&self) -> ErrorTip {
        match self {
            LexError::UnrecognisedCharacter { character, .. } => {
                ErrorTip::Suggestion(format!("`{}` is not part of the language", character))
            }
            LexError::UnterminatedString { .. } => {
                ErrorTip::Suggestion(String::from("did you forget a closing `\"`?"))
            }
            LexError::UnterminatedComment { .. } => {
                ErrorTip::Suggestion(String::from("did you forget a closing `*/`?"))
            }
        }
    }
}

/// Syntax errors. Parsing stops at the first one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unexpected end of input at {position}")]
    UnexpectedEndOfInput { position: Position },
    #[error("expected {expected}, found {found} at {position}")]
    ExpectedSpecificToken {
        expected: TokenKind,
        found: TokenKind,
        position: Position,
    },
    #[error("expected a type, found {found} at {position}")]
    ExpectedTypeToken { found: TokenKind, position: Position },
    #[error("expected an identifier, found {found} at {position}")]
    ExpectedIdentifier { found: TokenKind, position: Position },
    #[error("unexpected {found} in expression at {position}")]
    UnexpectedTokenInExpression { found: TokenKind, position: Position },
    #[error("expected an expression, found {found} at {position}")]
    ExpectedExpression { found: TokenKind, position: Position },
    #[error("invalid numeric literal {literal:?} at {position}")]
    InvalidNumericLiteral { literal: String, position: Position },
}

impl Report for ParseError {
    fn get_error_name(&self) -> &'static str {
        match self {
            ParseError::UnexpectedEndOfInput { .. } => "UnexpectedEndOfInput",
            ParseError::ExpectedSpecificToken { .. } => "ExpectedSpecificToken",
            ParseError::ExpectedTypeToken { .. } => "ExpectedTypeToken",
            ParseError::ExpectedIdentifier { .. } => "ExpectedIdentifier",
            ParseError::UnexpectedTokenInExpression { .. } => "UnexpectedTokenInExpression",
            ParseError::ExpectedExpression { .. } => "ExpectedExpression",
            ParseError::InvalidNumericLiteral { .. } => "InvalidNumericLiteral",
        }
    }

    fn get_position(&self) -> Position {
        match self {
            ParseError::UnexpectedEndOfInput { position }
            | ParseError::ExpectedSpecificToken { position, .. }
            | ParseError::ExpectedTypeToken { position, .. }
            | ParseError::ExpectedIdentifier { position, .. }
            | ParseError::UnexpectedTokenInExpression { position, .. }
            | ParseError::ExpectedExpression { position, .. }
            | ParseError::InvalidNumericLiteral { position, .. } => *position,
        }
    }

    fn get_tip(&self) -> ErrorTip {
        match self {
            ParseError::UnexpectedEndOfInput { .. } => {
                ErrorTip::Suggestion(String::from("is a closing `}` or `)` missing?"))
            }
            ParseError::ExpectedSpecificToken { expected, found, .. } => {
                ErrorTip::Suggestion(format!("expected `{}`, found `{}`", expected, found))
            }
            ParseError::ExpectedTypeToken { .. } => ErrorTip::Suggestion(String::from(
                "expected one of `int`, `float`, `bool`, `string` or `void`",
            )),
            ParseError::ExpectedIdentifier { .. } => ErrorTip::None,
            ParseError::UnexpectedTokenInExpression { .. } => ErrorTip::Suggestion(String::from(
                "only a plain identifier can be assigned to",
            )),
            ParseError::ExpectedExpression { .. } => ErrorTip::None,
            ParseError::InvalidNumericLiteral { literal, .. } => ErrorTip::Suggestion(format!(
                "`{}` does not fit in its type, is it above the integer limit?",
                literal
            )),
        }
    }
}

/// Binding errors. The resolver collects all of them before reporting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScopeError {
    #[error("variable {name:?} is not declared ({position})")]
    UndeclaredVariableAccessed { name: String, position: Position },
    #[error("function {name:?} is not defined ({position})")]
    UndefinedFunctionCalled { name: String, position: Position },
    #[error("variable {name:?} is already defined in this scope ({position})")]
    VariableRedefinition { name: String, position: Position },
    #[error("function {name:?} is already defined in this scope ({position})")]
    FunctionPrototypeRedefinition { name: String, position: Position },
}

impl ScopeError {
    pub fn name(&self) -> &str {
        match self {
            ScopeError::UndeclaredVariableAccessed { name, .. }
            | ScopeError::UndefinedFunctionCalled { name, .. }
            | ScopeError::VariableRedefinition { name, .. }
            | ScopeError::FunctionPrototypeRedefinition { name, .. } => name,
        }
    }
}

impl Report for ScopeError {
    fn get_error_name(&self) -> &'static str {
        match self {
            ScopeError::UndeclaredVariableAccessed { .. } => "UndeclaredVariableAccessed",
            ScopeError::UndefinedFunctionCalled { .. } => "UndefinedFunctionCalled",
            ScopeError::VariableRedefinition { .. } => "VariableRedefinition",
            ScopeError::FunctionPrototypeRedefinition { .. } => "FunctionPrototypeRedefinition",
        }
    }

    fn get_position(&self) -> Position {
        match self {
            ScopeError::UndeclaredVariableAccessed { position, .. }
            | ScopeError::UndefinedFunctionCalled { position, .. }
            | ScopeError::VariableRedefinition { position, .. }
            | ScopeError::FunctionPrototypeRedefinition { position, .. } => *position,
        }
    }

    fn get_tip(&self) -> ErrorTip {
        match self {
            ScopeError::UndeclaredVariableAccessed { name, .. } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", name))
            }
            ScopeError::UndefinedFunctionCalled { name, .. } => {
                ErrorTip::Suggestion(format!("`{}` is not a function in scope", name))
            }
            ScopeError::VariableRedefinition { name, .. } => {
                ErrorTip::Suggestion(format!("Variable `{}` already declared", name))
            }
            ScopeError::FunctionPrototypeRedefinition { name, .. } => {
                ErrorTip::Suggestion(format!("Function `{}` already declared", name))
            }
        }
    }
}

/// Every scope error found in one resolver pass, ordered by position.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Found {} errors during scope resolution\n{}", .0.len(), list_errors(.0))]
pub struct ScopeErrors(pub Vec<ScopeError>);

fn list_errors(errors: &[ScopeError]) -> String {
    errors
        .iter()
        .map(|error| format!("{}\n", error))
        .collect()
}

impl ScopeErrors {
    pub fn iter(&self) -> std::slice::Iter<'_, ScopeError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Static type errors. Checking stops at the first one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypeError {
    #[error("{name:?} cannot be declared with type void ({position})")]
    ErroneousVarDecl { name: String, position: Position },
    #[error("function {function:?} expects {expected} arguments, received {found} ({position})")]
    ParamCountMismatch {
        function: String,
        expected: usize,
        found: usize,
        position: Position,
    },
    #[error("argument for parameter {parameter:?} of {function:?} expects {expected}, received {found} ({position})")]
    ParamTypeMismatch {
        function: String,
        parameter: String,
        expected: Type,
        found: Type,
        position: Position,
    },
    #[error("return type {found} does not match declared type {expected} ({position})")]
    ErroneousReturnType {
        expected: Type,
        found: Type,
        position: Position,
    },
    #[error("types do not match: expected {expected}, received {found} ({position})")]
    ExpressionTypeMismatch {
        expected: Type,
        found: Type,
        position: Position,
    },
    #[error("if condition must be bool, received {found} ({position})")]
    ExpectedBooleanExpression { found: Type, position: Position },
    #[error("break outside of a loop ({position})")]
    ErroneousBreak { position: Position },
    #[error("for condition must be bool, received {found} ({position})")]
    NonBooleanLoopCondition { found: Type, position: Position },
    #[error("expression does not produce a value ({position})")]
    EmptyExpression { position: Position },
    #[error("operator {operator} expects bool operands, received {left} and {right} ({position})")]
    BooleanOperatorOnNonBoolean {
        operator: BinaryOperator,
        left: Type,
        right: Type,
        position: Position,
    },
    #[error("operator {operator} expects numeric operands, received {left} and {right} ({position})")]
    ArithmeticOnNonNumeric {
        operator: BinaryOperator,
        left: Type,
        right: Type,
        position: Position,
    },
    #[error("exponent expects numeric operands, received {left} and {right} ({position})")]
    NonNumericExponentOperand {
        left: Type,
        right: Type,
        position: Position,
    },
    #[error("function {function:?} returns {expected} but has no return statement ({position})")]
    MissingReturnStatement {
        function: String,
        expected: Type,
        position: Position,
    },
    #[error("{name:?} does not refer to any declaration ({position})")]
    UnresolvedIdentifier { name: String, position: Position },
    #[error("expression is not a function ({position})")]
    NotCallable { position: Position },
}

impl Report for TypeError {
    fn get_error_name(&self) -> &'static str {
        match self {
            TypeError::ErroneousVarDecl { .. } => "ErroneousVarDecl",
            TypeError::ParamCountMismatch { .. } => "ParamCountMismatch",
            TypeError::ParamTypeMismatch { .. } => "ParamTypeMismatch",
            TypeError::ErroneousReturnType { .. } => "ErroneousReturnType",
            TypeError::ExpressionTypeMismatch { .. } => "ExpressionTypeMismatch",
            TypeError::ExpectedBooleanExpression { .. } => "ExpectedBooleanExpression",
            TypeError::ErroneousBreak { .. } => "ErroneousBreak",
            TypeError::NonBooleanLoopCondition { .. } => "NonBooleanLoopCondition",
            TypeError::EmptyExpression { .. } => "EmptyExpression",
            TypeError::BooleanOperatorOnNonBoolean { .. } => "BooleanOperatorOnNonBoolean",
            TypeError::ArithmeticOnNonNumeric { .. } => "ArithmeticOnNonNumeric",
            TypeError::NonNumericExponentOperand { .. } => "NonNumericExponentOperand",
            TypeError::MissingReturnStatement { .. } => "MissingReturnStatement",
            TypeError::UnresolvedIdentifier { .. } => "UnresolvedIdentifier",
            TypeError::NotCallable { .. } => "NotCallable",
        }
    }

    fn get_position(&self) -> Position {
        match self {
            TypeError::ErroneousVarDecl { position, .. }
            | TypeError::ParamCountMismatch { position, .. }
            | TypeError::ParamTypeMismatch { position, .. }
            | TypeError::ErroneousReturnType { position, .. }
            | TypeError::ExpressionTypeMismatch { position, .. }
            | TypeError::ExpectedBooleanExpression { position, .. }
            | TypeError::ErroneousBreak { position }
            | TypeError::NonBooleanLoopCondition { position, .. }
            | TypeError::EmptyExpression { position }
            | TypeError::BooleanOperatorOnNonBoolean { position, .. }
            | TypeError::ArithmeticOnNonNumeric { position, .. }
            | TypeError::NonNumericExponentOperand { position, .. }
            | TypeError::MissingReturnStatement { position, .. }
            | TypeError::UnresolvedIdentifier { position, .. }
            | TypeError::NotCallable { position } => *position,
        }
    }

    fn get_tip(&self) -> ErrorTip {
        match self {
            TypeError::ParamCountMismatch { expected, found, .. } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, found
            )),
            TypeError::ParamTypeMismatch {
                parameter,
                expected,
                found,
                ..
            } => ErrorTip::Suggestion(format!(
                "Parameter `{}` expects `{}`, received `{}`",
                parameter, expected, found
            )),
            TypeError::ErroneousReturnType { expected, found, .. }
            | TypeError::ExpressionTypeMismatch { expected, found, .. } => ErrorTip::Suggestion(
                format!("Expected type `{}`, received `{}`", expected, found),
            ),
            TypeError::ExpectedBooleanExpression { .. } | TypeError::NonBooleanLoopCondition { .. } => {
                ErrorTip::Suggestion(String::from(
                    "comparisons keep their operand type, use a bool expression",
                ))
            }
            TypeError::ErroneousBreak { .. } => {
                ErrorTip::Suggestion(String::from("`break` is only valid inside a `for` loop"))
            }
            TypeError::EmptyExpression { .. } => {
                ErrorTip::Suggestion(String::from("a void function call has no value"))
            }
            TypeError::MissingReturnStatement { .. } => ErrorTip::Suggestion(String::from(
                "a return statement must appear directly in the function body",
            )),
            TypeError::ErroneousVarDecl { .. }
            | TypeError::BooleanOperatorOnNonBoolean { .. }
            | TypeError::ArithmeticOnNonNumeric { .. }
            | TypeError::NonNumericExponentOperand { .. }
            | TypeError::UnresolvedIdentifier { .. }
            | TypeError::NotCallable { .. } => ErrorTip::None,
        }
    }
}

/// The failure of whichever pipeline stage stopped the compilation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Scope(#[from] ScopeErrors),
    #[error(transparent)]
    Type(#[from] TypeError),
}

impl CompileError {
    /// Every diagnostic carried by this error; more than one only for scope errors.
    pub fn reports(&self) -> Vec<&dyn Report> {
        match self {
            CompileError::Lex(error) => vec![error],
            CompileError::Parse(error) => vec![error],
            CompileError::Scope(errors) => errors.iter().map(|e| e as &dyn Report).collect(),
            CompileError::Type(error) => vec![error],
        }
    }
}
