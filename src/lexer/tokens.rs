use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::{ast::types::Type, Span};

lazy_static! {
    /// Reserved words, including the alternate spellings. Every spelling of a
    /// construct maps onto the same kind so the parser never sees the difference.
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("fn", TokenKind::Function);
        map.insert("function", TokenKind::Function);
        map.insert("return", TokenKind::Return);
        map.insert("wapsi", TokenKind::Return);
        map.insert("if", TokenKind::If);
        map.insert("agar", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("warna", TokenKind::Else);
        map.insert("for", TokenKind::For);
        map.insert("duhrao", TokenKind::For);
        map.insert("break", TokenKind::Break);
        map.insert("toro", TokenKind::Break);
        map.insert("int", TokenKind::Int);
        map.insert("ginti", TokenKind::Int);
        map.insert("float", TokenKind::Float);
        map.insert("bool", TokenKind::Bool);
        map.insert("string", TokenKind::String);
        map.insert("void", TokenKind::Void);
        map.insert("true", TokenKind::BoolLit);
        map.insert("false", TokenKind::BoolLit);
        map
    };

    /// Operator and punctuation lexemes.
    pub static ref OPERATOR_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("(", TokenKind::OpenParen);
        map.insert(")", TokenKind::CloseParen);
        map.insert("{", TokenKind::OpenCurly);
        map.insert("}", TokenKind::CloseCurly);
        map.insert("[", TokenKind::OpenBracket);
        map.insert("]", TokenKind::CloseBracket);
        map.insert(",", TokenKind::Comma);
        map.insert(";", TokenKind::Semicolon);
        map.insert(".", TokenKind::Dot);
        map.insert(":", TokenKind::Colon);
        map.insert("+", TokenKind::Plus);
        map.insert("-", TokenKind::Dash);
        map.insert("*", TokenKind::Star);
        map.insert("**", TokenKind::StarStar);
        map.insert("/", TokenKind::Slash);
        map.insert("%", TokenKind::Percent);
        map.insert("!", TokenKind::Not);
        map.insert("=", TokenKind::Assignment);
        map.insert("==", TokenKind::Equals);
        map.insert("!=", TokenKind::NotEquals);
        map.insert("<", TokenKind::Less);
        map.insert("<=", TokenKind::LessEquals);
        map.insert(">", TokenKind::Greater);
        map.insert(">=", TokenKind::GreaterEquals);
        map.insert("&&", TokenKind::And);
        map.insert("||", TokenKind::Or);
        map.insert("&", TokenKind::Ampersand);
        map.insert("|", TokenKind::Pipe);
        map.insert("^", TokenKind::Caret);
        map.insert("<<", TokenKind::ShiftLeft);
        map.insert(">>", TokenKind::ShiftRight);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    IntLit,
    FloatLit,
    StringLit,
    BoolLit,
    Identifier,

    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,
    OpenBracket,
    CloseBracket,

    Comma,
    Semicolon,
    Dot,
    Colon,

    Plus,
    Dash,
    Star,
    StarStar, // **
    Slash,
    Percent,

    Not,        // !
    Assignment, // =
    Equals,     // ==
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    And,
    Or,
    Ampersand,
    Pipe,
    Caret,
    ShiftLeft,
    ShiftRight,

    // Reserved
    Function,
    Return,
    If,
    Else,
    For,
    Break,
    Int,
    Float,
    Bool,
    String,
    Void,
}

impl TokenKind {
    /// The declared type named by a type keyword, if this is one.
    pub fn as_type(&self) -> Option<Type> {
        match self {
            TokenKind::Int => Some(Type::Int),
            TokenKind::Float => Some(Type::Float),
            TokenKind::Bool => Some(Type::Bool),
            TokenKind::String => Some(Type::String),
            TokenKind::Void => Some(Type::Void),
            _ => None,
        }
    }

    pub fn is_type(&self) -> bool {
        self.as_type().is_some()
    }

    /// `.` and `;` end a statement; both are optional.
    pub fn is_terminator(&self) -> bool {
        matches!(self, TokenKind::Dot | TokenKind::Semicolon)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::IntLit
            | TokenKind::FloatLit
            | TokenKind::StringLit
            | TokenKind::BoolLit
            | TokenKind::Identifier => write!(f, "{}({:?})", self.kind, self.value),
            _ => write!(f, "{}()", self.kind),
        }
    }
}
