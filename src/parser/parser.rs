//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the parsing entry point.
//! The parser uses a Pratt parser approach with NUD/LED handlers for
//! expression parsing and specialized functions for statement parsing.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence

use std::collections::HashMap;

use tracing::trace;

use crate::{
    ast::ast::{NodeId, Program},
    errors::errors::ParseError,
    lexer::tokens::{Token, TokenKind},
    Position, Span, MK_TOKEN,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_item,
};

/// The main parser structure that maintains parsing state.
///
/// The token stream always ends with an `EOF` token and the cursor never
/// moves past it, so the current token is always available.
pub struct Parser {
    /// The list of tokens to parse
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// End of the most recently consumed token
    last_end: Position,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Counter for generating node ids
    current_id: u32,
}

impl Parser {
    /// Creates a new Parser instance, appending an `EOF` token if the stream
    /// does not already end with one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|token| token.span.end)
                .unwrap_or_else(|| Position::new(1, 1));
            tokens.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), Span::new(end, end)));
        }

        let start = tokens[0].span.start;
        Parser {
            tokens,
            pos: 0,
            last_end: start,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            current_id: 0,
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Kind of the token `offset` places ahead of the cursor.
    pub fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|token| token.kind)
            .unwrap_or(TokenKind::EOF)
    }

    /// Advances to the next token and returns the previous one.
    pub fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if token.kind != TokenKind::EOF {
            self.pos += 1;
            self.last_end = token.span.end;
        }
        token
    }

    /// Expects a token of the specified kind and consumes it.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, ParseError> {
        let token = self.current_token();
        if token.kind == expected_kind {
            return Ok(self.advance());
        }

        if token.kind == TokenKind::EOF {
            Err(ParseError::UnexpectedEndOfInput {
                position: token.span.start,
            })
        } else {
            Err(ParseError::ExpectedSpecificToken {
                expected: expected_kind,
                found: token.kind,
                position: token.span.start,
            })
        }
    }

    /// Expects an identifier and consumes it.
    pub fn expect_identifier(&mut self) -> Result<Token, ParseError> {
        let token = self.current_token();
        match token.kind {
            TokenKind::Identifier => Ok(self.advance()),
            TokenKind::EOF => Err(ParseError::UnexpectedEndOfInput {
                position: token.span.start,
            }),
            found => Err(ParseError::ExpectedIdentifier {
                found,
                position: token.span.start,
            }),
        }
    }

    /// Consumes a single optional `.` or `;`.
    pub fn skip_terminator(&mut self) {
        if self.current_token_kind().is_terminator() {
            self.advance();
        }
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `binding_power` - The precedence/binding power for this operator
    /// * `led_fn` - The handler function for this infix operator
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// A token can start an expression and continue one (`-`, `(`), so
    /// registering a prefix handler leaves its binding power untouched.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Returns a fresh node id.
    pub fn advance_id(&mut self) -> NodeId {
        let id = self.current_id;
        self.current_id += 1;
        NodeId(id)
    }

    /// Position of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start
    }

    /// End of the last consumed token, used to close node spans.
    pub fn previous_end(&self) -> Position {
        self.last_end
    }
}

/// Parses a stream of tokens into a [`Program`].
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes all lookup tables, and parses top level items until EOF.
/// The first syntax error aborts the parse.
pub fn parse(tokens: Vec<Token>) -> Result<Program, ParseError> {
    let mut parser = Parser::new(tokens);
    create_token_lookups(&mut parser);

    let start = parser.get_position();
    let mut items = vec![];

    while parser.has_tokens() {
        let item = parse_item(&mut parser)?;
        trace!(?item, "parsed top level item");
        items.push(item);
    }

    Ok(Program {
        items,
        span: Span::new(start, parser.current_token().span.end),
    })
}
