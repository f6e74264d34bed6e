//! Hand written tokenizer.
//!
//! Classifies characters one at a time instead of going through the regex
//! pattern table. It follows the same lexical rules as [`super::lexer`] and
//! produces an identical token stream.

use crate::{errors::errors::LexError, Position, Span, MK_TOKEN};

use super::{
    lexer::unescape,
    tokens::{Token, TokenKind, OPERATOR_LOOKUP, RESERVED_LOOKUP},
};

pub struct Scanner<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Scanner {
            source,
            tokens: vec![],
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.source[self.pos..].chars().nth(1)
    }

    fn rest_starts_with(&self, prefix: &str) -> bool {
        self.source[self.pos..].starts_with(prefix)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn bump_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&predicate) {
            self.bump();
        }
    }

    fn push(&mut self, kind: TokenKind, value: String, start: Position) {
        let span = Span::new(start, self.position());
        self.tokens.push(MK_TOKEN!(kind, value, span));
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start = self.position();
        self.bump();
        self.bump();
        while !self.rest_starts_with("*/") {
            if self.bump().is_none() {
                return Err(LexError::UnterminatedComment { position: start });
            }
        }
        self.bump();
        self.bump();
        Ok(())
    }

    fn string(&mut self) -> Result<(), LexError> {
        let start = self.position();
        self.bump();
        let body_start = self.pos;
        loop {
            match self.peek() {
                None => return Err(LexError::UnterminatedString { position: start }),
                Some('"') => break,
                Some('\\') => {
                    self.bump();
                    if self.bump().is_none() {
                        return Err(LexError::UnterminatedString { position: start });
                    }
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        let body = &self.source[body_start..self.pos];
        self.bump();
        self.push(TokenKind::StringLit, unescape(body), start);
        Ok(())
    }

    fn number(&mut self) {
        let start = self.position();
        let text_start = self.pos;
        self.bump_while(|c| c.is_ascii_digit());

        let mut kind = TokenKind::IntLit;
        if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            kind = TokenKind::FloatLit;
            self.bump();
            self.bump_while(|c| c.is_ascii_digit());
        }

        let text = self.source[text_start..self.pos].to_string();
        self.push(kind, text, start);
    }

    fn word(&mut self) {
        let start = self.position();
        let text_start = self.pos;
        self.bump_while(|c| c.is_alphanumeric() || c == '_');

        let text = &self.source[text_start..self.pos];
        let kind = RESERVED_LOOKUP
            .get(text)
            .copied()
            .unwrap_or(TokenKind::Identifier);
        self.push(kind, text.to_string(), start);
    }

    fn operator(&mut self) -> Result<(), LexError> {
        let start = self.position();
        let rest = &self.source[self.pos..];

        // Two character operators take priority over their one character prefix.
        for width in [2, 1] {
            let Some(lexeme) = rest.get(..width) else {
                continue;
            };
            if let Some(kind) = OPERATOR_LOOKUP.get(lexeme) {
                for _ in 0..width {
                    self.bump();
                }
                self.push(*kind, lexeme.to_string(), start);
                return Ok(());
            }
        }

        Err(LexError::UnrecognisedCharacter {
            character: rest.chars().next().unwrap_or_default(),
            position: start,
        })
    }

    fn scan(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.bump();
            } else if self.rest_starts_with("/*") {
                self.skip_block_comment()?;
            } else if self.rest_starts_with("//") || ch == '#' {
                self.bump_while(|c| c != '\n');
            } else if ch == '"' {
                self.string()?;
            } else if ch.is_ascii_digit() {
                self.number();
            } else if ch.is_alphabetic() || ch == '_' {
                self.word();
            } else {
                self.operator()?;
            }
        }

        let end = self.position();
        self.tokens
            .push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), Span::new(end, end)));
        Ok(self.tokens)
    }
}

/// Tokenizes `source` with the hand written scanner.
pub fn scan(source: &str) -> Result<Vec<Token>, LexError> {
    Scanner::new(source).scan()
}
