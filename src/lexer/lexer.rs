use lazy_static::lazy_static;
use regex::Regex;

use crate::{errors::errors::LexError, Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer<'_>, &str) -> Result<(), LexError>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

fn pattern(source: &str, handler: RegexHandler) -> RegexPattern {
    RegexPattern {
        regex: Regex::new(&format!("^(?:{})", source)).expect("token patterns are valid regexes"),
        handler,
    }
}

lazy_static! {
    // Order matters: the first pattern that matches at the cursor wins, so
    // longer lexemes come before their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern("\\s+", skip_handler),
        pattern("/\\*[\\s\\S]*?\\*/", skip_handler),
        pattern("/\\*", unterminated_comment_handler),
        pattern("//[^\\n]*", skip_handler),
        pattern("#[^\\n]*", skip_handler),
        pattern("\"(?:\\\\[\\s\\S]|[^\"\\\\])*\"", string_handler),
        pattern("\"", unterminated_string_handler),
        pattern("[0-9]+(\\.[0-9]+)?", number_handler),
        pattern("[\\p{Alphabetic}_][\\p{Alphabetic}\\p{N}_]*", symbol_handler),
        pattern("\\*\\*", MK_DEFAULT_HANDLER!(TokenKind::StarStar, "**")),
        pattern("==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        pattern("!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
        pattern("<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        pattern(">=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        pattern("<<", MK_DEFAULT_HANDLER!(TokenKind::ShiftLeft, "<<")),
        pattern(">>", MK_DEFAULT_HANDLER!(TokenKind::ShiftRight, ">>")),
        pattern("&&", MK_DEFAULT_HANDLER!(TokenKind::And, "&&")),
        pattern("\\|\\|", MK_DEFAULT_HANDLER!(TokenKind::Or, "||")),
        pattern("\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        pattern("\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        pattern("\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        pattern("\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        pattern("\\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[")),
        pattern("\\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]")),
        pattern(",", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern(";", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
        pattern("\\.", MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")),
        pattern(":", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
        pattern("\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        pattern("-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        pattern("\\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        pattern("/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        pattern("%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
        pattern("!", MK_DEFAULT_HANDLER!(TokenKind::Not, "!")),
        pattern("=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        pattern("<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        pattern(">", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        pattern("&", MK_DEFAULT_HANDLER!(TokenKind::Ampersand, "&")),
        pattern("\\|", MK_DEFAULT_HANDLER!(TokenKind::Pipe, "|")),
        pattern("\\^", MK_DEFAULT_HANDLER!(TokenKind::Caret, "^")),
    ];
}

/// Regex driven tokenizer state.
pub struct Lexer<'src> {
    tokens: Vec<Token>,
    source: &'src str,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Lexer {
            tokens: vec![],
            source,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Moves the cursor past `text`, keeping line and column in step.
    pub fn advance(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos += text.len();
    }

    /// Pushes a token whose source text is `lexeme` and advances past it.
    pub fn push(&mut self, kind: TokenKind, value: String, lexeme: &str) {
        let start = self.position();
        self.advance(lexeme);
        let span = Span::new(start, self.position());
        self.tokens.push(MK_TOKEN!(kind, value, span));
    }

    pub fn remainder(&self) -> &'src str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }
}

/// Replaces the escape sequences of a string literal body.
///
/// `\n`, `\t`, `\r`, `\"` and `\\` are recognised; any other escaped character
/// is kept as is, without the backslash.
pub fn unescape(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('"') => result.push('"'),
            Some('\\') => result.push('\\'),
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }

    result
}

fn skip_handler(lexer: &mut Lexer<'_>, matched: &str) -> Result<(), LexError> {
    lexer.advance(matched);
    Ok(())
}

fn number_handler(lexer: &mut Lexer<'_>, matched: &str) -> Result<(), LexError> {
    let kind = if matched.contains('.') {
        TokenKind::FloatLit
    } else {
        TokenKind::IntLit
    };
    lexer.push(kind, matched.to_string(), matched);
    Ok(())
}

fn string_handler(lexer: &mut Lexer<'_>, matched: &str) -> Result<(), LexError> {
    let body = &matched[1..matched.len() - 1];
    lexer.push(TokenKind::StringLit, unescape(body), matched);
    Ok(())
}

fn symbol_handler(lexer: &mut Lexer<'_>, matched: &str) -> Result<(), LexError> {
    let kind = RESERVED_LOOKUP
        .get(matched)
        .copied()
        .unwrap_or(TokenKind::Identifier);
    lexer.push(kind, matched.to_string(), matched);
    Ok(())
}

fn unterminated_string_handler(lexer: &mut Lexer<'_>, _matched: &str) -> Result<(), LexError> {
    Err(LexError::UnterminatedString {
        position: lexer.position(),
    })
}

fn unterminated_comment_handler(lexer: &mut Lexer<'_>, _matched: &str) -> Result<(), LexError> {
    Err(LexError::UnterminatedComment {
        position: lexer.position(),
    })
}

/// Tokenizes `source` with the regex pattern table.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lex = Lexer::new(source);

    while !lex.at_eof() {
        let remainder = lex.remainder();
        let matched = PATTERNS
            .iter()
            .find_map(|pattern| pattern.regex.find(remainder).map(|m| (pattern.handler, m.as_str())));

        match matched {
            Some((handler, text)) => handler(&mut lex, text)?,
            None => {
                return Err(LexError::UnrecognisedCharacter {
                    character: remainder.chars().next().unwrap_or_default(),
                    position: lex.position(),
                })
            }
        }
    }

    let end = lex.position();
    lex.tokens.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), Span::new(end, end)));
    Ok(lex.tokens)
}
