use crate::{
    ast::{
        ast::{FunctionDecl, Item, Parameter, VarDecl},
        statements::{
            Block, BreakStmt, ExpressionStmt, ForInit, ForStmt, IfStmt, ReturnStmt, Stmt,
        },
    },
    errors::errors::ParseError,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
    Span,
};

use super::{
    parser::Parser,
    types::{at_function_signature, parse_type},
};

/// Parses one top level item: a function, a global variable or a free statement.
pub fn parse_item(parser: &mut Parser) -> Result<Item, ParseError> {
    let kind = parser.current_token_kind();

    if kind == TokenKind::Function || at_function_signature(parser) {
        return Ok(Item::Function(parse_fn_decl(parser)?));
    }

    if kind.is_type() {
        let decl = parse_var_decl(parser)?;
        parser.skip_terminator();
        return Ok(Item::Variable(decl));
    }

    Ok(Item::Statement(parse_stmt(parser)?))
}

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, ParseError> {
    if let Some(stmt_fn) = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        return stmt_fn(parser);
    }

    let expression = parse_expr(parser, BindingPower::Default)?;
    parser.skip_terminator();

    Ok(Stmt::Expression(ExpressionStmt {
        span: expression.span(),
        expression,
    }))
}

/// `<type> <identifier> [= <expr>]`, without its terminator.
pub fn parse_var_decl(parser: &mut Parser) -> Result<VarDecl, ParseError> {
    let start = parser.get_position();
    let ty = parse_type(parser)?;
    let name = parser.expect_identifier()?.value;

    let initializer = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    Ok(VarDecl {
        id: parser.advance_id(),
        name,
        ty,
        initializer,
        span: Span::new(start, parser.previous_end()),
    })
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let decl = parse_var_decl(parser)?;
    parser.skip_terminator();

    Ok(Stmt::VarDecl(decl))
}

pub fn parse_block(parser: &mut Parser) -> Result<Block, ParseError> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;

    let mut statements = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(ParseError::UnexpectedEndOfInput {
                position: parser.get_position(),
            });
        }
        statements.push(parse_stmt(parser)?);
    }

    let end = parser.expect(TokenKind::CloseCurly)?.span.end;

    Ok(Block {
        statements,
        span: Span::new(start, end),
    })
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let block = parse_block(parser)?;
    parser.skip_terminator();

    Ok(Stmt::Block(block))
}

/// `[function] <type> <identifier> ( [<type> <identifier>, ...] ) { <stmt>* }`
pub fn parse_fn_decl(parser: &mut Parser) -> Result<FunctionDecl, ParseError> {
    let start = parser.get_position();
    if parser.current_token_kind() == TokenKind::Function {
        parser.advance();
    }

    let return_type = parse_type(parser)?;
    let name = parser.expect_identifier()?.value;

    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = Vec::new();
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            let param_start = parser.get_position();
            let ty = parse_type(parser)?;
            let name = parser.expect_identifier()?.value;
            parameters.push(Parameter {
                id: parser.advance_id(),
                name,
                ty,
                span: Span::new(param_start, parser.previous_end()),
            });

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let body = parse_block(parser)?;
    parser.skip_terminator();

    Ok(FunctionDecl {
        id: parser.advance_id(),
        name,
        return_type,
        parameters,
        span: Span::new(start, body.span.end),
        body: body.statements,
    })
}

/// `return [<expr>]`. No expression follows when the next token ends the
/// statement: a terminator, a closing brace or the end of input.
pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let start = parser.advance().span.start;

    let kind = parser.current_token_kind();
    let value = if kind.is_terminator() || kind == TokenKind::CloseCurly || kind == TokenKind::EOF
    {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };

    let span = Span::new(start, parser.previous_end());
    parser.skip_terminator();

    Ok(Stmt::Return(ReturnStmt { value, span }))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let start = parser.advance().span.start;

    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    let then_branch = parse_block(parser)?;

    let else_branch = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(parse_block(parser)?)
    } else {
        None
    };

    let span = Span::new(start, parser.previous_end());
    parser.skip_terminator();

    Ok(Stmt::If(IfStmt {
        condition,
        then_branch,
        else_branch,
        span,
    }))
}

/// `for ( [init] [;] [condition] [;] [update] ) { <stmt>* }`
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let start = parser.advance().span.start;
    parser.expect(TokenKind::OpenParen)?;

    let kind = parser.current_token_kind();
    let init = if kind.is_terminator() || kind == TokenKind::CloseParen {
        None
    } else if kind.is_type() {
        Some(ForInit::VarDecl(parse_var_decl(parser)?))
    } else {
        Some(ForInit::Expression(parse_expr(parser, BindingPower::Default)?))
    };
    parser.skip_terminator();

    let kind = parser.current_token_kind();
    let condition = if kind.is_terminator() || kind == TokenKind::CloseParen {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };
    parser.skip_terminator();

    let update = if parser.current_token_kind() == TokenKind::CloseParen {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_block(parser)?;
    let span = Span::new(start, body.span.end);
    parser.skip_terminator();

    Ok(Stmt::For(ForStmt {
        init,
        condition,
        update,
        body,
        span,
    }))
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let token = parser.advance();
    parser.skip_terminator();

    Ok(Stmt::Break(BreakStmt {
        id: parser.advance_id(),
        span: token.span,
    }))
}
