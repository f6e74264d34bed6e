use crate::{
    ast::expressions::{
        BinaryExpr, BinaryOperator, CallExpr, Expr, IdentifierExpr, LiteralExpr, LiteralValue,
        UnaryExpr, UnaryOperator,
    },
    errors::errors::ParseError,
    lexer::tokens::{Token, TokenKind},
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, ParseError> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud_fn) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(missing_expression(parser.current_token()));
    };

    let mut left = nud_fn(parser)?;

    // While the next operator binds tighter than the current level, keep extending lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = parser
            .get_bp_lookup()
            .get(&token_kind)
            .copied()
            .unwrap_or(BindingPower::Default);
        if next_bp <= bp {
            break;
        }
        let Some(led_fn) = parser.get_led_lookup().get(&token_kind).copied() else {
            break;
        };

        left = led_fn(parser, left, next_bp)?;
    }

    Ok(left)
}

fn missing_expression(token: &Token) -> ParseError {
    match token.kind {
        TokenKind::EOF => ParseError::UnexpectedEndOfInput {
            position: token.span.start,
        },
        found => ParseError::ExpectedExpression {
            found,
            position: token.span.start,
        },
    }
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOperator> {
    let operator = match kind {
        TokenKind::Assignment => BinaryOperator::Assign,
        TokenKind::Or => BinaryOperator::Or,
        TokenKind::And => BinaryOperator::And,
        TokenKind::Pipe => BinaryOperator::BitOr,
        TokenKind::Caret => BinaryOperator::BitXor,
        TokenKind::Ampersand => BinaryOperator::BitAnd,
        TokenKind::Equals => BinaryOperator::Equal,
        TokenKind::NotEquals => BinaryOperator::NotEqual,
        TokenKind::Less => BinaryOperator::Less,
        TokenKind::LessEquals => BinaryOperator::LessEqual,
        TokenKind::Greater => BinaryOperator::Greater,
        TokenKind::GreaterEquals => BinaryOperator::GreaterEqual,
        TokenKind::ShiftLeft => BinaryOperator::ShiftLeft,
        TokenKind::ShiftRight => BinaryOperator::ShiftRight,
        TokenKind::Plus => BinaryOperator::Add,
        TokenKind::Dash => BinaryOperator::Subtract,
        TokenKind::Star => BinaryOperator::Multiply,
        TokenKind::Slash => BinaryOperator::Divide,
        TokenKind::Percent => BinaryOperator::Modulo,
        TokenKind::StarStar => BinaryOperator::Power,
        _ => return None,
    };
    Some(operator)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, ParseError> {
    let token = parser.current_token().clone();
    let value = match token.kind {
        TokenKind::Identifier => {
            parser.advance();
            return Ok(Expr::Identifier(IdentifierExpr {
                id: parser.advance_id(),
                name: token.value,
                span: token.span,
            }));
        }
        TokenKind::IntLit => LiteralValue::Int(token.value.parse().map_err(|_| {
            ParseError::InvalidNumericLiteral {
                literal: token.value.clone(),
                position: token.span.start,
            }
        })?),
        TokenKind::FloatLit => LiteralValue::Float(token.value.parse().map_err(|_| {
            ParseError::InvalidNumericLiteral {
                literal: token.value.clone(),
                position: token.span.start,
            }
        })?),
        TokenKind::StringLit => LiteralValue::String(token.value.clone()),
        TokenKind::BoolLit => LiteralValue::Bool(token.value == "true"),
        _ => return Err(missing_expression(&token)),
    };

    parser.advance();
    Ok(Expr::Literal(LiteralExpr {
        id: parser.advance_id(),
        ty: value.get_type(),
        value,
        span: token.span,
    }))
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: Expr,
    bp: BindingPower,
) -> Result<Expr, ParseError> {
    let operator_token = parser.advance();
    let operator = binary_operator(operator_token.kind).ok_or(
        ParseError::UnexpectedTokenInExpression {
            found: operator_token.kind,
            position: operator_token.span.start,
        },
    )?;

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        id: parser.advance_id(),
        span: left.span().to(right.span()),
        operator,
        left: Box::new(left),
        right: Box::new(right),
    }))
}

/// `**` groups to the right: its operand is parsed one level below its own.
pub fn parse_power_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, ParseError> {
    parse_binary_expr(parser, left, BindingPower::Multiplicative)
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, ParseError> {
    let operator_token = parser.advance();
    let operator = match operator_token.kind {
        TokenKind::Not => UnaryOperator::Not,
        _ => UnaryOperator::Negate,
    };
    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Unary(UnaryExpr {
        id: parser.advance_id(),
        span: operator_token.span.to(operand.span()),
        operator,
        operand: Box::new(operand),
    }))
}

/// Assignment groups to the right and only accepts a bare identifier target.
pub fn parse_assignment_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, ParseError> {
    let operator_token = parser.advance();
    if !matches!(left, Expr::Identifier(_)) {
        return Err(ParseError::UnexpectedTokenInExpression {
            found: operator_token.kind,
            position: operator_token.span.start,
        });
    }

    let value = parse_expr(parser, BindingPower::Default)?;

    Ok(Expr::Binary(BinaryExpr {
        id: parser.advance_id(),
        span: left.span().to(value.span()),
        operator: BinaryOperator::Assign,
        left: Box::new(left),
        right: Box::new(value),
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, ParseError> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_call_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, ParseError> {
    parser.advance();

    let mut arguments = vec![];

    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            arguments.push(parse_expr(parser, BindingPower::Default)?);
            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    let close = parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::Call(CallExpr {
        id: parser.advance_id(),
        span: Span::new(left.span().start, close.span.end),
        callee: Box::new(left),
        arguments,
    }))
}
