//! Precedence-climbing (Pratt) parser for filter expressions.

use super::ast::{BinaryOperator, Expression, UnaryOperator, NOT_BINDING_POWER};
use super::error::{ParseError, ParseResult};
use super::token::{Token, TokenKind};

/// Builds an expression tree from the tokens of a `WHERE` clause.
///
/// # Operator Precedence (lowest to highest)
///
/// | Operators                | Binding power |
/// |--------------------------|---------------|
/// | `OR`                     | 1             |
/// | `AND`                    | 2             |
/// | `NOT` (prefix)           | 3             |
/// | `>` `<` `>=` `<=` `=`    | 4             |
/// | `+` `-`                  | 5             |
/// | `*` `/`                  | 6             |
///
/// Binary operators are left-associative.
///
/// # Example
///
/// ```
/// use gitql_engine::query::{Parser, Tokenizer};
///
/// let mut tokenizer = Tokenizer::new();
/// let tokens = tokenizer.tokenize("stars > 10 AND NOT fork").unwrap();
/// let expression = Parser::parse(tokens).unwrap().unwrap();
///
/// assert_eq!(expression.to_string(), "((stars > 10) AND (NOT fork))");
/// ```
pub struct Parser<'t> {
    tokens: &'t [Token],
    position: usize,
}

impl<'t> Parser<'t> {
    /// Parses a complete filter expression.
    ///
    /// Returns `Ok(None)` for an empty token slice, meaning every row matches.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnexpectedToken` for a token that cannot start an
    /// operand or that is left over after a complete expression, and
    /// `ParseError::UnexpectedEnd` when the tokens run out mid-expression.
    pub fn parse(tokens: &'t [Token]) -> ParseResult<Option<Expression>> {
        if tokens.is_empty() {
            return Ok(None);
        }

        let mut parser = Parser {
            tokens,
            position: 0,
        };
        let expression = parser.parse_expression(0)?;

        if let Some(token) = parser.peek() {
            return Err(ParseError::unexpected_token(token));
        }

        Ok(Some(expression))
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    /// Parses operands and infix operators whose binding power exceeds `min_power`.
    fn parse_expression(&mut self, min_power: u8) -> ParseResult<Expression> {
        let token = self.advance().ok_or(ParseError::UnexpectedEnd {
            expected: "an operand",
        })?;
        let mut left = self.prefix(token)?;

        while let Some(operator) = self.peek().and_then(|t| infix_operator(t.kind)) {
            let power = operator.binding_power();
            if power <= min_power {
                break;
            }
            self.advance();
            let right = self.parse_expression(power)?;
            left = Expression::binary(left, operator, right);
        }

        Ok(left)
    }

    fn prefix(&mut self, token: &'t Token) -> ParseResult<Expression> {
        match token.kind {
            TokenKind::ColumnPlaceholder => match token.text() {
                Some(name) => Ok(Expression::field(name)),
                None => Err(ParseError::unexpected_token(token)),
            },
            TokenKind::Number | TokenKind::String => match &token.value {
                Some(value) => Ok(Expression::Literal(value.clone())),
                None => Err(ParseError::unexpected_token(token)),
            },
            TokenKind::Not => {
                let operand = self.parse_expression(NOT_BINDING_POWER)?;
                Ok(Expression::unary(UnaryOperator::Not, operand))
            }
            TokenKind::Select
            | TokenKind::From
            | TokenKind::Where
            | TokenKind::Order
            | TokenKind::By
            | TokenKind::OrderBy
            | TokenKind::Limit
            | TokenKind::Asc
            | TokenKind::Desc
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::Greater
            | TokenKind::Less
            | TokenKind::Equal
            | TokenKind::Geq
            | TokenKind::Leq
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Asterisk
            | TokenKind::Div
            | TokenKind::Source
            | TokenKind::SemiColon => Err(ParseError::unexpected_token(token)),
        }
    }
}

/// Maps a token to the binary operator it denotes in infix position.
fn infix_operator(kind: TokenKind) -> Option<BinaryOperator> {
    let operator = match kind {
        TokenKind::Or => BinaryOperator::Or,
        TokenKind::And => BinaryOperator::And,
        TokenKind::Greater => BinaryOperator::Greater,
        TokenKind::Less => BinaryOperator::Less,
        TokenKind::Geq => BinaryOperator::GreaterOrEqual,
        TokenKind::Leq => BinaryOperator::LessOrEqual,
        TokenKind::Equal => BinaryOperator::Equal,
        TokenKind::Plus => BinaryOperator::Plus,
        TokenKind::Minus => BinaryOperator::Minus,
        TokenKind::Asterisk => BinaryOperator::Multiply,
        TokenKind::Div => BinaryOperator::Divide,
        TokenKind::Select
        | TokenKind::From
        | TokenKind::Where
        | TokenKind::Order
        | TokenKind::By
        | TokenKind::OrderBy
        | TokenKind::Limit
        | TokenKind::Asc
        | TokenKind::Desc
        | TokenKind::Not
        | TokenKind::String
        | TokenKind::Number
        | TokenKind::ColumnPlaceholder
        | TokenKind::Source
        | TokenKind::SemiColon => return None,
    };
    Some(operator)
}
