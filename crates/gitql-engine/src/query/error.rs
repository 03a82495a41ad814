//! Error types for tokenizing, parsing and evaluating queries.

use thiserror::Error;

use super::ast::BinaryOperator;
use super::token::Token;
use crate::record::DatumKind;

pub type TokenizeResult<T> = Result<T, TokenizeError>;
pub type ParseResult<T> = Result<T, ParseError>;
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors raised while splitting a query into tokens.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenizeError {
    /// The query is empty or whitespace only.
    #[error("Unspecified query")]
    EmptyQuery,

    /// A `'` was opened but never closed on the same line.
    #[error("Unterminated string starting at position {index}")]
    UnterminatedString { index: usize },

    #[error("Token 'ORDER' must be followed by 'BY' (position {index})")]
    MalformedOrder { index: usize },

    /// A digit-only atom that does not fit in a 64-bit integer.
    #[error("invalid number '{text}' at position {index}")]
    InvalidNumber { index: usize, text: String },
}

impl TokenizeError {
    pub fn index(&self) -> Option<usize> {
        match self {
            TokenizeError::EmptyQuery => None,
            TokenizeError::UnterminatedString { index }
            | TokenizeError::MalformedOrder { index }
            | TokenizeError::InvalidNumber { index, .. } => Some(*index),
        }
    }
}

/// Errors raised while building an expression tree or compiling a statement.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected token {token} at position {index}")]
    UnexpectedToken { token: String, index: usize },

    /// Input ended where more tokens were required.
    #[error("unexpected end of query, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    /// A mandatory clause or keyword is absent.
    #[error("expected {expected} at position {index}, found {found}")]
    MissingClause {
        expected: &'static str,
        found: String,
        index: usize,
    },

    #[error("{clause} is not supported (position {index})")]
    UnsupportedClause { clause: &'static str, index: usize },

    #[error("LIMIT must be a positive integer (position {index})")]
    InvalidLimit { index: usize },

    #[error("unknown column '{column}' for {source_kind}{}", suggestion_suffix(.suggestion))]
    UnknownColumn {
        column: String,
        source_kind: &'static str,
        suggestion: Option<String>,
    },
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean '{}'?)", name),
        None => String::new(),
    }
}

impl ParseError {
    pub fn unexpected_token(token: &Token) -> Self {
        ParseError::UnexpectedToken {
            token: token.to_string(),
            index: token.index,
        }
    }

    pub fn missing_clause(expected: &'static str, found: &Token) -> Self {
        ParseError::MissingClause {
            expected,
            found: found.to_string(),
            index: found.index,
        }
    }

    /// Missing clause when a token is present, unexpected end otherwise.
    pub fn expected(expected: &'static str, found: Option<&Token>) -> Self {
        match found {
            Some(token) => ParseError::missing_clause(expected, token),
            None => ParseError::UnexpectedEnd { expected },
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            ParseError::UnexpectedToken { index, .. }
            | ParseError::MissingClause { index, .. }
            | ParseError::UnsupportedClause { index, .. }
            | ParseError::InvalidLimit { index } => Some(*index),
            ParseError::UnexpectedEnd { .. } | ParseError::UnknownColumn { .. } => None,
        }
    }
}

/// Errors raised while evaluating an expression against a record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EvalError {
    /// The two operands of a binary operator carry different types.
    #[error("type error: cannot apply '{operator}' to {left} and {right}")]
    TypeMismatch {
        operator: BinaryOperator,
        left: DatumKind,
        right: DatumKind,
    },

    /// The operator is not defined for this operand type.
    #[error("type error: '{operator}' is not defined for {kind}")]
    UnsupportedOperand { operator: String, kind: DatumKind },

    #[error("type error: filter must evaluate to a boolean, got {kind}")]
    NotBoolean { kind: DatumKind },

    #[error("record has no field '{field}'")]
    UnknownField { field: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in '{operator}'")]
    Overflow { operator: BinaryOperator },
}

impl EvalError {
    /// True for the type error family.
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            EvalError::TypeMismatch { .. }
                | EvalError::UnsupportedOperand { .. }
                | EvalError::NotBoolean { .. }
        )
    }
}
