//! Token kinds produced by the tokenizer.

use std::fmt;

use super::ast::Value;

/// Every kind of token the query language knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    Select,
    From,
    Where,
    Order,
    By,
    OrderBy,
    Limit,
    Asc,
    Desc,
    And,
    Or,
    Not,

    // Operators
    Greater,
    Less,
    Equal,
    Geq,
    Leq,
    Plus,
    Minus,
    Asterisk,
    Div,

    // Values
    String,
    Number,
    ColumnPlaceholder,
    Source,

    SemiColon,
}

impl TokenKind {
    /// Matches a whole atom against the keyword and operator table, ignoring case.
    pub fn from_keyword(atom: &str) -> Option<Self> {
        let kind = match atom.to_ascii_uppercase().as_str() {
            "SELECT" => TokenKind::Select,
            "FROM" => TokenKind::From,
            "WHERE" => TokenKind::Where,
            "ORDER" => TokenKind::Order,
            "BY" => TokenKind::By,
            "LIMIT" => TokenKind::Limit,
            "ASC" => TokenKind::Asc,
            "DESC" => TokenKind::Desc,
            "AND" => TokenKind::And,
            "OR" => TokenKind::Or,
            "NOT" => TokenKind::Not,
            ">" => TokenKind::Greater,
            "<" => TokenKind::Less,
            "=" => TokenKind::Equal,
            ">=" => TokenKind::Geq,
            "<=" => TokenKind::Leq,
            "+" => TokenKind::Plus,
            "-" => TokenKind::Minus,
            "*" => TokenKind::Asterisk,
            "/" => TokenKind::Div,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Select => "SELECT",
            TokenKind::From => "FROM",
            TokenKind::Where => "WHERE",
            TokenKind::Order => "ORDER",
            TokenKind::By => "BY",
            TokenKind::OrderBy => "ORDER_BY",
            TokenKind::Limit => "LIMIT",
            TokenKind::Asc => "ASC",
            TokenKind::Desc => "DESC",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::Greater => "GREATER",
            TokenKind::Less => "LESS",
            TokenKind::Equal => "EQUAL",
            TokenKind::Geq => "GEQ",
            TokenKind::Leq => "LEQ",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Asterisk => "ASTERISK",
            TokenKind::Div => "DIV",
            TokenKind::String => "STRING",
            TokenKind::Number => "NUMBER",
            TokenKind::ColumnPlaceholder => "COLUMN_PLACEHOLDER",
            TokenKind::Source => "SOURCE",
            TokenKind::SemiColon => "SEMI_COLON",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token with its kind, the byte offset where it starts, and its payload.
///
/// Only `NUMBER`, `STRING`, `COLUMN_PLACEHOLDER` and `SOURCE` tokens carry a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub index: usize,
    pub value: Option<Value>,
}

impl Token {
    pub fn new(kind: TokenKind, index: usize) -> Self {
        Self {
            kind,
            index,
            value: None,
        }
    }

    pub fn with_value(kind: TokenKind, index: usize, value: Value) -> Self {
        Self {
            kind,
            index,
            value: Some(value),
        }
    }

    /// Text payload of string, placeholder and source tokens.
    pub fn text(&self) -> Option<&str> {
        self.value.as_ref().and_then(Value::as_text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(Value::Text(s)) if self.kind != TokenKind::String => {
                write!(f, "{}({})", self.kind, s)
            }
            Some(value) => write!(f, "{}({})", self.kind, value),
            None => write!(f, "{}", self.kind),
        }
    }
}
