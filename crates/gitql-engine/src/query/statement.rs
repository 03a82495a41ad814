//! Statement compilation: splitting a token stream into its clauses.
//!
//! ```text
//! query := SELECT ("*" | column+) FROM source [WHERE filter] [LIMIT number] [";"]
//! ```

use serde::Serialize;

use super::ast::{Expression, Value};
use super::error::ParseError;
use super::parser::Parser;
use super::token::{Token, TokenKind};
use super::tokenizer::Tokenizer;
use crate::error::QueryResult;
use crate::source::SourcePath;
use crate::suggest::find_similar_name;

/// The `SELECT` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Columns {
    /// `SELECT *`
    All,
    Named(Vec<String>),
}

impl Columns {
    /// Column names to output for a source, resolving `*` to all its fields.
    pub fn resolve(&self, source: &SourcePath) -> Vec<String> {
        match self {
            Columns::All => source.kind.fields().iter().map(|f| f.to_string()).collect(),
            Columns::Named(names) => names.clone(),
        }
    }
}

/// A compiled query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub columns: Columns,
    pub source: SourcePath,
    /// `None` when there is no `WHERE` clause.
    pub filter: Option<Expression>,
    /// `None` when there is no `LIMIT` clause.
    pub limit: Option<usize>,
}

impl Statement {
    /// Tokenizes and compiles a query.
    ///
    /// # Errors
    ///
    /// Returns tokenization errors, `ParseError`s for misplaced or missing
    /// clauses, `ORDER BY`, a non-positive `LIMIT` or an unknown column, and
    /// `SourceError`s for a malformed `FROM` target.
    ///
    /// # Example
    ///
    /// ```
    /// use gitql_engine::query::{Columns, Statement};
    ///
    /// let statement =
    ///     Statement::compile("SELECT title, state FROM rust-lang.cargo.issues LIMIT 5").unwrap();
    ///
    /// assert_eq!(
    ///     statement.columns,
    ///     Columns::Named(vec!["title".to_string(), "state".to_string()])
    /// );
    /// assert_eq!(statement.limit, Some(5));
    /// assert!(statement.filter.is_none());
    /// ```
    pub fn compile(query: &str) -> QueryResult<Statement> {
        let mut tokenizer = Tokenizer::new();
        tokenizer.tokenize(query)?;
        Self::from_tokens(&mut tokenizer)
    }

    /// Compiles the tokens remaining in `tokenizer`.
    pub fn from_tokens(tokenizer: &mut Tokenizer) -> QueryResult<Statement> {
        expect(tokenizer, TokenKind::Select, "SELECT")?;
        let columns = compile_columns(tokenizer)?;

        expect(tokenizer, TokenKind::From, "FROM")?;
        let source = compile_source(tokenizer)?;

        let filter = match tokenizer.peek().map(|t| t.kind) {
            Some(TokenKind::Where) => compile_filter(tokenizer)?,
            _ => None,
        };

        if let Some(token) = tokenizer.peek() {
            if token.kind == TokenKind::OrderBy {
                return Err(ParseError::UnsupportedClause {
                    clause: "ORDER BY",
                    index: token.index,
                }
                .into());
            }
        }

        let limit = match tokenizer.peek().map(|t| t.kind) {
            Some(TokenKind::Limit) => Some(compile_limit(tokenizer)?),
            _ => None,
        };

        if tokenizer.peek().map(|t| t.kind) == Some(TokenKind::SemiColon) {
            tokenizer.next_token();
        }
        if let Some(token) = tokenizer.peek() {
            return Err(ParseError::unexpected_token(token).into());
        }

        validate_columns(&columns, &source)?;

        Ok(Statement {
            columns,
            source,
            filter,
            limit,
        })
    }
}

fn expect(tokenizer: &mut Tokenizer, kind: TokenKind, name: &'static str) -> QueryResult<()> {
    match tokenizer.next_token() {
        Some(token) if token.kind == kind => Ok(()),
        other => Err(ParseError::expected(name, other).into()),
    }
}

fn compile_columns(tokenizer: &mut Tokenizer) -> QueryResult<Columns> {
    if tokenizer.peek().map(|t| t.kind) == Some(TokenKind::Asterisk) {
        tokenizer.next_token();
        return Ok(Columns::All);
    }

    let mut names = Vec::new();
    while let Some(token) = tokenizer.peek() {
        match (token.kind, token.text()) {
            (TokenKind::ColumnPlaceholder, Some(name)) => {
                names.push(name.to_string());
                tokenizer.next_token();
            }
            _ => break,
        }
    }

    if names.is_empty() {
        return Err(ParseError::expected("a column list or '*'", tokenizer.peek()).into());
    }
    Ok(Columns::Named(names))
}

fn compile_source(tokenizer: &mut Tokenizer) -> QueryResult<SourcePath> {
    match tokenizer.next_token() {
        Some(token) if token.kind == TokenKind::Source => match token.text() {
            Some(path) => Ok(SourcePath::parse(path)?),
            None => Err(ParseError::unexpected_token(token).into()),
        },
        other => Err(ParseError::expected("a source path", other).into()),
    }
}

/// Collects the tokens up to the next clause keyword and parses them.
fn compile_filter(tokenizer: &mut Tokenizer) -> QueryResult<Option<Expression>> {
    tokenizer.next_token();

    let mut tokens: Vec<Token> = Vec::new();
    while let Some(token) = tokenizer.peek() {
        if matches!(
            token.kind,
            TokenKind::Limit | TokenKind::OrderBy | TokenKind::SemiColon
        ) {
            break;
        }
        tokens.push(token.clone());
        tokenizer.next_token();
    }

    if tokens.is_empty() {
        return Err(ParseError::expected("a filter expression", tokenizer.peek()).into());
    }
    Ok(Parser::parse(&tokens)?)
}

fn compile_limit(tokenizer: &mut Tokenizer) -> QueryResult<usize> {
    let limit_index = tokenizer.next_token().map(|t| t.index).unwrap_or_default();

    match tokenizer.next_token() {
        Some(Token {
            kind: TokenKind::Number,
            value: Some(Value::Integer(n)),
            index,
        }) => match usize::try_from(*n) {
            Ok(0) | Err(_) => Err(ParseError::InvalidLimit { index: *index }.into()),
            Ok(limit) => Ok(limit),
        },
        Some(token) => Err(ParseError::InvalidLimit { index: token.index }.into()),
        None => Err(ParseError::InvalidLimit { index: limit_index }.into()),
    }
}

fn validate_columns(columns: &Columns, source: &SourcePath) -> QueryResult<()> {
    let Columns::Named(names) = columns else {
        return Ok(());
    };

    let fields = source.kind.fields();
    match names.iter().find(|name| !source.kind.has_field(name)) {
        Some(unknown) => Err(ParseError::UnknownColumn {
            column: unknown.clone(),
            source_kind: source.kind.as_str(),
            suggestion: find_similar_name(unknown, fields.iter().copied()),
        }
        .into()),
        None => Ok(()),
    }
}
