//! Tokenizer for query strings.
//!
//! Tokenizing happens in two passes. The atomic scan splits the query on
//! whitespace and `;`, reads quoted strings, and classifies each atom as a
//! keyword, operator, number or column placeholder. The combination pass then
//! merges multi-atom tokens (`ORDER BY`, `> =`, `< =`) and marks the atom
//! following `FROM` as the source.

use super::ast::Value;
use super::error::{TokenizeError, TokenizeResult};
use super::token::{Token, TokenKind};

/// Splits a query into tokens and serves them through a read cursor.
///
/// # Example
///
/// ```
/// use gitql_engine::query::{TokenKind, Tokenizer};
///
/// let mut tokenizer = Tokenizer::new();
/// tokenizer.tokenize("SELECT * FROM octocat.repos").unwrap();
///
/// assert_eq!(tokenizer.peek().map(|t| t.kind), Some(TokenKind::Select));
/// assert_eq!(tokenizer.next_token().map(|t| t.kind), Some(TokenKind::Select));
/// assert_eq!(tokenizer.next_token().map(|t| t.kind), Some(TokenKind::Asterisk));
/// ```
#[derive(Debug, Default)]
pub struct Tokenizer {
    tokens: Vec<Token>,
    cursor: usize,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenizes `query`, replacing any previous tokens and rewinding the cursor.
    ///
    /// # Errors
    ///
    /// - `TokenizeError::EmptyQuery` for a blank query
    /// - `TokenizeError::UnterminatedString` when a quote is never closed
    /// - `TokenizeError::MalformedOrder` when `ORDER` is not followed by `BY`
    /// - `TokenizeError::InvalidNumber` for integers that overflow
    pub fn tokenize(&mut self, query: &str) -> TokenizeResult<&[Token]> {
        self.tokens.clear();
        self.cursor = 0;

        if query.trim().is_empty() {
            return Err(TokenizeError::EmptyQuery);
        }

        let atoms = scan(query)?;
        self.tokens = combine(atoms)?;
        Ok(&self.tokens)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Returns the token under the cursor and advances past it.
    pub fn next_token(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.cursor)?;
        self.cursor += 1;
        Some(token)
    }

    pub fn has_next(&self) -> bool {
        self.cursor < self.tokens.len()
    }

    /// Returns the token `offset` positions past the cursor without consuming it.
    pub fn look_ahead(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.cursor.checked_add(offset)?)
    }

    pub fn peek(&self) -> Option<&Token> {
        self.look_ahead(0)
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}

fn is_delimiter(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Accumulates the characters of the atom being read.
struct Scanner {
    atoms: Vec<Token>,
    pending: String,
    pending_start: usize,
}

impl Scanner {
    fn new() -> Self {
        Self {
            atoms: Vec::new(),
            pending: String::new(),
            pending_start: 0,
        }
    }

    fn append(&mut self, index: usize, c: char) {
        if self.pending.is_empty() {
            self.pending_start = index;
        }
        self.pending.push(c);
    }

    fn flush(&mut self) -> TokenizeResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let atom = std::mem::take(&mut self.pending);
        if let Some(token) = classify(&atom, self.pending_start)? {
            self.atoms.push(token);
        }
        Ok(())
    }

    fn push(&mut self, token: Token) {
        self.atoms.push(token);
    }
}

fn scan(query: &str) -> TokenizeResult<Vec<Token>> {
    let mut scanner = Scanner::new();
    let mut chars = query.char_indices();

    while let Some((index, c)) = chars.next() {
        match c {
            '\'' => {
                scanner.flush()?;
                let mut literal = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    match c {
                        '\'' => {
                            closed = true;
                            break;
                        }
                        '\n' => break,
                        _ => literal.push(c),
                    }
                }
                if !closed {
                    return Err(TokenizeError::UnterminatedString { index });
                }
                scanner.push(Token::with_value(
                    TokenKind::String,
                    index,
                    Value::Text(literal),
                ));
            }
            ';' => {
                scanner.flush()?;
                scanner.push(Token::new(TokenKind::SemiColon, index));
            }
            c if is_delimiter(c) => scanner.flush()?,
            c => scanner.append(index, c),
        }
    }

    scanner.flush()?;
    Ok(scanner.atoms)
}

/// Classifies one whitespace-delimited atom. Returns `None` for an atom that
/// is nothing but a separating comma.
fn classify(atom: &str, index: usize) -> TokenizeResult<Option<Token>> {
    if let Some(kind) = TokenKind::from_keyword(atom) {
        return Ok(Some(Token::new(kind, index)));
    }

    if atom.bytes().all(|b| b.is_ascii_digit()) {
        let number = atom
            .parse::<i64>()
            .map_err(|_| TokenizeError::InvalidNumber {
                index,
                text: atom.to_string(),
            })?;
        return Ok(Some(Token::with_value(
            TokenKind::Number,
            index,
            Value::Integer(number),
        )));
    }

    let name = atom.strip_suffix(',').unwrap_or(atom);
    if name.is_empty() {
        return Ok(None);
    }
    Ok(Some(Token::with_value(
        TokenKind::ColumnPlaceholder,
        index,
        Value::Text(name.to_string()),
    )))
}

fn combine(atoms: Vec<Token>) -> TokenizeResult<Vec<Token>> {
    let mut tokens: Vec<Token> = Vec::with_capacity(atoms.len());
    let mut atoms = atoms.into_iter().peekable();

    while let Some(token) = atoms.next() {
        let next = atoms.peek().map(|t| t.kind);
        let merged = match (token.kind, next) {
            (TokenKind::Order, Some(TokenKind::By)) => Some(TokenKind::OrderBy),
            (TokenKind::Order, _) => {
                return Err(TokenizeError::MalformedOrder { index: token.index })
            }
            (TokenKind::Greater, Some(TokenKind::Equal)) => Some(TokenKind::Geq),
            (TokenKind::Less, Some(TokenKind::Equal)) => Some(TokenKind::Leq),
            _ => None,
        };

        if let Some(kind) = merged {
            atoms.next();
            tokens.push(Token::new(kind, token.index));
            continue;
        }

        let follows_from = tokens.last().map(|t| t.kind) == Some(TokenKind::From);
        if token.kind == TokenKind::ColumnPlaceholder && follows_from {
            tokens.push(Token {
                kind: TokenKind::Source,
                ..token
            });
            continue;
        }

        tokens.push(token);
    }

    Ok(tokens)
}
