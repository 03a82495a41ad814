//! The query language: tokenizer, expression parser, evaluator and statement compiler.
//!
//! # Syntax
//!
//! ```text
//! SELECT * | col1, col2 ... FROM <source> [WHERE <filter>] [LIMIT <n>] [;]
//! ```
//!
//! ## Sources
//! - `owner.repos` - repositories of a user or organization
//! - `owner.repo.issues` - issues (pull requests included)
//! - `owner.repo.pull_requests` - pull requests
//! - `owner.repo.commits` - commits on the default branch
//!
//! ## Filter Operators
//! - `OR`, `AND`, `NOT`
//! - `>`, `<`, `>=`, `<=`, `=`
//! - `+`, `-`, `*`, `/` (integers only)
//!
//! Literals are integers (`42`) and single-quoted strings (`'open'`). Keywords
//! are case-insensitive; string contents are not.
//!
//! # Example
//!
//! ```
//! use gitql_engine::query::Statement;
//! use gitql_engine::record::Record;
//!
//! let statement = Statement::compile(
//!     "SELECT * FROM octocat.hello.issues WHERE state = 'open' AND comments > 2",
//! )
//! .unwrap();
//!
//! let record = Record::new().with("state", "open").with("comments", 5i64);
//! let filter = statement.filter.unwrap();
//! assert!(filter.matches(&record).unwrap());
//! ```

mod ast;
mod error;
mod evaluator;
mod parser;
mod statement;
mod token;
mod tokenizer;

pub use ast::{BinaryOperator, Expression, UnaryOperator, Value, NOT_BINDING_POWER};
pub use error::{
    EvalError, EvalResult, ParseError, ParseResult, TokenizeError, TokenizeResult,
};
pub use parser::Parser;
pub use statement::{Columns, Statement};
pub use token::{Token, TokenKind};
pub use tokenizer::Tokenizer;
