//! Output formatting utilities for the gitql CLI.
//!
//! - [`table`] - Query results and token streams as tables or JSON
//! - [`helpers`] - Common formatting utilities (truncation, padding, timing)

pub mod helpers;
mod table;

pub use table::{format_output_json, format_output_table, format_tokens_json, format_tokens_table};
