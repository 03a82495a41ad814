//! Query execution against an origin.

use serde::Serialize;

use crate::error::{QueryError, QueryResult};
use crate::origin::Origin;
use crate::query::Statement;
use crate::record::Record;
use crate::source::{RecordSource, SelectionState};

/// Rows returned when a query has no `LIMIT`.
pub const DEFAULT_LIMIT: usize = 1;

/// Records requested per fetch.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Query defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub default_limit: usize,
    pub page_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Long-lived query runner owning an origin.
///
/// The engine keeps no per-query state: each call to [`Engine::execute`]
/// compiles the query with a fresh tokenizer and walks a fresh
/// [`RecordSource`], so a failed query never affects the next one. Only the
/// origin (and whatever it caches) survives between queries.
pub struct Engine<O: Origin> {
    origin: O,
    config: EngineConfig,
}

impl<O: Origin> Engine<O> {
    pub fn new(origin: O) -> Self {
        Self::with_config(origin, EngineConfig::default())
    }

    pub fn with_config(origin: O, config: EngineConfig) -> Self {
        Self { origin, config }
    }

    pub fn origin(&self) -> &O {
        &self.origin
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compiles and runs `query`.
    ///
    /// # Errors
    ///
    /// Returns the first tokenization, parse, source, evaluation or origin
    /// error encountered.
    pub async fn execute(&mut self, query: &str) -> QueryResult<QueryOutput> {
        let statement = Statement::compile(query)?;
        self.run(&statement).await
    }

    /// Runs an already compiled statement.
    pub async fn run(&mut self, statement: &Statement) -> QueryResult<QueryOutput> {
        let handle = self
            .origin
            .resolve(&statement.source)
            .await
            .map_err(|e| QueryError::resolution(&statement.source, e))?;

        let limit = statement.limit.unwrap_or(self.config.default_limit);
        let mut source = RecordSource::new(&mut self.origin, handle, limit, self.config.page_size);
        source.run(statement.filter.as_ref()).await?;
        let selection = source.finish();

        let columns = statement.columns.resolve(&statement.source);
        let records = selection
            .records
            .iter()
            .map(|record| record.project(&columns))
            .collect();

        Ok(QueryOutput {
            columns,
            records,
            read_cursor: selection.read_cursor,
            populate_count: selection.populate_count,
            evaluated: selection.evaluated,
            state: selection.state,
        })
    }
}

/// Result of a query: the selected columns and the projected rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryOutput {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
    /// Records fetched from the origin.
    pub read_cursor: usize,
    /// Fetches made.
    pub populate_count: usize,
    /// Rows the filter examined.
    pub evaluated: usize,
    pub state: SelectionState,
}

impl QueryOutput {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when the source ran out before the limit was reached.
    pub fn is_exhausted(&self) -> bool {
        self.state == SelectionState::Exhausted
    }
}
