//! The paginated selection loop.
//!
//! A [`RecordSource`] holds at most one page of records at a time. A row
//! cursor walks the page; each row is tested once against the filter and is
//! either accepted or skipped. When the cursor runs off the end of the page and
//! the limit is still unmet, the next page is fetched from where the previous
//! one ended. The loop stops when `limit` rows are accepted or when a fetch
//! comes back empty.

use serde::Serialize;

use crate::error::{QueryError, QueryResult};
use crate::origin::Origin;
use crate::query::Expression;
use crate::record::Record;

/// Lifecycle of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionState {
    /// Nothing fetched yet.
    Empty,
    /// The cursor points at an unread row of the current page.
    Active,
    /// The page is used up and the limit is unmet.
    AwaitingRefill,
    /// The limit was reached.
    Done,
    /// The origin returned no more records.
    Exhausted,
}

impl SelectionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SelectionState::Done | SelectionState::Exhausted)
    }
}

/// Counters and rows collected by a finished selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub records: Vec<Record>,
    /// Records fetched from the origin so far.
    pub read_cursor: usize,
    /// Number of fetches made, including the final empty one on exhaustion.
    pub populate_count: usize,
    /// Rows examined by the loop, each exactly once.
    pub evaluated: usize,
    pub state: SelectionState,
}

/// Sliding window over the records of one resolved source.
pub struct RecordSource<'o, O: Origin> {
    origin: &'o mut O,
    handle: O::Handle,
    buffer: Vec<Record>,
    row_cursor: usize,
    read_cursor: usize,
    accepted: Vec<Record>,
    limit: usize,
    page_size: usize,
    populate_count: usize,
    evaluated: usize,
    state: SelectionState,
}

impl<'o, O: Origin> RecordSource<'o, O> {
    /// Creates an empty source. `limit` and `page_size` are raised to at least one.
    pub fn new(origin: &'o mut O, handle: O::Handle, limit: usize, page_size: usize) -> Self {
        Self {
            origin,
            handle,
            buffer: Vec::new(),
            row_cursor: 0,
            read_cursor: 0,
            accepted: Vec::new(),
            limit: limit.max(1),
            page_size: page_size.max(1),
            populate_count: 0,
            evaluated: 0,
            state: SelectionState::Empty,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn accepted(&self) -> &[Record] {
        &self.accepted
    }

    pub fn read_cursor(&self) -> usize {
        self.read_cursor
    }

    pub fn row_cursor(&self) -> usize {
        self.row_cursor
    }

    pub fn populate_count(&self) -> usize {
        self.populate_count
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// The row under the cursor, while the selection is active.
    pub fn current(&self) -> Option<&Record> {
        match self.state {
            SelectionState::Active => self.buffer.get(self.row_cursor),
            _ => None,
        }
    }

    /// Replaces the buffer with the next page and rewinds the row cursor.
    ///
    /// Returns the number of records fetched. Zero marks the source exhausted.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Origin` when the fetch fails; the state is left
    /// unchanged so the caller can abandon the query.
    pub async fn populate(&mut self) -> QueryResult<usize> {
        let page = self
            .origin
            .fetch_page(&self.handle, self.read_cursor, self.page_size)
            .await
            .map_err(QueryError::Origin)?;

        self.buffer.clear();
        self.buffer.extend(page.into_iter().take(self.page_size));
        self.row_cursor = 0;
        self.read_cursor += self.buffer.len();
        self.populate_count += 1;

        self.state = if self.buffer.is_empty() {
            SelectionState::Exhausted
        } else {
            SelectionState::Active
        };
        Ok(self.buffer.len())
    }

    /// Accepts the row under the cursor and moves past it.
    pub async fn select_current(&mut self) -> QueryResult<()> {
        if self.state != SelectionState::Active {
            return Ok(());
        }
        if let Some(slot) = self.buffer.get_mut(self.row_cursor) {
            // Rows behind the cursor are never read again.
            self.accepted.push(std::mem::take(slot));
        }
        self.row_cursor += 1;
        self.settle().await
    }

    /// Skips the row under the cursor.
    pub async fn advance(&mut self) -> QueryResult<()> {
        if self.state != SelectionState::Active {
            return Ok(());
        }
        self.row_cursor += 1;
        self.settle().await
    }

    /// Applies the stopping and refill rules after the cursor moved.
    async fn settle(&mut self) -> QueryResult<()> {
        if self.accepted.len() >= self.limit {
            self.state = SelectionState::Done;
            return Ok(());
        }
        if self.row_cursor >= self.buffer.len() {
            self.state = SelectionState::AwaitingRefill;
            self.populate().await?;
        }
        Ok(())
    }

    /// Runs the selection to completion.
    ///
    /// Every fetched row is evaluated at most once. With no filter every row
    /// is accepted.
    ///
    /// # Errors
    ///
    /// Stops at the first evaluation or fetch error.
    pub async fn run(&mut self, filter: Option<&Expression>) -> QueryResult<()> {
        if self.state == SelectionState::Empty {
            self.populate().await?;
        }

        while !self.state.is_terminal() {
            if self.state == SelectionState::AwaitingRefill {
                self.populate().await?;
                continue;
            }

            let keep = match (filter, self.buffer.get(self.row_cursor)) {
                (_, None) => {
                    self.state = SelectionState::AwaitingRefill;
                    continue;
                }
                (None, Some(_)) => true,
                (Some(expression), Some(record)) => expression.matches(record)?,
            };
            self.evaluated += 1;

            if keep {
                self.select_current().await?;
            } else {
                self.advance().await?;
            }
        }

        Ok(())
    }

    /// Consumes the source, returning the accepted rows and counters.
    pub fn finish(self) -> Selection {
        Selection {
            records: self.accepted,
            read_cursor: self.read_cursor,
            populate_count: self.populate_count,
            evaluated: self.evaluated,
            state: self.state,
        }
    }
}
