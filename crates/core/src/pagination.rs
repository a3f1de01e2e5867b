//! Offset-based pagination over a remote datastore
//!
//! [`PaginatedFetcher`] turns a `fetch_batch(offset)` function into a lazy,
//! single-pass iterator. Batches are requested at offsets `0, n, 2n, ...`
//! (with `n` the batch size) and iteration ends after the first batch that
//! holds fewer than `n` records.
//!
//! There is no separate "has more" signal: when the number of records is an
//! exact multiple of the batch size, the last request returns an empty batch.
//! That extra round trip is expected and harmless.

use std::collections::VecDeque;
use std::fmt;
use std::iter::FusedIterator;

use emploistore_domain::Result;
use tracing::debug;

/// One page of records, with the total the server reports for the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch<T> {
    /// Number of records the server reports for the whole query
    pub total: u64,
    /// Records of this page, in server order
    pub records: Vec<T>,
}

impl<T> Batch<T> {
    /// Batch of `records` out of `total`.
    #[must_use]
    pub const fn new(total: u64, records: Vec<T>) -> Self {
        Self { total, records }
    }

    /// Batch with no records and a zero total.
    #[must_use]
    pub const fn empty() -> Self {
        Self { total: 0, records: Vec::new() }
    }
}

/// Lazy iterator over every record of a paginated query.
///
/// The batch at offset 0 is fetched at most once: [`peek_first`] and
/// [`total_count`] trigger it and the subsequent iteration reuses it.
///
/// A fetch error is yielded once, after which the iterator is exhausted.
///
/// [`peek_first`]: PaginatedFetcher::peek_first
/// [`total_count`]: PaginatedFetcher::total_count
pub struct PaginatedFetcher<T, F> {
    fetch_batch: F,
    batch_size: usize,
    next_offset: usize,
    total: Option<u64>,
    first: Option<T>,
    first_fetched: bool,
    buffer: VecDeque<T>,
    exhausted: bool,
    done: bool,
}

impl<T, F> PaginatedFetcher<T, F>
where
    T: Clone,
    F: FnMut(usize) -> Result<Batch<T>>,
{
    /// Create a fetcher. A `batch_size` of zero is treated as one.
    pub fn new(batch_size: usize, fetch_batch: F) -> Self {
        Self {
            fetch_batch,
            batch_size: batch_size.max(1),
            next_offset: 0,
            total: None,
            first: None,
            first_fetched: false,
            buffer: VecDeque::new(),
            exhausted: false,
            done: false,
        }
    }

    /// Records requested per fetch.
    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// First record of the sequence, without consuming it.
    ///
    /// # Errors
    /// Propagates the error of the offset-0 fetch.
    pub fn peek_first(&mut self) -> Result<Option<&T>> {
        self.ensure_first_batch()?;
        Ok(self.first.as_ref())
    }

    /// Total number of records as reported by the server.
    ///
    /// This is not a count of what iteration will yield; a backend that
    /// misreports its total is not corrected here.
    ///
    /// # Errors
    /// Propagates the error of the offset-0 fetch.
    pub fn total_count(&mut self) -> Result<u64> {
        self.ensure_first_batch()?;
        Ok(self.total.unwrap_or(0))
    }

    fn ensure_first_batch(&mut self) -> Result<()> {
        if !self.first_fetched {
            self.fetch(0)?;
        }
        Ok(())
    }

    fn fetch(&mut self, offset: usize) -> Result<()> {
        let batch = (self.fetch_batch)(offset)?;
        let received = batch.records.len();
        debug!(offset, received, batch_size = self.batch_size, total = batch.total, "fetched batch");

        if offset == 0 {
            self.total = Some(batch.total);
            self.first = batch.records.first().cloned();
            self.first_fetched = true;
        }

        self.exhausted = received < self.batch_size;
        if !self.exhausted {
            self.next_offset = offset + self.batch_size;
        }
        self.buffer.extend(batch.records);
        Ok(())
    }
}

impl<T, F> Iterator for PaginatedFetcher<T, F>
where
    T: Clone,
    F: FnMut(usize) -> Result<Batch<T>>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.buffer.pop_front() {
                return Some(Ok(record));
            }
            if self.done || self.exhausted {
                self.done = true;
                return None;
            }

            let offset = if self.first_fetched { self.next_offset } else { 0 };
            if let Err(err) = self.fetch(offset) {
                self.done = true;
                return Some(Err(err));
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done || self.exhausted {
            (self.buffer.len(), Some(self.buffer.len()))
        } else {
            (self.buffer.len(), None)
        }
    }
}

impl<T, F> FusedIterator for PaginatedFetcher<T, F>
where
    T: Clone,
    F: FnMut(usize) -> Result<Batch<T>>,
{
}

impl<T, F> fmt::Debug for PaginatedFetcher<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginatedFetcher")
            .field("batch_size", &self.batch_size)
            .field("next_offset", &self.next_offset)
            .field("total", &self.total)
            .field("buffered", &self.buffer.len())
            .field("exhausted", &self.exhausted)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}
