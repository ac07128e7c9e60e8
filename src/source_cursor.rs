
use crate::data_types::merge_error::MergeError;
use crate::parsing::record_source::{ContigFetch, RecordIter, RecordSource};

/// Reads one input for one contig, always holding the next unread record.
/// Once `lookahead` is `None` the cursor is exhausted and stays that way.
pub struct SourceCursor<'a, R> {
    /// The contig this cursor is bound to
    contig: String,
    /// The remaining records; dropped as soon as they run out
    records: Option<RecordIter<'a, R>>,
    /// Smallest record not yet handed out
    lookahead: Option<R>
}

impl<'a, R> SourceCursor<'a, R> {
    /// Opens a cursor over the records an input has for a contig.
    /// If the contig is absent or empty, the cursor starts out exhausted.
    /// # Arguments
    /// * `source` - the input to read from
    /// * `contig` - the contig to bind to
    /// # Errors
    /// * if the input fails to load the contig or the first record
    pub fn open<S>(source: &'a mut S, contig: &str) -> anyhow::Result<Self>
    where
        S: RecordSource<Record = R> + ?Sized
    {
        let fetch = source.fetch(contig)?;
        Self::from_fetch(contig, fetch)
    }

    /// Builds the cursor from an already performed fetch.
    /// # Arguments
    /// * `contig` - the contig the fetch was for
    /// * `fetch` - the result of `RecordSource::fetch`
    /// # Errors
    /// * if pulling the first record fails
    pub fn from_fetch(contig: &str, fetch: ContigFetch<'a, R>) -> anyhow::Result<Self> {
        let records = match fetch {
            ContigFetch::Absent => None,
            ContigFetch::Present(records) => Some(records)
        };

        let mut cursor = Self {
            contig: contig.to_string(),
            records,
            lookahead: None
        };
        cursor.lookahead = cursor.pull_next()?;
        Ok(cursor)
    }

    /// Hands out the current lookahead and loads the one after it.
    /// If loading fails, the current lookahead stays in place so nothing already read is lost.
    /// # Errors
    /// * if the cursor is already exhausted
    /// * if reading the following record fails
    pub fn advance(&mut self) -> anyhow::Result<R> {
        if self.lookahead.is_none() {
            return Err(MergeError::CursorExhausted { contig: self.contig.clone() }.into());
        }
        let next = self.pull_next()?;
        let current = std::mem::replace(&mut self.lookahead, next);
        current.ok_or_else(|| MergeError::CursorExhausted { contig: self.contig.clone() }.into())
    }

    /// Pulls the next record out of the underlying iterator, releasing it once it ends or fails
    fn pull_next(&mut self) -> anyhow::Result<Option<R>> {
        let Some(records) = self.records.as_mut() else {
            return Ok(None);
        };

        match records.next() {
            Some(Ok(record)) => Ok(Some(record)),
            Some(Err(e)) => {
                self.records = None;
                Err(e)
            },
            None => {
                self.records = None;
                Ok(None)
            }
        }
    }

    /// The record `advance` would return next, if any
    pub fn peek(&self) -> Option<&R> {
        self.lookahead.as_ref()
    }

    pub fn is_exhausted(&self) -> bool {
        self.lookahead.is_none()
    }

    // getters
    pub fn contig(&self) -> &str {
        &self.contig
    }
}
