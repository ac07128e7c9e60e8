
use log::trace;
use std::cmp::Ordering;

use crate::data_types::variant_record::{compare_records, MergeRecord};
use crate::source_cursor::SourceCursor;

/// Merges the cursors of a single contig into one ordered stream.
/// Each emitted record is the smallest lookahead across all active cursors, by (position, REF, ALT).
/// With only a handful of inputs, a linear scan per record is all we need.
pub struct StreamMerger<'a, R> {
    /// Cursors that still have records; exhausted ones are removed immediately
    cursors: Vec<SourceCursor<'a, R>>,
    /// Set after an input failure so nothing further is emitted
    failed: bool
}

impl<'a, R: MergeRecord> StreamMerger<'a, R> {
    /// Creates the merger, dropping any cursor that is already exhausted.
    /// # Arguments
    /// * `cursors` - one cursor per input that has the contig
    pub fn new(cursors: Vec<SourceCursor<'a, R>>) -> Self {
        let cursors = cursors.into_iter()
            .filter(|c| !c.is_exhausted())
            .collect();
        Self {
            cursors,
            failed: false
        }
    }

    /// Number of cursors that still have records
    pub fn num_active(&self) -> usize {
        self.cursors.len()
    }

    /// Returns the index of the cursor holding the smallest lookahead.
    /// Full ties keep the earliest cursor.
    fn min_cursor_index(&self) -> Option<usize> {
        let mut best: Option<(usize, &R)> = None;
        for (i, cursor) in self.cursors.iter().enumerate() {
            let Some(candidate) = cursor.peek() else {
                continue;
            };
            best = match best {
                Some((_, current)) if compare_records(candidate, current) != Ordering::Less => best,
                _ => Some((i, candidate))
            };
        }
        best.map(|(i, _)| i)
    }
}

impl<R: MergeRecord> Iterator for StreamMerger<'_, R> {
    type Item = anyhow::Result<R>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let index = self.min_cursor_index()?;
        let cursor = &mut self.cursors[index];
        let result = cursor.advance();
        if cursor.is_exhausted() {
            trace!("Cursor #{index} exhausted on {}", cursor.contig());
            // keep the remaining order stable so ties resolve the same way every run
            self.cursors.remove(index);
        }

        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}
