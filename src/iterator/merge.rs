use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::convert::Infallible;
use std::iter::FusedIterator;
use std::mem;

use log::{debug, trace};

use crate::iterator::{IterRow, Row};
use crate::types::MergeStats;

/// A non-empty row sitting in the heap, keyed by its head.
///
/// `BinaryHeap` is a max-heap, so the comparison is reversed to keep the
/// smallest head at the root. Equal heads compare equal; which row wins a
/// tie is whatever the heap happens to do.
pub(crate) struct Candidate<R>(pub(crate) R);

impl<R: Row> PartialEq for Candidate<R> {
    fn eq(&self, other: &Self) -> bool {
        self.0.head() == other.0.head()
    }
}

impl<R: Row> Eq for Candidate<R> {}

impl<R: Row> PartialOrd for Candidate<R> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<R: Row> Ord for Candidate<R> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.head().cmp(&self.0.head())
    }
}

/// Lazily merges k sorted rows into one non-decreasing stream.
///
/// The row currently being emitted (`top`) is kept outside the heap. Each
/// step compares its head with the heap root:
///
/// ```text
///   top.head <= heap.min   → emit from top, heap untouched (run draining)
///   top.head >  heap.min   → swap top with the root, sift down once
///   heap empty             → emit the rest of top, no comparisons at all
///   top exhausted          → pop the root as the new top
/// ```
///
/// A row that dominates a stretch of the output therefore costs one
/// comparison per value instead of an O(log k) reinsertion.
///
/// Every value from every row is emitted exactly once. Order among equal
/// values from different rows is unspecified.
pub struct KWayMerge<R: Row> {
    top: Option<R>,
    heap: BinaryHeap<Candidate<R>>,
    stats: MergeStats,
    finished: bool,
}

impl<R: Row> KWayMerge<R> {
    /// Build a merger over the given rows. Empty rows are dropped here.
    pub fn new<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
    {
        let candidates: Vec<Candidate<R>> = rows
            .into_iter()
            .filter(|row| row.head().is_some())
            .map(Candidate)
            .collect();

        // From<Vec> heapifies in O(k)
        let mut heap = BinaryHeap::from(candidates);
        let top = heap.pop().map(|c| c.0);
        debug!(
            "merging {} non-empty rows",
            heap.len() + usize::from(top.is_some())
        );

        KWayMerge {
            top,
            heap,
            stats: MergeStats::default(),
            finished: false,
        }
    }

    /// Produce the next value, or the first error raised by a row.
    ///
    /// After an error the failing row stays in place as `top`, so calling
    /// again asks the same row. Rows are expected to keep failing rather
    /// than resume past lost values, as
    /// [`RunReader`](crate::run::RunReader) does. [`TryMerge`] stops at the
    /// first error.
    pub fn try_next(&mut self) -> Result<Option<R::Item>, R::Error> {
        let mut touched_heap = false;

        loop {
            let Some(top) = self.top.as_mut() else {
                break;
            };

            let Some(head) = top.head() else {
                self.top = self.heap.pop().map(|c| c.0);
                touched_heap = true;
                continue;
            };

            if let Some(mut root) = self.heap.peek_mut() {
                let preempted = root.0.head().is_some_and(|next_head| head > next_head);
                if preempted {
                    // root sifts down when the PeekMut guard drops
                    mem::swap(top, &mut root.0);
                    self.stats.replacements += 1;
                    touched_heap = true;
                    trace!("heap replacement #{}", self.stats.replacements);
                    continue;
                }
            }

            let value = top.advance()?;
            if value.is_some() {
                self.stats.emitted += 1;
                if !touched_heap {
                    self.stats.fast_path += 1;
                }
            }
            return Ok(value);
        }

        self.finish();
        Ok(None)
    }

    /// Adapt into an iterator of `Result`s for rows that can fail.
    pub fn fallible(self) -> TryMerge<R> {
        TryMerge {
            inner: self,
            failed: false,
        }
    }

    /// Counters collected so far.
    pub fn stats(&self) -> MergeStats {
        self.stats
    }

    /// Number of rows that still have values.
    pub fn rows_remaining(&self) -> usize {
        let top_live = self.top.as_ref().is_some_and(|row| row.head().is_some());
        self.heap.len() + usize::from(top_live)
    }

    fn remaining_hint(&self) -> (usize, Option<usize>) {
        self.top
            .iter()
            .chain(self.heap.iter().map(|c| &c.0))
            .map(|row| row.size_hint())
            .fold((0, Some(0)), |(lo, hi), (row_lo, row_hi)| {
                let hi = match (hi, row_hi) {
                    (Some(a), Some(b)) => a.checked_add(b),
                    _ => None,
                };
                (lo.saturating_add(row_lo), hi)
            })
    }

    fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        debug!(
            "merge complete: {} values, {} on fast path, {} heap replacements",
            self.stats.emitted, self.stats.fast_path, self.stats.replacements
        );
    }
}

impl<R> Iterator for KWayMerge<R>
where
    R: Row<Error = Infallible>,
{
    type Item = R::Item;

    fn next(&mut self) -> Option<Self::Item> {
        match self.try_next() {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.remaining_hint()
    }
}

impl<R> FusedIterator for KWayMerge<R> where R: Row<Error = Infallible> {}

/// Iterator over a merge of fallible rows (e.g. run files).
///
/// Yields `Err` once for the first failure, then stops.
pub struct TryMerge<R: Row> {
    inner: KWayMerge<R>,
    failed: bool,
}

impl<R: Row> TryMerge<R> {
    /// Counters collected so far.
    pub fn stats(&self) -> MergeStats {
        self.inner.stats()
    }
}

impl<R: Row> Iterator for TryMerge<R> {
    type Item = Result<R::Item, R::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.inner.try_next() {
            Ok(Some(value)) => Some(Ok(value)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        let (_, hi) = self.inner.remaining_hint();
        (0, hi.and_then(|h| h.checked_add(1)))
    }
}

/// Merge any collection of sorted iterables.
///
/// ```
/// let rows = vec![vec![1, 3, 5], vec![2, 4, 6]];
/// let merged: Vec<i32> = kway_merge::merge(&rows).copied().collect();
/// assert_eq!(merged, vec![1, 2, 3, 4, 5, 6]);
/// ```
pub fn merge<I>(rows: I) -> KWayMerge<IterRow<<I::Item as IntoIterator>::IntoIter>>
where
    I: IntoIterator,
    I::Item: IntoIterator,
    <I::Item as IntoIterator>::Item: Ord,
{
    KWayMerge::new(rows.into_iter().map(IterRow::new))
}
