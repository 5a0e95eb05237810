use std::collections::BinaryHeap;
use std::convert::Infallible;
use std::iter::FusedIterator;

use crate::iterator::merge::Candidate;
use crate::iterator::{IterRow, Row};

/// Reference k-way merge: pop the smallest head, advance that row, push
/// it back. One heap round trip per value, no run draining.
///
/// Kept as the baseline that [`KWayMerge`](crate::iterator::KWayMerge)
/// is checked and benchmarked against.
pub struct NaiveMerge<R: Row> {
    heap: BinaryHeap<Candidate<R>>,
}

impl<R: Row> NaiveMerge<R> {
    /// Build a merger over the given rows. Empty rows are dropped here.
    pub fn new<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
    {
        let heap = rows
            .into_iter()
            .filter(|row| row.head().is_some())
            .map(Candidate)
            .collect();
        NaiveMerge { heap }
    }

    /// Pop the row with the smallest head and take one value from it.
    ///
    /// The row goes back on the heap whenever it still has a head, even
    /// when `advance` failed, so a failing row is asked again on a later
    /// call.
    pub fn try_next(&mut self) -> Result<Option<R::Item>, R::Error> {
        let Some(mut smallest) = self.heap.pop() else {
            return Ok(None);
        };
        let value = smallest.0.advance();
        if smallest.0.head().is_some() {
            self.heap.push(smallest);
        }
        value
    }
}

impl<R> Iterator for NaiveMerge<R>
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
}

impl<R> FusedIterator for NaiveMerge<R> where R: Row<Error = Infallible> {}

/// Same signature as [`merge`](crate::iterator::merge), without the fast path.
pub fn naive_merge<I>(rows: I) -> NaiveMerge<IterRow<<I::Item as IntoIterator>::IntoIter>>
where
    I: IntoIterator,
    I::Item: IntoIterator,
    <I::Item as IntoIterator>::Item: Ord,
{
    NaiveMerge::new(rows.into_iter().map(IterRow::new))
}
