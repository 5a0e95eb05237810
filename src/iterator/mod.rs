pub mod merge;
pub mod naive;
pub mod row;

pub use merge::{KWayMerge, TryMerge, merge};
pub use naive::{NaiveMerge, naive_merge};
pub use row::IterRow;

/// The central iteration abstraction for the merge.
///
/// Every sorted input (an in-memory slice, a linked list, a run file on
/// disk) is exposed as a forward-only cursor. Nothing here allows
/// rewinding or random access, so single-pass streams work as rows.
///
/// Implementations must keep their values in non-decreasing order. The
/// merger does not check this; an unsorted row yields an unsorted output
/// but still emits every value exactly once.
pub trait Row {
    /// The value type. Only its ordering is used.
    type Item: Ord;

    /// Error surfaced while advancing. In-memory rows use `Infallible`.
    type Error;

    /// Returns the current value, or `None` once the row is exhausted.
    fn head(&self) -> Option<&Self::Item>;

    /// Takes the current value and moves the cursor forward.
    /// Returns `Ok(None)` when the row was already exhausted.
    fn advance(&mut self) -> Result<Option<Self::Item>, Self::Error>;

    /// Bounds on the number of values left, like `Iterator::size_hint`.
    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.head() {
            Some(_) => (1, None),
            None => (0, Some(0)),
        }
    }
}

impl<R: Row + ?Sized> Row for Box<R> {
    type Item = R::Item;
    type Error = R::Error;

    fn head(&self) -> Option<&Self::Item> {
        (**self).head()
    }

    fn advance(&mut self) -> Result<Option<Self::Item>, Self::Error> {
        (**self).advance()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (**self).size_hint()
    }
}
