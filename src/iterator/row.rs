use std::convert::Infallible;

use crate::iterator::Row;

/// Adapts any iterator over sorted values into a [`Row`].
///
/// Holds the iterator plus one buffered value, the same way
/// `std::iter::Peekable` does. For `slice.iter()` the items are `&T`, so
/// the merge only moves references around and never copies row storage.
pub struct IterRow<I: Iterator> {
    head: Option<I::Item>,
    rest: I,
}

impl<I> IterRow<I>
where
    I: Iterator,
    I::Item: Ord,
{
    /// Wrap an iterator, pulling its first value as the head.
    pub fn new<T>(values: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        let mut rest = values.into_iter();
        let head = rest.next();
        IterRow { head, rest }
    }

    /// Whether the row still has values.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

impl<I> Row for IterRow<I>
where
    I: Iterator,
    I::Item: Ord,
{
    type Item = I::Item;
    type Error = Infallible;

    fn head(&self) -> Option<&Self::Item> {
        self.head.as_ref()
    }

    fn advance(&mut self) -> Result<Option<Self::Item>, Infallible> {
        let current = self.head.take();
        if current.is_some() {
            self.head = self.rest.next();
        }
        Ok(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.head.is_none() {
            return (0, Some(0));
        }
        let (lo, hi) = self.rest.size_hint();
        (lo.saturating_add(1), hi.and_then(|h| h.checked_add(1)))
    }
}
