use std::fmt;

/// Default field width, enough for the demo's 1..=100 values.
pub const DEFAULT_WIDTH: usize = 3;

/// Renders a sequence as `[  1,   5,  42]`: each value right-aligned in
/// `width` columns, separated by `", "`. An empty sequence renders `[]`.
pub struct Bracketed<'a, T> {
    values: &'a [T],
    width: usize,
}

impl<'a, T: fmt::Display> Bracketed<'a, T> {
    pub fn new(values: &'a [T], width: usize) -> Self {
        Bracketed { values, width }
    }
}

impl<T: fmt::Display> fmt::Display for Bracketed<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value:>width$}", width = self.width)?;
        }
        f.write_str("]")
    }
}

/// [`Bracketed`] with the default width.
pub fn bracketed<T: fmt::Display>(values: &[T]) -> Bracketed<'_, T> {
    Bracketed::new(values, DEFAULT_WIDTH)
}
