use std::ops::RangeInclusive;

use rand::Rng;
use rand::distributions::{Distribution, Uniform};

use crate::error::{Error, Result};
use crate::types::Value;

/// `len` uniformly distributed values from `range`, sorted ascending.
///
/// The RNG is passed in so callers decide between a seeded `StdRng`
/// (reproducible) and `thread_rng()`.
pub fn random_sorted_row<R: Rng + ?Sized>(
    rng: &mut R,
    len: usize,
    range: RangeInclusive<Value>,
) -> Result<Vec<Value>> {
    let dist = uniform(&range)?;
    let mut row: Vec<Value> = (0..len).map(|_| dist.sample(&mut *rng)).collect();
    row.sort_unstable();
    Ok(row)
}

/// `k` independent sorted rows of `n` values each.
pub fn random_rows<R: Rng + ?Sized>(
    rng: &mut R,
    k: usize,
    n: usize,
    range: RangeInclusive<Value>,
) -> Result<Vec<Vec<Value>>> {
    (0..k)
        .map(|_| random_sorted_row(&mut *rng, n, range.clone()))
        .collect()
}

fn uniform(range: &RangeInclusive<Value>) -> Result<Uniform<Value>> {
    if range.is_empty() {
        return Err(Error::InvalidOptions(format!(
            "empty value range {}..={}",
            range.start(),
            range.end()
        )));
    }
    Ok(Uniform::new_inclusive(*range.start(), *range.end()))
}
