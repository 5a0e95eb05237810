use std::ops::RangeInclusive;
use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::display::DEFAULT_WIDTH;
use crate::error::{Error, Result};
use crate::types::{DEFAULT_VALUE_RANGE, Value};

/// Settings for the demo run: how many rows, how long, what values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Number of input rows (k).
    pub rows: usize,
    /// Values per row (n).
    pub row_len: usize,
    /// Inclusive bounds for generated values.
    pub value_range: RangeInclusive<Value>,
    /// Fixed seed for reproducible rows. `None` draws from the OS.
    pub seed: Option<u64>,
    /// Field width used when printing rows.
    pub width: usize,
    /// When set, rows are written as run files here and merged from disk.
    pub spill_dir: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            rows: 1,
            row_len: 1,
            value_range: DEFAULT_VALUE_RANGE,
            seed: None,
            width: DEFAULT_WIDTH,
            spill_dir: None,
        }
    }
}

impl Options {
    /// Reject settings the generator cannot satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.value_range.is_empty() {
            return Err(Error::InvalidOptions(format!(
                "min {} is greater than max {}",
                self.value_range.start(),
                self.value_range.end()
            )));
        }
        Ok(())
    }

    /// The generator for this run: seeded from `seed` when set, otherwise
    /// from OS entropy.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Parse a user-entered count. Anything unparseable or below 1 is 1.
pub fn parse_count(input: &str) -> usize {
    input.trim().parse::<i64>().map_or(1, clamp_count)
}

/// Clamp a signed count to at least 1.
pub fn clamp_count(value: i64) -> usize {
    usize::try_from(value.max(1)).unwrap_or(usize::MAX)
}
