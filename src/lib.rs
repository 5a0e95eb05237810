//! # K-way merge
//!
//! Merges k already-sorted sequences into one sorted, lazily produced
//! stream. Inputs only need forward iteration, so in-memory slices,
//! linked lists and run files streamed from disk all work as rows.
//!
//! ## Core idea
//! Keep a min-heap over each row's current head. The row that just won
//! stays out of the heap and keeps emitting while its head is still at
//! or below the heap's minimum; only when another row takes over does
//! the heap get touched. A row that dominates a stretch of output then
//! costs one comparison per value instead of a push and a pop.
//!
//! ```
//! use kway_merge::merge;
//!
//! let rows = vec![vec![10, 20, 30], vec![1, 2, 3], vec![15, 16]];
//! let out: Vec<i64> = merge(rows).collect();
//! assert_eq!(out, vec![1, 2, 3, 10, 15, 16, 20, 30]);
//! ```

pub mod config;
pub mod demo;
pub mod display;
pub mod error;
pub mod generate;
pub mod iterator;
pub mod run;
pub mod types;

// Public re-exports for the top-level API
pub use config::Options;
pub use error::{Error, Result};
pub use iterator::{IterRow, KWayMerge, NaiveMerge, Row, TryMerge, merge, naive_merge};
pub use run::{RunReader, RunWriter, write_run};
pub use types::{MergeStats, Value};
