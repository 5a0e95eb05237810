use std::ops::RangeInclusive;

/// Integer type carried by run files, the generator and the demo.
///
/// The merge itself is generic over any `Ord` item; this alias only
/// fixes the on-disk and demo representation.
pub type Value = i64;

/// Inclusive bounds for generated values. The original demo used 1..=100.
pub const DEFAULT_VALUE_RANGE: RangeInclusive<Value> = 1..=100;

/// Counters collected while a merge runs.
///
/// `fast_path` counts values emitted in a step that did no heap work:
/// the current row was still at or below the next competing head, or
/// the heap was already empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Total values emitted.
    pub emitted: u64,
    /// Values emitted without a pop or swap in the same step.
    pub fast_path: u64,
    /// Times the current row was swapped with the heap root.
    pub replacements: u64,
}
