// Run file tests
// Tests for writing sorted runs to disk, streaming them back as rows, and
// merging several run files.

use std::io::Cursor;
use std::path::PathBuf;

use kway_merge::iterator::{KWayMerge, Row};
use kway_merge::run::{BLOCK_CAPACITY, RunReader, RunWriter, run_path, write_run};
use kway_merge::{Error, merge};

/// Helper: write one run per row under a fresh temp dir.
fn write_runs(dir: &tempfile::TempDir, rows: &[Vec<i64>]) -> Vec<PathBuf> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let path = run_path(dir.path(), i);
            write_run(&path, row).unwrap();
            path
        })
        .collect()
}

fn read_all(path: &std::path::Path) -> Vec<i64> {
    RunReader::open(path)
        .unwrap()
        .map(|v| v.unwrap())
        .collect()
}

// =============================================================================
// Test 1: Write a run, read it back in order
// =============================================================================
#[test]
fn write_then_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.run");

    let count = write_run(&path, &[-3, 0, 0, 8, 21]).unwrap();
    assert_eq!(count, 5);
    assert_eq!(read_all(&path), vec![-3, 0, 0, 8, 21]);
}

// =============================================================================
// Test 2: Empty run is a zero-length file and an empty row
// =============================================================================
#[test]
fn empty_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.run");

    assert_eq!(write_run(&path, &[]).unwrap(), 0);
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);

    let reader = RunReader::open(&path).unwrap();
    assert!(reader.head().is_none());
}

// =============================================================================
// Test 3: Runs larger than one block
// =============================================================================
#[test]
fn multi_block_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.run");
    let values: Vec<i64> = (0..(BLOCK_CAPACITY as i64 * 3 + 17)).collect();

    write_run(&path, &values).unwrap();

    let mut reader = RunReader::open(&path).unwrap();
    let mut out = Vec::new();
    while let Some(v) = reader.advance().unwrap() {
        out.push(v);
    }
    assert_eq!(out, values);
    assert_eq!(reader.blocks_read(), 4);
}

// =============================================================================
// Test 4: Writer rejects a descending value
// =============================================================================
#[test]
fn writer_rejects_unsorted() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = RunWriter::create(&dir.path().join("bad.run")).unwrap();

    writer.append(5).unwrap();
    writer.append(5).unwrap();
    let err = writer.append(4).unwrap_err();
    assert!(matches!(err, Error::Unsorted { previous: 5, value: 4 }));

    // The rejected value was not counted.
    assert_eq!(writer.len(), 2);
    assert_eq!(writer.finish().unwrap(), 2);
}

// =============================================================================
// Test 5: Merge several run files
// =============================================================================
#[test]
fn merge_run_files() {
    let dir = tempfile::tempdir().unwrap();
    let rows = vec![vec![10, 20, 30], vec![1, 2, 3], vec![], vec![15, 16]];
    let paths = write_runs(&dir, &rows);

    let readers: Vec<_> = paths.iter().map(|p| RunReader::open(p).unwrap()).collect();
    let out: Vec<i64> = KWayMerge::new(readers)
        .fallible()
        .collect::<kway_merge::Result<_>>()
        .unwrap();

    assert_eq!(out, vec![1, 2, 3, 10, 15, 16, 20, 30]);
}

// =============================================================================
// Test 6: Files and memory give the same answer
// =============================================================================
#[test]
fn run_merge_matches_memory_merge() {
    let dir = tempfile::tempdir().unwrap();
    let rows: Vec<Vec<i64>> = (0..5)
        .map(|r| (0..700).map(|i| i * 5 + r).collect())
        .collect();
    let paths = write_runs(&dir, &rows);

    let readers: Vec<_> = paths.iter().map(|p| RunReader::open(p).unwrap()).collect();
    let from_disk: Vec<i64> = KWayMerge::new(readers)
        .fallible()
        .map(|v| v.unwrap())
        .collect();
    let in_memory: Vec<i64> = merge(&rows).copied().collect();

    assert_eq!(from_disk, in_memory);
    assert_eq!(from_disk, (0..3500).collect::<Vec<_>>());
}

// =============================================================================
// Test 7: Corrupt payload surfaces as an error from the merge
// =============================================================================
#[test]
fn corrupt_block_stops_merge() {
    let dir = tempfile::tempdir().unwrap();
    let good: Vec<i64> = (0..10).collect();
    let bad: Vec<i64> = (0..(BLOCK_CAPACITY as i64 + 10)).collect();
    let paths = write_runs(&dir, &[good, bad]);

    // Flip a byte inside the second block of the second run.
    let mut bytes = std::fs::read(&paths[1]).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    std::fs::write(&paths[1], &bytes).unwrap();

    let readers: Vec<_> = paths.iter().map(|p| RunReader::open(p).unwrap()).collect();
    let results: Vec<_> = KWayMerge::new(readers).fallible().collect();

    let (ok, err): (Vec<_>, Vec<_>) = results.into_iter().partition(|r| r.is_ok());
    assert_eq!(err.len(), 1);
    assert!(matches!(err[0], Err(Error::Corruption(_))));
    // Everything before the bad block was still emitted.
    assert!(ok.len() >= BLOCK_CAPACITY);
}

// =============================================================================
// Test 8: Truncated file is corruption, not a silent short run
// =============================================================================
#[test]
fn truncated_run_is_corruption() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.run");
    write_run(&path, &[1, 2, 3, 4]).unwrap();

    let len = std::fs::metadata(&path).unwrap().len();
    let file = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
    file.set_len(len - 3).unwrap();

    assert!(matches!(RunReader::open(&path), Err(Error::Corruption(_))));
}

// =============================================================================
// Test 9: Reader works over any byte source
// =============================================================================
#[test]
fn reader_over_cursor() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("c.run");
    write_run(&path, &[7, 8, 9]).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let reader = RunReader::new(Cursor::new(bytes)).unwrap();
    let values: Vec<i64> = reader.map(|v| v.unwrap()).collect();
    assert_eq!(values, vec![7, 8, 9]);
}

/// Helper: a run of `0..len` with its last `cut` bytes removed.
fn truncated_run(dir: &tempfile::TempDir, len: i64, cut: u64) -> PathBuf {
    let path = dir.path().join("cut.run");
    let values: Vec<i64> = (0..len).collect();
    write_run(&path, &values).unwrap();

    let size = std::fs::metadata(&path).unwrap().len();
    let file = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
    file.set_len(size - cut).unwrap();
    path
}

// =============================================================================
// Test 10: Damaged second block ends iteration with exactly one error
// =============================================================================
#[test]
fn iteration_stops_after_bad_block() {
    let dir = tempfile::tempdir().unwrap();
    let len = BLOCK_CAPACITY as i64 + 8;
    let path = truncated_run(&dir, len, 3);

    let mut reader = RunReader::open(&path).unwrap();
    let results: Vec<_> = reader.by_ref().collect();

    // The whole first block comes through, then one error, then nothing.
    let (ok, err): (Vec<_>, Vec<_>) = results.into_iter().partition(|r| r.is_ok());
    let ok: Vec<i64> = ok.into_iter().map(|r| r.unwrap()).collect();
    assert_eq!(ok, (0..BLOCK_CAPACITY as i64).collect::<Vec<_>>());
    assert_eq!(err.len(), 1);
    assert!(matches!(err[0], Err(Error::Corruption(_))));

    assert!(reader.is_failed());
    assert!(reader.next().is_none());
    assert_eq!(Row::size_hint(&reader), (0, Some(0)));
}

// =============================================================================
// Test 11: A failed reader keeps failing instead of reporting a clean end
// =============================================================================
#[test]
fn failed_reader_keeps_failing() {
    let dir = tempfile::tempdir().unwrap();
    let path = truncated_run(&dir, BLOCK_CAPACITY as i64 + 8, 3);

    let mut reader = RunReader::open(&path).unwrap();
    for expected in 0..BLOCK_CAPACITY as i64 {
        assert_eq!(reader.advance().unwrap(), Some(expected));
    }
    for _ in 0..3 {
        assert!(matches!(reader.advance(), Err(Error::Corruption(_))));
    }
}

// =============================================================================
// Test 12: Retrying a merge after an error never emits a value twice
// =============================================================================
#[test]
fn merge_retry_after_error_keeps_failing() {
    let dir = tempfile::tempdir().unwrap();
    let path = truncated_run(&dir, BLOCK_CAPACITY as i64 + 8, 3);

    let mut merged = KWayMerge::new(vec![RunReader::open(&path).unwrap()]);
    let mut emitted = Vec::new();
    let mut errors = 0;
    for _ in 0..BLOCK_CAPACITY + 4 {
        match merged.try_next() {
            Ok(Some(v)) => emitted.push(v),
            Ok(None) => panic!("damaged run reported a clean end"),
            Err(_) => errors += 1,
        }
    }

    assert_eq!(emitted, (0..BLOCK_CAPACITY as i64).collect::<Vec<_>>());
    assert_eq!(errors, 4);
    assert_eq!(merged.stats().emitted, BLOCK_CAPACITY as u64);
}
