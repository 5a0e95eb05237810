use std::collections::LinkedList;
use std::fs;
use std::io::Write;
use std::path::Path;

use log::info;

use crate::config::Options;
use crate::display::Bracketed;
use crate::error::Result;
use crate::generate::random_rows;
use crate::iterator::{KWayMerge, merge};
use crate::run::{RunReader, run_path, write_run};
use crate::types::Value;

/// Generate rows, print them, merge them, print the result.
///
/// Output shape:
/// ```text
/// in[0] = [  3,  17,  90]
/// in[1] = [  5,   5,  61]
///
/// out[] = [  3,   5,   5,  17,  61,  90]
/// ```
///
/// Rows come from [`Options::rng`], so a fixed `seed` reproduces the
/// whole output. Returns the merged values.
pub fn run<W: Write>(options: &Options, out: &mut W) -> Result<Vec<Value>> {
    options.validate()?;

    let mut rng = options.rng();
    let rows = random_rows(
        &mut rng,
        options.rows,
        options.row_len,
        options.value_range.clone(),
    )?;
    info!(
        "generated {} rows of {} values in {}..={}",
        options.rows,
        options.row_len,
        options.value_range.start(),
        options.value_range.end()
    );

    for (i, row) in rows.iter().enumerate() {
        writeln!(out, "in[{i}] = {}", Bracketed::new(row, options.width))?;
    }

    let merged = match &options.spill_dir {
        Some(dir) => merge_from_runs(dir, &rows)?,
        None => merge_linked(&rows),
    };

    writeln!(out)?;
    writeln!(out, "out[] = {}", Bracketed::new(&merged, options.width))?;
    out.flush()?;

    Ok(merged)
}

/// Merge through linked lists, which only offer forward iteration.
fn merge_linked(rows: &[Vec<Value>]) -> Vec<Value> {
    let lists: LinkedList<LinkedList<Value>> = rows
        .iter()
        .map(|row| row.iter().copied().collect())
        .collect();
    merge(&lists).copied().collect()
}

/// Spill every row to a run file under `dir`, then merge the files.
fn merge_from_runs(dir: &Path, rows: &[Vec<Value>]) -> Result<Vec<Value>> {
    fs::create_dir_all(dir)?;

    let mut readers = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let path = run_path(dir, i);
        write_run(&path, row)?;
        readers.push(RunReader::open(&path)?);
    }
    info!("merging {} run files from {}", readers.len(), dir.display());

    KWayMerge::new(readers).fallible().collect()
}
