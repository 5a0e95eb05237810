use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::run::BLOCK_CAPACITY;
use crate::run::block::encode_block;
use crate::types::Value;

/// Writes a sorted run to disk, one CRC-checked block at a time.
///
/// The merger never validates ordering, so the writer does: a value
/// smaller than its predecessor is rejected with `Error::Unsorted` and
/// nothing about it reaches the file.
///
/// Two layers of buffering, same as any durable file:
///   BufWriter.flush()  → Rust buffer → OS page cache
///   file.sync_all()    → OS page cache → physical disk
pub struct RunWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    pending: Vec<Value>,
    last: Option<Value>,
    written: u64,
    blocks: u64,
}

impl RunWriter {
    /// Create (or truncate) a run file at the given path.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;

        Ok(RunWriter {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            pending: Vec::with_capacity(BLOCK_CAPACITY),
            last: None,
            written: 0,
            blocks: 0,
        })
    }

    /// Append one value. Must not be smaller than the previous one.
    pub fn append(&mut self, value: Value) -> Result<()> {
        if let Some(previous) = self.last {
            if value < previous {
                return Err(Error::Unsorted { previous, value });
            }
        }

        self.pending.push(value);
        self.last = Some(value);
        self.written += 1;

        if self.pending.len() == BLOCK_CAPACITY {
            self.flush_block()?;
        }
        Ok(())
    }

    /// Values accepted so far.
    pub fn len(&self) -> u64 {
        self.written
    }

    pub fn is_empty(&self) -> bool {
        self.written == 0
    }

    /// Flush the last partial block and fsync. Returns the value count.
    pub fn finish(mut self) -> Result<u64> {
        if !self.pending.is_empty() {
            self.flush_block()?;
        }
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;

        debug!(
            "wrote run {}: {} values in {} blocks",
            self.path.display(),
            self.written,
            self.blocks
        );
        Ok(self.written)
    }

    fn flush_block(&mut self) -> Result<()> {
        let encoded = encode_block(&self.pending);
        self.writer.write_all(&encoded)?;
        self.pending.clear();
        self.blocks += 1;
        Ok(())
    }
}

/// Write a whole sorted slice as a run file.
pub fn write_run(path: &Path, values: &[Value]) -> Result<u64> {
    let mut writer = RunWriter::create(path)?;
    for &value in values {
        writer.append(value)?;
    }
    writer.finish()
}
