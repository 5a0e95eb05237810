use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::vec;

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::iterator::Row;
use crate::run::block::{BlockHeader, HEADER_SIZE};
use crate::types::Value;

/// Streams a run file as a [`Row`].
///
/// Only one decoded block is held in memory at a time, so a merge over
/// k run files needs k blocks of memory regardless of file sizes. The
/// reader is strictly forward: there is no seek and no rewind.
///
/// A read failure is sticky. The value already at the head is still
/// emitted, the error comes from the following `advance()`, and every call
/// after that fails again. The row never reports a clean end once a block
/// has gone bad, so a retrying caller cannot mistake a damaged run for a
/// short one.
pub struct RunReader<R> {
    source: R,
    block: vec::IntoIter<Value>,
    head: Option<Value>,
    blocks_read: u64,
    pending: Option<Error>,
    failure: Option<String>,
}

impl RunReader<BufReader<File>> {
    /// Open a run file and load its first value.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        debug!("opened run {}", path.display());
        RunReader::new(BufReader::new(file))
    }
}

impl<R: Read> RunReader<R> {
    /// Wrap any byte source holding a run. Reads the first block eagerly
    /// so `head()` is available immediately.
    pub fn new(source: R) -> Result<Self> {
        let mut reader = RunReader {
            source,
            block: Vec::new().into_iter(),
            head: None,
            blocks_read: 0,
            pending: None,
            failure: None,
        };
        reader.head = reader.next_value()?;
        Ok(reader)
    }

    /// Blocks decoded so far.
    pub fn blocks_read(&self) -> u64 {
        self.blocks_read
    }

    /// Whether a read error has already been returned.
    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    fn next_value(&mut self) -> Result<Option<Value>> {
        if let Some(value) = self.block.next() {
            return Ok(Some(value));
        }
        match self.read_block()? {
            Some(values) => {
                self.block = values.into_iter();
                Ok(self.block.next())
            }
            None => Ok(None),
        }
    }

    /// Read and verify the next block. `None` on a clean end of file.
    fn read_block(&mut self) -> Result<Option<Vec<Value>>> {
        let mut header_buf = [0u8; HEADER_SIZE];
        let filled = read_full(&mut self.source, &mut header_buf)?;
        if filled == 0 {
            return Ok(None);
        }
        if filled < HEADER_SIZE {
            return Err(Error::Corruption("block header truncated".into()));
        }

        let header = BlockHeader::decode(&header_buf)?;
        let mut payload = vec![0u8; header.payload_len()];
        let filled = read_full(&mut self.source, &mut payload)?;
        let values = header.decode_payload(&payload[..filled])?;

        self.blocks_read += 1;
        Ok(Some(values))
    }
}

/// Like `read_exact`, but reports how much was read instead of failing
/// on a short read, so EOF between blocks can be told apart from EOF
/// inside one.
fn read_full<R: Read>(source: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

impl<R: Read> Row for RunReader<R> {
    type Item = Value;
    type Error = Error;

    fn head(&self) -> Option<&Value> {
        self.head.as_ref()
    }

    /// After a failed read `head()` keeps the last emitted value, so a
    /// merger keeps this row in play and reaches the error on its next pull.
    fn advance(&mut self) -> Result<Option<Value>> {
        if let Some(e) = self.pending.take() {
            self.failure = Some(e.to_string());
            return Err(e);
        }
        if let Some(reason) = &self.failure {
            return Err(Error::Corruption(format!("run already failed: {reason}")));
        }

        let Some(current) = self.head else {
            return Ok(None);
        };
        match self.next_value() {
            Ok(next) => self.head = next,
            Err(e) => {
                warn!("run read failed after {} blocks: {e}", self.blocks_read);
                self.pending = Some(e);
            }
        }
        Ok(Some(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.pending.is_some() || self.failure.is_some() {
            return (0, Some(0));
        }
        match self.head {
            Some(_) => (1 + self.block.len(), None),
            None => (0, Some(0)),
        }
    }
}

impl<R: Read> Iterator for RunReader<R> {
    type Item = Result<Value>;

    /// Yields the error once, then ends.
    fn next(&mut self) -> Option<Self::Item> {
        if self.is_failed() {
            return None;
        }
        self.advance().transpose()
    }
}
