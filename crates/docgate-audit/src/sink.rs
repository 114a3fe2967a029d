//! File destinations that never keep a partial line.
//!
//! `AtomicLines` buffers whatever is written to it and commits the buffer on
//! `flush`. If committing fails partway, the file is cut back to its last
//! committed length, so a failed append leaves no bytes behind.

use std::fs::File;
use std::io::{self, Write};

/// A destination that can drop everything past a known-good length.
pub trait Truncate {
    fn truncate_to(&mut self, len: u64) -> io::Result<()>;
}

impl Truncate for File {
    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

/// Buffer-then-commit wrapper over an append-only destination.
///
/// Bytes are only visible in `inner` once `flush` returns `Ok`. Dropping the
/// wrapper without flushing discards the pending bytes.
pub struct AtomicLines<W> {
    inner: W,
    committed: u64,
    pending: Vec<u8>,
}

impl<W: Write + Truncate> AtomicLines<W> {
    /// Wrap `inner`, whose current length is `committed`.
    pub fn new(inner: W, committed: u64) -> Self {
        Self {
            inner,
            committed,
            pending: Vec::new(),
        }
    }

    /// Length of `inner` as of the last successful commit.
    pub fn committed(&self) -> u64 {
        self.committed
    }

    fn commit(&mut self) -> io::Result<()> {
        self.inner.write_all(&self.pending)?;
        self.inner.flush()
    }
}

impl<W: Write + Truncate> Write for AtomicLines<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            return self.inner.flush();
        }
        let result = self.commit();
        match &result {
            Ok(()) => self.committed += self.pending.len() as u64,
            Err(_) => {
                // The rollback error is secondary; the commit error is returned.
                let _ = self.inner.truncate_to(self.committed);
            }
        }
        self.pending.clear();
        result
    }
}
