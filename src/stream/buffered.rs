//! Buffering layer usable for read-only, write-only and update streams.

use super::{OpenMode, Stream, closed_stream, unsupported};
use crate::config::DEFAULT_BUFFER_SIZE;
use log::warn;
use std::fs::File;
use std::io::{self, BufRead, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Read-ahead and write-behind buffering over an inner stream.
///
/// Reads and writes can be interleaved: pending writes are flushed before
/// reading, and unread read-ahead is given back to the inner stream (by
/// seeking) before writing, so the logical position is always preserved.
#[derive(Debug)]
pub struct BufferedStream<S: Stream> {
    inner: S,
    read_buf: Box<[u8]>,
    pos: usize,
    filled: usize,
    write_buf: Vec<u8>,
}

impl<S: Stream> BufferedStream<S> {
    pub fn new(inner: S) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, inner)
    }

    pub fn with_capacity(capacity: usize, inner: S) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner,
            read_buf: vec![0; capacity].into_boxed_slice(),
            pos: 0,
            filled: 0,
            write_buf: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.read_buf.len()
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Bytes written but not yet handed to the inner stream.
    pub fn pending_writes(&self) -> &[u8] {
        &self.write_buf
    }

    fn ensure_open(&self) -> io::Result<()> {
        if self.inner.is_closed() {
            Err(closed_stream())
        } else {
            Ok(())
        }
    }

    fn unread(&self) -> usize {
        self.filled - self.pos
    }

    fn discard_read_ahead(&mut self) {
        self.pos = 0;
        self.filled = 0;
    }

    /// Move the inner position back over bytes read ahead but not consumed.
    fn give_back_read_ahead(&mut self) -> io::Result<()> {
        let unread = self.unread();
        if unread > 0 {
            self.inner.seek(SeekFrom::Current(-(unread as i64)))?;
        }
        self.discard_read_ahead();
        Ok(())
    }

    fn flush_writes(&mut self) -> io::Result<()> {
        let mut written = 0;
        let mut result = Ok(());
        while written < self.write_buf.len() {
            match self.inner.write(&self.write_buf[written..]) {
                Ok(0) => {
                    result = Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "failed to write the buffered data",
                    ));
                    break;
                }
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }
        self.write_buf.drain(..written);
        result
    }
}

impl<S: Stream> Read for BufferedStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.ensure_open()?;
        // Large reads skip the buffer entirely.
        if self.unread() == 0 && buf.len() >= self.capacity() {
            self.flush_writes()?;
            self.discard_read_ahead();
            return self.inner.read(buf);
        }
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl<S: Stream> BufRead for BufferedStream<S> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.ensure_open()?;
        if self.pos >= self.filled {
            self.flush_writes()?;
            self.filled = self.inner.read(&mut self.read_buf)?;
            self.pos = 0;
        }
        Ok(&self.read_buf[self.pos..self.filled])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.filled);
    }
}

impl<S: Stream> Write for BufferedStream<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.ensure_open()?;
        if !self.inner.mode().writable() {
            return Err(unsupported("writable"));
        }
        self.give_back_read_ahead()?;
        if self.write_buf.len() + buf.len() > self.capacity() {
            self.flush_writes()?;
        }
        if buf.len() >= self.capacity() {
            return self.inner.write(buf);
        }
        self.write_buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.ensure_open()?;
        self.flush_writes()?;
        self.inner.flush()
    }
}

impl<S: Stream> Seek for BufferedStream<S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.ensure_open()?;
        self.flush_writes()?;
        let target = match pos {
            SeekFrom::Current(offset) => SeekFrom::Current(offset - self.unread() as i64),
            other => other,
        };
        let position = self.inner.seek(target)?;
        self.discard_read_ahead();
        Ok(position)
    }
}

impl<S: Stream> Stream for BufferedStream<S> {
    fn file(&self) -> io::Result<&File> {
        self.inner.file()
    }

    fn path(&self) -> Option<&Path> {
        self.inner.path()
    }

    fn mode(&self) -> OpenMode {
        self.inner.mode()
    }

    fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    fn close(&mut self) -> io::Result<()> {
        if self.inner.is_closed() {
            return Ok(());
        }
        let flushed = self.flush_writes();
        self.discard_read_ahead();
        // The descriptor is released even when the final flush fails.
        let closed = self.inner.close();
        flushed.and(closed)
    }
}

impl<S: Stream> Drop for BufferedStream<S> {
    fn drop(&mut self) {
        if !self.inner.is_closed()
            && let Err(err) = self.flush_writes()
        {
            warn!("dropping {} unwritten bytes: {}", self.write_buf.len(), err);
        }
    }
}
