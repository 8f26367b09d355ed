//! UTF-8 text layer.

use super::{OpenMode, Stream, closed_stream, unsupported};
use crate::config::{DecodeErrors, Newline};
use std::fs::File;
use std::io::{self, BufRead, Read, Seek, SeekFrom, Write};
use std::path::Path;

const CHUNK_SIZE: usize = 8192;

/// Text view over a byte stream.
///
/// Reading yields valid UTF-8: invalid input is handled per the
/// [`DecodeErrors`] policy, and with [`Newline::Universal`] every `\r\n` and
/// lone `\r` reads as `\n`. Writes are checked the same way, so only valid
/// UTF-8 reaches the file; an incomplete trailing sequence is held back until
/// the next write completes it. Writing translates `\n` for the `Cr` and
/// `Crlf` policies, and flushes after any line break when line buffering is
/// on.
///
/// Decoded text is read ahead of the inner stream, so relative seeks and
/// telling the position while decoded text is pending are not supported.
/// Switching from reading to writing drops the pending text; seek to a known
/// position first.
#[derive(Debug)]
pub struct TextStream<S: Stream> {
    inner: S,
    errors: DecodeErrors,
    newline: Newline,
    line_buffering: bool,
    undecoded: Vec<u8>,
    decoded: Vec<u8>,
    decoded_pos: usize,
    pending_cr: bool,
    pending_write: Vec<u8>,
}

impl<S: Stream> TextStream<S> {
    pub fn new(inner: S, errors: DecodeErrors, newline: Newline, line_buffering: bool) -> Self {
        Self {
            inner,
            errors,
            newline,
            line_buffering,
            undecoded: Vec::new(),
            decoded: Vec::new(),
            decoded_pos: 0,
            pending_cr: false,
            pending_write: Vec::new(),
        }
    }

    pub fn errors(&self) -> DecodeErrors {
        self.errors
    }

    pub fn newline(&self) -> Newline {
        self.newline
    }

    pub fn line_buffering(&self) -> bool {
        self.line_buffering
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    fn ensure_open(&self) -> io::Result<()> {
        if self.inner.is_closed() {
            Err(closed_stream())
        } else {
            Ok(())
        }
    }

    fn has_pending_text(&self) -> bool {
        self.decoded_pos < self.decoded.len()
            || !self.undecoded.is_empty()
            || self.pending_cr
            || !self.pending_write.is_empty()
    }

    fn reset_decoder(&mut self) {
        self.undecoded.clear();
        self.decoded.clear();
        self.decoded_pos = 0;
        self.pending_cr = false;
    }

    /// Read one chunk from the inner stream into `decoded`. Returns false at
    /// end of input once nothing is left to emit.
    fn decode_chunk(&mut self) -> io::Result<bool> {
        let mut chunk = [0u8; CHUNK_SIZE];
        let n = self.inner.read(&mut chunk)?;
        let at_eof = n == 0;
        if at_eof && self.undecoded.is_empty() && !self.pending_cr {
            return Ok(false);
        }

        self.undecoded.extend_from_slice(&chunk[..n]);
        let text = self.decode(at_eof)?;
        self.translate(&text, at_eof);
        Ok(true)
    }

    fn decode(&mut self, at_eof: bool) -> io::Result<String> {
        let (text, consumed) = decode_utf8(self.errors, &self.undecoded, at_eof)?;
        self.undecoded.drain(..consumed);
        Ok(text)
    }

    fn translate(&mut self, text: &str, at_eof: bool) {
        if self.newline != Newline::Universal {
            self.decoded.extend_from_slice(text.as_bytes());
            return;
        }

        // A trailing '\r' may be the first half of "\r\n"; hold it until the
        // next byte (or end of input) decides.
        for byte in text.bytes() {
            if self.pending_cr {
                self.pending_cr = false;
                self.decoded.push(b'\n');
                if byte == b'\n' {
                    continue;
                }
            }
            if byte == b'\r' {
                self.pending_cr = true;
            } else {
                self.decoded.push(byte);
            }
        }
        if at_eof && self.pending_cr {
            self.pending_cr = false;
            self.decoded.push(b'\n');
        }
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        match self.newline.write_terminator() {
            Some(terminator) if text.contains('\n') => {
                let mut out = Vec::with_capacity(text.len() + text.len() / 8);
                for byte in text.bytes() {
                    if byte == b'\n' {
                        out.extend_from_slice(terminator);
                    } else {
                        out.push(byte);
                    }
                }
                self.inner.write_all(&out)
            }
            _ => self.inner.write_all(text.as_bytes()),
        }
    }

    /// Settle a held-back partial sequence that no later write completed.
    fn finish_pending_write(&mut self) -> io::Result<()> {
        if self.pending_write.is_empty() {
            return Ok(());
        }
        let tail = std::mem::take(&mut self.pending_write);
        let (text, _) = decode_utf8(self.errors, &tail, true)?;
        self.write_text(&text)
    }
}

/// Decode as much of `bytes` as forms complete UTF-8 sequences and return
/// the text with the number of bytes used. An incomplete trailing sequence
/// is left unused, unless the input has ended.
fn decode_utf8(errors: DecodeErrors, bytes: &[u8], at_eof: bool) -> io::Result<(String, usize)> {
    let mut text = String::new();
    let mut rest = bytes;

    while !rest.is_empty() {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                text.push_str(valid);
                rest = &[];
            }
            Err(err) => {
                let (valid, after) = rest.split_at(err.valid_up_to());
                text.push_str(&String::from_utf8_lossy(valid));
                match err.error_len() {
                    Some(len) => {
                        handle_invalid(errors, &mut text, &after[..len])?;
                        rest = &after[len..];
                    }
                    None if at_eof => {
                        handle_invalid(errors, &mut text, after)?;
                        rest = &[];
                    }
                    None => {
                        rest = after;
                        break;
                    }
                }
            }
        }
    }

    Ok((text, bytes.len() - rest.len()))
}

fn handle_invalid(errors: DecodeErrors, text: &mut String, invalid: &[u8]) -> io::Result<()> {
    match errors {
        DecodeErrors::Strict => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid utf-8 sequence {:02x?}", invalid),
        )),
        DecodeErrors::Replace => {
            text.push(char::REPLACEMENT_CHARACTER);
            Ok(())
        }
        DecodeErrors::Ignore => Ok(()),
    }
}

impl<S: Stream> Read for TextStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl<S: Stream> BufRead for TextStream<S> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.ensure_open()?;
        if !self.inner.mode().readable() {
            return Err(unsupported("readable"));
        }
        self.finish_pending_write()?;
        while self.decoded_pos >= self.decoded.len() {
            self.decoded.clear();
            self.decoded_pos = 0;
            if !self.decode_chunk()? {
                break;
            }
        }
        Ok(&self.decoded[self.decoded_pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.decoded_pos = (self.decoded_pos + amt).min(self.decoded.len());
    }
}

impl<S: Stream> Write for TextStream<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.ensure_open()?;
        if !self.inner.mode().writable() {
            return Err(unsupported("writable"));
        }
        self.reset_decoder();

        let mut input = self.pending_write.clone();
        input.extend_from_slice(buf);
        let (text, consumed) = decode_utf8(self.errors, &input, false)?;
        self.write_text(&text)?;
        self.pending_write = input.split_off(consumed);

        if self.line_buffering && buf.iter().any(|&b| b == b'\n' || b == b'\r') {
            self.inner.flush()?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.ensure_open()?;
        self.inner.flush()
    }
}

impl<S: Stream> Seek for TextStream<S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.ensure_open()?;
        match pos {
            SeekFrom::Current(0) if self.has_pending_text() => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "can't tell the position while decoded text is pending",
            )),
            SeekFrom::Current(0) => self.inner.seek(pos),
            SeekFrom::Current(_) => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "can't do nonzero cur-relative seeks",
            )),
            SeekFrom::End(offset) if offset != 0 => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "can't do nonzero end-relative seeks",
            )),
            _ => {
                self.finish_pending_write()?;
                let position = self.inner.seek(pos)?;
                self.reset_decoder();
                Ok(position)
            }
        }
    }
}

impl<S: Stream> Stream for TextStream<S> {
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
        let finished = self.finish_pending_write();
        self.reset_decoder();
        let closed = self.inner.close();
        finished.and(closed)
    }
}
