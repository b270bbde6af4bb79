//! Streaming reader for `objects.inv` payloads.
//!
//! An inventory is four plain-text header lines followed by a zlib stream.
//! [`InventoryReader`] hands out the header lines and then turns the rest of
//! the buffer into a lazy sequence of decompressed lines.

use std::iter::FusedIterator;

use flate2::{Decompress, FlushDecompress, Status};

use crate::error::InventoryError;

/// Compressed bytes fed to the inflater per step. Only bounds peak memory.
pub const CHUNK_SIZE: usize = 16 * 1024;

/// Cursor over a raw inventory buffer.
pub struct InventoryReader<'a> {
    buffer: &'a [u8],
    pos: usize,
}

impl<'a> InventoryReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, pos: 0 }
    }

    /// Read one plain-text line, without its line terminator.
    ///
    /// Returns `None` once the buffer is exhausted.
    pub fn read_line(&mut self) -> Option<String> {
        let raw = self.next_raw_line()?;
        let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        Some(String::from_utf8_lossy(raw).into_owned())
    }

    /// Advance past one plain-text line. Returns false at end of buffer.
    pub fn skip_line(&mut self) -> bool {
        self.next_raw_line().is_some()
    }

    /// Switch to the compressed body.
    pub fn compressed_lines(self) -> CompressedLines<'a> {
        CompressedLines::new(&self.buffer[self.pos..])
    }

    fn next_raw_line(&mut self) -> Option<&'a [u8]> {
        if self.pos >= self.buffer.len() {
            return None;
        }
        let rest = &self.buffer[self.pos..];
        let end = rest
            .iter()
            .position(|&b| b == b'\n')
            .map(|idx| idx + 1)
            .unwrap_or(rest.len());
        self.pos += end;
        Some(&rest[..end])
    }
}

/// Lazy, non-restartable sequence of decompressed UTF-8 lines.
///
/// Compressed input is inflated one [`CHUNK_SIZE`] slice at a time; complete
/// lines are yielded as soon as they are available and the partial tail is
/// kept for the next chunk. After an error the iterator is exhausted.
pub struct CompressedLines<'a> {
    input: &'a [u8],
    offset: usize,
    inflater: Decompress,
    pending: Vec<u8>,
    consumed: usize,
    stream_ended: bool,
    done: bool,
}

impl<'a> CompressedLines<'a> {
    /// Decompress a zlib stream (header included).
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            offset: 0,
            inflater: Decompress::new(true),
            pending: Vec::with_capacity(CHUNK_SIZE),
            consumed: 0,
            stream_ended: false,
            done: false,
        }
    }

    /// Next complete line in the pending buffer, as a byte range.
    fn take_line(&mut self) -> Option<(usize, usize)> {
        let start = self.consumed;
        let idx = self.pending[start..].iter().position(|&b| b == b'\n')?;
        self.consumed = start + idx + 1;
        Some((start, start + idx))
    }

    /// Inflate the next slice of input into `pending`.
    fn inflate_chunk(&mut self) -> Result<(), InventoryError> {
        if self.consumed > 0 {
            self.pending.drain(..self.consumed);
            self.consumed = 0;
        }

        let remaining = &self.input[self.offset..];
        let chunk = &remaining[..remaining.len().min(CHUNK_SIZE)];
        let flush = if chunk.is_empty() {
            FlushDecompress::Finish
        } else {
            FlushDecompress::None
        };

        self.pending.reserve(CHUNK_SIZE * 4);
        let in_before = self.inflater.total_in();
        let out_before = self.inflater.total_out();

        let status = self
            .inflater
            .decompress_vec(chunk, &mut self.pending, flush)
            .map_err(|e| InventoryError::Decompression(e.to_string()))?;

        let read = (self.inflater.total_in() - in_before) as usize;
        let written = self.inflater.total_out() - out_before;
        self.offset += read;

        match status {
            Status::StreamEnd => {
                self.stream_ended = true;
                Ok(())
            }
            _ if read == 0 && written == 0 => Err(InventoryError::Decompression(
                "compressed stream ended before its terminator".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn decode(&mut self, start: usize, end: usize) -> Result<String, InventoryError> {
        String::from_utf8(self.pending[start..end].to_vec()).map_err(|e| {
            self.done = true;
            InventoryError::Decompression(format!("line is not valid UTF-8: {e}"))
        })
    }
}

impl Iterator for CompressedLines<'_> {
    type Item = Result<String, InventoryError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            if let Some((start, end)) = self.take_line() {
                return Some(self.decode(start, end));
            }

            if self.stream_ended {
                self.done = true;
                let (start, end) = (self.consumed, self.pending.len());
                self.consumed = end;
                if start < end {
                    return Some(self.decode(start, end));
                }
                return None;
            }

            if let Err(err) = self.inflate_chunk() {
                self.done = true;
                return Some(Err(err));
            }
        }
    }
}

impl FusedIterator for CompressedLines<'_> {}
