// std::io stream adapters over the pipe halves, so byte-stream consumers (parsers,
// archive readers, and the like) can sit directly on a pipe without knowing anything
// about it beyond the generic stream contract.

use super::{
    api::{PipeReader, PipeWriter},
    error::{NotSeekableError, RangeError},
};
use std::io::{self, Read, Seek, SeekFrom, Write};


fn invalid_input(err: RangeError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, err)
}

fn not_seekable() -> io::Error {
    io::Error::new(io::ErrorKind::Unsupported, NotSeekableError)
}


/// Blocking [`std::io::Write`] adapter over a [`PipeWriter`]
pub struct BlockingPipeWriter(PipeWriter);

impl PipeWriter {
    /// Convert into a blocking [`std::io::Write`] stream
    pub fn into_blocking(self) -> BlockingPipeWriter {
        BlockingPipeWriter(self)
    }
}

impl BlockingPipeWriter {
    /// Recover the suspension-based half
    pub fn into_inner(self) -> PipeWriter {
        self.0
    }
}

impl Write for BlockingPipeWriter {
    /// Blocks until some prefix of `buf` is admitted.
    ///
    /// A single pipe write can admit at most `capacity` bytes, so a larger `buf` is
    /// clamped rather than rejected; the short return count tells the caller to
    /// continue, per the `io::Write` contract.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let count = self.0.capacity().min(buf.len() as u64) as usize;
        if count == 0 {
            return Ok(0);
        }
        self.0.write(buf, 0, count).block().map_err(invalid_input)?;
        Ok(count)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush();
        Ok(())
    }
}

impl Seek for BlockingPipeWriter {
    /// Always fails: a pipe is append-only and non-seekable.
    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Err(not_seekable())
    }
}


/// Blocking [`std::io::Read`] adapter over a [`PipeReader`]
pub struct BlockingPipeReader(PipeReader);

impl PipeReader {
    /// Convert into a blocking [`std::io::Read`] stream
    pub fn into_blocking(self) -> BlockingPipeReader {
        BlockingPipeReader(self)
    }
}

impl BlockingPipeReader {
    /// Recover the suspension-based half
    pub fn into_inner(self) -> PipeReader {
        self.0
    }
}

impl Read for BlockingPipeReader {
    /// Blocks until at least one byte is available (unless `buf` is empty).
    ///
    /// The pipe has no end-of-stream state, so this never returns the conventional
    /// `Ok(0)` end-of-file for a non-empty `buf`: if the writer has gone silent, it
    /// blocks indefinitely instead.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let count = self.0.capacity().min(buf.len() as u64) as usize;
        if count == 0 {
            return Ok(0);
        }
        self.0.read(buf, 0, count).block().map_err(invalid_input)
    }
}

impl Seek for BlockingPipeReader {
    /// Always fails: a pipe is consume-once and non-seekable.
    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Err(not_seekable())
    }
}
