// pipe error types.
//
// the only failure surface is caller misuse: there is no underlying device, so no
// I/O error arm exists. range errors are detected before any shared state mutates.

use thiserror::Error;


// ==== base error types ====


/// Error for constructing a pipe with a capacity of zero bytes
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[error("pipe capacity must be at least 1 byte")]
pub struct ZeroCapacityError;

/// Error for a buffer/offset/count triple that does not describe a valid range
///
/// Raised synchronously, before the operation touches any shared state, so a
/// rejected call never corrupts or partially applies.
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RangeError {
    /// The offset points past the end of the buffer
    #[error("offset {offset} exceeds buffer length {buf_len}")]
    Offset { offset: usize, buf_len: usize },
    /// The count overruns the buffer past the offset
    #[error("count {count} exceeds the {available} buffer bytes past the offset")]
    Count { count: usize, available: usize },
    /// The count could never be admitted, as it exceeds the pipe's whole capacity
    #[error("count {count} exceeds pipe capacity {capacity}")]
    Capacity { count: usize, capacity: u64 },
}

/// Error for attempting an operation with no or limited blocking, and the operation
/// not completing immediately or by the specified deadline
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[error("operation would block")]
pub struct WouldBlockError;

/// Error for seeking a pipe
///
/// A pipe is append-only on the write side and consume-once on the read side; no
/// form of seeking or length mutation is supported.
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[error("a pipe is not seekable")]
pub struct NotSeekableError;


// ==== compound error types ====


macro_rules! compound_from {
    ($compound:ident {$(
        $variant:ident($inner:ty),
    )*})=>{$(
        impl From<$inner> for $compound {
            fn from(inner: $inner) -> Self {
                Self::$variant(inner)
            }
        }
    )*};
}

/// Error for trying to write with no or limited blocking
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TryWriteError {
    /// The buffer/offset/count arguments were rejected
    #[error(transparent)]
    Range(RangeError),
    /// The operation could not complete immediately or by the specified deadline
    #[error(transparent)]
    WouldBlock(WouldBlockError),
}

compound_from!(TryWriteError {
    Range(RangeError),
    WouldBlock(WouldBlockError),
});

/// Error for trying to read with no or limited blocking
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TryReadError {
    /// The buffer/offset/count arguments were rejected
    #[error(transparent)]
    Range(RangeError),
    /// The operation could not complete immediately or by the specified deadline
    #[error(transparent)]
    WouldBlock(WouldBlockError),
}

compound_from!(TryReadError {
    Range(RangeError),
    WouldBlock(WouldBlockError),
});
