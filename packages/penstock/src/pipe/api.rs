// exposed API of pipes.

use super::{
    core::Shared,
    error::*,
    polling::{block_on, Timeout},
};
use bytes::Bytes;
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::{Duration, Instant},
};


/// Create a bounded byte pipe with the given capacity in bytes
///
/// Bytes written into the [`PipeWriter`] become readable from the [`PipeReader`] in
/// strict write order. At most `capacity` bytes may ever be buffered-but-unread; a
/// write that would exceed that suspends until the reader catches up, and a read on
/// an empty pipe suspends until bytes arrive.
///
/// Fails iff `capacity` is zero.
pub fn pipe(capacity: usize) -> Result<(PipeWriter, PipeReader), ZeroCapacityError> {
    if capacity == 0 {
        return Err(ZeroCapacityError);
    }
    debug!(capacity, "created pipe");
    let shared = Shared::new(capacity as u64);
    let writer = PipeWriter {
        shared: Arc::clone(&shared),
    };
    let reader = PipeReader {
        shared,
        partial: None,
    };
    Ok((writer, reader))
}

// validate a buffer/offset/count triple against the framing rules shared by both
// operations. runs before any shared state is touched.
fn validate(buf_len: usize, offset: usize, count: usize, capacity: u64) -> Result<(), RangeError> {
    if offset > buf_len {
        return Err(RangeError::Offset { offset, buf_len });
    }
    let available = buf_len - offset;
    if count > available {
        return Err(RangeError::Count { count, available });
    }
    if count as u64 > capacity {
        return Err(RangeError::Capacity { count, capacity });
    }
    Ok(())
}


/// Producer half of a [`pipe`]
///
/// `&mut self` on [`write`](Self::write) is what enforces the pipe's single-producer
/// contract: two flows writing the same pipe concurrently is unrepresentable rather
/// than merely unsupported.
pub struct PipeWriter {
    shared: Arc<Shared>,
}

impl PipeWriter {
    /// Create a future to write `count` bytes starting at `buf[offset]` into the pipe
    ///
    /// The bytes are copied into one owned chunk at the moment the write is admitted;
    /// the caller's buffer is not retained past resolution. A `count` of zero is a
    /// no-op that still resolves successfully.
    ///
    /// Resolves to `Err` without touching the pipe if the range is malformed or
    /// `count` exceeds the pipe's capacity (such a write could never be admitted).
    ///
    /// See the API of [`WriteFut`]: it is not only a future, but also provides the
    /// API for blocking on the operation or trying it without blocking.
    pub fn write<'a>(&'a mut self, buf: &'a [u8], offset: usize, count: usize) -> WriteFut<'a> {
        match validate(buf.len(), offset, count, self.shared.capacity()) {
            Ok(()) => WriteFut {
                shared: &self.shared,
                src: &buf[offset..offset + count],
                state: FutState::Active,
            },
            Err(err) => WriteFut {
                shared: &self.shared,
                src: &[],
                state: FutState::Invalid(err),
            },
        }
    }

    /// No-op
    ///
    /// Admitted bytes are immediately visible to the reader; nothing is buffered on
    /// the writer side.
    pub fn flush(&mut self) {}
}


/// Consumer half of a [`pipe`]
///
/// `&mut self` on [`read`](Self::read) is what enforces the pipe's single-consumer
/// contract, mirroring [`PipeWriter`].
pub struct PipeReader {
    shared: Arc<Shared>,
    // remainder of a chunk a previous read only partially consumed. served before
    // anything in the shared queue, preserving byte order across chunk splits.
    partial: Option<Bytes>,
}

impl PipeReader {
    /// Create a future to read up to `count` bytes into `buf` starting at `offset`
    ///
    /// Resolves to the number of bytes actually delivered: `0` only when `count` is
    /// `0`, otherwise somewhere in `[1, count]` — a read stops at the end of the
    /// buffered chunk it lands on, so delivering fewer bytes than requested is
    /// routine. Chunk boundaries are otherwise invisible: reads may span or split
    /// the writer's chunks arbitrarily.
    ///
    /// The pipe has no end-of-stream state: if the pipe is empty and the writer
    /// never writes again, this suspends indefinitely, even if the [`PipeWriter`]
    /// is dropped.
    ///
    /// Resolves to `Err` without touching the pipe if the range is malformed or
    /// `count` exceeds the pipe's capacity.
    ///
    /// See the API of [`ReadFut`]: it is not only a future, but also provides the
    /// API for blocking on the operation or trying it without blocking.
    pub fn read<'a>(
        &'a mut self,
        buf: &'a mut [u8],
        offset: usize,
        count: usize,
    ) -> ReadFut<'a> {
        match validate(buf.len(), offset, count, self.shared.capacity()) {
            Ok(()) => ReadFut {
                shared: &self.shared,
                partial: &mut self.partial,
                dst: &mut buf[offset..offset + count],
                state: FutState::Active,
            },
            Err(err) => ReadFut {
                shared: &self.shared,
                partial: &mut self.partial,
                dst: &mut [],
                state: FutState::Invalid(err),
            },
        }
    }
}

macro_rules! counter_api {
    ($($half:ident,)*)=>{$(
        impl $half {
            /// Total bytes ever admitted by writes. Monotonic; readable from any
            /// thread without blocking.
            pub fn length(&self) -> u64 {
                self.shared.length()
            }

            /// Total bytes ever delivered by reads. Monotonic; readable from any
            /// thread without blocking.
            pub fn position(&self) -> u64 {
                self.shared.position()
            }

            /// Bytes buffered but not yet delivered: `length() - position()`.
            /// Never exceeds [`capacity`](Self::capacity).
            pub fn outstanding(&self) -> u64 {
                self.shared.outstanding()
            }

            /// The pipe's fixed ceiling on outstanding bytes.
            pub fn capacity(&self) -> u64 {
                self.shared.capacity()
            }
        }
    )*};
}

counter_api!(PipeWriter, PipeReader,);


// resolution state shared by both future types.
#[derive(Copy, Clone)]
enum FutState {
    // validation rejected the arguments before the future was assembled.
    Invalid(RangeError),
    // may still resolve.
    Active,
    // already resolved; polls return Pending for FusedFuture purposes.
    Terminated,
}


/// Future for writing into a [`PipeWriter`]
///
/// The bytes are not admitted into the pipe until this future resolves. Dropping it
/// unresolved abandons the write without side effects.
pub struct WriteFut<'a> {
    shared: &'a Shared,
    // the exact byte range to admit; empty for a zero-count write or after an early
    // validation failure.
    src: &'a [u8],
    state: FutState,
}

impl Future for WriteFut<'_> {
    type Output = Result<(), RangeError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context) -> Poll<Self::Output> {
        let this = self.get_mut();
        match this.state {
            FutState::Invalid(err) => {
                this.state = FutState::Terminated;
                Poll::Ready(Err(err))
            }
            // for implementation of FusedFuture
            FutState::Terminated => Poll::Pending,
            FutState::Active => {
                if this.src.is_empty() {
                    this.state = FutState::Terminated;
                    return Poll::Ready(Ok(()));
                }
                match this.shared.poll_write(cx, this.src) {
                    Poll::Ready(()) => {
                        this.state = FutState::Terminated;
                        Poll::Ready(Ok(()))
                    }
                    Poll::Pending => Poll::Pending,
                }
            }
        }
    }
}

impl WriteFut<'_> {
    /// Try to resolve this future immediately without blocking
    ///
    /// Panics if this future has already resolved.
    pub fn try_now(&mut self) -> Result<(), TryWriteError> {
        assert!(!self.is_terminated(), "WriteFut used after resolved");
        match block_on(self, Timeout::NonBlocking) {
            Ok(result) => result.map_err(TryWriteError::from),
            Err(()) => Err(WouldBlockError.into()),
        }
    }

    /// Block the calling thread until this future resolves
    ///
    /// Panics if this future has already resolved.
    pub fn block(&mut self) -> Result<(), RangeError> {
        assert!(!self.is_terminated(), "WriteFut used after resolved");
        block_on(self, Timeout::Never)
            .ok()
            .expect("block_on timed out with Timeout::Never")
    }

    /// Block until this future resolves or a timeout elapses
    ///
    /// Panics if this future has already resolved.
    pub fn block_timeout(&mut self, timeout: Duration) -> Result<(), TryWriteError> {
        self.block_deadline(Instant::now() + timeout)
    }

    /// Block until this future resolves or the deadline is reached
    ///
    /// Panics if this future has already resolved.
    pub fn block_deadline(&mut self, deadline: Instant) -> Result<(), TryWriteError> {
        assert!(!self.is_terminated(), "WriteFut used after resolved");
        match block_on(self, Timeout::At(deadline)) {
            Ok(result) => result.map_err(TryWriteError::from),
            Err(()) => Err(WouldBlockError.into()),
        }
    }

    /// Whether this future has already resolved
    pub fn is_terminated(&self) -> bool {
        matches!(self.state, FutState::Terminated)
    }
}

#[cfg(feature = "futures")]
impl futures::future::FusedFuture for WriteFut<'_> {
    fn is_terminated(&self) -> bool {
        Self::is_terminated(self)
    }
}


/// Future for reading from a [`PipeReader`]
///
/// No bytes are consumed from the pipe until this future resolves. Dropping it
/// unresolved abandons the read without side effects.
pub struct ReadFut<'a> {
    shared: &'a Shared,
    partial: &'a mut Option<Bytes>,
    // destination range; empty for a zero-count read or after a validation failure.
    dst: &'a mut [u8],
    state: FutState,
}

impl Future for ReadFut<'_> {
    type Output = Result<usize, RangeError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context) -> Poll<Self::Output> {
        let this = self.get_mut();
        match this.state {
            FutState::Invalid(err) => {
                this.state = FutState::Terminated;
                Poll::Ready(Err(err))
            }
            // for implementation of FusedFuture
            FutState::Terminated => Poll::Pending,
            FutState::Active => {
                // a zero-count read completes trivially, but still counts as a read
                // completion so a backpressure-blocked writer re-evaluates
                if this.dst.is_empty() {
                    this.shared.retire(0);
                    this.state = FutState::Terminated;
                    return Poll::Ready(Ok(0));
                }

                // serve a retained partial chunk before touching the shared queue,
                // otherwise pop (or wait for) the next chunk
                let mut chunk = match this.partial.take() {
                    Some(chunk) => chunk,
                    None => match this.shared.poll_pop(cx) {
                        Poll::Ready(chunk) => chunk,
                        Poll::Pending => return Poll::Pending,
                    },
                };

                let n = chunk.len().min(this.dst.len());
                this.dst[..n].copy_from_slice(&chunk.split_to(n));
                if !chunk.is_empty() {
                    *this.partial = Some(chunk);
                }
                this.shared.retire(n as u64);
                this.state = FutState::Terminated;
                Poll::Ready(Ok(n))
            }
        }
    }
}

impl ReadFut<'_> {
    /// Try to resolve this future immediately without blocking
    ///
    /// Panics if this future has already resolved.
    pub fn try_now(&mut self) -> Result<usize, TryReadError> {
        assert!(!self.is_terminated(), "ReadFut used after resolved");
        match block_on(self, Timeout::NonBlocking) {
            Ok(result) => result.map_err(TryReadError::from),
            Err(()) => Err(WouldBlockError.into()),
        }
    }

    /// Block the calling thread until this future resolves
    ///
    /// The pipe has no end-of-stream state, so this blocks indefinitely if the pipe
    /// is empty and the writer has gone silent. Panics if this future has already
    /// resolved.
    pub fn block(&mut self) -> Result<usize, RangeError> {
        assert!(!self.is_terminated(), "ReadFut used after resolved");
        block_on(self, Timeout::Never)
            .ok()
            .expect("block_on timed out with Timeout::Never")
    }

    /// Block until this future resolves or a timeout elapses
    ///
    /// Panics if this future has already resolved.
    pub fn block_timeout(&mut self, timeout: Duration) -> Result<usize, TryReadError> {
        self.block_deadline(Instant::now() + timeout)
    }

    /// Block until this future resolves or the deadline is reached
    ///
    /// Panics if this future has already resolved.
    pub fn block_deadline(&mut self, deadline: Instant) -> Result<usize, TryReadError> {
        assert!(!self.is_terminated(), "ReadFut used after resolved");
        match block_on(self, Timeout::At(deadline)) {
            Ok(result) => result.map_err(TryReadError::from),
            Err(()) => Err(WouldBlockError.into()),
        }
    }

    /// Whether this future has already resolved
    pub fn is_terminated(&self) -> bool {
        matches!(self.state, FutState::Terminated)
    }
}

#[cfg(feature = "futures")]
impl futures::future::FusedFuture for ReadFut<'_> {
    fn is_terminated(&self) -> bool {
        Self::is_terminated(self)
    }
}


// ==== tests ====


#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use rand_pcg::Pcg32;
    use std::thread;

    // the capacity-16 walkthrough: a short read splits the head chunk, and the
    // follow-up read delivers the remainder rather than the full request.
    #[test]
    fn partial_chunk_framing() {
        let (mut writer, mut reader) = pipe(16).unwrap();
        let data = (0u8..10).collect::<Vec<_>>();
        writer.write(&data, 0, 10).try_now().unwrap();

        let mut buf = [0u8; 16];
        assert_eq!(reader.read(&mut buf, 0, 4).try_now().unwrap(), 4);
        assert_eq!(&buf[..4], &data[..4]);
        assert_eq!(reader.read(&mut buf, 0, 10).try_now().unwrap(), 6);
        assert_eq!(&buf[..6], &data[4..10]);

        assert_eq!(writer.length(), 10);
        assert_eq!(reader.position(), 10);
        assert_eq!(reader.outstanding(), 0);
    }

    // a partial remainder is delivered before any later-queued chunk.
    #[test]
    fn partial_served_before_queue() {
        let (mut writer, mut reader) = pipe(16).unwrap();
        writer.write(b"abcdef", 0, 6).try_now().unwrap();
        writer.write(b"XYZ", 0, 3).try_now().unwrap();

        let mut buf = [0u8; 8];
        assert_eq!(reader.read(&mut buf, 0, 2).try_now().unwrap(), 2);
        assert_eq!(&buf[..2], b"ab");
        // remainder of the first chunk, not the second chunk
        assert_eq!(reader.read(&mut buf, 0, 8).try_now().unwrap(), 4);
        assert_eq!(&buf[..4], b"cdef");
        assert_eq!(reader.read(&mut buf, 0, 8).try_now().unwrap(), 3);
        assert_eq!(&buf[..3], b"XYZ");
    }

    #[test]
    fn zero_capacity_rejected() {
        assert!(matches!(pipe(0), Err(ZeroCapacityError)));
        assert!(pipe(1).is_ok());
    }

    #[test]
    fn argument_validation_before_mutation() {
        let (mut writer, mut reader) = pipe(8).unwrap();
        let buf = [0u8; 4];
        let mut big = [0u8; 16];

        assert!(matches!(
            writer.write(&buf, 5, 0).try_now(),
            Err(TryWriteError::Range(RangeError::Offset { offset: 5, buf_len: 4 })),
        ));
        assert!(matches!(
            writer.write(&buf, 2, 3).try_now(),
            Err(TryWriteError::Range(RangeError::Count { count: 3, available: 2 })),
        ));
        assert!(matches!(
            writer.write(&big, 0, 9).try_now(),
            Err(TryWriteError::Range(RangeError::Capacity { count: 9, capacity: 8 })),
        ));
        assert!(matches!(
            reader.read(&mut big, 17, 0).try_now(),
            Err(TryReadError::Range(RangeError::Offset { offset: 17, buf_len: 16 })),
        ));
        assert!(matches!(
            reader.read(&mut big, 10, 7).try_now(),
            Err(TryReadError::Range(RangeError::Count { count: 7, available: 6 })),
        ));
        assert!(matches!(
            reader.read(&mut big, 0, 9).try_now(),
            Err(TryReadError::Range(RangeError::Capacity { count: 9, capacity: 8 })),
        ));

        // a rejected call never touches a counter
        assert_eq!(writer.length(), 0);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn zero_count_operations_trivially_succeed() {
        let (mut writer, mut reader) = pipe(4).unwrap();
        writer.write(&[], 0, 0).try_now().unwrap();
        assert_eq!(reader.read(&mut [], 0, 0).try_now().unwrap(), 0);
        assert_eq!(writer.length(), 0);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn backpressure_blocks_and_releases() {
        let (mut writer, mut reader) = pipe(4).unwrap();
        writer.write(&[1, 2, 3, 4], 0, 4).try_now().unwrap();

        // full: one more byte cannot be admitted without a read
        assert!(matches!(
            writer.write(&[5], 0, 1).try_now(),
            Err(TryWriteError::WouldBlock(_)),
        ));

        // a zero-count read signals the writer's gate but frees no space
        assert_eq!(reader.read(&mut [], 0, 0).try_now().unwrap(), 0);
        assert!(matches!(
            writer.write(&[5], 0, 1).try_now(),
            Err(TryWriteError::WouldBlock(_)),
        ));

        // delivering one byte frees one byte of capacity
        let mut buf = [0u8; 4];
        assert_eq!(reader.read(&mut buf, 0, 1).try_now().unwrap(), 1);
        assert_eq!(buf[0], 1);
        writer.write(&[5], 0, 1).try_now().unwrap();

        assert_eq!(writer.length(), 5);
        assert_eq!(writer.outstanding(), 4);
    }

    #[test]
    fn empty_pipe_read_would_block() {
        let (_writer, mut reader) = pipe(4).unwrap();
        let mut buf = [0u8; 4];
        assert!(matches!(
            reader.read(&mut buf, 0, 4).try_now(),
            Err(TryReadError::WouldBlock(_)),
        ));
        assert!(matches!(
            reader.read(&mut buf, 0, 1).block_timeout(Duration::from_millis(20)),
            Err(TryReadError::WouldBlock(_)),
        ));
    }

    #[test]
    fn blocked_writer_released_by_read() {
        let (mut writer, mut reader) = pipe(4).unwrap();
        writer.write(&[1, 2, 3, 4], 0, 4).try_now().unwrap();

        let join = thread::spawn(move || {
            writer
                .write(&[5, 6], 0, 2)
                .block_deadline(Instant::now() + Duration::from_secs(5))
                .unwrap();
            writer
        });

        thread::sleep(Duration::from_millis(20));
        let mut buf = [0u8; 4];
        assert_eq!(reader.read(&mut buf, 0, 4).try_now().unwrap(), 4);

        let writer = join.join().unwrap();
        assert_eq!(writer.length(), 6);
        assert_eq!(reader.read(&mut buf, 0, 4).try_now().unwrap(), 2);
        assert_eq!(&buf[..2], &[5, 6]);
    }

    // streams ~100 KB through a capacity-1000 pipe with random write and read sizes
    // on two threads, and checks order preservation, conservation of the counters,
    // and the capacity ceiling along the way.
    #[test]
    fn ordered_stream_under_contention() {
        const TOTAL: usize = 100_000;
        const CAPACITY: u64 = 1000;

        let (mut writer, mut reader) = pipe(CAPACITY as usize).unwrap();
        let data = {
            let mut rng = Pcg32::seed_from_u64(7);
            (0..TOTAL).map(|_| rng.gen()).collect::<Vec<u8>>()
        };
        let expected = data.clone();

        let join_w = thread::spawn(move || {
            let mut rng = Pcg32::seed_from_u64(11);
            let mut at = 0;
            let mut writes = 0u64;
            while at < data.len() {
                let n = rng.gen_range(1..=999).min(data.len() - at);
                writer
                    .write(&data, at, n)
                    .block_deadline(Instant::now() + Duration::from_secs(30))
                    .unwrap();
                at += n;
                writes += 1;
            }
            (writer, writes)
        });
        let join_r = thread::spawn(move || {
            let mut rng = Pcg32::seed_from_u64(13);
            let mut out = Vec::with_capacity(TOTAL);
            let mut buf = vec![0u8; 499];
            let mut reads = 0u64;
            while out.len() < TOTAL {
                let n = rng.gen_range(1..=499usize);
                let got = reader
                    .read(&mut buf, 0, n)
                    .block_deadline(Instant::now() + Duration::from_secs(30))
                    .unwrap();
                assert!(got >= 1 && got <= n);
                out.extend_from_slice(&buf[..got]);
                reads += 1;
                // capacity ceiling holds at every sampled instant
                assert!(reader.outstanding() <= CAPACITY);
            }
            (reader, out, reads)
        });

        let (writer, writes) = join_w.join().unwrap();
        let (reader, out, reads) = join_r.join().unwrap();

        assert!(writes > 0 && reads > 0);
        assert_eq!(out, expected);
        assert_eq!(writer.length(), TOTAL as u64);
        assert_eq!(reader.position(), TOTAL as u64);
        assert_eq!(reader.outstanding(), 0);
    }

    // both sides keep completing operations over a sustained concurrent run.
    #[test]
    fn liveness_under_contention() {
        let (mut writer, mut reader) = pipe(1000).unwrap();
        let deadline = Instant::now() + Duration::from_millis(150);

        let join_w = thread::spawn(move || {
            let mut rng = Pcg32::seed_from_u64(17);
            let chunk = vec![0xabu8; 999];
            let mut writes = 0u64;
            while Instant::now() < deadline {
                let n = rng.gen_range(1..=999usize);
                match writer.write(&chunk, 0, n).block_timeout(Duration::from_millis(50)) {
                    Ok(()) => writes += 1,
                    Err(TryWriteError::WouldBlock(_)) => (),
                    Err(err) => panic!("{}", err),
                }
            }
            writes
        });
        let join_r = thread::spawn(move || {
            let mut rng = Pcg32::seed_from_u64(19);
            let mut buf = vec![0u8; 499];
            let mut reads = 0u64;
            while Instant::now() < deadline {
                let n = rng.gen_range(1..=499usize);
                match reader.read(&mut buf, 0, n).block_timeout(Duration::from_millis(50)) {
                    Ok(_) => reads += 1,
                    Err(TryReadError::WouldBlock(_)) => (),
                    Err(err) => panic!("{}", err),
                }
                assert!(reader.outstanding() <= 1000);
            }
            reads
        });

        assert!(join_w.join().unwrap() > 0);
        assert!(join_r.join().unwrap() > 0);
    }

    // buffered chunk bytes plus the retained partial always equal the counter
    // difference.
    #[test]
    fn buffered_bytes_match_counters() {
        let (mut writer, mut reader) = pipe(32).unwrap();
        writer.write(b"0123456789", 0, 10).try_now().unwrap();
        writer.write(b"abcdef", 0, 6).try_now().unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(reader.read(&mut buf, 0, 4).try_now().unwrap(), 4);

        let partial_len = reader.partial.as_ref().map_or(0, |chunk| chunk.len() as u64);
        assert_eq!(
            reader.shared.queued_bytes() + partial_len,
            reader.outstanding(),
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn async_write_read() {
        let (mut writer, mut reader) = pipe(8).unwrap();

        let producer = tokio::spawn(async move {
            let data = (0u8..64).collect::<Vec<_>>();
            let mut at = 0;
            while at < data.len() {
                let n = 4.min(data.len() - at);
                writer.write(&data, at, n).await.unwrap();
                at += n;
            }
            writer
        });

        let mut out = Vec::new();
        let mut buf = [0u8; 8];
        while out.len() < 64 {
            let got = reader.read(&mut buf, 0, 8).await.unwrap();
            out.extend_from_slice(&buf[..got]);
        }

        let writer = producer.await.unwrap();
        assert_eq!(out, (0u8..64).collect::<Vec<_>>());
        assert_eq!(writer.length(), 64);
        assert_eq!(reader.position(), 64);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn async_backpressure_wakes_writer() {
        let (mut writer, mut reader) = pipe(4).unwrap();
        writer.write(&[1, 2, 3, 4], 0, 4).await.unwrap();

        let producer = tokio::spawn(async move {
            // suspends until the consumer drains some bytes
            writer.write(&[5, 6, 7, 8], 0, 4).await.unwrap();
            writer
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        let mut buf = [0u8; 8];
        let mut out = Vec::new();
        while out.len() < 8 {
            let got = reader.read(&mut buf, 0, 4).await.unwrap();
            out.extend_from_slice(&buf[..got]);
        }

        let writer = producer.await.unwrap();
        assert_eq!(out, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(writer.outstanding(), 0);
    }
}
