// shared state of a pipe and the suspension logic over it. minimal and panicky; the
// api module wraps this into the defensive public surface.

use super::chunk_queue::ChunkQueue;
use crate::gate::Gate;
use bytes::Bytes;
use std::{
    sync::{
        atomic::{
            AtomicU64,
            Ordering::{AcqRel, Acquire},
        },
        Arc, Mutex,
    },
    task::{Context, Poll},
};


pub(crate) struct Shared {
    // fixed at construction, always at least 1.
    capacity: u64,
    // buffered chunks. this mutex guards only the queue itself.
    chunks: Mutex<ChunkQueue>,
    // total bytes ever admitted by writes. only the writer increments it.
    length: AtomicU64,
    // total bytes ever delivered by reads. only the reader increments it.
    // invariant: position <= length at every instant.
    position: AtomicU64,
    // edge-triggered wakeup for the reader: set whenever a chunk is enqueued.
    not_empty: Gate,
    // edge-triggered wakeup for the writer: set whenever a read completes.
    not_full: Gate,
}

impl Shared {
    pub(crate) fn new(capacity: u64) -> Arc<Self> {
        debug_assert!(capacity > 0);
        Arc::new(Shared {
            capacity,
            chunks: Mutex::new(ChunkQueue::new()),
            length: AtomicU64::new(0),
            position: AtomicU64::new(0),
            not_empty: Gate::new(),
            not_full: Gate::new(),
        })
    }

    pub(crate) fn capacity(&self) -> u64 {
        self.capacity
    }

    pub(crate) fn length(&self) -> u64 {
        self.length.load(Acquire)
    }

    pub(crate) fn position(&self) -> u64 {
        self.position.load(Acquire)
    }

    // buffered-but-undelivered bytes. position is read first: both counters only ever
    // grow and position never passes length, so reading in this order cannot
    // underflow, only overestimate, which is the safe direction for admission.
    pub(crate) fn outstanding(&self) -> u64 {
        let position = self.position.load(Acquire);
        let length = self.length.load(Acquire);
        length - position
    }

    // writer side. admits `src` as one owned chunk once capacity allows, suspending
    // on the not-full gate otherwise. src must be non-empty and no longer than
    // capacity.
    pub(crate) fn poll_write(&self, cx: &mut Context, src: &[u8]) -> Poll<()> {
        debug_assert!(!src.is_empty());
        debug_assert!(src.len() as u64 <= self.capacity);
        loop {
            // reset before checking, so a grant that fires mid-check is not missed
            self.not_full.reset();
            if self.outstanding() + src.len() as u64 <= self.capacity {
                // length is bumped before the chunk becomes visible, so position can
                // never observably pass length
                self.length.fetch_add(src.len() as u64, AcqRel);
                let mut chunks = self.chunks.lock().unwrap();
                chunks.push(Bytes::copy_from_slice(src));
                debug_assert!(chunks.byte_len() <= self.capacity);
                drop(chunks);
                self.not_empty.set();
                return Poll::Ready(());
            }
            trace!(incoming = src.len(), "write suspending on backpressure");
            match self.not_full.poll_wait(cx) {
                Poll::Ready(()) => continue,
                Poll::Pending => return Poll::Pending,
            }
        }
    }

    // reader side. pops the next chunk, suspending on the not-empty gate while the
    // queue is empty.
    pub(crate) fn poll_pop(&self, cx: &mut Context) -> Poll<Bytes> {
        loop {
            self.not_empty.reset();
            if let Some(chunk) = self.chunks.lock().unwrap().pop() {
                return Poll::Ready(chunk);
            }
            trace!("read suspending on empty pipe");
            match self.not_empty.poll_wait(cx) {
                Poll::Ready(()) => continue,
                Poll::Pending => return Poll::Pending,
            }
        }
    }

    // account for `n` bytes delivered to the reader, and let a backpressure-blocked
    // writer re-evaluate. called on every read completion, even for n = 0.
    pub(crate) fn retire(&self, n: u64) {
        self.position.fetch_add(n, AcqRel);
        self.not_full.set();
    }

    // bytes currently sitting in the chunk queue. test hook for the conservation
    // invariant; not part of the fast path.
    #[cfg(test)]
    pub(crate) fn queued_bytes(&self) -> u64 {
        self.chunks.lock().unwrap().byte_len()
    }
}
