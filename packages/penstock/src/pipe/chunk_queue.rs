// FIFO of buffered chunks.
//
// a pipe under steady flow usually holds only a handful of chunks, so the first few
// are stored inline and only the overflow spills to a heap ring. also tracks the byte
// sum of the buffered chunks, which the tests use to cross-check the counters.

use bytes::Bytes;
use std::collections::VecDeque;


// chunks held inline before spilling to the heap.
const INLINE: usize = 2;


pub(super) struct ChunkQueue {
    // front of the queue is inline[0].
    // invariant: inline slots fill front-first; a slot is occupied only if every slot
    // before it is, and the spill is non-empty only while all inline slots are.
    inline: [Option<Bytes>; INLINE],
    spill: VecDeque<Bytes>,
    bytes: u64,
}

impl ChunkQueue {
    /// Construct empty.
    pub(super) fn new() -> Self {
        ChunkQueue {
            inline: [None, None],
            spill: VecDeque::new(),
            bytes: 0,
        }
    }

    /// Sum of the sizes of all buffered chunks.
    pub(super) fn byte_len(&self) -> u64 {
        self.bytes
    }

    /// Push to back.
    pub(super) fn push(&mut self, chunk: Bytes) {
        debug_assert!(!chunk.is_empty(), "empty chunk pushed (internal bug)");
        self.bytes += chunk.len() as u64;
        if self.spill.is_empty() {
            if let Some(slot) = self.inline.iter_mut().find(|slot| slot.is_none()) {
                *slot = Some(chunk);
                return;
            }
        }
        self.spill.push_back(chunk);
    }

    /// Pop from front.
    pub(super) fn pop(&mut self) -> Option<Bytes> {
        let chunk = self.inline[0].take()?;

        // shift the remaining inline chunks forward and backfill from the spill
        for i in 1..INLINE {
            self.inline[i - 1] = self.inline[i].take();
        }
        if self.inline[INLINE - 1].is_none() {
            self.inline[INLINE - 1] = self.spill.pop_front();
        }

        self.bytes -= chunk.len() as u64;
        Some(chunk)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use rand_pcg::Pcg32;

    // drive the queue and a VecDeque with the same operation sequence and assert they
    // never disagree.
    #[test]
    fn vecdeque_equivalence() {
        let mut rng = Pcg32::from_seed(0xdeadbeefdeadbeefdeadbeefdeadbeefu128.to_le_bytes());
        let mut model = VecDeque::<Bytes>::new();
        let mut queue = ChunkQueue::new();
        let mut bytes = 0u64;

        for i in 0u32..10_000 {
            if rng.gen_ratio(52, 100) {
                let chunk_len = rng.gen_range(1..=16usize);
                let mut content = i.to_le_bytes().to_vec();
                content.resize(chunk_len, 0);
                let chunk = Bytes::from(content);
                bytes += chunk.len() as u64;
                model.push_back(chunk.clone());
                queue.push(chunk);
            } else {
                let expect = model.pop_front();
                if let Some(chunk) = &expect {
                    bytes -= chunk.len() as u64;
                }
                assert_eq!(queue.pop(), expect);
            }
            assert_eq!(queue.byte_len(), bytes);
        }
    }
}
