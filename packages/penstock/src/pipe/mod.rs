// implementation of the penstock pipe.
//
// the basic architecture is as such:
//
// pipe halves wrap around an Arc<shared state>
//                                  |
//          /-----------------------/
//          v
//       shared state
//          |
//          |------ it contains a Mutex<chunk_queue::ChunkQueue> holding the buffered
//          |       chunks. the mutex guards only the queue itself; reader and writer
//          |       take it just long enough to push or pop one chunk.
//          |
//          |------ it contains two atomic counters, `length` (bytes ever admitted) and
//          |       `position` (bytes ever delivered), whose difference is the number
//          |       of buffered-but-undelivered bytes.
//          |
//          \------ it contains two gate::Gates, "not empty" and "not full". each
//                  operation follows the edge-triggered protocol: reset the gate,
//                  re-check the condition, and only then suspend on the gate. the
//                  counterpart sets the gate after changing the condition, so a set
//                  that fires between check and registration is caught by the gate's
//                  own signaled flag.
//
// no lock spans the whole pipe, so the two fast paths never contend on a common lock.
//
// the organization of these modules is as such:
//
//      chunk_queue<-------------core: owns the shared state and the suspension logic.
//                          |    ^     narrow and panicky, but fully safe.
//      (crate's gate)<-----/    |
//                               |
//      polling<---------------api: defensive wrapper around core: argument
//                          |    ^  validation, the future types, and the blocking
//                          |    |  resolution surface. re-exported publically.
//                          \----io: std::io stream adapters over the blocking surface.
//
// there is also the error module, which contains the relevant error types, which is
// also re-exported publically.

pub(crate) mod api;
pub(crate) mod error;
pub(crate) mod io;
pub(crate) mod polling;

mod chunk_queue;
mod core;
