//! Resettable one-shot broadcast signal.

use smallvec::SmallVec;
use std::{
    future::Future,
    mem::take,
    pin::Pin,
    sync::Mutex,
    task::{Context, Poll, Waker},
};


// waiters stored inline before spilling to the heap. a pipe parks at most one task
// per gate, so the common case never allocates.
const INLINE_WAITERS: usize = 2;


/// Resettable one-shot broadcast signal.
///
/// A `Gate` is edge-triggered: [`set`](Self::set) releases every waiter registered
/// since the last [`reset`](Self::reset), and the flag stays up until the next reset,
/// so a waiter arriving after the set resolves immediately. Waiters are released by
/// waking their [`Waker`]s, which schedules the suspended tasks on whatever executor
/// drives them; the gate never polls or runs anything on the caller's stack.
///
/// The intended protocol for guarding a condition is "reset, check the condition,
/// wait, retry". This is free of lost wakeups because the check of the signaled flag
/// and the registration of the waker happen in one critical section under the gate's
/// mutex: a `set` racing a registration either lands before the poll (the poll
/// observes the flag) or after it (the registered waker is drained and woken).
///
/// All operations are infallible. This is pure synchronization, not I/O.
pub struct Gate {
    lockable: Mutex<Lockable>,
}

struct Lockable {
    signaled: bool,
    // invariant: non-empty only while signaled is false
    waiters: SmallVec<[Waker; INLINE_WAITERS]>,
}

impl Gate {
    /// Construct unsignaled, with no waiters.
    pub fn new() -> Self {
        Gate {
            lockable: Mutex::new(Lockable {
                signaled: false,
                waiters: SmallVec::new(),
            }),
        }
    }

    /// Unconditionally clear the signaled flag.
    ///
    /// Waiters registered before the reset remain registered; they are released by
    /// the next [`set`](Self::set).
    pub fn reset(&self) {
        self.lockable.lock().unwrap().signaled = false;
    }

    /// Set the signaled flag and release every pending waiter.
    ///
    /// The entire waiter list is detached under the gate's mutex and woken with the
    /// lock released, so a released task that immediately re-enters the gate cannot
    /// deadlock. Idempotent if called again before the next [`reset`](Self::reset).
    pub fn set(&self) {
        let waiters = {
            let mut lock = self.lockable.lock().unwrap();
            lock.signaled = true;
            take(&mut lock.waiters)
        };
        for waiter in waiters {
            waiter.wake();
        }
    }

    /// Whether the gate is currently signaled.
    pub fn is_set(&self) -> bool {
        self.lockable.lock().unwrap().signaled
    }

    /// Future resolving once the gate is set.
    ///
    /// Resolves immediately if the gate is already signaled.
    pub fn wait(&self) -> Wait<'_> {
        Wait {
            gate: self,
            terminated: false,
        }
    }

    // check-and-register as one critical section. waker registrations from re-polls
    // of the same task are collapsed via will_wake.
    pub(crate) fn poll_wait(&self, cx: &mut Context) -> Poll<()> {
        let mut lock = self.lockable.lock().unwrap();
        if lock.signaled {
            return Poll::Ready(());
        }
        if !lock.waiters.iter().any(|waiter| waiter.will_wake(cx.waker())) {
            lock.waiters.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}

/// Future returned by [`Gate::wait`].
pub struct Wait<'a> {
    gate: &'a Gate,
    // already resolved; polls return Pending for FusedFuture purposes.
    terminated: bool,
}

impl Wait<'_> {
    /// Whether this future has already resolved
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }
}

impl Future for Wait<'_> {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context) -> Poll<()> {
        // for implementation of FusedFuture
        if self.terminated {
            return Poll::Pending;
        }
        match self.gate.poll_wait(cx) {
            Poll::Ready(()) => {
                self.terminated = true;
                Poll::Ready(())
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(feature = "futures")]
impl futures::future::FusedFuture for Wait<'_> {
    fn is_terminated(&self) -> bool {
        Self::is_terminated(self)
    }
}
