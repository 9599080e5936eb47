// blocking resolution layer over the pipe futures.
//
// design based on the pollster crate: a condvar-parked thread stands in for an
// executor. the waker is a plain Arc-backed std::task::Wake, so clones left behind in
// a gate's waiter list stay valid after the blocking call returns; waking a signal
// whose call has already finished just flips a state byte nobody reads again.

use std::{
    future::Future,
    pin::Pin,
    sync::{Arc, Condvar, Mutex},
    task::{Context, Poll, Wake, Waker},
    time::Instant,
};


// timeout for blocking on a future.
pub(crate) enum Timeout {
    // never time out.
    Never,
    // time out at the given deadline.
    At(Instant),
    // time out if the future cannot be resolved without blocking.
    NonBlocking,
}

// synchronization signal state
enum State {
    Empty,
    Waiting,
    Notified,
}

// synchronization signal
struct Signal {
    state: Mutex<State>,
    cond: Condvar,
}

impl Wake for Signal {
    fn wake(self: Arc<Self>) {
        self.wake_by_ref();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        let mut lock = self.state.lock().unwrap();
        match &*lock {
            &State::Notified => (),
            &State::Empty => {
                *lock = State::Notified;
            }
            &State::Waiting => {
                *lock = State::Empty;
                self.cond.notify_one();
            }
        }
    }
}

// poll the future until it resolves, or until the timeout is reached, in which case
// return err.
pub(crate) fn block_on<F>(fut: &mut F, timeout: Timeout) -> Result<F::Output, ()>
where
    F: Future + Unpin,
{
    let signal = Arc::new(Signal {
        state: Mutex::new(State::Empty),
        cond: Condvar::new(),
    });
    let waker = Waker::from(Arc::clone(&signal));
    let mut cx = Context::from_waker(&waker);

    loop {
        // return if ready
        if let Poll::Ready(output) = Pin::new(&mut *fut).poll(&mut cx) {
            return Ok(output);
        }

        // otherwise, block until notification or timeout
        let mut lock = signal.state.lock().unwrap();

        // if a notification is already present, skip to the next loop iteration so as
        // to release the lock and try polling again without blocking.
        if let &State::Notified = &*lock {
            *lock = State::Empty;
            continue;
        }

        // otherwise, actually block until notification or timeout
        debug_assert!(matches!(&*lock, State::Empty));
        *lock = State::Waiting;
        match &timeout {
            // block on mutex + condvar indefinitely
            &Timeout::Never => {
                while let &State::Waiting = &*lock {
                    lock = signal.cond.wait(lock).unwrap();
                }
            }

            // block on mutex + condvar until deadline, at which point return err
            &Timeout::At(deadline) => {
                while let &State::Waiting = &*lock {
                    let Some(duration) = deadline.checked_duration_since(Instant::now()) else {
                        *lock = State::Empty;
                        return Err(());
                    };
                    let (lock2, wait_result) = signal.cond.wait_timeout(lock, duration).unwrap();
                    lock = lock2;
                    if wait_result.timed_out() {
                        *lock = State::Empty;
                        return Err(());
                    }
                }
            }

            // dont block on mutex + condvar, return err instead
            &Timeout::NonBlocking => {
                *lock = State::Empty;
                return Err(());
            }
        }
        *lock = State::Empty;
    }
}
