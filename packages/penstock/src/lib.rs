//! Bounded, backpressured, in-process byte pipe built on a resettable broadcast gate.
//!
//! A [`pipe`] moves a byte stream from exactly one producer to exactly one consumer
//! under a fixed byte-count ceiling. The producer suspends once the consumer falls
//! `capacity` bytes behind; the consumer suspends while no bytes are buffered.
//! Suspension never blocks a thread by itself: operations are futures, and a blocking
//! surface is layered on top of them, so the pipe works the same under an async
//! executor or plain threads.
//!
//! The suspension primitive, [`gate::Gate`], is exposed on its own: a resettable
//! one-shot broadcast signal usable wherever an edge-triggered "reset, check, wait,
//! retry" protocol is wanted.

#[macro_use]
extern crate tracing;

pub extern crate bytes;

pub mod gate;
mod pipe;

pub use crate::pipe::api::*;
pub use crate::pipe::io::*;

/// Error types
pub mod error {
    pub use crate::pipe::error::*;
}
