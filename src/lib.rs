//! Asynchronous read-ahead buffering layer over an arbitrary byte-stream
//! source.
//!
//! Wraps a pluggable, blocking byte source (seekable or not) behind a
//! `std::io::Read + std::io::Seek` interface, prefetching into a bounded
//! ring buffer on a background thread so the caller's read cadence is
//! decoupled from the latency of the underlying source. Short forward
//! seeks within the buffered window (plus a small slack) are served by
//! draining the ring instead of re-issuing an inner seek.

mod config;
mod error;
mod inner;
mod interrupt;
mod producer;
mod reader;
mod ring;
mod state;

pub use config::{
    Options, BUFFER_CAPACITY, FILL_CHUNK, HIGH_LATENCY_CONFIG, LOW_LATENCY_CONFIG,
    SHORT_SEEK_THRESHOLD,
};
pub use error::{AsyncIoError, Result};
pub use inner::{InnerSource, SizedSource};
pub use interrupt::{never as never_interrupt, InterruptCb};
pub use reader::AsyncSource;
