use std::collections::TryReserveError;
use std::io;

use parking_lot::{Condvar, Mutex};

use crate::ring::Ring;

/// A cloneable snapshot of an `io::Error`, so a producer-recorded I/O
/// failure can be read by the consumer more than once before a successful
/// seek clears it.
#[derive(Debug, Clone)]
pub(crate) struct StickyError {
    kind: io::ErrorKind,
    message: String,
}

impl StickyError {
    pub fn from_io(err: &io::Error) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    pub fn to_io(&self) -> io::Error {
        io::Error::new(self.kind, self.message.clone())
    }
}

/// A pending (or just-completed) seek request, serviced by the producer.
///
/// Exactly one of three states holds at any time: no seek in flight
/// (`active = false, completed = false`), a seek in flight (`active = true,
/// completed = false`), or a seek that just completed and awaits
/// consumption (`active = false, completed = true`).
#[derive(Debug, Default)]
pub(crate) struct SeekRequest {
    pub active: bool,
    pub target_pos: i64,
    pub completed: bool,
    pub result: Option<Result<i64, StickyError>>,
}

/// All state shared between the producer and the consumer, protected by a
/// single mutex.
pub(crate) struct State {
    pub ring: Ring,
    /// Offset, in the underlying source's address space, of the next byte
    /// the consumer will receive. Signed so a seek target can be computed
    /// and range-checked before being clamped into an unsigned inner
    /// `SeekFrom::Start` offset.
    pub logical_pos: i64,
    /// Declared total size of the underlying source; negative/zero means
    /// unknown.
    pub logical_size: i64,
    pub eof_reached: bool,
    pub io_error: Option<StickyError>,
    pub seek: SeekRequest,
}

impl State {
    pub fn try_new(capacity: usize, logical_size: i64) -> Result<Self, TryReserveError> {
        Ok(Self {
            ring: Ring::try_new(capacity)?,
            logical_pos: 0,
            logical_size,
            eof_reached: false,
            io_error: None,
            seek: SeekRequest::default(),
        })
    }
}

/// The mutex and the two condition variables that coordinate the producer
/// and the consumer: `cv_consumer` wakes a blocked reader/seeker,
/// `cv_producer` wakes a blocked producer (ring full, or EOF/error
/// reached).
pub(crate) struct Shared {
    pub state: Mutex<State>,
    pub cv_consumer: Condvar,
    pub cv_producer: Condvar,
}

impl Shared {
    pub fn try_new(capacity: usize, logical_size: i64) -> Result<Self, TryReserveError> {
        Ok(Self {
            state: Mutex::new(State::try_new(capacity, logical_size)?),
            cv_consumer: Condvar::new(),
            cv_producer: Condvar::new(),
        })
    }
}
