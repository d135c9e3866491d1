use std::io::{self, Read, Seek, SeekFrom};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{info, warn};

use crate::config::Options;
use crate::error::{AsyncIoError, Result};
use crate::inner::InnerSource;
use crate::interrupt::{self, InterruptCb};
use crate::producer;
use crate::ring::Sink;
use crate::state::Shared;

/// Same poll granularity the producer uses for its backpressure wait — a
/// consumer blocked in `read`/`seek` re-checks the interrupt predicate at
/// the same cadence.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

fn strip_scheme(uri: &str) -> &str {
    uri.strip_prefix("async:").unwrap_or(uri)
}

/// The consumer-facing handle: wraps an arbitrary byte source and presents
/// a `Read + Seek` interface to its caller while a background thread keeps
/// the ring buffer full.
pub struct AsyncSource {
    shared: Arc<Shared>,
    abort: Arc<AtomicBool>,
    interrupt: InterruptCb,
    producer: Option<JoinHandle<()>>,
    is_streamed: bool,
    short_seek_threshold: u64,
}

impl AsyncSource {
    /// Opens a source. `opener` is handed the URI with any `async:` scheme
    /// prefix stripped and is expected to perform the blocking open itself;
    /// `interrupt` is the host interrupt predicate, ORed internally with
    /// this instance's abort flag so inner blocking I/O unblocks during
    /// `close`.
    pub fn open(
        uri: &str,
        options: Options,
        interrupt: InterruptCb,
        opener: impl FnOnce(&str) -> io::Result<Box<dyn InnerSource>>,
    ) -> Result<Self> {
        let stripped = strip_scheme(uri);
        let inner = opener(stripped).map_err(AsyncIoError::InnerOpenFailed)?;
        let is_streamed = !inner.is_seekable();
        let logical_size = inner.byte_len().map_or(-1, |n| n as i64);

        let abort = Arc::new(AtomicBool::new(false));
        let wrapped_interrupt = interrupt::or_abort(interrupt, abort.clone());
        let consumer_interrupt = wrapped_interrupt.clone();

        let shared = Arc::new(
            Shared::try_new(options.buffer_capacity, logical_size).map_err(|_| AsyncIoError::NoMemory)?,
        );
        let shared_for_producer = shared.clone();
        let fill_chunk = options.fill_chunk;

        let producer = thread::Builder::new()
            .name("ring-source-producer".into())
            .spawn(move || producer::run(shared_for_producer, inner, wrapped_interrupt, fill_chunk))
            .map_err(|e| AsyncIoError::SyncInitFailed(e.to_string()))?;

        info!(uri = stripped, streamed = is_streamed, "opened async source");

        Ok(Self {
            shared,
            abort,
            interrupt: consumer_interrupt,
            producer: Some(producer),
            is_streamed,
            short_seek_threshold: options.short_seek_threshold,
        })
    }

    /// Whether the underlying source is non-seekable (propagated unchanged
    /// from the inner source).
    pub fn is_streamed(&self) -> bool {
        self.is_streamed
    }

    /// The underlying source's declared size, or a non-positive value if
    /// unknown. Exposed as a query method rather than a `SeekFrom` variant,
    /// since `std::io::Seek` has no "report current size" whence.
    pub fn logical_size(&self) -> i64 {
        self.shared.state.lock().logical_size
    }

    fn interrupted(&self) -> bool {
        (self.interrupt)()
    }

    /// Loop under the mutex, copying buffered bytes out as they become
    /// available, waiting on `cv_consumer` when the ring is empty and not
    /// at EOF. `copy` performs the actual ring-to-destination transfer for
    /// `n` bytes at output offset `written`; parameterizing it lets the
    /// short-seek fast path reuse this loop with a skip-sink instead of a
    /// caller buffer.
    fn read_generic(
        &self,
        size: usize,
        read_complete: bool,
        mut copy: impl FnMut(&mut crate::ring::Ring, usize, usize) -> usize,
    ) -> Result<usize> {
        let mut state = self.shared.state.lock();
        let mut remaining = size;
        let mut written = 0usize;

        loop {
            if self.interrupted() {
                return Err(AsyncIoError::Interrupted);
            }

            let avail = state.ring.occupancy();
            let to_copy = avail.min(remaining);

            if to_copy > 0 {
                let n = copy(&mut state.ring, written, to_copy);
                state.logical_pos += n as i64;
                written += n;
                remaining -= n;
                if remaining == 0 || !read_complete {
                    break;
                }
            } else if state.eof_reached {
                if let Some(err) = state.io_error.clone() {
                    return Err(AsyncIoError::InnerIo(err.to_io()));
                }
                if written == 0 {
                    return Err(AsyncIoError::Eof);
                }
                break;
            } else {
                self.shared.cv_producer.notify_all();
                self.shared.cv_consumer.wait_for(&mut state, POLL_INTERVAL);
            }
        }

        self.shared.cv_producer.notify_all();
        Ok(written)
    }

    fn skip_read(&self, n: usize) -> Result<usize> {
        self.read_generic(n, true, |ring, _offset, n| ring.read_into(Sink::Skip, n))
    }

    /// Fast-path decisions are taken against a freshly locked occupancy
    /// snapshot (occupancy can only grow until a seek is submitted, so a
    /// stale-but-smaller reading is never unsafe); anything outside the
    /// short-seek window and the known-size bounds submits a seek request
    /// to the producer and blocks on `cv_consumer` until it completes.
    pub fn seek_to(&self, pos: SeekFrom) -> Result<i64> {
        let logical_pos = self.shared.state.lock().logical_pos;

        let target = match pos {
            SeekFrom::Start(p) => p as i64,
            SeekFrom::Current(p) => logical_pos + p,
            SeekFrom::End(p) => {
                let size = self.shared.state.lock().logical_size;
                if size <= 0 {
                    return Err(AsyncIoError::InvalidSeek);
                }
                size + p
            }
        };

        if target < 0 {
            return Err(AsyncIoError::InvalidSeek);
        }
        if target == logical_pos {
            return Ok(logical_pos);
        }

        let occupancy = self.shared.state.lock().ring.occupancy() as i64;
        if logical_pos < target && target <= logical_pos + occupancy + self.short_seek_threshold as i64 {
            let to_skip = (target - logical_pos) as usize;
            self.skip_read(to_skip)?;
            return Ok(target);
        }

        let logical_size = self.shared.state.lock().logical_size;
        if logical_size <= 0 {
            return Err(AsyncIoError::InvalidSeek);
        }
        if target > logical_size {
            return Err(AsyncIoError::InvalidSeek);
        }

        let mut state = self.shared.state.lock();
        state.seek.active = true;
        state.seek.target_pos = target;
        state.seek.completed = false;
        state.seek.result = None;
        self.shared.cv_producer.notify_all();

        loop {
            if self.interrupted() {
                return Err(AsyncIoError::Interrupted);
            }
            if state.seek.completed {
                let result = state.seek.result.take().expect("completed seek always carries a result");
                state.seek.completed = false;
                return match result {
                    Ok(pos) => Ok(pos),
                    Err(e) => Err(AsyncIoError::InnerIo(e.to_io())),
                };
            }
            self.shared.cv_consumer.wait_for(&mut state, POLL_INTERVAL);
        }
    }

    /// Signals abort, joins the producer, releases resources. Idempotent —
    /// a second call is a harmless no-op.
    pub fn close(&mut self) {
        self.abort.store(true, Ordering::Release);
        {
            let _state = self.shared.state.lock();
            self.shared.cv_producer.notify_all();
        }
        if let Some(handle) = self.producer.take() {
            if handle.join().is_err() {
                warn!("producer thread panicked during close");
            }
        }
    }
}

impl Read for AsyncSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        match self.read_generic(buf.len(), false, |ring, offset, n| {
            ring.read_into(Sink::Buf(&mut buf[offset..offset + n]), n)
        }) {
            Ok(n) => Ok(n),
            Err(AsyncIoError::Eof) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}

impl Seek for AsyncSource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.seek_to(pos).map(|p| p as u64).map_err(Into::into)
    }
}

impl Drop for AsyncSource {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(feature = "symphonia")]
impl symphonia_core::io::MediaSource for AsyncSource {
    fn is_seekable(&self) -> bool {
        !self.is_streamed
    }

    fn byte_len(&self) -> Option<u64> {
        let size = self.logical_size();
        (size > 0).then_some(size as u64)
    }
}
