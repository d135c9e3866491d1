use std::io;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::inner::InnerSource;
use crate::interrupt::InterruptCb;
use crate::state::{Shared, StickyError};

/// How often a blocked producer re-checks the interrupt predicate while
/// waiting on `cv_producer`. Bounds cancellation latency for the case
/// where the host interrupt fires while the ring is full or at EOF and
/// nothing else would otherwise wake the wait.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The producer loop: honour abort/interrupt, service a pending seek,
/// else fill the ring, else wait. Runs on its own `std::thread`, joined by
/// `close` — not a `tokio` task, since the work here is synchronous inner
/// I/O performed deliberately outside the mutex.
pub(crate) fn run(shared: Arc<Shared>, mut inner: Box<dyn InnerSource>, interrupt: InterruptCb, fill_chunk: usize) {
    let mut scratch = vec![0u8; fill_chunk];

    loop {
        if interrupt() {
            let mut state = shared.state.lock();
            state.eof_reached = true;
            state.io_error = Some(StickyError::from_io(&io::Error::new(
                io::ErrorKind::Interrupted,
                "interrupted",
            )));
            shared.cv_consumer.notify_all();
            debug!("producer: interrupted, exiting");
            return;
        }

        let pending_target = {
            let state = shared.state.lock();
            state.seek.active.then_some(state.seek.target_pos)
        };

        if let Some(target) = pending_target {
            service_seek(&shared, &mut *inner, target);
            continue;
        }

        let (free, eof) = {
            let state = shared.state.lock();
            (state.ring.space(), state.eof_reached)
        };

        if eof || free == 0 {
            let mut state = shared.state.lock();
            shared.cv_consumer.notify_all();
            shared.cv_producer.wait_for(&mut state, POLL_INTERVAL);
            continue;
        }

        fill(&shared, &mut *inner, free.min(fill_chunk), &mut scratch);
    }
}

fn service_seek(shared: &Arc<Shared>, inner: &mut dyn InnerSource, target: i64) {
    debug!(target, "producer: servicing seek");
    let seek_result = if target < 0 {
        Err(io::Error::new(io::ErrorKind::InvalidInput, "negative seek target"))
    } else {
        inner
            .seek(io::SeekFrom::Start(target as u64))
            .map(|p| p as i64)
    };

    let mut state = shared.state.lock();
    match &seek_result {
        Ok(pos) => {
            state.eof_reached = false;
            state.io_error = None;
            state.logical_pos = *pos;
        }
        Err(e) => {
            warn!(error = %e, "producer: seek failed");
            state.eof_reached = true;
            state.io_error = Some(StickyError::from_io(e));
        }
    }
    state.ring.reset();
    state.seek.result = Some(seek_result.map_err(|e| StickyError::from_io(&e)));
    state.seek.completed = true;
    state.seek.active = false;
    shared.cv_consumer.notify_all();
}

/// Reads up to `want` bytes from the inner source into `scratch` (reused
/// across calls to avoid an allocation per fill) with the mutex released,
/// then reacquires it only to commit the result into the ring. This keeps
/// the blocking `inner.read()` entirely outside `M`, matching how
/// `service_seek` already calls `inner.seek` before locking — per spec.md
/// §4.2/§5, the producer must hold the mutex only around state mutation and
/// signalling, never around the blocking call into the inner source.
fn fill(shared: &Arc<Shared>, inner: &mut dyn InnerSource, want: usize, scratch: &mut [u8]) {
    if want == 0 {
        return;
    }
    let want = want.min(scratch.len());
    let read_result = inner.read(&mut scratch[..want]);

    let mut state = shared.state.lock();

    // A seek may have been submitted while this read was in flight. The
    // producer must not write to the ring while a seek is active (spec.md
    // §3 invariants), and `service_seek` is about to reset it anyway, so
    // these bytes — and any EOF/error they carried — are discarded.
    if state.seek.active {
        trace!("producer: discarding fill result, seek became active mid-read");
        shared.cv_consumer.notify_all();
        return;
    }

    match read_result {
        Ok(0) => {
            trace!("producer: inner source reached EOF");
            state.eof_reached = true;
        }
        Ok(n) => {
            let mut cursor = 0;
            let committed = state
                .ring
                .write_from(n, |dst| {
                    let len = dst.len();
                    dst.copy_from_slice(&scratch[cursor..cursor + len]);
                    cursor += len;
                    Ok(len)
                })
                .expect("copying already-read bytes into the ring cannot fail");
            trace!(bytes = committed, "producer: filled ring");
        }
        Err(e) => {
            warn!(error = %e, "producer: inner read failed");
            state.eof_reached = true;
            state.io_error = Some(StickyError::from_io(&e));
        }
    }
    shared.cv_consumer.notify_all();
}
