//! Tunables for the async buffering layer, exposed as a plain `Options`
//! struct with a `Default` impl rather than a builder type.

/// Default ring buffer capacity: 4 MiB.
pub const BUFFER_CAPACITY: usize = 4 * 1024 * 1024;

/// Default short-seek fast-path window: 256 KiB.
pub const SHORT_SEEK_THRESHOLD: u64 = 256 * 1024;

/// Default chunk size for a single producer fill from the inner source.
pub const FILL_CHUNK: usize = 4096;

/// Per-instance tunables, settable at `open` time: a plain struct
/// constructible with `Options { buffer_capacity: 1 << 20,
/// ..Default::default() }`, not a separate builder type.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Ring buffer capacity in bytes.
    pub buffer_capacity: usize,
    /// Forward-seek window (in bytes beyond the buffered tail) satisfied by
    /// draining the ring instead of issuing an inner seek.
    pub short_seek_threshold: u64,
    /// Maximum bytes the producer reads from the inner source per fill.
    pub fill_chunk: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            buffer_capacity: BUFFER_CAPACITY,
            short_seek_threshold: SHORT_SEEK_THRESHOLD,
            fill_chunk: FILL_CHUNK,
        }
    }
}

/// Tuned for sources with high per-read latency (network) where deep
/// read-ahead matters more than memory footprint.
pub const HIGH_LATENCY_CONFIG: Options = Options {
    buffer_capacity: 16 * 1024 * 1024,
    short_seek_threshold: 1024 * 1024,
    fill_chunk: 4096,
};

/// Tuned for local, low-latency sources where a small buffer is enough to
/// smooth scheduling jitter and a bigger one would just waste memory.
pub const LOW_LATENCY_CONFIG: Options = Options {
    buffer_capacity: 512 * 1024,
    short_seek_threshold: 64 * 1024,
    fill_chunk: 4096,
};
