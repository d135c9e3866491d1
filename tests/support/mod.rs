use std::io::{self, Read, Seek, SeekFrom};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ring_source::InnerSource;

/// Enables `tracing` output for a test run when `RUST_LOG` is set.
pub fn init_tracing() {
    static ONCE: std::sync::Once = std::sync::Once::new();
    ONCE.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// A deterministic in-memory inner source: byte `i` of the stream is
/// `i mod 251`.
pub struct MemSource {
    data: Vec<u8>,
    pos: u64,
    seekable: bool,
    seek_calls: Arc<AtomicUsize>,
    delay_per_byte: Option<Duration>,
}

pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

impl MemSource {
    pub fn new(len: usize) -> Self {
        Self {
            data: pattern(len),
            pos: 0,
            seekable: true,
            seek_calls: Arc::new(AtomicUsize::new(0)),
            delay_per_byte: None,
        }
    }

    pub fn non_seekable(mut self) -> Self {
        self.seekable = false;
        self
    }

    pub fn with_delay_per_byte(mut self, d: Duration) -> Self {
        self.delay_per_byte = Some(d);
        self
    }

    pub fn seek_calls(&self) -> Arc<AtomicUsize> {
        self.seek_calls.clone()
    }
}

impl Read for MemSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.data.len().saturating_sub(self.pos as usize);
        let n = buf.len().min(remaining);
        if n == 0 {
            return Ok(0);
        }
        buf[..n].copy_from_slice(&self.data[self.pos as usize..self.pos as usize + n]);
        self.pos += n as u64;
        if let Some(delay) = self.delay_per_byte {
            thread::sleep(delay * n as u32);
        }
        Ok(n)
    }
}

impl Seek for MemSource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.seek_calls.fetch_add(1, Ordering::SeqCst);
        let new_pos = match pos {
            SeekFrom::Start(p) => p as i64,
            SeekFrom::Current(p) => self.pos as i64 + p,
            SeekFrom::End(p) => self.data.len() as i64 + p,
        };
        if new_pos < 0 {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "negative seek"));
        }
        self.pos = new_pos as u64;
        Ok(self.pos)
    }
}

impl InnerSource for MemSource {
    fn is_seekable(&self) -> bool {
        self.seekable
    }

    fn byte_len(&self) -> Option<u64> {
        self.seekable.then_some(self.data.len() as u64)
    }
}
