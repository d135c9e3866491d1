use std::io::{self, Read, Seek};

/// The contract the wrapped byte source must satisfy.
///
/// Shaped like `symphonia_core::io::MediaSource` (`Read + Seek + Send`, plus
/// a size query and a seekability flag) — a narrow interface handed in at
/// construction rather than a subclass relationship. Only the producer
/// thread ever calls into this trait; the consumer API never touches it
/// directly.
pub trait InnerSource: Read + Seek + Send {
    /// Whether this source supports seeking at all. A `false` here forces
    /// every consumer `seek` outside the short-seek window to fail with
    /// `InvalidSeek`.
    fn is_seekable(&self) -> bool;

    /// Total size in bytes, if known. `None` means unknown/unbounded.
    fn byte_len(&self) -> Option<u64>;
}

/// Blanket helper so any `Read + Seek + Send` type that also knows its own
/// length can be adapted into an `InnerSource` without a newtype.
pub struct SizedSource<T> {
    inner: T,
    size: Option<u64>,
}

impl<T: Read + Seek + Send> SizedSource<T> {
    pub fn new(inner: T, size: Option<u64>) -> Self {
        Self { inner, size }
    }
}

impl<T: Read + Seek + Send> Read for SizedSource<T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<T: Read + Seek + Send> Seek for SizedSource<T> {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl<T: Read + Seek + Send> InnerSource for SizedSource<T> {
    fn is_seekable(&self) -> bool {
        self.size.is_some()
    }

    fn byte_len(&self) -> Option<u64> {
        self.size
    }
}
