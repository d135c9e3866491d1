use std::collections::TryReserveError;
use std::io;

/// Where a ring read lands: a caller buffer, or nowhere at all.
///
/// The `Skip` variant backs the short-seek fast path: bytes are discarded
/// in place of an underlying seek, so the consumer never allocates a
/// throwaway buffer just to advance past them.
pub enum Sink<'a> {
    Buf(&'a mut [u8]),
    Skip,
}

/// A fixed-capacity FIFO of raw bytes.
///
/// Not thread-safe on its own — callers hold the shared mutex for the
/// duration of any `write_from`/`read_into`/`reset` call.
pub struct Ring {
    buf: Vec<u8>,
    capacity: usize,
    head: usize,
    tail: usize,
    occupancy: usize,
}

impl Ring {
    /// Allocates a ring of the given capacity, reporting allocation failure
    /// instead of aborting the process the way `vec![0u8; capacity]` would.
    /// `try_reserve_exact` surfaces the allocator's failure as an `Err`
    /// before anything is initialized; the zero-fill that follows cannot
    /// itself trigger a further allocation since the capacity is already
    /// reserved.
    pub fn try_new(capacity: usize) -> Result<Self, TryReserveError> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(capacity)?;
        buf.resize(capacity, 0);
        Ok(Self {
            buf,
            capacity,
            head: 0,
            tail: 0,
            occupancy: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn occupancy(&self) -> usize {
        self.occupancy
    }

    pub fn space(&self) -> usize {
        self.capacity - self.occupancy
    }

    /// Reserves up to `n` contiguous-or-wraparound slots starting at the
    /// write cursor and invokes `read_fn` once (or twice, on wrap) to fill
    /// them, advancing the write cursor by the total bytes produced.
    ///
    /// `read_fn` is the inner source's `read`: `Ok(0)` signals EOF, `Err`
    /// propagates verbatim.
    pub fn write_from(
        &mut self,
        n: usize,
        mut read_fn: impl FnMut(&mut [u8]) -> io::Result<usize>,
    ) -> io::Result<usize> {
        let n = n.min(self.space());
        if n == 0 {
            return Ok(0);
        }

        let first_len = n.min(self.capacity - self.tail);
        let written = read_fn(&mut self.buf[self.tail..self.tail + first_len])?;
        self.tail = (self.tail + written) % self.capacity;
        self.occupancy += written;

        // Only attempt the wrap-around half if the first call filled
        // completely; a short first read means the source is either out
        // of data right now or at EOF, and the producer will retry.
        if written == first_len && written < n {
            let second_len = n - written;
            let second_written = read_fn(&mut self.buf[self.tail..self.tail + second_len])?;
            self.tail = (self.tail + second_written) % self.capacity;
            self.occupancy += second_written;
            return Ok(written + second_written);
        }

        Ok(written)
    }

    /// Copies (or skips) up to `n` bytes from the read cursor, advancing it
    /// and decrementing occupancy by the amount actually consumed.
    pub fn read_into(&mut self, dst: Sink<'_>, n: usize) -> usize {
        let n = n.min(self.occupancy);
        if n == 0 {
            return 0;
        }

        let first_len = n.min(self.capacity - self.head);
        match dst {
            Sink::Buf(buf) => {
                buf[..first_len].copy_from_slice(&self.buf[self.head..self.head + first_len]);
                if n > first_len {
                    buf[first_len..n].copy_from_slice(&self.buf[..n - first_len]);
                }
            }
            Sink::Skip => {}
        }

        self.head = (self.head + n) % self.capacity;
        self.occupancy -= n;
        n
    }

    /// Clears occupancy to zero. Called only after a seek.
    pub fn reset(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.occupancy = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ring_reports_full_space() {
        let ring = Ring::try_new(16).unwrap();
        assert_eq!(ring.space(), 16);
        assert_eq!(ring.occupancy(), 0);
    }

    #[test]
    fn write_then_read_round_trips() {
        let mut ring = Ring::try_new(16).unwrap();
        let src = [1u8, 2, 3, 4, 5];
        let mut cursor = 0;
        let written = ring
            .write_from(5, |dst| {
                let n = dst.len().min(src.len() - cursor);
                dst[..n].copy_from_slice(&src[cursor..cursor + n]);
                cursor += n;
                Ok(n)
            })
            .unwrap();
        assert_eq!(written, 5);
        assert_eq!(ring.occupancy(), 5);

        let mut out = [0u8; 5];
        let read = ring.read_into(Sink::Buf(&mut out), 5);
        assert_eq!(read, 5);
        assert_eq!(out, src);
        assert_eq!(ring.occupancy(), 0);
    }

    #[test]
    fn write_wraps_around_capacity() {
        let mut ring = Ring::try_new(8).unwrap();
        // Fill 6, drain 6, so head/tail sit at 6 — next write of 4 bytes
        // must wrap.
        ring.write_from(6, |dst| {
            dst.fill(0xAA);
            Ok(dst.len())
        })
        .unwrap();
        ring.read_into(Sink::Skip, 6);

        let pattern = [1u8, 2, 3, 4];
        let mut cursor = 0;
        ring.write_from(4, |dst| {
            let n = dst.len().min(pattern.len() - cursor);
            dst[..n].copy_from_slice(&pattern[cursor..cursor + n]);
            cursor += n;
            Ok(n)
        })
        .unwrap();
        assert_eq!(ring.occupancy(), 4);

        let mut out = [0u8; 4];
        ring.read_into(Sink::Buf(&mut out), 4);
        assert_eq!(out, pattern);
    }

    #[test]
    fn skip_sink_advances_without_copying() {
        let mut ring = Ring::try_new(8).unwrap();
        ring.write_from(8, |dst| {
            dst.fill(7);
            Ok(dst.len())
        })
        .unwrap();
        let skipped = ring.read_into(Sink::Skip, 3);
        assert_eq!(skipped, 3);
        assert_eq!(ring.occupancy(), 5);
    }

    #[test]
    fn reset_clears_occupancy() {
        let mut ring = Ring::try_new(8).unwrap();
        ring.write_from(8, |dst| {
            dst.fill(1);
            Ok(dst.len())
        })
        .unwrap();
        ring.reset();
        assert_eq!(ring.occupancy(), 0);
        assert_eq!(ring.space(), 8);
    }

    #[test]
    fn write_from_propagates_eof() {
        let mut ring = Ring::try_new(8).unwrap();
        let written = ring.write_from(8, |_| Ok(0)).unwrap();
        assert_eq!(written, 0);
    }

    #[test]
    fn write_from_propagates_error() {
        let mut ring = Ring::try_new(8).unwrap();
        let result = ring.write_from(8, |_| Err(io::Error::new(io::ErrorKind::Other, "boom")));
        assert!(result.is_err());
    }

    #[test]
    fn try_new_reports_allocation_failure_instead_of_aborting() {
        let result = Ring::try_new(usize::MAX);
        assert!(result.is_err(), "no allocator can satisfy a usize::MAX byte reservation");
    }
}
