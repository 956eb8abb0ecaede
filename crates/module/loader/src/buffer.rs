//! Reusable scratch buffer for variable-length reads.
//!
//! Section names are NUL-terminated strings whose length is unknown until a
//! terminator is found, so the resolver reads them in chunks into one
//! reusable buffer. The buffer's logical capacity grows only in fixed
//! increments and is never shrunk during a load; its contents are transient
//! and overwritten on the next use.

use alloc::vec::Vec;

use crate::error::LoadError;

/// Initial logical capacity of a scratch buffer, in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 128;

/// Fixed increment by which a full scratch buffer grows, in bytes.
pub const DEFAULT_BUFFER_INCREMENT: usize = 32;

/// An owned, growable byte region reused across resolver calls.
///
/// The logical capacity is tracked explicitly so growth happens only
/// through [`ensure_capacity`](Self::ensure_capacity) and
/// [`grow`](Self::grow), in increments the caller controls, independent of
/// the allocator's rounding.
#[derive(Debug)]
pub struct ScratchBuffer {
    buf: Vec<u8>,
    cap: usize,
    increment: usize,
}

impl ScratchBuffer {
    /// Creates an empty scratch buffer with the default growth increment.
    ///
    /// No memory is allocated until the first
    /// [`ensure_capacity`](Self::ensure_capacity).
    #[must_use]
    pub fn new() -> Self {
        Self::with_increment(DEFAULT_BUFFER_INCREMENT)
    }

    /// Creates an empty scratch buffer with the given growth increment.
    ///
    /// # Panics
    ///
    /// Panics if `increment` is zero.
    #[must_use]
    pub fn with_increment(increment: usize) -> Self {
        assert!(increment > 0, "scratch buffer increment must be nonzero");
        Self { buf: Vec::new(), cap: 0, increment }
    }

    /// Ensures the logical capacity is at least `n` bytes, preserving any
    /// existing contents.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::OutOfMemory`] if the allocation fails; the
    /// buffer is unchanged in that case.
    pub fn ensure_capacity(&mut self, n: usize) -> Result<(), LoadError> {
        if n > self.cap {
            self.buf
                .try_reserve_exact(n - self.buf.len())
                .map_err(|_| LoadError::OutOfMemory)?;
            self.cap = n;
        }
        Ok(())
    }

    /// Grows the logical capacity by the fixed increment.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::OutOfMemory`] if the allocation fails.
    pub fn grow(&mut self) -> Result<(), LoadError> {
        self.ensure_capacity(self.cap + self.increment)
    }

    /// Discards the contents, keeping the capacity for reuse.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Number of bytes currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if the buffer holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Current logical capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Unused logical capacity in bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cap - self.buf.len()
    }

    /// Appends `len` zeroed bytes within the existing capacity and returns
    /// the newly appended region, typically as the destination of a read.
    ///
    /// # Panics
    ///
    /// Panics if `len` exceeds [`remaining`](Self::remaining). Growth is
    /// explicit; this never allocates.
    pub fn append_zeroed(&mut self, len: usize) -> &mut [u8] {
        assert!(len <= self.remaining(), "append beyond scratch capacity");
        let start = self.buf.len();
        self.buf.resize(start + len, 0);
        &mut self.buf[start..]
    }

    /// The bytes accumulated so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

impl Default for ScratchBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_and_unallocated() {
        let buf = ScratchBuffer::new();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), 0);
        assert_eq!(buf.remaining(), 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn grows_by_fixed_increment() {
        let mut buf = ScratchBuffer::with_increment(32);
        buf.ensure_capacity(128).expect("alloc");
        assert_eq!(buf.capacity(), 128);
        buf.grow().expect("grow");
        assert_eq!(buf.capacity(), 160);
        buf.grow().expect("grow");
        assert_eq!(buf.capacity(), 192);
    }

    #[test]
    fn ensure_capacity_is_monotonic() {
        let mut buf = ScratchBuffer::new();
        buf.ensure_capacity(64).expect("alloc");
        buf.ensure_capacity(16).expect("no-op");
        assert_eq!(buf.capacity(), 64);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut buf = ScratchBuffer::new();
        buf.ensure_capacity(64).expect("alloc");
        buf.append_zeroed(10).copy_from_slice(b"0123456789");
        assert_eq!(buf.len(), 10);
        buf.clear();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), 64);
    }

    #[test]
    fn append_fills_only_the_new_region() {
        let mut buf = ScratchBuffer::new();
        buf.ensure_capacity(8).expect("alloc");
        buf.append_zeroed(3).copy_from_slice(b"abc");
        buf.append_zeroed(2).copy_from_slice(b"de");
        assert_eq!(buf.as_bytes(), b"abcde");
        assert_eq!(buf.remaining(), 3);
    }

    #[test]
    #[should_panic(expected = "append beyond scratch capacity")]
    fn append_past_capacity_panics() {
        let mut buf = ScratchBuffer::new();
        buf.ensure_capacity(4).expect("alloc");
        let _ = buf.append_zeroed(5);
    }
}
