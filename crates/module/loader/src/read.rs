//! Positioned-read access to the backing module file.
//!
//! The loader never holds the whole module file in memory; it issues
//! positioned reads through [`ModuleRead`] and lets the surrounding system
//! decide what backs them (a filesystem file, a block device, an initrd
//! image already in RAM).

use core::fmt;

/// Error returned by a positioned read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    /// The backing store reported a failure.
    Device,
    /// Fewer bytes than requested were available. A positioned read either
    /// fills the destination completely or fails; there is no short-read
    /// success case.
    ShortRead,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device => write!(f, "backing store failure"),
            Self::ShortRead => write!(f, "short read"),
        }
    }
}

/// Blocking positioned-read access to a module file.
///
/// `read_at` specifies an explicit file offset rather than relying on a
/// stream cursor, and blocks until `dest` is completely filled or an error
/// occurs.
pub trait ModuleRead {
    /// Reads exactly `dest.len()` bytes starting at `offset` into `dest`.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError`] if the backing store fails or cannot supply
    /// the full range. `dest` contents are unspecified on error.
    fn read_at(&mut self, dest: &mut [u8], offset: u64) -> Result<(), ReadError>;
}

impl<T: ModuleRead + ?Sized> ModuleRead for &mut T {
    fn read_at(&mut self, dest: &mut [u8], offset: u64) -> Result<(), ReadError> {
        (**self).read_at(dest, offset)
    }
}

/// A [`ModuleRead`] over a module image already in memory, such as a module
/// shipped in the initrd.
#[derive(Debug, Clone, Copy)]
pub struct SliceReader<'a> {
    image: &'a [u8],
}

impl<'a> SliceReader<'a> {
    /// Creates a reader over the given in-memory image.
    #[must_use]
    pub fn new(image: &'a [u8]) -> Self {
        Self { image }
    }
}

impl ModuleRead for SliceReader<'_> {
    fn read_at(&mut self, dest: &mut [u8], offset: u64) -> Result<(), ReadError> {
        let start = usize::try_from(offset).map_err(|_| ReadError::ShortRead)?;
        let end = start.checked_add(dest.len()).ok_or(ReadError::ShortRead)?;
        if end > self.image.len() {
            return Err(ReadError::ShortRead);
        }
        dest.copy_from_slice(&self.image[start..end]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_exact_range() {
        let mut reader = SliceReader::new(b"abcdefgh");
        let mut dest = [0u8; 3];
        reader.read_at(&mut dest, 2).expect("in-range read");
        assert_eq!(&dest, b"cde");
    }

    #[test]
    fn zero_length_read_at_end_succeeds() {
        let mut reader = SliceReader::new(b"abc");
        let mut dest = [0u8; 0];
        reader.read_at(&mut dest, 3).expect("empty read");
    }

    #[test]
    fn rejects_range_past_end() {
        let mut reader = SliceReader::new(b"abc");
        let mut dest = [0u8; 2];
        assert_eq!(reader.read_at(&mut dest, 2), Err(ReadError::ShortRead));
        assert_eq!(reader.read_at(&mut dest, 100), Err(ReadError::ShortRead));
    }
}
