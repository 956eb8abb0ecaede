//! Module load state: section-header table ingestion and name lookup.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::str;

use log::{error, trace};
use meson_elf::{ELF64_SHDR_SIZE, Elf64Header, Elf64SectionHeader, SHN_UNDEF};

use crate::buffer::{DEFAULT_BUFFER_SIZE, ScratchBuffer};
use crate::error::LoadError;
use crate::read::ModuleRead;

/// Per-module load state for section-header ingestion.
///
/// Owns the identity-validated file header, the file's total length, the
/// positioned-read source, the loaded section-header table, and a scratch
/// buffer reused across name resolutions. Not designed for concurrent use;
/// callers serialize access, one `LoadState` per in-flight module load.
#[derive(Debug)]
pub struct LoadState<R> {
    ehdr: Elf64Header,
    file_len: u64,
    source: R,
    /// Raw section-header table, exactly `e_shentsize * e_shnum` bytes once
    /// loaded.
    shdrs: Option<Box<[u8]>>,
    scratch: ScratchBuffer,
}

impl<R: ModuleRead> LoadState<R> {
    /// Creates load state for a module whose file header has already been
    /// identity-validated.
    ///
    /// `file_len` is the backing file's total length in bytes; every
    /// header-declared byte range is checked against it before being read.
    #[must_use]
    pub fn new(ehdr: Elf64Header, file_len: u64, source: R) -> Self {
        Self {
            ehdr,
            file_len,
            source,
            shdrs: None,
            scratch: ScratchBuffer::new(),
        }
    }

    /// The parsed file header this state was created with.
    #[must_use]
    pub fn header(&self) -> &Elf64Header {
        &self.ehdr
    }

    /// Total length of the backing file in bytes.
    #[must_use]
    pub fn file_len(&self) -> u64 {
        self.file_len
    }

    /// Number of entries the file header declares in the section-header
    /// table.
    #[must_use]
    pub fn section_count(&self) -> usize {
        usize::from(self.ehdr.e_shnum)
    }

    /// Returns `true` once [`load_section_headers`](Self::load_section_headers)
    /// has succeeded.
    #[must_use]
    pub fn headers_loaded(&self) -> bool {
        self.shdrs.is_some()
    }

    /// Reads the section-header table into memory.
    ///
    /// Validates that the header-declared table range lies inside the file
    /// before sizing the allocation, then reads the whole table with one
    /// positioned read. On any failure the state is left with no table
    /// installed.
    ///
    /// # Errors
    ///
    /// - [`LoadError::InvalidFormat`] if the file declares zero sections or
    ///   an entry size smaller than an ELF64 section header.
    /// - [`LoadError::TruncatedFile`] if the table range exceeds the file
    ///   length (or its arithmetic overflows).
    /// - [`LoadError::OutOfMemory`] if the table allocation fails.
    /// - [`LoadError::Io`] if the positioned read fails.
    ///
    /// # Panics
    ///
    /// Panics if the table is already loaded; loading twice is a
    /// programming error, not a runtime condition.
    pub fn load_section_headers(&mut self) -> Result<(), LoadError> {
        assert!(self.shdrs.is_none(), "section header table already loaded");

        if self.ehdr.e_shnum == 0 {
            error!("module has no sections");
            return Err(LoadError::InvalidFormat);
        }

        if usize::from(self.ehdr.e_shentsize) < ELF64_SHDR_SIZE {
            error!("section header entry size {} too small", self.ehdr.e_shentsize);
            return Err(LoadError::InvalidFormat);
        }

        // Widened arithmetic: u16 * u16 cannot overflow u64, and the sum is
        // checked. This is the load-bearing defense against an attacker
        // forcing an out-of-bounds or enormous read.
        let table_size = u64::from(self.ehdr.e_shentsize) * u64::from(self.ehdr.e_shnum);
        let table_end = self
            .ehdr
            .e_shoff
            .checked_add(table_size)
            .ok_or(LoadError::TruncatedFile)?;
        if table_end > self.file_len {
            error!(
                "section header table [{:#x}, {:#x}) exceeds file length {:#x}",
                self.ehdr.e_shoff, table_end, self.file_len
            );
            return Err(LoadError::TruncatedFile);
        }

        let table_size = usize::try_from(table_size).map_err(|_| LoadError::OutOfMemory)?;
        let mut table = Vec::new();
        table
            .try_reserve_exact(table_size)
            .map_err(|_| LoadError::OutOfMemory)?;
        table.resize(table_size, 0);

        // On read failure `table` is dropped here and no table is installed.
        self.source.read_at(&mut table, self.ehdr.e_shoff)?;
        self.shdrs = Some(table.into_boxed_slice());
        Ok(())
    }

    /// Returns the section header at the given table index.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidFormat`] if `index` is at or past the
    /// declared section count.
    ///
    /// # Panics
    ///
    /// Panics if the section-header table has not been loaded.
    pub fn section_header(&self, index: usize) -> Result<Elf64SectionHeader, LoadError> {
        if index >= self.section_count() {
            error!("section index {index} out of range");
            return Err(LoadError::InvalidFormat);
        }
        let offset = index * usize::from(self.ehdr.e_shentsize);
        Ok(Elf64SectionHeader::parse(self.table(), offset))
    }

    /// Resolves a section's name out of the section-name string table.
    ///
    /// The name is read forward from the string-table section's file offset
    /// plus the header's `sh_name`, in chunks sized to the scratch buffer's
    /// remaining capacity and clamped to the end of the file, until a NUL
    /// terminator turns up. Only the newly appended chunk is scanned for
    /// the terminator; earlier bytes were already scanned. When the buffer
    /// fills without a terminator it grows by a fixed increment.
    ///
    /// Only the overall file length bounds the name, not the string-table
    /// section's declared size, so a name may run into adjacent file
    /// content but never outside the file.
    ///
    /// Returns a view into the scratch buffer, valid until the next
    /// resolver call.
    ///
    /// # Errors
    ///
    /// - [`LoadError::NoStringTable`] if `e_shstrndx` is `SHN_UNDEF`.
    /// - [`LoadError::InvalidFormat`] if `e_shstrndx` is out of range or
    ///   the name is not valid UTF-8.
    /// - [`LoadError::TruncatedFile`] if the name's byte range reaches the
    ///   end of the file without a terminator.
    /// - [`LoadError::OutOfMemory`] if growing the scratch buffer fails.
    /// - [`LoadError::Io`] if a positioned read fails.
    ///
    /// # Panics
    ///
    /// Panics if the section-header table has not been loaded.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "clamped below the scratch buffer's remaining capacity, which is a usize"
    )]
    pub fn resolve_section_name(
        &mut self,
        shdr: &Elf64SectionHeader,
    ) -> Result<&str, LoadError> {
        if self.ehdr.e_shstrndx == SHN_UNDEF {
            error!("module has no section-name string table");
            return Err(LoadError::NoStringTable);
        }
        let shstr = self.section_header(usize::from(self.ehdr.e_shstrndx))?;

        // Absolute file offset of the name: start of the string-table
        // section's data plus the name's offset within it.
        let base = shstr
            .sh_offset
            .checked_add(u64::from(shdr.sh_name))
            .ok_or(LoadError::TruncatedFile)?;

        self.scratch.clear();
        if self.scratch.capacity() == 0 {
            self.scratch.ensure_capacity(DEFAULT_BUFFER_SIZE)?;
        }

        // Accumulate bytes until a NUL terminator turns up. Bounded by the
        // file length: once the read position reaches end-of-file without a
        // terminator, the name is truncated.
        loop {
            let pos = base
                .checked_add(self.scratch.len() as u64)
                .ok_or(LoadError::TruncatedFile)?;
            if pos >= self.file_len {
                error!("section name at {base:#x} runs past end of file");
                return Err(LoadError::TruncatedFile);
            }

            let avail = self.file_len - pos;
            let mut readlen = self.scratch.remaining();
            if readlen as u64 > avail {
                readlen = avail as usize;
            }

            let chunk = self.scratch.append_zeroed(readlen);
            self.source.read_at(chunk, pos)?;

            if let Some(nul) = chunk.iter().position(|&b| b == 0) {
                let name_len = self.scratch.len() - readlen + nul;
                let name = &self.scratch.as_bytes()[..name_len];
                return str::from_utf8(name).map_err(|_| {
                    error!("section name at {base:#x} is not valid UTF-8");
                    LoadError::InvalidFormat
                });
            }

            if self.scratch.remaining() == 0 {
                self.scratch.grow()?;
            }
        }
    }

    /// Finds a section by name, returning its table index.
    ///
    /// Scans headers in table order and resolves each candidate's name; the
    /// first byte-for-byte match wins, preserving the file's declared
    /// section order. A resolver failure on any section aborts the scan —
    /// malformed entries are never skipped.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NotFound`] if no section has the requested
    /// name, or the first resolver error encountered.
    ///
    /// # Panics
    ///
    /// Panics if the section-header table has not been loaded.
    pub fn find_section_by_name(&mut self, name: &str) -> Result<usize, LoadError> {
        for index in 0..self.section_count() {
            let shdr = self.section_header(index)?;
            let candidate = self.resolve_section_name(&shdr)?;
            trace!("section {index}: comparing {candidate:?} against {name:?}");
            if candidate == name {
                return Ok(index);
            }
        }
        Err(LoadError::NotFound)
    }

    /// The loaded section-header table.
    ///
    /// # Panics
    ///
    /// Panics if the table has not been loaded; calling name resolution
    /// before [`load_section_headers`](Self::load_section_headers) is a
    /// programming error.
    fn table(&self) -> &[u8] {
        self.shdrs
            .as_deref()
            .expect("section header table not loaded")
    }
}
