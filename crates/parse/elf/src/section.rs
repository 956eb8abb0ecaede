//! ELF64 section header parsing.
//!
//! Zero-copy, zero-allocation extraction of ELF64 section header records
//! from raw bytes. A [`Elf64SectionHeader`] is a plain value copied out of
//! the section-header table; it never owns or borrows the table memory.

use bitflags::bitflags;

use crate::header::{le_u32, le_u64};

/// Section type: inactive header.
pub const SHT_NULL: u32 = 0;

/// Section type: program-defined contents.
pub const SHT_PROGBITS: u32 = 1;

/// Section type: symbol table.
pub const SHT_SYMTAB: u32 = 2;

/// Section type: string table.
pub const SHT_STRTAB: u32 = 3;

/// Section type: occupies no file space (`.bss`).
pub const SHT_NOBITS: u32 = 8;

/// Special section index: undefined.
///
/// As the file header's `e_shstrndx`, this marks a file with no
/// section-name string table.
pub const SHN_UNDEF: u16 = 0;

/// Size of an ELF64 section header entry (64 bytes).
pub const ELF64_SHDR_SIZE: usize = 64;

bitflags! {
    /// Section header flags (`sh_flags`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SectionFlags: u64 {
        /// Writable data.
        const WRITE = 0x1;
        /// Occupies memory during execution.
        const ALLOC = 0x2;
        /// Executable machine instructions.
        const EXECINSTR = 0x4;
        /// Contents may be merged to eliminate duplication.
        const MERGE = 0x10;
        /// Contents are NUL-terminated strings.
        const STRINGS = 0x20;
        /// `sh_info` contains a section header table index.
        const INFO_LINK = 0x40;
    }
}

/// Parsed ELF64 section header entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elf64SectionHeader {
    /// Offset into the section-name string table for this section's name.
    pub sh_name: u32,
    /// Section type (`SHT_SYMTAB`, `SHT_STRTAB`, etc.).
    pub sh_type: u32,
    /// Section flags.
    pub sh_flags: u64,
    /// Virtual address of the section in memory (0 for non-loaded sections).
    pub sh_addr: u64,
    /// File offset of the section data.
    pub sh_offset: u64,
    /// Size of the section data in bytes.
    pub sh_size: u64,
    /// Associated section index (e.g., `.strtab` index for `.symtab`).
    pub sh_link: u32,
    /// Extra info (interpretation depends on section type).
    pub sh_info: u32,
    /// Required alignment of the section (must be a power of two).
    pub sh_addralign: u64,
    /// Size of each entry (for sections with fixed-size entries).
    pub sh_entsize: u64,
}

impl Elf64SectionHeader {
    /// Parse a section header from raw bytes at the given offset.
    ///
    /// # Panics
    ///
    /// Panics if `offset + ELF64_SHDR_SIZE > data.len()`. Callers must
    /// bounds-check first.
    #[must_use]
    pub fn parse(data: &[u8], offset: usize) -> Self {
        let b = &data[offset..];
        Self {
            sh_name: le_u32(b, 0),
            sh_type: le_u32(b, 4),
            sh_flags: le_u64(b, 8),
            sh_addr: le_u64(b, 16),
            sh_offset: le_u64(b, 24),
            sh_size: le_u64(b, 32),
            sh_link: le_u32(b, 40),
            sh_info: le_u32(b, 44),
            sh_addralign: le_u64(b, 48),
            sh_entsize: le_u64(b, 56),
        }
    }

    /// Returns the known flag bits of `sh_flags`.
    #[must_use]
    pub fn flags(&self) -> SectionFlags {
        SectionFlags::from_bits_truncate(self.sh_flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a raw section header as 64 little-endian bytes.
    pub(crate) fn make_shdr(sh_name: u32, sh_type: u32, sh_offset: u64, sh_size: u64) -> Vec<u8> {
        let mut b = vec![0u8; ELF64_SHDR_SIZE];
        b[0..4].copy_from_slice(&sh_name.to_le_bytes());
        b[4..8].copy_from_slice(&sh_type.to_le_bytes());
        b[24..32].copy_from_slice(&sh_offset.to_le_bytes());
        b[32..40].copy_from_slice(&sh_size.to_le_bytes());
        b
    }

    #[test]
    fn parse_all_fields() {
        let mut b = vec![0u8; ELF64_SHDR_SIZE];
        b[0..4].copy_from_slice(&0x11u32.to_le_bytes()); // sh_name
        b[4..8].copy_from_slice(&SHT_STRTAB.to_le_bytes()); // sh_type
        b[8..16].copy_from_slice(&0x3u64.to_le_bytes()); // sh_flags
        b[16..24].copy_from_slice(&0x1000u64.to_le_bytes()); // sh_addr
        b[24..32].copy_from_slice(&0x200u64.to_le_bytes()); // sh_offset
        b[32..40].copy_from_slice(&0x40u64.to_le_bytes()); // sh_size
        b[40..44].copy_from_slice(&5u32.to_le_bytes()); // sh_link
        b[44..48].copy_from_slice(&6u32.to_le_bytes()); // sh_info
        b[48..56].copy_from_slice(&8u64.to_le_bytes()); // sh_addralign
        b[56..64].copy_from_slice(&24u64.to_le_bytes()); // sh_entsize

        let shdr = Elf64SectionHeader::parse(&b, 0);
        assert_eq!(shdr.sh_name, 0x11);
        assert_eq!(shdr.sh_type, SHT_STRTAB);
        assert_eq!(shdr.sh_flags, 0x3);
        assert_eq!(shdr.sh_addr, 0x1000);
        assert_eq!(shdr.sh_offset, 0x200);
        assert_eq!(shdr.sh_size, 0x40);
        assert_eq!(shdr.sh_link, 5);
        assert_eq!(shdr.sh_info, 6);
        assert_eq!(shdr.sh_addralign, 8);
        assert_eq!(shdr.sh_entsize, 24);
    }

    #[test]
    fn parse_at_nonzero_offset() {
        let mut buf = vec![0xffu8; 16];
        buf.extend_from_slice(&make_shdr(7, SHT_PROGBITS, 0x80, 0x10));
        let shdr = Elf64SectionHeader::parse(&buf, 16);
        assert_eq!(shdr.sh_name, 7);
        assert_eq!(shdr.sh_type, SHT_PROGBITS);
        assert_eq!(shdr.sh_offset, 0x80);
        assert_eq!(shdr.sh_size, 0x10);
    }

    #[test]
    fn known_flags_extracted() {
        let mut b = make_shdr(0, SHT_PROGBITS, 0, 0);
        let bits = SectionFlags::ALLOC.bits() | SectionFlags::EXECINSTR.bits() | (1 << 40);
        b[8..16].copy_from_slice(&bits.to_le_bytes());
        let shdr = Elf64SectionHeader::parse(&b, 0);
        // Unknown high bit is dropped, known bits survive.
        assert_eq!(shdr.flags(), SectionFlags::ALLOC | SectionFlags::EXECINSTR);
        assert!(!shdr.flags().contains(SectionFlags::WRITE));
    }
}
