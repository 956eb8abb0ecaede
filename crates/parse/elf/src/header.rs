//! ELF64 file header parsing.
//!
//! Parses and identity-checks the ELF64 file header from raw bytes using
//! safe field extraction via `from_le_bytes()`. Table bounds (section
//! headers against the real file length) are deliberately not checked here;
//! the module file is read positionally and may not be in memory.

use core::fmt;

/// ELF magic bytes: `\x7fELF`.
const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];

/// ELF class: 64-bit.
const ELFCLASS64: u8 = 2;

/// ELF data encoding: little-endian.
const ELFDATA2LSB: u8 = 1;

/// ELF type: relocatable object.
const ET_REL: u16 = 1;

/// ELF type: executable.
const ET_EXEC: u16 = 2;

/// ELF type: shared object (PIE).
const ET_DYN: u16 = 3;

/// ELF machine: x86-64.
const EM_X86_64: u16 = 62;

/// Size of an ELF64 file header (64 bytes).
pub const ELF64_EHDR_SIZE: usize = 64;

/// Read a little-endian `u16` from `data` at byte offset `off`.
///
/// # Panics
///
/// Panics if `off + 2 > data.len()`. Callers must bounds-check first.
pub(crate) fn le_u16(data: &[u8], off: usize) -> u16 {
    u16::from_le_bytes(*data[off..].first_chunk().unwrap())
}

/// Read a little-endian `u32` from `data` at byte offset `off`.
pub(crate) fn le_u32(data: &[u8], off: usize) -> u32 {
    u32::from_le_bytes(*data[off..].first_chunk().unwrap())
}

/// Read a little-endian `u64` from `data` at byte offset `off`.
pub(crate) fn le_u64(data: &[u8], off: usize) -> u64 {
    u64::from_le_bytes(*data[off..].first_chunk().unwrap())
}

/// Errors that can occur when parsing an ELF file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfError {
    /// The file does not start with the ELF magic bytes.
    BadMagic,
    /// The ELF file is not 64-bit (`ELFCLASS64`).
    UnsupportedClass,
    /// The ELF file is not little-endian.
    UnsupportedEncoding,
    /// The ELF machine type is not `EM_X86_64`.
    UnsupportedMachine,
    /// The ELF type is not `ET_REL`, `ET_EXEC`, or `ET_DYN`.
    UnsupportedType,
    /// The input data is too short for the file header.
    Truncated,
}

impl fmt::Display for ElfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadMagic => write!(f, "invalid ELF magic bytes"),
            Self::UnsupportedClass => write!(f, "unsupported ELF class (expected ELFCLASS64)"),
            Self::UnsupportedEncoding => {
                write!(f, "unsupported data encoding (expected little-endian)")
            }
            Self::UnsupportedMachine => {
                write!(f, "unsupported machine type (expected EM_X86_64)")
            }
            Self::UnsupportedType => {
                write!(f, "unsupported ELF type (expected ET_REL, ET_EXEC, or ET_DYN)")
            }
            Self::Truncated => write!(f, "input data truncated"),
        }
    }
}

/// The kind of object an ELF file contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfType {
    /// Relocatable object (`ET_REL`) — the form kernel modules take.
    Rel,
    /// Executable (`ET_EXEC`).
    Exec,
    /// Shared object / PIE (`ET_DYN`).
    Dyn,
}

/// Parsed ELF64 file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elf64Header {
    /// ELF type (`ET_REL`, `ET_EXEC`, or `ET_DYN`).
    pub e_type: u16,
    /// Target machine architecture.
    pub e_machine: u16,
    /// Virtual address of the entry point (0 for relocatable objects).
    pub e_entry: u64,
    /// Offset of the section header table in the file.
    pub e_shoff: u64,
    /// Size of each section header entry.
    pub e_shentsize: u16,
    /// Number of section header entries.
    pub e_shnum: u16,
    /// Section header table index of the section-name string table,
    /// or [`SHN_UNDEF`](crate::SHN_UNDEF) if the file has none.
    pub e_shstrndx: u16,
}

impl Elf64Header {
    /// Parse an ELF64 file header from raw bytes.
    ///
    /// Validates the magic, class, encoding, machine, and object type.
    /// Section-header table offsets and counts are copied out as declared;
    /// bounding them against the actual file length is the loader's job.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError`] if identity validation fails or the data is too
    /// short for a file header.
    pub fn parse(data: &[u8]) -> Result<Self, ElfError> {
        if data.len() < ELF64_EHDR_SIZE {
            return Err(ElfError::Truncated);
        }

        if data[..4] != ELF_MAGIC {
            return Err(ElfError::BadMagic);
        }

        // Class (byte 4) — must be ELFCLASS64
        if data[4] != ELFCLASS64 {
            return Err(ElfError::UnsupportedClass);
        }

        // Data encoding (byte 5) — must be little-endian
        if data[5] != ELFDATA2LSB {
            return Err(ElfError::UnsupportedEncoding);
        }

        // Offsets below are safe because we checked len >= 64 above
        let e_type = le_u16(data, 16);
        if e_type != ET_REL && e_type != ET_EXEC && e_type != ET_DYN {
            return Err(ElfError::UnsupportedType);
        }

        let e_machine = le_u16(data, 18);
        if e_machine != EM_X86_64 {
            return Err(ElfError::UnsupportedMachine);
        }

        Ok(Self {
            e_type,
            e_machine,
            e_entry: le_u64(data, 24),
            e_shoff: le_u64(data, 40),
            e_shentsize: le_u16(data, 58),
            e_shnum: le_u16(data, 60),
            e_shstrndx: le_u16(data, 62),
        })
    }

    /// Returns the object type as an [`ElfType`].
    #[must_use]
    pub fn elf_type(&self) -> ElfType {
        match self.e_type {
            ET_REL => ElfType::Rel,
            ET_EXEC => ElfType::Exec,
            _ => ElfType::Dyn,
        }
    }
}
