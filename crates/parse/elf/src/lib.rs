//! Raw ELF64 data model for the Meson module loader.
//!
//! Fixed-layout ELF64 header and section-header records extracted from raw
//! bytes with safe little-endian field reads (`from_le_bytes`). No unsafe
//! code, no allocations.
//!
//! This crate only interprets bytes that are already in memory. Validating
//! that a header-declared byte range actually lies inside the module file is
//! the job of `meson-modload`, which knows the real file length.

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

pub mod header;
pub mod section;

pub use header::{ELF64_EHDR_SIZE, Elf64Header, ElfError, ElfType};
pub use section::{
    ELF64_SHDR_SIZE, Elf64SectionHeader, SHN_UNDEF, SHT_NOBITS, SHT_NULL, SHT_PROGBITS,
    SHT_STRTAB, SHT_SYMTAB, SectionFlags,
};
