//! Section-header ingestion and name resolution for the Meson module loader.
//!
//! This is the first stage of loading a kernel module: given an
//! identity-validated [`Elf64Header`](meson_elf::Elf64Header), the file's
//! total length, and positioned-read access to the backing file, a
//! [`LoadState`] reads the section-header table into memory and resolves
//! section names out of the section-name string table.
//!
//! Everything here treats the module file as hostile. Every offset, count,
//! and index comes from the file, so every byte range is checked against
//! the real file length (with overflow-checked arithmetic) before it is
//! dereferenced or used to size an allocation. Any integrity failure aborts
//! the load; the surrounding loader must never run a module whose headers
//! could not be fully and safely parsed.
//!
//! ```
//! use meson_modload::{LoadState, SliceReader};
//!
//! fn locate_symtab(image: &[u8]) {
//!     let ehdr = meson_elf::Elf64Header::parse(image).expect("valid ELF");
//!     let len = image.len() as u64;
//!     let mut state = LoadState::new(ehdr, len, SliceReader::new(image));
//!     state.load_section_headers().expect("section headers");
//!     let index = state.find_section_by_name(".symtab").expect("symtab present");
//!     let _ = index;
//! }
//! ```

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod buffer;
pub mod error;
pub mod load;
pub mod read;

pub use buffer::{DEFAULT_BUFFER_INCREMENT, DEFAULT_BUFFER_SIZE, ScratchBuffer};
pub use error::LoadError;
pub use load::LoadState;
pub use read::{ModuleRead, ReadError, SliceReader};
