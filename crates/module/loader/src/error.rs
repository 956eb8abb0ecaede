//! Error taxonomy for module section loading.

use core::fmt;

use crate::read::ReadError;

/// Errors surfaced while loading section headers or resolving section names.
///
/// These are integrity failures on untrusted input or resource exhaustion;
/// none of them is transient, so no operation retries locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadError {
    /// The headers are structurally nonsensical: zero sections, an
    /// undersized section-header entry, an out-of-range section index, or
    /// a section name that is not valid UTF-8.
    InvalidFormat,
    /// The file header declares no section-name string table
    /// (`e_shstrndx == SHN_UNDEF`), so names cannot be resolved.
    NoStringTable,
    /// A computed offset/length range exceeds the file's actual length.
    TruncatedFile,
    /// The backing positioned read failed.
    Io(ReadError),
    /// Allocating the header table or growing the scratch buffer failed.
    OutOfMemory,
    /// No section with the requested name exists. A normal negative result
    /// for the caller, not a load-aborting failure — unless the section
    /// was required.
    NotFound,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat => write!(f, "malformed section headers"),
            Self::NoStringTable => write!(f, "no section-name string table"),
            Self::TruncatedFile => write!(f, "byte range exceeds file length"),
            Self::Io(err) => write!(f, "read failed: {err}"),
            Self::OutOfMemory => write!(f, "out of memory"),
            Self::NotFound => write!(f, "section not found"),
        }
    }
}

impl From<ReadError> for LoadError {
    fn from(err: ReadError) -> Self {
        Self::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_nonempty() {
        let errors = [
            LoadError::InvalidFormat,
            LoadError::NoStringTable,
            LoadError::TruncatedFile,
            LoadError::Io(ReadError::Device),
            LoadError::Io(ReadError::ShortRead),
            LoadError::OutOfMemory,
            LoadError::NotFound,
        ];
        for err in &errors {
            assert!(!format!("{err}").is_empty());
        }
    }

    #[test]
    fn read_error_converts_to_io() {
        assert_eq!(LoadError::from(ReadError::Device), LoadError::Io(ReadError::Device));
    }
}
