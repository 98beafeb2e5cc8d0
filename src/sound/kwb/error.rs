//! Wave bank parse errors

use std::io;

use thiserror::Error;

/// Reasons a wave bank header was rejected
///
/// `Mismatch` and `UnknownExtension` mean "not a wave bank" and let callers
/// move on to another format; everything else means the data claimed to be a
/// wave bank but could not be used.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("{what} mismatch: expected 0x{expected:08x}, found 0x{found:08x}")]
    Mismatch {
        what: &'static str,
        expected: u32,
        found: u32,
    },

    #[error("Unrecognized file extension: {0:?}")]
    UnknownExtension(String),

    #[error("Unknown bank variant 0x{0:08x}")]
    UnknownVariant(u32),

    #[error("Subsong {target} out of range (bank holds {total})")]
    SubsongOutOfRange { target: u32, total: u32 },

    #[error("Unknown codec 0x{0:x}")]
    UnknownCodec(u32),

    #[error("Unexpected entry size 0x{found:x} (expected 0x{expected:x})")]
    UnexpectedEntrySize { expected: u32, found: u32 },

    #[error("Malformed data: {0}")]
    Malformed(String),

    #[error("Unsupported: {0}")]
    Unsupported(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl FormatError {
    /// True when the input is simply not this container type
    pub fn is_mismatch(&self) -> bool {
        matches!(
            self,
            FormatError::Mismatch { .. } | FormatError::UnknownExtension(_)
        )
    }
}

/// Fail unless `expected == found`
pub(crate) fn expect_tag(what: &'static str, expected: u32, found: u32) -> Result<(), FormatError> {
    if expected != found {
        return Err(FormatError::Mismatch {
            what,
            expected,
            found,
        });
    }
    Ok(())
}

/// Validate `1 <= target <= total`
pub(crate) fn check_subsong(target: u32, total: u32) -> Result<(), FormatError> {
    if total < 1 || target < 1 || target > total {
        return Err(FormatError::SubsongOutOfRange { target, total });
    }
    Ok(())
}
