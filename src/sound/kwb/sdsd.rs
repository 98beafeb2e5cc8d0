//! SDsd banks (PS3 leftovers)
//!
//! These carry Vers/Head/Prog/Smpl sections like Sony VABs, but the sample
//! codec is unknown and blocked with variable-sized frames. They are
//! recognized so callers get a clear answer instead of "unknown variant".

use super::descriptor::StreamDescriptor;
use super::error::FormatError;
use crate::sound::streamfile::StreamFile;

pub(super) fn parse(
    _sf: &dyn StreamFile,
    _offset: u64,
    _target_subsong: u32,
) -> Result<StreamDescriptor, FormatError> {
    log::debug!("SDsd: bank layout not supported");
    Err(FormatError::Unsupported("SDsd bank layout"))
}
