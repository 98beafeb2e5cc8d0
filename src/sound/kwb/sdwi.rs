//! SDWi banks (Wii U), a variation of SDsd
//!
//! ```text
//! 0x00  "SDWiVers"
//! 0x10  "SDsdHead"
//! 0x1C  WBH_ size
//! 0x20  WBD_ size
//! 0x24  SDsdProg offset
//! 0x28  SDsdSmpl offset (u32be, relative to the bank)
//! ```
//!
//! Smpl records are big-endian apart from the little-endian entry count.
//! Each sample is mono DSP ADPCM with its own DSP header at the start of
//! the stream data, handled once the body region is known.

use super::descriptor::{Codec, StreamDescriptor};
use super::error::{check_subsong, expect_tag, FormatError};
use crate::sound::streamfile::{StreamFile, StreamFileExt};

const SDSD_ID: u32 = 0x53447364; // "SDsd"
const SMPL_ID: u32 = 0x536D706C; // "Smpl"
const SMPL_ENTRY_SIZE: u64 = 0x40;
const SMPL_ENTRIES_START: u64 = 0x10;

pub(super) fn parse(
    sf: &dyn StreamFile,
    offset: u64,
    target_subsong: u32,
) -> Result<StreamDescriptor, FormatError> {
    let smpl_offset = offset + u64::from(sf.read_u32be(offset + 0x28)?);

    expect_tag("SDsd tag", SDSD_ID, sf.read_u32be(smpl_offset)?)?;
    expect_tag("Smpl tag", SMPL_ID, sf.read_u32be(smpl_offset + 0x04)?)?;

    let entries = sf.read_u32le(smpl_offset + 0x0C)?;
    check_subsong(target_subsong, entries)?;

    let record =
        smpl_offset + SMPL_ENTRIES_START + u64::from(target_subsong - 1) * SMPL_ENTRY_SIZE;

    let stream_offset = u64::from(sf.read_u32be(record + 0x04)?);
    let sample_rate = sf.read_u32be(record + 0x10)?;
    let stream_size = u64::from(sf.read_u32be(record + 0x24)?);

    Ok(StreamDescriptor {
        // body-relative like the stream offset; rebased by the caller
        codec: Codec::NgcDspBody {
            coef_offset: stream_offset,
        },
        channels: 1,
        sample_rate,
        stream_offset,
        stream_size,
        total_subsongs: entries,
        target_subsong,
        ..StreamDescriptor::default()
    })
}
