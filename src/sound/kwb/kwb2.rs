//! KWB2/KWBN multi-sound banks
//!
//! ```text
//! 0x00  "KWB2" or "KWBN"
//! 0x06  sound count (u16le)
//! 0x18  sound offsets (u32le each, relative to the bank; 0 = empty slot)
//! ```
//!
//! Each sound holds one or more sub-sounds. Subsongs are numbered across all
//! sounds in table order, so every sub-sound is counted even when only one
//! is decoded.

use super::descriptor::{Codec, StreamDescriptor};
use super::error::{check_subsong, FormatError};
use crate::sound::streamfile::{StreamFile, StreamFileExt};

const SOUND_COUNT: u64 = 0x06;
const SOUND_TABLE: u64 = 0x18;

/// Sounds below this version use the fixed sub-sound layout
const VERSION_FIXED_LAYOUT: u16 = 0xC000;
const FIXED_SUBSOUND_START: u64 = 0x2C;
const FIXED_SUBSOUND_SIZE: u64 = 0x48;

/// DSP coefficient block, relative to the sub-sound entry
const DSP_HEADER_OFFSET: u64 = 0x4C;

const CODEC_PCM16: u8 = 0x00;
const CODEC_MSADPCM: u8 = 0x10;
const CODEC_DSP: u8 = 0x90;

pub(super) fn parse(
    sf: &dyn StreamFile,
    offset: u64,
    target_subsong: u32,
) -> Result<StreamDescriptor, FormatError> {
    let mut desc = StreamDescriptor {
        target_subsong,
        ..StreamDescriptor::default()
    };

    let sounds = sf.read_u16le(offset + SOUND_COUNT)?;

    for i in 0..u64::from(sounds) {
        let sound_offset = sf.read_u32le(offset + SOUND_TABLE + i * 0x04)?;
        if sound_offset == 0 {
            continue;
        }
        let sound_offset = offset + u64::from(sound_offset);

        let version = sf.read_u16le(sound_offset)?;
        let subsounds = sf.read_u8(sound_offset + 0x03)?;

        let (subsound_start, subsound_size) = if version < VERSION_FIXED_LAYOUT {
            (FIXED_SUBSOUND_START, FIXED_SUBSOUND_SIZE)
        } else {
            (
                u64::from(sf.read_u16le(sound_offset + 0x2C)?),
                u64::from(sf.read_u16le(sound_offset + 0x2E)?),
            )
        };
        let subsound_start = sound_offset + subsound_start;

        for j in 0..u64::from(subsounds) {
            desc.total_subsongs += 1;
            if desc.total_subsongs != target_subsong {
                continue;
            }
            read_subsound(sf, subsound_start + j * subsound_size, &mut desc)?;
        }
    }

    check_subsong(target_subsong, desc.total_subsongs)?;
    Ok(desc)
}

fn read_subsound(
    sf: &dyn StreamFile,
    entry: u64,
    desc: &mut StreamDescriptor,
) -> Result<(), FormatError> {
    desc.sample_rate = u32::from(sf.read_u16le(entry)?);
    let codec = sf.read_u8(entry + 0x02)?;
    desc.channels = u32::from(sf.read_u8(entry + 0x03)?);
    let block_size = sf.read_u16le(entry + 0x04)?;
    desc.num_samples = sf.read_u32le(entry + 0x0C)?;
    desc.stream_offset = u64::from(sf.read_u32le(entry + 0x10)?);
    desc.stream_size = u64::from(sf.read_u32le(entry + 0x14)?);

    desc.codec = match codec {
        CODEC_PCM16 => Codec::Pcm16,
        CODEC_MSADPCM => Codec::MsAdpcm { block_size },
        CODEC_DSP => Codec::NgcDspHeader {
            coef_offset: entry + DSP_HEADER_OFFSET,
        },
        other => {
            log::warn!("KWB2: unknown codec 0x{:02x}", other);
            return Err(FormatError::UnknownCodec(u32::from(other)));
        }
    };
    Ok(())
}
