//! K4HD banks, modeled after the Vita/PS4 hd4+bd4 layout
//!
//! ```text
//! 0x00  "K4HD"
//! 0x04  chunk size
//! 0x10  PPPG offset
//! 0x14  PPTN offset
//! 0x18  PPVA offset (u16le, relative to the bank)
//! ```
//!
//! The PPVA table is a flat array of fixed-size wave records, so the target
//! record is located directly by index. Records are always mono ATRAC9;
//! stereo sounds are made of two subsongs paired by the game.

use super::descriptor::{Codec, StreamDescriptor};
use super::error::{check_subsong, expect_tag, FormatError};
use crate::sound::streamfile::{StreamFile, StreamFileExt};

const PPVA_ID: u32 = 0x50505641; // "PPVA"
const PPVA_ENTRY_SIZE: u32 = 0x1C;
const PPVA_ENTRIES_START: u64 = 0x20;
const CODEC_ATRAC9: u32 = 2;

pub(super) fn parse(
    sf: &dyn StreamFile,
    offset: u64,
    target_subsong: u32,
) -> Result<StreamDescriptor, FormatError> {
    let ppva_offset = offset + u64::from(sf.read_u16le(offset + 0x18)?);

    expect_tag("PPVA tag", PPVA_ID, sf.read_u32be(ppva_offset)?)?;

    let entry_size = sf.read_u32le(ppva_offset + 0x08)?;
    // stored as count - 1
    let entries = sf.read_u32le(ppva_offset + 0x14)?.wrapping_add(1);

    if entry_size != PPVA_ENTRY_SIZE {
        log::warn!("K4HD: unknown entry size 0x{:x}", entry_size);
        return Err(FormatError::UnexpectedEntrySize {
            expected: PPVA_ENTRY_SIZE,
            found: entry_size,
        });
    }

    check_subsong(target_subsong, entries)?;

    let record = ppva_offset
        + PPVA_ENTRIES_START
        + u64::from(target_subsong - 1) * u64::from(entry_size);

    let stream_offset = sf.read_u32le(record)?;
    let sample_rate = sf.read_u32le(record + 0x04)?;
    let stream_size = sf.read_u32le(record + 0x08)?;
    let codec = sf.read_u32le(record + 0x10)?;
    if codec != CODEC_ATRAC9 {
        log::warn!("K4HD: unknown codec {}", codec);
        return Err(FormatError::UnknownCodec(codec));
    }

    Ok(StreamDescriptor {
        codec: Codec::Atrac9,
        channels: 1,
        sample_rate,
        stream_offset: u64::from(stream_offset),
        stream_size: u64::from(stream_size),
        total_subsongs: entries,
        target_subsong,
        ..StreamDescriptor::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::kwb::test_util::{K4hdBuilder, K4hdRecord};
    use crate::sound::streamfile::MemoryStreamFile;

    fn three_records() -> K4hdBuilder {
        K4hdBuilder::new(vec![
            K4hdRecord::atrac9(0x0000, 48000, 0x800),
            K4hdRecord::atrac9(0x0800, 44100, 0x400),
            K4hdRecord::atrac9(0x0C00, 32000, 0x200),
        ])
    }

    #[test]
    fn test_direct_index_reads_third_record() {
        let sf = MemoryStreamFile::new(three_records().build(), "k4hd");
        let desc = parse(&sf, 0, 3).unwrap();

        assert_eq!(desc.codec, Codec::Atrac9);
        assert_eq!(desc.channels, 1);
        assert_eq!(desc.stream_offset, 0x0C00);
        assert_eq!(desc.sample_rate, 32000);
        assert_eq!(desc.stream_size, 0x200);
        assert_eq!(desc.total_subsongs, 3);
        assert_eq!(desc.target_subsong, 3);
    }

    #[test]
    fn test_record_offset_arithmetic() {
        // records before the target are never looked at
        let mut data = three_records().build();
        let first = K4hdBuilder::PPVA_OFFSET + 0x20;
        data[first..first + 0x1C].fill(0xEE);
        let sf = MemoryStreamFile::new(data, "k4hd");

        let desc = parse(&sf, 0, 2).unwrap();
        assert_eq!(desc.stream_offset, 0x0800);
        assert_eq!(desc.sample_rate, 44100);
    }

    #[test]
    fn test_bad_entry_size() {
        let mut builder = three_records();
        builder.entry_size = 0x20;
        let sf = MemoryStreamFile::new(builder.build(), "k4hd");
        assert!(matches!(
            parse(&sf, 0, 1),
            Err(FormatError::UnexpectedEntrySize { found: 0x20, .. })
        ));
    }

    #[test]
    fn test_bad_codec() {
        let mut builder = three_records();
        builder.records[1].codec = 1;
        let sf = MemoryStreamFile::new(builder.build(), "k4hd");
        assert!(parse(&sf, 0, 1).is_ok());
        assert!(matches!(parse(&sf, 0, 2), Err(FormatError::UnknownCodec(1))));
    }

    #[test]
    fn test_bad_tag() {
        let mut data = three_records().build();
        data[K4hdBuilder::PPVA_OFFSET] = b'X';
        let sf = MemoryStreamFile::new(data, "k4hd");
        assert!(parse(&sf, 0, 1).unwrap_err().is_mismatch());
    }

    #[test]
    fn test_out_of_range() {
        let sf = MemoryStreamFile::new(three_records().build(), "k4hd");
        assert!(matches!(
            parse(&sf, 0, 4),
            Err(FormatError::SubsongOutOfRange { target: 4, total: 3 })
        ));
    }

    #[test]
    fn test_empty_table_wraps_to_zero() {
        let sf = MemoryStreamFile::new(K4hdBuilder::new(Vec::new()).build(), "k4hd");
        assert!(matches!(
            parse(&sf, 0, 1),
            Err(FormatError::SubsongOutOfRange { total: 0, .. })
        ));
    }
}
