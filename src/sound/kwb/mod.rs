//! Koei Tecmo wave banks (KWB)
//!
//! A wave bank is a header region (`WBH_`) describing subsongs and a body
//! region (`WBD_`) holding their data. The regions come as two files
//! (.wbh + .wbd, .wh2 + .wb2) or fused in one `WHD1` container (.sed).
//! The header payload is one of several unrelated bank layouts, selected by
//! a 4-byte tag:
//!
//! - `KWB2` / `KWBN`: multi-sound indexed table (`kwb2`)
//! - `K4HD`: flat PPVA table (`k4hd`)
//! - `SDsd`: recognized, not supported (`sdsd`)
//! - `SDWi`: Smpl table with DSP headers in the body (`sdwi`)
//!
//! `parse_wavebank` yields a `StreamDescriptor` for one subsong; `setup`
//! turns that into the final codec configuration.

pub mod descriptor;
pub mod error;
pub mod open;
pub mod setup;

mod k4hd;
mod kwb2;
mod sdsd;
mod sdwi;

#[cfg(test)]
pub(crate) mod test_util;

pub use descriptor::{Codec, StreamDescriptor};
pub use error::FormatError;
pub use open::{open_split, open_wavebank, WaveBankFiles};
pub use setup::{CodecConfig, StreamSetup};

use super::streamfile::{Endian, StreamFile, StreamFileExt};
use error::expect_tag;

const WHD1_ID: u32 = 0x57484431; // "WHD1"
const WBH_ID: u32 = 0x5742485F; // "WBH_"
const WBD_ID: u32 = 0x5742445F; // "WBD_"
const ZERO_ID: u32 = 0x30303030; // "0000"

/// Payload start relative to a WBH_/WBD_ tag
const REGION_HEADER_SIZE: u64 = 0x0C;

/// Size of the DSP header that prefixes SDWi stream data
const EMBEDDED_DSP_HEADER_SIZE: u64 = 0x60;

/// Header and body readers for one bank; may be the same file
#[derive(Clone, Copy)]
pub struct ContainerHandle<'a> {
    pub header: &'a dyn StreamFile,
    pub body: &'a dyn StreamFile,
}

impl<'a> ContainerHandle<'a> {
    pub fn new(header: &'a dyn StreamFile, body: &'a dyn StreamFile) -> Self {
        Self { header, body }
    }

    /// Header and body fused in a single file
    pub fn fused(sf: &'a dyn StreamFile) -> Self {
        Self {
            header: sf,
            body: sf,
        }
    }
}

/// Header payload layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankVariant {
    /// "KWB2" [Bladestorm Nightmare (PC), Dissidia NT (PC)],
    /// "KWBN" [Fire Emblem Warriors (Switch)]
    Kwb2,
    /// "K4HD" [Dissidia NT (PS4/Vita)]
    K4hd,
    /// "SDsd" (PS3 leftover files)
    Sdsd,
    /// "SDWi" [Fatal Frame 5 (Wii U)]
    Sdwi,
}

impl BankVariant {
    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            0x4B574232 | 0x4B57424E => Some(BankVariant::Kwb2), // "KWB2", "KWBN"
            0x4B344844 => Some(BankVariant::K4hd),              // "K4HD"
            0x53447364 => Some(BankVariant::Sdsd),              // "SDsd"
            0x53445769 => Some(BankVariant::Sdwi),              // "SDWi"
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BankVariant::Kwb2 => "KWB2",
            BankVariant::K4hd => "K4HD",
            BankVariant::Sdsd => "SDsd",
            BankVariant::Sdwi => "SDWi",
        }
    }

    /// Read the target subsong's entry; offsets come back body-relative
    fn parse(
        self,
        header: &dyn StreamFile,
        offset: u64,
        target_subsong: u32,
    ) -> Result<StreamDescriptor, FormatError> {
        match self {
            BankVariant::Kwb2 => kwb2::parse(header, offset, target_subsong),
            BankVariant::K4hd => k4hd::parse(header, offset, target_subsong),
            BankVariant::Sdsd => sdsd::parse(header, offset, target_subsong),
            BankVariant::Sdwi => sdwi::parse(header, offset, target_subsong),
        }
    }
}

/// Where the WBH_/WBD_ regions start, and the bank's byte order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankRegions {
    pub endian: Endian,
    pub header_offset: u64,
    pub body_offset: u64,
    pub fused: bool,
}

/// Guess the byte order of a 32-bit field whose value is expected to be small
///
/// Reads the field both ways and picks big-endian when the little-endian
/// reading is the larger one. This is a heuristic: a field whose two
/// readings happen to compare the other way gets the wrong answer.
pub fn guess_endianness32(sf: &dyn StreamFile, offset: u64) -> Endian {
    let mut buf = [0u8; 4];
    if sf.read_exact_at(offset, &mut buf).is_err() {
        return Endian::Little;
    }
    if u32::from_le_bytes(buf) > u32::from_be_bytes(buf) {
        Endian::Big
    } else {
        Endian::Little
    }
}

/// Resolve region offsets from the optional WHD1 wrapper
pub fn locate_regions(header: &dyn StreamFile) -> Result<BankRegions, FormatError> {
    if header.read_u32be(0x00)? == WHD1_ID {
        // 0x04: fixed value?, 0x0a: version?
        let endian = if header.read_u8(0x08)? == 0xFF {
            Endian::Big
        } else {
            Endian::Little
        };
        // 0x10: file size
        let table = u64::from(endian.read_u32(header, 0x0C)?);
        let header_offset = u64::from(endian.read_u32(header, table)?);
        let body_offset = u64::from(endian.read_u32(header, table + 0x04)?);

        return Ok(BankRegions {
            endian,
            header_offset,
            body_offset,
            fused: true,
        });
    }

    Ok(BankRegions {
        endian: guess_endianness32(header, 0x08),
        header_offset: 0,
        body_offset: 0,
        fused: false,
    })
}

/// Parse the wave bank and describe subsong `target_subsong` (1-based; 0 means 1)
pub fn parse_wavebank(
    container: &ContainerHandle<'_>,
    target_subsong: u32,
) -> Result<StreamDescriptor, FormatError> {
    let ContainerHandle { header, body } = *container;
    let target_subsong = target_subsong.max(1);

    let regions = locate_regions(header)?;
    let endian = regions.endian;

    expect_tag("WBH_ tag", WBH_ID, endian.read_u32(header, regions.header_offset)?)?;
    expect_tag("WBH_ version", ZERO_ID, endian.read_u32(header, regions.header_offset + 0x04)?)?;
    expect_tag("WBD_ tag", WBD_ID, endian.read_u32(body, regions.body_offset)?)?;
    expect_tag("WBD_ version", ZERO_ID, endian.read_u32(body, regions.body_offset + 0x04)?)?;

    let head_start = regions.header_offset + REGION_HEADER_SIZE;
    let body_start = regions.body_offset + REGION_HEADER_SIZE;

    let tag = header.read_u32be(head_start)?;
    let variant = BankVariant::from_tag(tag).ok_or(FormatError::UnknownVariant(tag))?;
    log::debug!(
        "{}: {} bank, {:?} endian{}",
        header.name(),
        variant.name(),
        endian,
        if regions.fused { ", fused" } else { "" }
    );

    let mut desc = variant.parse(header, head_start, target_subsong)?;
    desc.endian = endian;
    desc.stream_offset += body_start;
    desc.codec = desc.codec.rebased(body_start);

    if let Codec::NgcDspBody { coef_offset } = desc.codec {
        // the embedded DSP header's sample count wins over the bank's
        let num_samples = endian.read_s32(body, coef_offset)?;
        desc.num_samples = u32::try_from(num_samples).map_err(|_| {
            FormatError::Malformed(format!("negative DSP sample count {}", num_samples))
        })?;
        desc.stream_offset += EMBEDDED_DSP_HEADER_SIZE;
    }

    Ok(desc)
}
