//! Parsed subsong description

use crate::sound::streamfile::Endian;

/// Codec of one subsong, with the fields only that codec needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Codec {
    /// Signed 16-bit little-endian PCM
    #[default]
    Pcm16,
    /// Microsoft ADPCM with fixed-size blocks
    MsAdpcm { block_size: u16 },
    /// GameCube DSP ADPCM whose coefficient block sits next to the subsong
    /// entry in the header region
    NgcDspHeader { coef_offset: u64 },
    /// GameCube DSP ADPCM prefixed by its own 0x60-byte DSP header in the
    /// body region; `coef_offset` is the start of that header
    NgcDspBody { coef_offset: u64 },
    /// ATRAC9 with a leading extra-data block carrying its configuration word
    Atrac9,
}

impl Codec {
    pub fn name(&self) -> &'static str {
        match self {
            Codec::Pcm16 => "PCM16LE",
            Codec::MsAdpcm { .. } => "MS ADPCM",
            Codec::NgcDspHeader { .. } => "NGC DSP (header coefs)",
            Codec::NgcDspBody { .. } => "NGC DSP (embedded header)",
            Codec::Atrac9 => "ATRAC9",
        }
    }

    /// Codec framing size, for block-based codecs only
    pub fn block_size(&self) -> Option<u16> {
        match self {
            Codec::MsAdpcm { block_size } => Some(*block_size),
            _ => None,
        }
    }

    /// Offset of the DSP coefficient block, for the DSP variants only
    pub fn coefficient_table_offset(&self) -> Option<u64> {
        match self {
            Codec::NgcDspHeader { coef_offset } | Codec::NgcDspBody { coef_offset } => {
                Some(*coef_offset)
            }
            _ => None,
        }
    }

    /// Shift body-relative offsets by the start of the body region
    pub(crate) fn rebased(self, body_offset: u64) -> Self {
        match self {
            Codec::NgcDspBody { coef_offset } => Codec::NgcDspBody {
                coef_offset: coef_offset + body_offset,
            },
            other => other,
        }
    }
}

/// One selected subsong: codec, geometry and byte location
///
/// `stream_offset` is absolute within the body file. Wave banks carry no
/// loop information, so `loop_flag` is always false for parsed banks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamDescriptor {
    pub codec: Codec,
    pub channels: u32,
    pub sample_rate: u32,
    pub num_samples: u32,
    pub loop_flag: bool,
    pub loop_start: u32,
    pub loop_end: u32,
    pub stream_offset: u64,
    pub stream_size: u64,
    /// Byte order of the bank's endian-dependent fields
    pub endian: Endian,
    /// 1-based
    pub total_subsongs: u32,
    /// 1-based, within `1..=total_subsongs`
    pub target_subsong: u32,
}

impl StreamDescriptor {
    pub fn block_size(&self) -> Option<u16> {
        self.codec.block_size()
    }

    pub fn coefficient_table_offset(&self) -> Option<u64> {
        self.codec.coefficient_table_offset()
    }
}
