//! Codec setup for a parsed subsong
//!
//! Turns a `StreamDescriptor` into what a decoder needs: interleave or frame
//! size, DSP coefficients, the ATRAC9 configuration word, and the final
//! data offset/size once codec-specific prefixes are skipped.

use super::descriptor::{Codec, StreamDescriptor};
use super::error::FormatError;
use crate::sound::atrac9::Atrac9Config;
use crate::sound::streamfile::{Endian, StreamFile, StreamFileExt};

/// Coefficients inside a DSP header block
const DSP_COEFS: u64 = 0x1C;
/// Initial history inside a DSP header block
const DSP_HIST: u64 = 0x40;

const PCM16_INTERLEAVE: u32 = 0x02;
const DSP_INTERLEAVE: u32 = 0x08;

/// Decoder configuration for one subsong
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecConfig {
    Pcm16 {
        interleave: u32,
    },
    MsAdpcm {
        frame_size: u32,
    },
    NgcDsp {
        coefs: [i16; 16],
        hist: [i16; 2],
        interleave: u32,
    },
    Atrac9(Atrac9Config),
}

impl CodecConfig {
    pub fn name(&self) -> &'static str {
        match self {
            CodecConfig::Pcm16 { .. } => "PCM16LE",
            CodecConfig::MsAdpcm { .. } => "MS ADPCM",
            CodecConfig::NgcDsp { .. } => "NGC DSP",
            CodecConfig::Atrac9(_) => "ATRAC9",
        }
    }
}

/// Everything needed to open a decoder on the body file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSetup {
    pub codec: CodecConfig,
    pub channels: u32,
    pub sample_rate: u32,
    pub num_samples: u64,
    pub stream_offset: u64,
    pub stream_size: u64,
    pub total_subsongs: u32,
}

impl StreamSetup {
    /// Resolve codec settings, reading any codec data from the header or body
    pub fn resolve(
        desc: &StreamDescriptor,
        header: &dyn StreamFile,
        body: &dyn StreamFile,
    ) -> Result<Self, FormatError> {
        if desc.channels == 0 {
            return Err(FormatError::Malformed("zero channels".to_string()));
        }

        let mut setup = StreamSetup {
            codec: CodecConfig::Pcm16 {
                interleave: PCM16_INTERLEAVE,
            },
            channels: desc.channels,
            sample_rate: desc.sample_rate,
            num_samples: u64::from(desc.num_samples),
            stream_offset: desc.stream_offset,
            stream_size: desc.stream_size,
            total_subsongs: desc.total_subsongs,
        };

        setup.codec = match desc.codec {
            Codec::Pcm16 => CodecConfig::Pcm16 {
                interleave: PCM16_INTERLEAVE,
            },
            Codec::MsAdpcm { block_size } => {
                if block_size == 0 {
                    return Err(FormatError::Malformed("MS ADPCM block size 0".to_string()));
                }
                CodecConfig::MsAdpcm {
                    frame_size: u32::from(block_size),
                }
            }
            Codec::NgcDspHeader { coef_offset } => {
                read_dsp(header, coef_offset, desc.endian, desc.channels)?
            }
            Codec::NgcDspBody { coef_offset } => {
                read_dsp(body, coef_offset, desc.endian, desc.channels)?
            }
            Codec::Atrac9 => {
                let extra_size = u64::from(body.read_u32le(desc.stream_offset)?);
                let config_data = body.read_u32be(desc.stream_offset + 0x04)?;
                // 0x0c: encoder delay?, 0x0e: encoder padding?
                // 0x10: samples per frame, 0x12: frame size

                setup.stream_size = desc.stream_size.checked_sub(extra_size).ok_or_else(|| {
                    FormatError::Malformed(format!(
                        "ATRAC9 extra data 0x{:x} exceeds stream size 0x{:x}",
                        extra_size, desc.stream_size
                    ))
                })?;
                setup.stream_offset += extra_size;

                let config = Atrac9Config::parse(config_data)
                    .map_err(|e| FormatError::Malformed(e.to_string()))?;
                setup.num_samples = config.bytes_to_samples(setup.stream_size);
                CodecConfig::Atrac9(config)
            }
        };

        Ok(setup)
    }
}

fn read_dsp(
    sf: &dyn StreamFile,
    offset: u64,
    endian: Endian,
    channels: u32,
) -> Result<CodecConfig, FormatError> {
    if channels > 1 {
        return Err(FormatError::Malformed(format!(
            "DSP subsong with {} channels",
            channels
        )));
    }

    let mut coefs = [0i16; 16];
    for (i, coef) in coefs.iter_mut().enumerate() {
        *coef = endian.read_s16(sf, offset + DSP_COEFS + i as u64 * 2)?;
    }
    let hist = [
        endian.read_s16(sf, offset + DSP_HIST)?,
        endian.read_s16(sf, offset + DSP_HIST + 0x02)?,
    ];

    Ok(CodecConfig::NgcDsp {
        coefs,
        hist,
        interleave: DSP_INTERLEAVE,
    })
}
