//! ATRAC9 configuration word
//!
//! ATRAC9 streams are described by a 32-bit big-endian configuration word:
//!
//! ```text
//! bits 31..24  sync (0xFE)
//! bits 23..20  sample rate index
//! bits 19..17  channel configuration index
//! bit  16      validation bit
//! bits 15..5   frame bytes - 1
//! bits  4..3   superframe index (frames per superframe = 1 << index)
//! bits  2..0   unused
//! ```
//!
//! Only the geometry is derived here; decoding belongs to the codec library.

use thiserror::Error;

const SYNC: u8 = 0xFE;

const SAMPLE_RATES: [u32; 16] = [
    11025, 12000, 16000, 22050, 24000, 32000, 44100, 48000, 44100, 48000, 64000, 88200, 96000,
    128000, 176400, 192000,
];

const FRAME_SAMPLES_POWER: [u32; 16] = [6, 6, 7, 7, 7, 8, 8, 8, 6, 6, 7, 7, 7, 8, 8, 8];

const CHANNELS: [u32; 8] = [1, 2, 2, 6, 8, 4, 0, 0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Atrac9ConfigError {
    #[error("Bad ATRAC9 sync byte 0x{0:02x}")]
    BadSync(u8),
    #[error("Reserved ATRAC9 channel configuration {0}")]
    BadChannelConfig(u8),
}

/// Geometry decoded from an ATRAC9 configuration word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Atrac9Config {
    pub config_data: u32,
    pub sample_rate: u32,
    pub channels: u32,
    /// Bytes in one superframe
    pub superframe_bytes: u32,
    /// Samples in one superframe
    pub superframe_samples: u32,
}

impl Atrac9Config {
    pub fn parse(config_data: u32) -> Result<Self, Atrac9ConfigError> {
        let sync = (config_data >> 24) as u8;
        let sample_rate_index = ((config_data >> 20) & 0x0F) as usize;
        let channel_index = ((config_data >> 17) & 0x07) as u8;
        let frame_bytes = ((config_data >> 5) & 0x7FF) + 1;
        let superframe_index = (config_data >> 3) & 0x03;

        if sync != SYNC {
            return Err(Atrac9ConfigError::BadSync(sync));
        }
        let channels = CHANNELS[channel_index as usize];
        if channels == 0 {
            return Err(Atrac9ConfigError::BadChannelConfig(channel_index));
        }

        let frames = 1 << superframe_index;
        Ok(Self {
            config_data,
            sample_rate: SAMPLE_RATES[sample_rate_index],
            channels,
            superframe_bytes: frame_bytes * frames,
            superframe_samples: (1 << FRAME_SAMPLES_POWER[sample_rate_index]) * frames,
        })
    }

    /// Whole superframes in `bytes`, as samples
    pub fn bytes_to_samples(&self, bytes: u64) -> u64 {
        bytes / u64::from(self.superframe_bytes) * u64::from(self.superframe_samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 48000 Hz mono, 0x60-byte frames, 4 frames per superframe
    const MONO_48K: u32 = 0xFE70_0BF0;

    #[test]
    fn test_parse_config() {
        let cfg = Atrac9Config::parse(MONO_48K).unwrap();
        assert_eq!(cfg.sample_rate, 48000);
        assert_eq!(cfg.channels, 1);
        assert_eq!(cfg.superframe_bytes, 0x60 * 4);
        assert_eq!(cfg.superframe_samples, 256 * 4);
    }

    #[test]
    fn test_bytes_to_samples() {
        let cfg = Atrac9Config::parse(MONO_48K).unwrap();
        assert_eq!(cfg.bytes_to_samples(0x180 * 10), 10240);
        // partial superframes do not count
        assert_eq!(cfg.bytes_to_samples(0x180 * 10 + 0x17F), 10240);
        assert_eq!(cfg.bytes_to_samples(0), 0);
    }

    #[test]
    fn test_bad_sync() {
        assert_eq!(
            Atrac9Config::parse(0x0070_0BF0),
            Err(Atrac9ConfigError::BadSync(0x00))
        );
    }

    #[test]
    fn test_reserved_channel_config() {
        let word = MONO_48K | (6 << 17);
        assert_eq!(
            Atrac9Config::parse(word),
            Err(Atrac9ConfigError::BadChannelConfig(6))
        );
    }
}
