//! PCM16 stream implementation
//!
//! Plays interleaved signed 16-bit little-endian PCM held in memory. The
//! wave bank stores PCM subsongs this way (interleave of 2 bytes), so a
//! PCM16 `StreamDescriptor` can be turned into a playable segment directly.

use byteorder::{ByteOrder, LittleEndian};

use super::decoder::{check_output, DecodableStream, DecodeError, DecodeResult};
use super::kwb::{Codec, FormatError, StreamDescriptor};
use super::streamfile::{StreamFile, StreamFileExt};

const BYTES_PER_SAMPLE: usize = 2;

/// In-memory PCM16LE stream
#[derive(Debug, Clone)]
pub struct Pcm16Stream {
    /// Raw interleaved sample data
    data: Vec<u8>,
    /// Interleaved channel count
    channels: usize,
    /// Sample frequency in Hz
    sample_rate: u32,
    /// Total sample frames
    num_samples: usize,
    /// Current sample frame
    current: usize,
}

impl Pcm16Stream {
    /// Wrap raw PCM16LE bytes
    ///
    /// The sample count is derived from the data length; a trailing partial
    /// frame is ignored.
    pub fn new(data: Vec<u8>, channels: usize, sample_rate: u32) -> DecodeResult<Self> {
        if channels == 0 {
            return Err(DecodeError::InvalidData("zero channels".to_string()));
        }
        let num_samples = data.len() / (BYTES_PER_SAMPLE * channels);
        Ok(Self {
            data,
            channels,
            sample_rate,
            num_samples,
            current: 0,
        })
    }

    /// Read a PCM16 subsong out of a body region
    ///
    /// The declared sample count bounds how much is read; the body must hold
    /// at least that many frames.
    pub fn from_descriptor(
        desc: &StreamDescriptor,
        body: &dyn StreamFile,
    ) -> Result<Self, FormatError> {
        if desc.codec != Codec::Pcm16 {
            return Err(FormatError::Malformed(format!(
                "expected PCM16 subsong, got {}",
                desc.codec.name()
            )));
        }
        let channels = desc.channels as usize;
        let frame_bytes = BYTES_PER_SAMPLE * channels;
        let declared = (desc.num_samples as u64).saturating_mul(frame_bytes as u64);
        let bytes = declared.min(desc.stream_size);

        let available = body.size().saturating_sub(desc.stream_offset);
        if bytes > available {
            return Err(FormatError::Malformed(format!(
                "PCM16 data of 0x{:x} bytes at 0x{:x} exceeds {} (0x{:x} bytes left)",
                bytes,
                desc.stream_offset,
                body.name(),
                available
            )));
        }

        let mut data = vec![0u8; bytes as usize];
        body.read_exact_at(desc.stream_offset, &mut data)?;

        Self::new(data, channels, desc.sample_rate)
            .map_err(|e| FormatError::Malformed(e.to_string()))
    }
}

impl DecodableStream for Pcm16Stream {
    fn name(&self) -> &'static str {
        "PCM16"
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn num_samples(&self) -> usize {
        self.num_samples
    }

    fn render(&mut self, buf: &mut [i16], sample_count: usize) -> DecodeResult<()> {
        check_output(buf, sample_count, self.channels)?;
        if self.current + sample_count > self.num_samples {
            return Err(DecodeError::EndOfStream);
        }

        let start = self.current * self.channels * BYTES_PER_SAMPLE;
        let count = sample_count * self.channels;
        let src = &self.data[start..start + count * BYTES_PER_SAMPLE];
        LittleEndian::read_i16_into(src, &mut buf[..count]);

        self.current += sample_count;
        Ok(())
    }

    fn reset(&mut self) {
        self.current = 0;
    }
}
