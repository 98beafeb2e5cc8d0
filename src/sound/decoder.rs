//! Decodable stream trait definition
//!
//! Defines the `DecodableStream` trait that every per-subsong stream exposes
//! to the layouts that drive playback. Codec internals stay behind it; a
//! layout only needs to know the geometry, how to render, and how to rewind.

use thiserror::Error;

/// Error type for stream decoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Invalid or corrupted audio data
    #[error("Invalid audio data: {0}")]
    InvalidData(String),

    /// Output buffer cannot hold the requested samples
    #[error("Output buffer too small: need {needed} samples, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// Requested more samples than the stream holds
    #[error("End of stream")]
    EndOfStream,

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for DecodeError {
    fn from(err: std::io::Error) -> Self {
        DecodeError::IoError(err.to_string())
    }
}

/// Result type for decoder operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// A stream that produces interleaved 16-bit PCM
pub trait DecodableStream: Send {
    /// Returns the decoder name (e.g., "PCM16", "Silence")
    fn name(&self) -> &'static str;

    /// Number of interleaved channels written per sample frame
    fn channels(&self) -> usize;

    /// Sample frequency in Hz
    fn sample_rate(&self) -> u32;

    /// Total sample frames in the stream
    fn num_samples(&self) -> usize;

    /// Decode the next `sample_count` frames into the start of `buf`
    ///
    /// `buf` must hold at least `sample_count * channels()` samples.
    fn render(&mut self, buf: &mut [i16], sample_count: usize) -> DecodeResult<()>;

    /// Rewind decode state to the first sample
    fn reset(&mut self);
}

/// Check that `buf` can take `sample_count` frames of `channels` samples
pub(crate) fn check_output(buf: &[i16], sample_count: usize, channels: usize) -> DecodeResult<()> {
    let needed = sample_count * channels;
    if buf.len() < needed {
        return Err(DecodeError::BufferTooSmall {
            needed,
            available: buf.len(),
        });
    }
    Ok(())
}
