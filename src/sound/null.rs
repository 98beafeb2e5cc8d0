//! Null (silent) stream implementation
//!
//! Produces silence for a fixed number of sample frames. Used as a stand-in
//! segment when a subsong's codec is not available, so a segmented track
//! keeps its timing.

use super::decoder::{check_output, DecodableStream, DecodeError, DecodeResult};

/// Stream that renders zeros
#[derive(Debug, Clone)]
pub struct SilenceStream {
    /// Sample frequency in Hz
    sample_rate: u32,
    /// Interleaved channel count
    channels: usize,
    /// Total sample frames
    num_samples: usize,
    /// Current sample frame
    current: usize,
}

impl SilenceStream {
    /// Create a silent stream of `num_samples` frames
    pub fn new(channels: usize, sample_rate: u32, num_samples: usize) -> Self {
        Self {
            sample_rate,
            channels: channels.max(1),
            num_samples,
            current: 0,
        }
    }
}

impl DecodableStream for SilenceStream {
    fn name(&self) -> &'static str {
        "Silence"
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

        buf[..sample_count * self.channels].fill(0);
        self.current += sample_count;
        Ok(())
    }

    fn reset(&mut self) {
        self.current = 0;
    }
}
