//! Segmented layout
//!
//! Plays a sequence of child streams (segments) back to back as one stream,
//! optionally jumping back to a loop segment when the parent's loop end is
//! reached. The parent's counters live in a `PlaybackState` owned by the
//! caller; this layout only owns the segments and the segment cursor.
//!
//! Running out of segments ends the track: the remainder of the request is
//! padded with silence and `render` reports how many samples were decoded.

use thiserror::Error;

use super::decoder::{DecodableStream, DecodeError};
use super::playback::PlaybackState;

/// Upper bound on segments per layout
pub const MAX_SEGMENTS: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Invalid segment count {0} (expected 1..=255)")]
    SegmentCount(usize),

    #[error("Failed to allocate {0} segment slots")]
    Allocation(usize),

    #[error("Segment {index} out of range ({count} segments)")]
    SegmentIndex { index: usize, count: usize },

    #[error("Loop segment {index} out of range ({count} segments)")]
    LoopSegmentOutOfRange { index: usize, count: usize },

    #[error("Segment {0} has not been set")]
    MissingSegment(usize),

    #[error("Looping stream has no loop segment")]
    LoopSegmentUnset,

    #[error("Segment decode failed: {0}")]
    Decode(#[from] DecodeError),
}

/// Ordered set of segments played as one stream
pub struct SegmentedLayout {
    segments: Vec<Option<Box<dyn DecodableStream>>>,
    current_segment: usize,
    loop_segment: Option<usize>,
    /// Set once the last segment ran out; cleared by `reset`
    exhausted: bool,
}

impl std::fmt::Debug for SegmentedLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentedLayout")
            .field("segment_count", &self.segments.len())
            .field("filled", &self.segments.iter().filter(|s| s.is_some()).count())
            .field("current_segment", &self.current_segment)
            .field("loop_segment", &self.loop_segment)
            .finish()
    }
}

impl SegmentedLayout {
    /// Create a layout with `segment_count` empty slots
    pub fn new(segment_count: usize) -> Result<Self, LayoutError> {
        if segment_count < 1 || segment_count > MAX_SEGMENTS {
            return Err(LayoutError::SegmentCount(segment_count));
        }

        let mut segments = Vec::new();
        segments
            .try_reserve_exact(segment_count)
            .map_err(|_| LayoutError::Allocation(segment_count))?;
        segments.resize_with(segment_count, || None);

        Ok(Self {
            segments,
            current_segment: 0,
            loop_segment: None,
            exhausted: false,
        })
    }

    /// Fill slot `index`, replacing (and dropping) any previous segment
    pub fn set_segment(
        &mut self,
        index: usize,
        segment: Box<dyn DecodableStream>,
    ) -> Result<(), LayoutError> {
        let count = self.segments.len();
        let slot = self
            .segments
            .get_mut(index)
            .ok_or(LayoutError::SegmentIndex { index, count })?;
        *slot = Some(segment);
        Ok(())
    }

    pub fn set_loop_segment(&mut self, index: usize) -> Result<(), LayoutError> {
        let count = self.segments.len();
        if index >= count {
            return Err(LayoutError::LoopSegmentOutOfRange { index, count });
        }
        self.loop_segment = Some(index);
        Ok(())
    }

    pub fn segment(&self, index: usize) -> Option<&dyn DecodableStream> {
        self.segments.get(index)?.as_deref()
    }

    /// True when every slot holds a segment
    pub fn is_complete(&self) -> bool {
        self.segments.iter().all(Option::is_some)
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn current_segment(&self) -> usize {
        self.current_segment
    }

    pub fn loop_segment(&self) -> Option<usize> {
        self.loop_segment
    }

    /// Sum of the filled segments' lengths
    pub fn num_samples(&self) -> usize {
        self.segments
            .iter()
            .flatten()
            .map(|s| s.num_samples())
            .sum()
    }

    fn segment_mut(&mut self, index: usize) -> Result<&mut dyn DecodableStream, LayoutError> {
        let count = self.segments.len();
        match self.segments.get_mut(index) {
            Some(Some(segment)) => Ok(segment.as_mut()),
            Some(None) => Err(LayoutError::MissingSegment(index)),
            None => Err(LayoutError::SegmentIndex { index, count }),
        }
    }

    /// Render `sample_count` frames into `buf`, advancing `state`
    ///
    /// Each segment writes with its own channel count, so `buf` is offset
    /// by `samples_written * segment.channels()`. Returns the number of
    /// frames decoded; when the last segment runs out before the request is
    /// met, the rest of the request is filled with silence.
    pub fn render(
        &mut self,
        buf: &mut [i16],
        sample_count: usize,
        state: &mut PlaybackState,
    ) -> Result<usize, LayoutError> {
        if state.is_looping() && self.loop_segment.is_none() {
            return Err(LayoutError::LoopSegmentUnset);
        }

        let mut samples_written = 0;
        while samples_written < sample_count {
            let samples_this_block = self.segment_mut(self.current_segment)?.num_samples();

            if state.do_loop() {
                let loop_segment = self.loop_segment.ok_or(LayoutError::LoopSegmentUnset)?;
                log::debug!(
                    "Segment {} -> loop segment {} at sample {}",
                    self.current_segment,
                    loop_segment,
                    state.current_sample
                );
                self.current_segment = loop_segment;
                self.segment_mut(loop_segment)?.reset();
                self.exhausted = false;
                state.samples_into_block = 0;
                continue;
            }

            let samples_to_do = state
                .samples_to_do(samples_this_block, 1)
                .min(sample_count - samples_written);

            if samples_to_do == 0 {
                let next = self.current_segment + 1;
                if next >= self.segments.len() {
                    self.pad_silence(buf, samples_written, sample_count, state.channels)?;
                    return Ok(samples_written);
                }
                log::debug!("Segment {} -> {}", self.current_segment, next);
                self.current_segment = next;
                self.segment_mut(next)?.reset();
                state.samples_into_block = 0;
                continue;
            }

            let segment = self.segment_mut(self.current_segment)?;
            let start = samples_written * segment.channels();
            let available = buf.len();
            let out = buf.get_mut(start..).ok_or(DecodeError::BufferTooSmall {
                needed: start,
                available,
            })?;
            segment.render(out, samples_to_do)?;

            samples_written += samples_to_do;
            state.advance(samples_to_do);
        }

        Ok(samples_written)
    }

    /// Zero the unrendered tail of the request after the last segment ran out
    ///
    /// The tail starts where the last segment stopped writing and runs to
    /// the end of the request at the wider of the parent's and the last
    /// segment's channel counts.
    fn pad_silence(
        &mut self,
        buf: &mut [i16],
        samples_written: usize,
        sample_count: usize,
        parent_channels: usize,
    ) -> Result<(), LayoutError> {
        if !self.exhausted {
            log::warn!(
                "Segmented layout ran past its last segment ({} of {} samples decoded)",
                samples_written,
                sample_count
            );
            self.exhausted = true;
        }

        let channels = self.segment_mut(self.current_segment)?.channels();
        let end = (sample_count * channels.max(parent_channels)).min(buf.len());
        let start = (samples_written * channels).min(end);
        buf[start..end].fill(0);
        Ok(())
    }

    /// Rewind to the first segment and reset every segment's decode state
    pub fn reset(&mut self) {
        self.current_segment = 0;
        self.exhausted = false;
        for segment in self.segments.iter_mut().flatten() {
            segment.reset();
        }
    }
}
