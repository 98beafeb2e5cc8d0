//! Parent stream playback counters
//!
//! Layouts that drive several child streams (see `segmented`) advance these
//! counters as they render; the loop check and the per-call sample budget
//! are computed from them.

/// Position and loop state of the stream a layout renders for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackState {
    /// Interleaved channels of the rendered output
    pub channels: usize,
    pub loop_flag: bool,
    pub loop_start: usize,
    pub loop_end: usize,
    /// Absolute sample position
    pub current_sample: usize,
    /// Samples rendered since the current block (segment) started
    pub samples_into_block: usize,
    /// Whether the loop start has been reached at least once
    pub hit_loop: bool,
    pub loop_count: u32,
    loop_samples_into_block: usize,
}

impl PlaybackState {
    pub fn new(channels: usize) -> Self {
        Self {
            channels,
            ..Self::default()
        }
    }

    /// Enable looping over `[start, end)`; an empty range disables it
    pub fn set_loop(&mut self, start: usize, end: usize) {
        self.loop_flag = start < end;
        self.loop_start = start;
        self.loop_end = end;
        self.hit_loop = false;
    }

    /// Looping is on and the loop range is not empty
    pub fn is_looping(&self) -> bool {
        self.loop_flag && self.loop_start < self.loop_end
    }

    /// Check the loop condition, rewinding to the loop start when it fires
    ///
    /// Returns true when the position was at the loop end. The first time
    /// the loop start is reached its block position is remembered so the
    /// rewind can restore it.
    pub fn do_loop(&mut self) -> bool {
        if !self.is_looping() {
            return false;
        }

        if self.current_sample == self.loop_end {
            if !self.hit_loop {
                // never played through the start (seeked past it)
                self.hit_loop = true;
                self.loop_samples_into_block = 0;
            }
            self.current_sample = self.loop_start;
            self.samples_into_block = self.loop_samples_into_block;
            self.loop_count = self.loop_count.saturating_add(1);
            return true;
        }

        if !self.hit_loop && self.current_sample == self.loop_start {
            self.hit_loop = true;
            self.loop_samples_into_block = self.samples_into_block;
        }
        false
    }

    /// Samples that may be rendered from a block of `samples_this_block`
    ///
    /// Bounded by what is left of the block, the loop end, the loop start
    /// (until it has been hit once), and the codec frame size.
    pub fn samples_to_do(&self, samples_this_block: usize, samples_per_frame: usize) -> usize {
        let left_this_block = samples_this_block.saturating_sub(self.samples_into_block);
        let mut samples_to_do = left_this_block;

        if self.is_looping() {
            if self.current_sample + left_this_block > self.loop_end {
                samples_to_do = self.loop_end.saturating_sub(self.current_sample);
            }

            if !self.hit_loop
                && self.current_sample < self.loop_start
                && self.current_sample + left_this_block > self.loop_start
            {
                samples_to_do = self.loop_start - self.current_sample;
            }
        }

        if samples_per_frame > 1 {
            let into_frame = self.samples_into_block % samples_per_frame;
            if into_frame + samples_to_do > samples_per_frame {
                samples_to_do = samples_per_frame - into_frame;
            }
        }

        samples_to_do
    }

    pub fn advance(&mut self, samples: usize) {
        self.current_sample += samples;
        self.samples_into_block += samples;
    }

    /// Rewind to the first sample, keeping the loop points
    pub fn reset(&mut self) {
        self.current_sample = 0;
        self.samples_into_block = 0;
        self.hit_loop = false;
        self.loop_count = 0;
        self.loop_samples_into_block = 0;
    }
}
