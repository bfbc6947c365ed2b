//! Clears, gains and fades over a [`SampleBuffer`].
//!
//! Everything here works in place and never allocates. Operations on a
//! buffer that is already cleared are skipped.

use super::SampleBuffer;
use crate::Sample;

impl<S: Sample> SampleBuffer<S> {
    /// Zeroes every sample and marks the buffer cleared.
    pub fn clear_all(&mut self) {
        if self.cleared {
            return;
        }
        for c in 0..self.channels() {
            self.channel_mut(c).fill(S::ZERO);
        }
        self.cleared = true;
    }

    /// Zeroes one channel. Marks the buffer cleared only if it is mono.
    pub fn clear_channel(&mut self, channel: usize) {
        if self.cleared {
            return;
        }
        self.channel_mut(channel).fill(S::ZERO);
        if channel == 0 && self.channels() == 1 {
            self.cleared = true;
        }
    }

    /// Zeroes `count` frames from `start` on every channel.
    ///
    /// Marks the buffer cleared when the range covers the whole buffer.
    pub fn clear_range(&mut self, start: usize, count: usize) {
        if self.cleared {
            return;
        }
        for c in 0..self.channels() {
            self.channel_mut(c)[start..start + count].fill(S::ZERO);
        }
        if start == 0 && count == self.frames() {
            self.cleared = true;
        }
    }

    /// Zeroes `count` frames from `start` on one channel.
    ///
    /// Never marks the buffer cleared, even if this zeroes the last nonzero
    /// samples.
    pub fn clear_channel_range(&mut self, channel: usize, start: usize, count: usize) {
        if self.cleared {
            return;
        }
        self.channel_mut(channel)[start..start + count].fill(S::ZERO);
    }

    pub fn apply_gain(&mut self, gain: f32) {
        if gain == 1.0 || self.cleared {
            return;
        }
        let gain = S::from_f32(gain);
        for c in 0..self.channels() {
            scale(self.channel_mut(c), gain);
        }
    }

    pub fn apply_gain_channel(&mut self, channel: usize, gain: f32) {
        if gain == 1.0 || self.cleared {
            return;
        }
        scale(self.channel_mut(channel), S::from_f32(gain));
    }

    pub fn apply_gain_range(&mut self, channel: usize, start: usize, count: usize, gain: f32) {
        if gain == 1.0 || self.cleared {
            return;
        }
        scale(&mut self.channel_mut(channel)[start..start + count], S::from_f32(gain));
    }

    /// Applies a linear gain ramp from `start_gain` to `end_gain` across
    /// every channel.
    pub fn fade(&mut self, start_gain: f32, end_gain: f32) {
        for c in 0..self.channels() {
            self.fade_channel(c, start_gain, end_gain);
        }
    }

    pub fn fade_channel(&mut self, channel: usize, start_gain: f32, end_gain: f32) {
        let frames = self.frames();
        self.fade_range(channel, 0, frames, start_gain, end_gain);
    }

    /// Ramps `count` frames from `start`. The first sample is scaled by
    /// `start_gain`; the gain then rises by `(end_gain - start_gain) / count`
    /// per sample.
    pub fn fade_range(
        &mut self,
        channel: usize,
        start: usize,
        count: usize,
        start_gain: f32,
        end_gain: f32,
    ) {
        if start_gain == end_gain {
            self.apply_gain_range(channel, start, count, start_gain);
            return;
        }
        if self.cleared || count == 0 {
            return;
        }

        let step = S::from_f64((end_gain as f64 - start_gain as f64) / count as f64);
        let mut gain = S::from_f32(start_gain);
        for sample in &mut self.channel_mut(channel)[start..start + count] {
            *sample = *sample * gain;
            gain = gain + step;
        }
    }
}

#[inline]
fn scale<S: Sample>(samples: &mut [S], gain: S) {
    for sample in samples {
        *sample = *sample * gain;
    }
}
