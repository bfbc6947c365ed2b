//! Test helpers and fixtures for cadenza integration tests
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-6): Single gains, short ramps
//! - `RAMP_EPSILON` (1e-4): Long fades
//! - `NARROWING_EPSILON`: f64 -> f32 copies

#![allow(dead_code)]

pub mod tolerances;

use cadenza::prelude::*;

/// Standard block size for deterministic testing
pub const TEST_FRAMES: usize = 512;

/// Install a tracing subscriber once, honouring `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Owned buffer filled with `generate_integer_staircase` offset per channel
/// (`channel * 1000 + frame`).
pub fn staircase_buffer(channels: usize, frames: usize) -> SampleBuffer<f32> {
    let mut buffer = SampleBuffer::new(channels, frames).expect("Failed to create test buffer");
    for c in 0..channels {
        for (f, sample) in buffer.channel_mut(c).iter_mut().enumerate() {
            *sample = (c * 1000 + f) as f32;
        }
    }
    buffer
}

/// Generate an integer staircase signal [0, 1, 2, ..., n-1] as f32.
///
/// Each sample equals its index, so copies and offsets can be verified exactly.
pub fn generate_integer_staircase(num_samples: usize) -> Vec<f32> {
    (0..num_samples).map(|i| i as f32).collect()
}

/// Generate a DC signal (constant value).
pub fn generate_dc(value: f32, num_samples: usize) -> Vec<f32> {
    vec![value; num_samples]
}

/// Calculate peak amplitude of a signal.
pub fn peak(samples: &[f32]) -> f32 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0_f32, |a, b| a.max(b))
}

/// Assert that a signal is exactly silent.
pub fn assert_silence(samples: &[f32]) {
    let max = peak(samples);
    assert!(max == 0.0, "Expected silence, but peak amplitude was {}", max);
}

#[cfg(feature = "midi")]
/// Frames of every record in an event log, in iteration order.
pub fn frames_of(log: &EventLog) -> Vec<i32> {
    log.iter().map(|event| event.frame).collect()
}
