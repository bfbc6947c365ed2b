//! Tolerance constants for buffer testing.
//!
//! Gains and ramps are computed in the buffer's sample type, so results
//! carry ordinary rounding error. Plain copies and clears are exact.

/// Floating point rounding errors (single gain, short ramps).
pub const FLOAT_EPSILON: f32 = 1e-6;

/// Accumulated ramp error over long fades (one step added per sample).
pub const RAMP_EPSILON: f32 = 1e-4;

/// f64 -> f32 narrowing, relative to the magnitude of the value.
pub const NARROWING_EPSILON: f64 = f32::EPSILON as f64;
