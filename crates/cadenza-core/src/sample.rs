//! Sample representations a [`SampleBuffer`](crate::SampleBuffer) can hold.

use core::fmt::Debug;
use core::ops::{Add, Mul, Sub};

/// A single audio sample.
///
/// Implemented for `f32` and `f64`. Conversions go through `f64`, which
/// represents every `f32` exactly, so widening is lossless and narrowing
/// rounds to nearest.
pub trait Sample:
    Copy
    + Default
    + PartialEq
    + PartialOrd
    + Debug
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
{
    const ZERO: Self;
    const ONE: Self;

    fn from_f32(value: f32) -> Self;
    fn from_f64(value: f64) -> Self;
    fn to_f32(self) -> f32;
    fn to_f64(self) -> f64;

    /// Widening or narrowing copy from another sample type.
    #[inline]
    fn convert<T: Sample>(value: T) -> Self {
        Self::from_f64(value.to_f64())
    }
}

macro_rules! impl_sample {
    ($t:ty) => {
        impl Sample for $t {
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;

            #[inline]
            fn from_f32(value: f32) -> Self {
                value as $t
            }

            #[inline]
            fn from_f64(value: f64) -> Self {
                value as $t
            }

            #[inline]
            fn to_f32(self) -> f32 {
                self as f32
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

impl_sample!(f32);
impl_sample!(f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widening_is_exact() {
        let value = 0.1_f32;
        let wide: f64 = Sample::convert(value);
        assert_eq!(wide, value as f64);
        let back: f32 = Sample::convert(wide);
        assert_eq!(back, value);
    }

    #[test]
    fn test_narrowing_rounds() {
        let narrow: f32 = Sample::convert(core::f64::consts::PI);
        assert_eq!(narrow, core::f32::consts::PI);
    }

    #[test]
    fn test_constants() {
        assert_eq!(<f32 as Sample>::ZERO, 0.0);
        assert_eq!(<f64 as Sample>::ONE, 1.0);
    }
}
