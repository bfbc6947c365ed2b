//! Multi-channel sample buffers for real-time audio.
//!
//! # Primary API
//!
//! - [`SampleBuffer`]: channel × frame sample matrix, owned or referenced
//! - [`ResizePolicy`]: preserve / clear / no-realloc flags for reshaping
//! - [`Sample`]: `f32` and `f64` sample representations
//!
//! # Example
//!
//! ```
//! use cadenza_core::{ResizePolicy, SampleBuffer};
//!
//! let mut buffer = SampleBuffer::<f32>::new(2, 256)?;
//! buffer.clear_all();
//! buffer.set(0, 0, 0.5);
//! buffer.resize(2, 128, ResizePolicy::default().preserve().no_realloc())?;
//! assert_eq!(buffer.get(0, 0), 0.5);
//! # Ok::<(), cadenza_core::Error>(())
//! ```

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod compat;

pub mod error;
pub use error::{Error, Result};

mod sample;
pub use sample::Sample;

pub mod buffer;
pub use buffer::{Ownership, ResizePolicy, SampleBuffer, INLINE_CHANNELS};
