//! Multi-channel sample buffers.

mod block;
mod ops;
mod sample_buffer;
mod table;

pub use sample_buffer::{Ownership, ResizePolicy, SampleBuffer};
pub use table::INLINE_CHANNELS;
