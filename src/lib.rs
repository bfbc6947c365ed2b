//! # Cadenza - Real-time Buffer Layer
//!
//! Moves audio samples and time-stamped events between a control thread and
//! a real-time processing callback.
//!
//! ## Architecture
//!
//! Cadenza is an umbrella crate over:
//! - **cadenza-core** - Sample buffers (owned or referenced storage, resize policies)
//! - **cadenza-midi** - Event logs, event pipes and MIDI messages
//!
//! ## Quick Start
//!
//! ```
//! use cadenza::prelude::*;
//!
//! let mut block = ProcessBlock::new(&BlockConfig::default())?;
//!
//! // Audio thread, once per cycle
//! block.begin_cycle();
//! let (audio, events) = block.split_mut();
//! events
//!     .get_mut(0)
//!     .unwrap()
//!     .insert_message(&MidiMessage::note_on(1, 60, 100), 64)?;
//! audio.set(0, 64, 0.5);
//! audio.fade(0.0, 1.0);
//! # Ok::<(), cadenza::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - `midi` + `std`
//! - `midi` - Event subsystem and [`ProcessBlock`]
//! - `std` - Enables `std` on the member crates

/// Re-export of cadenza-core for direct access
pub use cadenza_core as core;

pub use cadenza_core::{
    Error, Ownership, ResizePolicy, Result, Sample, SampleBuffer, INLINE_CHANNELS,
};

// Event subsystem
#[cfg(feature = "midi")]
pub use cadenza_midi as midi;

#[cfg(feature = "midi")]
pub use cadenza_midi::{Event, EventLog, EventPipe, MidiMessage};

mod config;
pub use config::{BlockConfig, MAX_CHANNELS, MAX_EVENT_BYTES, MAX_FRAMES};

#[cfg(feature = "midi")]
mod block;
#[cfg(feature = "midi")]
pub use block::ProcessBlock;

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{BlockConfig, ResizePolicy, Sample, SampleBuffer};

    #[cfg(feature = "midi")]
    pub use crate::{EventLog, EventPipe, MidiMessage, ProcessBlock};
}
