//! Event subsystem for cadenza.
//!
//! Provides sample-accurate binary event storage for the real-time callback.
//!
//! # Features
//!
//! - **Event logs**: [`EventLog`], a byte arena of frame-stamped records kept in
//!   time order, iterated without allocating
//! - **Event pipes**: [`EventPipe`], per-port logs with partial resize
//! - **Messages**: [`MidiMessage`], compact raw MIDI with channel helpers
//!
//! # Example
//!
//! ```
//! use cadenza_midi::{EventPipe, MidiMessage};
//!
//! let mut pipe = EventPipe::with_capacity(2, 1024)?;
//! let log = pipe.get_mut(0).unwrap();
//! log.insert_message(&MidiMessage::note_on(1, 60, 100), 128)?;
//! log.insert_message(&MidiMessage::note_off(1, 60, 0), 0)?;
//!
//! let frames: Vec<i32> = log.iter().map(|event| event.frame).collect();
//! assert_eq!(frames, [0, 128]);
//! # Ok::<(), cadenza_midi::Error>(())
//! ```

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub(crate) use cadenza_core::compat;

pub use cadenza_core::{Error, Result};

pub mod record;
pub use record::{Cursor, HEADER_SIZE, MAX_PAYLOAD};

mod event_log;
pub use event_log::{Event, EventLog, Events};

mod event_pipe;
pub use event_pipe::EventPipe;

mod message;
pub use message::{MidiMessage, INLINE_MESSAGE_BYTES};
