//! Process block configuration.

use crate::{Error, Result, INLINE_CHANNELS};
use serde::{Deserialize, Serialize};

/// Largest accepted frame count per block.
pub const MAX_FRAMES: usize = 65536;

/// Largest accepted channel count.
pub const MAX_CHANNELS: usize = 1024;

/// Largest accepted per-port event arena, in bytes.
pub const MAX_EVENT_BYTES: usize = 1 << 20;

fn default_channels() -> usize {
    2
}

fn default_frames() -> usize {
    512
}

fn default_ports() -> usize {
    1
}

fn default_event_bytes() -> usize {
    1024
}

/// Shape of the buffers a [`ProcessBlock`](crate::ProcessBlock) pre-allocates.
///
/// Missing fields take their defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockConfig {
    #[serde(default = "default_channels")]
    pub channels: usize,

    /// Frames per processing cycle.
    #[serde(default = "default_frames")]
    pub frames: usize,

    /// Event ports (one event log each).
    #[serde(default = "default_ports")]
    pub ports: usize,

    /// Arena bytes reserved per event port.
    #[serde(default = "default_event_bytes")]
    pub event_bytes: usize,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            channels: default_channels(),
            frames: default_frames(),
            ports: default_ports(),
            event_bytes: default_event_bytes(),
        }
    }
}

impl BlockConfig {
    pub fn validate(&self) -> Result<()> {
        if self.frames == 0 || self.frames > MAX_FRAMES {
            return Err(Error::InvalidConfig(format!(
                "frames {} out of range (1-{})",
                self.frames, MAX_FRAMES
            )));
        }
        if self.channels > MAX_CHANNELS {
            return Err(Error::InvalidConfig(format!(
                "channels {} exceeds {}",
                self.channels, MAX_CHANNELS
            )));
        }
        if self.event_bytes > MAX_EVENT_BYTES {
            return Err(Error::InvalidConfig(format!(
                "event_bytes {} exceeds {}",
                self.event_bytes, MAX_EVENT_BYTES
            )));
        }
        Ok(())
    }

    /// True if a buffer referring to `channels` external channels keeps its
    /// pointer table inline.
    pub fn is_inline(&self) -> bool {
        self.channels < INLINE_CHANNELS
    }
}
