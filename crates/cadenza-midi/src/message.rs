//! Compact MIDI message with a timestamp.

use crate::compat::fmt;
use smallvec::SmallVec;

/// Bytes stored inline before a message spills to the heap.
pub const INLINE_MESSAGE_BYTES: usize = 8;

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;
const CONTROLLER: u8 = 0xB0;
const SYSTEM: u8 = 0xF0;

/// A raw MIDI message plus a timestamp in seconds.
///
/// Channel voice messages and short SysEx stay inline; longer messages
/// allocate. Channels are 1-based (1..=16) in this API.
#[derive(Clone, PartialEq)]
pub struct MidiMessage {
    data: SmallVec<[u8; INLINE_MESSAGE_BYTES]>,
    time: f64,
}

impl MidiMessage {
    /// Copies `bytes` into a new message with time `0.0`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            data: SmallVec::from_slice(bytes),
            time: 0.0,
        }
    }

    /// Unpacks little-endian bytes (`status | data1 << 8 | data2 << 16 | data3 << 24`).
    ///
    /// The result is three bytes long unless the top byte is nonzero, in
    /// which case it is four. Inverse of [`to_packed`](Self::to_packed) for
    /// messages of three bytes, and of four bytes ending in a nonzero byte.
    pub fn from_packed(packed: u32) -> Self {
        let bytes = packed.to_le_bytes();
        let len = if bytes[3] == 0 { 3 } else { 4 };
        Self::from_bytes(&bytes[..len])
    }

    /// Panics unless `channel` is in `1..=16`.
    pub fn note_on(channel: u8, note: u8, velocity: u8) -> Self {
        Self::channel_voice(NOTE_ON, channel, note, velocity)
    }

    /// Panics unless `channel` is in `1..=16`.
    pub fn note_off(channel: u8, note: u8, velocity: u8) -> Self {
        Self::channel_voice(NOTE_OFF, channel, note, velocity)
    }

    /// Panics unless `channel` is in `1..=16`.
    pub fn controller(channel: u8, control: u8, value: u8) -> Self {
        Self::channel_voice(CONTROLLER, channel, control, value)
    }

    fn channel_voice(status: u8, channel: u8, data1: u8, data2: u8) -> Self {
        assert!((1..=16).contains(&channel), "MIDI channel out of range: {channel}");
        Self::from_bytes(&[status | (channel - 1), data1 & 0x7F, data2 & 0x7F])
    }

    /// Replaces the content. Empty input is ignored.
    pub fn update(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        self.data.clear();
        self.data.extend_from_slice(bytes);
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    #[inline]
    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    #[inline]
    fn byte(&self, index: usize) -> u8 {
        self.data.get(index).copied().unwrap_or(0)
    }

    #[inline]
    fn status(&self) -> u8 {
        self.byte(0) & 0xF0
    }

    /// 1..=16 for channel messages, 0 for system and empty messages.
    pub fn channel(&self) -> u8 {
        if self.data.is_empty() || self.status() == SYSTEM {
            0
        } else {
            (self.byte(0) & 0x0F) + 1
        }
    }

    /// Rewrites the channel nibble. Ignored for system messages and for
    /// channels outside `1..=16`.
    pub fn set_channel(&mut self, channel: u8) {
        if self.status() == SYSTEM || !(1..=16).contains(&channel) {
            return;
        }
        if let Some(status) = self.data.first_mut() {
            *status = (*status & 0xF0) | (channel - 1);
        }
    }

    /// Note-on with a non-zero velocity.
    pub fn is_note_on(&self) -> bool {
        self.status() == NOTE_ON && self.byte(2) != 0
    }

    /// Status 0x8n only; a note-on with velocity 0 is not reported here.
    pub fn is_note_off(&self) -> bool {
        self.status() == NOTE_OFF
    }

    pub fn is_controller(&self) -> bool {
        self.status() == CONTROLLER
    }

    /// Packs up to the first four bytes little-endian.
    pub fn to_packed(&self) -> u32 {
        let mut bytes = [0u8; 4];
        let len = self.data.len().min(4);
        bytes[..len].copy_from_slice(&self.data[..len]);
        u32::from_le_bytes(bytes)
    }
}

/// An empty SysEx message (`F0 F7`).
impl Default for MidiMessage {
    fn default() -> Self {
        Self::from_bytes(&[0xF0, 0xF7])
    }
}

impl fmt::Display for MidiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "data1=0x{:02x} data2=0x{:02x} data3=0x{:02x}",
            self.byte(0),
            self.byte(1),
            self.byte(2)
        )
    }
}

impl fmt::Debug for MidiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MidiMessage")
            .field("data", &self.data.as_slice())
            .field("time", &self.time)
            .finish()
    }
}
