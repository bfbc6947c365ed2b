//! Binary record framing for [`EventLog`](crate::EventLog) arenas.
//!
//! ```text
//! [ frame: i32 ][ len: u16 ][ payload: len bytes ]
//! ```
//!
//! Native byte order, packed without padding.

/// Bytes taken by a record header.
pub const HEADER_SIZE: usize = 6;

/// Largest payload a single record can carry.
pub const MAX_PAYLOAD: usize = u16::MAX as usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RecordHeader {
    pub frame: i32,
    pub len: u16,
}

impl RecordHeader {
    /// Reads the header at the start of `bytes`.
    ///
    /// Panics if fewer than [`HEADER_SIZE`] bytes remain.
    #[inline]
    pub fn read(bytes: &[u8]) -> Self {
        let mut frame = [0u8; 4];
        let mut len = [0u8; 2];
        frame.copy_from_slice(&bytes[..4]);
        len.copy_from_slice(&bytes[4..HEADER_SIZE]);
        Self {
            frame: i32::from_ne_bytes(frame),
            len: u16::from_ne_bytes(len),
        }
    }

    #[inline]
    pub fn write(&self, bytes: &mut [u8]) {
        bytes[..4].copy_from_slice(&self.frame.to_ne_bytes());
        bytes[4..HEADER_SIZE].copy_from_slice(&self.len.to_ne_bytes());
    }

    /// Header plus payload.
    #[inline]
    pub fn total_size(&self) -> usize {
        HEADER_SIZE + self.len as usize
    }
}

/// Byte offset of a record inside an arena.
///
/// Obtained from [`EventLog::begin`](crate::EventLog::begin) and friends.
/// Growing the log does not move records relative to each other, but any
/// insertion shifts the records after the insertion point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor(pub(crate) usize);

impl Cursor {
    #[inline]
    pub fn offset(self) -> usize {
        self.0
    }
}
