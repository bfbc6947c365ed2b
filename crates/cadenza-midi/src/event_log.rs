//! Time-ordered binary event log.
//!
//! Events live in one byte arena as packed records (see [`record`](crate::record)).
//! Insertion keeps the records sorted by frame; iteration walks the arena
//! without allocating.

use crate::compat::{fmt, Vec};
use crate::record::{Cursor, RecordHeader, HEADER_SIZE, MAX_PAYLOAD};
use crate::MidiMessage;
use cadenza_core::{Error, Result};
use midi_msg::MidiMsg;

/// A growable arena of time-stamped event records.
///
/// `used()` bytes hold records in non-decreasing frame order; `capacity()`
/// bytes are allocated. Inserting never allocates while
/// `capacity() - used()` covers the new record.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    arena: Vec<u8>,
}

/// Where a record goes relative to existing records with the same frame.
#[derive(Clone, Copy)]
enum Placement {
    BeforeEqual,
    AfterEqual,
}

/// A borrowed view of one record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Event<'a> {
    pub frame: i32,
    pub data: &'a [u8],
}

impl Event<'_> {
    /// Payload length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Parses the payload as a MIDI message.
    pub fn to_midi_msg(&self) -> core::result::Result<MidiMsg, midi_msg::ParseError> {
        MidiMsg::from_midi(self.data).map(|(msg, _len)| msg)
    }

    /// Copies the payload into a [`MidiMessage`] (time is left at zero).
    pub fn to_message(&self) -> MidiMessage {
        MidiMessage::from_bytes(self.data)
    }
}

impl EventLog {
    /// An empty log with no allocation.
    pub const fn new() -> Self {
        Self { arena: Vec::new() }
    }

    /// An empty log with at least `bytes` of reserved arena.
    pub fn with_capacity(bytes: usize) -> Result<Self> {
        let mut log = Self::new();
        log.reserve(bytes)?;
        Ok(log)
    }

    /// Allocated arena bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Arena bytes occupied by records.
    #[inline]
    pub fn used(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// The raw arena: `[i32 frame][u16 len][payload]` records, native order.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.arena
    }

    /// Grows the arena so that `capacity() >= min_bytes`. Never shrinks.
    pub fn reserve(&mut self, min_bytes: usize) -> Result<()> {
        if min_bytes <= self.arena.capacity() {
            return Ok(());
        }
        self.arena
            .try_reserve_exact(min_bytes - self.arena.len())
            .map_err(|_| Error::AllocFailed { bytes: min_bytes })?;

        tracing::debug!(bytes = self.arena.capacity(), "reserved event log arena");
        Ok(())
    }

    /// Inserts a record after every record with a smaller frame and before
    /// the first one whose frame is greater or equal.
    ///
    /// Allocates only when the free space is smaller than the record. Panics
    /// if `payload` is longer than [`MAX_PAYLOAD`].
    pub fn insert(&mut self, payload: &[u8], frame: i32) -> Result<()> {
        self.insert_record(payload, frame, Placement::BeforeEqual)
    }

    fn insert_record(&mut self, payload: &[u8], frame: i32, placement: Placement) -> Result<()> {
        assert!(
            payload.len() <= MAX_PAYLOAD,
            "event payload of {} bytes exceeds the record limit",
            payload.len()
        );

        let needed = HEADER_SIZE + payload.len();
        let used = self.arena.len();
        if self.arena.capacity() - used < needed {
            self.arena
                .try_reserve(needed)
                .map_err(|_| Error::AllocFailed { bytes: used + needed })?;
            tracing::trace!(bytes = self.arena.capacity(), "event log grew during insert");
        }

        let at = match placement {
            Placement::BeforeEqual => self.seek(frame),
            Placement::AfterEqual => self.seek_after(frame),
        }
        .0;
        self.arena.resize(used + needed, 0);
        self.arena.copy_within(at..used, at + needed);

        let header = RecordHeader {
            frame,
            len: payload.len() as u16,
        };
        header.write(&mut self.arena[at..]);
        self.arena[at + HEADER_SIZE..at + needed].copy_from_slice(payload);
        Ok(())
    }

    /// Inserts the bytes of `message` at `frame`.
    pub fn insert_message(&mut self, message: &MidiMessage, frame: i32) -> Result<()> {
        self.insert(message.data(), frame)
    }

    /// First record whose frame is `>= frame`, or `end()`.
    fn seek(&self, frame: i32) -> Cursor {
        let mut cursor = self.begin();
        while cursor < self.end() {
            if RecordHeader::read(&self.arena[cursor.0..]).frame >= frame {
                break;
            }
            cursor = self.next(cursor);
        }
        cursor
    }

    /// First record whose frame is `> frame`, or `end()`.
    fn seek_after(&self, frame: i32) -> Cursor {
        let mut cursor = self.seek(frame);
        while cursor < self.end() {
            if RecordHeader::read(&self.arena[cursor.0..]).frame > frame {
                break;
            }
            cursor = self.next(cursor);
        }
        cursor
    }

    /// Drops every record. Capacity is kept.
    #[inline]
    pub fn clear(&mut self) {
        self.arena.clear();
    }

    /// Removes every record with `start <= frame < start + count`.
    pub fn clear_range(&mut self, start: i32, count: i32) {
        if count <= 0 {
            return;
        }
        let end = start.saturating_add(count);
        let from = self.seek(start).0;
        let to = self.seek(end).0;
        self.arena.drain(from..to);
    }

    /// Exchanges contents and capacity with `other`.
    #[inline]
    pub fn swap(&mut self, other: &mut EventLog) {
        core::mem::swap(&mut self.arena, &mut other.arena);
    }

    #[inline]
    pub fn begin(&self) -> Cursor {
        Cursor(0)
    }

    #[inline]
    pub fn end(&self) -> Cursor {
        Cursor(self.arena.len())
    }

    /// Advances past the record at `cursor`, clamped to `end()`.
    #[inline]
    pub fn next(&self, cursor: Cursor) -> Cursor {
        if cursor >= self.end() {
            return self.end();
        }
        let header = RecordHeader::read(&self.arena[cursor.0..]);
        Cursor((cursor.0 + header.total_size()).min(self.arena.len()))
    }

    /// The record at `cursor`, or `None` at the end.
    pub fn event_at(&self, cursor: Cursor) -> Option<Event<'_>> {
        if cursor >= self.end() {
            return None;
        }
        let header = RecordHeader::read(&self.arena[cursor.0..]);
        let start = cursor.0 + HEADER_SIZE;
        Some(Event {
            frame: header.frame,
            data: &self.arena[start..start + header.len as usize],
        })
    }

    #[inline]
    pub fn iter(&self) -> Events<'_> {
        Events {
            log: self,
            cursor: self.begin(),
        }
    }

    pub fn num_events(&self) -> usize {
        self.iter().count()
    }

    pub fn first_frame(&self) -> Option<i32> {
        self.event_at(self.begin()).map(|event| event.frame)
    }

    pub fn last_frame(&self) -> Option<i32> {
        self.iter().last().map(|event| event.frame)
    }

    /// Copies the records of `source` with `start <= frame < start + count`
    /// (every record from `start` on when `count` is `None`), shifting each
    /// frame by `offset`.
    ///
    /// Copied records keep their source order and land after any record
    /// already here with the same frame.
    pub fn add_events(
        &mut self,
        source: &EventLog,
        start: i32,
        count: Option<i32>,
        offset: i32,
    ) -> Result<()> {
        let end = count.map(|count| start.saturating_add(count));
        let in_range = |event: &Event<'_>| {
            event.frame >= start && end.map_or(true, |end| event.frame < end)
        };

        let bytes: usize = source
            .iter()
            .filter(in_range)
            .map(|event| HEADER_SIZE + event.len())
            .sum();
        if bytes == 0 {
            return Ok(());
        }
        self.reserve(self.used() + bytes)?;

        for event in source.iter().filter(in_range) {
            self.insert_record(
                event.data,
                event.frame.saturating_add(offset),
                Placement::AfterEqual,
            )?;
        }
        Ok(())
    }
}

impl fmt::Debug for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLog")
            .field("used", &self.used())
            .field("capacity", &self.capacity())
            .field("events", &self.num_events())
            .finish()
    }
}

/// Iterator over the records of an [`EventLog`].
#[derive(Clone)]
pub struct Events<'a> {
    log: &'a EventLog,
    cursor: Cursor,
}

impl<'a> Iterator for Events<'a> {
    type Item = Event<'a>;

    #[inline]
    fn next(&mut self) -> Option<Event<'a>> {
        let event = self.log.event_at(self.cursor)?;
        self.cursor = self.log.next(self.cursor);
        Some(event)
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = Event<'a>;
    type IntoIter = Events<'a>;

    fn into_iter(self) -> Events<'a> {
        self.iter()
    }
}
