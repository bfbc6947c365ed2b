//! Null-terminated channel pointer tables for referenced buffers.

use crate::compat::ptr;
use crate::Result;
use smallvec::SmallVec;

/// Table slots kept inline before the table spills to the heap.
///
/// A table holds `channels + 1` slots (the last one is the null terminator),
/// so buffers with fewer than `INLINE_CHANNELS` channels never allocate when
/// they refer to external memory.
pub const INLINE_CHANNELS: usize = 32;

pub(crate) struct ChannelTable<S> {
    slots: SmallVec<[*mut S; INLINE_CHANNELS]>,
}

impl<S> ChannelTable<S> {
    pub(crate) fn new() -> Self {
        let mut slots = SmallVec::new();
        slots.push(ptr::null_mut());
        Self { slots }
    }

    /// Rewrites the table to `data[c] + offset` for every channel.
    ///
    /// The table is left untouched if growing it fails.
    ///
    /// # Safety
    ///
    /// Every pointer in `data` must be non-null and valid for at least
    /// `offset` elements past it.
    pub(crate) unsafe fn fill(&mut self, data: &[*mut S], offset: usize) -> Result<()> {
        let needed = data.len() + 1;
        if needed > self.slots.capacity() {
            self.slots.try_reserve(needed - self.slots.len())?;
            if self.slots.spilled() {
                tracing::warn!(
                    channels = data.len(),
                    "channel table spilled to the heap; refer_to is no longer allocation-free"
                );
            }
        }

        self.slots.clear();
        for &channel in data {
            debug_assert!(!channel.is_null(), "null channel pointer");
            self.slots.push(channel.add(offset));
        }
        self.slots.push(ptr::null_mut());
        Ok(())
    }

    /// Live entries followed by the terminator.
    #[inline]
    pub(crate) fn as_slice(&self) -> &[*mut S] {
        &self.slots
    }

    #[cfg(test)]
    fn is_inline(&self) -> bool {
        !self.slots.spilled()
    }
}
