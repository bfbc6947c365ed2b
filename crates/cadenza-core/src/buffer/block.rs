//! Owned backing storage: the channel pointer table followed by sample data
//! in one allocation.
//!
//! ```text
//! [ *mut S; slots ][ pad to align_of::<S>() ][ S; channels * frames ]
//!   ^ table           (Layout::extend)          ^ samples
//! ```

use crate::compat::{ptr, slice, Layout, NonNull, PhantomData};
use crate::{Error, Result, Sample};
use alloc::alloc::{alloc_zeroed, dealloc};

pub(crate) struct SampleBlock<S> {
    ptr: NonNull<u8>,
    layout: Layout,
    samples_offset: usize,
    table_slots: usize,
    sample_capacity: usize,
    /// Live table entries (the terminator sits at this index).
    channels: usize,
    _marker: PhantomData<S>,
}

impl<S: Sample> SampleBlock<S> {
    /// Allocates a block for `channels × frames` samples. Both must be non-zero.
    ///
    /// Sample memory comes back zeroed so every slice handed out is
    /// initialized, but callers must not treat it as cleared.
    pub(crate) fn allocate(channels: usize, frames: usize) -> Result<Self> {
        debug_assert!(channels > 0 && frames > 0);

        let table_slots = channels.checked_add(1).ok_or(Error::CapacityOverflow)?;
        let sample_capacity = channels
            .checked_mul(frames)
            .ok_or(Error::CapacityOverflow)?;

        let table = Layout::array::<*mut S>(table_slots)?;
        let samples = Layout::array::<S>(sample_capacity)?;
        let (layout, samples_offset) = table.extend(samples)?;
        let layout = layout.pad_to_align();

        // SAFETY: the layout is never zero-sized, the table alone has two slots.
        let raw = unsafe { alloc_zeroed(layout) };
        let ptr = NonNull::new(raw).ok_or(Error::AllocFailed {
            bytes: layout.size(),
        })?;

        let mut block = Self {
            ptr,
            layout,
            samples_offset,
            table_slots,
            sample_capacity,
            channels: 0,
            _marker: PhantomData,
        };
        block.set_shape(channels, frames);

        tracing::debug!(channels, frames, bytes = layout.size(), "allocated sample block");
        Ok(block)
    }

    /// True if `channels × frames` can be laid out without reallocating.
    #[inline]
    pub(crate) fn fits(&self, channels: usize, frames: usize) -> bool {
        channels < self.table_slots
            && channels
                .checked_mul(frames)
                .is_some_and(|n| n <= self.sample_capacity)
    }

    /// Points the table at consecutive `frames`-sized slices.
    pub(crate) fn set_shape(&mut self, channels: usize, frames: usize) {
        assert!(self.fits(channels, frames));

        let table = self.ptr.as_ptr().cast::<*mut S>();
        let base = self.samples_ptr();
        // SAFETY: `fits` guarantees `channels < table_slots` and
        // `channels * frames <= sample_capacity`.
        unsafe {
            for c in 0..channels {
                table.add(c).write(base.add(c * frames));
            }
            table.add(channels).write(ptr::null_mut());
        }
        self.channels = channels;
    }

    /// Live entries followed by the terminator.
    #[inline]
    pub(crate) fn table(&self) -> &[*mut S] {
        // SAFETY: `set_shape` initialised `channels + 1` slots.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr().cast::<*mut S>(), self.channels + 1) }
    }

    #[inline]
    fn samples_ptr(&self) -> *mut S {
        // SAFETY: `samples_offset` comes from `Layout::extend` on this layout.
        unsafe { self.ptr.as_ptr().add(self.samples_offset).cast::<S>() }
    }

    /// The whole sample region, independent of the current shape.
    #[inline]
    pub(crate) fn samples_mut(&mut self) -> &mut [S] {
        // SAFETY: the region was zero-initialised on allocation.
        unsafe { slice::from_raw_parts_mut(self.samples_ptr(), self.sample_capacity) }
    }

    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.layout.size()
    }

    #[cfg(test)]
    fn alignment(&self) -> usize {
        self.layout.align()
    }

    #[cfg(test)]
    fn samples_offset(&self) -> usize {
        self.samples_offset
    }
}

impl<S> Drop for SampleBlock<S> {
    fn drop(&mut self) {
        // SAFETY: allocated in `allocate` with exactly this layout.
        unsafe { dealloc(self.ptr.as_ptr(), self.layout) };
    }
}

// SAFETY: the block exclusively owns its allocation; the table only points
// back into it.
unsafe impl<S: Send> Send for SampleBlock<S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{align_of, size_of};

    #[test]
    fn test_table_precedes_samples() {
        let block = SampleBlock::<f32>::allocate(2, 16).unwrap();
        let table = block.table();
        assert_eq!(table.len(), 3);
        assert!(table[2].is_null());

        let base = block.ptr.as_ptr() as usize;
        assert_eq!(table[0] as usize, base + block.samples_offset());
        assert_eq!(table[1] as usize - table[0] as usize, 16 * size_of::<f32>());
    }

    #[test]
    fn test_samples_offset_is_aligned() {
        let block = SampleBlock::<f64>::allocate(3, 5).unwrap();
        assert_eq!(block.samples_offset() % align_of::<f64>(), 0);
        assert!(block.samples_offset() >= 4 * size_of::<*mut f64>());
        assert!(block.alignment() >= align_of::<f64>());
        assert!(block.size() >= block.samples_offset() + 15 * size_of::<f64>());
    }

    #[test]
    fn test_fits() {
        let block = SampleBlock::<f32>::allocate(2, 100).unwrap();
        assert!(block.fits(2, 100));
        assert!(block.fits(1, 200));
        assert!(!block.fits(3, 10));
        assert!(!block.fits(2, 101));
        assert!(!block.fits(1, usize::MAX));
    }

    #[test]
    fn test_reshape_in_place() {
        let mut block = SampleBlock::<f32>::allocate(2, 8).unwrap();
        block.set_shape(1, 16);
        let table = block.table();
        assert_eq!(table.len(), 2);
        assert!(table[1].is_null());
    }

    #[test]
    fn test_overflowing_shape_is_rejected() {
        let result = SampleBlock::<f32>::allocate(usize::MAX, 2);
        assert!(matches!(result, Err(Error::CapacityOverflow)));
    }
}
