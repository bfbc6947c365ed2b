//! Multi-channel sample buffer with owned or referenced storage.

use super::block::SampleBlock;
use super::table::ChannelTable;
use crate::compat::{fmt, ptr, slice};
use crate::{Result, Sample};

/// Who owns the sample memory behind a [`SampleBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// The buffer allocated (or will allocate) its own block.
    Owned,
    /// The buffer points into caller memory, `offset` frames in.
    Referenced { offset: usize },
}

/// Flags for [`SampleBuffer::resize`].
///
/// ```
/// use cadenza_core::ResizePolicy;
///
/// let policy = ResizePolicy::default().preserve().clear();
/// assert!(policy.preserve && policy.clear && !policy.no_realloc);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizePolicy {
    /// Copy the overlapping old content into the new layout.
    pub preserve: bool,
    /// Zero every region that did not exist before (everything without `preserve`).
    pub clear: bool,
    /// Reshape inside the current block when it is big enough.
    pub no_realloc: bool,
}

impl ResizePolicy {
    #[inline]
    pub fn preserve(mut self) -> Self {
        self.preserve = true;
        self
    }

    #[inline]
    pub fn clear(mut self) -> Self {
        self.clear = true;
        self
    }

    #[inline]
    pub fn no_realloc(mut self) -> Self {
        self.no_realloc = true;
        self
    }
}

pub(crate) enum Storage<S> {
    /// `None` for an empty buffer.
    Owned(Option<SampleBlock<S>>),
    Referenced {
        table: ChannelTable<S>,
        offset: usize,
    },
}

/// A matrix of per-channel sample arrays.
///
/// In owned mode the buffer allocates one block holding the channel pointer
/// table followed by the samples. In referenced mode it only keeps a pointer
/// table into caller memory (see [`refer_to`](SampleBuffer::refer_to)).
///
/// The buffer tracks a conservative `cleared` flag: when it is set every
/// sample is zero and clears or gains can be skipped.
///
/// Not thread-safe. Shape changes (`new`, `resize`, `refer_to`, `duplicate`)
/// belong on the control thread; element access, clears and gains never
/// allocate.
pub struct SampleBuffer<S: Sample = f32> {
    channels: usize,
    frames: usize,
    storage: Storage<S>,
    empty_table: [*mut S; 1],
    pub(crate) cleared: bool,
}

// SAFETY: an owned block is exclusively owned by the buffer. Referenced
// memory is covered by the contract of `refer_to`, which makes the caller
// responsible for the pointed-to arrays wherever the buffer is used.
unsafe impl<S: Sample> Send for SampleBuffer<S> {}

impl<S: Sample> SampleBuffer<S> {
    /// Creates an owned buffer. Zero channels or frames gives an empty buffer
    /// without any allocation.
    pub fn new(channels: usize, frames: usize) -> Result<Self> {
        let mut buffer = Self::empty();
        if channels > 0 && frames > 0 {
            buffer.storage = Storage::Owned(Some(SampleBlock::allocate(channels, frames)?));
            buffer.channels = channels;
            buffer.frames = frames;
        }
        Ok(buffer)
    }

    /// An owned buffer with no channels and no allocation.
    pub fn empty() -> Self {
        Self {
            channels: 0,
            frames: 0,
            storage: Storage::Owned(None),
            empty_table: [ptr::null_mut()],
            cleared: false,
        }
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Samples per channel.
    #[inline]
    pub fn frames(&self) -> usize {
        self.frames
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.channels == 0 || self.frames == 0
    }

    /// True only if every sample is known to be zero.
    #[inline]
    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    pub fn ownership(&self) -> Ownership {
        match &self.storage {
            Storage::Owned(_) => Ownership::Owned,
            Storage::Referenced { offset, .. } => Ownership::Referenced { offset: *offset },
        }
    }

    /// Size of the owned block in bytes; zero when empty or referenced.
    pub fn allocated_bytes(&self) -> usize {
        match &self.storage {
            Storage::Owned(Some(block)) => block.size(),
            _ => 0,
        }
    }

    #[inline]
    fn table(&self) -> &[*mut S] {
        match &self.storage {
            Storage::Owned(Some(block)) => block.table(),
            Storage::Owned(None) => &self.empty_table,
            Storage::Referenced { table, .. } => table.as_slice(),
        }
    }

    /// The live channel pointers, without the terminator.
    ///
    /// Valid until the next shape-changing call.
    #[inline]
    pub fn channel_ptrs(&self) -> &[*mut S] {
        &self.table()[..self.channels]
    }

    /// The null-terminated channel pointer table, for hosts that walk it
    /// directly. Valid until the next shape-changing call.
    #[inline]
    pub fn as_ptr_table(&self) -> *const *mut S {
        self.table().as_ptr()
    }

    /// Raw pointer to the first sample of `channel`.
    #[inline]
    pub fn channel_ptr(&self, channel: usize) -> *mut S {
        self.channel_ptrs()[channel]
    }

    #[inline]
    pub fn channel(&self, channel: usize) -> &[S] {
        let data = self.channel_ptrs()[channel];
        // SAFETY: owned channels are `frames` long inside the block; referenced
        // channels are covered by the `refer_to` contract.
        unsafe { slice::from_raw_parts(data, self.frames) }
    }

    /// Mutable view of one channel. Drops the cleared flag, like `set`.
    #[inline]
    pub fn channel_mut(&mut self, channel: usize) -> &mut [S] {
        let data = self.channel_ptrs()[channel];
        self.cleared = false;
        // SAFETY: see `channel`; `&mut self` gives exclusive access.
        unsafe { slice::from_raw_parts_mut(data, self.frames) }
    }

    pub fn channels_iter(&self) -> impl Iterator<Item = &[S]> + '_ {
        (0..self.channels).map(move |c| self.channel(c))
    }

    /// Panics if `channel` or `frame` is out of range.
    #[inline]
    pub fn get(&self, channel: usize, frame: usize) -> S {
        self.channel(channel)[frame]
    }

    /// Panics if `channel` or `frame` is out of range.
    #[inline]
    pub fn set(&mut self, channel: usize, frame: usize, value: S) {
        self.channel_mut(channel)[frame] = value;
        self.cleared = false;
    }

    /// # Safety
    ///
    /// `channel < self.channels()` and `frame < self.frames()`.
    #[inline]
    pub unsafe fn get_unchecked(&self, channel: usize, frame: usize) -> S {
        *self.table().get_unchecked(channel).add(frame)
    }

    /// # Safety
    ///
    /// `channel < self.channels()` and `frame < self.frames()`.
    #[inline]
    pub unsafe fn set_unchecked(&mut self, channel: usize, frame: usize, value: S) {
        *self.table().get_unchecked(channel).add(frame) = value;
        self.cleared = false;
    }

    /// Drops any owned block (or reference) and leaves an empty owned buffer.
    pub fn release(&mut self) {
        self.storage = Storage::Owned(None);
        self.channels = 0;
        self.frames = 0;
        self.cleared = false;
    }

    /// Changes the shape. A no-op when the shape is unchanged.
    ///
    /// Zero channels or frames releases the storage. Otherwise the buffer
    /// ends up owned: with `no_realloc` it reshapes inside its current block
    /// when that block is big enough, else it allocates a new one. On error
    /// the buffer is left as it was.
    pub fn resize(&mut self, channels: usize, frames: usize, policy: ResizePolicy) -> Result<()> {
        if channels == self.channels && frames == self.frames {
            return Ok(());
        }

        if channels == 0 || frames == 0 {
            self.release();
            return Ok(());
        }

        let (old_channels, old_frames) = (self.channels, self.frames);
        let cleared_after = policy.clear && (!policy.preserve || self.cleared);

        if policy.no_realloc {
            if let Storage::Owned(Some(block)) = &mut self.storage {
                if block.fits(channels, frames) {
                    if policy.preserve {
                        relayout(block.samples_mut(), (old_channels, old_frames), (channels, frames));
                    }
                    block.set_shape(channels, frames);
                    self.channels = channels;
                    self.frames = frames;

                    if policy.clear {
                        self.zero_added(policy.preserve, old_channels, old_frames);
                    }
                    self.cleared = cleared_after;

                    tracing::debug!(channels, frames, "resized sample buffer in place");
                    return Ok(());
                }
            }
        }

        let mut block = SampleBlock::allocate(channels, frames)?;
        if policy.preserve {
            let keep_frames = old_frames.min(frames);
            let samples = block.samples_mut();
            for c in 0..old_channels.min(channels) {
                let start = c * frames;
                samples[start..start + keep_frames].copy_from_slice(&self.channel(c)[..keep_frames]);
            }
        }

        // Fresh blocks are zeroed, so `clear` has nothing left to do here.
        self.storage = Storage::Owned(Some(block));
        self.channels = channels;
        self.frames = frames;
        self.cleared = cleared_after;

        tracing::debug!(channels, frames, "resized sample buffer into a new block");
        Ok(())
    }

    /// [`resize`](Self::resize) with no policy flags.
    #[inline]
    pub fn set_size(&mut self, channels: usize, frames: usize) -> Result<()> {
        self.resize(channels, frames, ResizePolicy::default())
    }

    /// Zeroes what `resize` added: everything without `preserve`, otherwise new
    /// channels and the grown tail of kept ones.
    fn zero_added(&mut self, preserve: bool, old_channels: usize, old_frames: usize) {
        for c in 0..self.channels {
            let channel = self.channel_mut(c);
            if !preserve || c >= old_channels {
                channel.fill(S::ZERO);
            } else if channel.len() > old_frames {
                channel[old_frames..].fill(S::ZERO);
            }
        }
    }

    /// Points the buffer at caller-owned channels without copying.
    ///
    /// Channel `c` becomes `data[c] + offset`. Any owned block is released.
    /// Allocates only when `data.len() + 1` exceeds
    /// [`INLINE_CHANNELS`](crate::INLINE_CHANNELS).
    ///
    /// # Safety
    ///
    /// Every pointer in `data` must be non-null and valid for reads and
    /// writes of `offset + frames` samples for as long as the buffer refers
    /// to it, and nothing else may access that memory while the buffer does.
    pub unsafe fn refer_to(&mut self, data: &[*mut S], frames: usize, offset: usize) -> Result<()> {
        match &mut self.storage {
            Storage::Referenced {
                table,
                offset: current,
            } => {
                table.fill(data, offset)?;
                *current = offset;
            }
            storage => {
                let mut table = ChannelTable::new();
                table.fill(data, offset)?;
                *storage = Storage::Referenced { table, offset };
            }
        }

        self.channels = data.len();
        self.frames = frames;
        self.cleared = false;

        tracing::debug!(channels = data.len(), frames, offset, "sample buffer refers to external channels");
        Ok(())
    }

    /// Resizes to the source's shape, discarding old content, and copies
    /// `frames` samples of every source channel, converting the sample type.
    ///
    /// Panics if a source channel is shorter than `frames`.
    pub fn duplicate<T: Sample>(&mut self, source: &[&[T]], frames: usize) -> Result<()> {
        self.resize(source.len(), frames, ResizePolicy::default().no_realloc())?;
        if self.is_empty() {
            return Ok(());
        }

        for (c, src) in source.iter().enumerate() {
            let dst = self.channel_mut(c);
            for (d, s) in dst.iter_mut().zip(&src[..frames]) {
                *d = S::convert(*s);
            }
        }
        self.cleared = false;
        Ok(())
    }
}

/// Moves the kept region of every channel from an `old` stride to a `new`
/// stride inside one sample region.
fn relayout<S: Sample>(samples: &mut [S], old: (usize, usize), new: (usize, usize)) {
    let (old_channels, old_frames) = old;
    let (channels, frames) = new;
    let keep_channels = old_channels.min(channels);
    let keep_frames = old_frames.min(frames);

    let mut move_channel = |c: usize| {
        let src = c * old_frames;
        samples.copy_within(src..src + keep_frames, c * frames);
    };

    // Growing strides move right, so walk backwards to avoid clobbering
    // channels that have not moved yet.
    if frames > old_frames {
        (0..keep_channels).rev().for_each(&mut move_channel);
    } else if frames < old_frames {
        (0..keep_channels).for_each(&mut move_channel);
    }
}

impl<S: Sample> Default for SampleBuffer<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: Sample> fmt::Display for SampleBuffer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SampleBuffer: channels={} length={}", self.channels, self.frames)
    }
}

impl<S: Sample> fmt::Debug for SampleBuffer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SampleBuffer")
            .field("channels", &self.channels)
            .field("frames", &self.frames)
            .field("ownership", &self.ownership())
            .field("cleared", &self.cleared)
            .finish()
    }
}
