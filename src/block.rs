//! Pre-allocated audio and event storage for one processing cycle.

use crate::config::BlockConfig;
use crate::{EventPipe, ResizePolicy, Result, SampleBuffer};

/// A sample buffer and an event pipe sized from a [`BlockConfig`].
///
/// Build and [`reconfigure`](Self::reconfigure) on the control thread, then
/// move it to the audio thread. [`begin_cycle`](Self::begin_cycle) and
/// inserts within the reserved event bytes never allocate.
#[derive(Debug)]
pub struct ProcessBlock {
    audio: SampleBuffer<f32>,
    events: EventPipe,
    config: BlockConfig,
}

impl ProcessBlock {
    pub fn new(config: &BlockConfig) -> Result<Self> {
        config.validate()?;

        let audio = SampleBuffer::new(config.channels, config.frames)?;
        let events = EventPipe::with_capacity(config.ports, config.event_bytes)?;

        tracing::debug!(
            channels = config.channels,
            frames = config.frames,
            ports = config.ports,
            "created process block"
        );

        Ok(Self {
            audio,
            events,
            config: config.clone(),
        })
    }

    #[inline]
    pub fn config(&self) -> &BlockConfig {
        &self.config
    }

    #[inline]
    pub fn audio(&self) -> &SampleBuffer<f32> {
        &self.audio
    }

    #[inline]
    pub fn audio_mut(&mut self) -> &mut SampleBuffer<f32> {
        &mut self.audio
    }

    #[inline]
    pub fn events(&self) -> &EventPipe {
        &self.events
    }

    #[inline]
    pub fn events_mut(&mut self) -> &mut EventPipe {
        &mut self.events
    }

    /// Both halves at once, for a callback that reads events while writing
    /// samples.
    #[inline]
    pub fn split_mut(&mut self) -> (&mut SampleBuffer<f32>, &mut EventPipe) {
        (&mut self.audio, &mut self.events)
    }

    /// Silences the audio and empties every active event port.
    pub fn begin_cycle(&mut self) {
        self.audio.clear_all();
        self.events.clear_all();
    }

    /// Reshapes to `config`, discarding audio content.
    ///
    /// Reuses the sample block when it is large enough. Adding ports beyond
    /// the allocated count discards pending events on every port. The event
    /// side is reshaped first; if the sample buffer then fails to grow, the
    /// ports keep their new shape while the audio and [`config`](Self::config)
    /// stay as they were, and the call can be retried.
    pub fn reconfigure(&mut self, config: &BlockConfig) -> Result<()> {
        config.validate()?;
        if *config == self.config {
            return Ok(());
        }

        self.events
            .resize_with_capacity(config.ports, config.event_bytes)?;

        self.audio.resize(
            config.channels,
            config.frames,
            ResizePolicy::default().clear().no_realloc(),
        )?;

        tracing::debug!(
            channels = config.channels,
            frames = config.frames,
            ports = config.ports,
            "reconfigured process block"
        );
        self.config = config.clone();
        Ok(())
    }
}
