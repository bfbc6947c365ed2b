//! A fixed set of event logs addressed by port index.

use crate::compat::{fmt, Vec};
use crate::EventLog;
use cadenza_core::Result;

/// `size()` allocated event logs of which the first `len()` are active.
///
/// Shrinking only lowers the active count; the logs beyond it keep their
/// capacity and content. Growing past `size()` discards every log and
/// builds a fresh set.
#[derive(Clone, Default)]
pub struct EventPipe {
    logs: Vec<EventLog>,
    used: usize,
    log_capacity: usize,
}

impl EventPipe {
    /// `n` empty logs without reserved arenas.
    pub fn new(n: usize) -> Result<Self> {
        Self::with_capacity(n, 0)
    }

    /// `n` empty logs, each reserving `bytes_per_log`. Logs created by a
    /// later destructive grow reserve the same amount.
    pub fn with_capacity(n: usize, bytes_per_log: usize) -> Result<Self> {
        let mut pipe = Self {
            logs: Vec::new(),
            used: 0,
            log_capacity: bytes_per_log,
        };
        pipe.logs = build_logs(n, bytes_per_log)?;
        pipe.used = n;
        Ok(pipe)
    }

    /// Allocated slots.
    #[inline]
    pub fn size(&self) -> usize {
        self.logs.len()
    }

    /// Active slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.used
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Sets the active count to `n`.
    ///
    /// Within `size()` this only moves the active count. Above it, every
    /// existing log and its content is dropped and `n` new logs are built;
    /// on error the pipe is left as it was.
    pub fn resize(&mut self, n: usize) -> Result<()> {
        if n <= self.logs.len() {
            if n != self.used {
                tracing::debug!(from = self.used, to = n, "event pipe active count changed");
                self.used = n;
            }
            return Ok(());
        }

        tracing::warn!(
            from = self.logs.len(),
            to = n,
            "growing event pipe discards the content of every log"
        );
        self.logs = build_logs(n, self.log_capacity)?;
        self.used = n;
        Ok(())
    }

    /// [`resize`](Self::resize) that also makes every allocated log, and
    /// every log built by a later destructive grow, reserve at least
    /// `bytes_per_log`.
    ///
    /// On error the active count and the per-log reserve are unchanged.
    pub fn resize_with_capacity(&mut self, n: usize, bytes_per_log: usize) -> Result<()> {
        if n > self.logs.len() {
            let previous = core::mem::replace(&mut self.log_capacity, bytes_per_log);
            if let Err(err) = self.resize(n) {
                self.log_capacity = previous;
                return Err(err);
            }
            return Ok(());
        }

        for log in &mut self.logs {
            log.reserve(bytes_per_log)?;
        }
        self.log_capacity = bytes_per_log;
        self.resize(n)
    }

    /// Bytes each newly built log reserves.
    #[inline]
    pub fn log_capacity(&self) -> usize {
        self.log_capacity
    }

    /// The active log at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&EventLog> {
        self.logs[..self.used].get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut EventLog> {
        self.logs[..self.used].get_mut(index)
    }

    /// Clears the log at `index`; out-of-range indices are ignored.
    pub fn clear(&mut self, index: usize) {
        if let Some(log) = self.get_mut(index) {
            log.clear();
        }
    }

    /// Clears every active log.
    pub fn clear_all(&mut self) {
        self.iter_mut().for_each(EventLog::clear);
    }

    pub fn iter(&self) -> core::slice::Iter<'_, EventLog> {
        self.logs[..self.used].iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, EventLog> {
        self.logs[..self.used].iter_mut()
    }

    /// Exchanges the active log at `index` with `log`. Returns `false` if
    /// `index` is not active.
    pub fn swap_log(&mut self, index: usize, log: &mut EventLog) -> bool {
        match self.get_mut(index) {
            Some(slot) => {
                slot.swap(log);
                true
            }
            None => false,
        }
    }
}

fn build_logs(n: usize, bytes_per_log: usize) -> Result<Vec<EventLog>> {
    let mut logs = Vec::new();
    logs.try_reserve_exact(n)?;
    for _ in 0..n {
        logs.push(EventLog::with_capacity(bytes_per_log)?);
    }
    Ok(logs)
}

impl fmt::Display for EventPipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventPipe: nbuffers={}", self.used)
    }
}

impl fmt::Debug for EventPipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventPipe")
            .field("size", &self.size())
            .field("used", &self.used)
            .field("logs", &&self.logs[..self.used])
            .finish()
    }
}
