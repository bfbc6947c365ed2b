//! Error types for cadenza-core.

use crate::compat::{LayoutError, String, TryReserveError};
use thiserror::Error;

/// Error type for cadenza-core operations.
///
/// Allocation is the only fallible system call the buffers make, so apart
/// from configuration checks every variant describes a failed or impossible
/// allocation. Out-of-range indices are caller bugs and are not reported here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Allocation of {bytes} bytes failed")]
    AllocFailed { bytes: usize },

    #[error("Requested capacity overflows the address space")]
    CapacityOverflow,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// True for allocation failures of either kind.
    pub fn is_out_of_memory(&self) -> bool {
        matches!(self, Error::AllocFailed { .. } | Error::CapacityOverflow)
    }
}

impl From<LayoutError> for Error {
    fn from(_: LayoutError) -> Self {
        Error::CapacityOverflow
    }
}

/// `TryReserveError` does not expose the requested size on stable, so it is
/// reported as zero. Call sites that know the size map the error themselves.
impl From<TryReserveError> for Error {
    fn from(_: TryReserveError) -> Self {
        Error::AllocFailed { bytes: 0 }
    }
}

impl From<smallvec::CollectionAllocErr> for Error {
    fn from(err: smallvec::CollectionAllocErr) -> Self {
        match err {
            smallvec::CollectionAllocErr::CapacityOverflow => Error::CapacityOverflow,
            smallvec::CollectionAllocErr::AllocErr { layout } => Error::AllocFailed {
                bytes: layout.size(),
            },
        }
    }
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
