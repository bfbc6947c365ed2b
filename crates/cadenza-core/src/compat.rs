//! Compatibility layer for no_std + alloc.

pub use alloc::{
    collections::TryReserveError,
    string::{String, ToString},
    vec,
    vec::Vec,
};

pub use core::{
    alloc::{Layout, LayoutError},
    fmt,
    marker::PhantomData,
    ptr::{self, NonNull},
    slice,
};
