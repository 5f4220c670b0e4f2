//! The ABI of the Scroll Chain contract.

/// The calls to the Scroll Chain contract.
pub mod calls;

/// The logs emitted by the Scroll Chain contract.
pub mod logs;
