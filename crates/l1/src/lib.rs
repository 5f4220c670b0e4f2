//! A library containing the ABI of the Scroll L1 rollup contract and the decoding of its events.

pub mod abi;

mod constants;
pub use constants::*;

mod event;
pub use event::{RollupEvent, RollupEventError, ROLLUP_EVENT_SIGNATURES};
