//! Versioned image state.
//!
//! - [`HistoryStack`]: committed images with linear undo down to a permanent floor
//! - [`OverlayStagingBuffer`]: line annotations waiting to be flattened into one
//!   new committed image

pub mod overlay;
pub mod stack;

pub use overlay::{LineRequest, OverlayStagingBuffer};
pub use stack::HistoryStack;
