//! Compositing: pasting one buffer onto another and channel split/merge.
//!
//! Pasting is a plain overwrite; there is no alpha blending. Channel
//! reordering (false color) is done by merging split channels in a
//! different order.

mod channels;
mod paste;

pub use channels::{merge_channels, split_channels};
pub use paste::paste;
