//! Per-channel index structures
//!
//! - [`ChannelIndex`]: the ordered log-time list for one channel plus a
//!   tri-state payload-time field
//! - [`IndexCache`]: lazily populated, never-evicting map from channel name
//!   to its index
//!
//! Log-times are ascending by container guarantee, which is what makes the
//! `partition_point` searches in the query layer valid. Payload-times, when
//! present, are aligned positionally with the log-times but carry no order
//! guarantee of their own.

mod cache;
mod channel_index;

pub use cache::IndexCache;
pub use channel_index::{ChannelIndex, PayloadTimes};
