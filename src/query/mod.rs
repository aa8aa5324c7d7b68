//! Query layer
//!
//! [`BagManager`] binds a bag reader to an index cache and answers the four
//! query shapes: nearest record by payload-time, nearest record by log-time,
//! record by position, and interval counting across channels.

mod engine;

pub use engine::{BagManager, ChannelInfo, ChannelSelect};
