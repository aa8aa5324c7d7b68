//! # Bagview
//!
//! Indexed, time-based random access into recorded message logs ("bags").
//!
//! A bag is an immutable, finalized file of timestamped, typed records
//! grouped into named channels. Each record carries two independent
//! timestamps: the *log-time* the container assigned at append time and an
//! optional *payload-time* embedded by the producer. Bagview builds
//! per-channel indexes lazily and answers four query shapes without
//! rescanning the file per query:
//!
//! - nearest record by payload-time
//! - nearest record by log-time
//! - record by position within a channel
//! - record count across channels over a log-time interval
//!
//! ## Modules
//!
//! - [`bag`]: the container boundary ([`BagReader`] trait plus in-memory and
//!   JSON-lines implementations)
//! - [`index`]: per-channel indexes and their lazy cache
//! - [`query`]: the [`BagManager`] query engine
//! - [`time`]: timestamp representation and normalization
//!
//! ## Quick Start
//!
//! ```rust
//! use bagview::{BagManager, MemoryBag, Timestamp};
//!
//! fn main() -> bagview::BagResult<()> {
//!     let bag = MemoryBag::builder("demo.bag")
//!         .record("imu", "sensor/Imu",
//!                 Timestamp::from_secs_f64(1.0),
//!                 Some(Timestamp::from_secs_f64(0.99)),
//!                 vec![1, 2, 3])
//!         .record("imu", "sensor/Imu",
//!                 Timestamp::from_secs_f64(2.0),
//!                 Some(Timestamp::from_secs_f64(1.99)),
//!                 vec![4, 5, 6])
//!         .build()?;
//!
//!     let manager = BagManager::new(bag);
//!
//!     // Nearest record to t=1.2s on the log-time axis.
//!     let payload = manager.nearest_by_log_time("imu", 1.2)?;
//!     assert_eq!(payload.data, vec![1, 2, 3]);
//!
//!     // Inclusive interval count.
//!     let count = manager.count_in_interval("imu", Some(1.0), Some(2.0))?;
//!     assert_eq!(count, 2);
//!
//!     Ok(())
//! }
//! ```

pub mod bag;
pub mod error;
pub mod index;
pub mod query;
pub mod time;

// Re-export top-level types for convenience
pub use bag::{BagReader, BagSummary, ChannelMeta, JsonlBag, MemoryBag, MemoryBagBuilder, Payload, Record};
pub use error::{BagError, BagResult};
pub use index::{ChannelIndex, IndexCache, PayloadTimes};
pub use query::{BagManager, ChannelInfo, ChannelSelect};
pub use time::{IntoTimestamp, TimeDelta, Timestamp};
