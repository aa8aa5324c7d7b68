//! The bag container boundary
//!
//! The on-disk container format is an external concern. The query layer
//! consumes it through the [`BagReader`] trait, which exposes exactly two
//! primitives: file-level summary metadata and an ordered, windowed
//! per-channel read. Two implementations are provided:
//!
//! - [`MemoryBag`]: append-order in-memory bag for tests and programmatic use
//! - [`JsonlBag`]: one JSON record per line on disk
//!
//! Both guarantee records come back in ascending log-time order, the
//! invariant the index layer's binary searches rely on.

mod jsonl;
mod memory;
mod summary;

pub use jsonl::{record, JsonlBag};
pub use memory::{MemoryBag, MemoryBagBuilder};
pub use summary::{BagSummary, ChannelMeta};

use crate::error::BagResult;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// Decoded record content.
///
/// `stamp` is the payload-time embedded by the producer; `None` when the
/// payload type has no timestamp field. Not guaranteed monotonic across a
/// channel even when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Declared type name of the payload
    pub type_name: String,
    /// Embedded producer timestamp, if the type carries one
    pub stamp: Option<Timestamp>,
    /// Raw decoded content bytes
    pub data: Vec<u8>,
}

/// One record as stored in the bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Channel the record belongs to
    pub channel: String,
    /// Time the container appended the record, monotonic per channel
    pub log_time: Timestamp,
    /// Decoded content
    pub payload: Payload,
}

/// Read access to a finalized, immutable bag.
///
/// Implementations must produce records in ascending log-time order and must
/// yield a fresh, restartable sequence on every `read_channel` call.
pub trait BagReader {
    /// File-level metadata, computed once at open time.
    fn summary(&self) -> &BagSummary;

    /// Records of `channel` whose log-time falls in `[start, end]`, both
    /// bounds inclusive, a missing bound meaning unbounded on that side.
    ///
    /// Fails with [`BagError::UnknownChannel`](crate::BagError::UnknownChannel)
    /// if the channel is not present in the bag.
    fn read_channel(
        &self,
        channel: &str,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
    ) -> BagResult<Box<dyn Iterator<Item = Record> + '_>>;
}

/// Inclusive log-time window test shared by the readers.
fn in_window(t: Timestamp, start: Option<Timestamp>, end: Option<Timestamp>) -> bool {
    start.map_or(true, |s| t >= s) && end.map_or(true, |e| t <= e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_window() {
        let t = Timestamp::from_nanos(500);
        assert!(in_window(t, None, None));
        assert!(in_window(t, Some(Timestamp::from_nanos(500)), None));
        assert!(in_window(t, None, Some(Timestamp::from_nanos(500))));
        assert!(!in_window(t, Some(Timestamp::from_nanos(501)), None));
        assert!(!in_window(t, None, Some(Timestamp::from_nanos(499))));
    }

    #[test]
    fn test_record_serialization() {
        let record = Record {
            channel: "topic_1".to_string(),
            log_time: Timestamp::from_nanos(1000),
            payload: Payload {
                type_name: "sensor/PointCloud".to_string(),
                stamp: Some(Timestamp::from_nanos(990)),
                data: vec![1, 2, 3],
            },
        };
        let json = serde_json::to_string(&record).unwrap();
        let restored: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(record, restored);
    }
}
