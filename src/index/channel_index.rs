//! Per-channel index data
//!
//! One [`ChannelIndex`] per channel, owned by the cache. The payload-time
//! field is an explicit state machine rather than a nullable list: a channel
//! either has not been scanned for payload stamps yet, has been scanned and
//! found to lack them, or has a computed list aligned with its log-times.
//! Transitions only ever move forward from `NotComputed`; the bag is
//! immutable so a computed result never goes stale.

use crate::time::Timestamp;

/// State of a channel's payload-time list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadTimes {
    /// No payload-time scan has run for this channel yet
    NotComputed,
    /// The scan ran and at least one record's payload carries no stamp
    Unavailable,
    /// Stamps for every record, index-aligned with the log-time list.
    /// Not sorted: producers may emit stamps out of log order.
    Computed(Vec<Timestamp>),
}

impl PayloadTimes {
    pub fn is_computed(&self) -> bool {
        !matches!(self, PayloadTimes::NotComputed)
    }
}

/// Cached index for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelIndex {
    /// Log-time of every record, ascending, one entry per record
    pub log_times: Vec<Timestamp>,
    /// Payload-time state, see [`PayloadTimes`]
    pub payload_times: PayloadTimes,
}

impl ChannelIndex {
    /// A fresh index with only log-times populated.
    pub fn new(log_times: Vec<Timestamp>) -> Self {
        debug_assert!(
            log_times.windows(2).all(|w| w[0] <= w[1]),
            "log-times must be non-decreasing"
        );
        Self {
            log_times,
            payload_times: PayloadTimes::NotComputed,
        }
    }

    /// Number of records in the channel.
    pub fn len(&self) -> usize {
        self.log_times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log_times.is_empty()
    }

    /// Count of records with log-time in `[start, end]`, both inclusive.
    ///
    /// One-sided binary searches over the ascending log-times: first
    /// position `>= start` subtracted from first position `> end`. An empty
    /// interval (`start > end`) counts zero rather than erroring.
    pub fn count_in_interval(&self, start: Timestamp, end: Timestamp) -> u64 {
        let left = self.log_times.partition_point(|t| *t < start);
        let right = self.log_times.partition_point(|t| *t <= end);
        right.saturating_sub(left) as u64
    }

    /// Index of the record whose time in `times` is closest to `target`,
    /// first occurrence winning ties. `times` carries no order guarantee so
    /// this is a linear argmin.
    pub fn argmin_nearest(times: &[Timestamp], target: Timestamp) -> Option<usize> {
        times
            .iter()
            .enumerate()
            .min_by_key(|(_, t)| t.abs_delta(target))
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(nanos: i64) -> Timestamp {
        Timestamp::from_nanos(nanos)
    }

    fn index() -> ChannelIndex {
        ChannelIndex::new(vec![ts(100), ts(200), ts(200), ts(300), ts(500)])
    }

    #[test]
    fn test_count_full_range() {
        assert_eq!(index().count_in_interval(ts(100), ts(500)), 5);
    }

    #[test]
    fn test_count_exact_boundaries_inclusive() {
        let idx = index();
        assert_eq!(idx.count_in_interval(ts(100), ts(100)), 1);
        assert_eq!(idx.count_in_interval(ts(500), ts(500)), 1);
        // Duplicate timestamps all land in an exact-match interval.
        assert_eq!(idx.count_in_interval(ts(200), ts(200)), 2);
    }

    #[test]
    fn test_count_between_records() {
        let idx = index();
        assert_eq!(idx.count_in_interval(ts(301), ts(499)), 0);
        assert_eq!(idx.count_in_interval(ts(301), ts(500)), 1);
    }

    #[test]
    fn test_count_inverted_interval_is_zero() {
        assert_eq!(index().count_in_interval(ts(400), ts(200)), 0);
    }

    #[test]
    fn test_count_outside_range() {
        let idx = index();
        assert_eq!(idx.count_in_interval(ts(0), ts(50)), 0);
        assert_eq!(idx.count_in_interval(ts(600), ts(900)), 0);
        assert_eq!(idx.count_in_interval(ts(0), ts(900)), 5);
    }

    #[test]
    fn test_count_empty_channel() {
        let idx = ChannelIndex::new(vec![]);
        assert_eq!(idx.count_in_interval(ts(0), ts(100)), 0);
    }

    #[test]
    fn test_argmin_nearest() {
        // Unsorted, as payload-times may be.
        let times = vec![ts(300), ts(100), ts(200)];
        assert_eq!(ChannelIndex::argmin_nearest(&times, ts(110)), Some(1));
        assert_eq!(ChannelIndex::argmin_nearest(&times, ts(290)), Some(0));
        assert_eq!(ChannelIndex::argmin_nearest(&times, ts(1000)), Some(0));
    }

    #[test]
    fn test_argmin_tie_breaks_to_first() {
        // 150 is equidistant from 100 and 200; the earlier index wins.
        let times = vec![ts(100), ts(200)];
        assert_eq!(ChannelIndex::argmin_nearest(&times, ts(150)), Some(0));

        let times = vec![ts(200), ts(100)];
        assert_eq!(ChannelIndex::argmin_nearest(&times, ts(150)), Some(0));
    }

    #[test]
    fn test_argmin_empty() {
        assert_eq!(ChannelIndex::argmin_nearest(&[], ts(0)), None);
    }

    #[test]
    fn test_payload_times_states() {
        let mut idx = ChannelIndex::new(vec![ts(100)]);
        assert!(!idx.payload_times.is_computed());

        idx.payload_times = PayloadTimes::Computed(vec![ts(90)]);
        assert!(idx.payload_times.is_computed());

        let mut idx = ChannelIndex::new(vec![ts(100)]);
        idx.payload_times = PayloadTimes::Unavailable;
        assert!(idx.payload_times.is_computed());
    }
}
