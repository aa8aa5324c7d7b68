//! In-memory bag
//!
//! Holds records in append order and serves windowed channel reads over them.
//! The builder enforces the container invariant the index layer depends on:
//! log-times must be non-decreasing in append order.

use crate::bag::{in_window, BagReader, BagSummary, ChannelMeta, Payload, Record};
use crate::error::{BagError, BagResult};
use crate::time::Timestamp;

/// A finalized, immutable in-memory bag.
#[derive(Debug)]
pub struct MemoryBag {
    summary: BagSummary,
    records: Vec<Record>,
}

impl MemoryBag {
    /// Start building a bag. `path` is a label carried in the summary.
    pub fn builder(path: impl Into<String>) -> MemoryBagBuilder {
        MemoryBagBuilder {
            path: path.into(),
            records: Vec::new(),
            declared_start: None,
            declared_end: None,
        }
    }
}

impl BagReader for MemoryBag {
    fn summary(&self) -> &BagSummary {
        &self.summary
    }

    fn read_channel(
        &self,
        channel: &str,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
    ) -> BagResult<Box<dyn Iterator<Item = Record> + '_>> {
        if self.summary.channel(channel).is_none() {
            return Err(BagError::UnknownChannel(channel.to_string()));
        }
        let channel = channel.to_string();
        Ok(Box::new(self.records.iter().filter(move |r| {
            r.channel == channel && in_window(r.log_time, start, end)
        }).cloned()))
    }
}

/// Builder for [`MemoryBag`]; records must arrive in log-time order.
pub struct MemoryBagBuilder {
    path: String,
    records: Vec<Record>,
    declared_start: Option<Timestamp>,
    declared_end: Option<Timestamp>,
}

impl MemoryBagBuilder {
    /// Append a record. `stamp` is the embedded payload-time, `None` for
    /// payload types without one.
    pub fn record(
        mut self,
        channel: impl Into<String>,
        type_name: impl Into<String>,
        log_time: Timestamp,
        stamp: Option<Timestamp>,
        data: Vec<u8>,
    ) -> Self {
        self.records.push(Record {
            channel: channel.into(),
            log_time,
            payload: Payload {
                type_name: type_name.into(),
                stamp,
                data,
            },
        });
        self
    }

    /// Override the declared file start time. Inspection tools sometimes
    /// declare a start looser than the first record's log-time; queries with
    /// an unspecified lower bound use the declared value.
    pub fn declared_start(mut self, start: Timestamp) -> Self {
        self.declared_start = Some(start);
        self
    }

    /// Override the declared file end time.
    pub fn declared_end(mut self, end: Timestamp) -> Self {
        self.declared_end = Some(end);
        self
    }

    /// Finalize. Fails with `CorruptLog` if append order violates log-time
    /// monotonicity.
    pub fn build(self) -> BagResult<MemoryBag> {
        for pair in self.records.windows(2) {
            if pair[1].log_time < pair[0].log_time {
                return Err(BagError::CorruptLog(format!(
                    "log-time went backwards at record for channel {}",
                    pair[1].channel
                )));
            }
        }

        let mut channels: Vec<ChannelMeta> = Vec::new();
        for record in &self.records {
            match channels.iter_mut().find(|c| c.name == record.channel) {
                Some(meta) => meta.message_count += 1,
                None => channels.push(ChannelMeta {
                    name: record.channel.clone(),
                    payload_type: record.payload.type_name.clone(),
                    message_count: 1,
                    frequency: None,
                }),
            }
        }

        let first = self.records.first().map(|r| r.log_time);
        let last = self.records.last().map(|r| r.log_time);
        let start = self
            .declared_start
            .or(first)
            .unwrap_or(Timestamp::from_nanos(0));
        let end = self.declared_end.or(last).unwrap_or(start);

        // Average rate over the declared span, when it is meaningful.
        let span = end.delta(start).as_secs_f64();
        if span > 0.0 {
            for meta in &mut channels {
                meta.frequency = Some(meta.message_count as f64 / span);
            }
        }

        tracing::debug!(
            path = %self.path,
            records = self.records.len(),
            channels = channels.len(),
            "finalized in-memory bag"
        );

        Ok(MemoryBag {
            summary: BagSummary {
                path: self.path,
                message_count: self.records.len() as u64,
                start,
                end,
                channels,
            },
            records: self.records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(nanos: i64) -> Timestamp {
        Timestamp::from_nanos(nanos)
    }

    fn two_channel_bag() -> MemoryBag {
        MemoryBag::builder("test.bag")
            .record("a", "T", ts(100), Some(ts(90)), vec![1])
            .record("b", "T", ts(200), Some(ts(190)), vec![2])
            .record("a", "T", ts(300), Some(ts(290)), vec![3])
            .record("a", "T", ts(400), Some(ts(390)), vec![4])
            .build()
            .unwrap()
    }

    #[test]
    fn test_summary_from_records() {
        let bag = two_channel_bag();
        let summary = bag.summary();
        assert_eq!(summary.message_count, 4);
        assert_eq!(summary.start, ts(100));
        assert_eq!(summary.end, ts(400));
        assert_eq!(summary.channel("a").unwrap().message_count, 3);
        assert_eq!(summary.channel("b").unwrap().message_count, 1);
    }

    #[test]
    fn test_read_channel_windowing() {
        let bag = two_channel_bag();

        let all: Vec<_> = bag.read_channel("a", None, None).unwrap().collect();
        assert_eq!(all.len(), 3);

        // Inclusive on both ends.
        let window: Vec<_> = bag
            .read_channel("a", Some(ts(300)), Some(ts(400)))
            .unwrap()
            .collect();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].log_time, ts(300));

        let exact: Vec<_> = bag
            .read_channel("a", Some(ts(300)), Some(ts(300)))
            .unwrap()
            .collect();
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].payload.data, vec![3]);
    }

    #[test]
    fn test_read_channel_restartable() {
        let bag = two_channel_bag();
        let first: Vec<_> = bag.read_channel("a", None, None).unwrap().collect();
        let second: Vec<_> = bag.read_channel("a", None, None).unwrap().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_channel() {
        let bag = two_channel_bag();
        let err = bag.read_channel("missing", None, None).err().unwrap();
        assert!(matches!(err, BagError::UnknownChannel(_)));
    }

    #[test]
    fn test_non_monotonic_rejected() {
        let err = MemoryBag::builder("bad.bag")
            .record("a", "T", ts(200), None, vec![])
            .record("a", "T", ts(100), None, vec![])
            .build()
            .unwrap_err();
        assert!(matches!(err, BagError::CorruptLog(_)));
    }

    #[test]
    fn test_declared_bounds_override() {
        let bag = MemoryBag::builder("test.bag")
            .declared_start(ts(50))
            .declared_end(ts(500))
            .record("a", "T", ts(100), None, vec![])
            .build()
            .unwrap();
        assert_eq!(bag.summary().start, ts(50));
        assert_eq!(bag.summary().end, ts(500));
    }
}
