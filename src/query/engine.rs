//! Bag query engine
//!
//! Every query follows the same shape: fetch (or build) the channel's cached
//! index, search the in-memory time lists for a candidate log-time, then
//! issue one narrow exact-timestamp re-read through the bag reader to fetch
//! the actual payload. Payloads are never materialized in bulk.
//!
//! Timestamp-like arguments are normalized through
//! [`IntoTimestamp`](crate::time::IntoTimestamp) at the public boundary; the
//! internals only ever handle [`Timestamp`].

use crate::bag::{BagReader, Payload};
use crate::error::{BagError, BagResult};
use crate::index::{ChannelIndex, IndexCache, PayloadTimes};
use crate::time::{IntoTimestamp, Timestamp};

/// Channel selection for interval counting.
///
/// Mirrors the three accepted argument shapes: every channel in the bag, one
/// named channel, or an explicit list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelSelect {
    /// Every channel named in the bag summary
    All,
    /// A single channel
    One(String),
    /// An explicit set of channels
    Many(Vec<String>),
}

impl From<&str> for ChannelSelect {
    fn from(name: &str) -> Self {
        ChannelSelect::One(name.to_string())
    }
}

impl From<String> for ChannelSelect {
    fn from(name: String) -> Self {
        ChannelSelect::One(name)
    }
}

impl From<Vec<String>> for ChannelSelect {
    fn from(names: Vec<String>) -> Self {
        ChannelSelect::Many(names)
    }
}

impl From<&[&str]> for ChannelSelect {
    fn from(names: &[&str]) -> Self {
        ChannelSelect::Many(names.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ChannelSelect {
    fn from(names: [&str; N]) -> Self {
        ChannelSelect::Many(names.iter().map(|s| s.to_string()).collect())
    }
}

/// Snapshot of one channel's metadata and cached times.
#[derive(Debug, Clone)]
pub struct ChannelInfo {
    /// Channel name
    pub name: String,
    /// Record count from the bag summary
    pub message_count: u64,
    /// Declared payload type name
    pub payload_type: String,
    /// Average rate in Hz, informational
    pub frequency: Option<f64>,
    /// Log-time of every record, ascending
    pub log_times: Vec<Timestamp>,
    /// Payload-times aligned with `log_times`; `None` unless requested
    pub payload_times: Option<Vec<Timestamp>>,
}

/// Read-only query engine over one opened bag.
pub struct BagManager<R: BagReader> {
    reader: R,
    cache: IndexCache,
}

impl<R: BagReader> BagManager<R> {
    /// Bind a reader. No scanning happens here; indexes build lazily per
    /// channel on first query.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            cache: IndexCache::new(),
        }
    }

    /// The underlying reader.
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// The index cache; exposed for inspection of lazy population state.
    pub fn cache(&self) -> &IndexCache {
        &self.cache
    }

    /// Metadata and cached time lists for one channel.
    ///
    /// With `include_payload_times` the first call pays a full decode scan of
    /// the channel; the result is cached for the lifetime of the manager.
    /// Channels whose payload type carries no timestamp return
    /// `payload_times: None` here; only the nearest-by-payload-time query
    /// treats that as an error.
    pub fn get_channel_info(
        &self,
        channel: &str,
        include_payload_times: bool,
    ) -> BagResult<ChannelInfo> {
        let meta = self
            .reader
            .summary()
            .channel(channel)
            .ok_or_else(|| BagError::UnknownChannel(channel.to_string()))?
            .clone();
        let index = self.cache.get(&self.reader, channel, include_payload_times)?;

        let payload_times = match &index.payload_times {
            PayloadTimes::Computed(times) if include_payload_times => Some(times.clone()),
            _ => None,
        };

        Ok(ChannelInfo {
            name: meta.name,
            message_count: meta.message_count,
            payload_type: meta.payload_type,
            frequency: meta.frequency,
            log_times: index.log_times.clone(),
            payload_times,
        })
    }

    /// The record whose embedded payload-time is closest to `target`, ties
    /// broken toward the earliest record in log order.
    pub fn nearest_by_payload_time(
        &self,
        channel: &str,
        target: impl IntoTimestamp,
    ) -> BagResult<Payload> {
        let target = target.into_timestamp();
        let index = self.cache.get(&self.reader, channel, true)?;
        let times = match &index.payload_times {
            PayloadTimes::Computed(times) => times,
            _ => return Err(BagError::PayloadTimeUnavailable(channel.to_string())),
        };
        let pos = ChannelIndex::argmin_nearest(times, target)
            .ok_or_else(|| BagError::EmptyChannel(channel.to_string()))?;
        self.fetch_at(channel, index.log_times[pos])
    }

    /// The record whose log-time is closest to `target`, ties broken toward
    /// the earliest record.
    pub fn nearest_by_log_time(
        &self,
        channel: &str,
        target: impl IntoTimestamp,
    ) -> BagResult<Payload> {
        let target = target.into_timestamp();
        let index = self.cache.get(&self.reader, channel, false)?;
        let pos = ChannelIndex::argmin_nearest(&index.log_times, target)
            .ok_or_else(|| BagError::EmptyChannel(channel.to_string()))?;
        self.fetch_at(channel, index.log_times[pos])
    }

    /// The record at `index` within the channel, in log order. Negative and
    /// past-the-end positions are rejected.
    pub fn by_position(&self, channel: &str, index: i64) -> BagResult<Payload> {
        let idx = self.cache.get(&self.reader, channel, false)?;
        if index < 0 || index as usize >= idx.len() {
            return Err(BagError::IndexOutOfRange {
                channel: channel.to_string(),
                index,
                len: idx.len(),
            });
        }
        self.fetch_at(channel, idx.log_times[index as usize])
    }

    /// Count records across `channels` with log-time in `[start, end]`,
    /// both ends inclusive.
    ///
    /// An omitted bound defaults to the file's DECLARED start or end from
    /// the summary, which may be looser than any record's actual log-time;
    /// an unspecified bound therefore never excludes boundary records. An
    /// interval with `start > end` counts zero.
    pub fn count_in_interval(
        &self,
        channels: impl Into<ChannelSelect>,
        start: Option<impl IntoTimestamp>,
        end: Option<impl IntoTimestamp>,
    ) -> BagResult<u64> {
        let names = match channels.into() {
            ChannelSelect::All => self.reader.summary().channel_names(),
            ChannelSelect::One(name) => vec![name],
            ChannelSelect::Many(names) => names,
        };
        let start = start
            .map(IntoTimestamp::into_timestamp)
            .unwrap_or(self.reader.summary().start);
        let end = end
            .map(IntoTimestamp::into_timestamp)
            .unwrap_or(self.reader.summary().end);

        let mut total = 0;
        for name in &names {
            let index = self.cache.get(&self.reader, name, false)?;
            total += index.count_in_interval(start, end);
        }
        Ok(total)
    }

    /// Re-read the bag with an exact-timestamp window and take the first
    /// record. Guards against duplicate identical log-times: the earliest
    /// record in log order always wins.
    fn fetch_at(&self, channel: &str, log_time: Timestamp) -> BagResult<Payload> {
        self.reader
            .read_channel(channel, Some(log_time), Some(log_time))?
            .next()
            .map(|r| r.payload)
            .ok_or_else(|| {
                // The index said a record exists at this log-time; the
                // container disagreeing means the file changed under us.
                BagError::CorruptLog(format!(
                    "no record at indexed log-time {log_time} on channel {channel}"
                ))
            })
    }
}

impl<R: BagReader> std::fmt::Display for BagManager<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let summary = self.reader.summary();
        write!(
            f,
            "BagManager [ path: {} ] [ duration: {:.1} sec ] [ messages: {} ]",
            summary.path,
            summary.duration().as_secs_f64(),
            summary.message_count
        )
    }
}
