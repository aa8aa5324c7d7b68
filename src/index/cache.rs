//! Lazy per-channel index cache
//!
//! Maps channel name to [`ChannelIndex`], populated incrementally: the
//! log-time list on first access to a channel, the payload-time list on the
//! first access that asks for it. Entries are never evicted or recomputed;
//! the bag is immutable and holds a bounded, known set of channels.
//!
//! Entries live behind `Arc` so a populated index is handed out as a cheap
//! snapshot: the lock is held only while looking up or (re)building an
//! entry, and searches then run against the immutable arrays lock-free.

use crate::bag::BagReader;
use crate::error::BagResult;
use crate::index::{ChannelIndex, PayloadTimes};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Process-scoped cache of per-channel indexes.
#[derive(Debug, Default)]
pub struct IndexCache {
    entries: Mutex<HashMap<String, Arc<ChannelIndex>>>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the index for `channel`, building whatever is missing.
    ///
    /// With `need_payload_times` set, a channel whose payload-time state is
    /// still `NotComputed` gets a second full scan; the result (computed
    /// list or `Unavailable`) is kept for the lifetime of the cache. The
    /// caller decides whether `Unavailable` is an error.
    ///
    /// First call per channel is O(channel size); subsequent calls are a map
    /// lookup plus an `Arc` clone.
    pub fn get<R: BagReader>(
        &self,
        reader: &R,
        channel: &str,
        need_payload_times: bool,
    ) -> BagResult<Arc<ChannelIndex>> {
        let mut entries = self.entries.lock().expect("index cache lock poisoned");

        if !entries.contains_key(channel) {
            let log_times: Vec<_> = reader
                .read_channel(channel, None, None)?
                .map(|r| r.log_time)
                .collect();
            tracing::debug!(channel, records = log_times.len(), "built log-time index");
            entries.insert(channel.to_string(), Arc::new(ChannelIndex::new(log_times)));
        }

        let current = entries
            .get(channel)
            .expect("entry just inserted")
            .clone();

        if need_payload_times && !current.payload_times.is_computed() {
            let stamps: Option<Vec<_>> = reader
                .read_channel(channel, None, None)?
                .map(|r| r.payload.stamp)
                .collect();
            let payload_times = match stamps {
                Some(times) => {
                    tracing::debug!(channel, records = times.len(), "built payload-time index");
                    PayloadTimes::Computed(times)
                }
                None => {
                    tracing::debug!(channel, "payload type carries no timestamp");
                    PayloadTimes::Unavailable
                }
            };
            let updated = Arc::new(ChannelIndex {
                log_times: current.log_times.clone(),
                payload_times,
            });
            entries.insert(channel.to_string(), updated.clone());
            return Ok(updated);
        }

        Ok(current)
    }

    /// Whether any index has been built for `channel` yet.
    pub fn contains(&self, channel: &str) -> bool {
        self.entries
            .lock()
            .expect("index cache lock poisoned")
            .contains_key(channel)
    }

    /// Number of channels indexed so far.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .expect("index cache lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Payload-time state of a channel's entry, if one exists. Exposed for
    /// inspection and tests; `NotComputed` entries are a normal lazy
    /// intermediate state, not an error.
    pub fn payload_state(&self, channel: &str) -> Option<PayloadTimes> {
        self.entries
            .lock()
            .expect("index cache lock poisoned")
            .get(channel)
            .map(|idx| idx.payload_times.clone())
    }
}
