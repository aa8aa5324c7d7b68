//! Bag summary metadata
//!
//! File-level metadata about a bag: declared start/end times, total message
//! count, and the channel list with per-channel counts and types. Obtained
//! once at open time, either computed by a reader's own scan or parsed from
//! the structured JSON output of an out-of-process bag-inspection tool.
//!
//! The declared start/end may be looser than the first/last record's actual
//! log-time; interval counting deliberately uses the declared bounds so an
//! unspecified bound never excludes boundary records.

use crate::error::{BagError, BagResult};
use crate::time::{TimeDelta, Timestamp};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-channel metadata from the bag summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMeta {
    /// Channel name, unique within the bag
    pub name: String,
    /// Declared payload type name
    pub payload_type: String,
    /// Total records in this channel
    pub message_count: u64,
    /// Average publish rate in Hz, informational only
    #[serde(default)]
    pub frequency: Option<f64>,
}

/// File-level bag metadata, immutable after open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BagSummary {
    /// Path of the bag file
    pub path: String,
    /// Total records across all channels
    pub message_count: u64,
    /// Declared start time of the file
    pub start: Timestamp,
    /// Declared end time of the file
    pub end: Timestamp,
    /// Channels present in the bag
    pub channels: Vec<ChannelMeta>,
}

impl BagSummary {
    /// Declared duration of the bag.
    pub fn duration(&self) -> TimeDelta {
        self.end.delta(self.start)
    }

    /// Look up a channel's metadata by name.
    pub fn channel(&self, name: &str) -> Option<&ChannelMeta> {
        self.channels.iter().find(|c| c.name == name)
    }

    /// All channel names, in declaration order.
    pub fn channel_names(&self) -> Vec<String> {
        self.channels.iter().map(|c| c.name.clone()).collect()
    }

    /// Parse the structured output of a bag-inspection tool.
    pub fn from_json_str(json: &str) -> BagResult<Self> {
        serde_json::from_str(json).map_err(|e| BagError::CorruptLog(e.to_string()))
    }

    /// Read and parse a summary file. A missing file is a corrupt-log
    /// condition, same as unparseable content.
    pub fn from_json_file(path: &Path) -> BagResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| BagError::CorruptLog(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> String {
        r#"{
            "path": "/data/run_01.bag",
            "message_count": 18,
            "start": 1700000000000000000,
            "end": 1700000020000000000,
            "channels": [
                {"name": "topic_1", "payload_type": "sensor/PointCloud", "message_count": 10, "frequency": 0.5},
                {"name": "topic_2", "payload_type": "sensor/PointCloud", "message_count": 7},
                {"name": "fix_start_time", "payload_type": "sensor/PointCloud", "message_count": 1}
            ]
        }"#
        .to_string()
    }

    #[test]
    fn test_parse_summary() {
        let summary = BagSummary::from_json_str(&sample_json()).unwrap();
        assert_eq!(summary.message_count, 18);
        assert_eq!(summary.channels.len(), 3);
        assert_eq!(summary.channel("topic_1").unwrap().message_count, 10);
        assert_eq!(summary.channel("topic_2").unwrap().frequency, None);
        assert!(summary.channel("topic_9").is_none());
        assert_eq!(summary.duration().as_secs_f64(), 20.0);
    }

    #[test]
    fn test_parse_corrupt_summary() {
        let err = BagSummary::from_json_str("{ not json at all").unwrap_err();
        assert!(matches!(err, BagError::CorruptLog(_)));

        let err = BagSummary::from_json_str(r#"{"path": "x"}"#).unwrap_err();
        assert!(matches!(err, BagError::CorruptLog(_)));
    }

    #[test]
    fn test_missing_summary_file() {
        let err = BagSummary::from_json_file(Path::new("/nonexistent/run.json")).unwrap_err();
        assert!(matches!(err, BagError::CorruptLog(_)));
    }

    #[test]
    fn test_summary_file_roundtrip() {
        let summary = BagSummary::from_json_str(&sample_json()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        std::fs::write(&path, serde_json::to_string(&summary).unwrap()).unwrap();

        let restored = BagSummary::from_json_file(&path).unwrap();
        assert_eq!(restored, summary);
    }
}
