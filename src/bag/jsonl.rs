//! JSON-lines bag
//!
//! A minimal on-disk container: one JSON-encoded [`Record`] per line, in
//! append (log-time) order. Decoded fully at open time; channel reads are
//! served from the decoded records. Intended for demos, tooling, and tests
//! rather than as a codec for any external bag format.

use crate::bag::{in_window, BagReader, BagSummary, Payload, Record};
use crate::error::{BagError, BagResult};
use crate::time::Timestamp;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A bag decoded from a JSON-lines file.
#[derive(Debug)]
pub struct JsonlBag {
    summary: BagSummary,
    records: Vec<Record>,
}

impl JsonlBag {
    /// Open a JSONL bag, deriving the summary from the records themselves.
    pub fn open(path: &Path) -> BagResult<Self> {
        let records = Self::decode(path)?;
        let mut builder = crate::bag::MemoryBag::builder(path.display().to_string());
        for r in &records {
            builder = builder.record(
                r.channel.clone(),
                r.payload.type_name.clone(),
                r.log_time,
                r.payload.stamp,
                r.payload.data.clone(),
            );
        }
        let bag = builder.build()?;
        tracing::info!(path = %path.display(), records = records.len(), "opened jsonl bag");
        Ok(Self {
            summary: bag.summary().clone(),
            records,
        })
    }

    /// Open a JSONL bag with a summary produced by an external inspection
    /// tool. The tool's declared start/end may be looser than the actual
    /// record times; they are taken as-is.
    pub fn open_with_summary(path: &Path, summary_path: &Path) -> BagResult<Self> {
        let summary = BagSummary::from_json_file(summary_path)?;
        let records = Self::decode(path)?;
        Self::check_monotonic(&records)?;
        tracing::info!(path = %path.display(), records = records.len(), "opened jsonl bag");
        Ok(Self { summary, records })
    }

    fn decode(path: &Path) -> BagResult<Vec<Record>> {
        let file = File::open(path)
            .map_err(|e| BagError::CorruptLog(format!("{}: {}", path.display(), e)))?;
        let reader = BufReader::new(file);

        let mut records = Vec::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: Record = serde_json::from_str(&line).map_err(|e| {
                BagError::CorruptLog(format!("{} line {}: {}", path.display(), lineno + 1, e))
            })?;
            records.push(record);
        }
        Ok(records)
    }

    fn check_monotonic(records: &[Record]) -> BagResult<()> {
        for pair in records.windows(2) {
            if pair[1].log_time < pair[0].log_time {
                return Err(BagError::CorruptLog(format!(
                    "log-time went backwards at record for channel {}",
                    pair[1].channel
                )));
            }
        }
        Ok(())
    }

    /// Encode records as a JSONL bag file. Convenience for producing demo
    /// and test fixtures; the query layer itself never writes.
    pub fn write_fixture(path: &Path, records: &[Record]) -> BagResult<()> {
        Self::check_monotonic(records)?;
        let mut out = String::new();
        for record in records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        std::fs::write(path, out)?;
        Ok(())
    }
}

impl BagReader for JsonlBag {
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

/// Build a [`Record`] in one expression; fixture helper.
pub fn record(
    channel: &str,
    type_name: &str,
    log_time: Timestamp,
    stamp: Option<Timestamp>,
    data: Vec<u8>,
) -> Record {
    Record {
        channel: channel.to_string(),
        log_time,
        payload: Payload {
            type_name: type_name.to_string(),
            stamp,
            data,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ts(nanos: i64) -> Timestamp {
        Timestamp::from_nanos(nanos)
    }

    fn fixture() -> Vec<Record> {
        vec![
            record("a", "T", ts(100), Some(ts(95)), vec![1]),
            record("b", "T", ts(150), None, vec![2]),
            record("a", "T", ts(200), Some(ts(195)), vec![3]),
        ]
    }

    #[test]
    fn test_open_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.jsonl");
        JsonlBag::write_fixture(&path, &fixture()).unwrap();

        let bag = JsonlBag::open(&path).unwrap();
        assert_eq!(bag.summary().message_count, 3);
        assert_eq!(bag.summary().channel("a").unwrap().message_count, 2);

        let records: Vec<_> = bag.read_channel("a", None, None).unwrap().collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].payload.data, vec![3]);
    }

    #[test]
    fn test_open_missing_file() {
        let err = JsonlBag::open(Path::new("/nonexistent/run.jsonl")).unwrap_err();
        assert!(matches!(err, BagError::CorruptLog(_)));
    }

    #[test]
    fn test_open_malformed_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        std::fs::write(&path, "{\"channel\": truncated\n").unwrap();

        let err = JsonlBag::open(&path).unwrap_err();
        match err {
            BagError::CorruptLog(msg) => assert!(msg.contains("line 1")),
            other => panic!("expected CorruptLog, got {other:?}"),
        }
    }

    #[test]
    fn test_open_with_external_summary() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.jsonl");
        JsonlBag::write_fixture(&path, &fixture()).unwrap();

        // Declared bounds looser than the actual record times.
        let summary = BagSummary {
            path: path.display().to_string(),
            message_count: 3,
            start: ts(50),
            end: ts(300),
            channels: JsonlBag::open(&path).unwrap().summary().channels.clone(),
        };
        let summary_path = dir.path().join("run.json");
        std::fs::write(&summary_path, serde_json::to_string(&summary).unwrap()).unwrap();

        let bag = JsonlBag::open_with_summary(&path, &summary_path).unwrap();
        assert_eq!(bag.summary().start, ts(50));
        assert_eq!(bag.summary().end, ts(300));
    }
}
