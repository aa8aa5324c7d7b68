//! Timestamp types for the two time axes of a bag
//!
//! Every record in a bag carries two independent timestamps:
//! - *log-time*: assigned by the container when the record was appended,
//!   monotonic non-decreasing per channel;
//! - *payload-time*: embedded in the record's content by its producer,
//!   optional and not guaranteed monotonic.
//!
//! Both share one representation: [`Timestamp`], nanoseconds since the Unix
//! epoch. Public query entry points accept anything implementing
//! [`IntoTimestamp`] and normalize immediately; internal code only ever sees
//! `Timestamp`.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// An instant, in nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Construct from raw nanoseconds since the epoch.
    pub fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// Construct from fractional seconds since the epoch.
    ///
    /// This is the representation used by bag-inspection tools for the
    /// declared file start/end times. Whole and fractional seconds are
    /// converted separately; a single f64 multiply loses whole nanoseconds
    /// at epoch scale.
    pub fn from_secs_f64(secs: f64) -> Self {
        let whole = secs.trunc() as i64;
        let frac = (secs.fract() * 1e9).round() as i64;
        Self(whole * 1_000_000_000 + frac)
    }

    /// Raw nanoseconds since the epoch.
    pub fn as_nanos(&self) -> i64 {
        self.0
    }

    /// Fractional seconds since the epoch.
    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1e9
    }

    /// Signed difference `self - other`.
    pub fn delta(&self, other: Timestamp) -> TimeDelta {
        TimeDelta(self.0 - other.0)
    }

    /// Magnitude of the difference to `other`.
    ///
    /// Nearest-by-time queries minimize this quantity.
    pub fn abs_delta(&self, other: Timestamp) -> TimeDelta {
        TimeDelta((self.0 - other.0).abs())
    }

    /// Shift forward by a delta (negative deltas shift backward).
    pub fn offset(&self, delta: TimeDelta) -> Timestamp {
        Timestamp(self.0 + delta.0)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp(dt.timestamp_nanos_opt().unwrap_or(i64::MAX))
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        Utc.timestamp_nanos(ts.0)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.9}", self.as_secs_f64())
    }
}

/// A signed duration between two [`Timestamp`]s, in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeDelta(i64);

impl TimeDelta {
    pub fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub fn from_secs_f64(secs: f64) -> Self {
        let whole = secs.trunc() as i64;
        let frac = (secs.fract() * 1e9).round() as i64;
        Self(whole * 1_000_000_000 + frac)
    }

    pub fn as_nanos(&self) -> i64 {
        self.0
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1e9
    }
}

/// Conversion into the canonical [`Timestamp`] representation.
///
/// The query surface accepts raw fractional seconds, `chrono` datetimes, or
/// `Timestamp` itself; this trait is the only place those representations
/// are reconciled.
pub trait IntoTimestamp {
    fn into_timestamp(self) -> Timestamp;
}

impl IntoTimestamp for Timestamp {
    fn into_timestamp(self) -> Timestamp {
        self
    }
}

impl IntoTimestamp for f64 {
    fn into_timestamp(self) -> Timestamp {
        Timestamp::from_secs_f64(self)
    }
}

impl IntoTimestamp for DateTime<Utc> {
    fn into_timestamp(self) -> Timestamp {
        self.into()
    }
}
