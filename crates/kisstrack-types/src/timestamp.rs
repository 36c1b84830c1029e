//! Call timestamps.

use chrono::{DateTime, TimeZone, Utc};

/// When a call happened.
///
/// `Automatic` lets the server stamp the call on receipt. That is fine for
/// realtime traffic but a resent call becomes a second event. `Manual`
/// carries a client-side instant; the server deduplicates on it, so a call
/// with a manual timestamp can be resent safely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Timestamp {
    #[default]
    Automatic,
    Manual(DateTime<Utc>),
}

impl Timestamp {
    /// A manual timestamp for the current wall-clock time.
    pub fn now() -> Self {
        Self::Manual(Utc::now())
    }

    /// A manual timestamp from whole seconds since the Unix epoch.
    ///
    /// Returns `None` when the value is outside the range chrono can
    /// represent.
    pub fn from_epoch_seconds(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self::Manual)
    }

    /// Whole seconds since the Unix epoch for a manual timestamp.
    pub fn epoch_seconds(&self) -> Option<i64> {
        match self {
            Self::Automatic => None,
            Self::Manual(instant) => Some(instant.timestamp()),
        }
    }

    /// Query arguments for this timestamp: none for `Automatic`, `_d=1`
    /// followed by `_t=<epoch seconds>` for `Manual`.
    pub fn query_args(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
        match self {
            Self::Automatic => Vec::new(),
            Self::Manual(instant) => vec![
                (b"_d".to_vec(), b"1".to_vec()),
                (b"_t".to_vec(), instant.timestamp().to_string().into_bytes()),
            ],
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::Manual(instant)
    }
}

/// Generates a manual timestamp from the current time.
pub fn generate_timestamp() -> Timestamp {
    Timestamp::now()
}
