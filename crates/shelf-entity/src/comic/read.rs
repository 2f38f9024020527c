//! Read state coupling and aggregation.

use std::ops::AddAssign;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The `(is_read, read_at)` pair of a comic.
///
/// Whenever the read flag is written, `read_at` follows it: `true` stamps
/// the write time and `false` clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadState {
    /// Whether the comic is read.
    pub is_read: bool,
    /// When the comic was marked read.
    pub read_at: Option<DateTime<Utc>>,
}

impl ReadState {
    /// The state produced by writing `is_read` at `now`.
    pub fn written(is_read: bool, now: DateTime<Utc>) -> Self {
        Self {
            is_read,
            read_at: is_read.then_some(now),
        }
    }

    /// The state for a freshly created comic. A supplied `read_at` is kept
    /// only when the comic is created read.
    pub fn initial(is_read: bool, read_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        match (is_read, read_at) {
            (true, Some(at)) => Self {
                is_read: true,
                read_at: Some(at),
            },
            _ => Self::written(is_read, now),
        }
    }

    /// The unread state.
    pub fn unread() -> Self {
        Self {
            is_read: false,
            read_at: None,
        }
    }
}

/// Counts of comics and read comics over some set of collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadTally {
    /// Number of comics.
    pub total: u64,
    /// Number of read comics.
    pub read: u64,
}

impl ReadTally {
    /// Create a tally.
    pub fn new(total: u64, read: u64) -> Self {
        Self { total, read }
    }

    /// Tally a sequence of read flags.
    pub fn from_flags<I: IntoIterator<Item = bool>>(flags: I) -> Self {
        flags.into_iter().fold(Self::default(), |mut acc, is_read| {
            acc.total += 1;
            if is_read {
                acc.read += 1;
            }
            acc
        })
    }

    /// Fully read means at least one comic and every comic read.
    pub fn is_fully_read(&self) -> bool {
        self.total > 0 && self.read == self.total
    }

    /// Number of unread comics.
    pub fn unread(&self) -> u64 {
        self.total.saturating_sub(self.read)
    }
}

impl AddAssign for ReadTally {
    fn add_assign(&mut self, rhs: Self) {
        self.total += rhs.total;
        self.read += rhs.read;
    }
}
