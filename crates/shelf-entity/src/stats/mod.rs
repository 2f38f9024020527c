//! Reading statistics.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::comic::Comic;

/// Start instants of the weekly, monthly and yearly reading windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingWindows {
    /// Most recent Sunday, 00:00 UTC.
    pub week_start: DateTime<Utc>,
    /// First day of the month, 00:00 UTC.
    pub month_start: DateTime<Utc>,
    /// January 1st, 00:00 UTC.
    pub year_start: DateTime<Utc>,
}

impl ReadingWindows {
    /// Windows containing `now`.
    pub fn at(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let midnight = |days_back: u32| {
            (today - Duration::days(i64::from(days_back)))
                .and_time(NaiveTime::MIN)
                .and_utc()
        };

        Self {
            week_start: midnight(now.weekday().num_days_from_sunday()),
            month_start: midnight(now.day0()),
            year_start: midnight(now.ordinal0()),
        }
    }
}

/// Aggregate reading statistics for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingStats {
    /// Number of comics.
    pub total_comics: u64,
    /// Number of read comics.
    pub read_comics: u64,
    /// Number of unread comics.
    pub unread_comics: u64,
    /// `read / total * 100`, or 0 with no comics.
    pub read_percentage: f64,
    /// Comics read since the start of the week.
    pub weekly_read: u64,
    /// Comics read since the start of the month.
    pub monthly_read: u64,
    /// Comics read since the start of the year.
    pub yearly_read: u64,
}

impl ReadingStats {
    /// Assemble stats from raw counts.
    pub fn from_counts(total: u64, read: u64, weekly: u64, monthly: u64, yearly: u64) -> Self {
        let read_percentage = if total == 0 {
            0.0
        } else {
            read as f64 * 100.0 / total as f64
        };

        Self {
            total_comics: total,
            read_comics: read,
            unread_comics: total.saturating_sub(read),
            read_percentage,
            weekly_read: weekly,
            monthly_read: monthly,
            yearly_read: yearly,
        }
    }

    /// Compute stats over an in-memory set of comics.
    pub fn compute<'a, I>(comics: I, windows: &ReadingWindows) -> Self
    where
        I: IntoIterator<Item = &'a Comic>,
    {
        let (mut total, mut read, mut weekly, mut monthly, mut yearly) = (0, 0, 0, 0, 0);
        for comic in comics {
            total += 1;
            if !comic.is_read {
                continue;
            }
            read += 1;
            if comic.read_since(windows.week_start) {
                weekly += 1;
            }
            if comic.read_since(windows.month_start) {
                monthly += 1;
            }
            if comic.read_since(windows.year_start) {
                yearly += 1;
            }
        }
        Self::from_counts(total, read, weekly, monthly, yearly)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Weekday};
    use uuid::Uuid;

    use super::*;
    use crate::comic::NewComic;

    #[test]
    fn test_windows_start_on_sunday() {
        // Wednesday 2025-06-18 15:30 UTC
        let now = Utc.with_ymd_and_hms(2025, 6, 18, 15, 30, 0).unwrap();
        let windows = ReadingWindows::at(now);

        assert_eq!(windows.week_start, Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap());
        assert_eq!(windows.week_start.weekday(), Weekday::Sun);
        assert_eq!(windows.month_start, Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(windows.year_start, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_sunday_is_its_own_week_start() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 1).unwrap();
        let windows = ReadingWindows::at(now);
        assert_eq!(windows.week_start, Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_empty_stats() {
        let stats = ReadingStats::from_counts(0, 0, 0, 0, 0);
        assert_eq!(stats.read_percentage, 0.0);
    }

    #[test]
    fn test_compute_sixty_percent() {
        let now = Utc::now();
        let windows = ReadingWindows::at(now);
        let collection = Uuid::new_v4();

        let comics: Vec<Comic> = (0..10)
            .map(|i| {
                let comic = NewComic::new(format!("Issue {i}"), format!("/c/{i}.cbz"));
                let comic = if i < 6 { comic.read() } else { comic };
                comic.into_comic(collection, now)
            })
            .collect();

        let stats = ReadingStats::compute(&comics, &windows);
        assert_eq!(stats.total_comics, 10);
        assert_eq!(stats.read_comics, 6);
        assert_eq!(stats.unread_comics, 4);
        assert_eq!(stats.read_percentage, 60.0);
        assert_eq!(stats.weekly_read, 6);
        assert_eq!(stats.yearly_read, 6);
    }

    #[test]
    fn test_old_reads_fall_outside_windows() {
        let now = Utc.with_ymd_and_hms(2025, 6, 18, 12, 0, 0).unwrap();
        let windows = ReadingWindows::at(now);
        let mut comic = NewComic::new("old", "/old.cbz").into_comic(Uuid::new_v4(), now);
        comic.set_read(true, Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap());

        let stats = ReadingStats::compute([&comic], &windows);
        assert_eq!(stats.read_comics, 1);
        assert_eq!(stats.weekly_read, 0);
        assert_eq!(stats.monthly_read, 0);
        assert_eq!(stats.yearly_read, 0);
    }
}
