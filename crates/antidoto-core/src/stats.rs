//! Client-side aggregates over fetched rows.
//!
//! The row store does no aggregation; the dashboard and exercise screens
//! fetch a user's rows wholesale and reduce them here.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::journal::DayEntry;
use crate::storage::MeditationRecord;

/// Meditation journey numbers: total focused minutes and how many
/// distinct days had at least one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeditationStats {
    pub total_minutes: u64,
    pub total_days: u64,
}

pub fn meditation_stats(records: &[MeditationRecord]) -> MeditationStats {
    let total_minutes = records.iter().map(|r| r.duration_min).sum();
    let distinct_days: BTreeSet<_> = records.iter().map(|r| r.date).collect();
    MeditationStats {
        total_minutes,
        total_days: distinct_days.len() as u64,
    }
}

/// "Trajetória": how many days have a stored entry. Counts every stored
/// row, active or not, matching the dashboard's row count.
pub fn trajectory_days(entries: &[DayEntry]) -> usize {
    entries.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn record(duration_min: u64, y: i32, m: u32, d: u32) -> MeditationRecord {
        MeditationRecord {
            id: 0,
            duration_min,
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn empty_records_give_zero_stats() {
        assert_eq!(meditation_stats(&[]), MeditationStats::default());
    }

    #[test]
    fn minutes_sum_and_days_deduplicate() {
        let records = vec![
            record(10, 2026, 3, 5),
            record(5, 2026, 3, 5),
            record(30, 2026, 3, 7),
        ];
        let stats = meditation_stats(&records);
        assert_eq!(stats.total_minutes, 45);
        assert_eq!(stats.total_days, 2);
    }

    #[test]
    fn trajectory_counts_every_stored_row() {
        let entries = vec![
            DayEntry::empty(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()),
            DayEntry {
                work_good: true,
                ..DayEntry::empty(NaiveDate::from_ymd_opt(2026, 1, 2).unwrap())
            },
        ];
        assert_eq!(trajectory_days(&entries), 2);
    }
}
