//! Day entries: the daily checklist plus diary note, and the summary
//! derivation used by the heatmap tooltip.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One user's recorded checklist and diary note for a single calendar date.
///
/// Identity is the (user, date) pair; the user link lives in storage, not
/// on the record itself. An empty `notes` string means no note was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEntry {
    /// Calendar date, unique per user.
    pub date: NaiveDate,
    /// Productive work day?
    pub work_good: bool,
    /// Good day overall?
    pub day_good: bool,
    /// Slept well?
    pub sleep_good: bool,
    /// Kept the day's promises?
    pub tasks_done: bool,
    /// Free-text diary note.
    #[serde(default)]
    pub notes: String,
}

impl DayEntry {
    /// An all-false entry for `date` -- the check-in edit buffer default.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            work_good: false,
            day_good: false,
            sleep_good: false,
            tasks_done: false,
            notes: String::new(),
        }
    }

    /// Whether a diary note was written.
    pub fn has_notes(&self) -> bool {
        !self.notes.is_empty()
    }

    /// Whether the entry records any activity: at least one flag set or a
    /// non-empty note. Explicit predicate -- callers must not probe fields
    /// ad hoc.
    pub fn has_activity(&self) -> bool {
        self.work_good || self.day_good || self.sleep_good || self.tasks_done || self.has_notes()
    }

    /// Human-readable labels for the recorded categories, in canonical
    /// order regardless of how the entry was built: work, mood, sleep,
    /// tasks, then the diary note.
    pub fn summary_labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.work_good {
            labels.push("Trabalho");
        }
        if self.day_good {
            labels.push("Dia Bom");
        }
        if self.sleep_good {
            labels.push("Sono");
        }
        if self.tasks_done {
            labels.push("Metas");
        }
        if self.has_notes() {
            labels.push("Diário");
        }
        labels
    }
}

/// Find the entry for `date`, if any records activity for that day.
///
/// Matching is exact at calendar-day granularity. Duplicate dates violate
/// the store's uniqueness invariant; if one slips through, the FIRST match
/// in collection order wins.
pub fn lookup(date: NaiveDate, entries: &[DayEntry]) -> Option<&DayEntry> {
    entries
        .iter()
        .find(|e| e.date == date)
        .filter(|e| e.has_activity())
}

/// Summary line for an optional entry: joined category labels,
/// `"Registrado"` for an entry with no labels, `"Sem registros"` when
/// there is no (active) entry.
pub fn summary_line(entry: Option<&DayEntry>) -> String {
    match entry {
        None => "Sem registros".to_string(),
        Some(e) => {
            let labels = e.summary_labels();
            if labels.is_empty() {
                "Registrado".to_string()
            } else {
                labels.join(", ")
            }
        }
    }
}
