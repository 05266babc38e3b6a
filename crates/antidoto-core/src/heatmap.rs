//! Year heatmap: one cell per calendar date, colored by whether the day
//! has a recorded entry, with detail navigation over the recorded days.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::{year_days, MONTH_ABBREV};
use crate::journal::{summary_line, DayEntry};

/// A single heatmap cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    /// True when the date resolves an entry with recorded activity.
    pub active: bool,
    /// Summary of the day's recorded categories ("Sem registros" when
    /// inactive).
    pub summary: String,
}

impl HeatmapCell {
    /// Tooltip line: `dd/mm/yyyy - summary`.
    pub fn tooltip(&self) -> String {
        format!("{} - {}", self.date.format("%d/%m/%Y"), self.summary)
    }

    /// Cell character for the ASCII rendering.
    pub fn glyph(&self) -> char {
        if self.active {
            '█'
        } else {
            '·'
        }
    }
}

/// The full-year heatmap for one user's entry collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heatmap {
    pub year: i32,
    /// One cell per date of the year, ascending.
    pub cells: Vec<HeatmapCell>,
    /// Chronological subsequence of dates with recorded activity.
    active_dates: Vec<NaiveDate>,
}

impl Heatmap {
    /// Join the entry collection against the year's day sequence.
    ///
    /// Single pass: entries are indexed by date (first entry wins on a
    /// duplicate date, matching [`crate::journal::lookup`]), then each
    /// day of the year is resolved against the index. An empty collection
    /// yields all-inactive cells -- absence of data is not an error.
    pub fn build(year: i32, entries: &[DayEntry]) -> Self {
        let mut by_date: HashMap<NaiveDate, &DayEntry> = HashMap::new();
        for entry in entries {
            by_date.entry(entry.date).or_insert(entry);
        }

        let mut cells = Vec::new();
        let mut active_dates = Vec::new();
        for date in year_days(year) {
            let entry = by_date
                .get(&date)
                .copied()
                .filter(|e| e.has_activity());
            let active = entry.is_some();
            if active {
                active_dates.push(date);
            }
            cells.push(HeatmapCell {
                date,
                active,
                summary: summary_line(entry),
            });
        }

        Self {
            year,
            cells,
            active_dates,
        }
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&HeatmapCell> {
        if date.year() != self.year {
            return None;
        }
        self.cells.get(date.ordinal0() as usize)
    }

    pub fn is_active(&self, date: NaiveDate) -> bool {
        self.cell(date).is_some_and(|c| c.active)
    }

    /// Detail view for a date. Only active cells open a detail view;
    /// inactive cells are not clickable.
    pub fn detail(&self, date: NaiveDate) -> Option<&HeatmapCell> {
        self.cell(date).filter(|c| c.active)
    }

    /// Dates with recorded activity, chronological.
    pub fn active_dates(&self) -> &[NaiveDate] {
        &self.active_dates
    }

    pub fn active_count(&self) -> usize {
        self.active_dates.len()
    }

    /// Next recorded day strictly after `date`, or `None` at the end of
    /// the chronological subsequence (no wraparound).
    pub fn next_active(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.active_dates.iter().copied().find(|d| *d > date)
    }

    /// Previous recorded day strictly before `date`, or `None` at the
    /// start (no wraparound).
    pub fn prev_active(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.active_dates
            .iter()
            .rev()
            .copied()
            .find(|d| *d < date)
    }

    /// Render the year grid: 7 rows, column-major fill starting at
    /// January 1, month abbreviations underneath.
    pub fn render_ascii(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Seu Ano em {}\n", self.year));

        let rows = 7;
        let cols = self.cells.len().div_ceil(rows);
        for row in 0..rows {
            for col in 0..cols {
                let idx = col * rows + row;
                match self.cells.get(idx) {
                    Some(cell) => output.push(cell.glyph()),
                    None => output.push(' '),
                }
                output.push(' ');
            }
            output.push('\n');
        }

        // Month labels positioned at the column of each month's first day.
        let mut footer = vec![b' '; cols * 2];
        for (month0, label) in MONTH_ABBREV.iter().enumerate() {
            let first = NaiveDate::from_ymd_opt(self.year, month0 as u32 + 1, 1);
            let Some(first) = first else { continue };
            let col = first.ordinal0() as usize / rows;
            let start = col * 2;
            for (i, b) in label.bytes().enumerate() {
                if start + i < footer.len() {
                    footer[start + i] = b;
                }
            }
        }
        output.push_str(String::from_utf8_lossy(&footer).trim_end());
        output.push('\n');

        output.push_str(&format!(
            "\n· Vazio  █ Registro   ({} dias registrados)\n",
            self.active_count()
        ));

        output
    }
}
