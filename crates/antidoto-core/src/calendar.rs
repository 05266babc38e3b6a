//! Calendar day sequences for the tracked year.
//!
//! All day identity in this crate is a pure calendar date
//! ([`chrono::NaiveDate`]) -- full timestamps are never compared for day
//! equality, which would reintroduce timezone drift.

use chrono::{Datelike, NaiveDate};

/// Portuguese month abbreviations, January first.
pub const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Whether `year` is a leap year (has a February 29).
pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

/// The ordered, gap-free sequence of every calendar date in `year`,
/// January 1 through December 31 inclusive.
///
/// Pure and deterministic: identical on every call. Returns an empty
/// vector only for years outside chrono's representable range.
pub fn year_days(year: i32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, 1, 1) else {
        return Vec::new();
    };
    first
        .iter_days()
        .take_while(|d| d.year() == year)
        .collect()
}

/// Number of days in `year` (365, or 366 in leap years).
pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// 1-based day-of-year index for `date` (Jan 1 = 1).
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}
