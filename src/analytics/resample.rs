use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::data::model::SalesRecord;

/// Date-only layouts tried for month-first text (`04-30-22`, `4/30/2022`).
/// Two-digit years come first: `%Y` would also accept `22`.
const MONTH_FIRST_FORMATS: &[&str] = &["%m-%d-%y", "%m-%d-%Y", "%m/%d/%y", "%m/%d/%Y"];
const YEAR_FIRST_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a naive calendar date. Any time-of-day suffix is ignored and no
/// timezone conversion happens.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw
        .trim()
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()?;
    let year_first = date_part.find(|c: char| c == '-' || c == '/') == Some(4);
    let formats = if year_first {
        YEAR_FIRST_FORMATS
    } else {
        MONTH_FIRST_FORMATS
    };
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// One calendar month of the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeBucket {
    /// First day of the month.
    pub period_start: NaiveDate,
    pub sum: f64,
}

impl TimeBucket {
    /// `YYYY-MM` label for axis ticks.
    pub fn label(&self) -> String {
        self.period_start.format("%Y-%m").to_string()
    }
}

/// Monthly sums in ascending order, plus how many rows were left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlySeries {
    pub buckets: Vec<TimeBucket>,
    /// Rows whose date could not be parsed.
    pub skipped_rows: usize,
}

/// Bucket sales by calendar month and sum `Amount`.
///
/// Months without any row are absent, not zero. A row with a valid date
/// but an empty amount still creates its month.
pub fn resample_monthly(rows: &[&SalesRecord]) -> MonthlySeries {
    let mut months: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    let mut skipped_rows = 0;

    for rec in rows {
        match parse_calendar_date(&rec.date) {
            Some(date) => {
                *months.entry((date.year(), date.month())).or_default() +=
                    rec.amount.unwrap_or(0.0);
            }
            None => skipped_rows += 1,
        }
    }

    if skipped_rows > 0 {
        log::warn!("{skipped_rows} rows with unparseable dates left out of the monthly series");
    }

    let buckets = months
        .into_iter()
        .filter_map(|((year, month), sum)| {
            NaiveDate::from_ymd_opt(year, month, 1)
                .map(|period_start| TimeBucket { period_start, sum })
        })
        .collect();

    MonthlySeries {
        buckets,
        skipped_rows,
    }
}
