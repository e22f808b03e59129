//! Calendar helpers and the cash-flow time frame.

use std::fmt;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Granularity of a cash-flow series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeFrame {
    Daily,
    Weekly,
    #[default]
    Monthly,
}

impl TimeFrame {
    /// Number of buckets in the trailing window for this frame.
    pub fn bucket_count(self) -> usize {
        match self {
            TimeFrame::Daily => 7,
            TimeFrame::Weekly => 4,
            TimeFrame::Monthly => 6,
        }
    }

    /// `strftime` pattern used for bucket labels.
    pub fn label_format(self) -> &'static str {
        match self {
            TimeFrame::Daily => "%d %b",
            TimeFrame::Weekly => "%b %d",
            TimeFrame::Monthly => "%b",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" | "d" => Some(TimeFrame::Daily),
            "weekly" | "week" | "w" => Some(TimeFrame::Weekly),
            "monthly" | "month" | "m" => Some(TimeFrame::Monthly),
            _ => None,
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimeFrame::Daily => "daily",
            TimeFrame::Weekly => "weekly",
            TimeFrame::Monthly => "monthly",
        };
        f.write_str(label)
    }
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let delta = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(delta)
}

/// Shifts `date` by `months`, clamping the day to the target month length.
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let index = date.year() * 12 + date.month0() as i32 + months;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_next| first_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// Midnight UTC at the start of `date`.
pub fn start_of_day_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Returns `true` when both dates fall in the same calendar month.
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn shift_month_clamps_day_and_crosses_years() {
        assert_eq!(shift_month(date(2024, 1, 31), 1), date(2024, 2, 29));
        assert_eq!(shift_month(date(2024, 1, 15), -1), date(2023, 12, 15));
        assert_eq!(shift_month(date(2023, 11, 30), 3), date(2024, 2, 29));
        assert_eq!(shift_month(date(2024, 3, 1), -14), date(2023, 1, 1));
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2023, 12), 31);
        assert_eq!(days_in_month(2024, 4), 30);
    }

    #[test]
    fn week_start_is_monday() {
        // 2024-01-10 is a Wednesday.
        assert_eq!(week_start(date(2024, 1, 10)), date(2024, 1, 8));
        assert_eq!(week_start(date(2024, 1, 8)), date(2024, 1, 8));
        assert_eq!(week_start(date(2024, 1, 7)), date(2024, 1, 1));
    }

    #[test]
    fn time_frame_parses_aliases() {
        assert_eq!(TimeFrame::parse("Weekly"), Some(TimeFrame::Weekly));
        assert_eq!(TimeFrame::parse("d"), Some(TimeFrame::Daily));
        assert_eq!(TimeFrame::parse("yearly"), None);
        assert_eq!(TimeFrame::Monthly.bucket_count(), 6);
    }
}
