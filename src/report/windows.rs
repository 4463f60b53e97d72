//! Weekday-driven report windows.
//!
//! Early in the week the digest covers the rest of the current week. From
//! Thursday it starts showing next week's calendar; weekends get a plain
//! seven-day lookahead.

use crate::models::{DateOrder, ReportWindow};
use crate::sources::DateRange;
use crate::utils::fmt_day;
use chrono::{Datelike, Days, NaiveDate, Weekday};

fn add_days(day: NaiveDate, n: u64) -> NaiveDate {
    day.checked_add_days(Days::new(n)).unwrap_or(NaiveDate::MAX)
}

fn sub_days(day: NaiveDate, n: u64) -> NaiveDate {
    day.checked_sub_days(Days::new(n)).unwrap_or(NaiveDate::MIN)
}

fn window(title: String, start: NaiveDate, end: NaiveDate, empty: &str) -> ReportWindow {
    ReportWindow {
        title,
        start_date: start,
        end_date: end,
        empty_message: empty.to_string(),
        order: DateOrder::Ascending,
    }
}

fn today_window(today: NaiveDate) -> ReportWindow {
    window(
        format!("IPOs for Today, {}", fmt_day(today)),
        today,
        today,
        "No IPOs scheduled for today.",
    )
}

fn rest_of_week(start: NaiveDate, end: NaiveDate) -> ReportWindow {
    window(
        "Remainder of This Week".to_string(),
        start,
        end,
        "No more IPOs scheduled for the rest of this week.",
    )
}

fn next_week(start: NaiveDate, end: NaiveDate) -> ReportWindow {
    window(
        "Next Week".to_string(),
        start,
        end,
        "No IPOs scheduled for next week.",
    )
}

/// Ordered windows for `today`; `weekday` is taken as given so callers can
/// plan for any day without a matching date.
pub fn plan_windows(today: NaiveDate, weekday: Weekday) -> Vec<ReportWindow> {
    let offset = u64::from(weekday.num_days_from_monday());

    match weekday {
        Weekday::Mon | Weekday::Tue | Weekday::Wed => {
            let mut windows = vec![today_window(today)];
            let start = add_days(today, 1);
            let end = add_days(today, 6 - offset);
            if start <= end {
                windows.push(rest_of_week(start, end));
            }
            windows
        }
        Weekday::Thu => vec![
            today_window(today),
            rest_of_week(add_days(today, 1), add_days(today, 3)),
            next_week(add_days(today, 4), add_days(today, 10)),
        ],
        Weekday::Fri => vec![
            today_window(today),
            next_week(add_days(today, 3), add_days(today, 9)),
        ],
        Weekday::Sat | Weekday::Sun => vec![window(
            "Upcoming (Next 7 Days)".to_string(),
            today,
            add_days(today, 7),
            "No IPOs scheduled in the next 7 days.",
        )],
    }
}

/// Windows for `today` using its own weekday.
pub fn plan_for(today: NaiveDate) -> Vec<ReportWindow> {
    plan_windows(today, today.weekday())
}

/// IPOs priced over the previous seven days, newest first.
pub fn recently_priced(today: NaiveDate) -> ReportWindow {
    ReportWindow {
        title: "Recently Priced (Past 7 Days)".to_string(),
        start_date: sub_days(today, 7),
        end_date: sub_days(today, 1),
        empty_message: "No IPOs priced in the past 7 days.".to_string(),
        order: DateOrder::Descending,
    }
}

/// Smallest range covering every window; `None` for no windows.
pub fn fetch_span(windows: &[ReportWindow]) -> Option<DateRange> {
    let from = windows.iter().map(|w| w.start_date).min()?;
    let to = windows.iter().map(|w| w.end_date).max()?;
    Some(DateRange { from, to })
}
