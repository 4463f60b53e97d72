use crate::models::{DateOrder, IpoCollection, IpoRecord, ReportWindow};
use crate::utils::fmt_day;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt::Write;

/// One report section: bold title, then an italic date heading per day with a
/// bullet per listing. Falls back to the window's empty message.
pub fn render(ipos: &IpoCollection, window: &ReportWindow) -> String {
    let mut by_date: BTreeMap<NaiveDate, Vec<&IpoRecord>> = BTreeMap::new();
    for record in ipos.records().iter().filter(|r| window.contains(r.ipo_date)) {
        by_date.entry(record.ipo_date).or_default().push(record);
    }

    let mut out = format!("**{}**\n", window.title);

    if by_date.is_empty() {
        out.push_str(&window.empty_message);
        return out;
    }

    let mut groups: Vec<_> = by_date.into_iter().collect();
    if window.order == DateOrder::Descending {
        groups.reverse();
    }

    for (date, records) in groups {
        let _ = writeln!(out, "_{}_", fmt_day(date));
        for r in records {
            let _ = writeln!(out, "- {} ({})", r.company_name, r.symbol);
        }
    }

    out.truncate(out.trim_end().len());
    out
}

/// Every window's section in order, separated by a blank line.
pub fn render_report(ipos: &IpoCollection, windows: &[ReportWindow]) -> String {
    windows
        .iter()
        .map(|w| render(ipos, w))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::merge;
    use crate::report::windows::{plan_windows, recently_priced};
    use crate::sources::FetchOutcome;
    use crate::sources::testing::row;
    use chrono::Weekday;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn collection(rows: &[(&str, &str, &str)]) -> IpoCollection {
        let rows = rows.iter().map(|(s, n, dt)| row(s, n, dt)).collect();
        merge(&[FetchOutcome { source: "test", result: Ok(rows) }]).0
    }

    fn window(start: NaiveDate, end: NaiveDate, order: DateOrder) -> ReportWindow {
        ReportWindow {
            title: "Window".into(),
            start_date: start,
            end_date: end,
            empty_message: "Nothing here.".into(),
            order,
        }
    }

    #[test]
    fn test_empty_window_renders_message() {
        let ipos = collection(&[("ACME", "Acme Corp", "2024-07-01")]);
        let w = window(d(2024, 6, 6), d(2024, 6, 9), DateOrder::Ascending);
        assert_eq!(render(&ipos, &w), "**Window**\nNothing here.");
    }

    #[test]
    fn test_groups_by_date_ascending() {
        let ipos = collection(&[
            ("ZED", "Zed Inc", "2024-06-08"),
            ("ACME", "Acme Corp", "2024-06-07"),
            ("BETA", "Beta Labs", "2024-06-08"),
        ]);
        let w = window(d(2024, 6, 7), d(2024, 6, 9), DateOrder::Ascending);
        assert_eq!(
            render(&ipos, &w),
            "**Window**\n\
             _Friday, Jun 07_\n\
             - Acme Corp (ACME)\n\
             _Saturday, Jun 08_\n\
             - Zed Inc (ZED)\n\
             - Beta Labs (BETA)"
        );
    }

    #[test]
    fn test_descending_window_lists_latest_first() {
        let ipos = collection(&[
            ("OLD", "Old Co", "2024-06-01"),
            ("NEW", "New Co", "2024-06-04"),
        ]);
        let rendered = render(&ipos, &recently_priced(d(2024, 6, 6)));
        let new_at = rendered.find("New Co").unwrap();
        let old_at = rendered.find("Old Co").unwrap();
        assert!(new_at < old_at);
        assert!(rendered.starts_with("**Recently Priced (Past 7 Days)**\n_Tuesday, Jun 04_"));
    }

    #[test]
    fn test_end_date_is_inclusive() {
        let ipos = collection(&[
            ("EDGE", "Edge Co", "2024-06-09"),
            ("PAST", "Past Co", "2024-06-10"),
        ]);
        let rendered = render(&ipos, &window(d(2024, 6, 7), d(2024, 6, 9), DateOrder::Ascending));
        assert!(rendered.contains("(EDGE)"));
        assert!(!rendered.contains("(PAST)"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let ipos = collection(&[
            ("ACME", "Acme Corp", "2024-06-06"),
            ("BETA", "Beta Labs", "2024-06-12"),
        ]);
        let windows = plan_windows(d(2024, 6, 6), Weekday::Thu);
        assert_eq!(render_report(&ipos, &windows), render_report(&ipos, &windows));
    }

    #[test]
    fn test_empty_collection_report() {
        let windows = plan_windows(d(2024, 6, 6), Weekday::Thu);
        assert_eq!(
            render_report(&IpoCollection::default(), &windows),
            "**IPOs for Today, Thursday, Jun 06**\nNo IPOs scheduled for today.\n\n\
             **Remainder of This Week**\nNo more IPOs scheduled for the rest of this week.\n\n\
             **Next Week**\nNo IPOs scheduled for next week."
        );
    }

    #[test]
    fn test_full_report_sections_in_order() {
        let ipos = collection(&[
            ("NOW", "Now Corp", "2024-06-06"),
            ("SOON", "Soon Corp", "2024-06-07"),
            ("LATER", "Later Corp", "2024-06-12"),
        ]);
        let report = render_report(&ipos, &plan_windows(d(2024, 6, 6), Weekday::Thu));
        let sections: Vec<&str> = report.split("\n\n").collect();

        assert_eq!(sections.len(), 3);
        assert!(sections[0].contains("- Now Corp (NOW)"));
        assert!(sections[1].contains("- Soon Corp (SOON)"));
        assert!(sections[2].contains("_Wednesday, Jun 12_\n- Later Corp (LATER)"));
    }
}
