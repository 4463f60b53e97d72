use chrono::NaiveDate;
use std::time::Instant;
use tracing::info;

/// A simple wall-clock timer for logging elapsed time.
pub struct Timer {
    label: String,
    start: Instant,
}

impl Timer {
    pub fn start(label: impl Into<String>) -> Self {
        let label = label.into();
        info!("⏱  Starting: {}", label);
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        info!(
            "⏱  Finished: {} (took {:.2?})",
            self.label,
            self.start.elapsed()
        );
    }
}

/// Day heading used in digests: "Thursday, Jun 06".
pub fn fmt_day(date: NaiveDate) -> String {
    date.format("%A, %b %d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_day() {
        assert_eq!(fmt_day(NaiveDate::from_ymd_opt(2024, 6, 6).unwrap()), "Thursday, Jun 06");
        assert_eq!(fmt_day(NaiveDate::from_ymd_opt(2024, 12, 25).unwrap()), "Wednesday, Dec 25");
    }
}
