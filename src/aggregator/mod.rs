//! Merges per-source fetch outcomes into one run's IPO collection.
//!
//! Order matters: outcomes are concatenated as given, so the first source's
//! rows win when two sources list the same symbol.

use crate::models::{IpoCollection, IpoRecord};
use crate::sources::FetchOutcome;
use crate::sources::cleaner::parse_date;
use std::collections::HashSet;
use tracing::{debug, info};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeStats {
    pub rows_in: usize,
    pub bad_dates: usize,
    pub duplicates: usize,
    /// Sources whose fetch failed, in source order.
    pub failed_sources: Vec<&'static str>,
}

pub fn merge(outcomes: &[FetchOutcome]) -> (IpoCollection, MergeStats) {
    let mut stats = MergeStats::default();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut records = Vec::new();

    for outcome in outcomes {
        let rows = match &outcome.result {
            Ok(rows) => rows,
            Err(_) => {
                stats.failed_sources.push(outcome.source);
                continue;
            }
        };

        for row in rows {
            stats.rows_in += 1;

            let Some(date) = row.ipo_date.as_deref().and_then(parse_date) else {
                debug!(
                    "{}: dropping {}, unparseable date {:?}",
                    outcome.source, row.symbol, row.ipo_date
                );
                stats.bad_dates += 1;
                continue;
            };

            if !seen.insert(row.symbol.as_str()) {
                stats.duplicates += 1;
                continue;
            }

            records.push(IpoRecord {
                symbol: row.symbol.clone(),
                company_name: row.company_name.clone(),
                ipo_date: date,
            });
        }
    }

    info!(
        "Merged {} rows → {} IPOs ({} bad dates, {} duplicates)",
        stats.rows_in,
        records.len(),
        stats.bad_dates,
        stats.duplicates
    );

    (IpoCollection::from_records(records), stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListingRow;
    use crate::sources::SourceError;
    use crate::sources::testing::row;
    use chrono::NaiveDate;

    fn ok(source: &'static str, rows: Vec<ListingRow>) -> FetchOutcome {
        FetchOutcome { source, result: Ok(rows) }
    }

    fn failed(source: &'static str) -> FetchOutcome {
        FetchOutcome {
            source,
            result: Err(SourceError::Api("down".into())),
        }
    }

    #[test]
    fn test_first_seen_wins_across_sources() {
        let outcomes = vec![
            ok("alpha", vec![row("ACME", "Acme Corp", "2024-06-06")]),
            ok("beta", vec![row("ACME", "ACME Corporation Inc.", "2024-06-06")]),
        ];
        let (ipos, stats) = merge(&outcomes);

        assert_eq!(ipos.len(), 1);
        assert_eq!(ipos.records()[0].company_name, "Acme Corp");
        assert_eq!(stats.duplicates, 1);
    }

    #[test]
    fn test_drops_unparseable_dates() {
        let mut undated = row("NODATE", "No Date Ltd", "");
        undated.ipo_date = None;
        let outcomes = vec![ok(
            "alpha",
            vec![
                row("GOOD", "Good Co", "2024-06-06"),
                row("BAD", "Bad Co", "sometime soon"),
                undated,
            ],
        )];
        let (ipos, stats) = merge(&outcomes);

        assert_eq!(ipos.len(), 1);
        assert_eq!(ipos.records()[0].symbol, "GOOD");
        assert_eq!(
            ipos.records()[0].ipo_date,
            NaiveDate::from_ymd_opt(2024, 6, 6).unwrap()
        );
        assert_eq!(stats.bad_dates, 2);
    }

    #[test]
    fn test_bad_date_does_not_claim_symbol() {
        let outcomes = vec![
            ok("alpha", vec![row("ACME", "Acme Corp", "TBD")]),
            ok("beta", vec![row("ACME", "Acme Corporation", "2024-06-07")]),
        ];
        let (ipos, _) = merge(&outcomes);
        assert_eq!(ipos.len(), 1);
        assert_eq!(ipos.records()[0].company_name, "Acme Corporation");
    }

    #[test]
    fn test_symbols_are_case_sensitive() {
        let outcomes = vec![ok(
            "alpha",
            vec![row("acme", "Acme", "2024-06-06"), row("ACME", "Acme", "2024-06-06")],
        )];
        let (ipos, _) = merge(&outcomes);
        assert_eq!(ipos.len(), 2);
    }

    #[test]
    fn test_all_empty_or_failed() {
        let (ipos, stats) = merge(&[ok("alpha", vec![]), failed("beta")]);
        assert!(ipos.is_empty());
        assert_eq!(stats.failed_sources, vec!["beta"]);

        let (ipos, _) = merge(&[]);
        assert!(ipos.is_empty());
    }

    #[test]
    fn test_merged_symbols_unique_and_dated() {
        let outcomes = vec![
            ok(
                "alpha",
                vec![
                    row("A", "A1", "2024-06-03"),
                    row("B", "B1", "junk"),
                    row("A", "A2", "2024-06-04"),
                    row("C", "C1", "2024-06-05"),
                ],
            ),
            ok(
                "beta",
                vec![
                    row("B", "B2", "2024-06-06"),
                    row("C", "C2", "2024-06-07"),
                    row("D", "D1", "2024-06-08"),
                ],
            ),
        ];
        let (ipos, _) = merge(&outcomes);

        let symbols: Vec<&str> = ipos.records().iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["A", "C", "B", "D"]);
        let unique: HashSet<&str> = symbols.iter().copied().collect();
        assert_eq!(unique.len(), symbols.len());
        assert_eq!(ipos.records()[0].company_name, "A1");
        assert_eq!(ipos.records()[2].company_name, "B2");
    }
}
