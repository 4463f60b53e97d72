use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Substituted for a symbol or company name the provider left blank.
pub const PLACEHOLDER: &str = "N/A";

// ── Listing row (adapter output) ──────────────────────────────────────────────

/// One provider row after field renaming, before date validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    pub symbol: String,
    pub company_name: String,
    pub ipo_date: Option<String>,
}

// ── IPO record ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IpoRecord {
    pub symbol: String,
    pub company_name: String,
    pub ipo_date: NaiveDate,
}

// ── IPO collection ────────────────────────────────────────────────────────────

/// Deduplicated, date-validated records for one run, in merge order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpoCollection {
    records: Vec<IpoRecord>,
}

impl IpoCollection {
    /// Only the aggregator builds collections; it upholds the uniqueness invariant.
    pub(crate) fn from_records(records: Vec<IpoRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[IpoRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ── Report window ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateOrder {
    /// Forward-looking windows: earliest date first.
    Ascending,
    /// "Recently priced" windows: latest date first.
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub empty_message: String,
    pub order: DateOrder,
}

impl ReportWindow {
    /// Both ends inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}
