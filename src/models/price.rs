use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PriceRecord — One priced item (one CSV row, one `prices` table row)
// ---------------------------------------------------------------------------

/// A single priced item.
///
/// `id` is an opaque key: it is never interpreted as a number. `price` is
/// always held at scale 2.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PriceRecord {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub created_at: NaiveDate,
}

// ---------------------------------------------------------------------------
// ImportSummary — Result of one import operation
// ---------------------------------------------------------------------------

/// Outcome of one import.
///
/// `total_items` counts records newly inserted by this import only, while
/// `total_categories` and `total_price` describe the whole store after the
/// import committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ImportSummary {
    pub total_items: u64,
    pub total_categories: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

// ---------------------------------------------------------------------------
// StoreAggregate — Store-wide statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StoreAggregate {
    pub distinct_categories: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

// ---------------------------------------------------------------------------
// UpsertOutcome — What the store did with one record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The id was new and the record was written.
    Inserted,
    /// A record with the same id already existed; nothing was written.
    Ignored,
}

// ---------------------------------------------------------------------------
// ImportReport — Summary plus per-row bookkeeping
// ---------------------------------------------------------------------------

/// A row that was skipped during import, either because it failed to decode
/// or because the store refused to write it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRejection {
    /// 1-based line of the row inside its CSV entry (the header is line 1).
    pub line: u64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub summary: ImportSummary,
    /// Data rows read from the archive, valid or not.
    pub rows_read: u64,
    pub inserted: u64,
    /// Rows whose id was already present in the store.
    pub ignored: u64,
    pub rejections: Vec<RowRejection>,
}
