//! Shared test fixtures for the price ledger integration tests.
//!
//! Provides an in-memory ledger plus helpers that build ZIP uploads from
//! CSV rows with the `zip` crate directly, independent of the ledger's own
//! archive writer.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use chrono::NaiveDate;
use price_ledger::{PriceLedger, PriceRecord};
use rust_decimal::Decimal;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const HEADER: &str = "id,name,category,price,create_date";

/// Create a ledger backed by an in-memory DuckDB database.
pub fn setup_ledger() -> PriceLedger {
    PriceLedger::builder().in_memory().build().unwrap()
}

/// Join a header and data lines into a CSV payload.
pub fn csv_payload(header: &str, rows: &[&str]) -> String {
    let mut out = String::from(header);
    out.push('\n');
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    out
}

/// Build a ZIP archive from `(entry name, contents)` pairs.
pub fn zip_entries(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Build an upload with a single `data.csv` entry holding the standard
/// header and `rows`.
pub fn upload(rows: &[&str]) -> Vec<u8> {
    let payload = csv_payload(HEADER, rows);
    zip_entries(&[("data.csv", payload.as_str())])
}

/// Three valid rows across two categories, total 36.24.
pub fn sample_rows() -> Vec<&'static str> {
    vec![
        "1,Hammer,Tools,12.5,2024-01-15",
        "2,Screwdriver,Tools,4.99,2024-01-16",
        "3,Apple,Food,18.75,2024-02-01",
    ]
}

pub fn price(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn record(id: &str, name: &str, category: &str, cents: i64, created_at: NaiveDate) -> PriceRecord {
    PriceRecord {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        price: price(cents),
        created_at,
    }
}

/// Stored record with the given id.
pub fn stored(ledger: &PriceLedger, id: &str) -> Option<PriceRecord> {
    ledger.records().unwrap().into_iter().find(|r| r.id == id)
}
