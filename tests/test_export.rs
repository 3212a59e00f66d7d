//! Exporter tests: archive shape and import/export agreement.

mod common;

use std::collections::HashSet;
use std::io::{Cursor, Read};

use price_ledger::archive::{self, EntryMatch};
use price_ledger::{codec, PriceLedger, PriceRecord};
use zip::ZipArchive;

use common::{date, record, sample_rows, setup_ledger, upload};

fn decode_export(bytes: &[u8]) -> Vec<PriceRecord> {
    let entries = archive::extract_entries(bytes, "data.csv", EntryMatch::Exact).unwrap();
    assert_eq!(entries.len(), 1);
    let payload = codec::read_payload(&entries[0].data).unwrap();
    assert!(payload.rejections.is_empty());
    payload.records.into_iter().map(|(_, r)| r).collect()
}

#[test]
fn empty_store_exports_header_only() {
    let ledger = setup_ledger();
    let bytes = ledger.export().unwrap();

    let mut zip = ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(zip.len(), 1);
    let mut file = zip.by_name("data.csv").unwrap();
    let mut contents = String::new();
    file.read_to_string(&mut contents).unwrap();
    assert_eq!(contents, "id,name,category,price,create_date\n");
}

#[test]
fn export_reproduces_imported_records() {
    let ledger = setup_ledger();
    ledger.import_bytes(&upload(&sample_rows())).unwrap();

    let exported: HashSet<PriceRecord> = decode_export(&ledger.export().unwrap())
        .into_iter()
        .collect();

    let expected: HashSet<PriceRecord> = [
        record("1", "Hammer", "Tools", 1250, date(2024, 1, 15)),
        record("2", "Screwdriver", "Tools", 499, date(2024, 1, 16)),
        record("3", "Apple", "Food", 1875, date(2024, 2, 1)),
    ]
    .into_iter()
    .collect();
    assert_eq!(exported, expected);
}

#[test]
fn export_writes_prices_with_two_decimals() {
    let ledger = setup_ledger();
    ledger
        .import_bytes(&upload(&["7,Widget,Tools,12.5,2024-01-15"]))
        .unwrap();

    let entries =
        archive::extract_entries(&ledger.export().unwrap(), "data.csv", EntryMatch::Exact).unwrap();
    let text = String::from_utf8(entries[0].data.clone()).unwrap();
    assert!(text.contains("7,Widget,Tools,12.50,2024-01-15"));
}

#[test]
fn exported_archive_imports_into_a_fresh_store() {
    let source = setup_ledger();
    let first = source.import_bytes(&upload(&sample_rows())).unwrap();

    let target = setup_ledger();
    let second = target.import_bytes(&source.export().unwrap()).unwrap();

    assert_eq!(second, first);
}

#[test]
fn export_keeps_text_with_delimiters_intact() {
    let ledger = setup_ledger();
    ledger
        .import_bytes(&upload(&["1,\"Nails, 100 pack\",Tools,3.10,2024-01-01"]))
        .unwrap();

    let records = decode_export(&ledger.export().unwrap());
    assert_eq!(records[0].name, "Nails, 100 pack");
}

#[test]
fn export_to_writes_the_same_bytes() {
    let ledger = setup_ledger();
    ledger.import_bytes(&upload(&sample_rows())).unwrap();

    let mut sink = Vec::new();
    let written = ledger.export_to(&mut sink).unwrap();
    assert_eq!(written, sink.len());
    assert_eq!(decode_export(&sink).len(), 3);
}

#[test]
fn export_uses_configured_entry_name() {
    let ledger = PriceLedger::builder()
        .in_memory()
        .entry_name("prices.csv")
        .build()
        .unwrap();

    let bytes = ledger.export().unwrap();
    let entries = archive::extract_entries(&bytes, "prices.csv", EntryMatch::Exact).unwrap();
    assert_eq!(entries.len(), 1);
}

#[test]
fn export_leaves_the_store_untouched() {
    let ledger = setup_ledger();
    ledger.import_bytes(&upload(&sample_rows())).unwrap();
    let before = ledger.aggregate().unwrap();

    ledger.export().unwrap();
    ledger.export().unwrap();

    assert_eq!(ledger.aggregate().unwrap(), before);
}
