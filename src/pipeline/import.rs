//! Archive → validated records → transactional upsert → store-wide summary.

use std::io::Read;

use tracing::{info, warn};

use crate::archive::{self, EntryMatch};
use crate::codec;
use crate::config;
use crate::error::{LedgerError, Result};
use crate::models::{ImportReport, ImportSummary, PriceRecord, RowRejection, UpsertOutcome};
use crate::store::{PriceStore, StoreTransaction};

// ---------------------------------------------------------------------------
// Importer
// ---------------------------------------------------------------------------

/// Imports ZIP bundles of CSV price rows into a [`PriceStore`].
pub struct Importer<'a, S: PriceStore> {
    store: &'a S,
    entry_name: &'a str,
    entry_match: EntryMatch,
}

impl<'a, S: PriceStore> Importer<'a, S> {
    /// Create an importer reading the `data.csv` entry by exact name.
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            entry_name: config::DATA_ENTRY_NAME,
            entry_match: EntryMatch::Exact,
        }
    }

    /// Use a different tabular entry name.
    pub fn entry_name(mut self, name: &'a str) -> Self {
        self.entry_name = name;
        self
    }

    pub fn entry_match(mut self, mode: EntryMatch) -> Self {
        self.entry_match = mode;
        self
    }

    /// Read an upload to the end and import it.
    ///
    /// A failure while reading is a [`LedgerError::Transport`] and happens
    /// before anything touches the store.
    pub fn import_reader<R: Read>(&self, mut reader: R) -> Result<ImportSummary> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.import_bytes(&bytes)
    }

    /// Import an archive and return the summary.
    pub fn import_bytes(&self, bytes: &[u8]) -> Result<ImportSummary> {
        self.import_detailed(bytes).map(|report| report.summary)
    }

    /// Import an archive and return the summary together with per-row
    /// bookkeeping.
    ///
    /// Archive and header problems abort before any write. Rows that fail to
    /// decode or to be written are skipped and reported. All writes and the
    /// aggregate read share one transaction; if the aggregate or the commit
    /// fails, nothing is persisted.
    pub fn import_detailed(&self, bytes: &[u8]) -> Result<ImportReport> {
        let entries = archive::extract_entries(bytes, self.entry_name, self.entry_match)?;
        if entries.is_empty() {
            info!(entry = self.entry_name, "no matching entry in archive");
        }

        let mut rows_read = 0;
        let mut rejections = Vec::new();
        let mut batch: Vec<(u64, PriceRecord)> = Vec::new();
        for entry in &entries {
            let payload = codec::read_payload(&entry.data)?;
            rows_read += payload.rows_read;
            rejections.extend(payload.rejections);
            batch.extend(payload.records);
        }

        let mut tx = self
            .store
            .begin()
            .map_err(|e| LedgerError::transaction("begin", e))?;

        let mut inserted = 0;
        let mut ignored = 0;
        for (line, record) in &batch {
            match tx.upsert(record) {
                Ok(UpsertOutcome::Inserted) => inserted += 1,
                Ok(UpsertOutcome::Ignored) => ignored += 1,
                Err(source) => {
                    let err = LedgerError::StoreWrite {
                        id: record.id.clone(),
                        source: Box::new(source),
                    };
                    warn!(line, error = %err, "skipping row the store refused");
                    rejections.push(RowRejection {
                        line: *line,
                        reason: err.to_string(),
                    });
                }
            }
        }

        let aggregate = tx
            .aggregate()
            .map_err(|e| LedgerError::transaction("aggregate", e))?;
        tx.commit()
            .map_err(|e| LedgerError::transaction("commit", e))?;

        let summary = ImportSummary {
            total_items: inserted,
            total_categories: aggregate.distinct_categories,
            total_price: aggregate.total_price,
        };
        info!(
            rows_read,
            inserted,
            ignored,
            rejected = rejections.len(),
            total_categories = summary.total_categories,
            total_price = %summary.total_price,
            "import committed"
        );

        Ok(ImportReport {
            summary,
            rows_read,
            inserted,
            ignored,
            rejections,
        })
    }
}
