//! Store contents → CSV payload → single-entry ZIP archive.

use std::io::Write;

use tracing::info;

use crate::archive;
use crate::codec;
use crate::config;
use crate::error::{LedgerError, Result};
use crate::store::{PriceStore, StoreTransaction};

/// Exports the full contents of a [`PriceStore`] as a ZIP bundle.
pub struct Exporter<'a, S: PriceStore> {
    store: &'a S,
    entry_name: &'a str,
}

impl<'a, S: PriceStore> Exporter<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            entry_name: config::DATA_ENTRY_NAME,
        }
    }

    /// Use a different name for the archive entry.
    pub fn entry_name(mut self, name: &'a str) -> Self {
        self.entry_name = name;
        self
    }

    /// Build the archive in memory.
    ///
    /// Either the complete archive is returned or an error; a partial
    /// archive is never produced.
    pub fn export(&self) -> Result<Vec<u8>> {
        let mut tx = self
            .store
            .begin()
            .map_err(|e| LedgerError::transaction("begin", e))?;
        let records = tx
            .query_all()
            .map_err(|e| LedgerError::transaction("query", e))?;
        tx.rollback()
            .map_err(|e| LedgerError::transaction("rollback", e))?;

        let payload = codec::write_payload(&records)?;
        let bytes = archive::build_archive(self.entry_name, &payload)?;
        info!(records = records.len(), bytes = bytes.len(), "export built");
        Ok(bytes)
    }

    /// Build the archive and write it to `writer`. Returns the number of
    /// bytes written.
    pub fn export_to<W: Write>(&self, mut writer: W) -> Result<usize> {
        let bytes = self.export()?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(bytes.len())
    }
}
