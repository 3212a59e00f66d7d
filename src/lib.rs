//! Price ledger: import and export ZIP bundles of CSV price records.
//!
//! An upload is a ZIP archive holding a `data.csv` entry with the header
//! `id,name,category,price,create_date`. Importing validates every row,
//! upserts the valid ones into a DuckDB `prices` table inside a single
//! transaction, and reports store-wide totals. Exporting writes the whole
//! table back out in the same format.
//!
//! # Quick start
//!
//! ```no_run
//! use price_ledger::PriceLedger;
//!
//! let ledger = PriceLedger::builder().in_memory().build().unwrap();
//!
//! let upload = std::fs::read("prices.zip").unwrap();
//! let summary = ledger.import_bytes(&upload).unwrap();
//! println!("{}", serde_json::to_string(&summary).unwrap());
//!
//! let bundle = ledger.export().unwrap();
//! std::fs::write("data.zip", bundle).unwrap();
//! ```

pub mod archive;
#[cfg(feature = "async")]
pub mod async_client;
pub mod codec;
pub mod config;
pub mod connection;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod store;

pub use archive::EntryMatch;
#[cfg(feature = "async")]
pub use async_client::AsyncPriceLedger;
pub use connection::Connection;
pub use error::{LedgerError, Result};
pub use models::{ImportReport, ImportSummary, PriceRecord, StoreAggregate, UpsertOutcome};
pub use pipeline::{Exporter, Importer};
pub use store::{PriceStore, StoreTransaction};

use std::fmt;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// PriceLedgerBuilder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Location {
    Default,
    Path(PathBuf),
    Memory,
}

/// Builder for configuring and constructing a [`PriceLedger`].
///
/// Use [`PriceLedger::builder()`] to obtain one.
#[derive(Debug, Clone)]
pub struct PriceLedgerBuilder {
    location: Location,
    entry_name: String,
    entry_match: EntryMatch,
}

impl Default for PriceLedgerBuilder {
    fn default() -> Self {
        Self {
            location: Location::Default,
            entry_name: config::DATA_ENTRY_NAME.to_string(),
            entry_match: EntryMatch::Exact,
        }
    }
}

impl PriceLedgerBuilder {
    /// Store records in the DuckDB file at `path`.
    ///
    /// If neither this nor [`in_memory`](Self::in_memory) is called, the
    /// platform data directory is used (e.g. `~/.local/share/price-ledger`
    /// on Linux).
    pub fn database_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.location = Location::Path(path.as_ref().to_path_buf());
        self
    }

    /// Keep records in an in-memory database that disappears with the ledger.
    pub fn in_memory(mut self) -> Self {
        self.location = Location::Memory;
        self
    }

    /// Name of the CSV entry read from uploads and written to exports.
    ///
    /// Defaults to `data.csv`.
    pub fn entry_name(mut self, name: impl Into<String>) -> Self {
        self.entry_name = name.into();
        self
    }

    /// How uploads are searched for the CSV entry. Defaults to
    /// [`EntryMatch::Exact`].
    pub fn entry_match(mut self, mode: EntryMatch) -> Self {
        self.entry_match = mode;
        self
    }

    /// Open the store and create the `prices` table if it does not exist.
    pub fn build(self) -> Result<PriceLedger> {
        if self.entry_name.is_empty() {
            return Err(LedgerError::InvalidArgument(
                "entry name must not be empty".to_string(),
            ));
        }
        let (conn, location) = match self.location {
            Location::Memory => (Connection::open_in_memory()?, None),
            Location::Path(path) => (Connection::open(&path)?, Some(path)),
            Location::Default => {
                let path = config::default_database_path();
                (Connection::open(&path)?, Some(path))
            }
        };
        Ok(PriceLedger {
            conn,
            location,
            entry_name: self.entry_name,
            entry_match: self.entry_match,
        })
    }
}

// ---------------------------------------------------------------------------
// PriceLedger
// ---------------------------------------------------------------------------

/// The main entry point: one long-lived store shared by every import and
/// export.
pub struct PriceLedger {
    conn: Connection,
    location: Option<PathBuf>,
    entry_name: String,
    entry_match: EntryMatch,
}

impl PriceLedger {
    /// Create a new builder for configuring the ledger.
    pub fn builder() -> PriceLedgerBuilder {
        PriceLedgerBuilder::default()
    }

    /// Access the importer, configured with this ledger's entry settings.
    pub fn importer(&self) -> Importer<'_, Connection> {
        Importer::new(&self.conn)
            .entry_name(&self.entry_name)
            .entry_match(self.entry_match)
    }

    /// Access the exporter, configured with this ledger's entry name.
    pub fn exporter(&self) -> Exporter<'_, Connection> {
        Exporter::new(&self.conn).entry_name(&self.entry_name)
    }

    /// Import an uploaded archive. See [`Importer::import_bytes`].
    pub fn import_bytes(&self, bytes: &[u8]) -> Result<ImportSummary> {
        self.importer().import_bytes(bytes)
    }

    /// Read an upload from `reader` and import it.
    pub fn import_reader<R: Read>(&self, reader: R) -> Result<ImportSummary> {
        self.importer().import_reader(reader)
    }

    /// Import an archive and keep the per-row details.
    pub fn import_detailed(&self, bytes: &[u8]) -> Result<ImportReport> {
        self.importer().import_detailed(bytes)
    }

    /// Export the whole store as a ZIP archive.
    pub fn export(&self) -> Result<Vec<u8>> {
        self.exporter().export()
    }

    /// Export the whole store into `writer`.
    pub fn export_to<W: Write>(&self, writer: W) -> Result<usize> {
        self.exporter().export_to(writer)
    }

    /// Read every stored record in a throwaway transaction.
    pub fn records(&self) -> Result<Vec<PriceRecord>> {
        let mut tx = self.conn.begin()?;
        let records = tx.query_all()?;
        tx.rollback()?;
        Ok(records)
    }

    /// Current store-wide aggregate.
    pub fn aggregate(&self) -> Result<StoreAggregate> {
        let mut tx = self.conn.begin()?;
        let aggregate = tx.aggregate()?;
        tx.rollback()?;
        Ok(aggregate)
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Consume the ledger and close the store.
    pub fn close(self) {
        drop(self);
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for PriceLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = self
            .location
            .as_ref()
            .map_or_else(|| ":memory:".to_string(), |p| p.display().to_string());
        write!(
            f,
            "PriceLedger(database={}, entry={}, match={:?})",
            location, self.entry_name, self.entry_match
        )
    }
}
