//! Async wrapper around [`PriceLedger`] for use in async runtimes (Tokio, etc.).
//!
//! Runs every ledger operation on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free while
//! DuckDB and the archive codec do their work.
//!
//! # Example
//!
//! ```no_run
//! use price_ledger::{AsyncPriceLedger, PriceLedger};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let ledger = AsyncPriceLedger::build(PriceLedger::builder().in_memory())
//!         .await
//!         .unwrap();
//!
//!     let upload = std::fs::read("prices.zip").unwrap();
//!     let summary = ledger.import_bytes(upload).await.unwrap();
//!     let bundle = ledger.export().await.unwrap();
//! }
//! ```

use std::sync::{Arc, Mutex};

use crate::error::{LedgerError, Result};
use crate::models::{ImportReport, ImportSummary};
use crate::{PriceLedger, PriceLedgerBuilder};

/// Async wrapper around [`PriceLedger`].
///
/// The ledger is shared behind a [`Mutex`], so operations on one
/// `AsyncPriceLedger` run one at a time. Cloning is cheap and shares the
/// same store.
#[derive(Clone)]
pub struct AsyncPriceLedger {
    inner: Arc<Mutex<PriceLedger>>,
}

impl AsyncPriceLedger {
    /// Build the ledger on the blocking thread pool.
    pub async fn build(builder: PriceLedgerBuilder) -> Result<Self> {
        tokio::task::spawn_blocking(move || {
            let ledger = builder.build()?;
            Ok(Self::new(ledger))
        })
        .await
        .map_err(|e| LedgerError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Wrap an already built ledger.
    pub fn new(ledger: PriceLedger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Run a sync ledger operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&PriceLedger) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let ledger = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = ledger
                .lock()
                .map_err(|_| LedgerError::InvalidArgument("Ledger lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| LedgerError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Import an uploaded archive.
    pub async fn import_bytes(&self, bytes: Vec<u8>) -> Result<ImportSummary> {
        self.run(move |l| l.import_bytes(&bytes)).await
    }

    /// Import an uploaded archive and keep the per-row details.
    pub async fn import_detailed(&self, bytes: Vec<u8>) -> Result<ImportReport> {
        self.run(move |l| l.import_detailed(&bytes)).await
    }

    /// Export the whole store as a ZIP archive.
    pub async fn export(&self) -> Result<Vec<u8>> {
        self.run(|l| l.export()).await
    }
}
