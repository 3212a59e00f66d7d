//! Store gateway contract used by the import and export pipelines.
//!
//! Every read and write happens inside an explicit transaction. The
//! pipelines never issue queries outside this contract, so any store that
//! can provide these operations (DuckDB via [`Connection`](crate::Connection),
//! or a test double) can back them.

use crate::error::Result;
use crate::models::{PriceRecord, StoreAggregate, UpsertOutcome};

/// A store that can open transactions over the `prices` table.
pub trait PriceStore {
    type Transaction<'a>: StoreTransaction
    where
        Self: 'a;

    /// Begin a new transaction.
    fn begin(&self) -> Result<Self::Transaction<'_>>;
}

/// An open transaction.
///
/// Implementations must roll back when dropped without an explicit
/// [`commit`](StoreTransaction::commit) or
/// [`rollback`](StoreTransaction::rollback).
pub trait StoreTransaction {
    /// Insert `record` unless a record with the same id already exists.
    fn upsert(&mut self, record: &PriceRecord) -> Result<UpsertOutcome>;

    /// Every stored record, in no guaranteed order.
    fn query_all(&mut self) -> Result<Vec<PriceRecord>>;

    /// Distinct category count and total price over the whole table, as seen
    /// by this transaction.
    fn aggregate(&mut self) -> Result<StoreAggregate>;

    fn commit(self) -> Result<()>;

    fn rollback(self) -> Result<()>;
}
