//! DuckDB-backed implementation of the store gateway.
//!
//! Opens (or creates) the database, bootstraps the `prices` table and hands
//! out [`DuckDbTransaction`] handles. Prices and dates cross the DuckDB
//! boundary as text and are cast on the SQL side, so no float ever touches a
//! stored amount.
//!
//! DuckDB has no SAVEPOINT, and any failed statement aborts the enclosing
//! transaction. The codec's row validation (price range, strict dates) is
//! what keeps a decoded record from failing its insert; a record that does
//! fail here takes the rest of the import's transaction down with it.

use std::path::Path;

use chrono::NaiveDate;
use duckdb::{params, Connection as DuckDbConnection};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::codec;
use crate::config;
use crate::error::{LedgerError, Result};
use crate::models::{PriceRecord, StoreAggregate, UpsertOutcome};
use crate::store::{PriceStore, StoreTransaction};

const EXISTS_SQL: &str = "SELECT COUNT(*) FROM prices WHERE id = ?";

const INSERT_SQL: &str = "INSERT INTO prices (id, created_at, name, category, price) \
     VALUES (?, CAST(? AS DATE), ?, ?, CAST(? AS DECIMAL(10, 2))) \
     ON CONFLICT (id) DO NOTHING";

const SELECT_ALL_SQL: &str = "SELECT id, name, category, CAST(price AS VARCHAR), \
     CAST(created_at AS VARCHAR) FROM prices ORDER BY id";

const AGGREGATE_SQL: &str = "SELECT COUNT(DISTINCT category), \
     CAST(COALESCE(SUM(price), 0) AS VARCHAR) FROM prices";

/// Wraps a DuckDB connection holding the `prices` table.
pub struct Connection {
    conn: DuckDbConnection,
}

impl Connection {
    /// Open an ephemeral in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        Self::bootstrap(DuckDbConnection::open_in_memory()?)
    }

    /// Open the store at `path`, creating the file and its parent directory
    /// if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        debug!(path = %path.display(), "opening price store");
        Self::bootstrap(DuckDbConnection::open(path)?)
    }

    fn bootstrap(conn: DuckDbConnection) -> Result<Self> {
        conn.execute_batch(config::SCHEMA_SQL)?;
        debug!(table = config::TABLE_NAME, "price table ready");
        Ok(Self { conn })
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }
}

impl PriceStore for Connection {
    type Transaction<'a>
        = DuckDbTransaction<'a>
    where
        Self: 'a;

    fn begin(&self) -> Result<DuckDbTransaction<'_>> {
        self.conn.execute_batch("BEGIN TRANSACTION")?;
        Ok(DuckDbTransaction {
            conn: &self.conn,
            finished: false,
        })
    }
}

// ---------------------------------------------------------------------------
// DuckDbTransaction
// ---------------------------------------------------------------------------

/// An open DuckDB transaction. Rolls back on drop unless finished.
pub struct DuckDbTransaction<'a> {
    conn: &'a DuckDbConnection,
    finished: bool,
}

impl DuckDbTransaction<'_> {
    /// Run `COMMIT` or `ROLLBACK`. On failure the handle stays unfinished, so
    /// dropping it still issues a rollback.
    fn finish(mut self, statement: &str) -> Result<()> {
        self.conn.execute_batch(statement)?;
        self.finished = true;
        Ok(())
    }
}

impl StoreTransaction for DuckDbTransaction<'_> {
    fn upsert(&mut self, record: &PriceRecord) -> Result<UpsertOutcome> {
        let existing: i64 = self
            .conn
            .query_row(EXISTS_SQL, params![record.id], |row| row.get(0))?;
        if existing > 0 {
            return Ok(UpsertOutcome::Ignored);
        }

        let [id, name, category, price, created_at] = codec::encode_row(record);
        let changed = self
            .conn
            .execute(INSERT_SQL, params![id, created_at, name, category, price])?;

        Ok(if changed > 0 {
            UpsertOutcome::Inserted
        } else {
            UpsertOutcome::Ignored
        })
    }

    fn query_all(&mut self) -> Result<Vec<PriceRecord>> {
        let mut stmt = self.conn.prepare(SELECT_ALL_SQL)?;
        let mut rows = stmt.query([])?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let price: String = row.get(3)?;
            let created_at: String = row.get(4)?;
            out.push(PriceRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                category: row.get(2)?,
                price: parse_stored_price(&price)?,
                created_at: NaiveDate::parse_from_str(&created_at, config::DATE_FORMAT)
                    .map_err(|_| LedgerError::StoreData(format!("date {created_at:?}")))?,
            });
        }

        Ok(out)
    }

    fn aggregate(&mut self) -> Result<StoreAggregate> {
        let (categories, total): (i64, String) = self
            .conn
            .query_row(AGGREGATE_SQL, [], |row| Ok((row.get(0)?, row.get(1)?)))?;

        Ok(StoreAggregate {
            distinct_categories: u64::try_from(categories)
                .map_err(|_| LedgerError::StoreData(format!("category count {categories}")))?,
            total_price: parse_stored_price(&total)?,
        })
    }

    fn commit(self) -> Result<()> {
        self.finish("COMMIT")
    }

    fn rollback(self) -> Result<()> {
        self.finish("ROLLBACK")
    }
}

impl Drop for DuckDbTransaction<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = self.conn.execute_batch("ROLLBACK") {
            warn!(error = %e, "failed to roll back abandoned transaction");
        }
    }
}

fn parse_stored_price(value: &str) -> Result<Decimal> {
    value
        .parse::<Decimal>()
        .map(codec::round_price)
        .map_err(|_| LedgerError::StoreData(format!("price {value:?}")))
}
