use std::path::PathBuf;

/// Name of the tabular entry inside an archive.
pub const DATA_ENTRY_NAME: &str = "data.csv";

/// Exact column sequence of the tabular payload.
pub const HEADER: [&str; 5] = ["id", "name", "category", "price", "create_date"];

/// `chrono` format for `create_date` values.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Number of decimal places prices are stored with.
pub const PRICE_SCALE: u32 = 2;

/// Largest value a DECIMAL(10,2) column can hold, in hundredths.
pub const MAX_PRICE_CENTS: i64 = 9_999_999_999;

pub const TABLE_NAME: &str = "prices";

pub const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS prices (
    id VARCHAR PRIMARY KEY,
    created_at DATE NOT NULL,
    name VARCHAR NOT NULL,
    category VARCHAR NOT NULL,
    price DECIMAL(10, 2) NOT NULL
)";

pub fn default_database_path() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("price-ledger").join("prices.duckdb")
    } else {
        PathBuf::from(".price-ledger").join("prices.duckdb")
    }
}
