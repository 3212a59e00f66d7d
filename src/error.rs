use crate::codec::RowError;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("Archive format error: {0}")]
    ArchiveFormat(#[source] zip::result::ZipError),

    #[error("Invalid CSV header: expected id,name,category,price,create_date, found {}", found.join(","))]
    HeaderFormat { found: Vec<String> },

    #[error("Row {line}: {source}")]
    RowDecode {
        line: u64,
        #[source]
        source: RowError,
    },

    #[error("Failed to write record {id}: {source}")]
    StoreWrite {
        id: String,
        #[source]
        source: Box<LedgerError>,
    },

    #[error("Store transaction failed during {operation}: {source}")]
    StoreTransaction {
        operation: &'static str,
        #[source]
        source: Box<LedgerError>,
    },

    #[error("CSV encoding error: {0}")]
    Encoding(#[from] csv::Error),

    #[error("Archive build error: {0}")]
    ArchiveBuild(#[source] zip::result::ZipError),

    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("Unreadable stored value: {0}")]
    StoreData(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl LedgerError {
    /// Wrap a gateway failure that must abort the whole operation.
    pub(crate) fn transaction(operation: &'static str, source: LedgerError) -> Self {
        LedgerError::StoreTransaction {
            operation,
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
