//! Record codec: maps CSV rows to [`PriceRecord`] values and back.
//!
//! The header must match [`config::HEADER`] exactly. Data rows are decoded
//! independently, so one malformed row never affects its neighbours; the
//! payload-level helpers collect such rows as [`RowRejection`]s.

use chrono::{Datelike, NaiveDate};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use crate::config;
use crate::error::{LedgerError, Result};
use crate::models::{PriceRecord, RowRejection};

/// Why a single data row could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("empty id")]
    MissingId,

    #[error("invalid price format: {value:?}")]
    Price { value: String },

    #[error("negative price: {value}")]
    NegativePrice { value: String },

    #[error("price {value} does not fit DECIMAL(10,2)")]
    PriceOutOfRange { value: String },

    #[error("invalid date format: {value:?}")]
    Date { value: String },
}

// ---------------------------------------------------------------------------
// Row-level codec
// ---------------------------------------------------------------------------

/// Check that a header row is exactly `id,name,category,price,create_date`.
pub fn check_header(header: &StringRecord) -> Result<()> {
    let matches = header.len() == config::HEADER.len()
        && header.iter().zip(config::HEADER).all(|(got, want)| got == want);
    if matches {
        Ok(())
    } else {
        Err(LedgerError::HeaderFormat {
            found: header.iter().map(str::to_string).collect(),
        })
    }
}

/// Decode one data row into a [`PriceRecord`].
pub fn decode_row(row: &StringRecord) -> std::result::Result<PriceRecord, RowError> {
    if row.len() != config::HEADER.len() {
        return Err(RowError::FieldCount {
            expected: config::HEADER.len(),
            found: row.len(),
        });
    }

    let field = |i: usize| row.get(i).unwrap_or_default();

    let id = field(0);
    if id.is_empty() {
        return Err(RowError::MissingId);
    }

    Ok(PriceRecord {
        id: id.to_string(),
        name: field(1).to_string(),
        category: field(2).to_string(),
        price: parse_price(field(3))?,
        created_at: parse_date(field(4))?,
    })
}

/// Encode a record as CSV fields in header order.
pub fn encode_row(record: &PriceRecord) -> [String; 5] {
    [
        record.id.clone(),
        record.name.clone(),
        record.category.clone(),
        format!("{:.2}", record.price),
        record.created_at.format(config::DATE_FORMAT).to_string(),
    ]
}

/// Parse a plain decimal string and normalize it to scale 2.
pub fn parse_price(value: &str) -> std::result::Result<Decimal, RowError> {
    let parsed: Decimal = value.parse().map_err(|_| RowError::Price {
        value: value.to_string(),
    })?;
    if parsed.is_sign_negative() && !parsed.is_zero() {
        return Err(RowError::NegativePrice {
            value: value.to_string(),
        });
    }

    let price = round_price(parsed);
    if price > Decimal::new(config::MAX_PRICE_CENTS, config::PRICE_SCALE) {
        return Err(RowError::PriceOutOfRange {
            value: value.to_string(),
        });
    }
    Ok(price)
}

/// Round half away from zero to scale 2, padding shorter scales.
pub fn round_price(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(config::PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(config::PRICE_SCALE);
    rounded
}

/// Parse a strict `YYYY-MM-DD` date with a year between 0001 and 9999.
///
/// Signed, five-digit and zero years are rejected here; DuckDB either
/// refuses them or stores them as BC dates.
pub fn parse_date(value: &str) -> std::result::Result<NaiveDate, RowError> {
    let invalid = || RowError::Date {
        value: value.to_string(),
    };

    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(invalid());
    }

    let date = NaiveDate::parse_from_str(value, config::DATE_FORMAT).map_err(|_| invalid())?;
    if date.year() < 1 {
        return Err(invalid());
    }
    Ok(date)
}

// ---------------------------------------------------------------------------
// Payload-level codec
// ---------------------------------------------------------------------------

/// Records decoded from one CSV payload.
#[derive(Debug, Default)]
pub struct DecodedPayload {
    /// Valid records, each with the line it came from.
    pub records: Vec<(u64, PriceRecord)>,
    pub rows_read: u64,
    pub rejections: Vec<RowRejection>,
}

/// Decode a complete CSV payload.
///
/// A header mismatch fails the whole payload. Malformed rows are logged,
/// recorded in [`DecodedPayload::rejections`], and skipped. An empty payload
/// yields no records.
pub fn read_payload(bytes: &[u8]) -> Result<DecodedPayload> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut out = DecodedPayload::default();
    let mut rows = reader.records();

    match rows.next() {
        None => return Ok(out),
        Some(Ok(header)) => check_header(&header)?,
        Some(Err(e)) => {
            return Err(LedgerError::HeaderFormat {
                found: vec![e.to_string()],
            })
        }
    }

    for (index, row) in rows.enumerate() {
        out.rows_read += 1;
        // Fallback line for rows the reader could not position (header is line 1).
        let fallback_line = index as u64 + 2;
        match row {
            Ok(row) => {
                let line = row.position().map_or(fallback_line, |p| p.line());
                match decode_row(&row) {
                    Ok(record) => out.records.push((line, record)),
                    Err(source) => {
                        let err = LedgerError::RowDecode { line, source };
                        warn!(line, error = %err, "skipping malformed row");
                        out.rejections.push(RowRejection {
                            line,
                            reason: err.to_string(),
                        });
                    }
                }
            }
            Err(e) => {
                let line = e.position().map_or(fallback_line, |p| p.line());
                warn!(line, error = %e, "skipping unreadable row");
                out.rejections.push(RowRejection {
                    line,
                    reason: e.to_string(),
                });
                if e.is_io_error() {
                    break;
                }
            }
        }
    }

    Ok(out)
}

/// Encode the header followed by one row per record.
pub fn write_payload(records: &[PriceRecord]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(config::HEADER)?;
    for record in records {
        writer.write_record(encode_row(record))?;
    }
    writer
        .into_inner()
        .map_err(|e| LedgerError::Encoding(csv::Error::from(e.into_error())))
}
