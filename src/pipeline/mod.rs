//! Import and export pipelines.
//!
//! Each pipeline is a lightweight wrapper borrowing a [`PriceStore`](crate::store::PriceStore)
//! and running one operation to completion per call.

pub mod export;
pub mod import;

pub use export::Exporter;
pub use import::Importer;
