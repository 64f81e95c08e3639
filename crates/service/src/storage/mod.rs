//! Storage abstractions for service layer
//!
//! The artist dataset persists as a single CSV file that is read in full and
//! rewritten in full; `csv_codec` handles the text format and
//! `csv_table_store` the file and its single-writer lock.

pub mod csv_codec;
pub mod csv_table_store;

pub use csv_table_store::CsvTableStore;
