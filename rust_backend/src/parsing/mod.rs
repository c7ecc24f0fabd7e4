//! Parsers for civilization tables and chronology text.
//!
//! # Parsers
//!
//! - [`chronology`]: Turn free-text chronology strings into year ranges
//! - [`csv_parser`]: Read the civilization table into [`RawRecord`](crate::core::domain::RawRecord)s
//!
//! # Example
//!
//! ```no_run
//! use atlas_rust::parsing::csv_parser::parse_records_csv;
//! use std::path::Path;
//!
//! let records = parse_records_csv(Path::new("matriz.csv"))
//!     .expect("Failed to parse table");
//! ```

pub mod chronology;
pub mod csv_parser;

#[cfg(test)]
mod csv_parser_tests;

pub use chronology::{format_year, parse_date_range};
