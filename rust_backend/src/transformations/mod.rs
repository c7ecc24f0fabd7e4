//! Record filtering.
//!
//! Narrows the loaded records to what the user selected: continent, region,
//! subsistence, period and free-text search. Filtering never touches the
//! source records; it produces a new subset.
//!
//! # Example
//!
//! ```
//! use atlas_rust::core::domain::RawRecord;
//! use atlas_rust::transformations::{filter_records, FilterCriteria};
//!
//! let records = vec![
//!     RawRecord::new("Asia", "Sumeria", "3500-2000 a.C."),
//!     RawRecord::new("Europa", "Minoica", "2000-1450 a.C."),
//! ];
//! let criteria = FilterCriteria::default().with_period("4000-3000");
//! assert_eq!(filter_records(&records, &criteria).len(), 1);
//! ```

pub mod filtering;

pub use filtering::{
    filter_options, filter_records, matches_period, parse_period, FilterCriteria, FilterOptions,
};
