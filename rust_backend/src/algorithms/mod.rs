//! Timeline algorithms and analytics.
//!
//! # Components
//!
//! - [`significance`]: Relative importance and milestone extraction per record
//! - [`layout`]: Grouping and vertical placement of entities
//! - [`analysis`]: Dataset-level summary statistics
//!
//! # Example
//!
//! ```
//! use atlas_rust::algorithms::{layout, LayoutConfig};
//! use atlas_rust::core::domain::RawRecord;
//! use atlas_rust::render::color::ContinentPalette;
//!
//! let records = vec![RawRecord::new("Asia", "Sumeria", "3500-2000 a.C.")];
//! let result = layout(&records, &LayoutConfig::strata(), &ContinentPalette::default());
//! assert_eq!(result.entity_count(), 1);
//! ```

pub mod analysis;
pub mod layout;
pub mod significance;

#[cfg(test)]
mod layout_tests;

pub use analysis::{compute_summary, ContinentCount, DatasetSummary};
pub use layout::{layout, Grouping, LayoutConfig};
pub use significance::{extract_events, significance};
