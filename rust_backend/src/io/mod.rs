//! High-level data loading utilities.
//!
//! Loaders combine the table parsers with format detection and error
//! context, producing the record set the views are built from. CSV is the
//! primary format; a JSON array of records is accepted as well.
//!
//! # Example
//!
//! ```no_run
//! use atlas_rust::io::loaders::DatasetLoader;
//! use std::path::Path;
//!
//! let result = DatasetLoader::load_from_file(Path::new("matriz.csv"))
//!     .expect("Failed to load");
//! println!("Loaded {} records", result.records.len());
//! ```

pub mod loaders;


pub use loaders::{DatasetLoadResult, DatasetLoader, DatasetSourceType};
