//! Atlas of civilizations: turns a table of cultures and their free-text
//! chronologies into two interactive timeline visualizations.
//!
//! The pipeline runs in stages:
//!
//! - [`parsing`] reads record tables and interprets chronology strings;
//! - [`algorithms`] scores significance, derives events and lays entities out;
//! - [`render`] draws a layout on any [`render::DrawSurface`];
//! - [`interaction`] turns pointer and wheel input into viewport changes;
//! - [`view`] ties a surface, a layout and a viewport into a live view.

pub mod algorithms;
pub mod config;
pub mod core;
pub mod error;
pub mod interaction;
pub mod io;
pub mod parsing;
pub mod render;
pub mod transformations;
pub mod view;

pub use config::AtlasConfig;
pub use error::{AtlasError, AtlasResult};
