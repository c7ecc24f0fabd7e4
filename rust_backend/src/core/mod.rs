//! Core domain models for the civilization timelines.
//!
//! This module defines the records loaded from the source table and the
//! geometry produced for them by the layout engine.

pub mod columns;
pub mod domain;
