//! Timeline views and the application state that owns them.
//!
//! Each [`TimelineView`] keeps its own viewport, hover and tooltip state, so
//! the strata and rivers views never observe each other's interaction.

pub mod app;
pub mod coordinator;

pub use app::{AtlasApp, ViewKind, ViewSlot, ViewStatus};
pub use coordinator::{
    detail_text, AlertPresenter, DetailPresenter, InitError, TimelineView, ViewSettings,
};
