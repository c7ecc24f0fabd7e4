//! Pointer interaction: hit-testing, tooltips, and the pan/zoom/hover
//! controller that drives one timeline view.

pub mod controller;
pub mod hit_test;
pub mod tooltip;


pub use controller::{
    Cursor, InteractionConfig, InteractionController, InteractionEvent, Modifier, Modifiers,
    Response, TooltipUpdate, ZoomDirection,
};
pub use hit_test::{bar_rect, hit_test};
pub use tooltip::{place_tooltip, TooltipContent, TooltipState};
