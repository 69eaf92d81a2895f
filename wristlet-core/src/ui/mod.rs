//! Presentation state
//!
//! An app owns exactly one [`Window`], which owns its layers. Handlers
//! mutate layers in place and mark them dirty; the host redraws dirty
//! layers after the handler returns.

pub mod layer;
pub mod window;

pub use layer::{
    truncate_str, BitmapLayer, Font, Layer, LayerId, TextAlignment, TextLayer, TEXT_CAPACITY,
};
pub use window::{UiError, Window, MAX_LAYERS};
