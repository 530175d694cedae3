//! UI module for the guide TUI

pub mod render;
pub mod theme;

pub use render::{FocusedPanel, Overlay};
