//! Data models for pages, ink pads and stamp placements
//!
//! This module provides:
//! - Page geometry with border insets
//! - Ink pad rectangles and their safe re-ink range
//! - Stamp placements produced by the layout engine
//! - Alignment and re-ink policies shared by layout, grouping and config

pub mod page;
pub mod placement;

pub use page::{Border, InkPadSpec, InkRange, PageSpec};
pub use placement::{HAlign, Placement, ReinkPolicy, VAlign};
