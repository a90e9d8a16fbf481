//! # StampKit CAM Tools
//!
//! This crate turns stamp placements into a program for the stamping
//! plotter.
//!
//! ## Components
//!
//! - **Grouping**: Partitions placements per glyph so each physical stamp is
//!   installed once, and assigns re-ink flags
//! - **Machine Profile**: Pen heights, ink pad range, page to bed transform
//!   and header values
//! - **Toolpath**: The append-only motion program and its generator

pub mod grouping;
pub mod machine;
pub mod toolpath;

// Re-export commonly used items
pub use grouping::{group, GlyphGroups};
pub use machine::{BedTransform, MachineHeader, MachineProfile, StampHeights};
pub use toolpath::{MotionCommand, MotionScript, StampToolpathGenerator, ToolOrder};
