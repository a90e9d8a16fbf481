//! # StampKit Core
//!
//! Core types, traits, and utilities for StampKit.
//! Provides page and ink pad geometry, stamp placements, glyph metrics,
//! seeded randomness and the shared error types.

pub mod data;
pub mod error;
pub mod glyphs;
pub mod noise;
pub mod units;

pub use data::{Border, HAlign, InkPadSpec, InkRange, PageSpec, Placement, ReinkPolicy, VAlign};

pub use error::{ConfigError, Error, LayoutError, LayoutOverrunError, Result};

pub use glyphs::{GlyphMetric, StampFont, StampSize, SEPARATOR};

pub use noise::{seeded_rng, NoiseRange, NoiseSource, ValueNoise};
