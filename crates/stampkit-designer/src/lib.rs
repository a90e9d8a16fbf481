//! # StampKit Designer
//!
//! This crate decides where stamps land on the page and draws previews of
//! the result.
//!
//! ## Core Components
//!
//! ### Layout
//! - **Text flow**: Vocabulary and glyph row fill, document letterpress
//! - **Alignment**: Left, right, center and justified rows; top, bottom,
//!   middle and fill pages
//! - **Field**: One arrow per grid cell, angled by noise or crossed waves
//! - **Scatter**: Wave-stepped rows with tail trim, flourishes and a keyword
//!
//! ### Preview
//! - **Canvas trait**: Millimetre drawing primitives
//! - **Pixmap canvas**: tiny-skia raster with rusttype labels
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stampkit_core::{seeded_rng, Border, PageSpec, StampFont};
//! use stampkit_designer::{layout, ContentSource, LayoutPolicy};
//!
//! let page = PageSpec::new(210.0, 297.0, Border::uniform(20.0));
//! let content = ContentSource::Vocabulary(vec!["LOVE".to_string()]);
//! let placements = layout(&page, &content, &LayoutPolicy::default(),
//!     &StampFont::ten_mm(), &mut seeded_rng(Some(7)))?;
//! ```

pub mod font_manager;
pub mod layout;
pub mod preview;

pub use layout::{
    flatten, layout, quantise_angle, AngleSource, Cell, ContentSource, FieldGrid, FieldLayout,
    Flourish, Keyword, LayoutPolicy, NoiseSettings, Row, ScatterLayout, DEFAULT_MAX_ITERATIONS,
};
pub use preview::{
    palette, render_preview, symbol_order, PixmapCanvas, PreviewCanvas, PreviewColor,
    PreviewOptions, PreviewStyle,
};
