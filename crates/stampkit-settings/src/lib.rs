//! StampKit Settings Crate
//!
//! Loads run configuration, stamp fonts and content files.

pub mod config;
pub mod persistence;

pub use config::{FieldSettings, LayoutSettings, MachineSettings, RowFillSettings, StampConfig};
pub use persistence::{check_inputs, load_font, read_structured, read_text, write_structured, FileFormat};
