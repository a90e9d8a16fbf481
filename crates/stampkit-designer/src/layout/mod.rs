//! Stamp layout engine
//!
//! Turns content into stamp placements on a page. Text content is packed into
//! rows of cells ([`text_flow`]), the rows are aligned ([`alignment`]) and then
//! flattened into placements. Field and scatter layouts ([`field`],
//! [`scatter`]) position stamps on a 2D walk instead of packing rows.
//!
//! All coordinates are page millimetres, origin top-left, y down.

pub mod alignment;
pub mod field;
pub mod scatter;
pub mod text_flow;

pub use field::{quantise_angle, AngleSource, FieldGrid, FieldLayout, NoiseSettings};
pub use scatter::{Flourish, Keyword, ScatterLayout};

use rand::Rng;
use serde::{Deserialize, Serialize};
use stampkit_core::{HAlign, PageSpec, Placement, Result, StampFont, VAlign};
use tracing::{debug, info};

/// Default guard for every packing loop
pub const DEFAULT_MAX_ITERATIONS: usize = 100_000;

/// Alignment and packing limits shared by all text modes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutPolicy {
    pub h_align: HAlign,
    pub v_align: VAlign,
    /// Row pitch as a multiple of the stamp height
    pub line_height: f64,
    /// Upper bound on iterations of any packing loop
    pub max_iterations: usize,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            h_align: HAlign::Left,
            v_align: VAlign::Top,
            line_height: 1.0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl LayoutPolicy {
    pub fn new(h_align: HAlign, v_align: VAlign) -> Self {
        Self {
            h_align,
            v_align,
            ..Self::default()
        }
    }

    /// Distance between the tops of consecutive rows
    pub fn row_pitch(&self, font: &StampFont) -> f64 {
        font.size.height * self.line_height
    }
}

/// What the text modes lay out
#[derive(Debug, Clone, PartialEq)]
pub enum ContentSource {
    /// Fill the page with words drawn at random, separated by spaces
    Vocabulary(Vec<String>),
    /// Fill the page with single symbols drawn at random, butted together
    Glyphs(Vec<String>),
    /// Flow a document, keeping its line breaks
    Document(String),
}

/// One stamp (or separator) inside a row
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub symbol: String,
    /// Left edge of the glyph footprint
    pub left: f64,
    pub width: f64,
    pub x_nudge: f64,
    pub y_nudge: f64,
    /// Takes up space but is never stamped
    pub separator: bool,
}

impl Cell {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Cells sharing one y-band
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    pub cells: Vec<Cell>,
    /// Top edge of the band
    pub top: f64,
}

impl Row {
    pub fn new(cells: Vec<Cell>, top: f64) -> Self {
        Self { cells, top }
    }

    /// Summed width of every cell, separators included
    pub fn width(&self) -> f64 {
        self.cells.iter().map(|c| c.width).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cells that will become placements
    pub fn glyph_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.separator).count()
    }

    pub fn shift_x(&mut self, dx: f64) {
        for cell in &mut self.cells {
            cell.left += dx;
        }
    }

    /// Drop leading and trailing separators
    ///
    /// The remaining cells move left so the row still starts where the first
    /// removed cell did.
    pub fn trim_separators(&mut self) {
        let Some(first) = self.cells.iter().position(|c| !c.separator) else {
            self.cells.clear();
            return;
        };
        let last = self
            .cells
            .iter()
            .rposition(|c| !c.separator)
            .unwrap_or(first);

        let start = self.cells[0].left;
        self.cells.truncate(last + 1);
        self.cells.drain(..first);
        let dx = start - self.cells[0].left;
        self.shift_x(dx);
    }
}

/// Lay out text content on a page
///
/// Packs rows for the content source, aligns them with the policy and
/// returns one placement per stamped glyph in row order.
pub fn layout<R: Rng + ?Sized>(
    page: &PageSpec,
    content: &ContentSource,
    policy: &LayoutPolicy,
    font: &StampFont,
    rng: &mut R,
) -> Result<Vec<Placement>> {
    page.validate()?;

    let mut rows = match content {
        ContentSource::Vocabulary(words) => {
            text_flow::fill_rows(page, words, text_flow::Joining::Separated, policy, font, rng)?
        }
        ContentSource::Glyphs(symbols) => {
            text_flow::fill_rows(page, symbols, text_flow::Joining::Butted, policy, font, rng)?
        }
        ContentSource::Document(text) => text_flow::flow_document(page, text, policy, font)?,
    };

    alignment::align_rows(&mut rows, page, policy, font);
    for (index, row) in rows.iter().enumerate() {
        debug!(
            "Row {}: {} glyphs, {:.2} mm wide, top {:.2}",
            index,
            row.glyph_count(),
            row.width(),
            row.top
        );
    }

    let placements = flatten(&rows, font);
    info!(
        "Laid out {} placements in {} rows",
        placements.len(),
        rows.len()
    );
    Ok(placements)
}

/// Turn aligned rows into placements, skipping separators
pub fn flatten(rows: &[Row], font: &StampFont) -> Vec<Placement> {
    let half_height = font.size.height / 2.0;
    rows.iter()
        .flat_map(|row| {
            row.cells.iter().filter(|c| !c.separator).map(move |cell| {
                Placement::new(
                    cell.symbol.clone(),
                    cell.left + cell.width / 2.0 + cell.x_nudge,
                    row.top + half_height + cell.y_nudge,
                )
            })
        })
        .collect()
}
