//! Row packing for text content
//!
//! Words are appended left to right from the left border. A word that would
//! cross the right border closes the row and starts the next one. Row-fill
//! modes stop when the page height is used up; document mode stops when the
//! document runs out.

use super::{Cell, LayoutPolicy, Row};
use rand::seq::SliceRandom;
use rand::Rng;
use stampkit_core::{
    Error, LayoutError, LayoutOverrunError, PageSpec, Result, StampFont, SEPARATOR,
};
use tracing::{debug, warn};

/// Tolerance for a word that exactly fills the usable width
const FIT_EPSILON: f64 = 1e-9;

/// How consecutive tokens in a row are joined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joining {
    /// A separator glyph between tokens
    Separated,
    /// Tokens touch
    Butted,
}

struct RowPacker<'a> {
    page: &'a PageSpec,
    font: &'a StampFont,
    pitch: f64,
    separator_width: Option<f64>,
    rows: Vec<Row>,
    current: Vec<Cell>,
    x: f64,
}

impl<'a> RowPacker<'a> {
    fn new(
        page: &'a PageSpec,
        font: &'a StampFont,
        policy: &LayoutPolicy,
        joining: Joining,
    ) -> Result<Self> {
        let separator_width = match joining {
            Joining::Separated => Some(font.char_metric(SEPARATOR)?.width),
            Joining::Butted => None,
        };
        Ok(Self {
            page,
            font,
            pitch: policy.row_pitch(font),
            separator_width,
            rows: Vec::new(),
            current: Vec::new(),
            x: page.border.left,
        })
    }

    fn gap(&self) -> f64 {
        if self.current.is_empty() {
            0.0
        } else {
            self.separator_width.unwrap_or(0.0)
        }
    }

    fn push_word(&mut self, word: &str) -> Result<()> {
        let width = self.font.word_width(word)?;
        let usable = self.page.usable_width();
        if width > usable + FIT_EPSILON {
            return Err(LayoutError::TokenTooWide {
                token: word.to_string(),
                width,
                usable,
            }
            .into());
        }

        if !self.current.is_empty()
            && self.x + self.gap() + width > self.page.right_edge() + FIT_EPSILON
        {
            self.break_row();
        }

        if !self.current.is_empty() {
            if let Some(separator_width) = self.separator_width {
                self.push_cell(SEPARATOR, separator_width, 0.0, 0.0, true);
            }
        }
        for symbol in word.chars() {
            let metric = *self.font.char_metric(symbol)?;
            self.push_cell(
                symbol,
                metric.width,
                metric.x_nudge,
                metric.y_nudge,
                symbol == SEPARATOR,
            );
        }
        Ok(())
    }

    fn push_cell(&mut self, symbol: char, width: f64, x_nudge: f64, y_nudge: f64, separator: bool) {
        self.current.push(Cell {
            symbol: symbol.to_string(),
            left: self.x,
            width,
            x_nudge,
            y_nudge,
            separator,
        });
        self.x += width;
    }

    fn break_row(&mut self) {
        let top = self.page.border.top + self.rows.len() as f64 * self.pitch;
        let mut row = Row::new(std::mem::take(&mut self.current), top);
        row.trim_separators();
        self.rows.push(row);
        self.x = self.page.border.left;
    }
}

/// Number of rows that fit between the top and bottom borders
pub fn rows_that_fit(page: &PageSpec, policy: &LayoutPolicy, font: &StampFont) -> usize {
    let pitch = policy.row_pitch(font);
    if pitch <= 0.0 {
        return 0;
    }
    (page.usable_height() / pitch).floor().max(0.0) as usize
}

/// Fill the page with tokens drawn uniformly at random
pub fn fill_rows<R: Rng + ?Sized>(
    page: &PageSpec,
    tokens: &[String],
    joining: Joining,
    policy: &LayoutPolicy,
    font: &StampFont,
    rng: &mut R,
) -> Result<Vec<Row>> {
    if tokens.is_empty() {
        return Err(LayoutError::EmptyContent {
            reason: "vocabulary has no words".to_string(),
        }
        .into());
    }
    for token in tokens {
        font.word_width(token)?;
    }

    let max_rows = rows_that_fit(page, policy, font);
    if max_rows == 0 {
        return Err(LayoutError::EmptyGrid {
            width: page.usable_width(),
            height: page.usable_height(),
            cell: policy.row_pitch(font),
        }
        .into());
    }

    let mut packer = RowPacker::new(page, font, policy, joining)?;
    let mut iterations = 0;
    while packer.rows.len() < max_rows {
        iterations += 1;
        if iterations > policy.max_iterations {
            return Err(LayoutOverrunError::new("row-fill", policy.max_iterations).into());
        }
        let token = tokens
            .choose(rng)
            .ok_or_else(|| Error::other("vocabulary became empty"))?;
        packer.push_word(token)?;
    }

    // The word that overflowed the last row started a row that does not fit
    packer.rows.truncate(max_rows);
    debug!("Row fill packed {} rows in {} draws", max_rows, iterations);
    Ok(packer.rows)
}

/// Flow a document into rows, one or more per input line
///
/// The text is upper-cased and filtered to the symbols the font can stamp.
/// Empty input lines produce empty rows.
pub fn flow_document(
    page: &PageSpec,
    text: &str,
    policy: &LayoutPolicy,
    font: &StampFont,
) -> Result<Vec<Row>> {
    let text = font.retain_known(text);
    if text.trim().is_empty() {
        return Err(LayoutError::EmptyContent {
            reason: "document has no stampable symbols".to_string(),
        }
        .into());
    }

    let mut packer = RowPacker::new(page, font, policy, Joining::Separated)?;
    let mut iterations = 0;
    for line in text.lines() {
        for word in line.split(SEPARATOR).filter(|w| !w.is_empty()) {
            iterations += 1;
            if iterations > policy.max_iterations {
                return Err(LayoutOverrunError::new("document", policy.max_iterations).into());
            }
            packer.push_word(word)?;
        }
        packer.break_row();
    }

    let rows = packer.rows;
    if let Some(last) = rows.last() {
        let bottom = last.top + font.size.height;
        if bottom > page.bottom_edge() + FIT_EPSILON {
            warn!(
                "Document needs {} rows and overflows the bottom border by {:.2} mm",
                rows.len(),
                bottom - page.bottom_edge()
            );
        }
    }
    Ok(rows)
}
