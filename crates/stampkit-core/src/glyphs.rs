//! Glyph metrics for physical stamps
//!
//! A stamp font maps every symbol that can appear in content to the physical
//! footprint of its rubber glyph. The JSON form matches the font files used by
//! the stamping rigs:
//!
//! ```json
//! { "size": { "width": 10, "height": 10 },
//!   "glyphs": { "A": { "width": 6.2, "xNudge": 0, "yNudge": 0 } } }
//! ```

use crate::error::{LayoutError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The separator symbol placed between words
pub const SEPARATOR: char = ' ';

/// Footprint of one glyph (mm)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphMetric {
    /// Advance width of the glyph
    pub width: f64,
    /// Horizontal correction for an off-centre glyph on its stamp
    #[serde(default)]
    pub x_nudge: f64,
    /// Vertical correction for an off-centre glyph on its stamp
    #[serde(default)]
    pub y_nudge: f64,
}

impl GlyphMetric {
    pub fn new(width: f64) -> Self {
        Self {
            width,
            x_nudge: 0.0,
            y_nudge: 0.0,
        }
    }

    pub fn with_nudge(width: f64, x_nudge: f64, y_nudge: f64) -> Self {
        Self {
            width,
            x_nudge,
            y_nudge,
        }
    }
}

/// Outer size of the stamp body (mm)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StampSize {
    pub width: f64,
    pub height: f64,
}

/// A set of stamps sharing one body size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampFont {
    pub size: StampSize,
    pub glyphs: HashMap<String, GlyphMetric>,
}

impl StampFont {
    pub fn new(size: StampSize) -> Self {
        Self {
            size,
            glyphs: HashMap::new(),
        }
    }

    /// Uniform font where every listed symbol has the same width
    pub fn uniform(symbols: &str, glyph_width: f64, size: StampSize) -> Self {
        let mut font = Self::new(size);
        for symbol in symbols.chars() {
            font.insert(symbol.to_string(), GlyphMetric::new(glyph_width));
        }
        font
    }

    /// The 10 mm uppercase rubber alphabet
    pub fn ten_mm() -> Self {
        const UPPERCASE: [(char, f64, f64, f64); 26] = [
            ('A', 6.2, 0.0, 0.0),
            ('B', 5.2, 0.0, 0.0),
            ('C', 5.3, 0.0, -0.05),
            ('D', 6.5, 0.0, 0.0),
            ('E', 5.3, 0.0, 0.0),
            ('F', 5.2, 0.0, 0.0),
            ('G', 6.4, 0.0, 0.0),
            ('H', 6.4, 0.0, 0.0),
            ('I', 4.8, 0.0, 0.0),
            ('J', 3.9, 0.0, 0.0),
            ('K', 5.0, 0.45, 0.0),
            ('L', 5.0, 0.0, 0.0),
            ('M', 7.5, 0.0, 0.0),
            ('N', 6.3, 1.11, 0.0),
            ('O', 5.8, 0.0, 0.0),
            ('P', 4.9, 0.0, 0.0),
            ('Q', 6.0, 0.0, 0.0),
            ('R', 6.0, -0.1, -0.1),
            ('S', 4.8, 0.0, 0.0),
            ('T', 5.9, 0.0, -0.05),
            ('U', 5.0, 0.9, 0.0),
            ('V', 6.3, 0.0, 0.0),
            ('W', 8.0, 0.0, 0.0),
            ('X', 6.2, 0.0, 0.0),
            ('Y', 6.1, 0.0, 0.0),
            ('Z', 5.8, 0.0, 0.0),
        ];

        let mut font = Self::new(StampSize {
            width: 10.0,
            height: 10.0,
        });
        for (symbol, width, x_nudge, y_nudge) in UPPERCASE {
            font.insert(
                symbol.to_string(),
                GlyphMetric::with_nudge(width, x_nudge, y_nudge),
            );
        }
        for symbol in "0123456789!?".chars() {
            font.insert(symbol.to_string(), GlyphMetric::new(8.0));
        }
        font.insert("&", GlyphMetric::new(6.4));
        font.insert(".", GlyphMetric::new(3.0));
        font.insert(SEPARATOR.to_string(), GlyphMetric::new(10.0));
        font
    }

    pub fn insert(&mut self, symbol: impl Into<String>, metric: GlyphMetric) {
        self.glyphs.insert(symbol.into(), metric);
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.glyphs.contains_key(symbol)
    }

    /// Look up a symbol, failing when the font has no stamp for it
    pub fn metric(&self, symbol: &str) -> Result<&GlyphMetric> {
        self.glyphs.get(symbol).ok_or_else(|| {
            LayoutError::MissingMetric {
                symbol: symbol.to_string(),
            }
            .into()
        })
    }

    /// Metric of a single character
    pub fn char_metric(&self, symbol: char) -> Result<&GlyphMetric> {
        let mut buf = [0u8; 4];
        self.metric(symbol.encode_utf8(&mut buf))
    }

    /// Total advance width of a word
    pub fn word_width(&self, word: &str) -> Result<f64> {
        word.chars()
            .map(|c| self.char_metric(c).map(|m| m.width))
            .sum()
    }

    /// Upper-case `text` and drop every character the font cannot stamp
    ///
    /// Newlines survive so documents keep their line structure.
    pub fn retain_known(&self, text: &str) -> String {
        text.to_uppercase()
            .chars()
            .filter(|&c| c == '\n' || self.char_metric(c).is_ok())
            .collect()
    }
}
