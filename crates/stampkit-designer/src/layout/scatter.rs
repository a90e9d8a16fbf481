//! Wave-stepped scatter rows
//!
//! A cursor walks each row left to right with a step that breathes between
//! one and two times the base step, driven by two slow sine waves. Overshoot
//! at the right edge carries into the start of the next row, so columns never
//! line up. After the walk, the tail of the page can be trimmed, overridden
//! with flourish symbols, and one row can carry a keyword.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use stampkit_core::{
    ConfigError, Error, LayoutError, LayoutOverrunError, PageSpec, Placement, Result,
};
use tracing::{debug, info};

const WAVE_ONE_RATE: f64 = 0.1;
const WAVE_TWO_RATE: f64 = 0.03;

/// Override the last `count` placements of the page with `symbol`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flourish {
    pub symbol: String,
    pub count: usize,
}

/// A word forced into one row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    pub word: String,
    /// Placements left untouched after the keyword
    #[serde(default = "default_padding")]
    pub padding: usize,
    /// Target row as a fraction of the row count
    #[serde(default = "default_page_fraction")]
    pub page_fraction: f64,
}

fn default_padding() -> usize {
    4
}

fn default_page_fraction() -> f64 {
    1.0 / 3.0
}

/// Scatter layout parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterLayout {
    /// Side of the square stamp (mm)
    pub stamp_size: f64,
    /// Base cursor step; `stamp_size * 0.4` when absent
    #[serde(default)]
    pub step: Option<f64>,
    /// Row pitch; `stamp_size * 0.9` when absent
    #[serde(default)]
    pub line_height: Option<f64>,
    /// Symbols drawn uniformly for every placement
    pub symbols: Vec<String>,
    /// Fraction of the last row to drop
    #[serde(default)]
    pub tail_trim: Option<f64>,
    #[serde(default)]
    pub flourishes: Vec<Flourish>,
    #[serde(default)]
    pub keyword: Option<Keyword>,
}

/// Step multiplier from two phase-shifted sine waves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveStepper {
    phase_one: f64,
    phase_two: f64,
    counter: u64,
}

impl WaveStepper {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            phase_one: rng.gen_range(1000.0..2000.0),
            phase_two: rng.gen_range(1000.0..2000.0),
            counter: rng.gen_range(1000..2000),
        }
    }

    /// Next multiplier in `[1, 2]`
    pub fn next_factor(&mut self) -> f64 {
        let c = self.counter as f64;
        let one = (((c + self.phase_one) * WAVE_ONE_RATE).sin() + 1.0) / 4.0;
        let two = (((c + self.phase_two) * WAVE_TWO_RATE).sin() + 1.0) / 4.0;
        self.counter += 1;
        1.0 + one + two
    }
}

impl ScatterLayout {
    pub fn new(stamp_size: f64, symbols: Vec<String>) -> Self {
        Self {
            stamp_size,
            step: None,
            line_height: None,
            symbols,
            tail_trim: None,
            flourishes: Vec::new(),
            keyword: None,
        }
    }

    pub fn step(&self) -> f64 {
        self.step.unwrap_or(self.stamp_size * 0.4)
    }

    pub fn line_height(&self) -> f64 {
        self.line_height.unwrap_or(self.stamp_size * 0.9)
    }

    /// Reject non-positive sizes and an out-of-range tail trim
    pub fn check(&self) -> Result<()> {
        let positive = [
            ("layout.stampSize", self.stamp_size),
            ("layout.step", self.step()),
            ("layout.lineHeight", self.line_height()),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::InvalidField {
                    field: field.to_string(),
                    reason: "must be > 0".to_string(),
                }
                .into());
            }
        }
        if let Some(fraction) = self.tail_trim {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(ConfigError::InvalidField {
                    field: "layout.tailTrim".to_string(),
                    reason: "must be between 0 and 1".to_string(),
                }
                .into());
            }
        }
        if self.symbols.is_empty() {
            return Err(LayoutError::EmptyContent {
                reason: "scatter has no symbols".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Walk the page and return the placements row by row
    pub fn rows<R: Rng + ?Sized>(
        &self,
        page: &PageSpec,
        max_iterations: usize,
        rng: &mut R,
    ) -> Result<Vec<Vec<Placement>>> {
        page.validate()?;
        self.check()?;

        let half = self.stamp_size / 2.0;
        let start_x = page.border.left + half;
        let right_edge = page.width - (page.border.right + half);
        let bottom_edge = page.height - (page.border.bottom + half);
        let mut y = page.border.top + half;
        if start_x >= right_edge || y >= bottom_edge {
            return Err(LayoutError::EmptyGrid {
                width: page.usable_width(),
                height: page.usable_height(),
                cell: self.stamp_size,
            }
            .into());
        }

        let step = self.step();
        let mut stepper = WaveStepper::new(rng);
        let mut x = start_x;
        let mut rows = Vec::new();
        let mut iterations = 0;

        while y < bottom_edge {
            let mut row = Vec::new();
            while x < right_edge {
                iterations += 1;
                if iterations > max_iterations {
                    return Err(LayoutOverrunError::new("scatter", max_iterations).into());
                }
                let symbol = self
                    .symbols
                    .choose(rng)
                    .ok_or_else(|| Error::other("scatter has no symbols"))?;
                row.push(Placement::new(symbol.clone(), x, y));
                x += step * stepper.next_factor();
            }
            y += self.line_height();
            x = start_x + (x - right_edge);
            rows.push(row);
        }
        debug!("Scatter walked {} rows in {} steps", rows.len(), iterations);

        if let Some(fraction) = self.tail_trim {
            trim_tail(&mut rows, fraction);
        }
        for flourish in &self.flourishes {
            set_last_symbols(&mut rows, &flourish.symbol, flourish.count);
        }
        if let Some(keyword) = &self.keyword {
            insert_keyword(&mut rows, keyword)?;
        }

        Ok(rows)
    }

    /// Walk the page and return the placements in row order
    pub fn layout<R: Rng + ?Sized>(
        &self,
        page: &PageSpec,
        max_iterations: usize,
        rng: &mut R,
    ) -> Result<Vec<Placement>> {
        let placements: Vec<Placement> = self
            .rows(page, max_iterations, rng)?
            .into_iter()
            .flatten()
            .collect();
        info!("Scatter layout placed {} stamps", placements.len());
        Ok(placements)
    }
}

/// Drop `floor(len * fraction)` placements from the end of the last row
pub fn trim_tail(rows: &mut [Vec<Placement>], fraction: f64) {
    if let Some(last) = rows.last_mut() {
        let drop = (last.len() as f64 * fraction).floor() as usize;
        let keep = last.len().saturating_sub(drop);
        last.truncate(keep);
    }
}

/// Override the last `count` placements, walking backwards across rows
pub fn set_last_symbols(rows: &mut [Vec<Placement>], symbol: &str, count: usize) {
    let mut remaining = count;
    for row in rows.iter_mut().rev() {
        for placement in row.iter_mut().rev() {
            if remaining == 0 {
                return;
            }
            placement.symbol = symbol.to_string();
            remaining -= 1;
        }
    }
}

/// Write a keyword into its target row
///
/// The keyword ends `padding` placements before the row's right end. Its
/// placements always re-ink and double tap; the placements either side of it
/// never re-ink.
pub fn insert_keyword(rows: &mut [Vec<Placement>], keyword: &Keyword) -> Result<()> {
    let letters: Vec<String> = keyword.word.chars().map(|c| c.to_string()).collect();
    if letters.is_empty() || rows.is_empty() {
        return Ok(());
    }

    let index = ((rows.len() as f64 * keyword.page_fraction).floor() as usize).min(rows.len() - 1);
    let row = &mut rows[index];
    let needed = letters.len() + keyword.padding;
    if row.len() < needed {
        return Err(LayoutError::KeywordDoesNotFit {
            keyword: keyword.word.clone(),
            row: index,
            needed,
            available: row.len(),
        }
        .into());
    }

    let start = row.len() - needed;
    for (offset, letter) in letters.iter().enumerate() {
        let placement = &mut row[start + offset];
        placement.symbol = letter.clone();
        placement.pin_reink(true);
        placement.double_tap = true;
    }
    if start > 0 {
        row[start - 1].pin_reink(false);
    }
    if let Some(after) = row.get_mut(start + letters.len()) {
        after.pin_reink(false);
    }

    debug!("Keyword '{}' written into row {} at {}", keyword.word, index, start);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use stampkit_core::Border;

    fn page() -> PageSpec {
        PageSpec::new(200.0, 150.0, Border::uniform(15.0))
    }

    fn row_of(symbol: &str, n: usize) -> Vec<Placement> {
        (0..n)
            .map(|i| Placement::new(symbol, i as f64, 0.0))
            .collect()
    }

    #[test]
    fn test_step_factor_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut stepper = WaveStepper::new(&mut rng);
        for _ in 0..1000 {
            let f = stepper.next_factor();
            assert!((1.0..=2.0).contains(&f));
        }
    }

    #[test]
    fn test_rows_stay_inside_edges() {
        let mut rng = StdRng::seed_from_u64(4);
        let layout = ScatterLayout::new(20.0, vec!["A".to_string(), "B".to_string()]);
        let rows = layout.rows(&page(), 100_000, &mut rng).unwrap();
        assert_eq!(rows.len(), 6);
        for row in &rows {
            assert!(!row.is_empty());
            for p in row {
                assert!(p.x >= 25.0 && p.x < 175.0);
                assert!(p.symbol == "A" || p.symbol == "B");
            }
        }
        assert!(rows[1][0].x >= 25.0);
        assert!(rows[1][0].y > rows[0][0].y);
    }

    #[test]
    fn test_trim_tail() {
        let mut rows = vec![row_of("A", 5), row_of("A", 9)];
        trim_tail(&mut rows, 0.25);
        assert_eq!(rows[1].len(), 7);
        assert_eq!(rows[0].len(), 5);
    }

    #[test]
    fn test_flourishes_cross_rows() {
        let mut rows = vec![row_of("A", 5), row_of("A", 3)];
        set_last_symbols(&mut rows, "G", 6);
        set_last_symbols(&mut rows, "H", 2);
        let symbols: Vec<&str> = rows.iter().flatten().map(|p| p.symbol.as_str()).collect();
        assert_eq!(symbols, ["A", "A", "G", "G", "G", "G", "H", "H"]);
    }

    #[test]
    fn test_keyword_pins_neighbours() {
        let mut rows = vec![row_of("A", 12), row_of("A", 12), row_of("A", 12)];
        let keyword = Keyword {
            word: "LOVE".to_string(),
            padding: 4,
            page_fraction: 1.0 / 3.0,
        };
        insert_keyword(&mut rows, &keyword).unwrap();
        let row = &rows[1];
        let word: String = row[4..8].iter().map(|p| p.symbol.as_str()).collect();
        assert_eq!(word, "LOVE");
        assert!(row[4..8].iter().all(|p| p.reink && p.double_tap && p.pinned));
        assert!(!row[3].reink && row[3].pinned);
        assert!(!row[8].reink && row[8].pinned);
        assert!(!row[9].pinned);
        assert!(rows[0].iter().all(|p| !p.pinned));
    }

    #[test]
    fn test_keyword_does_not_fit() {
        let mut rows = vec![row_of("A", 5), row_of("A", 5)];
        let keyword = Keyword {
            word: "LOVE".to_string(),
            padding: 4,
            page_fraction: 0.5,
        };
        let err = insert_keyword(&mut rows, &keyword).unwrap_err();
        match err {
            Error::Layout(LayoutError::KeywordDoesNotFit { row, needed, available, .. }) => {
                assert_eq!((row, needed, available), (1, 8, 5));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_keyword_without_padding_has_no_right_neighbour() {
        let mut rows = vec![row_of("A", 4)];
        let keyword = Keyword {
            word: "AB".to_string(),
            padding: 0,
            page_fraction: 0.0,
        };
        insert_keyword(&mut rows, &keyword).unwrap();
        assert!(!rows[0][1].reink);
        assert_eq!(rows[0][3].symbol, "B");
    }
}
