//! Vector field layouts
//!
//! The printable area is cut into square cells and every cell receives one
//! arrow stamp. The arrow's angle comes from a noise field or from two
//! crossed sine waves and is snapped to the nearest of `directions` physical
//! stamps, numbered from 1 clockwise starting at "up".

use rand::Rng;
use serde::{Deserialize, Serialize};
use stampkit_core::{
    ConfigError, LayoutError, LayoutOverrunError, NoiseRange, NoiseSource, PageSpec, Placement,
    Result,
};
use tracing::{debug, info};

const DEFAULT_DIRECTIONS: usize = 24;

/// Sampling of a noise field across the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoiseSettings {
    /// Noise-space distance between columns
    pub step_x: f64,
    /// Noise-space distance between rows
    pub step_y: f64,
    /// Zoom applied to both steps
    pub map_scale: f64,
    pub x_offset: f64,
    pub y_offset: f64,
    /// Added to every angle (degrees)
    pub rotation_offset: f64,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            step_x: 0.074,
            step_y: 0.117,
            map_scale: 1.0,
            x_offset: 0.0,
            y_offset: 0.0,
            rotation_offset: 0.0,
        }
    }
}

impl NoiseSettings {
    /// Random offsets, zoom and rotation so each run shows a new patch
    pub fn randomised<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            x_offset: rng.gen_range(100.0..600.0),
            y_offset: rng.gen_range(100.0..600.0),
            map_scale: rng.gen_range(1.0..2.5),
            rotation_offset: rng.gen_range(0.0..360.0),
            ..Self::default()
        }
    }

    /// Noise-space coordinate of grid cell `(i, j)`
    pub fn sample_point(&self, i: usize, j: usize) -> (f64, f64) {
        (
            i as f64 * self.step_x * self.map_scale + self.x_offset,
            j as f64 * self.step_y * self.map_scale + self.y_offset,
        )
    }
}

/// Where cell angles come from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum AngleSource {
    /// Normalised noise mapped onto a full turn
    Noise(NoiseSettings),
    /// `sin(i * frequency) * amplitude + sin(j * frequency) * amplitude`
    Waves { frequency: f64, amplitude: f64 },
}

impl Default for AngleSource {
    fn default() -> Self {
        Self::Waves {
            frequency: 0.15,
            amplitude: 180.0,
        }
    }
}

/// Cell grid re-centred on the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldGrid {
    pub cols: usize,
    pub rows: usize,
    /// Left edge of the first column
    pub left: f64,
    /// Top edge of the first row
    pub top: f64,
    pub cell: f64,
}

impl FieldGrid {
    /// Centre of cell `(i, j)`
    pub fn centre(&self, i: usize, j: usize) -> (f64, f64) {
        (
            self.left + i as f64 * self.cell + self.cell / 2.0,
            self.top + j as f64 * self.cell + self.cell / 2.0,
        )
    }
}

/// One arrow stamp per grid cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldLayout {
    pub cell_size: f64,
    #[serde(default = "default_directions")]
    pub directions: usize,
    #[serde(default)]
    pub angles: AngleSource,
}

fn default_directions() -> usize {
    DEFAULT_DIRECTIONS
}

impl FieldLayout {
    pub fn new(cell_size: f64, directions: usize, angles: AngleSource) -> Self {
        Self {
            cell_size,
            directions,
            angles,
        }
    }

    /// Fit the largest whole grid inside the borders and centre it
    pub fn grid(&self, page: &PageSpec) -> Result<FieldGrid> {
        if self.cell_size <= 0.0 {
            return Err(ConfigError::InvalidField {
                field: "layout.cellSize".to_string(),
                reason: "must be > 0".to_string(),
            }
            .into());
        }
        let cols = (page.usable_width() / self.cell_size).floor() as usize;
        let rows = (page.usable_height() / self.cell_size).floor() as usize;
        if cols == 0 || rows == 0 {
            return Err(LayoutError::EmptyGrid {
                width: page.usable_width(),
                height: page.usable_height(),
                cell: self.cell_size,
            }
            .into());
        }

        Ok(FieldGrid {
            cols,
            rows,
            left: (page.width - cols as f64 * self.cell_size) / 2.0,
            top: (page.height - rows as f64 * self.cell_size) / 2.0,
            cell: self.cell_size,
        })
    }

    /// Tool order for the emitter: direction 1 first, then clockwise
    pub fn tool_order(&self) -> Vec<String> {
        (1..=self.directions).map(|d| d.to_string()).collect()
    }

    fn angle_at<N: NoiseSource + ?Sized>(
        &self,
        i: usize,
        j: usize,
        noise: &N,
        range: Option<NoiseRange>,
    ) -> f64 {
        match self.angles {
            AngleSource::Noise(settings) => {
                let (nx, ny) = settings.sample_point(i, j);
                let normalised = range.map_or(0.0, |r| r.normalize(noise.noise(nx, ny)));
                normalised * 360.0 + settings.rotation_offset
            }
            AngleSource::Waves {
                frequency,
                amplitude,
            } => (i as f64 * frequency).sin() * amplitude + (j as f64 * frequency).sin() * amplitude,
        }
    }

    /// Place one arrow per cell, column by column
    pub fn layout<N: NoiseSource + ?Sized>(
        &self,
        page: &PageSpec,
        noise: &N,
        max_iterations: usize,
    ) -> Result<Vec<Placement>> {
        page.validate()?;
        if self.directions == 0 {
            return Err(ConfigError::InvalidField {
                field: "layout.directions".to_string(),
                reason: "must be at least 1".to_string(),
            }
            .into());
        }

        let grid = self.grid(page)?;
        let cells = grid
            .cols
            .checked_mul(grid.rows)
            .filter(|&cells| cells <= max_iterations)
            .ok_or_else(|| LayoutOverrunError::new("field", max_iterations))?;
        debug!(
            "Field grid {} x {} cells of {:.2} mm at ({:.2}, {:.2})",
            grid.cols, grid.rows, grid.cell, grid.left, grid.top
        );

        let range = match &self.angles {
            AngleSource::Noise(settings) => Some(NoiseRange::scan(
                noise,
                grid.cols,
                grid.rows,
                |i, j| settings.sample_point(i, j),
            )),
            AngleSource::Waves { .. } => None,
        };

        let mut placements = Vec::with_capacity(cells);
        for i in 0..grid.cols {
            for j in 0..grid.rows {
                let angle = self.angle_at(i, j, noise, range);
                let (direction, snapped) = quantise_angle(angle, self.directions);
                let (x, y) = grid.centre(i, j);
                placements.push(
                    Placement::new((direction + 1).to_string(), x, y).with_rotation(snapped),
                );
            }
        }

        info!(
            "Field layout placed {} arrows over {} directions",
            placements.len(),
            self.directions
        );
        Ok(placements)
    }
}

/// Snap an angle to one of `directions` equal sectors
///
/// Returns the 0-based sector index and the sector's centre angle. Sector 0
/// straddles 0/360 degrees.
pub fn quantise_angle(angle: f64, directions: usize) -> (usize, f64) {
    let directions = directions.max(1);
    let sector = 360.0 / directions as f64;
    let half = sector / 2.0;
    let angle = angle.rem_euclid(360.0);

    let index = if angle >= 360.0 - half || angle < half {
        0
    } else {
        ((angle + half) / sector).floor() as usize % directions
    };
    (index, index as f64 * sector)
}
