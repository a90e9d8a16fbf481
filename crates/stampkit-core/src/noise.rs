//! Randomness and coherent noise
//!
//! Every run owns its generators: a seeded `StdRng` for uniform draws (ink
//! jitter, word and symbol picks) and a [`ValueNoise`] lattice seeded once from
//! that generator for field layouts. Nothing here is process-global, so a run
//! with a fixed seed is reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

const LATTICE_Y_WRAP_BITS: u32 = 4;
const LATTICE_Y_WRAP: usize = 1 << LATTICE_Y_WRAP_BITS;
const LATTICE_SIZE: usize = 4095;
const DEFAULT_OCTAVES: usize = 4;
const DEFAULT_FALLOFF: f64 = 0.5;

/// Build the run's uniform generator
///
/// A fixed seed gives reproducible output; `None` seeds from entropy.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// A deterministic 2D scalar field
pub trait NoiseSource {
    /// Sample the field; the output range is bounded but not normalised
    fn noise(&self, x: f64, y: f64) -> f64;
}

impl<F> NoiseSource for F
where
    F: Fn(f64, f64) -> f64,
{
    fn noise(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

/// Multi-octave value noise over a random lattice
///
/// Each octave interpolates lattice values with a cosine ease, then doubles
/// the frequency and halves the amplitude. Output lies in `[0, 1)` but
/// rarely spans it, so callers remap through a [`NoiseRange`].
#[derive(Debug, Clone)]
pub struct ValueNoise {
    lattice: Vec<f64>,
    octaves: usize,
    falloff: f64,
}

impl ValueNoise {
    /// Seed a new lattice from the run's generator
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let lattice = (0..=LATTICE_SIZE).map(|_| rng.gen::<f64>()).collect();
        Self {
            lattice,
            octaves: DEFAULT_OCTAVES,
            falloff: DEFAULT_FALLOFF,
        }
    }

    /// Change the octave count and per-octave amplitude falloff
    pub fn with_detail(mut self, octaves: usize, falloff: f64) -> Self {
        self.octaves = octaves.max(1);
        self.falloff = falloff;
        self
    }

    fn at(&self, offset: usize) -> f64 {
        self.lattice[offset & LATTICE_SIZE]
    }
}

fn scaled_cosine(t: f64) -> f64 {
    0.5 * (1.0 - (t * std::f64::consts::PI).cos())
}

impl NoiseSource for ValueNoise {
    fn noise(&self, x: f64, y: f64) -> f64 {
        let (x, y) = (x.abs(), y.abs());
        let mut xi = x.floor() as usize;
        let mut yi = y.floor() as usize;
        let mut xf = x - x.floor();
        let mut yf = y - y.floor();

        let mut total = 0.0;
        let mut amplitude = 0.5;

        for _ in 0..self.octaves {
            let offset = xi.wrapping_add(yi << LATTICE_Y_WRAP_BITS);
            let rxf = scaled_cosine(xf);
            let ryf = scaled_cosine(yf);

            let mut n1 = self.at(offset);
            n1 += rxf * (self.at(offset.wrapping_add(1)) - n1);
            let mut n2 = self.at(offset.wrapping_add(LATTICE_Y_WRAP));
            n2 += rxf * (self.at(offset.wrapping_add(LATTICE_Y_WRAP + 1)) - n2);
            n1 += ryf * (n2 - n1);

            total += n1 * amplitude;
            amplitude *= self.falloff;

            xi <<= 1;
            xf *= 2.0;
            yi <<= 1;
            yf *= 2.0;
            if xf >= 1.0 {
                xi += 1;
                xf -= 1.0;
            }
            if yf >= 1.0 {
                yi += 1;
                yf -= 1.0;
            }
        }

        total
    }
}

/// Observed output range of a noise field over a sample grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseRange {
    pub min: f64,
    pub max: f64,
}

impl NoiseRange {
    /// Scan every cell of a `cols x rows` grid
    ///
    /// `sample` maps a cell index to the noise-space coordinate to evaluate.
    pub fn scan<N, F>(source: &N, cols: usize, rows: usize, sample: F) -> Self
    where
        N: NoiseSource + ?Sized,
        F: Fn(usize, usize) -> (f64, f64),
    {
        let mut range = Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        };
        for i in 0..cols {
            for j in 0..rows {
                let (x, y) = sample(i, j);
                let value = source.noise(x, y);
                range.min = range.min.min(value);
                range.max = range.max.max(value);
            }
        }
        debug!(
            "Noise range over {}x{} cells: {:.4}..{:.4}",
            cols, rows, range.min, range.max
        );
        range
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Map a value into `[0, 1]` relative to the range
    ///
    /// A flat or empty range maps everything to 0.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.span();
        if !span.is_finite() || span <= f64::EPSILON {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}
