//! Page and ink pad geometry
//!
//! Pages are authored in millimetres with the origin at the top-left corner
//! and y increasing downward. Ink pads live on the machine bed, where y
//! increases upward, so a pad's `top` is numerically larger than its `bottom`.

use crate::error::{ConfigError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Border insets around the printable area (mm)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Border {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Border {
    /// Same inset on all four sides
    pub fn uniform(inset: f64) -> Self {
        Self {
            left: inset,
            right: inset,
            top: inset,
            bottom: inset,
        }
    }
}

/// Paper size and printable area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    /// Paper width (mm)
    pub width: f64,
    /// Paper height (mm)
    pub height: f64,
    /// Border insets (mm)
    #[serde(default)]
    pub border: Border,
}

impl PageSpec {
    pub fn new(width: f64, height: f64, border: Border) -> Self {
        Self {
            width,
            height,
            border,
        }
    }

    /// Width between the left and right borders
    pub fn usable_width(&self) -> f64 {
        self.width - self.border.left - self.border.right
    }

    /// Height between the top and bottom borders
    pub fn usable_height(&self) -> f64 {
        self.height - self.border.top - self.border.bottom
    }

    /// X coordinate of the right border
    pub fn right_edge(&self) -> f64 {
        self.width - self.border.right
    }

    /// Y coordinate of the bottom border
    pub fn bottom_edge(&self) -> f64 {
        self.height - self.border.bottom
    }

    /// Check the page dimensions and border insets
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0.0 {
            return Err(invalid("width", "must be > 0"));
        }
        if self.height <= 0.0 {
            return Err(invalid("height", "must be > 0"));
        }

        let insets = [
            ("border.left", self.border.left, self.width),
            ("border.right", self.border.right, self.width),
            ("border.top", self.border.top, self.height),
            ("border.bottom", self.border.bottom, self.height),
        ];
        for (field, inset, dimension) in insets {
            if inset < 0.0 {
                return Err(invalid(field, "must not be negative"));
            }
            if inset >= dimension / 2.0 {
                return Err(invalid(
                    field,
                    &format!("{} mm is not less than half of {} mm", inset, dimension),
                ));
            }
        }

        Ok(())
    }
}

/// Ink pad rectangle on the machine bed (mm, y up)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InkPadSpec {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl InkPadSpec {
    /// Shrink the pad so a stamp centred anywhere in the range stays on it
    pub fn safe_range(&self, half_width: f64, half_height: f64) -> Result<InkRange> {
        let range = InkRange {
            left: self.left + half_width,
            right: self.right - half_width,
            bottom: self.bottom + half_height,
            top: self.top - half_height,
        };

        if range.left > range.right || range.bottom > range.top {
            return Err(ConfigError::InkPadTooSmall {
                pad_width: self.right - self.left,
                pad_height: self.top - self.bottom,
                stamp_width: half_width * 2.0,
                stamp_height: half_height * 2.0,
            }
            .into());
        }

        Ok(range)
    }
}

/// The region of the ink pad a stamp centre may visit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InkRange {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl InkRange {
    /// Pick a uniformly random re-ink point
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> (f64, f64) {
        let x = self.left + rng.gen::<f64>() * (self.right - self.left);
        let y = self.bottom + rng.gen::<f64>() * (self.top - self.bottom);
        (x, y)
    }

    /// Whether a point lies inside the range (edges included)
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.bottom && y <= self.top
    }
}

fn invalid(field: &str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidField {
        field: field.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn a4() -> PageSpec {
        PageSpec::new(210.0, 297.0, Border::uniform(20.0))
    }

    #[test]
    fn test_usable_area() {
        let page = a4();
        assert_eq!(page.usable_width(), 170.0);
        assert_eq!(page.usable_height(), 257.0);
        assert_eq!(page.right_edge(), 190.0);
        assert_eq!(page.bottom_edge(), 277.0);
    }

    #[test]
    fn test_validate_rejects_wide_border() {
        assert!(a4().validate().is_ok());

        let page = PageSpec::new(100.0, 100.0, Border::uniform(50.0));
        let err = page.validate().unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("border.left"));

        let page = PageSpec::new(0.0, 100.0, Border::default());
        assert!(page.validate().is_err());
    }

    #[test]
    fn test_ink_range_shrinks_pad() {
        let pad = InkPadSpec {
            left: 290.0,
            right: 370.0,
            top: 164.0,
            bottom: 114.0,
        };
        let range = pad.safe_range(5.0, 5.0).unwrap();
        assert_eq!(range.left, 295.0);
        assert_eq!(range.right, 365.0);
        assert_eq!(range.top, 159.0);
        assert_eq!(range.bottom, 119.0);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let (x, y) = range.sample(&mut rng);
            assert!(range.contains(x, y));
        }
    }

    #[test]
    fn test_ink_pad_too_small() {
        let pad = InkPadSpec {
            left: 0.0,
            right: 8.0,
            top: 8.0,
            bottom: 0.0,
        };
        let err = pad.safe_range(5.0, 5.0).unwrap_err();
        assert!(err.is_config_error());
    }
}
