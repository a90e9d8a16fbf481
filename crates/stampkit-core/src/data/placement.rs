//! Stamp placements and the policies that shape them

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One press of one stamp on the page
///
/// `x`/`y` is the centre of the glyph footprint in page space (mm, origin
/// top-left, y down) after every alignment and nudge has been applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Glyph name, also the physical tool name
    pub symbol: String,
    pub x: f64,
    pub y: f64,
    /// Clockwise rotation in degrees (preview only)
    #[serde(default)]
    pub rotation: f64,
    /// Return to the ink pad before this press
    pub reink: bool,
    /// Press a second time on the ink pad after this press
    #[serde(default)]
    pub double_tap: bool,
    /// `reink` was fixed by the layout and must survive re-ink assignment
    #[serde(default)]
    pub pinned: bool,
}

impl Placement {
    /// A plain placement that re-inks and is not pinned
    pub fn new(symbol: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            symbol: symbol.into(),
            x,
            y,
            rotation: 0.0,
            reink: true,
            double_tap: false,
            pinned: false,
        }
    }

    /// Set the rotation in degrees
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Fix the re-ink flag so later passes leave it alone
    pub fn pin_reink(&mut self, reink: bool) {
        self.reink = reink;
        self.pinned = true;
    }
}

/// Horizontal alignment of a packed row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    Left,
    Right,
    Center,
    Justified,
}

impl Default for HAlign {
    fn default() -> Self {
        Self::Left
    }
}

impl fmt::Display for HAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
            Self::Center => write!(f, "center"),
            Self::Justified => write!(f, "justified"),
        }
    }
}

impl FromStr for HAlign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "center" | "centre" => Ok(Self::Center),
            "justified" | "justify" => Ok(Self::Justified),
            _ => Err(format!("Unknown horizontal alignment: {}", s)),
        }
    }
}

/// Vertical distribution of rows on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    Top,
    Bottom,
    Middle,
    Fill,
}

impl Default for VAlign {
    fn default() -> Self {
        Self::Top
    }
}

impl fmt::Display for VAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => write!(f, "top"),
            Self::Bottom => write!(f, "bottom"),
            Self::Middle => write!(f, "middle"),
            Self::Fill => write!(f, "fill"),
        }
    }
}

impl FromStr for VAlign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "middle" => Ok(Self::Middle),
            "fill" => Ok(Self::Fill),
            _ => Err(format!("Unknown vertical alignment: {}", s)),
        }
    }
}

/// How often a stamp goes back to the ink pad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReinkPolicy {
    /// Re-ink before every press
    Always,
    /// Re-ink on every other occurrence of a symbol, starting with the first
    Alternate,
    /// Never re-ink (pinned placements excepted)
    Never,
}

impl Default for ReinkPolicy {
    fn default() -> Self {
        Self::Always
    }
}

impl fmt::Display for ReinkPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => write!(f, "always"),
            Self::Alternate => write!(f, "alternate"),
            Self::Never => write!(f, "never"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_parsing() {
        assert_eq!("Justified".parse::<HAlign>().unwrap(), HAlign::Justified);
        assert_eq!("centre".parse::<HAlign>().unwrap(), HAlign::Center);
        assert!("diagonal".parse::<HAlign>().is_err());
        assert_eq!("FILL".parse::<VAlign>().unwrap(), VAlign::Fill);
        assert_eq!(VAlign::Middle.to_string(), "middle");
    }

    #[test]
    fn test_alignment_serde() {
        let align: HAlign = serde_json::from_str("\"center\"").unwrap();
        assert_eq!(align, HAlign::Center);
        let policy: ReinkPolicy = serde_json::from_str("\"alternate\"").unwrap();
        assert_eq!(policy, ReinkPolicy::Alternate);
    }

    #[test]
    fn test_pin_reink() {
        let mut placement = Placement::new("A", 1.0, 2.0).with_rotation(90.0);
        assert!(placement.reink);
        assert!(!placement.pinned);
        placement.pin_reink(false);
        assert!(!placement.reink);
        assert!(placement.pinned);
        assert_eq!(placement.rotation, 90.0);
    }
}
