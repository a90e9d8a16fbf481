//! Machine profile for the stamping plotter
//!
//! Holds everything the toolpath emitter needs to know about the machine:
//! pen heights, the ink pad, how page coordinates map onto the bed, and the
//! values echoed in the program header.

use serde::{Deserialize, Serialize};
use stampkit_core::units::format_mm;
use stampkit_core::{ConfigError, InkPadSpec, InkRange, PageSpec, Result, StampSize};

/// Z heights of the stamp head (machine units)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StampHeights {
    /// Travel height, clear of paper and pad
    pub up: f64,
    /// Press height on the paper
    pub down: f64,
    /// Press height on the ink pad
    pub ink: f64,
}

impl Default for StampHeights {
    fn default() -> Self {
        Self {
            up: 60.0,
            down: 35.0,
            ink: 49.0,
        }
    }
}

/// Values echoed as comments at the top of every program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MachineHeader {
    pub target_machine: String,
    /// Left, right, top and bottom margins
    pub margins: [f64; 4],
    pub install_height: f64,
    pub scaling: f64,
    pub x_offset: f64,
    pub y_offset: f64,
    pub rotation: f64,
    pub accel_x: f64,
    pub accel_y: f64,
}

impl Default for MachineHeader {
    fn default() -> Self {
        Self {
            target_machine: "ArtFrame 2436".to_string(),
            margins: [0.0; 4],
            install_height: 5.5,
            scaling: 1.0,
            x_offset: 0.0,
            y_offset: 0.0,
            rotation: 180.0,
            accel_x: 3000.0,
            accel_y: 3000.0,
        }
    }
}

/// Page to bed coordinate mapping
///
/// Applied in order: optional y-flip against the page height, optional axis
/// swap, then scale and offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BedTransform {
    pub flip_y: bool,
    pub swap_axes: bool,
    pub scale: f64,
    pub x_offset: f64,
    pub y_offset: f64,
}

impl Default for BedTransform {
    fn default() -> Self {
        Self::upright()
    }
}

impl BedTransform {
    /// Paper fed upright: y flips, axes stay
    pub fn upright() -> Self {
        Self {
            flip_y: true,
            swap_axes: false,
            scale: 1.0,
            x_offset: 0.0,
            y_offset: 0.0,
        }
    }

    /// Paper fed rotated: axes swap, y stays
    pub fn rotated() -> Self {
        Self {
            flip_y: false,
            swap_axes: true,
            ..Self::upright()
        }
    }

    pub fn for_rotation(rotated: bool) -> Self {
        if rotated {
            Self::rotated()
        } else {
            Self::upright()
        }
    }
}

/// A validated description of the stamping machine and its bed
#[derive(Debug, Clone, PartialEq)]
pub struct MachineProfile {
    page: PageSpec,
    heights: StampHeights,
    ink_range: InkRange,
    transform: BedTransform,
    header: MachineHeader,
    tool_index_base: usize,
}

fn invalid(field: &str, reason: impl Into<String>) -> stampkit_core::Error {
    ConfigError::InvalidField {
        field: field.to_string(),
        reason: reason.into(),
    }
    .into()
}

impl MachineProfile {
    /// Validate and build a profile
    ///
    /// Fails when the page is invalid, the travel height is below either
    /// press height, the scale is not positive, or the ink pad cannot hold
    /// the stamp.
    pub fn new(
        page: PageSpec,
        ink_pad: InkPadSpec,
        stamp: StampSize,
        heights: StampHeights,
        transform: BedTransform,
    ) -> Result<Self> {
        page.validate()?;
        if heights.up < heights.down {
            return Err(invalid(
                "stampUpHeight",
                format!("{} is below the down height {}", heights.up, heights.down),
            ));
        }
        if heights.up < heights.ink {
            return Err(invalid(
                "stampUpHeight",
                format!("{} is below the ink height {}", heights.up, heights.ink),
            ));
        }
        if transform.scale <= 0.0 {
            return Err(invalid("machine.scale", "must be > 0"));
        }
        let ink_range = ink_pad.safe_range(stamp.width / 2.0, stamp.height / 2.0)?;

        Ok(Self {
            page,
            heights,
            ink_range,
            transform,
            header: MachineHeader::default(),
            tool_index_base: 0,
        })
    }

    pub fn with_header(mut self, header: MachineHeader) -> Self {
        self.header = header;
        self
    }

    /// Number printed for the first installed tool
    pub fn with_tool_index_base(mut self, base: usize) -> Self {
        self.tool_index_base = base;
        self
    }

    pub fn page(&self) -> &PageSpec {
        &self.page
    }

    pub fn heights(&self) -> &StampHeights {
        &self.heights
    }

    pub fn ink_range(&self) -> &InkRange {
        &self.ink_range
    }

    pub fn transform(&self) -> &BedTransform {
        &self.transform
    }

    pub fn tool_index_base(&self) -> usize {
        self.tool_index_base
    }

    /// Map a page coordinate onto the machine bed
    pub fn to_bed(&self, x: f64, y: f64) -> (f64, f64) {
        let t = &self.transform;
        let y = if t.flip_y { self.page.height - y } else { y };
        let (x, y) = if t.swap_axes { (y, x) } else { (x, y) };
        (x * t.scale + t.x_offset, y * t.scale + t.y_offset)
    }

    /// Paper size as the machine sees it
    pub fn bed_paper_size(&self) -> (f64, f64) {
        if self.transform.swap_axes {
            (self.page.height, self.page.width)
        } else {
            (self.page.width, self.page.height)
        }
    }

    /// Comment bodies for the program header
    pub fn header_comments(&self, generated_at: &str) -> Vec<String> {
        let h = &self.header;
        let (paper_w, paper_h) = self.bed_paper_size();
        let margins: Vec<String> = h.margins.iter().map(|m| m.to_string()).collect();
        vec![
            format!("GCode File Generated with love on : {}", generated_at),
            format!("Target Machine: {}", h.target_machine),
            format!("Margins[LRTB]: {}", margins.join(", ")),
            format!(
                "Paper Dimensions[WxH mm]: {}, {}",
                format_mm(paper_w),
                format_mm(paper_h)
            ),
            format!("Install Height: {}", h.install_height),
            format!("Scaling {}", h.scaling),
            format!("XY Offsets: {}, {}", h.x_offset, h.y_offset),
            format!("Rotation: {}", h.rotation),
            format!("AccelX: {}", h.accel_x),
            format!("AccelY: {}", h.accel_y),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stampkit_core::Border;

    fn pad() -> InkPadSpec {
        InkPadSpec {
            left: 822.0,
            right: 902.0,
            top: 330.0,
            bottom: 280.0,
        }
    }

    fn stamp() -> StampSize {
        StampSize {
            width: 10.0,
            height: 10.0,
        }
    }

    fn profile(transform: BedTransform) -> MachineProfile {
        MachineProfile::new(
            PageSpec::new(560.0, 760.0, Border::uniform(30.0)),
            pad(),
            stamp(),
            StampHeights::default(),
            transform,
        )
        .unwrap()
    }

    #[test]
    fn test_upright_flips_y() {
        let p = profile(BedTransform::upright());
        assert_eq!(p.to_bed(10.0, 20.0), (10.0, 740.0));
        assert_eq!(p.bed_paper_size(), (560.0, 760.0));
    }

    #[test]
    fn test_rotated_swaps_axes() {
        let p = profile(BedTransform::rotated());
        assert_eq!(p.to_bed(10.0, 20.0), (20.0, 10.0));
        assert_eq!(p.bed_paper_size(), (760.0, 560.0));
    }

    #[test]
    fn test_scale_and_offset_apply_last() {
        let transform = BedTransform {
            flip_y: true,
            swap_axes: true,
            scale: 2.0,
            x_offset: 5.0,
            y_offset: -5.0,
        };
        let p = profile(transform);
        // flip: (10, 740), swap: (740, 10), scale+offset
        assert_eq!(p.to_bed(10.0, 20.0), (1485.0, 15.0));
    }

    #[test]
    fn test_invalid_heights() {
        let heights = StampHeights {
            up: 30.0,
            down: 35.0,
            ink: 20.0,
        };
        let err = MachineProfile::new(
            PageSpec::new(100.0, 100.0, Border::default()),
            pad(),
            stamp(),
            heights,
            BedTransform::default(),
        )
        .unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("stampUpHeight"));
    }

    #[test]
    fn test_header_comments() {
        let p = profile(BedTransform::rotated()).with_header(MachineHeader::default());
        let lines = p.header_comments("today");
        assert_eq!(lines[0], "GCode File Generated with love on : today");
        assert_eq!(lines[1], "Target Machine: ArtFrame 2436");
        assert_eq!(lines[2], "Margins[LRTB]: 0, 0, 0, 0");
        assert_eq!(lines[3], "Paper Dimensions[WxH mm]: 760.000, 560.000");
        assert_eq!(lines[4], "Install Height: 5.5");
        assert_eq!(lines[7], "Rotation: 180");
        assert_eq!(lines.len(), 10);
    }
}
