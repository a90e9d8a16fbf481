//! Run configuration for StampKit
//!
//! One file describes a whole run: the page and its border, alignment, the
//! machine (pen heights, ink pad, bed transform and header values), the
//! preview, an optional embedded stamp font, and a `layout` section tagged by
//! `mode`.
//!
//! ```json
//! {
//!   "width": 210, "height": 297,
//!   "border": { "left": 20, "right": 20, "top": 20, "bottom": 20 },
//!   "hAlign": "center",
//!   "inkPosition": { "left": 822, "right": 902, "top": 330, "bottom": 280 },
//!   "setStampUpHeight": 60,
//!   "layout": { "mode": "rowFill", "words": ["LOVE", "YOU"] }
//! }
//! ```

use crate::persistence::{read_structured, write_structured};
use serde::{Deserialize, Serialize};
use stampkit_camtools::{
    BedTransform, MachineHeader, MachineProfile, StampHeights, ToolOrder,
};
use stampkit_core::{
    Border, ConfigError, HAlign, InkPadSpec, PageSpec, ReinkPolicy, Result, StampFont, StampSize,
    VAlign,
};
use stampkit_designer::{
    AngleSource, ContentSource, FieldLayout, LayoutPolicy, PreviewOptions, ScatterLayout,
    DEFAULT_MAX_ITERATIONS,
};
use std::path::Path;
use tracing::info;

fn default_line_height() -> f64 {
    1.0
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_up() -> f64 {
    StampHeights::default().up
}

fn default_down() -> f64 {
    StampHeights::default().down
}

fn default_ink() -> f64 {
    StampHeights::default().ink
}

fn default_directions() -> usize {
    24
}

fn default_scale() -> f64 {
    1.0
}

fn invalid(field: &str, reason: impl Into<String>) -> stampkit_core::Error {
    ConfigError::InvalidField {
        field: field.to_string(),
        reason: reason.into(),
    }
    .into()
}

/// Vocabulary row fill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowFillSettings {
    pub words: Vec<String>,
    /// Butt the entries together with no separator
    #[serde(default)]
    pub glyphs: bool,
}

impl RowFillSettings {
    pub fn content(&self) -> ContentSource {
        if self.glyphs {
            ContentSource::Glyphs(self.words.clone())
        } else {
            ContentSource::Vocabulary(self.words.clone())
        }
    }
}

/// Arrow field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSettings {
    pub cell_size: f64,
    #[serde(default = "default_directions")]
    pub directions: usize,
    #[serde(default)]
    pub angles: AngleSource,
    /// Draw fresh noise offsets, zoom and rotation on every run
    #[serde(default)]
    pub randomise_noise: bool,
}

impl FieldSettings {
    pub fn to_layout(&self) -> FieldLayout {
        FieldLayout::new(self.cell_size, self.directions, self.angles)
    }
}

/// Layout family and its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum LayoutSettings {
    /// Letterpress a text document; the text comes from the input file when
    /// absent here
    Document {
        #[serde(default)]
        text: Option<String>,
    },
    RowFill(RowFillSettings),
    Field(FieldSettings),
    Scatter(ScatterLayout),
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self::Document { text: None }
    }
}

impl LayoutSettings {
    pub fn mode_name(&self) -> &'static str {
        match self {
            Self::Document { .. } => "document",
            Self::RowFill(_) => "rowFill",
            Self::Field(_) => "field",
            Self::Scatter(_) => "scatter",
        }
    }
}

/// Machine values beyond heights and the ink pad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineSettings {
    #[serde(default)]
    pub header: MachineHeader,
    /// Page to bed scale
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub x_offset: f64,
    #[serde(default)]
    pub y_offset: f64,
    /// Number printed for the first installed tool
    #[serde(default)]
    pub tool_index_base: usize,
    /// Symbols installed first, in this order
    #[serde(default)]
    pub tool_order: Vec<String>,
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            header: MachineHeader::default(),
            scale: 1.0,
            x_offset: 0.0,
            y_offset: 0.0,
            tool_index_base: 0,
            tool_order: Vec::new(),
        }
    }
}

/// Complete description of a stamping run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StampConfig {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub border: Border,
    #[serde(default)]
    pub h_align: HAlign,
    #[serde(default)]
    pub v_align: VAlign,
    #[serde(default = "default_line_height")]
    pub line_height: f64,
    /// Paper fed rotated: axes swap instead of the y-flip
    #[serde(default)]
    pub rotated: bool,
    pub ink_position: InkPadSpec,
    #[serde(default = "default_up", alias = "setStampUpHeight")]
    pub stamp_up_height: f64,
    #[serde(default = "default_down", alias = "setStampDownHeight")]
    pub stamp_down_height: f64,
    #[serde(default = "default_ink")]
    pub stamp_ink_height: f64,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub reink: ReinkPolicy,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default)]
    pub machine: MachineSettings,
    #[serde(default)]
    pub preview: PreviewOptions,
    /// Embedded stamp font, the 10 mm uppercase set when absent
    #[serde(default)]
    pub font: Option<StampFont>,
    #[serde(default)]
    pub layout: LayoutSettings,
}

impl StampConfig {
    /// Minimal configuration for a page and ink pad
    pub fn new(width: f64, height: f64, ink_position: InkPadSpec) -> Self {
        Self {
            width,
            height,
            border: Border::default(),
            h_align: HAlign::default(),
            v_align: VAlign::default(),
            line_height: default_line_height(),
            rotated: false,
            ink_position,
            stamp_up_height: default_up(),
            stamp_down_height: default_down(),
            stamp_ink_height: default_ink(),
            seed: None,
            reink: ReinkPolicy::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            machine: MachineSettings::default(),
            preview: PreviewOptions::default(),
            font: None,
            layout: LayoutSettings::default(),
        }
    }

    /// Load configuration from a JSON or TOML file and validate it
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let config: Self = read_structured(path)?;
        config.validate()?;
        info!(
            "Loaded {} configuration from {}",
            config.layout.mode_name(),
            path.display()
        );
        Ok(config)
    }

    /// Save configuration to a JSON or TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;
        write_structured(self, path)
    }

    /// Validate configuration
    ///
    /// The ink pad is only checked for being a non-empty region here; the
    /// stamp body is known once the run's font is, see [`Self::validate_for`].
    pub fn validate(&self) -> Result<()> {
        self.validate_for(StampSize {
            width: 0.0,
            height: 0.0,
        })
    }

    /// Validate configuration for the stamp body a run will press
    pub fn validate_for(&self, stamp: StampSize) -> Result<()> {
        self.page().validate()?;

        if self.line_height <= 0.0 {
            return Err(invalid("lineHeight", "must be > 0"));
        }
        if self.max_iterations == 0 {
            return Err(invalid("maxIterations", "must be > 0"));
        }
        if self.preview.dpi <= 0.0 {
            return Err(invalid("preview.dpi", "must be > 0"));
        }
        if self.preview.stamp_size <= 0.0 {
            return Err(invalid("preview.stampSize", "must be > 0"));
        }

        match &self.layout {
            LayoutSettings::RowFill(settings) if settings.words.is_empty() => {
                return Err(invalid("layout.words", "must list at least one word"));
            }
            LayoutSettings::Field(settings) => {
                if settings.cell_size <= 0.0 {
                    return Err(invalid("layout.cellSize", "must be > 0"));
                }
                if settings.directions == 0 {
                    return Err(invalid("layout.directions", "must be > 0"));
                }
            }
            LayoutSettings::Scatter(scatter) => scatter.check()?,
            _ => {}
        }

        self.machine_profile(stamp)?;
        Ok(())
    }

    pub fn page(&self) -> PageSpec {
        PageSpec::new(self.width, self.height, self.border)
    }

    pub fn policy(&self) -> LayoutPolicy {
        LayoutPolicy {
            h_align: self.h_align,
            v_align: self.v_align,
            line_height: self.line_height,
            max_iterations: self.max_iterations,
        }
    }

    pub fn heights(&self) -> StampHeights {
        StampHeights {
            up: self.stamp_up_height,
            down: self.stamp_down_height,
            ink: self.stamp_ink_height,
        }
    }

    /// The embedded font or the built-in 10 mm set
    pub fn stamp_font(&self) -> StampFont {
        self.font.clone().unwrap_or_else(StampFont::ten_mm)
    }

    pub fn bed_transform(&self) -> BedTransform {
        BedTransform {
            scale: self.machine.scale,
            x_offset: self.machine.x_offset,
            y_offset: self.machine.y_offset,
            ..BedTransform::for_rotation(self.rotated)
        }
    }

    /// Build the machine profile for a stamp body size
    pub fn machine_profile(&self, stamp: StampSize) -> Result<MachineProfile> {
        Ok(MachineProfile::new(
            self.page(),
            self.ink_position,
            stamp,
            self.heights(),
            self.bed_transform(),
        )?
        .with_header(self.machine.header.clone())
        .with_tool_index_base(self.machine.tool_index_base))
    }

    pub fn tool_order(&self) -> ToolOrder {
        if self.machine.tool_order.is_empty() {
            ToolOrder::FirstSeen
        } else {
            ToolOrder::Priority(self.machine.tool_order.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pad() -> InkPadSpec {
        InkPadSpec {
            left: 822.0,
            right: 902.0,
            top: 330.0,
            bottom: 280.0,
        }
    }

    #[test]
    fn test_defaults_from_minimal_json() {
        let json = r#"{
            "width": 210, "height": 297,
            "inkPosition": { "left": 822, "right": 902, "top": 330, "bottom": 280 }
        }"#;
        let config: StampConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.h_align, HAlign::Left);
        assert_eq!(config.v_align, VAlign::Top);
        assert_eq!(config.line_height, 1.0);
        assert_eq!(config.heights(), StampHeights::default());
        assert_eq!(config.reink, ReinkPolicy::Always);
        assert_eq!(config.layout, LayoutSettings::Document { text: None });
        assert_eq!(config.tool_order(), ToolOrder::FirstSeen);
        config.validate().unwrap();
    }

    #[test]
    fn test_height_aliases() {
        let json = r#"{
            "width": 560, "height": 760,
            "inkPosition": { "left": 822, "right": 902, "top": 330, "bottom": 280 },
            "setStampUpHeight": 58,
            "setStampDownHeight": 31.5,
            "stampInkHeight": 45
        }"#;
        let config: StampConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.stamp_up_height, 58.0);
        assert_eq!(config.stamp_down_height, 31.5);
        assert_eq!(config.stamp_ink_height, 45.0);
    }

    #[test]
    fn test_layout_modes() {
        let layout: LayoutSettings =
            serde_json::from_str(r#"{ "mode": "rowFill", "words": ["AB"], "glyphs": true }"#)
                .unwrap();
        assert_eq!(
            layout,
            LayoutSettings::RowFill(RowFillSettings {
                words: vec!["AB".to_string()],
                glyphs: true,
            })
        );

        let layout: LayoutSettings =
            serde_json::from_str(r#"{ "mode": "field", "cellSize": 10 }"#).unwrap();
        match layout {
            LayoutSettings::Field(field) => {
                assert_eq!(field.directions, 24);
                assert!(!field.randomise_noise);
            }
            other => panic!("unexpected layout {other:?}"),
        }

        let layout: LayoutSettings = serde_json::from_str(
            r#"{ "mode": "scatter", "stampSize": 10, "symbols": ["L", "O"] }"#,
        )
        .unwrap();
        assert_eq!(layout.mode_name(), "scatter");
    }

    #[test]
    fn test_rotated_transform_carries_scale() {
        let mut config = StampConfig::new(560.0, 760.0, pad());
        config.rotated = true;
        config.machine.scale = 2.0;
        config.machine.x_offset = 3.0;
        let transform = config.bed_transform();
        assert!(transform.swap_axes);
        assert!(!transform.flip_y);
        assert_eq!(transform.scale, 2.0);
        assert_eq!(transform.x_offset, 3.0);
    }

    #[test]
    fn test_validation_errors() {
        let mut config = StampConfig::new(210.0, 297.0, pad());
        config.border = Border::uniform(120.0);
        assert!(config.validate().unwrap_err().is_config_error());

        let mut config = StampConfig::new(210.0, 297.0, pad());
        config.stamp_up_height = 10.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("stampUpHeight"));

        let mut config = StampConfig::new(210.0, 297.0, pad());
        config.layout = LayoutSettings::RowFill(RowFillSettings {
            words: Vec::new(),
            glyphs: false,
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("layout.words"));

        let mut config = StampConfig::new(210.0, 297.0, pad());
        config.ink_position = InkPadSpec {
            left: 0.0,
            right: 5.0,
            top: 5.0,
            bottom: 0.0,
        };
        config.validate().unwrap();
        let err = config.validate_for(config.stamp_font().size).unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("too small"));
        config
            .validate_for(StampSize {
                width: 4.0,
                height: 4.0,
            })
            .unwrap();

        config.ink_position = InkPadSpec {
            left: 5.0,
            right: 0.0,
            top: 5.0,
            bottom: 0.0,
        };
        assert!(config.validate().unwrap_err().is_config_error());
    }
}
