//! # StampKit
//!
//! Layout, toolpath and preview generation for rubber-stamp plotter art.
//!
//! ## Architecture
//!
//! StampKit is organized as a workspace with multiple crates:
//!
//! 1. **stampkit-core** - Page, placement and glyph types, errors, noise
//! 2. **stampkit-designer** - Layout engine and preview renderer
//! 3. **stampkit-camtools** - Placement grouping and toolpath emission
//! 4. **stampkit-settings** - Run configuration and file loading
//! 5. **stampkit** - The binary that wires a run together
//!
//! A run flows Layout -> Group -> Emit, with the preview drawn from the same
//! grouped placements. Nothing touches the filesystem until [`run`] has
//! returned.

pub use stampkit_camtools as camtools;
pub use stampkit_core::data;
pub use stampkit_designer as designer;
pub use stampkit_settings::persistence as settings_io;

pub use stampkit_core::{Error, Placement, Result, StampFont};
pub use stampkit_settings::{LayoutSettings, StampConfig};

use image::RgbImage;
use rand::Rng;
use stampkit_camtools::{group, StampToolpathGenerator, ToolOrder};
use stampkit_core::{seeded_rng, ConfigError, ValueNoise};
use stampkit_designer::{
    layout, render_preview, AngleSource, ContentSource, NoiseSettings, PixmapCanvas,
};
use tracing::info;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Everything a run needs, already loaded
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub config: StampConfig,
    /// Replaces the configured font
    pub font: Option<StampFont>,
    /// Document text for document mode
    pub document: Option<String>,
    /// Replaces the configured seed
    pub seed: Option<u64>,
    pub preview: bool,
    /// Timestamp printed in the program header
    pub generated_at: String,
}

impl RunRequest {
    pub fn new(config: StampConfig) -> Self {
        Self {
            config,
            font: None,
            document: None,
            seed: None,
            preview: true,
            generated_at: "unknown date".to_string(),
        }
    }
}

/// Products of a run, ready to be written
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub gcode: String,
    pub preview: Option<RgbImage>,
    /// Installed symbols in tool order
    pub symbols: Vec<String>,
    pub placements: Vec<Placement>,
}

fn place<R: Rng + ?Sized>(
    request: &RunRequest,
    font: &StampFont,
    rng: &mut R,
) -> Result<(Vec<Placement>, ToolOrder)> {
    let config = &request.config;
    let page = config.page();
    let policy = config.policy();

    let placements = match &config.layout {
        LayoutSettings::Document { text } => {
            let text = request.document.as_ref().or(text.as_ref()).ok_or_else(|| {
                ConfigError::InvalidField {
                    field: "layout.text".to_string(),
                    reason: "document mode needs text or an input file".to_string(),
                }
            })?;
            layout(
                &page,
                &ContentSource::Document(text.clone()),
                &policy,
                font,
                rng,
            )?
        }
        LayoutSettings::RowFill(settings) => {
            layout(&page, &settings.content(), &policy, font, rng)?
        }
        LayoutSettings::Field(settings) => {
            let mut field = settings.to_layout();
            if let AngleSource::Noise(noise) = field.angles {
                if settings.randomise_noise {
                    field.angles = AngleSource::Noise(NoiseSettings {
                        step_x: noise.step_x,
                        step_y: noise.step_y,
                        ..NoiseSettings::randomised(rng)
                    });
                }
            }
            let noise = ValueNoise::new(rng);
            let placements = field.layout(&page, &noise, config.max_iterations)?;
            if config.machine.tool_order.is_empty() {
                return Ok((placements, ToolOrder::Priority(field.tool_order())));
            }
            placements
        }
        LayoutSettings::Scatter(scatter) => scatter.layout(&page, config.max_iterations, rng)?,
    };

    Ok((placements, config.tool_order()))
}

/// Lay out, group, emit and optionally render one run
pub fn run(request: &RunRequest) -> Result<RunOutput> {
    let config = &request.config;
    let font = request.font.clone().unwrap_or_else(|| config.stamp_font());
    config.validate_for(font.size)?;
    let profile = config.machine_profile(font.size)?;

    let seed = request.seed.or(config.seed);
    let mut rng = seeded_rng(seed);

    let (placements, order) = place(request, &font, &mut rng)?;
    info!(
        "Laid out {} placements in {} mode",
        placements.len(),
        config.layout.mode_name()
    );

    let groups = group(&placements, config.reink);
    let generator = StampToolpathGenerator::new(profile)
        .with_order(order.clone())
        .with_timestamp(request.generated_at.clone());
    let script = generator.generate(&groups, &mut rng);

    let symbols: Vec<String> = order
        .arrange(&groups)
        .into_iter()
        .map(|(symbol, _)| symbol.to_string())
        .collect();
    let placements = groups.flatten();

    let preview = if request.preview {
        let page = config.page();
        let mut canvas = PixmapCanvas::for_options(&page, &config.preview)?;
        render_preview(&placements, &page, &config.preview, &mut canvas);
        Some(canvas.to_rgb_image())
    } else {
        None
    };

    Ok(RunOutput {
        gcode: script.to_gcode(),
        preview,
        symbols,
        placements,
    })
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr
/// - RUST_LOG environment variable support (defaults to `info`)
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
