use anyhow::{Context, Result};
use clap::Parser;
use stampkit::settings_io::{check_inputs, load_font, read_text};
use stampkit::{init_logging, run, RunRequest, StampConfig, VERSION};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Generate a stamping program and preview from a run configuration
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Run configuration (.json or .toml)
    #[arg(long, short)]
    config: PathBuf,
    /// Stamp font file, replacing the configured font
    #[arg(long, short)]
    font: Option<PathBuf>,
    /// Document text for document mode
    #[arg(long, short)]
    input: Option<PathBuf>,
    /// Directory to write the outputs into
    #[arg(long, short, default_value = ".")]
    output_dir: PathBuf,
    /// File stem shared by all outputs
    #[arg(long, short, default_value = "stamps")]
    name: String,
    /// Seed for every random draw, replacing the configured seed
    #[arg(long, short)]
    seed: Option<u64>,
    /// Skip the preview image
    #[arg(long)]
    no_preview: bool,
}

/// `<dir>/<name>.<suffix>`, keeping any dots already in `name`
fn output_path(dir: &Path, name: &str, suffix: &str) -> PathBuf {
    dir.join(format!("{}.{}", name, suffix))
}

fn main() -> Result<()> {
    init_logging()?;
    let args = Args::parse();
    info!("StampKit {}", VERSION);

    let mut inputs = vec![args.config.clone()];
    inputs.extend(args.font.iter().cloned());
    inputs.extend(args.input.iter().cloned());
    check_inputs(&inputs)?;

    let config = StampConfig::load_from_file(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    let mut request = RunRequest::new(config);
    if let Some(path) = &args.font {
        request.font =
            Some(load_font(path).with_context(|| format!("Failed to load {}", path.display()))?);
    }
    if let Some(path) = &args.input {
        request.document = Some(read_text(path)?);
    }
    request.seed = args.seed;
    request.preview = !args.no_preview;
    request.generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let output = run(&request).context("Stamping run failed")?;

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;
    let gcode_path = output_path(&args.output_dir, &args.name, "gcode");
    fs::write(&gcode_path, &output.gcode)
        .with_context(|| format!("Failed to write {}", gcode_path.display()))?;

    let symbols_path = output_path(&args.output_dir, &args.name, "symbols.txt");
    let mut symbols = output.symbols.join("\n");
    symbols.push('\n');
    fs::write(&symbols_path, symbols)
        .with_context(|| format!("Failed to write {}", symbols_path.display()))?;

    if let Some(image) = &output.preview {
        let preview_path = output_path(&args.output_dir, &args.name, "png");
        image
            .save(&preview_path)
            .with_context(|| format!("Failed to write {}", preview_path.display()))?;
    }

    info!(
        "Wrote {} placements in {} tools to {}",
        output.placements.len(),
        output.symbols.len(),
        args.output_dir.display()
    );
    Ok(())
}
