//! File loading and saving
//!
//! Configuration and font files are JSON or TOML, chosen by extension.
//! Every failure is reported as a [`ConfigError`] naming the file.

use serde::de::DeserializeOwned;
use serde::Serialize;
use stampkit_core::{ConfigError, Result, StampFont};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Structured file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat {
                extension: other.unwrap_or("").to_string(),
            }
            .into()),
        }
    }
}

fn invalid_file(path: &Path, reason: impl ToString) -> stampkit_core::Error {
    ConfigError::InvalidFile {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
    .into()
}

/// Read a UTF-8 file, mapping absence and I/O failures to config errors
pub fn read_text(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(ConfigError::MissingFile {
            path: path.display().to_string(),
        }
        .into());
    }
    std::fs::read_to_string(path).map_err(|e| invalid_file(path, e))
}

/// Parse a JSON or TOML file into `T`
pub fn read_structured<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = FileFormat::from_path(path)?;
    let content = read_text(path)?;
    let value = match format {
        FileFormat::Json => serde_json::from_str(&content).map_err(|e| invalid_file(path, e))?,
        FileFormat::Toml => toml::from_str(&content).map_err(|e| invalid_file(path, e))?,
    };
    debug!("Loaded {}", path.display());
    Ok(value)
}

/// Write `value` as JSON or TOML, chosen by extension
pub fn write_structured<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let content = match FileFormat::from_path(path)? {
        FileFormat::Json => {
            serde_json::to_string_pretty(value).map_err(|e| invalid_file(path, e))?
        }
        FileFormat::Toml => toml::to_string_pretty(value).map_err(|e| invalid_file(path, e))?,
    };
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a stamp font file
///
/// A font must define at least one glyph and a positive stamp body.
pub fn load_font(path: &Path) -> Result<StampFont> {
    let font: StampFont = read_structured(path)?;
    if font.glyphs.is_empty() {
        return Err(invalid_file(path, "font defines no glyphs"));
    }
    if font.size.width <= 0.0 || font.size.height <= 0.0 {
        return Err(invalid_file(path, "stamp size must be > 0"));
    }
    if let Some((symbol, _)) = font.glyphs.iter().find(|(_, m)| m.width <= 0.0) {
        return Err(invalid_file(
            path,
            format!("glyph '{}' has a non-positive width", symbol),
        ));
    }
    Ok(font)
}

/// Fail with every missing path at once
pub fn check_inputs<'a, I>(paths: I) -> Result<()>
where
    I: IntoIterator<Item = &'a PathBuf>,
{
    let missing: Vec<String> = paths
        .into_iter()
        .filter(|path| !path.exists())
        .map(|path| path.display().to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::MissingFile {
            path: missing.join(", "),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            FileFormat::from_path(Path::new("run.JSON")).unwrap(),
            FileFormat::Json
        );
        assert_eq!(
            FileFormat::from_path(Path::new("run.toml")).unwrap(),
            FileFormat::Toml
        );
        let err = FileFormat::from_path(Path::new("run.yaml")).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported config format: yaml");
    }

    #[test]
    fn test_check_inputs_reports_all_missing() {
        let dir = tempdir().unwrap();
        let present = dir.path().join("here.json");
        std::fs::write(&present, "{}").unwrap();
        let paths = vec![present, dir.path().join("a.json"), dir.path().join("b.txt")];

        let err = check_inputs(&paths).unwrap_err();
        assert!(err.is_config_error());
        let message = err.to_string();
        assert!(message.contains("a.json"));
        assert!(message.contains("b.txt"));
        assert!(!message.contains("here.json"));
    }

    #[test]
    fn test_load_font_rejects_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("font.json");
        std::fs::write(&path, r#"{ "size": { "width": 10, "height": 10 }, "glyphs": {} }"#)
            .unwrap();
        let err = load_font(&path).unwrap_err();
        assert!(err.to_string().contains("font defines no glyphs"));
    }

    #[test]
    fn test_invalid_json_names_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_structured::<StampFont>(&path).unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("broken.json"));
    }
}
