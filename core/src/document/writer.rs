//! # Document Writer
//!
//! Serializes a finished document (or any part of it) as YAML or JSON.

use crate::error::{AppError, AppResult};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

/// Serialization format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// YAML.
    #[default]
    Yaml,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Infers the format from a file extension (`.yaml`, `.yml`, `.json`).
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Some(OutputFormat::Yaml),
            Some("json") => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            other => Err(AppError::General(format!("Unknown output format '{}'", other))),
        }
    }
}

/// Serializes `value` to a string.
pub fn to_string<T: Serialize>(value: &T, format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(value)
            .map_err(|e| AppError::Serialization(format!("YAML serialization failed: {}", e))),
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| AppError::Serialization(format!("JSON serialization failed: {}", e))),
    }
}

/// Serializes `value` into `writer`.
pub fn write_document<T, W>(value: &T, format: OutputFormat, mut writer: W) -> AppResult<()>
where
    T: Serialize,
    W: Write,
{
    let output = to_string(value, format)?;
    writer.write_all(output.as_bytes())?;
    writer.flush()?;
    Ok(())
}
