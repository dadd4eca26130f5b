#![deny(missing_docs)]

//! # Output Handling
//!
//! Format selection and writing to a file or stdout.

use oapigen_core::error::{AppError, AppResult};
use oapigen_core::{write_document, OutputFormat};
use serde::Serialize;
use std::fs;
use std::io::{self, BufWriter};
use std::path::Path;

/// `--format` values.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    /// YAML output.
    Yaml,
    /// JSON output.
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Yaml => OutputFormat::Yaml,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Explicit flag first, then the output extension, then YAML.
pub fn resolve_format(explicit: Option<FormatArg>, output: Option<&Path>) -> OutputFormat {
    explicit
        .map(OutputFormat::from)
        .or_else(|| output.and_then(OutputFormat::from_path))
        .unwrap_or_default()
}

/// Writes `value` to `output`, or to stdout when no path is given.
pub fn emit<T: Serialize>(value: &T, format: OutputFormat, output: Option<&Path>) -> AppResult<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    fs::create_dir_all(parent).map_err(|e| {
                        AppError::General(format!("Failed to create output directory: {}", e))
                    })?;
                }
            }
            let file = fs::File::create(path).map_err(|e| {
                AppError::General(format!("Failed to create output file {:?}: {}", path, e))
            })?;
            write_document(value, format, BufWriter::new(file))?;
            println!("Document written to {:?}", path);
        }
        None => write_document(value, format, io::stdout().lock())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_format() {
        assert_eq!(resolve_format(None, None), OutputFormat::Yaml);
        assert_eq!(
            resolve_format(None, Some(Path::new("out/openapi.json"))),
            OutputFormat::Json
        );
        assert_eq!(
            resolve_format(Some(FormatArg::Yaml), Some(Path::new("openapi.json"))),
            OutputFormat::Yaml
        );
    }

    #[test]
    fn test_emit_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/doc.json");
        let value = serde_json::json!({"a": 1});

        emit(&value, OutputFormat::Json, Some(&path)).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, value);
    }
}
