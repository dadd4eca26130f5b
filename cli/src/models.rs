#![deny(missing_docs)]

//! # Model Loading
//!
//! Collects every `*.rs` file under the given paths into one model set.

use oapigen_core::error::{AppError, AppResult};
use oapigen_core::{extract_models, ModelSet};
use std::fs;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Parses all Rust sources found under `paths` (files or directories).
///
/// Files are visited in name order so that duplicate definitions resolve
/// the same way on every run.
pub fn load_models(paths: &[PathBuf]) -> AppResult<ModelSet> {
    let mut models = ModelSet::new();

    for root in paths {
        if !root.exists() {
            return Err(AppError::General(format!(
                "Model path not found: {:?}",
                root
            )));
        }

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry
                .map_err(|e| AppError::General(format!("Failed to walk {:?}: {}", root, e)))?;
            let path = entry.path();
            if !entry.file_type().is_file() || !path.extension().is_some_and(|ext| ext == "rs") {
                continue;
            }

            let content = fs::read_to_string(path).map_err(|e| {
                AppError::General(format!("Failed to read file {:?}: {}", path, e))
            })?;
            let found =
                extract_models(&content).map_err(|e| e.within(&path.display().to_string()))?;
            log::debug!("{} model(s) in {:?}", found.len(), path);
            models.extend(found);
        }
    }

    log::info!("loaded {} model(s)", models.len());
    Ok(models)
}
