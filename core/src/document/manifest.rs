//! # Manifest Loading
//!
//! Reads a [`DocumentModel`] from a YAML or JSON manifest.

use crate::document::descriptors::DocumentModel;
use crate::error::{AppError, AppResult};
use std::fs;
use std::path::Path;

/// Parses manifest text. JSON is accepted as a subset of YAML.
pub fn parse_manifest(content: &str) -> AppResult<DocumentModel> {
    serde_yaml::from_str(content)
        .map_err(|e| AppError::Parse(format!("Invalid manifest: {}", e)))
}

/// Reads and parses a manifest file.
pub fn load_manifest(path: &Path) -> AppResult<DocumentModel> {
    let content = fs::read_to_string(path).map_err(|e| {
        AppError::General(format!("Failed to read manifest {:?}: {}", path, e))
    })?;
    parse_manifest(&content).map_err(|e| e.within(&path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::descriptors::StatusCode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MANIFEST: &str = r#"
title: Pets
version: 1.0.0
servers: ["https://api.example.com"]
bearer_auth: true
tags:
  - name: pets
    description: Pet operations
default_response:
  description: unexpected error
  model: ApiError
paths:
  - route: /pets/{id}
    method: get
    tags: [pets]
    operation_id: getPet
    parameters:
      - name: id
        in: path
        required: true
        component: PetId
        type: string
        format: uuid
    responses:
      - status: 200
        description: A pet
        model: Pet
"#;

    #[test]
    fn test_parse_yaml_manifest() {
        let model = parse_manifest(MANIFEST).unwrap();
        assert_eq!(model.title, "Pets");
        assert!(model.bearer_auth);
        assert_eq!(model.paths.len(), 1);
        let path = &model.paths[0];
        assert_eq!(path.parameters[0].component.as_deref(), Some("PetId"));
        assert_eq!(path.responses[0].status, StatusCode::Code(200));
        assert_eq!(
            model.default_response.as_ref().unwrap().model.as_deref(),
            Some("ApiError")
        );
    }

    #[test]
    fn test_parse_json_manifest() {
        let model = parse_manifest(
            r#"{"title": "t", "version": "1", "paths": [{"route": "/a", "method": "post"}]}"#,
        )
        .unwrap();
        assert_eq!(model.paths[0].method, "post");
    }

    #[test]
    fn test_load_manifest_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(MANIFEST.as_bytes()).unwrap();
        let model = load_manifest(file.path()).unwrap();
        assert_eq!(model.version, "1.0.0");
    }

    #[test]
    fn test_invalid_manifest() {
        let err = parse_manifest("title: t\nversion: '1'\nunknown: true").unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }
}
