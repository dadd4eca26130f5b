#![deny(missing_docs)]

//! # Generate Command
//!
//! Implements the pipeline: Rust models + manifest -> OpenAPI document.
//!
//! 1. **Models**: every `*.rs` file under `--models` is parsed into one model set.
//! 2. **Manifest**: paths, parameters and responses are read from `--manifest`.
//! 3. **Assembly**: schemas are derived on first reference and wired into the document.
//! 4. **Output**: the document is written as YAML or JSON.

use crate::models::load_models;
use crate::output::{emit, resolve_format, FormatArg};
use oapigen_core::{load_manifest, AppResult, DocumentAssembler};
use std::path::PathBuf;

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Rust source files or directories holding the data models.
    #[clap(long, required = true, env = "OAPIGEN_MODELS", value_delimiter = ',')]
    pub models: Vec<PathBuf>,

    /// Document manifest (YAML or JSON).
    #[clap(long, env = "OAPIGEN_MANIFEST")]
    pub manifest: PathBuf,

    /// Output path. Prints to stdout when omitted.
    #[clap(long)]
    pub output: Option<PathBuf>,

    /// Output format. Inferred from the output extension, YAML otherwise.
    #[clap(long, value_enum)]
    pub format: Option<FormatArg>,
}

/// Executes the generation.
///
/// # Arguments
///
/// * `args` - Command arguments.
pub fn execute(args: &GenerateArgs) -> AppResult<()> {
    let models = load_models(&args.models)?;
    let manifest = load_manifest(&args.manifest)?;

    let document = DocumentAssembler::new(&models).build(&manifest)?;

    let format = resolve_format(args.format, args.output.as_deref());
    emit(&document, format, args.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const MODELS: &str = r#"
        pub struct User {
            #[oapi("required:true")]
            pub id: i64,
            pub email: String,
        }
    "#;

    const MANIFEST: &str = r#"
title: Users
version: 0.1.0
paths:
  - route: /users
    method: get
    responses:
      - status: 200
        description: all users
        model: Vec<User>
"#;

    #[test]
    fn test_generate_json_document() {
        let dir = tempdir().unwrap();
        let models_dir = dir.path().join("models");
        fs::create_dir_all(&models_dir).unwrap();
        fs::write(models_dir.join("user.rs"), MODELS).unwrap();
        let manifest = dir.path().join("api.yaml");
        fs::write(&manifest, MANIFEST).unwrap();
        let out_path = dir.path().join("out/openapi.json");

        let args = GenerateArgs {
            models: vec![models_dir],
            manifest,
            output: Some(out_path.clone()),
            format: None,
        };
        execute(&args).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out_path).unwrap()).unwrap();
        assert_eq!(written["openapi"], "3.0.0");
        assert_eq!(
            written["paths"]["/users"]["get"]["responses"]["200"]["content"]["application/json"]
                ["schema"]["$ref"],
            "#/components/schemas/Users"
        );
        assert_eq!(written["components"]["schemas"]["User"]["required"][0], "id");
    }

    #[test]
    fn test_generate_yaml_document() {
        let dir = tempdir().unwrap();
        let model_file = dir.path().join("user.rs");
        fs::write(&model_file, MODELS).unwrap();
        let manifest = dir.path().join("api.yaml");
        fs::write(&manifest, MANIFEST).unwrap();
        let out_path = dir.path().join("openapi.yaml");

        let args = GenerateArgs {
            models: vec![model_file],
            manifest,
            output: Some(out_path.clone()),
            format: None,
        };
        execute(&args).unwrap();

        let written: serde_json::Value =
            serde_yaml::from_str(&fs::read_to_string(&out_path).unwrap()).unwrap();
        assert_eq!(written["info"]["title"], "Users");
        assert_eq!(written["components"]["schemas"]["Users"]["type"], "array");
    }

    #[test]
    fn test_generate_fails_on_unknown_model() {
        let dir = tempdir().unwrap();
        let model_file = dir.path().join("empty.rs");
        fs::write(&model_file, "").unwrap();
        let manifest = dir.path().join("api.yaml");
        fs::write(&manifest, MANIFEST).unwrap();
        let out_path = dir.path().join("openapi.yaml");

        let args = GenerateArgs {
            models: vec![model_file],
            manifest,
            output: Some(out_path.clone()),
            format: None,
        };
        assert!(execute(&args).is_err());
        assert!(!out_path.exists());
    }
}
