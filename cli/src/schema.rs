#![deny(missing_docs)]

//! # Schema Command
//!
//! Derives the component schemas of one type expression (Rust -> Schema),
//! without a manifest.

use crate::models::load_models;
use crate::output::{emit, resolve_format, FormatArg};
use oapigen_core::{AppResult, DocumentAssembler};
use std::path::PathBuf;

/// Arguments for the schema command.
#[derive(clap::Args, Debug, Clone)]
pub struct SchemaArgs {
    /// Rust source files or directories holding the data models.
    #[clap(long, required = true, env = "OAPIGEN_MODELS", value_delimiter = ',')]
    pub models: Vec<PathBuf>,

    /// Root type expression, e.g. `Person`, `Vec<Person>` or `Page<User>`.
    #[clap(long = "type")]
    pub type_expr: String,

    /// Output path. Prints to stdout when omitted.
    #[clap(long)]
    pub output: Option<PathBuf>,

    /// Output format. Inferred from the output extension, YAML otherwise.
    #[clap(long, value_enum)]
    pub format: Option<FormatArg>,
}

/// Executes the schema derivation.
///
/// # Arguments
///
/// * `args` - Command arguments.
pub fn execute(args: &SchemaArgs) -> AppResult<()> {
    let models = load_models(&args.models)?;

    let (root, schemas) = DocumentAssembler::new(&models).derive_schemas(&args.type_expr)?;
    log::info!("'{}' derived as '{}' ({} schema(s))", args.type_expr, root, schemas.len());

    let format = resolve_format(args.format, args.output.as_deref());
    emit(&schemas, format, args.output.as_deref())
}
