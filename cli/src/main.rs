#![deny(missing_docs)]

//! # OapiGen CLI
//!
//! Command Line Interface for deriving OpenAPI documents from Rust models.
//!
//! Supported Commands:
//! - `generate`: Models + manifest -> full OpenAPI document.
//! - `schema`: Models + one type expression -> component schemas.

use clap::{Parser, Subcommand};
use oapigen_core::AppResult;

mod generate;
mod models;
mod output;
mod schema;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI documents from Rust data models")]
struct Cli {
    /// Raise log verbosity (`-v` debug, `-vv` trace). `RUST_LOG` takes precedence.
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a full OpenAPI document from models and a manifest.
    Generate(generate::GenerateArgs),
    /// Derive the component schemas of a single type.
    Schema(schema::SchemaArgs),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Generate(args) => generate::execute(args)?,
        Commands::Schema(args) => schema::execute(args)?,
    }

    Ok(())
}
