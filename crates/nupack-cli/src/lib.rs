//! nupack - build and publish `.nupkg` packages
#![allow(clippy::doc_markdown)]
//!
//! # Overview
//!
//! `nupack pack` turns a `.nuspec` manifest and the files next to it into an
//! OPC package; `nupack push` uploads a built package to a package source.
//!
//! # Environment
//!
//! | Variable | Used by |
//! |---|---|
//! | `NUGET_SOURCE` | default `--source` for `push` |
//! | `NUGET_API_KEY` | default `--api-key` for `push` |
//! | `RUST_LOG` | log filter, e.g. `nupack_core=debug` |

pub mod cmd;

pub use nupack_core::USER_AGENT;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "nupack")]
#[command(author, version, about = "nupack - build and publish .nupkg packages")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build a package from a .nuspec manifest
    Pack {
        /// Path to the .nuspec file
        nuspec: PathBuf,
        /// Directory the manifest's file rules resolve against
        /// (defaults to the manifest's directory)
        #[arg(long, short = 'b')]
        base_path: Option<PathBuf>,
        /// Directory that receives <id>.<version>.nupkg
        #[arg(long, short = 'o', default_value = ".")]
        output_dir: PathBuf,
    },
    /// Upload a package to a package source
    Push {
        /// Path to the .nupkg file
        package: PathBuf,
        /// Package source URL
        #[arg(long, short = 's', env = "NUGET_SOURCE")]
        source: Option<String>,
        /// API key sent to the source
        #[arg(long, short = 'k', env = "NUGET_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
}
