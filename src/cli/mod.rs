// src/cli/mod.rs
//! CLI definitions for abbs-dep
//!
//! This module contains the command-line interface definition using clap.
//! The command implementation is in the `commands` module.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "abbs-dep")]
#[command(author = "AOSC Developers")]
#[command(version)]
#[command(about = "Compute the build order of abbs packages", long_about = None)]
pub struct Cli {
    /// Packages to resolve
    #[arg(required = true, value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// Path to the abbs-meta database
    #[arg(short, long, value_name = "PATH")]
    pub dbfile: PathBuf,

    /// Target architecture
    #[arg(short, long, default_value = abbs_dep::resolver::DEFAULT_ARCH)]
    pub arch: String,

    /// Exclude build-time dependencies
    #[arg(short = 'n', long)]
    pub no_builddep: bool,

    /// Print every walked dependency edge to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Print `name==version` for packages with a known version
    #[arg(long, conflicts_with = "json")]
    pub with_versions: bool,
}
