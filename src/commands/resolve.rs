// src/commands/resolve.rs

//! Build order reporting
//!
//! Resolves the requested packages and prints their build levels, followed
//! by any dependency loops, either as plain text or as one JSON document.

use crate::cli::Cli;
use abbs_dep::resolver::{self, Resolution, ResolveOptions, SqliteSource};
use abbs_dep::trace::LogTrace;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};
use tracing::info;

/// Header printed before the loop groups in text output
pub const LOOPS_HEADER: &str = "=== Dependency loops ===";

/// How a successful run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every package was placed on a build level
    Ordered,
    /// At least one dependency loop was found
    Circular,
}

/// Resolve the packages named on the command line and print the build order
pub fn cmd_resolve(cli: &Cli) -> Result<Outcome> {
    let options = ResolveOptions::new(cli.arch.as_str())
        .with_build_deps(!cli.no_builddep)
        .with_verbose(cli.verbose);

    info!("Opening database: {}", cli.dbfile.display());
    let source = SqliteSource::open(&cli.dbfile)
        .with_context(|| format!("Failed to open database {}", cli.dbfile.display()))?;

    let resolution = resolver::resolve(&source, &cli.packages, &options, &mut LogTrace)
        .context("Failed to resolve dependencies")?;

    let rendered = if cli.json {
        render_json(&resolution)?
    } else {
        render_text(&resolution, cli.with_versions)
    };
    io::stdout()
        .lock()
        .write_all(rendered.as_bytes())
        .context("Failed to write build order")?;

    Ok(if resolution.has_cycles() {
        Outcome::Circular
    } else {
        Outcome::Ordered
    })
}

/// One line per level, then the loop header and one line per loop group
fn render_text(resolution: &Resolution, with_versions: bool) -> String {
    let label = |name: &String| -> String {
        let version = resolution.table.get(name).and_then(|node| node.version.as_deref());
        match version {
            Some(version) if with_versions => format!("{}=={}", name, version),
            _ => name.clone(),
        }
    };
    let line = |group: &BTreeSet<String>| -> String {
        group.iter().map(&label).collect::<Vec<_>>().join(" ")
    };

    let mut out = String::new();
    for level in &resolution.partition.levels {
        out.push_str(&line(level));
        out.push('\n');
    }
    if resolution.has_cycles() {
        out.push_str(LOOPS_HEADER);
        out.push('\n');
        for group in &resolution.partition.cycles {
            out.push_str(&line(group));
            out.push('\n');
        }
    }
    out
}

#[derive(Debug, Serialize)]
struct PackageReport<'a> {
    version: Option<&'a str>,
    not_found: bool,
    build_only: bool,
    dependency_unmet: bool,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    levels: &'a [BTreeSet<String>],
    cycles: &'a [BTreeSet<String>],
    packages: BTreeMap<&'a str, PackageReport<'a>>,
}

fn render_json(resolution: &Resolution) -> Result<String> {
    let packages = resolution
        .table
        .iter()
        .map(|node| {
            let report = PackageReport {
                version: node.version.as_deref(),
                not_found: node.flags.not_found,
                build_only: node.flags.build_only,
                dependency_unmet: node.flags.dependency_unmet,
            };
            (node.name.as_str(), report)
        })
        .collect();

    let report = Report {
        levels: &resolution.partition.levels,
        cycles: &resolution.partition.cycles,
        packages,
    };
    let mut json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    json.push('\n');
    Ok(json)
}
