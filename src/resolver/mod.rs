// src/resolver/mod.rs

//! Dependency resolution and build ordering
//!
//! Resolution runs in two phases over a shared `DependencyTable`:
//!
//! 1. `GraphBuilder` walks the data source from the requested packages and
//!    records every reachable package and edge.
//! 2. `partition` computes each package's build depth or dependency loop
//!    and groups packages into levels and loop groups.
//!
//! `resolve` runs both phases in one call.

pub mod builder;
pub mod depth;
pub mod graph;
pub mod level;
pub mod source;

pub use builder::GraphBuilder;
pub use depth::{CycleCounter, Resolved, resolve_depth};
pub use graph::{CycleId, DependencyTable, NodeDepth, NodeFlags, NodeId, PackageNode};
pub use level::{CycleGroup, Level, Partition, partition};
pub use source::{DataSource, DependencyRow, MemorySource, SqliteSource};

use crate::error::Result;
use crate::trace::TraversalObserver;
use tracing::{info, warn};

/// Architecture resolved when none is given
pub const DEFAULT_ARCH: &str = "amd64";

/// Options controlling a resolution run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Architecture to look up versions and dependencies for
    pub arch: String,
    /// Follow build-time dependencies as well as runtime ones
    pub include_build_deps: bool,
    /// Report every walked edge on stderr
    pub verbose: bool,
}

impl ResolveOptions {
    pub fn new(arch: impl Into<String>) -> Self {
        Self {
            arch: arch.into(),
            ..Self::default()
        }
    }

    pub fn with_build_deps(mut self, include: bool) -> Self {
        self.include_build_deps = include;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            arch: DEFAULT_ARCH.to_string(),
            include_build_deps: true,
            verbose: false,
        }
    }
}

/// Outcome of a full resolution run
#[derive(Debug, Clone)]
pub struct Resolution {
    pub table: DependencyTable,
    pub partition: Partition,
}

impl Resolution {
    pub fn has_cycles(&self) -> bool {
        self.partition.has_cycles()
    }

    /// Packages the data source did not know
    pub fn not_found(&self) -> impl Iterator<Item = &PackageNode> {
        self.table.iter().filter(|node| node.flags.not_found)
    }

    /// Packages required with a version relation nothing satisfies
    pub fn unmet(&self) -> impl Iterator<Item = &PackageNode> {
        self.table.iter().filter(|node| node.flags.dependency_unmet)
    }
}

/// Build the dependency graph for `roots` and partition it
pub fn resolve<S, I, T>(
    source: S,
    roots: I,
    options: &ResolveOptions,
    observer: &mut dyn TraversalObserver,
) -> Result<Resolution>
where
    S: DataSource,
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut table = DependencyTable::new();
    GraphBuilder::new(source, options).build(roots, &mut table, observer)?;
    info!("Dependency graph has {} packages", table.len());

    let partition = partition(&mut table);
    info!(
        "{} build levels, {} dependency loops",
        partition.levels.len(),
        partition.cycles.len()
    );

    let resolution = Resolution { table, partition };
    for node in resolution.not_found() {
        warn!("Package not found: {}", node.name);
    }
    for node in resolution.unmet() {
        warn!("No version satisfies the dependency on {}", node.name);
    }

    Ok(resolution)
}
