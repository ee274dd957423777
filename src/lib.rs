// src/lib.rs

//! abbs dependency resolver
//!
//! Computes a build order for packages of an abbs tree from its abbs-meta
//! SQLite database. Packages are grouped into levels, where every package
//! only depends on packages of lower levels. Packages caught in dependency
//! loops are reported as loop groups instead.
//!
//! # Architecture
//!
//! - Read-only store: version and dependency queries run against an
//!   existing abbs-meta database through the `DataSource` trait
//! - Arena graph: one `DependencyTable` owns every node, edges are ids
//! - Explicit stacks: neither the graph walk nor depth resolution recurses

pub mod db;
mod error;
pub mod resolver;
pub mod trace;
pub mod version;

pub use error::{Error, Result};
pub use resolver::{
    DataSource, DependencyTable, MemorySource, Partition, Resolution, ResolveOptions,
    SqliteSource, resolve,
};
pub use trace::{LogTrace, RecordingTrace, SilentTrace, StderrTrace, TraversalEdge, TraversalObserver};
pub use version::{DpkgVersion, Relation};
