// src/resolver/source.rs

//! Package data sources
//!
//! The graph builder asks exactly two questions of its backing store: the
//! current version of a package, and the dependencies of a package that
//! still need building. `DataSource` captures that contract so the graph
//! algorithms can run against the abbs-meta SQLite store or packages held
//! in memory.

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// One dependency reported by a data source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRow {
    pub name: String,
    /// Version satisfying the declared relation, if one exists
    pub version: Option<String>,
    /// Declared as a build-time only dependency
    pub build_only: bool,
}

impl DependencyRow {
    pub fn new(name: impl Into<String>, version: Option<&str>, build_only: bool) -> Self {
        Self {
            name: name.into(),
            version: version.map(str::to_string),
            build_only,
        }
    }
}

/// Backing store queried while building the dependency graph
pub trait DataSource {
    /// Resolve the current version of a package for an architecture
    ///
    /// Returns `None` when the package is unknown for that architecture.
    fn resolve_version(&self, name: &str, arch: &str) -> Result<Option<String>>;

    /// List the dependencies of a package that still need building
    ///
    /// Runtime dependencies are always listed, build-time ones only when
    /// `include_build_deps` is set. Self-dependencies, dependencies already
    /// satisfied by a distribution package, and rows for other
    /// architectures are omitted.
    fn list_dependencies(
        &self,
        name: &str,
        arch: &str,
        include_build_deps: bool,
    ) -> Result<Vec<DependencyRow>>;
}

impl<S: DataSource + ?Sized> DataSource for &S {
    fn resolve_version(&self, name: &str, arch: &str) -> Result<Option<String>> {
        (**self).resolve_version(name, arch)
    }

    fn list_dependencies(
        &self,
        name: &str,
        arch: &str,
        include_build_deps: bool,
    ) -> Result<Vec<DependencyRow>> {
        (**self).list_dependencies(name, arch, include_build_deps)
    }
}

// A row matches when its architecture equals the requested one or is empty
// (architecture-independent), but not when both are empty.
const SQL_PACKAGE_VERSION: &str = "\
    SELECT dpkg_version(pv.version, pv.release, pv.epoch) full_version \
    FROM package_versions pv \
    INNER JOIN packages p ON p.name = pv.package \
    INNER JOIN trees t ON t.name = p.tree AND t.mainbranch = pv.branch \
    WHERE pv.package = ?1 \
    AND (pv.architecture = '') != (pv.architecture = ?2)";

const SQL_DEPENDENCIES: &str = "\
    SELECT pd.dependency, \
      dpkg_version(pv.version, pv.release, pv.epoch) full_version, \
      (pd.relationship = 'BUILDDEP') builddep \
    FROM package_dependencies pd \
    LEFT JOIN package_versions pv \
      ON pv.package = pd.dependency \
      AND compare_dpkgrel(dpkg_version(pv.version, pv.release, pv.epoch), pd.relop, pd.version) \
      AND (pv.architecture = '') != (pv.architecture = ?2) \
    LEFT JOIN packages p ON p.name = pv.package \
    LEFT JOIN trees t ON t.name = p.tree \
    LEFT JOIN dpkg_packages dp \
      ON dp.package = pd.dependency \
      AND dp.architecture = ?2 \
      AND compare_dpkgrel(dpkg_version(pv.version, pv.release, pv.epoch), '=', dp.version) \
    WHERE pd.package = ?1 AND pd.dependency != ?1 \
    AND pd.relationship IN ('PKGDEP', ?3) \
    AND (pd.architecture = '') != (pd.architecture = ?2) \
    AND (pv.package IS NULL OR pv.branch = t.mainbranch) \
    AND dp.package IS NULL";

/// Data source backed by an abbs-meta SQLite database
pub struct SqliteSource {
    conn: Connection,
}

impl SqliteSource {
    /// Wrap a connection that already has the version functions registered
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open an abbs-meta database read-only
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = crate::db::open(path)?;
        // Prepare up front so a malformed store fails before any traversal
        conn.prepare_cached(SQL_PACKAGE_VERSION)?;
        conn.prepare_cached(SQL_DEPENDENCIES)?;
        Ok(Self::new(conn))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl DataSource for SqliteSource {
    fn resolve_version(&self, name: &str, arch: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare_cached(SQL_PACKAGE_VERSION)?;
        let version = stmt
            .query_row(params![name, arch], |row| row.get::<_, Option<String>>(0))
            .optional()?
            .flatten();
        debug!("Version of {} ({}): {:?}", name, arch, version);
        Ok(version)
    }

    fn list_dependencies(
        &self,
        name: &str,
        arch: &str,
        include_build_deps: bool,
    ) -> Result<Vec<DependencyRow>> {
        let extra_relationship = if include_build_deps { "BUILDDEP" } else { "PKGDEP" };
        let mut stmt = self.conn.prepare_cached(SQL_DEPENDENCIES)?;

        let rows = stmt
            .query_map(params![name, arch, extra_relationship], |row| {
                Ok(DependencyRow {
                    name: row.get(0)?,
                    version: row.get(1)?,
                    build_only: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!("{} has {} outstanding dependencies", name, rows.len());
        Ok(rows)
    }
}

/// How an in-memory dependency reports its satisfying version
#[derive(Debug, Clone)]
enum MemoryVersion {
    /// Whatever version the dependency is registered with, if any
    Lookup,
    Fixed(Option<String>),
}

#[derive(Debug, Clone)]
struct MemoryDependency {
    name: String,
    version: MemoryVersion,
    build_only: bool,
}

/// Data source holding packages in memory
///
/// Architectures are ignored; every package is available everywhere.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    versions: HashMap<String, String>,
    dependencies: HashMap<String, Vec<MemoryDependency>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package and its current version
    pub fn with_package(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.versions.insert(name.into(), version.into());
        self
    }

    /// Declare a runtime dependency satisfied by whatever version `dependency` has
    pub fn with_dependency(self, package: impl Into<String>, dependency: impl Into<String>) -> Self {
        self.push(package.into(), dependency.into(), MemoryVersion::Lookup, false)
    }

    /// Declare a build-time dependency satisfied by whatever version `dependency` has
    pub fn with_build_dependency(
        self,
        package: impl Into<String>,
        dependency: impl Into<String>,
    ) -> Self {
        self.push(package.into(), dependency.into(), MemoryVersion::Lookup, true)
    }

    /// Declare a dependency exactly as the store would report it
    pub fn with_row(self, package: impl Into<String>, row: DependencyRow) -> Self {
        self.push(
            package.into(),
            row.name,
            MemoryVersion::Fixed(row.version),
            row.build_only,
        )
    }

    fn push(
        mut self,
        package: String,
        name: String,
        version: MemoryVersion,
        build_only: bool,
    ) -> Self {
        self.dependencies.entry(package).or_default().push(MemoryDependency {
            name,
            version,
            build_only,
        });
        self
    }
}

impl DataSource for MemorySource {
    fn resolve_version(&self, name: &str, _arch: &str) -> Result<Option<String>> {
        Ok(self.versions.get(name).cloned())
    }

    fn list_dependencies(
        &self,
        name: &str,
        _arch: &str,
        include_build_deps: bool,
    ) -> Result<Vec<DependencyRow>> {
        let Some(deps) = self.dependencies.get(name) else {
            return Ok(Vec::new());
        };

        Ok(deps
            .iter()
            .filter(|dep| dep.name != name && (include_build_deps || !dep.build_only))
            .map(|dep| DependencyRow {
                name: dep.name.clone(),
                version: match &dep.version {
                    MemoryVersion::Lookup => self.versions.get(&dep.name).cloned(),
                    MemoryVersion::Fixed(version) => version.clone(),
                },
                build_only: dep.build_only,
            })
            .collect())
    }
}
