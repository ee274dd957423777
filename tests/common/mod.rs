// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use abbs_dep::db;
use abbs_dep::db::models::{
    DpkgPackage, Package, PackageDependency, PackageVersion, Relationship, Tree,
};
use rusqlite::Connection;
use std::path::PathBuf;
use tempfile::TempDir;

pub const TREE: &str = "aosc-os-abbs";
pub const MAIN_BRANCH: &str = "stable";

/// Builds an abbs-meta database on disk for one test.
///
/// Every package lives in a single tree whose main branch is `stable`.
pub struct StoreBuilder {
    dir: TempDir,
    path: PathBuf,
    conn: Connection,
}

impl StoreBuilder {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abbs.db");

        db::init(&path).unwrap();
        let conn = db::open_writable(&path).unwrap();
        Tree::new(TREE, MAIN_BRANCH).insert(&conn).unwrap();

        Self { dir, path, conn }
    }

    /// Add a package with an architecture-independent main-branch version
    pub fn package(self, name: &str, version: &str) -> Self {
        Package::new(name, TREE).insert(&self.conn).unwrap();
        PackageVersion::new(name, MAIN_BRANCH, version)
            .insert(&self.conn)
            .unwrap();
        self
    }

    /// Add a package that only has a version for one architecture
    pub fn arch_package(self, name: &str, version: &str, arch: &str) -> Self {
        Package::new(name, TREE).insert(&self.conn).unwrap();
        PackageVersion::new(name, MAIN_BRANCH, version)
            .with_arch(arch)
            .insert(&self.conn)
            .unwrap();
        self
    }

    pub fn depends(self, package: &str, dependency: &str) -> Self {
        PackageDependency::new(package, dependency, Relationship::Runtime)
            .insert(&self.conn)
            .unwrap();
        self
    }

    /// Add a runtime dependency declared for one architecture only
    pub fn depends_arch(self, package: &str, dependency: &str, arch: &str) -> Self {
        PackageDependency::new(package, dependency, Relationship::Runtime)
            .with_arch(arch)
            .insert(&self.conn)
            .unwrap();
        self
    }

    pub fn build_depends(self, package: &str, dependency: &str) -> Self {
        PackageDependency::new(package, dependency, Relationship::BuildTime)
            .insert(&self.conn)
            .unwrap();
        self
    }

    /// Add a runtime dependency with a version relation
    pub fn depends_on(self, package: &str, dependency: &str, relop: &str, version: &str) -> Self {
        PackageDependency::new(package, dependency, Relationship::Runtime)
            .with_constraint(relop, version)
            .insert(&self.conn)
            .unwrap();
        self
    }

    /// Record a package as already published in the distribution repository
    pub fn published(self, package: &str, version: &str, arch: &str) -> Self {
        DpkgPackage::new(package, version, arch, "stable/main")
            .insert(&self.conn)
            .unwrap();
        self
    }

    /// Close the writer and hand back the database path
    ///
    /// Keep the TempDir alive for as long as the database is used.
    pub fn finish(self) -> (TempDir, PathBuf) {
        drop(self.conn);
        (self.dir, self.path)
    }
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `a -> b -> c`
pub fn chain_store() -> (TempDir, PathBuf) {
    StoreBuilder::new()
        .package("a", "1.0")
        .package("b", "1.0")
        .package("c", "1.0")
        .depends("a", "b")
        .depends("b", "c")
        .finish()
}

/// `a -> b -> a`
pub fn loop_store() -> (TempDir, PathBuf) {
    StoreBuilder::new()
        .package("a", "1.0")
        .package("b", "1.0")
        .depends("a", "b")
        .depends("b", "a")
        .finish()
}
