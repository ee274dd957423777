// src/db/schema.rs

//! abbs-meta schema definitions
//!
//! abbs-dep never writes to a production store; the schema lives here so
//! fresh stores can be created for testing and local experiments. Only the
//! tables and columns the dependency queries touch are required, the rest
//! mirror what abbs-meta and its dpkg repository sync produce.

use crate::error::Result;
use rusqlite::Connection;
use tracing::debug;

/// Tables read during dependency resolution
pub const TABLES: [&str; 5] = [
    "trees",
    "packages",
    "package_versions",
    "package_dependencies",
    "dpkg_packages",
];

/// Create all abbs-meta tables that do not exist yet
pub fn create(conn: &Connection) -> Result<()> {
    debug!("Creating abbs-meta schema");

    conn.execute_batch(
        "
        -- Trees: source-controlled collections of build recipes
        CREATE TABLE IF NOT EXISTS trees (
            name TEXT PRIMARY KEY,
            category TEXT,
            url TEXT,
            mainbranch TEXT NOT NULL
        );

        -- Packages: one row per recipe, owned by a tree
        CREATE TABLE IF NOT EXISTS packages (
            name TEXT PRIMARY KEY,
            tree TEXT NOT NULL,
            category TEXT,
            section TEXT,
            pkg_section TEXT,
            directory TEXT,
            description TEXT,
            FOREIGN KEY (tree) REFERENCES trees(name)
        );

        -- Versions per branch and architecture ('' = architecture-independent)
        CREATE TABLE IF NOT EXISTS package_versions (
            package TEXT NOT NULL,
            branch TEXT NOT NULL,
            architecture TEXT NOT NULL DEFAULT '',
            version TEXT NOT NULL,
            release TEXT,
            epoch TEXT,
            commit_time INTEGER,
            committer TEXT,
            githash TEXT,
            PRIMARY KEY (package, branch, architecture)
        );

        CREATE INDEX IF NOT EXISTS idx_package_versions_package ON package_versions(package);

        -- Declared dependencies (relationship: PKGDEP, BUILDDEP, ...)
        CREATE TABLE IF NOT EXISTS package_dependencies (
            package TEXT NOT NULL,
            dependency TEXT NOT NULL,
            version TEXT,
            relop TEXT,
            architecture TEXT NOT NULL DEFAULT '',
            relationship TEXT NOT NULL,
            PRIMARY KEY (package, dependency, relationship, architecture)
        );

        CREATE INDEX IF NOT EXISTS idx_package_dependencies_dependency
            ON package_dependencies(dependency);

        -- Binary packages already published in the distribution repository
        CREATE TABLE IF NOT EXISTS dpkg_packages (
            package TEXT NOT NULL,
            version TEXT NOT NULL,
            architecture TEXT NOT NULL,
            repo TEXT NOT NULL,
            filename TEXT,
            size INTEGER,
            sha256 TEXT,
            PRIMARY KEY (package, version, architecture, repo)
        );
        ",
    )?;

    Ok(())
}
