// src/db/models/dpkg_package.rs

//! DpkgPackage model - a binary package already in the distribution

use crate::error::Result;
use rusqlite::{Connection, params};

/// A binary package published in a dpkg repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DpkgPackage {
    pub package: String,
    pub version: String,
    pub architecture: String,
    pub repo: String,
}

impl DpkgPackage {
    /// Create a new DpkgPackage
    pub fn new(
        package: impl Into<String>,
        version: impl Into<String>,
        architecture: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            version: version.into(),
            architecture: architecture.into(),
            repo: repo.into(),
        }
    }

    /// Insert this package into the database
    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO dpkg_packages (package, version, architecture, repo) VALUES (?1, ?2, ?3, ?4)",
            params![&self.package, &self.version, &self.architecture, &self.repo],
        )?;
        Ok(())
    }
}
