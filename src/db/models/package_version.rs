// src/db/models/package_version.rs

//! PackageVersion model - the version of a package on one branch

use crate::error::Result;
use crate::version;
use rusqlite::{Connection, Row, params};

/// Version of a package on a branch for one architecture
///
/// An empty `architecture` marks an architecture-independent package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageVersion {
    pub package: String,
    pub branch: String,
    pub architecture: String,
    pub version: String,
    pub release: Option<String>,
    pub epoch: Option<String>,
}

impl PackageVersion {
    /// Create a new architecture-independent PackageVersion
    pub fn new(
        package: impl Into<String>,
        branch: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            branch: branch.into(),
            architecture: String::new(),
            version: version.into(),
            release: None,
            epoch: None,
        }
    }

    /// Restrict this version to one architecture
    pub fn with_arch(mut self, architecture: impl Into<String>) -> Self {
        self.architecture = architecture.into();
        self
    }

    /// Set the release (Debian revision) component
    pub fn with_release(mut self, release: impl Into<String>) -> Self {
        self.release = Some(release.into());
        self
    }

    /// Set the epoch component
    pub fn with_epoch(mut self, epoch: impl Into<String>) -> Self {
        self.epoch = Some(epoch.into());
        self
    }

    /// The full `[epoch:]version[-release]` string
    pub fn full_version(&self) -> String {
        version::full_version(&self.version, self.release.as_deref(), self.epoch.as_deref())
    }

    /// Insert this version into the database
    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO package_versions (package, branch, architecture, version, release, epoch)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &self.package,
                &self.branch,
                &self.architecture,
                &self.version,
                &self.release,
                &self.epoch,
            ],
        )?;
        Ok(())
    }

    /// Find all versions of a package across branches and architectures
    pub fn find_by_package(conn: &Connection, package: &str) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT package, branch, architecture, version, release, epoch
             FROM package_versions WHERE package = ?1 ORDER BY branch, architecture",
        )?;

        let versions = stmt
            .query_map([package], Self::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(versions)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            package: row.get(0)?,
            branch: row.get(1)?,
            architecture: row.get(2)?,
            version: row.get(3)?,
            release: row.get(4)?,
            epoch: row.get(5)?,
        })
    }
}
