// src/db/models/package_dependency.rs

//! PackageDependency model - a dependency declared by a package recipe

use crate::error::Result;
use rusqlite::{Connection, Row, params};
use std::fmt;
use std::str::FromStr;

/// Kind of a declared dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    /// Runtime dependency (PKGDEP)
    Runtime,
    /// Build-time only dependency (BUILDDEP)
    BuildTime,
}

impl Relationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::Runtime => "PKGDEP",
            Relationship::BuildTime => "BUILDDEP",
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relationship {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "PKGDEP" => Ok(Relationship::Runtime),
            "BUILDDEP" => Ok(Relationship::BuildTime),
            _ => Err(format!("Invalid relationship: {}", s)),
        }
    }
}

/// A dependency declared by a package, optionally version-constrained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDependency {
    pub package: String,
    pub dependency: String,
    pub version: Option<String>,
    pub relop: Option<String>,
    pub architecture: String,
    pub relationship: Relationship,
}

impl PackageDependency {
    /// Create a new unconstrained PackageDependency for all architectures
    pub fn new(
        package: impl Into<String>,
        dependency: impl Into<String>,
        relationship: Relationship,
    ) -> Self {
        Self {
            package: package.into(),
            dependency: dependency.into(),
            version: None,
            relop: None,
            architecture: String::new(),
            relationship,
        }
    }

    /// Constrain the dependency, e.g. `with_constraint(">=", "1.2")`
    pub fn with_constraint(mut self, relop: impl Into<String>, version: impl Into<String>) -> Self {
        self.relop = Some(relop.into());
        self.version = Some(version.into());
        self
    }

    /// Restrict the dependency to one architecture
    pub fn with_arch(mut self, architecture: impl Into<String>) -> Self {
        self.architecture = architecture.into();
        self
    }

    /// Insert this dependency into the database
    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO package_dependencies (package, dependency, version, relop, architecture, relationship)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &self.package,
                &self.dependency,
                &self.version,
                &self.relop,
                &self.architecture,
                self.relationship.as_str(),
            ],
        )?;
        Ok(())
    }

    /// Find all declared dependencies of a package
    pub fn find_by_package(conn: &Connection, package: &str) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT package, dependency, version, relop, architecture, relationship
             FROM package_dependencies WHERE package = ?1 ORDER BY relationship, dependency",
        )?;

        let deps = stmt
            .query_map([package], Self::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(deps)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let relationship_str: String = row.get(5)?;
        let relationship = relationship_str.parse::<Relationship>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                rusqlite::types::Type::Text,
                Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
            )
        })?;

        Ok(Self {
            package: row.get(0)?,
            dependency: row.get(1)?,
            version: row.get(2)?,
            relop: row.get(3)?,
            architecture: row.get(4)?,
            relationship,
        })
    }
}
