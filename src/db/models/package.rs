// src/db/models/package.rs

//! Package model - one build recipe within a tree

use crate::error::Result;
use rusqlite::{Connection, params};

/// A package recipe registered in a tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub tree: String,
    pub category: Option<String>,
    pub section: Option<String>,
    pub directory: Option<String>,
    pub description: Option<String>,
}

impl Package {
    /// Create a new Package
    pub fn new(name: impl Into<String>, tree: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tree: tree.into(),
            category: None,
            section: None,
            directory: None,
            description: None,
        }
    }

    /// Insert this package into the database
    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO packages (name, tree, category, section, directory, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &self.name,
                &self.tree,
                &self.category,
                &self.section,
                &self.directory,
                &self.description,
            ],
        )?;
        Ok(())
    }
}
