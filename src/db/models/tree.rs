// src/db/models/tree.rs

//! Tree model - a source-controlled collection of build recipes

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

/// A package tree and the branch whose versions count as current
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    pub name: String,
    pub category: Option<String>,
    pub url: Option<String>,
    pub mainbranch: String,
}

impl Tree {
    /// Create a new Tree
    pub fn new(name: impl Into<String>, mainbranch: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: None,
            url: None,
            mainbranch: mainbranch.into(),
        }
    }

    /// Insert this tree into the database
    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO trees (name, category, url, mainbranch) VALUES (?1, ?2, ?3, ?4)",
            params![&self.name, &self.category, &self.url, &self.mainbranch],
        )?;
        Ok(())
    }

    /// Find a tree by name
    pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Self>> {
        let mut stmt =
            conn.prepare("SELECT name, category, url, mainbranch FROM trees WHERE name = ?1")?;
        let tree = stmt.query_row([name], Self::from_row).optional()?;
        Ok(tree)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get(0)?,
            category: row.get(1)?,
            url: row.get(2)?,
            mainbranch: row.get(3)?,
        })
    }
}
