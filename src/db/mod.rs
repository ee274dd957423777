// src/db/mod.rs

//! Access to the abbs-meta SQLite store
//!
//! Resolution only ever reads the store: `open` attaches read-only with a
//! short busy timeout and registers the version SQL functions the
//! dependency queries rely on. `init` creates a fresh writable store with
//! the same schema, which is how fixture databases get seeded.

pub mod functions;
pub mod models;
pub mod schema;

use crate::error::{Error, Result};
use rusqlite::{Connection, OpenFlags, Transaction};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// How long a query waits on a locked database before failing
pub const BUSY_TIMEOUT: Duration = Duration::from_millis(1000);

/// Open an existing abbs-meta database read-only
pub fn open(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();
    if !path.try_exists()? {
        return Err(Error::DatabaseNotFound(path.to_path_buf()));
    }

    debug!("Opening database read-only: {}", path.display());
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX | OpenFlags::SQLITE_OPEN_URI,
    )?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    functions::register(&conn)?;

    Ok(conn)
}

/// Create a writable database with the abbs-meta schema
///
/// Existing tables are left untouched.
pub fn init(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    info!("Initializing abbs-meta schema at: {}", path.display());

    let conn = open_writable(path)?;
    schema::create(&conn)?;
    Ok(())
}

/// Open a database for writing, creating the file if needed
pub fn open_writable(path: impl AsRef<Path>) -> Result<Connection> {
    let conn = Connection::open(path.as_ref())?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    functions::register(&conn)?;
    Ok(conn)
}

/// Open an in-memory database with schema and functions in place
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    functions::register(&conn)?;
    schema::create(&conn)?;
    Ok(conn)
}

/// Run `f` inside a transaction, committing on success
pub fn transaction<T, F>(conn: &mut Connection, f: F) -> Result<T>
where
    F: FnOnce(&Transaction<'_>) -> Result<T>,
{
    let tx = conn.transaction()?;
    let value = f(&tx)?;
    tx.commit()?;
    Ok(value)
}
