// src/db/functions.rs

//! SQL scalar functions for dpkg version handling
//!
//! - `dpkg_version(version, release, epoch)` assembles a full version
//! - `compare_dpkgrel(a, relop, b)` evaluates `a <relop> b`

use crate::version;
use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::types::ValueRef;
use rusqlite::Connection;

/// Register the version functions on a connection
pub fn register(conn: &Connection) -> rusqlite::Result<()> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;
    conn.create_scalar_function("dpkg_version", 3, flags, dpkg_version)?;
    conn.create_scalar_function("compare_dpkgrel", 3, flags, compare_dpkgrel)?;
    Ok(())
}

/// Read an argument as text; epochs and releases may be stored as integers
fn text_arg(ctx: &Context<'_>, idx: usize) -> Option<String> {
    match ctx.get_raw(idx) {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    }
}

fn dpkg_version(ctx: &Context<'_>) -> rusqlite::Result<Option<String>> {
    let Some(ver) = text_arg(ctx, 0) else {
        return Ok(None);
    };
    let release = text_arg(ctx, 1);
    let epoch = text_arg(ctx, 2);
    Ok(Some(version::full_version(
        &ver,
        release.as_deref(),
        epoch.as_deref(),
    )))
}

fn compare_dpkgrel(ctx: &Context<'_>) -> rusqlite::Result<Option<bool>> {
    let relop = text_arg(ctx, 1).unwrap_or_default();
    if relop.trim().is_empty() {
        return Ok(Some(true));
    }

    let (Some(candidate), Some(reference)) = (text_arg(ctx, 0), text_arg(ctx, 2)) else {
        return Ok(None);
    };

    version::check_relation(&candidate, &relop, &reference)
        .map(Some)
        .map_err(|e| rusqlite::Error::UserFunctionError(Box::new(e)))
}
