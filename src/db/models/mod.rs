// src/db/models/mod.rs

//! Data models for abbs-meta database entities
//!
//! Rust structs for the rows the dependency queries read, with methods to
//! insert and look them up. Resolution itself goes through the prepared
//! queries in `resolver::source`; these models exist for seeding and
//! inspecting stores.

mod dpkg_package;
mod package;
mod package_dependency;
mod package_version;
mod tree;

pub use dpkg_package::DpkgPackage;
pub use package::Package;
pub use package_dependency::{PackageDependency, Relationship};
pub use package_version::PackageVersion;
pub use tree::Tree;
