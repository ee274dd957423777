// src/commands/mod.rs
//! Command handlers for the abbs-dep CLI

mod resolve;

pub use resolve::{Outcome, cmd_resolve};
