// src/lib.rs

//! Lazuli Linux command-line tools
//!
//! Two small utilities for a hobby distribution:
//!
//! - `lazuli`: a minimal package manager that copies artifacts from a
//!   git-synced repository checkout into the install directory (or adds
//!   shell aliases instead) and tracks what it installed in a JSON
//!   registry.
//! - `lzfetch`: prints system information beside a decorative banner.
//!
//! # Architecture
//!
//! - Registry-first: the JSON registry is the sole source of truth for
//!   what this tool manages; it never removes anything it did not place
//! - Explicit configuration: every path flows through `Config`, no
//!   global state
//! - Single invocation: one process, run to completion, guarded by an
//!   advisory lock on the registry

pub mod config;
mod error;
pub mod packages;
pub mod registry;
pub mod render;
pub mod repository;
pub mod sysinfo;

pub use error::{Error, Result};
