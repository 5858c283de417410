// src/repository/mod.rs

//! Repository source management
//!
//! This module provides functionality for:
//! - Synchronizing the local repository checkout from its upstream (git)
//! - Locating package bundles in the checkout
//! - Parsing a bundle's optional metadata descriptor
//!
//! A bundle is a read-only directory `rolling/<name>/` in the checkout,
//! holding an artifact file named `<name>` and an optional `pkginfo`
//! descriptor of `key: value` lines. git is an opaque external tool here;
//! only its exit status and captured output are interpreted.

use crate::config::Config;
use crate::error::{Error, Result};
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, info, warn};

/// Subdirectory of the checkout that holds installable bundles
const CHANNEL_DIR: &str = "rolling";

/// Bundle descriptor filename
const DESCRIPTOR_FILE: &str = "pkginfo";

/// Descriptor key whose value is a shell command run before install
const DEPENDENCIES_KEY: &str = "dependencies";

/// An installable bundle located in the repository checkout
#[derive(Debug, Clone)]
pub struct Bundle {
    pub name: String,
    /// The executable artifact inside the bundle directory
    pub artifact: PathBuf,
    /// Shell command to run before install, from the descriptor
    pub setup_command: Option<String>,
}

/// Locate the bundle for `name` under the repository checkout.
///
/// Returns `None` when the bundle directory or its artifact is missing.
/// Reads the `pkginfo` descriptor when present; a descriptor that cannot
/// be read is treated as absent with a warning.
pub fn find_bundle(config: &Config, name: &str) -> Option<Bundle> {
    let bundle_dir = config.repo_dir.join(CHANNEL_DIR).join(name);
    let artifact = bundle_dir.join(name);

    if !artifact.is_file() {
        debug!("No bundle artifact at {}", artifact.display());
        return None;
    }

    let descriptor_path = bundle_dir.join(DESCRIPTOR_FILE);
    let setup_command = if descriptor_path.is_file() {
        match fs::read_to_string(&descriptor_path) {
            Ok(text) => parse_descriptor(&text),
            Err(e) => {
                warn!(
                    "Failed to read descriptor {}: {}",
                    descriptor_path.display(),
                    e
                );
                None
            }
        }
    } else {
        None
    };

    Some(Bundle {
        name: name.to_string(),
        artifact,
        setup_command,
    })
}

/// Parse a `pkginfo` descriptor, returning the dependencies command if any.
///
/// The format is one `key: value` pair per line. Unknown keys are
/// ignored; lines without a separator are skipped with a warning. Blank
/// lines and `#` comments are allowed.
fn parse_descriptor(text: &str) -> Option<String> {
    let mut setup_command = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.split_once(':') {
            Some((key, value)) => {
                if key.trim() == DEPENDENCIES_KEY {
                    let value = value.trim();
                    if !value.is_empty() {
                        setup_command = Some(value.to_string());
                    }
                }
            }
            None => warn!("Skipping malformed descriptor line: {:?}", line),
        }
    }

    setup_command
}

/// Refresh the repository checkout from its upstream.
///
/// Clones the upstream when no checkout exists yet, otherwise pulls the
/// latest revision. Any failure (missing git, network failure, merge
/// conflict) is a `SyncFailure`; installs must never proceed against a
/// stale source without the operator knowing sync failed.
pub fn sync(config: &Config) -> Result<()> {
    let output = if config.repo_dir.exists() {
        info!("Pulling latest revision into {}", config.repo_dir.display());
        Command::new("git")
            .arg("-C")
            .arg(&config.repo_dir)
            .arg("pull")
            .output()
    } else {
        info!(
            "Cloning {} into {}",
            config.upstream_url,
            config.repo_dir.display()
        );
        Command::new("git")
            .arg("clone")
            .arg(&config.upstream_url)
            .arg(&config.repo_dir)
            .output()
    };

    let output = output.map_err(|e| Error::SyncFailure(format!("Failed to run git: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::SyncFailure(format!(
            "git exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    info!("Repository source is up to date");
    Ok(())
}
