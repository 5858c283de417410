// src/packages/remove.rs

//! Remover: undo the recorded installation action and drop the record

use crate::config::Config;
use crate::error::{Error, Result};
use crate::registry::{InstallMethod, PackageRecord, Registry, RegistryLock};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Remove `name`, undoing the action the registry recorded for it.
///
/// Packages with no registry record are refused with `NotManaged`: the
/// tool must never delete an executable it did not itself place, even if
/// one exists under the same name. Already-gone artifacts and missing
/// alias lines are warnings, not failures.
pub fn remove(config: &Config, name: &str) -> Result<PackageRecord> {
    super::validate_name(name)?;
    let _lock = RegistryLock::acquire(&config.lock_path)?;

    let mut registry = Registry::load(&config.registry_path);
    let record = match registry.find(name) {
        Some(record) => record.clone(),
        None => return Err(Error::NotManaged(name.to_string())),
    };

    match record.method {
        InstallMethod::Alias => {
            let rc_path = record
                .side_file
                .as_deref()
                .unwrap_or(config.shell_rc_path.as_path());
            remove_alias_line(rc_path, name)?;
        }
        InstallMethod::Copy => {
            let target = config.install_dir.join(name);
            match fs::remove_file(&target) {
                Ok(()) => debug!("Deleted {}", target.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    warn!("'{}' already absent from {}", name, target.display());
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    registry.remove(name);
    registry.save()?;

    info!("Removed '{}'", name);
    Ok(record)
}

/// Rewrite the shell rc file without the alias line(s) for `name`.
///
/// A line is dropped only when its trimmed form starts with the full
/// `alias <name>=` token, so `tool33`'s alias survives `remove tool3`.
/// A missing rc file counts as already removed.
fn remove_alias_line(rc_path: &Path, name: &str) -> Result<()> {
    let contents = match fs::read_to_string(rc_path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(
                "Shell config {} is missing; alias for '{}' already gone",
                rc_path.display(),
                name
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let token = super::alias_token(name);
    let mut removed = 0usize;
    let kept: Vec<&str> = contents
        .lines()
        .filter(|line| {
            if line.trim_start().starts_with(&token) {
                removed += 1;
                false
            } else {
                true
            }
        })
        .collect();

    if removed == 0 {
        warn!(
            "No alias line for '{}' in {}; nothing to remove",
            name,
            rc_path.display()
        );
        return Ok(());
    }

    let mut rewritten = kept.join("\n");
    if !rewritten.is_empty() {
        rewritten.push('\n');
    }
    fs::write(rc_path, rewritten)?;

    info!(
        "Removed {} alias line(s) for '{}' from {}",
        removed,
        name,
        rc_path.display()
    );
    Ok(())
}
