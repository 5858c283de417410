// src/packages/install.rs

//! Installer: bundle resolution, setup command, placement, tracking

use crate::config::Config;
use crate::error::{Error, Result};
use crate::registry::{InstallMethod, PackageRecord, Registry, RegistryLock};
use crate::repository::{self, Bundle};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::process::Command;
use tracing::{debug, info, warn};

/// What an install invocation produced
#[derive(Debug, PartialEq, Eq)]
pub enum InstallOutcome {
    /// A bundle was installed and recorded in the registry
    Tracked(PackageRecord),
    /// The native package manager installed it; intentionally untracked
    Fallback,
}

/// Install `name` using `method`.
///
/// Steps, aborting before any mutation on validation failures:
/// 1. Validate the name.
/// 2. Take the registry lock for the whole operation.
/// 3. Resolve the bundle; without one, alias installs fail outright and
///    copy installs may delegate to the native package manager when
///    `allow_fallback` is set (fallback installs are never recorded —
///    this tool only manages what it installed itself).
/// 4. Run the bundle's setup command, if declared; non-zero exit aborts.
/// 5. Copy the artifact (mode 0755) or append an alias directive to the
///    shell configuration file (backed up first), then upsert the record
///    and persist the registry.
pub fn install(
    config: &Config,
    name: &str,
    method: InstallMethod,
    allow_fallback: bool,
) -> Result<InstallOutcome> {
    super::validate_name(name)?;
    let _lock = RegistryLock::acquire(&config.lock_path)?;

    let bundle = match repository::find_bundle(config, name) {
        Some(bundle) => bundle,
        None => {
            if method == InstallMethod::Alias {
                // Aliasing needs a local artifact to point at.
                return Err(Error::PackageNotFound(format!(
                    "no bundle for '{}' in {}",
                    name,
                    config.repo_dir.display()
                )));
            }
            if allow_fallback {
                fallback_install(config, name)?;
                return Ok(InstallOutcome::Fallback);
            }
            return Err(Error::PackageNotFound(format!(
                "no bundle for '{}' in {}",
                name,
                config.repo_dir.display()
            )));
        }
    };

    if let Some(command) = &bundle.setup_command {
        run_setup_command(command)?;
    }

    let record = match method {
        InstallMethod::Copy => copy_install(config, &bundle)?,
        InstallMethod::Alias => alias_install(config, &bundle)?,
    };

    let mut registry = Registry::load(&config.registry_path);
    registry.upsert(record.clone());
    registry.save()?;

    info!("Installed '{}' ({:?})", name, method);
    Ok(InstallOutcome::Tracked(record))
}

/// Copy the artifact into the install directory and mark it executable.
fn copy_install(config: &Config, bundle: &Bundle) -> Result<PackageRecord> {
    fs::create_dir_all(&config.install_dir)?;
    let target = config.install_dir.join(&bundle.name);

    fs::copy(&bundle.artifact, &target)?;
    fs::set_permissions(&target, fs::Permissions::from_mode(0o755))?;
    debug!("Copied {} to {}", bundle.artifact.display(), target.display());

    Ok(PackageRecord {
        name: bundle.name.clone(),
        method: InstallMethod::Copy,
        side_file: None,
    })
}

/// Append an alias directive for the artifact to the shell rc file.
///
/// The rc file is backed up to `<rc>.bak` first; losing the user's shell
/// configuration silently is unacceptable, so a failed backup aborts the
/// install.
fn alias_install(config: &Config, bundle: &Bundle) -> Result<PackageRecord> {
    let rc_path = &config.shell_rc_path;

    let existing = match fs::read_to_string(rc_path) {
        Ok(contents) => {
            let backup = rc_path.with_extension("bak");
            fs::copy(rc_path, &backup)?;
            debug!("Backed up {} to {}", rc_path.display(), backup.display());
            Some(contents)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(rc_path)?;
    // Keep the directive on its own line even if the file lacks a
    // trailing newline.
    if matches!(&existing, Some(contents) if !contents.is_empty() && !contents.ends_with('\n')) {
        file.write_all(b"\n")?;
    }
    let directive = super::alias_directive(&bundle.name, &bundle.artifact);
    file.write_all(directive.as_bytes())?;
    file.write_all(b"\n")?;

    info!("Added alias line to {}", rc_path.display());
    Ok(PackageRecord {
        name: bundle.name.clone(),
        method: InstallMethod::Alias,
        side_file: Some(rc_path.clone()),
    })
}

/// Run a bundle's declared setup command via the shell.
fn run_setup_command(command: &str) -> Result<()> {
    info!("Running setup command: {}", command);
    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .output()
        .map_err(|e| Error::DependencyFailure {
            command: command.to_string(),
            output: e.to_string(),
        })?;

    if !output.status.success() {
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        return Err(Error::DependencyFailure {
            command: command.to_string(),
            output: combined.trim().to_string(),
        });
    }
    Ok(())
}

/// Delegate installation to the native package manager.
///
/// Succeeding here still leaves the registry untouched; a failure means
/// neither a bundle nor the fallback could produce the package.
fn fallback_install(config: &Config, name: &str) -> Result<()> {
    info!(
        "No bundle for '{}', delegating to {}",
        name, config.fallback_program
    );
    let output = Command::new(&config.fallback_program)
        .arg("-S")
        .arg("--noconfirm")
        .arg(name)
        .output()
        .map_err(|e| {
            Error::PackageNotFound(format!(
                "no bundle for '{}' and {} could not be run: {}",
                name, config.fallback_program, e
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::PackageNotFound(format!(
            "no bundle for '{}' and fallback failed: {}",
            name,
            stderr.trim()
        )));
    }

    warn!("'{}' was installed by the fallback tool and is not tracked", name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn test_config(root: &Path) -> Config {
        Config::rooted_at(root, "file:///unused")
    }

    fn write_bundle(config: &Config, name: &str, descriptor: Option<&str>) {
        let bundle_dir = config.repo_dir.join("rolling").join(name);
        fs::create_dir_all(&bundle_dir).unwrap();
        fs::write(bundle_dir.join(name), "#!/bin/sh\necho hi\n").unwrap();
        if let Some(text) = descriptor {
            fs::write(bundle_dir.join("pkginfo"), text).unwrap();
        }
    }

    #[test]
    fn test_copy_install_places_executable_and_records() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        write_bundle(&config, "tool1", None);

        let outcome = install(&config, "tool1", InstallMethod::Copy, false).unwrap();
        assert_eq!(
            outcome,
            InstallOutcome::Tracked(PackageRecord {
                name: "tool1".to_string(),
                method: InstallMethod::Copy,
                side_file: None,
            })
        );

        let target = config.install_dir.join("tool1");
        assert!(target.is_file());
        let mode = fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755, "Artifact should be executable");

        let registry = Registry::load(&config.registry_path);
        assert_eq!(registry.records().len(), 1);
    }

    #[test]
    fn test_invalid_name_fails_before_any_io() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let result = install(&config, "../etc", InstallMethod::Copy, false);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert!(!config.registry_path.exists());
        assert!(!config.install_dir.exists());
    }

    #[test]
    fn test_missing_bundle_fails_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let result = install(&config, "ghost", InstallMethod::Copy, false);
        assert!(matches!(result, Err(Error::PackageNotFound(_))));
    }

    #[test]
    fn test_alias_install_without_bundle_never_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let result = install(&config, "ghost", InstallMethod::Alias, true);
        assert!(matches!(result, Err(Error::PackageNotFound(_))));
        assert!(
            !config.shell_rc_path.exists(),
            "Shell rc must stay untouched"
        );
        assert!(Registry::load(&config.registry_path).records().is_empty());
    }

    #[test]
    fn test_alias_install_appends_directive_and_backs_up() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        write_bundle(&config, "tool2", None);
        fs::write(&config.shell_rc_path, "export PATH=$PATH:/opt\n").unwrap();

        let outcome = install(&config, "tool2", InstallMethod::Alias, false).unwrap();
        let InstallOutcome::Tracked(record) = outcome else {
            panic!("Alias install should be tracked");
        };
        assert_eq!(record.side_file.as_deref(), Some(config.shell_rc_path.as_path()));

        let rc = fs::read_to_string(&config.shell_rc_path).unwrap();
        assert!(rc.starts_with("export PATH"));
        assert!(rc.contains("alias tool2='"));
        assert!(
            config.shell_rc_path.with_extension("bak").exists(),
            "Backup should exist"
        );
    }

    #[test]
    fn test_failing_setup_command_aborts_install() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        write_bundle(&config, "tool3", Some("dependencies: echo broken >&2; exit 3\n"));

        let result = install(&config, "tool3", InstallMethod::Copy, false);
        match result {
            Err(Error::DependencyFailure { output, .. }) => {
                assert!(output.contains("broken"), "Captured output is surfaced");
            }
            other => panic!("Expected DependencyFailure, got {:?}", other),
        }
        assert!(
            !config.install_dir.join("tool3").exists(),
            "No artifact placed after a failed setup command"
        );
        assert!(Registry::load(&config.registry_path).records().is_empty());
    }

    #[test]
    fn test_fallback_success_is_untracked() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        // Fake native package manager that accepts any arguments.
        let fake = dir.path().join("fakepac");
        fs::write(&fake, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&fake, fs::Permissions::from_mode(0o755)).unwrap();
        config.fallback_program = fake.to_str().unwrap().to_string();

        let outcome = install(&config, "tool4", InstallMethod::Copy, true).unwrap();
        assert_eq!(outcome, InstallOutcome::Fallback);
        assert!(
            Registry::load(&config.registry_path).records().is_empty(),
            "Fallback installs are not tracked"
        );
    }

    #[test]
    fn test_fallback_failure_maps_to_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        let fake = dir.path().join("fakepac");
        fs::write(&fake, "#!/bin/sh\necho 'target not found' >&2\nexit 1\n").unwrap();
        fs::set_permissions(&fake, fs::Permissions::from_mode(0o755)).unwrap();
        config.fallback_program = fake.to_str().unwrap().to_string();

        let result = install(&config, "tool4", InstallMethod::Copy, true);
        assert!(matches!(result, Err(Error::PackageNotFound(_))));
    }

    #[test]
    fn test_double_install_keeps_one_record() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        write_bundle(&config, "tool1", None);

        install(&config, "tool1", InstallMethod::Copy, false).unwrap();
        install(&config, "tool1", InstallMethod::Copy, false).unwrap();

        let registry = Registry::load(&config.registry_path);
        assert_eq!(registry.records().len(), 1, "Install upsert is idempotent");
    }
}
