// src/packages/mod.rs

//! Package install and remove operations
//!
//! The installer places a bundle's artifact into the install directory
//! (or wires up a shell alias to it) and records the result in the
//! registry; the remover undoes exactly what the recorded method says
//! was done. Both validate the package name first: it is interpolated
//! into file paths and shell text, so it must stay strictly
//! alphanumeric at every entry point.

pub mod install;
pub mod remove;

use crate::error::{Error, Result};
use std::path::Path;

pub use install::{install, InstallOutcome};
pub use remove::remove;

/// Validate a package name: non-empty, ASCII alphanumeric only.
///
/// Enforced before any filesystem or registry access, not just at record
/// creation. Rejects path separators and shell metacharacters by
/// construction.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidInput("package name is empty".to_string()));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::InvalidInput(format!(
            "'{}' contains characters outside [A-Za-z0-9]",
            name
        )));
    }
    Ok(())
}

/// Canonical alias directive appended to the shell configuration file.
pub(crate) fn alias_directive(name: &str, artifact: &Path) -> String {
    format!("alias {}='{}'", name, artifact.display())
}

/// Leading token identifying the alias line for `name`.
///
/// The trailing `=` makes the name match exact: the token for `tool3`
/// never matches the line for `tool33`.
pub(crate) fn alias_token(name: &str) -> String {
    format!("alias {}=", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_accepts_alphanumeric() {
        assert!(validate_name("tool1").is_ok());
        assert!(validate_name("LzFetch2").is_ok());
    }

    #[test]
    fn test_validate_name_rejects_empty() {
        assert!(matches!(validate_name(""), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_validate_name_rejects_path_and_shell_metacharacters() {
        for name in ["../etc", "a/b", "a b", "a;rm", "a'b", "tool-1", "αβ"] {
            assert!(
                matches!(validate_name(name), Err(Error::InvalidInput(_))),
                "'{}' should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_alias_token_does_not_match_longer_names() {
        let directive = alias_directive("tool33", Path::new("/repo/rolling/tool33/tool33"));
        assert!(!directive.starts_with(&alias_token("tool3")));
        assert!(directive.starts_with(&alias_token("tool33")));
    }
}
