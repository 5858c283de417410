// src/config.rs

//! Path configuration for the package manager
//!
//! Every component takes its paths from an explicit `Config` instead of
//! global constants, so tests can point the whole tool at a temporary
//! directory tree.

use std::env;
use std::path::PathBuf;

/// Paths and upstream location for one invocation
#[derive(Debug, Clone)]
pub struct Config {
    /// Local checkout of the package repository
    pub repo_dir: PathBuf,
    /// Directory copy-installed artifacts are placed in
    pub install_dir: PathBuf,
    /// Registry document (JSON list of installed packages)
    pub registry_path: PathBuf,
    /// Advisory lock file guarding the registry
    pub lock_path: PathBuf,
    /// Upstream URL the repository is cloned from
    pub upstream_url: String,
    /// Shell configuration file alias installs append to
    pub shell_rc_path: PathBuf,
    /// Native package manager used for fallback installs
    pub fallback_program: String,
}

impl Config {
    /// Build the configuration for the real system layout.
    ///
    /// The shell rc path resolves to the invoking user's `.zshrc`, looking
    /// through `SUDO_USER` so a sudo'd install still edits the caller's
    /// file rather than root's.
    pub fn system() -> Self {
        let registry_path = PathBuf::from("/var/lib/lazuli/registry.json");
        let lock_path = registry_path.with_extension("lock");
        Self {
            repo_dir: PathBuf::from("/lazuli_fs"),
            install_dir: PathBuf::from("/usr/bin"),
            registry_path,
            lock_path,
            upstream_url: "https://github.com/lazuli-linux/lazuli-fs.git".to_string(),
            shell_rc_path: invoking_user_home().join(".zshrc"),
            fallback_program: "pacman".to_string(),
        }
    }

    /// Derive a configuration rooted under `root`, for tests.
    pub fn rooted_at(root: &std::path::Path, upstream_url: &str) -> Self {
        Self {
            repo_dir: root.join("repo"),
            install_dir: root.join("bin"),
            registry_path: root.join("state/registry.json"),
            lock_path: root.join("state/registry.lock"),
            upstream_url: upstream_url.to_string(),
            shell_rc_path: root.join(".zshrc"),
            fallback_program: "pacman".to_string(),
        }
    }
}

/// Home directory of the user who ran the tool, even under sudo.
fn invoking_user_home() -> PathBuf {
    if let Ok(sudo_user) = env::var("SUDO_USER") {
        if !sudo_user.is_empty() {
            if let Some(home) = passwd_home(&sudo_user) {
                return home;
            }
            // Unknown to the passwd database; fall back to the
            // conventional layout rather than root's HOME.
            return PathBuf::from("/home").join(sudo_user);
        }
    }
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/root"))
}

/// Look up `user`'s home directory in the passwd database.
///
/// Returns `None` for unknown users or lookup failures; non-standard
/// home directories (anything outside `/home`) resolve correctly here.
fn passwd_home(user: &str) -> Option<PathBuf> {
    let c_user = std::ffi::CString::new(user).ok()?;
    let mut pwd: libc::passwd = unsafe { std::mem::zeroed() };
    let mut buf = vec![0u8; 4096];
    let mut result: *mut libc::passwd = std::ptr::null_mut();

    // SAFETY: all pointers reference live buffers for the duration of
    // the call and getpwnam_r writes string data only into `buf`.
    let rc = unsafe {
        libc::getpwnam_r(
            c_user.as_ptr(),
            &mut pwd,
            buf.as_mut_ptr().cast::<libc::c_char>(),
            buf.len(),
            &mut result,
        )
    };
    if rc != 0 || result.is_null() {
        return None;
    }

    // SAFETY: on success pw_dir points at a NUL-terminated string in `buf`.
    let dir = unsafe { std::ffi::CStr::from_ptr(pwd.pw_dir) };
    let dir = dir.to_str().ok()?;
    if dir.is_empty() {
        None
    } else {
        Some(PathBuf::from(dir))
    }
}
