// src/sysinfo/mod.rs

//! System information collector for lzfetch
//!
//! Every field is gathered by its own fallible reader; a reader that
//! fails (missing pseudo-file, unset variable, absent tool) yields
//! `None` and the collector substitutes a placeholder. `collect` itself
//! never fails, whatever the machine looks like.

use std::env;
use std::fs;
use std::process::Command;
use tracing::debug;

/// Placeholder for any field that could not be determined
pub const UNKNOWN: &str = "Unknown";

/// One snapshot of the running system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    pub user_host: String,
    pub os_name: String,
    pub kernel: String,
    pub uptime: String,
    pub packages: String,
    pub shell: String,
    pub desktop: String,
    pub cpu: String,
    pub memory: String,
}

impl SystemInfo {
    /// Label/value rows in display order.
    pub fn rows(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("OS", self.os_name.as_str()),
            ("Kernel", self.kernel.as_str()),
            ("Uptime", self.uptime.as_str()),
            ("Packages", self.packages.as_str()),
            ("Shell", self.shell.as_str()),
            ("DE", self.desktop.as_str()),
            ("CPU", self.cpu.as_str()),
            ("Memory", self.memory.as_str()),
        ]
    }
}

/// Collect a snapshot of the running system.
pub fn collect() -> SystemInfo {
    SystemInfo {
        user_host: read_user_host().unwrap_or_else(|| UNKNOWN.to_string()),
        os_name: read_os_name().unwrap_or_else(|| "Lazuli Linux".to_string()),
        kernel: read_kernel().unwrap_or_else(|| UNKNOWN.to_string()),
        uptime: read_uptime().unwrap_or_else(|| UNKNOWN.to_string()),
        packages: read_package_count().unwrap_or_else(|| UNKNOWN.to_string()),
        shell: read_shell().unwrap_or_else(|| UNKNOWN.to_string()),
        desktop: env::var("XDG_CURRENT_DESKTOP")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string()),
        cpu: read_cpu_model().unwrap_or_else(|| UNKNOWN.to_string()),
        memory: read_memory().unwrap_or_else(|| UNKNOWN.to_string()),
    }
}

fn read_user_host() -> Option<String> {
    let user = env::var("USER").ok().filter(|s| !s.is_empty())?;
    let host = fs::read_to_string("/etc/hostname")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "localhost".to_string());
    Some(format!("{}@{}", user, host))
}

fn read_os_name() -> Option<String> {
    let text = fs::read_to_string("/etc/os-release").ok()?;
    parse_os_release(&text)
}

/// Extract PRETTY_NAME from os-release text.
pub fn parse_os_release(text: &str) -> Option<String> {
    for line in text.lines() {
        if let Some(value) = line.strip_prefix("PRETTY_NAME=") {
            let value = value.trim().trim_matches('"');
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

fn read_kernel() -> Option<String> {
    fs::read_to_string("/proc/sys/kernel/osrelease")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn read_uptime() -> Option<String> {
    let text = fs::read_to_string("/proc/uptime").ok()?;
    let seconds: u64 = text.split_whitespace().next()?.parse::<f64>().ok()? as u64;
    Some(format_uptime(seconds))
}

/// Format seconds of uptime as `Nd Nh Nm` (days omitted when zero).
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;
    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else {
        format!("{}h {}m", hours, minutes)
    }
}

fn read_package_count() -> Option<String> {
    let output = Command::new("pacman").arg("-Qq").output().ok()?;
    if !output.status.success() {
        debug!("pacman -Qq exited with {}", output.status);
        return None;
    }
    let count = output.stdout.split(|b| *b == b'\n').filter(|l| !l.is_empty()).count();
    Some(format!("{} (pacman)", count))
}

fn read_shell() -> Option<String> {
    let shell = env::var("SHELL").ok().filter(|s| !s.is_empty())?;
    Some(
        shell
            .rsplit('/')
            .next()
            .unwrap_or(shell.as_str())
            .to_string(),
    )
}

fn read_cpu_model() -> Option<String> {
    let text = fs::read_to_string("/proc/cpuinfo").ok()?;
    parse_cpu_model(&text)
}

/// Extract the first `model name` value from cpuinfo text.
pub fn parse_cpu_model(text: &str) -> Option<String> {
    for line in text.lines() {
        if line.starts_with("model name") {
            if let Some((_, value)) = line.split_once(':') {
                let value = value.trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

fn read_memory() -> Option<String> {
    let text = fs::read_to_string("/proc/meminfo").ok()?;
    parse_memory(&text)
}

/// Render `MemTotal`/`MemAvailable` as `usedMiB / totalMiB`.
pub fn parse_memory(text: &str) -> Option<String> {
    let mut total_kib = None;
    let mut available_kib = None;
    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("MemTotal:") {
            total_kib = rest.split_whitespace().next()?.parse::<u64>().ok();
        } else if let Some(rest) = line.strip_prefix("MemAvailable:") {
            available_kib = rest.split_whitespace().next()?.parse::<u64>().ok();
        }
    }
    let total = total_kib? / 1024;
    let used = total.saturating_sub(available_kib? / 1024);
    Some(format!("{}MiB / {}MiB", used, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime_omits_zero_days() {
        assert_eq!(format_uptime(0), "0h 0m");
        assert_eq!(format_uptime(3 * 3600 + 25 * 60), "3h 25m");
    }

    #[test]
    fn test_format_uptime_with_days() {
        assert_eq!(format_uptime(2 * 86_400 + 3600 + 60), "2d 1h 1m");
    }

    #[test]
    fn test_parse_cpu_model() {
        let cpuinfo = "processor\t: 0\nvendor_id\t: GenuineIntel\nmodel name\t: Intel(R) Core(TM) i7\n";
        assert_eq!(
            parse_cpu_model(cpuinfo).as_deref(),
            Some("Intel(R) Core(TM) i7")
        );
    }

    #[test]
    fn test_parse_cpu_model_missing() {
        assert!(parse_cpu_model("processor: 0\n").is_none());
    }

    #[test]
    fn test_parse_memory_used_and_total() {
        let meminfo = "MemTotal:       16384000 kB\nMemFree:         1000000 kB\nMemAvailable:    8192000 kB\n";
        assert_eq!(parse_memory(meminfo).as_deref(), Some("8000MiB / 16000MiB"));
    }

    #[test]
    fn test_parse_memory_requires_both_fields() {
        assert!(parse_memory("MemTotal: 16384000 kB\n").is_none());
    }

    #[test]
    fn test_parse_os_release_pretty_name() {
        let text = "NAME=\"Lazuli\"\nPRETTY_NAME=\"Lazuli Linux (rolling)\"\n";
        assert_eq!(
            parse_os_release(text).as_deref(),
            Some("Lazuli Linux (rolling)")
        );
        assert!(parse_os_release("NAME=x\n").is_none());
    }

    #[test]
    fn test_collect_never_panics_and_fills_every_field() {
        let info = collect();
        for (_, value) in info.rows() {
            assert!(!value.is_empty(), "Every field has at least a placeholder");
        }
    }
}
