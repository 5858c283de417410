// src/render.rs

//! Terminal rendering for lzfetch
//!
//! Pure functions: given a system snapshot and a banner, produce the
//! final string. Column padding is computed on visible width, with ANSI
//! escape sequences stripped.

use crate::sysinfo::SystemInfo;

/// Spaces between the banner column and the info column
const COLUMN_PADDING: &str = "  ";

const RESET: &str = "\x1b[0m";
const BOLD_BLUE: &str = "\x1b[1;94m";
const BOLD_CYAN: &str = "\x1b[1;36m";
const DARK_GRAY: &str = "\x1b[90m";

/// Decorative banner shown beside the info column.
pub const BANNER: &[&str] = &[
    r"   __                  ___ ",
    r"  / /___ _____  __  __/ (_)",
    r" / / __ `/_  / / / / / / / ",
    r"/ / /_/ / / /_/ /_/ / / /  ",
    r"/_/\__,_/ /___/\__,_/_/_/  ",
    r"                           ",
];

/// Render `info` beside `banner`.
///
/// When `color` is false the output carries no escape sequences at all,
/// which also makes the padding math trivial to verify.
pub fn render(info: &SystemInfo, banner: &[&str], color: bool) -> String {
    let title = if color {
        format!("{}{}{}", BOLD_BLUE, info.user_host, RESET)
    } else {
        info.user_host.clone()
    };
    let separator = {
        let line = "=".repeat(visible_width(&info.user_host));
        if color {
            format!("{}{}{}", DARK_GRAY, line, RESET)
        } else {
            line
        }
    };

    let mut right: Vec<String> = vec![title, separator];
    for (label, value) in info.rows() {
        if color {
            right.push(format!("{}{}:{} {}", BOLD_CYAN, label, RESET, value));
        } else {
            right.push(format!("{}: {}", label, value));
        }
    }

    let left: Vec<String> = if color {
        banner
            .iter()
            .map(|line| format!("{}{}{}", BOLD_BLUE, line, RESET))
            .collect()
    } else {
        banner.iter().map(|line| line.to_string()).collect()
    };

    let left_width = left.iter().map(|l| visible_width(l)).max().unwrap_or(0);
    let rows = left.len().max(right.len());

    let mut out = String::new();
    for i in 0..rows {
        let left_line = left.get(i).map(String::as_str).unwrap_or("");
        let right_line = right.get(i).map(String::as_str).unwrap_or("");
        let pad = left_width - visible_width(left_line);
        out.push_str(left_line);
        for _ in 0..pad {
            out.push(' ');
        }
        out.push_str(COLUMN_PADDING);
        out.push_str(right_line);
        // Trailing spaces on banner-only rows are pointless.
        while out.ends_with(' ') {
            out.pop();
        }
        out.push('\n');
    }
    out
}

/// Character count with ANSI CSI escape sequences stripped.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip to the final byte of the CSI sequence.
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sysinfo::SystemInfo;

    fn sample_info() -> SystemInfo {
        SystemInfo {
            user_host: "u@host".to_string(),
            os_name: "Lazuli Linux".to_string(),
            kernel: "6.8.0".to_string(),
            uptime: "3h 25m".to_string(),
            packages: "812 (pacman)".to_string(),
            shell: "zsh".to_string(),
            desktop: "Hyprland".to_string(),
            cpu: "Some CPU".to_string(),
            memory: "8000MiB / 16000MiB".to_string(),
        }
    }

    #[test]
    fn test_visible_width_strips_ansi() {
        assert_eq!(visible_width("plain"), 5);
        assert_eq!(visible_width("\x1b[1;94mblue\x1b[0m"), 4);
        assert_eq!(visible_width(""), 0);
    }

    #[test]
    fn test_render_without_color_has_no_escapes() {
        let out = render(&sample_info(), BANNER, false);
        assert!(!out.contains('\x1b'));
        assert!(out.contains("u@host"));
        assert!(out.contains("OS: Lazuli Linux"));
        assert!(out.contains("Memory: 8000MiB / 16000MiB"));
    }

    #[test]
    fn test_render_aligns_info_column() {
        let out = render(&sample_info(), &["##", "####"], false);
        let lines: Vec<&str> = out.lines().collect();
        // Both info cells start at the same column: banner width 4 + padding.
        assert_eq!(lines[0], "##    u@host");
        assert_eq!(lines[1], "####  ======");
    }

    #[test]
    fn test_render_is_pure() {
        let info = sample_info();
        assert_eq!(render(&info, BANNER, true), render(&info, BANNER, true));
    }

    #[test]
    fn test_render_longer_info_than_banner() {
        let out = render(&sample_info(), &["#"], false);
        // 2 header rows + 8 info rows.
        assert_eq!(out.lines().count(), 10);
    }
}
