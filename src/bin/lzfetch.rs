// src/bin/lzfetch.rs

use clap::Parser;
use lazuli::render::{self, BANNER};
use lazuli::sysinfo;
use std::io::IsTerminal;

#[derive(Parser)]
#[command(name = "lzfetch")]
#[command(author, version, about = "System information tool for Lazuli Linux", long_about = None)]
struct Cli {
    /// Disable ANSI colors (also disabled when stdout is not a terminal)
    #[arg(long)]
    no_color: bool,
}

fn main() {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stdout().is_terminal();

    let info = sysinfo::collect();
    print!("{}", render::render(&info, BANNER, color));
}
