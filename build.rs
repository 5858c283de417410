// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("lazuli")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Lazuli Linux Contributors")
        .about("Minimal package manager for Lazuli Linux")
        .subcommand_required(false)
        .subcommand(
            Command::new("install")
                .about("Install a package from the repository source")
                .arg(Arg::new("name").required(true).help("Package name"))
                .arg(
                    Arg::new("alias")
                        .long("alias")
                        .action(ArgAction::SetTrue)
                        .help("Add a shell alias instead of copying the artifact"),
                )
                .arg(
                    Arg::new("allow_fallback")
                        .long("allow-fallback")
                        .action(ArgAction::SetTrue)
                        .help("Delegate to the native package manager when no bundle exists"),
                ),
        )
        .subcommand(
            Command::new("remove")
                .about("Remove a package previously installed by lazuli")
                .arg(Arg::new("name").required(true).help("Package name")),
        )
        .subcommand(Command::new("list").about("List packages tracked by the registry"))
}

fn build_fetch_cli() -> Command {
    Command::new("lzfetch")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Lazuli Linux Contributors")
        .about("System information tool for Lazuli Linux")
        .arg(
            Arg::new("no_color")
                .long("no-color")
                .action(ArgAction::SetTrue)
                .help("Disable ANSI colors"),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory
    let out_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("Failed to create man directory");

    // Generate one man page per binary
    for (cmd, page) in [(build_cli(), "lazuli.1"), (build_fetch_cli(), "lzfetch.1")] {
        let man = Man::new(cmd);
        let mut buffer = Vec::new();
        man.render(&mut buffer).expect("Failed to render man page");

        let man_path = man_dir.join(page);
        fs::write(&man_path, buffer).expect("Failed to write man page");

        println!("cargo:warning=Man page generated at {}", man_path.display());
    }
}
