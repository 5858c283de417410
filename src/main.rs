// src/main.rs

use clap::{Parser, Subcommand};
use lazuli::config::Config;
use lazuli::packages::{self, InstallOutcome};
use lazuli::registry::{InstallMethod, Registry};
use lazuli::{repository, Error};
use std::process::ExitCode;
use tracing::info;

#[derive(Parser)]
#[command(name = "lazuli")]
#[command(author, version, about = "Minimal package manager for Lazuli Linux", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Install a package from the repository source
    Install {
        /// Package name
        name: String,
        /// Add a shell alias instead of copying the artifact
        #[arg(long)]
        alias: bool,
        /// Delegate to the native package manager when no bundle exists
        #[arg(long)]
        allow_fallback: bool,
    },
    /// Remove a package previously installed by lazuli
    Remove {
        /// Package name
        name: String,
    },
    /// List packages tracked by the registry
    List,
}

fn main() -> ExitCode {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::system();

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(cli: &Cli, config: &Config) -> lazuli::Result<()> {
    match &cli.command {
        Some(Commands::Install {
            name,
            alias,
            allow_fallback,
        }) => {
            let method = if *alias {
                InstallMethod::Alias
            } else {
                InstallMethod::Copy
            };

            // Copy installs write to the system install directory; alias
            // installs only touch the caller's own shell config.
            if method == InstallMethod::Copy {
                require_root("install")?;
            }

            info!("Syncing repository source before install");
            repository::sync(config)?;

            match packages::install(config, name, method, *allow_fallback)? {
                InstallOutcome::Tracked(record) => match record.method {
                    InstallMethod::Copy => {
                        println!(
                            "Installed '{}' to {}",
                            record.name,
                            config.install_dir.display()
                        );
                    }
                    InstallMethod::Alias => {
                        println!(
                            "Alias '{}' added. Run `source {}` to apply.",
                            record.name,
                            config.shell_rc_path.display()
                        );
                    }
                },
                InstallOutcome::Fallback => {
                    println!("Installed '{}' via the native package manager (untracked)", name);
                }
            }
            Ok(())
        }
        Some(Commands::Remove { name }) => {
            require_root("remove")?;

            let record = packages::remove(config, name)?;
            match record.method {
                InstallMethod::Copy => {
                    println!(
                        "Removed '{}' from {}",
                        record.name,
                        config.install_dir.display()
                    );
                }
                InstallMethod::Alias => {
                    println!(
                        "Alias '{}' removed. Run `source {}` to apply.",
                        record.name,
                        config.shell_rc_path.display()
                    );
                }
            }
            Ok(())
        }
        Some(Commands::List) => {
            let registry = Registry::load(&config.registry_path);
            if registry.records().is_empty() {
                println!("No packages installed by lazuli.");
            } else {
                println!("Installed packages:");
                for record in registry.records() {
                    println!("  {} ({:?})", record.name, record.method);
                }
                println!("\nTotal: {} package(s)", registry.records().len());
            }
            Ok(())
        }
        None => {
            println!("lazuli v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'lazuli --help' for usage information");
            Ok(())
        }
    }
}

/// Refuse privileged operations before any mutation when not root.
fn require_root(operation: &str) -> lazuli::Result<()> {
    // SAFETY: geteuid has no preconditions and cannot fail.
    let euid = unsafe { libc::geteuid() };
    if euid != 0 {
        return Err(Error::PermissionDenied(format!(
            "'{}' requires root privileges; run with sudo",
            operation
        )));
    }
    Ok(())
}
