#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

mod commands;
mod logging;

use clap::Parser;
use commands::deps::DepsAction;
use miette::Result;
use pkgmeta_core::config::MANIFEST_FILE_NAME;
use pkgmeta_core::{Config, DependencyKind};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pkgmeta")]
#[command(author, version, about = "Inspect, normalize and edit package.json manifests", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    /// Manifest file name
    #[arg(long, global = true, value_name = "FILE", default_value = MANIFEST_FILE_NAME)]
    manifest: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Print the manifest as it would be written
    Show {
        /// Print a single top-level field
        #[arg(long, value_name = "KEY")]
        field: Option<String>,
    },

    /// Create a manifest in the working directory
    Init {
        /// Package name (defaults to the directory name)
        #[arg(long)]
        name: Option<String>,

        /// Accept all defaults without prompting
        #[arg(short, long)]
        yes: bool,
    },

    /// Fill description, repository, bugs and homepage from README and git
    Normalize {
        /// Write the result back to the manifest
        #[arg(long)]
        write: bool,
    },

    /// List and edit dependencies
    Deps {
        #[command(subcommand)]
        deps_cmd: DepsCommands,
    },
}

#[derive(clap::Subcommand, Debug)]
enum DepsCommands {
    /// List every dependency, runtime versions first
    List,

    /// Add a dependency
    Add {
        /// Package name
        name: String,

        /// Version range
        version: String,

        /// Add to devDependencies
        #[arg(long, conflicts_with_all = ["peer", "optional"])]
        dev: bool,

        /// Add to peerDependencies
        #[arg(long, conflicts_with = "optional")]
        peer: bool,

        /// Add to optionalDependencies
        #[arg(long)]
        optional: bool,

        /// Replace an existing entry
        #[arg(long, conflicts_with = "keep")]
        overwrite: bool,

        /// Keep an existing entry and succeed
        #[arg(long)]
        keep: bool,
    },

    /// Remove dependencies from every section
    Remove {
        /// Package names
        #[arg(required = true)]
        names: Vec<String>,
    },
}

impl DepsCommands {
    fn into_action(self) -> DepsAction {
        match self {
            Self::List => DepsAction::List,
            Self::Add {
                name,
                version,
                dev,
                peer,
                optional,
                overwrite,
                keep,
            } => {
                let kind = if dev {
                    DependencyKind::Development
                } else if peer {
                    DependencyKind::Peer
                } else if optional {
                    DependencyKind::Optional
                } else {
                    DependencyKind::Runtime
                };
                let overwrite = match (overwrite, keep) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                };
                DepsAction::Add {
                    name,
                    version,
                    kind,
                    overwrite,
                }
            }
            Self::Remove { names } => DepsAction::Remove { names },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let config = Config::new(cwd.clone())
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json)
        .with_manifest(cli.manifest);

    logging::init(config.verbosity, config.json_logs);

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(cli.json),
        Some(Commands::Show { field }) => {
            let span = tracing::info_span!("show", cmd = "show", cwd = %cwd.display());
            let _guard = span.enter();
            commands::show::run(&config, field.as_deref(), cli.json)
        }
        Some(Commands::Init { name, yes }) => {
            let span = tracing::info_span!("init", cmd = "init", cwd = %cwd.display());
            let _guard = span.enter();
            commands::init::run(&config, name, yes, cli.json)
        }
        Some(Commands::Normalize { write }) => {
            let span = tracing::info_span!("normalize", cmd = "normalize", cwd = %cwd.display());
            let _guard = span.enter();
            commands::normalize::run(&config, write, cli.json)
        }
        Some(Commands::Deps { deps_cmd }) => {
            let span = tracing::info_span!("deps", cmd = "deps", cwd = %cwd.display());
            let _guard = span.enter();
            commands::deps::run(&config, deps_cmd.into_action(), cli.json)
        }
    }
}
