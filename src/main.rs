use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use std::path::PathBuf;

use stillhouse::commands;

#[derive(Parser)]
#[command(name = "still")]
#[command(author, version, about = "A source-build installer for libxo release formulae", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List known formula versions
    List {
        /// Show only installed kegs
        #[arg(long)]
        installed: bool,
    },

    /// Show information about a formula version
    Info {
        /// Version string, or "latest"
        version: String,
    },

    /// Download and verify source tarballs
    Fetch {
        /// Version strings
        #[arg(required = true)]
        versions: Vec<String>,
    },

    /// Build and install formula versions from source
    Install {
        /// Version strings
        #[arg(required_unless_present = "formula_file")]
        versions: Vec<String>,

        /// Install from a descriptor JSON file instead of the catalog
        #[arg(long)]
        formula_file: Option<PathBuf>,

        /// Install into this prefix instead of the Cellar
        #[arg(long)]
        prefix: Option<PathBuf>,

        /// Rebuild even if already installed
        #[arg(long)]
        force: bool,
    },

    /// Remove installed kegs
    Uninstall {
        /// Version strings
        #[arg(required = true)]
        versions: Vec<String>,
    },

    /// Validate every catalog descriptor
    Audit,

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; --verbose raises the default level
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Some(Commands::List { installed }) => {
            commands::list(installed)?;
        }
        Some(Commands::Info { version }) => {
            commands::info(&version)?;
        }
        Some(Commands::Fetch { versions }) => {
            commands::fetch(&versions).await?;
        }
        Some(Commands::Install {
            versions,
            formula_file,
            prefix,
            force,
        }) => {
            commands::install(&versions, formula_file.as_deref(), prefix.as_deref(), force).await?;
        }
        Some(Commands::Uninstall { versions }) => {
            commands::uninstall(&versions)?;
        }
        Some(Commands::Audit) => {
            commands::audit()?;
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        }
        None => {
            println!(
                "{} still - builds libxo releases from their published formulae",
                "🥃".bold()
            );
            println!("\nRun {} to see available commands.", "still --help".cyan());
        }
    }

    Ok(())
}
