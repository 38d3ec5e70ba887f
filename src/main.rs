use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// modgraph - dependency graph tooling for modpacks
#[derive(Parser)]
#[command(name = "modgraph")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Pack root (defaults to current directory)
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Show debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the pack and regenerate the report
    Report {
        /// Enable every disabled mod that an enabled mod requires
        #[arg(long)]
        enable_missing: bool,
    },

    /// Enable a mod and every mandatory dependency it needs
    Enable {
        /// Mod ID
        id: String,

        /// Show what would change without renaming anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Disable a mod and every mod that requires it
    Disable {
        /// Mod ID
        id: String,

        /// Show what would change without renaming anything
        #[arg(long)]
        dry_run: bool,
    },

    /// List, enable or disable all mods of a category
    Category {
        /// Category as shown in the report (e.g., "Library?")
        name: String,

        #[arg(value_enum)]
        action: CategoryAction,
    },

    /// Show the dependents, dependencies or optional dependencies of a mod
    List {
        #[arg(value_enum)]
        kind: ListKind,

        /// Mod ID
        id: String,
    },

    /// Ignore an optional dependency from now on
    Ignore {
        /// Mod ID of the optional dependency
        id: String,
    },

    /// List unsatisfied optional dependencies
    Optional,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CategoryAction {
    List,
    Enable,
    Disable,
}

#[derive(Clone, Copy, ValueEnum)]
enum ListKind {
    Dependents,
    Dependencies,
    Optional,
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("modgraph=debug")
    } else {
        EnvFilter::try_from_env("MODGRAPH_LOG").unwrap_or_else(|_| EnvFilter::new("off"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let root = cli.root;
    let result = match cli.command {
        Commands::Report { enable_missing } => commands::report::run(&root, enable_missing),
        Commands::Enable { id, dry_run } => commands::toggle::run(&root, id, true, dry_run),
        Commands::Disable { id, dry_run } => commands::toggle::run(&root, id, false, dry_run),
        Commands::Category { name, action } => commands::category::run(&root, name, action),
        Commands::List { kind, id } => commands::list::run(&root, kind, id),
        Commands::Ignore { id } => commands::ignore::run(&root, id),
        Commands::Optional => commands::optional::run(&root),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "modgraph", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
