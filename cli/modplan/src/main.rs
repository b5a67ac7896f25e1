//! modplan: resolve plugin module declarations into a build plan.

mod commands;
mod manifest;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "modplan",
    version,
    about = "Module dependency and platform artifact resolver for engine plugins"
)]
struct Cli {
    /// Path to modplan.toml (default: search upward from the current directory)
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,
    /// Log resolution steps
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a canonical modplan.toml (runtime + editor modules)
    Init {
        /// Directory to create the manifest in
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// Plugin name (default: directory name)
        #[arg(long)]
        name: Option<String>,
    },
    /// Emit the ordered build plan for a platform
    Plan {
        /// Target platform (Linux, Mac, Win64; default: host)
        #[arg(long)]
        platform: Option<String>,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Show the module dependency tree
    Tree,
    /// Print the static library a module links on a platform
    Artifact {
        /// Module name
        module: String,
        /// Target platform (default: host)
        #[arg(long)]
        platform: Option<String>,
    },
    /// Check declarations for every platform
    Validate,
    /// List supported platforms
    Platforms,
}

fn main() {
    let cli = Cli::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { dir, name } => commands::init::run(&cwd.join(dir), name.as_deref()),

        Commands::Plan { platform, format } => {
            let loaded = manifest::load(cli.manifest.as_deref(), &cwd)?;
            let platform = manifest::resolve_platform(platform.as_deref())?;
            commands::plan::run(&loaded, platform, format.as_deref())
        }

        Commands::Tree => {
            let loaded = manifest::load(cli.manifest.as_deref(), &cwd)?;
            commands::plan::tree(&loaded)
        }

        Commands::Artifact { module, platform } => {
            let loaded = manifest::load(cli.manifest.as_deref(), &cwd)?;
            let platform = manifest::resolve_platform(platform.as_deref())?;
            commands::artifact::run(&loaded, &module, platform)
        }

        Commands::Validate => {
            let loaded = manifest::load(cli.manifest.as_deref(), &cwd)?;
            commands::validate::run(&loaded)
        }

        Commands::Platforms => commands::platform::list(),
    }
}
