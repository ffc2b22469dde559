//! repolite CLI entry point

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};

use repolite::cli::commands;
use repolite::cli::{Output, RepoContext};
use repolite::core::config::LoadedConfig;
use repolite::git::GitHost;
use repolite::telemetry::{init_telemetry, TelemetryConfig};
use repolite::ReconcileError;

#[derive(Parser)]
#[command(name = "repolite")]
#[command(
    author,
    version,
    about = "Manage local (git) dependency repositories from a YAML config",
    long_about = None
)]
struct Cli {
    /// Display more logging info
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Display less logging and pass -q to git
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file to use instead of .repolite.yml
    #[arg(short, long, env = "REPO_CFG", global = true)]
    config: Option<PathBuf>,

    /// Fail instead of warning when a repo directory is missing
    #[arg(long, global = true)]
    strict_dirs: bool,

    /// Keep processing the remaining repos after one fails
    #[arg(long, global = true)]
    keep_going: bool,

    /// Never push new tags
    #[arg(long, global = true)]
    no_push: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone enabled repositories into top_dir (default)
    Sync,
    /// Update existing repositories, or check out pinned hashes from a locked config
    Update,
    /// Display current repository state
    Show {
        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Pin every repo at its current HEAD in a new locked config file
    Lock,
    /// Apply TAG, or each repo's configured tag, to enabled repositories
    Tag {
        /// Tag name override
        tag: Option<String>,
    },
    /// Run gitchangelog in enabled repositories, writing files to top_dir
    Changelog,
    /// pip install enabled repositories (python only)
    Install,
    /// Inspect or save the active configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the active config to stdout
    Dump,
    /// Save the active config to .repolite.yml in the current directory
    Save,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = TelemetryConfig::from_flags(cli.verbose, cli.quiet);
    let _guard = match init_telemetry(&telemetry) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: logging disabled: {}", e);
            None
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Output::error(&format!("{:#}", e));
            if let Some(hint) = e.downcast_ref::<ReconcileError>().and_then(planning_hint) {
                eprintln!("  {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

/// Follow-up advice for conditions raised before any repo was touched
fn planning_hint(err: &ReconcileError) -> Option<&'static str> {
    if !err.is_planning_error() {
        return None;
    }
    match err {
        ReconcileError::DirectoryMismatch(_) => {
            Some("Run `repolite sync` first, or fix the config so it matches top_dir")
        }
        ReconcileError::AlreadyExists(_) => Some("Did you sync your repositories first?"),
        ReconcileError::MissingPin(_) => Some("Re-create the locked config with `repolite lock`"),
        _ => None,
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let command = cli.command.unwrap_or(Commands::Sync);

    if let Commands::Completions { shell } = command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "repolite", &mut std::io::stdout());
        return Ok(());
    }

    let cwd = std::env::current_dir()?;
    let loaded = LoadedConfig::locate(cli.config.as_deref(), &cwd)?;

    if let Commands::Config { action } = &command {
        match action {
            ConfigCommands::Dump => {
                commands::config::run_config_dump(&loaded, &mut std::io::stdout().lock())?
            }
            ConfigCommands::Save => {
                let path = commands::config::run_config_save(&loaded, &cwd)?;
                if !cli.quiet {
                    Output::success(&format!("Saved {}", path.display()));
                }
            }
        }
        return Ok(());
    }

    let host = GitHost::discover()?;
    let ctx = RepoContext::new(loaded, host, cwd)
        .with_quiet(cli.quiet)
        .with_strict_dirs(cli.strict_dirs)
        .with_push_tags(!cli.no_push)
        .with_keep_going(cli.keep_going);

    match command {
        Commands::Sync => {
            commands::sync::run_sync(&ctx)?;
        }
        Commands::Update => {
            commands::update::run_update(&ctx)?;
        }
        Commands::Show { json } => commands::show::run_show(&ctx, json)?,
        Commands::Lock => {
            commands::lock::run_lock(&ctx)?;
        }
        Commands::Tag { tag } => {
            commands::tag::run_tag(&ctx, tag.as_deref())?;
        }
        Commands::Changelog => {
            for path in commands::changelog::run_changelog(&ctx)? {
                if !cli.quiet {
                    Output::success(&format!("Wrote {}", path.display()));
                }
            }
        }
        Commands::Install => {
            commands::install::run_install(&ctx)?;
        }
        Commands::Config { .. } | Commands::Completions { .. } => {}
    }

    Ok(())
}
