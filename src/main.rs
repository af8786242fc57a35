use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use colored::Colorize;
use pbxsync::cli::{Cli, Commands};
use pbxsync::config::Config;
use pbxsync::output::{self, Verbosity};
use pbxsync::project::SyncError;
use pbxsync::{SyncContext, SyncOptions, commands};
use std::io;
use std::process;
use tracing::debug;

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            if let Some(err) = e.downcast_ref::<SyncError>() {
                debug!(kind = err.error_type(), "Sync aborted");
            }
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    output::set_verbosity(verbosity);
    output::logging::init(verbosity);

    let root = std::env::current_dir().context("Failed to determine working directory")?;
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| root.join(pbxsync::DEFAULT_CONFIG_FILE));

    match cli.command {
        Some(Commands::Completion { shell }) => {
            print_completions(shell, &mut Cli::command());
            Ok(0)
        }
        Some(Commands::Config { key }) => {
            let config = Config::load(&config_path)?;
            let options = SyncOptions {
                project: cli.project,
                source_root: cli.source_root,
                dry_run: false,
            };
            // Without a detectable project only the file's own values can be shown
            let config = match SyncContext::with_config(root, config_path, config.clone(), options) {
                Ok(ctx) => ctx.effective_config(),
                Err(e) => {
                    debug!(error = %e, "Showing configuration without project fallbacks");
                    config
                }
            };
            commands::config::execute(&config, key.as_deref())?;
            Ok(0)
        }
        None => {
            let options = SyncOptions {
                project: cli.project,
                source_root: cli.source_root,
                dry_run: cli.dry_run,
            };
            let ctx = SyncContext::new(root, config_path, options)?;
            let outcome = commands::sync::execute(&ctx)?;
            Ok(outcome.exit_code())
        }
    }
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
