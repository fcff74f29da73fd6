use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use gitterdone::cli::Cli;
use gitterdone::fs::RealFileSystem;
use gitterdone::vcs::{GitCli, P4Cli};
use gitterdone::{Config, SyncRequest, execute_offline_sync, generate_ignore_file};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("gitterdone: {err:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<bool> {
    if !cli.has_action() {
        bail!("no actionable arguments received, pass --git or --changelist");
    }

    let root = cli.root.clone().unwrap_or_else(|| PathBuf::from("."));
    let mut config = Config::discover(&root, cli.config.as_deref()).await?;
    if cli.strict {
        config.ignore.strict = true;
    }

    let mut ok = true;

    if cli.git {
        info!("Requested {} update", config.ignore.filename);
        ok &= generate_ignore_file(&RealFileSystem, &root, &config.ignore).await;
    }

    if let Some(branch) = cli.changelist {
        info!("Performing a depot operation");
        let request = SyncRequest {
            branch,
            trunk: config.depot.trunk_branch.clone(),
            remote: config.depot.remote.clone(),
            include_trunk: cli.include_trunk,
            ignored_branches: cli.ignored_branches,
        };
        let source = GitCli::new(&root);
        let depot = P4Cli::new(config.depot.tool.clone(), &root);
        let report =
            execute_offline_sync(&source, &depot, &request, &config.depot.ignored_files).await?;
        ok &= report.is_success();
    }

    Ok(ok)
}
