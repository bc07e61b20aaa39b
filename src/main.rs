use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use repo_migrator::bitbucket_provider::BitbucketProvider;
use repo_migrator::cli;
use repo_migrator::git::CommandGitTransport;
use repo_migrator::github_provider::GithubProvider;
use repo_migrator::migrator::Migrator;
use repo_migrator::transfer::TransferEngine;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = cli::run()?;

    tracing::info!(
        source = %config.source_uri,
        organization = %config.target.organization,
        temp_path = %config.temp_path.display(),
        "executing migrations"
    );

    let source = BitbucketProvider::new(config.source.clone(), config.source_uri.clone())?;
    let target = GithubProvider::new(&config.target, config.target_uri.clone());
    let engine = TransferEngine::new(CommandGitTransport::new());

    let migrator = Migrator::new(&config, source, target, engine);
    let report = migrator.migrate().await.context("migration aborted")?;

    if report.has_failures() {
        for failure in report.failures() {
            tracing::error!(
                project = %failure.project,
                repository = %failure.repository,
                "{:?}",
                failure.outcome
            );
        }
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
