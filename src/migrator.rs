//! Top-level migration loop.
//!
//! Projects and their repositories are processed strictly in order. The
//! target organization is listed once up front; the migrator is its only
//! writer for the duration of a run, so the snapshot is never refreshed.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::cli::{Credentials, ParsedConfig};
use crate::decision::{decide, name_key, MigrationDecision};
use crate::error::MigrationError;
use crate::git::GitTransport;
use crate::model::{NewRepository, Project, SourceRepository, TargetRepository};
use crate::provider::{SourceProvider, TargetProvider};
use crate::report::{MigrationReport, Outcome};
use crate::transfer::{TransferEngine, TransferRequest};

pub struct Migrator<S, T, G> {
    source: S,
    target: T,
    engine: TransferEngine<G>,
    temp_path: PathBuf,
    source_credentials: Credentials,
    destination_credentials: Credentials,
}

/// Run-wide state shared by every repository of every project.
struct RunState {
    existing: HashMap<String, TargetRepository>,
    seen: HashSet<String>,
}

impl<S, T, G> Migrator<S, T, G>
where
    S: SourceProvider,
    T: TargetProvider,
    G: GitTransport,
{
    pub fn new(config: &ParsedConfig, source: S, target: T, engine: TransferEngine<G>) -> Self {
        Self {
            source,
            target,
            engine,
            temp_path: config.temp_path.clone(),
            source_credentials: config.source.credentials(),
            destination_credentials: config.target.credentials(),
        }
    }

    /// Migrates every repository of every source project.
    ///
    /// Per-repository failures end up in the report; only listing failures
    /// and target client errors abort the run.
    pub async fn migrate(&self) -> Result<MigrationReport, MigrationError> {
        let mut report = MigrationReport::default();

        let projects = self.source.list_projects().await?;
        if projects.is_empty() {
            info!("no projects found on the source, nothing to migrate");
            return Ok(report);
        }

        let existing = self
            .target
            .list_repositories()
            .await?
            .into_iter()
            .map(|repository| (name_key(&repository.name), repository))
            .collect();
        let mut state = RunState {
            existing,
            seen: HashSet::new(),
        };

        for project in &projects {
            let repositories = self.source.list_repositories(project).await?;
            info!(
                project = %project.key,
                repositories = repositories.len(),
                "migrating project {}",
                project.name
            );

            for repository in &repositories {
                let outcome = self.migrate_repository(project, repository, &state).await;
                state.seen.insert(name_key(&repository.name));
                report.record(project, repository, outcome);
            }
        }

        report.log_summary();
        Ok(report)
    }

    pub fn engine(&self) -> &TransferEngine<G> {
        &self.engine
    }

    async fn migrate_repository(
        &self,
        project: &Project,
        repository: &SourceRepository,
        state: &RunState,
    ) -> Outcome {
        match self.try_migrate_repository(project, repository, state).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(
                    project = %project.key,
                    repository = %repository.name,
                    "migration failed: {}",
                    err
                );
                Outcome::Failed(err.to_string())
            }
        }
    }

    async fn try_migrate_repository(
        &self,
        project: &Project,
        repository: &SourceRepository,
        state: &RunState,
    ) -> Result<Outcome, MigrationError> {
        let decision = decide(&repository.name, &state.existing, &state.seen);

        let source_url = match (&decision, repository.clone_url.as_deref()) {
            (MigrationDecision::SkipDuplicateName, _) => {
                warn!(
                    project = %project.key,
                    repository = %repository.name,
                    "repository name already migrated from another project, migrate it manually"
                );
                return Ok(Outcome::SkippedDuplicateName);
            }
            (MigrationDecision::SkipExistingWithContent, _) => {
                info!(
                    repository = %repository.name,
                    "target repository already has content, skipping"
                );
                return Ok(Outcome::SkippedWithContent);
            }
            (_, None) => {
                return Err(MigrationError::MissingCloneLink {
                    project: project.key.clone(),
                    repository: repository.name.clone(),
                })
            }
            (_, Some(url)) => url,
        };

        match decision {
            MigrationDecision::ResumeExistingEmpty { clone_url } => {
                info!(
                    repository = %repository.name,
                    "target repository exists but is empty, resuming"
                );
                self.transfer(repository, source_url, &clone_url).await?;
                Ok(Outcome::Resumed)
            }
            MigrationDecision::Create => {
                let new_repository = NewRepository::migrated_from(project, repository);
                let created = match self.target.create_repository(&new_repository).await {
                    Ok(created) => created,
                    Err(MigrationError::RepositoryAlreadyExists(name)) => {
                        warn!(repository = %name, "target repository appeared concurrently, skipping");
                        return Ok(Outcome::SkippedAlreadyExists);
                    }
                    Err(err) => return Err(err),
                };

                info!(repository = %created.name, "created target repository");
                self.transfer(repository, source_url, &created.clone_url)
                    .await?;
                Ok(Outcome::Created)
            }
            MigrationDecision::SkipDuplicateName => Ok(Outcome::SkippedDuplicateName),
            MigrationDecision::SkipExistingWithContent => Ok(Outcome::SkippedWithContent),
        }
    }

    async fn transfer(
        &self,
        repository: &SourceRepository,
        source_url: &str,
        destination_url: &str,
    ) -> Result<(), MigrationError> {
        let local_path = self.temp_path.join(&repository.name);
        let request = TransferRequest {
            source_url,
            destination_url,
            local_path: &local_path,
            source_credentials: &self.source_credentials,
            destination_credentials: &self.destination_credentials,
        };

        let mode = self
            .engine
            .transfer(&request)
            .await
            .map_err(|source| MigrationError::Transfer {
                repository: repository.name.clone(),
                source,
            })?;

        info!(repository = %repository.name, ?mode, "transferred history");
        Ok(())
    }
}
