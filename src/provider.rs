use async_trait::async_trait;

use crate::error::MigrationError;
use crate::model::{NewRepository, Project, SourceRepository, TargetRepository};

/// Host the repositories are migrated away from.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>, MigrationError>;

    async fn list_repositories(
        &self,
        project: &Project,
    ) -> Result<Vec<SourceRepository>, MigrationError>;
}

/// Host the repositories are migrated into.
#[async_trait]
pub trait TargetProvider: Send + Sync {
    /// Every repository of the configured organization.
    async fn list_repositories(&self) -> Result<Vec<TargetRepository>, MigrationError>;

    /// Fails with [`MigrationError::RepositoryAlreadyExists`] when the name is
    /// taken.
    async fn create_repository(
        &self,
        repository: &NewRepository,
    ) -> Result<TargetRepository, MigrationError>;
}
